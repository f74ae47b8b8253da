use core::{
    sync::atomic::{AtomicBool, Ordering},
    time::Duration,
};
use std::sync::Arc;

use anyhow::{anyhow, bail, Result};
use arc_swap::ArcSwap;
use mime::APPLICATION_OCTET_STREAM;
use reqwest::{
    header::{ACCEPT, CONTENT_TYPE},
    Client, Method, RequestBuilder, Response as ReqwestResponse, StatusCode,
};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, info};
use types::{
    combined::{
        Attestation, BlindedBeaconBlock, BlobSidecars, SignedBeaconBlock,
        SignedBlindedBeaconBlock, SignedBlockContents, SignedExecutionPayloadEnvelope,
    },
    deneb::primitives::BlobIndex,
    nonstandard::Phase,
    phase0::{
        containers::{AttestationData, Fork},
        primitives::{CommitteeIndex, SignatureBytes, Slot, H256},
    },
    preset::Preset,
    redacting_url::RedactingUrl,
};

use crate::{
    block_id::BlockId,
    cache::StaticCache,
    config::{ApiFormat, Config},
    consts::{ETH_CONSENSUS_VERSION, MIDDLEWARE_SIGNATURES},
    content_type::{accept_header, ContentType},
    custom_spec::{self, SpecLimited},
    dispatch,
    envelope::{self, Metadata, Response},
    error::Error,
    events::{self, Event, EventSubscription, Topic},
    pool::PoolAttestations,
    proposal::{self, Proposal, ProposalResponse},
    response::HttpResponse,
    responses::{BlockHeader, BlockRoot, ChainSpec, DepositContract, Genesis, NodeVersion},
    validation::{self, ProposalChecks},
};

/// Per-call settings that override [`Config`].
#[derive(Clone, Copy, Default, Debug)]
pub struct RequestOptions {
    pub timeout: Option<Duration>,
}

impl RequestOptions {
    #[must_use]
    pub const fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
        }
    }
}

/// Client of a single beacon node.
pub struct Api {
    config: Config,
    client: Client,
    static_values: StaticCache,
    supports_ssz: ArcSwap<Option<bool>>,
    connected_to_middleware: AtomicBool,
}

impl Api {
    #[must_use]
    pub fn new(config: Config, client: Client) -> Self {
        let static_values = StaticCache::new(config.static_value_ttl);

        Self {
            config,
            client,
            static_values,
            supports_ssz: ArcSwap::from_pointee(None),
            connected_to_middleware: AtomicBool::new(false),
        }
    }

    /// Creates a client and checks whether the node is distributed validator middleware.
    pub async fn connect(config: Config, client: Client) -> Result<Self> {
        let api = Self::new(config, client);
        api.detect_middleware().await?;
        Ok(api)
    }

    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub fn connected_to_middleware(&self) -> bool {
        self.connected_to_middleware.load(Ordering::Acquire)
    }

    /// `None` until a request body has been submitted in SSZ.
    #[must_use]
    pub fn supports_ssz(&self) -> Option<bool> {
        **self.supports_ssz.load()
    }

    pub async fn detect_middleware(&self) -> Result<bool> {
        let node_version = self.node_version().await?;
        let version = node_version.version.to_ascii_lowercase();

        let detected = MIDDLEWARE_SIGNATURES
            .iter()
            .any(|signature| version.contains(signature));

        if detected {
            info!(
                "beacon node at {} is distributed validator middleware ({}), \
                 randao reveal and graffiti of proposals will not be checked",
                self.config.url, node_version.version,
            );
        }

        self.connected_to_middleware.store(detected, Ordering::Release);

        Ok(detected)
    }

    pub async fn proposal<P: Preset>(
        &self,
        slot: Slot,
        randao_reveal: SignatureBytes,
        graffiti: Option<H256>,
        options: RequestOptions,
    ) -> Result<ProposalResponse<P>> {
        let url = self.url(
            &format!("/eth/v3/validator/blocks/{slot}"),
            &proposal_query(randao_reveal, graffiti),
        )?;

        let response = self.get(&url, self.config.format, options).await?;
        let decoded = proposal::decode::<P>(&response)?;

        self.proposal_checks(slot, randao_reveal, graffiti)
            .check("block proposal", decoded.proposal.block())?;

        match &decoded.proposal {
            Proposal::Full(contents) => self.check_spec_limits::<P>(&response, contents).await?,
            Proposal::Blinded(block) => self.check_spec_limits::<P>(&response, block).await?,
        }

        info!(
            "received {} {} block proposal for slot {slot}",
            decoded.proposal.phase(),
            if decoded.proposal.is_blinded() {
                "blinded"
            } else {
                "full"
            },
        );

        Ok(decoded)
    }

    pub async fn blinded_proposal<P: Preset>(
        &self,
        slot: Slot,
        randao_reveal: SignatureBytes,
        graffiti: Option<H256>,
        options: RequestOptions,
    ) -> Result<(BlindedBeaconBlock<P>, Metadata)> {
        let url = self.url(
            &format!("/eth/v1/validator/blinded_blocks/{slot}"),
            &proposal_query(randao_reveal, graffiti),
        )?;

        let response = self.get(&url, self.config.format, options).await?;
        let (block, metadata) = dispatch::decode::<BlindedBeaconBlock<P>>(&response, None)?;

        self.proposal_checks(slot, randao_reveal, graffiti)
            .check("blinded block proposal", block.block())?;

        self.check_spec_limits::<P>(&response, &block).await?;

        info!("received {} blinded block proposal for slot {slot}", block.phase());

        Ok((block, metadata))
    }

    pub async fn signed_beacon_block<P: Preset>(
        &self,
        block_id: BlockId,
        options: RequestOptions,
    ) -> Result<(SignedBeaconBlock<P>, Metadata)> {
        let url = self.url(&format!("/eth/v2/beacon/blocks/{block_id}"), &[])?;
        let response = self.get(&url, self.config.format, options).await?;

        // Some nodes omit the version header from SSZ responses.
        // Every block encodes its slot at a fixed offset, so the fork can be inferred from it.
        let fallback = if response.consensus_version.is_none()
            && response.content_type == ContentType::Ssz
        {
            let slot = SignedBeaconBlock::<P>::slot_from_ssz(&response.body)
                .map_err(|error| anyhow!("{error:?}"))?;

            let phase = self.spec().await?.phase_at_slot::<P>(slot)?;

            debug!("inferred {phase} for SSZ block at slot {slot} without version header");

            Some(phase)
        } else {
            None
        };

        let (block, metadata) = dispatch::decode::<SignedBeaconBlock<P>>(&response, fallback)?;

        self.check_spec_limits::<P>(&response, &block).await?;

        Ok((block, metadata))
    }

    pub async fn execution_payload_envelope<P: Preset>(
        &self,
        block_id: BlockId,
        options: RequestOptions,
    ) -> Result<(SignedExecutionPayloadEnvelope<P>, Metadata)> {
        let url = self.url(
            &format!("/eth/v1/beacon/execution_payload_envelope/{block_id}"),
            &[],
        )?;

        let response = self.get(&url, self.config.format, options).await?;

        dispatch::decode(&response, None)
    }

    /// Requests all sidecars of the block if `indices` is empty.
    pub async fn blob_sidecars<P: Preset>(
        &self,
        block_id: BlockId,
        indices: &[BlobIndex],
        options: RequestOptions,
    ) -> Result<(BlobSidecars<P>, Metadata)> {
        let query = indices
            .iter()
            .map(|index| ("indices", index.to_string()))
            .collect::<Vec<_>>();

        let url = self.url(&format!("/eth/v1/beacon/blob_sidecars/{block_id}"), &query)?;
        let response = self.get(&url, self.config.format, options).await?;

        dispatch::decode(&response, None)
    }

    /// The fork at `slot` is taken from the chain spec. Since Electra nodes report committee
    /// index 0 in attestation data.
    pub async fn attestation_data<P: Preset>(
        &self,
        slot: Slot,
        committee_index: CommitteeIndex,
        options: RequestOptions,
    ) -> Result<Response<AttestationData>> {
        let url = self.url(
            "/eth/v1/validator/attestation_data",
            &[
                ("slot", slot.to_string()),
                ("committee_index", committee_index.to_string()),
            ],
        )?;

        let response = self.get_json::<AttestationData>(&url, options).await?;

        let phase = self.spec().await?.phase_at_slot::<P>(slot)?;

        validation::check_attestation_data(response.data, slot, committee_index, phase)?;

        Ok(response)
    }

    pub async fn aggregate_attestation<P: Preset>(
        &self,
        slot: Slot,
        committee_index: CommitteeIndex,
        attestation_data_root: H256,
        options: RequestOptions,
    ) -> Result<(Attestation<P>, Metadata)> {
        let url = self.url(
            "/eth/v2/validator/aggregate_attestation",
            &[
                ("attestation_data_root", format!("{attestation_data_root:?}")),
                ("slot", slot.to_string()),
                ("committee_index", committee_index.to_string()),
            ],
        )?;

        let response = self.get(&url, self.config.format, options).await?;
        let (attestation, metadata) = dispatch::decode::<Attestation<P>>(&response, None)?;

        validation::check_aggregate_attestation(
            &attestation,
            slot,
            committee_index,
            attestation_data_root,
        )?;

        Ok((attestation, metadata))
    }

    pub async fn beacon_block_header(
        &self,
        block_id: BlockId,
        options: RequestOptions,
    ) -> Result<Response<BlockHeader>> {
        let url = self.url(&format!("/eth/v1/beacon/headers/{block_id}"), &[])?;
        self.get_json(&url, options).await
    }

    pub async fn beacon_block_root(
        &self,
        block_id: BlockId,
        options: RequestOptions,
    ) -> Result<Response<BlockRoot>> {
        let url = self.url(&format!("/eth/v1/beacon/blocks/{block_id}/root"), &[])?;
        self.get_json(&url, options).await
    }

    pub async fn genesis(&self) -> Result<Arc<Genesis>> {
        self.static_values
            .genesis
            .get_or_fetch(|| self.fetch_data("/eth/v1/beacon/genesis"))
            .await
    }

    pub async fn spec(&self) -> Result<Arc<ChainSpec>> {
        self.static_values
            .spec
            .get_or_fetch(|| self.fetch_data("/eth/v1/config/spec"))
            .await
    }

    pub async fn fork_schedule(&self) -> Result<Arc<Vec<Fork>>> {
        self.static_values
            .fork_schedule
            .get_or_fetch(|| self.fetch_data("/eth/v1/config/fork_schedule"))
            .await
    }

    pub async fn node_version(&self) -> Result<Arc<NodeVersion>> {
        self.static_values
            .node_version
            .get_or_fetch(|| self.fetch_data("/eth/v1/node/version"))
            .await
    }

    pub async fn deposit_contract(&self) -> Result<Arc<DepositContract>> {
        self.static_values
            .deposit_contract
            .get_or_fetch(|| self.fetch_data("/eth/v1/config/deposit_contract"))
            .await
    }

    /// Forgets all cached static values. They are fetched again on next access.
    pub async fn invalidate_static_values(&self) {
        self.static_values.invalidate_all().await;
    }

    pub async fn submit_proposal<P: Preset>(
        &self,
        contents: &SignedBlockContents<P>,
        options: RequestOptions,
    ) -> Result<()> {
        let url = self.url("/eth/v2/beacon/blocks", &[])?;

        self.post_with_ssz_fallback(&url, contents.phase(), contents, contents.to_ssz(), options)
            .await?;

        info!("submitted {} block for slot {}", contents.phase(), contents.slot());

        Ok(())
    }

    pub async fn submit_blinded_proposal<P: Preset>(
        &self,
        block: &SignedBlindedBeaconBlock<P>,
        options: RequestOptions,
    ) -> Result<()> {
        let url = self.url("/eth/v2/beacon/blinded_blocks", &[])?;

        self.post_with_ssz_fallback(&url, block.phase(), block, block.to_ssz(), options)
            .await?;

        info!("submitted {} blinded block for slot {}", block.phase(), block.slot());

        Ok(())
    }

    pub async fn submit_attestations<P: Preset>(
        &self,
        phase: Phase,
        attestations: &PoolAttestations<P>,
        options: RequestOptions,
    ) -> Result<()> {
        attestations.check_phase(phase)?;

        let url = self.url("/eth/v2/beacon/pool/attestations", &[])?;

        debug!("submitting {} {phase} attestations to {url}", attestations.len());

        let request = self.post_request(&url, phase, options).json(attestations);

        send(&Method::POST, request).await?;

        Ok(())
    }

    /// Streams events of `topics` into `handler` on a separate task.
    ///
    /// Must be called within a Tokio runtime.
    pub fn subscribe_events<P: Preset>(
        &self,
        topics: &[Topic],
        handler: impl FnMut(Event<P>) + Send + 'static,
    ) -> Result<EventSubscription> {
        let url = events::events_url(&self.config.url, topics)?;

        Ok(events::subscribe(
            self.client.clone(),
            url,
            self.config.event_reconnect_delay,
            handler,
        ))
    }

    fn proposal_checks(
        &self,
        slot: Slot,
        randao_reveal: SignatureBytes,
        graffiti: Option<H256>,
    ) -> ProposalChecks {
        ProposalChecks {
            slot,
            randao_reveal,
            graffiti,
            connected_to_middleware: self.connected_to_middleware(),
        }
    }

    async fn check_spec_limits<P: Preset>(
        &self,
        response: &HttpResponse,
        value: &(impl SpecLimited + Sync),
    ) -> Result<()> {
        if !self.config.custom_spec_support || response.content_type != ContentType::Ssz {
            return Ok(());
        }

        let spec = self.spec().await?;

        custom_spec::check::<P>(&spec, value)?;

        Ok(())
    }

    async fn post_with_ssz_fallback(
        &self,
        url: &RedactingUrl,
        phase: Phase,
        value: &(impl Serialize + Sync),
        ssz_bytes: Vec<u8>,
        options: RequestOptions,
    ) -> Result<()> {
        let use_json = self.config.format == ApiFormat::Json
            || self
                .supports_ssz
                .load()
                .is_some_and(|supported| !supported);

        debug!("posting {phase} block to {url}, use_json: {use_json}");

        if use_json {
            let request = self.post_request(url, phase, options).json(value);
            send(&Method::POST, request).await?;
            return Ok(());
        }

        let request = self
            .post_request(url, phase, options)
            .header(CONTENT_TYPE, APPLICATION_OCTET_STREAM.as_ref())
            .body(ssz_bytes);

        match send(&Method::POST, request).await {
            Ok(_) => {
                self.supports_ssz.store(Arc::new(Some(true)));
                Ok(())
            }
            Err(error) if is_unsupported_media_type(&error) => {
                debug!("beacon node at {url} rejected SSZ request body, retrying in JSON");

                self.supports_ssz.store(Arc::new(Some(false)));

                let request = self.post_request(url, phase, options).json(value);
                send(&Method::POST, request).await?;

                Ok(())
            }
            Err(error) => Err(error),
        }
    }

    fn post_request(
        &self,
        url: &RedactingUrl,
        phase: Phase,
        options: RequestOptions,
    ) -> RequestBuilder {
        self.client
            .post(url.as_url().clone())
            .timeout(self.timeout(options))
            .header(ETH_CONSENSUS_VERSION, phase.as_ref())
    }

    async fn get(
        &self,
        url: &RedactingUrl,
        format: ApiFormat,
        options: RequestOptions,
    ) -> Result<HttpResponse> {
        let accept = accept_header(format);

        debug!("GET {url} (accept: {accept})");

        let request = self
            .client
            .get(url.as_url().clone())
            .timeout(self.timeout(options))
            .header(ACCEPT, accept);

        HttpResponse::read(send(&Method::GET, request).await?).await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &RedactingUrl,
        options: RequestOptions,
    ) -> Result<Response<T>> {
        let response = self.get(url, ApiFormat::Json, options).await?;
        envelope::decode_required(&response.body)
    }

    async fn fetch_data<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path, &[])?;
        let response = self.get_json(&url, RequestOptions::default()).await?;
        Ok(response.data)
    }

    fn timeout(&self, options: RequestOptions) -> Duration {
        options.timeout.unwrap_or(self.config.timeout)
    }

    fn url(&self, path: &str, query: &[(&str, String)]) -> Result<RedactingUrl> {
        let mut url = self.config.url.join(path)?;

        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }

        Ok(url.into())
    }
}

fn proposal_query(
    randao_reveal: SignatureBytes,
    graffiti: Option<H256>,
) -> Vec<(&'static str, String)> {
    let mut query = vec![("randao_reveal", format!("{randao_reveal:?}"))];

    if let Some(graffiti) = graffiti {
        query.push(("graffiti", format!("{graffiti:?}")));
    }

    query
}

fn is_unsupported_media_type(error: &anyhow::Error) -> bool {
    matches!(
        error.downcast_ref(),
        Some(Error::Api {
            status_code: StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ..
        }),
    )
}

async fn send(method: &Method, request: RequestBuilder) -> Result<ReqwestResponse> {
    handle_error(method, request.send().await?).await
}

/// Turns responses with non-success statuses into [`Error::Api`].
pub async fn handle_error(method: &Method, response: ReqwestResponse) -> Result<ReqwestResponse> {
    let status_code = response.status();

    if status_code.is_success() {
        return Ok(response);
    }

    let endpoint = response.url().path().to_owned();
    let body = response.bytes().await?;

    bail!(Error::Api {
        method: method.clone(),
        endpoint,
        status_code,
        body,
    })
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;
    use httpmock::{
        Method::{GET, POST},
        MockServer,
    };
    use serde_json::json;
    use ssz::Encode as _;
    use ssz_types::{BitList, BitVector};
    use tree_hash::TreeHash as _;
    use types::{
        altair::containers::{
            BeaconBlock as AltairBeaconBlock, SignedBeaconBlock as AltairSignedBeaconBlock,
        },
        combined::FullBlockContents,
        electra::containers::{
            Attestation as ElectraAttestation, BlockContents as ElectraBlockContents,
        },
        phase0::{
            containers::{
                Attestation as Phase0Attestation, SignedBeaconBlock as Phase0SignedBeaconBlock,
            },
            primitives::Epoch,
        },
        preset::Minimal,
    };

    use crate::envelope::MetadataValue;

    use super::*;

    const RANDAO_REVEAL: SignatureBytes = SignatureBytes(hex!(
        "b3baa751d0a9132cfe93e4e3d5ff9075111100e3789dca219ade5a24d27e19d16b3353149da1833e9b691bb38634e8dc04469be7032132906c927d7e1a49b414730612877bc6b2810c8f202daf793d1ab0d6b5cb21d52f9e52e883859887a5d9"
    ));

    fn api(server: &MockServer) -> Result<Api> {
        let config = Config::new(server.base_url().parse()?);
        Ok(Api::new(config, Client::new()))
    }

    fn electra_contents(
        slot: Slot,
        randao_reveal: SignatureBytes,
    ) -> ElectraBlockContents<Minimal> {
        let mut contents = ElectraBlockContents::<Minimal>::default();
        contents.block.slot = slot;
        contents.block.body.randao_reveal = randao_reveal;
        contents
    }

    fn mock_proposal(server: &MockServer, slot: Slot, contents: &ElectraBlockContents<Minimal>) {
        let body = json!({
            "version": "electra",
            "execution_payload_blinded": false,
            "execution_payload_value": "1",
            "consensus_block_value": "2",
            "data": contents,
        });

        server.mock(|when, then| {
            when.method(GET)
                .path(format!("/eth/v3/validator/blocks/{slot}"))
                .query_param("randao_reveal", format!("{RANDAO_REVEAL:?}"));
            then.status(200)
                .header("content-type", "application/json")
                .body(body.to_string());
        });
    }

    fn mock_node_version(server: &MockServer, version: &str) {
        let body = json!({ "data": { "version": version } });

        server.mock(|when, then| {
            when.method(GET).path("/eth/v1/node/version");
            then.status(200).body(body.to_string());
        });
    }

    #[tokio::test]
    async fn proposal_is_decoded_and_checked() -> Result<()> {
        let server = MockServer::start();
        let contents = electra_contents(100, RANDAO_REVEAL);

        mock_proposal(&server, 100, &contents);

        let response = api(&server)?
            .proposal::<Minimal>(100, RANDAO_REVEAL, None, RequestOptions::default())
            .await?;

        assert_eq!(
            response.proposal,
            Proposal::Full(FullBlockContents::Electra(contents)),
        );
        assert_eq!(response.metadata.version(), Some(Phase::Electra));

        Ok(())
    }

    #[tokio::test]
    async fn proposal_for_other_slot_is_rejected() -> Result<()> {
        let server = MockServer::start();

        mock_proposal(&server, 100, &electra_contents(101, RANDAO_REVEAL));

        let error = api(&server)?
            .proposal::<Minimal>(100, RANDAO_REVEAL, None, RequestOptions::default())
            .await
            .expect_err("block is for slot 101");

        assert!(error.to_string().contains("not for requested slot"));

        Ok(())
    }

    #[tokio::test]
    async fn middleware_may_replace_randao_reveal() -> Result<()> {
        let server = MockServer::start();

        mock_proposal(&server, 7, &electra_contents(7, SignatureBytes::default()));

        let api = api(&server)?;

        let error = api
            .proposal::<Minimal>(7, RANDAO_REVEAL, None, RequestOptions::default())
            .await
            .expect_err("randao reveal differs");

        assert!(matches!(
            error.downcast_ref(),
            Some(Error::RandaoRevealMismatch { .. }),
        ));

        mock_node_version(&server, "Charon/v1.2.0-dirty");

        assert!(api.detect_middleware().await?);
        assert!(api.connected_to_middleware());

        api.proposal::<Minimal>(7, RANDAO_REVEAL, None, RequestOptions::default())
            .await?;

        Ok(())
    }

    #[tokio::test]
    async fn ordinary_node_is_not_middleware() -> Result<()> {
        let server = MockServer::start();

        mock_node_version(&server, "Lighthouse/v7.0.1-e42406d/x86_64-linux");

        let api = Api::connect(
            Config::new(server.base_url().parse()?),
            Client::new(),
        )
        .await?;

        assert!(!api.connected_to_middleware());

        Ok(())
    }

    fn electra_aggregate(
        data: AttestationData,
        committee_index: usize,
    ) -> Result<ElectraAttestation<Minimal>, ssz::BitfieldError> {
        let mut committee_bits = BitVector::new();
        committee_bits.set(committee_index, true)?;

        Ok(ElectraAttestation {
            aggregation_bits: BitList::with_capacity(4)?,
            data,
            signature: SignatureBytes::default(),
            committee_bits,
        })
    }

    fn mock_aggregate_attestation(
        server: &MockServer,
        root: H256,
        attestation: &ElectraAttestation<Minimal>,
    ) {
        let body = json!({ "version": "Electra", "data": attestation });

        server.mock(|when, then| {
            when.method(GET)
                .path("/eth/v2/validator/aggregate_attestation")
                .query_param("attestation_data_root", format!("{root:?}"))
                .query_param("slot", "5")
                .query_param("committee_index", "3");
            then.status(200)
                .header("content-type", "application/json")
                .body(body.to_string());
        });
    }

    fn mock_spec_with_electra_at(server: &MockServer, electra_fork_epoch: Epoch) {
        let body = json!({
            "data": {
                "SLOTS_PER_EPOCH": "8",
                "ALTAIR_FORK_EPOCH": "0",
                "BELLATRIX_FORK_EPOCH": "0",
                "CAPELLA_FORK_EPOCH": "0",
                "DENEB_FORK_EPOCH": "0",
                "ELECTRA_FORK_EPOCH": electra_fork_epoch.to_string(),
            },
        });

        server.mock(|when, then| {
            when.method(GET).path("/eth/v1/config/spec");
            then.status(200).body(body.to_string());
        });
    }

    fn mock_attestation_data(server: &MockServer, data: AttestationData) {
        let body = json!({ "data": data });

        server.mock(|when, then| {
            when.method(GET)
                .path("/eth/v1/validator/attestation_data")
                .header("accept", "application/json");
            then.status(200).body(body.to_string());
        });
    }

    #[tokio::test]
    async fn electra_aggregate_attestation_keeps_version_as_metadata() -> Result<()> {
        let server = MockServer::start();

        let data = AttestationData {
            slot: 5,
            index: 0,
            beacon_block_root: H256::repeat_byte(0xaa),
            ..AttestationData::default()
        };

        let attestation = electra_aggregate(data, 3).map_err(|error| anyhow!("{error:?}"))?;
        let root = data.tree_hash_root();

        mock_aggregate_attestation(&server, root, &attestation);

        let (decoded, metadata) = api(&server)?
            .aggregate_attestation::<Minimal>(5, 3, root, RequestOptions::default())
            .await?;

        assert_eq!(decoded.phase(), Phase::Electra);
        assert_eq!(decoded, Attestation::Electra(attestation));
        assert_eq!(
            metadata,
            [("version".to_owned(), MetadataValue::Json(json!("Electra")))]
                .into_iter()
                .collect::<Metadata>(),
        );

        Ok(())
    }

    #[tokio::test]
    async fn electra_aggregate_attestation_for_other_committee_is_rejected() -> Result<()> {
        let server = MockServer::start();

        let data = AttestationData {
            slot: 5,
            ..AttestationData::default()
        };

        let attestation = electra_aggregate(data, 1).map_err(|error| anyhow!("{error:?}"))?;
        let root = data.tree_hash_root();

        mock_aggregate_attestation(&server, root, &attestation);

        let error = api(&server)?
            .aggregate_attestation::<Minimal>(5, 3, root, RequestOptions::default())
            .await
            .expect_err("aggregate is for committee 1");

        assert_eq!(
            error.downcast_ref(),
            Some(&Error::CommitteeBitsMismatch {
                requested: 3,
                received: vec![1],
            }),
        );

        Ok(())
    }

    #[tokio::test]
    async fn attestation_data_for_other_committee_is_rejected() -> Result<()> {
        let server = MockServer::start();

        mock_spec_with_electra_at(&server, 0);
        mock_attestation_data(
            &server,
            AttestationData {
                slot: 4,
                index: 2,
                ..AttestationData::default()
            },
        );

        let error = api(&server)?
            .attestation_data::<Minimal>(4, 1, RequestOptions::default())
            .await
            .expect_err("committee index differs");

        assert_eq!(
            error.downcast_ref(),
            Some(&Error::CommitteeIndexMismatch {
                what: "attestation data",
                requested: 1,
                received: 2,
            }),
        );

        Ok(())
    }

    // Slot 20 is in epoch 2 with 8 slots per epoch.
    async fn request_zero_index_attestation_data(electra_fork_epoch: Epoch) -> Result<()> {
        let server = MockServer::start();

        mock_spec_with_electra_at(&server, electra_fork_epoch);
        mock_attestation_data(
            &server,
            AttestationData {
                slot: 20,
                index: 0,
                ..AttestationData::default()
            },
        );

        api(&server)?
            .attestation_data::<Minimal>(20, 7, RequestOptions::default())
            .await?;

        Ok(())
    }

    #[tokio::test]
    async fn zero_committee_index_is_accepted_since_electra() -> Result<()> {
        request_zero_index_attestation_data(2).await
    }

    #[tokio::test]
    async fn zero_committee_index_is_rejected_before_electra() {
        let error = request_zero_index_attestation_data(3)
            .await
            .expect_err("data is for committee 0 in Deneb");

        assert_eq!(
            error.downcast_ref(),
            Some(&Error::CommitteeIndexMismatch {
                what: "attestation data",
                requested: 7,
                received: 0,
            }),
        );
    }

    #[tokio::test]
    async fn ssz_block_without_version_is_dated_by_slot() -> Result<()> {
        let server = MockServer::start();

        let block = AltairSignedBeaconBlock::<Minimal> {
            message: AltairBeaconBlock {
                slot: 20,
                ..AltairBeaconBlock::default()
            },
            signature: RANDAO_REVEAL,
        };

        let spec = json!({
            "data": {
                "SLOTS_PER_EPOCH": "8",
                "ALTAIR_FORK_EPOCH": "2",
                "BELLATRIX_FORK_EPOCH": "3",
            },
        });

        let spec_mock = server.mock(|when, then| {
            when.method(GET).path("/eth/v1/config/spec");
            then.status(200).body(spec.to_string());
        });

        server.mock(|when, then| {
            when.method(GET).path("/eth/v2/beacon/blocks/finalized");
            then.status(200)
                .header("content-type", "application/octet-stream")
                .body(block.as_ssz_bytes());
        });

        let (decoded, metadata) = api(&server)?
            .signed_beacon_block::<Minimal>(BlockId::Finalized, RequestOptions::default())
            .await?;

        assert_eq!(decoded, SignedBeaconBlock::Altair(block));
        assert!(metadata.is_empty());
        spec_mock.assert_hits(1);

        Ok(())
    }

    #[tokio::test]
    async fn static_values_are_fetched_again_when_stale() -> Result<()> {
        let server = MockServer::start();

        let body = json!({
            "data": {
                "genesis_time": "1606824023",
                "genesis_validators_root":
                    "0x4b363db94e286120d76eb905340fdd4e54bfe9f06bf33ff6cf5ad27f511bfe95",
                "genesis_fork_version": "0x00000000",
            },
        });

        let mock = server.mock(|when, then| {
            when.method(GET).path("/eth/v1/beacon/genesis");
            then.status(200).body(body.to_string());
        });

        let mut config = Config::new(server.base_url().parse()?);
        config.static_value_ttl = Duration::from_millis(200);

        let api = Api::new(config, Client::new());

        let first = api.genesis().await?;
        let second = api.genesis().await?;

        assert_eq!(first, second);
        mock.assert_hits(1);

        tokio::time::sleep(Duration::from_millis(300)).await;

        api.genesis().await?;
        mock.assert_hits(2);

        api.invalidate_static_values().await;
        api.genesis().await?;
        mock.assert_hits(3);

        Ok(())
    }

    #[tokio::test]
    async fn rejected_ssz_submission_is_retried_in_json() -> Result<()> {
        let server = MockServer::start();

        let ssz_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/eth/v2/beacon/blocks")
                .header("content-type", "application/octet-stream")
                .header(ETH_CONSENSUS_VERSION, "phase0");
            then.status(415);
        });

        let json_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/eth/v2/beacon/blocks")
                .header("content-type", "application/json")
                .header(ETH_CONSENSUS_VERSION, "phase0");
            then.status(200);
        });

        let api = api(&server)?;
        let contents = SignedBlockContents::Phase0(Phase0SignedBeaconBlock::<Minimal>::default());

        assert_eq!(api.supports_ssz(), None);

        api.submit_proposal(&contents, RequestOptions::default())
            .await?;

        assert_eq!(api.supports_ssz(), Some(false));
        ssz_mock.assert_hits(1);
        json_mock.assert_hits(1);

        api.submit_proposal(&contents, RequestOptions::default())
            .await?;

        ssz_mock.assert_hits(1);
        json_mock.assert_hits(2);

        Ok(())
    }

    #[tokio::test]
    async fn attestations_of_wrong_shape_are_not_sent() -> Result<()> {
        let server = MockServer::start();

        let mock = server.mock(|when, then| {
            when.method(POST).path("/eth/v2/beacon/pool/attestations");
            then.status(200);
        });

        let attestations = PoolAttestations::<Minimal>::Phase0(vec![Phase0Attestation {
            aggregation_bits: BitList::with_capacity(1).expect("capacity is in bounds"),
            data: AttestationData::default(),
            signature: SignatureBytes::default(),
        }]);

        let api = api(&server)?;

        let error = api
            .submit_attestations(Phase::Electra, &attestations, RequestOptions::default())
            .await
            .expect_err("electra requires single attestations");

        assert_eq!(
            error.downcast_ref(),
            Some(&Error::AttestationShapeMismatch {
                shape: "phase0 attestation",
                phase: Phase::Electra,
            }),
        );
        mock.assert_hits(0);

        api.submit_attestations(Phase::Deneb, &attestations, RequestOptions::default())
            .await?;

        mock.assert_hits(1);

        Ok(())
    }

    #[tokio::test]
    async fn error_status_carries_request_and_body() -> Result<()> {
        let server = MockServer::start();

        server.mock(|when, then| {
            when.method(GET).path("/eth/v1/beacon/headers/head");
            then.status(404)
                .body(r#"{"code":404,"message":"block not found"}"#);
        });

        let error = api(&server)?
            .beacon_block_header(BlockId::Head, RequestOptions::default())
            .await
            .expect_err("node responds with 404");

        assert_eq!(
            error.downcast_ref(),
            Some(&Error::Api {
                method: Method::GET,
                endpoint: "/eth/v1/beacon/headers/head".to_owned(),
                status_code: StatusCode::NOT_FOUND,
                body: r#"{"code":404,"message":"block not found"}"#.into(),
            }),
        );

        Ok(())
    }

    #[tokio::test]
    async fn short_timeout_overrides_default() -> Result<()> {
        let server = MockServer::start();

        server.mock(|when, then| {
            when.method(GET).path("/eth/v1/beacon/headers/head");
            then.status(200)
                .delay(Duration::from_millis(500))
                .body("{}");
        });

        let api = api(&server)?;

        let error = api
            .beacon_block_header(
                BlockId::Head,
                RequestOptions::with_timeout(Duration::from_millis(50)),
            )
            .await
            .expect_err("response arrives after timeout");

        assert!(
            error
                .downcast_ref::<reqwest::Error>()
                .is_some_and(reqwest::Error::is_timeout),
        );

        Ok(())
    }
}
