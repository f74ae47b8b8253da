use anyhow::Result;
use derive_more::From;
use types::{
    combined::{BlindedBeaconBlock, FullBlockContents},
    nonstandard::Phase,
    phase0::primitives::Slot,
    preset::Preset,
    traits::BeaconBlock,
};

use crate::{
    dispatch,
    envelope::Metadata,
    response::{BlockProductionMetadata, HttpResponse},
};

/// Block produced by a beacon node, either with the full execution payload or blinded.
#[derive(Clone, PartialEq, Eq, Debug, From)]
pub enum Proposal<P: Preset> {
    Full(FullBlockContents<P>),
    Blinded(BlindedBeaconBlock<P>),
}

impl<P: Preset> Proposal<P> {
    #[must_use]
    pub const fn phase(&self) -> Phase {
        match self {
            Self::Full(contents) => contents.phase(),
            Self::Blinded(block) => block.phase(),
        }
    }

    #[must_use]
    pub const fn is_blinded(&self) -> bool {
        matches!(self, Self::Blinded(_))
    }

    #[must_use]
    pub fn block(&self) -> &dyn BeaconBlock<P> {
        match self {
            Self::Full(contents) => contents.block(),
            Self::Blinded(block) => block.block(),
        }
    }

    #[must_use]
    pub fn slot(&self) -> Slot {
        self.block().slot()
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ProposalResponse<P: Preset> {
    pub proposal: Proposal<P>,
    pub values: BlockProductionMetadata,
    pub metadata: Metadata,
}

/// Decodes a response of the block production endpoint that may return either kind of block.
///
/// Full and blinded blocks of the same fork are different types, so blindedness is determined
/// before the fork.
pub fn decode<P: Preset>(response: &HttpResponse) -> Result<ProposalResponse<P>> {
    let values = response.block_production_metadata()?;

    let (proposal, metadata) = if values.blinded {
        let (block, metadata) = dispatch::decode::<BlindedBeaconBlock<P>>(response, None)?;
        (block.into(), metadata)
    } else {
        let (contents, metadata) = dispatch::decode::<FullBlockContents<P>>(response, None)?;
        (contents.into(), metadata)
    };

    Ok(ProposalResponse {
        proposal,
        values,
        metadata,
    })
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use reqwest::{
        header::{HeaderMap, HeaderValue},
        StatusCode,
    };
    use serde_json::json;
    use ssz::Encode as _;
    use types::{
        capella::containers::{
            BeaconBlock as CapellaBeaconBlock, BlindedBeaconBlock as CapellaBlindedBeaconBlock,
        },
        electra::containers::BlockContents as ElectraBlockContents,
        phase0::primitives::Uint256,
        preset::Minimal,
    };

    use crate::{
        consts::{ETH_CONSENSUS_VERSION, ETH_EXECUTION_PAYLOAD_BLINDED},
        error::Error,
    };

    use super::*;

    fn response(
        headers: &[(&'static str, &'static str)],
        body: impl Into<Bytes>,
    ) -> Result<HttpResponse> {
        let mut header_map = HeaderMap::new();

        for (name, value) in headers.iter().copied() {
            header_map.append(name, HeaderValue::from_static(value));
        }

        HttpResponse::new(StatusCode::OK, header_map, body.into())
    }

    #[test]
    fn blinded_header_selects_blinded_block() -> Result<()> {
        let mut block = CapellaBlindedBeaconBlock::<Minimal>::default();
        block.slot = 3;

        let response = response(
            &[
                ("content-type", "application/octet-stream"),
                (ETH_CONSENSUS_VERSION, "capella"),
                (ETH_EXECUTION_PAYLOAD_BLINDED, "True"),
            ],
            block.as_ssz_bytes(),
        )?;

        let decoded = decode::<Minimal>(&response)?;

        assert!(decoded.proposal.is_blinded());
        assert_eq!(decoded.proposal.phase(), Phase::Capella);
        assert_eq!(decoded.proposal.slot(), 3);
        assert_eq!(
            decoded.proposal,
            Proposal::Blinded(BlindedBeaconBlock::Capella(block)),
        );

        Ok(())
    }

    #[test]
    fn blinded_body_field_selects_blinded_block() -> Result<()> {
        let block = CapellaBlindedBeaconBlock::<Minimal>::default();

        let body = serde_json::to_vec(&json!({
            "version": "capella",
            "execution_payload_blinded": true,
            "execution_payload_value": "100",
            "consensus_block_value": "5",
            "data": block,
        }))?;

        let decoded = decode::<Minimal>(&response(&[], body)?)?;

        assert_eq!(
            decoded.proposal,
            Proposal::Blinded(BlindedBeaconBlock::Capella(block)),
        );
        assert_eq!(decoded.values.execution_payload_value, Some(Uint256::from(100_u64)));
        assert_eq!(decoded.metadata.version(), Some(Phase::Capella));

        Ok(())
    }

    #[test]
    fn missing_blinded_flag_means_full_block() -> Result<()> {
        let contents = ElectraBlockContents::<Minimal>::default();

        let body = serde_json::to_vec(&json!({ "version": "electra", "data": contents }))?;
        let decoded = decode::<Minimal>(&response(&[], body)?)?;

        assert!(!decoded.proposal.is_blinded());
        assert_eq!(
            decoded.proposal,
            Proposal::Full(FullBlockContents::Electra(contents)),
        );

        Ok(())
    }

    #[test]
    fn full_block_decoded_as_blinded_fails_with_context() -> Result<()> {
        let block = CapellaBeaconBlock::<Minimal>::default();

        let body = serde_json::to_vec(&json!({
            "version": "capella",
            "execution_payload_blinded": "true",
            "data": block,
        }))?;

        let error = decode::<Minimal>(&response(&[], body)?)
            .expect_err("a full block does not decode as a blinded one");

        assert_eq!(
            error.downcast_ref(),
            Some(&Error::Decode {
                description: "block proposal",
                phase: Phase::Capella,
                blinded: true,
            }),
        );

        Ok(())
    }
}
