//! Subscription to the `/eth/v1/events` server-sent event stream.

use core::time::Duration;

use anyhow::{Context as _, Result};
use futures::StreamExt as _;
use itertools::Itertools as _;
use mime::TEXT_EVENT_STREAM;
use reqwest::{header::ACCEPT, Client, Method};
use serde::{de::DeserializeOwned, Deserialize};
use strum::{AsRefStr, Display, EnumString};
use tokio::task::AbortHandle;
use tracing::{debug, warn};
use types::{
    deneb::primitives::{BlobIndex, KzgCommitment, VersionedHash},
    electra::containers::{Attestation as ElectraAttestation, SingleAttestation},
    phase0::{
        containers::{Attestation as Phase0Attestation, SignedVoluntaryExit},
        primitives::{Epoch, Slot, H256},
    },
    preset::Preset,
    redacting_url::RedactingUrl,
};

use crate::{api::handle_error, error::Error};

const EVENTS_PATH: &str = "/eth/v1/events";
const DEFAULT_EVENT_NAME: &str = "message";
const MAX_PENDING_LENGTH: usize = 1 << 20;

#[derive(Clone, Copy, PartialEq, Eq, Debug, AsRefStr, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum Topic {
    Head,
    Block,
    FinalizedCheckpoint,
    ChainReorg,
    VoluntaryExit,
    BlobSidecar,
    Attestation,
    SingleAttestation,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Event<P: Preset> {
    Head(HeadEvent),
    Block(BlockEvent),
    FinalizedCheckpoint(FinalizedCheckpointEvent),
    ChainReorg(ChainReorgEvent),
    VoluntaryExit(SignedVoluntaryExit),
    BlobSidecar(BlobSidecarEvent),
    Attestation(AttestationEvent<P>),
    SingleAttestation(SingleAttestation),
}

impl<P: Preset> Event<P> {
    /// Decodes the data of a server-sent event named `event`.
    pub fn from_sse(event: &str, data: &str) -> Result<Self> {
        let topic = event.parse().map_err(|_| Error::UnknownEvent {
            event: event.to_owned(),
        })?;

        let decoded = match topic {
            Topic::Head => Self::Head(parse(event, data)?),
            Topic::Block => Self::Block(parse(event, data)?),
            Topic::FinalizedCheckpoint => Self::FinalizedCheckpoint(parse(event, data)?),
            Topic::ChainReorg => Self::ChainReorg(parse(event, data)?),
            Topic::VoluntaryExit => Self::VoluntaryExit(parse(event, data)?),
            Topic::BlobSidecar => Self::BlobSidecar(parse(event, data)?),
            Topic::Attestation => Self::Attestation(parse(event, data)?),
            Topic::SingleAttestation => Self::SingleAttestation(parse(event, data)?),
        };

        Ok(decoded)
    }

    #[must_use]
    pub const fn topic(&self) -> Topic {
        match self {
            Self::Head(_) => Topic::Head,
            Self::Block(_) => Topic::Block,
            Self::FinalizedCheckpoint(_) => Topic::FinalizedCheckpoint,
            Self::ChainReorg(_) => Topic::ChainReorg,
            Self::VoluntaryExit(_) => Topic::VoluntaryExit,
            Self::BlobSidecar(_) => Topic::BlobSidecar,
            Self::Attestation(_) => Topic::Attestation,
            Self::SingleAttestation(_) => Topic::SingleAttestation,
        }
    }
}

fn parse<T: DeserializeOwned>(event: &str, data: &str) -> Result<T> {
    serde_json::from_str(data).with_context(|| Error::InvalidEvent {
        event: event.to_owned(),
    })
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Deserialize)]
pub struct HeadEvent {
    #[serde(with = "serde_utils::string_or_native")]
    pub slot: Slot,
    pub block: H256,
    pub state: H256,
    pub epoch_transition: bool,
    pub previous_duty_dependent_root: H256,
    pub current_duty_dependent_root: H256,
    #[serde(default)]
    pub execution_optimistic: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Deserialize)]
pub struct BlockEvent {
    #[serde(with = "serde_utils::string_or_native")]
    pub slot: Slot,
    pub block: H256,
    #[serde(default)]
    pub execution_optimistic: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Deserialize)]
pub struct FinalizedCheckpointEvent {
    pub block: H256,
    pub state: H256,
    #[serde(with = "serde_utils::string_or_native")]
    pub epoch: Epoch,
    #[serde(default)]
    pub execution_optimistic: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Deserialize)]
pub struct ChainReorgEvent {
    #[serde(with = "serde_utils::string_or_native")]
    pub slot: Slot,
    #[serde(with = "serde_utils::string_or_native")]
    pub depth: u64,
    pub old_head_block: H256,
    pub new_head_block: H256,
    pub old_head_state: H256,
    pub new_head_state: H256,
    #[serde(with = "serde_utils::string_or_native")]
    pub epoch: Epoch,
    #[serde(default)]
    pub execution_optimistic: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Deserialize)]
pub struct BlobSidecarEvent {
    pub block_root: H256,
    #[serde(with = "serde_utils::string_or_native")]
    pub index: BlobIndex,
    #[serde(with = "serde_utils::string_or_native")]
    pub slot: Slot,
    pub kzg_commitment: KzgCommitment,
    pub versioned_hash: VersionedHash,
}

/// Attestations carry no version in events.
/// Electra attestations are recognized by `committee_bits`.
#[derive(Clone, PartialEq, Eq, Debug, Deserialize)]
#[serde(bound = "", untagged)]
pub enum AttestationEvent<P: Preset> {
    Phase0(Phase0Attestation<P>),
    Electra(ElectraAttestation<P>),
}

/// A complete server-sent event.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Frame {
    pub event: String,
    pub data: String,
}

/// Incremental parser of the `text/event-stream` format.
///
/// Only the `event` and `data` fields are interpreted. Chunks may split lines anywhere.
/// Bytes of an unfinished frame are limited so that a stream without line breaks cannot grow
/// the buffer indefinitely.
pub struct FrameParser {
    buffer: Vec<u8>,
    event: Option<String>,
    data: Vec<String>,
    max_pending_length: usize,
}

impl Default for FrameParser {
    fn default() -> Self {
        Self::with_limit(MAX_PENDING_LENGTH)
    }
}

impl FrameParser {
    #[must_use]
    pub const fn with_limit(max_pending_length: usize) -> Self {
        Self {
            buffer: vec![],
            event: None,
            data: vec![],
            max_pending_length,
        }
    }

    /// Fails if the unfinished frame grows past the limit. The parser must not be reused after
    /// that.
    pub fn push(&mut self, chunk: &[u8]) -> Result<Vec<Frame>, Error> {
        self.buffer.extend_from_slice(chunk);

        let mut frames = vec![];

        while let Some(position) = self.buffer.iter().position(|byte| *byte == b'\n') {
            let line = self.buffer.drain(..=position).collect::<Vec<_>>();
            let line = String::from_utf8_lossy(&line);

            if let Some(frame) = self.process_line(line.trim_end_matches(['\n', '\r'])) {
                frames.push(frame);
            }
        }

        let pending_length = self.buffer.len() + self.data.iter().map(String::len).sum::<usize>();

        if pending_length > self.max_pending_length {
            return Err(Error::EventFrameTooLong {
                limit: self.max_pending_length,
            });
        }

        Ok(frames)
    }

    fn process_line(&mut self, line: &str) -> Option<Frame> {
        if line.is_empty() {
            let event = self.event.take();

            if self.data.is_empty() {
                return None;
            }

            return Some(Frame {
                event: event.unwrap_or_else(|| DEFAULT_EVENT_NAME.to_owned()),
                data: core::mem::take(&mut self.data).join("\n"),
            });
        }

        // Comment, commonly used as a keepalive.
        if line.starts_with(':') {
            return None;
        }

        let (field, value) = line.split_once(':').unwrap_or((line, ""));
        let value = value.strip_prefix(' ').unwrap_or(value);

        match field {
            "event" => self.event = Some(value.to_owned()),
            "data" => self.data.push(value.to_owned()),
            _ => {}
        }

        None
    }
}

/// Handle to a running event subscription. Dropping it stops the subscription.
pub struct EventSubscription {
    abort_handle: AbortHandle,
}

impl EventSubscription {
    pub fn abort(&self) {
        self.abort_handle.abort();
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.abort_handle.is_finished()
    }
}

impl Drop for EventSubscription {
    fn drop(&mut self) {
        self.abort_handle.abort();
    }
}

pub fn events_url(base: &RedactingUrl, topics: &[Topic]) -> Result<RedactingUrl> {
    let mut url = base.join(EVENTS_PATH)?;

    url.query_pairs_mut()
        .append_pair("topics", &topics.iter().map(AsRef::as_ref).join(","));

    Ok(url.into())
}

/// Spawns a task that streams events from `url` into `handler` until aborted.
///
/// The stream is reopened after `reconnect_delay` whenever it ends or fails.
/// Events that cannot be decoded are skipped.
pub fn subscribe<P: Preset>(
    client: Client,
    url: RedactingUrl,
    reconnect_delay: Duration,
    handler: impl FnMut(Event<P>) + Send + 'static,
) -> EventSubscription {
    let task = tokio::spawn(run(client, url, reconnect_delay, handler));

    EventSubscription {
        abort_handle: task.abort_handle(),
    }
}

async fn run<P: Preset>(
    client: Client,
    url: RedactingUrl,
    reconnect_delay: Duration,
    mut handler: impl FnMut(Event<P>),
) {
    loop {
        match stream_events(&client, &url, &mut handler).await {
            Ok(()) => warn!("event stream {url} ended, reconnecting in {reconnect_delay:?}"),
            Err(error) => {
                warn!("event stream {url} failed: {error:#}, reconnecting in {reconnect_delay:?}");
            }
        }

        tokio::time::sleep(reconnect_delay).await;
    }
}

async fn stream_events<P: Preset>(
    client: &Client,
    url: &RedactingUrl,
    handler: &mut impl FnMut(Event<P>),
) -> Result<()> {
    debug!("subscribing to events at {url}");

    let response = client
        .get(url.as_url().clone())
        .header(ACCEPT, TEXT_EVENT_STREAM.as_ref())
        .send()
        .await?;

    let response = handle_error(&Method::GET, response).await?;

    let mut parser = FrameParser::default();
    let mut chunks = response.bytes_stream();

    while let Some(chunk) = chunks.next().await {
        for Frame { event, data } in parser.push(&chunk?)? {
            match Event::from_sse(&event, &data) {
                Ok(event) => handler(event),
                Err(error) => warn!("skipping event: {error:#}"),
            }
        }
    }

    Ok(())
}
