use bytes::Bytes;
use reqwest::{Method, StatusCode};
use thiserror::Error;
use types::{
    nonstandard::Phase,
    phase0::primitives::{CommitteeIndex, SignatureBytes, Slot, H256},
};

#[derive(Debug, Error)]
#[cfg_attr(test, derive(PartialEq, Eq))]
pub enum Error {
    #[error(
        "{method} {endpoint} failed with status {status_code}: {}",
        String::from_utf8_lossy(body)
    )]
    Api {
        method: Method,
        endpoint: String,
        status_code: StatusCode,
        body: Bytes,
    },
    #[error("unrecognised content type: {content_type:?}")]
    UnrecognisedContentType { content_type: String },
    #[error("{header} header must have exactly one value, found {count}")]
    HeaderNotSingleValued { header: &'static str, count: usize },
    #[error("invalid {header} header: {value:?}")]
    InvalidHeader { header: &'static str, value: String },
    #[error("invalid {field} field in response body")]
    InvalidBodyField { field: &'static str },
    #[error("unhandled {description} version {version}")]
    UnsupportedVersion {
        description: &'static str,
        version: String,
    },
    #[error("failed to decode {phase} {description} (blinded: {blinded})")]
    Decode {
        description: &'static str,
        phase: Phase,
        blinded: bool,
    },
    #[error("response is not a JSON object")]
    MalformedEnvelope,
    #[error("failed to decode data field of response")]
    InvalidData,
    #[error("failed to decode {key} field of response")]
    InvalidMetadata { key: String },
    #[error("response has no data field")]
    MissingData,
    #[error("{what} not for requested slot (requested: {requested}, received: {received})")]
    SlotMismatch {
        what: &'static str,
        requested: Slot,
        received: Slot,
    },
    #[error(
        "{what} does not have requested randao reveal \
         (requested: {requested:?}, received: {received:?})"
    )]
    RandaoRevealMismatch {
        what: &'static str,
        requested: SignatureBytes,
        received: SignatureBytes,
    },
    #[error("{what} does not have requested graffiti (requested: {requested}, received: {received})")]
    GraffitiMismatch {
        what: &'static str,
        requested: H256,
        received: H256,
    },
    #[error(
        "{what} not for requested committee index (requested: {requested}, received: {received})"
    )]
    CommitteeIndexMismatch {
        what: &'static str,
        requested: CommitteeIndex,
        received: CommitteeIndex,
    },
    #[error(
        "aggregate attestation does not have exactly the requested committee bit set \
         (requested: {requested}, received: {received:?})"
    )]
    CommitteeBitsMismatch {
        requested: CommitteeIndex,
        received: Vec<usize>,
    },
    #[error(
        "aggregate attestation not for requested attestation data root \
         (requested: {requested}, computed: {computed})"
    )]
    AttestationDataRootMismatch { requested: H256, computed: H256 },
    #[error("chain spec value {key} is missing or malformed")]
    SpecValue { key: String },
    #[error("chain spec allows {live} entries in {limit} but this build only supports {compiled}")]
    SpecLimitAboveCompiled {
        limit: &'static str,
        live: usize,
        compiled: usize,
    },
    #[error("block has {length} entries in {limit} but the chain spec allows {live}")]
    SpecLimitExceeded {
        limit: &'static str,
        length: usize,
        live: usize,
    },
    #[error("unrecognised event {event:?}")]
    UnknownEvent { event: String },
    #[error("failed to decode {event} event")]
    InvalidEvent { event: String },
    #[error("event stream frame exceeds {limit} bytes")]
    EventFrameTooLong { limit: usize },
    #[error("attestations in {shape} form cannot be submitted for {phase}")]
    AttestationShapeMismatch { shape: &'static str, phase: Phase },
}
