//! Client of the Ethereum Beacon Node API.
//!
//! Responses are decoded from either SSZ or JSON into fork-tagged unions from [`types::combined`],
//! then checked against the request they answer.

pub use crate::{
    api::{Api, RequestOptions},
    block_id::BlockId,
    config::{
        ApiFormat, Config, DEFAULT_EVENT_RECONNECT_DELAY, DEFAULT_STATIC_VALUE_TTL,
        DEFAULT_TIMEOUT,
    },
    content_type::ContentType,
    envelope::{Metadata, MetadataValue, Response},
    error::Error,
    events::{Event, EventSubscription, Topic},
    pool::PoolAttestations,
    proposal::{Proposal, ProposalResponse},
    response::BlockProductionMetadata,
};

pub mod cache;
pub mod consensus_version;
pub mod consts;
pub mod content_type;
pub mod custom_spec;
pub mod dispatch;
pub mod envelope;
pub mod events;
pub mod proposal;
pub mod response;
pub mod responses;
pub mod validation;

mod api;
mod block_id;
mod config;
mod error;
mod pool;
