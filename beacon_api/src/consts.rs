//! Header names used by the Beacon Node API.
//!
//! Names are lowercase because [`reqwest::header::HeaderMap`] normalizes them that way.

pub const ETH_CONSENSUS_VERSION: &str = "eth-consensus-version";
pub const ETH_EXECUTION_PAYLOAD_BLINDED: &str = "eth-execution-payload-blinded";
pub const ETH_EXECUTION_PAYLOAD_VALUE: &str = "eth-execution-payload-value";
pub const ETH_CONSENSUS_BLOCK_VALUE: &str = "eth-consensus-block-value";

/// Substrings of node version strings reported by distributed validator middleware.
pub const MIDDLEWARE_SIGNATURES: &[&str] = &["charon", "obol"];
