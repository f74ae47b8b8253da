//! Serde helpers for the conventions used by the Eth Beacon Node API.
//!
//! The API represents integers as decimal strings and byte sequences as `0x`-prefixed hex.
//! Each module here is meant to be used with `#[serde(with = "...")]`.

pub mod list_of_prefixed_hex;
pub mod prefixed_hex_list;
pub mod prefixed_hex_or_bytes_array;
pub mod prefixed_hex_vector;
pub mod quoted_u256;
pub mod string_or_native;
pub mod string_or_native_sequence;

mod shared;
