// `base_fee_per_gas` and block values are decimal strings in the Beacon Node API.
// `alloy_primitives::U256` uses hex by default, so its serde impls cannot be used directly.

use alloy_primitives::U256;
use serde::{de::Error as _, Deserialize as _, Deserializer, Serializer};

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<U256, D::Error> {
    let string = String::deserialize(deserializer)?;
    U256::from_str_radix(&string, 10).map_err(D::Error::custom)
}

pub fn serialize<S: Serializer>(value: &U256, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}
