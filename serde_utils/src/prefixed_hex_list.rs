// Variable-length byte lists such as `extra_data` and transactions.

use core::fmt::{Formatter, Result as FmtResult};

use serde::{
    de::{Error, Visitor},
    Deserializer, Serializer,
};
use ssz_types::VariableList;
use typenum::Unsigned;

use crate::shared;

pub fn deserialize<'de, N: Unsigned, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<VariableList<u8, N>, D::Error> {
    deserializer.deserialize_str(ListVisitor(core::marker::PhantomData))
}

pub fn serialize<N: Unsigned, S: Serializer>(
    bytes: &VariableList<u8, N>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&shared::encode_prefixed_hex(&bytes[..]))
}

pub(crate) struct ListVisitor<N>(pub(crate) core::marker::PhantomData<N>);

impl<N: Unsigned> Visitor<'_> for ListVisitor<N> {
    type Value = VariableList<u8, N>;

    fn expecting(&self, formatter: &mut Formatter) -> FmtResult {
        write!(
            formatter,
            "{} encoding at most {} bytes",
            shared::expecting_prefixed_hex_or_bytes(true),
            N::USIZE,
        )
    }

    fn visit_str<E: Error>(self, string: &str) -> Result<Self::Value, E> {
        let bytes = shared::decode_prefixed_hex(string)?;

        if bytes.len() > N::USIZE {
            return Err(E::invalid_length(bytes.len(), &self));
        }

        VariableList::new(bytes).map_err(|error| E::custom(format!("{error:?}")))
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};
    use serde_json::{json, Result as JsonResult};
    use typenum::U4;

    use super::*;

    #[derive(PartialEq, Eq, Debug, Deserialize, Serialize)]
    #[serde(transparent)]
    struct ExtraData(#[serde(with = "super")] VariableList<u8, U4>);

    #[test]
    fn empty_list_is_bare_prefix() -> JsonResult<()> {
        let empty = serde_json::from_value::<ExtraData>(json!("0x"))?;

        assert!(empty.0.is_empty());
        assert_eq!(serde_json::to_value(empty)?, json!("0x"));

        Ok(())
    }

    #[test]
    fn round_trips_bytes() -> JsonResult<()> {
        let json = json!("0xdeadbeef");
        let extra_data = serde_json::from_value::<ExtraData>(json.clone())?;

        assert_eq!(extra_data.0[..], [0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(serde_json::to_value(extra_data)?, json);

        Ok(())
    }

    #[test]
    fn rejects_lists_longer_than_limit() {
        serde_json::from_value::<ExtraData>(json!("0x0102030405")).expect_err("limit is 4");
    }
}
