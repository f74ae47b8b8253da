// Fixed-length byte vectors too long for arrays, such as `logs_bloom` and blobs.

use core::fmt::{Formatter, Result as FmtResult};

use serde::{
    de::{Error, Visitor},
    Deserializer, Serializer,
};
use ssz_types::FixedVector;
use typenum::Unsigned;

use crate::shared;

pub fn deserialize<'de, N: Unsigned, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<FixedVector<u8, N>, D::Error> {
    struct VectorVisitor<N>(core::marker::PhantomData<N>);

    impl<N: Unsigned> Visitor<'_> for VectorVisitor<N> {
        type Value = FixedVector<u8, N>;

        fn expecting(&self, formatter: &mut Formatter) -> FmtResult {
            write!(
                formatter,
                "{} encoding exactly {} bytes",
                shared::expecting_prefixed_hex_or_bytes(true),
                N::USIZE,
            )
        }

        fn visit_str<E: Error>(self, string: &str) -> Result<Self::Value, E> {
            let bytes = shared::decode_prefixed_hex(string)?;

            if bytes.len() != N::USIZE {
                return Err(E::invalid_length(bytes.len(), &self));
            }

            FixedVector::new(bytes).map_err(|error| E::custom(format!("{error:?}")))
        }
    }

    deserializer.deserialize_str(VectorVisitor(core::marker::PhantomData))
}

pub fn serialize<N: Unsigned, S: Serializer>(
    bytes: &FixedVector<u8, N>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&shared::encode_prefixed_hex(&bytes[..]))
}
