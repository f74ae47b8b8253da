// Lists of byte lists. Used for execution payload transactions.

use core::{
    fmt::{Formatter, Result as FmtResult},
    marker::PhantomData,
};

use serde::{
    de::{DeserializeSeed, Error, SeqAccess, Visitor},
    ser::SerializeSeq as _,
    Deserializer, Serializer,
};
use ssz_types::VariableList;
use typenum::Unsigned;

use crate::{prefixed_hex_list::ListVisitor, shared};

pub fn deserialize<'de, M, N, D>(
    deserializer: D,
) -> Result<VariableList<VariableList<u8, M>, N>, D::Error>
where
    M: Unsigned,
    N: Unsigned,
    D: Deserializer<'de>,
{
    struct Inner<M>(PhantomData<M>);

    impl<'de, M: Unsigned> DeserializeSeed<'de> for Inner<M> {
        type Value = VariableList<u8, M>;

        fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
            deserializer.deserialize_str(ListVisitor(PhantomData))
        }
    }

    struct OuterVisitor<M, N>(PhantomData<(M, N)>);

    impl<'de, M: Unsigned, N: Unsigned> Visitor<'de> for OuterVisitor<M, N> {
        type Value = VariableList<VariableList<u8, M>, N>;

        fn expecting(&self, formatter: &mut Formatter) -> FmtResult {
            write!(formatter, "a sequence of at most {} hex strings", N::USIZE)
        }

        fn visit_seq<S: SeqAccess<'de>>(self, mut seq: S) -> Result<Self::Value, S::Error> {
            let mut lists = vec![];

            while let Some(list) = seq.next_element_seed(Inner(PhantomData))? {
                if lists.len() == N::USIZE {
                    return Err(S::Error::invalid_length(lists.len() + 1, &self));
                }

                lists.push(list);
            }

            VariableList::new(lists).map_err(|error| S::Error::custom(format!("{error:?}")))
        }
    }

    deserializer.deserialize_seq(OuterVisitor(PhantomData))
}

pub fn serialize<M, N, S>(
    lists: &VariableList<VariableList<u8, M>, N>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    M: Unsigned,
    N: Unsigned,
    S: Serializer,
{
    let mut seq = serializer.serialize_seq(Some(lists.len()))?;

    for list in lists.iter() {
        seq.serialize_element(&shared::encode_prefixed_hex(&list[..]))?;
    }

    seq.end()
}
