// Lists of integers such as `attesting_indices`.
// See the comment in `serde_utils::string_or_native`.

use core::{
    fmt::{Display, Formatter, Result as FmtResult},
    marker::PhantomData,
    str::FromStr,
};

use serde::{
    de::{Error, SeqAccess, Visitor},
    Deserialize, Deserializer, Serialize, Serializer,
};
use ssz_types::VariableList;
use typenum::Unsigned;

#[derive(Deserialize, Serialize)]
#[serde(bound(
    deserialize = "T: Deserialize<'de> + FromStr<Err: Display>",
    serialize = "T: Serialize + Display",
))]
struct Wrapper<T>(#[serde(with = "crate::string_or_native")] T);

pub fn deserialize<'de, T, N, D>(deserializer: D) -> Result<VariableList<T, N>, D::Error>
where
    T: Deserialize<'de> + FromStr<Err: Display>,
    N: Unsigned,
    D: Deserializer<'de>,
{
    struct SeqVisitor<T, N>(PhantomData<(T, N)>);

    impl<'de, T, N> Visitor<'de> for SeqVisitor<T, N>
    where
        T: Deserialize<'de> + FromStr<Err: Display>,
        N: Unsigned,
    {
        type Value = VariableList<T, N>;

        fn expecting(&self, formatter: &mut Formatter) -> FmtResult {
            write!(
                formatter,
                "a sequence of at most {} strings or integers",
                N::USIZE,
            )
        }

        fn visit_seq<S: SeqAccess<'de>>(self, mut seq: S) -> Result<Self::Value, S::Error> {
            let mut items = Vec::with_capacity(seq.size_hint().unwrap_or_default().min(N::USIZE));

            while let Some(Wrapper(item)) = seq.next_element()? {
                if items.len() == N::USIZE {
                    return Err(S::Error::invalid_length(items.len() + 1, &self));
                }

                items.push(item);
            }

            VariableList::new(items).map_err(|error| S::Error::custom(format!("{error:?}")))
        }
    }

    deserializer.deserialize_seq(SeqVisitor(PhantomData))
}

pub fn serialize<T, N, S>(items: &VariableList<T, N>, serializer: S) -> Result<S::Ok, S::Error>
where
    T: Serialize + Display,
    N: Unsigned,
    S: Serializer,
{
    serializer.collect_seq(items.iter().map(Wrapper))
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Result as JsonResult};
    use typenum::U4;

    use super::*;

    #[derive(PartialEq, Eq, Debug, Deserialize, Serialize)]
    #[serde(transparent)]
    struct Indices(#[serde(with = "super")] VariableList<u64, U4>);

    fn indices(values: Vec<u64>) -> Indices {
        Indices(VariableList::new(values).expect("values should fit in the list"))
    }

    #[test]
    fn serializes_to_strings() -> JsonResult<()> {
        let json = json!(["3", "4", "5"]);

        assert_eq!(serde_json::from_value::<Indices>(json.clone())?, indices(vec![3, 4, 5]));
        assert_eq!(serde_json::to_value(indices(vec![3, 4, 5]))?, json);

        Ok(())
    }

    #[test]
    fn deserialize_also_accepts_numbers() -> JsonResult<()> {
        assert_eq!(
            serde_json::from_value::<Indices>(json!([3, "4", 5]))?,
            indices(vec![3, 4, 5]),
        );

        Ok(())
    }

    #[test]
    fn rejects_sequences_longer_than_limit() {
        serde_json::from_value::<Indices>(json!(["1", "2", "3", "4", "5"]))
            .expect_err("limit is 4");
    }
}
