// The Beacon Node API represents integers as strings.
// Some nodes send native JSON numbers anyway, so both forms are accepted when deserializing.
// Serialization always produces strings in human-readable formats.

use core::{
    fmt::{Display, Formatter, Result as FmtResult},
    marker::PhantomData,
    str::FromStr,
};

use serde::{
    de::{Error, IntoDeserializer as _, Visitor},
    Deserialize, Deserializer, Serialize, Serializer,
};

pub fn deserialize<'de, T, D>(deserializer: D) -> Result<T, D::Error>
where
    T: Deserialize<'de> + FromStr<Err: Display>,
    D: Deserializer<'de>,
{
    struct AnyVisitor<T>(PhantomData<T>);

    impl<'de, T: Deserialize<'de> + FromStr<Err: Display>> Visitor<'de> for AnyVisitor<T> {
        type Value = T;

        fn expecting(&self, formatter: &mut Formatter) -> FmtResult {
            formatter.write_str("a string or integer")
        }

        fn visit_str<E: Error>(self, string: &str) -> Result<Self::Value, E> {
            string.parse().map_err(E::custom)
        }

        fn visit_u64<E: Error>(self, value: u64) -> Result<Self::Value, E> {
            T::deserialize(value.into_deserializer())
        }
    }

    if deserializer.is_human_readable() {
        deserializer.deserialize_any(AnyVisitor(PhantomData))
    } else {
        T::deserialize(deserializer)
    }
}

pub fn serialize<S: Serializer>(
    value: impl Serialize + Display,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    if serializer.is_human_readable() {
        serializer.collect_str(&value)
    } else {
        value.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Result as JsonResult};
    use test_case::test_case;

    use super::*;

    #[derive(PartialEq, Eq, Debug, Deserialize, Serialize)]
    #[serde(transparent)]
    struct Slot(#[serde(with = "super")] u64);

    #[test_case(json!("12345"); "quoted")]
    #[test_case(json!(12345);   "native")]
    fn deserializes_quoted_and_native_integers(json: serde_json::Value) -> JsonResult<()> {
        assert_eq!(serde_json::from_value::<Slot>(json)?, Slot(12345));
        Ok(())
    }

    #[test]
    fn serializes_to_string() -> JsonResult<()> {
        assert_eq!(serde_json::to_value(Slot(7))?, json!("7"));
        Ok(())
    }

    #[test]
    fn rejects_non_numeric_strings() {
        serde_json::from_value::<Slot>(json!("head")).expect_err("head is not a number");
    }
}
