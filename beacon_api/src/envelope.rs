//! Decoding of the `{"data": ..., <metadata>}` envelope used by almost all JSON responses.

use std::collections::BTreeMap;

use anyhow::{Context as _, Result};
use serde::de::DeserializeOwned;
use serde_json::{value::RawValue, Value};
use types::{nonstandard::Phase, phase0::primitives::H256};

use crate::error::Error;

const DATA: &str = "data";
const DEPENDENT_ROOT: &str = "dependent_root";

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum MetadataValue {
    Root(H256),
    Json(Value),
}

/// Top level fields of a response other than `data`.
#[derive(Clone, PartialEq, Eq, Default, Debug)]
pub struct Metadata(BTreeMap<String, MetadataValue>);

impl Metadata {
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&MetadataValue> {
        self.0.get(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MetadataValue)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value))
    }

    #[must_use]
    pub fn dependent_root(&self) -> Option<H256> {
        match self.get(DEPENDENT_ROOT)? {
            MetadataValue::Root(root) => Some(*root),
            MetadataValue::Json(_) => None,
        }
    }

    #[must_use]
    pub fn execution_optimistic(&self) -> Option<bool> {
        self.json("execution_optimistic")?.as_bool()
    }

    #[must_use]
    pub fn finalized(&self) -> Option<bool> {
        self.json("finalized")?.as_bool()
    }

    #[must_use]
    pub fn version(&self) -> Option<Phase> {
        self.json("version")?.as_str()?.parse().ok()
    }

    fn json(&self, key: &str) -> Option<&Value> {
        match self.get(key)? {
            MetadataValue::Json(value) => Some(value),
            MetadataValue::Root(_) => None,
        }
    }
}

impl FromIterator<(String, MetadataValue)> for Metadata {
    fn from_iter<I: IntoIterator<Item = (String, MetadataValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Payload of an unversioned endpoint together with the rest of the envelope.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Response<T> {
    pub data: T,
    pub metadata: Metadata,
}

/// Decodes an envelope.
///
/// `data` is decoded as `T`. `dependent_root` is decoded as a root so that it stays byte-exact.
/// Every other field is kept as a generic JSON value.
///
/// A body without `data` is not an error. `None` is returned in its place and callers decide
/// whether that matters.
pub fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<(Option<T>, Metadata)> {
    let fields = serde_json::from_slice::<BTreeMap<String, Box<RawValue>>>(body)
        .map_err(anyhow::Error::from)
        .context(Error::MalformedEnvelope)?;

    let mut data = None;
    let mut metadata = BTreeMap::new();

    for (key, raw) in fields {
        match key.as_str() {
            DATA => {
                let decoded = serde_json::from_str(raw.get())
                    .map_err(anyhow::Error::from)
                    .context(Error::InvalidData)?;

                data = Some(decoded);
            }
            DEPENDENT_ROOT => {
                let root = serde_json::from_str(raw.get())
                    .map_err(anyhow::Error::from)
                    .with_context(|| Error::InvalidMetadata { key: key.clone() })?;

                metadata.insert(key, MetadataValue::Root(root));
            }
            _ => {
                let value = serde_json::from_str(raw.get())
                    .map_err(anyhow::Error::from)
                    .with_context(|| Error::InvalidMetadata { key: key.clone() })?;

                metadata.insert(key, MetadataValue::Json(value));
            }
        }
    }

    Ok((data, Metadata(metadata)))
}

/// Like [`decode`], but a missing `data` field is an error.
pub fn decode_required<T: DeserializeOwned>(body: &[u8]) -> Result<Response<T>> {
    let (data, metadata) = decode(body)?;
    let data = data.ok_or(Error::MissingData)?;
    Ok(Response { data, metadata })
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;
    use serde_json::json;
    use types::phase0::containers::Checkpoint;

    use super::*;

    #[test]
    fn data_is_decoded_and_other_fields_become_metadata() -> Result<()> {
        let body = serde_json::to_vec(&json!({
            "data": { "epoch": "5", "root": H256::repeat_byte(3) },
            "execution_optimistic": false,
            "finalized": true,
        }))?;

        let (data, metadata) = decode::<Checkpoint>(&body)?;

        assert_eq!(
            data,
            Some(Checkpoint {
                epoch: 5,
                root: H256::repeat_byte(3),
            }),
        );

        assert_eq!(
            metadata,
            [
                ("execution_optimistic".to_owned(), MetadataValue::Json(json!(false))),
                ("finalized".to_owned(), MetadataValue::Json(json!(true))),
            ]
            .into_iter()
            .collect(),
        );

        assert!(metadata.get(DATA).is_none());
        assert_eq!(metadata.execution_optimistic(), Some(false));
        assert_eq!(metadata.finalized(), Some(true));

        Ok(())
    }

    #[test]
    fn dependent_root_is_decoded_as_root() -> Result<()> {
        let root = H256::new(hex!(
            "a9e4c2a2d7b1f0c4f3a5b6e1d2c3b4a5968778695a4b3c2d1e0f1a2b3c4d5e6f"
        ));

        let body = serde_json::to_vec(&json!({
            "dependent_root": root,
            "data": [],
        }))?;

        let (_, metadata) = decode::<Vec<u64>>(&body)?;

        assert_eq!(metadata.get(DEPENDENT_ROOT), Some(&MetadataValue::Root(root)));
        assert_eq!(metadata.dependent_root(), Some(root));

        Ok(())
    }

    #[test]
    fn version_is_kept_as_metadata() -> Result<()> {
        let body = br#"{"version":"Electra","data":{"epoch":"1","root":"0x0000000000000000000000000000000000000000000000000000000000000000"}}"#;

        let (_, metadata) = decode::<Checkpoint>(body)?;

        assert_eq!(
            metadata.get("version"),
            Some(&MetadataValue::Json(json!("Electra"))),
        );
        assert_eq!(metadata.version(), Some(Phase::Electra));

        Ok(())
    }

    #[test]
    fn missing_data_is_not_an_error() -> Result<()> {
        let (data, metadata) = decode::<Checkpoint>(br#"{"finalized":false}"#)?;

        assert_eq!(data, None);
        assert_eq!(metadata.len(), 1);

        let error = decode_required::<Checkpoint>(br#"{"finalized":false}"#)
            .expect_err("data is required");

        assert_eq!(error.downcast_ref(), Some(&Error::MissingData));

        Ok(())
    }

    #[test]
    fn malformed_data_names_the_cause() {
        let error = decode::<Checkpoint>(br#"{"data":{"epoch":"five"}}"#)
            .expect_err("epoch is not a number");

        assert_eq!(error.downcast_ref(), Some(&Error::InvalidData));
        assert!(error.root_cause().to_string().contains("five") || error.chain().count() > 1);
    }

    #[test]
    fn malformed_dependent_root_names_the_key() {
        let error = decode::<Vec<u64>>(br#"{"data":[],"dependent_root":"0x1234"}"#)
            .expect_err("root is too short");

        assert_eq!(
            error.downcast_ref(),
            Some(&Error::InvalidMetadata {
                key: DEPENDENT_ROOT.to_owned(),
            }),
        );
    }

    #[test]
    fn malformed_top_level_is_an_error() {
        let error = decode::<Checkpoint>(b"[]").expect_err("envelope must be an object");
        assert_eq!(error.downcast_ref(), Some(&Error::MalformedEnvelope));
    }
}
