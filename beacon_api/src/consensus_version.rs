//! Resolution of the fork a response belongs to.

use anyhow::{Context as _, Result};
use reqwest::header::HeaderMap;
use serde::Deserialize;
use types::nonstandard::Phase;

use crate::{consts::ETH_CONSENSUS_VERSION, content_type::ContentType, error::Error};

#[derive(Deserialize)]
struct VersionField {
    version: Option<Phase>,
}

/// Determines the fork of a response.
///
/// The `Eth-Consensus-Version` header is authoritative. The `version` field of the body is only
/// consulted when the header is absent and the body is JSON. The two are never cross-checked.
///
/// Returns `None` if neither is present. SSZ responses without the header end up here.
/// Callers may then fall back to a version obtained some other way.
pub fn resolve(
    headers: &HeaderMap,
    content_type: ContentType,
    body: &[u8],
) -> Result<Option<Phase>> {
    if let Some(phase) = from_headers(headers)? {
        return Ok(Some(phase));
    }

    if content_type != ContentType::Json {
        return Ok(None);
    }

    from_json_body(body)
}

fn from_headers(headers: &HeaderMap) -> Result<Option<Phase>, Error> {
    let values = headers.get_all(ETH_CONSENSUS_VERSION).iter().collect::<Vec<_>>();

    let value = match values.as_slice() {
        [] => return Ok(None),
        [value] => value,
        _ => {
            return Err(Error::HeaderNotSingleValued {
                header: ETH_CONSENSUS_VERSION,
                count: values.len(),
            })
        }
    };

    let invalid_header = || Error::InvalidHeader {
        header: ETH_CONSENSUS_VERSION,
        value: String::from_utf8_lossy(value.as_bytes()).into_owned(),
    };

    value
        .to_str()
        .map_err(|_| invalid_header())?
        .trim()
        .trim_matches('"')
        .parse()
        .map(Some)
        .map_err(|_| invalid_header())
}

fn from_json_body(body: &[u8]) -> Result<Option<Phase>> {
    // Bodies that are not JSON objects have no version field.
    // Whether they are valid is decided when the data is decoded.
    if !body.trim_ascii_start().starts_with(b"{") {
        return Ok(None);
    }

    let VersionField { version } = serde_json::from_slice(body)
        .map_err(anyhow::Error::from)
        .context(Error::InvalidBodyField { field: "version" })?;

    Ok(version)
}

#[cfg(test)]
mod tests {
    use reqwest::header::HeaderValue;
    use serde_json::json;
    use test_case::test_case;

    use super::*;

    fn headers(versions: &[&'static str]) -> HeaderMap {
        let mut headers = HeaderMap::new();

        for version in versions.iter().copied() {
            headers.append(ETH_CONSENSUS_VERSION, HeaderValue::from_static(version));
        }

        headers
    }

    #[test_case(&["electra"], ContentType::Json, b"{}",                      Some(Phase::Electra); "header")]
    #[test_case(&["Deneb"],   ContentType::Ssz,  b"",                        Some(Phase::Deneb);   "header is case-insensitive")]
    #[test_case(&["\"fulu\""], ContentType::Ssz, b"",                        Some(Phase::Fulu);    "header may be quoted")]
    #[test_case(&["capella"], ContentType::Json, br#"{"version":"deneb"}"#,  Some(Phase::Capella); "header wins over body")]
    #[test_case(&[],          ContentType::Json, br#"{"version":"Electra"}"#, Some(Phase::Electra); "body")]
    #[test_case(&[],          ContentType::Json, br#"{"data":{}}"#,          None;                 "body without version")]
    #[test_case(&[],          ContentType::Json, b"[1, 2]",                  None;                 "body is not an object")]
    #[test_case(&[],          ContentType::Ssz,  br#"{"version":"deneb"}"#,  None;                 "ssz body is never inspected")]
    fn resolves_version(
        versions: &[&'static str],
        content_type: ContentType,
        body: &[u8],
        expected: Option<Phase>,
    ) -> Result<()> {
        assert_eq!(resolve(&headers(versions), content_type, body)?, expected);
        Ok(())
    }

    #[test]
    fn header_with_unknown_fork_is_an_error() {
        let error = resolve(&headers(&["heze"]), ContentType::Json, b"{}")
            .expect_err("heze is not a known fork");

        assert_eq!(
            error.downcast_ref::<Error>(),
            Some(&Error::InvalidHeader {
                header: ETH_CONSENSUS_VERSION,
                value: "heze".to_owned(),
            }),
        );
    }

    #[test]
    fn header_with_multiple_values_is_an_error() {
        let error = resolve(&headers(&["deneb", "electra"]), ContentType::Ssz, b"")
            .expect_err("version header must have one value");

        assert_eq!(
            error.downcast_ref::<Error>(),
            Some(&Error::HeaderNotSingleValued {
                header: ETH_CONSENSUS_VERSION,
                count: 2,
            }),
        );
    }

    #[test]
    fn body_with_unknown_fork_is_an_error() -> serde_json::Result<()> {
        let body = serde_json::to_vec(&json!({ "version": "heze", "data": {} }))?;

        resolve(&HeaderMap::new(), ContentType::Json, &body)
            .expect_err("heze is not a known fork");

        Ok(())
    }
}
