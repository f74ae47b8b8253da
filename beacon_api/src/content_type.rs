//! Negotiation of the wire format of request and response bodies.

use core::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use anyhow::Result;
use mime::{APPLICATION_JSON, APPLICATION_OCTET_STREAM};
use reqwest::header::{HeaderMap, CONTENT_TYPE};
use serde_with::{DeserializeFromStr, SerializeDisplay};
use tracing::warn;

use crate::{config::ApiFormat, error::Error};

#[derive(Clone, Copy, PartialEq, Eq, Default, Debug, DeserializeFromStr, SerializeDisplay)]
pub enum ContentType {
    #[default]
    Unknown,
    Ssz,
    Json,
}

impl Display for ContentType {
    fn fmt(&self, formatter: &mut Formatter) -> FmtResult {
        formatter.write_str(self.media_type())
    }
}

impl FromStr for ContentType {
    type Err = Error;

    fn from_str(string: &str) -> Result<Self, Self::Err> {
        Self::parse_from_media_type(string)
    }
}

impl ContentType {
    /// Parses the media type of a `Content-Type` or `Accept` header value.
    ///
    /// Parameters such as `charset` are ignored.
    pub fn parse_from_media_type(media_type: &str) -> Result<Self, Error> {
        let essence = media_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        if essence == APPLICATION_OCTET_STREAM.essence_str() {
            return Ok(Self::Ssz);
        }

        if essence == APPLICATION_JSON.essence_str() {
            return Ok(Self::Json);
        }

        Err(Error::UnrecognisedContentType {
            content_type: media_type.to_owned(),
        })
    }

    /// `Unknown` maps to `"unknown"`, which must not be sent on the wire.
    #[must_use]
    pub const fn media_type(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Ssz => "application/octet-stream",
            Self::Json => "application/json",
        }
    }

    /// Determines the format of a response body.
    ///
    /// Not every beacon node sets `Content-Type` correctly.
    /// Bodies with a missing, repeated or unrecognised `Content-Type` are treated as JSON.
    #[must_use]
    pub fn from_response_headers(headers: &HeaderMap) -> Self {
        let mut values = headers.get_all(CONTENT_TYPE).iter();

        let (Some(value), None) = (values.next(), values.next()) else {
            warn!(
                "response has {} Content-Type headers, assuming JSON",
                headers.get_all(CONTENT_TYPE).iter().count(),
            );

            return Self::Json;
        };

        let parsed = value
            .to_str()
            .map_err(anyhow::Error::from)
            .and_then(|value| Ok(Self::parse_from_media_type(value)?));

        match parsed {
            Ok(content_type) => content_type,
            Err(error) => {
                warn!("{error:#}, assuming JSON");
                Self::Json
            }
        }
    }
}

/// Value of the `Accept` header for endpoints that can respond with either format.
#[must_use]
pub fn accept_header(format: ApiFormat) -> String {
    match format {
        ApiFormat::Ssz => format!("{APPLICATION_OCTET_STREAM};q=1,{APPLICATION_JSON};q=0.9"),
        ApiFormat::Json => APPLICATION_JSON.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use reqwest::header::HeaderValue;
    use serde_json::json;
    use test_case::test_case;

    use super::*;

    #[test_case("application/octet-stream",                ContentType::Ssz)]
    #[test_case("application/json",                        ContentType::Json)]
    #[test_case("application/json; charset=utf-8",         ContentType::Json)]
    #[test_case("Application/JSON",                        ContentType::Json)]
    #[test_case(" application/octet-stream ; q=1",         ContentType::Ssz)]
    fn parse_from_media_type_accepts_known_types(media_type: &str, expected: ContentType) {
        assert_eq!(ContentType::parse_from_media_type(media_type), Ok(expected));
    }

    #[test_case("")]
    #[test_case("text/plain")]
    #[test_case("unknown")]
    #[test_case("application/jsonx")]
    fn parse_from_media_type_rejects_other_types(media_type: &str) {
        assert_eq!(
            ContentType::parse_from_media_type(media_type),
            Err(Error::UnrecognisedContentType {
                content_type: media_type.to_owned(),
            }),
        );
    }

    #[test_case(ContentType::Unknown, "unknown")]
    #[test_case(ContentType::Ssz,     "application/octet-stream")]
    #[test_case(ContentType::Json,    "application/json")]
    fn media_type_is_inverse_of_parsing(content_type: ContentType, media_type: &str) {
        assert_eq!(content_type.media_type(), media_type);
        assert_eq!(content_type.to_string(), media_type);
    }

    #[test]
    fn content_type_serializes_to_quoted_string() -> serde_json::Result<()> {
        assert_eq!(
            serde_json::to_value(ContentType::Ssz)?,
            json!("application/octet-stream"),
        );
        assert_eq!(
            serde_json::from_value::<ContentType>(json!("application/json"))?,
            ContentType::Json,
        );
        Ok(())
    }

    #[test_case(&[],                                            ContentType::Json; "missing")]
    #[test_case(&["application/octet-stream"],                  ContentType::Ssz;  "ssz")]
    #[test_case(&["application/json"],                          ContentType::Json; "json")]
    #[test_case(&["text/html"],                                 ContentType::Json; "unrecognised")]
    #[test_case(&["application/octet-stream", "application/json"], ContentType::Json; "repeated")]
    fn response_content_type_falls_back_to_json(values: &[&'static str], expected: ContentType) {
        let mut headers = HeaderMap::new();

        for value in values.iter().copied() {
            headers.append(CONTENT_TYPE, HeaderValue::from_static(value));
        }

        assert_eq!(ContentType::from_response_headers(&headers), expected);
    }

    #[test_case(ApiFormat::Ssz,  "application/octet-stream;q=1,application/json;q=0.9")]
    #[test_case(ApiFormat::Json, "application/json")]
    fn accept_header_prefers_configured_format(format: ApiFormat, expected: &str) {
        assert_eq!(accept_header(format), expected);
    }
}
