use anyhow::{Context as _, Result};
use bytes::Bytes;
use reqwest::{header::HeaderMap, Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::value::RawValue;
use tracing::debug;
use types::{nonstandard::Phase, phase0::primitives::Uint256};

use crate::{
    consensus_version,
    consts::{ETH_CONSENSUS_BLOCK_VALUE, ETH_EXECUTION_PAYLOAD_BLINDED, ETH_EXECUTION_PAYLOAD_VALUE},
    content_type::ContentType,
    error::Error,
};

/// A successful response read in full, with the headers that drive decoding already interpreted.
#[derive(Debug)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub content_type: ContentType,
    pub headers: HeaderMap,
    pub consensus_version: Option<Phase>,
    pub body: Bytes,
}

impl HttpResponse {
    pub async fn read(response: Response) -> Result<Self> {
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?;

        Self::new(status, headers, body)
    }

    pub fn new(status: StatusCode, headers: HeaderMap, body: Bytes) -> Result<Self> {
        let content_type = ContentType::from_response_headers(&headers);
        let consensus_version = consensus_version::resolve(&headers, content_type, &body)?;

        debug!(
            "received {status} response \
             (content type: {content_type}, consensus version: {consensus_version:?}, \
             length: {})",
            body.len(),
        );

        Ok(Self {
            status,
            content_type,
            headers,
            consensus_version,
            body,
        })
    }

    /// Reads the values of block production responses.
    ///
    /// Headers take priority. The body is only consulted for values missing from headers.
    /// Nodes disagree on how booleans are spelled, so they are normalized here.
    pub fn block_production_metadata(&self) -> Result<BlockProductionMetadata> {
        let from_body = if self.content_type == ContentType::Json {
            BodyFields::parse(&self.body)?
        } else {
            BodyFields::default()
        };

        let blinded = match single_header(&self.headers, ETH_EXECUTION_PAYLOAD_BLINDED)? {
            Some(value) => Some(parse_bool(ETH_EXECUTION_PAYLOAD_BLINDED, value)?),
            None => body_field::<BoolOrString>(
                from_body.execution_payload_blinded,
                "execution_payload_blinded",
            )?
            .map(|value| value.normalize("execution_payload_blinded"))
            .transpose()?,
        };

        let execution_payload_value = value_from_header_or_body(
            &self.headers,
            ETH_EXECUTION_PAYLOAD_VALUE,
            from_body.execution_payload_value,
            "execution_payload_value",
        )?;

        let consensus_block_value = value_from_header_or_body(
            &self.headers,
            ETH_CONSENSUS_BLOCK_VALUE,
            from_body.consensus_block_value,
            "consensus_block_value",
        )?;

        Ok(BlockProductionMetadata {
            blinded: blinded.unwrap_or_default(),
            execution_payload_value,
            consensus_block_value,
        })
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub struct BlockProductionMetadata {
    pub blinded: bool,
    pub execution_payload_value: Option<Uint256>,
    pub consensus_block_value: Option<Uint256>,
}

// Fields are kept raw so that a malformed one is reported by name.
#[derive(Default, Deserialize)]
struct BodyFields<'body> {
    #[serde(borrow)]
    execution_payload_blinded: Option<&'body RawValue>,
    #[serde(borrow)]
    execution_payload_value: Option<&'body RawValue>,
    #[serde(borrow)]
    consensus_block_value: Option<&'body RawValue>,
}

impl<'body> BodyFields<'body> {
    fn parse(body: &'body [u8]) -> Result<Self> {
        if !body.trim_ascii_start().starts_with(b"{") {
            return Ok(Self::default());
        }

        serde_json::from_slice(body)
            .map_err(anyhow::Error::from)
            .context(Error::MalformedEnvelope)
    }
}

fn body_field<T: DeserializeOwned>(
    raw: Option<&RawValue>,
    field: &'static str,
) -> Result<Option<T>, Error> {
    raw.map(|raw| serde_json::from_str(raw.get()))
        .transpose()
        .map_err(|_| Error::InvalidBodyField { field })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum BoolOrString {
    Bool(bool),
    String(String),
}

impl BoolOrString {
    fn normalize(self, field: &'static str) -> Result<bool, Error> {
        match self {
            Self::Bool(value) => Ok(value),
            Self::String(string) => {
                parse_bool_str(&string).ok_or(Error::InvalidBodyField { field })
            }
        }
    }
}

fn single_header<'headers>(
    headers: &'headers HeaderMap,
    header: &'static str,
) -> Result<Option<&'headers str>, Error> {
    let mut values = headers.get_all(header).iter();

    match (values.next(), values.next()) {
        (None, _) => Ok(None),
        (Some(value), None) => value
            .to_str()
            .map(|value| Some(value.trim()))
            .map_err(|_| Error::InvalidHeader {
                header,
                value: String::from_utf8_lossy(value.as_bytes()).into_owned(),
            }),
        (Some(_), Some(_)) => Err(Error::HeaderNotSingleValued {
            header,
            count: headers.get_all(header).iter().count(),
        }),
    }
}

fn parse_bool(header: &'static str, value: &str) -> Result<bool, Error> {
    parse_bool_str(value).ok_or_else(|| Error::InvalidHeader {
        header,
        value: value.to_owned(),
    })
}

fn parse_bool_str(value: &str) -> Option<bool> {
    if value.eq_ignore_ascii_case("true") {
        Some(true)
    } else if value.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

fn value_from_header_or_body(
    headers: &HeaderMap,
    header: &'static str,
    from_body: Option<&RawValue>,
    field: &'static str,
) -> Result<Option<Uint256>, Error> {
    if let Some(value) = single_header(headers, header)? {
        return Uint256::from_str_radix(value, 10)
            .map(Some)
            .map_err(|_| Error::InvalidHeader {
                header,
                value: value.to_owned(),
            });
    }

    body_field::<String>(from_body, field)?
        .map(|value| Uint256::from_str_radix(&value, 10))
        .transpose()
        .map_err(|_| Error::InvalidBodyField { field })
}
