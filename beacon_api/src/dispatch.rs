//! Selection of the concrete type a versioned response decodes into.
//!
//! Every multi-fork endpoint decodes in two steps. The content type decides between SSZ and the
//! JSON envelope. The consensus version then decides which container the payload is decoded as.

use anyhow::{anyhow, Context as _, Result};
use serde::de::DeserializeOwned;
use serde_json::value::RawValue;
use tracing::debug;
use types::{
    combined::{
        Attestation, BlindedBeaconBlock, BlobSidecars, FullBlockContents, SignedBeaconBlock,
        SignedExecutionPayloadEnvelope,
    },
    nonstandard::Phase,
    preset::Preset,
};

use crate::{
    content_type::ContentType,
    envelope::{self, Metadata},
    error::Error,
    response::HttpResponse,
};

/// Undecoded payload of a response in one of the two wire formats.
#[derive(Clone, Copy, Debug)]
pub enum Payload<'body> {
    Ssz(&'body [u8]),
    Json(&'body RawValue),
}

impl Payload<'_> {
    pub fn decode<T: ssz::Decode + DeserializeOwned>(self) -> Result<T> {
        match self {
            Self::Ssz(bytes) => T::from_ssz_bytes(bytes).map_err(|error| anyhow!("{error:?}")),
            Self::Json(raw) => serde_json::from_str(raw.get()).map_err(Into::into),
        }
    }
}

/// A fork-tagged union that can be decoded once its fork is known.
pub trait VersionedDecode: Sized {
    const DESCRIPTION: &'static str;
    const BLINDED: bool = false;

    /// Returns `None` if the union has no variant for `phase`.
    fn decode_at(phase: Phase, payload: Payload) -> Option<Result<Self>>;
}

/// Decodes a versioned response.
///
/// The consensus version of the response takes priority over `fallback`.
/// Responses without either are rejected.
pub fn decode<T: VersionedDecode>(
    response: &HttpResponse,
    fallback: Option<Phase>,
) -> Result<(T, Metadata)> {
    let phase = response
        .consensus_version
        .or(fallback)
        .ok_or(Error::UnsupportedVersion {
            description: T::DESCRIPTION,
            version: "unknown".to_owned(),
        })?;

    debug!(
        "decoding {} as {phase} {} (content type: {})",
        T::DESCRIPTION,
        if T::BLINDED { "blinded" } else { "full" },
        response.content_type,
    );

    match response.content_type {
        ContentType::Ssz => {
            let value = decode_payload(phase, Payload::Ssz(&response.body))?;
            Ok((value, Metadata::default()))
        }
        ContentType::Json | ContentType::Unknown => {
            let (data, metadata) = envelope::decode::<Box<RawValue>>(&response.body)?;
            let data = data.ok_or(Error::MissingData)?;
            let value = decode_payload(phase, Payload::Json(&data))?;
            Ok((value, metadata))
        }
    }
}

pub fn decode_payload<T: VersionedDecode>(phase: Phase, payload: Payload) -> Result<T> {
    T::decode_at(phase, payload)
        .ok_or_else(|| Error::UnsupportedVersion {
            description: T::DESCRIPTION,
            version: phase.to_string(),
        })?
        .context(Error::Decode {
            description: T::DESCRIPTION,
            phase,
            blinded: T::BLINDED,
        })
}

impl<P: Preset> VersionedDecode for SignedBeaconBlock<P> {
    const DESCRIPTION: &'static str = "signed beacon block";

    fn decode_at(phase: Phase, payload: Payload) -> Option<Result<Self>> {
        let decoded = match phase {
            Phase::Phase0 => payload.decode().map(Self::Phase0),
            Phase::Altair => payload.decode().map(Self::Altair),
            Phase::Bellatrix => payload.decode().map(Self::Bellatrix),
            Phase::Capella => payload.decode().map(Self::Capella),
            Phase::Deneb => payload.decode().map(Self::Deneb),
            Phase::Electra => payload.decode().map(Self::Electra),
            Phase::Fulu => payload.decode().map(Self::Fulu),
            Phase::Gloas => payload.decode().map(Self::Gloas),
        };

        Some(decoded)
    }
}

impl<P: Preset> VersionedDecode for FullBlockContents<P> {
    const DESCRIPTION: &'static str = "block proposal";

    fn decode_at(phase: Phase, payload: Payload) -> Option<Result<Self>> {
        let decoded = match phase {
            Phase::Phase0 => payload.decode().map(Self::Phase0),
            Phase::Altair => payload.decode().map(Self::Altair),
            Phase::Bellatrix => payload.decode().map(Self::Bellatrix),
            Phase::Capella => payload.decode().map(Self::Capella),
            Phase::Deneb => payload.decode().map(Self::Deneb),
            Phase::Electra => payload.decode().map(Self::Electra),
            Phase::Fulu => payload.decode().map(Self::Fulu),
            Phase::Gloas => payload.decode().map(Self::Gloas),
        };

        Some(decoded)
    }
}

impl<P: Preset> VersionedDecode for BlindedBeaconBlock<P> {
    const DESCRIPTION: &'static str = "block proposal";
    const BLINDED: bool = true;

    fn decode_at(phase: Phase, payload: Payload) -> Option<Result<Self>> {
        let decoded = match phase {
            Phase::Phase0 | Phase::Altair | Phase::Gloas => return None,
            Phase::Bellatrix => payload.decode().map(Self::Bellatrix),
            Phase::Capella => payload.decode().map(Self::Capella),
            Phase::Deneb => payload.decode().map(Self::Deneb),
            Phase::Electra => payload.decode().map(Self::Electra),
            Phase::Fulu => payload.decode().map(Self::Fulu),
        };

        Some(decoded)
    }
}

impl<P: Preset> VersionedDecode for SignedExecutionPayloadEnvelope<P> {
    const DESCRIPTION: &'static str = "execution payload envelope";

    fn decode_at(phase: Phase, payload: Payload) -> Option<Result<Self>> {
        match phase {
            Phase::Gloas => Some(payload.decode().map(Self::Gloas)),
            _ => None,
        }
    }
}

impl<P: Preset> VersionedDecode for BlobSidecars<P> {
    const DESCRIPTION: &'static str = "blob sidecars";

    fn decode_at(phase: Phase, payload: Payload) -> Option<Result<Self>> {
        let decoded = match phase {
            Phase::Deneb => payload.decode().map(Self::Deneb),
            Phase::Electra => payload.decode().map(Self::Electra),
            Phase::Fulu => payload.decode().map(Self::Fulu),
            _ => return None,
        };

        Some(decoded)
    }
}

impl<P: Preset> VersionedDecode for Attestation<P> {
    const DESCRIPTION: &'static str = "aggregate attestation";

    fn decode_at(phase: Phase, payload: Payload) -> Option<Result<Self>> {
        let decoded = match phase {
            Phase::Phase0 => payload.decode().map(Self::Phase0),
            Phase::Altair => payload.decode().map(Self::Altair),
            Phase::Bellatrix => payload.decode().map(Self::Bellatrix),
            Phase::Capella => payload.decode().map(Self::Capella),
            Phase::Deneb => payload.decode().map(Self::Deneb),
            Phase::Electra => payload.decode().map(Self::Electra),
            Phase::Fulu => payload.decode().map(Self::Fulu),
            Phase::Gloas => payload.decode().map(Self::Gloas),
        };

        Some(decoded)
    }
}
