//! Fork-tagged unions of containers.
//!
//! Every variant is named after the fork it belongs to, so the tag of a decoded value always agrees
//! with the consensus version it was decoded for. Types that did not change in a fork still get a
//! variant for it. None of the unions implement `Deserialize` because the JSON representations of
//! different forks overlap. Decoding goes through the consensus version instead.

use serde::Serialize;
use ssz::Encode as _;
use ssz_types::VariableList;

use crate::{
    altair::containers::{
        BeaconBlock as AltairBeaconBlock, SignedBeaconBlock as AltairSignedBeaconBlock,
    },
    bellatrix::containers::{
        BeaconBlock as BellatrixBeaconBlock, BlindedBeaconBlock as BellatrixBlindedBeaconBlock,
        SignedBeaconBlock as BellatrixSignedBeaconBlock,
        SignedBlindedBeaconBlock as BellatrixSignedBlindedBeaconBlock,
    },
    capella::containers::{
        BeaconBlock as CapellaBeaconBlock, BlindedBeaconBlock as CapellaBlindedBeaconBlock,
        SignedBeaconBlock as CapellaSignedBeaconBlock,
        SignedBlindedBeaconBlock as CapellaSignedBlindedBeaconBlock,
    },
    deneb::containers::{
        BlindedBeaconBlock as DenebBlindedBeaconBlock, BlobSidecar,
        BlockContents as DenebBlockContents, SignedBeaconBlock as DenebSignedBeaconBlock,
        SignedBlindedBeaconBlock as DenebSignedBlindedBeaconBlock,
        SignedBlockContents as DenebSignedBlockContents,
    },
    electra::containers::{
        Attestation as ElectraAttestation, BlindedBeaconBlock as ElectraBlindedBeaconBlock,
        BlockContents as ElectraBlockContents, SignedBeaconBlock as ElectraSignedBeaconBlock,
        SignedBlindedBeaconBlock as ElectraSignedBlindedBeaconBlock,
        SignedBlockContents as ElectraSignedBlockContents,
    },
    fulu::containers::{
        BlindedBeaconBlock as FuluBlindedBeaconBlock, BlockContents as FuluBlockContents,
        SignedBeaconBlock as FuluSignedBeaconBlock,
        SignedBlindedBeaconBlock as FuluSignedBlindedBeaconBlock,
        SignedBlockContents as FuluSignedBlockContents,
    },
    gloas::containers::{
        BeaconBlock as GloasBeaconBlock, SignedBeaconBlock as GloasSignedBeaconBlock,
        SignedExecutionPayloadEnvelope as GloasSignedExecutionPayloadEnvelope,
    },
    nonstandard::Phase,
    phase0::{
        containers::{
            Attestation as Phase0Attestation, AttestationData, BeaconBlock as Phase0BeaconBlock,
            SignedBeaconBlock as Phase0SignedBeaconBlock,
        },
        primitives::{SignatureBytes, Slot},
    },
    preset::Preset,
    traits::{BeaconBlock as BeaconBlockTrait, SignedBeaconBlock as SignedBeaconBlockTrait},
};

pub type BlobSidecarList<P> =
    VariableList<BlobSidecar<P>, <P as Preset>::MaxBlobCommitmentsPerBlock>;

#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
#[serde(bound = "", untagged)]
pub enum SignedBeaconBlock<P: Preset> {
    Phase0(Phase0SignedBeaconBlock<P>),
    Altair(AltairSignedBeaconBlock<P>),
    Bellatrix(BellatrixSignedBeaconBlock<P>),
    Capella(CapellaSignedBeaconBlock<P>),
    Deneb(DenebSignedBeaconBlock<P>),
    Electra(ElectraSignedBeaconBlock<P>),
    Fulu(FuluSignedBeaconBlock<P>),
    Gloas(GloasSignedBeaconBlock<P>),
}

impl<P: Preset> SignedBeaconBlock<P> {
    #[must_use]
    pub const fn phase(&self) -> Phase {
        match self {
            Self::Phase0(_) => Phase::Phase0,
            Self::Altair(_) => Phase::Altair,
            Self::Bellatrix(_) => Phase::Bellatrix,
            Self::Capella(_) => Phase::Capella,
            Self::Deneb(_) => Phase::Deneb,
            Self::Electra(_) => Phase::Electra,
            Self::Fulu(_) => Phase::Fulu,
            Self::Gloas(_) => Phase::Gloas,
        }
    }

    #[must_use]
    pub fn as_signed_block(&self) -> &dyn SignedBeaconBlockTrait<P> {
        match self {
            Self::Phase0(block) => block,
            Self::Altair(block) => block,
            Self::Bellatrix(block) => block,
            Self::Capella(block) => block,
            Self::Deneb(block) => block,
            Self::Electra(block) | Self::Fulu(block) => block,
            Self::Gloas(block) => block,
        }
    }

    #[must_use]
    pub fn message(&self) -> &dyn BeaconBlockTrait<P> {
        self.as_signed_block().message()
    }

    #[must_use]
    pub fn signature(&self) -> SignatureBytes {
        self.as_signed_block().signature()
    }

    #[must_use]
    pub fn to_ssz(&self) -> Vec<u8> {
        match self {
            Self::Phase0(block) => block.as_ssz_bytes(),
            Self::Altair(block) => block.as_ssz_bytes(),
            Self::Bellatrix(block) => block.as_ssz_bytes(),
            Self::Capella(block) => block.as_ssz_bytes(),
            Self::Deneb(block) => block.as_ssz_bytes(),
            Self::Electra(block) | Self::Fulu(block) => block.as_ssz_bytes(),
            Self::Gloas(block) => block.as_ssz_bytes(),
        }
    }

    /// Reads the slot of an SSZ-encoded signed block without decoding the rest of it.
    ///
    /// Signed blocks of every fork start with the offset of `message` followed by `signature`.
    /// `message` starts with `slot`. The same holds for signed blinded blocks.
    pub fn slot_from_ssz(bytes: &[u8]) -> Result<Slot, ssz::DecodeError> {
        let slot_start = ssz::BYTES_PER_LENGTH_OFFSET + SignatureBytes::SIZE;
        let slot_end = slot_start + size_of::<Slot>();

        let slot_bytes = bytes
            .get(slot_start..slot_end)
            .ok_or(ssz::DecodeError::InvalidByteLength {
                len: bytes.len(),
                expected: slot_end,
            })?;

        <Slot as ssz::Decode>::from_ssz_bytes(slot_bytes)
    }
}

/// Unsigned block returned by block production when the payload is included in full.
///
/// Starting with Deneb the block comes bundled with blobs and proofs.
/// Starting with Gloas blobs are no longer bundled with the block.
#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
#[serde(bound = "", untagged)]
pub enum FullBlockContents<P: Preset> {
    Phase0(Phase0BeaconBlock<P>),
    Altair(AltairBeaconBlock<P>),
    Bellatrix(BellatrixBeaconBlock<P>),
    Capella(CapellaBeaconBlock<P>),
    Deneb(DenebBlockContents<P>),
    Electra(ElectraBlockContents<P>),
    Fulu(FuluBlockContents<P>),
    Gloas(GloasBeaconBlock<P>),
}

impl<P: Preset> FullBlockContents<P> {
    #[must_use]
    pub const fn phase(&self) -> Phase {
        match self {
            Self::Phase0(_) => Phase::Phase0,
            Self::Altair(_) => Phase::Altair,
            Self::Bellatrix(_) => Phase::Bellatrix,
            Self::Capella(_) => Phase::Capella,
            Self::Deneb(_) => Phase::Deneb,
            Self::Electra(_) => Phase::Electra,
            Self::Fulu(_) => Phase::Fulu,
            Self::Gloas(_) => Phase::Gloas,
        }
    }

    #[must_use]
    pub fn block(&self) -> &dyn BeaconBlockTrait<P> {
        match self {
            Self::Phase0(block) => block,
            Self::Altair(block) => block,
            Self::Bellatrix(block) => block,
            Self::Capella(block) => block,
            Self::Deneb(contents) => &contents.block,
            Self::Electra(contents) => &contents.block,
            Self::Fulu(contents) => &contents.block,
            Self::Gloas(block) => block,
        }
    }
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
#[serde(bound = "", untagged)]
pub enum BlindedBeaconBlock<P: Preset> {
    Bellatrix(BellatrixBlindedBeaconBlock<P>),
    Capella(CapellaBlindedBeaconBlock<P>),
    Deneb(DenebBlindedBeaconBlock<P>),
    Electra(ElectraBlindedBeaconBlock<P>),
    Fulu(FuluBlindedBeaconBlock<P>),
}

impl<P: Preset> BlindedBeaconBlock<P> {
    #[must_use]
    pub const fn phase(&self) -> Phase {
        match self {
            Self::Bellatrix(_) => Phase::Bellatrix,
            Self::Capella(_) => Phase::Capella,
            Self::Deneb(_) => Phase::Deneb,
            Self::Electra(_) => Phase::Electra,
            Self::Fulu(_) => Phase::Fulu,
        }
    }

    #[must_use]
    pub fn block(&self) -> &dyn BeaconBlockTrait<P> {
        match self {
            Self::Bellatrix(block) => block,
            Self::Capella(block) => block,
            Self::Deneb(block) => block,
            Self::Electra(block) | Self::Fulu(block) => block,
        }
    }
}

/// Block submitted for publication when the payload is included in full.
#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
#[serde(bound = "", untagged)]
pub enum SignedBlockContents<P: Preset> {
    Phase0(Phase0SignedBeaconBlock<P>),
    Altair(AltairSignedBeaconBlock<P>),
    Bellatrix(BellatrixSignedBeaconBlock<P>),
    Capella(CapellaSignedBeaconBlock<P>),
    Deneb(DenebSignedBlockContents<P>),
    Electra(ElectraSignedBlockContents<P>),
    Fulu(FuluSignedBlockContents<P>),
    Gloas(GloasSignedBeaconBlock<P>),
}

impl<P: Preset> SignedBlockContents<P> {
    #[must_use]
    pub const fn phase(&self) -> Phase {
        match self {
            Self::Phase0(_) => Phase::Phase0,
            Self::Altair(_) => Phase::Altair,
            Self::Bellatrix(_) => Phase::Bellatrix,
            Self::Capella(_) => Phase::Capella,
            Self::Deneb(_) => Phase::Deneb,
            Self::Electra(_) => Phase::Electra,
            Self::Fulu(_) => Phase::Fulu,
            Self::Gloas(_) => Phase::Gloas,
        }
    }

    #[must_use]
    pub fn signed_block(&self) -> &dyn SignedBeaconBlockTrait<P> {
        match self {
            Self::Phase0(block) => block,
            Self::Altair(block) => block,
            Self::Bellatrix(block) => block,
            Self::Capella(block) => block,
            Self::Deneb(contents) => &contents.signed_block,
            Self::Electra(contents) => &contents.signed_block,
            Self::Fulu(contents) => &contents.signed_block,
            Self::Gloas(block) => block,
        }
    }

    #[must_use]
    pub fn slot(&self) -> Slot {
        self.signed_block().message().slot()
    }

    #[must_use]
    pub fn to_ssz(&self) -> Vec<u8> {
        match self {
            Self::Phase0(block) => block.as_ssz_bytes(),
            Self::Altair(block) => block.as_ssz_bytes(),
            Self::Bellatrix(block) => block.as_ssz_bytes(),
            Self::Capella(block) => block.as_ssz_bytes(),
            Self::Deneb(contents) => contents.as_ssz_bytes(),
            Self::Electra(contents) => contents.as_ssz_bytes(),
            Self::Fulu(contents) => contents.as_ssz_bytes(),
            Self::Gloas(block) => block.as_ssz_bytes(),
        }
    }
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
#[serde(bound = "", untagged)]
pub enum SignedBlindedBeaconBlock<P: Preset> {
    Bellatrix(BellatrixSignedBlindedBeaconBlock<P>),
    Capella(CapellaSignedBlindedBeaconBlock<P>),
    Deneb(DenebSignedBlindedBeaconBlock<P>),
    Electra(ElectraSignedBlindedBeaconBlock<P>),
    Fulu(FuluSignedBlindedBeaconBlock<P>),
}

impl<P: Preset> SignedBlindedBeaconBlock<P> {
    #[must_use]
    pub const fn phase(&self) -> Phase {
        match self {
            Self::Bellatrix(_) => Phase::Bellatrix,
            Self::Capella(_) => Phase::Capella,
            Self::Deneb(_) => Phase::Deneb,
            Self::Electra(_) => Phase::Electra,
            Self::Fulu(_) => Phase::Fulu,
        }
    }

    #[must_use]
    pub fn signed_block(&self) -> &dyn SignedBeaconBlockTrait<P> {
        match self {
            Self::Bellatrix(block) => block,
            Self::Capella(block) => block,
            Self::Deneb(block) => block,
            Self::Electra(block) | Self::Fulu(block) => block,
        }
    }

    #[must_use]
    pub fn slot(&self) -> Slot {
        self.signed_block().message().slot()
    }

    #[must_use]
    pub fn to_ssz(&self) -> Vec<u8> {
        match self {
            Self::Bellatrix(block) => block.as_ssz_bytes(),
            Self::Capella(block) => block.as_ssz_bytes(),
            Self::Deneb(block) => block.as_ssz_bytes(),
            Self::Electra(block) | Self::Fulu(block) => block.as_ssz_bytes(),
        }
    }
}

/// Aggregate attestation. Electra moved committee indices from the data into `committee_bits`.
#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
#[serde(bound = "", untagged)]
pub enum Attestation<P: Preset> {
    Phase0(Phase0Attestation<P>),
    Altair(Phase0Attestation<P>),
    Bellatrix(Phase0Attestation<P>),
    Capella(Phase0Attestation<P>),
    Deneb(Phase0Attestation<P>),
    Electra(ElectraAttestation<P>),
    Fulu(ElectraAttestation<P>),
    Gloas(ElectraAttestation<P>),
}

impl<P: Preset> Attestation<P> {
    #[must_use]
    pub const fn phase(&self) -> Phase {
        match self {
            Self::Phase0(_) => Phase::Phase0,
            Self::Altair(_) => Phase::Altair,
            Self::Bellatrix(_) => Phase::Bellatrix,
            Self::Capella(_) => Phase::Capella,
            Self::Deneb(_) => Phase::Deneb,
            Self::Electra(_) => Phase::Electra,
            Self::Fulu(_) => Phase::Fulu,
            Self::Gloas(_) => Phase::Gloas,
        }
    }

    #[must_use]
    pub const fn data(&self) -> AttestationData {
        match self {
            Self::Phase0(attestation)
            | Self::Altair(attestation)
            | Self::Bellatrix(attestation)
            | Self::Capella(attestation)
            | Self::Deneb(attestation) => attestation.data,
            Self::Electra(attestation) | Self::Fulu(attestation) | Self::Gloas(attestation) => {
                attestation.data
            }
        }
    }
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
#[serde(bound = "", untagged)]
pub enum SignedExecutionPayloadEnvelope<P: Preset> {
    Gloas(GloasSignedExecutionPayloadEnvelope<P>),
}

impl<P: Preset> SignedExecutionPayloadEnvelope<P> {
    #[must_use]
    pub const fn phase(&self) -> Phase {
        match self {
            Self::Gloas(_) => Phase::Gloas,
        }
    }

    #[must_use]
    pub const fn slot(&self) -> Slot {
        match self {
            Self::Gloas(envelope) => envelope.message.slot,
        }
    }
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
#[serde(bound = "", untagged)]
pub enum BlobSidecars<P: Preset> {
    Deneb(BlobSidecarList<P>),
    Electra(BlobSidecarList<P>),
    Fulu(BlobSidecarList<P>),
}

impl<P: Preset> BlobSidecars<P> {
    #[must_use]
    pub const fn phase(&self) -> Phase {
        match self {
            Self::Deneb(_) => Phase::Deneb,
            Self::Electra(_) => Phase::Electra,
            Self::Fulu(_) => Phase::Fulu,
        }
    }

    #[must_use]
    pub fn sidecars(&self) -> &[BlobSidecar<P>] {
        match self {
            Self::Deneb(sidecars) | Self::Electra(sidecars) | Self::Fulu(sidecars) => sidecars,
        }
    }
}
