//! Checks of SSZ-decoded blocks against list limits configured by the node.
//!
//! Containers are decoded with the bounds of the compiled preset. Networks may configure smaller
//! limits. Those are only known at runtime, so blocks are checked against them after decoding.

use duplicate::duplicate_item;
use serde_json::Value;
use typenum::Unsigned as _;
use types::{
    altair::containers::BeaconBlockBody as AltairBeaconBlockBody,
    bellatrix::containers::{
        BeaconBlockBody as BellatrixBeaconBlockBody,
        BlindedBeaconBlockBody as BellatrixBlindedBeaconBlockBody,
    },
    capella::containers::{
        BeaconBlockBody as CapellaBeaconBlockBody,
        BlindedBeaconBlockBody as CapellaBlindedBeaconBlockBody,
    },
    combined::{BlindedBeaconBlock, FullBlockContents, SignedBeaconBlock},
    deneb::containers::{
        BeaconBlockBody as DenebBeaconBlockBody,
        BlindedBeaconBlockBody as DenebBlindedBeaconBlockBody,
    },
    electra::containers::{
        BeaconBlockBody as ElectraBeaconBlockBody,
        BlindedBeaconBlockBody as ElectraBlindedBeaconBlockBody,
    },
    gloas::containers::BeaconBlockBody as GloasBeaconBlockBody,
    nonstandard::Phase,
    phase0::containers::BeaconBlockBody as Phase0BeaconBlockBody,
    preset::Preset,
};

use crate::{error::Error, responses::ChainSpec};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ListLimit {
    ProposerSlashings,
    AttesterSlashings,
    Attestations,
    Deposits,
    VoluntaryExits,
    BlsToExecutionChanges,
    BlobKzgCommitments,
    PayloadAttestations,
}

impl ListLimit {
    fn spec_key(self, phase: Phase) -> &'static str {
        match self {
            Self::ProposerSlashings => "MAX_PROPOSER_SLASHINGS",
            Self::AttesterSlashings if phase.is_post_electra() => "MAX_ATTESTER_SLASHINGS_ELECTRA",
            Self::AttesterSlashings => "MAX_ATTESTER_SLASHINGS",
            Self::Attestations if phase.is_post_electra() => "MAX_ATTESTATIONS_ELECTRA",
            Self::Attestations => "MAX_ATTESTATIONS",
            Self::Deposits => "MAX_DEPOSITS",
            Self::VoluntaryExits => "MAX_VOLUNTARY_EXITS",
            Self::BlsToExecutionChanges => "MAX_BLS_TO_EXECUTION_CHANGES",
            Self::BlobKzgCommitments if phase.is_post_electra() => "MAX_BLOBS_PER_BLOCK_ELECTRA",
            Self::BlobKzgCommitments => "MAX_BLOBS_PER_BLOCK",
            Self::PayloadAttestations => "MAX_PAYLOAD_ATTESTATIONS",
        }
    }

    fn compiled<P: Preset>(self, phase: Phase) -> usize {
        match self {
            Self::ProposerSlashings => P::MaxProposerSlashings::USIZE,
            Self::AttesterSlashings if phase.is_post_electra() => {
                P::MaxAttesterSlashingsElectra::USIZE
            }
            Self::AttesterSlashings => P::MaxAttesterSlashings::USIZE,
            Self::Attestations if phase.is_post_electra() => P::MaxAttestationsElectra::USIZE,
            Self::Attestations => P::MaxAttestations::USIZE,
            Self::Deposits => P::MaxDeposits::USIZE,
            Self::VoluntaryExits => P::MaxVoluntaryExits::USIZE,
            Self::BlsToExecutionChanges => P::MaxBlsToExecutionChanges::USIZE,
            Self::BlobKzgCommitments => P::MaxBlobCommitmentsPerBlock::USIZE,
            Self::PayloadAttestations => P::MaxPayloadAttestations::USIZE,
        }
    }
}

/// Live list limits of one fork.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct SpecLimits {
    phase: Phase,
    limits: Vec<(ListLimit, usize)>,
}

impl SpecLimits {
    /// Limits the node does not report default to the compiled preset.
    pub fn new<P: Preset>(spec: &ChainSpec, phase: Phase) -> Result<Self, Error> {
        let limits = limits_in(phase)
            .iter()
            .map(|&limit| {
                let key = limit.spec_key(phase);
                let compiled = limit.compiled::<P>(phase);

                let live = match (limit, phase >= Phase::Fulu) {
                    (ListLimit::BlobKzgCommitments, true) => max_scheduled_blobs(spec)?,
                    _ => spec.optional_u64(key)?,
                };

                let Some(live) = live else {
                    return Ok((limit, compiled));
                };

                let live = usize::try_from(live).map_err(|_| Error::SpecValue {
                    key: key.to_owned(),
                })?;

                if live > compiled {
                    return Err(Error::SpecLimitAboveCompiled {
                        limit: key,
                        live,
                        compiled,
                    });
                }

                Ok((limit, live))
            })
            .collect::<Result<_, _>>()?;

        Ok(Self { phase, limits })
    }

    pub fn check(&self, lengths: &[(ListLimit, usize)]) -> Result<(), Error> {
        for (limit, length) in lengths.iter().copied() {
            let live = self
                .limits
                .iter()
                .find(|(known, _)| *known == limit)
                .map(|(_, live)| *live);

            if let Some(live) = live {
                if length > live {
                    return Err(Error::SpecLimitExceeded {
                        limit: limit.spec_key(self.phase),
                        length,
                        live,
                    });
                }
            }
        }

        Ok(())
    }
}

/// Blocks and block-like unions whose lists are bounded by the chain spec.
pub trait SpecLimited {
    fn limited_phase(&self) -> Phase;
    fn list_lengths(&self) -> Vec<(ListLimit, usize)>;
}

pub fn check<P: Preset>(spec: &ChainSpec, value: &impl SpecLimited) -> Result<(), Error> {
    SpecLimits::new::<P>(spec, value.limited_phase())?.check(&value.list_lengths())
}

impl<P: Preset> SpecLimited for SignedBeaconBlock<P> {
    fn limited_phase(&self) -> Phase {
        self.phase()
    }

    fn list_lengths(&self) -> Vec<(ListLimit, usize)> {
        match self {
            Self::Phase0(block) => block.message.body.lengths(),
            Self::Altair(block) => block.message.body.lengths(),
            Self::Bellatrix(block) => block.message.body.lengths(),
            Self::Capella(block) => block.message.body.lengths(),
            Self::Deneb(block) => block.message.body.lengths(),
            Self::Electra(block) | Self::Fulu(block) => block.message.body.lengths(),
            Self::Gloas(block) => block.message.body.lengths(),
        }
    }
}

impl<P: Preset> SpecLimited for FullBlockContents<P> {
    fn limited_phase(&self) -> Phase {
        self.phase()
    }

    fn list_lengths(&self) -> Vec<(ListLimit, usize)> {
        match self {
            Self::Phase0(block) => block.body.lengths(),
            Self::Altair(block) => block.body.lengths(),
            Self::Bellatrix(block) => block.body.lengths(),
            Self::Capella(block) => block.body.lengths(),
            Self::Deneb(contents) => contents.block.body.lengths(),
            Self::Electra(contents) => contents.block.body.lengths(),
            Self::Fulu(contents) => contents.block.body.lengths(),
            Self::Gloas(block) => block.body.lengths(),
        }
    }
}

impl<P: Preset> SpecLimited for BlindedBeaconBlock<P> {
    fn limited_phase(&self) -> Phase {
        self.phase()
    }

    fn list_lengths(&self) -> Vec<(ListLimit, usize)> {
        match self {
            Self::Bellatrix(block) => block.body.lengths(),
            Self::Capella(block) => block.body.lengths(),
            Self::Deneb(block) => block.body.lengths(),
            Self::Electra(block) | Self::Fulu(block) => block.body.lengths(),
        }
    }
}

const fn limits_in(phase: Phase) -> &'static [ListLimit] {
    use ListLimit::{
        Attestations, AttesterSlashings, BlobKzgCommitments, BlsToExecutionChanges, Deposits,
        PayloadAttestations, ProposerSlashings, VoluntaryExits,
    };

    match phase {
        Phase::Phase0 | Phase::Altair | Phase::Bellatrix => &[
            ProposerSlashings,
            AttesterSlashings,
            Attestations,
            Deposits,
            VoluntaryExits,
        ],
        Phase::Capella => &[
            ProposerSlashings,
            AttesterSlashings,
            Attestations,
            Deposits,
            VoluntaryExits,
            BlsToExecutionChanges,
        ],
        Phase::Deneb | Phase::Electra | Phase::Fulu => &[
            ProposerSlashings,
            AttesterSlashings,
            Attestations,
            Deposits,
            VoluntaryExits,
            BlsToExecutionChanges,
            BlobKzgCommitments,
        ],
        Phase::Gloas => &[
            ProposerSlashings,
            AttesterSlashings,
            Attestations,
            Deposits,
            VoluntaryExits,
            BlsToExecutionChanges,
            PayloadAttestations,
        ],
    }
}

// Since Fulu the blob limit changes on a schedule. A block may use the highest scheduled limit.
fn max_scheduled_blobs(spec: &ChainSpec) -> Result<Option<u64>, Error> {
    let electra = spec.optional_u64("MAX_BLOBS_PER_BLOCK_ELECTRA")?;

    let Some(schedule) = spec.get("BLOB_SCHEDULE") else {
        return Ok(electra);
    };

    let invalid = || Error::SpecValue {
        key: "BLOB_SCHEDULE".to_owned(),
    };

    let scheduled = schedule
        .as_array()
        .ok_or_else(invalid)?
        .iter()
        .map(|entry| match entry.get("MAX_BLOBS_PER_BLOCK") {
            Some(Value::String(string)) => string.parse().map_err(|_| invalid()),
            Some(Value::Number(number)) => number.as_u64().ok_or_else(invalid),
            _ => Err(invalid()),
        })
        .collect::<Result<Vec<u64>, _>>()?;

    Ok(scheduled.into_iter().chain(electra).max())
}

trait BodyLengths {
    fn lengths(&self) -> Vec<(ListLimit, usize)>;
}

#[duplicate_item(
    implementor                             additional;
    [Phase0BeaconBlockBody<P>]              [];
    [AltairBeaconBlockBody<P>]              [];
    [BellatrixBeaconBlockBody<P>]           [];
    [BellatrixBlindedBeaconBlockBody<P>]    [];
    [CapellaBeaconBlockBody<P>]             [(ListLimit::BlsToExecutionChanges, self.bls_to_execution_changes.len())];
    [CapellaBlindedBeaconBlockBody<P>]      [(ListLimit::BlsToExecutionChanges, self.bls_to_execution_changes.len())];
    [DenebBeaconBlockBody<P>]               [(ListLimit::BlsToExecutionChanges, self.bls_to_execution_changes.len()), (ListLimit::BlobKzgCommitments, self.blob_kzg_commitments.len())];
    [DenebBlindedBeaconBlockBody<P>]        [(ListLimit::BlsToExecutionChanges, self.bls_to_execution_changes.len()), (ListLimit::BlobKzgCommitments, self.blob_kzg_commitments.len())];
    [ElectraBeaconBlockBody<P>]             [(ListLimit::BlsToExecutionChanges, self.bls_to_execution_changes.len()), (ListLimit::BlobKzgCommitments, self.blob_kzg_commitments.len())];
    [ElectraBlindedBeaconBlockBody<P>]      [(ListLimit::BlsToExecutionChanges, self.bls_to_execution_changes.len()), (ListLimit::BlobKzgCommitments, self.blob_kzg_commitments.len())];
    [GloasBeaconBlockBody<P>]               [(ListLimit::BlsToExecutionChanges, self.bls_to_execution_changes.len()), (ListLimit::PayloadAttestations, self.payload_attestations.len())];
)]
impl<P: Preset> BodyLengths for implementor {
    fn lengths(&self) -> Vec<(ListLimit, usize)> {
        let mut lengths = vec![
            (ListLimit::ProposerSlashings, self.proposer_slashings.len()),
            (ListLimit::AttesterSlashings, self.attester_slashings.len()),
            (ListLimit::Attestations, self.attestations.len()),
            (ListLimit::Deposits, self.deposits.len()),
            (ListLimit::VoluntaryExits, self.voluntary_exits.len()),
        ];

        let fork_specific: &[(ListLimit, usize)] = &[additional];

        lengths.extend_from_slice(fork_specific);
        lengths
    }
}
