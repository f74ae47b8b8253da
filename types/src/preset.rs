#![allow(clippy::module_name_repetitions)]

use core::{fmt::Debug, hash::Hash};

use serde_with::{DeserializeFromStr, SerializeDisplay};
use strum::{Display, EnumString};
use typenum::{
    Unsigned, U1, U10, U1048576, U1073741824, U128, U131072, U16, U17, U2, U2048, U256,
    U262144, U32, U33554432, U4, U4096, U512, U64, U8, U8192,
};

/// Bounds shared by every type-level length in a [`Preset`].
///
/// `typenum` integers satisfy all of them. Containers derive traits like `Clone` and `Hash`,
/// which require the same traits of their lengths.
pub trait Length: Unsigned + Copy + Eq + Ord + Hash + Default + Debug + Send + Sync + 'static {}

impl<N: Unsigned + Copy + Eq + Ord + Hash + Default + Debug + Send + Sync + 'static> Length for N {}

#[derive(
    Clone, Copy, PartialEq, Eq, Debug, Display, EnumString, DeserializeFromStr, SerializeDisplay,
)]
#[strum(serialize_all = "lowercase")]
pub enum PresetName {
    Mainnet,
    Minimal,
}

/// Compile-time list and vector bounds.
///
/// Only the variables that affect the shape of containers returned by the Beacon Node API are
/// included. Networks may configure smaller limits at runtime. Those are checked separately.
///
/// See [presets in `consensus-specs`](https://github.com/ethereum/consensus-specs/tree/dev/presets).
pub trait Preset: Copy + Eq + Ord + Hash + Default + Debug + Send + Sync + 'static {
    // Phase 0
    type MaxAttestations: Length;
    type MaxAttesterSlashings: Length;
    type MaxDeposits: Length;
    type MaxProposerSlashings: Length;
    type MaxValidatorsPerCommittee: Length;
    type MaxVoluntaryExits: Length;
    type SlotsPerEpoch: Length;

    // Altair
    type SyncCommitteeSize: Length;

    // Bellatrix
    type BytesPerLogsBloom: Length;
    type MaxBytesPerTransaction: Length;
    type MaxExtraDataBytes: Length;
    type MaxTransactionsPerPayload: Length;

    // Capella
    type MaxBlsToExecutionChanges: Length;
    type MaxWithdrawalsPerPayload: Length;

    // Deneb
    type BytesPerBlob: Length;
    type KzgCommitmentInclusionProofDepth: Length;
    type MaxBlobCommitmentsPerBlock: Length;

    // Electra
    type MaxAttestationsElectra: Length;
    type MaxAttesterSlashingsElectra: Length;
    type MaxCommitteesPerSlot: Length;
    type MaxConsolidationRequestsPerPayload: Length;
    type MaxDepositRequestsPerPayload: Length;
    type MaxWithdrawalRequestsPerPayload: Length;

    // Fulu
    type MaxCellProofsPerBlock: Length;

    // Gloas
    type MaxPayloadAttestations: Length;
    type PtcSize: Length;

    // Derived type-level variables
    // `MAX_VALIDATORS_PER_COMMITTEE * MAX_COMMITTEES_PER_SLOT`.
    // Written out because `typenum::Prod` does not satisfy `Length` without extra bounds.
    type MaxAttestersPerSlot: Length;

    const NAME: PresetName;

    #[must_use]
    fn slots_per_epoch() -> u64 {
        Self::SlotsPerEpoch::U64
    }
}

/// [Mainnet preset](https://github.com/ethereum/consensus-specs/tree/dev/presets/mainnet).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Debug)]
pub struct Mainnet;

impl Preset for Mainnet {
    // Phase 0
    type MaxAttestations = U128;
    type MaxAttesterSlashings = U2;
    type MaxDeposits = U16;
    type MaxProposerSlashings = U16;
    type MaxValidatorsPerCommittee = U2048;
    type MaxVoluntaryExits = U16;
    type SlotsPerEpoch = U32;

    // Altair
    type SyncCommitteeSize = U512;

    // Bellatrix
    type BytesPerLogsBloom = U256;
    type MaxBytesPerTransaction = U1073741824;
    type MaxExtraDataBytes = U32;
    type MaxTransactionsPerPayload = U1048576;

    // Capella
    type MaxBlsToExecutionChanges = U16;
    type MaxWithdrawalsPerPayload = U16;

    // Deneb
    type BytesPerBlob = U131072;
    type KzgCommitmentInclusionProofDepth = U17;
    type MaxBlobCommitmentsPerBlock = U4096;

    // Electra
    type MaxAttestationsElectra = U8;
    type MaxAttesterSlashingsElectra = U1;
    type MaxCommitteesPerSlot = U64;
    type MaxConsolidationRequestsPerPayload = U2;
    type MaxDepositRequestsPerPayload = U8192;
    type MaxWithdrawalRequestsPerPayload = U16;

    // Fulu
    type MaxCellProofsPerBlock = U33554432;

    // Gloas
    type MaxPayloadAttestations = U4;
    type PtcSize = U512;

    // Derived type-level variables
    type MaxAttestersPerSlot = U131072;

    const NAME: PresetName = PresetName::Mainnet;
}

/// [Minimal preset](https://github.com/ethereum/consensus-specs/tree/dev/presets/minimal).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Debug)]
pub struct Minimal;

impl Preset for Minimal {
    // Phase 0
    type MaxAttestations = U128;
    type MaxAttesterSlashings = U2;
    type MaxDeposits = U16;
    type MaxProposerSlashings = U16;
    type MaxValidatorsPerCommittee = U2048;
    type MaxVoluntaryExits = U16;
    type SlotsPerEpoch = U8;

    // Altair
    type SyncCommitteeSize = U32;

    // Bellatrix
    type BytesPerLogsBloom = U256;
    type MaxBytesPerTransaction = U1073741824;
    type MaxExtraDataBytes = U32;
    type MaxTransactionsPerPayload = U1048576;

    // Capella
    type MaxBlsToExecutionChanges = U16;
    type MaxWithdrawalsPerPayload = U4;

    // Deneb
    type BytesPerBlob = U131072;
    type KzgCommitmentInclusionProofDepth = U10;
    type MaxBlobCommitmentsPerBlock = U32;

    // Electra
    type MaxAttestationsElectra = U8;
    type MaxAttesterSlashingsElectra = U1;
    type MaxCommitteesPerSlot = U4;
    type MaxConsolidationRequestsPerPayload = U1;
    type MaxDepositRequestsPerPayload = U4;
    type MaxWithdrawalRequestsPerPayload = U2;

    // Fulu
    type MaxCellProofsPerBlock = U262144;

    // Gloas
    type MaxPayloadAttestations = U4;
    type PtcSize = U2;

    // Derived type-level variables
    type MaxAttestersPerSlot = U8192;

    const NAME: PresetName = PresetName::Minimal;
}
