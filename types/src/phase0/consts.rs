use typenum::U33;

use crate::phase0::primitives::Epoch;

pub const FAR_FUTURE_EPOCH: Epoch = Epoch::MAX;
pub const GENESIS_EPOCH: Epoch = 0;

/// `DEPOSIT_CONTRACT_TREE_DEPTH + 1`. The extra node mixes in the number of deposits.
pub type DepositProofLength = U33;
