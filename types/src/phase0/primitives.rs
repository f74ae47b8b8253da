pub use alloy_primitives::{Address as ExecutionAddress, B256 as H256, U256 as Uint256};

use crate::fixed_bytes::fixed_bytes;

pub type CommitteeIndex = u64;
pub type DepositIndex = u64;
pub type Epoch = u64;
pub type ExecutionBlockHash = H256;
pub type ExecutionBlockNumber = u64;
pub type Gwei = u64;
pub type Slot = u64;
pub type UnixSeconds = u64;
pub type ValidatorIndex = u64;

fixed_bytes! {
    /// A compressed BLS public key.
    PublicKeyBytes, 48
}

fixed_bytes! {
    /// A compressed BLS signature. Used for both individual and aggregate signatures.
    SignatureBytes, 96
}

fixed_bytes! {
    Version, 4
}
