use serde::{Deserialize, Serialize};
use ssz_derive::{Decode, Encode};
use ssz_types::VariableList;

use crate::{
    deneb::primitives::{Blob, KzgProof},
    preset::Preset,
};

// Fulu does not change the shape of blocks.
pub use crate::electra::containers::{
    BeaconBlock, BeaconBlockBody, BlindedBeaconBlock, BlindedBeaconBlockBody, SignedBeaconBlock,
    SignedBlindedBeaconBlock,
};

/// Like the Deneb and Electra versions, but with a proof for every cell instead of every blob.
#[derive(Clone, PartialEq, Eq, Default, Debug, Deserialize, Serialize, Encode, Decode)]
#[serde(bound = "", deny_unknown_fields)]
pub struct BlockContents<P: Preset> {
    pub block: BeaconBlock<P>,
    pub kzg_proofs: VariableList<KzgProof, P::MaxCellProofsPerBlock>,
    pub blobs: VariableList<Blob<P>, P::MaxBlobCommitmentsPerBlock>,
}

#[derive(Clone, PartialEq, Eq, Default, Debug, Deserialize, Serialize, Encode, Decode)]
#[serde(bound = "", deny_unknown_fields)]
pub struct SignedBlockContents<P: Preset> {
    pub signed_block: SignedBeaconBlock<P>,
    pub kzg_proofs: VariableList<KzgProof, P::MaxCellProofsPerBlock>,
    pub blobs: VariableList<Blob<P>, P::MaxBlobCommitmentsPerBlock>,
}
