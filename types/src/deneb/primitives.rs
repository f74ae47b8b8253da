use serde::{Deserialize, Serialize};
use ssz_derive::{Decode, Encode};
use ssz_types::FixedVector;
use tree_hash::{Hash256, PackedEncoding, TreeHash, TreeHashType};

use crate::{fixed_bytes::fixed_bytes, preset::Preset};

pub type BlobIndex = u64;
pub type VersionedHash = crate::phase0::primitives::H256;

fixed_bytes! {
    KzgCommitment, 48
}

fixed_bytes! {
    KzgProof, 48
}

#[derive(Clone, PartialEq, Eq, Default, Debug, Deserialize, Serialize, Encode, Decode)]
#[serde(bound = "", transparent)]
#[ssz(struct_behaviour = "transparent")]
pub struct Blob<P: Preset>(
    #[serde(with = "serde_utils::prefixed_hex_vector")] pub FixedVector<u8, P::BytesPerBlob>,
);

impl<P: Preset> TreeHash for Blob<P> {
    fn tree_hash_type() -> TreeHashType {
        FixedVector::<u8, P::BytesPerBlob>::tree_hash_type()
    }

    fn tree_hash_packed_encoding(&self) -> PackedEncoding {
        self.0.tree_hash_packed_encoding()
    }

    fn tree_hash_packing_factor() -> usize {
        FixedVector::<u8, P::BytesPerBlob>::tree_hash_packing_factor()
    }

    fn tree_hash_root(&self) -> Hash256 {
        self.0.tree_hash_root()
    }
}
