use duplicate::duplicate_item;
use tree_hash::TreeHash as _;

use crate::{
    altair::containers::{
        BeaconBlock as AltairBeaconBlock, BeaconBlockBody as AltairBeaconBlockBody,
        SignedBeaconBlock as AltairSignedBeaconBlock,
    },
    bellatrix::containers::{
        BeaconBlock as BellatrixBeaconBlock, BeaconBlockBody as BellatrixBeaconBlockBody,
        BlindedBeaconBlock as BellatrixBlindedBeaconBlock,
        BlindedBeaconBlockBody as BellatrixBlindedBeaconBlockBody,
        SignedBeaconBlock as BellatrixSignedBeaconBlock,
        SignedBlindedBeaconBlock as BellatrixSignedBlindedBeaconBlock,
    },
    capella::containers::{
        BeaconBlock as CapellaBeaconBlock, BeaconBlockBody as CapellaBeaconBlockBody,
        BlindedBeaconBlock as CapellaBlindedBeaconBlock,
        BlindedBeaconBlockBody as CapellaBlindedBeaconBlockBody,
        SignedBeaconBlock as CapellaSignedBeaconBlock,
        SignedBlindedBeaconBlock as CapellaSignedBlindedBeaconBlock,
    },
    deneb::containers::{
        BeaconBlock as DenebBeaconBlock, BeaconBlockBody as DenebBeaconBlockBody,
        BlindedBeaconBlock as DenebBlindedBeaconBlock,
        BlindedBeaconBlockBody as DenebBlindedBeaconBlockBody,
        SignedBeaconBlock as DenebSignedBeaconBlock,
        SignedBlindedBeaconBlock as DenebSignedBlindedBeaconBlock,
    },
    electra::containers::{
        BeaconBlock as ElectraBeaconBlock, BeaconBlockBody as ElectraBeaconBlockBody,
        BlindedBeaconBlock as ElectraBlindedBeaconBlock,
        BlindedBeaconBlockBody as ElectraBlindedBeaconBlockBody,
        SignedBeaconBlock as ElectraSignedBeaconBlock,
        SignedBlindedBeaconBlock as ElectraSignedBlindedBeaconBlock,
    },
    gloas::containers::{
        BeaconBlock as GloasBeaconBlock, BeaconBlockBody as GloasBeaconBlockBody,
        SignedBeaconBlock as GloasSignedBeaconBlock,
    },
    phase0::{
        containers::{
            BeaconBlock as Phase0BeaconBlock, BeaconBlockBody as Phase0BeaconBlockBody,
            BeaconBlockHeader, Eth1Data, SignedBeaconBlock as Phase0SignedBeaconBlock,
            SignedBeaconBlockHeader,
        },
        primitives::{SignatureBytes, Slot, ValidatorIndex, H256},
    },
    preset::Preset,
};

// Fulu blocks are the same types as Electra blocks, so they need no separate impls.

pub trait SignedBeaconBlock<P: Preset> {
    fn message(&self) -> &dyn BeaconBlock<P>;
    fn signature(&self) -> SignatureBytes;

    fn to_header(&self) -> SignedBeaconBlockHeader {
        SignedBeaconBlockHeader {
            message: self.message().to_header(),
            signature: self.signature(),
        }
    }
}

#[duplicate_item(
    implementor;
    [Phase0SignedBeaconBlock<P>];
    [AltairSignedBeaconBlock<P>];
    [BellatrixSignedBeaconBlock<P>];
    [CapellaSignedBeaconBlock<P>];
    [DenebSignedBeaconBlock<P>];
    [ElectraSignedBeaconBlock<P>];
    [GloasSignedBeaconBlock<P>];
    [BellatrixSignedBlindedBeaconBlock<P>];
    [CapellaSignedBlindedBeaconBlock<P>];
    [DenebSignedBlindedBeaconBlock<P>];
    [ElectraSignedBlindedBeaconBlock<P>];
)]
impl<P: Preset> SignedBeaconBlock<P> for implementor {
    fn message(&self) -> &dyn BeaconBlock<P> {
        &self.message
    }

    fn signature(&self) -> SignatureBytes {
        self.signature
    }
}

pub trait BeaconBlock<P: Preset> {
    fn slot(&self) -> Slot;
    fn proposer_index(&self) -> ValidatorIndex;
    fn parent_root(&self) -> H256;
    fn state_root(&self) -> H256;
    fn body(&self) -> &dyn BeaconBlockBody<P>;

    fn to_header(&self) -> BeaconBlockHeader {
        BeaconBlockHeader {
            slot: self.slot(),
            proposer_index: self.proposer_index(),
            parent_root: self.parent_root(),
            state_root: self.state_root(),
            body_root: self.body().hash_tree_root(),
        }
    }
}

#[duplicate_item(
    implementor;
    [Phase0BeaconBlock<P>];
    [AltairBeaconBlock<P>];
    [BellatrixBeaconBlock<P>];
    [CapellaBeaconBlock<P>];
    [DenebBeaconBlock<P>];
    [ElectraBeaconBlock<P>];
    [GloasBeaconBlock<P>];
    [BellatrixBlindedBeaconBlock<P>];
    [CapellaBlindedBeaconBlock<P>];
    [DenebBlindedBeaconBlock<P>];
    [ElectraBlindedBeaconBlock<P>];
)]
impl<P: Preset> BeaconBlock<P> for implementor {
    fn slot(&self) -> Slot {
        self.slot
    }

    fn proposer_index(&self) -> ValidatorIndex {
        self.proposer_index
    }

    fn parent_root(&self) -> H256 {
        self.parent_root
    }

    fn state_root(&self) -> H256 {
        self.state_root
    }

    fn body(&self) -> &dyn BeaconBlockBody<P> {
        &self.body
    }
}

/// The parts of a block body that are checked against the request that produced the block.
pub trait BeaconBlockBody<P: Preset> {
    fn randao_reveal(&self) -> SignatureBytes;
    fn eth1_data(&self) -> Eth1Data;
    fn graffiti(&self) -> H256;
    fn hash_tree_root(&self) -> H256;
}

#[duplicate_item(
    implementor;
    [Phase0BeaconBlockBody<P>];
    [AltairBeaconBlockBody<P>];
    [BellatrixBeaconBlockBody<P>];
    [CapellaBeaconBlockBody<P>];
    [DenebBeaconBlockBody<P>];
    [ElectraBeaconBlockBody<P>];
    [GloasBeaconBlockBody<P>];
    [BellatrixBlindedBeaconBlockBody<P>];
    [CapellaBlindedBeaconBlockBody<P>];
    [DenebBlindedBeaconBlockBody<P>];
    [ElectraBlindedBeaconBlockBody<P>];
)]
impl<P: Preset> BeaconBlockBody<P> for implementor {
    fn randao_reveal(&self) -> SignatureBytes {
        self.randao_reveal
    }

    fn eth1_data(&self) -> Eth1Data {
        self.eth1_data
    }

    fn graffiti(&self) -> H256 {
        self.graffiti
    }

    fn hash_tree_root(&self) -> H256 {
        self.tree_hash_root()
    }
}
