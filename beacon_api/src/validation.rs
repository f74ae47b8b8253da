//! Checks that reject responses that do not match the request they answer.

use itertools::Itertools as _;
use tree_hash::TreeHash as _;
use types::{
    combined::Attestation,
    electra::containers::Attestation as ElectraAttestation,
    nonstandard::Phase,
    phase0::{
        containers::AttestationData,
        primitives::{CommitteeIndex, SignatureBytes, Slot, H256},
    },
    preset::Preset,
    traits::BeaconBlock,
};

use crate::error::Error;

/// Values a produced block must carry.
#[derive(Clone, Copy, Debug)]
pub struct ProposalChecks {
    pub slot: Slot,
    pub randao_reveal: SignatureBytes,
    /// Not checked if `None`. Nodes are free to fill in graffiti of their own.
    pub graffiti: Option<H256>,
    /// Distributed validator middleware replaces the randao reveal and graffiti.
    pub connected_to_middleware: bool,
}

impl ProposalChecks {
    pub fn check<P: Preset>(
        &self,
        what: &'static str,
        block: &dyn BeaconBlock<P>,
    ) -> Result<(), Error> {
        check_slot(what, self.slot, block.slot())?;

        if self.connected_to_middleware {
            return Ok(());
        }

        let received = block.body().randao_reveal();

        if received != self.randao_reveal {
            return Err(Error::RandaoRevealMismatch {
                what,
                requested: self.randao_reveal,
                received,
            });
        }

        if let Some(requested) = self.graffiti {
            let received = block.body().graffiti();

            if received != requested {
                return Err(Error::GraffitiMismatch {
                    what,
                    requested,
                    received,
                });
            }
        }

        Ok(())
    }
}

pub fn check_slot(what: &'static str, requested: Slot, received: Slot) -> Result<(), Error> {
    if requested == received {
        Ok(())
    } else {
        Err(Error::SlotMismatch {
            what,
            requested,
            received,
        })
    }
}

/// Before Electra the data carries the committee index. Since Electra the field is zero and the
/// committee is given outside of the data.
pub fn check_attestation_data(
    data: AttestationData,
    slot: Slot,
    committee_index: CommitteeIndex,
    phase: Phase,
) -> Result<(), Error> {
    check_slot("attestation data", slot, data.slot)?;

    let zero_index_allowed = phase.is_post_electra() && data.index == 0;

    if data.index != committee_index && !zero_index_allowed {
        return Err(Error::CommitteeIndexMismatch {
            what: "attestation data",
            requested: committee_index,
            received: data.index,
        });
    }

    Ok(())
}

pub fn check_aggregate_attestation<P: Preset>(
    attestation: &Attestation<P>,
    slot: Slot,
    committee_index: CommitteeIndex,
    attestation_data_root: H256,
) -> Result<(), Error> {
    let data = attestation.data();

    check_slot("aggregate attestation", slot, data.slot)?;

    match attestation {
        Attestation::Phase0(_)
        | Attestation::Altair(_)
        | Attestation::Bellatrix(_)
        | Attestation::Capella(_)
        | Attestation::Deneb(_) => {
            if data.index != committee_index {
                return Err(Error::CommitteeIndexMismatch {
                    what: "aggregate attestation",
                    requested: committee_index,
                    received: data.index,
                });
            }
        }
        Attestation::Electra(attestation)
        | Attestation::Fulu(attestation)
        | Attestation::Gloas(attestation) => check_committee_bits(attestation, committee_index)?,
    }

    let computed = data.tree_hash_root();

    if computed != attestation_data_root {
        return Err(Error::AttestationDataRootMismatch {
            requested: attestation_data_root,
            computed,
        });
    }

    Ok(())
}

// An aggregate covers a single committee, so exactly one bit may be set.
fn check_committee_bits<P: Preset>(
    attestation: &ElectraAttestation<P>,
    committee_index: CommitteeIndex,
) -> Result<(), Error> {
    let received = attestation.committee_bits.iter().positions(|set| set).collect_vec();

    if usize::try_from(committee_index).is_ok_and(|requested| received == [requested]) {
        return Ok(());
    }

    Err(Error::CommitteeBitsMismatch {
        requested: committee_index,
        received,
    })
}

#[cfg(test)]
mod tests {
    use ssz_types::{BitList, BitVector};
    use test_case::test_case;
    use types::{
        electra::containers::BeaconBlock as ElectraBeaconBlock,
        phase0::containers::Attestation as Phase0Attestation, preset::Minimal,
    };

    use super::*;

    const RANDAO_REVEAL: SignatureBytes = SignatureBytes([0xaa; 96]);
    const GRAFFITI: H256 = H256::repeat_byte(0x67);

    fn block(
        slot: Slot,
        randao_reveal: SignatureBytes,
        graffiti: H256,
    ) -> ElectraBeaconBlock<Minimal> {
        let mut block = ElectraBeaconBlock::default();
        block.slot = slot;
        block.body.randao_reveal = randao_reveal;
        block.body.graffiti = graffiti;
        block
    }

    fn checks(connected_to_middleware: bool) -> ProposalChecks {
        ProposalChecks {
            slot: 100,
            randao_reveal: RANDAO_REVEAL,
            graffiti: Some(GRAFFITI),
            connected_to_middleware,
        }
    }

    #[test]
    fn matching_block_passes() {
        let block = block(100, RANDAO_REVEAL, GRAFFITI);
        assert_eq!(checks(false).check::<Minimal>("proposal", &block), Ok(()));
    }

    #[test]
    fn block_for_other_slot_is_rejected() {
        let block = block(101, RANDAO_REVEAL, GRAFFITI);

        let error = checks(false)
            .check::<Minimal>("proposal", &block)
            .expect_err("slot differs");

        assert_eq!(
            error,
            Error::SlotMismatch {
                what: "proposal",
                requested: 100,
                received: 101,
            },
        );
        assert!(error.to_string().contains("not for requested slot"));
    }

    #[test]
    fn slot_is_checked_even_through_middleware() {
        let block = block(99, RANDAO_REVEAL, GRAFFITI);

        checks(true)
            .check::<Minimal>("proposal", &block)
            .expect_err("middleware does not change the slot");
    }

    #[test_case(false, true;  "direct connection")]
    #[test_case(true,  false; "middleware")]
    fn randao_reveal_differing_in_one_byte(connected_to_middleware: bool, rejected: bool) {
        let mut randao_reveal = RANDAO_REVEAL;
        randao_reveal.0[95] ^= 1;

        let block = block(100, randao_reveal, GRAFFITI);
        let result = checks(connected_to_middleware).check::<Minimal>("proposal", &block);

        assert_eq!(result.is_err(), rejected);
    }

    #[test_case(false, true;  "direct connection")]
    #[test_case(true,  false; "middleware")]
    fn graffiti_differing_in_one_byte(connected_to_middleware: bool, rejected: bool) {
        let mut graffiti = GRAFFITI;
        graffiti.0[0] ^= 1;

        let block = block(100, RANDAO_REVEAL, graffiti);
        let result = checks(connected_to_middleware).check::<Minimal>("proposal", &block);

        assert_eq!(result.is_err(), rejected);
    }

    #[test]
    fn graffiti_is_not_checked_when_not_requested() {
        let block = block(100, RANDAO_REVEAL, H256::ZERO);

        let checks = ProposalChecks {
            graffiti: None,
            ..checks(false)
        };

        assert_eq!(checks.check::<Minimal>("proposal", &block), Ok(()));
    }

    #[test_case(Phase::Deneb,   7, 7, true;  "same index before electra")]
    #[test_case(Phase::Deneb,   7, 0, false; "zero index before electra")]
    #[test_case(Phase::Deneb,   7, 3, false; "other index before electra")]
    #[test_case(Phase::Electra, 7, 7, true;  "same index since electra")]
    #[test_case(Phase::Electra, 7, 0, true;  "zero index since electra")]
    #[test_case(Phase::Electra, 7, 3, false; "other index since electra")]
    fn attestation_data_committee_index(
        phase: Phase,
        requested: u64,
        received: u64,
        accepted: bool,
    ) {
        let data = AttestationData {
            slot: 5,
            index: received,
            ..AttestationData::default()
        };

        assert_eq!(
            check_attestation_data(data, 5, requested, phase).is_ok(),
            accepted,
        );
    }

    #[test]
    fn attestation_data_for_other_slot_is_rejected() {
        let data = AttestationData {
            slot: 6,
            ..AttestationData::default()
        };

        assert_eq!(
            check_attestation_data(data, 5, 0, Phase::Phase0),
            Err(Error::SlotMismatch {
                what: "attestation data",
                requested: 5,
                received: 6,
            }),
        );
    }

    #[test]
    fn aggregate_attestation_must_hash_to_requested_root() -> Result<(), ssz::BitfieldError> {
        let data = AttestationData {
            slot: 9,
            beacon_block_root: H256::repeat_byte(1),
            ..AttestationData::default()
        };

        let attestation = Attestation::<Minimal>::Deneb(Phase0Attestation {
            aggregation_bits: BitList::with_capacity(8)?,
            data,
            signature: SignatureBytes::default(),
        });

        let root = data.tree_hash_root();

        assert_eq!(check_aggregate_attestation(&attestation, 9, 0, root), Ok(()));

        let mut other_root = root;
        other_root.0[31] ^= 1;

        assert_eq!(
            check_aggregate_attestation(&attestation, 9, 0, other_root),
            Err(Error::AttestationDataRootMismatch {
                requested: other_root,
                computed: root,
            }),
        );

        Ok(())
    }

    #[test]
    fn aggregate_attestation_before_electra_must_be_for_requested_committee(
    ) -> Result<(), ssz::BitfieldError> {
        let data = AttestationData {
            slot: 9,
            index: 2,
            ..AttestationData::default()
        };

        let attestation = Attestation::<Minimal>::Capella(Phase0Attestation {
            aggregation_bits: BitList::with_capacity(8)?,
            data,
            signature: SignatureBytes::default(),
        });

        let root = data.tree_hash_root();

        assert_eq!(check_aggregate_attestation(&attestation, 9, 2, root), Ok(()));
        assert_eq!(
            check_aggregate_attestation(&attestation, 9, 5, root),
            Err(Error::CommitteeIndexMismatch {
                what: "aggregate attestation",
                requested: 5,
                received: 2,
            }),
        );

        Ok(())
    }

    #[test_case(&[3],    3, true;  "requested committee")]
    #[test_case(&[1],    3, false; "other committee")]
    #[test_case(&[],     3, false; "no committee")]
    #[test_case(&[1, 3], 3, false; "several committees")]
    fn electra_aggregate_committee_bits(
        set_bits: &[usize],
        requested: CommitteeIndex,
        accepted: bool,
    ) -> Result<(), ssz::BitfieldError> {
        let data = AttestationData {
            slot: 9,
            ..AttestationData::default()
        };

        let mut committee_bits = BitVector::new();

        for index in set_bits {
            committee_bits.set(*index, true)?;
        }

        let attestation = Attestation::<Minimal>::Electra(ElectraAttestation {
            aggregation_bits: BitList::with_capacity(8)?,
            data,
            signature: SignatureBytes::default(),
            committee_bits,
        });

        let result = check_aggregate_attestation(&attestation, 9, requested, data.tree_hash_root());

        if accepted {
            assert_eq!(result, Ok(()));
        } else {
            assert_eq!(
                result,
                Err(Error::CommitteeBitsMismatch {
                    requested,
                    received: set_bits.to_vec(),
                }),
            );
        }

        Ok(())
    }
}
