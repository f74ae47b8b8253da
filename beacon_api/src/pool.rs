use derive_more::From;
use serde::Serialize;
use types::{
    electra::containers::SingleAttestation, nonstandard::Phase,
    phase0::containers::Attestation as Phase0Attestation, preset::Preset,
};

use crate::error::Error;

/// Attestations submitted to `/eth/v2/beacon/pool/attestations`.
///
/// Nodes accept unaggregated [`Phase0Attestation`]s before Electra and [`SingleAttestation`]s
/// from Electra on.
#[derive(Clone, PartialEq, Eq, Debug, From, Serialize)]
#[serde(bound = "", untagged)]
pub enum PoolAttestations<P: Preset> {
    Phase0(Vec<Phase0Attestation<P>>),
    Single(Vec<SingleAttestation>),
}

impl<P: Preset> PoolAttestations<P> {
    #[must_use]
    pub const fn shape(&self) -> &'static str {
        match self {
            Self::Phase0(_) => "phase0 attestation",
            Self::Single(_) => "single attestation",
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Phase0(attestations) => attestations.len(),
            Self::Single(attestations) => attestations.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn check_phase(&self, phase: Phase) -> Result<(), Error> {
        let expects_single = phase.is_post_electra();

        if matches!(self, Self::Single(_)) == expects_single {
            return Ok(());
        }

        Err(Error::AttestationShapeMismatch {
            shape: self.shape(),
            phase,
        })
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;
    use types::preset::Minimal;

    use super::*;

    #[test_case(Phase::Phase0,  false, true)]
    #[test_case(Phase::Deneb,   false, true)]
    #[test_case(Phase::Deneb,   true,  false)]
    #[test_case(Phase::Electra, true,  true)]
    #[test_case(Phase::Electra, false, false)]
    #[test_case(Phase::Gloas,   true,  true)]
    fn shape_must_match_phase(phase: Phase, single: bool, accepted: bool) {
        let attestations = if single {
            PoolAttestations::<Minimal>::Single(vec![])
        } else {
            PoolAttestations::<Minimal>::Phase0(vec![])
        };

        assert_eq!(attestations.check_phase(phase).is_ok(), accepted);
    }

    #[test]
    fn single_attestations_serialize_as_array() -> serde_json::Result<()> {
        let attestations = PoolAttestations::<Minimal>::from(vec![SingleAttestation {
            committee_index: 2,
            attester_index: 7,
            ..SingleAttestation::default()
        }]);

        let value = serde_json::to_value(&attestations)?;

        assert_eq!(value[0]["committee_index"], "2");
        assert_eq!(value[0]["attester_index"], "7");

        Ok(())
    }
}
