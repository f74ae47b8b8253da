//! Payloads of unversioned endpoints.

use std::collections::BTreeMap;

use enum_iterator::all;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use types::{
    nonstandard::Phase,
    phase0::{
        consts::{FAR_FUTURE_EPOCH, GENESIS_EPOCH},
        containers::SignedBeaconBlockHeader,
        primitives::{Epoch, ExecutionAddress, Slot, UnixSeconds, Version, H256},
    },
    preset::Preset,
};

use crate::error::Error;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Deserialize, Serialize)]
pub struct Genesis {
    #[serde(with = "serde_utils::string_or_native")]
    pub genesis_time: UnixSeconds,
    pub genesis_validators_root: H256,
    pub genesis_fork_version: Version,
}

#[derive(Clone, PartialEq, Eq, Debug, Deserialize, Serialize)]
pub struct NodeVersion {
    pub version: String,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Deserialize, Serialize)]
pub struct DepositContract {
    #[serde(with = "serde_utils::string_or_native")]
    pub chain_id: u64,
    pub address: ExecutionAddress,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Deserialize, Serialize)]
pub struct BlockHeader {
    pub root: H256,
    pub canonical: bool,
    pub header: SignedBeaconBlockHeader,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Deserialize, Serialize)]
pub struct BlockRoot {
    pub root: H256,
}

/// Configuration and preset values reported by `/eth/v1/config/spec`.
///
/// Nodes report values they know of and omit the rest. Values are almost always strings.
/// They are kept as they are and parsed on access.
#[derive(Clone, PartialEq, Eq, Default, Debug, Deserialize, Serialize)]
#[serde(transparent)]
pub struct ChainSpec(BTreeMap<String, Value>);

impl ChainSpec {
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn optional_u64(&self, key: &str) -> Result<Option<u64>, Error> {
        let Some(value) = self.get(key) else {
            return Ok(None);
        };

        let parsed = match value {
            Value::String(string) => string.parse().ok(),
            Value::Number(number) => number.as_u64(),
            _ => None,
        };

        parsed.map(Some).ok_or_else(|| Error::SpecValue {
            key: key.to_owned(),
        })
    }

    pub fn u64(&self, key: &str) -> Result<u64, Error> {
        self.optional_u64(key)?.ok_or_else(|| Error::SpecValue {
            key: key.to_owned(),
        })
    }

    /// Falls back to the compiled preset if the node does not report `SLOTS_PER_EPOCH`.
    pub fn slots_per_epoch<P: Preset>(&self) -> Result<u64, Error> {
        let slots_per_epoch = self
            .optional_u64("SLOTS_PER_EPOCH")?
            .unwrap_or_else(P::slots_per_epoch);

        if slots_per_epoch == 0 {
            return Err(Error::SpecValue {
                key: "SLOTS_PER_EPOCH".to_owned(),
            });
        }

        Ok(slots_per_epoch)
    }

    /// Forks the node does not report are treated as unscheduled.
    pub fn fork_epoch(&self, phase: Phase) -> Result<Epoch, Error> {
        if phase == Phase::Phase0 {
            return Ok(GENESIS_EPOCH);
        }

        let key = format!("{}_FORK_EPOCH", phase.as_ref().to_ascii_uppercase());

        Ok(self.optional_u64(&key)?.unwrap_or(FAR_FUTURE_EPOCH))
    }

    pub fn phase_at_epoch(&self, epoch: Epoch) -> Result<Phase, Error> {
        let mut current = Phase::Phase0;

        for phase in all::<Phase>() {
            if self.fork_epoch(phase)? > epoch {
                break;
            }

            current = phase;
        }

        Ok(current)
    }

    pub fn phase_at_slot<P: Preset>(&self, slot: Slot) -> Result<Phase, Error> {
        self.phase_at_epoch(slot / self.slots_per_epoch::<P>()?)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use test_case::test_case;
    use types::preset::{Mainnet, Minimal};

    use super::*;

    fn spec() -> serde_json::Result<ChainSpec> {
        serde_json::from_value(json!({
            "CONFIG_NAME": "custom",
            "SLOTS_PER_EPOCH": "8",
            "ALTAIR_FORK_EPOCH": "0",
            "BELLATRIX_FORK_EPOCH": "0",
            "CAPELLA_FORK_EPOCH": "2",
            "DENEB_FORK_EPOCH": "3",
            "ELECTRA_FORK_EPOCH": 10,
            "FULU_FORK_EPOCH": "18446744073709551615",
        }))
    }

    #[test_case(0,   Phase::Bellatrix)]
    #[test_case(15,  Phase::Bellatrix)]
    #[test_case(16,  Phase::Capella)]
    #[test_case(24,  Phase::Deneb)]
    #[test_case(79,  Phase::Deneb)]
    #[test_case(80,  Phase::Electra)]
    #[test_case(u64::MAX, Phase::Electra)]
    fn phase_at_slot_follows_fork_epochs(slot: Slot, expected: Phase) -> serde_json::Result<()> {
        assert_eq!(spec()?.phase_at_slot::<Minimal>(slot), Ok(expected));
        Ok(())
    }

    #[test]
    fn missing_slots_per_epoch_falls_back_to_preset() {
        let spec = ChainSpec::default();

        assert_eq!(spec.slots_per_epoch::<Mainnet>(), Ok(32));
        assert_eq!(spec.phase_at_slot::<Mainnet>(1_000_000), Ok(Phase::Phase0));
        assert_eq!(spec.fork_epoch(Phase::Gloas), Ok(FAR_FUTURE_EPOCH));
    }

    #[test]
    fn malformed_value_names_key() -> serde_json::Result<()> {
        let spec = serde_json::from_value::<ChainSpec>(json!({ "DENEB_FORK_EPOCH": "soon" }))?;

        assert_eq!(
            spec.fork_epoch(Phase::Deneb),
            Err(Error::SpecValue {
                key: "DENEB_FORK_EPOCH".to_owned(),
            }),
        );

        Ok(())
    }

    #[test]
    fn required_value_must_be_present() {
        assert_eq!(
            ChainSpec::default().u64("MAX_BLOBS_PER_BLOCK"),
            Err(Error::SpecValue {
                key: "MAX_BLOBS_PER_BLOCK".to_owned(),
            }),
        );
    }

    #[test]
    fn genesis_accepts_quoted_time() -> serde_json::Result<()> {
        let genesis = serde_json::from_value::<Genesis>(json!({
            "genesis_time": "1606824023",
            "genesis_validators_root":
                "0x4b363db94e286120d76eb905340fdd4e54bfe9f06bf33ff6cf5ad27f511bfe95",
            "genesis_fork_version": "0x00000000",
        }))?;

        assert_eq!(genesis.genesis_time, 1_606_824_023);
        assert_eq!(genesis.genesis_fork_version, Version::default());

        Ok(())
    }
}
