use enum_iterator::Sequence;
use serde_with::{DeserializeFromStr, SerializeDisplay};
use strum::{AsRefStr, Display, EnumString};

/// A consensus fork.
///
/// The string form is the one used in `Eth-Consensus-Version` headers and `version` fields.
/// Parsing is case-insensitive because nodes disagree on capitalization.
#[derive(
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Debug,
    Sequence,
    AsRefStr,
    Display,
    EnumString,
    DeserializeFromStr,
    SerializeDisplay,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Phase {
    Phase0,
    Altair,
    Bellatrix,
    Capella,
    Deneb,
    Electra,
    Fulu,
    Gloas,
}

impl Phase {
    #[must_use]
    pub fn is_post_electra(self) -> bool {
        self >= Self::Electra
    }
}
