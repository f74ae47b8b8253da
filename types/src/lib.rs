//! Consensus containers for every fork the beacon API client understands.
//!
//! Containers are laid out per fork. Types that are unchanged from an earlier fork are reexported
//! rather than redefined. [`combined`] contains the fork-tagged unions that API responses decode
//! into.

pub mod combined;
pub mod nonstandard;
pub mod preset;
pub mod redacting_url;
pub mod traits;

pub mod phase0 {
    pub mod consts;
    pub mod containers;
    pub mod primitives;
}

pub mod altair {
    pub mod containers;
}

pub mod bellatrix {
    pub mod containers;
    pub mod primitives;
}

pub mod capella {
    pub mod containers;
}

pub mod deneb {
    pub mod containers;
    pub mod primitives;
}

pub mod electra {
    pub mod containers;
}

pub mod fulu {
    pub mod containers;
}

pub mod gloas {
    pub mod containers;
}

mod fixed_bytes;
