use parse_display::{Display, FromStr};
use types::phase0::primitives::{Slot, H256};

/// Identifies a block in paths like `/eth/v2/beacon/blocks/{block_id}`.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Display, FromStr)]
#[display(style = "lowercase")]
pub enum BlockId {
    Head,
    Genesis,
    Finalized,
    Justified,
    #[display("{0}")]
    Slot(Slot),
    #[display("{0:?}")]
    Root(H256),
}
