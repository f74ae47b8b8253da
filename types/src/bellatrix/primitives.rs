use ssz_types::VariableList;

use crate::preset::Preset;

pub type Gas = u64;
pub type Transaction<P> = VariableList<u8, <P as Preset>::MaxBytesPerTransaction>;
