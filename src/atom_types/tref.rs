//! Track reference box (`tref`).
//!
//! Location: `moov/trak[multiple]/tref`
//!
//! Holds nested reference-type entries. Only the first entry
//! and its first referenced track ID are read; any further
//! references are ignored.

use binrw::BinRead;

use crate::FourCC;

/// Track reference box (`tref`).
///
/// Location: `moov/trak[multiple]/tref`
#[derive(Debug, Default, BinRead)]
#[br(big)]
pub struct Tref {
    /// Size of the nested reference-type entry.
    _size: u32,
    /// Reference type, e.g. `hint` or `cdsc`.
    pub(crate) reference_type: FourCC,
    /// First referenced track ID.
    pub(crate) track_id: u32,
}

impl Tref {
    pub(crate) const MIN_SIZE: i64 = 12;

    pub fn reference_type(&self) -> FourCC {
        self.reference_type
    }

    pub fn track_id(&self) -> u32 {
        self.track_id
    }
}
