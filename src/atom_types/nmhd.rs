//! Null media header box (`nmhd`).
//!
//! Location: `moov/trak[multiple]/mdia/minf/nmhd`
//!
//! Carries no fields beyond version and flags. Used by
//! streams other than video, audio, and hints, e.g. timed
//! metadata tracks.

use binrw::BinRead;

/// Null media header box (`nmhd`).
///
/// Location: `moov/trak[multiple]/mdia/minf/nmhd`
#[derive(Debug, Default, BinRead)]
#[br(big)]
pub struct Nmhd {
    _version: u8,
    _flags: [u8; 3],
}

impl Nmhd {
    pub(crate) const MIN_SIZE: i64 = 4;
}
