//! Hint media information header box (`hmhd`).
//!
//! Location: `moov/trak[multiple]/mdia/minf/hmhd`

use binrw::BinRead;

/// Hint media information header box (`hmhd`).
///
/// Location: `moov/trak[multiple]/mdia/minf/hmhd`
#[derive(Debug, Default, BinRead)]
#[br(big)]
pub struct Hmhd {
    _version: u8,
    _flags: [u8; 3],
    pub(crate) max_pdu_size: u16,
    pub(crate) avg_pdu_size: u16,
    pub(crate) max_bitrate: u32,
    pub(crate) avg_bitrate: u32,
    _reserved: u32,
}

impl Hmhd {
    pub(crate) const MIN_SIZE: i64 = 20;

    pub fn max_pdu_size(&self) -> u16 {
        self.max_pdu_size
    }

    pub fn avg_pdu_size(&self) -> u16 {
        self.avg_pdu_size
    }

    pub fn max_bitrate(&self) -> u32 {
        self.max_bitrate
    }

    pub fn avg_bitrate(&self) -> u32 {
        self.avg_bitrate
    }
}
