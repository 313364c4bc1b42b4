//! Media header box (`mdhd`).
//!
//! Similar to `mvhd`,
//! but only describes a single track (`trak`).
//! Specifies the characteristics of a media (`mdia`),
//! including time scale and duration.
//!
//! Location: `moov/trak[multiple]/mdia/mdhd`
//!
//! See: <https://developer.apple.com/documentation/quicktime-file-format/media_header_atom>

use binrw::BinRead;
use time::Duration;

use crate::support::versioned_u64;

/// Media header box (`mdhd`). One per track (`trak`).
/// Specifies the characteristics of a media (`mdia`), including time scale and duration.
///
/// Version 1 stores 64-bit times and duration,
/// version 0 stores 32-bit values.
///
/// Path: `moov/trak[multiple]/mdia/mdhd`
///
/// See: <https://developer.apple.com/documentation/quicktime-file-format/media_header_atom>
#[derive(Debug, Default, BinRead)]
#[br(big)]
pub struct Mdhd {
    pub(crate) version: u8,
    _flags: [u8; 3],
    /// Seconds since midnight, 1904-01-01 UTC.
    #[br(parse_with = versioned_u64, args(version == 1))]
    pub(crate) creation_time: u64,
    /// Seconds since midnight, 1904-01-01 UTC.
    #[br(parse_with = versioned_u64, args(version == 1))]
    pub(crate) modification_time: u64,
    pub(crate) time_scale: u32,
    /// Unscaled duration. I.e. "ticks"
    /// that require dividing by time scale
    /// to derive a value in seconds.
    #[br(parse_with = versioned_u64, args(version == 1))]
    pub(crate) duration: u64,
    /// ISO 639-2/T language code, packed as
    /// 1 pad bit then three 5-bit values offset by 0x60.
    #[br(map = |data: u16| derive_language_code(data))]
    pub(crate) language: String,
    pub(crate) quality: u16,
}

impl Mdhd {
    pub(crate) const MIN_SIZE_V0: i64 = 24;
    pub(crate) const MIN_SIZE_V1: i64 = 36;

    pub(crate) fn min_size(version: u8) -> i64 {
        match version {
            1 => Self::MIN_SIZE_V1,
            _ => Self::MIN_SIZE_V0,
        }
    }

    pub fn creation_time(&self) -> u64 {
        self.creation_time
    }

    pub fn modification_time(&self) -> u64 {
        self.modification_time
    }

    pub fn time_scale(&self) -> u32 {
        self.time_scale
    }

    pub fn duration_unscaled(&self) -> u64 {
        self.duration
    }

    /// ISO-639-2/T language code
    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn quality(&self) -> u16 {
        self.quality
    }

    /// Duration of this track in seconds.
    pub fn duration(&self) -> Duration {
        Duration::seconds_f64(self.duration as f64 / self.time_scale.max(1) as f64)
    }
}

/// Derive three letter ISO639-2/T language code.
///
/// Packed in 16 bits `X u5 u5 u5`:
/// - most significant bit is padding (BE so left most)
/// - 3 x `u5` + `0x60`
pub(crate) fn derive_language_code(data: u16) -> String {
    [
        // value between 0-31 + 96 = ascii range so casting to u8 is ok
        (((0b0111_1100_0000_0000 & data) >> 10) as u8 + 0x60) as char,
        (((0b0000_0011_1110_0000 & data) >> 5) as u8 + 0x60) as char,
        ((0b0000_0000_0001_1111 & data) as u8 + 0x60) as char
    ]
    .iter()
    .collect()
}
