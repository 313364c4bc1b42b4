//! File type compatibility box (`ftyp`).
//!
//! Location: `ftyp` (the very first box in an MP4 file)
//!
//! See: <https://developer.apple.com/documentation/quicktime-file-format/file_type_compatibility_atom>

use binrw::BinRead;

use crate::FourCC;

/// File type compatibility box (`ftyp`).
///
/// Location: `ftyp` (the very first box in an MP4 file)
///
/// See: <https://developer.apple.com/documentation/quicktime-file-format/file_type_compatibility_atom>
#[derive(Debug, Default, BinRead)]
#[br(big, import {data_size: u32})]
pub struct Ftyp {
    pub(crate) major_brand: FourCC,
    /// MP4: seems to be set to 0.
    /// QuickTime: Four binary-coded decimal values, indicating the century, year, and month of format spec.
    pub(crate) minor_version: u32,
    /// Variable-length list consuming the remainder of the box.
    #[br(count = data_size.saturating_sub(8) / 4)]
    pub(crate) compatible_brands: Vec<FourCC>,
}

impl Ftyp {
    pub(crate) const MIN_SIZE: i64 = 8;

    pub fn major_brand(&self) -> FourCC {
        self.major_brand
    }

    pub fn minor_version(&self) -> u32 {
        self.minor_version
    }

    pub fn compatible_brands(&self) -> &[FourCC] {
        &self.compatible_brands
    }
}
