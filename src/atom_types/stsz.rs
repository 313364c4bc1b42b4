//! Sample size box (`stsz`).
//!
//! Location: `moov/trak[multiple]/mdia/minf/stbl/stsz`
//!
//! Note that `stsz` lists sample size not chunk size.
//! `stco` or `co64` list chunk offsets, not offsets to individual samples.
//!
//! See: <https://developer.apple.com/documentation/quicktime-file-format/sample_size_atom>

use binrw::BinRead;

/// Sample size box (`stsz`).
///
/// Location: `moov/trak[multiple]/mdia/minf/stbl/stsz`
///
/// See: <https://developer.apple.com/documentation/quicktime-file-format/sample_size_atom>
#[derive(Debug, Default, BinRead)]
#[br(big)]
pub struct Stsz {
    _version: u8,
    _flags: [u8; 3],
    /// Sample size.
    /// If 0, `sample_count` per-sample `u32` values follow,
    /// else all samples have this size.
    pub(crate) sample_size: u32,
    pub(crate) sample_count: u32,
    #[br(count = sample_count)]
    #[br(if(sample_size == 0, vec![sample_size; sample_count as usize]))]
    pub(crate) sizes: Vec<u32>,
}

impl Stsz {
    pub(crate) const MIN_SIZE: i64 = 12;

    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    pub fn sample_size(&self) -> u32 {
        self.sample_size
    }

    pub fn sample_count(&self) -> u32 {
        self.sample_count
    }

    /// Returns discrete list of sample sizes in bytes.
    pub fn sizes(&self) -> &[u32] {
        &self.sizes
    }
}
