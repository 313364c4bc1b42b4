//! Sync sample box (`stss`).
//!
//! Location: `moov/trak[multiple]/mdia/minf/stbl/stss`
//!
//! Lists the 1-based sample numbers that are random-access
//! points. A track without an `stss` box has only sync
//! samples.
//!
//! See: <https://developer.apple.com/documentation/quicktime-file-format/sync_sample_atom>

use binrw::BinRead;

/// Sync sample box (`stss`).
///
/// Location: `moov/trak[multiple]/mdia/minf/stbl/stss`
///
/// See: <https://developer.apple.com/documentation/quicktime-file-format/sync_sample_atom>
#[derive(Debug, Default, BinRead)]
#[br(big)]
pub struct Stss {
    _version: u8,
    _flags: [u8; 3],
    pub(crate) no_of_entries: u32,
    /// 1-based sample numbers, in increasing order.
    #[br(count = no_of_entries)]
    pub(crate) sync_sample_table: Vec<u32>,
}

impl Stss {
    pub(crate) const MIN_SIZE: i64 = 8;

    pub fn len(&self) -> usize {
        self.sync_sample_table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sync_sample_table.is_empty()
    }

    pub fn sync_sample_table(&self) -> &[u32] {
        &self.sync_sample_table
    }

    pub(crate) fn into_table(self) -> Vec<u32> {
        self.sync_sample_table
    }
}
