//! Sample to chunk box (`stsc`).
//!
//! Location: `moov/trak[multiple]/mdia/minf/stbl/stsc`
//!
//! See:
//! - Sample to chunk atom: <https://developer.apple.com/documentation/quicktime-file-format/sample-to-chunk_atom>
//! - Sample to chunk table: <https://developer.apple.com/documentation/quicktime-file-format/sample-to-chunk_atom/sample-to-chunk_table>

use binrw::BinRead;

/// One entry in the sample-to-chunk table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, BinRead)]
#[br(big)]
pub struct SampleToChunk {
    /// 1-based index of first chunk
    /// that contains the number of
    /// samples specified in `samples_per_chunk`.
    /// The following chunks will all contain the
    /// same number of samples until the next
    /// sample to chunk entry.
    pub(crate) first_chunk: u32,
    /// Number of samples for chunk number
    /// specified by `first_chunk` and on,
    /// until the next sample to chunk entry.
    pub(crate) samples_per_chunk: u32,
    pub(crate) sample_description_id: u32,
}

impl SampleToChunk {
    pub fn first_chunk(&self) -> u32 {
        self.first_chunk
    }

    pub fn samples_per_chunk(&self) -> u32 {
        self.samples_per_chunk
    }

    pub fn sample_description_id(&self) -> u32 {
        self.sample_description_id
    }
}

/// Sample to chunk box (`stsc`).
#[derive(Debug, Default, BinRead)]
#[br(big)]
pub struct Stsc {
    _version: u8,
    _flags: [u8; 3],
    pub(crate) no_of_entries: u32,
    #[br(count = no_of_entries)]
    pub(crate) sample_to_chunk_table: Vec<SampleToChunk>,
}

impl Stsc {
    pub(crate) const MIN_SIZE: i64 = 8;

    pub fn table(&self) -> &[SampleToChunk] {
        &self.sample_to_chunk_table
    }

    pub(crate) fn into_table(self) -> Vec<SampleToChunk> {
        self.sample_to_chunk_table
    }
}

/// Returns number of samples for the specified chunk.
///
/// > Important: The `first_chunk` field in an `stsc`
/// > box starts on 1,
/// > so `chunk_index` is also a 1-based index,
/// > exactly as the MP4 specification states.
pub(crate) fn samples_per_chunk(table: &[SampleToChunk], chunk_index: usize) -> Option<u32> {
    // Return early if only one entry, since this entry
    // is true for the entire track...
    if table.len() == 1 {
        return table.first().map(|stc| stc.samples_per_chunk);
    }

    let mut no_of_smp = None;

    // Each entry applies from its 'first_chunk' until the next
    // entry's 'first_chunk'. This only checks up until the
    // second to last entry.
    for s2chunks in table.windows(2) {
        let s2c1 = &s2chunks[0];
        let s2c2 = &s2chunks[1];

        if (s2c1.first_chunk as usize .. s2c2.first_chunk as usize).contains(&chunk_index) {
            no_of_smp = Some(s2c1.samples_per_chunk);
        }
    }

    // The last entry stretches to the end of the chunk list.
    if no_of_smp.is_none() {
        if let Some(last) = table.last() {
            if chunk_index >= last.first_chunk as usize {
                no_of_smp = Some(last.samples_per_chunk);
            }
        }
    }

    no_of_smp
}
