//! Per-sample information derived on demand from the
//! track's sample tables, and the bulk table expansion.

use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::{atom_types::samples_per_chunk, Mp4Error};

use super::Track;

/// Sample byte location and timing, derived from the
/// `stsc`/`stco`/`stsz`/`stts`/`stss` tables.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SampleInfo {
    /// Absolute file offset of the sample's first byte.
    pub offset: u64,
    /// Sample size in bytes.
    pub size: u32,
    /// Decode timestamp in the track's media time scale.
    pub decode_time: u64,
    /// Whether the sample is a random-access point.
    pub sync: bool,
}

impl Track {
    /// Materializes the joined sample table for the whole track,
    /// expanding chunk offsets to per-sample offsets in parallel
    /// over chunks.
    pub fn sample_table(&self) -> Result<Vec<SampleInfo>, Mp4Error> {
        let stsc = self
            .sample_to_chunk
            .as_ref()
            .ok_or(Mp4Error::MissingSampleTable("stsc"))?;
        let offsets = self
            .chunk_offsets
            .as_ref()
            .ok_or(Mp4Error::MissingSampleTable("stco"))?;
        let sizes = self
            .sample_sizes
            .as_ref()
            .ok_or(Mp4Error::MissingSampleTable("stsz"))?;
        let stts = self
            .time_to_sample
            .as_ref()
            .ok_or(Mp4Error::MissingSampleTable("stts"))?;

        // One span per chunk:
        // (chunk offset, index of the chunk's first sample, samples in chunk).
        let mut spans: Vec<(u64, usize, usize)> = Vec::with_capacity(offsets.len());
        let mut first = 0_usize;
        for (i, offset) in offsets.iter().enumerate() {
            // 1-based chunk index, as the stsc table states.
            let count = samples_per_chunk(stsc, i + 1).unwrap_or(0) as usize;
            spans.push((*offset, first, count));
            first += count;
        }
        if first > sizes.len() {
            return Err(Mp4Error::ReadMismatch {
                got: first as u64,
                expected: sizes.len() as u64,
            });
        }

        // Per-sample offsets, chunk by chunk.
        let sample_offsets: Vec<u64> = spans
            .into_par_iter()
            .map(|(offset, first, count)| {
                let mut delta = 0_u64;
                sizes[first..first + count]
                    .iter()
                    .map(|size| {
                        let position = offset + delta;
                        delta += *size as u64;
                        position
                    })
                    .collect::<Vec<u64>>()
            })
            .collect::<Vec<_>>()
            .into_iter()
            .flatten()
            .collect();

        // Prefix-sum the run-length durations into decode timestamps.
        let mut durations = stts
            .iter()
            .flat_map(|t| std::iter::repeat(t.sample_duration()).take(t.sample_count() as usize));

        let mut table = Vec::with_capacity(sample_offsets.len());
        let mut decode_time = 0_u64;
        for (i, offset) in sample_offsets.iter().enumerate() {
            let duration = durations.next().unwrap_or(0);
            table.push(SampleInfo {
                offset: *offset,
                size: sizes[i],
                decode_time,
                sync: self.is_sync_sample(i as u32),
            });
            decode_time += duration as u64;
        }

        Ok(table)
    }
}
