//! An MP4 track: one record per `trak` box, owning the
//! five sample tables and the codec configuration parsed
//! from its subtree.

use time::{Duration, PrimitiveDateTime};

use crate::{
    atom_types::{AvcConfiguration, SampleToChunk, TimeToSample},
    fourcc,
    mp4_time_zero,
    FourCC, Mp4Error,
};

use super::SampleInfo;

/// Track handler type, from the `hdlr` box under `mdia`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum TrackKind {
    Video,
    Audio,
    Hint,
    Metadata,
    Text,
    #[default]
    Unknown,
}

impl From<FourCC> for TrackKind {
    fn from(value: FourCC) -> Self {
        match value {
            fourcc::VIDE => Self::Video,
            fourcc::SOUN => Self::Audio,
            fourcc::HINT => Self::Hint,
            fourcc::META => Self::Metadata,
            fourcc::TEXT => Self::Text,
            _ => Self::Unknown,
        }
    }
}

/// Video codec of a track, from the codec-specific
/// box nested in the sample description.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum VideoCodec {
    Avc,
    #[default]
    Unknown,
}

/// Track reference from the `tref` box: the reference type
/// and the first referenced track ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackReference {
    pub(crate) kind: FourCC,
    pub(crate) track_id: u32,
}

impl TrackReference {
    pub fn kind(&self) -> FourCC {
        self.kind
    }

    pub fn track_id(&self) -> u32 {
        self.track_id
    }
}

/// One record per `trak` box. Created empty when the parser
/// encounters `trak`, mutated as descendant boxes are parsed.
#[derive(Debug, Default)]
pub struct Track {
    /// Track ID from `tkhd`.
    pub(crate) id: u32,
    /// Handler type from `hdlr`.
    pub(crate) kind: TrackKind,
    /// Media time scale from `mdhd`.
    pub(crate) time_scale: u32,
    /// Unscaled media duration from `mdhd`.
    pub(crate) duration: u64,
    /// Duration in the movie time scale from `tkhd`.
    pub(crate) duration_movie: u64,
    /// Seconds since midnight, 1904-01-01 UTC, from `mdhd`.
    pub(crate) creation_time: u64,
    /// Seconds since midnight, 1904-01-01 UTC, from `mdhd`.
    pub(crate) modification_time: u64,
    /// ISO-639-2/T language code from `mdhd`.
    pub(crate) language: String,
    /// Reference type and target from `tref`.
    pub(crate) reference: Option<TrackReference>,
    /// Video codec from the sample description.
    pub(crate) video_codec: VideoCodec,
    /// AVC decoder configuration from `avcC`.
    pub(crate) avc: Option<AvcConfiguration>,
    /// Video width in pixels from the sample description.
    pub(crate) width: u16,
    /// Video height in pixels from the sample description.
    pub(crate) height: u16,
    pub(crate) audio_channel_count: u16,
    pub(crate) audio_sample_size: u16,
    /// 16.16 fixed-point audio sample rate, stored raw.
    pub(crate) audio_sample_rate: u32,
    /// Content encoding for metadata-type tracks.
    pub(crate) metadata_content_encoding: Option<String>,
    /// MIME format for metadata-type tracks.
    pub(crate) metadata_mime_format: Option<String>,
    /// Number of samples, from `stsz`.
    pub(crate) sample_count: u32,
    /// Time-to-sample run-length table (`stts`).
    pub(crate) time_to_sample: Option<Vec<TimeToSample>>,
    /// 1-based sync sample numbers (`stss`).
    /// Absence means every sample is sync.
    pub(crate) sync_samples: Option<Vec<u32>>,
    /// Per-sample sizes in bytes (`stsz`).
    pub(crate) sample_sizes: Option<Vec<u32>>,
    /// Sample-to-chunk run table (`stsc`).
    pub(crate) sample_to_chunk: Option<Vec<SampleToChunk>>,
    /// Absolute chunk offsets (`stco` widened, or `co64`).
    pub(crate) chunk_offsets: Option<Vec<u64>>,
}

impl Track {
    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn kind(&self) -> TrackKind {
        self.kind
    }

    pub fn time_scale(&self) -> u32 {
        self.time_scale
    }

    pub fn duration_unscaled(&self) -> u64 {
        self.duration
    }

    /// Track duration in seconds.
    pub fn duration(&self) -> Duration {
        Duration::seconds_f64(self.duration as f64 / self.time_scale.max(1) as f64)
    }

    /// Creation datetime for this track.
    pub fn creation_time(&self) -> PrimitiveDateTime {
        mp4_time_zero() + Duration::seconds(self.creation_time as i64)
    }

    /// Modification datetime for this track.
    pub fn modification_time(&self) -> PrimitiveDateTime {
        mp4_time_zero() + Duration::seconds(self.modification_time as i64)
    }

    /// ISO-639-2/T language code.
    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn reference(&self) -> Option<&TrackReference> {
        self.reference.as_ref()
    }

    pub fn video_codec(&self) -> VideoCodec {
        self.video_codec
    }

    /// AVC decoder configuration, including the SPS
    /// and PPS blobs, for AVC video tracks.
    pub fn avc(&self) -> Option<&AvcConfiguration> {
        self.avc.as_ref()
    }

    /// Video width in pixels. 0 if not a video track.
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Video height in pixels. 0 if not a video track.
    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn audio_channel_count(&self) -> u16 {
        self.audio_channel_count
    }

    pub fn audio_sample_size(&self) -> u16 {
        self.audio_sample_size
    }

    /// Audio sample rate in Hz.
    pub fn audio_sample_rate(&self) -> f64 {
        self.audio_sample_rate as f64 / 2_u32.pow(16) as f64
    }

    /// 16.16 fixed-point audio sample rate as stored.
    pub fn audio_sample_rate_raw(&self) -> u32 {
        self.audio_sample_rate
    }

    pub fn metadata_content_encoding(&self) -> Option<&str> {
        self.metadata_content_encoding.as_deref()
    }

    pub fn metadata_mime_format(&self) -> Option<&str> {
        self.metadata_mime_format.as_deref()
    }

    pub fn sample_count(&self) -> u32 {
        self.sample_count
    }

    /// 1-based sync sample numbers. `None` means
    /// every sample is a sync sample.
    pub fn sync_sample_table(&self) -> Option<&[u32]> {
        self.sync_samples.as_deref()
    }

    /// Returns `true` if the sample is a random-access point.
    /// Without a sync-sample table every sample is sync.
    pub fn is_sync_sample(&self, index: u32) -> bool {
        match &self.sync_samples {
            None => true,
            Some(table) => table.binary_search(&(index + 1)).is_ok(),
        }
    }

    /// Decode timestamp of the sample in the media time scale,
    /// derived from the time-to-sample run-length table.
    pub fn sample_decode_time(&self, index: u32) -> Result<u64, Mp4Error> {
        let table = self
            .time_to_sample
            .as_ref()
            .ok_or(Mp4Error::MissingSampleTable("stts"))?;

        let mut acc_count: u64 = 0;
        let mut acc_time: u64 = 0;
        for entry in table {
            let count = entry.sample_count as u64;
            if (index as u64) < acc_count + count {
                return Ok(acc_time + (index as u64 - acc_count) * entry.sample_duration as u64);
            }
            acc_count += count;
            acc_time += count * entry.sample_duration as u64;
        }

        Err(Mp4Error::NoSuchSample {
            index,
            count: self.sample_count,
        })
    }

    /// Absolute file offset of the sample, derived by joining
    /// the sample-to-chunk runs with the chunk-offset table and
    /// summing the sizes of preceding samples within the chunk.
    pub fn sample_offset(&self, index: u32) -> Result<u64, Mp4Error> {
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

        let chunk_count = offsets.len() as u64;

        // Samples preceding the current sample-to-chunk run.
        let mut acc: u64 = 0;
        for (i, entry) in stsc.iter().enumerate() {
            // 1-based
            let first = entry.first_chunk as u64;
            if first == 0 || first > chunk_count {
                break;
            }
            let span_chunks = match stsc.get(i + 1) {
                Some(next) => (next.first_chunk as u64).saturating_sub(first),
                None => chunk_count - (first - 1),
            };
            let per_chunk = entry.samples_per_chunk as u64;
            let span_samples = span_chunks * per_chunk;

            if (index as u64) < acc + span_samples {
                let rel = index as u64 - acc;
                let chunk = first - 1 + rel / per_chunk;
                let first_sample_of_chunk = acc + (rel / per_chunk) * per_chunk;

                let chunk_offset = offsets.get(chunk as usize).ok_or(Mp4Error::NoSuchSample {
                    index,
                    count: self.sample_count,
                })?;
                let preceding: u64 = sizes
                    .get(first_sample_of_chunk as usize..index as usize)
                    .ok_or(Mp4Error::NoSuchSample {
                        index,
                        count: self.sample_count,
                    })?
                    .iter()
                    .map(|size| *size as u64)
                    .sum();

                return Ok(chunk_offset + preceding);
            }

            acc += span_samples;
        }

        Err(Mp4Error::NoSuchSample {
            index,
            count: self.sample_count,
        })
    }

    /// Returns (offset, size, decode timestamp, sync flag)
    /// for the sample with specified 0-based index.
    pub fn sample_info(&self, index: u32) -> Result<SampleInfo, Mp4Error> {
        let sizes = self
            .sample_sizes
            .as_ref()
            .ok_or(Mp4Error::MissingSampleTable("stsz"))?;
        let size = *sizes.get(index as usize).ok_or(Mp4Error::NoSuchSample {
            index,
            count: self.sample_count,
        })?;

        Ok(SampleInfo {
            offset: self.sample_offset(index)?,
            size,
            decode_time: self.sample_decode_time(index)?,
            sync: self.is_sync_sample(index),
        })
    }

    /// Returns the sample whose decode timestamp is at or
    /// before `time` (in the media time scale) and which is a
    /// sync sample. Ties break towards the largest index
    /// meeting both conditions.
    pub fn seek_prev_sync(&self, time: u64) -> Result<u32, Mp4Error> {
        let table = self
            .time_to_sample
            .as_ref()
            .ok_or(Mp4Error::MissingSampleTable("stts"))?;

        // Largest sample index with decode time <= `time`.
        let mut acc_count: u64 = 0;
        let mut acc_time: u64 = 0;
        let mut candidate: Option<u64> = None;
        for entry in table {
            let count = entry.sample_count as u64;
            if count == 0 {
                continue;
            }
            let delta = entry.sample_duration as u64;
            if time < acc_time {
                break;
            }
            let within = match delta {
                0 => count - 1,
                d => ((time - acc_time) / d).min(count - 1),
            };
            candidate = Some(acc_count + within);
            acc_count += count;
            acc_time += count * delta;
        }

        let mut candidate = candidate.ok_or(Mp4Error::NoSuchSample {
            index: 0,
            count: self.sample_count,
        })?;
        if self.sample_count > 0 && candidate >= self.sample_count as u64 {
            candidate = self.sample_count as u64 - 1;
        }

        match &self.sync_samples {
            // Absence of the sync table means every sample is sync.
            None => Ok(candidate as u32),
            Some(sync) => {
                // Largest 1-based sync entry at or before the candidate.
                let pos = sync.partition_point(|s| (*s as u64) <= candidate + 1);
                let sample = pos
                    .checked_sub(1)
                    .map(|p| sync[p])
                    .filter(|s| *s > 0)
                    .ok_or(Mp4Error::NoSuchSample {
                        index: candidate as u32,
                        count: self.sample_count,
                    })?;
                Ok(sample - 1)
            }
        }
    }
}
