//! Core demux session and query surface.
//!
//! `Demux::open()` parses the whole box tree in a single pass.
//! The post-parse state is read-only; samples and cover art can
//! be read back through the session's reader on demand.
//!
//! ```rs
//! use mp4demux::Demux;
//! use std::path::Path;
//!
//! fn main() -> Result<(), mp4demux::Mp4Error> {
//!     let mut demux = Demux::open(Path::new("VIDEO.MP4"))?;
//!
//!     println!("{}", demux.major_brand());
//!     println!("{:?}", demux.duration());
//!
//!     for track in demux.tracks() {
//!         println!("{} {:?} {} samples", track.id(), track.kind(), track.sample_count());
//!     }
//!
//!     // Random access by index
//!     let info = demux.sample_info(0, 12)?;
//!     println!("{} bytes @ {:#x}", info.size, info.offset);
//!
//!     // Nearest preceding random-access point for a timestamp
//!     let sync = demux.track(0)?.seek_prev_sync(90_000)?;
//!     println!("sync sample {sync}");
//!
//!     Ok(())
//! }
//! ```

use std::{
    fs::File,
    io::{BufReader, Read, Seek, SeekFrom},
    path::Path,
};

use time::{Duration, PrimitiveDateTime};

use crate::{
    atom::{BoxTree, TreeParser},
    metadata::Metadata,
    mp4_time_zero,
    reader::Mp4Reader,
    track::{SampleInfo, Track},
    FourCC, Mp4Error,
};

/// Everything the single parse pass collects:
/// file metadata, the track list, and the metadata stores.
#[derive(Debug, Default)]
pub(crate) struct DemuxState {
    pub(crate) file_size: u64,
    pub(crate) major_brand: FourCC,
    pub(crate) minor_version: u32,
    pub(crate) compatible_brands: Vec<FourCC>,
    /// Movie time scale from `mvhd`.
    pub(crate) time_scale: u32,
    /// Unscaled movie duration from `mvhd`.
    pub(crate) duration: u64,
    /// Seconds since midnight, 1904-01-01 UTC, from `mvhd`.
    pub(crate) creation_time: u64,
    /// Seconds since midnight, 1904-01-01 UTC, from `mvhd`.
    pub(crate) modification_time: u64,
    pub(crate) tracks: Vec<Track>,
    pub(crate) metadata: Metadata,
}

/// A read-only MP4 demux session over a seekable byte source.
///
/// Owns its reader, the parsed box tree, the track list, and
/// all metadata. Opening either fully succeeds or fails with
/// the first parse error; no partial session is returned.
#[derive(Debug)]
pub struct Demux<R> {
    reader: Mp4Reader<R>,
    tree: BoxTree,
    state: DemuxState,
}

impl Demux<BufReader<File>> {
    /// Opens and parses an MP4 file.
    ///
    /// `Demux::open()` uses the default buffer size for the
    /// underlying `BufReader`, use `Demux::open_with_capacity()`
    /// for custom buffer sizes.
    pub fn open(path: &Path) -> Result<Self, Mp4Error> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Opens and parses an MP4 file with a custom buffer size
    /// for the underlying `BufReader`.
    pub fn open_with_capacity(path: &Path, capacity: usize) -> Result<Self, Mp4Error> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::with_capacity(capacity, file))
    }
}

impl<R: Read + Seek> Demux<R> {
    /// Parses an MP4 from any seekable byte source,
    /// e.g. an in-memory `Cursor<Vec<u8>>`.
    pub fn from_reader(reader: R) -> Result<Self, Mp4Error> {
        let mut reader = Mp4Reader::new(reader)?;
        let mut tree = BoxTree::default();
        let mut state = DemuxState {
            file_size: reader.len(),
            ..Default::default()
        };

        TreeParser {
            reader: &mut reader,
            tree: &mut tree,
            state: &mut state,
        }
        .parse()?;

        Ok(Self {
            reader,
            tree,
            state,
        })
    }

    /// Total source size in bytes.
    pub fn file_size(&self) -> u64 {
        self.state.file_size
    }

    /// Major brand from `ftyp`, e.g. `isom`.
    pub fn major_brand(&self) -> FourCC {
        self.state.major_brand
    }

    /// Minor version from `ftyp`.
    pub fn minor_version(&self) -> u32 {
        self.state.minor_version
    }

    /// Compatible brands from `ftyp`.
    pub fn compatible_brands(&self) -> &[FourCC] {
        &self.state.compatible_brands
    }

    /// Movie time scale from `mvhd`.
    pub fn time_scale(&self) -> u32 {
        self.state.time_scale
    }

    /// Unscaled movie duration from `mvhd`,
    /// i.e. the duration of the longest track.
    pub fn duration_unscaled(&self) -> u64 {
        self.state.duration
    }

    /// Duration of the longest track in seconds.
    pub fn duration(&self) -> Duration {
        Duration::seconds_f64(self.state.duration as f64 / self.state.time_scale.max(1) as f64)
    }

    /// Returns creation time of the MP4.
    ///
    /// Derived from the `mvhd` box. May default to the MP4
    /// epoch `1904-01-01 00:00:00` depending on device and
    /// clock settings.
    pub fn creation_time(&self) -> PrimitiveDateTime {
        mp4_time_zero() + Duration::seconds(self.state.creation_time as i64)
    }

    /// Returns modification time of the MP4.
    pub fn modification_time(&self) -> PrimitiveDateTime {
        mp4_time_zero() + Duration::seconds(self.state.modification_time as i64)
    }

    pub fn track_count(&self) -> u32 {
        self.state.tracks.len() as u32
    }

    /// All tracks, in encounter order.
    pub fn tracks(&self) -> &[Track] {
        &self.state.tracks
    }

    /// Track by 0-based index.
    pub fn track(&self, index: u32) -> Result<&Track, Mp4Error> {
        self.state
            .tracks
            .get(index as usize)
            .ok_or(Mp4Error::NoSuchTrack(index))
    }

    /// Track by its `tkhd` track ID.
    pub fn track_by_id(&self, id: u32) -> Option<&Track> {
        self.state.tracks.iter().find(|t| t.id() == id)
    }

    /// Returns (offset, size, decode timestamp, sync flag) for
    /// the sample with specified 0-based index on specified track.
    pub fn sample_info(&self, track_index: u32, sample_index: u32) -> Result<SampleInfo, Mp4Error> {
        self.track(track_index)?.sample_info(sample_index)
    }

    /// Returns the sample on specified track whose decode
    /// timestamp is at or before `time` (in the track's media
    /// time scale) and which is a sync sample.
    pub fn seek_prev_sync(&self, track_index: u32, time: u64) -> Result<u32, Mp4Error> {
        self.track(track_index)?.seek_prev_sync(time)
    }

    /// Metadata stores: `udta` tags, `meta`/`keys` entries,
    /// cover art, and location.
    pub fn metadata(&self) -> &Metadata {
        &self.state.metadata
    }

    /// The parsed box tree.
    pub fn tree(&self) -> &BoxTree {
        &self.tree
    }

    /// Reads the raw bytes of a sample through the
    /// session's reader.
    pub fn read_sample(
        &mut self,
        track_index: u32,
        sample_index: u32,
    ) -> Result<Vec<u8>, Mp4Error> {
        let info = self.track(track_index)?.sample_info(sample_index)?;
        if info.offset + info.size as u64 > self.state.file_size {
            return Err(Mp4Error::ReadMismatch {
                got: info.offset + info.size as u64,
                expected: self.state.file_size,
            });
        }
        self.reader.seek(SeekFrom::Start(info.offset))?;
        self.reader.read_bytes(info.size as usize)
    }

    /// Reads the recorded cover art bytes, preferring the
    /// `udta` slot over the `meta` slot. `None` when the file
    /// carries no cover art.
    pub fn read_cover_art(&mut self) -> Result<Option<Vec<u8>>, Mp4Error> {
        let cover = match self.state.metadata.cover() {
            Some(c) => *c,
            None => return Ok(None),
        };
        self.reader.seek(SeekFrom::Start(cover.offset))?;
        Ok(Some(self.reader.read_bytes(cover.size as usize)?))
    }
}
