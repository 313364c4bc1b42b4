//! Read-only demultiplexer for the ISO Base Media File Format
//! (ISO/IEC 14496-12) and its derivatives (MP4/MOV).
//!
//! Parses the hierarchical box ("atom") tree from a seekable
//! byte source, extracts per-track sample tables, and exposes a
//! query API for tracks, samples, and container-level metadata.
//! Does not and will not support any kind of video de/encoding.
//!
//! The implementation was mostly done with help from
//! <https://developer.apple.com/library/archive/documentation/QuickTime/QTFF/QTFFPreface/qtffPreface.html>
//! and ISO/IEC 14496-12.
//!
//! ```rs
//! use mp4demux::Demux;
//! use std::path::Path;
//!
//! fn main() -> Result<(), mp4demux::Mp4Error> {
//!     let mut demux = Demux::open(Path::new("VIDEO.MP4"))?;
//!
//!     // Container metadata
//!     println!("{} {:?}", demux.major_brand(), demux.duration());
//!
//!     // Tracks and random-access sample lookup
//!     for track in demux.tracks() {
//!         println!("{:?}: {} samples", track.kind(), track.sample_count());
//!     }
//!     println!("{:?}", demux.sample_info(0, 0)?);
//!
//!     Ok(())
//! }
//! ```

pub mod atom;
pub mod atom_types;
pub mod consts;
pub mod demux;
pub mod errors;
pub mod fourcc;
pub mod metadata;
pub mod support;
pub mod track;

// Internal reader
pub(crate) mod reader;

mod tests;

pub use atom::{AtomHeader, BoxNode, BoxTree};
pub use atom_types::{
    AudioEntry,
    AvcConfiguration,
    Co64,
    Ftyp,
    Hdlr,
    Hmhd,
    Mdhd,
    MetadataEntry,
    Mvhd,
    Nmhd,
    SampleEntry,
    SampleToChunk,
    Smhd,
    Stco,
    Stsc,
    Stsd,
    Stss,
    Stsz,
    Stts,
    TimeToSample,
    Tkhd,
    Tref,
    VideoEntry,
    Vmhd,
};
pub use consts::{mp4_time_zero, CONTAINER};
pub use demux::Demux;
pub use errors::Mp4Error;
pub use fourcc::FourCC;
pub use metadata::{CoverArt, CoverType, Location, Metadata, Tag};
pub use track::{SampleInfo, Track, TrackKind, TrackReference, VideoCodec};
