//! Type-specific payload parsers, one per supported box type.
//!
//! Fixed-layout payloads derive `BinRead`; payloads whose
//! layout depends on context (`stsd`, `avcC`, `data`) walk
//! their bounded cursor by hand.

mod avcc;
mod co64;
mod ftyp;
mod hdlr;
mod hmhd;
mod mdhd;
pub(crate) mod meta;
mod mvhd;
mod nmhd;
mod smhd;
mod stco;
mod stsc;
mod stsd;
mod stss;
mod stsz;
mod stts;
mod tkhd;
mod tref;
pub(crate) mod udta;
mod vmhd;

pub use avcc::AvcConfiguration;
pub use co64::Co64;
pub use ftyp::Ftyp;
pub use hdlr::Hdlr;
pub use hmhd::Hmhd;
pub use mdhd::Mdhd;
pub use mvhd::Mvhd;
pub use nmhd::Nmhd;
pub use smhd::Smhd;
pub use stco::Stco;
pub use stsc::{SampleToChunk, Stsc};
pub use stsd::{AudioEntry, MetadataEntry, SampleEntry, Stsd, VideoEntry};
pub use stss::Stss;
pub use stsz::Stsz;
pub use stts::{Stts, TimeToSample};
pub use tkhd::Tkhd;
pub use tref::Tref;
pub use vmhd::Vmhd;

pub(crate) use stsc::samples_per_chunk;
