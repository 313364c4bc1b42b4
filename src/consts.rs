//! Main "container" boxes, i.e. boxes that contain more boxes,
//! and the MP4 time epoch.
//!
//! `meta` and `ilst` also nest further boxes, but need
//! context-dependent handling (see the tree parser) and are
//! deliberately not listed here.

use time::{self, Month, PrimitiveDateTime};

use crate::fourcc::{self, FourCC};

/// FourCC:s for known "container" boxes.
/// If the box is a "container",
/// it's nested and contains more boxes,
/// within its specified, total size.
/// - `moov`: offset tables, timing, metadata
/// - `trak`: moov.trak
/// - `mdia`: moov.trak.mdia
/// - `minf`: moov.trak.mdia.minf
/// - `dinf`: moov.trak.mdia.minf.dinf
/// - `stbl`: moov.trak.mdia.minf.stbl, contains timing (stts), offsets (stco)
/// - `udta`: moov.udta
pub const CONTAINER: [FourCC; 7] = [
    fourcc::MOOV,
    fourcc::TRAK,
    fourcc::MDIA,
    fourcc::MINF,
    fourcc::DINF,
    fourcc::STBL,
    fourcc::UDTA,
];

/// Time zero for MP4 containers. January 1, 1904.
pub fn mp4_time_zero() -> PrimitiveDateTime {
    time::Date::from_calendar_date(1904, Month::January, 1).unwrap()
        .with_hms_milli(0, 0, 0, 0).unwrap()
}
