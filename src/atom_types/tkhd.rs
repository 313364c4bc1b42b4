//! Track header box (`tkhd`).
//!
//! Location: `moov/trak[multiple]/tkhd`
//!
//! See: <https://developer.apple.com/documentation/quicktime-file-format/track_header_atom>

use binrw::BinRead;
use time::{Duration, PrimitiveDateTime};

use crate::support::versioned_u64;

/// Track header box (`tkhd`).
///
/// Version 1 stores 64-bit times and duration,
/// version 0 stores 32-bit values.
///
/// Location: `moov/trak[multiple]/tkhd`
///
/// See: <https://developer.apple.com/documentation/quicktime-file-format/track_header_atom>
#[derive(Debug, BinRead)]
#[br(big)]
pub struct Tkhd {
    pub(crate) version: u8,
    _flags: [u8; 3],
    /// Seconds since midnight, 1904-01-01 UTC.
    #[br(parse_with = versioned_u64, args(version == 1))]
    pub(crate) creation_time: u64,
    /// Seconds since midnight, 1904-01-01 UTC.
    #[br(parse_with = versioned_u64, args(version == 1))]
    pub(crate) modification_time: u64,
    /// Uniquely identifies the track.
    /// Value 0 cannot be used.
    pub(crate) track_id: u32,
    _reserved1: [u8; 4],
    /// Duration of this track in the movie's
    /// time coordinate system.
    #[br(parse_with = versioned_u64, args(version == 1))]
    pub(crate) duration: u64,
    _reserved2: [u8; 8],
    /// This track's spatial priority in its movie.
    pub(crate) layer: u16,
    /// Identifies a collection of movie tracks that contain alternate data for one another.
    pub(crate) alternate_group: u16,
    /// 16-bit fixed-point value that indicates how loudly to play this track's sound.
    /// 1.0 indicates normal volume.
    pub(crate) volume: u16,
    _reserved3: [u8; 2],
    /// The matrix structure associated with this track.
    pub(crate) matrix_structure: [u8; 36],
    /// 32-bit fixed-point number
    /// that specifies the width of this track in pixels.
    pub(crate) track_width: u32,
    /// 32-bit fixed-point number
    /// that specifies the height of this track in pixels.
    pub(crate) track_height: u32,
}

impl Tkhd {
    pub(crate) const MIN_SIZE_V0: i64 = 84;
    pub(crate) const MIN_SIZE_V1: i64 = 96;

    pub(crate) fn min_size(version: u8) -> i64 {
        match version {
            1 => Self::MIN_SIZE_V1,
            _ => Self::MIN_SIZE_V0,
        }
    }

    pub fn track_id(&self) -> u32 {
        self.track_id
    }

    /// Track width in pixels (video tracks only).
    pub fn width(&self) -> f64 {
        self.track_width as f64 / 2_u32.pow(16) as f64
    }

    /// Track height in pixels (video tracks only).
    pub fn height(&self) -> f64 {
        self.track_height as f64 / 2_u32.pow(16) as f64
    }

    pub fn layer(&self) -> u16 {
        self.layer
    }

    pub fn alternate_group(&self) -> u16 {
        self.alternate_group
    }

    /// Volume "level", indicating if adjustments to volume
    /// is suggested. 1.0 is normal volume.
    pub fn volume(&self) -> f64 {
        self.volume as f64 / 2_u16.pow(8) as f64
    }

    /// This track's unscaled duration,
    /// in the movie's time coordinate system.
    pub fn duration(&self) -> u64 {
        self.duration
    }

    pub fn matrix_structure(&self) -> &[u8] {
        self.matrix_structure.as_slice()
    }

    /// Creation datetime for this track.
    pub fn creation_time(&self) -> PrimitiveDateTime {
        crate::consts::mp4_time_zero() + Duration::seconds(self.creation_time as i64)
    }

    /// Modification datetime for this track.
    pub fn modification_time(&self) -> PrimitiveDateTime {
        crate::consts::mp4_time_zero() + Duration::seconds(self.modification_time as i64)
    }
}
