//! Movie header box (`mvhd`).
//!
//! Location: `moov/mvhd`
//!
//! See: <https://developer.apple.com/documentation/quicktime-file-format/movie_header_atom>

use binrw::BinRead;
use time::Duration;

use crate::mp4_time_zero;
use crate::support::versioned_u64;

/// Movie header box (`mvhd`).
///
/// Version 1 stores 64-bit times and duration,
/// version 0 stores 32-bit values.
///
/// Location: `moov/mvhd`
///
/// See: <https://developer.apple.com/documentation/quicktime-file-format/movie_header_atom>
#[derive(Debug, BinRead)]
#[br(big)]
pub struct Mvhd {
    pub(crate) version: u8,
    _flags: [u8; 3],
    /// Seconds since midnight, 1904-01-01 UTC
    #[br(parse_with = versioned_u64, args(version == 1))]
    pub(crate) creation_time: u64,
    /// Seconds since midnight, 1904-01-01 UTC
    #[br(parse_with = versioned_u64, args(version == 1))]
    pub(crate) modification_time: u64,
    /// Number of time units that pass in one second
    pub(crate) time_scale: u32,
    /// Unscaled duration. I.e. "time units"
    /// that require dividing by time scale
    /// to derive a value in seconds.
    ///
    /// Corresponds to the longest track.
    #[br(parse_with = versioned_u64, args(version == 1))]
    pub(crate) duration: u64,
    /// Fixed point number (16.16)
    /// representing preferred play rate
    /// (1.0 = normal playback).
    pub(crate) preferred_rate: u32,
    /// Fixed point number (8.8)
    /// representing preferred volume
    /// (1.0 = full volume).
    pub(crate) preferred_volume: u16,
    _reserved: [u8; 10],
    pub(crate) matrix: [u8; 36], // row-major matrix
    _pre_defined: [u8; 24],
    pub(crate) next_track_id: u32,
}

impl Mvhd {
    pub(crate) const MIN_SIZE_V0: i64 = 100;
    pub(crate) const MIN_SIZE_V1: i64 = 112;

    pub(crate) fn min_size(version: u8) -> i64 {
        match version {
            1 => Self::MIN_SIZE_V1,
            _ => Self::MIN_SIZE_V0,
        }
    }

    pub fn time_scale(&self) -> u32 {
        self.time_scale
    }

    pub fn duration_unscaled(&self) -> u64 {
        self.duration
    }

    /// Creation time as UTC datetime.
    /// May default to MP4 default time
    /// `1904-01-01 00:00:00` depending on device and settings.
    pub fn creation_time(&self) -> time::PrimitiveDateTime {
        mp4_time_zero() + Duration::seconds(self.creation_time as i64)
    }

    /// Modification time as UTC datetime.
    pub fn modification_time(&self) -> time::PrimitiveDateTime {
        mp4_time_zero() + Duration::seconds(self.modification_time as i64)
    }

    /// Duration of the longest track in seconds.
    pub fn duration(&self) -> Duration {
        Duration::seconds_f64(self.duration as f64 / self.time_scale.max(1) as f64)
    }

    /// Preferred play rate, 1.0 = normal playback.
    pub fn preferred_rate(&self) -> f64 {
        self.preferred_rate as f64 / 2_u32.pow(16) as f64
    }

    /// Preferred volume, 1.0 = full volume.
    pub fn preferred_volume(&self) -> f64 {
        self.preferred_volume as f64 / 2_u16.pow(8) as f64
    }

    pub fn next_track_id(&self) -> u32 {
        self.next_track_id
    }
}
