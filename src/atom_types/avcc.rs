//! AVC decoder configuration box (`avcC`).
//!
//! Nested inside an `avc1` sample description in `stsd`.
//! Carries the AVCDecoderConfigurationRecord: profile, level,
//! NAL unit length size, and the sequence/picture parameter
//! sets. Only the first non-empty SPS and PPS are kept; any
//! further parameter sets are skipped.

use crate::{atom::Atom, Mp4Error};

/// AVC decoder configuration (`avcC`),
/// nested inside an `avc1` sample description.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AvcConfiguration {
    /// AVC profile indication.
    pub(crate) profile: u8,
    /// Profile compatibility flags.
    pub(crate) profile_compat: u8,
    /// AVC level indication.
    pub(crate) level: u8,
    /// NAL unit length field size in bytes (1-4).
    pub(crate) nal_length_size: u8,
    /// First non-empty sequence parameter set.
    pub(crate) sps: Vec<u8>,
    /// First non-empty picture parameter set.
    pub(crate) pps: Vec<u8>,
}

impl AvcConfiguration {
    pub(crate) const MIN_SIZE: i64 = 6;

    pub fn profile(&self) -> u8 {
        self.profile
    }

    pub fn profile_compat(&self) -> u8 {
        self.profile_compat
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    /// NAL unit length field size in bytes.
    pub fn nal_length_size(&self) -> u8 {
        self.nal_length_size
    }

    pub fn sps(&self) -> &[u8] {
        &self.sps
    }

    pub fn pps(&self) -> &[u8] {
        &self.pps
    }

    /// Reads the configuration record at current payload position.
    /// Every parameter set length is re-checked against the
    /// remaining payload budget before it is read.
    pub(crate) fn read(atom: &mut Atom) -> Result<Self, Mp4Error> {
        if (atom.remaining() as i64) < Self::MIN_SIZE {
            return Err(Mp4Error::InvalidSize {
                len: atom.remaining() as i64,
                min: Self::MIN_SIZE,
            });
        }

        // version & profile & level
        let _configuration_version: u8 = atom.read_be()?;
        let profile: u8 = atom.read_be()?;
        let profile_compat: u8 = atom.read_be()?;
        let level: u8 = atom.read_be()?;

        // length_size & sps_count, packed:
        // bits 0..1 of the first byte hold length_size - 1,
        // the low 5 bits of the second byte hold sps_count
        let packed: u16 = atom.read_be()?;
        let nal_length_size = (((packed >> 8) & 0x3) + 1) as u8;
        let sps_count = packed & 0x1F;

        let mut sps: Vec<u8> = Vec::new();
        for _ in 0..sps_count {
            let sps_length: u16 = atom.read_be()?;
            if atom.remaining() < sps_length as u64 {
                return Err(Mp4Error::InvalidSize {
                    len: atom.remaining() as i64,
                    min: sps_length as i64,
                });
            }
            if sps.is_empty() && sps_length > 0 {
                // first SPS found
                sps = atom.read_bytes(sps_length as usize)?;
            } else {
                // ignore any other SPS
                atom.seek(sps_length as i64)?;
            }
        }

        let pps_count: u8 = atom.read_be()?;

        let mut pps: Vec<u8> = Vec::new();
        for _ in 0..pps_count {
            let pps_length: u16 = atom.read_be()?;
            if atom.remaining() < pps_length as u64 {
                return Err(Mp4Error::InvalidSize {
                    len: atom.remaining() as i64,
                    min: pps_length as i64,
                });
            }
            if pps.is_empty() && pps_length > 0 {
                // first PPS found
                pps = atom.read_bytes(pps_length as usize)?;
            } else {
                // ignore any other PPS
                atom.seek(pps_length as i64)?;
            }
        }

        Ok(Self {
            profile,
            profile_compat,
            level,
            nal_length_size,
            sps,
            pps,
        })
    }
}
