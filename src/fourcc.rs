//! MP4 box FourCC.
//! See box type in <https://developer.apple.com/documentation/quicktime-file-format/atoms>.
//!
//! Stored as the four bytes packed into a Big Endian `u32`,
//! so that comparisons on the parse hot path are integer equality
//! against the constants below. Codes whose first byte is `0xA9`
//! (`©`, e.g. `©xyz` in `udta`) are legal and map through ISO8859-1
//! for display.

use std::fmt::Display;

use binrw::BinRead;

use crate::support::chars_from_bytes;

/// MP4 box FourCC as a Big Endian packed `u32`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, BinRead)]
#[br(big)]
pub struct FourCC(pub(crate) u32);

impl FourCC {
    pub const fn new(fourcc: &[u8; 4]) -> Self {
        Self(u32::from_be_bytes(*fourcc))
    }

    pub const fn from_u32(value: u32) -> Self {
        Self(value)
    }

    pub const fn as_u32(&self) -> u32 {
        self.0
    }

    pub fn from_slice(fourcc: &[u8]) -> Self {
        assert_eq!(fourcc.len(), 4, "FourCC must have size 4.");
        Self(u32::from_be_bytes([fourcc[0], fourcc[1], fourcc[2], fourcc[3]]))
    }

    pub fn bytes(&self) -> [u8; 4] {
        self.0.to_be_bytes()
    }

    /// Renders the code as a string.
    /// Single-byte values above 127 map via ISO8859-1
    /// (UTF-8 decoding would fail on e.g. `©nam`).
    pub fn to_str(&self) -> String {
        chars_from_bytes(self.bytes()).iter().collect()
    }
}

impl Display for FourCC {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

// Container boxes
pub const MOOV: FourCC = FourCC::new(b"moov");
pub const TRAK: FourCC = FourCC::new(b"trak");
pub const MDIA: FourCC = FourCC::new(b"mdia");
pub const MINF: FourCC = FourCC::new(b"minf");
pub const DINF: FourCC = FourCC::new(b"dinf");
pub const STBL: FourCC = FourCC::new(b"stbl");
pub const UDTA: FourCC = FourCC::new(b"udta");

// Leaf boxes
pub const FTYP: FourCC = FourCC::new(b"ftyp");
pub const MVHD: FourCC = FourCC::new(b"mvhd");
pub const TKHD: FourCC = FourCC::new(b"tkhd");
pub const TREF: FourCC = FourCC::new(b"tref");
pub const MDHD: FourCC = FourCC::new(b"mdhd");
pub const HDLR: FourCC = FourCC::new(b"hdlr");
pub const VMHD: FourCC = FourCC::new(b"vmhd");
pub const SMHD: FourCC = FourCC::new(b"smhd");
pub const HMHD: FourCC = FourCC::new(b"hmhd");
pub const NMHD: FourCC = FourCC::new(b"nmhd");
pub const STSD: FourCC = FourCC::new(b"stsd");
pub const STTS: FourCC = FourCC::new(b"stts");
pub const STSS: FourCC = FourCC::new(b"stss");
pub const STSZ: FourCC = FourCC::new(b"stsz");
pub const STSC: FourCC = FourCC::new(b"stsc");
pub const STCO: FourCC = FourCC::new(b"stco");
pub const CO64: FourCC = FourCC::new(b"co64");
pub const MDAT: FourCC = FourCC::new(b"mdat");
pub const UUID: FourCC = FourCC::new(b"uuid");

// Sample entry internals
pub const AVCC: FourCC = FourCC::new(b"avcC");
pub const AVC1: FourCC = FourCC::new(b"avc1");

// Metadata boxes
pub const META: FourCC = FourCC::new(b"meta");
pub const KEYS: FourCC = FourCC::new(b"keys");
pub const ILST: FourCC = FourCC::new(b"ilst");
pub const DATA: FourCC = FourCC::new(b"data");
pub const XYZ: FourCC = FourCC::new(b"\xa9xyz");
pub const COVR: FourCC = FourCC::new(b"covr");

// Handler types (`hdlr`); the metadata handler
// shares its code with the `meta` box.
pub const VIDE: FourCC = FourCC::new(b"vide");
pub const SOUN: FourCC = FourCC::new(b"soun");
pub const HINT: FourCC = FourCC::new(b"hint");
pub const TEXT: FourCC = FourCC::new(b"text");

// iTunes-style `udta` tag codes
pub const TAG_ARTIST: FourCC = FourCC::new(b"\xa9ART");
pub const TAG_TITLE: FourCC = FourCC::new(b"\xa9nam");
pub const TAG_DATE: FourCC = FourCC::new(b"\xa9day");
pub const TAG_COMMENT: FourCC = FourCC::new(b"\xa9cmt");
pub const TAG_COPYRIGHT: FourCC = FourCC::new(b"\xa9cpy");
pub const TAG_MAKER: FourCC = FourCC::new(b"\xa9mak");
pub const TAG_MODEL: FourCC = FourCC::new(b"\xa9mod");
pub const TAG_VERSION: FourCC = FourCC::new(b"\xa9swr");
pub const TAG_ENCODER: FourCC = FourCC::new(b"\xa9too");
