//! MP4 box header.
//!
//! 8, 16, or 24+ bytes on disk depending on whether the size is
//! 32 or 64-bit and whether the type carries a 16-byte extended
//! `uuid` type.
//!
//! ```ignore
//! | [X X X X] [Y Y Y Y] [Z Z Z Z Z Z Z Z] [U * 16] |
//!    |         |         |                |
//!    |         |         |                extended type (only if FourCC == 'uuid')
//!    |         |         64bit size (only if 32 bit size == 1)
//!    |         FourCC
//!    32bit size
//! ```

use std::ops::Range;

use crate::{FourCC, CONTAINER};

/// MP4 box header.
#[derive(Debug, Clone, Default)]
pub struct AtomHeader {
    /// FourCC.
    pub(crate) name: FourCC,
    /// Total box size in bytes including the header.
    /// Resolved from the 64-bit large size, or from
    /// end-of-stream for a zero short size.
    pub(crate) atom_size: u64,
    /// Absolute byte offset for start of box in MP4,
    /// i.e. byte offset for its header,
    /// starting with the 32-bit size.
    pub(crate) offset: u64,
    /// Header size in bytes as stored:
    /// 8, 16 (64-bit size), plus 16 for a `uuid` extended type.
    pub(crate) header_size: u8,
    /// Extended type for `uuid` boxes.
    pub(crate) uuid: Option<[u8; 16]>,
    /// Set if the short size was 0, i.e. the box
    /// extends to the end of the stream. Only valid
    /// at the outermost level.
    pub(crate) last: bool,
}

impl AtomHeader {
    pub fn name(&self) -> FourCC {
        self.name
    }

    /// Total box size in bytes including the header.
    pub fn atom_size(&self) -> u64 {
        self.atom_size
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Header size in bytes as stored in the MP4.
    pub fn header_size(&self) -> u8 {
        self.header_size
    }

    pub fn uuid(&self) -> Option<&[u8; 16]> {
        self.uuid.as_ref()
    }

    /// `true` if the box was flagged as extending
    /// to the end of the stream (short size 0).
    pub fn is_last(&self) -> bool {
        self.last
    }

    /// Convenience method to check whether this box
    /// is a known container or not.
    pub fn is_container(&self) -> bool {
        CONTAINER.contains(&self.name)
    }

    /// Data load absolute offset,
    /// i.e. position after header
    /// adjusted for optional 64-bit size and extended type.
    pub fn data_offset(&self) -> u64 {
        self.offset + self.header_size as u64
    }

    /// Size of data load (excludes header).
    pub fn data_size(&self) -> u64 {
        self.atom_size - self.header_size as u64
    }

    /// Absolute offset to next sibling box.
    pub fn end(&self) -> u64 {
        self.offset + self.atom_size
    }

    /// Returns start, end offset range for box.
    pub fn bounds(&self) -> Range<u64> {
        self.offset .. self.end()
    }

    /// Returns `true` if absolute offset `pos`
    /// is contained within the box span.
    /// Inclusive lower bound, exclusive upper bound.
    pub fn contains(&self, pos: u64) -> bool {
        self.offset <= pos && self.end() > pos
    }
}
