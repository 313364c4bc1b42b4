//! MP4 box with its payload buffered in memory.
//!
//! Leaf payloads are small (the large `mdat` box is never
//! buffered), so the type-specific parsers read from a bounded
//! in-memory cursor. Running past the end of the cursor means
//! the box declared a size too small for its own fields, which
//! surfaces as `InvalidSize` rather than a raw IO error.

use std::io::{Cursor, Read, Seek, SeekFrom};

use binrw::{BinRead, BinReaderExt};

use crate::Mp4Error;

use super::AtomHeader;

/// MP4 box.
pub(crate) struct Atom {
    /// Header.
    pub(crate) header: AtomHeader,
    /// Raw data load, excluding the header.
    pub(crate) cursor: Cursor<Vec<u8>>,
}

impl Atom {
    pub(crate) fn new(header: AtomHeader, cursor: Cursor<Vec<u8>>) -> Self {
        Self { header, cursor }
    }

    /// Payload size in bytes.
    pub(crate) fn data_size(&self) -> u64 {
        self.cursor.get_ref().len() as u64
    }

    /// Current position within the payload.
    pub(crate) fn pos(&self) -> u64 {
        self.cursor.position()
    }

    /// Remaining payload bytes.
    pub(crate) fn remaining(&self) -> u64 {
        self.data_size().saturating_sub(self.pos())
    }

    /// Absolute file offset of the current payload position.
    pub(crate) fn abs_pos(&self) -> u64 {
        self.header.data_offset() + self.pos()
    }

    /// Seek from current position.
    pub(crate) fn seek(&mut self, offset_from_current: i64) -> Result<u64, Mp4Error> {
        Ok(self.cursor.seek(SeekFrom::Current(offset_from_current))?)
    }

    /// Read a single Big Endian value.
    pub(crate) fn read_be<T>(&mut self) -> Result<T, Mp4Error>
    where
        T: BinRead,
        <T as BinRead>::Args<'static>: Sized + Clone + Default,
    {
        self.cursor
            .read_be::<T>()
            .map_err(|err| self.size_error(err))
    }

    /// Read a single Big Endian value with non-default arguments.
    pub(crate) fn read_be_args<'a, T>(
        &mut self,
        args: <T as BinRead>::Args<'a>,
    ) -> Result<T, Mp4Error>
    where
        T: BinRead,
    {
        T::read_be_args(&mut self.cursor, args)
            .map_err(|err| self.size_error(err))
    }

    /// Read exactly `n` payload bytes.
    pub(crate) fn read_bytes(&mut self, n: usize) -> Result<Vec<u8>, Mp4Error> {
        if (self.remaining() as usize) < n {
            return Err(Mp4Error::InvalidSize {
                len: self.data_size() as i64,
                min: (self.pos() + n as u64) as i64,
            });
        }
        let mut buf = vec![0_u8; n];
        self.cursor.read_exact(&mut buf)?;
        Ok(buf)
    }

    /// A read past the end of the bounded payload means the box
    /// declared too small a size for its fields.
    fn size_error(&self, err: binrw::Error) -> Mp4Error {
        if is_eof(&err) {
            Mp4Error::InvalidSize {
                len: self.data_size() as i64,
                min: self.data_size() as i64 + 1,
            }
        } else {
            Mp4Error::BinReadError(err)
        }
    }
}

fn is_eof(err: &binrw::Error) -> bool {
    match err {
        binrw::Error::Io(e) => e.kind() == std::io::ErrorKind::UnexpectedEof,
        binrw::Error::Backtrace(bt) => is_eof(&bt.error),
        _ => false,
    }
}
