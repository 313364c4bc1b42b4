//! Internal reader over the MP4 byte source.
//!
//! Wraps any `Read + Seek` source and centralises Big Endian
//! reads, bounded in-memory payload cursors, and box header
//! decoding. All size arithmetic upstream is signed 64-bit.

use std::io::{Cursor, Read, Seek, SeekFrom};

use binrw::{BinRead, BinReaderExt};

use crate::{atom::AtomHeader, fourcc, FourCC, Mp4Error};

/// Reader over the MP4 byte source with known total length.
#[derive(Debug)]
pub(crate) struct Mp4Reader<R> {
    pub(crate) inner: R,
    /// Total source size in bytes.
    pub(crate) len: u64,
}

impl<R: Read + Seek> Mp4Reader<R> {
    pub(crate) fn new(mut inner: R) -> Result<Self, Mp4Error> {
        let len = inner.seek(SeekFrom::End(0))?;
        inner.seek(SeekFrom::Start(0))?;
        Ok(Self { inner, len })
    }

    /// Total source size in bytes.
    pub(crate) fn len(&self) -> u64 {
        self.len
    }

    /// Returns current position/byte offset in the source.
    pub(crate) fn pos(&mut self) -> Result<u64, Mp4Error> {
        Ok(self.inner.stream_position()?)
    }

    pub(crate) fn seek(&mut self, pos: SeekFrom) -> Result<u64, Mp4Error> {
        Ok(self.inner.seek(pos)?)
    }

    /// Relative seek by signed delta.
    pub(crate) fn skip(&mut self, delta: i64) -> Result<u64, Mp4Error> {
        Ok(self.inner.seek(SeekFrom::Current(delta))?)
    }

    /// Read a single Big Endian type `T`.
    pub(crate) fn read_be<T>(&mut self) -> Result<T, Mp4Error>
    where
        T: BinRead,
        <T as BinRead>::Args<'static>: Sized + Clone + Default,
    {
        Ok(self.inner.read_be::<T>()?)
    }

    /// Read exactly `n` bytes at current position.
    /// A short read is a hard error.
    pub(crate) fn read_bytes(&mut self, n: usize) -> Result<Vec<u8>, Mp4Error> {
        let mut buf = vec![0_u8; n];
        self.inner.read_exact(&mut buf)?;
        Ok(buf)
    }

    /// Reads `len` bytes starting at current position
    /// and returns these as an in-memory reader.
    pub(crate) fn cursor(&mut self, len: usize) -> Result<Cursor<Vec<u8>>, Mp4Error> {
        Ok(Cursor::new(self.read_bytes(len)?))
    }

    /// Reads FourCC at current position.
    pub(crate) fn fourcc(&mut self) -> Result<FourCC, Mp4Error> {
        self.read_be::<FourCC>()
    }

    /// Decodes the box header at current position.
    ///
    /// No check is made that the current position is at a box
    /// boundary. Results in the position being set to the first
    /// payload byte, adjusted for the optional 64-bit size and
    /// 16-byte extended `uuid` type.
    pub(crate) fn read_header(&mut self) -> Result<AtomHeader, Mp4Error> {
        let offset = self.pos()?;

        let short_size: u32 = self.read_be()?;
        let name = self.fourcc()?;

        let mut header_size: u8 = 8;
        let mut last = false;
        let atom_size = match short_size {
            // Box extends to end of stream. Whether that is legal
            // here is the caller's budget check.
            0 => {
                last = true;
                self.len - offset
            }
            // 64-bit size follows the FourCC.
            1 => {
                header_size = 16;
                self.read_be::<u64>()?
            }
            n => n as u64,
        };

        if atom_size < header_size as u64 {
            return Err(Mp4Error::InvalidSize {
                len: atom_size as i64,
                min: header_size as i64,
            });
        }

        let mut uuid: Option<[u8; 16]> = None;
        if name == fourcc::UUID {
            if atom_size < header_size as u64 + 16 {
                return Err(Mp4Error::InvalidSize {
                    len: atom_size as i64,
                    min: header_size as i64 + 16,
                });
            }
            let mut ext = [0_u8; 16];
            self.inner.read_exact(&mut ext)?;
            uuid = Some(ext);
            header_size += 16;
        }

        Ok(AtomHeader {
            name,
            atom_size,
            offset,
            header_size,
            uuid,
            last,
        })
    }
}
