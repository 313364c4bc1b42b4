//! Various MP4-related read/parse errors.

use std::fmt;

use crate::FourCC;

/// Various MP4 related read/parse errors.
#[derive(Debug)]
pub enum Mp4Error {
    /// Converted `binrw::Error`.
    BinReadError(binrw::Error),
    /// Converted `Utf8Error`.
    Utf8Error(std::string::FromUtf8Error),
    /// IO error. Short read, seek failure,
    /// or a payload parser that consumed more
    /// bytes than its box allotted.
    IOError(std::io::Error),
    /// A box header or table declares a size smaller
    /// than the minimum required for its fields,
    /// or exceeds the parent's remaining budget.
    InvalidSize{len: i64, min: i64},
    /// A sample table box occurs twice
    /// under the same track.
    AlreadyDefined(&'static str),
    /// Read consumed an unexpected number of bytes.
    ReadMismatch{got: u64, expected: u64},
    /// Feature the implementation does not support,
    /// e.g. `size == 0` for a list element inside `ilst`.
    Unsupported(&'static str),
    /// Invalid context at an API boundary.
    InvalidArgument(&'static str),
    /// No track at specified index or with specified ID.
    NoSuchTrack(u32),
    /// Sample index out of range for the track.
    NoSuchSample{index: u32, count: u32},
    /// A query needs a sample table the track never defined.
    MissingSampleTable(&'static str),
    /// No box with specified FourCC in the parsed tree.
    NoSuchAtom(FourCC),
}

impl std::error::Error for Mp4Error {}

impl fmt::Display for Mp4Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mp4Error::BinReadError(err) => write!(f, "{err}"),
            Mp4Error::Utf8Error(err) => write!(f, "{err}"),
            Mp4Error::IOError(err) => write!(f, "IO error: {err}"),
            Mp4Error::InvalidSize{len, min} => write!(f, "Invalid size: {len} bytes, expected {min} bytes min."),
            Mp4Error::AlreadyDefined(table) => write!(f, "'{table}' table already defined for this track."),
            Mp4Error::ReadMismatch{got, expected} => write!(f, "Read {got} bytes, expected {expected} bytes."),
            Mp4Error::Unsupported(what) => write!(f, "Unsupported: {what}."),
            Mp4Error::InvalidArgument(what) => write!(f, "Invalid argument: {what}."),
            Mp4Error::NoSuchTrack(id) => write!(f, "No such track {id}."),
            Mp4Error::NoSuchSample{index, count} => write!(f, "No such sample {index}, track has {count} samples."),
            Mp4Error::MissingSampleTable(table) => write!(f, "Track defines no '{table}' table."),
            Mp4Error::NoSuchAtom(name) => write!(f, "No such atom '{name}'."),
        }
    }
}

/// Converts std::io::Error to Mp4Error
impl From<std::io::Error> for Mp4Error {
    fn from(err: std::io::Error) -> Self {
        Mp4Error::IOError(err)
    }
}

/// Converts std::string::FromUtf8Error to Mp4Error
/// (`&str` requires `std::str::Utf8Error`)
impl From<std::string::FromUtf8Error> for Mp4Error {
    fn from(err: std::string::FromUtf8Error) -> Mp4Error {
        Mp4Error::Utf8Error(err)
    }
}

/// Converts Mp4Error to std::io::Error
impl From<Mp4Error> for std::io::Error {
    fn from(err: Mp4Error) -> Self {
        std::io::Error::new(std::io::ErrorKind::Other, err)
    }
}

/// Converts binrw::Error to Mp4Error
impl From<binrw::Error> for Mp4Error {
    fn from(err: binrw::Error) -> Mp4Error {
        Mp4Error::BinReadError(err)
    }
}
