//! Small byte/string helpers shared by the payload parsers.

use std::io::{Cursor, Read};

use binrw::{BinRead, BinResult};

use crate::Mp4Error;

/// Single-byte chars from `[u8; 4]`.
/// Each byte maps 0-255 to `char`, exceeding ascii.
pub(crate) fn chars_from_bytes(bytes: [u8; 4]) -> [char; 4] {
    [
        bytes[0] as char,
        bytes[1] as char,
        bytes[2] as char,
        bytes[3] as char,
    ]
}

/// Counted string.
/// First byte specifies length, remaining bytes are padded with null.
pub(crate) fn counted_string(bytes: &[u8], ignore_null: bool) -> String {
    assert!(!bytes.is_empty(), "No data to construct counted string from.");
    let count = (bytes[0] as usize).min(bytes.len() - 1);
    match ignore_null {
        true => bytes[1 .. count + 1].iter()
            .filter_map(|b| if b != &0 {Some(*b as char)} else {None})
            .collect(),
        false => bytes[1 .. count + 1].iter()
            .map(|b| *b as char)
            .collect(),
    }
}

/// Reads a null-terminated UTF-8 string at current cursor position,
/// capped at `max_len` bytes. Stops silently at end of data.
/// Invalid UTF-8 sequences are replaced.
pub(crate) fn read_cstring(
    cursor: &mut Cursor<Vec<u8>>,
    max_len: usize
) -> Result<String, Mp4Error> {
    let mut bytes: Vec<u8> = Vec::new();
    let mut buf = [0_u8; 1];
    while bytes.len() < max_len {
        if cursor.read(&mut buf)? == 0 {
            break;
        }
        if buf[0] == 0 {
            break;
        }
        bytes.push(buf[0]);
    }
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Reads a `u32` widened to 64 bits, or a true `u64`
/// when `wide` is set. Version 1 of the `mvhd`, `tkhd`,
/// and `mdhd` boxes store 64-bit times and durations.
#[binrw::parser(reader, endian)]
pub(crate) fn versioned_u64(wide: bool) -> BinResult<u64> {
    if wide {
        u64::read_options(reader, endian, ())
    } else {
        u32::read_options(reader, endian, ()).map(u64::from)
    }
}
