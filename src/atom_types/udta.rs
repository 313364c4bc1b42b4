//! User data (`udta`) specifics: the recognized iTunes-style
//! tag codes and the `©xyz` location box.
//!
//! Path: `moov/udta`

use crate::{atom::Atom, fourcc, metadata::Location, FourCC, Mp4Error};

/// The recognized iTunes-style tag codes stored
/// under `udta/meta/ilst`.
pub(crate) const UDTA_TAGS: [FourCC; 9] = [
    fourcc::TAG_ARTIST,
    fourcc::TAG_TITLE,
    fourcc::TAG_DATE,
    fourcc::TAG_COMMENT,
    fourcc::TAG_COPYRIGHT,
    fourcc::TAG_MAKER,
    fourcc::TAG_MODEL,
    fourcc::TAG_VERSION,
    fourcc::TAG_ENCODER,
];

/// Minimum `©xyz` payload: location_size + language_code.
pub(crate) const XYZ_MIN_SIZE: i64 = 4;

/// Reads the `©xyz` location box under `udta`:
/// a u16 size, a u16 packed language code, and that many
/// bytes of UTF-8 location string, e.g. `"+12.3+45.6/"`.
pub(crate) fn parse_xyz(atom: &mut Atom, key: FourCC) -> Result<Location, Mp4Error> {
    let location_size: u16 = atom.read_be()?;
    let language_code: u16 = atom.read_be()?;

    let bytes = atom.read_bytes(location_size as usize)?;

    Ok(Location {
        key: key.to_str(),
        language_code,
        value: String::from_utf8_lossy(&bytes).into_owned(),
    })
}
