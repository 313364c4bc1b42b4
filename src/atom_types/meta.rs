//! The `keys` and `data` boxes of the `meta`/`ilst`
//! metadata containers.
//!
//! `keys` (under `meta`) holds an indirection table of key
//! strings; children of the sibling `ilst` carry a numeric
//! FourCC that is a 1-based index into that table. Under
//! `udta/meta/ilst` the children instead carry iTunes-style
//! tag FourCC:s. Each child holds a single `data` box whose
//! class selects between UTF-8 values and cover art.

use log::debug;

use crate::{
    atom::Atom,
    fourcc,
    metadata::{CoverArt, CoverType, Metadata, Tag},
    FourCC, Mp4Error,
};

use super::udta::UDTA_TAGS;

/// UTF-8 string value.
pub(crate) const CLASS_UTF8: u32 = 1;
/// JPEG cover art.
pub(crate) const CLASS_JPEG: u32 = 13;
/// PNG cover art.
pub(crate) const CLASS_PNG: u32 = 14;
/// BMP cover art.
pub(crate) const CLASS_BMP: u32 = 27;

/// Minimum `keys` payload: version/flags + entry_count.
pub(crate) const KEYS_MIN_SIZE: i64 = 8;
/// Minimum `data` payload: version/class + reserved + 1 value byte.
pub(crate) const DATA_MIN_SIZE: i64 = 9;

/// Reads the `keys` box into a key string table.
/// Keys are matched 1-indexed by the `data` parser.
pub(crate) fn parse_keys(atom: &mut Atom) -> Result<Vec<String>, Mp4Error> {
    let _version_flags: u32 = atom.read_be()?;
    let entry_count: u32 = atom.read_be()?;

    let mut keys: Vec<String> = Vec::new();
    for _ in 0..entry_count {
        let key_size: u32 = atom.read_be()?;
        if key_size < 8 {
            return Err(Mp4Error::InvalidSize {
                len: key_size as i64,
                min: 8,
            });
        }
        let _key_namespace: FourCC = atom.read_be()?;
        let bytes = atom.read_bytes((key_size - 8) as usize)?;
        keys.push(String::from_utf8_lossy(&bytes).into_owned());
    }

    Ok(keys)
}

/// Reads a `data` box. `tag` is the FourCC of the enclosing
/// `ilst` child: either a recognized iTunes-style tag code,
/// or a 1-based index into the `keys` table. Values whose tag
/// matches neither are dropped.
pub(crate) fn parse_data(
    atom: &mut Atom,
    tag: FourCC,
    metadata: &mut Metadata,
) -> Result<(), Mp4Error> {
    // version & class; the low byte of the 24-bit class
    // selects the value format
    let version_class: u32 = atom.read_be()?;
    let class = version_class & 0xFF;

    let _reserved: u32 = atom.read_be()?;

    let value_len = atom.remaining() as usize;

    match class {
        CLASS_UTF8 => {
            if UDTA_TAGS.contains(&tag) {
                let bytes = atom.read_bytes(value_len)?;
                let value = String::from_utf8_lossy(&bytes).into_owned();
                debug!("data: udta tag '{tag}' = '{value}'");
                metadata.udta_tags.push(Tag {
                    key: tag.to_str(),
                    value,
                });
            } else {
                let index = tag.as_u32() as usize;
                if index > 0 && index <= metadata.meta_keys.len() {
                    let bytes = atom.read_bytes(value_len)?;
                    let value = String::from_utf8_lossy(&bytes).into_owned();
                    debug!("data: meta key '{}' = '{value}'", metadata.meta_keys[index - 1]);
                    metadata.meta_values[index - 1] = Some(value);
                }
                // No matching key: the entry is dropped.
            }
        }
        CLASS_JPEG | CLASS_PNG | CLASS_BMP => {
            let kind = match class {
                CLASS_PNG => CoverType::Png,
                CLASS_BMP => CoverType::Bmp,
                _ => CoverType::Jpeg,
            };
            let cover = CoverArt {
                offset: atom.abs_pos(),
                size: value_len as u32,
                kind,
            };
            if tag == fourcc::COVR {
                debug!("data: udta cover, {} bytes, {kind:?}", cover.size);
                metadata.udta_cover = Some(cover);
            } else {
                let index = tag.as_u32() as usize;
                if index > 0
                    && index <= metadata.meta_keys.len()
                    && metadata.meta_keys[index - 1] == "covr"
                {
                    debug!("data: meta cover, {} bytes, {kind:?}", cover.size);
                    metadata.meta_cover = Some(cover);
                }
            }
        }
        _ => debug!("data: ignoring class {class} for tag '{tag}'"),
    }

    Ok(())
}
