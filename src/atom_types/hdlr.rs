//! Handler reference box (`hdlr`).
//!
//! Declares the media type of a track when found under
//! `mdia`. Also occurs under `meta`, where it names the
//! metadata handler instead.
//!
//! See: <https://developer.apple.com/documentation/quicktime-file-format/handler_reference_atom>

use binrw::BinRead;

use crate::FourCC;

/// Handler reference box (`hdlr`).
///
/// See: <https://developer.apple.com/documentation/quicktime-file-format/handler_reference_atom>
#[derive(Debug, Default, BinRead)]
#[br(big)]
pub struct Hdlr {
    _version: u8,
    _flags: [u8; 3],
    _pre_defined: u32,
    /// Four CC for the type of media handler,
    /// e.g. `vide` for video, `soun` for audio.
    pub(crate) handler_type: FourCC,
    /// Reserved, should be set to 0.
    _reserved: [u32; 3],
    /// Trailing null-terminated display name.
    ///
    /// This field is parsed separately,
    /// since for some old MP4/QuickTimes
    /// the name is a counted string instead.
    #[br(ignore)]
    pub(crate) name: String,
}

impl Hdlr {
    pub(crate) const MIN_SIZE: i64 = 24;

    pub fn handler_type(&self) -> FourCC {
        self.handler_type
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }
}
