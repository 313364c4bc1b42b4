//! Sample description box (`stsd`).
//!
//! Location: `moov/trak[multiple]/mdia/minf/stbl/stsd`
//!
//! The layout of each entry depends on the track's handler
//! type, declared by the `hdlr` box that precedes `stsd`
//! in file order.
//!
//! See: <https://developer.apple.com/documentation/quicktime-file-format/sample_description_atom>

use crate::{atom::Atom, fourcc, support::read_cstring, FourCC, Mp4Error, TrackKind};

use super::avcc::AvcConfiguration;

/// Sample description box (`stsd`).
///
/// Location: `moov/trak[multiple]/mdia/minf/stbl/stsd`
#[derive(Debug, Default)]
pub struct Stsd {
    pub(crate) entries: Vec<SampleEntry>,
}

impl Stsd {
    pub(crate) const MIN_SIZE: i64 = 8;

    pub fn entries(&self) -> &[SampleEntry] {
        &self.entries
    }

    /// Returns the first video sample description, if any.
    pub fn video(&self) -> Option<&VideoEntry> {
        self.entries.iter().find_map(|e| match e {
            SampleEntry::Video(v) => Some(v),
            _ => None,
        })
    }

    /// Returns the first audio sample description, if any.
    pub fn audio(&self) -> Option<&AudioEntry> {
        self.entries.iter().find_map(|e| match e {
            SampleEntry::Audio(a) => Some(a),
            _ => None,
        })
    }

    /// Returns the first metadata sample description, if any.
    pub fn metadata(&self) -> Option<&MetadataEntry> {
        self.entries.iter().find_map(|e| match e {
            SampleEntry::Metadata(m) => Some(m),
            _ => None,
        })
    }

    /// Reads the sample description box. Entry layout is
    /// dispatched on the handler type of the enclosing track.
    pub(crate) fn read(atom: &mut Atom, kind: TrackKind) -> Result<Self, Mp4Error> {
        let _version_flags: u32 = atom.read_be()?;
        let entry_count: u32 = atom.read_be()?;

        let mut entries: Vec<SampleEntry> = Vec::new();
        for _ in 0..entry_count {
            let entry = match kind {
                TrackKind::Video => SampleEntry::Video(VideoEntry::read(atom)?),
                TrackKind::Audio => SampleEntry::Audio(AudioEntry::read(atom)?),
                TrackKind::Metadata => SampleEntry::Metadata(MetadataEntry::read(atom)?),
                // No fields beyond the boilerplate are parsed.
                TrackKind::Hint | TrackKind::Text | TrackKind::Unknown => SampleEntry::Other,
            };
            entries.push(entry);
        }

        Ok(Self { entries })
    }
}

/// One sample description entry, shaped by the
/// enclosing track's handler type.
#[derive(Debug)]
pub enum SampleEntry {
    Video(VideoEntry),
    Audio(AudioEntry),
    Metadata(MetadataEntry),
    Other,
}

/// Video sample description.
///
/// See: <https://developer.apple.com/documentation/quicktime-file-format/video_sample_description>
#[derive(Debug, Default)]
pub struct VideoEntry {
    /// Coding format, e.g. `avc1`.
    pub(crate) format: FourCC,
    /// Width of the source image in pixels.
    pub(crate) width: u16,
    /// Height of the source image in pixels.
    pub(crate) height: u16,
    /// 16.16 fixed-point horizontal resolution in pixels per inch.
    pub(crate) horizontal_resolution: u32,
    /// 16.16 fixed-point vertical resolution in pixels per inch.
    pub(crate) vertical_resolution: u32,
    /// Frames of compressed data stored in each sample.
    pub(crate) frame_count: u16,
    /// 32-byte Pascal string naming the compressor.
    pub(crate) compressor_name: String,
    /// Pixel depth of the compressed image.
    pub(crate) depth: u16,
    /// AVC decoder configuration when the nested
    /// codec-specific box is `avcC`.
    pub(crate) avc: Option<AvcConfiguration>,
}

impl VideoEntry {
    pub(crate) const MIN_SIZE: i64 = 102;

    pub fn format(&self) -> FourCC {
        self.format
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn horizontal_resolution(&self) -> f64 {
        self.horizontal_resolution as f64 / 2_u32.pow(16) as f64
    }

    pub fn vertical_resolution(&self) -> f64 {
        self.vertical_resolution as f64 / 2_u32.pow(16) as f64
    }

    pub fn frame_count(&self) -> u16 {
        self.frame_count
    }

    pub fn compressor_name(&self) -> &str {
        self.compressor_name.as_str()
    }

    pub fn depth(&self) -> u16 {
        self.depth
    }

    pub fn avc(&self) -> Option<&AvcConfiguration> {
        self.avc.as_ref()
    }

    fn read(atom: &mut Atom) -> Result<Self, Mp4Error> {
        if (atom.data_size() as i64) < Self::MIN_SIZE {
            return Err(Mp4Error::InvalidSize {
                len: atom.data_size() as i64,
                min: Self::MIN_SIZE,
            });
        }

        let _size: u32 = atom.read_be()?;
        let format: FourCC = atom.read_be()?;
        let _reserved: [u8; 6] = atom.read_be()?;
        let _data_reference_index: u16 = atom.read_be()?;
        let _pre_defined: [u8; 16] = atom.read_be()?;
        let width: u16 = atom.read_be()?;
        let height: u16 = atom.read_be()?;
        let horizontal_resolution: u32 = atom.read_be()?;
        let vertical_resolution: u32 = atom.read_be()?;
        let _reserved2: u32 = atom.read_be()?;
        let frame_count: u16 = atom.read_be()?;
        let name_bytes: [u8; 32] = atom.read_be()?;
        let compressor_name = crate::support::counted_string(&name_bytes, true);
        let depth: u16 = atom.read_be()?;
        let _pre_defined2: u16 = atom.read_be()?;

        // nested codec-specific box
        let _codec_size: u32 = atom.read_be()?;
        let codec: FourCC = atom.read_be()?;
        let avc = match codec {
            fourcc::AVCC => Some(AvcConfiguration::read(atom)?),
            _ => None,
        };

        Ok(Self {
            format,
            width,
            height,
            horizontal_resolution,
            vertical_resolution,
            frame_count,
            compressor_name,
            depth,
            avc,
        })
    }
}

/// Audio sample description.
///
/// See: <https://developer.apple.com/documentation/quicktime-file-format/sound_sample_description>
#[derive(Debug, Default)]
pub struct AudioEntry {
    /// Coding format, e.g. `mp4a`.
    pub(crate) format: FourCC,
    pub(crate) channel_count: u16,
    pub(crate) sample_size: u16,
    /// 16.16 fixed-point sample rate, stored raw.
    pub(crate) sample_rate: u32,
}

impl AudioEntry {
    pub(crate) const MIN_SIZE: i64 = 44;

    pub fn format(&self) -> FourCC {
        self.format
    }

    pub fn channel_count(&self) -> u16 {
        self.channel_count
    }

    pub fn sample_size(&self) -> u16 {
        self.sample_size
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate as f64 / 2_u32.pow(16) as f64
    }

    /// 16.16 fixed-point sample rate as stored.
    pub fn sample_rate_raw(&self) -> u32 {
        self.sample_rate
    }

    fn read(atom: &mut Atom) -> Result<Self, Mp4Error> {
        if (atom.data_size() as i64) < Self::MIN_SIZE {
            return Err(Mp4Error::InvalidSize {
                len: atom.data_size() as i64,
                min: Self::MIN_SIZE,
            });
        }

        let _size: u32 = atom.read_be()?;
        let format: FourCC = atom.read_be()?;
        let _reserved: [u8; 6] = atom.read_be()?;
        let _data_reference_index: u16 = atom.read_be()?;
        let _reserved2: [u32; 2] = atom.read_be()?;
        let channel_count: u16 = atom.read_be()?;
        let sample_size: u16 = atom.read_be()?;
        let _pre_defined: u16 = atom.read_be()?;
        let _reserved3: u16 = atom.read_be()?;
        let sample_rate: u32 = atom.read_be()?;

        Ok(Self {
            format,
            channel_count,
            sample_size,
            sample_rate,
        })
    }
}

/// Metadata sample description: two consecutive
/// null-terminated strings bounded by the payload.
#[derive(Debug, Default)]
pub struct MetadataEntry {
    pub(crate) format: FourCC,
    /// Unset when the string is empty.
    pub(crate) content_encoding: Option<String>,
    /// Unset when the string is empty.
    pub(crate) mime_format: Option<String>,
}

impl MetadataEntry {
    pub(crate) const MIN_SIZE: i64 = 24;

    pub fn format(&self) -> FourCC {
        self.format
    }

    pub fn content_encoding(&self) -> Option<&str> {
        self.content_encoding.as_deref()
    }

    pub fn mime_format(&self) -> Option<&str> {
        self.mime_format.as_deref()
    }

    fn read(atom: &mut Atom) -> Result<Self, Mp4Error> {
        if (atom.data_size() as i64) < Self::MIN_SIZE {
            return Err(Mp4Error::InvalidSize {
                len: atom.data_size() as i64,
                min: Self::MIN_SIZE,
            });
        }

        let _size: u32 = atom.read_be()?;
        let format: FourCC = atom.read_be()?;
        let _reserved: u32 = atom.read_be()?;
        let _reserved2: u16 = atom.read_be()?;
        let _data_reference_index: u16 = atom.read_be()?;

        let content_encoding = read_cstring(&mut atom.cursor, 99)?;
        let mime_format = read_cstring(&mut atom.cursor, 99)?;

        Ok(Self {
            format,
            content_encoding: (!content_encoding.is_empty()).then_some(content_encoding),
            mime_format: (!mime_format.is_empty()).then_some(mime_format),
        })
    }
}
