//! The parsed box tree and the recursive descent that builds it.
//!
//! The tree is an arena: a flat vector of nodes in pre-order,
//! linked by integer indices for parent, first child, and
//! previous/next sibling. Teardown is the arena drop.
//!
//! The parser reads sibling boxes until the parent's payload
//! budget is exhausted, dispatching each payload on the
//! (parent type, box type) pair. Leaf payloads are buffered
//! into bounded cursors; containers recurse. After a payload
//! parser returns, the reader is repositioned to the next
//! sibling's first byte before the next header is decoded.

use std::io::{Read, Seek, SeekFrom};

use log::debug;

use crate::{
    atom_types::{
        meta, udta, Co64, Ftyp, Hdlr, Hmhd, Mdhd, Mvhd, Nmhd, SampleEntry, Smhd, Stco, Stsc,
        Stsd, Stss, Stsz, Stts, Tkhd, Tref, Vmhd,
    },
    demux::DemuxState,
    fourcc::{self, FourCC},
    reader::Mp4Reader,
    track::{Track, TrackKind, TrackReference, VideoCodec},
    Mp4Error,
};

use super::{Atom, AtomHeader};

/// A node in the parsed box tree.
#[derive(Debug)]
pub struct BoxNode {
    pub(crate) header: AtomHeader,
    pub(crate) parent: Option<usize>,
    pub(crate) first_child: Option<usize>,
    pub(crate) prev_sibling: Option<usize>,
    pub(crate) next_sibling: Option<usize>,
}

impl BoxNode {
    pub fn header(&self) -> &AtomHeader {
        &self.header
    }

    pub fn parent(&self) -> Option<usize> {
        self.parent
    }

    pub fn first_child(&self) -> Option<usize> {
        self.first_child
    }

    pub fn prev_sibling(&self) -> Option<usize> {
        self.prev_sibling
    }

    pub fn next_sibling(&self) -> Option<usize> {
        self.next_sibling
    }
}

/// The parsed box tree. Nodes are stored in encounter
/// (pre-) order, so iteration yields a depth-first walk.
#[derive(Debug, Default)]
pub struct BoxTree {
    pub(crate) nodes: Vec<BoxNode>,
}

impl BoxTree {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&BoxNode> {
        self.nodes.get(index)
    }

    /// Depth-first iteration over all nodes.
    pub fn iter(&self) -> impl Iterator<Item = &BoxNode> {
        self.nodes.iter()
    }

    /// Iterates the top-level boxes.
    pub fn roots(&self) -> Siblings<'_> {
        Siblings {
            tree: self,
            next: (!self.nodes.is_empty()).then_some(0),
        }
    }

    /// Iterates the direct children of the node at `index`.
    pub fn children(&self, index: usize) -> Siblings<'_> {
        Siblings {
            tree: self,
            next: self.nodes.get(index).and_then(|n| n.first_child),
        }
    }

    /// Returns the first node with specified FourCC
    /// in depth-first order.
    pub fn find(&self, name: FourCC) -> Option<&BoxNode> {
        self.nodes.iter().find(|n| n.header.name == name)
    }

    pub(crate) fn attach(
        &mut self,
        header: AtomHeader,
        parent: Option<usize>,
        prev: Option<usize>,
    ) -> usize {
        let index = self.nodes.len();
        self.nodes.push(BoxNode {
            header,
            parent,
            first_child: None,
            prev_sibling: prev,
            next_sibling: None,
        });
        match prev {
            Some(p) => self.nodes[p].next_sibling = Some(index),
            None => {
                if let Some(p) = parent {
                    self.nodes[p].first_child = Some(index);
                }
            }
        }
        index
    }

    pub(crate) fn name(&self, index: usize) -> FourCC {
        self.nodes[index].header.name
    }

    pub(crate) fn parent_name(&self, index: usize) -> Option<FourCC> {
        self.nodes[index].parent.map(|p| self.name(p))
    }

    pub(crate) fn grandparent_name(&self, index: usize) -> Option<FourCC> {
        self.nodes[index]
            .parent
            .and_then(|p| self.nodes[p].parent)
            .map(|g| self.name(g))
    }
}

/// Sibling iterator over the arena's index links.
pub struct Siblings<'a> {
    tree: &'a BoxTree,
    next: Option<usize>,
}

impl<'a> Iterator for Siblings<'a> {
    type Item = &'a BoxNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.tree.nodes.get(self.next?)?;
        self.next = node.next_sibling;
        Some(node)
    }
}

fn ensure_min(len: i64, min: i64) -> Result<(), Mp4Error> {
    if len < min {
        return Err(Mp4Error::InvalidSize { len, min });
    }
    Ok(())
}

/// Single-pass recursive descent over the box tree,
/// populating the demux state as it goes.
pub(crate) struct TreeParser<'a, R> {
    pub(crate) reader: &'a mut Mp4Reader<R>,
    pub(crate) tree: &'a mut BoxTree,
    pub(crate) state: &'a mut DemuxState,
}

impl<'a, R: Read + Seek> TreeParser<'a, R> {
    pub(crate) fn parse(&mut self) -> Result<(), Mp4Error> {
        let max_bytes = self.reader.len() as i64;
        self.parse_children(None, max_bytes, None)?;
        Ok(())
    }

    /// Parses sibling boxes until `max_bytes` is exhausted or a
    /// box extending to end of stream is encountered. Returns the
    /// number of bytes consumed.
    fn parse_children(
        &mut self,
        parent: Option<usize>,
        max_bytes: i64,
        track: Option<usize>,
    ) -> Result<i64, Mp4Error> {
        let mut parent_read: i64 = 0;
        let mut prev: Option<usize> = None;

        // Inclusive bound: a header-only box (8 bytes, e.g.
        // `free` padding) may be the last child. The ilst
        // pre-count pass uses the same boundary.
        while self.reader.pos()? < self.reader.len() && parent_read + 8 <= max_bytes {
            let header = self.reader.read_header()?;
            let real_size = header.atom_size as i64;
            let last = header.last;

            if max_bytes < parent_read + real_size {
                return Err(Mp4Error::InvalidSize {
                    len: max_bytes,
                    min: parent_read + real_size,
                });
            }

            if parent.map(|p| self.tree.name(p)) == Some(fourcc::ILST) {
                debug!(
                    "offset {:#x} metadata box size {}",
                    header.offset, header.atom_size
                );
            } else {
                debug!(
                    "offset {:#x} box '{}' size {}",
                    header.offset, header.name, header.atom_size
                );
            }

            let end = header.end();
            let payload = real_size - header.header_size as i64;
            let index = self.tree.attach(header, parent, prev);
            prev = Some(index);

            let consumed = self.dispatch(index, payload, track)?;
            if consumed > payload {
                return Err(Mp4Error::ReadMismatch {
                    got: consumed as u64,
                    expected: payload as u64,
                });
            }

            // Land exactly on the next sibling's first byte.
            self.reader.seek(SeekFrom::Start(end))?;

            parent_read += real_size;
            if last {
                break;
            }
        }

        Ok(parent_read)
    }

    /// Buffers a leaf box payload into a bounded cursor.
    fn leaf(&mut self, index: usize) -> Result<Atom, Mp4Error> {
        let header = self.tree.nodes[index].header.clone();
        let cursor = self.reader.cursor(header.data_size() as usize)?;
        Ok(Atom::new(header, cursor))
    }

    fn require_track(&self, track: Option<usize>) -> Result<usize, Mp4Error> {
        track.ok_or(Mp4Error::InvalidArgument("invalid track"))
    }

    /// Dispatches one box payload on the (parent type, box type)
    /// pair. Returns the number of payload bytes consumed; the
    /// caller seeks past the remainder.
    fn dispatch(
        &mut self,
        index: usize,
        payload: i64,
        track: Option<usize>,
    ) -> Result<i64, Mp4Error> {
        let name = self.tree.name(index);
        let parent_name = self.tree.parent_name(index);

        match name {
            fourcc::MOOV
            | fourcc::UDTA
            | fourcc::MDIA
            | fourcc::MINF
            | fourcc::DINF
            | fourcc::STBL => self.parse_children(Some(index), payload, track),

            fourcc::TRAK => {
                // Fresh track context for the subtree's leaf parsers.
                self.state.tracks.push(Track::default());
                let t = self.state.tracks.len() - 1;
                self.parse_children(Some(index), payload, Some(t))
            }

            fourcc::FTYP => {
                ensure_min(payload, Ftyp::MIN_SIZE)?;
                let mut atom = self.leaf(index)?;
                let ftyp: Ftyp = atom.read_be_args::<Ftyp>(binrw::args! {
                    data_size: payload as u32
                })?;
                debug!(
                    "ftyp: major_brand='{}' minor_version={}",
                    ftyp.major_brand, ftyp.minor_version
                );
                self.state.major_brand = ftyp.major_brand;
                self.state.minor_version = ftyp.minor_version;
                self.state.compatible_brands = ftyp.compatible_brands;
                Ok(payload)
            }

            fourcc::MVHD => {
                let mut atom = self.leaf(index)?;
                let version = atom.cursor.get_ref().first().copied().unwrap_or(0);
                ensure_min(payload, Mvhd::min_size(version))?;
                let mvhd: Mvhd = atom.read_be()?;
                debug!(
                    "mvhd: timescale={} duration={}",
                    mvhd.time_scale, mvhd.duration
                );
                self.state.time_scale = mvhd.time_scale;
                self.state.duration = mvhd.duration;
                self.state.creation_time = mvhd.creation_time;
                self.state.modification_time = mvhd.modification_time;
                Ok(payload)
            }

            fourcc::TKHD => {
                let t = self.require_track(track)?;
                let mut atom = self.leaf(index)?;
                let version = atom.cursor.get_ref().first().copied().unwrap_or(0);
                ensure_min(payload, Tkhd::min_size(version))?;
                let tkhd: Tkhd = atom.read_be()?;
                debug!("tkhd: track_id={}", tkhd.track_id);
                self.state.tracks[t].id = tkhd.track_id;
                self.state.tracks[t].duration_movie = tkhd.duration;
                Ok(payload)
            }

            fourcc::TREF => {
                let t = self.require_track(track)?;
                ensure_min(payload, Tref::MIN_SIZE)?;
                let mut atom = self.leaf(index)?;
                // Only the first reference is read.
                let tref: Tref = atom.read_be()?;
                debug!(
                    "tref: reference_type='{}' track_id={}",
                    tref.reference_type, tref.track_id
                );
                self.state.tracks[t].reference = Some(TrackReference {
                    kind: tref.reference_type,
                    track_id: tref.track_id,
                });
                Ok(payload)
            }

            fourcc::MDHD => {
                let t = self.require_track(track)?;
                let mut atom = self.leaf(index)?;
                let version = atom.cursor.get_ref().first().copied().unwrap_or(0);
                ensure_min(payload, Mdhd::min_size(version))?;
                let mdhd: Mdhd = atom.read_be()?;
                debug!(
                    "mdhd: timescale={} duration={} language='{}'",
                    mdhd.time_scale, mdhd.duration, mdhd.language
                );
                let track = &mut self.state.tracks[t];
                track.time_scale = mdhd.time_scale;
                track.duration = mdhd.duration;
                track.creation_time = mdhd.creation_time;
                track.modification_time = mdhd.modification_time;
                track.language = mdhd.language;
                Ok(payload)
            }

            fourcc::HDLR => {
                ensure_min(payload, Hdlr::MIN_SIZE)?;
                let mut atom = self.leaf(index)?;
                let mut hdlr: Hdlr = atom.read_be()?;
                hdlr.name = crate::support::read_cstring(&mut atom.cursor, 99)?;
                debug!(
                    "hdlr: handler_type='{}' name='{}'",
                    hdlr.handler_type, hdlr.name
                );
                // Only the media handler declares the track type.
                if parent_name == Some(fourcc::MDIA) {
                    if let Some(t) = track {
                        self.state.tracks[t].kind = TrackKind::from(hdlr.handler_type);
                    }
                }
                Ok(payload)
            }

            fourcc::VMHD => {
                ensure_min(payload, Vmhd::MIN_SIZE)?;
                let mut atom = self.leaf(index)?;
                let vmhd: Vmhd = atom.read_be()?;
                debug!("vmhd: graphicsmode={}", vmhd.graphics_mode);
                Ok(payload)
            }

            fourcc::SMHD => {
                ensure_min(payload, Smhd::MIN_SIZE)?;
                let mut atom = self.leaf(index)?;
                let smhd: Smhd = atom.read_be()?;
                debug!("smhd: balance={}", smhd.balance);
                Ok(payload)
            }

            fourcc::HMHD => {
                ensure_min(payload, Hmhd::MIN_SIZE)?;
                let mut atom = self.leaf(index)?;
                let hmhd: Hmhd = atom.read_be()?;
                debug!(
                    "hmhd: maxbitrate={} avgbitrate={}",
                    hmhd.max_bitrate, hmhd.avg_bitrate
                );
                Ok(payload)
            }

            fourcc::NMHD => {
                ensure_min(payload, Nmhd::MIN_SIZE)?;
                let mut atom = self.leaf(index)?;
                let _nmhd: Nmhd = atom.read_be()?;
                Ok(payload)
            }

            fourcc::STSD => {
                let t = self.require_track(track)?;
                ensure_min(payload, Stsd::MIN_SIZE)?;
                let mut atom = self.leaf(index)?;
                // Entry layout depends on the handler type
                // declared by the preceding `hdlr` box.
                let kind = self.state.tracks[t].kind;
                let stsd = Stsd::read(&mut atom, kind)?;
                self.apply_stsd(t, &stsd);
                Ok(payload)
            }

            fourcc::STTS => {
                let t = self.require_track(track)?;
                if self.state.tracks[t].time_to_sample.is_some() {
                    return Err(Mp4Error::AlreadyDefined("stts"));
                }
                ensure_min(payload, Stts::MIN_SIZE)?;
                let mut atom = self.leaf(index)?;
                let stts: Stts = atom.read_be()?;
                debug!("stts: entry_count={}", stts.table().len());
                self.state.tracks[t].time_to_sample = Some(stts.into_table());
                Ok(payload)
            }

            fourcc::STSS => {
                let t = self.require_track(track)?;
                if self.state.tracks[t].sync_samples.is_some() {
                    return Err(Mp4Error::AlreadyDefined("stss"));
                }
                ensure_min(payload, Stss::MIN_SIZE)?;
                let mut atom = self.leaf(index)?;
                let stss: Stss = atom.read_be()?;
                debug!("stss: entry_count={}", stss.len());
                self.state.tracks[t].sync_samples = Some(stss.into_table());
                Ok(payload)
            }

            fourcc::STSZ => {
                let t = self.require_track(track)?;
                if self.state.tracks[t].sample_sizes.is_some() {
                    return Err(Mp4Error::AlreadyDefined("stsz"));
                }
                ensure_min(payload, Stsz::MIN_SIZE)?;
                let mut atom = self.leaf(index)?;
                let stsz: Stsz = atom.read_be()?;
                debug!(
                    "stsz: sample_size={} sample_count={}",
                    stsz.sample_size, stsz.sample_count
                );
                self.state.tracks[t].sample_count = stsz.sample_count;
                self.state.tracks[t].sample_sizes = Some(stsz.sizes);
                Ok(payload)
            }

            fourcc::STSC => {
                let t = self.require_track(track)?;
                if self.state.tracks[t].sample_to_chunk.is_some() {
                    return Err(Mp4Error::AlreadyDefined("stsc"));
                }
                ensure_min(payload, Stsc::MIN_SIZE)?;
                let mut atom = self.leaf(index)?;
                let stsc: Stsc = atom.read_be()?;
                debug!("stsc: entry_count={}", stsc.table().len());
                self.state.tracks[t].sample_to_chunk = Some(stsc.into_table());
                Ok(payload)
            }

            fourcc::STCO => {
                let t = self.require_track(track)?;
                // stco and co64 are mutually exclusive.
                if self.state.tracks[t].chunk_offsets.is_some() {
                    return Err(Mp4Error::AlreadyDefined("stco"));
                }
                ensure_min(payload, Stco::MIN_SIZE)?;
                let mut atom = self.leaf(index)?;
                let stco: Stco = atom.read_be()?;
                debug!("stco: entry_count={}", stco.len());
                self.state.tracks[t].chunk_offsets = Some(Co64::from(stco).into_offsets());
                Ok(payload)
            }

            fourcc::CO64 => {
                let t = self.require_track(track)?;
                if self.state.tracks[t].chunk_offsets.is_some() {
                    return Err(Mp4Error::AlreadyDefined("co64"));
                }
                ensure_min(payload, Co64::MIN_SIZE)?;
                let mut atom = self.leaf(index)?;
                let co64: Co64 = atom.read_be()?;
                debug!("co64: entry_count={}", co64.len());
                self.state.tracks[t].chunk_offsets = Some(co64.into_offsets());
                Ok(payload)
            }

            fourcc::META => match parent_name {
                // Under `udta` the box is a full box: consume
                // version and flags, then recurse.
                Some(fourcc::UDTA) => {
                    ensure_min(payload, 4)?;
                    let _version_flags: u32 = self.reader.read_be()?;
                    let consumed = self.parse_children(Some(index), payload - 4, track)?;
                    Ok(consumed + 4)
                }
                Some(fourcc::MOOV) => self.parse_children(Some(index), payload, track),
                _ => Ok(0),
            },

            fourcc::ILST => {
                // Under `udta/meta`, pre-count the children so the
                // tag store can be allocated up front.
                if self.tree.grandparent_name(index) == Some(fourcc::UDTA) {
                    let count = self.count_ilst_children(payload)?;
                    debug!("ilst: {count} children");
                    self.state.metadata.udta_tags.reserve(count);
                }
                self.parse_children(Some(index), payload, track)
            }

            fourcc::KEYS => match parent_name {
                Some(fourcc::META) => {
                    ensure_min(payload, meta::KEYS_MIN_SIZE)?;
                    let mut atom = self.leaf(index)?;
                    let keys = meta::parse_keys(&mut atom)?;
                    debug!("keys: entry_count={}", keys.len());
                    self.state.metadata.meta_values = vec![None; keys.len()];
                    self.state.metadata.meta_keys = keys;
                    Ok(payload)
                }
                _ => Ok(0),
            },

            fourcc::DATA => {
                // The tag box holding this `data` decides where
                // the value goes.
                let tag = parent_name.ok_or(Mp4Error::InvalidArgument("data box without parent"))?;
                ensure_min(payload, meta::DATA_MIN_SIZE)?;
                let mut atom = self.leaf(index)?;
                meta::parse_data(&mut atom, tag, &mut self.state.metadata)?;
                Ok(payload)
            }

            fourcc::XYZ => match parent_name {
                Some(fourcc::UDTA) => {
                    ensure_min(payload, udta::XYZ_MIN_SIZE)?;
                    let mut atom = self.leaf(index)?;
                    let location = udta::parse_xyz(&mut atom, name)?;
                    debug!("xyz: location='{}'", location.value());
                    self.state.metadata.location = Some(location);
                    Ok(payload)
                }
                _ => Ok(0),
            },

            _ => {
                // An unknown box under `ilst` is a tag box whose
                // nested `data` is parsed with the outer FourCC as
                // its key; anything else is skipped.
                if parent_name == Some(fourcc::ILST) {
                    self.parse_children(Some(index), payload, track)
                } else {
                    Ok(0)
                }
            }
        }
    }

    fn apply_stsd(&mut self, t: usize, stsd: &Stsd) {
        let track = &mut self.state.tracks[t];
        for entry in stsd.entries() {
            match entry {
                SampleEntry::Video(video) => {
                    track.width = video.width;
                    track.height = video.height;
                    if let Some(avc) = &video.avc {
                        track.video_codec = VideoCodec::Avc;
                        if track.avc.is_none() {
                            track.avc = Some(avc.clone());
                        }
                    }
                }
                SampleEntry::Audio(audio) => {
                    track.audio_channel_count = audio.channel_count;
                    track.audio_sample_size = audio.sample_size;
                    track.audio_sample_rate = audio.sample_rate;
                }
                SampleEntry::Metadata(metadata) => {
                    if metadata.content_encoding.is_some() {
                        track.metadata_content_encoding = metadata.content_encoding.clone();
                    }
                    if metadata.mime_format.is_some() {
                        track.metadata_mime_format = metadata.mime_format.clone();
                    }
                }
                SampleEntry::Other => {}
            }
        }
    }

    /// Cheap sub-pass that counts the direct children of an
    /// `ilst` box by reading headers only, then rewinds.
    fn count_ilst_children(&mut self, max_bytes: i64) -> Result<usize, Mp4Error> {
        ensure_min(max_bytes, 8)?;

        let mut total: i64 = 0;
        let mut count = 0_usize;

        while total + 8 <= max_bytes {
            let size: u32 = self.reader.read_be()?;
            let _name: FourCC = self.reader.fourcc()?;
            let mut header_read: i64 = 8;
            let real_size: i64 = match size {
                0 => return Err(Mp4Error::Unsupported("size == 0 for a list element")),
                1 => {
                    if max_bytes < header_read + 16 {
                        return Err(Mp4Error::InvalidSize {
                            len: max_bytes,
                            min: header_read + 16,
                        });
                    }
                    header_read = 16;
                    self.reader.read_be::<u64>()? as i64
                }
                n => n as i64,
            };
            if real_size < header_read {
                return Err(Mp4Error::InvalidSize {
                    len: real_size,
                    min: header_read,
                });
            }

            count += 1;

            self.reader.skip(real_size - header_read)?;
            total += real_size;
        }

        self.reader.skip(-total)?;

        Ok(count)
    }
}
