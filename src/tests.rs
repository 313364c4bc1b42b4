#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use crate::{fourcc, CoverType, Demux, FourCC, Mp4Error, TrackKind, VideoCodec};

    const SPS: &[u8] = &[0x67, 0x64, 0x00, 0x28];
    const PPS: &[u8] = &[0x68, 0xEE, 0x3C, 0x80];
    const JPEG: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x01, 0x02, 0x03, 0x04];

    // ----------------------
    // Synthetic file builders
    // ----------------------

    fn atom(name: &[u8; 4], payload: &[u8]) -> Vec<u8> {
        let mut buf = Vec::with_capacity(8 + payload.len());
        buf.extend_from_slice(&(payload.len() as u32 + 8).to_be_bytes());
        buf.extend_from_slice(name);
        buf.extend_from_slice(payload);
        buf
    }

    fn full_atom(name: &[u8; 4], version: u8, payload: &[u8]) -> Vec<u8> {
        let mut body = vec![version, 0, 0, 0];
        body.extend_from_slice(payload);
        atom(name, &body)
    }

    fn ftyp() -> Vec<u8> {
        let mut p = Vec::new();
        p.extend_from_slice(b"isom");
        p.extend_from_slice(&512_u32.to_be_bytes());
        p.extend_from_slice(b"isom");
        p.extend_from_slice(b"avc1");
        atom(b"ftyp", &p)
    }

    fn mvhd(time_scale: u32, duration: u32) -> Vec<u8> {
        let mut p = Vec::new();
        p.extend_from_slice(&0_u32.to_be_bytes()); // creation_time
        p.extend_from_slice(&0_u32.to_be_bytes()); // modification_time
        p.extend_from_slice(&time_scale.to_be_bytes());
        p.extend_from_slice(&duration.to_be_bytes());
        p.extend_from_slice(&0x0001_0000_u32.to_be_bytes()); // rate
        p.extend_from_slice(&0x0100_u16.to_be_bytes()); // volume
        p.extend_from_slice(&[0_u8; 10]); // reserved
        p.extend_from_slice(&[0_u8; 36]); // matrix
        p.extend_from_slice(&[0_u8; 24]); // pre_defined
        p.extend_from_slice(&2_u32.to_be_bytes()); // next_track_id
        full_atom(b"mvhd", 0, &p)
    }

    fn tkhd(track_id: u32, duration: u32) -> Vec<u8> {
        let mut p = Vec::new();
        p.extend_from_slice(&0_u32.to_be_bytes()); // creation_time
        p.extend_from_slice(&0_u32.to_be_bytes()); // modification_time
        p.extend_from_slice(&track_id.to_be_bytes());
        p.extend_from_slice(&[0_u8; 4]); // reserved
        p.extend_from_slice(&duration.to_be_bytes());
        p.extend_from_slice(&[0_u8; 8]); // reserved
        p.extend_from_slice(&0_u16.to_be_bytes()); // layer
        p.extend_from_slice(&0_u16.to_be_bytes()); // alternate_group
        p.extend_from_slice(&0_u16.to_be_bytes()); // volume
        p.extend_from_slice(&[0_u8; 2]); // reserved
        p.extend_from_slice(&[0_u8; 36]); // matrix
        p.extend_from_slice(&(1280_u32 << 16).to_be_bytes()); // width
        p.extend_from_slice(&(720_u32 << 16).to_be_bytes()); // height
        full_atom(b"tkhd", 0, &p)
    }

    fn mdhd(time_scale: u32, duration: u32) -> Vec<u8> {
        let mut p = Vec::new();
        p.extend_from_slice(&0_u32.to_be_bytes()); // creation_time
        p.extend_from_slice(&0_u32.to_be_bytes()); // modification_time
        p.extend_from_slice(&time_scale.to_be_bytes());
        p.extend_from_slice(&duration.to_be_bytes());
        p.extend_from_slice(&0x55C4_u16.to_be_bytes()); // language "und"
        p.extend_from_slice(&0_u16.to_be_bytes()); // quality
        full_atom(b"mdhd", 0, &p)
    }

    fn hdlr(handler: &[u8; 4], name: &str) -> Vec<u8> {
        let mut p = Vec::new();
        p.extend_from_slice(&0_u32.to_be_bytes()); // pre_defined
        p.extend_from_slice(handler);
        p.extend_from_slice(&[0_u8; 12]); // reserved
        p.extend_from_slice(name.as_bytes());
        p.push(0);
        full_atom(b"hdlr", 0, &p)
    }

    fn vmhd() -> Vec<u8> {
        let mut p = Vec::new();
        p.extend_from_slice(&0_u16.to_be_bytes()); // graphicsmode
        p.extend_from_slice(&[0_u8; 6]); // opcolor
        full_atom(b"vmhd", 0, &p)
    }

    fn smhd() -> Vec<u8> {
        let mut p = Vec::new();
        p.extend_from_slice(&0_u16.to_be_bytes()); // balance
        p.extend_from_slice(&0_u16.to_be_bytes()); // reserved
        full_atom(b"smhd", 0, &p)
    }

    fn avcc_payload(sps: &[u8], pps: &[u8]) -> Vec<u8> {
        let mut p = vec![1, 0x64, 0x00, 0x28, 0xFF, 0xE1];
        p.extend_from_slice(&(sps.len() as u16).to_be_bytes());
        p.extend_from_slice(sps);
        p.push(1);
        p.extend_from_slice(&(pps.len() as u16).to_be_bytes());
        p.extend_from_slice(pps);
        p
    }

    fn stsd_video(width: u16, height: u16, sps: &[u8], pps: &[u8]) -> Vec<u8> {
        let avcc = atom(b"avcC", &avcc_payload(sps, pps));

        let mut body = Vec::new();
        body.extend_from_slice(&[0_u8; 6]); // reserved
        body.extend_from_slice(&1_u16.to_be_bytes()); // data_reference_index
        body.extend_from_slice(&[0_u8; 16]); // pre_defined/reserved
        body.extend_from_slice(&width.to_be_bytes());
        body.extend_from_slice(&height.to_be_bytes());
        body.extend_from_slice(&0x0048_0000_u32.to_be_bytes()); // horizresolution
        body.extend_from_slice(&0x0048_0000_u32.to_be_bytes()); // vertresolution
        body.extend_from_slice(&[0_u8; 4]); // reserved
        body.extend_from_slice(&1_u16.to_be_bytes()); // frame_count
        let mut compressor = [0_u8; 32];
        compressor[0] = 4;
        compressor[1..5].copy_from_slice(b"h264");
        body.extend_from_slice(&compressor);
        body.extend_from_slice(&24_u16.to_be_bytes()); // depth
        body.extend_from_slice(&0xFFFF_u16.to_be_bytes()); // pre_defined
        body.extend_from_slice(&avcc);

        let mut p = Vec::new();
        p.extend_from_slice(&1_u32.to_be_bytes()); // entry_count
        p.extend_from_slice(&(body.len() as u32 + 8).to_be_bytes());
        p.extend_from_slice(b"avc1");
        p.extend_from_slice(&body);
        full_atom(b"stsd", 0, &p)
    }

    fn stsd_audio(channels: u16, sample_size: u16, rate_hz: u16) -> Vec<u8> {
        let mut body = Vec::new();
        body.extend_from_slice(&[0_u8; 6]); // reserved
        body.extend_from_slice(&1_u16.to_be_bytes()); // data_reference_index
        body.extend_from_slice(&[0_u8; 8]); // reserved
        body.extend_from_slice(&channels.to_be_bytes());
        body.extend_from_slice(&sample_size.to_be_bytes());
        body.extend_from_slice(&0_u16.to_be_bytes()); // pre_defined
        body.extend_from_slice(&0_u16.to_be_bytes()); // reserved
        body.extend_from_slice(&((rate_hz as u32) << 16).to_be_bytes());

        let mut p = Vec::new();
        p.extend_from_slice(&1_u32.to_be_bytes()); // entry_count
        p.extend_from_slice(&(body.len() as u32 + 8).to_be_bytes());
        p.extend_from_slice(b"mp4a");
        p.extend_from_slice(&body);
        full_atom(b"stsd", 0, &p)
    }

    fn stts(entries: &[(u32, u32)]) -> Vec<u8> {
        let mut p = Vec::new();
        p.extend_from_slice(&(entries.len() as u32).to_be_bytes());
        for (count, delta) in entries {
            p.extend_from_slice(&count.to_be_bytes());
            p.extend_from_slice(&delta.to_be_bytes());
        }
        full_atom(b"stts", 0, &p)
    }

    fn stss(samples: &[u32]) -> Vec<u8> {
        let mut p = Vec::new();
        p.extend_from_slice(&(samples.len() as u32).to_be_bytes());
        for sample in samples {
            p.extend_from_slice(&sample.to_be_bytes());
        }
        full_atom(b"stss", 0, &p)
    }

    fn stsz(sample_size: u32, count: u32, sizes: &[u32]) -> Vec<u8> {
        let mut p = Vec::new();
        p.extend_from_slice(&sample_size.to_be_bytes());
        p.extend_from_slice(&count.to_be_bytes());
        for size in sizes {
            p.extend_from_slice(&size.to_be_bytes());
        }
        full_atom(b"stsz", 0, &p)
    }

    fn stsc(entries: &[(u32, u32, u32)]) -> Vec<u8> {
        let mut p = Vec::new();
        p.extend_from_slice(&(entries.len() as u32).to_be_bytes());
        for (first_chunk, samples_per_chunk, description) in entries {
            p.extend_from_slice(&first_chunk.to_be_bytes());
            p.extend_from_slice(&samples_per_chunk.to_be_bytes());
            p.extend_from_slice(&description.to_be_bytes());
        }
        full_atom(b"stsc", 0, &p)
    }

    fn stco(offsets: &[u32]) -> Vec<u8> {
        let mut p = Vec::new();
        p.extend_from_slice(&(offsets.len() as u32).to_be_bytes());
        for offset in offsets {
            p.extend_from_slice(&offset.to_be_bytes());
        }
        full_atom(b"stco", 0, &p)
    }

    fn co64(offsets: &[u64]) -> Vec<u8> {
        let mut p = Vec::new();
        p.extend_from_slice(&(offsets.len() as u32).to_be_bytes());
        for offset in offsets {
            p.extend_from_slice(&offset.to_be_bytes());
        }
        full_atom(b"co64", 0, &p)
    }

    fn trak(
        tkhd_atom: Vec<u8>,
        mdhd_atom: Vec<u8>,
        hdlr_atom: Vec<u8>,
        media_header: Vec<u8>,
        stbl_children: &[Vec<u8>],
    ) -> Vec<u8> {
        let stbl = atom(b"stbl", &stbl_children.concat());
        let minf = atom(b"minf", &[media_header, stbl].concat());
        let mdia = atom(b"mdia", &[mdhd_atom, hdlr_atom, minf].concat());
        atom(b"trak", &[tkhd_atom, mdia].concat())
    }

    fn video_trak(stbl_children: &[Vec<u8>]) -> Vec<u8> {
        trak(
            tkhd(1, 270_000),
            mdhd(90_000, 270_000),
            hdlr(b"vide", "VideoHandler"),
            vmhd(),
            stbl_children,
        )
    }

    fn video_file(stbl_children: &[Vec<u8>]) -> Vec<u8> {
        let moov = atom(b"moov", &[mvhd(90_000, 270_000), video_trak(stbl_children)].concat());
        [ftyp(), moov].concat()
    }

    fn data_box(class: u32, value: &[u8]) -> Vec<u8> {
        let mut p = Vec::new();
        p.extend_from_slice(&class.to_be_bytes()); // version & class
        p.extend_from_slice(&[0_u8; 4]); // reserved
        p.extend_from_slice(value);
        atom(b"data", &p)
    }

    fn demux(file: Vec<u8>) -> Demux<Cursor<Vec<u8>>> {
        Demux::from_reader(Cursor::new(file)).unwrap()
    }

    // -----
    // Tests
    // -----

    #[test]
    fn minimal_ftyp_only() {
        let demux = demux(ftyp());

        assert_eq!(demux.major_brand(), FourCC::new(b"isom"));
        assert_eq!(demux.minor_version(), 512);
        assert_eq!(
            demux.compatible_brands(),
            &[FourCC::new(b"isom"), FourCC::new(b"avc1")]
        );
        assert_eq!(demux.track_count(), 0);
    }

    #[test]
    fn single_video_track() {
        let file = video_file(&[
            stsd_video(1280, 720, SPS, PPS),
            stts(&[(3, 90_000)]),
            stsz(4096, 3, &[]),
            stsc(&[(1, 3, 1)]),
            stco(&[0x1000]),
        ]);
        let demux = demux(file);

        assert_eq!(demux.time_scale(), 90_000);
        assert_eq!(demux.duration_unscaled(), 270_000);
        assert_eq!(demux.track_count(), 1);

        let track = demux.track(0).unwrap();
        assert_eq!(track.id(), 1);
        assert_eq!(track.kind(), TrackKind::Video);
        assert_eq!(track.time_scale(), 90_000);
        assert_eq!(track.language(), "und");
        assert_eq!(track.sample_count(), 3);
        assert_eq!(track.width(), 1280);
        assert_eq!(track.height(), 720);
        assert_eq!(track.video_codec(), VideoCodec::Avc);

        let avc = track.avc().unwrap();
        assert_eq!(avc.sps(), SPS);
        assert_eq!(avc.pps(), PPS);
        assert_eq!(avc.profile(), 0x64);
        assert_eq!(avc.nal_length_size(), 4);

        for (i, expected_offset) in [0x1000_u64, 0x2000, 0x3000].iter().enumerate() {
            let info = track.sample_info(i as u32).unwrap();
            assert_eq!(info.offset, *expected_offset);
            assert_eq!(info.size, 4096);
            assert_eq!(info.decode_time, i as u64 * 90_000);
            // No stss table, so every sample is sync.
            assert!(info.sync);
        }

        assert!(track.sample_info(3).is_err());
        assert_eq!(track.seek_prev_sync(180_000).unwrap(), 2);

        // The bulk expansion agrees with per-index lookups.
        let table = track.sample_table().unwrap();
        assert_eq!(table.len(), 3);
        for (i, info) in table.iter().enumerate() {
            assert_eq!(*info, track.sample_info(i as u32).unwrap());
        }
    }

    #[test]
    fn box_tree_structure() {
        let file = video_file(&[
            stsd_video(1280, 720, SPS, PPS),
            stts(&[(3, 90_000)]),
            stsz(4096, 3, &[]),
            stsc(&[(1, 3, 1)]),
            stco(&[0x1000]),
        ]);
        let len = file.len() as u64;
        let demux = demux(file);

        let tree = demux.tree();
        let roots: Vec<_> = tree.roots().map(|n| n.header().name()).collect();
        assert_eq!(roots, vec![fourcc::FTYP, fourcc::MOOV]);

        // Children's total size equals the parent's payload.
        let moov = tree.find(fourcc::MOOV).unwrap();
        let moov_index = tree.iter().position(|n| n.header().name() == fourcc::MOOV).unwrap();
        let children_size: u64 = tree.children(moov_index).map(|n| n.header().atom_size()).sum();
        assert_eq!(children_size, moov.header().data_size());

        // Every box accounts header + payload = total size,
        // and lies within the file.
        for node in tree.iter() {
            let header = node.header();
            assert_eq!(
                header.header_size() as u64 + header.data_size(),
                header.atom_size()
            );
            assert!(header.end() <= len);
        }

        assert!(tree.find(fourcc::STBL).is_some());
        assert!(tree.find(fourcc::STCO).is_some());
    }

    #[test]
    fn co64_64bit_offsets() {
        let file = video_file(&[
            stsd_video(1280, 720, SPS, PPS),
            stts(&[(3, 90_000)]),
            stsz(4096, 3, &[]),
            stsc(&[(1, 3, 1)]),
            co64(&[0x0000_0001_0000_0000]),
        ]);
        let demux = demux(file);

        let info = demux.sample_info(0, 0).unwrap();
        assert_eq!(info.offset, 0x1_0000_0000);
        assert_eq!(demux.sample_info(0, 2).unwrap().offset, 0x1_0000_2000);
    }

    #[test]
    fn audio_video_with_tref() {
        let video = video_trak(&[
            stsd_video(1280, 720, SPS, PPS),
            stts(&[(3, 90_000)]),
            stsz(4096, 3, &[]),
            stsc(&[(1, 3, 1)]),
            stco(&[0x1000]),
        ]);

        // tref { hint { referenced track id } }
        let tref = atom(b"tref", &atom(b"hint", &1_u32.to_be_bytes()));
        let stbl = atom(b"stbl", &stsd_audio(2, 16, 48_000));
        let minf = atom(b"minf", &[smhd(), stbl].concat());
        let mdia = atom(
            b"mdia",
            &[mdhd(48_000, 144_000), hdlr(b"soun", "SoundHandler"), minf].concat(),
        );
        let audio = atom(b"trak", &[tkhd(2, 270_000), tref, mdia].concat());

        let moov = atom(b"moov", &[mvhd(90_000, 270_000), video, audio].concat());
        let demux = demux([ftyp(), moov].concat());

        assert_eq!(demux.track_count(), 2);

        let audio = demux.track_by_id(2).unwrap();
        assert_eq!(audio.kind(), TrackKind::Audio);
        assert_eq!(audio.audio_channel_count(), 2);
        assert_eq!(audio.audio_sample_size(), 16);
        assert_eq!(audio.audio_sample_rate(), 48_000.0);

        let reference = audio.reference().unwrap();
        assert_eq!(reference.kind(), FourCC::new(b"hint"));
        assert_eq!(reference.track_id(), 1);
    }

    #[test]
    fn udta_tags_cover_and_location() {
        let nam = atom(&[0xA9, b'n', b'a', b'm'], &data_box(1, b"Title"));
        let covr = atom(b"covr", &data_box(13, JPEG));
        let ilst = atom(b"ilst", &[nam, covr].concat());

        // meta under udta is a full box: version/flags precede the children
        let mut meta_payload = vec![0_u8; 4];
        meta_payload.extend_from_slice(&ilst);
        let meta = atom(b"meta", &meta_payload);

        let mut xyz_payload = Vec::new();
        xyz_payload.extend_from_slice(&11_u16.to_be_bytes());
        xyz_payload.extend_from_slice(&0x15C7_u16.to_be_bytes());
        xyz_payload.extend_from_slice(b"+12.3+45.6/");
        let xyz = atom(&[0xA9, b'x', b'y', b'z'], &xyz_payload);

        let udta = atom(b"udta", &[meta, xyz].concat());
        let moov = atom(b"moov", &[mvhd(90_000, 270_000), udta].concat());
        let mut demux = demux([ftyp(), moov].concat());

        let metadata = demux.metadata();
        assert_eq!(metadata.udta_tags().len(), 1);
        assert_eq!(metadata.udta_value("©nam"), Some("Title"));

        let cover = metadata.udta_cover().unwrap();
        assert_eq!(cover.kind(), CoverType::Jpeg);
        assert_eq!(cover.size(), JPEG.len() as u32);

        let location = metadata.location().unwrap();
        assert_eq!(location.key(), "©xyz");
        assert_eq!(location.language_code(), 0x15C7);
        assert_eq!(location.value(), "+12.3+45.6/");

        assert_eq!(demux.read_cover_art().unwrap().unwrap(), JPEG);
    }

    #[test]
    fn meta_keys_and_values() {
        // keys { 1 entry "com.test.title" }
        let key = b"com.test.title";
        let mut keys_payload = Vec::new();
        keys_payload.extend_from_slice(&1_u32.to_be_bytes()); // entry_count
        keys_payload.extend_from_slice(&(key.len() as u32 + 8).to_be_bytes());
        keys_payload.extend_from_slice(b"mdta");
        keys_payload.extend_from_slice(key);
        let keys = full_atom(b"keys", 0, &keys_payload);

        // ilst child FourCC is the 1-based index into the keys table
        let entry = atom(&[0, 0, 0, 1], &data_box(1, b"Value"));
        let ilst = atom(b"ilst", &entry);

        // meta under moov nests its children directly
        let meta = atom(b"meta", &[keys, ilst].concat());
        let moov = atom(b"moov", &[mvhd(90_000, 270_000), meta].concat());
        let demux = demux([ftyp(), moov].concat());

        let metadata = demux.metadata();
        assert_eq!(metadata.meta_keys(), &["com.test.title".to_string()]);
        assert_eq!(metadata.meta_value("com.test.title"), Some("Value"));
        assert_eq!(
            metadata.meta_entries().collect::<Vec<_>>(),
            vec![("com.test.title", "Value")]
        );
    }

    #[test]
    fn moov_declared_size_too_small() {
        // moov declares 32 bytes total but its single child
        // claims more than the remaining payload.
        let mut moov = Vec::new();
        moov.extend_from_slice(&32_u32.to_be_bytes());
        moov.extend_from_slice(b"moov");
        moov.extend_from_slice(&40_u32.to_be_bytes());
        moov.extend_from_slice(b"mvhd");
        moov.extend_from_slice(&[0_u8; 16]);

        let result = Demux::from_reader(Cursor::new([ftyp(), moov].concat()));
        assert!(matches!(result, Err(Mp4Error::InvalidSize { .. })));
    }

    #[test]
    fn per_sample_sizes() {
        let file = video_file(&[
            stsd_video(1280, 720, SPS, PPS),
            stts(&[(3, 90_000)]),
            stsz(0, 3, &[100, 200, 300]),
            stsc(&[(1, 3, 1)]),
            stco(&[0x500]),
        ]);
        let demux = demux(file);
        let track = demux.track(0).unwrap();

        assert_eq!(track.sample_info(0).unwrap().offset, 0x500);
        assert_eq!(track.sample_info(1).unwrap().offset, 0x500 + 100);
        assert_eq!(track.sample_info(2).unwrap().offset, 0x500 + 300);
        assert_eq!(track.sample_info(2).unwrap().size, 300);
    }

    #[test]
    fn multiple_chunks() {
        // 4 samples: chunks at 0x100 (2 samples), 0x400 (1), 0x800 (1).
        let file = video_file(&[
            stsd_video(1280, 720, SPS, PPS),
            stts(&[(4, 90_000)]),
            stsz(0, 4, &[10, 20, 30, 40]),
            stsc(&[(1, 2, 1), (2, 1, 1)]),
            stco(&[0x100, 0x400, 0x800]),
        ]);
        let demux = demux(file);
        let track = demux.track(0).unwrap();

        let offsets: Vec<u64> = (0..4)
            .map(|i| track.sample_info(i).unwrap().offset)
            .collect();
        assert_eq!(offsets, vec![0x100, 0x10A, 0x400, 0x800]);

        let table = track.sample_table().unwrap();
        assert_eq!(
            table.iter().map(|s| s.offset).collect::<Vec<_>>(),
            offsets
        );
    }

    #[test]
    fn empty_sample_size_table() {
        // stsz with default == 0 and sample_count == 0 is an
        // empty table, not an error.
        let file = video_file(&[
            stsd_video(1280, 720, SPS, PPS),
            stts(&[]),
            stsz(0, 0, &[]),
            stsc(&[]),
            stco(&[]),
        ]);
        let demux = demux(file);
        let track = demux.track(0).unwrap();

        assert_eq!(track.sample_count(), 0);
        assert!(track.sample_table().unwrap().is_empty());
        assert!(matches!(
            track.sample_info(0),
            Err(Mp4Error::NoSuchSample { .. })
        ));
    }

    #[test]
    fn sync_sample_queries() {
        let file = video_file(&[
            stsd_video(1280, 720, SPS, PPS),
            stts(&[(3, 90_000)]),
            stss(&[1, 3]),
            stsz(4096, 3, &[]),
            stsc(&[(1, 3, 1)]),
            stco(&[0x1000]),
        ]);
        let demux = demux(file);
        let track = demux.track(0).unwrap();

        assert!(track.is_sync_sample(0));
        assert!(!track.is_sync_sample(1));
        assert!(track.is_sync_sample(2));
        assert_eq!(track.sync_sample_table(), Some(&[1_u32, 3][..]));

        // Largest sync sample at or before the timestamp.
        assert_eq!(track.seek_prev_sync(0).unwrap(), 0);
        assert_eq!(track.seek_prev_sync(95_000).unwrap(), 0);
        assert_eq!(track.seek_prev_sync(200_000).unwrap(), 2);
        assert_eq!(track.seek_prev_sync(u64::MAX).unwrap(), 2);

        assert!(!track.sample_info(1).unwrap().sync);
    }

    #[test]
    fn duplicate_sample_table_fails() {
        let file = video_file(&[
            stsd_video(1280, 720, SPS, PPS),
            stts(&[(3, 90_000)]),
            stts(&[(3, 90_000)]),
            stsz(4096, 3, &[]),
            stsc(&[(1, 3, 1)]),
            stco(&[0x1000]),
        ]);
        let result = Demux::from_reader(Cursor::new(file));
        assert!(matches!(result, Err(Mp4Error::AlreadyDefined("stts"))));
    }

    #[test]
    fn chunk_offset_boxes_are_mutually_exclusive() {
        let file = video_file(&[
            stsd_video(1280, 720, SPS, PPS),
            stts(&[(3, 90_000)]),
            stsz(4096, 3, &[]),
            stsc(&[(1, 3, 1)]),
            stco(&[0x1000]),
            co64(&[0x1000]),
        ]);
        let result = Demux::from_reader(Cursor::new(file));
        assert!(matches!(result, Err(Mp4Error::AlreadyDefined("co64"))));
    }

    #[test]
    fn large_size_header() {
        // 64-bit box size: short size 1, largesize after the FourCC.
        let mut p = Vec::new();
        p.extend_from_slice(b"isom");
        p.extend_from_slice(&512_u32.to_be_bytes());
        p.extend_from_slice(b"isom");

        let mut file = Vec::new();
        file.extend_from_slice(&1_u32.to_be_bytes());
        file.extend_from_slice(b"ftyp");
        file.extend_from_slice(&(p.len() as u64 + 16).to_be_bytes());
        file.extend_from_slice(&p);

        let demux = demux(file);
        assert_eq!(demux.major_brand(), FourCC::new(b"isom"));
        assert_eq!(demux.compatible_brands(), &[FourCC::new(b"isom")]);

        let header = demux.tree().find(fourcc::FTYP).unwrap().header();
        assert_eq!(header.header_size(), 16);
    }

    #[test]
    fn zero_size_box_extends_to_eof() {
        let mut file = ftyp();
        file.extend_from_slice(&0_u32.to_be_bytes());
        file.extend_from_slice(b"mdat");
        file.extend_from_slice(&[0xAB_u8; 16]);

        let len = file.len() as u64;
        let demux = demux(file);

        let header = demux.tree().find(fourcc::MDAT).unwrap().header();
        assert!(header.is_last());
        assert_eq!(header.end(), len);
        assert_eq!(header.data_size(), 16);
    }

    #[test]
    fn header_only_trailing_box() {
        // An 8-byte box (header only, e.g. `free` padding) as the
        // last child of a container and as the last box in the
        // file must still end up in the tree.
        let free = atom(b"free", &[]);
        let moov = atom(
            b"moov",
            &[mvhd(90_000, 270_000), free.clone()].concat(),
        );
        let mut file = [ftyp(), moov].concat();
        file.extend_from_slice(&free);

        let demux = demux(file);
        let tree = demux.tree();

        let frees: Vec<_> = tree
            .iter()
            .filter(|n| n.header().name() == FourCC::new(b"free"))
            .collect();
        assert_eq!(frees.len(), 2);
        for node in frees {
            assert_eq!(node.header().atom_size(), 8);
            assert_eq!(node.header().data_size(), 0);
        }

        // One sits under moov, one at root.
        let roots: Vec<_> = tree.roots().map(|n| n.header().name()).collect();
        assert_eq!(
            roots,
            vec![fourcc::FTYP, fourcc::MOOV, FourCC::new(b"free")]
        );
    }

    #[test]
    fn ilst_zero_size_child_is_unsupported() {
        let mut ilst_payload = Vec::new();
        ilst_payload.extend_from_slice(&0_u32.to_be_bytes());
        ilst_payload.extend_from_slice(b"Xnam");
        let ilst = atom(b"ilst", &ilst_payload);

        let mut meta_payload = vec![0_u8; 4];
        meta_payload.extend_from_slice(&ilst);
        let meta = atom(b"meta", &meta_payload);

        let udta = atom(b"udta", &meta);
        let moov = atom(b"moov", &[mvhd(90_000, 270_000), udta].concat());

        let result = Demux::from_reader(Cursor::new([ftyp(), moov].concat()));
        assert!(matches!(result, Err(Mp4Error::Unsupported(_))));
    }

    #[test]
    fn read_sample_bytes() {
        let stbl_children = |offset: u32| {
            vec![
                stsd_video(1280, 720, SPS, PPS),
                stts(&[(3, 90_000)]),
                stsz(4, 3, &[]),
                stsc(&[(1, 3, 1)]),
                stco(&[offset]),
            ]
        };

        // First pass with a placeholder offset to size the moov,
        // then rebuild pointing into the real mdat payload.
        let placeholder = video_file(&stbl_children(0));
        let mdat_payload_offset = placeholder.len() as u32 + 8;
        let mut file = video_file(&stbl_children(mdat_payload_offset));
        file.extend(atom(b"mdat", b"AAAABBBBCCCC"));

        let mut demux = demux(file);
        assert_eq!(demux.read_sample(0, 0).unwrap(), b"AAAA");
        assert_eq!(demux.read_sample(0, 1).unwrap(), b"BBBB");
        assert_eq!(demux.read_sample(0, 2).unwrap(), b"CCCC");
    }

    #[test]
    fn repeated_parse_is_identical() {
        let file = video_file(&[
            stsd_video(1280, 720, SPS, PPS),
            stts(&[(3, 90_000)]),
            stss(&[1]),
            stsz(0, 3, &[100, 200, 300]),
            stsc(&[(1, 3, 1)]),
            stco(&[0x1000]),
        ]);

        let first = demux(file.clone());
        let second = demux(file);

        assert_eq!(first.major_brand(), second.major_brand());
        assert_eq!(first.track_count(), second.track_count());

        let a = first.track(0).unwrap();
        let b = second.track(0).unwrap();
        assert_eq!(a.sample_table().unwrap(), b.sample_table().unwrap());
        assert_eq!(a.sync_sample_table(), b.sync_sample_table());
        assert_eq!(a.language(), b.language());
    }

    #[test]
    fn fourcc_formatting() {
        assert_eq!(FourCC::new(b"moov").to_str(), "moov");
        assert_eq!(FourCC::new(b"\xa9nam").to_str(), "©nam");
        assert_eq!(format!("{}", FourCC::new(b"avc1")), "avc1");
        assert_eq!(FourCC::new(b"moov"), FourCC::from_u32(0x6D6F6F76));
    }

    #[test]
    fn metadata_track_sample_description() {
        let mut body = Vec::new();
        body.extend_from_slice(&[0_u8; 6]); // reserved
        body.extend_from_slice(&1_u16.to_be_bytes()); // data_reference_index
        body.extend_from_slice(b"text/plain\0");
        body.extend_from_slice(b"application/json\0");

        let mut p = Vec::new();
        p.extend_from_slice(&1_u32.to_be_bytes()); // entry_count
        p.extend_from_slice(&(body.len() as u32 + 8).to_be_bytes());
        p.extend_from_slice(b"mett");
        p.extend_from_slice(&body);
        let stsd = full_atom(b"stsd", 0, &p);

        let track = trak(
            tkhd(1, 270_000),
            mdhd(90_000, 270_000),
            hdlr(b"meta", "MetadataHandler"),
            full_atom(b"nmhd", 0, &[]),
            &[stsd],
        );
        let moov = atom(b"moov", &[mvhd(90_000, 270_000), track].concat());
        let demux = demux([ftyp(), moov].concat());

        let track = demux.track(0).unwrap();
        assert_eq!(track.kind(), TrackKind::Metadata);
        assert_eq!(track.metadata_content_encoding(), Some("text/plain"));
        assert_eq!(track.metadata_mime_format(), Some("application/json"));
    }
}
