use riffmeta::chunk::header::header_bytes;
use riffmeta::format::info::{TAG_IART, TAG_ICMT, TAG_ICOP, TAG_INAM};
use riffmeta::format::riff::{LIST_POLICY, TAG_LIST};
use riffmeta::{BinaryChunk, Chunk, ListChunk, ParseOptions, Riff, RiffError, StringChunk, WebP};

fn check_sizes(list: &ListChunk) {
    assert_eq!(list.size() as usize, list.dump().len() - 8);
    for (_, chunk) in list.children() {
        if let Chunk::List(sub) = chunk {
            check_sizes(sub);
        }
    }
}

#[test]
fn image_only() {
    let image: Vec<u8> = (0..10).collect();
    let webp = WebP::from_image(image.clone()).unwrap();

    assert_eq!(webp.image(), Some(&image[..]));
    assert!(webp.comment().is_none());
    assert!(webp.metadata().is_empty());
}

#[test]
fn metadata_survives_dump() {
    let image: Vec<u8> = (0..10).collect();
    let mut webp = WebP::from_image(image.clone()).unwrap();
    webp.set_comment(Some("hello")).unwrap();
    webp.set_artist(Some("me")).unwrap();

    let buf = webp.dump();
    let reparsed = WebP::parse(&buf).unwrap();

    assert_eq!(reparsed.comment().unwrap(), "hello");
    assert_eq!(reparsed.artist().unwrap(), "me");
    assert_eq!(reparsed.image(), Some(&image[..]));
    assert!(reparsed.copyright().is_none());

    // Byte for byte stable
    assert_eq!(reparsed.dump(), buf);
    assert_eq!(reparsed, webp);
}

#[test]
fn clear_metadata() {
    let mut webp = WebP::from_image(vec![9; 4]).unwrap();
    webp.set_comment(Some("c")).unwrap();
    webp.set_copyright(Some("(c)")).unwrap();
    webp.set_artist(Some("a")).unwrap();
    webp.set_title(Some("t")).unwrap();
    assert_eq!(webp.metadata().len(), 4);

    webp.clear_metadata();
    assert!(webp.metadata().is_empty());
    assert_eq!(webp.image(), Some(&[9u8; 4][..]));
    assert_eq!(webp.size(), 4 + 8 + 4);

    // Idempotent
    webp.clear_metadata();
    assert_eq!(webp.size(), 4 + 8 + 4);
}

#[test]
fn unknown_tag_rejected() {
    let mut buf = WebP::from_image(vec![1, 2]).unwrap().dump();
    buf.extend_from_slice(&header_bytes(b"XYZW", 0));
    let size = (buf.len() - 8) as u32;
    buf[4..8].copy_from_slice(&size.to_le_bytes());

    assert!(matches!(WebP::parse(&buf), Err(RiffError::UnsupportedTag(_))));
}

#[test]
fn declared_size_too_large() {
    let mut buf = WebP::from_image(vec![1, 2]).unwrap().dump();
    buf[4] += 1;
    assert!(matches!(
        WebP::parse(&buf),
        Err(RiffError::TruncatedPayload { .. })
    ));
}

#[test]
fn string_round_trip() {
    for text in ["", "a", "hello world", "ünïcödé"] {
        let chunk = StringChunk::from_text(TAG_ICMT, text).unwrap();
        assert_eq!(chunk.text(), text.as_bytes());
        assert_eq!(chunk.size() as usize, text.len() + 1);
    }
}

#[test]
fn sizes_track_mutations() {
    let mut webp = WebP::from_image(vec![0; 7]).unwrap();
    let ops: [(&[u8; 4], Option<&str>); 7] = [
        (&TAG_ICMT, Some("one")),
        (&TAG_INAM, Some("two")),
        (&TAG_ICMT, Some("three, longer")),
        (&TAG_ICOP, None),
        (&TAG_INAM, None),
        (&TAG_IART, Some("")),
        (&TAG_ICMT, None),
    ];

    for (tag, value) in ops.iter() {
        match **tag {
            TAG_ICMT => webp.set_comment(*value).unwrap(),
            TAG_ICOP => webp.set_copyright(*value).unwrap(),
            TAG_IART => webp.set_artist(*value).unwrap(),
            _ => webp.set_title(*value).unwrap(),
        }
        check_sizes(&webp);
        assert_eq!(WebP::parse(&webp.dump()).unwrap(), webp);
    }
    assert_eq!(webp.metadata(), vec![(TAG_IART, String::new())]);
}

#[test]
fn riff_with_info() {
    let mut riff = Riff::new(*b"WAVE").unwrap();
    riff.set_info(TAG_INAM, Some("Lenna")).unwrap();
    riff.set_info(TAG_ICOP, Some("PLAYBOY")).unwrap();
    check_sizes(&riff);

    let opts = ParseOptions::from_toml("max_chunk_size = 4096").unwrap();
    let reparsed = Riff::parse_with(&riff.dump(), &opts).unwrap();
    assert_eq!(reparsed.get_info(&TAG_INAM).unwrap(), "Lenna");
    assert_eq!(reparsed, riff);
}

#[test]
fn two_images_rejected() {
    let mut buf = WebP::from_image(vec![1]).unwrap().dump();
    buf.extend_from_slice(&header_bytes(b"VP8 ", 2));
    buf.extend_from_slice(&[2, 3]);
    let size = (buf.len() - 8) as u32;
    buf[4..8].copy_from_slice(&size.to_le_bytes());

    assert!(matches!(WebP::parse(&buf), Err(RiffError::DuplicateChild(_))));
}

#[test]
fn edited_tree_reparses() {
    let mut riff = Riff::new(*b"WAVE").unwrap();

    // An INFO list must carry the INFO vocabulary
    let mut info = ListChunk::new(TAG_LIST, *b"INFO", &LIST_POLICY).unwrap();
    info.edit()
        .set_chunk(BinaryChunk::from_binary(*b"JUNK", vec![1]).unwrap())
        .unwrap();
    assert!(matches!(riff.edit().set_chunk(info), Err(RiffError::WrongChunkKind(_))));

    riff.set_info(TAG_IART, Some("me")).unwrap();
    riff.edit()
        .set_chunk(ListChunk::new(TAG_LIST, *b"adtl", &LIST_POLICY).unwrap())
        .unwrap();
    check_sizes(&riff);
    assert_eq!(Riff::parse(&riff.dump()).unwrap(), riff);
}
