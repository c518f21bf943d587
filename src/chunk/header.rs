use std::io::Write;

use byteorder::{ByteOrder, LittleEndian, WriteBytesExt};
use log::trace;

use crate::config::ParseOptions;
use crate::error::RiffError;

pub const HEADER_SIZE: usize = 8;

/// A chunk header plus the payload slice it covers, nothing has been interpreted yet.
///
/// This is also the "header shaped record" form of a chunk, see [`RawChunk::from_parts`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawChunk<'a> {
    pub tag: [u8; 4],
    pub size: u32,
    pub payload: &'a [u8],
}

impl<'a> RawChunk<'a> {
    /// Builds a record from its parts, the declared size must match the payload.
    pub fn from_parts(tag: [u8; 4], size: u32, payload: &'a [u8]) -> Result<Self, RiffError> {
        if size as usize != payload.len() {
            return Err(RiffError::SizeMismatch {
                declared: size,
                actual: payload.len(),
            });
        }
        Ok(RawChunk { tag, size, payload })
    }

    /// Bytes this chunk occupies in its parent, header included.
    pub fn span(&self) -> usize {
        HEADER_SIZE + self.size as usize
    }
}

/// Parses the header at the start of `buf`, trailing bytes after the payload are ignored.
pub fn parse_header<'a>(buf: &'a [u8], opts: &ParseOptions) -> Result<RawChunk<'a>, RiffError> {
    if buf.len() < HEADER_SIZE {
        return Err(RiffError::TruncatedHeader {
            available: buf.len(),
        });
    }

    let tag = {
        let mut tag: [u8; 4] = [0; 4];
        tag.copy_from_slice(&buf[..4]);
        tag
    };
    let size = LittleEndian::read_u32(&buf[4..HEADER_SIZE]);

    if size > opts.max_chunk_size {
        return Err(RiffError::MaxLength {
            declared: size,
            limit: opts.max_chunk_size,
        });
    }

    let available = buf.len() - HEADER_SIZE;
    if size as usize > available {
        return Err(RiffError::TruncatedPayload {
            tag,
            declared: size,
            available,
        });
    }

    trace!("header {:?} size {}", String::from_utf8_lossy(&tag), size);
    Ok(RawChunk {
        tag,
        size,
        payload: &buf[HEADER_SIZE..HEADER_SIZE + size as usize],
    })
}

/// Parses a whole standalone chunk, `buf` must be exactly `8 + size` bytes long.
pub fn parse_standalone<'a>(buf: &'a [u8], opts: &ParseOptions) -> Result<RawChunk<'a>, RiffError> {
    let raw = parse_header(buf, opts)?;
    if raw.span() != buf.len() {
        return Err(RiffError::SizeMismatch {
            declared: raw.size,
            actual: buf.len() - HEADER_SIZE,
        });
    }
    Ok(raw)
}

pub fn header_bytes(tag: &[u8; 4], size: u32) -> [u8; HEADER_SIZE] {
    let mut out = [0u8; HEADER_SIZE];
    out[..4].copy_from_slice(tag);
    LittleEndian::write_u32(&mut out[4..], size);
    out
}

pub fn write_header<W: Write>(writer: &mut W, tag: &[u8; 4], size: u32) -> Result<usize, RiffError> {
    writer.write_all(tag)?;
    writer.write_u32::<LittleEndian>(size)?;
    Ok(HEADER_SIZE)
}

pub(crate) fn dump_leaf(out: &mut Vec<u8>, tag: &[u8; 4], data: &[u8]) {
    out.extend_from_slice(&header_bytes(tag, data.len() as u32));
    out.extend_from_slice(data);
}

#[cfg(test)]
mod test_header {
    use super::*;

    #[test]
    fn header_layout() {
        assert_eq!(&header_bytes(b"RIFF", 0x0102_0304), b"RIFF\x04\x03\x02\x01");
    }

    #[test]
    fn write_header_stream() {
        let mut out = Vec::new();
        assert_eq!(write_header(&mut out, b"VP8 ", 10).unwrap(), 8);
        assert_eq!(out, header_bytes(b"VP8 ", 10).to_vec());
    }

    #[test]
    fn parse_exact() {
        let buf = b"JUNK\x03\x00\x00\x00abc";
        let raw = parse_standalone(buf, &ParseOptions::default()).unwrap();
        assert_eq!(raw.tag, *b"JUNK");
        assert_eq!(raw.size, 3);
        assert_eq!(raw.payload, b"abc");
        assert_eq!(raw.span(), 11);
    }

    #[test]
    fn parse_ignores_trailing() {
        let buf = b"JUNK\x01\x00\x00\x00abc";
        let raw = parse_header(buf, &ParseOptions::default()).unwrap();
        assert_eq!(raw.payload, b"a");
    }

    #[test]
    fn standalone_trailing_garbage() {
        let buf = b"JUNK\x01\x00\x00\x00abc";
        assert!(matches!(
            parse_standalone(buf, &ParseOptions::default()),
            Err(RiffError::SizeMismatch {
                declared: 1,
                actual: 3
            })
        ));
    }

    #[test]
    fn truncated_header() {
        assert!(matches!(
            parse_header(b"RIFF\x00", &ParseOptions::default()),
            Err(RiffError::TruncatedHeader { available: 5 })
        ));
    }

    #[test]
    fn truncated_payload() {
        let buf = b"JUNK\x10\x00\x00\x00abc";
        assert!(matches!(
            parse_header(buf, &ParseOptions::default()),
            Err(RiffError::TruncatedPayload {
                declared: 16,
                available: 3,
                ..
            })
        ));
    }

    #[test]
    fn huge_size() {
        let buf = b"JUNK\xff\xff\xff\xffabc";
        assert!(matches!(
            parse_header(buf, &ParseOptions::default()),
            Err(RiffError::TruncatedPayload { .. })
        ));
    }

    #[test]
    fn max_length() {
        let opts = ParseOptions {
            max_chunk_size: 2,
            ..ParseOptions::default()
        };
        assert!(matches!(
            parse_header(b"JUNK\x03\x00\x00\x00abc", &opts),
            Err(RiffError::MaxLength { declared: 3, limit: 2 })
        ));
    }

    #[test]
    fn record_size_mismatch() {
        assert!(RawChunk::from_parts(*b"JUNK", 3, b"abc").is_ok());
        assert!(matches!(
            RawChunk::from_parts(*b"JUNK", 4, b"abc"),
            Err(RiffError::SizeMismatch { .. })
        ));
    }
}
