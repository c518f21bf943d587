//! Resource Interchange File Format chunks
//!
//! A RIFF style file is a tree of chunks. Every chunk, no matter its kind, starts with the
//! same 8 byte header. Unless other wise noted everything is stored in Little Endian format.
//!
//! | Type    | Name    | Description |
//! | ------: | ------- | ----------- |
//! | [u8; 4] | tag     | The role of the chunk, ASCII such as `RIFF` or `ICMT` |
//! | u32     | size    | The length of the payload section, is allowed to be 0 bytes |
//! | [u8; N] | payload | The content of the chunk, interpret according to the chunk kind |
//!
//! There is no padding between chunks, the next chunk begins exactly at `8 + size`.
//!
//! # Chunk Kinds
//!
//! | Kind   | Payload |
//! | :----: | ------- |
//! | Binary | Opaque bytes, used as-is |
//! | String | Text followed by exactly one `0x00`, no other `0x00` is permitted |
//! | List   | A 4 byte type tag followed by zero or more complete chunks |
//!
//! ## List
//!
//! | Type    | Name     | Description |
//! | ------: | -------- | ----------- |
//! | [u8; 4] | type     | The logical kind of the list, such as `INFO` or `WEBP` |
//! | [u8; N] | chunks   | Sub chunks concatenated, consuming exactly `size - 4` bytes |
//!
//! Which tags may appear inside a list, and which kind of chunk each tag becomes, is decided
//! by the [`policy::TagPolicy`] attached to that list.
use std::borrow::Cow;
use std::fmt;
use std::io::Write;

use crate::error::RiffError;
use crate::error::TagDisplay;

pub mod header;
pub mod leaf;
pub mod list;
pub mod policy;

pub use leaf::{BinaryChunk, StringChunk};
pub use list::{ListChunk, ListMut};

/// Key a sub chunk is stored under inside its parent list.
///
/// Plain chunks are keyed by their tag, lists by `tag/type` so that a container can hold
/// several `LIST` chunks of different types side by side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChunkKey {
    Tag([u8; 4]),
    List { tag: [u8; 4], typ: [u8; 4] },
}

impl fmt::Display for ChunkKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChunkKey::Tag(tag) => write!(f, "{}", TagDisplay(tag)),
            ChunkKey::List { tag, typ } => write!(f, "{}/{}", TagDisplay(tag), TagDisplay(typ)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Chunk {
    Binary(BinaryChunk),
    String(StringChunk),
    List(ListChunk),
}

/// Logical value of a chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkData<'a> {
    Binary(&'a [u8]),
    /// Text without the trailing null
    Text(&'a [u8]),
    List(&'a ListChunk),
}

impl<'a> ChunkData<'a> {
    pub fn as_bytes(&self) -> Option<&'a [u8]> {
        match self {
            ChunkData::Binary(data) | ChunkData::Text(data) => Some(data),
            ChunkData::List(_) => None,
        }
    }

    pub fn to_text(&self) -> Option<Cow<'a, str>> {
        match self {
            ChunkData::Text(data) => Some(String::from_utf8_lossy(data)),
            _ => None,
        }
    }
}

impl Chunk {
    pub fn tag(&self) -> [u8; 4] {
        match self {
            Chunk::Binary(c) => c.tag(),
            Chunk::String(c) => c.tag(),
            Chunk::List(c) => c.tag(),
        }
    }

    pub fn size(&self) -> u32 {
        match self {
            Chunk::Binary(c) => c.size(),
            Chunk::String(c) => c.size(),
            Chunk::List(c) => c.size(),
        }
    }

    pub fn key(&self) -> ChunkKey {
        match self {
            Chunk::List(c) => c.key(),
            _ => ChunkKey::Tag(self.tag()),
        }
    }

    pub fn data(&self) -> ChunkData<'_> {
        match self {
            Chunk::Binary(c) => ChunkData::Binary(c.data()),
            Chunk::String(c) => ChunkData::Text(c.text()),
            Chunk::List(c) => ChunkData::List(c),
        }
    }

    pub fn as_list(&self) -> Option<&ListChunk> {
        match self {
            Chunk::List(c) => Some(c),
            _ => None,
        }
    }

    pub fn dump(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(header::HEADER_SIZE + self.size() as usize);
        self.dump_into(&mut out);
        out
    }

    /// Writes the serialized chunk, returning the number of bytes written.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<usize, RiffError> {
        let data = self.dump();
        writer.write_all(&data)?;
        Ok(data.len())
    }

    pub(crate) fn dump_into(&self, out: &mut Vec<u8>) {
        match self {
            Chunk::Binary(c) => header::dump_leaf(out, &c.tag(), c.data()),
            Chunk::String(c) => header::dump_leaf(out, &c.tag(), c.raw_data()),
            Chunk::List(c) => c.dump_into(out),
        }
    }
}

impl From<BinaryChunk> for Chunk {
    fn from(c: BinaryChunk) -> Self {
        Chunk::Binary(c)
    }
}

impl From<StringChunk> for Chunk {
    fn from(c: StringChunk) -> Self {
        Chunk::String(c)
    }
}

impl From<ListChunk> for Chunk {
    fn from(c: ListChunk) -> Self {
        Chunk::List(c)
    }
}
