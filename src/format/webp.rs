//! WebP metadata
//!
//! A WebP file here is a `RIFF` chunk of type `WEBP` holding the compressed image in a `VP8 `
//! sub chunk, plus up to four INFO style text chunks:
//!
//! | Tag    | Kind   | Accessor |
//! | :----: | ------ | -------- |
//! | `VP8 ` | Binary | [`WebP::image`] |
//! | `ICMT` | String | [`WebP::comment`] |
//! | `ICOP` | String | [`WebP::copyright`] |
//! | `IART` | String | [`WebP::artist`] |
//! | `INAM` | String | [`WebP::title`] |
//!
//! Any other sub chunk is rejected. The `VP8 ` payload is never decoded.
use std::borrow::Cow;
use std::ops::Deref;

use log::debug;

use crate::chunk::header::{parse_standalone, RawChunk};
use crate::chunk::list::type_tag;
use crate::chunk::policy::{binary, string, FactoryRule, Kind, TagPolicy};
use crate::chunk::{BinaryChunk, ChunkData, ChunkKey, ListChunk, StringChunk};
use crate::config::ParseOptions;
use crate::error::RiffError;
use crate::format::info::{TAG_IART, TAG_ICMT, TAG_ICOP, TAG_INAM};
use crate::format::riff::TAG_RIFF;

pub const TAG_WEBP: [u8; 4] = *b"WEBP";
pub const TAG_VP8: [u8; 4] = *b"VP8 ";

pub const METADATA_TAGS: [[u8; 4]; 4] = [TAG_ICMT, TAG_ICOP, TAG_IART, TAG_INAM];

fn is_vp8(tag: &[u8; 4]) -> bool {
    *tag == TAG_VP8
}

fn is_metadata(tag: &[u8; 4]) -> bool {
    METADATA_TAGS.contains(tag)
}

pub static WEBP_POLICY: TagPolicy = TagPolicy {
    name: "WEBP",
    rules: &[
        FactoryRule {
            accepts: is_vp8,
            kind: Kind::Binary,
            build: binary,
        },
        FactoryRule {
            accepts: is_metadata,
            kind: Kind::String,
            build: string,
        },
    ],
    reject: RiffError::UnsupportedTag,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebP(ListChunk);

impl WebP {
    /// Wraps an already compressed VP8 bitstream into a minimal WebP.
    pub fn from_image(image: impl Into<Vec<u8>>) -> Result<Self, RiffError> {
        let mut list = ListChunk::empty(TAG_RIFF, TAG_WEBP, &WEBP_POLICY);
        list.edit().set_chunk(BinaryChunk::from_binary(TAG_VP8, image)?)?;
        Ok(WebP(list))
    }

    pub fn parse(buf: &[u8]) -> Result<Self, RiffError> {
        Self::parse_with(buf, &ParseOptions::default())
    }

    pub fn parse_with(buf: &[u8], opts: &ParseOptions) -> Result<Self, RiffError> {
        Self::from_raw(parse_standalone(buf, opts)?, opts)
    }

    pub fn from_raw(raw: RawChunk<'_>, opts: &ParseOptions) -> Result<Self, RiffError> {
        if raw.tag != TAG_RIFF {
            return Err(RiffError::WrongRootTag {
                expected: TAG_RIFF,
                found: raw.tag,
            });
        }
        let typ = type_tag(raw.payload)?;
        if typ != TAG_WEBP {
            return Err(RiffError::WrongContainerType {
                expected: TAG_WEBP,
                found: typ,
            });
        }

        let list = ListChunk::from_raw(raw, &WEBP_POLICY, opts)?;
        let vp8 = ChunkKey::Tag(TAG_VP8);
        match list.children().filter(|(key, _)| **key == vp8).count() {
            0 => return Err(RiffError::MissingRequiredChild(TAG_VP8)),
            1 => {}
            _ => return Err(RiffError::DuplicateChild(TAG_VP8)),
        }
        if opts.strict_webp_order && list.first().map(|c| c.tag()) != Some(TAG_VP8) {
            return Err(RiffError::MisorderedChild(TAG_VP8));
        }

        debug!("WebP with {} sub chunks, {} bytes", list.len(), list.size());
        Ok(WebP(list))
    }

    fn text(&self, tag: &[u8; 4]) -> Option<Cow<'_, str>> {
        self.0.get_chunk_data(tag).and_then(|d| d.to_text())
    }

    fn set_text(&mut self, tag: [u8; 4], value: Option<&str>) -> Result<(), RiffError> {
        match value {
            None => {
                self.0.edit().delete_chunk(&tag);
                Ok(())
            }
            Some(text) => self.0.edit().set_chunk(StringChunk::from_text(tag, text)?),
        }
    }

    pub fn image(&self) -> Option<&[u8]> {
        match self.0.get_chunk_data(&TAG_VP8) {
            Some(ChunkData::Binary(data)) => Some(data),
            _ => None,
        }
    }

    /// Swaps the compressed image, leaving the metadata alone.
    pub fn set_image(&mut self, image: impl Into<Vec<u8>>) -> Result<(), RiffError> {
        self.0.edit().set_chunk(BinaryChunk::from_binary(TAG_VP8, image)?)
    }

    pub fn comment(&self) -> Option<Cow<'_, str>> {
        self.text(&TAG_ICMT)
    }

    pub fn copyright(&self) -> Option<Cow<'_, str>> {
        self.text(&TAG_ICOP)
    }

    pub fn artist(&self) -> Option<Cow<'_, str>> {
        self.text(&TAG_IART)
    }

    pub fn title(&self) -> Option<Cow<'_, str>> {
        self.text(&TAG_INAM)
    }

    pub fn set_comment(&mut self, value: Option<&str>) -> Result<(), RiffError> {
        self.set_text(TAG_ICMT, value)
    }

    pub fn set_copyright(&mut self, value: Option<&str>) -> Result<(), RiffError> {
        self.set_text(TAG_ICOP, value)
    }

    pub fn set_artist(&mut self, value: Option<&str>) -> Result<(), RiffError> {
        self.set_text(TAG_IART, value)
    }

    pub fn set_title(&mut self, value: Option<&str>) -> Result<(), RiffError> {
        self.set_text(TAG_INAM, value)
    }

    pub fn clear_metadata(&mut self) {
        let mut list = self.0.edit();
        for tag in METADATA_TAGS.iter() {
            list.delete_chunk(tag);
        }
    }

    /// Every metadata entry present, in file order.
    pub fn metadata(&self) -> Vec<([u8; 4], String)> {
        self.0
            .children()
            .filter(|(key, _)| **key != ChunkKey::Tag(TAG_VP8))
            .filter_map(|(_, chunk)| {
                chunk
                    .data()
                    .to_text()
                    .map(|text| (chunk.tag(), text.into_owned()))
            })
            .collect()
    }

    pub fn as_list(&self) -> &ListChunk {
        &self.0
    }

    pub fn into_list(self) -> ListChunk {
        self.0
    }
}

impl Deref for WebP {
    type Target = ListChunk;

    fn deref(&self) -> &ListChunk {
        &self.0
    }
}
