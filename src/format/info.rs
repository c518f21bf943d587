use std::borrow::Cow;
use std::ops::Deref;

use crate::chunk::header::{parse_standalone, RawChunk};
use crate::chunk::list::type_tag;
use crate::chunk::policy::{string, FactoryRule, Kind, TagPolicy};
use crate::chunk::{Chunk, ListChunk, ListMut, StringChunk};
use crate::config::ParseOptions;
use crate::error::RiffError;
use crate::format::riff::TAG_LIST;

pub const TAG_INFO: [u8; 4] = *b"INFO";

/// Archival location
pub const TAG_IARL: [u8; 4] = *b"IARL";
pub const TAG_IART: [u8; 4] = *b"IART";
/// Commissioned
pub const TAG_ICMS: [u8; 4] = *b"ICMS";
pub const TAG_ICMT: [u8; 4] = *b"ICMT";
pub const TAG_ICOP: [u8; 4] = *b"ICOP";
/// Creation date
pub const TAG_ICRD: [u8; 4] = *b"ICRD";
/// Cropped
pub const TAG_ICRP: [u8; 4] = *b"ICRP";
pub const TAG_IDIM: [u8; 4] = *b"IDIM";
pub const TAG_IDPI: [u8; 4] = *b"IDPI";
/// Engineer
pub const TAG_IENG: [u8; 4] = *b"IENG";
pub const TAG_IGNR: [u8; 4] = *b"IGNR";
pub const TAG_IKEY: [u8; 4] = *b"IKEY";
/// Lightness
pub const TAG_ILGT: [u8; 4] = *b"ILGT";
pub const TAG_IMED: [u8; 4] = *b"IMED";
/// Name, used as the title
pub const TAG_INAM: [u8; 4] = *b"INAM";
/// Palette setting
pub const TAG_IPLT: [u8; 4] = *b"IPLT";
pub const TAG_IPRD: [u8; 4] = *b"IPRD";
pub const TAG_ISBJ: [u8; 4] = *b"ISBJ";
pub const TAG_ISFT: [u8; 4] = *b"ISFT";
/// Sharpness
pub const TAG_ISHP: [u8; 4] = *b"ISHP";
pub const TAG_ISRC: [u8; 4] = *b"ISRC";
/// Source form
pub const TAG_ISRF: [u8; 4] = *b"ISRF";
/// Technician
pub const TAG_ITCH: [u8; 4] = *b"ITCH";

pub const INFO_TAGS: [[u8; 4]; 23] = [
    TAG_IARL, TAG_IART, TAG_ICMS, TAG_ICMT, TAG_ICOP, TAG_ICRD, TAG_ICRP, TAG_IDIM, TAG_IDPI,
    TAG_IENG, TAG_IGNR, TAG_IKEY, TAG_ILGT, TAG_IMED, TAG_INAM, TAG_IPLT, TAG_IPRD, TAG_ISBJ,
    TAG_ISFT, TAG_ISHP, TAG_ISRC, TAG_ISRF, TAG_ITCH,
];

pub fn is_info_tag(tag: &[u8; 4]) -> bool {
    INFO_TAGS.contains(tag)
}

pub static INFO_POLICY: TagPolicy = TagPolicy {
    name: "INFO",
    rules: &[FactoryRule {
        accepts: is_info_tag,
        kind: Kind::String,
        build: string,
    }],
    reject: RiffError::UndefinedTag,
};

/// Replaces or, when `value` is `None`, deletes one INFO entry.
pub(crate) fn set_info(list: &mut ListMut<'_>, tag: [u8; 4], value: Option<&str>) -> Result<(), RiffError> {
    if !is_info_tag(&tag) {
        return Err(RiffError::UndefinedTag(tag));
    }
    match value {
        None => {
            list.delete_chunk(&tag);
            Ok(())
        }
        Some(text) => list.set_chunk(StringChunk::from_text(tag, text)?),
    }
}

/// `LIST` chunk of type `INFO`, textual metadata of a RIFF file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Info(ListChunk);

impl Info {
    pub fn new() -> Self {
        Info(ListChunk::empty(TAG_LIST, TAG_INFO, &INFO_POLICY))
    }

    pub fn parse(buf: &[u8]) -> Result<Self, RiffError> {
        Self::parse_with(buf, &ParseOptions::default())
    }

    pub fn parse_with(buf: &[u8], opts: &ParseOptions) -> Result<Self, RiffError> {
        Self::from_raw(parse_standalone(buf, opts)?, opts)
    }

    pub fn from_raw(raw: RawChunk<'_>, opts: &ParseOptions) -> Result<Self, RiffError> {
        if raw.tag != TAG_LIST {
            return Err(RiffError::WrongRootTag {
                expected: TAG_LIST,
                found: raw.tag,
            });
        }
        let typ = type_tag(raw.payload)?;
        if typ != TAG_INFO {
            return Err(RiffError::WrongContainerType {
                expected: TAG_INFO,
                found: typ,
            });
        }
        Ok(Info(ListChunk::from_raw(raw, &INFO_POLICY, opts)?))
    }

    pub fn get_info(&self, tag: &[u8; 4]) -> Option<Cow<'_, str>> {
        self.0.get_chunk_data(tag).and_then(|d| d.to_text())
    }

    pub fn set_info(&mut self, tag: [u8; 4], value: Option<&str>) -> Result<(), RiffError> {
        set_info(&mut self.0.edit(), tag, value)
    }

    pub fn as_list(&self) -> &ListChunk {
        &self.0
    }

    pub fn into_list(self) -> ListChunk {
        self.0
    }
}

impl Default for Info {
    fn default() -> Self {
        Self::new()
    }
}

impl Deref for Info {
    type Target = ListChunk;

    fn deref(&self) -> &ListChunk {
        &self.0
    }
}

impl From<Info> for Chunk {
    fn from(info: Info) -> Self {
        Chunk::List(info.0)
    }
}
