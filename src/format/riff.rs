use std::borrow::Cow;
use std::ops::Deref;

use log::debug;

use crate::chunk::header::{parse_standalone, RawChunk};
use crate::chunk::list::type_tag;
use crate::chunk::policy::{binary, is_generic_tag, FactoryRule, Kind, TagPolicy};
use crate::chunk::{Chunk, ChunkKey, ListChunk, ListMut, StringChunk};
use crate::config::ParseOptions;
use crate::error::RiffError;
use crate::format::info::{is_info_tag, Info, INFO_POLICY, TAG_INFO};

pub const TAG_RIFF: [u8; 4] = *b"RIFF";
pub const TAG_LIST: [u8; 4] = *b"LIST";

const INFO_KEY: ChunkKey = ChunkKey::List {
    tag: TAG_LIST,
    typ: TAG_INFO,
};

fn is_list_tag(tag: &[u8; 4]) -> bool {
    *tag == TAG_LIST
}

// LIST/INFO gets the INFO vocabulary, any other LIST is generic
fn list_policy(typ: &[u8; 4]) -> &'static TagPolicy {
    if *typ == TAG_INFO {
        &INFO_POLICY
    } else {
        &LIST_POLICY
    }
}

fn list_or_info(raw: RawChunk<'_>, opts: &ParseOptions) -> Result<Chunk, RiffError> {
    let typ = type_tag(raw.payload)?;
    Ok(ListChunk::from_raw(raw, list_policy(&typ), opts)?.into())
}

/// Generic `LIST`, every sub chunk is binary.
pub static LIST_POLICY: TagPolicy = TagPolicy {
    name: "LIST",
    rules: &[FactoryRule {
        accepts: is_generic_tag,
        kind: Kind::Binary,
        build: binary,
    }],
    reject: RiffError::InvalidTag,
};

pub static RIFF_POLICY: TagPolicy = TagPolicy {
    name: "RIFF",
    rules: &[
        FactoryRule {
            accepts: is_list_tag,
            kind: Kind::List(list_policy),
            build: list_or_info,
        },
        FactoryRule {
            accepts: is_generic_tag,
            kind: Kind::Binary,
            build: binary,
        },
    ],
    reject: RiffError::InvalidTag,
};

/// Parses a standalone generic `LIST` chunk.
pub fn parse_list(buf: &[u8]) -> Result<ListChunk, RiffError> {
    parse_list_with(buf, &ParseOptions::default())
}

pub fn parse_list_with(buf: &[u8], opts: &ParseOptions) -> Result<ListChunk, RiffError> {
    let raw = parse_standalone(buf, opts)?;
    if raw.tag != TAG_LIST {
        return Err(RiffError::WrongRootTag {
            expected: TAG_LIST,
            found: raw.tag,
        });
    }
    ListChunk::from_raw(raw, &LIST_POLICY, opts)
}

/// Top level `RIFF` chunk of any type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Riff(ListChunk);

impl Riff {
    pub fn new(typ: [u8; 4]) -> Result<Self, RiffError> {
        Ok(Riff(ListChunk::new(TAG_RIFF, typ, &RIFF_POLICY)?))
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
        Ok(Riff(ListChunk::from_raw(raw, &RIFF_POLICY, opts)?))
    }

    pub fn info(&self) -> Option<&ListChunk> {
        self.0.get(&INFO_KEY).and_then(|c| c.as_list())
    }

    pub fn get_info(&self, tag: &[u8; 4]) -> Option<Cow<'_, str>> {
        self.info()
            .and_then(|info| info.get_chunk_data(tag))
            .and_then(|d| d.to_text())
    }

    /// Sets one entry of the `LIST/INFO` sub chunk, creating it on first use.
    pub fn set_info(&mut self, tag: [u8; 4], value: Option<&str>) -> Result<(), RiffError> {
        if !is_info_tag(&tag) {
            return Err(RiffError::UndefinedTag(tag));
        }
        let entry = match value {
            Some(text) => Some(StringChunk::from_text(tag, text)?),
            None => None,
        };

        let mut riff = self.0.edit();
        if riff.get(&INFO_KEY).is_none() {
            if entry.is_none() {
                return Ok(());
            }
            debug!("adding LIST/INFO to RIFF/{}", String::from_utf8_lossy(&riff.typ()));
            riff.set_chunk(Info::new())?;
        }

        riff.edit_list(&INFO_KEY, |info| match entry {
            Some(chunk) => info.set_chunk(chunk),
            None => {
                info.delete_chunk(&tag);
                Ok(())
            }
        })?;
        Ok(())
    }

    pub fn edit(&mut self) -> ListMut<'_> {
        self.0.edit()
    }

    pub fn as_list(&self) -> &ListChunk {
        &self.0
    }

    pub fn into_list(self) -> ListChunk {
        self.0
    }
}

impl Deref for Riff {
    type Target = ListChunk;

    fn deref(&self) -> &ListChunk {
        &self.0
    }
}
