//! Per container tag rules
//!
//! Each list carries a [`TagPolicy`], a table of rules tried in order. The first rule whose
//! predicate accepts a sub chunk's tag builds the concrete chunk. A tag no rule accepts is
//! turned into the container's own error by `reject`.
use std::fmt;

use log::trace;

use crate::chunk::header::RawChunk;
use crate::chunk::{BinaryChunk, Chunk, StringChunk};
use crate::config::ParseOptions;
use crate::error::RiffError;

pub type Build = fn(RawChunk<'_>, &ParseOptions) -> Result<Chunk, RiffError>;

/// Chunk variant a rule builds.
#[derive(Debug, Clone, Copy)]
pub enum Kind {
    Binary,
    String,
    /// Carries the policy a parsed sub list of the given type would get
    List(fn(&[u8; 4]) -> &'static TagPolicy),
}

impl Kind {
    // True when `chunk` dumps to bytes the rule's builder reads back as the same chunk
    fn admits(&self, chunk: &Chunk) -> bool {
        match (self, chunk) {
            (Kind::Binary, Chunk::Binary(_)) => true,
            (Kind::String, Chunk::String(_)) => true,
            (Kind::List(policy_for), Chunk::List(list)) => policy_for(&list.typ()) == list.policy(),
            _ => false,
        }
    }
}

pub struct FactoryRule {
    pub accepts: fn(&[u8; 4]) -> bool,
    pub kind: Kind,
    pub build: Build,
}

pub struct TagPolicy {
    pub name: &'static str,
    pub rules: &'static [FactoryRule],
    pub reject: fn([u8; 4]) -> RiffError,
}

impl fmt::Debug for TagPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TagPolicy").field("name", &self.name).finish()
    }
}

impl PartialEq for TagPolicy {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for TagPolicy {}

impl TagPolicy {
    fn rule(&self, tag: &[u8; 4]) -> Option<&FactoryRule> {
        self.rules.iter().find(|r| (r.accepts)(tag))
    }

    pub fn accepts(&self, tag: &[u8; 4]) -> bool {
        self.rule(tag).is_some()
    }

    /// Verifies `chunk` may live in a container under this policy.
    pub fn check(&self, chunk: &Chunk) -> Result<(), RiffError> {
        let tag = chunk.tag();
        match self.rule(&tag) {
            None => Err((self.reject)(tag)),
            Some(rule) if !rule.kind.admits(chunk) => Err(RiffError::WrongChunkKind(tag)),
            Some(_) => Ok(()),
        }
    }

    pub fn build(&self, raw: RawChunk<'_>, opts: &ParseOptions) -> Result<Chunk, RiffError> {
        match self.rule(&raw.tag) {
            Some(rule) => {
                trace!("{} dispatch {:?} as {:?}", self.name, String::from_utf8_lossy(&raw.tag), rule.kind);
                (rule.build)(raw, opts)
            }
            None => Err((self.reject)(raw.tag)),
        }
    }
}

/// First byte alphanumeric, the rest alphanumeric, underscore or space.
pub fn is_generic_tag(tag: &[u8; 4]) -> bool {
    tag[0].is_ascii_alphanumeric()
        && tag[1..]
            .iter()
            .all(|b| b.is_ascii_alphanumeric() || *b == b'_' || *b == b' ')
}

pub fn binary(raw: RawChunk<'_>, _opts: &ParseOptions) -> Result<Chunk, RiffError> {
    Ok(BinaryChunk::from_raw(raw)?.into())
}

pub fn string(raw: RawChunk<'_>, _opts: &ParseOptions) -> Result<Chunk, RiffError> {
    Ok(StringChunk::from_raw(raw)?.into())
}
