use std::io::Write;
use std::ops::Deref;

use log::debug;

use crate::chunk::header::{header_bytes, parse_header, parse_standalone, RawChunk, HEADER_SIZE};
use crate::chunk::policy::{is_generic_tag, TagPolicy};
use crate::chunk::{Chunk, ChunkData, ChunkKey};
use crate::config::ParseOptions;
use crate::error::RiffError;

const TYPE_SIZE: usize = 4;

/// Reads and validates the type tag at the start of a list payload.
pub fn type_tag(payload: &[u8]) -> Result<[u8; 4], RiffError> {
    if payload.len() < TYPE_SIZE {
        return Err(RiffError::MissingTypeTag);
    }
    let mut typ: [u8; 4] = [0; 4];
    typ.copy_from_slice(&payload[..TYPE_SIZE]);

    if !is_generic_tag(&typ) {
        return Err(RiffError::InvalidTypeTag(typ));
    }
    Ok(typ)
}

fn span(chunk: &Chunk) -> u64 {
    HEADER_SIZE as u64 + chunk.size() as u64
}

/// A chunk holding a typed sequence of sub chunks.
///
/// Sub chunks are kept in insertion order, keyed by [`ChunkKey`]. The read only api lives
/// here, mutation goes through [`ListChunk::edit`] which keeps `size` in step with every
/// change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListChunk {
    tag: [u8; 4],
    size: u32,
    typ: [u8; 4],
    children: Vec<(ChunkKey, Chunk)>,
    policy: &'static TagPolicy,
}

impl ListChunk {
    /// An empty list, holding only its type tag.
    pub fn new(tag: [u8; 4], typ: [u8; 4], policy: &'static TagPolicy) -> Result<Self, RiffError> {
        if !is_generic_tag(&tag) {
            return Err(RiffError::InvalidTag(tag));
        }
        if !is_generic_tag(&typ) {
            return Err(RiffError::InvalidTypeTag(typ));
        }
        Ok(Self::empty(tag, typ, policy))
    }

    // Caller guarantees both tags are valid
    pub(crate) fn empty(tag: [u8; 4], typ: [u8; 4], policy: &'static TagPolicy) -> Self {
        ListChunk {
            tag,
            size: TYPE_SIZE as u32,
            typ,
            children: Vec::new(),
            policy,
        }
    }

    pub fn parse(buf: &[u8], policy: &'static TagPolicy) -> Result<Self, RiffError> {
        Self::parse_with(buf, policy, &ParseOptions::default())
    }

    pub fn parse_with(
        buf: &[u8],
        policy: &'static TagPolicy,
        opts: &ParseOptions,
    ) -> Result<Self, RiffError> {
        let raw = parse_standalone(buf, opts)?;
        Self::from_raw(raw, policy, opts)
    }

    pub fn from_raw(
        raw: RawChunk<'_>,
        policy: &'static TagPolicy,
        opts: &ParseOptions,
    ) -> Result<Self, RiffError> {
        if !is_generic_tag(&raw.tag) {
            return Err(RiffError::InvalidTag(raw.tag));
        }
        let typ = type_tag(raw.payload)?;
        let children = parse_children(&raw.payload[TYPE_SIZE..], policy, opts)?;

        Ok(ListChunk {
            tag: raw.tag,
            size: raw.size,
            typ,
            children,
            policy,
        })
    }

    pub fn tag(&self) -> [u8; 4] {
        self.tag
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn typ(&self) -> [u8; 4] {
        self.typ
    }

    pub fn policy(&self) -> &'static TagPolicy {
        self.policy
    }

    pub fn key(&self) -> ChunkKey {
        ChunkKey::List {
            tag: self.tag,
            typ: self.typ,
        }
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn children(&self) -> impl Iterator<Item = (&ChunkKey, &Chunk)> {
        self.children.iter().map(|(k, c)| (k, c))
    }

    pub fn first(&self) -> Option<&Chunk> {
        self.children.first().map(|(_, c)| c)
    }

    pub fn get(&self, key: &ChunkKey) -> Option<&Chunk> {
        self.children.iter().find(|(k, _)| k == key).map(|(_, c)| c)
    }

    /// Looks up by tag, falling back to a sub list whose type is `tag`.
    pub fn get_chunk(&self, tag: &[u8; 4]) -> Option<&Chunk> {
        self.resolve(tag).and_then(|key| self.get(&key))
    }

    pub fn get_chunk_data(&self, tag: &[u8; 4]) -> Option<ChunkData<'_>> {
        self.get_chunk(tag).map(|c| c.data())
    }

    fn resolve(&self, tag: &[u8; 4]) -> Option<ChunkKey> {
        let exact = ChunkKey::Tag(*tag);
        if self.get(&exact).is_some() {
            return Some(exact);
        }
        self.children.iter().find_map(|(k, c)| match c {
            Chunk::List(l) if &l.typ == tag => Some(*k),
            _ => None,
        })
    }

    pub fn edit(&mut self) -> ListMut<'_> {
        ListMut {
            list: self,
            limit: u32::MAX as u64,
        }
    }

    pub fn dump(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(HEADER_SIZE + self.size as usize);
        self.dump_into(&mut out);
        out
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<usize, RiffError> {
        let data = self.dump();
        writer.write_all(&data)?;
        Ok(data.len())
    }

    // Pre-order: own header, type, then each sub chunk
    pub(crate) fn dump_into(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&header_bytes(&self.tag, self.size));
        out.extend_from_slice(&self.typ);
        for (_, chunk) in self.children.iter() {
            chunk.dump_into(out);
        }
    }
}

fn parse_children(
    data: &[u8],
    policy: &'static TagPolicy,
    opts: &ParseOptions,
) -> Result<Vec<(ChunkKey, Chunk)>, RiffError> {
    let mut children = Vec::new();
    let mut pos = 0;

    while pos < data.len() {
        let remaining = &data[pos..];
        let raw = match parse_header(remaining, opts) {
            Ok(raw) => raw,
            Err(RiffError::TruncatedHeader { .. }) | Err(RiffError::TruncatedPayload { .. }) => {
                return Err(RiffError::TruncatedChild {
                    offset: pos,
                    remaining: remaining.len(),
                })
            }
            Err(e) => return Err(e),
        };
        debug!(
            "{} sub chunk {:?} size {} at {}",
            policy.name,
            String::from_utf8_lossy(&raw.tag),
            raw.size,
            pos
        );

        let chunk = policy.build(raw, opts)?;
        pos += raw.span();
        children.push((chunk.key(), chunk));
    }
    Ok(children)
}

/// Mutable view of a [`ListChunk`].
pub struct ListMut<'a> {
    list: &'a mut ListChunk,
    // Largest size this list may grow to without overflowing an ancestor
    limit: u64,
}

impl Deref for ListMut<'_> {
    type Target = ListChunk;

    fn deref(&self) -> &ListChunk {
        self.list
    }
}

impl ListMut<'_> {
    fn resize(&mut self, removed: u64, added: u64) -> Result<(), RiffError> {
        let size = self.list.size as u64 - removed + added;
        if size > self.limit {
            return Err(RiffError::SizeOverflow);
        }
        let size = u32::try_from(size).map_err(|_| RiffError::SizeOverflow)?;
        debug!("{} size {} -> {}", self.list.key(), self.list.size, size);
        self.list.size = size;
        Ok(())
    }

    /// Inserts `chunk`, replacing every sub chunk under the same key.
    ///
    /// The replacement takes the position of the first chunk it replaces.
    pub fn set_chunk(&mut self, chunk: impl Into<Chunk>) -> Result<(), RiffError> {
        let chunk = chunk.into();
        self.list.policy.check(&chunk)?;

        let key = chunk.key();
        let removed: u64 = self
            .list
            .children
            .iter()
            .filter(|(k, _)| *k == key)
            .map(|(_, c)| span(c))
            .sum();
        self.resize(removed, span(&chunk))?;

        match self.list.children.iter().position(|(k, _)| *k == key) {
            Some(idx) => {
                self.list.children[idx].1 = chunk;
                let mut first = true;
                self.list.children.retain(|(k, _)| {
                    if *k != key {
                        true
                    } else {
                        let keep = first;
                        first = false;
                        keep
                    }
                });
            }
            None => self.list.children.push((key, chunk)),
        }
        Ok(())
    }

    /// Removes every sub chunk under `key`, returning the first one removed.
    pub fn delete(&mut self, key: &ChunkKey) -> Option<Chunk> {
        let mut removed = None;
        let mut delta: u64 = 0;
        let mut idx = 0;

        while idx < self.list.children.len() {
            if self.list.children[idx].0 == *key {
                let (_, chunk) = self.list.children.remove(idx);
                delta += span(&chunk);
                if removed.is_none() {
                    removed = Some(chunk);
                }
            } else {
                idx += 1;
            }
        }

        if removed.is_some() {
            // Shrinking can not overflow
            let size = self.list.size as u64 - delta;
            debug!("{} size {} -> {}", self.list.key(), self.list.size, size);
            self.list.size = size as u32;
        }
        removed
    }

    /// Deletes by tag with the same lookup rules as [`ListChunk::get_chunk`], absent is a no-op.
    pub fn delete_chunk(&mut self, tag: &[u8; 4]) -> Option<Chunk> {
        let key = self.list.resolve(tag)?;
        self.delete(&key)
    }

    /// Runs `f` against the sub list under `key` in place, then folds its size change into
    /// this list.
    ///
    /// Returns `Ok(None)` when there is no sub list under `key`. Every set or delete inside
    /// `f` is atomic, but when `f` fails the steps it already completed stay applied. Sizes
    /// are exact at every level either way.
    pub fn edit_list<T, F>(&mut self, key: &ChunkKey, f: F) -> Result<Option<T>, RiffError>
    where
        F: FnOnce(&mut ListMut<'_>) -> Result<T, RiffError>,
    {
        let parent_size = self.list.size as u64;
        let limit = self.limit;
        let sub = match self.list.children.iter_mut().find(|(k, _)| k == key) {
            Some((_, Chunk::List(sub))) => sub,
            _ => return Ok(None),
        };

        let before = sub.size as u64;
        let mut view = ListMut {
            list: sub,
            limit: limit - (parent_size - before),
        };
        let res = f(&mut view);
        let after = view.size as u64;

        self.resize(before, after)?;
        res.map(Some)
    }
}

#[cfg(test)]
pub(crate) fn assert_sizes(list: &ListChunk) {
    assert_eq!(list.size() as usize, list.dump().len() - HEADER_SIZE);
    for (_, chunk) in list.children() {
        if let Chunk::List(sub) = chunk {
            assert_sizes(sub);
        }
    }
}
