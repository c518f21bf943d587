use std::borrow::Cow;

use crate::chunk::header::RawChunk;
use crate::chunk::policy::is_generic_tag;
use crate::error::RiffError;

fn check_tag(tag: [u8; 4]) -> Result<(), RiffError> {
    if is_generic_tag(&tag) {
        Ok(())
    } else {
        Err(RiffError::InvalidTag(tag))
    }
}

fn check_len(len: usize) -> Result<(), RiffError> {
    if u32::try_from(len).is_err() {
        return Err(RiffError::SizeOverflow);
    }
    Ok(())
}

/// Opaque payload chunk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryChunk {
    tag: [u8; 4],
    data: Vec<u8>,
}

impl BinaryChunk {
    pub fn from_raw(raw: RawChunk<'_>) -> Result<Self, RiffError> {
        check_tag(raw.tag)?;
        Ok(BinaryChunk {
            tag: raw.tag,
            data: raw.payload.to_vec(),
        })
    }

    pub fn from_binary(tag: [u8; 4], data: impl Into<Vec<u8>>) -> Result<Self, RiffError> {
        check_tag(tag)?;
        let data = data.into();
        check_len(data.len())?;
        Ok(BinaryChunk { tag, data })
    }

    pub fn tag(&self) -> [u8; 4] {
        self.tag
    }

    pub fn size(&self) -> u32 {
        self.data.len() as u32
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

/// Null terminated text chunk
///
/// The stored payload always ends with exactly one `0x00` and holds no other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringChunk {
    tag: [u8; 4],
    data: Vec<u8>,
}

impl StringChunk {
    pub fn from_raw(raw: RawChunk<'_>) -> Result<Self, RiffError> {
        check_tag(raw.tag)?;
        Self::from_payload(raw.tag, raw.payload.to_vec())
    }

    pub fn from_text(tag: [u8; 4], text: &str) -> Result<Self, RiffError> {
        check_tag(tag)?;
        let mut data = Vec::with_capacity(text.len() + 1);
        data.extend_from_slice(text.as_bytes());
        data.push(0);
        check_len(data.len())?;
        Self::from_payload(tag, data)
    }

    fn from_payload(tag: [u8; 4], data: Vec<u8>) -> Result<Self, RiffError> {
        // First null must also be the last byte
        match data.iter().position(|b| *b == 0) {
            Some(pos) if pos + 1 == data.len() => Ok(StringChunk { tag, data }),
            _ => Err(RiffError::NotNullTerminated(tag)),
        }
    }

    pub fn tag(&self) -> [u8; 4] {
        self.tag
    }

    pub fn size(&self) -> u32 {
        self.data.len() as u32
    }

    /// Text bytes without the trailing null
    pub fn text(&self) -> &[u8] {
        &self.data[..self.data.len() - 1]
    }

    pub fn to_string_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.text())
    }

    pub(crate) fn raw_data(&self) -> &[u8] {
        &self.data
    }
}
