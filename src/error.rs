use std::fmt;

use thiserror::Error;

/// Displays a four byte tag, escaping anything that is not printable ASCII.
pub struct TagDisplay<'a>(pub &'a [u8; 4]);

impl fmt::Display for TagDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in self.0.iter() {
            if b.is_ascii_graphic() || *b == b' ' {
                write!(f, "{}", *b as char)?;
            } else {
                write!(f, "\\x{:02x}", b)?;
            }
        }
        Ok(())
    }
}

#[derive(Error, Debug)]
pub enum RiffError {
    #[error(transparent)]
    IO(#[from] std::io::Error),
    #[error("chunk header truncated, {available} of 8 bytes available")]
    TruncatedHeader { available: usize },
    #[error("chunk '{}' declares {declared} bytes but only {available} are available", TagDisplay(.tag))]
    TruncatedPayload {
        tag: [u8; 4],
        declared: u32,
        available: usize,
    },
    #[error("child chunk at offset {offset} overruns the {remaining} bytes left in its list")]
    TruncatedChild { offset: usize, remaining: usize },
    #[error("chunk size {declared} does not match the {actual} bytes of data")]
    SizeMismatch { declared: u32, actual: usize },
    #[error("permitted max chunk size exceeded ({declared} > {limit})")]
    MaxLength { declared: u32, limit: u32 },
    #[error("chunk size would overflow u32")]
    SizeOverflow,
    #[error("invalid chunk tag '{}'", TagDisplay(.0))]
    InvalidTag([u8; 4]),
    #[error("invalid list type tag '{}'", TagDisplay(.0))]
    InvalidTypeTag([u8; 4]),
    #[error("list chunk has no type tag")]
    MissingTypeTag,
    #[error("string chunk '{}' is not null terminated", TagDisplay(.0))]
    NotNullTerminated([u8; 4]),
    #[error("undefined tag '{}' for INFO chunk", TagDisplay(.0))]
    UndefinedTag([u8; 4]),
    #[error("unsupported tag '{}'", TagDisplay(.0))]
    UnsupportedTag([u8; 4]),
    #[error("chunk '{}' is the wrong kind for this container", TagDisplay(.0))]
    WrongChunkKind([u8; 4]),
    #[error("chunk tag must be '{}', found '{}'", TagDisplay(.expected), TagDisplay(.found))]
    WrongRootTag { expected: [u8; 4], found: [u8; 4] },
    #[error("chunk type must be '{}', found '{}'", TagDisplay(.expected), TagDisplay(.found))]
    WrongContainerType { expected: [u8; 4], found: [u8; 4] },
    #[error("required sub chunk '{}' is missing", TagDisplay(.0))]
    MissingRequiredChild([u8; 4]),
    #[error("first sub chunk must be '{}'", TagDisplay(.0))]
    MisorderedChild([u8; 4]),
    #[error("sub chunk '{}' may appear only once", TagDisplay(.0))]
    DuplicateChild([u8; 4]),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}
