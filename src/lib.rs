//! Reader/writer for RIFF style chunk trees.
//!
//! Buffers are parsed whole into a validated tree of [`chunk::Chunk`], edited through
//! [`chunk::ListMut`] which keeps every size field consistent, and dumped back byte for
//! byte. [`format`] layers the `RIFF`, `LIST/INFO` and WebP rules on top.
//!
//! ```
//! use riffmeta::WebP;
//!
//! let mut webp = WebP::from_image(vec![0u8; 10]).unwrap();
//! webp.set_comment(Some("hello")).unwrap();
//!
//! let webp = WebP::parse(&webp.dump()).unwrap();
//! assert_eq!(webp.comment().unwrap(), "hello");
//! ```
pub mod chunk;
pub mod config;
pub mod error;
pub mod format;

pub use chunk::{BinaryChunk, Chunk, ChunkData, ChunkKey, ListChunk, ListMut, StringChunk};
pub use config::ParseOptions;
pub use error::{ConfigError, RiffError};
pub use format::info::Info;
pub use format::riff::Riff;
pub use format::webp::WebP;
