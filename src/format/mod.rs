//! Containers built on top of [`crate::chunk::ListChunk`].
//!
//! | Container | Tag    | Type   | Sub chunks |
//! | --------- | :----: | :----: | ---------- |
//! | [`riff::Riff`] | `RIFF` | any | `LIST` lists, anything else binary |
//! | generic list | `LIST` | any | binary |
//! | [`info::Info`] | `LIST` | `INFO` | INFO text tags only |
//! | [`webp::WebP`] | `RIFF` | `WEBP` | `VP8 ` binary plus four text tags |
pub mod info;
pub mod riff;
pub mod webp;
