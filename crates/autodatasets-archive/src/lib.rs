//! Format-agnostic access to downloaded dataset files.
//!
//! A [`Reader`] answers three questions about a path without the caller
//! knowing whether it is a zip, a tar, a directory, or a plain file: how
//! many bytes its members hold, what the members are called, and how to
//! read one of them.
//!
//! # Architecture
//!
//! - `detect.rs` - Magic-byte sniffing
//! - `format.rs` - Format tags and tar decompression codecs
//! - `reader.rs` - The [`Reader`] over all supported containers

pub use detect::{detect_format, detect_from_reader};
pub use error::{Error, Result};
pub use format::{ArchiveFormat, TarCompress};
pub use reader::{ContainerKind, Member, Reader};

mod detect;
mod error;
mod format;
mod reader;
