//! Content digests for cached dataset files.
//!
//! Files are hashed by streaming them in fixed-size blocks, so arbitrarily
//! large archives never need to fit in memory. A missing file is not an
//! error: [`checksum`] reports it as `None`, which callers treat as a cache
//! miss.
//!
//! # Example
//!
//! ```
//! use autodatasets_verify::{Sha1Hasher, digest_hex};
//!
//! let hex = digest_hex(Sha1Hasher::new(), b"hello world");
//! assert_eq!(hex, "2aae6c35c94fcfb415dbe95f408b9ce91ee846ed");
//! ```

pub use self::checksum::{BLOCK_SIZE, checksum_with, hash_reader};
pub use self::error::{Result, VerifyError};
pub use self::hasher::{DigestHasher, Hasher, digest_hex};

#[cfg(feature = "sha1")]
pub use self::checksum::checksum;

#[cfg(feature = "sha1")]
pub use self::hasher::Sha1Hasher;

#[cfg(feature = "sha256")]
pub use self::hasher::Sha256Hasher;

mod checksum;
mod error;
mod hasher;
