use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use crate::{Hasher, Result, VerifyError};

/// Bytes read per step when hashing a file.
pub const BLOCK_SIZE: usize = 1 << 20;

/// Hex SHA-1 of the file at `path`, or `None` when the file does not exist.
#[cfg(feature = "sha1")]
pub fn checksum(path: impl AsRef<Path>) -> Result<Option<String>> {
    checksum_with(path, crate::Sha1Hasher::new())
}

/// Like [`checksum`], with a caller-chosen hasher.
pub fn checksum_with<H: Hasher>(path: impl AsRef<Path>, hasher: H) -> Result<Option<String>> {
    let path = path.as_ref();
    let read_err = |source| VerifyError::Read {
        path: path.to_path_buf(),
        source,
    };

    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(read_err(e)),
    };

    hash_reader(file, hasher).map(Some).map_err(read_err)
}

/// Drains `reader` through `hasher` in [`BLOCK_SIZE`] steps.
pub fn hash_reader<R: Read, H: Hasher>(mut reader: R, mut hasher: H) -> io::Result<String> {
    let mut buf = vec![0u8; BLOCK_SIZE];
    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}
