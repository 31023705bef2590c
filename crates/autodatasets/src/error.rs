use std::io;
use std::path::PathBuf;

use autodatasets_fetch::FetchError;
use autodatasets_registry::RegistryError;
use autodatasets_verify::VerifyError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Archive(#[from] autodatasets_archive::Error),

    #[error(transparent)]
    Verify(#[from] VerifyError),

    /// The address has no last path segment to name the cached file.
    #[error("resource address {address:?} does not end in a file name")]
    InvalidAddress { address: String },

    /// The name cannot be used as one directory under the cache root.
    #[error("dataset name {name:?} is not a plain directory name")]
    InvalidName { name: String },

    #[error("cannot locate the home directory, set AUTODATASETS_HOME or pass --cache-dir")]
    NoHomeDirectory,

    #[error("I/O error at '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Self {
        let path = path.into();
        move |source| Self::Io { path, source }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
