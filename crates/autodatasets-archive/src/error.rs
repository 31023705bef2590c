use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unsupported container format: '{path}'")]
    UnsupportedFormat { path: PathBuf },

    #[error("no member named '{member}' in '{path}'")]
    MemberNotFound { path: PathBuf, member: String },

    #[error("member path in '{path}' is not valid UTF-8")]
    InvalidPath { path: PathBuf },

    #[cfg(feature = "zip")]
    #[error("zip archive '{path}' is corrupted: {source}")]
    Zip {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("failed to read '{path}': {source}")]
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
