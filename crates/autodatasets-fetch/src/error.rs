//! Error types for autodatasets-fetch.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    /// The server answered with a non-success status.
    #[error("GET {url} failed with HTTP status {status}")]
    Transfer { url: String, status: u16 },

    #[error("network error while fetching {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("file I/O error at '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Verify(#[from] autodatasets_verify::VerifyError),
}

impl FetchError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Self {
        let path = path.into();
        move |source| Self::Io { path, source }
    }

    pub(crate) fn network<E>(url: &str) -> impl FnOnce(E) -> Self + '_
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        move |e| Self::Network {
            url: url.to_string(),
            source: Box::new(e),
        }
    }
}

pub type Result<T> = std::result::Result<T, FetchError>;
