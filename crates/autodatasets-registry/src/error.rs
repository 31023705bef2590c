use std::io;
use std::path::PathBuf;

use crate::filter::Column;

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// No row carries `value` in `column`.
    #[error("{value:?} not found in column '{column}' of {}", path.display())]
    NotFound {
        column: Column,
        value: String,
        path: PathBuf,
    },

    #[error("duplicated names {names:?} in {}", path.display())]
    DuplicateNames { names: Vec<String>, path: PathBuf },

    #[error("malformed registry {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("failed to write registry {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl RegistryError {
    pub(crate) fn csv(path: impl Into<PathBuf>) -> impl FnOnce(csv::Error) -> Self {
        let path = path.into();
        move |source| Self::Csv { path, source }
    }

    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Self {
        let path = path.into();
        move |source| Self::Io { path, source }
    }
}

pub type Result<T> = std::result::Result<T, RegistryError>;
