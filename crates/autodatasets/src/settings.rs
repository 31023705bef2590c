use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{Error, Result};

/// Directory under the user's home that holds the cache.
pub const CACHE_DIR_NAME: &str = ".autodatasets";

/// File name of the registry inside the cache root.
pub const REGISTRY_FILE_NAME: &str = "datasets.csv";

const BUNDLED_REGISTRY: &str = include_str!("../datasets.csv");

/// Where datasets are cached and which registry describes them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub cache_root: PathBuf,
    pub registry_path: PathBuf,
}

impl Settings {
    /// Settings rooted at `cache_root`, with the registry stored inside it.
    pub fn new(cache_root: impl Into<PathBuf>) -> Self {
        let cache_root = cache_root.into();
        let registry_path = cache_root.join(REGISTRY_FILE_NAME);
        Self {
            cache_root,
            registry_path,
        }
    }

    /// Fills unset values with defaults: `~/.autodatasets` and the registry
    /// file inside the cache root.
    pub fn resolve(cache_root: Option<PathBuf>, registry_path: Option<PathBuf>) -> Result<Self> {
        let cache_root = match cache_root {
            Some(root) => root,
            None => default_cache_root()?,
        };
        let mut settings = Self::new(cache_root);
        if let Some(path) = registry_path {
            settings.registry_path = path;
        }
        Ok(settings)
    }

    /// Local directory holding the resources of dataset `name`.
    pub fn dataset_dir(&self, name: &str) -> PathBuf {
        self.cache_root.join(name)
    }

    fn uses_default_registry(&self) -> bool {
        self.registry_path == self.cache_root.join(REGISTRY_FILE_NAME)
    }

    /// Writes the bundled registry to the default location if nothing is
    /// there yet. Returns whether a table was written.
    ///
    /// A registry given explicitly is never created: a wrong path should
    /// fail to load instead of silently starting from the bundled table.
    pub fn seed_registry(&self) -> Result<bool> {
        if !self.uses_default_registry() || self.registry_path.exists() {
            return Ok(false);
        }
        create_parent(&self.registry_path)?;
        fs::write(&self.registry_path, BUNDLED_REGISTRY)
            .map_err(Error::io(&self.registry_path))?;
        info!("seeded dataset registry at {}", self.registry_path.display());
        Ok(true)
    }
}

pub fn default_cache_root() -> Result<PathBuf> {
    home::home_dir()
        .map(|home| home.join(CACHE_DIR_NAME))
        .ok_or(Error::NoHomeDirectory)
}

fn create_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(Error::io(parent))
        }
        _ => Ok(()),
    }
}
