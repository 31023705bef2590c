use std::path::{Path, PathBuf};

use autodatasets_archive::Reader;
use autodatasets_fetch::{FetchOutcome, Fetcher, HttpClient};
use autodatasets_registry::{ChecksumState, EntryUpdate, ListFilter, Listing, Registry};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::settings::Settings;

const MIB: u64 = 1 << 20;

/// Resolves dataset names against the registry and materialises their
/// resources in the local cache.
pub struct AutoDatasets<C: HttpClient> {
    registry: Registry,
    fetcher: Fetcher<C>,
    cache_root: PathBuf,
}

impl<C: HttpClient> AutoDatasets<C> {
    /// Loads the registry named by `settings`, rewriting it in canonical
    /// order if it is not already sorted.
    pub fn open(settings: &Settings, fetcher: Fetcher<C>) -> Result<Self> {
        let mut registry = Registry::load(&settings.registry_path)?;
        if !registry.is_canonical() {
            info!("sorting dataset registry {}", registry.path().display());
            registry.persist()?;
        }

        Ok(Self {
            registry,
            fetcher,
            cache_root: settings.cache_root.clone(),
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn fetcher(&self) -> &Fetcher<C> {
        &self.fetcher
    }

    pub fn cache_root(&self) -> &Path {
        &self.cache_root
    }

    pub fn list(&self, filter: &ListFilter) -> Result<Vec<Listing<'_>>> {
        Ok(self.registry.list(filter)?)
    }

    pub async fn download_dataset(&mut self, name: &str) -> Result<Vec<PathBuf>> {
        self.download_dataset_with(name, false).await
    }

    /// Downloads every resource of `name`, in registry order, and returns
    /// their local paths.
    ///
    /// Resources whose cached copy matches the stored checksum are not
    /// transferred. If the entry had no usable checksums, they are computed
    /// from the downloaded files together with the size and file count, and
    /// the registry is persisted once.
    pub async fn download_dataset_with(
        &mut self,
        name: &str,
        overwrite: bool,
    ) -> Result<Vec<PathBuf>> {
        let entry = self.registry.lookup(name)?;
        let expected = match entry.checksum_state() {
            ChecksumState::Known(checksums) => Some(checksums.to_vec()),
            ChecksumState::Unknown => None,
        };

        let dataset_dir = self.cache_root.join(dir_name(name)?);
        let targets = entry
            .resources
            .iter()
            .map(|address| Ok((address.clone(), dataset_dir.join(file_name(address)?))))
            .collect::<Result<Vec<_>>>()?;

        for (index, (address, path)) in targets.iter().enumerate() {
            let digest = expected.as_ref().map(|checksums| checksums[index].as_str());
            match self.fetcher.fetch(address, path, digest, overwrite).await? {
                FetchOutcome::CacheHit => debug!("{} is up to date", path.display()),
                FetchOutcome::Downloaded { bytes } => {
                    debug!("fetched {bytes} bytes into {}", path.display())
                }
            }
        }

        let paths: Vec<PathBuf> = targets.into_iter().map(|(_, path)| path).collect();
        if expected.is_none() {
            let update = describe_blocking(paths.clone()).await?;
            info!(
                "recording metadata for {name}: {} MB in {} files",
                update.size_mb.unwrap_or_default(),
                update.file_count.unwrap_or_default()
            );
            self.registry.update(name, update)?;
            self.registry.persist()?;
        }

        Ok(paths)
    }
}

/// The last path segment of `address`, ignoring any query or fragment.
fn file_name(address: &str) -> Result<&str> {
    let path = address.split(['?', '#']).next().unwrap_or(address);
    match path.rsplit('/').next() {
        Some(tail) if !tail.is_empty() && tail != "." && tail != ".." => Ok(tail),
        _ => Err(Error::InvalidAddress {
            address: address.to_string(),
        }),
    }
}

/// `name` as a single directory below the cache root.
fn dir_name(name: &str) -> Result<&str> {
    let escapes = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\'])
        || Path::new(name).is_absolute();
    if escapes {
        return Err(Error::InvalidName {
            name: name.to_string(),
        });
    }
    Ok(name)
}

async fn describe_blocking(paths: Vec<PathBuf>) -> Result<EntryUpdate> {
    tokio::task::spawn_blocking(move || describe(&paths))
        .await
        .map_err(|e| Error::io(".")(std::io::Error::other(e)))?
}

/// Checksums, whole-MiB size and member count of freshly downloaded files.
fn describe(paths: &[PathBuf]) -> Result<EntryUpdate> {
    let mut checksums = Vec::with_capacity(paths.len());
    let mut size_mb = 0;
    let mut file_count = 0;

    for path in paths {
        let checksum = autodatasets_verify::checksum(path)?.ok_or_else(|| {
            Error::io(path)(std::io::Error::from(std::io::ErrorKind::NotFound))
        })?;
        checksums.push(checksum);

        let reader = Reader::from_path(path)?;
        size_mb += reader.size() / MIB;
        file_count += reader.members().len() as u64;
    }

    Ok(EntryUpdate {
        checksums: Some(checksums),
        size_mb: Some(size_mb),
        file_count: Some(file_count),
    })
}
