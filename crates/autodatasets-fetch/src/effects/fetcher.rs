use std::path::{Path, PathBuf};

use autodatasets_verify::BLOCK_SIZE;
use futures_util::TryStreamExt;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, info};

use crate::data::{FetchOptions, FetchPhase, Progress};
use crate::effects::http::HttpClient;
use crate::error::{FetchError, Result};

/// What a call to [`Fetcher::fetch`] ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The destination already matched the expected digest.
    CacheHit,
    Downloaded { bytes: u64 },
}

/// Downloads resources into a local cache, skipping the network when the
/// cached copy already carries the expected digest.
pub struct Fetcher<C: HttpClient> {
    client: C,
    options: FetchOptions,
}

impl<C: HttpClient> Fetcher<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            options: FetchOptions::default(),
        }
    }

    pub fn with_options(mut self, options: FetchOptions) -> Self {
        self.options = options;
        self
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Fetch `url` into `destination`.
    ///
    /// With an `expected_digest` and `overwrite == false`, an existing
    /// destination whose SHA-1 matches is left alone and no request is made.
    /// Otherwise the body is streamed into a staging file next to the
    /// destination and renamed over it once complete. A failed transfer
    /// removes the staging file and leaves the destination untouched.
    pub async fn fetch(
        &self,
        url: &str,
        destination: &Path,
        expected_digest: Option<&str>,
        overwrite: bool,
    ) -> Result<FetchOutcome> {
        if let Some(expected) = expected_digest
            && !overwrite
            && is_cached(destination, expected).await?
        {
            info!("found valid cache at {}, skip downloading", destination.display());
            return Ok(FetchOutcome::CacheHit);
        }

        let parent = match destination.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        info!("downloading {url} into {}", parent.display());
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(FetchError::io(parent))?;

        let file_name = destination
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let bytes = self.transfer(url, destination, parent, &file_name).await?;
        Ok(FetchOutcome::Downloaded { bytes })
    }

    async fn transfer(
        &self,
        url: &str,
        destination: &Path,
        parent: &Path,
        file_name: &str,
    ) -> Result<u64> {
        self.notify(FetchPhase::Connecting, file_name, 0, None);

        let response = self
            .client
            .get(url, &self.options.headers)
            .await
            .map_err(FetchError::network(url))?;
        if !response.is_success() {
            return Err(FetchError::Transfer {
                url: url.to_string(),
                status: response.status,
            });
        }
        let total_bytes = response.content_length;

        let staging = tempfile::Builder::new()
            .prefix(&format!(".{file_name}."))
            .suffix(".part")
            .tempfile_in(parent)
            .map_err(FetchError::io(parent))?;
        let staging_file = staging.reopen().map_err(FetchError::io(staging.path()))?;
        let mut writer =
            BufWriter::with_capacity(BLOCK_SIZE, tokio::fs::File::from_std(staging_file));

        let mut body = response.body;
        let mut bytes_downloaded = 0u64;
        while let Some(chunk) = body.try_next().await.map_err(FetchError::network(url))? {
            writer
                .write_all(&chunk)
                .await
                .map_err(FetchError::io(staging.path()))?;
            bytes_downloaded += chunk.len() as u64;
            self.notify(FetchPhase::Downloading, file_name, bytes_downloaded, total_bytes);
        }

        writer.flush().await.map_err(FetchError::io(staging.path()))?;
        writer
            .into_inner()
            .sync_all()
            .await
            .map_err(FetchError::io(staging.path()))?;

        self.notify(FetchPhase::Committing, file_name, bytes_downloaded, total_bytes);
        staging
            .persist(destination)
            .map_err(|e| FetchError::io(destination)(e.error))?;

        debug!("wrote {bytes_downloaded} bytes to {}", destination.display());
        self.notify(FetchPhase::Completed, file_name, bytes_downloaded, total_bytes);
        Ok(bytes_downloaded)
    }

    fn notify(
        &self,
        phase: FetchPhase,
        file_name: &str,
        bytes_downloaded: u64,
        total_bytes: Option<u64>,
    ) {
        if let Some(ref callback) = self.options.on_progress {
            callback(&Progress {
                phase,
                file_name,
                bytes_downloaded,
                total_bytes,
            });
        }
    }
}

/// Whether `path` exists and hashes to `expected`.
async fn is_cached(path: &Path, expected: &str) -> Result<bool> {
    let owned: PathBuf = path.to_path_buf();
    let actual = tokio::task::spawn_blocking(move || autodatasets_verify::checksum(owned))
        .await
        .map_err(|e| FetchError::io(path)(std::io::Error::other(e)))??;

    Ok(actual.is_some_and(|actual| actual.eq_ignore_ascii_case(expected.trim())))
}
