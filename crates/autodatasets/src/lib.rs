//! Download machine-learning datasets listed in a metadata registry,
//! verify them against recorded SHA-1 digests and cache them under
//! `~/.autodatasets/{name}/`.
//!
//! The first download of a dataset records its checksums, size and file
//! count back into the registry; later calls are served from the cache
//! without touching the network.
//!
//! ```no_run
//! use autodatasets::{AutoDatasets, Settings};
//! use autodatasets_fetch::{Fetcher, ReqwestClient};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let settings = Settings::resolve(None, None)?;
//! settings.seed_registry()?;
//!
//! let fetcher = Fetcher::new(ReqwestClient::new()?);
//! let mut datasets = AutoDatasets::open(&settings, fetcher)?;
//! for path in datasets.download_dataset("mnist").await? {
//!     println!("{}", path.display());
//! }
//! # Ok(())
//! # }
//! ```

mod error;
mod orchestrator;
mod settings;
pub mod ui;

pub use error::{Error, Result};
pub use orchestrator::AutoDatasets;
pub use settings::{CACHE_DIR_NAME, REGISTRY_FILE_NAME, Settings, default_cache_root};

pub use autodatasets_registry::{ListFilter, Listing};
