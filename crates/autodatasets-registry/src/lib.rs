//! The dataset metadata table.
//!
//! Each row names a dataset, its category columns, the remote resources
//! that make it up, and three derived fields (`sha1sum`, `size(MB)`,
//! `num_files`) that stay empty until the dataset is first downloaded.
//!
//! ```no_run
//! use autodatasets_registry::{ListFilter, Registry};
//!
//! # fn main() -> autodatasets_registry::Result<()> {
//! let registry = Registry::load("datasets.csv")?;
//! for row in registry.list(&ListFilter::default().task("kaggle"))? {
//!     println!("{} ({})", row.name, row.kind);
//! }
//! # Ok(())
//! # }
//! ```

mod entry;
mod error;
mod filter;
mod registry;

pub use entry::{COLUMNS, ChecksumState, Entry, EntryUpdate};
pub use error::{RegistryError, Result};
pub use filter::{Column, ListFilter, Listing};
pub use registry::Registry;
