//! Cache-aware HTTP downloading of dataset resources.
//!
//! # Architecture
//!
//! - [`data`] - Options and progress snapshots
//! - `effects` - I/O: the [`HttpClient`] seam and the [`Fetcher`]
//!
//! # Key Features
//!
//! - **Cache hits**: an existing file whose digest matches is never re-fetched
//! - **Single request**: one GET per transfer, no retries
//! - **Atomic placement**: bodies land in a staging file renamed over the destination
//! - **Mechanism-only**: the caller decides how progress is displayed

pub mod data;
mod effects;
mod error;

pub use data::{FetchOptions, FetchPhase, Progress, ProgressCallback};
pub use effects::{BoxStream, FetchOutcome, Fetcher, HttpClient, HttpResponse};

#[cfg(feature = "reqwest")]
pub use effects::ReqwestClient;

pub use error::{FetchError, Result};
