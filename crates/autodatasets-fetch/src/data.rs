//! Immutable configuration and progress types.

pub mod options;
pub mod progress;

pub use options::{FetchOptions, FetchPhase, ProgressCallback};
pub use progress::Progress;
