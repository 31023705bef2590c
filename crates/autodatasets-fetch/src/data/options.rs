use std::fmt;
use std::sync::Arc;

use super::progress::Progress;

/// Phases of a single resource transfer.
///
/// Transfers move through these phases in order:
/// Connecting → Downloading → Committing → Completed
///
/// A cache hit reports nothing at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchPhase {
    /// Request sent, waiting for the response head.
    #[default]
    Connecting,

    /// Streaming body chunks into the staging file.
    Downloading,

    /// Renaming the staging file over the destination.
    Committing,

    /// Terminal state for a successful transfer.
    Completed,
}

impl fmt::Display for FetchPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchPhase::Connecting => write!(f, "Connecting"),
            FetchPhase::Downloading => write!(f, "Downloading"),
            FetchPhase::Committing => write!(f, "Committing"),
            FetchPhase::Completed => write!(f, "Completed"),
        }
    }
}

pub type ProgressCallback = Arc<dyn Fn(&Progress<'_>) + Send + Sync>;

/// Configuration shared by every transfer of a [`Fetcher`](crate::Fetcher).
///
/// # Examples
///
/// ```
/// use autodatasets_fetch::{FetchOptions, FetchPhase, Progress};
/// use std::sync::Arc;
///
/// let options = FetchOptions::default()
///     .header("User-Agent", "autodatasets")
///     .on_progress(Arc::new(|progress: &Progress<'_>| {
///         if progress.phase == FetchPhase::Completed {
///             println!("{} done", progress.file_name);
///         }
///     }));
/// ```
#[derive(Clone, Default)]
pub struct FetchOptions {
    /// Headers sent with every request.
    pub headers: Arc<[(String, String)]>,

    /// Invoked on phase transitions and after every body chunk.
    pub on_progress: Option<ProgressCallback>,
}

impl fmt::Debug for FetchOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchOptions")
            .field("headers", &self.headers)
            .field("on_progress", &self.on_progress.as_ref().map(|_| "{ ... }"))
            .finish()
    }
}

impl FetchOptions {
    /// Add a single custom HTTP header.
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut headers: Vec<_> = self.headers.iter().cloned().collect();
        headers.push((key.into(), value.into()));
        self.headers = Arc::from(headers);
        self
    }

    #[must_use]
    pub fn on_progress(mut self, on_progress: ProgressCallback) -> Self {
        self.on_progress = Some(on_progress);
        self
    }
}
