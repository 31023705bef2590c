use crate::data::options::FetchPhase;

/// Snapshot of a transfer, passed to progress callbacks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progress<'a> {
    pub phase: FetchPhase,

    /// Last path segment of the destination, for display.
    pub file_name: &'a str,

    /// Bytes written to the staging file so far.
    pub bytes_downloaded: u64,

    /// Expected length from `Content-Length`.
    ///
    /// `None` when the header is missing or zero, in which case progress is
    /// indeterminate.
    pub total_bytes: Option<u64>,
}

impl Progress<'_> {
    /// Percentage of completion, `None` when the total is unknown.
    #[must_use]
    pub fn percentage(&self) -> Option<f64> {
        self.total_bytes
            .map(|total| (self.bytes_downloaded as f64 / total as f64 * 100.0).min(100.0))
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.phase == FetchPhase::Completed
    }
}
