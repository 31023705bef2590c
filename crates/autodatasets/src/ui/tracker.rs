use std::sync::{Arc, Mutex};

use autodatasets_fetch::{FetchPhase, Progress, ProgressCallback};
use indicatif::{ProgressBar, ProgressStyle};
use once_cell::sync::Lazy;

const PB_STYLE: &str = "{spinner:.blue} {prefix:>12.cyan.bold} [{elapsed_precise}] {wide_bar:.cyan/blue} {bytes}/{total_bytes} ({bytes_per_sec}, {eta}) {wide_msg}";

const SPINNER_STYLE: &str = "{spinner:.blue} {prefix:>12.cyan.bold} [{elapsed_precise}] {bytes} ({bytes_per_sec}) {wide_msg}";

const TICK: &str = "⠁⠂⠄⡀⢀⠠⠐⠈ ";

const PB_CHARS: &str = "█▓▒░  ";

static PB_TEMPLATE: Lazy<Option<ProgressStyle>> = Lazy::new(|| {
    ProgressStyle::with_template(PB_STYLE)
        .ok()
        .map(|style| style.tick_chars(TICK).progress_chars(PB_CHARS))
});

static SPINNER_TEMPLATE: Lazy<Option<ProgressStyle>> = Lazy::new(|| {
    ProgressStyle::with_template(SPINNER_STYLE)
        .ok()
        .map(|style| style.tick_chars(TICK))
});

/// One progress bar for one file transfer.
pub struct ProgressTracker {
    pb: ProgressBar,
    finish: Option<String>,
}

impl ProgressTracker {
    pub fn set_position(&self, bytes: u64) -> &Self {
        self.pb.set_position(bytes);
        self
    }

    pub fn finish(self) {
        match self.finish {
            Some(msg) => self.pb.finish_with_message(msg),
            None => self.pb.finish(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProgressTrackerBuilder {
    len: Option<u64>,
    prefix: Option<String>,
    finish: Option<String>,
}

impl ProgressTrackerBuilder {
    pub fn with_len(mut self, len: Option<u64>) -> Self {
        self.len = len;
        self
    }

    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.prefix = Some(prefix.to_string());
        self
    }

    pub fn with_finish(mut self, finish: &str) -> Self {
        self.finish = Some(finish.to_string());
        self
    }

    pub fn build(self) -> ProgressTracker {
        // unknown length: a spinner counting bytes
        let (pb, style) = match self.len {
            Some(len) => (ProgressBar::new(len), PB_TEMPLATE.as_ref()),
            None => (ProgressBar::new_spinner(), SPINNER_TEMPLATE.as_ref()),
        };
        let pb = match style {
            Some(style) => pb.with_style(style.clone()),
            None => pb,
        };

        if let Some(prefix) = self.prefix {
            pb.set_prefix(prefix);
        }
        ProgressTracker {
            pb,
            finish: self.finish,
        }
    }
}

/// A fetch progress callback drawing one bar per transfer on stderr.
///
/// Transfers are sequential, so a single slot holds the active bar. Cache
/// hits never report progress and therefore draw nothing.
pub fn progress_reporter() -> ProgressCallback {
    let active: Mutex<Option<ProgressTracker>> = Mutex::new(None);

    Arc::new(move |progress: &Progress<'_>| {
        let Ok(mut active) = active.lock() else {
            return;
        };
        match progress.phase {
            FetchPhase::Connecting => {
                if let Some(stale) = active.take() {
                    stale.pb.abandon();
                }
            }
            FetchPhase::Downloading | FetchPhase::Committing => {
                let tracker = active.get_or_insert_with(|| {
                    ProgressTrackerBuilder::default()
                        .with_len(progress.total_bytes)
                        .with_prefix(progress.file_name)
                        .with_finish("done")
                        .build()
                });
                tracker.set_position(progress.bytes_downloaded);
            }
            FetchPhase::Completed => {
                if let Some(tracker) = active.take() {
                    tracker.finish();
                }
            }
        }
    })
}
