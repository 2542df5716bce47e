//! Progress reporting utilities using indicatif.
//!
//! The scanner and the duplicate grouper report through the
//! [`ProgressCallback`] trait; [`Progress`] renders those events as
//! terminal progress bars on stderr.

use std::sync::Mutex;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Phase name used while walking directories.
pub const PHASE_SCANNING: &str = "scanning";
/// Phase name used while detecting content types.
pub const PHASE_CLASSIFYING: &str = "classifying";
/// Phase name used while comparing same-size files.
pub const PHASE_COMPARING: &str = "comparing";

/// Progress callback for the scan, classify and compare phases.
pub trait ProgressCallback: Send + Sync {
    /// Called when a phase starts. `total` is 0 when unknown.
    fn on_phase_start(&self, phase: &str, total: usize);

    /// Called for each item processed (`current` is 1-based).
    fn on_progress(&self, current: usize, path: &str);

    /// Called when a phase completes.
    fn on_phase_end(&self, phase: &str);
}

/// Progress reporter using indicatif.
pub struct Progress {
    bar: Mutex<Option<ProgressBar>>,
    quiet: bool,
}

impl Progress {
    /// Create a new progress reporter. A quiet reporter draws nothing.
    #[must_use]
    pub fn new(quiet: bool) -> Self {
        Self {
            bar: Mutex::new(None),
            quiet,
        }
    }

    fn scanning_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} {msg} [{elapsed_precise}] {pos} files")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn counting_style() -> ProgressStyle {
        ProgressStyle::with_template(
            "[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█>-")
    }
}

impl ProgressCallback for Progress {
    fn on_phase_start(&self, phase: &str, total: usize) {
        if self.quiet {
            return;
        }

        let pb = if phase == PHASE_SCANNING || total == 0 {
            let pb = ProgressBar::new_spinner();
            pb.set_style(Self::scanning_style());
            pb.enable_steady_tick(Duration::from_millis(100));
            pb
        } else {
            let pb = ProgressBar::new(total as u64);
            pb.set_style(Self::counting_style());
            pb
        };
        pb.set_message(match phase {
            PHASE_SCANNING => "Scanning".to_string(),
            PHASE_CLASSIFYING => "Classifying".to_string(),
            PHASE_COMPARING => "Comparing".to_string(),
            other => other.to_string(),
        });

        if let Ok(mut slot) = self.bar.lock() {
            if let Some(previous) = slot.replace(pb) {
                previous.finish_and_clear();
            }
        }
    }

    fn on_progress(&self, current: usize, path: &str) {
        if self.quiet {
            return;
        }
        if let Ok(slot) = self.bar.lock() {
            if let Some(ref pb) = *slot {
                pb.set_position(current as u64);
                pb.set_message(truncate_path(path, 30));
            }
        }
    }

    fn on_phase_end(&self, phase: &str) {
        if self.quiet {
            return;
        }
        if let Ok(mut slot) = self.bar.lock() {
            if let Some(pb) = slot.take() {
                log::trace!("Progress phase '{}' finished at {}", phase, pb.position());
                pb.finish_and_clear();
            }
        }
    }
}

/// Truncate a path for display in the progress bar.
fn truncate_path(path: &str, max_len: usize) -> String {
    if path.chars().count() <= max_len {
        return path.to_string();
    }

    let file_name = std::path::Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    let name_len = file_name.chars().count();
    if name_len + 4 > max_len {
        let tail: String = file_name
            .chars()
            .skip(name_len.saturating_sub(max_len.saturating_sub(3)))
            .collect();
        return format!("...{tail}");
    }

    format!(".../{file_name}")
}
