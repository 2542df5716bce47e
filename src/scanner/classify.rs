//! Content-type classification.
//!
//! Every candidate file gets a content-type label such as `image/png`. The
//! default [`FileCommandClassifier`] asks the external `file` utility for the
//! MIME type. Anything implementing [`ContentClassifier`] can take its place,
//! including a plain closure.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Label used when a file cannot be classified.
pub const DEFAULT_CONTENT_LABEL: &str = "application/octet-stream";

/// Program invoked by [`FileCommandClassifier::default`].
pub const DEFAULT_CLASSIFIER_PROGRAM: &str = "file";

/// Errors that can occur while classifying a file.
#[derive(thiserror::Error, Debug)]
pub enum ClassifyError {
    /// The classifier program could not be started.
    #[error("failed to run {program}: {source}")]
    Spawn {
        /// Program that was invoked
        program: String,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The classifier program exited unsuccessfully.
    #[error("{program} failed for {path} ({status}): {stderr}")]
    Failed {
        /// Program that was invoked
        program: String,
        /// File being classified
        path: PathBuf,
        /// Exit status as reported by the OS
        status: String,
        /// Trimmed standard error output
        stderr: String,
    },

    /// The classifier produced no label.
    #[error("no content type reported for {path}")]
    EmptyOutput {
        /// File being classified
        path: PathBuf,
    },
}

/// Produces a content-type label for a file.
pub trait ContentClassifier: Send + Sync {
    /// Classify the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns a [`ClassifyError`] when no label could be determined. The
    /// scanner then falls back to [`DEFAULT_CONTENT_LABEL`].
    fn classify(&self, path: &Path) -> Result<String, ClassifyError>;
}

impl<F> ContentClassifier for F
where
    F: Fn(&Path) -> Result<String, ClassifyError> + Send + Sync,
{
    fn classify(&self, path: &Path) -> Result<String, ClassifyError> {
        self(path)
    }
}

/// Classifies files by running `<program> -b --mime-type -- <path>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCommandClassifier {
    program: OsString,
}

impl Default for FileCommandClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_CLASSIFIER_PROGRAM)
    }
}

impl FileCommandClassifier {
    /// Create a classifier that runs `program`.
    #[must_use]
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Program this classifier runs.
    #[must_use]
    pub fn program(&self) -> &std::ffi::OsStr {
        &self.program
    }
}

impl ContentClassifier for FileCommandClassifier {
    fn classify(&self, path: &Path) -> Result<String, ClassifyError> {
        let program = self.program.to_string_lossy().to_string();

        // The path is passed as a single argument, never through a shell
        let output = Command::new(&self.program)
            .args(["-b", "--mime-type", "--"])
            .arg(path)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| ClassifyError::Spawn {
                program: program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(ClassifyError::Failed {
                program,
                path: path.to_path_buf(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        parse_label(&output.stdout).ok_or_else(|| ClassifyError::EmptyOutput {
            path: path.to_path_buf(),
        })
    }
}

/// First non-blank line of the classifier output, trimmed.
fn parse_label(stdout: &[u8]) -> Option<String> {
    String::from_utf8_lossy(stdout)
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
}
