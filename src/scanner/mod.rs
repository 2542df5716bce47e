//! Scanner module for directory traversal and content-type filtering.
//!
//! This module turns the requested directories into catalog records:
//! - Directory walking with walkdir, never following symbolic links
//! - Canonicalization of every candidate path
//! - Parallel content-type classification (one `file` process per candidate)
//! - Optional filtering on the classification label
//!
//! # Architecture
//!
//! - [`walker`]: Directory traversal and candidate discovery
//! - [`classify`]: Content-type classification
//!
//! # Example
//!
//! ```no_run
//! use mimedupe::catalog::FileCatalog;
//! use mimedupe::scanner::{FileCommandClassifier, ScanOptions, Scanner};
//! use std::path::PathBuf;
//!
//! let options = ScanOptions::default()
//!     .with_roots(vec![PathBuf::from("/home/user/Pictures")])
//!     .with_recursive(true)
//!     .with_mime_filters(vec!["image/jpeg".to_string()]);
//!
//! let scanner = Scanner::new(options, FileCommandClassifier::default());
//! let mut catalog = FileCatalog::new();
//! let report = scanner.scan(&mut catalog).unwrap();
//! println!("{} candidate(s), {} filtered out", catalog.count(), report.filtered_out);
//! ```

pub mod classify;
pub mod walker;

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use rayon::prelude::*;

use crate::catalog::{FileCatalog, FileRecord};
use crate::progress::{ProgressCallback, PHASE_CLASSIFYING, PHASE_SCANNING};

// Re-export main types
pub use classify::{
    ClassifyError, ContentClassifier, FileCommandClassifier, DEFAULT_CLASSIFIER_PROGRAM,
    DEFAULT_CONTENT_LABEL,
};
pub use walker::{Candidate, Walker};

/// Default number of classification threads.
pub const DEFAULT_IO_THREADS: usize = 4;

/// Options for one scan, built once from configuration and CLI flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    /// Directories to scan
    pub roots: Vec<PathBuf>,
    /// Descend into subdirectories
    pub recursive: bool,
    /// Accepted content-type labels; empty accepts everything
    pub mime_filters: Vec<String>,
    /// Threads used for classification
    pub io_threads: usize,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            roots: vec![PathBuf::from(".")],
            recursive: false,
            mime_filters: Vec::new(),
            io_threads: DEFAULT_IO_THREADS,
        }
    }
}

impl ScanOptions {
    /// Set the directories to scan. An empty list falls back to `.`.
    #[must_use]
    pub fn with_roots(mut self, roots: Vec<PathBuf>) -> Self {
        self.roots = if roots.is_empty() {
            vec![PathBuf::from(".")]
        } else {
            roots
        };
        self
    }

    /// Enable or disable recursion into subdirectories.
    #[must_use]
    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Set the accepted content-type labels.
    #[must_use]
    pub fn with_mime_filters(mut self, filters: Vec<String>) -> Self {
        self.mime_filters = filters;
        self
    }

    /// Set the classification thread count (minimum 1).
    #[must_use]
    pub fn with_io_threads(mut self, threads: usize) -> Self {
        self.io_threads = threads.max(1);
        self
    }

    /// Whether a file with `label` passes the content-type filter.
    #[must_use]
    pub fn accepts(&self, label: &str) -> bool {
        self.mime_filters.is_empty() || self.mime_filters.iter().any(|f| f == label)
    }
}

/// Errors that can occur during directory scanning.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// Permission was denied when accessing a file or directory.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// The specified path was not found.
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// The specified path is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// An I/O error occurred while accessing a file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// None of the requested directories could be resolved.
    #[error("No valid directories could be processed")]
    NoUsableRoots,
}

/// What a scan did, besides filling the catalog.
#[derive(Debug, Default)]
pub struct ScanReport {
    /// Canonical roots that were walked
    pub roots_scanned: Vec<PathBuf>,
    /// Regular, non-empty files found by traversal
    pub files_examined: usize,
    /// Files reached more than once through overlapping roots
    pub repeated_paths: usize,
    /// Files rejected by the content-type filter
    pub filtered_out: usize,
    /// Files appended to the catalog
    pub files_accepted: usize,
    /// Classifications that failed and fell back to the default label
    pub classify_failures: usize,
    /// Non-fatal traversal errors
    pub errors: Vec<ScanError>,
    /// Time spent walking and classifying
    pub duration: Duration,
}

/// Walks the requested roots and appends accepted files to a catalog.
pub struct Scanner<K: ContentClassifier> {
    options: ScanOptions,
    classifier: K,
    progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl<K: ContentClassifier> Scanner<K> {
    /// Create a scanner for `options` using `classifier` for labels.
    #[must_use]
    pub fn new(options: ScanOptions, classifier: K) -> Self {
        Self {
            options,
            classifier,
            progress_callback: None,
        }
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Options this scanner runs with.
    #[must_use]
    pub fn options(&self) -> &ScanOptions {
        &self.options
    }

    /// Walk every root, classify candidates and append accepted ones.
    ///
    /// Records are appended in discovery order. Traversal problems are
    /// collected in the report and never stop the scan.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::NoUsableRoots`] when no requested root could be
    /// resolved to a directory.
    pub fn scan(&self, catalog: &mut FileCatalog) -> Result<ScanReport, ScanError> {
        let start = Instant::now();
        let mut report = ScanReport::default();

        if let Some(ref callback) = self.progress_callback {
            callback.on_phase_start(PHASE_SCANNING, 0);
        }

        let candidates = self.collect_candidates(&mut report);

        if let Some(ref callback) = self.progress_callback {
            callback.on_phase_end(PHASE_SCANNING);
        }

        let dirs = report.roots_scanned.len();
        if dirs == 0 {
            return Err(ScanError::NoUsableRoots);
        }

        log::info!(
            "Found {} candidate file(s) under {} director{}",
            candidates.len(),
            dirs,
            if dirs == 1 { "y" } else { "ies" }
        );

        let labels = self.classify_all(&candidates, &mut report);

        for (candidate, label) in candidates.into_iter().zip(labels) {
            if self.options.accepts(&label) {
                catalog.append(FileRecord::new(candidate.path, candidate.size, label));
                report.files_accepted += 1;
            } else {
                log::trace!("Filtered out ({}): {}", label, candidate.path.display());
                report.filtered_out += 1;
            }
        }

        report.duration = start.elapsed();
        log::info!(
            "Scan complete: {} file(s) cataloged, {} filtered out, {} error(s)",
            report.files_accepted,
            report.filtered_out,
            report.errors.len()
        );

        Ok(report)
    }

    /// Walk all roots, keeping each canonical path once.
    fn collect_candidates(&self, report: &mut ScanReport) -> Vec<Candidate> {
        let mut seen: HashSet<PathBuf> = HashSet::new();
        let mut candidates = Vec::new();

        for root in &self.options.roots {
            let resolved = match walker::resolve_root(root) {
                Ok(resolved) => resolved,
                Err(e) => {
                    log::warn!("Skipping {}: {}", root.display(), e);
                    report.errors.push(e);
                    continue;
                }
            };
            log::debug!("Scanning directory: {}", resolved.display());

            for entry in Walker::new(&resolved, self.options.recursive).walk() {
                match entry {
                    Ok(candidate) => {
                        report.files_examined += 1;
                        if let Some(ref callback) = self.progress_callback {
                            callback.on_progress(
                                report.files_examined,
                                &candidate.path.to_string_lossy(),
                            );
                        }
                        if seen.insert(candidate.path.clone()) {
                            candidates.push(candidate);
                        } else {
                            log::debug!("Already scanned: {}", candidate.path.display());
                            report.repeated_paths += 1;
                        }
                    }
                    Err(e) => report.errors.push(e),
                }
            }

            report.roots_scanned.push(resolved);
        }

        candidates
    }

    /// Label every candidate, keeping candidate order.
    fn classify_all(&self, candidates: &[Candidate], report: &mut ScanReport) -> Vec<String> {
        if let Some(ref callback) = self.progress_callback {
            callback.on_phase_start(PHASE_CLASSIFYING, candidates.len());
        }

        let done = AtomicUsize::new(0);
        let results: Vec<Option<String>> = match rayon::ThreadPoolBuilder::new()
            .num_threads(self.options.io_threads.max(1))
            .build()
        {
            Ok(pool) => pool.install(|| {
                candidates
                    .par_iter()
                    .map(|candidate| self.classify_one(candidate, &done))
                    .collect()
            }),
            Err(e) => {
                log::warn!(
                    "Failed to create classification thread pool ({e}), classifying sequentially"
                );
                candidates
                    .iter()
                    .map(|candidate| self.classify_one(candidate, &done))
                    .collect()
            }
        };

        if let Some(ref callback) = self.progress_callback {
            callback.on_phase_end(PHASE_CLASSIFYING);
        }

        results
            .into_iter()
            .map(|label| {
                label.unwrap_or_else(|| {
                    report.classify_failures += 1;
                    DEFAULT_CONTENT_LABEL.to_string()
                })
            })
            .collect()
    }

    fn classify_one(&self, candidate: &Candidate, done: &AtomicUsize) -> Option<String> {
        let label = self.classifier.classify(&candidate.path);

        let current = done.fetch_add(1, Ordering::Relaxed) + 1;
        if let Some(ref callback) = self.progress_callback {
            callback.on_progress(current, &candidate.path.to_string_lossy());
        }

        match label {
            Ok(label) => Some(label),
            Err(e) => {
                log::warn!(
                    "Could not classify {}, using {}: {}",
                    candidate.path.display(),
                    DEFAULT_CONTENT_LABEL,
                    e
                );
                None
            }
        }
    }
}
