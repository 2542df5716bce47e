//! Duplicate finder orchestrating the scan and grouping phases.
//!
//! # Pipeline
//!
//! 1. **Scan** - walk the roots, classify and filter files into a catalog
//! 2. **Sort** - order the catalog by size, then by path
//! 3. **Group** - compare same-size files byte by byte
//! 4. **Resolve** - turn index-based sets into owned [`DuplicateGroup`]s
//!
//! The summary collects counters from every phase for reporting.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::comparator::{ByteComparator, ContentComparator};
use super::grouper::{Diagnostic, DuplicateGrouper};
use super::groups::DuplicateGroup;
use crate::catalog::FileCatalog;
use crate::progress::ProgressCallback;
use crate::scanner::{ContentClassifier, ScanError, ScanReport, Scanner};

/// How a search ended, from the user's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// At least one duplicate group was found.
    DuplicatesFound,
    /// Files were compared but none were identical.
    NoDuplicates,
    /// Only one file survived scanning and filtering.
    TooFewFiles,
    /// No file survived scanning and filtering.
    NoFiles,
}

/// Summary statistics from a duplicate search.
#[derive(Debug, Default)]
pub struct ScanSummary {
    /// Regular, non-empty files found by traversal
    pub files_examined: usize,
    /// Files rejected by the content-type filter
    pub filtered_out: usize,
    /// Files that took part in grouping
    pub total_files: usize,
    /// Total size of those files in bytes
    pub total_size: u64,
    /// Sizes shared by two or more files
    pub size_runs: usize,
    /// Files eliminated because no other file has their size
    pub unique_sizes: usize,
    /// Byte-wise comparisons performed
    pub comparisons: usize,
    /// Comparisons that could not be completed
    pub failed_comparisons: usize,
    /// Number of confirmed duplicate groups
    pub duplicate_groups: usize,
    /// Total number of duplicate files (excluding originals)
    pub duplicate_files: usize,
    /// Total space that can be reclaimed by removing duplicates
    pub reclaimable_space: u64,
    /// Duration of the entire search
    pub scan_duration: Duration,
    /// Errors encountered while scanning
    pub scan_errors: Vec<ScanError>,
}

impl ScanSummary {
    /// Classify the search result.
    #[must_use]
    pub fn outcome(&self) -> SearchOutcome {
        if self.duplicate_groups > 0 {
            SearchOutcome::DuplicatesFound
        } else if self.total_files == 0 {
            SearchOutcome::NoFiles
        } else if self.total_files < 2 {
            SearchOutcome::TooFewFiles
        } else {
            SearchOutcome::NoDuplicates
        }
    }

    /// Calculate the percentage of space that is wasted by duplicates.
    #[must_use]
    pub fn wasted_percentage(&self) -> f64 {
        if self.total_size == 0 {
            0.0
        } else {
            (self.reclaimable_space as f64 / self.total_size as f64) * 100.0
        }
    }

    /// Format reclaimable space as human-readable string.
    #[must_use]
    pub fn reclaimable_display(&self) -> String {
        bytesize::ByteSize::b(self.reclaimable_space).to_string()
    }

    /// Format total size as human-readable string.
    #[must_use]
    pub fn total_size_display(&self) -> String {
        bytesize::ByteSize::b(self.total_size).to_string()
    }

    fn absorb_scan_report(&mut self, report: ScanReport) {
        self.files_examined = report.files_examined;
        self.filtered_out = report.filtered_out;
        self.scan_errors = report.errors;
    }
}

/// Everything a search produced.
#[derive(Debug, Default)]
pub struct FindResult {
    /// Duplicate groups ordered by size, then by first member path
    pub groups: Vec<DuplicateGroup>,
    /// Counters
    pub summary: ScanSummary,
    /// Non-fatal problems met while grouping
    pub diagnostics: Vec<Diagnostic>,
}

impl FindResult {
    /// Whether any scan error or grouping diagnostic was recorded.
    #[must_use]
    pub fn has_problems(&self) -> bool {
        !self.summary.scan_errors.is_empty() || !self.diagnostics.is_empty()
    }
}

/// Errors that stop a search altogether.
#[derive(thiserror::Error, Debug)]
pub enum FinderError {
    /// None of the requested directories could be scanned.
    #[error("No valid directories could be processed: {}", format_roots(.0))]
    NoUsableRoots(Vec<PathBuf>),

    /// A scan error occurred.
    #[error(transparent)]
    ScanError(#[from] ScanError),
}

fn format_roots(roots: &[PathBuf]) -> String {
    roots
        .iter()
        .map(|r| r.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Duplicate finder running the scan and grouping phases.
///
/// # Example
///
/// ```no_run
/// use mimedupe::duplicates::DuplicateFinder;
/// use mimedupe::scanner::{FileCommandClassifier, ScanOptions, Scanner};
///
/// let scanner = Scanner::new(ScanOptions::default(), FileCommandClassifier::default());
/// let finder = DuplicateFinder::with_defaults();
///
/// let result = finder.find_duplicates(&scanner).unwrap();
/// println!("Found {} duplicate groups", result.summary.duplicate_groups);
/// println!("Reclaimable space: {}", result.summary.reclaimable_display());
/// ```
pub struct DuplicateFinder<C: ContentComparator = ByteComparator> {
    grouper: DuplicateGrouper<C>,
}

impl DuplicateFinder<ByteComparator> {
    /// Create a finder comparing files with the default chunk size.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(ByteComparator::default())
    }
}

impl<C: ContentComparator> DuplicateFinder<C> {
    /// Create a finder around the given comparator.
    #[must_use]
    pub fn new(comparator: C) -> Self {
        Self {
            grouper: DuplicateGrouper::new(comparator),
        }
    }

    /// Set the progress callback used during comparison.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.grouper = self.grouper.with_progress_callback(callback);
        self
    }

    /// Scan with `scanner`, then group what it cataloged.
    ///
    /// # Errors
    ///
    /// Returns [`FinderError::NoUsableRoots`] when none of the scanner's roots
    /// could be walked. Every other problem is reported inside the result.
    pub fn find_duplicates<K: ContentClassifier>(
        &self,
        scanner: &Scanner<K>,
    ) -> Result<FindResult, FinderError> {
        let start_time = Instant::now();
        let mut catalog = FileCatalog::new();

        let report = match scanner.scan(&mut catalog) {
            Ok(report) => report,
            Err(ScanError::NoUsableRoots) => {
                return Err(FinderError::NoUsableRoots(scanner.options().roots.clone()))
            }
            Err(e) => return Err(e.into()),
        };

        let mut result = self.find(&mut catalog);
        result.summary.absorb_scan_report(report);
        result.summary.scan_duration = start_time.elapsed();

        Ok(result)
    }

    /// Group an already populated catalog.
    ///
    /// The catalog is sorted by size then path before grouping and its
    /// records are left in the processed state afterwards.
    pub fn find(&self, catalog: &mut FileCatalog) -> FindResult {
        let start_time = Instant::now();
        let mut summary = ScanSummary {
            files_examined: catalog.count(),
            total_files: catalog.count(),
            total_size: catalog.total_size(),
            ..ScanSummary::default()
        };

        catalog.sort_by_size_then_path();
        let outcome = self.grouper.group(catalog);

        let groups: Vec<DuplicateGroup> = outcome
            .sets
            .iter()
            .map(|set| DuplicateGroup::from_set(set, catalog))
            .collect();

        let stats = outcome.stats;
        summary.size_runs = stats.candidate_runs;
        summary.unique_sizes = stats.singleton_runs;
        summary.comparisons = stats.comparisons;
        summary.failed_comparisons = stats.failed_comparisons;
        summary.duplicate_groups = stats.duplicate_sets;
        summary.duplicate_files = stats.duplicate_files;
        summary.reclaimable_space = stats.reclaimable_space;
        summary.scan_duration = start_time.elapsed();

        log::info!(
            "Found {} duplicate group(s), {} reclaimable",
            summary.duplicate_groups,
            summary.reclaimable_display()
        );

        FindResult {
            groups,
            summary,
            diagnostics: outcome.diagnostics,
        }
    }
}
