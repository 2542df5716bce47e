//! Partitioning of size runs into duplicate sets.
//!
//! # Overview
//!
//! [`DuplicateGrouper`] makes a single pass over a size-sorted
//! [`FileCatalog`]. Records of equal size are contiguous after sorting, so
//! each maximal block of equal sizes (a *size run*) is handled on its own:
//!
//! 1. A run of one record cannot contain duplicates and is skipped.
//! 2. Otherwise every still-unprocessed record of the run seeds a set and is
//!    compared against each later unprocessed record of the same run.
//!    Identical records join the seed's set and are marked processed, so each
//!    equivalence class is seeded exactly once.
//! 3. Sets with at least two members are emitted, seed first.
//!
//! A failed comparison never merges two files. The pair is recorded as a
//! [`Diagnostic`] and the pass carries on with the remaining candidates.
//!
//! # Example
//!
//! ```no_run
//! use mimedupe::catalog::{FileCatalog, FileRecord};
//! use mimedupe::duplicates::{ByteComparator, DuplicateGrouper};
//!
//! let mut catalog = FileCatalog::new();
//! catalog.append(FileRecord::new("/data/a.bin", 100, "application/octet-stream"));
//! catalog.append(FileRecord::new("/data/b.bin", 100, "application/octet-stream"));
//! catalog.sort_by_size_then_path();
//!
//! let grouper = DuplicateGrouper::new(ByteComparator::new());
//! let outcome = grouper.group(&mut catalog);
//! for set in &outcome.sets {
//!     println!("{} bytes: {:?}", set.size(), set.paths(&catalog));
//! }
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::comparator::{CompareError, Comparison, ContentComparator};
use crate::catalog::{FileCatalog, FileRecord};
use crate::progress::{ProgressCallback, PHASE_COMPARING};

/// A verified set of byte-identical files, by catalog index.
///
/// Members are in discovery order: the seed first, then each match in the
/// order it was found. Indices are only meaningful for the catalog the set
/// was produced from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateSet {
    size: u64,
    members: Vec<usize>,
}

impl DuplicateSet {
    fn seeded(size: u64, seed: usize) -> Self {
        Self {
            size,
            members: vec![seed],
        }
    }

    /// Size in bytes shared by every member.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the set has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Catalog indices of the members, seed first.
    #[must_use]
    pub fn members(&self) -> &[usize] {
        &self.members
    }

    /// Resolve members against the catalog they were grouped from.
    pub fn records<'a>(
        &'a self,
        catalog: &'a FileCatalog,
    ) -> impl Iterator<Item = &'a FileRecord> + 'a {
        self.members.iter().map(move |&idx| &catalog[idx])
    }

    /// Member paths in discovery order.
    #[must_use]
    pub fn paths<'a>(&self, catalog: &'a FileCatalog) -> Vec<&'a Path> {
        self.members
            .iter()
            .map(|&idx| catalog[idx].path())
            .collect()
    }
}

/// A non-fatal problem found while grouping.
#[derive(Debug)]
pub enum Diagnostic {
    /// The comparator could not reach a verdict for a pair.
    CompareFailed {
        /// Seed of the set being built
        seed: PathBuf,
        /// Candidate that was skipped
        candidate: PathBuf,
        /// Why the comparison failed
        error: CompareError,
    },
    /// The same path appears more than once in the catalog.
    DuplicateRecord {
        /// The repeated path
        path: PathBuf,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CompareFailed {
                seed,
                candidate,
                error,
            } => write!(
                f,
                "skipped comparison between {} and {}: {}",
                seed.display(),
                candidate.display(),
                error
            ),
            Self::DuplicateRecord { path } => {
                write!(f, "path listed more than once: {}", path.display())
            }
        }
    }
}

/// Counters collected during one grouping pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupingStats {
    /// Records visited by the pass
    pub records: usize,
    /// Size runs with two or more unprocessed records
    pub candidate_runs: usize,
    /// Size runs with a single record (skipped without comparing)
    pub singleton_runs: usize,
    /// Comparator invocations
    pub comparisons: usize,
    /// Comparisons that ended in an error
    pub failed_comparisons: usize,
    /// Emitted duplicate sets
    pub duplicate_sets: usize,
    /// Files in emitted sets, excluding one original per set
    pub duplicate_files: usize,
    /// Bytes held by those extra copies
    pub reclaimable_space: u64,
}

/// Result of one grouping pass.
#[derive(Debug, Default)]
pub struct GroupingOutcome {
    /// Emitted sets ordered by (size, path of first member)
    pub sets: Vec<DuplicateSet>,
    /// Pass counters
    pub stats: GroupingStats,
    /// Non-fatal problems, in the order they occurred
    pub diagnostics: Vec<Diagnostic>,
}

/// Groups a size-sorted catalog into duplicate sets.
pub struct DuplicateGrouper<C: ContentComparator> {
    comparator: C,
    progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl<C: ContentComparator> DuplicateGrouper<C> {
    /// Create a grouper around the given comparator.
    #[must_use]
    pub fn new(comparator: C) -> Self {
        Self {
            comparator,
            progress_callback: None,
        }
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// The comparator in use.
    #[must_use]
    pub fn comparator(&self) -> &C {
        &self.comparator
    }

    /// Run one grouping pass over `catalog`.
    ///
    /// The catalog should already be sorted by size then path; an unsorted
    /// catalog is sorted first. Records that end up in a set, or that seeded
    /// one, are left in the processed state, so a second pass over the same
    /// catalog emits nothing.
    pub fn group(&self, catalog: &mut FileCatalog) -> GroupingOutcome {
        let mut outcome = GroupingOutcome::default();
        let count = catalog.count();
        outcome.stats.records = count;

        if count < 2 {
            log::debug!("Grouping skipped: {} record(s) in catalog", count);
            return outcome;
        }

        if !catalog.is_sorted_by_size_then_path() {
            log::warn!("Catalog handed to grouper is not sorted by size; sorting it now");
            catalog.sort_by_size_then_path();
        }

        if let Some(ref callback) = self.progress_callback {
            callback.on_phase_start(PHASE_COMPARING, count);
        }

        let mut i = 0;
        while i < count {
            if catalog.is_processed(i) {
                i += 1;
                continue;
            }

            let run_start = i;
            let size = catalog[run_start].size();
            let mut run_end = run_start;
            while run_end + 1 < count && catalog[run_end + 1].size() == size {
                run_end += 1;
            }

            if run_end == run_start {
                outcome.stats.singleton_runs += 1;
                log::trace!(
                    "Unique size {} bytes: {}",
                    size,
                    catalog[run_start].path().display()
                );
            } else {
                outcome.stats.candidate_runs += 1;
                log::debug!(
                    "Size run of {} bytes: {} candidate(s)",
                    size,
                    run_end - run_start + 1
                );
                self.partition_run(catalog, run_start, run_end, &mut outcome);
            }

            if let Some(ref callback) = self.progress_callback {
                callback.on_progress(run_end + 1, &catalog[run_end].path().to_string_lossy());
            }

            i = run_end + 1;
        }

        if let Some(ref callback) = self.progress_callback {
            callback.on_phase_end(PHASE_COMPARING);
        }

        log::info!(
            "Grouping complete: {} set(s), {} comparison(s), {} failed",
            outcome.stats.duplicate_sets,
            outcome.stats.comparisons,
            outcome.stats.failed_comparisons
        );

        outcome
    }

    /// Split the run `start..=end` into equivalence classes.
    fn partition_run(
        &self,
        catalog: &mut FileCatalog,
        start: usize,
        end: usize,
        outcome: &mut GroupingOutcome,
    ) {
        // Within a run records are ordered by path, so repeats are adjacent
        for idx in (start + 1)..=end {
            if !catalog.is_processed(idx) && catalog[idx].path() == catalog[idx - 1].path() {
                let path = catalog[idx].path().to_path_buf();
                log::warn!(
                    "Path listed more than once, ignoring repeat: {}",
                    path.display()
                );
                outcome
                    .diagnostics
                    .push(Diagnostic::DuplicateRecord { path });
                catalog.mark_processed(idx);
            }
        }

        for seed in start..=end {
            if catalog.is_processed(seed) {
                continue;
            }

            let size = catalog[seed].size();
            let mut set = DuplicateSet::seeded(size, seed);
            catalog.mark_processed(seed);

            for candidate in (seed + 1)..=end {
                if catalog.is_processed(candidate) {
                    continue;
                }

                let seed_path = catalog[seed].path();
                let candidate_path = catalog[candidate].path();

                outcome.stats.comparisons += 1;
                match self.comparator.compare(seed_path, candidate_path) {
                    Comparison::Identical => {
                        log::trace!(
                            "Identical: {} == {}",
                            seed_path.display(),
                            candidate_path.display()
                        );
                        set.members.push(candidate);
                        catalog.mark_processed(candidate);
                    }
                    Comparison::Different => {}
                    Comparison::Error(error) => {
                        outcome.stats.failed_comparisons += 1;
                        let diagnostic = Diagnostic::CompareFailed {
                            seed: seed_path.to_path_buf(),
                            candidate: candidate_path.to_path_buf(),
                            error,
                        };
                        log::warn!("{}", diagnostic);
                        outcome.diagnostics.push(diagnostic);
                    }
                }
            }

            if set.len() > 1 {
                outcome.stats.duplicate_sets += 1;
                outcome.stats.duplicate_files += set.len() - 1;
                outcome.stats.reclaimable_space += size * (set.len() as u64 - 1);
                log::debug!(
                    "Duplicate set {}: {} files of {} bytes",
                    outcome.stats.duplicate_sets,
                    set.len(),
                    size
                );
                outcome.sets.push(set);
            }
        }
    }
}
