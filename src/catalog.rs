//! In-memory catalog of candidate files.
//!
//! # Overview
//!
//! The [`FileCatalog`] owns every [`FileRecord`] produced by the scanner for
//! one run. Records are appended in discovery order and sorted once, by size
//! and then by path, right before duplicate grouping.
//!
//! Each record sits in a slot next to its [`RecordState`]. The state only ever
//! moves from [`RecordState::Unprocessed`] to [`RecordState::Processed`] and is
//! written exclusively by the duplicate grouper, so no record is compared or
//! reported twice.
//!
//! # Example
//!
//! ```
//! use mimedupe::catalog::{FileCatalog, FileRecord};
//!
//! let mut catalog = FileCatalog::new();
//! catalog.append(FileRecord::new("/data/b.txt", 100, "text/plain"));
//! catalog.append(FileRecord::new("/data/c.txt", 50, "text/plain"));
//! catalog.append(FileRecord::new("/data/a.txt", 100, "text/plain"));
//!
//! catalog.sort_by_size_then_path();
//!
//! let paths: Vec<_> = catalog.iter().map(|r| r.path().to_path_buf()).collect();
//! assert_eq!(paths[0].to_str(), Some("/data/c.txt"));
//! assert_eq!(paths[1].to_str(), Some("/data/a.txt"));
//! assert_eq!(paths[2].to_str(), Some("/data/b.txt"));
//! ```

use std::cmp::Ordering;
use std::ops::Index;
use std::path::{Path, PathBuf};

/// Initial slot capacity of a new catalog.
const INITIAL_CAPACITY: usize = 16;

/// Immutable description of one candidate file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    path: PathBuf,
    size: u64,
    content_label: String,
}

impl FileRecord {
    /// Create a new record.
    ///
    /// `path` is expected to be canonical and `size` non-zero; both are the
    /// traversal collaborator's responsibility.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, size: u64, content_label: impl Into<String>) -> Self {
        let path = path.into();
        debug_assert!(size > 0, "zero-size file in catalog: {}", path.display());
        Self {
            path,
            size,
            content_label: content_label.into(),
        }
    }

    /// Canonical path of the file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Size in bytes as observed during traversal.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Opaque content-type label attached by the classifier.
    #[must_use]
    pub fn content_label(&self) -> &str {
        &self.content_label
    }

    /// Raw bytes of the path, used for byte-wise ordering.
    fn path_bytes(&self) -> &[u8] {
        self.path.as_os_str().as_encoded_bytes()
    }

    /// Total order used by the catalog: size ascending, then path byte-wise.
    fn cmp_size_then_path(&self, other: &Self) -> Ordering {
        self.size
            .cmp(&other.size)
            .then_with(|| self.path_bytes().cmp(other.path_bytes()))
    }
}

/// Processing state of a catalog record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecordState {
    /// Not yet assigned to a duplicate set or ruled out.
    #[default]
    Unprocessed,
    /// Terminal: seeded a set, joined a set, or was otherwise resolved.
    Processed,
}

#[derive(Debug, Clone)]
struct Slot {
    record: FileRecord,
    state: RecordState,
}

/// Ordered, growable collection of [`FileRecord`]s.
///
/// Insertion order is preserved until [`FileCatalog::sort_by_size_then_path`]
/// is called. Records are never removed individually.
#[derive(Debug, Clone)]
pub struct FileCatalog {
    slots: Vec<Slot>,
}

impl Default for FileCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<FileRecord> for FileCatalog {
    fn from_iter<I: IntoIterator<Item = FileRecord>>(iter: I) -> Self {
        let mut catalog = Self::new();
        for record in iter {
            catalog.append(record);
        }
        catalog
    }
}

impl FileCatalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: Vec::with_capacity(INITIAL_CAPACITY),
        }
    }

    /// Append a record at the end of the catalog. Amortized O(1).
    pub fn append(&mut self, record: FileRecord) {
        self.slots.push(Slot {
            record,
            state: RecordState::Unprocessed,
        });
    }

    /// Number of records.
    #[must_use]
    pub fn count(&self) -> usize {
        self.slots.len()
    }

    /// Whether the catalog holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Record at `index`, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&FileRecord> {
        self.slots.get(index).map(|slot| &slot.record)
    }

    /// Iterate over records in catalog order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &FileRecord> + '_ {
        self.slots.iter().map(|slot| &slot.record)
    }

    /// Sum of all record sizes.
    #[must_use]
    pub fn total_size(&self) -> u64 {
        self.slots.iter().map(|slot| slot.record.size).sum()
    }

    /// Sort by size ascending, ties broken by path compared byte-wise.
    ///
    /// Processing state travels with its record.
    pub fn sort_by_size_then_path(&mut self) {
        self.slots
            .sort_by(|a, b| a.record.cmp_size_then_path(&b.record));
    }

    /// Whether the catalog is already in size-then-path order.
    #[must_use]
    pub fn is_sorted_by_size_then_path(&self) -> bool {
        self.slots
            .windows(2)
            .all(|pair| pair[0].record.cmp_size_then_path(&pair[1].record) != Ordering::Greater)
    }

    /// Processing state of the record at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    #[must_use]
    pub fn state(&self, index: usize) -> RecordState {
        self.slots[index].state
    }

    /// Whether the record at `index` has been processed.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    #[must_use]
    pub fn is_processed(&self, index: usize) -> bool {
        self.state(index) == RecordState::Processed
    }

    /// Number of records in the processed state.
    #[must_use]
    pub fn processed_count(&self) -> usize {
        self.slots
            .iter()
            .filter(|slot| slot.state == RecordState::Processed)
            .count()
    }

    /// Move the record at `index` to the terminal processed state.
    pub(crate) fn mark_processed(&mut self, index: usize) {
        self.slots[index].state = RecordState::Processed;
    }
}

impl Index<usize> for FileCatalog {
    type Output = FileRecord;

    fn index(&self, index: usize) -> &Self::Output {
        &self.slots[index].record
    }
}
