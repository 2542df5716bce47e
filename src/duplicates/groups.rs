//! Owned duplicate groups handed to the reporting layer.
//!
//! A [`DuplicateSet`](super::DuplicateSet) only holds catalog indices. Once
//! grouping is finished each set is resolved into a [`DuplicateGroup`] that
//! owns its member paths and labels, so reports no longer need the catalog.

use std::path::{Path, PathBuf};

use super::grouper::DuplicateSet;
use crate::catalog::FileCatalog;

/// One member of a duplicate group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupMember {
    /// Canonical path of the file
    pub path: PathBuf,
    /// Content-type label attached during scanning
    pub content_label: String,
}

/// Confirmed group of byte-identical files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateGroup {
    /// File size in bytes (shared by all members)
    pub size: u64,
    /// Members in discovery order
    pub files: Vec<GroupMember>,
}

impl DuplicateGroup {
    /// Create a new duplicate group.
    #[must_use]
    pub fn new(size: u64, files: Vec<GroupMember>) -> Self {
        Self { size, files }
    }

    /// Resolve a grouper set against the catalog it came from.
    #[must_use]
    pub fn from_set(set: &DuplicateSet, catalog: &FileCatalog) -> Self {
        let files = set
            .records(catalog)
            .map(|record| GroupMember {
                path: record.path().to_path_buf(),
                content_label: record.content_label().to_string(),
            })
            .collect();
        Self::new(set.size(), files)
    }

    /// Number of files in this group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if this group is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Total size of all files in this group.
    #[must_use]
    pub fn total_size(&self) -> u64 {
        self.size * self.files.len() as u64
    }

    /// Total wasted space (all copies minus one).
    #[must_use]
    pub fn wasted_space(&self) -> u64 {
        self.size * self.duplicate_count() as u64
    }

    /// Number of duplicate copies (total - 1 original).
    #[must_use]
    pub fn duplicate_count(&self) -> usize {
        self.files.len().saturating_sub(1)
    }

    /// Member paths in discovery order.
    pub fn paths(&self) -> impl Iterator<Item = &Path> + '_ {
        self.files.iter().map(|member| member.path.as_path())
    }
}
