//! Duplicate detection module.
//!
//! This module provides functionality for:
//! - Byte-by-byte content comparison ([`comparator`])
//! - Partitioning size runs into duplicate sets ([`grouper`])
//! - Owned duplicate groups for reporting ([`groups`])
//! - The scan-then-group pipeline ([`finder`])

pub mod comparator;
pub mod finder;
pub mod grouper;
pub mod groups;

pub use comparator::{
    compare_readers, ByteComparator, CompareError, Comparison, ContentComparator,
    DEFAULT_CHUNK_SIZE,
};
pub use finder::{DuplicateFinder, FindResult, FinderError, ScanSummary, SearchOutcome};
pub use grouper::{Diagnostic, DuplicateGrouper, DuplicateSet, GroupingOutcome, GroupingStats};
pub use groups::{DuplicateGroup, GroupMember};
