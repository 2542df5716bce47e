//! JSON output formatter for duplicate search results.
//!
//! Provides machine-readable JSON output for scripting and automation.
//!
//! # Output Schema
//!
//! ```json
//! {
//!   "duplicates": [
//!     {
//!       "size": 1024,
//!       "files": [
//!         { "path": "/path/to/file1.jpg", "mime_type": "image/jpeg" },
//!         { "path": "/path/to/file2.jpg", "mime_type": "image/jpeg" }
//!       ]
//!     }
//!   ],
//!   "summary": {
//!     "outcome": "duplicates_found",
//!     "files_examined": 120,
//!     "filtered_out": 20,
//!     "total_files": 100,
//!     "total_size": 1048576,
//!     "size_runs": 7,
//!     "comparisons": 42,
//!     "failed_comparisons": 0,
//!     "duplicate_groups": 5,
//!     "duplicate_files": 10,
//!     "reclaimable_space": 51200,
//!     "scan_errors": 0,
//!     "scan_duration_ms": 1234,
//!     "exit_code": 0,
//!     "exit_code_name": "MD000"
//!   },
//!   "warnings": []
//! }
//! ```

use std::io::Write;

use serde::Serialize;

use crate::duplicates::{DuplicateGroup, FindResult, ScanSummary, SearchOutcome};
use crate::error::ExitCode;

/// One file of a duplicate group in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonFile {
    /// Canonical path
    pub path: String,
    /// Detected content type
    pub mime_type: String,
}

/// A single duplicate group in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonDuplicateGroup {
    /// File size in bytes
    pub size: u64,
    /// Member files in discovery order
    pub files: Vec<JsonFile>,
}

impl JsonDuplicateGroup {
    /// Create a JSON duplicate group from a DuplicateGroup.
    #[must_use]
    pub fn from_duplicate_group(group: &DuplicateGroup) -> Self {
        Self {
            size: group.size,
            files: group
                .files
                .iter()
                .map(|member| JsonFile {
                    path: member.path.to_string_lossy().into_owned(),
                    mime_type: member.content_label.clone(),
                })
                .collect(),
        }
    }
}

/// Summary statistics in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonSummary {
    /// How the search ended
    pub outcome: &'static str,
    /// Regular, non-empty files found by traversal
    pub files_examined: usize,
    /// Files rejected by the MIME type filter
    pub filtered_out: usize,
    /// Files that took part in grouping
    pub total_files: usize,
    /// Total size of those files in bytes
    pub total_size: u64,
    /// Sizes shared by two or more files
    pub size_runs: usize,
    /// Byte-wise comparisons performed
    pub comparisons: usize,
    /// Comparisons that could not be completed
    pub failed_comparisons: usize,
    /// Number of confirmed duplicate groups
    pub duplicate_groups: usize,
    /// Total number of duplicate files (excluding originals)
    pub duplicate_files: usize,
    /// Total space that can be reclaimed by removing duplicates (bytes)
    pub reclaimable_space: u64,
    /// Number of traversal errors
    pub scan_errors: usize,
    /// Duration of the search in milliseconds
    pub scan_duration_ms: u64,
    /// The exit code number
    pub exit_code: i32,
    /// The machine-readable exit code name (e.g., "MD000")
    pub exit_code_name: String,
}

impl JsonSummary {
    /// Create a JSON summary from a ScanSummary and an exit code.
    #[must_use]
    pub fn from_scan_summary(summary: &ScanSummary, exit_code: ExitCode) -> Self {
        Self {
            outcome: outcome_name(summary.outcome()),
            files_examined: summary.files_examined,
            filtered_out: summary.filtered_out,
            total_files: summary.total_files,
            total_size: summary.total_size,
            size_runs: summary.size_runs,
            comparisons: summary.comparisons,
            failed_comparisons: summary.failed_comparisons,
            duplicate_groups: summary.duplicate_groups,
            duplicate_files: summary.duplicate_files,
            reclaimable_space: summary.reclaimable_space,
            scan_errors: summary.scan_errors.len(),
            scan_duration_ms: u64::try_from(summary.scan_duration.as_millis()).unwrap_or(u64::MAX),
            exit_code: exit_code.as_i32(),
            exit_code_name: exit_code.code_prefix().to_string(),
        }
    }
}

fn outcome_name(outcome: SearchOutcome) -> &'static str {
    match outcome {
        SearchOutcome::DuplicatesFound => "duplicates_found",
        SearchOutcome::NoDuplicates => "no_duplicates",
        SearchOutcome::TooFewFiles => "too_few_files",
        SearchOutcome::NoFiles => "no_files",
    }
}

/// Complete JSON output structure.
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput {
    /// List of duplicate groups
    pub duplicates: Vec<JsonDuplicateGroup>,
    /// Search summary statistics
    pub summary: JsonSummary,
    /// Scan errors and skipped comparisons, as messages
    pub warnings: Vec<String>,
}

impl JsonOutput {
    /// Create a new JSON output from a search result and exit code.
    ///
    /// # Example
    ///
    /// ```
    /// use mimedupe::duplicates::FindResult;
    /// use mimedupe::output::json::JsonOutput;
    /// use mimedupe::error::ExitCode;
    ///
    /// let output = JsonOutput::new(&FindResult::default(), ExitCode::NoDuplicates);
    /// assert!(output.duplicates.is_empty());
    /// assert_eq!(output.summary.outcome, "no_files");
    /// ```
    #[must_use]
    pub fn new(result: &FindResult, exit_code: ExitCode) -> Self {
        let warnings = result
            .summary
            .scan_errors
            .iter()
            .map(ToString::to_string)
            .chain(result.diagnostics.iter().map(ToString::to_string))
            .collect();

        Self {
            duplicates: result
                .groups
                .iter()
                .map(JsonDuplicateGroup::from_duplicate_group)
                .collect(),
            summary: JsonSummary::from_scan_summary(&result.summary, exit_code),
            warnings,
        }
    }

    /// Serialize to compact JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (unlikely for valid data).
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize to pretty-printed JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (unlikely for valid data).
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write JSON to a writer, followed by a newline.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W, pretty: bool) -> Result<(), JsonOutputError> {
        let json = if pretty {
            self.to_json_pretty()?
        } else {
            self.to_json()?
        };
        writer.write_all(json.as_bytes())?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

/// Errors that can occur during JSON output.
#[derive(thiserror::Error, Debug)]
pub enum JsonOutputError {
    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error during writing
    #[error("I/O error during JSON generation: {0}")]
    Io(#[from] std::io::Error),
}
