//! Human-readable report of duplicate search results.
//!
//! # Format
//!
//! ```text
//!
//! --- Duplicate Sets Found ---
//!
//! Set 1 (Size: 1024 bytes):
//!   /path/to/file1.txt
//!   /path/to/file2.txt
//!
//! --- End of Duplicate Sets ---
//!
//! 1 duplicate set, 1 redundant file, 1.0 KiB reclaimable (2 files compared in 3 ms)
//! ```
//!
//! Searches without duplicates print a single explanatory line instead of the
//! set listing.

use std::io::{self, Write};

use bytesize::ByteSize;
use yansi::Paint;

use crate::duplicates::{DuplicateGroup, FindResult, SearchOutcome};

/// Header printed before the first set.
pub const SETS_HEADER: &str = "--- Duplicate Sets Found ---";
/// Footer printed after the last set.
pub const SETS_FOOTER: &str = "--- End of Duplicate Sets ---";
/// Printed when files were compared but none matched.
pub const NO_DUPLICATES_MESSAGE: &str = "No duplicate files found among the processed files.";
/// Printed when no file survived scanning and filtering.
pub const NO_FILES_MESSAGE: &str =
    "No files found matching criteria in the specified valid directories.";
/// Printed when a single file survived scanning and filtering.
pub const TOO_FEW_FILES_MESSAGE: &str =
    "Not enough files to compare for duplicates, or no files found.";

/// Text report writer.
#[derive(Debug, Clone)]
pub struct TextOutput<'a> {
    result: &'a FindResult,
    color: bool,
    show_types: bool,
    summary: bool,
}

impl<'a> TextOutput<'a> {
    /// Create a plain report for `result`, with the summary line.
    #[must_use]
    pub fn new(result: &'a FindResult) -> Self {
        Self {
            result,
            color: false,
            show_types: false,
            summary: true,
        }
    }

    /// Style headers and paths with ANSI colors.
    #[must_use]
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Append each file's MIME type in brackets.
    #[must_use]
    pub fn with_types(mut self, show_types: bool) -> Self {
        self.show_types = show_types;
        self
    }

    /// Print the closing statistics line.
    #[must_use]
    pub fn with_summary(mut self, summary: bool) -> Self {
        self.summary = summary;
        self
    }

    /// Write the report.
    ///
    /// # Errors
    ///
    /// Returns any error from the underlying writer.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        match self.result.summary.outcome() {
            SearchOutcome::DuplicatesFound => self.write_sets(writer)?,
            SearchOutcome::NoDuplicates => writeln!(writer, "{NO_DUPLICATES_MESSAGE}")?,
            SearchOutcome::NoFiles => writeln!(writer, "{NO_FILES_MESSAGE}")?,
            SearchOutcome::TooFewFiles => writeln!(writer, "{TOO_FEW_FILES_MESSAGE}")?,
        }

        if self.summary {
            writeln!(writer)?;
            writeln!(writer, "{}", self.summary_line())?;
        }
        Ok(())
    }

    /// Render the whole report into a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the report cannot be formatted.
    pub fn render(&self) -> io::Result<String> {
        let mut buffer = Vec::new();
        self.write_to(&mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }

    fn write_sets<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writeln!(writer)?;
        writeln!(writer, "{}", self.header(SETS_HEADER))?;

        for (number, group) in self.result.groups.iter().enumerate() {
            self.write_group(writer, number + 1, group)?;
        }

        writeln!(writer)?;
        writeln!(writer, "{}", self.header(SETS_FOOTER))
    }

    fn write_group<W: Write>(
        &self,
        writer: &mut W,
        number: usize,
        group: &DuplicateGroup,
    ) -> io::Result<()> {
        writeln!(writer)?;
        let title = format!("Set {} (Size: {} bytes):", number, group.size);
        if self.color {
            writeln!(writer, "{}", title.bold())?;
        } else {
            writeln!(writer, "{title}")?;
        }

        for member in &group.files {
            let path = member.path.display();
            match (self.show_types, self.color) {
                (false, _) => writeln!(writer, "  {path}")?,
                (true, false) => writeln!(writer, "  {path} [{}]", member.content_label)?,
                (true, true) => {
                    let label = format!("[{}]", member.content_label);
                    writeln!(writer, "  {path} {}", label.dim())?;
                }
            }
        }
        Ok(())
    }

    fn header(&self, text: &str) -> String {
        if self.color {
            text.cyan().bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn summary_line(&self) -> String {
        let summary = &self.result.summary;
        let mut line = format!(
            "{} duplicate set{}, {} redundant file{}, {} reclaimable ({} file{} compared in {} ms)",
            summary.duplicate_groups,
            plural(summary.duplicate_groups),
            summary.duplicate_files,
            plural(summary.duplicate_files),
            ByteSize::b(summary.reclaimable_space),
            summary.total_files,
            plural(summary.total_files),
            summary.scan_duration.as_millis()
        );

        let problems = summary.scan_errors.len() + self.result.diagnostics.len();
        if problems > 0 {
            let warning = format!("; {} warning{}, see log output", problems, plural(problems));
            if self.color {
                line.push_str(&warning.yellow().to_string());
            } else {
                line.push_str(&warning);
            }
        }
        line
    }
}

fn plural(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}
