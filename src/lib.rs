//! mimedupe - Duplicate File Finder with MIME type filtering
//!
//! Finds sets of byte-identical files among the regular files of one or more
//! directories. Candidates can be narrowed to given MIME types, detected with
//! the `file` utility. Files are grouped by size and each size group is
//! partitioned by exact byte-by-byte comparison; no hashing is involved.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod output;
pub mod progress;
pub mod scanner;

use std::io::{self, IsTerminal, Write};
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::cli::{Cli, OutputFormat};
use crate::config::Config;
use crate::duplicates::DuplicateFinder;
use crate::error::ExitCode;
use crate::output::{JsonOutput, TextOutput};
use crate::progress::{Progress, ProgressCallback};
use crate::scanner::{FileCommandClassifier, Scanner};

/// Run one search as described by the command line.
///
/// # Errors
///
/// Returns an error when the configuration is invalid, when none of the
/// requested directories can be scanned, or when the report cannot be written.
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);

    let mut config = Config::load(cli.config.as_deref())?;
    config.apply_cli(&cli);
    log::debug!("Effective configuration: {:?}", config);

    let options = config.scan_options(&cli.directories);
    let show_progress = !cli.quiet && !cli.no_progress && io::stderr().is_terminal();
    let progress: Option<Arc<dyn ProgressCallback>> = if show_progress {
        Some(Arc::new(Progress::new(false)))
    } else {
        None
    };

    let mut scanner = Scanner::new(
        options,
        FileCommandClassifier::new(config.classifier_program.as_str()),
    );
    let mut finder = DuplicateFinder::with_defaults();
    if let Some(progress) = progress {
        scanner = scanner.with_progress_callback(Arc::clone(&progress));
        finder = finder.with_progress_callback(progress);
    }

    let result = finder.find_duplicates(&scanner)?;
    let exit_code = ExitCode::for_result(&result);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match config.output {
        OutputFormat::Text => {
            let color = !cli.no_color && io::stdout().is_terminal();
            TextOutput::new(&result)
                .with_color(color)
                .with_types(config.show_types)
                .with_summary(!cli.quiet)
                .write_to(&mut out)
                .context("Failed to write report")?;
        }
        OutputFormat::Json => {
            JsonOutput::new(&result, exit_code)
                .write_to(&mut out, true)
                .context("Failed to write JSON report")?;
        }
    }
    out.flush().context("Failed to write report")?;

    Ok(exit_code)
}
