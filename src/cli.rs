//! Command-line interface definitions for mimedupe.
//!
//! This module defines all CLI arguments and options using the clap derive API.
//! Every option that also exists in the configuration file is optional here,
//! so an absent flag leaves the configured value in place.
//!
//! # Example
//!
//! ```bash
//! # Compare files in the current directory
//! mimedupe
//!
//! # Recurse into two trees, only looking at JPEG and PNG images
//! mimedupe -r -m image/jpeg -m image/png ~/Pictures /mnt/backup/Pictures
//!
//! # JSON output for scripting
//! mimedupe -r --output json ~/Downloads
//!
//! # Verbose mode for debugging
//! mimedupe -vv ~/Downloads
//! ```

use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Find byte-identical files, optionally restricted to given MIME types.
///
/// Files are grouped by size, then compared byte by byte. Content types are
/// detected with the `file` utility and can be used to narrow the search.
#[derive(Debug, Parser)]
#[command(name = "mimedupe")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directories to scan (default: current directory)
    #[arg(value_name = "DIRECTORY")]
    pub directories: Vec<PathBuf>,

    /// Descend into subdirectories
    #[arg(short, long)]
    pub recursive: bool,

    /// Only consider files of this MIME type (can be specified multiple times)
    ///
    /// The type must match the detected type exactly, e.g. `image/jpeg`.
    #[arg(short, long = "mime", value_name = "TYPE")]
    pub mime_types: Vec<String>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Show the detected MIME type next to each file in text output
    #[arg(long)]
    pub show_types: bool,

    /// Number of threads used for MIME type detection (default: 4)
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u16).range(1..))]
    pub io_threads: Option<u16>,

    /// Read configuration from this file instead of the default location
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors and results
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR")]
    pub no_color: bool,

    /// Disable progress bars
    #[arg(long)]
    pub no_progress: bool,

    /// Report fatal errors as JSON on stderr
    #[arg(long)]
    pub json_errors: bool,
}

/// Output format for scan results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable report
    #[default]
    Text,
    /// JSON output for scripting
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}
