//! Output formatters for duplicate search results.
//!
//! This module provides the two report formats:
//! - Text for people reading a terminal
//! - JSON for automation and scripting
//!
//! # Example
//!
//! ```no_run
//! use mimedupe::duplicates::DuplicateFinder;
//! use mimedupe::error::ExitCode;
//! use mimedupe::output::{JsonOutput, TextOutput};
//! use mimedupe::scanner::{FileCommandClassifier, ScanOptions, Scanner};
//!
//! let scanner = Scanner::new(ScanOptions::default(), FileCommandClassifier::default());
//! let result = DuplicateFinder::with_defaults().find_duplicates(&scanner).unwrap();
//!
//! print!("{}", TextOutput::new(&result).render().unwrap());
//! println!("{}", JsonOutput::new(&result, ExitCode::Success).to_json_pretty().unwrap());
//! ```

pub mod json;
pub mod text;

// Re-export main types
pub use json::{JsonOutput, JsonOutputError};
pub use text::TextOutput;
