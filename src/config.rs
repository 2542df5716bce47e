//! Application configuration management.
//!
//! Configuration is layered with figment, lowest priority first:
//!
//! 1. Built-in defaults
//! 2. A TOML file: the `--config` path, or `config.toml` in the platform
//!    configuration directory
//! 3. `MIMEDUPE_*` environment variables (`__` separates nested keys)
//!
//! Command-line flags are applied on top by [`Config::apply_cli`]. The
//! resulting value is built once per run and passed down explicitly.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::cli::{Cli, OutputFormat};
use crate::scanner::{ScanOptions, DEFAULT_CLASSIFIER_PROGRAM, DEFAULT_IO_THREADS};

/// Prefix for environment variable overrides.
pub const ENV_PREFIX: &str = "MIMEDUPE_";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Descend into subdirectories
    pub recursive: bool,
    /// Accepted MIME types; empty accepts everything
    pub mime_filters: Vec<String>,
    /// Threads used for MIME type detection
    pub io_threads: usize,
    /// Program invoked as `<program> -b --mime-type -- <path>`
    pub classifier_program: String,
    /// Report format
    pub output: OutputFormat,
    /// Show MIME types in text output
    pub show_types: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            recursive: false,
            mime_filters: Vec::new(),
            io_threads: DEFAULT_IO_THREADS,
            classifier_program: DEFAULT_CLASSIFIER_PROGRAM.to_string(),
            output: OutputFormat::Text,
            show_types: false,
        }
    }
}

impl Config {
    /// Build the layered figment for an optional explicit file.
    #[must_use]
    pub fn figment(explicit: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));

        match explicit {
            Some(path) => figment = figment.merge(Toml::file(path)),
            None => {
                if let Some(path) = Self::config_path() {
                    figment = figment.merge(Toml::file(path));
                }
            }
        }

        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Load the configuration.
    ///
    /// # Errors
    ///
    /// Fails when an explicit file does not exist, or when any layer holds a
    /// value of the wrong type.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            if !path.is_file() {
                anyhow::bail!("Configuration file not found: {}", path.display());
            }
            log::debug!("Loading configuration from {}", path.display());
        }

        let config: Config = Self::figment(explicit)
            .extract()
            .context("Invalid configuration")?;
        Ok(config.normalized())
    }

    /// Get the default platform-specific configuration path.
    #[must_use]
    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "mimedupe", "mimedupe")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Override configured values with the flags given on the command line.
    pub fn apply_cli(&mut self, cli: &Cli) {
        if cli.recursive {
            self.recursive = true;
        }
        if !cli.mime_types.is_empty() {
            self.mime_filters.clone_from(&cli.mime_types);
        }
        if let Some(threads) = cli.io_threads {
            self.io_threads = usize::from(threads);
        }
        if let Some(output) = cli.output {
            self.output = output;
        }
        if cli.show_types {
            self.show_types = true;
        }
        *self = std::mem::take(self).normalized();
    }

    /// Scan options for the given roots.
    #[must_use]
    pub fn scan_options(&self, roots: &[PathBuf]) -> ScanOptions {
        ScanOptions::default()
            .with_roots(roots.to_vec())
            .with_recursive(self.recursive)
            .with_mime_filters(self.mime_filters.clone())
            .with_io_threads(self.io_threads)
    }

    fn normalized(mut self) -> Self {
        self.io_threads = self.io_threads.max(1);
        self.mime_filters.retain(|f| !f.trim().is_empty());
        if self.classifier_program.trim().is_empty() {
            self.classifier_program = DEFAULT_CLASSIFIER_PROGRAM.to_string();
        }
        self
    }
}
