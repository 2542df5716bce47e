//! Directory walker built on walkdir.
//!
//! # Overview
//!
//! [`Walker`] lists the candidate files under one canonical root:
//!
//! - only regular files with a non-zero size are candidates
//! - symbolic links are neither followed nor reported
//! - a non-recursive walk only looks at the root's direct children
//! - entries are visited in file-name order, so output is deterministic
//! - every candidate path is canonicalized
//!
//! Errors for individual entries are yielded in-line and never end the walk.
//!
//! # Example
//!
//! ```no_run
//! use mimedupe::scanner::walker::{resolve_root, Walker};
//! use std::path::Path;
//!
//! let root = resolve_root(Path::new(".")).unwrap();
//! for entry in Walker::new(&root, true).walk() {
//!     match entry {
//!         Ok(candidate) => println!("{}: {} bytes", candidate.path.display(), candidate.size),
//!         Err(e) => eprintln!("Warning: {}", e),
//!     }
//! }
//! ```

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::ScanError;

/// A regular, non-empty file found by the walker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Canonical path
    pub path: PathBuf,
    /// Size in bytes
    pub size: u64,
}

/// Canonicalize a requested root and check it is a directory.
///
/// # Errors
///
/// [`ScanError::NotFound`]/[`ScanError::PermissionDenied`]/[`ScanError::Io`]
/// when the path cannot be resolved, [`ScanError::NotADirectory`] otherwise.
pub fn resolve_root(path: &Path) -> Result<PathBuf, ScanError> {
    let resolved = fs::canonicalize(path).map_err(|e| io_error(path, e))?;
    if !resolved.is_dir() {
        return Err(ScanError::NotADirectory(resolved));
    }
    Ok(resolved)
}

/// Directory walker for candidate discovery.
#[derive(Debug)]
pub struct Walker {
    root: PathBuf,
    recursive: bool,
}

impl Walker {
    /// Create a walker for an already resolved root.
    #[must_use]
    pub fn new(root: &Path, recursive: bool) -> Self {
        Self {
            root: root.to_path_buf(),
            recursive,
        }
    }

    /// Walk the root, yielding candidates and per-entry errors.
    pub fn walk(&self) -> impl Iterator<Item = Result<Candidate, ScanError>> + '_ {
        let max_depth = if self.recursive { usize::MAX } else { 1 };

        WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(max_depth)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_map(move |entry| match entry {
                Ok(entry) => self.process_entry(&entry),
                Err(e) => Some(Err(self.handle_walk_error(e))),
            })
    }

    fn process_entry(&self, entry: &walkdir::DirEntry) -> Option<Result<Candidate, ScanError>> {
        let file_type = entry.file_type();
        let path = entry.path();

        if file_type.is_dir() {
            return None;
        }
        if file_type.is_symlink() {
            log::trace!("Skipping symlink: {}", path.display());
            return None;
        }
        if !file_type.is_file() {
            log::trace!("Skipping special file: {}", path.display());
            return None;
        }

        let size = match entry.metadata() {
            Ok(metadata) => metadata.len(),
            Err(e) => return Some(Err(self.handle_walk_error(e))),
        };
        if size == 0 {
            log::debug!("Skipping empty file: {}", path.display());
            return None;
        }

        match fs::canonicalize(path) {
            Ok(path) => Some(Ok(Candidate { path, size })),
            Err(e) => {
                log::warn!("Error resolving path for {}: {}", path.display(), e);
                Some(Err(io_error(path, e)))
            }
        }
    }

    fn handle_walk_error(&self, error: walkdir::Error) -> ScanError {
        let path = error
            .path()
            .map_or_else(|| self.root.clone(), Path::to_path_buf);
        log::warn!("Walker error for {}: {}", path.display(), error);

        let message = error.to_string();
        match error.into_io_error() {
            Some(io) => io_error(&path, io),
            None => ScanError::Io {
                path,
                source: std::io::Error::other(message),
            },
        }
    }
}

fn io_error(path: &Path, error: std::io::Error) -> ScanError {
    match error.kind() {
        ErrorKind::PermissionDenied => ScanError::PermissionDenied(path.to_path_buf()),
        ErrorKind::NotFound => ScanError::NotFound(path.to_path_buf()),
        _ => ScanError::Io {
            path: path.to_path_buf(),
            source: error,
        },
    }
}
