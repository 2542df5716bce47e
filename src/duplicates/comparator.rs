//! Byte-exact content comparison of two files.
//!
//! # Overview
//!
//! [`ByteComparator`] opens both files and reads them in lockstep, one chunk
//! at a time, stopping at the first differing byte. No hashing is involved,
//! so a verdict of [`Comparison::Identical`] means every byte was compared.
//!
//! The caller is expected to only compare files it believes to be the same
//! size. The comparator re-checks the on-disk lengths once both files are
//! open and refuses to compare files whose lengths disagree.
//!
//! Both files are closed explicitly once a verdict is reached. A close
//! failure turns an `Identical` verdict into an error; a `Different` verdict
//! stands.
//!
//! # Example
//!
//! ```no_run
//! use mimedupe::duplicates::{ByteComparator, Comparison, ContentComparator};
//! use std::path::Path;
//!
//! let comparator = ByteComparator::new();
//! match comparator.compare(Path::new("a.bin"), Path::new("b.bin")) {
//!     Comparison::Identical => println!("same content"),
//!     Comparison::Different => println!("different content"),
//!     Comparison::Error(e) => eprintln!("comparison skipped: {e}"),
//! }
//! ```

use std::fs::File;
use std::io::{self, ErrorKind, Read};
use std::path::{Path, PathBuf};

/// Default chunk size for lockstep reads.
pub const DEFAULT_CHUNK_SIZE: usize = 8192;

/// Outcome of comparing two files.
#[derive(Debug)]
pub enum Comparison {
    /// Both streams ended at the same offset with no differing byte.
    Identical,
    /// A differing byte was found, or the streams ended at different offsets.
    Different,
    /// The comparison could not be completed.
    Error(CompareError),
}

impl Comparison {
    /// Whether the files were found identical.
    #[must_use]
    pub fn is_identical(&self) -> bool {
        matches!(self, Self::Identical)
    }

    /// Whether the files were found different.
    #[must_use]
    pub fn is_different(&self) -> bool {
        matches!(self, Self::Different)
    }

    /// Whether the comparison failed.
    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

/// Errors that prevent a comparison from reaching a verdict.
#[derive(thiserror::Error, Debug)]
pub enum CompareError {
    /// A file could not be opened for reading.
    #[error("cannot open {path} for comparison: {source}")]
    Open {
        /// File that failed to open
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Reading from a file failed part way through.
    #[error("read error on {path}: {source}")]
    Read {
        /// File that failed to read
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Closing a file failed after the files compared identical.
    #[error("cannot close {path} after comparison: {source}")]
    Close {
        /// File that failed to close
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// The files no longer have the same length on disk.
    #[error(
        "length mismatch between {first} ({first_len} bytes) and {second} ({second_len} bytes)"
    )]
    LengthMismatch {
        /// First file of the pair
        first: PathBuf,
        /// Its length on disk
        first_len: u64,
        /// Second file of the pair
        second: PathBuf,
        /// Its length on disk
        second_len: u64,
    },
}

/// Compares the contents of two files.
///
/// Implementations must be symmetric in their `Identical`/`Different`
/// classification: `compare(a, b)` and `compare(b, a)` agree.
pub trait ContentComparator {
    /// Compare the files at `first` and `second`.
    fn compare(&self, first: &Path, second: &Path) -> Comparison;
}

impl<C: ContentComparator + ?Sized> ContentComparator for &C {
    fn compare(&self, first: &Path, second: &Path) -> Comparison {
        (**self).compare(first, second)
    }
}

/// Streaming byte-for-byte comparator.
#[derive(Debug, Clone)]
pub struct ByteComparator {
    chunk_size: usize,
}

impl Default for ByteComparator {
    fn default() -> Self {
        Self::new()
    }
}

impl ByteComparator {
    /// Create a comparator using [`DEFAULT_CHUNK_SIZE`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Use a custom chunk size (minimum 1 byte).
    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Chunk size used for each lockstep read.
    #[must_use]
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }
}

impl ContentComparator for ByteComparator {
    fn compare(&self, first: &Path, second: &Path) -> Comparison {
        let mut file_a = match File::open(first) {
            Ok(f) => f,
            Err(source) => {
                return Comparison::Error(CompareError::Open {
                    path: first.to_path_buf(),
                    source,
                })
            }
        };
        // `file_a` is dropped (closed) on this early return as well
        let mut file_b = match File::open(second) {
            Ok(f) => f,
            Err(source) => {
                return Comparison::Error(CompareError::Open {
                    path: second.to_path_buf(),
                    source,
                })
            }
        };

        if let (Ok(meta_a), Ok(meta_b)) = (file_a.metadata(), file_b.metadata()) {
            if meta_a.len() != meta_b.len() {
                return Comparison::Error(CompareError::LengthMismatch {
                    first: first.to_path_buf(),
                    first_len: meta_a.len(),
                    second: second.to_path_buf(),
                    second_len: meta_b.len(),
                });
            }
        }

        let verdict = compare_readers(&mut file_a, first, &mut file_b, second, self.chunk_size);
        let closed_a = close_file(file_a);
        let closed_b = close_file(file_b);
        settle_close(verdict, (first, closed_a), (second, closed_b))
    }
}

/// Fold the outcome of closing both files into a verdict.
///
/// Failures are logged. Only an `Identical` verdict is downgraded, to an
/// error naming the first file that failed to close.
fn settle_close(
    verdict: Comparison,
    first: (&Path, io::Result<()>),
    second: (&Path, io::Result<()>),
) -> Comparison {
    let mut failure = None;
    for (path, closed) in [first, second] {
        if let Err(source) = closed {
            log::warn!("Error closing file {}: {}", path.display(), source);
            if failure.is_none() {
                failure = Some(CompareError::Close {
                    path: path.to_path_buf(),
                    source,
                });
            }
        }
    }

    match (verdict, failure) {
        (Comparison::Identical, Some(err)) => Comparison::Error(err),
        (verdict, _) => verdict,
    }
}

#[cfg(unix)]
fn close_file(file: File) -> io::Result<()> {
    use std::os::unix::io::IntoRawFd;

    let fd = file.into_raw_fd();
    // SAFETY: `fd` was just released by `into_raw_fd`, nothing else owns it
    if unsafe { libc::close(fd) } == 0 {
        Ok(())
    } else {
        Err(io::Error::last_os_error())
    }
}

#[cfg(not(unix))]
fn close_file(file: File) -> io::Result<()> {
    drop(file);
    Ok(())
}

/// Compare two byte streams chunk by chunk.
///
/// `first` and `second` only label diagnostics. Streams that end at
/// different offsets are reported as [`Comparison::Different`] with a
/// warning, since equal sizes were a precondition.
pub fn compare_readers<A: Read, B: Read>(
    mut reader_a: A,
    first: &Path,
    mut reader_b: B,
    second: &Path,
    chunk_size: usize,
) -> Comparison {
    let chunk_size = chunk_size.max(1);
    let mut buf_a = vec![0u8; chunk_size];
    let mut buf_b = vec![0u8; chunk_size];
    let mut offset: u64 = 0;

    loop {
        let read_a = match fill_chunk(&mut reader_a, &mut buf_a) {
            Ok(n) => n,
            Err(source) => {
                return Comparison::Error(CompareError::Read {
                    path: first.to_path_buf(),
                    source,
                })
            }
        };
        let read_b = match fill_chunk(&mut reader_b, &mut buf_b) {
            Ok(n) => n,
            Err(source) => {
                return Comparison::Error(CompareError::Read {
                    path: second.to_path_buf(),
                    source,
                })
            }
        };

        if read_a != read_b {
            log::warn!(
                "Mismatch in bytes read for supposedly same-sized files at offset {}: {} ({} bytes) vs {} ({} bytes)",
                offset,
                first.display(),
                read_a,
                second.display(),
                read_b
            );
            return Comparison::Different;
        }

        if read_a == 0 {
            return Comparison::Identical;
        }

        if buf_a[..read_a] != buf_b[..read_b] {
            log::trace!(
                "Content differs within chunk at offset {}: {} vs {}",
                offset,
                first.display(),
                second.display()
            );
            return Comparison::Different;
        }

        offset += read_a as u64;
    }
}

/// Read until `buf` is full or the stream ends. Returns the bytes read.
fn fill_chunk<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
