use mimedupe::catalog::{FileCatalog, FileRecord};
use mimedupe::duplicates::{CompareError, Diagnostic, DuplicateFinder};
use mimedupe::error::ExitCode;
use mimedupe::scanner::{ClassifyError, ScanError, ScanOptions, Scanner};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn plain(_: &Path) -> Result<String, ClassifyError> {
    Ok("text/plain".to_string())
}

fn record(path: PathBuf) -> FileRecord {
    let size = fs::metadata(&path).unwrap().len();
    FileRecord::new(path, size, "text/plain")
}

#[test]
fn test_unreadable_file_is_skipped_and_grouping_continues() {
    let dir = tempdir().unwrap();
    let root = fs::canonicalize(dir.path()).unwrap();
    for name in ["A", "B", "C"] {
        fs::write(root.join(name), b"dup").unwrap();
    }
    fs::write(root.join("D"), b"other").unwrap();
    fs::write(root.join("E"), b"other").unwrap();

    let mut catalog: FileCatalog = ["A", "B", "C", "D", "E"]
        .iter()
        .map(|name| record(root.join(name)))
        .collect();

    // B disappears between scanning and comparing
    fs::remove_file(root.join("B")).unwrap();

    let result = DuplicateFinder::with_defaults().find(&mut catalog);

    let groups: Vec<Vec<PathBuf>> = result
        .groups
        .iter()
        .map(|g| g.paths().map(Path::to_path_buf).collect())
        .collect();
    assert_eq!(
        groups,
        vec![
            vec![root.join("A"), root.join("C")],
            vec![root.join("D"), root.join("E")],
        ]
    );

    assert_eq!(result.summary.failed_comparisons, 1);
    assert_eq!(result.diagnostics.len(), 1);
    match &result.diagnostics[0] {
        Diagnostic::CompareFailed {
            seed,
            candidate,
            error,
        } => {
            assert_eq!(seed, &root.join("A"));
            assert_eq!(candidate, &root.join("B"));
            assert!(matches!(error, CompareError::Open { path, .. } if path == &root.join("B")));
        }
        other => panic!("unexpected diagnostic: {other}"),
    }
    assert_eq!(ExitCode::for_result(&result), ExitCode::PartialSuccess);
}

#[test]
fn test_file_changed_size_after_scan_is_not_merged() {
    let dir = tempdir().unwrap();
    let root = fs::canonicalize(dir.path()).unwrap();
    fs::write(root.join("a"), b"12345").unwrap();
    fs::write(root.join("b"), b"12345").unwrap();

    let mut catalog: FileCatalog = ["a", "b"].iter().map(|n| record(root.join(n))).collect();

    fs::write(root.join("b"), b"12345 and then some").unwrap();

    let result = DuplicateFinder::with_defaults().find(&mut catalog);

    assert!(result.groups.is_empty());
    assert!(matches!(
        result.diagnostics[0],
        Diagnostic::CompareFailed {
            error: CompareError::LengthMismatch { .. },
            ..
        }
    ));
}

#[test]
fn test_missing_root_is_a_warning_not_a_failure() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("x.txt"), b"twin").unwrap();
    fs::write(dir.path().join("y.txt"), b"twin").unwrap();
    let missing = dir.path().join("not-here");

    let scanner = Scanner::new(
        ScanOptions::default().with_roots(vec![missing, dir.path().to_path_buf()]),
        plain,
    );
    let result = DuplicateFinder::with_defaults()
        .find_duplicates(&scanner)
        .unwrap();

    assert_eq!(result.groups.len(), 1);
    assert_eq!(result.summary.scan_errors.len(), 1);
    assert!(matches!(
        result.summary.scan_errors[0],
        ScanError::NotFound(_)
    ));
    assert_eq!(ExitCode::for_result(&result), ExitCode::PartialSuccess);
}

#[test]
fn test_root_that_is_a_file_is_reported() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("plain.txt");
    fs::write(&file, b"content").unwrap();

    let scanner = Scanner::new(
        ScanOptions::default().with_roots(vec![file, dir.path().to_path_buf()]),
        plain,
    );
    let result = DuplicateFinder::with_defaults()
        .find_duplicates(&scanner)
        .unwrap();

    assert!(matches!(
        result.summary.scan_errors[0],
        ScanError::NotADirectory(_)
    ));
    assert_eq!(result.summary.total_files, 1);
}

#[test]
fn test_classification_failure_keeps_file_with_default_label() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a"), b"same").unwrap();
    fs::write(dir.path().join("b"), b"same").unwrap();

    let failing = |path: &Path| -> Result<String, ClassifyError> {
        Err(ClassifyError::EmptyOutput {
            path: path.to_path_buf(),
        })
    };
    let scanner = Scanner::new(
        ScanOptions::default().with_roots(vec![dir.path().to_path_buf()]),
        failing,
    );
    let result = DuplicateFinder::with_defaults()
        .find_duplicates(&scanner)
        .unwrap();

    assert_eq!(result.groups.len(), 1);
    assert!(result.groups[0]
        .files
        .iter()
        .all(|f| f.content_label == "application/octet-stream"));
}

#[test]
fn test_no_usable_roots_is_fatal() {
    let dir = tempdir().unwrap();
    let scanner = Scanner::new(
        ScanOptions::default().with_roots(vec![dir.path().join("a"), dir.path().join("b")]),
        plain,
    );

    let err = DuplicateFinder::with_defaults()
        .find_duplicates(&scanner)
        .unwrap_err();

    assert!(err
        .to_string()
        .starts_with("No valid directories could be processed"));
}
