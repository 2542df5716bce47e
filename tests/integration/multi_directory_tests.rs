use mimedupe::duplicates::DuplicateFinder;
use mimedupe::scanner::{ClassifyError, ScanOptions, Scanner};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn plain(_: &Path) -> Result<String, ClassifyError> {
    Ok("text/plain".to_string())
}

fn find(roots: Vec<PathBuf>, recursive: bool) -> mimedupe::duplicates::FindResult {
    let scanner = Scanner::new(
        ScanOptions::default()
            .with_roots(roots)
            .with_recursive(recursive),
        plain,
    );
    DuplicateFinder::with_defaults()
        .find_duplicates(&scanner)
        .unwrap()
}

#[test]
fn test_duplicates_across_roots() {
    let pics = tempdir().unwrap();
    let backup = tempdir().unwrap();
    fs::write(pics.path().join("holiday.jpg"), b"jpeg data").unwrap();
    fs::write(backup.path().join("copy.jpg"), b"jpeg data").unwrap();
    fs::write(backup.path().join("other.jpg"), b"more data").unwrap();

    let result = find(
        vec![pics.path().to_path_buf(), backup.path().to_path_buf()],
        false,
    );

    assert_eq!(result.groups.len(), 1);
    let holiday = fs::canonicalize(pics.path().join("holiday.jpg")).unwrap();
    let copy = fs::canonicalize(backup.path().join("copy.jpg")).unwrap();
    let paths: Vec<_> = result.groups[0].paths().collect();
    assert!(paths.contains(&holiday.as_path()));
    assert!(paths.contains(&copy.as_path()));
}

#[test]
fn test_same_root_twice_is_scanned_once() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), b"unique-a").unwrap();
    fs::write(dir.path().join("b.txt"), b"unique-b").unwrap();

    let result = find(
        vec![dir.path().to_path_buf(), dir.path().to_path_buf()],
        false,
    );

    // Each file only once, so nothing is reported as its own duplicate
    assert!(result.groups.is_empty());
    assert_eq!(result.summary.total_files, 2);
    assert!(result.diagnostics.is_empty());
}

#[test]
fn test_nested_roots_overlap() {
    let dir = tempdir().unwrap();
    let sub = dir.path().join("sub");
    fs::create_dir(&sub).unwrap();
    fs::write(sub.join("inner.txt"), b"inner").unwrap();
    fs::write(dir.path().join("outer.txt"), b"inner").unwrap();

    let result = find(vec![dir.path().to_path_buf(), sub.clone()], true);

    assert_eq!(result.summary.total_files, 2);
    assert_eq!(result.groups.len(), 1);
    assert_eq!(result.groups[0].len(), 2);
}

#[test]
fn test_relative_and_absolute_spellings_resolve_to_one_path() {
    let dir = tempdir().unwrap();
    let sub = dir.path().join("sub");
    fs::create_dir(&sub).unwrap();
    fs::write(dir.path().join("file.txt"), b"payload").unwrap();

    let roundabout = sub.join("..");
    let result = find(vec![dir.path().to_path_buf(), roundabout], false);

    assert_eq!(result.summary.total_files, 1);
    assert!(result.groups.is_empty());
}

#[test]
fn test_members_listed_in_path_order() {
    let first = tempdir().unwrap();
    let second = tempdir().unwrap();
    for dir in [&first, &second] {
        fs::write(dir.path().join("x.txt"), b"shared").unwrap();
        fs::write(dir.path().join("y.txt"), b"shared").unwrap();
    }

    let result = find(
        vec![first.path().to_path_buf(), second.path().to_path_buf()],
        false,
    );

    assert_eq!(result.groups.len(), 1);
    let paths: Vec<PathBuf> = result.groups[0].paths().map(Path::to_path_buf).collect();
    assert_eq!(paths.len(), 4);
    let mut sorted = paths.clone();
    sorted.sort_by(|a, b| {
        a.as_os_str()
            .as_encoded_bytes()
            .cmp(b.as_os_str().as_encoded_bytes())
    });
    assert_eq!(paths, sorted);
}
