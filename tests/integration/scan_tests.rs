use mimedupe::duplicates::{DuplicateFinder, FindResult, SearchOutcome};
use mimedupe::error::ExitCode;
use mimedupe::scanner::{ClassifyError, ScanOptions, Scanner};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

/// Label files by extension, standing in for `file --mime-type`.
fn by_extension(path: &Path) -> Result<String, ClassifyError> {
    Ok(match path.extension().and_then(|e| e.to_str()) {
        Some("txt") => "text/plain",
        Some("jpg") => "image/jpeg",
        Some("png") => "image/png",
        _ => "application/octet-stream",
    }
    .to_string())
}

fn search(options: ScanOptions) -> FindResult {
    let scanner = Scanner::new(options, by_extension);
    DuplicateFinder::with_defaults()
        .find_duplicates(&scanner)
        .unwrap()
}

fn names(result: &FindResult) -> Vec<Vec<String>> {
    result
        .groups
        .iter()
        .map(|g| {
            g.paths()
                .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
                .collect()
        })
        .collect()
}

#[test]
fn test_scan_empty_directory() {
    let dir = tempdir().unwrap();

    let result = search(ScanOptions::default().with_roots(vec![dir.path().to_path_buf()]));

    assert!(result.groups.is_empty());
    assert_eq!(result.summary.total_files, 0);
    assert_eq!(result.summary.outcome(), SearchOutcome::NoFiles);
    assert_eq!(ExitCode::for_result(&result), ExitCode::NoDuplicates);
}

#[test]
fn test_pair_found_and_other_size_ignored() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("A.txt"), vec![b'x'; 100]).unwrap();
    fs::write(dir.path().join("B.txt"), vec![b'x'; 100]).unwrap();
    fs::write(dir.path().join("C.txt"), vec![b'y'; 50]).unwrap();

    let result = search(ScanOptions::default().with_roots(vec![dir.path().to_path_buf()]));

    assert_eq!(names(&result), vec![vec!["A.txt", "B.txt"]]);
    assert_eq!(result.groups[0].size, 100);
    assert_eq!(result.summary.unique_sizes, 1);
    assert_eq!(ExitCode::for_result(&result), ExitCode::Success);
}

#[test]
fn test_same_size_different_content() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), b"aaaaaaaaaa").unwrap();
    fs::write(dir.path().join("b.txt"), b"bbbbbbbbbb").unwrap();
    fs::write(dir.path().join("c.txt"), b"cccccccccc").unwrap();

    let result = search(ScanOptions::default().with_roots(vec![dir.path().to_path_buf()]));

    assert!(result.groups.is_empty());
    assert_eq!(result.summary.total_files, 3);
    assert_eq!(result.summary.comparisons, 3);
    assert_eq!(result.summary.outcome(), SearchOutcome::NoDuplicates);
}

#[test]
fn test_partial_match_in_size_run() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("A.txt"), b"same-bytes").unwrap();
    fs::write(dir.path().join("B.txt"), b"same-bytes").unwrap();
    fs::write(dir.path().join("C.txt"), b"different!").unwrap();

    let result = search(ScanOptions::default().with_roots(vec![dir.path().to_path_buf()]));

    assert_eq!(names(&result), vec![vec!["A.txt", "B.txt"]]);
    assert_eq!(result.summary.duplicate_files, 1);
    assert_eq!(result.summary.reclaimable_space, 10);
}

#[test]
fn test_single_file_is_too_few() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("only.txt"), b"alone").unwrap();

    let result = search(ScanOptions::default().with_roots(vec![dir.path().to_path_buf()]));

    assert!(result.groups.is_empty());
    assert_eq!(result.summary.comparisons, 0);
    assert_eq!(result.summary.outcome(), SearchOutcome::TooFewFiles);
}

#[test]
fn test_mime_filter_excludes_other_types() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.jpg"), b"jpeg-bytes").unwrap();
    fs::write(dir.path().join("b.jpg"), b"jpeg-bytes").unwrap();
    fs::write(dir.path().join("a.txt"), b"jpeg-bytes").unwrap();

    let result = search(
        ScanOptions::default()
            .with_roots(vec![dir.path().to_path_buf()])
            .with_mime_filters(vec!["image/jpeg".to_string()]),
    );

    assert_eq!(names(&result), vec![vec!["a.jpg", "b.jpg"]]);
    assert_eq!(result.summary.filtered_out, 1);
    assert!(result.groups[0]
        .files
        .iter()
        .all(|f| f.content_label == "image/jpeg"));
}

#[test]
fn test_identical_bytes_with_different_types_still_match_without_filter() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.png"), b"payload").unwrap();
    fs::write(dir.path().join("b.txt"), b"payload").unwrap();

    let result = search(ScanOptions::default().with_roots(vec![dir.path().to_path_buf()]));

    assert_eq!(names(&result), vec![vec!["a.png", "b.txt"]]);
}

#[test]
fn test_recursion_is_opt_in() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("top.txt"), b"nested dup").unwrap();
    fs::create_dir_all(dir.path().join("deep").join("er")).unwrap();
    let low = dir.path().join("deep").join("er").join("low.txt");
    fs::write(low, b"nested dup").unwrap();

    let flat = search(ScanOptions::default().with_roots(vec![dir.path().to_path_buf()]));
    assert!(flat.groups.is_empty());
    assert_eq!(flat.summary.total_files, 1);

    let deep = search(
        ScanOptions::default()
            .with_roots(vec![dir.path().to_path_buf()])
            .with_recursive(true),
    );
    assert_eq!(names(&deep), vec![vec!["low.txt", "top.txt"]]);
}

#[test]
fn test_empty_files_are_never_candidates() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("empty1.txt"), b"").unwrap();
    fs::write(dir.path().join("empty2.txt"), b"").unwrap();

    let result = search(ScanOptions::default().with_roots(vec![dir.path().to_path_buf()]));

    assert!(result.groups.is_empty());
    assert_eq!(result.summary.files_examined, 0);
}

#[cfg(unix)]
#[test]
fn test_symlinks_are_not_candidates() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("real.txt"), b"linked content").unwrap();
    std::os::unix::fs::symlink(dir.path().join("real.txt"), dir.path().join("link.txt")).unwrap();

    let result = search(ScanOptions::default().with_roots(vec![dir.path().to_path_buf()]));

    assert!(result.groups.is_empty());
    assert_eq!(result.summary.total_files, 1);
}

#[test]
fn test_groups_ordered_by_size_then_path() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("big1.txt"), b"0123456789").unwrap();
    fs::write(dir.path().join("big2.txt"), b"0123456789").unwrap();
    fs::write(dir.path().join("z1.txt"), b"ab").unwrap();
    fs::write(dir.path().join("z2.txt"), b"ab").unwrap();
    fs::write(dir.path().join("m1.txt"), b"cd").unwrap();
    fs::write(dir.path().join("m2.txt"), b"cd").unwrap();

    let result = search(ScanOptions::default().with_roots(vec![dir.path().to_path_buf()]));

    assert_eq!(
        names(&result),
        vec![
            vec!["m1.txt", "m2.txt"],
            vec!["z1.txt", "z2.txt"],
            vec!["big1.txt", "big2.txt"],
        ]
    );
}

#[test]
fn test_large_files_spanning_many_chunks() {
    let dir = tempdir().unwrap();
    let content: Vec<u8> = (0..100_000u32).map(|i| (i % 251) as u8).collect();
    let mut altered = content.clone();
    *altered.last_mut().unwrap() ^= 0xff;

    fs::write(dir.path().join("a.bin"), &content).unwrap();
    fs::write(dir.path().join("b.bin"), &content).unwrap();
    fs::write(dir.path().join("c.bin"), &altered).unwrap();

    let result = search(ScanOptions::default().with_roots(vec![dir.path().to_path_buf()]));

    assert_eq!(names(&result), vec![vec!["a.bin", "b.bin"]]);
}
