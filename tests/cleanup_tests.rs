//! End-to-end tests: real reports, real files in a temporary directory.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use synodupe::actions::{execute_plan, CandidateStatus, DeleteMode, FsRemover, PlanOptions};
use synodupe::cli::Cli;
use synodupe::duplicates::{group_report, GroupingOptions, SplitGroupPolicy};
use synodupe::error::ExitCode;
use synodupe::output::RunSummary;
use synodupe::report::{ReportError, ReportReader};
use tempfile::TempDir;

const HEADER: &str = "Group\tShared Folder\tFile\tSize(Byte)\tModified Time";

/// Create a file of `size` bytes and return its path.
fn make_file(dir: &Path, name: &str, size: usize) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, vec![b'x'; size]).unwrap();
    path
}

fn row(group: i64, path: &Path, size: u64) -> String {
    format!(
        "{}\tvolume1\t\"{}\"\t{}\t2021/01/01 00:00:00",
        group,
        path.display(),
        size
    )
}

fn write_report(dir: &Path, lines: &[String]) -> PathBuf {
    let report = dir.join("duplicate_file.csv");
    fs::write(&report, lines.join("\r\n")).unwrap();
    report
}

/// Two groups: 1 = (a 100, b 200, c 300), 2 = (d 50, e 60).
fn two_group_fixture(dir: &Path) -> (PathBuf, Vec<PathBuf>) {
    let files = vec![
        make_file(dir, "a.bin", 100),
        make_file(dir, "b.bin", 200),
        make_file(dir, "c.bin", 300),
        make_file(dir, "d.bin", 50),
        make_file(dir, "e.bin", 60),
    ];
    let lines = vec![
        HEADER.to_string(),
        row(1, &files[0], 100),
        row(1, &files[1], 200),
        row(1, &files[2], 300),
        row(2, &files[3], 50),
        row(2, &files[4], 60),
    ];
    (write_report(dir, &lines), files)
}

fn run_pipeline(report: &Path, options: &PlanOptions) -> RunSummary {
    let reader = ReportReader::open(report).unwrap();
    let grouped = group_report(reader, &GroupingOptions::default()).unwrap();
    let remover = FsRemover::new(DeleteMode::Permanent);
    let deletion = execute_plan(&grouped.groups, &remover, options);
    RunSummary::new(
        &grouped,
        &deletion,
        options.dry_run,
        std::time::Duration::ZERO,
    )
}

fn cli(report: &Path, dir: &Path, extra: &[&str]) -> Cli {
    let config = dir.join("no-such-config.toml");
    let mut args = vec![
        "synodupe".to_string(),
        "--no-color".to_string(),
        "-f".to_string(),
        report.display().to_string(),
        "--config".to_string(),
        config.display().to_string(),
    ];
    args.extend(extra.iter().map(|s| s.to_string()));
    Cli::try_parse_from(args).unwrap()
}

#[test]
fn test_two_groups_keep_first_remove_rest() {
    let dir = TempDir::new().unwrap();
    let (report, files) = two_group_fixture(dir.path());

    let summary = run_pipeline(&report, &PlanOptions::default());

    assert_eq!(summary.groups, 2);
    assert_eq!(summary.files_removed, 3);
    assert_eq!(summary.bytes_freed, 560);
    assert_eq!(summary.content_rows, 5);
    assert_eq!(summary.files_remaining(), 2);
    assert_eq!(summary.failures, 0);

    assert!(files[0].exists(), "keeper of group 1 must survive");
    assert!(files[3].exists(), "keeper of group 2 must survive");
    assert!(!files[1].exists());
    assert!(!files[2].exists());
    assert!(!files[4].exists());
}

#[test]
fn test_dry_run_matches_real_run_and_deletes_nothing() {
    let dir = TempDir::new().unwrap();
    let (report, files) = two_group_fixture(dir.path());

    let dry = run_pipeline(
        &report,
        &PlanOptions {
            dry_run: true,
            ..PlanOptions::default()
        },
    );
    assert!(files.iter().all(|f| f.exists()));

    let real = run_pipeline(&report, &PlanOptions::default());
    assert_eq!(dry.files_removed, real.files_removed);
    assert_eq!(dry.bytes_freed, real.bytes_freed);
}

#[test]
fn test_second_run_reports_not_found() {
    let dir = TempDir::new().unwrap();
    let (report, _files) = two_group_fixture(dir.path());

    run_pipeline(&report, &PlanOptions::default());
    let second = run_pipeline(&report, &PlanOptions::default());

    assert_eq!(second.files_removed, 0);
    assert_eq!(second.bytes_freed, 0);
    assert_eq!(second.failures, 3);
}

#[test]
fn test_null_line_inside_group() {
    let dir = TempDir::new().unwrap();
    let a = make_file(dir.path(), "a.bin", 10);
    let b = make_file(dir.path(), "b.bin", 20);

    let mut bytes = Vec::new();
    bytes.extend_from_slice(HEADER.as_bytes());
    bytes.extend_from_slice(b"\r\n");
    bytes.extend_from_slice(row(7, &a, 10).as_bytes());
    bytes.extend_from_slice(b"\r\n\0\0\0\r\n");
    bytes.extend_from_slice(row(7, &b, 20).as_bytes());
    bytes.extend_from_slice(b"\r\n");
    let report = dir.path().join("report.csv");
    fs::write(&report, bytes).unwrap();

    let reader = ReportReader::open(&report).unwrap();
    let grouped = group_report(reader, &GroupingOptions::default()).unwrap();

    assert_eq!(grouped.groups.len(), 1);
    assert_eq!(grouped.groups[0].len(), 2);
    assert_eq!(grouped.groups[0].members()[1].line(), 2);
    assert_eq!(grouped.cursor.raw_line, 4);
}

#[test]
fn test_utf16le_report() {
    let dir = TempDir::new().unwrap();
    let a = make_file(dir.path(), "a.bin", 5);
    let b = make_file(dir.path(), "b.bin", 5);
    let text = [HEADER.to_string(), row(3, &a, 5), row(3, &b, 5)].join("\r\n");

    let mut bytes = vec![0xFF, 0xFE];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_le_bytes());
    }
    let report = dir.path().join("report.csv");
    fs::write(&report, bytes).unwrap();

    let reader = ReportReader::open(&report).unwrap();
    let grouped = group_report(reader, &GroupingOptions::default()).unwrap();

    assert_eq!(grouped.groups.len(), 1);
    assert_eq!(grouped.records, 2);
    assert_eq!(grouped.groups[0].keeper().path(), a.display().to_string());
}

#[test]
fn test_run_app_success() {
    let dir = TempDir::new().unwrap();
    let (report, files) = two_group_fixture(dir.path());
    let outcomes = dir.path().join("outcomes.csv");

    let code = synodupe::run_app(cli(
        &report,
        dir.path(),
        &["--outcomes-csv", outcomes.to_str().unwrap()],
    ))
    .unwrap();

    assert_eq!(code, ExitCode::Success);
    assert!(files[0].exists());
    assert!(!files[1].exists());

    let csv = fs::read_to_string(&outcomes).unwrap();
    assert!(csv.starts_with("group_id,path,bytes,status,error"));
    assert_eq!(csv.lines().count(), 4);
    assert_eq!(csv.matches(",removed,").count(), 3);
}

#[test]
fn test_run_app_dry_run_flag() {
    let dir = TempDir::new().unwrap();
    let (report, files) = two_group_fixture(dir.path());

    let code = synodupe::run_app(cli(&report, dir.path(), &["--dry-run"])).unwrap();

    assert_eq!(code, ExitCode::Success);
    assert!(files.iter().all(|f| f.exists()));
}

#[test]
fn test_run_app_strict_flags_failures() {
    let dir = TempDir::new().unwrap();
    let (report, _files) = two_group_fixture(dir.path());

    synodupe::run_app(cli(&report, dir.path(), &[])).unwrap();

    let lenient = synodupe::run_app(cli(&report, dir.path(), &[])).unwrap();
    assert_eq!(lenient, ExitCode::Success);

    let strict = synodupe::run_app(cli(&report, dir.path(), &["--strict"])).unwrap();
    assert_eq!(strict, ExitCode::PartialSuccess);
}

#[test]
fn test_run_app_malformed_row_aborts_before_deleting() {
    let dir = TempDir::new().unwrap();
    let a = make_file(dir.path(), "a.bin", 1);
    let b = make_file(dir.path(), "b.bin", 1);
    let lines = vec![
        HEADER.to_string(),
        row(1, &a, 1),
        row(1, &b, 1),
        "1\tvolume1".to_string(),
    ];
    let report = write_report(dir.path(), &lines);

    let err = synodupe::run_app(cli(&report, dir.path(), &[])).unwrap_err();

    assert!(matches!(
        err.root_cause().downcast_ref::<ReportError>(),
        Some(ReportError::MalformedRow { line: 3, .. })
    ));
    assert!(a.exists());
    assert!(b.exists());
}

#[test]
fn test_run_app_skip_malformed() {
    let dir = TempDir::new().unwrap();
    let a = make_file(dir.path(), "a.bin", 1);
    let b = make_file(dir.path(), "b.bin", 1);
    let lines = vec![
        HEADER.to_string(),
        row(1, &a, 1),
        "garbage".to_string(),
        row(1, &b, 1),
    ];
    let report = write_report(dir.path(), &lines);

    let code = synodupe::run_app(cli(&report, dir.path(), &["--skip-malformed"])).unwrap();

    assert_eq!(code, ExitCode::Success);
    assert!(a.exists());
    assert!(!b.exists());
}

#[test]
fn test_run_app_missing_report() {
    let dir = TempDir::new().unwrap();
    let report = dir.path().join("missing.csv");

    let err = synodupe::run_app(cli(&report, dir.path(), &[])).unwrap_err();

    assert!(matches!(
        err.root_cause().downcast_ref::<ReportError>(),
        Some(ReportError::NotFound(_))
    ));
}

#[test]
fn test_split_group_policies() {
    let dir = TempDir::new().unwrap();
    let a = make_file(dir.path(), "a.bin", 1);
    let b = make_file(dir.path(), "b.bin", 1);
    let c = make_file(dir.path(), "c.bin", 1);
    let d = make_file(dir.path(), "d.bin", 1);
    let lines = vec![
        HEADER.to_string(),
        row(1, &a, 1),
        row(1, &b, 1),
        row(2, &c, 1),
        row(1, &d, 1),
    ];
    let report = write_report(dir.path(), &lines);

    let err = synodupe::run_app(cli(&report, dir.path(), &[])).unwrap_err();
    assert!(matches!(
        err.root_cause().downcast_ref::<ReportError>(),
        Some(ReportError::SplitGroup { group_id: 1, .. })
    ));
    assert!(b.exists());

    let reader = ReportReader::open(&report).unwrap();
    let grouped = group_report(
        reader,
        &GroupingOptions {
            split_groups: SplitGroupPolicy::Replace,
            ..GroupingOptions::default()
        },
    )
    .unwrap();
    assert_eq!(grouped.groups.len(), 2);
    assert_eq!(grouped.replaced, 1);
}

#[test]
fn test_paths_with_spaces() {
    let dir = TempDir::new().unwrap();
    let keeper = make_file(dir.path(), "holiday photo.jpg", 8);
    let copy = make_file(dir.path(), "holiday photo (1).jpg", 8);
    let lines = vec![HEADER.to_string(), row(1, &keeper, 8), row(1, &copy, 8)];
    let report = write_report(dir.path(), &lines);

    // Default sanitizing strips inner whitespace, so the copy is not found
    let summary = run_pipeline(&report, &PlanOptions::default());
    assert_eq!(summary.files_removed, 0);
    assert_eq!(summary.failures, 1);
    assert!(copy.exists());

    let summary = run_pipeline(
        &report,
        &PlanOptions {
            dry_run: false,
            strip_path_whitespace: false,
        },
    );
    assert_eq!(summary.files_removed, 1);
    assert!(!copy.exists());
    assert!(keeper.exists());
}

#[test]
fn test_no_break_space_in_name_is_kept() {
    let dir = TempDir::new().unwrap();
    let keeper = make_file(dir.path(), "k.bin", 4);
    let copy = make_file(dir.path(), "a\u{a0}b.bin", 4);
    let unrelated = make_file(dir.path(), "ab.bin", 4);

    // Single-byte report: U+00A0 is written as the byte 0xA0
    let text = [HEADER.to_string(), row(1, &keeper, 4), row(1, &copy, 4)].join("\r\n");
    let bytes: Vec<u8> = text.chars().map(|c| c as u32 as u8).collect();
    let report = dir.path().join("report.csv");
    fs::write(&report, bytes).unwrap();

    let summary = run_pipeline(&report, &PlanOptions::default());

    assert_eq!(summary.files_removed, 1);
    assert!(!copy.exists());
    assert!(unrelated.exists());
    assert!(keeper.exists());
}

#[test]
fn test_not_found_candidate_status() {
    let dir = TempDir::new().unwrap();
    let a = make_file(dir.path(), "a.bin", 1);
    let gone = dir.path().join("gone.bin");
    let lines = vec![HEADER.to_string(), row(1, &a, 1), row(1, &gone, 1)];
    let report = write_report(dir.path(), &lines);

    let reader = ReportReader::open(&report).unwrap();
    let grouped = group_report(reader, &GroupingOptions::default()).unwrap();
    let deletion = execute_plan(
        &grouped.groups,
        &FsRemover::new(DeleteMode::Permanent),
        &PlanOptions::default(),
    );

    assert_eq!(deletion.files_removed, 0);
    assert_eq!(
        deletion.groups[0].candidates[0].status,
        CandidateStatus::NotFound
    );
}
