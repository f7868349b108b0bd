//! End-to-end tests for the `dirfilter` binary.
//!
//! Every argument is passed on the command line so no prompt is shown.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn dirfilter_cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("dirfilter"));
    cmd.env_remove("DIRFILTER_MATCH")
        .env_remove("DIRFILTER_SUFFIX")
        .env_remove("DIRFILTER_LOG");
    cmd
}

fn make_source(root: &Path) -> std::path::PathBuf {
    let src = root.join("photos");
    fs::create_dir_all(src.join("raw")).unwrap();
    fs::write(src.join("a.jpg"), "a").unwrap();
    fs::write(src.join("b.jpg"), "b").unwrap();
    fs::write(src.join("raw").join("c.cr2"), "c").unwrap();
    src
}

// ============================================================================
// Help
// ============================================================================

#[test]
fn test_help_exits_zero() {
    dirfilter_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("filter"))
        .stdout(predicate::str::contains("scan"));
}

#[test]
fn test_unknown_flag_exits_one() {
    dirfilter_cmd().arg("--no-such-flag").assert().code(1);
}

// ============================================================================
// Filter
// ============================================================================

#[test]
fn test_filter_copies_unlisted_entries() {
    let tmp = tempdir().unwrap();
    let src = make_source(tmp.path());
    let reference = tmp.path().join("exclude.txt");
    fs::write(&reference, "a.jpg\n\n  raw  \n").unwrap();

    dirfilter_cmd()
        .arg("filter")
        .arg(&src)
        .arg(&reference)
        .assert()
        .success()
        .stdout(predicate::str::contains("Operation completed."));

    let dst = tmp.path().join("photos_filtrato");
    assert_eq!(fs::read_to_string(dst.join("b.jpg")).unwrap(), "b");
    assert!(!dst.join("a.jpg").exists());
    assert!(!dst.join("raw").exists());
}

#[test]
fn test_filter_nothing_to_copy_creates_no_destination() {
    let tmp = tempdir().unwrap();
    let src = make_source(tmp.path());
    let reference = tmp.path().join("exclude.txt");
    fs::write(&reference, "a.jpg\nb.jpg\nraw\n").unwrap();

    dirfilter_cmd()
        .arg("filter")
        .arg(&src)
        .arg(&reference)
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing to copy"));

    assert!(!tmp.path().join("photos_filtrato").exists());
}

#[test]
fn test_filter_missing_directory_exits_one() {
    let tmp = tempdir().unwrap();
    let reference = tmp.path().join("exclude.txt");
    fs::write(&reference, "a.jpg\n").unwrap();

    dirfilter_cmd()
        .arg("filter")
        .arg(tmp.path().join("missing"))
        .arg(&reference)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("not a directory"));
}

#[test]
fn test_filter_rejects_non_txt_reference() {
    let tmp = tempdir().unwrap();
    let src = make_source(tmp.path());
    let reference = tmp.path().join("exclude.csv");
    fs::write(&reference, "a.jpg\n").unwrap();

    dirfilter_cmd()
        .arg("filter")
        .arg(&src)
        .arg(&reference)
        .assert()
        .code(1)
        .stderr(predicate::str::contains(".txt"));

    assert!(!tmp.path().join("photos_filtrato").exists());
}

#[test]
fn test_filter_partial_failure_exits_one() {
    let tmp = tempdir().unwrap();
    let src = make_source(tmp.path());
    let reference = tmp.path().join("exclude.txt");
    fs::write(&reference, "raw\n").unwrap();
    // A directory where a.jpg should land makes that one copy fail.
    let dst = tmp.path().join("photos_filtrato");
    fs::create_dir_all(dst.join("a.jpg")).unwrap();

    dirfilter_cmd()
        .arg("filter")
        .arg(&src)
        .arg(&reference)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("a.jpg"))
        .stdout(predicate::str::contains("finished with errors"));

    assert_eq!(fs::read_to_string(dst.join("b.jpg")).unwrap(), "b");
}

#[test]
fn test_filter_dry_run_creates_nothing() {
    let tmp = tempdir().unwrap();
    let src = make_source(tmp.path());
    let reference = tmp.path().join("exclude.txt");
    fs::write(&reference, "a.jpg\n").unwrap();

    dirfilter_cmd()
        .args(["filter", "--dry-run"])
        .arg(&src)
        .arg(&reference)
        .assert()
        .success()
        .stdout(predicate::str::contains("dry run"));

    assert!(!tmp.path().join("photos_filtrato").exists());
}

#[test]
fn test_filter_glob_mode_and_suffix_from_env() {
    let tmp = tempdir().unwrap();
    let src = make_source(tmp.path());
    let reference = tmp.path().join("exclude.txt");
    fs::write(&reference, "*.jpg\n").unwrap();

    dirfilter_cmd()
        .env("DIRFILTER_MATCH", "glob")
        .env("DIRFILTER_SUFFIX", "_kept")
        .arg("filter")
        .arg(&src)
        .arg(&reference)
        .assert()
        .success();

    let dst = tmp.path().join("photos_kept");
    assert!(dst.join("raw").join("c.cr2").is_file());
    assert!(!dst.join("a.jpg").exists());
    assert!(!dst.join("b.jpg").exists());
}

#[test]
fn test_filter_rejects_suffix_pointing_into_source() {
    let tmp = tempdir().unwrap();
    let src = make_source(tmp.path());
    let reference = tmp.path().join("exclude.txt");
    fs::write(&reference, "raw\n").unwrap();

    dirfilter_cmd()
        .arg("filter")
        .arg("--suffix=/x")
        .arg(&src)
        .arg(&reference)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid destination suffix"));

    assert!(!src.join("x").exists());
    assert_eq!(fs::read_to_string(src.join("a.jpg")).unwrap(), "a");
}

#[test]
fn test_filter_invalid_regex_exits_one() {
    let tmp = tempdir().unwrap();
    let src = make_source(tmp.path());
    let reference = tmp.path().join("exclude.txt");
    fs::write(&reference, "(unclosed\n").unwrap();

    dirfilter_cmd()
        .args(["filter", "--match", "regex"])
        .arg(&src)
        .arg(&reference)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid pattern"));

    assert!(!tmp.path().join("photos_filtrato").exists());
}

// ============================================================================
// Scan
// ============================================================================

#[test]
fn test_scan_writes_listing_into_working_directory() {
    let tmp = tempdir().unwrap();
    let src = make_source(tmp.path());
    let cwd = tmp.path().join("work");
    fs::create_dir_all(&cwd).unwrap();

    dirfilter_cmd()
        .current_dir(&cwd)
        .args(["scan", "-o", "listing"])
        .arg(&src)
        .assert()
        .success()
        .stdout(predicate::str::contains("listing.txt"));

    assert_eq!(
        fs::read_to_string(cwd.join("listing.txt")).unwrap(),
        "a.jpg\nb.jpg\nraw\n"
    );
}

#[test]
fn test_scan_default_output_name() {
    let tmp = tempdir().unwrap();
    let src = make_source(tmp.path());

    dirfilter_cmd()
        .current_dir(tmp.path())
        .arg("scan")
        .arg(&src)
        .assert()
        .success();

    assert!(tmp.path().join("scan_output.txt").is_file());
}

#[test]
fn test_scan_missing_directory_exits_one() {
    let tmp = tempdir().unwrap();

    dirfilter_cmd()
        .current_dir(tmp.path())
        .arg("scan")
        .arg(tmp.path().join("missing"))
        .assert()
        .code(1);

    assert!(!tmp.path().join("scan_output.txt").exists());
}
