use std::fs;
use std::time::{Duration, SystemTime};

use assert_cmd::Command;

/// Exercises the end-to-end CLI surface for a purely local transfer: the
/// `rsync27` binary, given two local paths with `-r`, reproduces the
/// source tree under the destination — the "CLI round-trip" property
/// `SPEC_FULL.md` §8 names.
#[test]
fn recursive_local_copy_reproduces_source_tree() {
    let src = tempfile::tempdir().unwrap();
    let dst = tempfile::tempdir().unwrap();

    let proj = src.path().join("proj");
    fs::create_dir_all(proj.join("sub")).unwrap();
    fs::write(proj.join("a.txt"), b"hello").unwrap();
    fs::write(proj.join("sub/b.txt"), b"world").unwrap();

    Command::cargo_bin("rsync27")
        .unwrap()
        .arg("-r")
        .arg(proj.to_str().unwrap())
        .arg(dst.path().to_str().unwrap())
        .assert()
        .success();

    assert_eq!(
        fs::read(dst.path().join("proj/a.txt")).unwrap(),
        b"hello"
    );
    assert_eq!(
        fs::read(dst.path().join("proj/sub/b.txt")).unwrap(),
        b"world"
    );
}

#[test]
fn times_flag_preserves_modification_time() {
    let src = tempfile::tempdir().unwrap();
    let dst = tempfile::tempdir().unwrap();

    let proj = src.path().join("proj");
    fs::create_dir_all(&proj).unwrap();
    let file = proj.join("a.txt");
    fs::write(&file, b"hello").unwrap();
    let stamp = SystemTime::now() - Duration::from_secs(10_000);
    filetime::set_file_mtime(&file, filetime::FileTime::from_system_time(stamp)).unwrap();

    Command::cargo_bin("rsync27")
        .unwrap()
        .arg("-r")
        .arg("-t")
        .arg(proj.to_str().unwrap())
        .arg(dst.path().to_str().unwrap())
        .assert()
        .success();

    let dest_file = dst.path().join("proj/a.txt");
    let dest_mtime = filetime::FileTime::from_last_modification_time(
        &fs::metadata(&dest_file).unwrap(),
    );
    let src_mtime =
        filetime::FileTime::from_last_modification_time(&fs::metadata(&file).unwrap());
    assert_eq!(dest_mtime, src_mtime);
}

#[test]
fn missing_destination_operand_fails() {
    Command::cargo_bin("rsync27")
        .unwrap()
        .arg("only-one-path")
        .assert()
        .failure();
}
