#![allow(dead_code)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use assert_fs::TempDir;
use assert_fs::fixture::PathChild;

/// Writes `bytes` to `name` inside `dir` and returns the full path.
pub fn write_bytes(dir: &TempDir, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.child(name).path().to_path_buf();
    fs::write(&path, bytes).expect("failed to write fixture bytes");
    path
}

/// Deterministic, non-repeating payload spanning several 64000-byte chunks.
pub fn sample_image(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i * 31 % 253) as u8).collect()
}

/// Writes an executable `/bin/sh` script standing in for the converter.
///
/// The script sees `$1` as the image, `$2` as `-output`, `$3` as the output path.
pub fn write_converter(dir: &TempDir, name: &str, body: &str) -> PathBuf {
    let path = dir.child(name).path().to_path_buf();
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("failed to write converter");
    let mut perms = fs::metadata(&path)
        .expect("converter metadata")
        .permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).expect("failed to mark converter executable");
    path
}

/// Converter that copies the image verbatim to the output path.
pub fn copying_converter(dir: &TempDir) -> PathBuf {
    write_converter(dir, "copy.sh", r#"cp "$1" "$3""#)
}

/// Converter that records its output path in `record` before copying.
pub fn recording_converter(dir: &TempDir, record: &Path, exit_code: i32) -> PathBuf {
    let body = format!(
        "printf '%s' \"$3\" > '{}'\ncp \"$1\" \"$3\"\nexit {exit_code}",
        record.display()
    );
    write_converter(dir, "record.sh", &body)
}

/// Converter that complains on stderr and exits non-zero without writing anything.
pub fn failing_converter(dir: &TempDir, message: &str, exit_code: i32) -> PathBuf {
    let body = format!("echo '{message}' >&2\nexit {exit_code}");
    write_converter(dir, "fail.sh", &body)
}

pub fn recorded_path(record: &Path) -> PathBuf {
    PathBuf::from(fs::read_to_string(record).expect("converter left no record"))
}
