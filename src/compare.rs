use std::fs::{self, File};
use std::io::{self, ErrorKind, Read};
use std::path::Path;

use anyhow::{Context, Result};

/// Bytes pulled from each stream per iteration.
pub const CHUNK_SIZE: usize = 64_000;

/// Returns `true` when both files hold exactly the same bytes.
///
/// Files are streamed `CHUNK_SIZE` bytes at a time, so neither is loaded whole. A
/// failure to open or read either file is an error, never a mismatch.
pub fn files_match(candidate: &Path, expected: &Path) -> Result<bool> {
    if let Some(false) = lengths_agree(candidate, expected) {
        return Ok(false);
    }

    let left = File::open(candidate)
        .with_context(|| format!("opening candidate output {}", candidate.display()))?;
    let right = File::open(expected)
        .with_context(|| format!("opening expected output {}", expected.display()))?;

    streams_match(left, right, CHUNK_SIZE).with_context(|| {
        format!(
            "comparing {} against {}",
            candidate.display(),
            expected.display()
        )
    })
}

/// Compares two readers chunk by chunk, stopping at the first difference.
pub fn streams_match<A: Read, B: Read>(mut a: A, mut b: B, chunk_size: usize) -> io::Result<bool> {
    let mut left = vec![0u8; chunk_size.max(1)];
    let mut right = vec![0u8; chunk_size.max(1)];

    loop {
        let read_left = fill_chunk(&mut a, &mut left)?;
        let read_right = fill_chunk(&mut b, &mut right)?;

        // A short fill only happens at end of input.
        if read_left != read_right {
            return Ok(false);
        }
        if read_left == 0 {
            return Ok(true);
        }
        if left[..read_left] != right[..read_right] {
            return Ok(false);
        }
    }
}

/// Reads until `buf` is full or the reader is exhausted, returning the byte count.
fn fill_chunk<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(err),
        }
    }
    Ok(filled)
}

/// `Some(false)` only when both paths are regular files of different sizes.
fn lengths_agree(candidate: &Path, expected: &Path) -> Option<bool> {
    let left = fs::metadata(candidate).ok()?;
    let right = fs::metadata(expected).ok()?;
    if !left.is_file() || !right.is_file() {
        return None;
    }
    Some(left.len() == right.len())
}
