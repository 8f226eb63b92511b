//! Helpers shared by the unit tests.
#![cfg(test)]
#![allow(clippy::unwrap_used)]

use std::fs;

use tempfile::TempDir;

/// Writes `content` to `path` inside `dir`, creating parent directories.
///
/// # Arguments
/// * `dir` - Temporary project directory
/// * `path` - `/`-separated path relative to `dir`
/// * `content` - File content
pub(crate) fn write(dir: &TempDir, path: &str, content: &str) {
    let full = dir.path().join(path);
    fs::create_dir_all(full.parent().unwrap()).unwrap();
    fs::write(full, content).unwrap();
}
