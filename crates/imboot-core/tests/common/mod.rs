#![allow(dead_code)]

pub mod release_server;

use std::path::{Path, PathBuf};

/// Leftover `download-*.tmp` files in `dir`.
pub fn temp_leftovers(dir: &Path) -> Vec<PathBuf> {
    std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .map(|n| n.starts_with("download-") && n.ends_with(".tmp"))
                .unwrap_or(false)
        })
        .collect()
}

/// Deterministic non-trivial body of `len` bytes.
pub fn body_of(len: usize) -> Vec<u8> {
    (0u8..251).cycle().take(len).collect()
}
