//! SHA-256 digests of the importer artifact.
//!
//! Diagnostic only: digests are logged and printed, never compared against a
//! published value.

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::Read;
use std::path::Path;

const BUF_SIZE: usize = 32 * 1024;

/// Number of hex characters shown in console summaries.
pub const SHORT_HEX_LEN: usize = 16;

/// Incremental SHA-256 fed chunk by chunk as bytes arrive.
#[derive(Debug, Clone, Default)]
pub struct StreamingDigest {
    hasher: Sha256,
}

impl StreamingDigest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, chunk: &[u8]) {
        self.hasher.update(chunk);
    }

    /// Consume the digest and return it as lowercase hex.
    pub fn finish_hex(self) -> String {
        hex::encode(self.hasher.finalize())
    }
}

/// Leading characters of a hex digest, for one-line summaries.
pub fn short_hex(digest: &str) -> &str {
    digest.get(..SHORT_HEX_LEN).unwrap_or(digest)
}

/// Compute SHA-256 of a file and return the digest as lowercase hex.
pub fn sha256_path(path: &Path) -> Result<String> {
    let mut f = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let mut digest = StreamingDigest::new();
    let mut buf = vec![0u8; BUF_SIZE];
    loop {
        let n = f
            .read(&mut buf)
            .with_context(|| format!("read {}", path.display()))?;
        if n == 0 {
            break;
        }
        digest.update(&buf[..n]);
    }
    Ok(digest.finish_hex())
}
