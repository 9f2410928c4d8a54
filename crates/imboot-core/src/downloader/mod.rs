//! Artifact downloader.
//!
//! Streams one URL into a temp file beside the destination, hashing as it
//! goes, then renames the temp file into place. The destination is either
//! left untouched or replaced by the complete body; a partial file is never
//! visible at the final path. There are no retries: every failure is final.

mod progress;
mod response;
mod single;

pub use progress::ProgressTracker;
pub use response::ResponseHead;

use crate::checksum;
use crate::storage::{self, TempDownload};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Chunk size requested from libcurl for each write callback.
pub const DEFAULT_CHUNK_SIZE: usize = 32 * 1024;

/// A redirect chain of this many hops fails.
pub const DEFAULT_MAX_REDIRECTS: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DownloadOptions {
    pub max_redirects: u32,
    pub chunk_size: usize,
}

impl Default for DownloadOptions {
    fn default() -> Self {
        Self {
            max_redirects: DEFAULT_MAX_REDIRECTS,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

/// A completed download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadOutcome {
    pub bytes: u64,
    /// Lowercase hex SHA-256 of the body. Diagnostic only.
    pub sha256: String,
}

impl DownloadOutcome {
    pub fn megabytes(&self) -> f64 {
        self.bytes as f64 / 1024.0 / 1024.0
    }

    pub fn short_digest(&self) -> &str {
        checksum::short_hex(&self.sha256)
    }
}

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("failed to create temp file in {}: {source}", dir.display())]
    TempFile {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to download: {0}")]
    Transport(#[source] curl::Error),
    #[error("too many redirects (limit {0})")]
    TooManyRedirects(u32),
    #[error("download failed with status: HTTP {0}")]
    HttpStatus(u32),
    #[error("short write: wrote {written} of {expected} bytes")]
    ShortWrite { expected: usize, written: usize },
    #[error("failed to write: {0}")]
    Write(#[source] io::Error),
    #[error("failed to read: {0}")]
    Read(#[source] curl::Error),
    #[error("incomplete download: received {received} of {expected} bytes")]
    Incomplete { expected: u64, received: u64 },
    #[error("failed to close temp file: {0}")]
    Close(#[source] io::Error),
    #[error("failed to move downloaded file to {}: {source}", dest.display())]
    Rename {
        dest: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Download `url` to `dest`.
///
/// `on_progress` receives each 10% boundary (10, 20, ... 100) once, and only
/// when the server declares a `Content-Length`.
pub fn download_file(
    dest: &Path,
    url: &str,
    options: &DownloadOptions,
    on_progress: &mut dyn FnMut(u8),
) -> Result<DownloadOutcome, DownloadError> {
    let mut tmp = TempDownload::create_beside(dest).map_err(|source| DownloadError::TempFile {
        dir: storage::parent_dir(dest),
        source,
    })?;
    tracing::debug!(url, temp = %tmp.path().display(), "starting download");

    // `tmp` is removed on drop if anything below fails.
    let received = single::fetch_into(url, tmp.file_mut(), options, on_progress)?;
    let closed = tmp.close().map_err(DownloadError::Close)?;
    storage::persist(closed, dest).map_err(|source| DownloadError::Rename {
        dest: dest.to_path_buf(),
        source,
    })?;

    tracing::info!(
        path = %dest.display(),
        bytes = received.bytes,
        sha256 = %received.sha256,
        "download complete"
    );
    Ok(DownloadOutcome {
        bytes: received.bytes,
        sha256: received.sha256,
    })
}
