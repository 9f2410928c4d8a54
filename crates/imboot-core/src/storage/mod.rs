//! Temp-file lifecycle for a download.
//!
//! The temp file is created in the destination's directory so the final
//! rename stays on one filesystem and is atomic. Until it is persisted, the
//! temp file is deleted when dropped, on success and error paths alike.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::{NamedTempFile, TempPath};

pub const TEMP_PREFIX: &str = "download-";
pub const TEMP_SUFFIX: &str = ".tmp";

/// Directory a temp file for `dest` is created in.
pub fn parent_dir(dest: &Path) -> PathBuf {
    match dest.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Open temp file receiving a download.
pub struct TempDownload {
    file: NamedTempFile,
}

impl TempDownload {
    /// Create `download-*.tmp` next to `dest`.
    pub fn create_beside(dest: &Path) -> io::Result<Self> {
        let file = tempfile::Builder::new()
            .prefix(TEMP_PREFIX)
            .suffix(TEMP_SUFFIX)
            .tempfile_in(parent_dir(dest))?;
        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn file_mut(&mut self) -> &mut File {
        self.file.as_file_mut()
    }

    /// Flush data to disk and close the handle. The returned path still
    /// deletes the file on drop unless passed to [`persist`].
    pub fn close(self) -> io::Result<TempPath> {
        self.file.as_file().sync_all()?;
        Ok(self.file.into_temp_path())
    }
}

/// Atomically rename a closed temp file onto `dest`.
///
/// Where replacing an existing file by rename is refused (Windows), the
/// destination is removed and the rename retried once.
pub fn persist(temp: TempPath, dest: &Path) -> io::Result<()> {
    match temp.persist(dest) {
        Ok(()) => Ok(()),
        Err(err) if cfg!(windows) && dest.exists() => {
            tracing::debug!(path = %dest.display(), "rename refused, removing destination and retrying");
            let temp = err.path;
            let _ = std::fs::remove_file(dest);
            temp.persist(dest).map_err(|e| e.error)
        }
        Err(err) => Err(err.error),
    }
}
