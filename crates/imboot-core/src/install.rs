//! Cached artifact location and the "download once, reuse forever" install step.

use crate::downloader::{self, DownloadError, DownloadOptions, DownloadOutcome};
use crate::platform::{HostEnv, PathError, PlatformProfile};
use crate::release::Artifact;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("error getting app data directory: {0}")]
    AppDir(#[from] PathError),
    #[error("error creating app directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Where the importer lives on this machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppLayout {
    pub app_dir: PathBuf,
    pub app_path: PathBuf,
}

impl AppLayout {
    /// Layout inside an explicit directory.
    pub fn in_dir(app_dir: impl Into<PathBuf>, artifact: &Artifact) -> Self {
        let app_dir = app_dir.into();
        let app_path = app_dir.join(artifact.file_name());
        Self { app_dir, app_path }
    }

    /// Resolve the layout without touching the filesystem. `app_dir`
    /// overrides the profile's per-user directory.
    pub fn resolve(
        app_dir: Option<&Path>,
        profile: &dyn PlatformProfile,
        env: &HostEnv,
        artifact: &Artifact,
    ) -> Result<Self, LayoutError> {
        let dir = match app_dir {
            Some(dir) => dir.to_path_buf(),
            None => profile.app_data_dir(env)?,
        };
        Ok(Self::in_dir(dir, artifact))
    }

    /// Create the app directory (and parents) if missing.
    pub fn prepare(&self) -> Result<(), LayoutError> {
        fs::create_dir_all(&self.app_dir).map_err(|source| LayoutError::CreateDir {
            path: self.app_dir.clone(),
            source,
        })
    }

    pub fn is_installed(&self) -> bool {
        self.app_path.exists()
    }
}

/// Progress of [`ensure_artifact`], in the order it happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallEvent<'a> {
    Downloading { url: &'a str },
    Progress(u8),
}

#[derive(Debug)]
pub enum Installed {
    /// A cached executable was already present; nothing was fetched.
    AlreadyPresent,
    Downloaded {
        outcome: DownloadOutcome,
        /// Set when the executable bit could not be applied. Not fatal.
        permission_warning: Option<io::Error>,
    },
}

/// Make sure the importer is cached at `layout.app_path`, downloading it
/// from `url` when absent. An existing file is used as-is, with no version
/// or checksum comparison.
pub fn ensure_artifact(
    layout: &AppLayout,
    url: &str,
    options: &DownloadOptions,
    on_event: &mut dyn FnMut(InstallEvent<'_>),
) -> Result<Installed, DownloadError> {
    if layout.is_installed() {
        tracing::info!(path = %layout.app_path.display(), "using cached importer");
        return Ok(Installed::AlreadyPresent);
    }

    on_event(InstallEvent::Downloading { url });
    let outcome = downloader::download_file(&layout.app_path, url, options, &mut |percent| {
        on_event(InstallEvent::Progress(percent))
    })?;

    let permission_warning = make_executable(&layout.app_path).err();
    if let Some(e) = &permission_warning {
        tracing::warn!(path = %layout.app_path.display(), "failed to make importer executable: {}", e);
    }
    Ok(Installed::Downloaded {
        outcome,
        permission_warning,
    })
}

/// Set mode 0755 on Unix. No-op elsewhere.
#[cfg(unix)]
pub fn make_executable(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755))
}

#[cfg(not(unix))]
pub fn make_executable(_path: &Path) -> io::Result<()> {
    Ok(())
}
