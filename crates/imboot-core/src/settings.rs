use crate::downloader::{DownloadOptions, DEFAULT_CHUNK_SIZE, DEFAULT_MAX_REDIRECTS};
use crate::release::{ReleaseSource, ReleaseVersion, DEFAULT_HOST, DEFAULT_REPO};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Settings file name inside the app directory.
pub const SETTINGS_FILE_NAME: &str = "bootstrap.toml";

/// Smallest accepted `chunk_size`.
pub const MIN_CHUNK_SIZE: usize = 1024;

/// Where to fetch the importer from (optional `[release]` section).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReleaseSettings {
    /// Base URL of the release host.
    pub host: String,
    /// Repository as `owner/name`.
    pub repo: String,
    /// `"latest"` or a release tag such as `"v1.2.0"`.
    pub version: String,
}

impl Default for ReleaseSettings {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            repo: DEFAULT_REPO.to_string(),
            version: "latest".to_string(),
        }
    }
}

/// Download tuning (optional `[download]` section).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadSettings {
    /// A redirect chain of this many hops fails.
    pub max_redirects: u32,
    /// Bytes per write callback.
    pub chunk_size: usize,
}

impl Default for DownloadSettings {
    fn default() -> Self {
        Self {
            max_redirects: DEFAULT_MAX_REDIRECTS,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

/// Optional settings loaded from `<app dir>/bootstrap.toml`. Every field has
/// a default, so a missing file or section behaves like the stock build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BootstrapSettings {
    pub release: ReleaseSettings,
    pub download: DownloadSettings,
}

impl BootstrapSettings {
    pub fn validate(&self) -> Result<()> {
        if self.download.max_redirects == 0 {
            anyhow::bail!("download.max_redirects must be at least 1");
        }
        if self.download.chunk_size < MIN_CHUNK_SIZE {
            anyhow::bail!(
                "download.chunk_size must be at least {} bytes, got {}",
                MIN_CHUNK_SIZE,
                self.download.chunk_size
            );
        }
        self.release_source()?;
        Ok(())
    }

    pub fn release_source(&self) -> Result<ReleaseSource> {
        let source = ReleaseSource::new(
            &self.release.host,
            &self.release.repo,
            ReleaseVersion::parse(&self.release.version),
        )?;
        Ok(source)
    }

    pub fn download_options(&self) -> DownloadOptions {
        DownloadOptions {
            max_redirects: self.download.max_redirects,
            chunk_size: self.download.chunk_size,
        }
    }
}

pub fn settings_path(app_dir: &Path) -> PathBuf {
    app_dir.join(SETTINGS_FILE_NAME)
}

/// Load settings from `path`, falling back to defaults when the file does
/// not exist. Never writes a file.
pub fn load_or_default(path: &Path) -> Result<BootstrapSettings> {
    let data = match fs::read_to_string(path) {
        Ok(data) => data,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no settings file, using defaults");
            return Ok(BootstrapSettings::default());
        }
        Err(e) => {
            return Err(e).with_context(|| format!("read settings {}", path.display()));
        }
    };
    let settings: BootstrapSettings =
        toml::from_str(&data).with_context(|| format!("parse settings {}", path.display()))?;
    settings
        .validate()
        .with_context(|| format!("invalid settings in {}", path.display()))?;
    tracing::info!(path = %path.display(), "loaded settings");
    Ok(settings)
}
