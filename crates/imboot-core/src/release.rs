//! Release artifact naming and download URL resolution.
//!
//! Assets follow the GitHub Releases layout:
//! `<host>/<repo>/releases/latest/download/<asset>` for the latest release, or
//! `<host>/<repo>/releases/download/<tag>/<asset>` for a pinned tag.

use crate::platform::{self, PlatformProfile};
use thiserror::Error;
use url::Url;

pub const DEFAULT_HOST: &str = "https://github.com";
pub const DEFAULT_REPO: &str = "immich-app/immich-importer";

/// Base name of the importer executable and its release assets.
pub const ARTIFACT_STEM: &str = "immich-importer";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReleaseError {
    #[error("invalid release host {host:?}: {source}")]
    InvalidHost {
        host: String,
        #[source]
        source: url::ParseError,
    },
    #[error("release host {0:?} cannot carry a path")]
    OpaqueHost(String),
    #[error("release repository must look like owner/name, got {0:?}")]
    InvalidRepo(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseVersion {
    Latest,
    Pinned(String),
}

impl ReleaseVersion {
    /// `"latest"` (any case) or an empty string selects the latest release;
    /// anything else is a tag.
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() || value.eq_ignore_ascii_case("latest") {
            ReleaseVersion::Latest
        } else {
            ReleaseVersion::Pinned(value.to_string())
        }
    }
}

/// The platform-specific importer build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// `<os>-<arch>` in release naming.
    pub platform: String,
    /// Executable extension, e.g. `.exe`.
    pub extension: &'static str,
}

impl Artifact {
    pub fn for_profile(profile: &dyn PlatformProfile) -> Self {
        Self {
            platform: platform::release_platform(profile),
            extension: profile.executable_extension(),
        }
    }

    pub fn for_current() -> Self {
        Self::for_profile(platform::current())
    }

    /// File name of the release asset, e.g. `immich-importer-linux-amd64`.
    pub fn asset_name(&self) -> String {
        format!("{}-{}{}", ARTIFACT_STEM, self.platform, self.extension)
    }

    /// File name of the cached executable, e.g. `immich-importer.exe`.
    pub fn file_name(&self) -> String {
        format!("{}{}", ARTIFACT_STEM, self.extension)
    }
}

/// Where release assets are fetched from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseSource {
    host: Url,
    owner: String,
    name: String,
    version: ReleaseVersion,
}

impl ReleaseSource {
    pub fn new(host: &str, repo: &str, version: ReleaseVersion) -> Result<Self, ReleaseError> {
        let host_url = Url::parse(host).map_err(|source| ReleaseError::InvalidHost {
            host: host.to_string(),
            source,
        })?;
        if host_url.cannot_be_a_base() {
            return Err(ReleaseError::OpaqueHost(host.to_string()));
        }
        let (owner, name) = repo
            .trim()
            .split_once('/')
            .filter(|(o, n)| !o.is_empty() && !n.is_empty() && !n.contains('/'))
            .ok_or_else(|| ReleaseError::InvalidRepo(repo.to_string()))?;
        Ok(Self {
            host: host_url,
            owner: owner.to_string(),
            name: name.to_string(),
            version,
        })
    }

    pub fn version(&self) -> &ReleaseVersion {
        &self.version
    }

    /// Download URL of `artifact` in this release.
    pub fn download_url(&self, artifact: &Artifact) -> Result<Url, ReleaseError> {
        let asset = artifact.asset_name();
        let mut url = self.host.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| ReleaseError::OpaqueHost(self.host.to_string()))?;
            segments.pop_if_empty();
            segments.push(&self.owner).push(&self.name).push("releases");
            match &self.version {
                ReleaseVersion::Latest => {
                    segments.push("latest").push("download");
                }
                ReleaseVersion::Pinned(tag) => {
                    segments.push("download").push(tag);
                }
            }
            segments.push(&asset);
        }
        Ok(url)
    }
}

/// Name of the host serving `url`, for console messages.
pub fn host_label(url: &Url) -> &str {
    match url.host_str() {
        Some("github.com") => "GitHub",
        Some(host) => host,
        None => "the release host",
    }
}
