//! Platform profiles: per-user install directory, executable extension, and
//! the OS/arch names used in release asset filenames.

use std::ffi::OsString;
use std::path::PathBuf;
use thiserror::Error;

/// Install directory name under the macOS and Windows app-data roots.
pub const APP_DIR_NAME: &str = "ImmichImporter";

/// Install directory name under the XDG config root.
pub const XDG_APP_DIR_NAME: &str = "immich-importer";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PathError {
    #[error("cannot determine the home directory")]
    NoHome,
}

/// Snapshot of the environment needed to resolve the install directory.
/// Empty variables count as unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostEnv {
    pub home: Option<PathBuf>,
    pub appdata: Option<PathBuf>,
    pub xdg_config_home: Option<PathBuf>,
}

impl HostEnv {
    /// Capture the current process environment.
    pub fn capture() -> Self {
        Self {
            home: dirs::home_dir(),
            appdata: non_empty_var("APPDATA"),
            xdg_config_home: non_empty_var("XDG_CONFIG_HOME"),
        }
    }

    fn home(&self) -> Result<PathBuf, PathError> {
        self.home.clone().ok_or(PathError::NoHome)
    }
}

fn non_empty_var(name: &str) -> Option<PathBuf> {
    std::env::var_os(name)
        .filter(|v: &OsString| !v.is_empty())
        .map(PathBuf::from)
}

/// OS family behaviour the bootstrap depends on.
pub trait PlatformProfile: Sync {
    /// OS component of the release asset name (`darwin`, `windows`, `linux`, ...).
    fn release_os(&self) -> &'static str;

    /// Suffix appended to executable file names.
    fn executable_extension(&self) -> &'static str {
        ""
    }

    /// Per-user directory the artifact is cached in. Does not create it.
    fn app_data_dir(&self, env: &HostEnv) -> Result<PathBuf, PathError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MacOs;

#[derive(Debug, Clone, Copy, Default)]
pub struct Windows;

/// Linux and every other Unix-like system.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unix;

impl PlatformProfile for MacOs {
    fn release_os(&self) -> &'static str {
        "darwin"
    }

    fn app_data_dir(&self, env: &HostEnv) -> Result<PathBuf, PathError> {
        Ok(env
            .home()?
            .join("Library")
            .join("Application Support")
            .join(APP_DIR_NAME))
    }
}

impl PlatformProfile for Windows {
    fn release_os(&self) -> &'static str {
        "windows"
    }

    fn executable_extension(&self) -> &'static str {
        ".exe"
    }

    fn app_data_dir(&self, env: &HostEnv) -> Result<PathBuf, PathError> {
        let root = match &env.appdata {
            Some(appdata) => appdata.clone(),
            None => env.home()?.join("AppData").join("Roaming"),
        };
        Ok(root.join(APP_DIR_NAME))
    }
}

impl PlatformProfile for Unix {
    fn release_os(&self) -> &'static str {
        release_os_name(std::env::consts::OS)
    }

    fn app_data_dir(&self, env: &HostEnv) -> Result<PathBuf, PathError> {
        let root = match &env.xdg_config_home {
            Some(dir) => dir.clone(),
            None => env.home()?.join(".config"),
        };
        Ok(root.join(XDG_APP_DIR_NAME))
    }
}

/// Profile for the OS this binary was compiled for.
pub fn current() -> &'static dyn PlatformProfile {
    if cfg!(target_os = "macos") {
        &MacOs
    } else if cfg!(windows) {
        &Windows
    } else {
        &Unix
    }
}

/// Map a Rust OS identifier to the release naming convention.
pub fn release_os_name(os: &'static str) -> &'static str {
    match os {
        "macos" => "darwin",
        other => other,
    }
}

/// Map a Rust architecture identifier to the release naming convention
/// (Go's `GOARCH`). Byte order picks the `le` variants of bi-endian families.
pub fn release_arch_name(arch: &'static str, little_endian: bool) -> &'static str {
    match (arch, little_endian) {
        ("x86_64", _) => "amd64",
        ("aarch64", _) => "arm64",
        ("x86", _) => "386",
        ("loongarch64", _) => "loong64",
        ("powerpc64", true) => "ppc64le",
        ("powerpc64", false) => "ppc64",
        ("mips", true) => "mipsle",
        ("mips64", true) => "mips64le",
        (other, _) => other,
    }
}

/// `<os>-<arch>` suffix of the release asset for `profile` on this CPU.
pub fn release_platform(profile: &dyn PlatformProfile) -> String {
    format!(
        "{}-{}",
        profile.release_os(),
        release_arch_name(std::env::consts::ARCH, cfg!(target_endian = "little"))
    )
}
