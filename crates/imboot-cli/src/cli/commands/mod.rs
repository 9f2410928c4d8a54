//! CLI command handlers, one per file.

mod checksum;
mod launch;
mod path;

pub use checksum::run_checksum;
pub use launch::run_launch;
pub use path::run_path;

use anyhow::Result;
use imboot_core::install::AppLayout;
use imboot_core::platform::{self, HostEnv};
use imboot_core::release::Artifact;
use imboot_core::settings::{self, BootstrapSettings};
use std::path::PathBuf;

use super::GlobalArgs;

/// App layout for this host, honouring `--app-dir`. Does not touch the filesystem.
pub(crate) fn resolve_layout(args: &GlobalArgs) -> Result<(AppLayout, Artifact)> {
    let profile = platform::current();
    let artifact = Artifact::for_profile(profile);
    let layout = AppLayout::resolve(
        args.app_dir.as_deref(),
        profile,
        &HostEnv::capture(),
        &artifact,
    )?;
    Ok((layout, artifact))
}

/// Settings file path: `--settings` or `bootstrap.toml` in the app dir.
pub(crate) fn settings_file(args: &GlobalArgs, layout: &AppLayout) -> PathBuf {
    args.settings
        .clone()
        .unwrap_or_else(|| settings::settings_path(&layout.app_dir))
}

pub(crate) fn load_settings(args: &GlobalArgs, layout: &AppLayout) -> Result<BootstrapSettings> {
    settings::load_or_default(&settings_file(args, layout))
}
