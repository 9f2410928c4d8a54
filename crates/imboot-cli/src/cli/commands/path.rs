//! `imboot path` – show where things live without creating anything.

use anyhow::Result;
use imboot_core::logging;

use super::{load_settings, resolve_layout, settings_file};
use crate::cli::GlobalArgs;

pub fn run_path(args: &GlobalArgs) -> Result<()> {
    let (layout, artifact) = resolve_layout(args)?;
    let settings = load_settings(args, &layout)?;
    let url = settings.release_source()?.download_url(&artifact)?;
    let state = if layout.is_installed() {
        "installed"
    } else {
        "not installed"
    };

    println!("app dir:   {}", layout.app_dir.display());
    println!("importer:  {} ({})", layout.app_path.display(), state);
    println!("settings:  {}", settings_file(args, &layout).display());
    println!(
        "log file:  {}",
        logging::log_path(&layout.app_dir).display()
    );
    println!("download:  {}", url);
    Ok(())
}
