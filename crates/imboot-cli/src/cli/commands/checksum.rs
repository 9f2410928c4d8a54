//! Checksum command: compute SHA-256 of the cached importer.

use anyhow::{bail, Result};
use imboot_core::checksum;

use super::resolve_layout;
use crate::cli::GlobalArgs;

/// Compute and print SHA-256 of the installed importer.
pub fn run_checksum(args: &GlobalArgs) -> Result<()> {
    let (layout, _) = resolve_layout(args)?;
    if !layout.is_installed() {
        bail!("importer is not installed at {}", layout.app_path.display());
    }
    let digest = checksum::sha256_path(&layout.app_path)?;
    println!("{}  {}", digest, layout.app_path.display());
    Ok(())
}
