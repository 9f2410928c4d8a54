//! Default action: validate configuration, install the importer if missing,
//! then run it with the server URL and setup token.

use anyhow::Result;
use imboot_core::config::Configuration;
use imboot_core::install::{self, InstallEvent, Installed};
use imboot_core::{launcher, logging, release};

use super::{load_settings, resolve_layout};
use crate::cli::GlobalArgs;

const BANNER: &str = "Immich Google Photos Importer - Bootstrap";

/// Run the bootstrap. Returns the importer's exit code.
pub fn run_launch(args: &GlobalArgs) -> Result<i32> {
    println!("{}", BANNER);
    println!("{}", "=".repeat(BANNER.len() + 1));
    println!();

    // Nothing touches the filesystem or network until this succeeds.
    let config = Configuration::resolve(args.server_url.as_deref(), args.setup_token.as_deref())?;
    println!("Server: {}", config.server_url);
    println!();

    let (layout, artifact) = resolve_layout(args)?;
    layout.prepare()?;

    match logging::init_logging(&layout.app_dir) {
        Ok(path) => tracing::debug!(log = %path.display(), "file logging enabled"),
        Err(e) => {
            logging::init_logging_stderr();
            tracing::warn!("file logging unavailable: {:#}", e);
        }
    }
    tracing::info!(?config, app_dir = %layout.app_dir.display(), "bootstrap starting");

    let settings = load_settings(args, &layout)?;
    let url = settings.release_source()?.download_url(&artifact)?;
    let origin = release::host_label(&url);

    let mut report = |event: InstallEvent<'_>| print_event(origin, event);
    let installed = install::ensure_artifact(
        &layout,
        url.as_str(),
        &settings.download_options(),
        &mut report,
    )?;
    match installed {
        Installed::AlreadyPresent => {
            println!("Found existing importer, checking for updates...");
        }
        Installed::Downloaded {
            outcome,
            permission_warning,
        } => {
            println!(
                "  Downloaded: {:.2} MB (SHA256: {}...)",
                outcome.megabytes(),
                outcome.short_digest()
            );
            if let Some(e) = permission_warning {
                eprintln!("Warning: Failed to make app executable: {}", e);
            }
            println!("Download complete!");
        }
    }

    println!();
    println!("Launching Immich Importer...");
    println!();

    Ok(launcher::launch(&layout.app_path, &config)?)
}

fn print_event(origin: &str, event: InstallEvent<'_>) {
    match event {
        InstallEvent::Downloading { url } => {
            println!("Downloading importer from {}...", origin);
            println!("URL: {}", url);
        }
        InstallEvent::Progress(pct) => println!("  Progress: {}%", pct),
    }
}
