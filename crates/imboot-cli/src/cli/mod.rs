//! CLI for the Immich importer bootstrap.
//!
//! With no subcommand the bootstrap runs: validate configuration, install the
//! importer if needed, launch it and mirror its exit code.

mod commands;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use imboot_core::config::ConfigError;
use imboot_core::downloader::DownloadError;
use imboot_core::install::LayoutError;
use imboot_core::launcher::LaunchError;
use imboot_core::logging;
use std::path::PathBuf;

use commands::{run_checksum, run_launch, run_path};

/// Top-level CLI for the bootstrap launcher.
#[derive(Debug, Parser)]
#[command(name = "imboot", version)]
#[command(about = "Installs and launches the Immich Google Photos importer", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<CliCommand>,

    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Overrides for values normally injected at distribution time or derived
/// from the platform.
#[derive(Debug, Clone, Default, Args)]
pub struct GlobalArgs {
    /// Immich server URL passed to the importer (replaces the injected value).
    #[arg(long, env = "IMBOOT_SERVER_URL", global = true, value_name = "URL")]
    pub server_url: Option<String>,

    /// Setup token passed to the importer (replaces the injected value).
    #[arg(
        long,
        env = "IMBOOT_SETUP_TOKEN",
        global = true,
        hide_env_values = true,
        value_name = "TOKEN"
    )]
    pub setup_token: Option<String>,

    /// Directory the importer is cached in (default: per-user app data dir).
    #[arg(long, env = "IMBOOT_APP_DIR", global = true, value_name = "DIR")]
    pub app_dir: Option<PathBuf>,

    /// Settings file (default: bootstrap.toml in the app dir).
    #[arg(long, env = "IMBOOT_SETTINGS", global = true, value_name = "FILE")]
    pub settings: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Print the resolved app directory, artifact path and download URL.
    Path,

    /// Compute SHA-256 of the cached importer.
    Checksum,
}

impl Cli {
    /// Parse arguments and run. Returns the process exit code.
    pub fn run_from_args() -> Result<i32> {
        Cli::parse().run()
    }

    pub fn run(self) -> Result<i32> {
        match self.command {
            None => run_launch(&self.global),
            Some(CliCommand::Path) => {
                logging::init_logging_stderr();
                run_path(&self.global)?;
                Ok(0)
            }
            Some(CliCommand::Checksum) => {
                logging::init_logging_stderr();
                run_checksum(&self.global)?;
                Ok(0)
            }
        }
    }
}

/// Exit code for a bootstrap failure, as opposed to one mirrored from the importer.
pub const FAILURE_EXIT_CODE: i32 = 1;

/// Process exit code for a finished run: the importer's own code, or
/// [`FAILURE_EXIT_CODE`] when the bootstrap itself failed.
pub fn exit_code(outcome: &Result<i32>) -> i32 {
    match outcome {
        Ok(code) => *code,
        Err(_) => FAILURE_EXIT_CODE,
    }
}

/// Print the diagnostic for a bootstrap failure on stderr.
pub fn report_error(err: &anyhow::Error) {
    for line in error_lines(err) {
        eprintln!("{}", line);
    }
    // Configuration errors are raised before logging is initialized.
    if err.downcast_ref::<ConfigError>().is_none() {
        tracing::error!("bootstrap failed: {:#}", err);
    }
}

/// User-facing lines for a bootstrap failure, chosen by error category.
pub fn error_lines(err: &anyhow::Error) -> Vec<String> {
    if let Some(e) = err.downcast_ref::<ConfigError>() {
        return vec![
            format!(
                "Error: This bootstrap binary was not properly configured ({}).",
                e
            ),
            "Please download a fresh copy from your Immich server.".to_string(),
        ];
    }
    if let Some(e) = err.downcast_ref::<DownloadError>() {
        return vec![
            format!("Failed to download importer: {}", e),
            String::new(),
            "Please check your internet connection and try again.".to_string(),
            "If the problem persists, the release may not be available yet.".to_string(),
        ];
    }
    if let Some(e) = err.downcast_ref::<LaunchError>() {
        return vec![format!("Error running importer: {}", e)];
    }
    if let Some(e) = err.downcast_ref::<LayoutError>() {
        return vec![format!("Error: {}", e)];
    }
    vec![format!("imboot error: {:#}", err)]
}

#[cfg(test)]
mod tests;
