//! Run the cached importer and mirror its exit code.

use crate::config::Configuration;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use thiserror::Error;

/// Exit code used when the child reports neither a code nor a signal.
pub const FALLBACK_EXIT_CODE: i32 = 1;

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("failed to start {}: {source}", path.display())]
    Spawn {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Command line for the importer: `<app> --server <url> --token <token>`,
/// with stdio inherited from this process.
pub fn command(app_path: &Path, config: &Configuration) -> Command {
    let mut cmd = Command::new(app_path);
    cmd.arg("--server")
        .arg(&config.server_url)
        .arg("--token")
        .arg(&config.setup_token)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit());
    cmd
}

/// Run the importer to completion and return the exit code to mirror.
pub fn launch(app_path: &Path, config: &Configuration) -> Result<i32, LaunchError> {
    tracing::info!(path = %app_path.display(), server = %config.server_url, "launching importer");
    let status = command(app_path, config)
        .status()
        .map_err(|source| LaunchError::Spawn {
            path: app_path.to_path_buf(),
            source,
        })?;
    let code = exit_code(status);
    tracing::info!(code, "importer exited");
    Ok(code)
}

/// The child's exit code; `128 + signal` when it was killed by a signal.
pub fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    FALLBACK_EXIT_CODE
}
