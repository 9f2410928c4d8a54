//! Logging init: file in the app directory, or graceful fallback to stderr.
//!
//! Console output for the user is plain `println!`; tracing goes to the log
//! file so the two never interleave.

use anyhow::Result;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

pub const LOG_FILE_NAME: &str = "imboot.log";

const DEFAULT_FILE_FILTER: &str = "info,imboot_core=debug,imboot_cli=debug";
const DEFAULT_STDERR_FILTER: &str = "warn";

/// Writer that is either a file or stderr (used when file clone fails).
enum FileOrStderr {
    File(fs::File),
    Stderr,
}

impl io::Write for FileOrStderr {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            FileOrStderr::File(f) => f.write(buf),
            FileOrStderr::Stderr => io::stderr().lock().write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            FileOrStderr::File(f) => f.flush(),
            FileOrStderr::Stderr => io::stderr().lock().flush(),
        }
    }
}

struct FileMakeWriter(fs::File);

impl<'a> MakeWriter<'a> for FileMakeWriter {
    type Writer = FileOrStderr;

    fn make_writer(&'a self) -> Self::Writer {
        self.0
            .try_clone()
            .map(FileOrStderr::File)
            .unwrap_or(FileOrStderr::Stderr)
    }
}

pub fn log_path(log_dir: &Path) -> PathBuf {
    log_dir.join(LOG_FILE_NAME)
}

fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Initialize structured logging appending to `<log_dir>/imboot.log`.
/// On failure (e.g. dir unwritable), returns Err so the caller can fall back to stderr.
pub fn init_logging(log_dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(log_dir)?;
    let log_file_path = log_path(log_dir);

    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file_path)?;

    let writer = BoxMakeWriter::new(FileMakeWriter(file));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter(DEFAULT_FILE_FILTER))
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("install log subscriber: {}", e))?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "imboot logging initialized at {}",
        log_file_path.display()
    );
    Ok(log_file_path)
}

/// Initialize logging to stderr only (no file). Only warnings and errors by
/// default, so the console stays readable.
pub fn init_logging_stderr() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(DEFAULT_STDERR_FILTER))
        .with_writer(io::stderr)
        .with_ansi(false)
        .try_init();
}
