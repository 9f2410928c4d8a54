use super::*;
use imboot_core::config::Field;
use imboot_core::platform::PathError;
use std::io;
use std::path::PathBuf;

#[test]
fn config_error_asks_for_fresh_copy() {
    let err = anyhow::Error::from(ConfigError::Unpatched(Field::SetupToken));
    let lines = error_lines(&err);
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("Error: This bootstrap binary was not properly configured"));
    assert!(lines[0].contains("setup token"));
    assert_eq!(
        lines[1],
        "Please download a fresh copy from your Immich server."
    );
    assert_eq!(exit_code(&Err(err)), 1);
}

#[test]
fn download_error_adds_connectivity_hint() {
    let err = anyhow::Error::from(DownloadError::HttpStatus(404));
    let lines = error_lines(&err);
    assert_eq!(
        lines[0],
        "Failed to download importer: download failed with status: HTTP 404"
    );
    let hints = lines[1..].join("\n");
    assert!(hints.contains("check your internet connection"));
    assert!(hints.contains("release may not be available"));
    assert_eq!(exit_code(&Err(err)), 1);
}

#[test]
fn download_error_behind_context_keeps_its_category() {
    let err = anyhow::Error::from(DownloadError::TooManyRedirects(10)).context("install importer");
    let lines = error_lines(&err);
    assert!(lines[0].starts_with("Failed to download importer: too many redirects"));
}

#[test]
fn launch_error_is_one_line() {
    let err = anyhow::Error::from(LaunchError::Spawn {
        path: PathBuf::from("/opt/immich-importer"),
        source: io::Error::from(io::ErrorKind::NotFound),
    });
    let lines = error_lines(&err);
    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with("Error running importer: failed to start /opt/immich-importer"));
    assert_eq!(exit_code(&Err(err)), 1);
}

#[test]
fn layout_error_names_the_directory_problem() {
    let err = anyhow::Error::from(LayoutError::AppDir(PathError::NoHome));
    assert_eq!(
        error_lines(&err),
        vec!["Error: error getting app data directory: cannot determine the home directory"]
    );
}

#[test]
fn other_errors_print_the_chain() {
    let err = anyhow::anyhow!("expected a table").context("parse settings bootstrap.toml");
    assert_eq!(
        error_lines(&err),
        vec!["imboot error: parse settings bootstrap.toml: expected a table"]
    );
    assert_eq!(exit_code(&Err(err)), 1);
}

#[test]
fn importer_exit_code_is_passed_through() {
    assert_eq!(exit_code(&Ok(0)), 0);
    assert_eq!(exit_code(&Ok(42)), 42);
}
