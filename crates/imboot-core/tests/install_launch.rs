//! Integration test: resolve the release URL, install into an app directory,
//! reuse the cached copy, and launch it.

mod common;

use imboot_core::config::Configuration;
use imboot_core::downloader::DownloadOptions;
use imboot_core::install::{ensure_artifact, AppLayout, InstallEvent, Installed};
use imboot_core::release::{Artifact, ReleaseSource, ReleaseVersion, DEFAULT_REPO};
use tempfile::tempdir;

fn stub_artifact() -> Artifact {
    Artifact {
        platform: "linux-amd64".to_string(),
        extension: "",
    }
}

#[test]
fn install_once_then_reuse_without_network() {
    let body = common::body_of(256 * 1024);
    let server = common::release_server::start(body.clone());
    let source = ReleaseSource::new(server.base(), DEFAULT_REPO, ReleaseVersion::Latest).unwrap();
    let artifact = stub_artifact();
    let url = source.download_url(&artifact).unwrap();
    let opts = DownloadOptions::default();

    let root = tempdir().unwrap();
    let layout = AppLayout::in_dir(root.path().join("ImmichImporter"), &artifact);
    layout.prepare().unwrap();

    let mut events = Vec::new();
    let mut record = |e: InstallEvent<'_>| {
        events.push(match e {
            InstallEvent::Downloading { url } => format!("downloading {}", url),
            InstallEvent::Progress(p) => format!("{}%", p),
        })
    };
    let installed = ensure_artifact(&layout, url.as_str(), &opts, &mut record).unwrap();

    match installed {
        Installed::Downloaded {
            outcome,
            permission_warning,
        } => {
            assert_eq!(outcome.bytes, body.len() as u64);
            assert!(permission_warning.is_none());
        }
        Installed::AlreadyPresent => panic!("expected a fresh download"),
    }
    let expected_first = format!("downloading {}", url);
    assert_eq!(events.first(), Some(&expected_first));
    assert_eq!(events.last().map(String::as_str), Some("100%"));
    assert_eq!(std::fs::read(&layout.app_path).unwrap(), body);
    let hits_after_install = server.hits();
    assert_eq!(hits_after_install, 1);

    let mut no_events = |_: InstallEvent<'_>| panic!("no events expected for a cached artifact");
    let again = ensure_artifact(&layout, url.as_str(), &opts, &mut no_events).unwrap();
    assert!(matches!(again, Installed::AlreadyPresent));
    assert_eq!(server.hits(), hits_after_install, "no request for cached artifact");
}

#[cfg(unix)]
#[test]
fn downloaded_stub_is_executable_and_exit_code_propagates() {
    use imboot_core::launcher;
    use std::os::unix::fs::PermissionsExt;

    let script = b"#!/bin/sh\nexit 42\n".to_vec();
    let server = common::release_server::start(script);
    let version = ReleaseVersion::parse("v9.9.9");
    let source = ReleaseSource::new(server.base(), DEFAULT_REPO, version).unwrap();
    let artifact = stub_artifact();
    let url = source.download_url(&artifact).unwrap();
    assert!(url.path().contains("/releases/download/v9.9.9/"));

    let root = tempdir().unwrap();
    let layout = AppLayout::in_dir(root.path(), &artifact);
    let opts = DownloadOptions::default();
    ensure_artifact(&layout, url.as_str(), &opts, &mut |_| {}).unwrap();

    let mode = std::fs::metadata(&layout.app_path)
        .unwrap()
        .permissions()
        .mode();
    assert_eq!(mode & 0o777, 0o755);

    let config = Configuration::from_raw("https://immich.local", "token").unwrap();
    assert_eq!(launcher::launch(&layout.app_path, &config).unwrap(), 42);
}
