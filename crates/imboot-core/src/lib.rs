pub mod checksum;
pub mod config;
pub mod downloader;
pub mod install;
pub mod launcher;
pub mod logging;
pub mod platform;
pub mod release;
pub mod settings;
pub mod storage;
