//! Injected bootstrap configuration: server URL and setup token.
//!
//! The provisioning server patches two fixed-width slots in the shipped binary
//! with the real values, padded back to the slot width. Decoding trims the
//! padding and rejects anything that still carries the placeholder prefix, so
//! an unpatched binary stops before touching the network or the filesystem.

use std::fmt;
use thiserror::Error;

/// Width of the server URL slot in bytes.
pub const SERVER_URL_SLOT_LEN: usize = 128;

/// Width of the setup token slot in bytes. One byte wider than the URL slot:
/// the provisioning server searches for these exact literals and patches them
/// in place, so neither slot may change.
pub const SETUP_TOKEN_SLOT_LEN: usize = 129;

/// Prefix carried by every unpatched slot.
pub const PLACEHOLDER_PREFIX: &str = "__IMMICH_";

/// Trailing characters treated as padding after patching.
const PADDING: &[char] = &['\0', '_', ' '];

#[used]
static SERVER_URL_SLOT: [u8; SERVER_URL_SLOT_LEN] =
    *b"__IMMICH_SERVER_URL_PLACEHOLDER_________________________________________________________________________________________________";

#[used]
static SETUP_TOKEN_SLOT: [u8; SETUP_TOKEN_SLOT_LEN] =
    *b"__IMMICH_SETUP_TOKEN_PLACEHOLDER_________________________________________________________________________________________________";

/// Which configuration value an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    ServerUrl,
    SetupToken,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::ServerUrl => write!(f, "server URL"),
            Field::SetupToken => write!(f, "setup token"),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The slot was never patched by the provisioning server.
    #[error("{0} still holds the unpatched placeholder")]
    Unpatched(Field),
    #[error("{0} is empty")]
    Empty(Field),
    #[error("{0} is not valid UTF-8")]
    InvalidEncoding(Field),
}

/// Validated values handed to the importer on launch.
#[derive(Clone, PartialEq, Eq)]
pub struct Configuration {
    pub server_url: String,
    pub setup_token: String,
}

// Keeps the token out of log lines.
impl fmt::Debug for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Configuration")
            .field("server_url", &self.server_url)
            .field("setup_token", &"<redacted>")
            .finish()
    }
}

impl Configuration {
    /// Decode and validate the two slots embedded in this binary.
    pub fn from_injected() -> Result<Self, ConfigError> {
        Self::resolve(None, None)
    }

    /// Validate raw values as they would appear in a patched slot.
    pub fn from_raw(server_url: &str, setup_token: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            server_url: validate(server_url, Field::ServerUrl)?,
            setup_token: validate(setup_token, Field::SetupToken)?,
        })
    }

    /// Like [`Configuration::from_injected`], but an explicit override (CLI flag
    /// or environment) replaces the corresponding slot. Overrides go through the
    /// same validation.
    pub fn resolve(
        server_url: Option<&str>,
        setup_token: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let server_url = match server_url {
            Some(v) => validate(v, Field::ServerUrl)?,
            None => decode_slot(&read_slot(&SERVER_URL_SLOT), Field::ServerUrl)?,
        };
        let setup_token = match setup_token {
            Some(v) => validate(v, Field::SetupToken)?,
            None => decode_slot(&read_slot(&SETUP_TOKEN_SLOT), Field::SetupToken)?,
        };
        Ok(Self {
            server_url,
            setup_token,
        })
    }
}

/// Strip trailing NUL, underscore and space padding.
pub fn trim_padding(raw: &str) -> &str {
    raw.trim_end_matches(PADDING)
}

fn validate(raw: &str, field: Field) -> Result<String, ConfigError> {
    let value = trim_padding(raw);
    if value.is_empty() {
        return Err(ConfigError::Empty(field));
    }
    if value.starts_with(PLACEHOLDER_PREFIX) {
        return Err(ConfigError::Unpatched(field));
    }
    Ok(value.to_string())
}

fn decode_slot(bytes: &[u8], field: Field) -> Result<String, ConfigError> {
    let raw = std::str::from_utf8(bytes).map_err(|_| ConfigError::InvalidEncoding(field))?;
    validate(raw, field)
}

fn read_slot<const N: usize>(slot: &'static [u8; N]) -> [u8; N] {
    // The slot is patched after linking; a volatile read stops the compiler
    // from folding in the placeholder it saw at build time.
    // SAFETY: `slot` points to an initialized, aligned static of the read type.
    unsafe { std::ptr::read_volatile(slot) }
}
