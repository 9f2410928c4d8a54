//! Status and `Content-Length` of the final response in a redirect chain.
//!
//! libcurl passes every header line of every response (redirects included)
//! to the header callback. A status line starts a new response and resets
//! what was seen so far.

use std::str;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseHead {
    pub status: Option<u32>,
    pub content_length: Option<u64>,
}

impl ResponseHead {
    /// Feed one raw header line as delivered by libcurl.
    pub fn observe(&mut self, raw: &[u8]) {
        let line = match str::from_utf8(raw) {
            Ok(s) => s.trim(),
            Err(_) => return,
        };
        if line.is_empty() {
            return;
        }
        if line.starts_with("HTTP/") {
            *self = ResponseHead {
                status: line
                    .split_whitespace()
                    .nth(1)
                    .and_then(|code| code.parse().ok()),
                content_length: None,
            };
            return;
        }
        if let Some((name, value)) = line.split_once(':') {
            if name.trim().eq_ignore_ascii_case("content-length") {
                self.content_length = value.trim().parse().ok();
            }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.status, Some(200..=299))
    }
}
