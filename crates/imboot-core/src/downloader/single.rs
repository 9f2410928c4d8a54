//! Single-stream HTTP GET with libcurl, written sequentially into an open file.
//!
//! Each received chunk goes to the file and the digest in the same callback.
//! A write callback that returns fewer bytes than it was handed aborts the
//! transfer; the reason is kept on the sink and reported instead of curl's
//! generic write error.

use super::progress::ProgressTracker;
use super::response::ResponseHead;
use super::{DownloadError, DownloadOptions};
use crate::checksum::StreamingDigest;
use std::cell::RefCell;
use std::fs::File;
use std::io::Write;

const USER_AGENT: &str = concat!("imboot/", env!("CARGO_PKG_VERSION"));

/// What the transfer produced, before the temp file is finalized.
#[derive(Debug)]
pub(super) struct Received {
    pub bytes: u64,
    pub sha256: String,
}

struct BodySink<'a> {
    file: &'a mut File,
    digest: StreamingDigest,
    written: u64,
    tracker: Option<ProgressTracker>,
    failure: Option<DownloadError>,
    on_progress: &'a mut dyn FnMut(u8),
}

impl<'a> BodySink<'a> {
    fn new(file: &'a mut File, on_progress: &'a mut dyn FnMut(u8)) -> Self {
        Self {
            file,
            digest: StreamingDigest::new(),
            written: 0,
            tracker: None,
            failure: None,
            on_progress,
        }
    }

    /// Returns the number of bytes consumed; anything short of `data.len()`
    /// makes libcurl abort.
    fn accept(&mut self, data: &[u8], head: &ResponseHead) -> usize {
        if let Some(code) = head.status.filter(|_| !head.is_success()) {
            self.failure = Some(DownloadError::HttpStatus(code));
            return 0;
        }
        match self.file.write(data) {
            Ok(n) if n == data.len() => {}
            Ok(n) => {
                self.failure = Some(DownloadError::ShortWrite {
                    expected: data.len(),
                    written: n,
                });
                return 0;
            }
            Err(e) => {
                tracing::warn!("download write failed: {}", e);
                self.failure = Some(DownloadError::Write(e));
                return 0;
            }
        }
        self.digest.update(data);
        self.written += data.len() as u64;

        // Headers are complete once the body starts.
        let tracker = self
            .tracker
            .get_or_insert_with(|| ProgressTracker::new(head.content_length));
        for percent in tracker.advance(data.len() as u64) {
            (self.on_progress)(percent);
        }
        data.len()
    }
}

/// GET `url` into `file`, following up to `max_redirects - 1` redirects.
pub(super) fn fetch_into(
    url: &str,
    file: &mut File,
    options: &DownloadOptions,
    on_progress: &mut dyn FnMut(u8),
) -> Result<Received, DownloadError> {
    let mut easy = curl::easy::Easy::new();
    easy.url(url).map_err(DownloadError::Transport)?;
    easy.useragent(USER_AGENT)
        .map_err(DownloadError::Transport)?;
    easy.follow_location(true)
        .map_err(DownloadError::Transport)?;
    // A chain that reaches `max_redirects` hops fails.
    easy.max_redirections(options.max_redirects.saturating_sub(1))
        .map_err(DownloadError::Transport)?;
    easy.buffer_size(options.chunk_size)
        .map_err(DownloadError::Transport)?;

    let head = RefCell::new(ResponseHead::default());
    let mut sink = BodySink::new(file, on_progress);

    let performed = {
        let mut transfer = easy.transfer();
        transfer
            .header_function(|line| {
                head.borrow_mut().observe(line);
                true
            })
            .map_err(DownloadError::Transport)?;
        transfer
            .write_function(|data| Ok(sink.accept(data, &head.borrow())))
            .map_err(DownloadError::Transport)?;
        transfer.perform()
    };

    if let Err(e) = performed {
        if let Some(failure) = sink.failure.take() {
            return Err(failure);
        }
        return Err(classify(e, options.max_redirects));
    }

    let code = easy.response_code().map_err(DownloadError::Transport)?;
    if !(200..300).contains(&code) {
        return Err(DownloadError::HttpStatus(code));
    }

    let received = sink.written;
    if let Some(expected) = head.into_inner().content_length {
        if received != expected {
            return Err(DownloadError::Incomplete { expected, received });
        }
    }

    Ok(Received {
        bytes: received,
        sha256: sink.digest.finish_hex(),
    })
}

/// Map a libcurl failure onto the download error taxonomy.
fn classify(e: curl::Error, max_redirects: u32) -> DownloadError {
    if e.is_too_many_redirects() {
        return DownloadError::TooManyRedirects(max_redirects);
    }
    if e.is_recv_error() || e.is_partial_file() || e.is_read_error() {
        return DownloadError::Read(e);
    }
    DownloadError::Transport(e)
}
