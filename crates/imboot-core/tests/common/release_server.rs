//! Minimal HTTP/1.1 server standing in for a release host in integration tests.
//!
//! Routes:
//! - `/asset` and any path containing `/releases/`: 200 with `Content-Length`
//! - `/stream`: 200 without `Content-Length`, body ends at connection close
//! - `/hop/<n>`: 302 to `/hop/<n-1>`; `/hop/0` serves the asset
//! - `/status/<code>`: that status with a short body
//! - `/short`: declares more bytes than it sends, then closes
//!
//! Every response carries `Connection: close`.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

pub struct ReleaseServer {
    base: String,
    hits: Arc<AtomicUsize>,
}

impl ReleaseServer {
    /// Base URL without trailing slash, e.g. `http://127.0.0.1:12345`.
    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    /// Number of requests served so far.
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

/// Starts a server in a background thread serving `body`. The server runs
/// until the process exits.
pub fn start(body: Vec<u8>) -> ReleaseServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let body = Arc::new(body);
    let hits = Arc::new(AtomicUsize::new(0));
    let hits_srv = Arc::clone(&hits);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let body = Arc::clone(&body);
            hits_srv.fetch_add(1, Ordering::SeqCst);
            thread::spawn(move || handle(stream, &body));
        }
    });
    ReleaseServer {
        base: format!("http://127.0.0.1:{}", port),
        hits,
    }
}

fn read_request_path(stream: &mut TcpStream) -> Option<String> {
    let mut buf = Vec::with_capacity(1024);
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = stream.read(&mut chunk).ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        if buf.len() > 64 * 1024 {
            return None;
        }
    }
    let request = String::from_utf8_lossy(&buf);
    let first = request.lines().next()?;
    let mut parts = first.split_whitespace();
    let _method = parts.next()?;
    parts.next().map(str::to_string)
}

fn handle(mut stream: TcpStream, body: &[u8]) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(5)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(5)));
    let path = match read_request_path(&mut stream) {
        Some(p) => p,
        None => return,
    };

    if path == "/asset" || path.contains("/releases/") || path == "/hop/0" {
        respond(&mut stream, "200 OK", &[], Some(body.len()), body);
    } else if path == "/stream" {
        respond(&mut stream, "200 OK", &[], None, body);
    } else if path == "/short" {
        let half = &body[..body.len() / 2];
        respond(&mut stream, "200 OK", &[], Some(body.len()), half);
    } else if let Some(n) = hop_count(&path) {
        let location = format!("Location: /hop/{}", n - 1);
        respond(&mut stream, "302 Found", &[&location], Some(0), b"");
    } else if let Some(code) = path.strip_prefix("/status/") {
        let status = match code {
            "403" => "403 Forbidden",
            "500" => "500 Internal Server Error",
            _ => "404 Not Found",
        };
        respond(&mut stream, status, &[], Some(9), b"not found");
    } else {
        respond(&mut stream, "404 Not Found", &[], Some(9), b"not found");
    }
}

/// Remaining hops for `/hop/<n>`.
fn hop_count(path: &str) -> Option<u32> {
    path.strip_prefix("/hop/")?.parse().ok()
}

fn respond(
    stream: &mut TcpStream,
    status: &str,
    extra_headers: &[&str],
    content_length: Option<usize>,
    body: &[u8],
) {
    let mut head = format!("HTTP/1.1 {}\r\nConnection: close\r\n", status);
    if let Some(len) = content_length {
        head.push_str(&format!("Content-Length: {}\r\n", len));
    }
    for h in extra_headers {
        head.push_str(h);
        head.push_str("\r\n");
    }
    head.push_str("\r\n");
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(body);
    let _ = stream.flush();
}
