//! Minimal HTTP/1.1 server that answers HEAD and GET for integration tests.
//!
//! Serves a single static body with configurable status and headers, and
//! counts requests per method. Request targets are recorded as sent.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

#[derive(Debug, Clone)]
pub struct MediaServerOptions {
    /// Status line for GET (and HEAD when `head_allowed`).
    pub status: &'static str,
    /// If false, HEAD returns 405 (simulates servers that block HEAD).
    pub head_allowed: bool,
    pub content_type: Option<&'static str>,
    pub content_disposition: Option<&'static str>,
}

impl Default for MediaServerOptions {
    fn default() -> Self {
        Self {
            status: "200 OK",
            head_allowed: true,
            content_type: Some("video/quicktime"),
            content_disposition: None,
        }
    }
}

#[derive(Default)]
pub struct Hits {
    pub head: AtomicUsize,
    pub get: AtomicUsize,
    pub targets: Mutex<Vec<String>>,
}

pub struct MediaServer {
    /// Base URL, e.g. "http://127.0.0.1:12345/".
    pub url: String,
    pub hits: Arc<Hits>,
}

impl MediaServer {
    pub fn head_hits(&self) -> usize {
        self.hits.head.load(Ordering::SeqCst)
    }

    pub fn get_hits(&self) -> usize {
        self.hits.get.load(Ordering::SeqCst)
    }

    /// Request targets in arrival order, e.g. "/clip%20one.mov".
    pub fn targets(&self) -> Vec<String> {
        self.hits.targets.lock().map(|t| t.clone()).unwrap_or_default()
    }
}

/// Starts a server in a background thread serving `body`. Runs until the process exits.
pub fn start(body: Vec<u8>, opts: MediaServerOptions) -> MediaServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let body = Arc::new(body);
    let hits = Arc::new(Hits::default());
    let server_hits = Arc::clone(&hits);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let body = Arc::clone(&body);
            let hits = Arc::clone(&server_hits);
            let opts = opts.clone();
            thread::spawn(move || handle(stream, &body, &opts, &hits));
        }
    });
    MediaServer {
        url: format!("http://127.0.0.1:{}/", port),
        hits,
    }
}

fn handle(mut stream: std::net::TcpStream, body: &[u8], opts: &MediaServerOptions, hits: &Hits) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) | Err(_) => return,
        Ok(n) => n,
    };
    let Ok(request) = std::str::from_utf8(&buf[..n]) else {
        return;
    };
    let mut request_line = request.split_whitespace();
    let method = request_line.next().unwrap_or("");
    if let (Some(target), Ok(mut targets)) = (request_line.next(), hits.targets.lock()) {
        targets.push(target.to_string());
    }

    let mut headers = String::new();
    if let Some(ct) = opts.content_type {
        headers.push_str(&format!("Content-Type: {}\r\n", ct));
    }
    if let Some(cd) = opts.content_disposition {
        headers.push_str(&format!("Content-Disposition: {}\r\n", cd));
    }

    if method.eq_ignore_ascii_case("HEAD") {
        hits.head.fetch_add(1, Ordering::SeqCst);
        if !opts.head_allowed {
            let _ = stream.write_all(b"HTTP/1.1 405 Method Not Allowed\r\nContent-Length: 0\r\n\r\n");
            return;
        }
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Length: {}\r\n{}\r\n",
            opts.status,
            body.len(),
            headers
        );
        let _ = stream.write_all(response.as_bytes());
        return;
    }
    if method.eq_ignore_ascii_case("GET") {
        hits.get.fetch_add(1, Ordering::SeqCst);
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Length: {}\r\n{}\r\n",
            opts.status,
            body.len(),
            headers
        );
        let _ = stream.write_all(response.as_bytes());
        let _ = stream.write_all(body);
        return;
    }
    let _ = stream.write_all(b"HTTP/1.1 405 Method Not Allowed\r\nContent-Length: 0\r\n\r\n");
}
