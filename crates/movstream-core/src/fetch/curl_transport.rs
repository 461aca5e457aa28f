//! libcurl-backed `Transport`.
//!
//! Each request runs a blocking `Easy` transfer on tokio's blocking pool.

use async_trait::async_trait;
use std::collections::HashMap;
use std::str;
use std::time::Duration;

use super::parse::parse_headers;
use super::{FetchError, FetchedBody, HeadResult, Transport};
use crate::config::MovConfig;

#[derive(Debug, Clone, Copy)]
pub struct CurlTransport {
    connect_timeout: Duration,
    probe_timeout: Duration,
    fetch_timeout: Duration,
}

impl CurlTransport {
    pub fn new(cfg: &MovConfig) -> Self {
        Self {
            connect_timeout: cfg.probe_connect_timeout(),
            probe_timeout: cfg.probe_timeout(),
            fetch_timeout: cfg.fetch_timeout(),
        }
    }
}

impl Default for CurlTransport {
    fn default() -> Self {
        Self::new(&MovConfig::default())
    }
}

#[async_trait]
impl Transport for CurlTransport {
    async fn head(
        &self,
        url: &str,
        headers: &HashMap<String, String>,
    ) -> Result<HeadResult, FetchError> {
        let url = url.to_string();
        let headers = headers.clone();
        let (connect, total) = (self.connect_timeout, self.probe_timeout);
        let (head, _) =
            tokio::task::spawn_blocking(move || perform(&url, &headers, true, connect, total))
                .await
                .map_err(|e| FetchError::Join(e.to_string()))??;
        Ok(head)
    }

    async fn get(
        &self,
        url: &str,
        headers: &HashMap<String, String>,
    ) -> Result<FetchedBody, FetchError> {
        let url = url.to_string();
        let headers = headers.clone();
        let (connect, total) = (self.connect_timeout, self.fetch_timeout);
        let (head, body) =
            tokio::task::spawn_blocking(move || perform(&url, &headers, false, connect, total))
                .await
                .map_err(|e| FetchError::Join(e.to_string()))??;
        Ok(FetchedBody { head, body })
    }
}

/// Runs one transfer. With `head_only` the body is not requested.
fn perform(
    url: &str,
    custom_headers: &HashMap<String, String>,
    head_only: bool,
    connect_timeout: Duration,
    timeout: Duration,
) -> Result<(HeadResult, Vec<u8>), FetchError> {
    // Locators arrive decoded; the parsed form re-escapes spaces and the like.
    let parsed = url::Url::parse(url).map_err(|_| FetchError::InvalidUrl(url.to_string()))?;

    let mut header_lines: Vec<String> = Vec::new();
    let mut body: Vec<u8> = Vec::new();

    let mut easy = curl::easy::Easy::new();
    easy.url(parsed.as_str())?;
    if head_only {
        easy.nobody(true)?;
    } else {
        easy.get(true)?;
    }
    easy.follow_location(true)?;
    easy.max_redirections(10)?;
    easy.connect_timeout(connect_timeout)?;
    easy.timeout(timeout)?;

    let mut list = curl::easy::List::new();
    for (k, v) in custom_headers {
        list.append(&format!("{}: {}", k.trim(), v.trim()))?;
    }
    if !custom_headers.is_empty() {
        easy.http_headers(list)?;
    }

    {
        let mut transfer = easy.transfer();
        transfer.header_function(|data| {
            if let Ok(s) = str::from_utf8(data) {
                header_lines.push(s.trim_end().to_string());
            }
            true
        })?;
        if !head_only {
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
        }
        transfer.perform()?;
    }

    let code = easy.response_code()?;
    if !(200..300).contains(&code) {
        tracing::debug!(
            "{} {} returned HTTP {}",
            if head_only { "HEAD" } else { "GET" },
            url,
            code
        );
        return Err(FetchError::Http(code));
    }

    Ok((parse_headers(&header_lines), body))
}
