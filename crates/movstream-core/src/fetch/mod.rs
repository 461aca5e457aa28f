//! HTTP access for the pipelines: HEAD probe and full-body GET.
//!
//! The `Transport` trait is the seam the detection and playback pipelines
//! talk to; `CurlTransport` is the libcurl implementation.

mod curl_transport;
mod parse;

pub use curl_transport::CurlTransport;

use async_trait::async_trait;
use std::collections::HashMap;
use thiserror::Error;

/// Headers of a successful response that the pipelines care about.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeadResult {
    /// `Content-Type` value if present.
    pub content_type: Option<String>,
    /// `Content-Disposition` value if present (filename hint).
    pub content_disposition: Option<String>,
    /// Total size in bytes, if `Content-Length` is present.
    pub content_length: Option<u64>,
}

/// A fully buffered GET response.
#[derive(Debug, Clone, Default)]
pub struct FetchedBody {
    pub head: HeadResult,
    pub body: Vec<u8>,
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    /// Curl reported an error (timeout, connection, TLS, etc.).
    #[error("{0}")]
    Curl(#[from] curl::Error),
    /// Response had a non-2xx status.
    #[error("HTTP {0}")]
    Http(u32),
    /// The blocking transfer task panicked or was cancelled.
    #[error("transfer task failed: {0}")]
    Join(String),
}

impl FetchError {
    pub fn status(&self) -> Option<u32> {
        match self {
            FetchError::Http(code) => Some(*code),
            _ => None,
        }
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// Header-only request. Non-2xx statuses are errors.
    async fn head(
        &self,
        url: &str,
        headers: &HashMap<String, String>,
    ) -> Result<HeadResult, FetchError>;

    /// Full GET with the body buffered in memory. Non-2xx statuses are errors.
    async fn get(
        &self,
        url: &str,
        headers: &HashMap<String, String>,
    ) -> Result<FetchedBody, FetchError>;
}
