//! Detection pipeline: decides whether a download event is QuickTime media.
//!
//! Checks run cheapest first and stop at the first match:
//! URL extension, MIME hint, HEAD probe (Content-Type, then
//! Content-Disposition filename), then the browser's suggested filename.
//! Probe failures are never fatal; they only skip to the filename check.

mod checks;

pub use checks::Evidence;

use std::sync::Arc;
use std::time::Duration;

use crate::fetch::{FetchError, Transport};
use crate::media_type;

/// A download as reported by the browser's download subsystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadEvent {
    pub id: u64,
    pub url: String,
    pub mime_hint: Option<String>,
    pub suggested_filename: Option<String>,
}

impl DownloadEvent {
    pub fn new(id: u64, url: impl Into<String>) -> Self {
        Self {
            id,
            url: url.into(),
            mime_hint: None,
            suggested_filename: None,
        }
    }

    pub fn with_mime(mut self, mime: impl Into<String>) -> Self {
        self.mime_hint = Some(mime.into());
        self
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.suggested_filename = Some(filename.into());
        self
    }
}

/// Which piece of evidence decided the verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfidenceSource {
    UrlExtension,
    MimeHeader,
    ContentDisposition,
    FilenameFallback,
    Inconclusive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetectionVerdict {
    pub is_target_media: bool,
    pub confidence_source: ConfidenceSource,
}

impl DetectionVerdict {
    pub fn matched(source: ConfidenceSource) -> Self {
        Self {
            is_target_media: true,
            confidence_source: source,
        }
    }

    pub fn inconclusive() -> Self {
        Self {
            is_target_media: false,
            confidence_source: ConfidenceSource::Inconclusive,
        }
    }
}

pub struct Detector {
    transport: Arc<dyn Transport>,
    probe_timeout: Duration,
}

impl Detector {
    pub fn new(transport: Arc<dyn Transport>, probe_timeout: Duration) -> Self {
        Self {
            transport,
            probe_timeout,
        }
    }

    /// Runs the detection cascade for one event.
    pub async fn classify(&self, event: &DownloadEvent) -> DetectionVerdict {
        for check in checks::EVENT_CHECKS {
            if let Evidence::Match(source) = check(event) {
                tracing::debug!("download {}: {:?} match, no probe", event.id, source);
                return DetectionVerdict::matched(source);
            }
        }

        if is_probeable(&event.url) {
            match self.probe(&event.url).await {
                Ok(head) => {
                    for check in checks::PROBE_CHECKS {
                        if let Evidence::Match(source) = check(&head) {
                            tracing::debug!("download {}: probe {:?} match", event.id, source);
                            return DetectionVerdict::matched(source);
                        }
                    }
                    tracing::debug!("download {}: probe inconclusive", event.id);
                }
                Err(e) => {
                    tracing::info!("download {}: probe of {} failed: {}", event.id, event.url, e);
                }
            }
        } else {
            tracing::debug!("download {}: scheme not probeable, skipping probe", event.id);
        }

        match checks::suggested_filename(event) {
            Evidence::Match(source) => {
                tracing::debug!("download {}: suggested filename match", event.id);
                DetectionVerdict::matched(source)
            }
            Evidence::NoMatch => DetectionVerdict::inconclusive(),
        }
    }

    async fn probe(&self, url: &str) -> Result<crate::fetch::HeadResult, ProbeFailure> {
        let headers = media_type::request_headers();
        match tokio::time::timeout(self.probe_timeout, self.transport.head(url, &headers)).await {
            Ok(Ok(head)) => Ok(head),
            Ok(Err(e)) => Err(ProbeFailure::Fetch(e)),
            Err(_) => Err(ProbeFailure::Timeout(self.probe_timeout)),
        }
    }
}

#[derive(Debug, thiserror::Error)]
enum ProbeFailure {
    #[error("{0}")]
    Fetch(FetchError),
    #[error("timed out after {0:?}")]
    Timeout(Duration),
}

fn is_probeable(url: &str) -> bool {
    url::Url::parse(url)
        .map(|u| matches!(u.scheme(), "http" | "https"))
        .unwrap_or(false)
}
