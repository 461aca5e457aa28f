//! Individual detection checks. Each is a pure function returning `Evidence`.

use super::{ConfidenceSource, DownloadEvent};
use crate::fetch::HeadResult;
use crate::locator::parse_content_disposition_filename;
use crate::media_type::{has_target_extension, is_quicktime_type};

/// Outcome of a single check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Evidence {
    Match(ConfidenceSource),
    NoMatch,
}

/// Checks that need only the event, in evaluation order.
pub(super) const EVENT_CHECKS: [fn(&DownloadEvent) -> Evidence; 2] = [url_extension, mime_hint];

/// Checks over a successful probe response, in evaluation order.
pub(super) const PROBE_CHECKS: [fn(&HeadResult) -> Evidence; 2] =
    [probe_content_type, probe_content_disposition];

/// URL ends in `.mov`, either as a whole or in its path (query and fragment ignored).
pub(super) fn url_extension(event: &DownloadEvent) -> Evidence {
    let path_matches = || {
        url::Url::parse(&event.url)
            .map(|u| has_target_extension(u.path()))
            .unwrap_or(false)
    };
    if has_target_extension(&event.url) || path_matches() {
        Evidence::Match(ConfidenceSource::UrlExtension)
    } else {
        Evidence::NoMatch
    }
}

pub(super) fn mime_hint(event: &DownloadEvent) -> Evidence {
    match event.mime_hint.as_deref() {
        Some(mime) if is_quicktime_type(mime) => Evidence::Match(ConfidenceSource::MimeHeader),
        _ => Evidence::NoMatch,
    }
}

pub(super) fn probe_content_type(head: &HeadResult) -> Evidence {
    match head.content_type.as_deref() {
        Some(ct) if is_quicktime_type(ct) => Evidence::Match(ConfidenceSource::MimeHeader),
        _ => Evidence::NoMatch,
    }
}

pub(super) fn probe_content_disposition(head: &HeadResult) -> Evidence {
    let filename = head
        .content_disposition
        .as_deref()
        .and_then(parse_content_disposition_filename);
    match filename {
        Some(name) if has_target_extension(&name) => {
            Evidence::Match(ConfidenceSource::ContentDisposition)
        }
        _ => Evidence::NoMatch,
    }
}

pub(super) fn suggested_filename(event: &DownloadEvent) -> Evidence {
    match event.suggested_filename.as_deref() {
        Some(name) if has_target_extension(name) => {
            Evidence::Match(ConfidenceSource::FilenameFallback)
        }
        _ => Evidence::NoMatch,
    }
}
