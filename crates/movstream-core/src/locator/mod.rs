//! Resource locator handling.
//!
//! Percent-encoding for the viewer address, normalization of hosting-page
//! URLs into raw content URLs, and filename extraction from
//! Content-Disposition headers.

mod content_disposition;
mod encoding;
mod rewrite;

pub use content_disposition::parse_content_disposition_filename;
pub use encoding::{decode_component, encode_component, DecodeError};
pub use rewrite::rewrite_hosting_page;

/// Builds the viewer address `page#<encoded locator>`.
///
/// The locator is decoded first so an already-encoded URL is not encoded
/// twice. If it cannot be decoded, the raw locator is encoded as-is.
pub fn viewer_address(page: &str, locator: &str) -> String {
    let encoded = match decode_component(locator) {
        Ok(decoded) => encode_component(&decoded),
        Err(e) => {
            tracing::warn!("locator decode failed ({}); embedding raw locator", e);
            encode_component(locator)
        }
    };
    format!("{}#{}", page, encoded)
}

/// Viewer address that embeds the raw locator without decoding it first.
pub fn raw_viewer_address(page: &str, locator: &str) -> String {
    format!("{}#{}", page, encode_component(locator))
}

/// Extracts the (still encoded) locator from a viewer address fragment.
///
/// Returns `None` when there is no fragment or it is empty.
pub fn locator_from_viewer_address(address: &str) -> Option<&str> {
    let (_, fragment) = address.split_once('#')?;
    if fragment.is_empty() {
        None
    } else {
        Some(fragment)
    }
}

/// Normalizes a locator for playback.
///
/// Decodes once when the locator is a component-encoded absolute URL
/// (`https%3A%2F%2F...`), then rewrites hosting pages to raw content URLs.
/// Idempotent: `normalize(&normalize(x)) == normalize(x)`.
pub fn normalize(locator: &str) -> String {
    let decoded = decode_if_component_encoded(locator.trim());
    rewrite_hosting_page(decoded.trim())
}

fn decode_if_component_encoded(locator: &str) -> String {
    if locator.contains("://") {
        return locator.to_string();
    }
    match decode_component(locator) {
        Ok(decoded) if decoded.contains("://") => decoded,
        Ok(_) => locator.to_string(),
        Err(e) => {
            tracing::debug!("locator left encoded ({})", e);
            locator.to_string()
        }
    }
}
