//! Playback pipeline.
//!
//! A viewer session resolves a locator to playing media: it registers the
//! normalized locator on the media element under each candidate type and
//! races the element's load signals against a timeout. On error or timeout
//! the whole resource is fetched into memory, attached as a typed buffer,
//! and played from there.
//!
//! State moves `Loading -> Playing | Errored`; `Playing <-> Paused` is user
//! driven; `Errored` ends the request.

mod buffer;
mod chrome;
mod element;
mod headless;
mod pipeline;
mod session;

pub use buffer::{BufferHandle, BufferRegistry, MediaBuffer};
pub use chrome::{format_clock, progress_percent, PlayerChrome};
pub use element::{ElementStatus, MediaElement, MediaSignal, PlayRequest};
pub use headless::HeadlessElement;
pub use pipeline::PlaybackPipeline;
pub use session::ViewerSession;

/// A locator to play, as read from the viewer address (possibly still encoded).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackRequest {
    pub resource_locator: String,
}

impl PlaybackRequest {
    pub fn new(resource_locator: impl Into<String>) -> Self {
        Self {
            resource_locator: resource_locator.into(),
        }
    }

    /// Request carried by a viewer address fragment. Empty when there is no fragment.
    pub fn from_viewer_address(address: &str) -> Self {
        Self::new(crate::locator::locator_from_viewer_address(address).unwrap_or(""))
    }
}

/// Why the element gave up on direct playback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackTrigger {
    ElementError(String),
    Timeout,
}

/// Terminal failure of a playback request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackFailure {
    NoLocator,
    /// The media element could not decode the buffered resource.
    UnsupportedFormat { detail: String },
    /// The fallback fetch failed (network error or non-2xx status).
    FetchFailed {
        trigger: FallbackTrigger,
        detail: String,
    },
}

impl PlaybackFailure {
    /// Message shown to the user in place of the video.
    pub fn user_message(&self) -> String {
        match self {
            PlaybackFailure::NoLocator => "No video URL provided".to_string(),
            PlaybackFailure::UnsupportedFormat { .. } => "Failed to load video. The format might be \
                unsupported or the file might be corrupted."
                .to_string(),
            PlaybackFailure::FetchFailed { detail, .. } => {
                format!("Failed to fetch video: {}", detail)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackState {
    Loading,
    Playing,
    Paused,
    Errored(PlaybackFailure),
}

impl PlaybackState {
    pub fn is_errored(&self) -> bool {
        matches!(self, PlaybackState::Errored(_))
    }
}

#[cfg(test)]
mod tests;
