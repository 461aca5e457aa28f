use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

use super::buffer::{BufferHandle, BufferRegistry};
use super::chrome::PlayerChrome;
use super::element::{MediaElement, MediaSignal, PlayRequest};
use super::{FallbackTrigger, PlaybackFailure, PlaybackRequest, PlaybackState};
use crate::fetch::Transport;
use crate::locator::normalize;
use crate::media_type::{buffer_type, request_headers, CANDIDATE_TYPES};

/// Outcome of waiting for the element after `load()`.
enum Readiness {
    Ready,
    Failed(String),
    TimedOut,
}

/// Where a finished request ended up, plus the buffer backing it, if any.
pub(crate) struct Attempt {
    pub state: PlaybackState,
    pub buffer: Option<BufferHandle>,
}

/// Runs playback requests: direct element playback first, fetch-and-buffer on failure.
pub struct PlaybackPipeline {
    transport: Arc<dyn Transport>,
    buffers: BufferRegistry,
    load_timeout: Duration,
}

impl PlaybackPipeline {
    pub fn new(transport: Arc<dyn Transport>, buffers: BufferRegistry, load_timeout: Duration) -> Self {
        Self {
            transport,
            buffers,
            load_timeout,
        }
    }

    pub fn buffers(&self) -> &BufferRegistry {
        &self.buffers
    }

    pub(crate) async fn run(
        &self,
        element: &mut dyn MediaElement,
        chrome: &mut dyn PlayerChrome,
        state: &watch::Sender<PlaybackState>,
        request: &PlaybackRequest,
    ) -> Attempt {
        publish(state, chrome, PlaybackState::Loading);

        let locator = normalize(&request.resource_locator);
        if locator.is_empty() {
            return fail(state, chrome, PlaybackFailure::NoLocator);
        }
        tracing::info!("playing {}", locator);
        chrome.show_status("Loading video...");

        element.clear_sources();
        for media_type in CANDIDATE_TYPES {
            element.add_source(&locator, media_type);
        }
        element.load();
        request_play(element).await;

        let trigger = match self.await_ready(element).await {
            Readiness::Ready => {
                chrome.on_loaded(&element.status());
                publish(state, chrome, PlaybackState::Playing);
                return Attempt {
                    state: PlaybackState::Playing,
                    buffer: None,
                };
            }
            Readiness::Failed(detail) => {
                tracing::info!("element playback failed ({}); fetching directly", detail);
                FallbackTrigger::ElementError(detail)
            }
            Readiness::TimedOut => {
                tracing::info!(
                    "no load signal within {:?}; fetching directly",
                    self.load_timeout
                );
                FallbackTrigger::Timeout
            }
        };

        self.fallback(element, chrome, state, &locator, trigger).await
    }

    /// Fetches the whole resource, wraps it as a typed buffer, and plays that.
    async fn fallback(
        &self,
        element: &mut dyn MediaElement,
        chrome: &mut dyn PlayerChrome,
        state: &watch::Sender<PlaybackState>,
        locator: &str,
        trigger: FallbackTrigger,
    ) -> Attempt {
        chrome.show_status("Fetching video directly...");

        let fetched = match self.transport.get(locator, &request_headers()).await {
            Ok(fetched) => fetched,
            Err(e) => {
                tracing::warn!("fallback fetch of {} failed: {}", locator, e);
                let failure = PlaybackFailure::FetchFailed {
                    trigger,
                    detail: e.to_string(),
                };
                return fail(state, chrome, failure);
            }
        };

        let media_type = buffer_type(fetched.head.content_type.as_deref());
        let handle = self.buffers.register(fetched.body, media_type);

        element.clear_sources();
        element.set_source(handle.url());
        element.load();
        request_play(element).await;

        match self.await_ready(element).await {
            Readiness::Ready => {
                chrome.on_loaded(&element.status());
                publish(state, chrome, PlaybackState::Playing);
                Attempt {
                    state: PlaybackState::Playing,
                    buffer: Some(handle),
                }
            }
            Readiness::Failed(detail) => {
                tracing::warn!("buffered playback failed: {}", detail);
                element.clear_sources();
                fail(state, chrome, PlaybackFailure::UnsupportedFormat { detail })
            }
            Readiness::TimedOut => {
                tracing::warn!("buffered playback never became ready");
                element.clear_sources();
                let detail = format!("no load signal within {:?}", self.load_timeout);
                fail(state, chrome, PlaybackFailure::UnsupportedFormat { detail })
            }
        }
    }

    /// Races the element's next signal against the load timeout.
    /// Whichever loses is dropped, so a success signal cancels the timer.
    async fn await_ready(&self, element: &mut dyn MediaElement) -> Readiness {
        tokio::select! {
            signal = element.next_signal() => match signal {
                Some(MediaSignal::Loaded) | Some(MediaSignal::CanPlay) => {
                    tracing::debug!("media ready; load timer cancelled");
                    Readiness::Ready
                }
                Some(MediaSignal::Error(detail)) => Readiness::Failed(detail),
                None => Readiness::Failed("media element went away".to_string()),
            },
            _ = tokio::time::sleep(self.load_timeout) => Readiness::TimedOut,
        }
    }
}

async fn request_play(element: &mut dyn MediaElement) {
    if let PlayRequest::Refused(reason) = element.play().await {
        tracing::info!("autoplay refused ({}); controls stay available", reason);
    }
}

fn publish(state: &watch::Sender<PlaybackState>, chrome: &mut dyn PlayerChrome, next: PlaybackState) {
    chrome.on_state(&next);
    state.send_replace(next);
}

fn fail(
    state: &watch::Sender<PlaybackState>,
    chrome: &mut dyn PlayerChrome,
    failure: PlaybackFailure,
) -> Attempt {
    chrome.show_error(&failure.user_message());
    let errored = PlaybackState::Errored(failure);
    publish(state, chrome, errored.clone());
    Attempt {
        state: errored,
        buffer: None,
    }
}
