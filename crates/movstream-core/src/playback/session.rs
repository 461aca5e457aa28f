//! One viewer context: an element, its chrome, and at most one active request.

use std::sync::Arc;
use tokio::sync::watch;

use super::buffer::BufferHandle;
use super::chrome::PlayerChrome;
use super::element::{MediaElement, PlayRequest};
use super::pipeline::PlaybackPipeline;
use super::{PlaybackRequest, PlaybackState};
use crate::preferences::PreferencesHandle;

pub struct ViewerSession<E: MediaElement, C: PlayerChrome> {
    pipeline: Arc<PlaybackPipeline>,
    element: E,
    chrome: C,
    prefs: PreferencesHandle,
    state: watch::Sender<PlaybackState>,
    request: Option<PlaybackRequest>,
    buffer: Option<BufferHandle>,
}

impl<E: MediaElement, C: PlayerChrome> ViewerSession<E, C> {
    pub fn new(pipeline: Arc<PlaybackPipeline>, element: E, chrome: C, prefs: PreferencesHandle) -> Self {
        let (state, _rx) = watch::channel(PlaybackState::Loading);
        Self {
            pipeline,
            element,
            chrome,
            prefs,
            state,
            request: None,
            buffer: None,
        }
    }

    /// Observes state transitions.
    pub fn subscribe(&self) -> watch::Receiver<PlaybackState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> PlaybackState {
        self.state.borrow().clone()
    }

    pub fn request(&self) -> Option<&PlaybackRequest> {
        self.request.as_ref()
    }

    /// Buffer backing the current request, if the fallback was used.
    pub fn buffer(&self) -> Option<&BufferHandle> {
        self.buffer.as_ref()
    }

    pub fn element(&self) -> &E {
        &self.element
    }

    pub fn chrome(&self) -> &C {
        &self.chrome
    }

    /// Starts a request, replacing (and releasing) any previous one.
    pub async fn open(&mut self, request: PlaybackRequest) -> PlaybackState {
        self.release();
        self.chrome.apply_preferences(&self.prefs.current());
        let attempt = self
            .pipeline
            .run(&mut self.element, &mut self.chrome, &self.state, &request)
            .await;
        self.request = Some(request);
        self.buffer = attempt.buffer;
        attempt.state
    }

    /// Opens the locator carried in a viewer address fragment.
    pub async fn open_address(&mut self, address: &str) -> PlaybackState {
        self.open(PlaybackRequest::from_viewer_address(address)).await
    }

    /// User play/pause toggle. Only meaningful while Playing or Paused.
    pub async fn toggle_play_pause(&mut self) -> PlaybackState {
        let next = match self.state() {
            PlaybackState::Playing => {
                self.element.pause();
                PlaybackState::Paused
            }
            PlaybackState::Paused => {
                if let PlayRequest::Refused(reason) = self.element.play().await {
                    tracing::info!("resume refused: {}", reason);
                    return PlaybackState::Paused;
                }
                PlaybackState::Playing
            }
            other => return other,
        };
        self.chrome.on_state(&next);
        self.state.send_replace(next.clone());
        next
    }

    /// Re-applies preferences to the chrome (call after a preference change).
    pub fn refresh_preferences(&mut self) {
        self.chrome.apply_preferences(&self.prefs.current());
    }

    /// Closes the viewer, releasing any buffer.
    pub fn close(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if self.buffer.is_some() || self.request.is_some() {
            self.element.clear_sources();
        }
        self.buffer = None;
        self.request = None;
    }
}
