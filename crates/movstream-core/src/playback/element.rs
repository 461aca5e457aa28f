//! The media element the pipeline drives.

use async_trait::async_trait;

/// Readiness and failure signals raised by the element after `load()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaSignal {
    /// First frame is available.
    Loaded,
    CanPlay,
    Error(String),
}

/// Result of asking the element to start playing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayRequest {
    Started,
    /// Playback refused (typically pending a user gesture). Not an error.
    Refused(String),
}

/// Snapshot used to refresh progress, time and volume displays.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementStatus {
    pub current_time: f64,
    pub duration: f64,
    pub volume: f64,
    pub muted: bool,
    pub paused: bool,
}

impl Default for ElementStatus {
    fn default() -> Self {
        Self {
            current_time: 0.0,
            duration: f64::NAN,
            volume: 1.0,
            muted: false,
            paused: true,
        }
    }
}

#[async_trait]
pub trait MediaElement: Send {
    /// Removes every source, including a single assigned one.
    fn clear_sources(&mut self);

    /// Adds a candidate source; the element picks the first type it supports.
    fn add_source(&mut self, url: &str, media_type: &str);

    /// Assigns a single source, replacing candidates.
    fn set_source(&mut self, url: &str);

    /// Starts (re)loading from the current sources.
    fn load(&mut self);

    async fn play(&mut self) -> PlayRequest;

    fn pause(&mut self);

    fn status(&self) -> ElementStatus {
        ElementStatus::default()
    }

    /// Next readiness/failure signal. `None` once the element is gone.
    async fn next_signal(&mut self) -> Option<MediaSignal>;
}
