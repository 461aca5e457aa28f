//! A media element without a decoder, for command-line and test use.
//!
//! It cannot stream remote sources, so every request goes through the
//! fetch-and-buffer path; a buffer "loads" when it carries a video type and
//! starts with a QuickTime/MP4 atom header.

use async_trait::async_trait;
use std::sync::Arc;

use super::buffer::{BufferRegistry, MediaBuffer};
use super::element::{ElementStatus, MediaElement, MediaSignal, PlayRequest};
use crate::media_type::{essence, looks_like_quicktime};

pub struct HeadlessElement {
    registry: BufferRegistry,
    candidates: Vec<(String, String)>,
    assigned: Option<String>,
    loaded: Option<Arc<MediaBuffer>>,
    pending: Option<MediaSignal>,
    paused: bool,
}

impl HeadlessElement {
    pub fn new(registry: BufferRegistry) -> Self {
        Self {
            registry,
            candidates: Vec::new(),
            assigned: None,
            loaded: None,
            pending: None,
            paused: true,
        }
    }

    /// Buffer currently loaded, if any.
    pub fn loaded(&self) -> Option<&MediaBuffer> {
        self.loaded.as_deref()
    }

    fn load_assigned(&self, url: &str) -> Result<Arc<MediaBuffer>, String> {
        if !BufferRegistry::is_handle(url) {
            return Err(format!("cannot stream remote source {}", url));
        }
        let buffer = self
            .registry
            .resolve(url)
            .ok_or_else(|| format!("{} was released", url))?;
        if !essence(&buffer.content_type).starts_with("video/") {
            return Err(format!("unsupported type {}", buffer.content_type));
        }
        if !looks_like_quicktime(&buffer.bytes) {
            return Err("not a QuickTime/MP4 container".to_string());
        }
        Ok(buffer)
    }
}

#[async_trait]
impl MediaElement for HeadlessElement {
    fn clear_sources(&mut self) {
        self.candidates.clear();
        self.assigned = None;
        self.loaded = None;
        self.pending = None;
        self.paused = true;
    }

    fn add_source(&mut self, url: &str, media_type: &str) {
        self.candidates.push((url.to_string(), media_type.to_string()));
    }

    fn set_source(&mut self, url: &str) {
        self.candidates.clear();
        self.assigned = Some(url.to_string());
    }

    fn load(&mut self) {
        self.loaded = None;
        let signal = match (&self.assigned, self.candidates.first()) {
            (Some(url), _) => match self.load_assigned(url) {
                Ok(buffer) => {
                    self.loaded = Some(buffer);
                    MediaSignal::Loaded
                }
                Err(detail) => MediaSignal::Error(detail),
            },
            (None, Some((url, _))) => {
                MediaSignal::Error(format!("cannot stream remote source {}", url))
            }
            (None, None) => MediaSignal::Error("no source".to_string()),
        };
        self.pending = Some(signal);
    }

    async fn play(&mut self) -> PlayRequest {
        self.paused = false;
        PlayRequest::Started
    }

    fn pause(&mut self) {
        self.paused = true;
    }

    fn status(&self) -> ElementStatus {
        ElementStatus {
            paused: self.paused,
            ..ElementStatus::default()
        }
    }

    async fn next_signal(&mut self) -> Option<MediaSignal> {
        match self.pending.take() {
            Some(signal) => Some(signal),
            None => std::future::pending().await,
        }
    }
}
