//! `movstream play <locator>` – run the playback pipeline headlessly.

use anyhow::Result;
use movstream_core::config::MovConfig;
use movstream_core::fetch::CurlTransport;
use movstream_core::playback::{
    format_clock, BufferRegistry, ElementStatus, HeadlessElement, PlaybackPipeline,
    PlaybackRequest, PlaybackState, PlayerChrome, ViewerSession,
};
use movstream_core::preferences::{PreferenceStore, Preferences};
use std::sync::Arc;
use std::time::Duration;

/// Prints pipeline progress to stdout.
struct ConsoleChrome;

impl PlayerChrome for ConsoleChrome {
    fn apply_preferences(&mut self, prefs: &Preferences) {
        tracing::debug!(
            "chrome: custom controls {}, dark theme {}",
            prefs.use_custom_controls,
            prefs.use_dark_theme
        );
    }

    fn show_status(&mut self, message: &str) {
        println!("{message}");
    }

    fn on_loaded(&mut self, status: &ElementStatus) {
        println!(
            "ready {} / {}",
            format_clock(status.current_time),
            format_clock(status.duration)
        );
    }

    fn show_error(&mut self, message: &str) {
        eprintln!("{message}");
    }
}

/// A viewer address has its `#` before any scheme separator.
pub(crate) fn request_for(input: &str) -> PlaybackRequest {
    match input.split_once('#') {
        Some((page, _)) if !page.contains("://") => PlaybackRequest::from_viewer_address(input),
        _ => PlaybackRequest::new(input),
    }
}

pub async fn run_play(cfg: &MovConfig, locator: &str, timeout: Option<u64>) -> Result<()> {
    let store = PreferenceStore::open_default()?;
    let load_timeout = timeout.map(Duration::from_secs).unwrap_or_else(|| cfg.load_timeout());
    let buffers = BufferRegistry::new();
    let pipeline = Arc::new(PlaybackPipeline::new(
        Arc::new(CurlTransport::new(cfg)),
        buffers.clone(),
        load_timeout,
    ));
    let mut session = ViewerSession::new(
        pipeline,
        HeadlessElement::new(buffers),
        ConsoleChrome,
        store.subscribe(),
    );

    match session.open(request_for(locator)).await {
        PlaybackState::Errored(failure) => anyhow::bail!("{}", failure.user_message()),
        state => {
            if let Some(handle) = session.buffer() {
                println!(
                    "{:?}: {} bytes buffered as {} ({})",
                    state,
                    handle.size(),
                    handle.content_type(),
                    handle.url()
                );
            } else {
                println!("{:?}", state);
            }
        }
    }
    session.close();
    Ok(())
}
