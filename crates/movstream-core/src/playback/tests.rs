use super::*;
use crate::preferences::{Preferences, PreferencesHandle};
use crate::test_support::{head_with, Reply, ScriptedTransport};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

const TIMEOUT: Duration = Duration::from_secs(15);

/// Element whose signals are scripted per `load()` call. `None` means it stays silent.
#[derive(Default)]
struct ScriptedElement {
    script: VecDeque<Option<MediaSignal>>,
    pending: Option<MediaSignal>,
    sources: Vec<(String, String)>,
    assigned: Option<String>,
    loads: usize,
    refuse_first_play: bool,
    plays: usize,
    pauses: usize,
}

impl ScriptedElement {
    fn new(script: Vec<Option<MediaSignal>>) -> Self {
        Self {
            script: script.into(),
            ..Default::default()
        }
    }
}

#[async_trait]
impl MediaElement for ScriptedElement {
    fn clear_sources(&mut self) {
        self.sources.clear();
        self.assigned = None;
    }

    fn add_source(&mut self, url: &str, media_type: &str) {
        self.sources.push((url.to_string(), media_type.to_string()));
    }

    fn set_source(&mut self, url: &str) {
        self.assigned = Some(url.to_string());
    }

    fn load(&mut self) {
        self.loads += 1;
        self.pending = self.script.pop_front().flatten();
    }

    async fn play(&mut self) -> PlayRequest {
        self.plays += 1;
        if self.refuse_first_play && self.plays == 1 {
            PlayRequest::Refused("user gesture required".into())
        } else {
            PlayRequest::Started
        }
    }

    fn pause(&mut self) {
        self.pauses += 1;
    }

    async fn next_signal(&mut self) -> Option<MediaSignal> {
        match self.pending.take() {
            Some(signal) => Some(signal),
            None => std::future::pending().await,
        }
    }
}

#[derive(Default)]
struct RecordingChrome {
    prefs: Option<Preferences>,
    statuses: Vec<String>,
    errors: Vec<String>,
    loaded: usize,
    states: Vec<PlaybackState>,
}

impl PlayerChrome for RecordingChrome {
    fn apply_preferences(&mut self, prefs: &Preferences) {
        self.prefs = Some(*prefs);
    }

    fn show_status(&mut self, message: &str) {
        self.statuses.push(message.to_string());
    }

    fn on_loaded(&mut self, _status: &ElementStatus) {
        self.loaded += 1;
    }

    fn show_error(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }

    fn on_state(&mut self, state: &PlaybackState) {
        self.states.push(state.clone());
    }
}

struct Fixture {
    session: ViewerSession<ScriptedElement, RecordingChrome>,
    transport: Arc<ScriptedTransport>,
    buffers: BufferRegistry,
}

fn fixture(element: ScriptedElement, get: Reply) -> Fixture {
    let transport = Arc::new(ScriptedTransport::new(Reply::Status(500), get));
    let buffers = BufferRegistry::new();
    let pipeline = Arc::new(PlaybackPipeline::new(transport.clone(), buffers.clone(), TIMEOUT));
    let session = ViewerSession::new(
        pipeline,
        element,
        RecordingChrome::default(),
        PreferencesHandle::fixed(Preferences::default()),
    );
    Fixture {
        session,
        transport,
        buffers,
    }
}

fn mov_body(content_type: Option<&str>) -> Reply {
    Reply::Ok(head_with(content_type, None), vec![0, 0, 0, 20, b'f', b't', b'y', b'p'])
}

#[tokio::test(start_paused = true)]
async fn can_play_before_timeout_never_fetches() {
    let mut f = fixture(
        ScriptedElement::new(vec![Some(MediaSignal::CanPlay)]),
        mov_body(Some("video/quicktime")),
    );
    let state = f.session.open(PlaybackRequest::new("https://cdn.test/clip.mov")).await;
    assert_eq!(state, PlaybackState::Playing);

    tokio::time::advance(TIMEOUT * 4).await;
    tokio::task::yield_now().await;

    assert_eq!(f.transport.count("GET"), 0);
    assert_eq!(f.session.state(), PlaybackState::Playing);
    assert!(f.session.buffer().is_none());
    assert_eq!(f.session.chrome().loaded, 1);

    let types: Vec<&str> = f.session.element().sources.iter().map(|(_, t)| t.as_str()).collect();
    assert_eq!(
        types,
        [
            "video/quicktime",
            "video/mp4",
            "video/x-m4v",
            "video/mpeg",
            "application/octet-stream"
        ]
    );
    assert!(f
        .session
        .element()
        .sources
        .iter()
        .all(|(u, _)| u == "https://cdn.test/clip.mov"));
}

#[tokio::test(start_paused = true)]
async fn timeout_issues_one_fetch_and_404_is_fetch_failure() {
    let mut f = fixture(ScriptedElement::new(vec![None]), Reply::Status(404));
    let request = PlaybackRequest::new("https%3A%2F%2Fgithub.com%2Fu%2Fr%2Fblob%2Fmain%2Ff.mov");
    let state = f.session.open(request).await;

    let calls = f.transport.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].method, "GET");
    assert_eq!(calls[0].url, "https://raw.githubusercontent.com/u/r/main/f.mov");
    assert_eq!(calls[0].accept.as_deref(), Some("video/quicktime,video/mp4,*/*"));

    let PlaybackState::Errored(failure) = state else {
        panic!("expected Errored, got {state:?}");
    };
    assert_eq!(
        failure,
        PlaybackFailure::FetchFailed {
            trigger: FallbackTrigger::Timeout,
            detail: "HTTP 404".to_string(),
        }
    );
    assert_eq!(failure.user_message(), "Failed to fetch video: HTTP 404");
    assert_eq!(f.session.chrome().errors, vec!["Failed to fetch video: HTTP 404".to_string()]);
    assert!(f.buffers.is_empty());
}

#[tokio::test(start_paused = true)]
async fn element_error_falls_back_to_typed_buffer() {
    let mut f = fixture(
        ScriptedElement::new(vec![
            Some(MediaSignal::Error("MEDIA_ERR_SRC_NOT_SUPPORTED".into())),
            Some(MediaSignal::Loaded),
        ]),
        mov_body(Some("application/octet-stream")),
    );
    let state = f.session.open(PlaybackRequest::new("https://cdn.test/get?id=1")).await;
    assert_eq!(state, PlaybackState::Playing);
    assert_eq!(f.transport.count("GET"), 1);

    let handle = f.session.buffer().expect("fallback buffer");
    assert_eq!(handle.content_type(), "video/mp4");
    assert_eq!(handle.size(), 8);
    assert_eq!(f.session.element().assigned.as_deref(), Some(handle.url()));
    assert!(f.session.element().sources.is_empty());
    assert_eq!(f.buffers.len(), 1);
    assert!(f
        .session
        .chrome()
        .statuses
        .contains(&"Fetching video directly...".to_string()));
}

#[tokio::test(start_paused = true)]
async fn declared_video_type_is_kept_for_buffer() {
    let mut f = fixture(
        ScriptedElement::new(vec![None, Some(MediaSignal::CanPlay)]),
        mov_body(Some("video/quicktime")),
    );
    f.session.open(PlaybackRequest::new("https://cdn.test/v")).await;
    assert_eq!(f.session.buffer().unwrap().content_type(), "video/quicktime");
}

#[tokio::test(start_paused = true)]
async fn buffered_decode_failure_is_unsupported_format() {
    let mut f = fixture(
        ScriptedElement::new(vec![
            Some(MediaSignal::Error("decode".into())),
            Some(MediaSignal::Error("decode".into())),
        ]),
        mov_body(None),
    );
    let state = f.session.open(PlaybackRequest::new("https://cdn.test/broken.mov")).await;
    assert!(matches!(
        state,
        PlaybackState::Errored(PlaybackFailure::UnsupportedFormat { .. })
    ));
    assert!(f.buffers.is_empty(), "failed buffer must be released");
    assert!(f.session.chrome().errors[0].contains("unsupported"));
}

#[tokio::test(start_paused = true)]
async fn new_request_and_close_release_buffer() {
    let mut f = fixture(
        ScriptedElement::new(vec![
            Some(MediaSignal::Error("x".into())),
            Some(MediaSignal::Loaded),
            Some(MediaSignal::CanPlay),
        ]),
        mov_body(Some("video/mp4")),
    );
    f.session.open(PlaybackRequest::new("https://cdn.test/a")).await;
    assert_eq!(f.buffers.len(), 1);

    let state = f.session.open(PlaybackRequest::new("https://cdn.test/b.mov")).await;
    assert_eq!(state, PlaybackState::Playing);
    assert!(f.buffers.is_empty());

    let buffers = f.buffers.clone();
    f.session.close();
    assert!(buffers.is_empty());
}

#[tokio::test(start_paused = true)]
async fn autoplay_refusal_is_not_an_error() {
    let mut element = ScriptedElement::new(vec![Some(MediaSignal::Loaded)]);
    element.refuse_first_play = true;
    let mut f = fixture(element, Reply::Status(500));
    let state = f.session.open(PlaybackRequest::new("https://cdn.test/a.mov")).await;
    assert_eq!(state, PlaybackState::Playing);
    assert_eq!(f.transport.count("GET"), 0);

    assert_eq!(f.session.toggle_play_pause().await, PlaybackState::Paused);
    assert_eq!(f.session.element().pauses, 1);
    assert_eq!(f.session.toggle_play_pause().await, PlaybackState::Playing);
}

#[tokio::test(start_paused = true)]
async fn missing_locator_errors_without_io() {
    let mut f = fixture(ScriptedElement::new(Vec::new()), Reply::Status(500));
    let state = f.session.open_address("player.html").await;
    assert_eq!(state, PlaybackState::Errored(PlaybackFailure::NoLocator));
    assert!(f.transport.calls().is_empty());
    assert_eq!(f.session.element().loads, 0);

    assert_eq!(f.session.toggle_play_pause().await, state);
}

#[tokio::test(start_paused = true)]
async fn states_are_observable_and_prefs_applied() {
    let mut f = fixture(ScriptedElement::new(vec![None]), Reply::Status(503));
    let rx = f.session.subscribe();
    f.session
        .open_address("player.html#https%3A%2F%2Fcdn.test%2Fclip.mov")
        .await;
    assert!(rx.borrow().is_errored());
    let chrome = f.session.chrome();
    assert_eq!(chrome.prefs, Some(Preferences::default()));
    assert_eq!(chrome.states.first(), Some(&PlaybackState::Loading));
    assert!(chrome.states.last().unwrap().is_errored());
}
