//! Interception controller.
//!
//! For each download event: classify it, cancel the native download when
//! the user asked for that, and open a viewer carrying the locator. A
//! negative verdict leaves the download untouched.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::detect::{DetectionVerdict, Detector, DownloadEvent};
use crate::locator::{raw_viewer_address, viewer_address};
use crate::preferences::PreferencesHandle;

/// The browser's download subsystem.
#[async_trait]
pub trait DownloadSource: Send + Sync {
    /// Cancels a download. May fail if it already completed or was removed.
    async fn cancel(&self, id: u64) -> anyhow::Result<()>;
}

/// Opens viewer contexts (tabs).
#[async_trait]
pub trait ViewerLauncher: Send + Sync {
    async fn open(&self, address: &str) -> anyhow::Result<()>;
}

/// What `handle` did with an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterceptOutcome {
    /// Not QuickTime media; the native download proceeds.
    Ignored(DetectionVerdict),
    Opened {
        verdict: DetectionVerdict,
        /// Viewer address that was opened, or attempted last if both attempts failed.
        address: String,
        /// True if the native download was cancelled successfully.
        cancelled: bool,
        /// False if the launcher rejected every attempt.
        viewer_opened: bool,
    },
}

pub struct InterceptionController {
    detector: Detector,
    downloads: Arc<dyn DownloadSource>,
    launcher: Arc<dyn ViewerLauncher>,
    prefs: PreferencesHandle,
    viewer_page: String,
}

impl InterceptionController {
    pub fn new(
        detector: Detector,
        downloads: Arc<dyn DownloadSource>,
        launcher: Arc<dyn ViewerLauncher>,
        prefs: PreferencesHandle,
        viewer_page: impl Into<String>,
    ) -> Self {
        Self {
            detector,
            downloads,
            launcher,
            prefs,
            viewer_page: viewer_page.into(),
        }
    }

    /// Handles one download event. Never fails; every error is logged and absorbed.
    pub async fn handle(&self, event: DownloadEvent) -> InterceptOutcome {
        let verdict = self.detector.classify(&event).await;
        if !verdict.is_target_media {
            tracing::debug!("download {} not intercepted ({:?})", event.id, verdict.confidence_source);
            return InterceptOutcome::Ignored(verdict);
        }
        tracing::info!(
            "download {} is QuickTime media ({:?}): {}",
            event.id,
            verdict.confidence_source,
            event.url
        );

        let mut cancelled = false;
        if self.prefs.current().suppress_native_download_dialog {
            match self.downloads.cancel(event.id).await {
                Ok(()) => cancelled = true,
                Err(e) => tracing::warn!("cancel of download {} failed: {:#}", event.id, e),
            }
        }

        let (address, viewer_opened) = self.open_viewer(&event.url).await;
        InterceptOutcome::Opened {
            verdict,
            address,
            cancelled,
            viewer_opened,
        }
    }

    async fn open_viewer(&self, locator: &str) -> (String, bool) {
        let address = viewer_address(&self.viewer_page, locator);
        let err = match self.launcher.open(&address).await {
            Ok(()) => return (address, true),
            Err(e) => e,
        };
        tracing::warn!("opening viewer failed: {:#}; retrying with raw locator", err);

        let fallback = raw_viewer_address(&self.viewer_page, locator);
        match self.launcher.open(&fallback).await {
            Ok(()) => (fallback, true),
            Err(e) => {
                tracing::error!("fallback viewer open failed: {:#}", e);
                (fallback, false)
            }
        }
    }

    /// Consumes events until the channel closes, handling each on its own task.
    pub fn run(self: Arc<Self>, mut events: mpsc::Receiver<DownloadEvent>) -> JoinHandle<()> {
        tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                let this = Arc::clone(&self);
                tokio::spawn(async move {
                    this.handle(event).await;
                });
            }
            tracing::debug!("download event stream closed");
        })
    }
}
