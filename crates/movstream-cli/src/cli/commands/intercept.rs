//! `movstream intercept <url>` – simulate a download event end to end.

use anyhow::Result;
use async_trait::async_trait;
use movstream_core::config::MovConfig;
use movstream_core::detect::Detector;
use movstream_core::fetch::CurlTransport;
use movstream_core::intercept::{
    DownloadSource, InterceptOutcome, InterceptionController, ViewerLauncher,
};
use movstream_core::preferences::PreferenceStore;
use std::sync::Arc;

use super::download_event;
use crate::cli::EventArgs;

/// Reports cancellations instead of touching a browser.
struct PrintDownloads;

#[async_trait]
impl DownloadSource for PrintDownloads {
    async fn cancel(&self, id: u64) -> Result<()> {
        println!("cancel download {id}");
        Ok(())
    }
}

struct PrintLauncher;

#[async_trait]
impl ViewerLauncher for PrintLauncher {
    async fn open(&self, address: &str) -> Result<()> {
        println!("open {address}");
        Ok(())
    }
}

pub async fn run_intercept(cfg: &MovConfig, args: &EventArgs, id: u64) -> Result<()> {
    let store = PreferenceStore::open_default()?;
    let detector = Detector::new(Arc::new(CurlTransport::new(cfg)), cfg.probe_timeout());
    let controller = InterceptionController::new(
        detector,
        Arc::new(PrintDownloads),
        Arc::new(PrintLauncher),
        store.subscribe(),
        cfg.viewer_page.clone(),
    );

    match controller.handle(download_event(id, args)).await {
        InterceptOutcome::Ignored(verdict) => {
            println!("not intercepted ({:?}); download proceeds", verdict.confidence_source);
        }
        InterceptOutcome::Opened {
            verdict,
            viewer_opened,
            ..
        } => {
            println!("intercepted via {:?}", verdict.confidence_source);
            if !viewer_opened {
                anyhow::bail!("viewer could not be opened");
            }
        }
    }
    Ok(())
}
