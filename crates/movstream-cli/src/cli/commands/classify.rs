//! `movstream classify <url>` – run the detection cascade.

use anyhow::Result;
use movstream_core::config::MovConfig;
use movstream_core::detect::Detector;
use movstream_core::fetch::CurlTransport;
use std::sync::Arc;

use super::download_event;
use crate::cli::EventArgs;

pub async fn run_classify(cfg: &MovConfig, args: &EventArgs) -> Result<()> {
    let detector = Detector::new(Arc::new(CurlTransport::new(cfg)), cfg.probe_timeout());
    let verdict = detector.classify(&download_event(0, args)).await;
    println!(
        "{:<8} {:?}",
        if verdict.is_target_media { "quicktime" } else { "other" },
        verdict.confidence_source
    );
    Ok(())
}
