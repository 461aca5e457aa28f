//! CLI command handlers, one file per command.

mod classify;
mod intercept;
mod play;
mod prefs;

pub use classify::run_classify;
pub use intercept::run_intercept;
pub use play::run_play;
pub use prefs::{run_prefs_set, run_prefs_show};

use super::EventArgs;
use movstream_core::detect::DownloadEvent;

pub(crate) fn download_event(id: u64, args: &EventArgs) -> DownloadEvent {
    DownloadEvent {
        id,
        url: args.url.clone(),
        mime_hint: args.mime.clone(),
        suggested_filename: args.filename.clone(),
    }
}
