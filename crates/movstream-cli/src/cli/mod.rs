//! CLI for the MovStream pipelines.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use movstream_core::config;

use commands::{run_classify, run_intercept, run_play, run_prefs_set, run_prefs_show};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "movstream")]
#[command(about = "MovStream: detect QuickTime downloads and play them inline", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

/// Fields of a simulated download event.
#[derive(Debug, Clone, clap::Args)]
pub struct EventArgs {
    /// Download URL.
    pub url: String,
    /// MIME type reported by the browser.
    #[arg(long)]
    pub mime: Option<String>,
    /// Filename suggested by the browser.
    #[arg(long)]
    pub filename: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Run the detection cascade for a URL and print the verdict.
    Classify {
        #[command(flatten)]
        event: EventArgs,
    },

    /// Simulate a download event: detect, cancel if configured, and print the viewer address.
    Intercept {
        #[command(flatten)]
        event: EventArgs,
        /// Download identifier.
        #[arg(long, default_value = "1")]
        id: u64,
    },

    /// Fetch and buffer a locator (or viewer address) in a headless viewer.
    Play {
        /// Media URL, or a viewer address such as `player.html#<encoded url>`.
        locator: String,
        /// Seconds to wait for the element before falling back (default from config).
        #[arg(long, value_name = "SECS")]
        timeout: Option<u64>,
    },

    /// Show or change preferences.
    Prefs {
        #[command(subcommand)]
        action: PrefsAction,
    },
}

#[derive(Debug, Subcommand)]
pub enum PrefsAction {
    /// Print all preferences.
    Show,
    /// Set one preference, e.g. `prefs set suppressNativeDownloadDialog true`.
    Set { key: String, value: String },
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Classify { event } => run_classify(&cfg, &event).await?,
            CliCommand::Intercept { event, id } => run_intercept(&cfg, &event, id).await?,
            CliCommand::Play { locator, timeout } => run_play(&cfg, &locator, timeout).await?,
            CliCommand::Prefs { action } => match action {
                PrefsAction::Show => run_prefs_show()?,
                PrefsAction::Set { key, value } => run_prefs_set(&key, &value)?,
            },
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
