//! CLI for pdgrab.

mod commands;
mod session;

use anyhow::Result;
use clap::{Parser, Subcommand};
use pdgrab_core::config;
use std::path::Path;

use commands::{run_classify, run_clear, run_import_har, run_list, run_pick, run_replay};

/// Top-level CLI for pdgrab.
#[derive(Debug, Parser)]
#[command(name = "pdgrab")]
#[command(
    about = "pdgrab: find progressive download URLs behind HLS lecture streams",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Classify one request URL and print its progressive download URL.
    Classify {
        /// Request URL as seen by the browser.
        url: String,
    },

    /// Import a HAR file and record the stream candidates it contains.
    ImportHar {
        /// Path to the HAR file.
        path: String,

        /// Tab id to record captures under.
        #[arg(long, default_value = "1", value_name = "ID")]
        tab: i64,

        /// Give each HAR page its own tab, numbered upward from --tab.
        #[arg(long)]
        per_page: bool,
    },

    /// Replay a JSON-lines browser event log (requests and tab lifecycle).
    Replay {
        /// Path to the event log.
        path: String,
    },

    /// List recorded captures.
    List {
        /// Only show this tab.
        #[arg(long, value_name = "ID")]
        tab: Option<i64>,
    },

    /// Print the download URL and a file name for one capture.
    Pick {
        /// Tab id.
        tab: i64,

        /// 1-based position as shown by `list`.
        index: usize,

        /// Page or lecture title to derive the file name from.
        #[arg(long)]
        title: Option<String>,
    },

    /// Clear all captures of a tab.
    Clear {
        /// Tab id.
        tab: i64,
    },
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Classify { url } => run_classify(&url)?,
            CliCommand::ImportHar {
                path,
                tab,
                per_page,
            } => run_import_har(&cfg, Path::new(&path), tab, per_page).await?,
            CliCommand::Replay { path } => run_replay(&cfg, Path::new(&path)).await?,
            CliCommand::List { tab } => run_list(&cfg, tab)?,
            CliCommand::Pick { tab, index, title } => {
                run_pick(&cfg, tab, index, title.as_deref())?
            }
            CliCommand::Clear { tab } => run_clear(&cfg, tab).await?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
