use std::path::PathBuf;

use clap::{Parser, Subcommand};
use insights_engine::{ApiSettings, DEFAULT_API_BASE, DEFAULT_ROOT};
use log::LevelFilter;

use crate::logging::LogDestination;

/// Match harvested blog posts to scholarly papers and enrich them.
#[derive(Debug, Parser)]
#[command(name = "insights", version)]
pub struct Cli {
    /// Intake directory; `collection/` and `processed/` live inside it.
    #[arg(long, default_value = DEFAULT_ROOT)]
    pub root: PathBuf,

    /// Base URL of the bibliographic API.
    #[arg(long, default_value = DEFAULT_API_BASE)]
    pub api_base: String,

    /// Log at debug level.
    #[arg(long, short)]
    pub verbose: bool,

    /// Also write logs to ./insights.log.
    #[arg(long)]
    pub log_file: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Default, Subcommand)]
pub enum Command {
    /// Enrich every intake file once (default).
    #[default]
    Enrich,
    /// Fetch post pages and write their text to the intake directory.
    Harvest {
        #[arg(required = true)]
        urls: Vec<String>,
    },
}

impl Cli {
    pub fn level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    }

    pub fn log_destination(&self) -> LogDestination {
        if self.log_file {
            LogDestination::Both
        } else {
            LogDestination::Terminal
        }
    }

    pub fn api_settings(&self) -> ApiSettings {
        ApiSettings {
            base_url: self.api_base.clone(),
            ..ApiSettings::default()
        }
    }
}
