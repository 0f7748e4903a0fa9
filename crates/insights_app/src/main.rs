mod cli;
mod logging;

use anyhow::Context;
use clap::Parser;
use insights_engine::{FetchSettings, Harvester, Layout, Pipeline, PipelineConfig};
use insights_logging::{insights_info, insights_warn};

use cli::{Cli, Command};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::initialize(cli.log_destination(), cli.level());

    let layout = Layout::under(&cli.root);
    match cli.command.clone().unwrap_or_default() {
        Command::Enrich => {
            let config = PipelineConfig {
                layout,
                api: cli.api_settings(),
                ..PipelineConfig::default()
            };
            let pipeline = Pipeline::semantic_scholar(config)
                .context("could not set up the bibliographic API client")?;
            let report = pipeline
                .run()
                .await
                .with_context(|| format!("enrich run over {:?} failed", cli.root))?;
            for (file_name, outcome) in report.entries() {
                insights_info!("{}: {:?}", file_name, outcome);
            }
        }
        Command::Harvest { urls } => {
            let harvester = Harvester::with_defaults(FetchSettings::default(), layout.intake_dir);
            let stored = harvester.harvest_all(&urls).await;
            if stored.len() < urls.len() {
                insights_warn!(
                    "{} of {} pages could not be stored",
                    urls.len() - stored.len(),
                    urls.len()
                );
            }
        }
    }
    Ok(())
}
