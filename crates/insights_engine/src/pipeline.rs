use std::collections::VecDeque;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use insights_core::{update, Effect, FileJob, FileOutcome, Msg, RunReport, SkipReason};
use insights_logging::{insights_info, insights_warn};
use thiserror::Error;

use crate::http::ApiSettings;
use crate::layout::Layout;
use crate::persist::{move_into, AtomicFileWriter, PersistError};
use crate::scholar::{RecordFetcher, RecordResolver, SemanticScholar};
use crate::types::ApiError;

/// Pause after each search and each record lookup.
pub const DEFAULT_THROTTLE: Duration = Duration::from_secs(1);

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("directory layout unusable: {0}")]
    Layout(#[from] PersistError),
    #[error("api client unavailable: {0}")]
    Api(#[from] ApiError),
}

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub layout: Layout,
    pub api: ApiSettings,
    pub throttle: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            layout: Layout::default(),
            api: ApiSettings::default(),
            throttle: DEFAULT_THROTTLE,
        }
    }
}

/// Enriches intake files one at a time and moves them along the directory queues.
pub struct Pipeline {
    layout: Layout,
    throttle: Duration,
    resolver: Arc<dyn RecordResolver>,
    fetcher: Arc<dyn RecordFetcher>,
}

impl Pipeline {
    pub fn new(
        config: PipelineConfig,
        resolver: Arc<dyn RecordResolver>,
        fetcher: Arc<dyn RecordFetcher>,
    ) -> Self {
        Self {
            layout: config.layout,
            throttle: config.throttle,
            resolver,
            fetcher,
        }
    }

    /// Pipeline backed by one Semantic Scholar client for both steps.
    pub fn semantic_scholar(config: PipelineConfig) -> Result<Self, PipelineError> {
        let client = Arc::new(SemanticScholar::new(&config.api)?);
        Ok(Self::new(config, client.clone(), client))
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// One pass over the current intake listing.
    pub async fn run(&self) -> Result<RunReport, PipelineError> {
        self.layout.ensure()?;
        let mut report = RunReport::new();
        for path in self.layout.intake_files()? {
            let job = self.process_file(&path).await;
            report.record(&job);
        }
        insights_info!(
            "Run finished: {} moved, {} skipped",
            report.moved_count(),
            report.skipped_count()
        );
        Ok(report)
    }

    /// Drive one file from Pending to Moved or Skipped.
    pub async fn process_file(&self, path: &Path) -> FileJob {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mut job = FileJob::new(file_name);

        let first = match fs::read_to_string(path) {
            Ok(content) => Msg::ContentLoaded(content),
            Err(err) => {
                insights_warn!("Cannot read {:?}: {}", path, err);
                Msg::StepFailed {
                    reason: SkipReason::ReadFailed,
                }
            }
        };

        let mut inbox = VecDeque::from([first]);
        while let Some(msg) = inbox.pop_front() {
            let (next, effects) = update(job, msg);
            job = next;
            for effect in effects {
                let reply = self.execute(path, effect).await;
                inbox.push_back(reply);
            }
        }

        match job.outcome() {
            Some(FileOutcome::Moved { paper_id }) => {
                insights_info!("{} enriched as {}.txt", job.file_name(), paper_id)
            }
            Some(FileOutcome::Skipped { reason }) => {
                insights_warn!("Skipping {}: {}; left in intake", job.file_name(), reason)
            }
            None => {}
        }
        job
    }

    async fn execute(&self, source: &Path, effect: Effect) -> Msg {
        match effect {
            Effect::ResolveTitle { title } => {
                insights_info!("Captured title {:?}", title);
                let result = self.resolver.resolve(&title).await;
                self.pause().await;
                match result {
                    Ok(paper_id) => Msg::TitleResolved { paper_id },
                    Err(err) => {
                        insights_warn!("Search for {:?} failed: {}", title, err);
                        Msg::StepFailed {
                            reason: SkipReason::ResolveFailed,
                        }
                    }
                }
            }
            Effect::FetchRecord { paper_id } => {
                let result = self.fetcher.fetch(&paper_id).await;
                self.pause().await;
                match result {
                    Ok(record) => {
                        if let Some(record) = &record {
                            insights_info!("Fetched record {:?}", record.title);
                        }
                        Msg::RecordFetched { record }
                    }
                    Err(err) => {
                        insights_warn!("Lookup of {} failed: {}", paper_id, err);
                        Msg::StepFailed {
                            reason: SkipReason::FetchFailed,
                        }
                    }
                }
            }
            Effect::WriteEnriched { file_name, content } => {
                let writer = AtomicFileWriter::new(self.layout.collection_dir.clone());
                match writer.write(&file_name, &content) {
                    Ok(path) => {
                        insights_info!("Writing {:?}", path);
                        Msg::EnrichedWritten
                    }
                    Err(err) => {
                        insights_warn!("Cannot write {}: {}", file_name, err);
                        Msg::StepFailed {
                            reason: SkipReason::WriteFailed,
                        }
                    }
                }
            }
            Effect::MoveToProcessed { file_name } => {
                match move_into(source, &self.layout.processed_dir) {
                    Ok(path) => {
                        insights_info!("Moved {} to {:?}", file_name, path);
                        Msg::SourceMoved
                    }
                    Err(err) => {
                        insights_warn!("Cannot move {}: {}", file_name, err);
                        Msg::StepFailed {
                            reason: SkipReason::MoveFailed,
                        }
                    }
                }
            }
        }
    }

    async fn pause(&self) {
        if !self.throttle.is_zero() {
            tokio::time::sleep(self.throttle).await;
        }
    }
}
