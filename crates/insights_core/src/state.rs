use std::fmt;

use crate::report::FileOutcome;
use crate::title::CandidateTitle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Pending,
    TitleExtracted,
    Resolved,
    Fetched,
    Enriched,
    Moved,
    Skipped(SkipReason),
}

impl Stage {
    pub fn is_terminal(self) -> bool {
        matches!(self, Stage::Moved | Stage::Skipped(_))
    }
}

/// Why a file was left in the intake directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    ReadFailed,
    NoTitle,
    ResolveFailed,
    NoMatch,
    UnsafePaperId,
    FetchFailed,
    WriteFailed,
    MoveFailed,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::ReadFailed => write!(f, "could not read file"),
            SkipReason::NoTitle => write!(f, "no quoted title found"),
            SkipReason::ResolveFailed => write!(f, "search request failed"),
            SkipReason::NoMatch => write!(f, "no search hit above threshold"),
            SkipReason::UnsafePaperId => write!(f, "paper id is not a plain file name"),
            SkipReason::FetchFailed => write!(f, "record fetch failed"),
            SkipReason::WriteFailed => write!(f, "could not write enriched file"),
            SkipReason::MoveFailed => write!(f, "could not move file to processed"),
        }
    }
}

/// One intake file travelling through the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct FileJob {
    file_name: String,
    stage: Stage,
    content: Option<String>,
    title: Option<CandidateTitle>,
    paper_id: Option<String>,
    enriched: Option<String>,
}

impl FileJob {
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            stage: Stage::Pending,
            content: None,
            title: None,
            paper_id: None,
            enriched: None,
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Content after byline stripping, once loaded.
    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    pub fn title(&self) -> Option<&CandidateTitle> {
        self.title.as_ref()
    }

    pub fn paper_id(&self) -> Option<&str> {
        self.paper_id.as_deref()
    }

    pub fn enriched(&self) -> Option<&str> {
        self.enriched.as_deref()
    }

    /// Final outcome, or `None` while the job is still in flight.
    pub fn outcome(&self) -> Option<FileOutcome> {
        match self.stage {
            Stage::Moved => Some(FileOutcome::Moved {
                paper_id: self.paper_id.clone().unwrap_or_default(),
            }),
            Stage::Skipped(reason) => Some(FileOutcome::Skipped { reason }),
            _ => None,
        }
    }

    pub(crate) fn set_stage(&mut self, stage: Stage) {
        self.stage = stage;
    }

    pub(crate) fn skip(&mut self, reason: SkipReason) {
        self.stage = Stage::Skipped(reason);
    }

    pub(crate) fn set_content(&mut self, content: String) {
        self.content = Some(content);
    }

    pub(crate) fn set_title(&mut self, title: CandidateTitle) {
        self.title = Some(title);
    }

    pub(crate) fn set_paper_id(&mut self, paper_id: String) {
        self.paper_id = Some(paper_id);
    }

    pub(crate) fn set_enriched(&mut self, enriched: String) {
        self.enriched = Some(enriched);
    }
}
