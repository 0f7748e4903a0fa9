use crate::state::{FileJob, SkipReason};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    Moved { paper_id: String },
    Skipped { reason: SkipReason },
}

/// Outcome of one pass over the intake directory.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunReport {
    entries: Vec<(String, FileOutcome)>,
}

impl RunReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a finished job. Jobs still in flight are ignored.
    pub fn record(&mut self, job: &FileJob) {
        if let Some(outcome) = job.outcome() {
            self.entries.push((job.file_name().to_string(), outcome));
        }
    }

    pub fn entries(&self) -> &[(String, FileOutcome)] {
        &self.entries
    }

    pub fn outcome_for(&self, file_name: &str) -> Option<&FileOutcome> {
        self.entries
            .iter()
            .find(|(name, _)| name == file_name)
            .map(|(_, outcome)| outcome)
    }

    pub fn moved_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|(_, outcome)| matches!(outcome, FileOutcome::Moved { .. }))
            .count()
    }

    pub fn skipped_count(&self) -> usize {
        self.entries.len() - self.moved_count()
    }
}
