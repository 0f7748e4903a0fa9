use crate::record::PaperRecord;
use crate::state::SkipReason;

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// Raw file content was read from the intake directory.
    ContentLoaded(String),
    /// Search finished; `None` when no hit cleared the threshold.
    TitleResolved { paper_id: Option<String> },
    /// Batch lookup finished; `None` when the API had no record.
    RecordFetched { record: Option<PaperRecord> },
    /// Enriched content landed in the collection directory.
    EnrichedWritten,
    /// Source file landed in the processed directory.
    SourceMoved,
    /// An effect failed outright.
    StepFailed { reason: SkipReason },
}
