//! Insights core: pure per-file state machine and the text/matching rules it drives.
mod byline;
mod effect;
mod enrich;
mod fuzzy;
mod matching;
mod msg;
mod record;
mod report;
mod state;
mod title;
mod update;

pub use byline::{strip_bylines, BYLINES};
pub use effect::Effect;
pub use enrich::build_enriched_content;
pub use fuzzy::{partial_ratio, ratio};
pub use matching::{select_first_match, MATCH_THRESHOLD};
pub use msg::Msg;
pub use record::{PaperRecord, SearchCandidate};
pub use report::{FileOutcome, RunReport};
pub use state::{FileJob, SkipReason, Stage};
pub use title::{extract_candidate_title, CandidateTitle, TITLE_PATTERNS};
pub use update::update;
