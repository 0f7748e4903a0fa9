use crate::fuzzy::partial_ratio;
use crate::record::SearchCandidate;

/// Minimum partial ratio (inclusive) for a search hit to count as the paper.
pub const MATCH_THRESHOLD: u8 = 90;

/// First candidate, in the order given, whose title clears [`MATCH_THRESHOLD`]
/// against `query`. Comparison is case-insensitive.
///
/// Later candidates are never considered once one clears the bar, even if
/// they would score higher.
pub fn select_first_match<'a>(
    query: &str,
    candidates: &'a [SearchCandidate],
) -> Option<&'a SearchCandidate> {
    let query = query.to_lowercase();
    candidates.iter().find(|candidate| {
        partial_ratio(&candidate.title.to_lowercase(), &query) >= MATCH_THRESHOLD
    })
}
