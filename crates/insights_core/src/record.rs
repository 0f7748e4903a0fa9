/// One hit from the bibliographic search endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCandidate {
    pub paper_id: String,
    pub title: String,
}

/// Bibliographic fields folded into an enriched file.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PaperRecord {
    pub paper_id: String,
    pub title: String,
    pub abstract_text: Option<String>,
    /// Machine-generated one-line summary (the API's TLDR).
    pub summary: Option<String>,
    pub year: Option<i32>,
    /// Requested alongside the other fields; not written anywhere.
    pub embedding: Option<Vec<f32>>,
}
