use crate::record::PaperRecord;

/// Prepend the paper's header block to the (byline-stripped) post content.
///
/// Layout: `Title: {title} \nAbstract: {abstract}`, then ` \nTLDR: {summary}`
/// when a summary exists, then ` \nReproducibility Insights:\n{content}`.
/// A missing abstract renders as an empty string.
pub fn build_enriched_content(record: &PaperRecord, content: &str) -> String {
    let mut out = format!(
        "Title: {} \nAbstract: {}",
        record.title,
        record.abstract_text.as_deref().unwrap_or("")
    );
    if let Some(summary) = record.summary.as_deref() {
        out.push_str(" \nTLDR: ");
        out.push_str(summary);
    }
    out.push_str(" \nReproducibility Insights:\n");
    out.push_str(content);
    out
}
