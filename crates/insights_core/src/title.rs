use once_cell::sync::Lazy;
use regex::Regex;

/// A quoted paper title found in a post, with the index of the pattern that found it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateTitle {
    pub text: String,
    pub pattern_index: usize,
}

/// Ordered title patterns. Earlier entries win; order is significant.
///
/// The `entitled“` variant covers posts where inline markup sat between the
/// word and the quote and was collapsed during extraction.
pub static TITLE_PATTERNS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    [
        ("entitled-curly", r"entitled “(.*?)”"),
        ("entitled-quoted", r#"entitled\s?["“](.*?)["”]"#),
        ("entitled-colon", r"entitled: “(.*?)”."),
        ("entitled-tight", r"entitled“(.*?)”"),
        ("paper-colon", r"paper: “(.*?)”"),
        ("paper-curly", r"paper “(.*?)”"),
    ]
    .into_iter()
    .map(|(name, pattern)| (name, Regex::new(pattern).expect("static title pattern")))
    .collect()
});

/// Return the first capture of the first pattern that matches anywhere in `text`.
pub fn extract_candidate_title(text: &str) -> Option<CandidateTitle> {
    TITLE_PATTERNS
        .iter()
        .enumerate()
        .find_map(|(index, (_, regex))| {
            regex.captures(text).and_then(|caps| {
                caps.get(1).map(|m| CandidateTitle {
                    text: m.as_str().to_string(),
                    pattern_index: index,
                })
            })
        })
}
