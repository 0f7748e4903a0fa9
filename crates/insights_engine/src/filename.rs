//! Intake file names derived from post URLs.
//!
//! The derivation assumes post URLs shaped `/YYYY/MM/DD/<slug>`. It flattens
//! the URL by turning `/` into `_`, drops leading underscores, and keeps the
//! second-to-last `_` token. With a trailing slash that token is the slug,
//! without one it is the day of month. Other URL shapes still produce a name,
//! but it may be meaningless or collide with another post; later writes to the
//! same name overwrite earlier ones.

use url::Url;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FilenameError {
    #[error("url has fewer than two path tokens: {0}")]
    TooFewSegments(String),
    #[error("url yields an empty file name: {0}")]
    EmptySegment(String),
}

/// Intake file name for a post URL. Pure and deterministic.
pub fn intake_filename(url: &str) -> Result<String, FilenameError> {
    let flattened = url.replace('/', "_");
    let mut tokens = flattened.trim_start_matches('_').rsplit('_');
    tokens.next();
    let token = tokens
        .next()
        .ok_or_else(|| FilenameError::TooFewSegments(url.to_string()))?;
    if token.is_empty() {
        return Err(FilenameError::EmptySegment(url.to_string()));
    }
    Ok(format!("{token}.txt"))
}

/// Whether `url`'s path is exactly `/YYYY/MM/DD/<slug>` (trailing slash allowed).
pub fn is_dated_post_url(url: &str) -> bool {
    let Ok(parsed) = Url::parse(url) else {
        return false;
    };
    let Some(segments) = parsed.path_segments() else {
        return false;
    };
    let segments: Vec<&str> = segments.filter(|s| !s.is_empty()).collect();
    match segments.as_slice() {
        [year, month, day, slug] => {
            is_digits(year, 4) && is_digits(month, 2) && is_digits(day, 2) && !slug.is_empty()
        }
        _ => false,
    }
}

fn is_digits(segment: &str, len: usize) -> bool {
    segment.len() == len && segment.bytes().all(|b| b.is_ascii_digit())
}
