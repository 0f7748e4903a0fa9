use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

/// Main article region on the blog's theme.
pub const DEFAULT_CONTAINER: &str = "div.td-post-content";

static DEFAULT_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(DEFAULT_CONTAINER).expect("static container selector"));
static HEADINGS: Lazy<Selector> =
    Lazy::new(|| Selector::parse("h1, h2, h3, h4, h5, h6").expect("static heading selector"));
static PARAGRAPHS: Lazy<Selector> =
    Lazy::new(|| Selector::parse("p").expect("static paragraph selector"));

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("invalid container selector {selector:?}: {message}")]
pub struct SelectorError {
    pub selector: String,
    pub message: String,
}

pub trait ContentExtractor: Send + Sync {
    /// Flatten one page into text. Never fails; a page without the
    /// expected container yields an empty string.
    fn extract(&self, html: &str) -> String;
}

/// Headings-then-paragraphs flattener for a single content container.
///
/// Inside the first element matching the container selector, all `h1`..`h6`
/// texts are emitted in document order, followed by all `p` texts in
/// document order, joined by `\n`. Headings and paragraphs are not
/// interleaved. Each element's text is its text nodes, individually trimmed,
/// concatenated without separators.
#[derive(Debug, Clone)]
pub struct PostBodyExtractor {
    container: Selector,
}

impl PostBodyExtractor {
    pub fn new() -> Self {
        Self {
            container: DEFAULT_SELECTOR.clone(),
        }
    }

    pub fn with_container(css: &str) -> Result<Self, SelectorError> {
        let container = Selector::parse(css).map_err(|err| SelectorError {
            selector: css.to_string(),
            message: format!("{err:?}"),
        })?;
        Ok(Self { container })
    }
}

impl Default for PostBodyExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentExtractor for PostBodyExtractor {
    fn extract(&self, html: &str) -> String {
        let doc = Html::parse_document(html);
        let Some(body) = doc.select(&self.container).next() else {
            return String::new();
        };

        let headers = body.select(&HEADINGS).map(stripped_text);
        let paragraphs = body.select(&PARAGRAPHS).map(stripped_text);
        headers.chain(paragraphs).collect::<Vec<_>>().join("\n")
    }
}

fn stripped_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .collect()
}
