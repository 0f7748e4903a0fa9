use insights_core::{select_first_match, PaperRecord, SearchCandidate};
use insights_logging::{insights_debug, insights_info};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;

use crate::http::{ApiClient, ApiSettings, RetryPolicy};
use crate::types::{ApiError, FailureKind};

/// Fields requested from the batch endpoint.
pub const RECORD_FIELDS: &str = "title,abstract,tldr,year,embedding";

/// Maps a free-text title to a paper identifier.
#[async_trait::async_trait]
pub trait RecordResolver: Send + Sync {
    /// `Ok(None)` when the search worked but nothing matched well enough.
    async fn resolve(&self, title: &str) -> Result<Option<String>, ApiError>;
}

/// Looks up the full record for a paper identifier.
#[async_trait::async_trait]
pub trait RecordFetcher: Send + Sync {
    /// `Ok(None)` when the API has no record for `paper_id`.
    async fn fetch(&self, paper_id: &str) -> Result<Option<PaperRecord>, ApiError>;
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    total: u64,
    #[serde(default)]
    data: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchHit {
    paper_id: Option<String>,
    title: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BatchPaper {
    paper_id: String,
    title: Option<String>,
    #[serde(rename = "abstract")]
    abstract_text: Option<String>,
    tldr: Option<Tldr>,
    year: Option<i32>,
    embedding: Option<Embedding>,
}

#[derive(Debug, Deserialize)]
struct Tldr {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Embedding {
    #[serde(default)]
    vector: Vec<f32>,
}

impl From<BatchPaper> for PaperRecord {
    fn from(paper: BatchPaper) -> Self {
        PaperRecord {
            paper_id: paper.paper_id,
            title: paper.title.unwrap_or_default(),
            abstract_text: paper.abstract_text,
            summary: paper.tldr.and_then(|t| t.text).filter(|t| !t.is_empty()),
            year: paper.year,
            embedding: paper.embedding.map(|e| e.vector),
        }
    }
}

/// Semantic Scholar Graph API client.
///
/// Search runs under `search_policy` (no retries by default), batch lookup
/// under `record_policy` (bounded retries on transient 5xx by default). The
/// two are kept apart on purpose.
pub struct SemanticScholar {
    client: ApiClient,
    search_policy: RetryPolicy,
    record_policy: RetryPolicy,
}

impl SemanticScholar {
    pub fn new(settings: &ApiSettings) -> Result<Self, ApiError> {
        Ok(Self {
            client: ApiClient::new(settings)?,
            search_policy: RetryPolicy::none(),
            record_policy: RetryPolicy::transient_server_errors(),
        })
    }

    pub fn with_record_policy(mut self, policy: RetryPolicy) -> Self {
        self.record_policy = policy;
        self
    }
}

#[async_trait::async_trait]
impl RecordResolver for SemanticScholar {
    async fn resolve(&self, title: &str) -> Result<Option<String>, ApiError> {
        let url = self.client.endpoint("paper/search", &[("query", title)])?;
        let body = self.client.get_text(url, &self.search_policy).await?;
        let response: SearchResponse = parse(&body)?;
        insights_debug!("search for {:?}: total={}", title, response.total);

        let candidates: Vec<SearchCandidate> = response
            .data
            .into_iter()
            .filter_map(|hit| match (hit.paper_id, hit.title) {
                (Some(paper_id), Some(title)) => Some(SearchCandidate { paper_id, title }),
                _ => None,
            })
            .collect();

        let chosen = select_first_match(title, &candidates).map(|c| c.paper_id.clone());
        if let Some(paper_id) = &chosen {
            insights_info!("Matched {:?} to paper {}", title, paper_id);
        }
        Ok(chosen)
    }
}

#[async_trait::async_trait]
impl RecordFetcher for SemanticScholar {
    async fn fetch(&self, paper_id: &str) -> Result<Option<PaperRecord>, ApiError> {
        let url = self
            .client
            .endpoint("paper/batch", &[("fields", RECORD_FIELDS)])?;
        let body = self
            .client
            .post_json_text(url, &json!({ "ids": [paper_id] }), &self.record_policy)
            .await?;
        let papers: Vec<Option<BatchPaper>> = parse(&body)?;
        Ok(papers.into_iter().next().flatten().map(PaperRecord::from))
    }
}

fn parse<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|err| ApiError::new(FailureKind::Parse, err.to_string()))
}
