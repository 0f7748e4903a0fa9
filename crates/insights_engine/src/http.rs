use std::time::Duration;

use insights_logging::insights_debug;
use reqwest::header::CONTENT_TYPE;
use serde::Serialize;
use url::Url;

use crate::types::{map_reqwest_error, ApiError, FailureKind};

pub const DEFAULT_API_BASE: &str = "https://api.semanticscholar.org/graph/v1";

/// When a request to the bibliographic API is repeated.
///
/// Only statuses listed in `retry_statuses` are retried; connection errors and
/// every other status end the call at once. The delay before retry `n`
/// (1-based) is `backoff_base * 2^(n-1)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub backoff_base: Duration,
    pub retry_statuses: Vec<u16>,
}

impl RetryPolicy {
    /// Single attempt. Used for title search.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            backoff_base: Duration::ZERO,
            retry_statuses: Vec::new(),
        }
    }

    /// Up to two retries (three attempts) on 500/502/503/504, 0.1 s base
    /// doubling. Used for record lookup.
    pub fn transient_server_errors() -> Self {
        Self {
            max_retries: 2,
            backoff_base: Duration::from_millis(100),
            retry_statuses: vec![500, 502, 503, 504],
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_retries + 1
    }

    /// Whether a response with `status` after `retries_done` retries gets another go.
    pub fn should_retry(&self, status: u16, retries_done: u32) -> bool {
        retries_done < self.max_retries && self.retry_statuses.contains(&status)
    }

    /// Pause before retry number `retry` (1-based).
    pub fn delay_for(&self, retry: u32) -> Duration {
        let exponent = retry.saturating_sub(1).min(16);
        self.backoff_base * 2u32.pow(exponent)
    }
}

#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub user_agent: String,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            user_agent: concat!("insights-harvester/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Thin JSON-over-HTTP client bound to one API base URL.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(settings: &ApiSettings) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .user_agent(settings.user_agent.clone())
            .build()
            .map_err(|err| ApiError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// `{base}/{path}` with `query` appended, percent-encoded.
    pub fn endpoint(&self, path: &str, query: &[(&str, &str)]) -> Result<Url, ApiError> {
        let raw = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        let mut url = Url::parse(&raw)
            .map_err(|err| ApiError::new(FailureKind::InvalidUrl, err.to_string()))?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    pub async fn get_text(&self, url: Url, policy: &RetryPolicy) -> Result<String, ApiError> {
        self.execute(policy, || self.client.get(url.clone())).await
    }

    pub async fn post_json_text<B: Serialize + ?Sized>(
        &self,
        url: Url,
        body: &B,
        policy: &RetryPolicy,
    ) -> Result<String, ApiError> {
        let payload = serde_json::to_vec(body)
            .map_err(|err| ApiError::new(FailureKind::Parse, err.to_string()))?;
        self.execute(policy, || {
            self.client
                .post(url.clone())
                .header(CONTENT_TYPE, "application/json")
                .body(payload.clone())
        })
        .await
    }

    /// Send until a 200 arrives or the policy gives up. Body of the 200 is returned.
    async fn execute<F>(&self, policy: &RetryPolicy, build: F) -> Result<String, ApiError>
    where
        F: Fn() -> reqwest::RequestBuilder,
    {
        let mut retries = 0u32;
        loop {
            let response = build().send().await.map_err(map_reqwest_error)?;
            let status = response.status().as_u16();
            if status == 200 {
                return response.text().await.map_err(map_reqwest_error);
            }
            if policy.should_retry(status, retries) {
                retries += 1;
                let delay = policy.delay_for(retries);
                insights_debug!(
                    "HTTP {} from {}; retry {}/{} in {:?}",
                    status,
                    response.url(),
                    retries,
                    policy.max_retries,
                    delay
                );
                tokio::time::sleep(delay).await;
                continue;
            }
            return Err(ApiError::new(
                FailureKind::HttpStatus(status),
                format!("{} answered {}", response.url(), response.status()),
            ));
        }
    }
}
