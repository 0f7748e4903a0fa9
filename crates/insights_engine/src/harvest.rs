use std::path::PathBuf;
use std::sync::Arc;

use insights_logging::{insights_debug, insights_info, insights_warn};
use thiserror::Error;

use crate::decode::decode_page;
use crate::extract::{ContentExtractor, PostBodyExtractor};
use crate::filename::{intake_filename, is_dated_post_url, FilenameError};
use crate::page::{FetchSettings, PageFetcher, ReqwestPageFetcher};
use crate::persist::{AtomicFileWriter, PersistError};
use crate::types::{ApiError, CrawledDocument};

#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] ApiError),
    #[error("no file name: {0}")]
    Filename(#[from] FilenameError),
    #[error("write failed: {0}")]
    Persist(#[from] PersistError),
}

/// Turns blog post pages into intake text files.
pub struct Harvester {
    fetcher: Arc<dyn PageFetcher>,
    extractor: Arc<dyn ContentExtractor>,
    writer: AtomicFileWriter,
}

impl Harvester {
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        extractor: Arc<dyn ContentExtractor>,
        intake_dir: PathBuf,
    ) -> Self {
        Self {
            fetcher,
            extractor,
            writer: AtomicFileWriter::new(intake_dir),
        }
    }

    /// Reqwest fetching and the blog's post-body extractor.
    pub fn with_defaults(settings: FetchSettings, intake_dir: PathBuf) -> Self {
        Self::new(
            Arc::new(ReqwestPageFetcher::new(settings)),
            Arc::new(PostBodyExtractor::new()),
            intake_dir,
        )
    }

    /// Extract one page and write it to the intake directory.
    ///
    /// Creates the directory when missing and overwrites a file of the same
    /// name. A page without the content container still produces a file,
    /// with empty content.
    pub fn store(&self, doc: &CrawledDocument) -> Result<PathBuf, HarvestError> {
        if !is_dated_post_url(&doc.url) {
            insights_warn!(
                "{} is not shaped /YYYY/MM/DD/<slug>; its file name may be wrong or collide",
                doc.url
            );
        }
        let filename = intake_filename(&doc.url)?;
        let content = self.extractor.extract(&doc.html);
        if content.is_empty() {
            insights_warn!("No post content found in {}", doc.url);
        }
        let path = self.writer.write(&filename, &content)?;
        insights_debug!("Stored {} as {:?}", doc.url, path);
        Ok(path)
    }

    /// Fetch, decode and store one URL.
    pub async fn harvest(&self, url: &str) -> Result<PathBuf, HarvestError> {
        let page = self.fetcher.fetch(url).await?;
        if page.redirect_count > 0 {
            insights_debug!(
                "{} redirected {} time(s) to {}",
                page.requested_url,
                page.redirect_count,
                page.final_url
            );
        }
        let html = decode_page(&page.bytes, page.content_type.as_deref());
        self.store(&CrawledDocument {
            url: page.final_url,
            html,
        })
    }

    /// Harvest every URL in order. Failures are logged and skipped.
    pub async fn harvest_all<I, S>(&self, urls: I) -> Vec<PathBuf>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut stored = Vec::new();
        for url in urls {
            let url = url.as_ref();
            match self.harvest(url).await {
                Ok(path) => {
                    insights_info!("Harvested {} -> {:?}", url, path);
                    stored.push(path);
                }
                Err(err) => insights_warn!("Skipping {}: {}", url, err),
            }
        }
        stored
    }
}
