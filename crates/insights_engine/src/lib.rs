//! Insights engine: filesystem queues, HTML extraction and the bibliographic API.
mod decode;
mod extract;
mod filename;
mod harvest;
mod http;
mod layout;
mod page;
mod persist;
mod pipeline;
mod scholar;
mod types;

pub use decode::decode_page;
pub use extract::{ContentExtractor, PostBodyExtractor, SelectorError, DEFAULT_CONTAINER};
pub use filename::{intake_filename, is_dated_post_url, FilenameError};
pub use harvest::{HarvestError, Harvester};
pub use http::{ApiClient, ApiSettings, RetryPolicy, DEFAULT_API_BASE};
pub use layout::{Layout, COLLECTION_DIR, DEFAULT_ROOT, PROCESSED_DIR};
pub use page::{FetchSettings, FetchedPage, PageFetcher, ReqwestPageFetcher};
pub use persist::{ensure_output_dir, move_into, AtomicFileWriter, PersistError};
pub use pipeline::{Pipeline, PipelineConfig, PipelineError, DEFAULT_THROTTLE};
pub use scholar::{RecordFetcher, RecordResolver, SemanticScholar, RECORD_FIELDS};
pub use types::{ApiError, CrawledDocument, FailureKind};
