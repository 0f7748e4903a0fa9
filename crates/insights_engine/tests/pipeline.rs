use std::fs;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use insights_core::{FileOutcome, PaperRecord, SkipReason, Stage};
use insights_engine::{
    ApiError, ApiSettings, Layout, Pipeline, PipelineConfig, RecordFetcher, RecordResolver,
    DEFAULT_THROTTLE,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::TempDir;
use tokio::time::Instant;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const POST: &str = "By Mathieu Boudreau\nThe paper entitled \"Deep Learning MRI\" shows...";
const ENRICHED: &str = "Title: Deep Learning MRI \nAbstract: We study... \nReproducibility Insights:\nThe paper entitled \"Deep Learning MRI\" shows...";

#[derive(Default)]
struct FakeApi {
    paper_id: Option<String>,
    record: Option<PaperRecord>,
    fail_resolve: bool,
    queries: Mutex<Vec<String>>,
    lookups: Mutex<Vec<String>>,
}

#[async_trait::async_trait]
impl RecordResolver for FakeApi {
    async fn resolve(&self, title: &str) -> Result<Option<String>, ApiError> {
        self.queries.lock().unwrap().push(title.to_string());
        if self.fail_resolve {
            return Err(ApiError {
                kind: insights_engine::FailureKind::Network,
                message: "connection refused".to_string(),
            });
        }
        Ok(self.paper_id.clone())
    }
}

#[async_trait::async_trait]
impl RecordFetcher for FakeApi {
    async fn fetch(&self, paper_id: &str) -> Result<Option<PaperRecord>, ApiError> {
        self.lookups.lock().unwrap().push(paper_id.to_string());
        Ok(self.record.clone())
    }
}

fn deep_learning_record() -> PaperRecord {
    PaperRecord {
        paper_id: "abc123".to_string(),
        title: "Deep Learning MRI".to_string(),
        abstract_text: Some("We study...".to_string()),
        ..PaperRecord::default()
    }
}

fn config(temp: &TempDir) -> PipelineConfig {
    PipelineConfig {
        layout: Layout::under(temp.path().join("crawler_output")),
        api: ApiSettings::default(),
        throttle: Duration::ZERO,
    }
}

fn pipeline_with(api: Arc<FakeApi>, config: PipelineConfig) -> Pipeline {
    Pipeline::new(config, api.clone(), api)
}

fn seed(layout: &Layout, name: &str, content: &str) {
    fs::create_dir_all(&layout.intake_dir).unwrap();
    fs::write(layout.intake_dir.join(name), content).unwrap();
}

#[tokio::test]
async fn matched_post_is_enriched_and_moved() {
    let temp = TempDir::new().unwrap();
    let config = config(&temp);
    let layout = config.layout.clone();
    seed(&layout, "12.txt", POST);

    let api = Arc::new(FakeApi {
        paper_id: Some("abc123".to_string()),
        record: Some(deep_learning_record()),
        ..FakeApi::default()
    });
    let report = pipeline_with(api.clone(), config).run().await.unwrap();

    assert_eq!(
        report.outcome_for("12.txt"),
        Some(&FileOutcome::Moved {
            paper_id: "abc123".to_string()
        })
    );
    assert!(!layout.intake_dir.join("12.txt").exists());
    assert_eq!(
        fs::read_to_string(layout.processed_dir.join("12.txt")).unwrap(),
        POST
    );
    assert_eq!(
        fs::read_to_string(layout.collection_dir.join("abc123.txt")).unwrap(),
        ENRICHED
    );
    assert_eq!(*api.queries.lock().unwrap(), vec!["Deep Learning MRI".to_string()]);
}

#[tokio::test]
async fn unmatched_post_stays_untouched() {
    let temp = TempDir::new().unwrap();
    let config = config(&temp);
    let layout = config.layout.clone();
    seed(&layout, "12.txt", POST);

    let api = Arc::new(FakeApi::default());
    let report = pipeline_with(api.clone(), config).run().await.unwrap();

    assert_eq!(
        report.outcome_for("12.txt"),
        Some(&FileOutcome::Skipped {
            reason: SkipReason::NoMatch
        })
    );
    assert_eq!(fs::read_to_string(layout.intake_dir.join("12.txt")).unwrap(), POST);
    assert_eq!(fs::read_dir(&layout.collection_dir).unwrap().count(), 0);
    assert_eq!(fs::read_dir(&layout.processed_dir).unwrap().count(), 0);
    assert!(api.lookups.lock().unwrap().is_empty());
}

#[tokio::test]
async fn post_without_title_never_reaches_the_api() {
    let temp = TempDir::new().unwrap();
    let config = config(&temp);
    let layout = config.layout.clone();
    seed(&layout, "03.txt", "By Agah Karakuzu\nNo quoted title at all.");

    let api = Arc::new(FakeApi::default());
    let report = pipeline_with(api.clone(), config).run().await.unwrap();

    assert_eq!(
        report.outcome_for("03.txt"),
        Some(&FileOutcome::Skipped {
            reason: SkipReason::NoTitle
        })
    );
    assert!(api.queries.lock().unwrap().is_empty());
    assert!(layout.intake_dir.join("03.txt").exists());
}

#[tokio::test]
async fn failed_first_pattern_is_not_retried_with_later_patterns() {
    let temp = TempDir::new().unwrap();
    let config = config(&temp);
    let layout = config.layout.clone();
    seed(
        &layout,
        "05.txt",
        "A work entitled “First Title” and the paper: “Second Title”.",
    );

    let api = Arc::new(FakeApi::default());
    let report = pipeline_with(api.clone(), config).run().await.unwrap();

    assert_eq!(*api.queries.lock().unwrap(), vec!["First Title".to_string()]);
    assert_eq!(report.skipped_count(), 1);
}

#[tokio::test]
async fn resolver_error_skips_file() {
    let temp = TempDir::new().unwrap();
    let config = config(&temp);
    let layout = config.layout.clone();
    seed(&layout, "12.txt", POST);

    let api = Arc::new(FakeApi {
        fail_resolve: true,
        ..FakeApi::default()
    });
    let pipeline = pipeline_with(api, config);
    let job = pipeline
        .process_file(&layout.intake_dir.join("12.txt"))
        .await;

    assert_eq!(job.stage(), Stage::Skipped(SkipReason::ResolveFailed));
    assert!(layout.intake_dir.join("12.txt").exists());
}

#[tokio::test]
async fn missing_record_skips_file() {
    let temp = TempDir::new().unwrap();
    let config = config(&temp);
    let layout = config.layout.clone();
    seed(&layout, "12.txt", POST);

    let api = Arc::new(FakeApi {
        paper_id: Some("abc123".to_string()),
        record: None,
        ..FakeApi::default()
    });
    let report = pipeline_with(api, config).run().await.unwrap();

    assert_eq!(
        report.outcome_for("12.txt"),
        Some(&FileOutcome::Skipped {
            reason: SkipReason::FetchFailed
        })
    );
    assert!(!layout.collection_dir.join("abc123.txt").exists());
}

#[tokio::test]
async fn run_creates_missing_directories() {
    let temp = TempDir::new().unwrap();
    let config = config(&temp);
    let layout = config.layout.clone();

    let report = pipeline_with(Arc::new(FakeApi::default()), config)
        .run()
        .await
        .unwrap();

    assert!(report.entries().is_empty());
    assert!(layout.intake_dir.is_dir());
    assert!(layout.collection_dir.is_dir());
    assert!(layout.processed_dir.is_dir());
}

#[tokio::test]
async fn end_to_end_against_mock_api() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/paper/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total": 1,
            "data": [{"paperId": "abc123", "title": "Deep Learning MRI"}]
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/paper/batch"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "paperId": "abc123",
            "title": "Deep Learning MRI",
            "abstract": "We study...",
            "tldr": null,
            "year": 2020
        }])))
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    let mut config = config(&temp);
    config.api = ApiSettings {
        base_url: server.uri(),
        ..ApiSettings::default()
    };
    let layout = config.layout.clone();
    seed(&layout, "12.txt", POST);

    let report = Pipeline::semantic_scholar(config)
        .unwrap()
        .run()
        .await
        .unwrap();

    assert_eq!(report.moved_count(), 1);
    assert_eq!(
        fs::read_to_string(layout.collection_dir.join("abc123.txt")).unwrap(),
        ENRICHED
    );
    assert!(!layout.intake_dir.join("12.txt").exists());
}

#[tokio::test]
async fn paper_id_with_path_parts_is_never_written() {
    let temp = TempDir::new().unwrap();
    let config = config(&temp);
    let layout = config.layout.clone();
    seed(&layout, "12.txt", POST);

    let api = Arc::new(FakeApi {
        paper_id: Some("../escaped".to_string()),
        record: Some(deep_learning_record()),
        ..FakeApi::default()
    });
    let report = pipeline_with(api.clone(), config).run().await.unwrap();

    assert_eq!(
        report.outcome_for("12.txt"),
        Some(&FileOutcome::Skipped {
            reason: SkipReason::UnsafePaperId
        })
    );
    assert!(api.lookups.lock().unwrap().is_empty());
    assert_eq!(layout.intake_files().unwrap(), vec![layout.intake_dir.join("12.txt")]);
    assert_eq!(fs::read_dir(&layout.collection_dir).unwrap().count(), 0);
    assert_eq!(fs::read_to_string(layout.intake_dir.join("12.txt")).unwrap(), POST);
}

#[test]
fn default_throttle_is_one_second() {
    assert_eq!(PipelineConfig::default().throttle, Duration::from_secs(1));
    assert_eq!(DEFAULT_THROTTLE, Duration::from_secs(1));
}

#[tokio::test(start_paused = true)]
async fn matched_post_pauses_after_search_and_lookup() {
    let temp = TempDir::new().unwrap();
    let mut config = config(&temp);
    config.throttle = Duration::from_secs(1);
    let layout = config.layout.clone();
    seed(&layout, "12.txt", POST);

    let api = Arc::new(FakeApi {
        paper_id: Some("abc123".to_string()),
        record: Some(deep_learning_record()),
        ..FakeApi::default()
    });
    let pipeline = pipeline_with(api, config);

    let started = Instant::now();
    let job = pipeline
        .process_file(&layout.intake_dir.join("12.txt"))
        .await;

    assert_eq!(job.stage(), Stage::Moved);
    assert_eq!(started.elapsed(), Duration::from_secs(2));
}

#[tokio::test(start_paused = true)]
async fn unmatched_post_still_pauses_after_search() {
    let temp = TempDir::new().unwrap();
    let mut config = config(&temp);
    config.throttle = Duration::from_secs(1);
    let layout = config.layout.clone();
    seed(&layout, "12.txt", POST);

    let pipeline = pipeline_with(Arc::new(FakeApi::default()), config);

    let started = Instant::now();
    let job = pipeline
        .process_file(&layout.intake_dir.join("12.txt"))
        .await;

    assert_eq!(job.stage(), Stage::Skipped(SkipReason::NoMatch));
    assert_eq!(started.elapsed(), Duration::from_secs(1));
}
