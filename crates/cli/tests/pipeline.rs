//! End-to-end sync runs: scripted pages in, in-memory bucket out.

use async_trait::async_trait;
use chrono::NaiveDate;
use clap::Parser;
use futures::TryStreamExt;
use object_store::ObjectStore;
use serde_json::json;

use ptax_cli::cli::{CliArgs, Command};
use ptax_cli::{fetch_and_upload, pipeline::NO_UPLOAD};
use ptax_core::config::{BackendKind, PtaxConfig, StorageConfig};
use ptax_core::{QuoteRecord, ResponseFormat};
use ptax_fetch::{FetchError, PageRequest, PageSource, QuoteFetcher, QuoteQuery};
use ptax_storage::{QuoteUploader, StorageBackend};

/// Serves `per_currency` records on the first page of every currency.
struct FixedSource {
    per_currency: usize,
}

#[async_trait]
impl PageSource for FixedSource {
    async fn fetch_page(&self, request: &PageRequest) -> Result<Vec<QuoteRecord>, FetchError> {
        if request.skip > 0 {
            return Ok(Vec::new());
        }
        Ok((0..self.per_currency)
            .map(|i| match json!({"moeda": request.currency, "cotacaoCompra": 5.0 + i as f64}) {
                serde_json::Value::Object(map) => map,
                _ => unreachable!(),
            })
            .collect())
    }
}

struct FailingSource;

#[async_trait]
impl PageSource for FailingSource {
    async fn fetch_page(&self, _request: &PageRequest) -> Result<Vec<QuoteRecord>, FetchError> {
        Err(FetchError::Status { status: 503, body: "unavailable".into() })
    }
}

fn query() -> QuoteQuery {
    QuoteQuery::new(
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
    )
    .currencies(["USD", "EUR", "GBP"])
}

fn noon() -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 1, 10).unwrap().and_hms_opt(12, 0, 0).unwrap()
}

async fn stored_keys(uploader: &QuoteUploader) -> Vec<String> {
    uploader
        .backend()
        .store()
        .list(None)
        .map_ok(|meta| meta.location.to_string())
        .try_collect()
        .await
        .unwrap()
}

#[tokio::test]
async fn fetched_quotes_land_in_partition() {
    let fetcher = QuoteFetcher::new(FixedSource { per_currency: 3 });
    let uploader = QuoteUploader::new(StorageBackend::memory("your-data-lake-bucket"));

    let path = fetch_and_upload(&fetcher, &uploader, &query(), &noon()).await.unwrap();

    assert_eq!(path, "memory://your-data-lake-bucket/2025/01/10/12.parquet");
    assert_eq!(stored_keys(&uploader).await, vec!["2025/01/10/12.parquet"]);
}

#[tokio::test]
async fn empty_fetch_uploads_nothing() {
    let fetcher = QuoteFetcher::new(FixedSource { per_currency: 0 });
    let uploader = QuoteUploader::new(StorageBackend::memory("lake"));

    let path = fetch_and_upload(&fetcher, &uploader, &query(), &noon()).await.unwrap();

    assert_eq!(path, NO_UPLOAD);
    assert!(stored_keys(&uploader).await.is_empty());
}

#[tokio::test]
async fn all_currencies_failing_is_not_an_error() {
    let fetcher = QuoteFetcher::new(FailingSource);
    let uploader = QuoteUploader::new(StorageBackend::memory("lake"));

    let path = fetch_and_upload(&fetcher, &uploader, &query(), &noon()).await.unwrap();

    assert!(path.is_empty());
    assert!(stored_keys(&uploader).await.is_empty());
}

fn ptax_defaults() -> PtaxConfig {
    PtaxConfig {
        base_url: "http://localhost/".into(),
        page_size: 100,
        format: ResponseFormat::Json,
        currencies: vec!["USD".into(), "EUR".into()],
    }
}

#[test]
fn fetch_flags_build_query() {
    let args = CliArgs::try_parse_from([
        "ptax-sync", "fetch", "--start", "2025-07-01", "--end", "2025-07-11", "--currency", "gbp",
        "--page-size", "0", "--format", "xml",
    ])
    .unwrap();
    let Command::Fetch(fetch) = args.command else { panic!("expected fetch") };

    let query = fetch.to_query(&ptax_defaults());
    assert_eq!(query.start, NaiveDate::from_ymd_opt(2025, 7, 1).unwrap());
    assert_eq!(query.end, NaiveDate::from_ymd_opt(2025, 7, 11).unwrap());
    assert_eq!(query.currencies, vec!["GBP"]);
    assert_eq!(query.page_size, 1);
    assert_eq!(query.format, ResponseFormat::Xml);
}

#[test]
fn unset_fetch_flags_fall_back_to_config() {
    let args = CliArgs::try_parse_from(["ptax-sync", "fetch", "--start", "2025-07-01"]).unwrap();
    let Command::Fetch(fetch) = args.command else { panic!("expected fetch") };

    let query = fetch.to_query(&ptax_defaults());
    assert_eq!(query.currencies, vec!["USD", "EUR"]);
    assert_eq!(query.page_size, 100);
    assert!(query.end >= query.start);
}

fn storage_config(bucket: Option<&str>) -> StorageConfig {
    StorageConfig {
        backend: BackendKind::Gcs,
        bucket: bucket.map(str::to_string),
        prefix: None,
        credentials_path: None,
        data_dir: "data".into(),
    }
}

fn upload_args(extra: &[&str]) -> ptax_cli::cli::UploadArgs {
    let mut argv = vec!["ptax-sync", "upload", "--start", "2025-01-01"];
    argv.extend_from_slice(extra);
    match CliArgs::try_parse_from(argv).unwrap().command {
        Command::Upload(upload) => upload,
        other => panic!("expected upload, got {other:?}"),
    }
}

#[test]
fn missing_bucket_is_a_usage_error() {
    let err = upload_args(&[]).bucket(&storage_config(None)).unwrap_err();
    assert!(err.to_string().contains("STORAGE_BUCKET"));

    assert!(upload_args(&["--bucket", "  "]).bucket(&storage_config(None)).is_err());
}

#[test]
fn bucket_flag_wins_over_config() {
    let from_flag = upload_args(&["--bucket", "your-data-lake-bucket"])
        .bucket(&storage_config(Some("configured")))
        .unwrap();
    assert_eq!(from_flag, "your-data-lake-bucket");

    let from_config = upload_args(&[]).bucket(&storage_config(Some("configured"))).unwrap();
    assert_eq!(from_config, "configured");
}

#[test]
fn upload_flags_override_storage_config() {
    let args = CliArgs::try_parse_from([
        "ptax-sync", "upload", "--start", "2025-01-01", "--bucket", "your-data-lake-bucket",
        "--backend", "memory", "--prefix", "raw/ptax",
    ])
    .unwrap();
    let Command::Upload(upload) = args.command else { panic!("expected upload") };

    let mut storage = storage_config(None);
    upload.apply(&mut storage);
    assert_eq!(storage.backend, BackendKind::Memory);
    assert_eq!(storage.bucket.as_deref(), Some("your-data-lake-bucket"));
    assert_eq!(storage.prefix.as_deref(), Some("raw/ptax"));
    assert!(storage.credentials_path.is_none());
}

#[test]
fn start_date_is_required() {
    assert!(CliArgs::try_parse_from(["ptax-sync", "fetch"]).is_err());
}
