use std::path::PathBuf;

use anyhow::{bail, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use ptax_core::config::{BackendKind, PtaxConfig, StorageConfig};
use ptax_core::ResponseFormat;
use ptax_fetch::QuoteQuery;

/// Sync PTAX exchange rates into an hourly-partitioned Parquet data lake.
///
/// Examples:
///   ptax-sync fetch --start 2025-07-01 --end 2025-07-11
///   ptax-sync upload --bucket your-data-lake-bucket --start 2025-01-01 --end 2025-01-10 \
///       --currency USD --currency EUR --currency GBP
#[derive(Parser, Debug)]
#[command(name = "ptax-sync", version, verbatim_doc_comment)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch quotes and print one JSON record per line.
    Fetch(FetchArgs),
    /// Fetch quotes and upload them as a Parquet partition.
    Upload(UploadArgs),
}

#[derive(Args, Debug, Clone)]
pub struct FetchArgs {
    /// First quotation date (YYYY-MM-DD).
    #[arg(long)]
    pub start: NaiveDate,

    /// Last quotation date (YYYY-MM-DD). Defaults to today.
    #[arg(long)]
    pub end: Option<NaiveDate>,

    /// Currency code; repeat for several. Defaults to PTAX_CURRENCIES (USD, EUR).
    #[arg(long = "currency", value_name = "CODE")]
    pub currencies: Vec<String>,

    /// Records per API call. Defaults to PTAX_PAGE_SIZE (100).
    #[arg(long)]
    pub page_size: Option<usize>,

    /// Response format requested from the API: json or xml.
    #[arg(long)]
    pub format: Option<ResponseFormat>,
}

impl FetchArgs {
    /// Build the fetch query, filling unset flags from configuration.
    pub fn to_query(&self, defaults: &PtaxConfig) -> QuoteQuery {
        let query = match self.end {
            Some(end) => QuoteQuery::new(self.start, end),
            None => QuoteQuery::until_today(self.start),
        };

        let currencies: Vec<String> = if self.currencies.is_empty() {
            defaults.currencies.clone()
        } else {
            self.currencies.iter().map(|c| c.trim().to_uppercase()).collect()
        };

        query
            .currencies(currencies)
            .page_size(self.page_size.unwrap_or(defaults.page_size))
            .format(self.format.unwrap_or(defaults.format))
    }
}

#[derive(Args, Debug, Clone)]
pub struct UploadArgs {
    #[command(flatten)]
    pub fetch: FetchArgs,

    /// Destination bucket. Defaults to STORAGE_BUCKET.
    #[arg(long)]
    pub bucket: Option<String>,

    /// Storage backend: gcs, s3, local or memory. Defaults to STORAGE_BACKEND (gcs).
    #[arg(long)]
    pub backend: Option<BackendKind>,

    /// GCS service-account JSON file. Ambient credentials are used when unset.
    #[arg(long)]
    pub credentials: Option<PathBuf>,

    /// Key prefix placed before the year/month/day/hour partition.
    #[arg(long)]
    pub prefix: Option<String>,
}

impl UploadArgs {
    /// Apply flag overrides on top of the environment's storage settings.
    pub fn apply(&self, storage: &mut StorageConfig) {
        if let Some(backend) = self.backend {
            storage.backend = backend;
        }
        if let Some(ref bucket) = self.bucket {
            storage.bucket = Some(bucket.clone());
        }
        if let Some(ref path) = self.credentials {
            storage.credentials_path = Some(path.clone());
        }
        if let Some(ref prefix) = self.prefix {
            storage.prefix = Some(prefix.clone());
        }
    }

    /// Destination bucket: `--bucket`, else the configured one. Missing or
    /// blank is a usage error.
    pub fn bucket(&self, storage: &StorageConfig) -> Result<String> {
        match self.bucket.as_deref().or(storage.bucket.as_deref()).map(str::trim) {
            Some(bucket) if !bucket.is_empty() => Ok(bucket.to_string()),
            _ => bail!("no bucket given: pass --bucket or set STORAGE_BUCKET"),
        }
    }
}
