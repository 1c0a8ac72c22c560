use std::io::Write;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use tracing::info;

use ptax_cli::cli::{CliArgs, Command};
use ptax_cli::fetch_and_upload;
use ptax_core::config::load_dotenv;
use ptax_core::Config;
use ptax_fetch::{OlindaClient, QuoteFetcher};
use ptax_storage::{QuoteUploader, StorageBackend};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = CliArgs::parse();

    load_dotenv();
    let mut config = Config::from_env();

    let fetcher = QuoteFetcher::new(OlindaClient::new(config.ptax.base_url.clone()));

    match args.command {
        Command::Fetch(fetch) => {
            config.log_summary();
            let query = fetch.to_query(&config.ptax);
            let quotes = fetcher.fetch_quotes(&query).await;

            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            for quote in &quotes {
                serde_json::to_writer(&mut out, quote)?;
                writeln!(out)?;
            }
            info!(records = quotes.len(), "Fetch finished");
        }
        Command::Upload(upload) => {
            upload.apply(&mut config.storage);
            config.log_summary();

            let bucket = upload.bucket(&config.storage)?;
            let backend = StorageBackend::from_config(&config, &bucket)
                .with_context(|| format!("failed to open {} bucket '{}'", config.storage.backend, bucket))?;
            let uploader = QuoteUploader::new(backend).with_prefix(config.storage.prefix.clone());

            let query = upload.fetch.to_query(&config.ptax);
            let path = fetch_and_upload(&fetcher, &uploader, &query, &Local::now())
                .await
                .context("failed to upload quotes")?;

            if path.is_empty() {
                info!("Nothing uploaded");
            } else {
                println!("{path}");
            }
        }
    }

    Ok(())
}
