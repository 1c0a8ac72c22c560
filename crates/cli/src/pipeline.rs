//! Fetch quotes, then upload them: the whole sync in one call.

use chrono::{Datelike, Timelike};
use ptax_fetch::{PageSource, QuoteFetcher, QuoteQuery};
use ptax_storage::{QuoteUploader, StorageError};
use tracing::{info, warn};

/// Returned instead of a path when there was nothing to upload.
pub const NO_UPLOAD: &str = "";

/// Fetch every page for `query` and upload the batch under the partition for
/// `timestamp`.
///
/// An empty batch (no data in range, or every currency failed) is logged and
/// yields [`NO_UPLOAD`] without touching storage. Upload errors propagate.
pub async fn fetch_and_upload<S, T>(
    fetcher: &QuoteFetcher<S>,
    uploader: &QuoteUploader,
    query: &QuoteQuery,
    timestamp: &T,
) -> Result<String, StorageError>
where
    S: PageSource,
    T: Datelike + Timelike,
{
    info!(
        start = %query.start,
        end = %query.end,
        currencies = %query.currencies.join(","),
        "Fetching quotes"
    );

    let quotes = fetcher.fetch_quotes(query).await;
    if quotes.is_empty() {
        warn!("No quotes data retrieved");
        return Ok(NO_UPLOAD.to_string());
    }

    uploader.upload_quotes(&quotes, timestamp).await
}
