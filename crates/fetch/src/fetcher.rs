//! Per-currency pagination loop.
//!
//! Each currency is walked with `$skip` starting at 0 and advancing by the
//! page size. A currency stops on an empty page, on a short page, or on the
//! first error. Errors end that currency only; the next one is still fetched.

use std::time::Instant;

use ptax_core::{QuoteBatch, QuoteRecord};
use tracing::{debug, error, info};

use crate::error::FetchError;
use crate::query::QuoteQuery;
use crate::source::{PageRequest, PageSource};

/// How a single currency's pagination ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CurrencyStatus {
    /// Reached an empty or short page.
    Completed,
    /// Abandoned after an error; records from earlier pages are kept.
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyOutcome {
    pub currency: String,
    pub records: usize,
    pub requests: usize,
    pub status: CurrencyStatus,
}

/// Batch plus one outcome per requested currency, in request order.
#[derive(Debug, Default)]
pub struct FetchReport {
    pub batch: QuoteBatch,
    pub outcomes: Vec<CurrencyOutcome>,
}

impl FetchReport {
    pub fn failed(&self) -> impl Iterator<Item = &CurrencyOutcome> {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.status, CurrencyStatus::Failed(_)))
    }

    pub fn total_requests(&self) -> usize {
        self.outcomes.iter().map(|o| o.requests).sum()
    }
}

/// Fetches quotations page by page from a [`PageSource`].
pub struct QuoteFetcher<S> {
    source: S,
}

impl<S: PageSource> QuoteFetcher<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Fetch every page for every currency in `query`.
    ///
    /// Never fails: a currency that errors is logged and contributes whatever
    /// pages it had already returned. Use [`QuoteFetcher::fetch_report`] to
    /// tell an empty range apart from a failed one.
    pub async fn fetch_quotes(&self, query: &QuoteQuery) -> QuoteBatch {
        self.fetch_report(query).await.batch
    }

    /// Same loop as [`QuoteFetcher::fetch_quotes`], keeping per-currency outcomes.
    pub async fn fetch_report(&self, query: &QuoteQuery) -> FetchReport {
        let started = Instant::now();
        let mut report = FetchReport::default();

        for currency in &query.currencies {
            let mut records = Vec::new();
            let (requests, status) = self.fetch_currency(query, currency, &mut records).await;

            report.outcomes.push(CurrencyOutcome {
                currency: currency.clone(),
                records: records.len(),
                requests,
                status,
            });
            report.batch.extend(records);
        }

        info!(
            currencies = query.currencies.len(),
            records = report.batch.len(),
            requests = report.total_requests(),
            failed = report.failed().count(),
            "Fetched PTAX quotes in {:.1}s",
            started.elapsed().as_secs_f64()
        );

        report
    }

    /// Walk one currency's pages, appending into `out`. Returns the number of
    /// requests issued and how the walk ended.
    async fn fetch_currency(
        &self,
        query: &QuoteQuery,
        currency: &str,
        out: &mut Vec<QuoteRecord>,
    ) -> (usize, CurrencyStatus) {
        let top = query.page_size.max(1);
        let mut request = PageRequest {
            currency: currency.to_string(),
            start: query.start,
            end: query.end,
            top,
            skip: 0,
            format: query.format,
        };
        let mut requests = 0usize;

        loop {
            requests += 1;
            let page = match self.source.fetch_page(&request).await {
                Ok(page) => page,
                Err(e) => {
                    log_failure(currency, request.skip, &e);
                    return (requests, CurrencyStatus::Failed(e.to_string()));
                }
            };

            let len = page.len();
            debug!(currency = %currency, skip = request.skip, records = len, "Received page");

            if len == 0 {
                break;
            }
            out.extend(page);
            if len < top {
                break;
            }
            request.skip += top;
        }

        (requests, CurrencyStatus::Completed)
    }
}

fn log_failure(currency: &str, skip: usize, err: &FetchError) {
    match err {
        FetchError::Http(_) | FetchError::Status { .. } => {
            error!(currency = %currency, skip, error = %err, "Request failed");
        }
        FetchError::MissingField(_) | FetchError::Decode(_) | FetchError::Api(_) => {
            error!(currency = %currency, skip, error = %err, "Unexpected response format");
        }
    }
}
