//! Pagination and error-isolation behaviour of the quote fetcher, driven by
//! an in-process page source that records every request.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::json;

use ptax_core::QuoteRecord;
use ptax_fetch::{CurrencyStatus, FetchError, PageRequest, PageSource, QuoteFetcher, QuoteQuery};

/// Scripted response for one call.
enum Reply {
    Records(usize),
    Fail,
}

/// Replies are queued per currency; an exhausted queue answers with an empty page.
#[derive(Default)]
struct RecordingSource {
    replies: Mutex<HashMap<String, Vec<Reply>>>,
    calls: Mutex<Vec<PageRequest>>,
}

impl RecordingSource {
    fn script(self, currency: &str, replies: Vec<Reply>) -> Self {
        self.replies
            .lock()
            .unwrap()
            .insert(currency.to_string(), replies.into_iter().rev().collect());
        self
    }

    fn calls(&self) -> Vec<PageRequest> {
        self.calls.lock().unwrap().clone()
    }

    fn calls_for(&self, currency: &str) -> usize {
        self.calls().iter().filter(|c| c.currency == currency).count()
    }
}

#[async_trait]
impl PageSource for RecordingSource {
    async fn fetch_page(&self, request: &PageRequest) -> Result<Vec<QuoteRecord>, FetchError> {
        self.calls.lock().unwrap().push(request.clone());
        let reply = self
            .replies
            .lock()
            .unwrap()
            .get_mut(&request.currency)
            .and_then(|queue| queue.pop())
            .unwrap_or(Reply::Records(0));

        match reply {
            Reply::Records(n) => Ok((0..n).map(|i| quote(&request.currency, request.skip + i)).collect()),
            Reply::Fail => Err(FetchError::Decode("Connection error".into())),
        }
    }
}

fn quote(currency: &str, n: usize) -> QuoteRecord {
    let value = json!({
        "moeda": currency,
        "cotacaoCompra": 5.2,
        "seq": n,
        "dataHoraCotacao": "2025-07-01 13:04:25.379",
    });
    match value {
        serde_json::Value::Object(map) => map,
        _ => unreachable!(),
    }
}

fn july(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 7, day).unwrap()
}

#[tokio::test]
async fn single_short_page_is_returned_as_is() {
    let source = RecordingSource::default().script("USD", vec![Reply::Records(2)]);
    let fetcher = QuoteFetcher::new(source);

    let batch = fetcher
        .fetch_quotes(&QuoteQuery::new(july(1), july(2)).currencies(["USD"]))
        .await;

    assert_eq!(batch.len(), 2);
    assert_eq!(batch[0]["moeda"], "USD");
    assert_eq!(batch[0]["cotacaoCompra"], 5.2);
    assert_eq!(fetcher.source().calls_for("USD"), 1);
}

#[tokio::test]
async fn empty_pages_make_one_request_per_currency() {
    let fetcher = QuoteFetcher::new(RecordingSource::default());
    let query = QuoteQuery::new(july(1), july(11)).currencies(["USD", "EUR", "GBP"]);

    let batch = fetcher.fetch_quotes(&query).await;

    assert!(batch.is_empty());
    for currency in ["USD", "EUR", "GBP"] {
        assert_eq!(fetcher.source().calls_for(currency), 1);
    }
}

#[tokio::test]
async fn full_page_triggers_exactly_one_more_request() {
    let source = RecordingSource::default().script("USD", vec![Reply::Records(100), Reply::Records(0)]);
    let fetcher = QuoteFetcher::new(source);

    let batch = fetcher
        .fetch_quotes(&QuoteQuery::new(july(1), july(11)).currencies(["USD"]).page_size(100))
        .await;

    assert_eq!(batch.len(), 100);
    let calls = fetcher.source().calls();
    assert_eq!(calls.len(), 2);
    assert_eq!((calls[0].skip, calls[1].skip), (0, 100));
    assert!(calls.iter().all(|c| c.top == 100));
}

#[tokio::test]
async fn failures_are_swallowed() {
    let source = RecordingSource::default()
        .script("USD", vec![Reply::Fail])
        .script("EUR", vec![Reply::Fail]);
    let fetcher = QuoteFetcher::new(source);

    let batch = fetcher.fetch_quotes(&QuoteQuery::new(july(1), july(2))).await;

    assert!(batch.is_empty());
    // No retry: one attempt per currency.
    assert_eq!(fetcher.source().calls().len(), 2);
}

#[tokio::test]
async fn failure_keeps_earlier_pages_and_moves_on() {
    let source = RecordingSource::default()
        .script("USD", vec![Reply::Records(10), Reply::Fail, Reply::Records(10)])
        .script("EUR", vec![Reply::Records(4)]);
    let fetcher = QuoteFetcher::new(source);

    let report = fetcher
        .fetch_report(&QuoteQuery::new(july(1), july(2)).page_size(10))
        .await;

    assert_eq!(report.batch.len(), 14);
    assert_eq!(fetcher.source().calls_for("USD"), 2);
    assert!(matches!(report.outcomes[0].status, CurrencyStatus::Failed(_)));
    assert_eq!(report.outcomes[1].status, CurrencyStatus::Completed);
}

#[tokio::test]
async fn default_currencies_are_usd_then_eur() {
    let fetcher = QuoteFetcher::new(RecordingSource::default());

    fetcher.fetch_quotes(&QuoteQuery::new(july(1), july(2))).await;

    let currencies: Vec<String> = fetcher.source().calls().into_iter().map(|c| c.currency).collect();
    assert_eq!(currencies, vec!["USD", "EUR"]);
}

#[tokio::test]
async fn batch_is_ordered_currency_then_page() {
    let source = RecordingSource::default()
        .script("EUR", vec![Reply::Records(2), Reply::Records(1)])
        .script("USD", vec![Reply::Records(2), Reply::Records(2), Reply::Records(0)]);
    let fetcher = QuoteFetcher::new(source);

    let batch = fetcher
        .fetch_quotes(&QuoteQuery::new(july(1), july(2)).currencies(["EUR", "USD"]).page_size(2))
        .await;

    let seen: Vec<(String, u64)> = batch
        .iter()
        .map(|r| (r["moeda"].as_str().unwrap().to_string(), r["seq"].as_u64().unwrap()))
        .collect();
    assert_eq!(
        seen,
        vec![
            ("EUR".into(), 0),
            ("EUR".into(), 1),
            ("EUR".into(), 2),
            ("USD".into(), 0),
            ("USD".into(), 1),
            ("USD".into(), 2),
            ("USD".into(), 3),
        ]
    );
}

#[tokio::test]
async fn no_currencies_means_no_requests() {
    let fetcher = QuoteFetcher::new(RecordingSource::default());
    let query = QuoteQuery::new(july(1), july(2)).currencies(Vec::<String>::new());

    let batch = fetcher.fetch_quotes(&query).await;

    assert!(batch.is_empty());
    assert!(fetcher.source().calls().is_empty());
}

#[tokio::test]
async fn requests_carry_dates_and_format() {
    let fetcher = QuoteFetcher::new(RecordingSource::default());
    let query = QuoteQuery::new(july(1), july(11))
        .currencies(["USD"])
        .format(ptax_core::ResponseFormat::Xml);

    fetcher.fetch_quotes(&query).await;

    let call = &fetcher.source().calls()[0];
    assert_eq!(call.start, july(1));
    assert_eq!(call.end, july(11));
    assert_eq!(call.format, ptax_core::ResponseFormat::Xml);
}
