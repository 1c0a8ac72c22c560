use async_trait::async_trait;
use chrono::NaiveDate;
use ptax_core::{QuoteRecord, ResponseFormat};

use crate::error::FetchError;

/// A single page request: one currency, one `$top`/`$skip` window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub currency: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub top: usize,
    pub skip: usize,
    pub format: ResponseFormat,
}

/// Trait for anything that can serve pages of quotations (the Olinda API,
/// a recorded fixture, a scripted test double).
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetch one page. An empty vector means there is nothing at this offset.
    async fn fetch_page(&self, request: &PageRequest) -> Result<Vec<QuoteRecord>, FetchError>;
}
