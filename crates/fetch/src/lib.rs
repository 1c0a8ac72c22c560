//! Quote Fetcher: walks the paged PTAX endpoint per currency and flattens
//! every page into a single [`QuoteBatch`](ptax_core::QuoteBatch).

pub mod error;
pub mod fetcher;
pub mod olinda;
pub mod query;
pub mod source;

pub use error::FetchError;
pub use fetcher::{CurrencyOutcome, CurrencyStatus, FetchReport, QuoteFetcher};
pub use olinda::OlindaClient;
pub use query::QuoteQuery;
pub use source::{PageRequest, PageSource};
