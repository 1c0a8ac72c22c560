use chrono::{Local, NaiveDate};
use ptax_core::{ResponseFormat, DEFAULT_CURRENCIES, DEFAULT_PAGE_SIZE};

/// Parameters of one fetch run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteQuery {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub currencies: Vec<String>,
    pub page_size: usize,
    pub format: ResponseFormat,
}

impl QuoteQuery {
    /// Query `USD` and `EUR` between two dates, 100 records per page, as JSON.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start,
            end,
            currencies: DEFAULT_CURRENCIES.iter().map(|c| c.to_string()).collect(),
            page_size: DEFAULT_PAGE_SIZE,
            format: ResponseFormat::Json,
        }
    }

    /// Same as [`QuoteQuery::new`] with the end date fixed to today's local date.
    pub fn until_today(start: NaiveDate) -> Self {
        Self::new(start, Local::now().date_naive())
    }

    pub fn currencies<I, S>(mut self, currencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.currencies = currencies.into_iter().map(Into::into).collect();
        self
    }

    /// A page size of zero would never advance the offset, so it is raised to one.
    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn format(mut self, format: ResponseFormat) -> Self {
        self.format = format;
        self
    }
}
