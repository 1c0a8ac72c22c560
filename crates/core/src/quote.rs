use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// One exchange-rate quotation as returned by the API.
///
/// Records are schemaless: whatever keys the upstream sends are kept, in the
/// order they were sent.
pub type QuoteRecord = serde_json::Map<String, serde_json::Value>;

/// Records for every requested currency, in currency-then-page order.
pub type QuoteBatch = Vec<QuoteRecord>;

/// Currencies fetched when the caller does not name any.
pub const DEFAULT_CURRENCIES: &[&str] = &["USD", "EUR"];

/// Records requested per API call when the caller does not override it.
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Wire format requested from the API (`$format=`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseFormat {
    #[default]
    Json,
    Xml,
}

impl ResponseFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseFormat::Json => "json",
            ResponseFormat::Xml => "xml",
        }
    }
}

impl fmt::Display for ResponseFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResponseFormat {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(ResponseFormat::Json),
            "xml" => Ok(ResponseFormat::Xml),
            other => Err(CoreError::UnknownFormat(other.to_string())),
        }
    }
}

/// Render a date the way the PTAX endpoint expects it: `DD-MM-YYYY`.
pub fn api_date(date: NaiveDate) -> String {
    date.format("%d-%m-%Y").to_string()
}

/// Split a comma-separated currency list, trimming and upper-casing codes.
pub fn parse_currency_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|c| c.trim().to_uppercase())
        .filter(|c| !c.is_empty())
        .collect()
}
