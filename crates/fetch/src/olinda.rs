//! Olinda OData client for the PTAX `CotacaoMoedaPeriodo` resource.

use async_trait::async_trait;
use ptax_core::config::DEFAULT_PTAX_BASE_URL;
use ptax_core::{api_date, QuoteRecord};
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::error::FetchError;
use crate::source::{PageRequest, PageSource};

const RESOURCE: &str =
    "CotacaoMoedaPeriodo(moeda=@moeda,dataInicial=@dataInicial,dataFinalCotacao=@dataFinalCotacao)";

/// [`PageSource`] backed by the Central Bank's Olinda API.
pub struct OlindaClient {
    client: Client,
    base_url: String,
}

impl OlindaClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Self {
            client: Client::new(),
            base_url,
        }
    }

    /// Build the full request URL for one page.
    ///
    /// OData parameter aliases (`@moeda`) and system options (`$top`) are
    /// written literally; the endpoint expects them unescaped.
    pub fn page_url(&self, request: &PageRequest) -> String {
        format!(
            "{}{}?@moeda='{}'&@dataInicial='{}'&@dataFinalCotacao='{}'&$top={}&$skip={}&$format={}",
            self.base_url,
            RESOURCE,
            request.currency,
            api_date(request.start),
            api_date(request.end),
            request.top,
            request.skip,
            request.format,
        )
    }
}

impl Default for OlindaClient {
    fn default() -> Self {
        Self::new(DEFAULT_PTAX_BASE_URL)
    }
}

#[async_trait]
impl PageSource for OlindaClient {
    async fn fetch_page(&self, request: &PageRequest) -> Result<Vec<QuoteRecord>, FetchError> {
        let url = self.page_url(request);
        debug!(url = %url, "Requesting PTAX page");

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status { status, body });
        }

        let text = response.text().await?;
        let envelope: Value = serde_json::from_str(&text)
            .map_err(|e| FetchError::Decode(format!("{e} (format={})", request.format)))?;

        parse_envelope(envelope)
    }
}

/// Extract the records from an OData envelope (`{"value": [...]}`).
pub fn parse_envelope(envelope: Value) -> Result<Vec<QuoteRecord>, FetchError> {
    let Value::Object(mut body) = envelope else {
        return Err(FetchError::Decode("response body is not a JSON object".into()));
    };

    if let Some(err) = body.get("error") {
        let message = err
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| err.to_string());
        return Err(FetchError::Api(message));
    }

    match body.remove("value") {
        Some(Value::Array(items)) => items
            .into_iter()
            .map(|item| match item {
                Value::Object(record) => Ok(record),
                other => Err(FetchError::Decode(format!("expected a record object, got {other}"))),
            })
            .collect(),
        Some(_) => Err(FetchError::Decode("'value' is not an array".into())),
        None => Err(FetchError::MissingField("value")),
    }
}
