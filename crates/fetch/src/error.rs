use thiserror::Error;

/// Failure while requesting or decoding a single page.
///
/// The fetcher never returns these to its caller; they end the current
/// currency's pagination and are logged.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("API error: {0}")]
    Api(String),

    #[error("Unexpected response format: missing field '{0}'")]
    MissingField(&'static str),

    #[error("Could not decode response: {0}")]
    Decode(String),
}
