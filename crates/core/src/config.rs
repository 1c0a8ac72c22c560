use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::quote::{parse_currency_list, ResponseFormat, DEFAULT_CURRENCIES, DEFAULT_PAGE_SIZE};

/// Default Olinda OData root for the PTAX service.
pub const DEFAULT_PTAX_BASE_URL: &str =
    "https://olinda.bcb.gov.br/olinda/servico/PTAX/versao/v1/odata/";

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled env var: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_env_opt(profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = env_opt(&prefixed) {
            return Some(v);
        }
    }
    env_opt(key)
}

fn profiled_env_or(profile: &str, key: &str, default: &str) -> String {
    profiled_env_opt(profile, key).unwrap_or_else(|| default.to_string())
}

fn profiled_env_usize(profile: &str, key: &str, default: usize) -> usize {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name (empty = default).
    pub profile: String,
    pub ptax: PtaxConfig,
    pub storage: StorageConfig,
    pub aws: AwsConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `PTAX_PROFILE`. When set (e.g. `PROD`), every key
    /// is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Self {
        let profile = env_or("PTAX_PROFILE", "").to_uppercase();
        Self::for_profile(&profile)
    }

    /// Build config for a specific named profile (empty string = default).
    pub fn for_profile(profile: &str) -> Self {
        let p = profile.to_uppercase();
        let p = p.as_str();
        Self {
            profile: p.to_string(),
            ptax: PtaxConfig::from_env_profiled(p),
            storage: StorageConfig::from_env_profiled(p),
            aws: AwsConfig::from_env_profiled(p),
        }
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    /// Print a redacted summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!(
            "  ptax:     url={}, page_size={}, format={}, currencies={}",
            self.ptax.base_url,
            self.ptax.page_size,
            self.ptax.format,
            self.ptax.currencies.join(",")
        );
        tracing::info!(
            "  storage:  backend={}, bucket={}, prefix={}, credentials={}",
            self.storage.backend,
            self.storage.bucket.as_deref().unwrap_or("(none)"),
            self.storage.prefix.as_deref().unwrap_or("(none)"),
            if self.storage.credentials_path.is_some() { "file" } else { "ambient" }
        );
        if self.storage.backend == BackendKind::S3 {
            tracing::info!(
                "  aws:      region={}, endpoint={}",
                self.aws.region,
                self.aws.endpoint_url.as_deref().unwrap_or("(default)")
            );
        }
    }
}

// ── PTAX API ──────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PtaxConfig {
    pub base_url: String,
    pub page_size: usize,
    pub format: ResponseFormat,
    pub currencies: Vec<String>,
}

impl PtaxConfig {
    fn from_env_profiled(p: &str) -> Self {
        let format = match profiled_env_opt(p, "PTAX_FORMAT") {
            Some(raw) => raw.parse().unwrap_or_else(|e: CoreError| {
                tracing::warn!(error = %e, "ignoring PTAX_FORMAT, using json");
                ResponseFormat::Json
            }),
            None => ResponseFormat::Json,
        };
        let currencies = profiled_env_opt(p, "PTAX_CURRENCIES")
            .map(|raw| parse_currency_list(&raw))
            .unwrap_or_else(|| DEFAULT_CURRENCIES.iter().map(|c| c.to_string()).collect());

        Self {
            base_url: profiled_env_or(p, "PTAX_BASE_URL", DEFAULT_PTAX_BASE_URL),
            page_size: profiled_env_usize(p, "PTAX_PAGE_SIZE", DEFAULT_PAGE_SIZE).max(1),
            format,
            currencies,
        }
    }
}

// ── Storage ───────────────────────────────────────────────────

/// Which object store the uploader writes to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    Gcs,
    S3,
    Local,
    Memory,
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            BackendKind::Gcs => "gcs",
            BackendKind::S3 => "s3",
            BackendKind::Local => "local",
            BackendKind::Memory => "memory",
        })
    }
}

impl std::str::FromStr for BackendKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gcs" | "gs" => Ok(BackendKind::Gcs),
            "s3" => Ok(BackendKind::S3),
            "local" | "file" => Ok(BackendKind::Local),
            "memory" => Ok(BackendKind::Memory),
            other => Err(CoreError::UnknownBackend(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub backend: BackendKind,
    pub bucket: Option<String>,
    /// Optional key prefix placed in front of every partition path.
    pub prefix: Option<String>,
    /// Service-account JSON for GCS; ambient credentials when unset.
    pub credentials_path: Option<PathBuf>,
    /// Root directory of the local backend (one sub-directory per bucket).
    pub data_dir: PathBuf,
}

impl StorageConfig {
    fn from_env_profiled(p: &str) -> Self {
        let backend = match profiled_env_opt(p, "STORAGE_BACKEND") {
            Some(raw) => raw.parse().unwrap_or_else(|e: CoreError| {
                tracing::warn!(error = %e, "ignoring STORAGE_BACKEND, using gcs");
                BackendKind::Gcs
            }),
            None => BackendKind::Gcs,
        };
        Self {
            backend,
            bucket: profiled_env_opt(p, "STORAGE_BUCKET"),
            prefix: profiled_env_opt(p, "STORAGE_PREFIX")
                .map(|s| s.trim_matches('/').to_string())
                .filter(|s| !s.is_empty()),
            credentials_path: profiled_env_opt(p, "GCS_CREDENTIALS_PATH").map(PathBuf::from),
            data_dir: PathBuf::from(profiled_env_or(p, "DATA_DIR", "data")),
        }
    }
}

// ── AWS / S3 ──────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AwsConfig {
    pub region: String,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    pub session_token: Option<String>,
    pub endpoint_url: Option<String>,
}

impl AwsConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            region: profiled_env_or(p, "AWS_REGION", "us-east-1"),
            access_key_id: profiled_env_opt(p, "AWS_ACCESS_KEY_ID"),
            secret_access_key: profiled_env_opt(p, "AWS_SECRET_ACCESS_KEY"),
            session_token: profiled_env_opt(p, "AWS_SESSION_TOKEN"),
            endpoint_url: profiled_env_opt(p, "AWS_ENDPOINT_URL"),
        }
    }
}
