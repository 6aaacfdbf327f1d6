//! Where the records API lives.

use crate::api::HttpRecordsApi;
use crate::client::RecordsClient;
use crate::sink::ErrorSink;
use crate::transport::UreqTransport;

/// Environment variable overriding the API base URL.
pub const BASE_URL_ENV: &str = "WATER_QUALITY_API_URL";

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Read the base URL from `WATER_QUALITY_API_URL`, falling back to the
    /// local development server.
    pub fn from_env() -> Self {
        match std::env::var(BASE_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => Self::new(url.trim()),
            _ => Self::default(),
        }
    }

    /// Records API over HTTP, reporting failures to `sink`.
    pub fn connect<S: ErrorSink + Sync>(&self, sink: S) -> HttpRecordsApi<UreqTransport, S> {
        HttpRecordsApi::new(
            RecordsClient::new(&self.base_url),
            UreqTransport::new(),
            sink,
        )
    }
}
