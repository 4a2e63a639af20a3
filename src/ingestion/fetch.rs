//! Fetch functions - retrieve a query result from the Census data API

use crate::ingestion::diagnostics::{Diagnostic, DiagnosticSink};
use crate::ingestion::error::FetchError;
use crate::ingestion::parse::parse_payload;
use crate::ingestion::query::{resolve_url, CENSUS_BASE_URL};
use crate::ingestion::types::{Payload, Query};
use crate::ingestion::utils::{http_get, redact_key};
use reqwest::blocking::Client;
use std::time::Duration;
use tracing::info;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Issues one GET per query; no retries
#[derive(Debug, Clone)]
pub struct Fetcher {
    base_url: String,
    timeout: Duration,
}

impl Default for Fetcher {
    fn default() -> Self {
        Fetcher {
            base_url: CENSUS_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl Fetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Point structured queries at another host (mirrors, local test servers)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Fetch a query result. Every failure is reported to `sink` and
    /// returned; nothing is retried.
    pub fn fetch(&self, query: &Query, sink: &dyn DiagnosticSink) -> Result<Payload, FetchError> {
        match self.try_fetch(query, sink) {
            Ok(payload) => {
                sink.emit(Diagnostic::RequestSucceeded {
                    rows: payload.len(),
                    columns: payload.header().map_or(0, <[String]>::len),
                });
                Ok(payload)
            }
            Err(e) => {
                sink.emit(Diagnostic::FetchFailed {
                    reason: e.to_string(),
                });
                Err(e)
            }
        }
    }

    fn try_fetch(&self, query: &Query, sink: &dyn DiagnosticSink) -> Result<Payload, FetchError> {
        let url = resolve_url(&self.base_url, query)?;
        sink.emit(Diagnostic::RequestSent {
            url: redact_key(&url),
        });

        let client = Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| FetchError::Connection(e.to_string()))?;

        let body = http_get(&client, &url, self.timeout)?;
        info!("Downloaded {} bytes", body.len());

        parse_payload(&body)
    }
}
