//! Utility functions for common operations

use crate::ingestion::error::FetchError;
use reqwest::blocking::Client;
use std::time::Duration;
use tracing::debug;

const BODY_SNIPPET_CHARS: usize = 200;

/// Perform a single HTTP GET and return the body text.
/// Error statuses are reported as `FetchError::HttpStatus`.
pub fn http_get(client: &Client, url: &str, timeout: Duration) -> Result<String, FetchError> {
    let response = client
        .get(url)
        .send()
        .map_err(|e| classify_request_error(e, timeout))?;
    let status = response.status();
    debug!("Received HTTP {}", status);

    if !status.is_success() {
        // Best effort; a stalled error body still reports the status
        let body = response.text().map(|b| snippet(&b)).unwrap_or_default();
        return Err(FetchError::HttpStatus { status, body });
    }

    let body = response
        .text()
        .map_err(|e| classify_request_error(e, timeout))?;

    if body.trim().is_empty() {
        return Err(FetchError::EmptyResponse(status));
    }

    Ok(body)
}

fn classify_request_error(err: reqwest::Error, timeout: Duration) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout(timeout)
    } else {
        FetchError::Connection(err.to_string())
    }
}

/// Trimmed prefix of an error body, kept short for diagnostics
fn snippet(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.chars().count() <= BODY_SNIPPET_CHARS {
        return trimmed.to_string();
    }
    let cut: String = trimmed.chars().take(BODY_SNIPPET_CHARS).collect();
    format!("{}...", cut)
}

/// Replace the value of every `key=` query parameter with `***`
///
/// Split by hand so every other byte of the URL is logged as sent;
/// `Url::query_pairs_mut` would re-serialize `:` as `%3A` and `%20` as `+`.
pub fn redact_key(url: &str) -> String {
    let Some((base, query)) = url.split_once('?') else {
        return url.to_string();
    };

    let params = query
        .split('&')
        .map(|param| match param.split_once('=') {
            Some(("key", _)) => "key=***".to_string(),
            _ => param.to_string(),
        })
        .collect::<Vec<_>>()
        .join("&");

    format!("{}?{}", base, params)
}

/// Split a comma-separated variable list, dropping blanks
pub fn parse_variables(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}
