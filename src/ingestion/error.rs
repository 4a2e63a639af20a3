use reqwest::StatusCode;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("invalid request URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("the request timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("connection failed: {0}")]
    Connection(String),

    // Census explains bad variables or geographies in the response body
    #[error("HTTP {status}: {body}")]
    HttpStatus { status: StatusCode, body: String },

    #[error("the API returned an empty response (status {0})")]
    EmptyResponse(StatusCode),

    #[error("unexpected response shape: {0}")]
    MalformedResponse(String),
}

#[derive(Error, Debug)]
pub enum WriteError {
    #[error("failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode CSV for {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("write failed: {0}")]
    Write(#[from] WriteError),
}
