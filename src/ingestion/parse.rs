//! Parse functions - transform a raw response body into a Payload

use crate::ingestion::error::FetchError;
use crate::ingestion::types::Payload;
use tracing::debug;

/// Decode a Census JSON body: an array of rows, each an array of scalars
pub fn parse_payload(body: &str) -> Result<Payload, FetchError> {
    let payload: Payload = serde_json::from_str(body)
        .map_err(|e| FetchError::MalformedResponse(e.to_string()))?;

    if let Some(header) = payload.header() {
        let ragged = payload
            .records()
            .iter()
            .filter(|row| row.len() != header.len())
            .count();
        if ragged > 0 {
            // Not enforced; written as-is
            debug!("{} rows differ in width from the header", ragged);
        }
    }

    Ok(payload)
}
