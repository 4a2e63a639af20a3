//! Data ingestion module - fetch a Census query result and persist it as CSV

pub mod diagnostics;
pub mod error;
pub mod fetch;
pub mod parse;
pub mod query;
pub mod types;
pub mod utils;
pub mod write;

#[cfg(test)]
mod test_support;

pub use diagnostics::{Diagnostic, DiagnosticSink, MemorySink, TracingSink};
pub use error::{FetchError, IngestError, WriteError};
pub use fetch::Fetcher;
pub use types::*;

use std::path::Path;

/// Fetch `query` and write the result to `output`. Nothing is written when
/// the fetch fails.
pub fn ingest(
    fetcher: &Fetcher,
    query: &Query,
    output: &Path,
    sink: &dyn DiagnosticSink,
) -> Result<WriteOutcome, IngestError> {
    let payload = fetcher.fetch(query, sink)?;
    let outcome = write::write_csv(Some(&payload), output, sink)?;
    Ok(outcome)
}
