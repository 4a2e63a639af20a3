//! Operator-facing diagnostics, routed through an injectable sink

use std::fmt;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::{error, info, warn};

/// One human-readable progress or failure event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// URL with the API key redacted
    RequestSent { url: String },
    RequestSucceeded { rows: usize, columns: usize },
    FetchFailed { reason: String },
    NothingToWrite,
    Written { path: PathBuf, rows: usize },
    WriteFailed { reason: String },
}

impl Diagnostic {
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Diagnostic::FetchFailed { .. } | Diagnostic::WriteFailed { .. }
        )
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::RequestSent { url } => write!(f, "Sending request to: {}", url),
            Diagnostic::RequestSucceeded { rows, columns } => {
                write!(f, "Request successful! ({} rows, {} columns)", rows, columns)
            }
            Diagnostic::FetchFailed { reason } => {
                write!(f, "Error: An error occurred while fetching data: {}", reason)
            }
            Diagnostic::NothingToWrite => write!(f, "No data to transform."),
            Diagnostic::Written { path, rows } => {
                write!(f, "Data successfully saved to {} ({} rows)", path.display(), rows)
            }
            Diagnostic::WriteFailed { reason } => write!(f, "Error writing to CSV: {}", reason),
        }
    }
}

pub trait DiagnosticSink {
    fn emit(&self, diagnostic: Diagnostic);
}

/// Default sink: forwards each diagnostic to `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&self, diagnostic: Diagnostic) {
        match &diagnostic {
            Diagnostic::FetchFailed { .. } | Diagnostic::WriteFailed { .. } => {
                error!("{}", diagnostic)
            }
            Diagnostic::NothingToWrite => warn!("{}", diagnostic),
            _ => info!("{}", diagnostic),
        }
    }
}

/// Keeps every diagnostic in memory, for tests and callers that inspect them
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<Diagnostic>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Diagnostic> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn has_failure(&self) -> bool {
        self.events().iter().any(Diagnostic::is_failure)
    }
}

impl DiagnosticSink for MemorySink {
    fn emit(&self, diagnostic: Diagnostic) {
        match self.events.lock() {
            Ok(mut events) => events.push(diagnostic),
            Err(poisoned) => poisoned.into_inner().push(diagnostic),
        }
    }
}
