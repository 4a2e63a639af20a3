//! Write functions - persist a payload as a CSV file

use crate::ingestion::diagnostics::{Diagnostic, DiagnosticSink};
use crate::ingestion::error::WriteError;
use crate::ingestion::types::{Payload, WriteOutcome};
use csv::{Terminator, WriterBuilder};
use std::fs::File;
use std::path::Path;
use tracing::debug;

#[cfg(windows)]
pub const LINE_TERMINATOR: &str = "\r\n";
#[cfg(not(windows))]
pub const LINE_TERMINATOR: &str = "\n";

/// Write every row of `payload` to `path`, creating or truncating the file.
///
/// An absent or empty payload leaves the filesystem untouched. On an I/O
/// failure the partially written file stays on disk.
pub fn write_csv(
    payload: Option<&Payload>,
    path: &Path,
    sink: &dyn DiagnosticSink,
) -> Result<WriteOutcome, WriteError> {
    let payload = match payload {
        Some(p) if !p.is_empty() => p,
        _ => {
            sink.emit(Diagnostic::NothingToWrite);
            return Ok(WriteOutcome::NothingToWrite);
        }
    };

    match write_rows(payload, path) {
        Ok(rows) => {
            sink.emit(Diagnostic::Written {
                path: path.to_path_buf(),
                rows,
            });
            Ok(WriteOutcome::Written {
                path: path.to_path_buf(),
                rows,
            })
        }
        Err(e) => {
            sink.emit(Diagnostic::WriteFailed {
                reason: e.to_string(),
            });
            Err(e)
        }
    }
}

fn write_rows(payload: &Payload, path: &Path) -> Result<usize, WriteError> {
    let file = File::create(path).map_err(|source| WriteError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut writer = WriterBuilder::new()
        .flexible(true)
        .terminator(terminator())
        .from_writer(file);

    for row in payload.rows() {
        writer.write_record(row).map_err(|e| csv_error(path, e))?;
    }

    writer.flush().map_err(|source| WriteError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    debug!("Flushed {} rows to {:?}", payload.len(), path);
    Ok(payload.len())
}

fn terminator() -> Terminator {
    if cfg!(windows) {
        Terminator::CRLF
    } else {
        Terminator::Any(b'\n')
    }
}

fn csv_error(path: &Path, source: csv::Error) -> WriteError {
    WriteError::Csv {
        path: path.to_path_buf(),
        source,
    }
}
