//! Core data types for the ingestion pipeline
//! Pure data structures with no behavior

use serde::Deserialize;
use serde_json::Value;
use std::path::PathBuf;

/// Structured parameters for a Census data API request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CensusQuery {
    pub year: String,
    pub dataset: String,
    pub variables: Vec<String>,
    /// Query-string fragment including its own leading `&`, e.g. `&for=state:*`
    pub geography: String,
    pub api_key: String,
}

impl CensusQuery {
    pub fn new(
        year: impl Into<String>,
        dataset: impl Into<String>,
        variables: Vec<String>,
        geography: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        CensusQuery {
            year: year.into(),
            dataset: dataset.into(),
            variables,
            geography: geography.into(),
            api_key: api_key.into(),
        }
    }
}

/// What to fetch - built from parameters or a URL supplied by the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    Structured(CensusQuery),
    Raw(String),
}

impl From<CensusQuery> for Query {
    fn from(query: CensusQuery) -> Self {
        Query::Structured(query)
    }
}

/// Rows of cells returned by the API; the first row usually holds column names
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Vec<Vec<Value>>")]
pub struct Payload {
    rows: Vec<Vec<String>>,
}

impl Payload {
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Payload { rows }
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Vec<String>> {
        self.rows
    }

    pub fn header(&self) -> Option<&[String]> {
        self.rows.first().map(Vec::as_slice)
    }

    /// Data rows after the header
    pub fn records(&self) -> &[Vec<String>] {
        self.rows.get(1..).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl From<Vec<Vec<String>>> for Payload {
    fn from(rows: Vec<Vec<String>>) -> Self {
        Payload::new(rows)
    }
}

impl From<Vec<Vec<&str>>> for Payload {
    fn from(rows: Vec<Vec<&str>>) -> Self {
        Payload::new(
            rows.into_iter()
                .map(|row| row.into_iter().map(str::to_string).collect())
                .collect(),
        )
    }
}

impl TryFrom<Vec<Vec<Value>>> for Payload {
    type Error = String;

    fn try_from(raw: Vec<Vec<Value>>) -> Result<Self, Self::Error> {
        let mut rows = Vec::with_capacity(raw.len());

        for (row_idx, raw_row) in raw.into_iter().enumerate() {
            let mut row = Vec::with_capacity(raw_row.len());
            for (col_idx, cell) in raw_row.into_iter().enumerate() {
                let text = match cell {
                    Value::String(s) => s,
                    Value::Null => String::new(),
                    Value::Bool(b) => b.to_string(),
                    Value::Number(n) => n.to_string(),
                    Value::Array(_) | Value::Object(_) => {
                        return Err(format!(
                            "row {} column {} is not a scalar value",
                            row_idx, col_idx
                        ))
                    }
                };
                row.push(text);
            }
            rows.push(row);
        }

        Ok(Payload { rows })
    }
}

/// Result of a write call that did not fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    Written { path: PathBuf, rows: usize },
    NothingToWrite,
}

impl std::fmt::Display for WriteOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WriteOutcome::Written { path, rows } => {
                write!(f, "wrote {} rows to {}", rows, path.display())
            }
            WriteOutcome::NothingToWrite => write!(f, "nothing to write"),
        }
    }
}
