// Library module for testable functions

pub mod ingestion;

pub use ingestion::{ingest, CensusQuery, Fetcher, Payload, Query, WriteOutcome};
