//! Census ingestion runner - fetches one query and writes it to CSV

use anyhow::{bail, Context, Result};
use census_ingest::ingestion::query::CENSUS_BASE_URL;
use census_ingest::ingestion::utils::parse_variables;
use census_ingest::ingestion::{ingest, CensusQuery, Fetcher, Query, TracingSink};
use std::env;
use std::path::PathBuf;
use tracing::{error, info};

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    // Load configuration from environment
    dotenvy::dotenv().ok();
    let config = Config::from_env(env::args().nth(1))?;
    info!("Configuration loaded");

    let query = config.query()?;
    let fetcher = Fetcher::new().with_base_url(&config.base_url);

    match ingest(&fetcher, &query, &config.output_path, &TracingSink) {
        Ok(outcome) => {
            info!("✓ census ingestion completed: {}", outcome);
            Ok(())
        }
        Err(e) => {
            error!("✗ census ingestion failed: {}", e);
            Err(e.into())
        }
    }
}

/// Configuration loaded from environment variables
#[derive(Debug, Clone)]
struct Config {
    api_key: Option<String>,
    year: String,
    dataset: String,
    variables: Vec<String>,
    geography: String,
    raw_url: Option<String>,
    base_url: String,
    output_path: PathBuf,
}

impl Config {
    fn from_env(output_arg: Option<String>) -> Result<Self> {
        let output_path = output_arg
            .or_else(|| env::var("OUTPUT_PATH").ok())
            .unwrap_or_else(|| "census_data.csv".to_string());

        Ok(Config {
            api_key: env::var("CENSUS_API_KEY").ok().filter(|k| !k.is_empty()),

            year: env::var("CENSUS_YEAR").unwrap_or_else(|_| "2022".to_string()),

            dataset: env::var("CENSUS_DATASET").unwrap_or_else(|_| "acs/acs5".to_string()),

            variables: parse_variables(
                &env::var("CENSUS_VARIABLES")
                    .unwrap_or_else(|_| "NAME,B19013_001E,B19013_001M".to_string()),
            ),

            geography: env::var("CENSUS_GEO").unwrap_or_else(|_| "&for=state:*".to_string()),

            raw_url: env::var("CENSUS_URL").ok().filter(|u| !u.is_empty()),

            base_url: env::var("CENSUS_BASE_URL").unwrap_or_else(|_| CENSUS_BASE_URL.to_string()),

            output_path: PathBuf::from(output_path),
        })
    }

    /// A raw URL takes precedence over the structured parameters
    fn query(&self) -> Result<Query> {
        if let Some(url) = &self.raw_url {
            info!("Using raw URL from CENSUS_URL");
            return Ok(Query::Raw(url.clone()));
        }

        if self.variables.is_empty() {
            bail!("CENSUS_VARIABLES must list at least one variable");
        }

        let api_key = self
            .api_key
            .clone()
            .context("CENSUS_API_KEY must be set (or provide CENSUS_URL)")?;

        Ok(Query::Structured(CensusQuery::new(
            self.year.clone(),
            self.dataset.clone(),
            self.variables.clone(),
            self.geography.clone(),
            api_key,
        )))
    }
}
