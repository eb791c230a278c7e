//! End-to-end import pipeline: parse, validate, execute.
//!
//! The two phases are strictly separated: the validator runs over the whole
//! table first, and a single validation error anywhere means no Paddle call
//! is made for the entire batch.
//!
//! # Example
//!
//! ```rust,ignore
//! use paddleload::import::{import_bytes, ImportOptions};
//!
//! let options = ImportOptions::new("pdl_sdbx_...", true);
//! let result = import_bytes(&csv_bytes, &options).await?;
//! println!("{} imported, {} failed", result.successful, result.failed);
//! ```

use serde_json::Value;

use crate::api::logs::{log_info, log_success, log_warning};
use crate::error::ImportError;
use crate::models::{ImportResult, ImportRow};
use crate::paddle::PaddleClient;
use crate::parser::parse_bytes_auto;
use crate::validation::validate_rows_now;

use super::orchestrator;

/// Options for one import run.
#[derive(Debug, Clone)]
pub struct ImportOptions {
    /// Paddle bearer credential.
    pub api_key: String,

    /// Target the sandbox environment instead of production.
    pub sandbox: bool,

    /// Override the base URL entirely (takes precedence over `sandbox`).
    pub base_url: Option<String>,
}

impl ImportOptions {
    pub fn new(api_key: impl Into<String>, sandbox: bool) -> Self {
        Self {
            api_key: api_key.into(),
            sandbox,
            base_url: None,
        }
    }

    /// Point the importer at an explicit base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    fn client(&self) -> PaddleClient {
        match &self.base_url {
            Some(url) => PaddleClient::new(url.clone(), self.api_key.clone()),
            None => PaddleClient::for_environment(self.api_key.clone(), self.sandbox),
        }
    }
}

/// Import a CSV file provided as raw bytes.
pub async fn import_bytes(bytes: &[u8], options: &ImportOptions) -> Result<ImportResult, ImportError> {
    if options.api_key.trim().is_empty() {
        return Err(ImportError::MissingApiKey);
    }

    log_info("Loading CSV data...");
    let parsed = parse_bytes_auto(bytes)?;
    log_success(format!("Loaded {} rows from CSV", parsed.records.len()));

    let rows = rows_from_records(&parsed.records);
    Ok(import_rows(rows, options).await)
}

/// Validate then execute already-normalized rows.
///
/// Validation failure is not an error of the pipeline itself: the batch
/// result comes back with `validation_errors` populated, `failed` set to
/// the error count, and zero network calls made.
pub async fn import_rows(rows: Vec<ImportRow>, options: &ImportOptions) -> ImportResult {
    log_info(format!("Validating {} rows...", rows.len()));
    let validation_errors = validate_rows_now(&rows);

    if !validation_errors.is_empty() {
        log_warning(format!(
            "Validation failed with {} error(s); no records were imported",
            validation_errors.len()
        ));
        return ImportResult::validation_failure(rows.len(), validation_errors);
    }
    log_success("All rows valid");

    let client = options.client();
    log_info(format!("Using Paddle API: {}", client.base_url()));

    orchestrator::run(&rows, &client).await
}

/// Normalize parsed CSV records into typed rows.
pub fn rows_from_records(records: &[Value]) -> Vec<ImportRow> {
    records.iter().map(ImportRow::from_record).collect()
}
