//! # paddleload - batch CSV customer import for Paddle Billing
//!
//! paddleload reads a CSV of customer billing records and, per row, creates
//! a customer, optionally an address and a business, and a zero-dollar
//! transaction on the Paddle payment platform, reporting per-row outcomes.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   CSV File  │────▶│   Parser    │────▶│  Validator  │────▶│ Orchestrator│
//! │ (multipart) │     │ (auto-enc)  │     │ (preflight) │     │ (Paddle API)│
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! The two phases are strictly separated: validation runs over the entire
//! table first, and a single error anywhere means no API call is made for
//! the batch.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use paddleload::import::{import_bytes, ImportOptions};
//!
//! #[tokio::main]
//! async fn main() {
//!     let bytes = std::fs::read("customers.csv").unwrap();
//!     let options = ImportOptions::new("pdl_sdbx_...", true);
//!     let result = import_bytes(&bytes, &options).await.unwrap();
//!     println!("{} imported, {} failed", result.successful, result.failed);
//! }
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`config`] - Static country rules and base URLs
//! - [`models`] - Domain models (ImportRow, ImportResult)
//! - [`parser`] - CSV parsing with auto-detection
//! - [`validation`] - Preflight row validation
//! - [`paddle`] - Paddle API client
//! - [`import`] - Orchestrator and pipeline
//! - [`export`] - Result list to CSV reshaping
//! - [`api`] - HTTP API server

// Core modules
pub mod config;
pub mod error;
pub mod models;

// Parsing
pub mod parser;

// Validation
pub mod validation;

// Paddle client
pub mod paddle;

// Import pipeline
pub mod import;

// Export
pub mod export;

// HTTP API
pub mod api;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{CsvError, ExportError, ImportError, PaddleError};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{clean_value, ImportResult, ImportRow, TransactionFailure, TransactionSuccess};

// =============================================================================
// Re-exports - Parsing
// =============================================================================

pub use parser::{detect_delimiter, detect_encoding, parse_bytes_auto, parse_csv_file_auto, ParseResult};

// =============================================================================
// Re-exports - Validation
// =============================================================================

pub use validation::{validate_rows, validate_rows_now};

// =============================================================================
// Re-exports - Paddle client
// =============================================================================

pub use paddle::{CreatedTransaction, PaddleClient};

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use import::{import_bytes, import_rows, ImportOptions};

// =============================================================================
// Re-exports - Export
// =============================================================================

pub use export::records_to_csv;

// Server
pub mod server {
    pub use crate::api::server::start_server;
}
