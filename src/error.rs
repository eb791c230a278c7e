//! Error types for the paddleload import pipeline.
//!
//! This module defines a hierarchy of error types:
//!
//! - [`CsvError`] - CSV decoding and parsing errors
//! - [`PaddleError`] - Paddle API client errors
//! - [`ExportError`] - Result-to-CSV export errors
//! - [`ImportError`] - Top-level pipeline errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use thiserror::Error;

// =============================================================================
// CSV Parsing Errors
// =============================================================================

/// Errors during CSV decoding and parsing.
#[derive(Debug, Error)]
pub enum CsvError {
    /// Failed to read file.
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to decode content with the detected encoding.
    #[error("Failed to decode content: {0}")]
    Encoding(String),

    /// Invalid CSV format.
    #[error("Invalid CSV format: {0}")]
    Parse(String),

    /// Empty file.
    #[error("CSV file is empty")]
    EmptyFile,

    /// No headers found.
    #[error("No headers found in CSV")]
    NoHeaders,
}

impl From<csv::Error> for CsvError {
    fn from(e: csv::Error) -> Self {
        CsvError::Parse(e.to_string())
    }
}

// =============================================================================
// Paddle API Errors
// =============================================================================

/// Errors from the Paddle API client.
#[derive(Debug, Error)]
pub enum PaddleError {
    /// HTTP transport failure (connection, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The API answered with a non-creation / non-success status.
    /// The body is kept verbatim for the per-row error report.
    #[error("{body}")]
    Api { status: u16, body: String },

    /// The API answered successfully but the body did not match
    /// the expected `data` envelope.
    #[error("Invalid API response: {0}")]
    InvalidResponse(String),
}

impl PaddleError {
    /// HTTP status of an API-level error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            PaddleError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

// =============================================================================
// Export Errors
// =============================================================================

/// Errors while reshaping result lists into CSV text.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Nothing to export.
    #[error("No records to export")]
    Empty,

    /// CSV writing failed.
    #[error("CSV write error: {0}")]
    Write(String),
}

impl From<csv::Error> for ExportError {
    fn from(e: csv::Error) -> Self {
        ExportError::Write(e.to_string())
    }
}

// =============================================================================
// Import Pipeline Errors (top-level)
// =============================================================================

/// Top-level pipeline errors.
///
/// Returned by [`crate::import::pipeline::import_bytes`] when the import
/// cannot even start. Per-row execution failures are never surfaced here;
/// they land in the [`crate::models::ImportResult`] bookkeeping instead.
#[derive(Debug, Error)]
pub enum ImportError {
    /// CSV parsing error.
    #[error("CSV error: {0}")]
    Csv(#[from] CsvError),

    /// Missing API credential.
    #[error("No API key provided")]
    MissingApiKey,
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for CSV operations.
pub type CsvResult<T> = Result<T, CsvError>;

/// Result type for Paddle API operations.
pub type PaddleResult<T> = Result<T, PaddleError>;

/// Result type for export operations.
pub type ExportResult<T> = Result<T, ExportError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, ImportError>;
