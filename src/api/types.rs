//! REST API request/response types.
//!
//! The import endpoint returns [`crate::models::ImportResult`] directly;
//! this module carries the download-csv contract and the error payload
//! helper.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Which result list the client wants exported.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DownloadKind {
    Success,
    Failed,
}

impl DownloadKind {
    /// Suggested filename for the exported CSV.
    pub fn filename(&self) -> &'static str {
        match self {
            DownloadKind::Success => "successful_transactions.csv",
            DownloadKind::Failed => "failed_transactions.csv",
        }
    }
}

/// Body of `POST /api/download-csv`.
#[derive(Debug, Clone, Deserialize)]
pub struct DownloadRequest {
    #[serde(rename = "type")]
    pub kind: DownloadKind,
    #[serde(default)]
    pub data: Vec<Value>,
}

/// Response of `POST /api/download-csv`.
#[derive(Debug, Clone, Serialize)]
pub struct DownloadResponse {
    pub csv_content: String,
    pub filename: String,
}

/// Single-message error payload used by every error tier.
pub fn error_response(error: &str) -> Value {
    json!({ "error": error })
}
