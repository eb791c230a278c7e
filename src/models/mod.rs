//! Domain models for the import pipeline.
//!
//! - [`ImportRow`] - One CSV record, normalized to optional trimmed strings
//! - [`ImportResult`] - Aggregate per-batch bookkeeping returned to callers
//! - [`TransactionSuccess`] / [`TransactionFailure`] - Transaction-step entries
//! - [`clean_value`] - Blank/NaN-like cell normalization

use serde::{Deserialize, Serialize};
use serde_json::Value;

// =============================================================================
// Cell Normalization
// =============================================================================

/// Normalize a raw cell to an optional trimmed string.
///
/// Blank and NaN-like values (`""`, `nan`, `None`, `null`, any casing,
/// surrounding whitespace) become `None`; they must never survive as the
/// literal strings `"nan"` or `"None"` in API payloads.
pub fn clean_value(value: Option<&Value>) -> Option<String> {
    let raw = match value? {
        Value::Null => return None,
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };

    match raw.to_lowercase().as_str() {
        "" | "nan" | "none" | "null" => None,
        _ => Some(raw),
    }
}

// =============================================================================
// Import Row
// =============================================================================

/// One CSV record representing one customer-import unit.
///
/// Every field is optional; presence rules are enforced by the validator,
/// not by construction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportRow {
    pub customer_email: Option<String>,
    pub customer_full_name: Option<String>,
    pub customer_external_id: Option<String>,
    pub address_country_code: Option<String>,
    pub address_street_line1: Option<String>,
    pub address_street_line2: Option<String>,
    pub address_city: Option<String>,
    pub address_region: Option<String>,
    pub address_postal_code: Option<String>,
    pub address_external_id: Option<String>,
    pub business_name: Option<String>,
    pub business_company_number: Option<String>,
    pub business_tax_identifier: Option<String>,
    pub business_external_id: Option<String>,
    pub subscription_price_id: Option<String>,
    pub zero_dollar_sub_price_id: Option<String>,
    pub current_period_started_at: Option<String>,
    pub current_period_ends_at: Option<String>,
}

impl ImportRow {
    /// Build a row from a parsed CSV record (JSON object keyed by header).
    ///
    /// Column names are matched case-sensitively; unknown columns are
    /// ignored, missing ones come out as `None`.
    pub fn from_record(record: &Value) -> Self {
        let get = |key: &str| clean_value(record.get(key));

        Self {
            customer_email: get("customer_email"),
            customer_full_name: get("customer_full_name"),
            customer_external_id: get("customer_external_id"),
            address_country_code: get("address_country_code"),
            address_street_line1: get("address_street_line1"),
            address_street_line2: get("address_street_line2"),
            address_city: get("address_city"),
            address_region: get("address_region"),
            address_postal_code: get("address_postal_code"),
            address_external_id: get("address_external_id"),
            business_name: get("business_name"),
            business_company_number: get("business_company_number"),
            business_tax_identifier: get("business_tax_identifier"),
            business_external_id: get("business_external_id"),
            subscription_price_id: get("subscription_price_id"),
            zero_dollar_sub_price_id: get("zero_dollar_sub_price_id"),
            current_period_started_at: get("current_period_started_at"),
            current_period_ends_at: get("current_period_ends_at"),
        }
    }

    /// Country code upper-cased, as used by the validation rules.
    pub fn country_code_upper(&self) -> Option<String> {
        self.address_country_code
            .as_deref()
            .map(|c| c.to_uppercase())
    }

    /// Email for error messages; rows are allowed to lack one.
    pub fn email_or_unknown(&self) -> &str {
        self.customer_email.as_deref().unwrap_or("unknown")
    }

    /// Both billing period bounds present.
    pub fn has_billing_period(&self) -> bool {
        self.current_period_started_at.is_some() && self.current_period_ends_at.is_some()
    }
}

// =============================================================================
// Transaction Entries
// =============================================================================

/// A transaction created for an imported customer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransactionSuccess {
    pub customer_email: String,
    pub transaction_id: String,
    /// Hosted checkout URL; Paddle omits it for some transaction states.
    pub checkout_url: Option<String>,
}

/// A transaction that could not be created.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransactionFailure {
    pub customer_email: String,
    pub error: String,
}

// =============================================================================
// Import Result
// =============================================================================

/// Aggregate result of one import batch.
///
/// `successful` and `failed` count customer-creation outcomes only.
/// Transaction outcomes live in the side lists and never alter the
/// counters; address and business failures only append to `errors`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportResult {
    pub total_records: usize,
    pub successful: usize,
    pub failed: usize,
    pub errors: Vec<String>,
    pub validation_errors: Vec<String>,
    pub successful_transactions: Vec<TransactionSuccess>,
    pub failed_transactions: Vec<TransactionFailure>,
}

impl ImportResult {
    /// Empty result for a batch of `total_records` rows.
    pub fn new(total_records: usize) -> Self {
        Self {
            total_records,
            ..Default::default()
        }
    }

    /// Result for a batch rejected during preflight validation.
    ///
    /// No API call was made; `failed` reflects the number of validation
    /// errors found across the whole table.
    pub fn validation_failure(total_records: usize, validation_errors: Vec<String>) -> Self {
        Self {
            total_records,
            successful: 0,
            failed: validation_errors.len(),
            validation_errors,
            ..Default::default()
        }
    }
}
