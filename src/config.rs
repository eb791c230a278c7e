//! Static configuration for the import pipeline.
//!
//! Country rules, postal-code patterns, and Paddle base URLs live here as
//! immutable tables built once at first use, instead of being scattered
//! through the validation and client logic.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

/// Production Paddle API base URL.
pub const PRODUCTION_API_URL: &str = "https://api.paddle.com";

/// Sandbox Paddle API base URL.
pub const SANDBOX_API_URL: &str = "https://sandbox-api.paddle.com";

/// Select the Paddle base URL for the given environment flag.
pub fn api_base_url(sandbox: bool) -> &'static str {
    if sandbox {
        SANDBOX_API_URL
    } else {
        PRODUCTION_API_URL
    }
}

/// Countries Paddle cannot bill into. Rows with these codes are rejected
/// during validation before any API call is made.
pub static UNSUPPORTED_COUNTRIES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    HashSet::from([
        "AF", "AQ", "BY", "MM", "CF", "CU", "CD", "HT", "IR", "LY", "ML",
        "AN", "NI", "KP", "RU", "SO", "SS", "SD", "SY", "VE", "YE", "ZW",
    ])
});

/// Countries for which Paddle requires a postal code on the address.
pub static POSTAL_CODE_REQUIRED: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    HashSet::from(["AU", "CA", "FR", "DE", "IN", "IT", "NL", "ES", "GB", "US"])
});

/// US ZIP code: exactly five decimal digits.
pub static US_POSTAL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{5}$").expect("invalid US postal regex"));

/// Canadian postal code: A1A 1A1, with the single middle space optional.
pub static CA_POSTAL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z]\d[A-Za-z] ?\d[A-Za-z]\d$").expect("invalid CA postal regex")
});

/// Billing period timestamps must be UTC ISO-8601: `YYYY-MM-DDTHH:MM:SSZ`.
pub static PERIOD_TIMESTAMP_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}Z$").expect("invalid timestamp regex")
});

/// chrono format string matching [`PERIOD_TIMESTAMP_RE`].
pub const PERIOD_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";
