//! Preflight row validation.
//!
//! Every row is checked against a fixed rule set before any Paddle call is
//! made: country support, postal-code format by country, required price id,
//! and billing-period timestamp format and direction. The whole table is
//! always checked; the caller gets one flat, row-ordered list of errors and
//! proceeds only when it is empty.

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::config::{
    CA_POSTAL_RE, PERIOD_TIMESTAMP_FORMAT, PERIOD_TIMESTAMP_RE, POSTAL_CODE_REQUIRED,
    UNSUPPORTED_COUNTRIES, US_POSTAL_RE,
};
use crate::models::ImportRow;

/// Validate all rows against the current wall clock.
pub fn validate_rows_now(rows: &[ImportRow]) -> Vec<String> {
    validate_rows(rows, Utc::now())
}

/// Validate all rows against an explicit `now`.
///
/// Pure function: no side effects, no cross-row state. Errors are collected
/// in row order, 1-indexed, and every row is checked even after earlier
/// rows fail.
pub fn validate_rows(rows: &[ImportRow], now: DateTime<Utc>) -> Vec<String> {
    let mut errors = Vec::new();

    for (index, row) in rows.iter().enumerate() {
        validate_row(row, index + 1, now, &mut errors);
    }

    errors
}

/// Validate a single row, appending errors in rule order.
fn validate_row(row: &ImportRow, row_number: usize, now: DateTime<Utc>, errors: &mut Vec<String>) {
    let ctx = format!("Row {} ({})", row_number, row.email_or_unknown());

    match row.country_code_upper() {
        None => {
            errors.push(format!("{ctx}: address_country_code is required"));
        }
        Some(country) => {
            if UNSUPPORTED_COUNTRIES.contains(country.as_str()) {
                errors.push(format!("{ctx}: country {country} is not supported by Paddle"));
            }

            if POSTAL_CODE_REQUIRED.contains(country.as_str()) {
                check_postal_code(row, &country, &ctx, errors);
            }
        }
    }

    if row.subscription_price_id.is_none() {
        errors.push(format!("{ctx}: subscription_price_id is required"));
    }

    if let Some(started) = row.current_period_started_at.as_deref() {
        match parse_period_timestamp(started) {
            None => errors.push(format!(
                "{ctx}: current_period_started_at must match YYYY-MM-DDTHH:MM:SSZ"
            )),
            Some(instant) if instant >= now => {
                errors.push(format!("{ctx}: current_period_started_at must be in the past"));
            }
            Some(_) => {}
        }
    }

    if let Some(ends) = row.current_period_ends_at.as_deref() {
        match parse_period_timestamp(ends) {
            None => errors.push(format!(
                "{ctx}: current_period_ends_at must match YYYY-MM-DDTHH:MM:SSZ"
            )),
            Some(instant) if instant <= now => {
                errors.push(format!("{ctx}: current_period_ends_at must be in the future"));
            }
            Some(_) => {}
        }
    }
}

/// Postal code rules for countries where Paddle requires one.
fn check_postal_code(row: &ImportRow, country: &str, ctx: &str, errors: &mut Vec<String>) {
    let Some(postal) = row.address_postal_code.as_deref() else {
        errors.push(format!(
            "{ctx}: address_postal_code is required for country {country}"
        ));
        return;
    };

    match country {
        "US" => {
            if !US_POSTAL_RE.is_match(postal) {
                errors.push(format!(
                    "{ctx}: US postal code must be exactly 5 digits, got '{postal}'"
                ));
            }
        }
        "CA" => {
            if !CA_POSTAL_RE.is_match(postal) {
                errors.push(format!(
                    "{ctx}: CA postal code must match format A1A 1A1, got '{postal}'"
                ));
            }
        }
        // Other postal-required countries: presence only, no format check.
        _ => {}
    }
}

/// Parse a billing period timestamp, requiring the exact `...Z` UTC shape.
fn parse_period_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if !PERIOD_TIMESTAMP_RE.is_match(value) {
        return None;
    }

    NaiveDateTime::parse_from_str(value, PERIOD_TIMESTAMP_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}
