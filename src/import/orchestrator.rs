//! Per-row import orchestration.
//!
//! Rows execute strictly in table order, one at a time. Within a row the
//! steps are: customer (hard), address (soft), business (soft), dependent id
//! resolution, transaction (soft, tracked separately). A hard failure
//! abandons the rest of the row; soft failures are recorded and the row
//! continues. Nothing a row does can abort the batch.
//!
//! Counters: `successful`/`failed` reflect customer creation only. The
//! transaction step reports into `successful_transactions` /
//! `failed_transactions` and the flat error list, never into the counters.

use crate::api::logs::{log_error, log_info, log_success, log_warning};
use crate::models::{ImportResult, ImportRow, TransactionFailure, TransactionSuccess};
use crate::paddle::PaddleClient;

/// Outcome of an optional create step (address or business).
enum StepOutcome {
    /// Created; id taken from the create call's own response.
    Created(String),
    /// Create call failed; recorded as a warning, row continues.
    SoftFailed,
    /// Precondition column absent, step not attempted.
    Skipped,
}

/// Execute all rows against the Paddle API.
///
/// The caller is responsible for running validation first; this function
/// issues network calls unconditionally.
pub async fn run(rows: &[ImportRow], client: &PaddleClient) -> ImportResult {
    let mut result = ImportResult::new(rows.len());

    log_info(format!("Processing {} records...", rows.len()));
    for (index, row) in rows.iter().enumerate() {
        process_row(row, index + 1, rows.len(), client, &mut result).await;
    }
    log_info(format!(
        "Import completed. Success: {}, Failed: {}",
        result.successful, result.failed
    ));

    result
}

async fn process_row(
    row: &ImportRow,
    row_number: usize,
    total: usize,
    client: &PaddleClient,
    result: &mut ImportResult,
) {
    let email = row.email_or_unknown().to_string();
    log_info(format!("Row {row_number}/{total}: {email}"));

    // Step 1: customer. Hard dependency for everything that follows.
    let customer_id = match client.create_customer(row).await {
        Ok(id) => {
            log_success(format!("Created customer {id}"));
            result.successful += 1;
            id
        }
        Err(e) => {
            let msg = format!("Failed to create customer {email}: {e}");
            log_error(msg.clone());
            result.errors.push(msg);
            result.failed += 1;
            return;
        }
    };

    // Step 2: address, only when a country code is present.
    let address = match &row.address_country_code {
        Some(_) => match client.create_address(&customer_id, row).await {
            Ok(id) => {
                log_success(format!("Created address {id} for customer {customer_id}"));
                StepOutcome::Created(id)
            }
            Err(e) => {
                let msg = format!("Failed to create address for {email}: {e}");
                log_warning(msg.clone());
                result.errors.push(msg);
                StepOutcome::SoftFailed
            }
        },
        None => StepOutcome::Skipped,
    };

    // Step 3: business, only when a business name is present.
    let business = match &row.business_name {
        Some(_) => match client.create_business(&customer_id, row).await {
            Ok(id) => {
                log_success(format!("Created business {id} for customer {customer_id}"));
                StepOutcome::Created(id)
            }
            Err(e) => {
                let msg = format!("Failed to create business for {email}: {e}");
                log_warning(msg.clone());
                result.errors.push(msg);
                StepOutcome::SoftFailed
            }
        },
        None => StepOutcome::Skipped,
    };

    // Step 4: dependent ids. A created entity supplies its own id; after a
    // soft failure, fall back to the first entry of the customer's listing
    // in case a matching resource already exists. List errors leave the id
    // unset rather than failing the row.
    let address_id = match address {
        StepOutcome::Created(id) => Some(id),
        StepOutcome::SoftFailed => client
            .first_address_id(&customer_id)
            .await
            .ok()
            .flatten(),
        StepOutcome::Skipped => None,
    };
    let business_id = match business {
        StepOutcome::Created(id) => Some(id),
        StepOutcome::SoftFailed => client
            .first_business_id(&customer_id)
            .await
            .ok()
            .flatten(),
        StepOutcome::Skipped => None,
    };

    // Step 5: zero-dollar transaction. Outcome tracked in the side lists
    // only; the customer above still counts as successfully imported.
    match client
        .create_transaction(row, &customer_id, address_id.as_deref(), business_id.as_deref())
        .await
    {
        Ok(txn) => {
            log_success(format!("Created transaction {} for customer {customer_id}", txn.id));
            result.successful_transactions.push(TransactionSuccess {
                customer_email: email,
                transaction_id: txn.id,
                checkout_url: txn.checkout_url,
            });
        }
        Err(e) => {
            let msg = format!("Failed to create transaction for {email}: {e}");
            log_error(msg.clone());
            result.failed_transactions.push(TransactionFailure {
                customer_email: email,
                error: e.to_string(),
            });
            result.errors.push(msg);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn valid_row(email: &str) -> ImportRow {
        ImportRow {
            customer_email: Some(email.into()),
            customer_full_name: Some("Test User".into()),
            address_country_code: Some("US".into()),
            address_street_line1: Some("1 Main St".into()),
            address_city: Some("Springfield".into()),
            address_postal_code: Some("94107".into()),
            subscription_price_id: Some("pri_sub".into()),
            zero_dollar_sub_price_id: Some("pri_zero".into()),
            ..Default::default()
        }
    }

    fn created(id: &str) -> ResponseTemplate {
        ResponseTemplate::new(201).set_body_json(json!({ "data": { "id": id } }))
    }

    #[tokio::test]
    async fn test_full_row_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/customers"))
            .respond_with(created("ctm_01"))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/customers/ctm_01/addresses"))
            .respond_with(created("add_01"))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/transactions"))
            .and(body_partial_json(json!({ "address_id": "add_01" })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "data": { "id": "txn_01", "checkout": { "url": "https://pay.example/t" } }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = PaddleClient::new(server.uri(), "key");
        let result = run(&[valid_row("a@example.com")], &client).await;

        assert_eq!(result.total_records, 1);
        assert_eq!(result.successful, 1);
        assert_eq!(result.failed, 0);
        assert!(result.errors.is_empty());
        assert_eq!(result.successful_transactions.len(), 1);
        assert_eq!(result.successful_transactions[0].transaction_id, "txn_01");
        assert_eq!(
            result.successful_transactions[0].checkout_url.as_deref(),
            Some("https://pay.example/t")
        );
    }

    #[tokio::test]
    async fn test_customer_failure_is_hard_stop_for_row() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/customers"))
            .and(body_partial_json(json!({ "email": "bad@example.com" })))
            .respond_with(
                ResponseTemplate::new(422)
                    .set_body_string(r#"{"error":{"code":"email_invalid"}}"#),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/customers"))
            .and(body_partial_json(json!({ "email": "good@example.com" })))
            .respond_with(created("ctm_02"))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/customers/ctm_02/addresses"))
            .respond_with(created("add_02"))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/transactions"))
            .respond_with(created("txn_02"))
            .mount(&server)
            .await;

        let client = PaddleClient::new(server.uri(), "key");
        let rows = vec![valid_row("bad@example.com"), valid_row("good@example.com")];
        let result = run(&rows, &client).await;

        // Row 1 stopped at the customer step but row 2 completed.
        assert_eq!(result.successful, 1);
        assert_eq!(result.failed, 1);
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].contains("bad@example.com"));
        assert!(result.errors[0].contains("email_invalid"));
        assert_eq!(result.successful_transactions.len(), 1);
        assert_eq!(
            result.successful_transactions[0].customer_email,
            "good@example.com"
        );
    }

    #[tokio::test]
    async fn test_address_soft_failure_falls_back_to_listing() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/customers"))
            .respond_with(created("ctm_01"))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/customers/ctm_01/addresses"))
            .respond_with(ResponseTemplate::new(400).set_body_string("postal_code rejected"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/customers/ctm_01/addresses"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{ "id": "add_prior" }, { "id": "add_other" }]
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/transactions"))
            .and(body_partial_json(json!({ "address_id": "add_prior" })))
            .respond_with(created("txn_01"))
            .expect(1)
            .mount(&server)
            .await;

        let client = PaddleClient::new(server.uri(), "key");
        let result = run(&[valid_row("a@example.com")], &client).await;

        // Address failure is a warning: customer counts, transaction created.
        assert_eq!(result.successful, 1);
        assert_eq!(result.failed, 0);
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].contains("Failed to create address"));
        assert_eq!(result.successful_transactions.len(), 1);
    }

    #[tokio::test]
    async fn test_transaction_failure_does_not_touch_counters() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/customers"))
            .respond_with(created("ctm_01"))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/customers/ctm_01/addresses"))
            .respond_with(created("add_01"))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/transactions"))
            .respond_with(ResponseTemplate::new(400).set_body_string("price archived"))
            .mount(&server)
            .await;

        let client = PaddleClient::new(server.uri(), "key");
        let result = run(&[valid_row("a@example.com")], &client).await;

        assert_eq!(result.successful, 1);
        assert_eq!(result.failed, 0);
        assert_eq!(result.failed_transactions.len(), 1);
        assert_eq!(result.failed_transactions[0].customer_email, "a@example.com");
        assert!(result.failed_transactions[0].error.contains("price archived"));
        assert_eq!(result.errors.len(), 1);
        assert!(result.successful_transactions.is_empty());
    }

    #[tokio::test]
    async fn test_business_created_with_customer_contact() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/customers"))
            .respond_with(created("ctm_01"))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/customers/ctm_01/addresses"))
            .respond_with(created("add_01"))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/customers/ctm_01/businesses"))
            .and(body_partial_json(json!({
                "name": "Acme Inc",
                "contacts": [{ "name": "Test User", "email": "a@example.com" }],
            })))
            .respond_with(created("biz_01"))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/transactions"))
            .and(body_partial_json(json!({ "business_id": "biz_01" })))
            .respond_with(created("txn_01"))
            .expect(1)
            .mount(&server)
            .await;

        let mut row = valid_row("a@example.com");
        row.business_name = Some("Acme Inc".into());

        let client = PaddleClient::new(server.uri(), "key");
        let result = run(&[row], &client).await;
        assert_eq!(result.successful, 1);
        assert!(result.errors.is_empty());
    }

    #[tokio::test]
    async fn test_skipped_steps_issue_no_calls() {
        // No country code, no business name: only customer + transaction.
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/customers"))
            .respond_with(created("ctm_01"))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/transactions"))
            .respond_with(created("txn_01"))
            .expect(1)
            .mount(&server)
            .await;

        let row = ImportRow {
            customer_email: Some("a@example.com".into()),
            subscription_price_id: Some("pri_sub".into()),
            zero_dollar_sub_price_id: Some("pri_zero".into()),
            ..Default::default()
        };

        let client = PaddleClient::new(server.uri(), "key");
        let result = run(&[row], &client).await;
        assert_eq!(result.successful, 1);
        assert_eq!(result.successful_transactions.len(), 1);
    }
}
