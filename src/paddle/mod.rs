//! Paddle API client.
//!
//! Thin reqwest wrapper over the handful of Paddle endpoints the importer
//! needs. Every response is expected to carry a JSON `data` envelope with
//! at least an `id`; create calls must answer 201, list calls 200. There is
//! no retry or backoff: every call is a one-shot, non-idempotent mutation.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use paddleload::paddle::PaddleClient;
//!
//! let client = PaddleClient::for_environment("pdl_live_...", false);
//! let customer_id = client.create_customer(&row).await?;
//! ```

use serde::Deserialize;
use serde_json::{json, Value};

use crate::config::api_base_url;
use crate::error::{PaddleError, PaddleResult};
use crate::models::ImportRow;

/// Client for the Paddle REST API.
#[derive(Clone)]
pub struct PaddleClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

/// Standard Paddle response envelope.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

/// Minimal created-entity payload.
#[derive(Debug, Deserialize)]
struct Entity {
    id: String,
}

/// Transaction creation payload.
#[derive(Debug, Deserialize)]
struct TransactionData {
    id: String,
    #[serde(default)]
    checkout: Option<Checkout>,
}

#[derive(Debug, Deserialize)]
struct Checkout {
    #[serde(default)]
    url: Option<String>,
}

/// A created transaction with its optional hosted checkout URL.
#[derive(Debug, Clone, PartialEq)]
pub struct CreatedTransaction {
    pub id: String,
    pub checkout_url: Option<String>,
}

impl PaddleClient {
    /// Create a client against an explicit base URL.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    /// Create a client for production or sandbox by flag.
    pub fn for_environment(api_key: impl Into<String>, sandbox: bool) -> Self {
        Self::new(api_base_url(sandbox), api_key)
    }

    /// Base URL this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// POST a JSON body, expecting a 201 with a `data` envelope.
    async fn post_created<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        body: &Value,
    ) -> PaddleResult<T> {
        let response = self
            .http
            .post(format!("{}{}", self.base_url, path))
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if status.as_u16() != 201 {
            return Err(PaddleError::Api {
                status: status.as_u16(),
                body: text,
            });
        }

        let envelope: Envelope<T> = serde_json::from_str(&text)
            .map_err(|e| PaddleError::InvalidResponse(e.to_string()))?;
        Ok(envelope.data)
    }

    /// GET a resource, expecting a 200 with a `data` envelope.
    async fn get_data<T: for<'de> Deserialize<'de>>(&self, path: &str) -> PaddleResult<T> {
        let response = self
            .http
            .get(format!("{}{}", self.base_url, path))
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(PaddleError::Api {
                status: status.as_u16(),
                body: text,
            });
        }

        let envelope: Envelope<T> = serde_json::from_str(&text)
            .map_err(|e| PaddleError::InvalidResponse(e.to_string()))?;
        Ok(envelope.data)
    }

    /// `POST /customers` - returns the new customer id.
    pub async fn create_customer(&self, row: &ImportRow) -> PaddleResult<String> {
        let payload = json!({
            "email": row.customer_email,
            "name": row.customer_full_name,
            "custom_data": row.customer_external_id.as_ref()
                .map(|id| json!({ "external_id": id })),
            "locale": "en",
        });

        let entity: Entity = self.post_created("/customers", &payload).await?;
        Ok(entity.id)
    }

    /// `POST /customers/{id}/addresses` - returns the new address id.
    pub async fn create_address(&self, customer_id: &str, row: &ImportRow) -> PaddleResult<String> {
        let payload = json!({
            "country_code": row.address_country_code,
            "first_line": row.address_street_line1,
            "second_line": row.address_street_line2,
            "city": row.address_city,
            "region": row.address_region,
            "postal_code": row.address_postal_code,
            "description": format!("Address for {}", row.email_or_unknown()),
            "custom_data": row.address_external_id.as_ref()
                .map(|id| json!({ "external_id": id })),
        });

        let entity: Entity = self
            .post_created(&format!("/customers/{customer_id}/addresses"), &payload)
            .await?;
        Ok(entity.id)
    }

    /// `POST /customers/{id}/businesses` - returns the new business id.
    ///
    /// The contact is the importing customer themselves; the tax identifier
    /// is passed through verbatim so Paddle performs its own validation.
    pub async fn create_business(&self, customer_id: &str, row: &ImportRow) -> PaddleResult<String> {
        let mut payload = json!({
            "name": row.business_name,
            "company_number": row.business_company_number,
            "contacts": [{
                "name": row.customer_full_name,
                "email": row.customer_email,
            }],
            "custom_data": row.business_external_id.as_ref()
                .map(|id| json!({ "external_id": id })),
        });

        if let Some(tax_id) = &row.business_tax_identifier {
            payload["tax_identifier"] = json!(tax_id);
        }

        let entity: Entity = self
            .post_created(&format!("/customers/{customer_id}/businesses"), &payload)
            .await?;
        Ok(entity.id)
    }

    /// `GET /customers/{id}/addresses` - id of the first listed address.
    pub async fn first_address_id(&self, customer_id: &str) -> PaddleResult<Option<String>> {
        let entities: Vec<Entity> = self
            .get_data(&format!("/customers/{customer_id}/addresses"))
            .await?;
        Ok(entities.into_iter().next().map(|e| e.id))
    }

    /// `GET /customers/{id}/businesses` - id of the first listed business.
    pub async fn first_business_id(&self, customer_id: &str) -> PaddleResult<Option<String>> {
        let entities: Vec<Entity> = self
            .get_data(&format!("/customers/{customer_id}/businesses"))
            .await?;
        Ok(entities.into_iter().next().map(|e| e.id))
    }

    /// `POST /transactions` - create the zero-dollar transaction for a row.
    pub async fn create_transaction(
        &self,
        row: &ImportRow,
        customer_id: &str,
        address_id: Option<&str>,
        business_id: Option<&str>,
    ) -> PaddleResult<CreatedTransaction> {
        let mut payload = json!({
            "customer_id": customer_id,
            "items": [{
                "price_id": row.zero_dollar_sub_price_id,
                "quantity": 1,
            }],
        });

        if let Some(id) = address_id {
            payload["address_id"] = json!(id);
        }
        if let Some(id) = business_id {
            payload["business_id"] = json!(id);
        }
        if row.has_billing_period() {
            payload["billing_period"] = json!({
                "starts_at": row.current_period_started_at,
                "ends_at": row.current_period_ends_at,
            });
        }
        if let Some(price_id) = &row.subscription_price_id {
            payload["custom_data"] = json!({ "subscription_price_id": price_id });
        }

        let data: TransactionData = self.post_created("/transactions", &payload).await?;
        Ok(CreatedTransaction {
            id: data.id,
            checkout_url: data.checkout.and_then(|c| c.url),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn row() -> ImportRow {
        ImportRow {
            customer_email: Some("alice@example.com".into()),
            customer_full_name: Some("Alice".into()),
            address_country_code: Some("US".into()),
            address_postal_code: Some("94107".into()),
            subscription_price_id: Some("pri_sub".into()),
            zero_dollar_sub_price_id: Some("pri_zero".into()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_customer_sends_bearer_and_parses_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/customers"))
            .and(header("authorization", "Bearer test_key"))
            .and(body_partial_json(
                serde_json::json!({ "email": "alice@example.com", "locale": "en" }),
            ))
            .respond_with(
                ResponseTemplate::new(201)
                    .set_body_json(serde_json::json!({ "data": { "id": "ctm_01" } })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = PaddleClient::new(server.uri(), "test_key");
        let id = client.create_customer(&row()).await.unwrap();
        assert_eq!(id, "ctm_01");
    }

    #[tokio::test]
    async fn test_non_creation_status_is_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/customers"))
            .respond_with(
                ResponseTemplate::new(422)
                    .set_body_string(r#"{"error":{"code":"email_invalid"}}"#),
            )
            .mount(&server)
            .await;

        let client = PaddleClient::new(server.uri(), "test_key");
        let err = client.create_customer(&row()).await.unwrap_err();
        assert_eq!(err.status(), Some(422));
        assert!(err.to_string().contains("email_invalid"));
    }

    #[tokio::test]
    async fn test_tax_identifier_passed_through_verbatim() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/customers/ctm_01/businesses"))
            .and(body_partial_json(
                serde_json::json!({ "tax_identifier": "DE123456789" }),
            ))
            .respond_with(
                ResponseTemplate::new(201)
                    .set_body_json(serde_json::json!({ "data": { "id": "biz_01" } })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let mut row = row();
        row.business_name = Some("Acme GmbH".into());
        row.business_tax_identifier = Some("DE123456789".into());

        let client = PaddleClient::new(server.uri(), "test_key");
        let id = client.create_business("ctm_01", &row).await.unwrap();
        assert_eq!(id, "biz_01");
    }

    #[tokio::test]
    async fn test_first_address_id_empty_list() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/customers/ctm_01/addresses"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "data": [] })),
            )
            .mount(&server)
            .await;

        let client = PaddleClient::new(server.uri(), "test_key");
        assert_eq!(client.first_address_id("ctm_01").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_transaction_optional_fields() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/transactions"))
            .and(body_partial_json(serde_json::json!({
                "customer_id": "ctm_01",
                "address_id": "add_01",
                "custom_data": { "subscription_price_id": "pri_sub" },
                "items": [{ "price_id": "pri_zero", "quantity": 1 }],
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "data": { "id": "txn_01", "checkout": { "url": "https://pay.example/x" } }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = PaddleClient::new(server.uri(), "test_key");
        let txn = client
            .create_transaction(&row(), "ctm_01", Some("add_01"), None)
            .await
            .unwrap();
        assert_eq!(txn.id, "txn_01");
        assert_eq!(txn.checkout_url.as_deref(), Some("https://pay.example/x"));
    }
}
