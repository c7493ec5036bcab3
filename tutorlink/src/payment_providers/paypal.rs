//! PayPal Orders v2 gateway.
//!
//! Two-leg protocol: `create_order` registers the purchase and returns the
//! order id the frontend sends the payer through approval with;
//! `capture_order` settles it after approval. Authentication is a
//! client-credentials OAuth token fetched per call; every HTTP request runs
//! under the configured timeout.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;

use crate::config::PaypalConfig;

use super::{CaptureOutcome, GatewayError, PaymentGateway, Result};

pub struct PaypalGateway {
    http: reqwest::Client,
    config: PaypalConfig,
}

impl From<PaypalConfig> for PaypalGateway {
    fn from(config: PaypalConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("reqwest client construction cannot fail with these options");
        Self { http, config }
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct OrderResponse {
    id: String,
    #[serde(default)]
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Payer {
    #[serde(default)]
    payer_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CaptureResponse {
    #[serde(default)]
    id: Option<String>,
    status: String,
    #[serde(default)]
    payer: Option<Payer>,
}

impl PaypalGateway {
    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url.as_str().trim_end_matches('/'))
    }

    async fn access_token(&self) -> Result<String> {
        let response = self
            .http
            .post(self.endpoint("/v1/oauth2/token"))
            .basic_auth(&self.config.client_id, Some(&self.config.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GatewayError::Api(format!("token request failed with {}", response.status())));
        }

        let token: TokenResponse = response.json().await?;
        Ok(token.access_token)
    }
}

#[async_trait]
impl PaymentGateway for PaypalGateway {
    async fn create_order(&self, amount: Decimal, currency: &str, description: &str, custom_reference: &str) -> Result<String> {
        let token = self.access_token().await?;

        let mut application_context = json!({
            "landing_page": "BILLING",
            "user_action": "PAY_NOW",
        });
        if let Some(brand) = &self.config.brand_name {
            application_context["brand_name"] = json!(brand);
        }

        let body = json!({
            "intent": "CAPTURE",
            "purchase_units": [{
                "amount": {
                    "currency_code": currency,
                    "value": amount.to_string(),
                },
                "description": description,
                "custom_id": custom_reference,
            }],
            "application_context": application_context,
        });

        let response = self
            .http
            .post(self.endpoint("/v2/checkout/orders"))
            .bearer_auth(&token)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GatewayError::Api(format!("order creation failed with {}", response.status())));
        }

        let order: OrderResponse = response.json().await?;
        tracing::info!("Created PayPal order {} (status {:?})", order.id, order.status);
        Ok(order.id)
    }

    async fn capture_order(&self, order_id: &str) -> Result<CaptureOutcome> {
        let token = self.access_token().await?;

        let response = self
            .http
            .post(self.endpoint(&format!("/v2/checkout/orders/{order_id}/capture")))
            .bearer_auth(&token)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body("{}")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GatewayError::Api(format!("capture failed with {}", response.status())));
        }

        let capture: CaptureResponse = response.json().await?;
        let completed = capture.status == "COMPLETED";
        if !completed {
            tracing::warn!("PayPal capture for order {order_id} settled as {}", capture.status);
        }

        Ok(CaptureOutcome {
            completed,
            status: capture.status,
            gateway_payment_id: capture.id,
            gateway_payer_id: capture.payer.and_then(|p| p.payer_id),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use url::Url;
    use wiremock::matchers::{body_string, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn gateway(server: &MockServer) -> PaypalGateway {
        PaypalGateway::from(PaypalConfig {
            client_id: "client".to_string(),
            client_secret: "secret".to_string(),
            base_url: Url::parse(&server.uri()).unwrap(),
            timeout: Duration::from_secs(5),
            brand_name: Some("TutorLink".to_string()),
        })
    }

    async fn mock_token(server: &MockServer) {
        Mock::given(method("POST"))
            .and(path("/v1/oauth2/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "test-token",
                "token_type": "Bearer",
            })))
            .mount(server)
            .await;
    }

    #[test_log::test(tokio::test)]
    async fn create_order_returns_the_gateway_order_id() {
        let server = MockServer::start().await;
        mock_token(&server).await;
        Mock::given(method("POST"))
            .and(path("/v2/checkout/orders"))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "id": "ORDER-123",
                "status": "CREATED",
            })))
            .mount(&server)
            .await;

        let order_id = gateway(&server)
            .create_order(Decimal::new(10, 1), "USD", "Purchase of 1000 coins", "pay-1")
            .await
            .unwrap();
        assert_eq!(order_id, "ORDER-123");
    }

    #[test_log::test(tokio::test)]
    async fn completed_capture_maps_ids_and_flag() {
        let server = MockServer::start().await;
        mock_token(&server).await;
        Mock::given(method("POST"))
            .and(path("/v2/checkout/orders/ORDER-123/capture"))
            .and(body_string("{}"))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "id": "ORDER-123",
                "status": "COMPLETED",
                "payer": { "payer_id": "PAYER-9" },
            })))
            .mount(&server)
            .await;

        let outcome = gateway(&server).capture_order("ORDER-123").await.unwrap();
        assert!(outcome.completed);
        assert_eq!(outcome.status, "COMPLETED");
        assert_eq!(outcome.gateway_payment_id.as_deref(), Some("ORDER-123"));
        assert_eq!(outcome.gateway_payer_id.as_deref(), Some("PAYER-9"));
    }

    #[test_log::test(tokio::test)]
    async fn declined_capture_is_not_completed_but_not_an_error() {
        let server = MockServer::start().await;
        mock_token(&server).await;
        Mock::given(method("POST"))
            .and(path("/v2/checkout/orders/ORDER-55/capture"))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "id": "ORDER-55",
                "status": "DECLINED",
            })))
            .mount(&server)
            .await;

        let outcome = gateway(&server).capture_order("ORDER-55").await.unwrap();
        assert!(!outcome.completed);
        assert_eq!(outcome.status, "DECLINED");
    }

    #[test_log::test(tokio::test)]
    async fn gateway_http_errors_surface_as_api_errors() {
        let server = MockServer::start().await;
        mock_token(&server).await;
        Mock::given(method("POST"))
            .and(path("/v2/checkout/orders/MISSING/capture"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = gateway(&server).capture_order("MISSING").await.unwrap_err();
        assert!(matches!(err, GatewayError::Api(_)));
    }
}
