//! Dummy payment gateway for tests and local development.
//!
//! Orders are minted locally and captures settle according to the configured
//! outcome, so the top-up flow can be exercised end to end without external
//! credentials.

use async_trait::async_trait;
use rand::Rng;
use rust_decimal::Decimal;

use crate::config::DummyConfig;

use super::{CaptureOutcome, GatewayError, PaymentGateway, Result};

pub struct DummyGateway {
    capture_succeeds: bool,
}

impl From<DummyConfig> for DummyGateway {
    fn from(config: DummyConfig) -> Self {
        Self {
            capture_succeeds: config.capture_succeeds,
        }
    }
}

#[async_trait]
impl PaymentGateway for DummyGateway {
    async fn create_order(&self, amount: Decimal, _currency: &str, _description: &str, custom_reference: &str) -> Result<String> {
        if amount <= Decimal::ZERO {
            return Err(GatewayError::InvalidData("amount must be positive".to_string()));
        }
        let suffix: u32 = rand::thread_rng().r#gen();
        let order_id = format!("DUMMY-{custom_reference}-{suffix:08x}");
        tracing::info!("Dummy gateway created order {order_id}");
        Ok(order_id)
    }

    async fn capture_order(&self, order_id: &str) -> Result<CaptureOutcome> {
        if !order_id.starts_with("DUMMY-") {
            return Err(GatewayError::Api(format!("unknown order {order_id}")));
        }
        Ok(if self.capture_succeeds {
            CaptureOutcome {
                status: "COMPLETED".to_string(),
                completed: true,
                gateway_payment_id: Some(format!("{order_id}-capture")),
                gateway_payer_id: Some("dummy-payer".to_string()),
            }
        } else {
            CaptureOutcome {
                status: "DECLINED".to_string(),
                completed: false,
                gateway_payment_id: None,
                gateway_payer_id: None,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_then_capture_round_trip() {
        let gateway = DummyGateway::from(DummyConfig { capture_succeeds: true });
        let order_id = gateway.create_order(Decimal::ONE, "USD", "coins", "pay-1").await.unwrap();
        assert!(order_id.starts_with("DUMMY-pay-1-"));

        let outcome = gateway.capture_order(&order_id).await.unwrap();
        assert!(outcome.completed);
        assert!(outcome.gateway_payment_id.unwrap().ends_with("-capture"));
    }

    #[tokio::test]
    async fn failing_gateway_settles_declined() {
        let gateway = DummyGateway::from(DummyConfig { capture_succeeds: false });
        let order_id = gateway.create_order(Decimal::ONE, "USD", "coins", "pay-2").await.unwrap();

        let outcome = gateway.capture_order(&order_id).await.unwrap();
        assert!(!outcome.completed);
        assert_eq!(outcome.status, "DECLINED");
    }

    #[tokio::test]
    async fn zero_amount_orders_are_rejected() {
        let gateway = DummyGateway::from(DummyConfig { capture_succeeds: true });
        let err = gateway.create_order(Decimal::ZERO, "USD", "coins", "pay-3").await.unwrap_err();
        assert!(matches!(err, GatewayError::InvalidData(_)));
    }
}
