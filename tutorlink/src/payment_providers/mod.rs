//! Payment gateway abstraction layer.
//!
//! This module defines the [`PaymentGateway`] trait which abstracts the
//! create-order / capture-order protocol across gateways (PayPal today, plus
//! a dummy gateway for tests). Coins are credited strictly after a capture
//! reports success; everything else is the caller's domain logic.

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::config::PaymentConfig;

pub mod dummy;
pub mod paypal;

/// Create a payment gateway from configuration.
///
/// This is the single point where config becomes a gateway instance. Adding
/// a new gateway means adding a match arm here.
pub fn create_gateway(config: &PaymentConfig) -> Box<dyn PaymentGateway> {
    match config {
        PaymentConfig::Paypal(paypal_config) => Box::new(paypal::PaypalGateway::from(paypal_config.clone())),
        PaymentConfig::Dummy(dummy_config) => Box::new(dummy::DummyGateway::from(dummy_config.clone())),
    }
}

/// Result type for gateway operations
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Errors that can occur talking to a payment gateway
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("Payment gateway API error: {0}")]
    Api(String),

    #[error("Payment gateway request failed: {0}")]
    Transport(String),

    #[error("Invalid payment data: {0}")]
    InvalidData(String),

    #[error("No payment gateway configured")]
    NotConfigured,
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            GatewayError::Transport("request timed out".to_string())
        } else {
            GatewayError::Transport(err.to_string())
        }
    }
}

impl From<GatewayError> for crate::errors::Error {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::NotConfigured => crate::errors::Error::BadRequest {
                message: "No payment gateway is configured".to_string(),
            },
            GatewayError::InvalidData(message) => crate::errors::Error::BadRequest { message },
            GatewayError::Api(message) | GatewayError::Transport(message) => crate::errors::Error::ExternalService {
                service: "payment gateway".to_string(),
                message,
            },
        }
    }
}

/// Result of a capture call.
///
/// `completed` is the only field the wallet-credit decision may look at: a
/// capture that is not completed must never mutate the wallet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureOutcome {
    /// Raw gateway status (e.g. "COMPLETED", "DECLINED")
    pub status: String,
    /// True only for a confirmed, successful capture
    pub completed: bool,
    /// Gateway-side payment/capture identifier
    pub gateway_payment_id: Option<String>,
    /// Gateway-side payer identifier
    pub gateway_payer_id: Option<String>,
}

/// Abstract payment gateway interface
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create an order for the given amount. `custom_reference` is our
    /// payment record id, echoed back by the gateway for reconciliation.
    /// Returns the gateway's order id.
    async fn create_order(&self, amount: Decimal, currency: &str, description: &str, custom_reference: &str) -> Result<String>;

    /// Capture a previously created and approved order. Never raises for a
    /// settled-but-unsuccessful capture; that is a non-completed
    /// [`CaptureOutcome`].
    async fn capture_order(&self, order_id: &str) -> Result<CaptureOutcome>;
}
