//! API models and coin math for payment top-ups.

use crate::db::models::payments::{PaymentDBResponse, PaymentStatus};
use crate::types::{PaymentId, UserId};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Coins issued for a currency amount: `floor(amount * rate)`
pub fn coins_for_amount(amount: Decimal, coins_per_currency_unit: i64) -> i64 {
    (amount * Decimal::from(coins_per_currency_unit)).floor().to_i64().unwrap_or(0)
}

/// Currency amount for a coin count, rounded to cents
pub fn amount_for_coins(coins: i64, coins_per_currency_unit: i64) -> Decimal {
    (Decimal::from(coins) / Decimal::from(coins_per_currency_unit)).round_dp(2)
}

/// Request body for creating a payment by currency amount
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct PaymentCreate {
    pub amount: Decimal,
    #[serde(default = "default_currency")]
    pub currency: String,
}

/// Request body for creating a payment by coin count
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct PaymentCreateByCoins {
    pub coins: i64,
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_currency() -> String {
    "USD".to_string()
}

/// Request body for capturing a previously created gateway order
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct PaymentCapture {
    pub order_id: String,
}

/// Response after creating a payment: the gateway order to approve
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PaymentCreatedResponse {
    #[schema(value_type = uuid::Uuid)]
    pub payment_id: PaymentId,
    pub order_id: String,
    pub coins: i64,
    pub amount: Decimal,
}

/// Response after a successful capture
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PaymentCompletedResponse {
    #[schema(value_type = uuid::Uuid)]
    pub payment_id: PaymentId,
    pub coins_added: i64,
    pub new_balance: i64,
    pub amount: Decimal,
}

/// A payment record
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PaymentResponse {
    #[schema(value_type = uuid::Uuid)]
    pub id: PaymentId,
    #[schema(value_type = uuid::Uuid)]
    pub user_id: UserId,
    pub amount: Decimal,
    pub currency: String,
    pub coins: i64,
    pub status: PaymentStatus,
    pub payment_method: String,
    pub created_at: DateTime<Utc>,
}

impl From<PaymentDBResponse> for PaymentResponse {
    fn from(payment: PaymentDBResponse) -> Self {
        Self {
            id: payment.id,
            user_id: payment.user_id,
            amount: payment.amount,
            currency: payment.currency,
            coins: payment.coins,
            status: payment.status,
            payment_method: payment.payment_method,
            created_at: payment.created_at,
        }
    }
}

/// A predefined coin bundle shown on the top-up page
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CoinPackage {
    pub amount: Decimal,
    pub coins: i64,
    pub currency: String,
    pub label: String,
}

/// Standard coin bundles derived from the configured rate
pub fn coin_packages(coins_per_currency_unit: i64) -> Vec<CoinPackage> {
    [100i64, 500, 1_000, 5_000, 10_000, 20_000]
        .into_iter()
        .map(|coins| CoinPackage {
            amount: amount_for_coins(coins, coins_per_currency_unit),
            coins,
            currency: "USD".to_string(),
            label: format!("{coins} Coins"),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn coin_math_floors_fractional_amounts() {
        assert_eq!(coins_for_amount(Decimal::from_str("1.0").unwrap(), 1000), 1000);
        assert_eq!(coins_for_amount(Decimal::from_str("0.1").unwrap(), 1000), 100);
        // 0.1999 USD is still only 199 coins
        assert_eq!(coins_for_amount(Decimal::from_str("0.1999").unwrap(), 1000), 199);
        assert_eq!(coins_for_amount(Decimal::ZERO, 1000), 0);
    }

    #[test]
    fn amount_for_coins_rounds_to_cents() {
        assert_eq!(amount_for_coins(1000, 1000), Decimal::from_str("1.00").unwrap());
        assert_eq!(amount_for_coins(100, 1000), Decimal::from_str("0.10").unwrap());
        assert_eq!(amount_for_coins(12345, 1000), Decimal::from_str("12.35").unwrap());
    }

    #[test]
    fn packages_follow_the_configured_rate() {
        let packages = coin_packages(1000);
        assert_eq!(packages.len(), 6);
        assert_eq!(packages[0].coins, 100);
        assert_eq!(packages[0].amount, Decimal::from_str("0.10").unwrap());
        assert_eq!(packages[5].coins, 20_000);
        assert_eq!(packages[5].amount, Decimal::from_str("20.00").unwrap());
    }
}
