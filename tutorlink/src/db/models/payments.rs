//! Database models for external payment attempts.

use crate::types::{PaymentId, UserId};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Payment lifecycle state stored as TEXT in the database
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
    Cancelled,
    Expired,
}

/// Database row for a payment
#[derive(Debug, Clone, FromRow)]
pub struct PaymentDBResponse {
    pub id: PaymentId,
    pub user_id: UserId,
    pub amount: Decimal,
    pub currency: String,
    pub coins: i64,
    pub status: PaymentStatus,
    pub payment_method: String,
    pub gateway_order_id: Option<String>,
    pub gateway_payment_id: Option<String>,
    pub gateway_payer_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Database request for creating a payment record
#[derive(Debug, Clone)]
pub struct PaymentCreateDBRequest {
    pub user_id: UserId,
    pub amount: Decimal,
    pub currency: String,
    pub coins: i64,
    pub payment_method: String,
}
