//! API models for the wallet and its transaction history.

use crate::db::models::wallets::{EntryType, ReferenceKind, WalletDBResponse, WalletTransactionDBResponse};
use crate::types::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Wallet state returned to the owner
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WalletResponse {
    #[schema(value_type = uuid::Uuid)]
    pub user_id: UserId,
    pub balance: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<WalletDBResponse> for WalletResponse {
    fn from(wallet: WalletDBResponse) -> Self {
        Self {
            user_id: wallet.user_id,
            balance: wallet.balance,
            created_at: wallet.created_at,
            updated_at: wallet.updated_at,
        }
    }
}

/// A ledger entry formatted for display: signed amount (credits and
/// purchases positive, debits negative) and a status label. There is no
/// pending state at the ledger level, so the status is always `completed`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TransactionResponse {
    pub id: Uuid,
    pub entry_type: EntryType,
    pub amount: i64,
    pub description: String,
    pub status: String,
    pub reference_kind: Option<ReferenceKind>,
    pub reference_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl From<WalletTransactionDBResponse> for TransactionResponse {
    fn from(tx: WalletTransactionDBResponse) -> Self {
        let amount = tx.signed_amount();
        Self {
            id: tx.id,
            entry_type: tx.entry_type,
            amount,
            description: tx.description,
            status: "completed".to_string(),
            reference_kind: tx.reference_kind,
            reference_id: tx.reference_id,
            created_at: tx.created_at,
        }
    }
}
