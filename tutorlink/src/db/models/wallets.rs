//! Database models for wallets and the coin ledger.

use crate::types::{PaymentId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Ledger entry type stored as TEXT in the database
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum EntryType {
    Credit,
    Debit,
    Purchase,
}

/// What caused a ledger entry, as a tagged (kind, id) pair so consumers can
/// exhaustively switch on kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ReferenceKind {
    Post,
    Application,
    Payment,
    Contact,
}

/// Tagged reference to the entity that caused a ledger entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LedgerReference {
    pub kind: ReferenceKind,
    pub id: Uuid,
}

/// Database row for a wallet
#[derive(Debug, Clone, FromRow)]
pub struct WalletDBResponse {
    pub id: Uuid,
    pub user_id: UserId,
    pub balance: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Database row for a ledger entry
#[derive(Debug, Clone, FromRow)]
pub struct WalletTransactionDBResponse {
    pub id: Uuid,
    pub wallet_id: Uuid,
    pub entry_type: EntryType,
    pub amount: i64,
    pub description: String,
    pub reference_kind: Option<ReferenceKind>,
    pub reference_id: Option<Uuid>,
    pub payment_id: Option<PaymentId>,
    pub created_at: DateTime<Utc>,
}

impl WalletTransactionDBResponse {
    /// Display amount: purchases and credits are positive, debits negative
    pub fn signed_amount(&self) -> i64 {
        match self.entry_type {
            EntryType::Credit | EntryType::Purchase => self.amount,
            EntryType::Debit => -self.amount,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(entry_type: EntryType, amount: i64) -> WalletTransactionDBResponse {
        WalletTransactionDBResponse {
            id: Uuid::new_v4(),
            wallet_id: Uuid::new_v4(),
            entry_type,
            amount,
            description: "test".to_string(),
            reference_kind: None,
            reference_id: None,
            payment_id: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn signed_amount_negates_debits_only() {
        assert_eq!(entry(EntryType::Purchase, 1000).signed_amount(), 1000);
        assert_eq!(entry(EntryType::Credit, 25).signed_amount(), 25);
        assert_eq!(entry(EntryType::Debit, 50).signed_amount(), -50);
    }
}
