//! The coin ledger. Sole arbiter of a user's balance: every other component
//! mutates coins only through the operations here.
//!
//! Debits are expressed as a single conditional UPDATE
//! (`... AND balance >= amount`), so the sufficiency check and the decrement
//! are one atomic statement at the storage layer - concurrent requests
//! against the same wallet cannot interleave a read-then-write race. Each
//! balance mutation and its ledger row are written inside a transaction
//! (a savepoint when the caller already holds one).

use crate::db::{
    errors::DbError,
    models::wallets::{EntryType, LedgerReference, WalletDBResponse, WalletTransactionDBResponse},
};
use crate::types::{PaymentId, UserId};
use sqlx::{Connection, PgConnection};
use thiserror::Error;

const WALLET_COLUMNS: &str = "id, user_id, balance, created_at, updated_at";

/// Errors from ledger operations
#[derive(Debug, Error)]
pub enum WalletError {
    /// Balance below the requested debit; nothing was mutated
    #[error("Insufficient balance: {required} required, {available} available")]
    InsufficientFunds { required: i64, available: i64 },

    /// No wallet exists for the user (callers on financial paths must ensure
    /// wallet existence first)
    #[error("Wallet not found")]
    NotFound,

    /// Credit/debit amounts must be strictly positive
    #[error("Amount must be positive, got {amount}")]
    NonPositiveAmount { amount: i64 },

    #[error(transparent)]
    Database(#[from] DbError),
}

impl From<sqlx::Error> for WalletError {
    fn from(err: sqlx::Error) -> Self {
        WalletError::Database(DbError::from(err))
    }
}

pub type Result<T> = std::result::Result<T, WalletError>;

impl From<WalletError> for crate::errors::Error {
    fn from(err: WalletError) -> Self {
        match err {
            WalletError::InsufficientFunds { required, available } => crate::errors::Error::InsufficientFunds { required, available },
            WalletError::NotFound => crate::errors::Error::NotFound {
                resource: "Wallet".to_string(),
                id: "for user".to_string(),
            },
            WalletError::NonPositiveAmount { amount } => crate::errors::Error::BadRequest {
                message: format!("Amount must be positive, got {amount}"),
            },
            WalletError::Database(db) => crate::errors::Error::Database(db),
        }
    }
}

pub struct Wallets<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Wallets<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// Create the user's wallet with the default starting balance if absent.
    /// Idempotent; returns the wallet either way.
    pub async fn ensure(&mut self, user_id: UserId, initial_balance: i64) -> Result<WalletDBResponse> {
        sqlx::query("INSERT INTO wallets (user_id, balance) VALUES ($1, $2) ON CONFLICT (user_id) DO NOTHING")
            .bind(user_id)
            .bind(initial_balance)
            .execute(&mut *self.db)
            .await?;

        self.get(user_id).await?.ok_or(WalletError::NotFound)
    }

    pub async fn get(&mut self, user_id: UserId) -> Result<Option<WalletDBResponse>> {
        let wallet = sqlx::query_as::<_, WalletDBResponse>(&format!("SELECT {WALLET_COLUMNS} FROM wallets WHERE user_id = $1"))
            .bind(user_id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(wallet)
    }

    /// Current balance; 0 when no wallet exists. Read-only - never creates.
    pub async fn balance(&mut self, user_id: UserId) -> Result<i64> {
        Ok(self.get(user_id).await?.map(|w| w.balance).unwrap_or(0))
    }

    /// Increase the balance and append the matching ledger entry.
    pub async fn credit(
        &mut self,
        user_id: UserId,
        entry_type: EntryType,
        amount: i64,
        description: &str,
        reference: Option<LedgerReference>,
        payment_id: Option<PaymentId>,
    ) -> Result<WalletDBResponse> {
        if amount <= 0 {
            return Err(WalletError::NonPositiveAmount { amount });
        }

        let mut tx = self.db.begin().await?;

        let wallet = sqlx::query_as::<_, WalletDBResponse>(&format!(
            "UPDATE wallets SET balance = balance + $2, updated_at = NOW() WHERE user_id = $1 RETURNING {WALLET_COLUMNS}"
        ))
        .bind(user_id)
        .bind(amount)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(WalletError::NotFound)?;

        append_entry(&mut tx, wallet.id, entry_type, amount, description, reference, payment_id).await?;

        tx.commit().await?;
        Ok(wallet)
    }

    /// Decrease the balance and append the matching ledger entry. Fails with
    /// [`WalletError::InsufficientFunds`] when the balance cannot cover the
    /// amount, leaving the wallet untouched.
    pub async fn debit(
        &mut self,
        user_id: UserId,
        amount: i64,
        description: &str,
        reference: Option<LedgerReference>,
    ) -> Result<WalletDBResponse> {
        if amount <= 0 {
            return Err(WalletError::NonPositiveAmount { amount });
        }

        let mut tx = self.db.begin().await?;

        let updated = sqlx::query_as::<_, WalletDBResponse>(&format!(
            r#"
            UPDATE wallets SET balance = balance - $2, updated_at = NOW()
            WHERE user_id = $1 AND balance >= $2
            RETURNING {WALLET_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(amount)
        .fetch_optional(&mut *tx)
        .await?;

        let wallet = match updated {
            Some(wallet) => wallet,
            None => {
                // Zero rows: either the wallet is missing or the balance is
                // short - distinguish for the caller
                let available = sqlx::query_scalar::<_, i64>("SELECT balance FROM wallets WHERE user_id = $1")
                    .bind(user_id)
                    .fetch_optional(&mut *tx)
                    .await?;

                return match available {
                    Some(available) => Err(WalletError::InsufficientFunds {
                        required: amount,
                        available,
                    }),
                    None => Err(WalletError::NotFound),
                };
            }
        };

        append_entry(&mut tx, wallet.id, EntryType::Debit, amount, description, reference, None).await?;

        tx.commit().await?;
        Ok(wallet)
    }

    /// Ledger entries for the user, newest first. Empty when no wallet exists.
    pub async fn transactions(&mut self, user_id: UserId) -> Result<Vec<WalletTransactionDBResponse>> {
        let entries = sqlx::query_as::<_, WalletTransactionDBResponse>(
            r#"
            SELECT t.id, t.wallet_id, t.entry_type, t.amount, t.description,
                   t.reference_kind, t.reference_id, t.payment_id, t.created_at
            FROM wallet_transactions t
            INNER JOIN wallets w ON t.wallet_id = w.id
            WHERE w.user_id = $1
            ORDER BY t.created_at DESC, t.id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(entries)
    }
}

async fn append_entry(
    tx: &mut PgConnection,
    wallet_id: uuid::Uuid,
    entry_type: EntryType,
    amount: i64,
    description: &str,
    reference: Option<LedgerReference>,
    payment_id: Option<PaymentId>,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO wallet_transactions (wallet_id, entry_type, amount, description, reference_kind, reference_id, payment_id)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind(wallet_id)
    .bind(entry_type)
    .bind(amount)
    .bind(description)
    .bind(reference.map(|r| r.kind))
    .bind(reference.map(|r| r.id))
    .bind(payment_id)
    .execute(tx)
    .await?;

    Ok(())
}
