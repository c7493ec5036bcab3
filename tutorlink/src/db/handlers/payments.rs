use crate::db::{
    errors::Result,
    models::payments::{PaymentCreateDBRequest, PaymentDBResponse},
};
use crate::types::{PaymentId, UserId};
use chrono::{DateTime, Utc};
use sqlx::PgConnection;

const COLUMNS: &str = "id, user_id, amount, currency, coins, status, payment_method, \
                       gateway_order_id, gateway_payment_id, gateway_payer_id, created_at, updated_at";

pub struct Payments<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Payments<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    pub async fn create(&mut self, request: &PaymentCreateDBRequest) -> Result<PaymentDBResponse> {
        let payment = sqlx::query_as::<_, PaymentDBResponse>(&format!(
            r#"
            INSERT INTO payments (user_id, amount, currency, coins, payment_method)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(request.user_id)
        .bind(request.amount)
        .bind(&request.currency)
        .bind(request.coins)
        .bind(&request.payment_method)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(payment)
    }

    /// Attach the gateway's order id once the external order is created
    pub async fn set_gateway_order(&mut self, id: PaymentId, gateway_order_id: &str) -> Result<PaymentDBResponse> {
        let payment = sqlx::query_as::<_, PaymentDBResponse>(&format!(
            "UPDATE payments SET gateway_order_id = $2, updated_at = NOW() WHERE id = $1 RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(gateway_order_id)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(payment)
    }

    /// Look up a payment by gateway order id, scoped to its owner
    pub async fn get_by_order_for_user(&mut self, gateway_order_id: &str, user_id: UserId) -> Result<Option<PaymentDBResponse>> {
        let payment = sqlx::query_as::<_, PaymentDBResponse>(&format!(
            "SELECT {COLUMNS} FROM payments WHERE gateway_order_id = $1 AND user_id = $2"
        ))
        .bind(gateway_order_id)
        .bind(user_id)
        .fetch_optional(&mut *self.db)
        .await?;

        Ok(payment)
    }

    /// Flip to completed and record the gateway's capture identifiers.
    /// Guarded on the current status so a concurrent capture can't complete
    /// the same payment twice.
    pub async fn mark_completed(
        &mut self,
        id: PaymentId,
        gateway_payment_id: Option<&str>,
        gateway_payer_id: Option<&str>,
    ) -> Result<Option<PaymentDBResponse>> {
        let payment = sqlx::query_as::<_, PaymentDBResponse>(&format!(
            r#"
            UPDATE payments
            SET status = 'completed', gateway_payment_id = $2, gateway_payer_id = $3, updated_at = NOW()
            WHERE id = $1 AND status = 'pending'
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id)
        .bind(gateway_payment_id)
        .bind(gateway_payer_id)
        .fetch_optional(&mut *self.db)
        .await?;

        Ok(payment)
    }

    pub async fn list_for_user(&mut self, user_id: UserId) -> Result<Vec<PaymentDBResponse>> {
        let payments =
            sqlx::query_as::<_, PaymentDBResponse>(&format!("SELECT {COLUMNS} FROM payments WHERE user_id = $1 ORDER BY created_at DESC"))
                .bind(user_id)
                .fetch_all(&mut *self.db)
                .await?;

        Ok(payments)
    }

    /// Delete the user's pending payments created before the cutoff. Returns
    /// the number removed. Idempotent; never touches wallets.
    pub async fn delete_stale_pending(&mut self, user_id: UserId, cutoff: DateTime<Utc>) -> Result<u64> {
        let result = sqlx::query("DELETE FROM payments WHERE user_id = $1 AND status = 'pending' AND created_at < $2")
            .bind(user_id)
            .bind(cutoff)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected())
    }

    /// Mark all pending payments created before the cutoff as expired
    /// (non-destructive batch sweep). Returns the number reclassified.
    pub async fn expire_stale_pending(&mut self, cutoff: DateTime<Utc>) -> Result<u64> {
        let result = sqlx::query("UPDATE payments SET status = 'expired', updated_at = NOW() WHERE status = 'pending' AND created_at < $1")
            .bind(cutoff)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected())
    }
}
