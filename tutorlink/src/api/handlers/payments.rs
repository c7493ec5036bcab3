//! HTTP handlers for payment top-ups.
//!
//! Coins are credited to the wallet only after the gateway confirms a
//! capture; the completed-flip and the credit run in one transaction so a
//! payment can never sit `completed` without its coins applied.

use crate::{
    AppState,
    api::models::{
        ApiResponse,
        payments::{
            CoinPackage, PaymentCapture, PaymentCompletedResponse, PaymentCreate, PaymentCreateByCoins, PaymentCreatedResponse,
            PaymentResponse, amount_for_coins, coin_packages, coins_for_amount,
        },
        users::CurrentUser,
    },
    auth,
    db::{
        handlers::{Payments, Wallets},
        models::payments::{PaymentCreateDBRequest, PaymentDBResponse, PaymentStatus},
        models::wallets::{EntryType, LedgerReference, ReferenceKind},
    },
    errors::{Error, Result},
    payment_providers::{GatewayError, PaymentGateway},
};
use axum::{extract::State, response::Json};
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;

fn gateway(state: &AppState) -> Result<Arc<dyn PaymentGateway>> {
    state.gateway.clone().ok_or_else(|| GatewayError::NotConfigured.into())
}

async fn create_payment_inner(state: &AppState, user: &CurrentUser, request: PaymentCreateDBRequest) -> Result<PaymentCreatedResponse> {
    let gateway = gateway(state)?;

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut payments = Payments::new(&mut conn);

    let payment = payments.create(&request).await?;

    // A gateway failure here leaves the record pending (orphaned); the
    // maintenance sweeps reclaim it later. No retry at this layer.
    let order_id = gateway
        .create_order(
            payment.amount,
            &payment.currency,
            &format!("Purchase of {} coins", payment.coins),
            &payment.id.to_string(),
        )
        .await?;

    let payment = payments.set_gateway_order(payment.id, &order_id).await?;

    tracing::info!("Created payment {} with gateway order {order_id} for {}", payment.id, user.email);

    Ok(PaymentCreatedResponse {
        payment_id: payment.id,
        order_id,
        coins: payment.coins,
        amount: payment.amount,
    })
}

/// Create a gateway order for a currency amount.
#[utoipa::path(
    post,
    path = "/payments",
    tag = "payments",
    summary = "Create a coin purchase order",
    responses(
        (status = 200, description = "Gateway order created"),
        (status = 400, description = "Below the minimum purchase"),
        (status = 502, description = "Gateway unavailable"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn create_payment(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(body): Json<PaymentCreate>,
) -> Result<Json<ApiResponse<PaymentCreatedResponse>>> {
    let coins_config = &state.config.coins;

    if body.amount < coins_config.minimum_purchase_amount {
        return Err(Error::bad_request(format!(
            "Minimum purchase amount is ${} for {} coins",
            coins_config.minimum_purchase_amount,
            coins_config.minimum_purchase_coins()
        )));
    }

    let coins = coins_for_amount(body.amount, coins_config.coins_per_currency_unit);

    let response = create_payment_inner(
        &state,
        &user,
        PaymentCreateDBRequest {
            user_id: user.id,
            amount: body.amount,
            currency: body.currency,
            coins,
            payment_method: "paypal".to_string(),
        },
    )
    .await?;

    Ok(Json(ApiResponse::new(response)))
}

/// Create a gateway order for a coin count (derives the amount).
#[utoipa::path(
    post,
    path = "/payments/by-coins",
    tag = "payments",
    summary = "Create a coin purchase order by coin count",
    responses(
        (status = 200, description = "Gateway order created"),
        (status = 400, description = "Below the minimum purchase"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn create_payment_by_coins(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(body): Json<PaymentCreateByCoins>,
) -> Result<Json<ApiResponse<PaymentCreatedResponse>>> {
    let coins_config = &state.config.coins;
    let minimum_coins = coins_config.minimum_purchase_coins();

    if body.coins < minimum_coins {
        return Err(Error::bad_request(format!("Minimum purchase is {minimum_coins} coins")));
    }

    let amount = amount_for_coins(body.coins, coins_config.coins_per_currency_unit);

    let response = create_payment_inner(
        &state,
        &user,
        PaymentCreateDBRequest {
            user_id: user.id,
            amount,
            currency: body.currency,
            coins: body.coins,
            payment_method: "paypal".to_string(),
        },
    )
    .await?;

    Ok(Json(ApiResponse::new(response)))
}

/// Capture an approved gateway order and credit the wallet.
///
/// A non-success capture returns a 400 and leaves both the payment and the
/// wallet untouched. On success, mark-completed and the wallet credit commit
/// together; a repeated capture of an already-completed payment is an
/// idempotent no-op (no double credit).
#[utoipa::path(
    post,
    path = "/payments/capture",
    tag = "payments",
    summary = "Capture a payment and credit coins",
    responses(
        (status = 200, description = "Coins credited"),
        (status = 400, description = "Payment not completed by the gateway"),
        (status = 404, description = "No such order for this user"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn capture_payment(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(body): Json<PaymentCapture>,
) -> Result<Json<ApiResponse<PaymentCompletedResponse>>> {
    let gateway = gateway(&state)?;

    // Gateway first: anything but a confirmed success means no mutation at all
    let outcome = gateway.capture_order(&body.order_id).await?;
    if !outcome.completed {
        return Err(Error::bad_request("Payment not completed"));
    }

    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;

    let payment: PaymentDBResponse = Payments::new(&mut tx)
        .get_by_order_for_user(&body.order_id, user.id)
        .await?
        .ok_or_else(|| Error::not_found("Payment", &body.order_id))?;

    let marked = Payments::new(&mut tx)
        .mark_completed(payment.id, outcome.gateway_payment_id.as_deref(), outcome.gateway_payer_id.as_deref())
        .await?;

    let new_balance = match marked {
        Some(completed) => {
            // Completed-flip and credit are one unit
            let mut wallets = Wallets::new(&mut tx);
            wallets.ensure(user.id, state.config.coins.initial_balance).await?;
            let wallet = wallets
                .credit(
                    user.id,
                    EntryType::Purchase,
                    completed.coins,
                    &format!("Coin purchase - ${} for {} coins", completed.amount, completed.coins),
                    Some(LedgerReference {
                        kind: ReferenceKind::Payment,
                        id: completed.id,
                    }),
                    Some(completed.id),
                )
                .await?;
            wallet.balance
        }
        None if payment.status == PaymentStatus::Completed => {
            // Concurrent or repeated capture: already credited once
            tracing::info!("Payment {} already completed, skipping credit", payment.id);
            Wallets::new(&mut tx).balance(user.id).await?
        }
        None => {
            return Err(Error::bad_request("Payment is not pending"));
        }
    };

    tx.commit().await.map_err(|e| Error::Database(e.into()))?;

    Ok(Json(ApiResponse::with_message(
        PaymentCompletedResponse {
            payment_id: payment.id,
            coins_added: payment.coins,
            new_balance,
            amount: payment.amount,
        },
        "Payment completed successfully",
    )))
}

/// The caller's payment history, newest first.
#[utoipa::path(
    get,
    path = "/payments",
    tag = "payments",
    summary = "List own payments",
    responses((status = 200, description = "Payments, newest first"))
)]
#[tracing::instrument(skip_all)]
pub async fn payment_history(State(state): State<AppState>, user: CurrentUser) -> Result<Json<ApiResponse<Vec<PaymentResponse>>>> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;

    let payments = Payments::new(&mut conn).list_for_user(user.id).await?;

    Ok(Json(ApiResponse::new(payments.into_iter().map(PaymentResponse::from).collect())))
}

/// Predefined coin bundles.
#[utoipa::path(
    get,
    path = "/payments/packages",
    tag = "payments",
    summary = "List coin packages",
    responses((status = 200, description = "Available packages"))
)]
#[tracing::instrument(skip_all)]
pub async fn get_coin_packages(State(state): State<AppState>, _user: CurrentUser) -> Json<ApiResponse<Vec<CoinPackage>>> {
    Json(ApiResponse::new(coin_packages(state.config.coins.coins_per_currency_unit)))
}

/// The coin exchange rate and minimum purchase.
#[utoipa::path(
    get,
    path = "/payments/rate",
    tag = "payments",
    summary = "Get the coin rate",
    responses((status = 200, description = "Rate information"))
)]
#[tracing::instrument(skip_all)]
pub async fn get_coin_rate(State(state): State<AppState>, _user: CurrentUser) -> Json<ApiResponse<serde_json::Value>> {
    let coins = &state.config.coins;
    Json(ApiResponse::new(json!({
        "coins_per_currency_unit": coins.coins_per_currency_unit,
        "minimum_purchase": {
            "amount": coins.minimum_purchase_amount,
            "coins": coins.minimum_purchase_coins(),
        },
    })))
}

/// Delete the caller's abandoned pending payments (older than the configured
/// window). Idempotent; never touches the wallet.
#[utoipa::path(
    delete,
    path = "/payments/pending",
    tag = "payments",
    summary = "Delete own stale pending payments",
    responses((status = 200, description = "Stale pending payments deleted"))
)]
#[tracing::instrument(skip_all)]
pub async fn cancel_pending_payments(State(state): State<AppState>, user: CurrentUser) -> Result<Json<ApiResponse<serde_json::Value>>> {
    let cutoff = Utc::now()
        - chrono::Duration::from_std(state.config.payments.pending_delete_after).map_err(|e| Error::Internal {
            operation: format!("convert pending_delete_after: {e}"),
        })?;

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let deleted = Payments::new(&mut conn).delete_stale_pending(user.id, cutoff).await?;

    Ok(Json(ApiResponse::with_message(
        json!({ "deleted": deleted }),
        format!("Deleted {deleted} abandoned pending payments"),
    )))
}

/// Mark all stale pending payments as expired (admin batch sweep,
/// non-destructive).
#[utoipa::path(
    post,
    path = "/payments/cleanup",
    tag = "payments",
    summary = "Expire stale pending payments (admin)",
    responses(
        (status = 200, description = "Stale pending payments expired"),
        (status = 403, description = "Admin role required"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn cleanup_pending_payments(State(state): State<AppState>, user: CurrentUser) -> Result<Json<ApiResponse<serde_json::Value>>> {
    auth::require_admin(&user)?;

    let cutoff = Utc::now()
        - chrono::Duration::from_std(state.config.payments.pending_expire_after).map_err(|e| Error::Internal {
            operation: format!("convert pending_expire_after: {e}"),
        })?;

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let expired = Payments::new(&mut conn).expire_stale_pending(cutoff).await?;

    Ok(Json(ApiResponse::with_message(
        json!({ "expired": expired }),
        format!("Cleaned up {expired} expired pending payments"),
    )))
}
