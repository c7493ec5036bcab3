//! HTTP handlers for the caller's wallet.

use crate::{
    AppState,
    api::models::{
        ApiResponse,
        users::CurrentUser,
        wallet::{TransactionResponse, WalletResponse},
    },
    db::handlers::Wallets,
    errors::{Error, Result},
};
use axum::{extract::State, response::Json};

/// Get the caller's wallet, creating it with the default starting balance on
/// first touch.
#[utoipa::path(
    get,
    path = "/wallet",
    tag = "wallet",
    summary = "Get own wallet",
    responses(
        (status = 200, description = "The wallet, created if absent"),
        (status = 401, description = "Unauthorized"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn get_wallet(State(state): State<AppState>, user: CurrentUser) -> Result<Json<ApiResponse<WalletResponse>>> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut wallets = Wallets::new(&mut conn);

    let wallet = wallets.ensure(user.id, state.config.coins.initial_balance).await?;

    Ok(Json(ApiResponse::new(WalletResponse::from(wallet))))
}

/// Transaction history, newest first, with signed display amounts.
#[utoipa::path(
    get,
    path = "/wallet/transactions",
    tag = "wallet",
    summary = "List own wallet transactions",
    responses(
        (status = 200, description = "Transactions, newest first"),
        (status = 401, description = "Unauthorized"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn get_transactions(State(state): State<AppState>, user: CurrentUser) -> Result<Json<ApiResponse<Vec<TransactionResponse>>>> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut wallets = Wallets::new(&mut conn);

    let transactions = wallets.transactions(user.id).await?;
    let formatted = transactions.into_iter().map(TransactionResponse::from).collect();

    Ok(Json(ApiResponse::new(formatted)))
}
