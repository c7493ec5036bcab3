//! HTTP handlers for user accounts.

use crate::{
    AppState,
    api::models::{
        ApiResponse,
        users::{CurrentUser, UserCreate, UserResponse},
    },
    auth,
    db::{handlers::Users, models::users::UserCreateDBRequest},
    errors::{Error, Result},
};
use axum::{extract::State, http::StatusCode, response::Json};

/// The authenticated caller's own account.
#[utoipa::path(
    get,
    path = "/users/me",
    tag = "users",
    summary = "Get own account",
    responses((status = 200, description = "The caller's account"))
)]
#[tracing::instrument(skip_all)]
pub async fn get_me(user: CurrentUser) -> Json<ApiResponse<CurrentUser>> {
    Json(ApiResponse::new(user))
}

/// Provision a user account (admin).
#[utoipa::path(
    post,
    path = "/users",
    tag = "users",
    summary = "Create a user (admin)",
    responses(
        (status = 201, description = "User created"),
        (status = 400, description = "Email already registered"),
        (status = 403, description = "Admin role required"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn create_user(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(body): Json<UserCreate>,
) -> Result<(StatusCode, Json<ApiResponse<UserResponse>>)> {
    auth::require_admin(&user)?;

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;

    let created = Users::new(&mut conn)
        .create(&UserCreateDBRequest {
            name: body.name,
            email: body.email,
            phone: body.phone,
            role: body.role,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::new(UserResponse::from(created)))))
}
