//! HTTP handlers for student post requirements.

use crate::{
    AppState,
    api::models::{
        ApiResponse,
        posts::{PostCreate, PostResponse},
        users::CurrentUser,
    },
    db::{handlers::Posts, models::posts::PostCreateDBRequest},
    errors::{Error, Result},
    types::{PostId, level_index},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};

/// Post a tutoring requirement.
#[utoipa::path(
    post,
    path = "/posts",
    tag = "posts",
    summary = "Create a post requirement",
    responses(
        (status = 201, description = "Post created"),
        (status = 400, description = "Missing subjects or unknown level"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn create_post(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(body): Json<PostCreate>,
) -> Result<(StatusCode, Json<ApiResponse<PostResponse>>)> {
    if body.description.trim().is_empty() {
        return Err(Error::bad_request("Description is required"));
    }
    if body.subjects.is_empty() {
        return Err(Error::bad_request("At least one subject is required"));
    }
    if body.languages.is_empty() {
        return Err(Error::bad_request("At least one language is required"));
    }
    for subject in &body.subjects {
        if level_index(&subject.level).is_none() {
            return Err(Error::bad_request(format!("Unknown level '{}'", subject.level)));
        }
    }

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;

    let post = Posts::new(&mut conn)
        .create(&PostCreateDBRequest {
            user_id: user.id,
            description: body.description,
            subjects: body.subjects,
            languages: body.languages,
            location: body.location,
            phone: body.phone,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::new(PostResponse::from(post)))))
}

/// A post by id.
#[utoipa::path(
    get,
    path = "/posts/{post_id}",
    tag = "posts",
    summary = "Get a post requirement",
    responses(
        (status = 200, description = "The post"),
        (status = 404, description = "Post not found"),
    )
)]
#[tracing::instrument(skip_all, fields(post_id = %post_id))]
pub async fn get_post(
    State(state): State<AppState>,
    Path(post_id): Path<PostId>,
    _user: CurrentUser,
) -> Result<Json<ApiResponse<PostResponse>>> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;

    let post = Posts::new(&mut conn)
        .get_by_id(post_id)
        .await?
        .ok_or_else(|| Error::not_found("Post requirement", post_id))?;

    Ok(Json(ApiResponse::new(PostResponse::from(post))))
}
