//! HTTP handlers for tutor profiles.

use crate::{
    AppState,
    api::models::{
        ApiResponse,
        teachers::{TeacherApproval, TeacherProfileCreate, TeacherProfileResponse},
        users::CurrentUser,
    },
    auth,
    db::{
        handlers::TeacherProfiles,
        models::{teachers::TeacherProfileCreateDBRequest, users::Role},
    },
    errors::{Error, Result},
    types::TeacherId,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};

/// Create the calling tutor's profile. Profiles start unapproved; approval
/// is a moderation action.
#[utoipa::path(
    post,
    path = "/teachers",
    tag = "teachers",
    summary = "Create own tutor profile",
    responses(
        (status = 201, description = "Profile created (pending approval)"),
        (status = 400, description = "Profile already exists"),
        (status = 403, description = "Teacher role required"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn create_teacher_profile(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(body): Json<TeacherProfileCreate>,
) -> Result<(StatusCode, Json<ApiResponse<TeacherProfileResponse>>)> {
    auth::require_role(&user, Role::Teacher, "create a tutor profile")?;

    if body.subjects.is_empty() {
        return Err(Error::bad_request("At least one subject is required"));
    }
    if body.languages.is_empty() {
        return Err(Error::bad_request("At least one language is required"));
    }

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;

    let profile = TeacherProfiles::new(&mut conn)
        .create(&TeacherProfileCreateDBRequest {
            user_id: user.id,
            subjects: body.subjects,
            languages: body.languages,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::new(TeacherProfileResponse::from(profile)))))
}

/// A tutor profile by id.
#[utoipa::path(
    get,
    path = "/teachers/{teacher_id}",
    tag = "teachers",
    summary = "Get a tutor profile",
    responses(
        (status = 200, description = "The profile"),
        (status = 404, description = "Profile not found"),
    )
)]
#[tracing::instrument(skip_all, fields(teacher_id = %teacher_id))]
pub async fn get_teacher(
    State(state): State<AppState>,
    Path(teacher_id): Path<TeacherId>,
    _user: CurrentUser,
) -> Result<Json<ApiResponse<TeacherProfileResponse>>> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;

    let profile = TeacherProfiles::new(&mut conn)
        .get_by_id(teacher_id)
        .await?
        .ok_or_else(|| Error::not_found("Teacher", teacher_id))?;

    Ok(Json(ApiResponse::new(TeacherProfileResponse::from(profile))))
}

/// Approve or revoke a tutor profile (moderation).
#[utoipa::path(
    patch,
    path = "/teachers/{teacher_id}/approval",
    tag = "teachers",
    summary = "Set tutor approval (admin)",
    responses(
        (status = 200, description = "Approval updated"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Profile not found"),
    )
)]
#[tracing::instrument(skip_all, fields(teacher_id = %teacher_id))]
pub async fn set_teacher_approval(
    State(state): State<AppState>,
    Path(teacher_id): Path<TeacherId>,
    user: CurrentUser,
    Json(body): Json<TeacherApproval>,
) -> Result<Json<ApiResponse<TeacherProfileResponse>>> {
    auth::require_admin(&user)?;

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut profiles = TeacherProfiles::new(&mut conn);

    if profiles.get_by_id(teacher_id).await?.is_none() {
        return Err(Error::not_found("Teacher", teacher_id));
    }

    let profile = profiles.set_approval(teacher_id, body.is_approved).await?;

    Ok(Json(ApiResponse::new(TeacherProfileResponse::from(profile))))
}
