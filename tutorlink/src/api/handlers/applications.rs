//! HTTP handlers for the tutor application workflow.

use crate::{
    AppState, notifications,
    api::models::{
        ApiResponse,
        applications::{
            ApplicationListResponse, ApplicationResponse, ApplicationStats, ApplicationStatusUpdate, ContactInformationResponse,
            application_cost, languages_intersect, subjects_match,
        },
        users::CurrentUser,
    },
    auth,
    db::{
        errors::DbError,
        handlers::{Applications, Posts, TeacherProfiles, Users, Wallets},
        models::applications::{ApplicationCreateDBRequest, ApplicationStatus},
        models::wallets::{LedgerReference, ReferenceKind},
    },
    errors::{Error, Result},
    types::{ApplicationId, PostId, abbrev_uuid},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use chrono::Utc;

/// Apply to a student's post.
///
/// Validation order matters: eligibility (subjects, levels, languages) is
/// checked before any money moves, the post owner's ability to afford a
/// contact back is a pre-check only (no debit against the student), and the
/// tutor's debit and the application insert commit together.
#[utoipa::path(
    post,
    path = "/applications/{post_id}",
    tag = "applications",
    summary = "Apply to a post (costs coins)",
    responses(
        (status = 201, description = "Application submitted"),
        (status = 400, description = "Ineligible, duplicate, or insufficient coins"),
        (status = 404, description = "Post not found"),
    )
)]
#[tracing::instrument(skip_all, fields(post_id = %post_id))]
pub async fn apply_to_post(
    State(state): State<AppState>,
    Path(post_id): Path<PostId>,
    user: CurrentUser,
) -> Result<(StatusCode, Json<ApiResponse<ApplicationResponse>>)> {
    let coins = &state.config.coins;

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;

    let profile = TeacherProfiles::new(&mut conn)
        .get_by_user(user.id)
        .await?
        .ok_or_else(|| Error::bad_request("Please complete your teacher profile first"))?;

    if !profile.is_approved {
        return Err(Error::bad_request("Your teacher profile is not approved yet"));
    }

    let post = Posts::new(&mut conn)
        .get_by_id(post_id)
        .await?
        .ok_or_else(|| Error::not_found("Post requirement", post_id))?;

    if Applications::new(&mut conn).get_by_pair(profile.id, post_id).await?.is_some() {
        return Err(Error::Conflict {
            message: "You have already applied to this post".to_string(),
        });
    }

    if !subjects_match(&profile.subjects.0, &post.subjects.0) {
        return Err(Error::bad_request("Your subjects don't match the post requirements"));
    }

    if !languages_intersect(&profile.languages, &post.languages) {
        return Err(Error::bad_request("You don't share a common language with the student"));
    }

    let cost = application_cost(coins, post.subjects.0.len());

    // Fast-path balance check; the conditional debit below is authoritative
    let mut wallets = Wallets::new(&mut conn);
    let teacher_wallet = wallets.get(user.id).await?.ok_or_else(|| Error::not_found("Wallet", user.id))?;
    if teacher_wallet.balance < cost {
        return Err(Error::InsufficientFunds {
            required: cost,
            available: teacher_wallet.balance,
        });
    }

    // Pre-check only: the post owner must be able to afford contacting back,
    // but nothing is debited from them at application time
    let student_wallet = wallets
        .get(post.user_id)
        .await?
        .ok_or_else(|| Error::not_found("Student wallet", post.user_id))?;
    if student_wallet.balance < coins.contact_cost {
        return Err(Error::bad_request("Student doesn't have enough coins for contact"));
    }

    let post_owner = Users::new(&mut conn)
        .get_by_id(post.user_id)
        .await?
        .ok_or_else(|| Error::not_found("User", post.user_id))?;

    drop(conn);

    let description: String = post.description.chars().take(50).collect();

    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;

    Wallets::new(&mut tx)
        .debit(
            user.id,
            cost,
            &format!("Applied to post: {description}..."),
            Some(LedgerReference {
                kind: ReferenceKind::Post,
                id: post_id,
            }),
        )
        .await?;

    let application = Applications::new(&mut tx)
        .create(&ApplicationCreateDBRequest {
            teacher_id: profile.id,
            post_id,
            application_cost: cost,
        })
        .await
        .map_err(|e| match e {
            DbError::UniqueViolation { .. } => Error::Conflict {
                message: "You have already applied to this post".to_string(),
            },
            other => Error::Database(other),
        })?;

    tx.commit().await.map_err(|e| Error::Database(e.into()))?;

    tracing::info!(
        "Application {} submitted by tutor {} for {} coins",
        abbrev_uuid(&application.id),
        abbrev_uuid(&profile.id),
        cost
    );

    notifications::spawn_application_notification(state.email.clone(), post_owner.email, post_owner.name, user.name.clone());

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            ApplicationResponse::from(application),
            "Application submitted successfully",
        )),
    ))
}

/// Reveal the student's contact information to the owning tutor.
///
/// The first reveal transitions accepted -> contacted and stamps
/// `contacted_at`; later calls return the same data without re-stamping.
#[utoipa::path(
    get,
    path = "/applications/{application_id}/contact",
    tag = "applications",
    summary = "Reveal the student's contact details",
    responses(
        (status = 200, description = "Student name, email and phone"),
        (status = 400, description = "Application not yet accepted"),
        (status = 403, description = "Not the owning tutor"),
        (status = 404, description = "Application not found"),
    )
)]
#[tracing::instrument(skip_all, fields(application_id = %application_id))]
pub async fn get_contact_information(
    State(state): State<AppState>,
    Path(application_id): Path<ApplicationId>,
    user: CurrentUser,
) -> Result<Json<ApiResponse<ContactInformationResponse>>> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut applications = Applications::new(&mut conn);

    let application = applications
        .get_with_student(application_id)
        .await?
        .ok_or_else(|| Error::not_found("Application", application_id))?;

    if application.teacher_user_id != user.id {
        return Err(Error::Forbidden {
            action: "access this application".to_string(),
        });
    }

    match application.status {
        ApplicationStatus::Accepted => {
            // Guarded update; a concurrent reveal losing this race just reads
            applications.mark_contacted(application_id).await?;
        }
        ApplicationStatus::Contacted => {}
        ApplicationStatus::Rejected => {
            return Err(Error::bad_request("Application not yet accepted by student"));
        }
    }

    Ok(Json(ApiResponse::new(ContactInformationResponse {
        name: application.student_name,
        email: application.student_email,
        phone: application.student_phone.or(application.post_phone),
    })))
}

/// Check whether the calling tutor has applied to a post. Pure read.
#[utoipa::path(
    get,
    path = "/applications/{post_id}/status",
    tag = "applications",
    summary = "Check own application to a post",
    responses(
        (status = 200, description = "The application"),
        (status = 404, description = "No application for this post"),
    )
)]
#[tracing::instrument(skip_all, fields(post_id = %post_id))]
pub async fn check_application_status(
    State(state): State<AppState>,
    Path(post_id): Path<PostId>,
    user: CurrentUser,
) -> Result<Json<ApiResponse<ApplicationResponse>>> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;

    let profile = TeacherProfiles::new(&mut conn)
        .get_by_user(user.id)
        .await?
        .ok_or_else(|| Error::not_found("Teacher profile", user.id))?;

    let application = Applications::new(&mut conn)
        .get_by_pair(profile.id, post_id)
        .await?
        .ok_or_else(|| Error::not_found("Application", post_id))?;

    Ok(Json(ApiResponse::new(ApplicationResponse::from(application))))
}

/// The calling tutor's applications with derived statistics.
#[utoipa::path(
    get,
    path = "/applications",
    tag = "applications",
    summary = "List own applications with statistics",
    responses(
        (status = 200, description = "Applications and aggregate stats"),
        (status = 404, description = "Caller has no tutor profile"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn list_my_applications(State(state): State<AppState>, user: CurrentUser) -> Result<Json<ApiResponse<ApplicationListResponse>>> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;

    let profile = TeacherProfiles::new(&mut conn)
        .get_by_user(user.id)
        .await?
        .ok_or_else(|| Error::not_found("Teacher profile", user.id))?;

    let applications = Applications::new(&mut conn).list_for_teacher(profile.id).await?;
    let stats = ApplicationStats::compute(&applications, Utc::now());

    Ok(Json(ApiResponse::new(ApplicationListResponse {
        applications: applications.into_iter().map(ApplicationResponse::from).collect(),
        stats,
    })))
}

/// Moderation: overwrite an application's status.
///
/// Only `rejected` is reachable this way; accepted -> contacted happens via
/// the reveal, and nothing leaves `contacted` or `rejected` otherwise.
#[utoipa::path(
    patch,
    path = "/applications/{application_id}/status",
    tag = "applications",
    summary = "Moderate an application (admin)",
    responses(
        (status = 200, description = "Status updated"),
        (status = 400, description = "Disallowed transition"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Application not found"),
    )
)]
#[tracing::instrument(skip_all, fields(application_id = %application_id))]
pub async fn set_application_status(
    State(state): State<AppState>,
    Path(application_id): Path<ApplicationId>,
    user: CurrentUser,
    Json(body): Json<ApplicationStatusUpdate>,
) -> Result<Json<ApiResponse<ApplicationResponse>>> {
    auth::require_admin(&user)?;

    if body.status != ApplicationStatus::Rejected {
        return Err(Error::bad_request("Only 'rejected' can be set via moderation"));
    }

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut applications = Applications::new(&mut conn);

    if applications.get_with_student(application_id).await?.is_none() {
        return Err(Error::not_found("Application", application_id));
    }

    let application = applications.set_status(application_id, body.status).await?;

    Ok(Json(ApiResponse::with_message(
        ApplicationResponse::from(application),
        "Application status updated",
    )))
}
