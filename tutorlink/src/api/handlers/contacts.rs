//! HTTP handlers for the contact workflow: a student pays a fixed cost to
//! unlock a tutor's contact details exactly once.

use crate::{
    AppState, notifications,
    api::models::{
        ApiResponse,
        contacts::{ContactInitiate, ContactResponse, ContactWithStudentResponse},
        users::CurrentUser,
    },
    db::{
        errors::DbError,
        handlers::{Contacts, TeacherProfiles, Users, Wallets},
        models::contacts::ContactCreateDBRequest,
        models::wallets::{LedgerReference, ReferenceKind},
    },
    errors::{Error, Result},
    types::TeacherId,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};

/// Initiate contact with a tutor.
///
/// The balance check, the debit and the contact insert run in one database
/// transaction: a failure at any step (including losing the duplicate race
/// to the unique index) rolls the debit back, so the student is never
/// charged without a contact record existing.
#[utoipa::path(
    post,
    path = "/contacts/{teacher_id}",
    tag = "contacts",
    summary = "Pay to unlock a tutor's contact details",
    responses(
        (status = 201, description = "Contact initiated"),
        (status = 400, description = "Tutor not approved, duplicate contact, or insufficient coins"),
        (status = 404, description = "Tutor not found"),
    )
)]
#[tracing::instrument(skip_all, fields(teacher_id = %teacher_id))]
pub async fn initiate_contact(
    State(state): State<AppState>,
    Path(teacher_id): Path<TeacherId>,
    user: CurrentUser,
    Json(body): Json<ContactInitiate>,
) -> Result<(StatusCode, Json<ApiResponse<ContactResponse>>)> {
    let contact_cost = state.config.coins.contact_cost;

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;

    let teacher = TeacherProfiles::new(&mut conn)
        .get_by_id(teacher_id)
        .await?
        .ok_or_else(|| Error::not_found("Teacher", teacher_id))?;

    if !teacher.is_approved {
        return Err(Error::bad_request("This teacher profile is not approved yet"));
    }

    // Fast-path duplicate check; the unique index below is the backstop
    if Contacts::new(&mut conn).get_by_pair(user.id, teacher_id).await?.is_some() {
        return Err(Error::Conflict {
            message: "You have already initiated contact with this teacher".to_string(),
        });
    }

    let teacher_user = Users::new(&mut conn)
        .get_by_id(teacher.user_id)
        .await?
        .ok_or_else(|| Error::not_found("Teacher", teacher.user_id))?;

    drop(conn);

    // Debit + create as one logical transaction
    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;

    Wallets::new(&mut tx)
        .debit(
            user.id,
            contact_cost,
            &format!("Contact initiated with teacher: {}", teacher_user.name),
            Some(LedgerReference {
                kind: ReferenceKind::Contact,
                id: teacher_id,
            }),
        )
        .await?;

    let contact = Contacts::new(&mut tx)
        .create(&ContactCreateDBRequest {
            student_id: user.id,
            teacher_id,
            contact_cost,
            message: body.message,
        })
        .await
        .map_err(|e| match e {
            // Lost the duplicate race: the rollback un-charges the student
            DbError::UniqueViolation { .. } => Error::Conflict {
                message: "You have already initiated contact with this teacher".to_string(),
            },
            other => Error::Database(other),
        })?;

    tx.commit().await.map_err(|e| Error::Database(e.into()))?;

    // Post-commit, fire-and-forget
    notifications::spawn_contact_notification(state.email.clone(), teacher_user.email, teacher_user.name, user.name.clone());

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            ContactResponse::from(contact),
            "Contact initiated successfully",
        )),
    ))
}

/// Contact status for a (caller, tutor) pair. Pure read; null when absent.
#[utoipa::path(
    get,
    path = "/contacts/{teacher_id}/status",
    tag = "contacts",
    summary = "Check whether the caller already contacted a tutor",
    responses((status = 200, description = "Contact record or null"))
)]
#[tracing::instrument(skip_all, fields(teacher_id = %teacher_id))]
pub async fn get_contact_status(
    State(state): State<AppState>,
    Path(teacher_id): Path<TeacherId>,
    user: CurrentUser,
) -> Result<Json<ApiResponse<Option<ContactResponse>>>> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;

    let contact = Contacts::new(&mut conn).get_by_pair(user.id, teacher_id).await?;

    Ok(Json(ApiResponse::new(contact.map(ContactResponse::from))))
}

/// Contacts received by the calling tutor, newest first.
#[utoipa::path(
    get,
    path = "/contacts",
    tag = "contacts",
    summary = "List contacts received by the calling tutor",
    responses(
        (status = 200, description = "Contacts with student details"),
        (status = 404, description = "Caller has no tutor profile"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn list_teacher_contacts(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<ApiResponse<Vec<ContactWithStudentResponse>>>> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;

    let profile = TeacherProfiles::new(&mut conn)
        .get_by_user(user.id)
        .await?
        .ok_or_else(|| Error::not_found("Teacher profile", user.id))?;

    let contacts = Contacts::new(&mut conn).list_for_teacher(profile.id).await?;

    Ok(Json(ApiResponse::new(
        contacts.into_iter().map(ContactWithStudentResponse::from).collect(),
    )))
}
