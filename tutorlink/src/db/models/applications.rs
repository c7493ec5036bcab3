//! Database models for tutor applications.

use crate::types::{ApplicationId, PostId, TeacherId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Application lifecycle state stored as TEXT in the database.
///
/// There is no pending state: applications start accepted and move
/// forward-only to contacted, or are overwritten to rejected by moderation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Accepted,
    Rejected,
    Contacted,
}

/// Database row for an application
#[derive(Debug, Clone, FromRow)]
pub struct ApplicationDBResponse {
    pub id: ApplicationId,
    pub teacher_id: TeacherId,
    pub post_id: PostId,
    pub status: ApplicationStatus,
    pub application_cost: i64,
    pub applied_at: DateTime<Utc>,
    pub contacted_at: Option<DateTime<Utc>>,
}

/// Database request for creating an application
#[derive(Debug, Clone)]
pub struct ApplicationCreateDBRequest {
    pub teacher_id: TeacherId,
    pub post_id: PostId,
    pub application_cost: i64,
}

/// Application joined with the post owner's contact details, for the reveal
/// operation
#[derive(Debug, Clone, FromRow)]
pub struct ApplicationWithStudentDBResponse {
    pub id: ApplicationId,
    pub teacher_id: TeacherId,
    pub post_id: PostId,
    pub status: ApplicationStatus,
    pub application_cost: i64,
    pub applied_at: DateTime<Utc>,
    pub contacted_at: Option<DateTime<Utc>>,
    /// User id of the tutor who owns the application
    pub teacher_user_id: uuid::Uuid,
    pub student_name: String,
    pub student_email: String,
    pub student_phone: Option<String>,
    /// Fallback phone recorded on the post itself
    pub post_phone: Option<String>,
}
