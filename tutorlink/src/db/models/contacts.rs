//! Database models for contact unlocks.

use crate::types::{ContactId, TeacherId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Contact lifecycle state stored as TEXT in the database
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ContactStatus {
    Pending,
    Accepted,
    Rejected,
    Contacted,
}

/// Database row for a contact record
#[derive(Debug, Clone, FromRow)]
pub struct ContactDBResponse {
    pub id: ContactId,
    pub student_id: UserId,
    pub teacher_id: TeacherId,
    pub status: ContactStatus,
    pub contact_cost: i64,
    pub message: Option<String>,
    pub initiated_at: DateTime<Utc>,
    pub contacted_at: Option<DateTime<Utc>>,
}

/// Database request for creating a contact record
#[derive(Debug, Clone)]
pub struct ContactCreateDBRequest {
    pub student_id: UserId,
    pub teacher_id: TeacherId,
    pub contact_cost: i64,
    pub message: Option<String>,
}

/// Contact row joined with the initiating student's details, for the
/// tutor-side listing
#[derive(Debug, Clone, FromRow)]
pub struct ContactWithStudentDBResponse {
    pub id: ContactId,
    pub student_id: UserId,
    pub teacher_id: TeacherId,
    pub status: ContactStatus,
    pub contact_cost: i64,
    pub message: Option<String>,
    pub initiated_at: DateTime<Utc>,
    pub contacted_at: Option<DateTime<Utc>>,
    pub student_name: String,
    pub student_email: String,
}
