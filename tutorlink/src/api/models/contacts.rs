//! API models for the contact workflow.

use crate::db::models::contacts::{ContactDBResponse, ContactStatus, ContactWithStudentDBResponse};
use crate::types::{ContactId, TeacherId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Request body for initiating contact with a tutor
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ContactInitiate {
    #[serde(default)]
    pub message: Option<String>,
}

/// A contact record
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ContactResponse {
    #[schema(value_type = uuid::Uuid)]
    pub id: ContactId,
    #[schema(value_type = uuid::Uuid)]
    pub student_id: UserId,
    #[schema(value_type = uuid::Uuid)]
    pub teacher_id: TeacherId,
    pub status: ContactStatus,
    pub contact_cost: i64,
    pub message: Option<String>,
    pub initiated_at: DateTime<Utc>,
    pub contacted_at: Option<DateTime<Utc>>,
}

impl From<ContactDBResponse> for ContactResponse {
    fn from(contact: ContactDBResponse) -> Self {
        Self {
            id: contact.id,
            student_id: contact.student_id,
            teacher_id: contact.teacher_id,
            status: contact.status,
            contact_cost: contact.contact_cost,
            message: contact.message,
            initiated_at: contact.initiated_at,
            contacted_at: contact.contacted_at,
        }
    }
}

/// A contact with the initiating student's details (tutor-side listing)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ContactWithStudentResponse {
    #[serde(flatten)]
    pub contact: ContactResponse,
    pub student_name: String,
    pub student_email: String,
}

impl From<ContactWithStudentDBResponse> for ContactWithStudentResponse {
    fn from(row: ContactWithStudentDBResponse) -> Self {
        Self {
            contact: ContactResponse {
                id: row.id,
                student_id: row.student_id,
                teacher_id: row.teacher_id,
                status: row.status,
                contact_cost: row.contact_cost,
                message: row.message,
                initiated_at: row.initiated_at,
                contacted_at: row.contacted_at,
            },
            student_name: row.student_name,
            student_email: row.student_email,
        }
    }
}
