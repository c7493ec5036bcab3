//! API models for tutor profiles.

use crate::db::models::teachers::{TeacherProfileDBResponse, TeacherSubject};
use crate::types::{TeacherId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Request body for creating the caller's tutor profile
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct TeacherProfileCreate {
    pub subjects: Vec<TeacherSubject>,
    pub languages: Vec<String>,
}

/// Moderation request body
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct TeacherApproval {
    pub is_approved: bool,
}

/// A tutor profile
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TeacherProfileResponse {
    #[schema(value_type = uuid::Uuid)]
    pub id: TeacherId,
    #[schema(value_type = uuid::Uuid)]
    pub user_id: UserId,
    pub subjects: Vec<TeacherSubject>,
    pub languages: Vec<String>,
    pub is_approved: bool,
    pub created_at: DateTime<Utc>,
}

impl From<TeacherProfileDBResponse> for TeacherProfileResponse {
    fn from(profile: TeacherProfileDBResponse) -> Self {
        Self {
            id: profile.id,
            user_id: profile.user_id,
            subjects: profile.subjects.0,
            languages: profile.languages,
            is_approved: profile.is_approved,
            created_at: profile.created_at,
        }
    }
}
