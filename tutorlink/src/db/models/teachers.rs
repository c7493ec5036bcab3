//! Database models for tutor profiles.

use crate::types::{TeacherId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::Json;
use utoipa::ToSchema;

/// One subject a tutor offers, with the level interval they cover
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TeacherSubject {
    pub name: String,
    pub from_level: String,
    pub to_level: String,
}

/// Database row for a tutor profile
#[derive(Debug, Clone, FromRow)]
pub struct TeacherProfileDBResponse {
    pub id: TeacherId,
    pub user_id: UserId,
    pub subjects: Json<Vec<TeacherSubject>>,
    pub languages: Vec<String>,
    pub is_approved: bool,
    pub created_at: DateTime<Utc>,
}

/// Database request for creating a tutor profile
#[derive(Debug, Clone)]
pub struct TeacherProfileCreateDBRequest {
    pub user_id: UserId,
    pub subjects: Vec<TeacherSubject>,
    pub languages: Vec<String>,
}
