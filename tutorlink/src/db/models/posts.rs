//! Database models for student post requirements.

use crate::types::{PostId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::Json;
use utoipa::ToSchema;

/// One subject a post requires, at a single level on the scale
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PostSubject {
    pub name: String,
    pub level: String,
}

/// Database row for a post requirement
#[derive(Debug, Clone, FromRow)]
pub struct PostDBResponse {
    pub id: PostId,
    pub user_id: UserId,
    pub description: String,
    pub subjects: Json<Vec<PostSubject>>,
    pub languages: Vec<String>,
    pub location: Option<String>,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Database request for creating a post requirement
#[derive(Debug, Clone)]
pub struct PostCreateDBRequest {
    pub user_id: UserId,
    pub description: String,
    pub subjects: Vec<PostSubject>,
    pub languages: Vec<String>,
    pub location: Option<String>,
    pub phone: Option<String>,
}
