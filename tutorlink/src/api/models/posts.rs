//! API models for student post requirements.

use crate::db::models::posts::{PostDBResponse, PostSubject};
use crate::types::{PostId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Request body for posting a tutoring requirement
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct PostCreate {
    pub description: String,
    pub subjects: Vec<PostSubject>,
    pub languages: Vec<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

/// A post requirement
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PostResponse {
    #[schema(value_type = uuid::Uuid)]
    pub id: PostId,
    #[schema(value_type = uuid::Uuid)]
    pub user_id: UserId,
    pub description: String,
    pub subjects: Vec<PostSubject>,
    pub languages: Vec<String>,
    pub location: Option<String>,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<PostDBResponse> for PostResponse {
    fn from(post: PostDBResponse) -> Self {
        Self {
            id: post.id,
            user_id: post.user_id,
            description: post.description,
            subjects: post.subjects.0,
            languages: post.languages,
            location: post.location,
            phone: post.phone,
            created_at: post.created_at,
        }
    }
}
