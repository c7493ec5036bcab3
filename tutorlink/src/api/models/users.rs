//! API models for user accounts and the authenticated caller.

use crate::db::models::users::{Role, UserDBResponse};
use crate::types::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// The authenticated caller, resolved from the trusted proxy header
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CurrentUser {
    #[schema(value_type = uuid::Uuid)]
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: Role,
}

impl From<UserDBResponse> for CurrentUser {
    fn from(user: UserDBResponse) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            phone: user.phone,
            role: user.role,
        }
    }
}

/// Request body for provisioning a user (admin only)
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UserCreate {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub role: Role,
}

/// Public user representation
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    #[schema(value_type = uuid::Uuid)]
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl From<UserDBResponse> for UserResponse {
    fn from(user: UserDBResponse) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            phone: user.phone,
            role: user.role,
            created_at: user.created_at,
        }
    }
}
