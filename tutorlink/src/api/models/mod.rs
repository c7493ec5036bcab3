//! API request and response data models.
//!
//! These structures define the public API contract and are distinct from the
//! database models so the two can evolve independently. All models are
//! annotated with `utoipa` for the generated API docs.

pub mod applications;
pub mod contacts;
pub mod payments;
pub mod posts;
pub mod resources;
pub mod teachers;
pub mod users;
pub mod wallet;

use serde::Serialize;
use utoipa::ToSchema;

/// Standard success envelope: `{ "success": true, "data": ..., "message"?: ... }`.
///
/// Handled domain errors use the mirror shape `{ "success": false, "message": ... }`
/// produced by [`crate::errors::Error`].
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
            message: None,
        }
    }

    pub fn with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data,
            message: Some(message.into()),
        }
    }
}
