use crate::db::errors::DbError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum Error {
    /// Authentication required but not provided
    #[error("Not authenticated")]
    Unauthenticated { message: Option<String> },

    /// Caller lacks the role or ownership the operation requires
    #[error("Not authorized to {action}")]
    Forbidden { action: String },

    /// Invalid request data or business rule violation
    #[error("{message}")]
    BadRequest { message: String },

    /// Requested resource not found
    #[error("{resource} not found")]
    NotFound { resource: String, id: String },

    /// Duplicate contact/application/order-value; no state was mutated
    #[error("Conflict: {message}")]
    Conflict { message: String },

    /// Wallet balance below the required amount; no state was mutated
    #[error("Insufficient coins: {required} required, {available} available")]
    InsufficientFunds { required: i64, available: i64 },

    /// External collaborator (payment gateway, blob store) failed
    #[error("{service} error: {message}")]
    ExternalService { service: String, message: String },

    /// Generic internal service error
    #[error("Failed to {operation}")]
    Internal { operation: String },

    /// Database operation error
    #[error(transparent)]
    Database(#[from] DbError),

    /// Unexpected error with full context chain
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    pub fn not_found(resource: impl Into<String>, id: impl ToString) -> Self {
        Error::NotFound {
            resource: resource.into(),
            id: id.to_string(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Error::BadRequest { message: message.into() }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Unauthenticated { .. } => StatusCode::UNAUTHORIZED,
            Error::Forbidden { .. } => StatusCode::FORBIDDEN,
            Error::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Error::NotFound { .. } => StatusCode::NOT_FOUND,
            // Duplicate workflow records surface as 400-class per the API
            // contract (a second initiation is a client mistake, not a race
            // the client should retry)
            Error::Conflict { .. } => StatusCode::BAD_REQUEST,
            Error::InsufficientFunds { .. } => StatusCode::BAD_REQUEST,
            Error::ExternalService { .. } => StatusCode::BAD_GATEWAY,
            Error::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Error::Database(db_err) => match db_err {
                DbError::NotFound => StatusCode::NOT_FOUND,
                DbError::UniqueViolation { .. } => StatusCode::BAD_REQUEST,
                DbError::ForeignKeyViolation { .. } => StatusCode::BAD_REQUEST,
                DbError::CheckViolation { .. } => StatusCode::BAD_REQUEST,
                DbError::StaleRevision { .. } => StatusCode::CONFLICT,
                DbError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Error::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns a user-safe error message, without leaking internal implementation details
    pub fn user_message(&self) -> String {
        match self {
            Error::Unauthenticated { message } => message.clone().unwrap_or_else(|| "Authentication required".to_string()),
            Error::Forbidden { action } => format!("Not authorized to {action}"),
            Error::BadRequest { message } => message.clone(),
            Error::NotFound { resource, .. } => format!("{resource} not found"),
            Error::Conflict { message } => message.clone(),
            Error::InsufficientFunds { .. } => "Insufficient coins for this action".to_string(),
            Error::ExternalService { service, .. } => format!("{service} is currently unavailable"),
            Error::Internal { .. } => "Internal server error".to_string(),
            Error::Database(db_err) => match db_err {
                DbError::NotFound => "Resource not found".to_string(),
                DbError::UniqueViolation { constraint, table, .. } => match (table.as_deref(), constraint.as_deref()) {
                    (Some("users"), Some(c)) if c.contains("email") => "An account with this email address already exists".to_string(),
                    (Some("contacts"), _) => "You have already initiated contact with this teacher".to_string(),
                    (Some("applications"), _) => "You have already applied to this post".to_string(),
                    _ => "Resource already exists".to_string(),
                },
                DbError::ForeignKeyViolation { .. } => "Invalid reference to related resource".to_string(),
                DbError::CheckViolation { .. } => "Invalid data provided".to_string(),
                DbError::StaleRevision { .. } => "The resource was modified concurrently, please retry".to_string(),
                DbError::Other(_) => "Database error occurred".to_string(),
            },
            Error::Other(_) => "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        // Log full error details for debugging - different log levels based on severity
        match &self {
            Error::Database(DbError::Other(_)) | Error::Internal { .. } | Error::Other(_) => {
                tracing::error!("Internal service error: {:#}", self);
            }
            Error::ExternalService { .. } => {
                tracing::warn!("External service error: {}", self);
            }
            Error::Database(_) | Error::Conflict { .. } => {
                tracing::warn!("Constraint error: {}", self);
            }
            Error::Unauthenticated { .. } | Error::Forbidden { .. } => {
                tracing::info!("Authorization error: {}", self);
            }
            Error::BadRequest { .. } | Error::NotFound { .. } | Error::InsufficientFunds { .. } => {
                tracing::debug!("Client error: {}", self);
            }
        }

        let status = self.status_code();
        let body = json!({
            "success": false,
            "message": self.user_message(),
        });

        (status, Json(body)).into_response()
    }
}

/// Type alias for service operation results
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_funds_is_a_bad_request_not_a_server_error() {
        let err = Error::InsufficientFunds {
            required: 50,
            available: 30,
        };
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        // The exact shortfall stays out of the client-facing message
        assert_eq!(err.user_message(), "Insufficient coins for this action");
    }

    #[test]
    fn duplicate_contact_maps_to_domain_message() {
        let err = Error::Database(DbError::UniqueViolation {
            constraint: Some("contacts_student_id_teacher_id_key".to_string()),
            table: Some("contacts".to_string()),
            message: "duplicate key value".to_string(),
        });
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.user_message(), "You have already initiated contact with this teacher");
    }

    #[test]
    fn internal_errors_do_not_leak_details() {
        let err = Error::Other(anyhow::anyhow!("connection pool exhausted at 10.0.0.3"));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.user_message(), "Internal server error");
    }
}
