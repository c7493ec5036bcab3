//! Post-commit notification dispatch.
//!
//! Notifications run after the domain mutation has committed and are
//! fire-and-forget: a send failure is logged and never propagated, so an
//! unreachable mail server cannot roll back (or appear to roll back) an
//! already-committed contact or application.

use crate::email::EmailService;
use std::sync::Arc;

/// Notify a tutor that a student unlocked their contact details
pub fn spawn_contact_notification(email: Arc<EmailService>, to_email: String, to_name: String, student_name: String) {
    tokio::spawn(async move {
        if let Err(e) = email.send_contact_notification(&to_email, &to_name, &student_name).await {
            tracing::warn!("Failed to send contact notification to {to_email}: {e}");
        }
    });
}

/// Notify a post owner that a tutor applied
pub fn spawn_application_notification(email: Arc<EmailService>, to_email: String, to_name: String, teacher_name: String) {
    tokio::spawn(async move {
        if let Err(e) = email.send_application_notification(&to_email, &to_name, &teacher_name).await {
            tracing::warn!("Failed to send application notification to {to_email}: {e}");
        }
    });
}
