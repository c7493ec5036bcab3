use crate::{
    AppState,
    api::models::users::CurrentUser,
    db::{
        handlers::Users,
        models::users::{Role, UserCreateDBRequest},
    },
    errors::{Error, Result},
};
use axum::{extract::FromRequestParts, http::request::Parts};
use tracing::{debug, instrument, trace};

/// Extract the caller from the trusted proxy header.
///
/// The upstream proxy authenticates the caller and forwards their email in
/// the configured header; we map it onto the local account row. When
/// `auto_create_users` is on, an unknown email is provisioned as a student
/// account named after the mailbox part of the address.
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Error;

    #[instrument(skip_all)]
    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        let header_name = &state.config.auth.proxy_header.header_name;
        let email = match parts.headers.get(header_name).and_then(|h| h.to_str().ok()) {
            Some(email) => email,
            None => {
                trace!("No {header_name} header on request");
                return Err(Error::Unauthenticated { message: None });
            }
        };

        let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
        let mut users = Users::new(&mut conn);

        if let Some(user) = users.get_by_email(email).await? {
            debug!("Resolved caller {} ({:?})", user.email, user.role);
            return Ok(CurrentUser::from(user));
        }

        if !state.config.auth.proxy_header.auto_create_users {
            return Err(Error::Unauthenticated {
                message: Some("Unknown user".to_string()),
            });
        }

        let name = email.split('@').next().filter(|s| !s.is_empty()).unwrap_or("user").to_string();
        let created = users
            .create(&UserCreateDBRequest {
                name,
                email: email.to_string(),
                phone: None,
                role: Role::Student,
            })
            .await?;

        debug!("Auto-created account for {}", created.email);
        Ok(CurrentUser::from(created))
    }
}
