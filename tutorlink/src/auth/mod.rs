//! Caller identity and role gates.
//!
//! Identity is resolved by an upstream proxy and forwarded as a trusted
//! header (see [`crate::config::ProxyHeaderAuthConfig`]); this module turns
//! that header into a [`CurrentUser`](crate::api::models::users::CurrentUser)
//! extractor and provides the role checks handlers gate on.

pub mod current_user;

use crate::api::models::users::CurrentUser;
use crate::db::models::users::Role;
use crate::errors::{Error, Result};

/// Require the admin role
pub fn require_admin(user: &CurrentUser) -> Result<()> {
    if user.role != Role::Admin {
        return Err(Error::Forbidden {
            action: "perform admin operations".to_string(),
        });
    }
    Ok(())
}

/// Require a specific role (admins pass any gate)
pub fn require_role(user: &CurrentUser, role: Role, action: &str) -> Result<()> {
    if user.role != role && user.role != Role::Admin {
        return Err(Error::Forbidden { action: action.to_string() });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn user(role: Role) -> CurrentUser {
        CurrentUser {
            id: Uuid::new_v4(),
            name: "Test".to_string(),
            email: "test@example.com".to_string(),
            phone: None,
            role,
        }
    }

    #[test]
    fn admin_gate() {
        assert!(require_admin(&user(Role::Admin)).is_ok());
        assert!(require_admin(&user(Role::Student)).is_err());
        assert!(require_admin(&user(Role::Teacher)).is_err());
    }

    #[test]
    fn role_gate_lets_admins_through() {
        assert!(require_role(&user(Role::Teacher), Role::Teacher, "apply").is_ok());
        assert!(require_role(&user(Role::Admin), Role::Teacher, "apply").is_ok());
        assert!(require_role(&user(Role::Student), Role::Teacher, "apply").is_err());
    }
}
