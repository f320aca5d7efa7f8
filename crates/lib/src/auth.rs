//! Authorization gate
//!
//! Two guards: "authenticated" (a session identity must be present) and
//! "administrator" (the identity's role must be admin). They are applied in
//! that order, and the two failures stay distinguishable: the HTTP layer turns
//! [`Denial::Unauthenticated`] into a redirect to the login page and
//! [`Denial::NotAdmin`] into a 403.

use std::fmt;

use crate::user::Identity;

/// Capability a route requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Authenticated,
    Admin,
}

/// Why a request was turned away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denial {
    /// No session identity
    Unauthenticated,
    /// Identity present but not an administrator
    NotAdmin,
}

impl fmt::Display for Denial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Denial::Unauthenticated => f.write_str("Authentication required"),
            Denial::NotAdmin => f.write_str("Access denied. Admin privileges required."),
        }
    }
}

/// Check `identity` against the required access level.
pub fn authorize(identity: Option<&Identity>, access: Access) -> Result<&Identity, Denial> {
    let identity = identity.ok_or(Denial::Unauthenticated)?;
    match access {
        Access::Authenticated => Ok(identity),
        Access::Admin if identity.is_admin() => Ok(identity),
        Access::Admin => Err(Denial::NotAdmin),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user::Role;
    use uuid::Uuid;

    fn identity(role: Role) -> Identity {
        Identity {
            id: Uuid::new_v4(),
            email: "someone@x.com".to_string(),
            role,
        }
    }

    #[test]
    fn missing_identity_is_unauthenticated_for_both_guards() {
        assert_eq!(
            authorize(None, Access::Authenticated),
            Err(Denial::Unauthenticated)
        );
        assert_eq!(authorize(None, Access::Admin), Err(Denial::Unauthenticated));
    }

    #[test]
    fn users_pass_authenticated_but_not_admin() {
        let user = identity(Role::User);
        assert!(authorize(Some(&user), Access::Authenticated).is_ok());
        assert_eq!(authorize(Some(&user), Access::Admin), Err(Denial::NotAdmin));
    }

    #[test]
    fn admins_pass_both() {
        let admin = identity(Role::Admin);
        assert!(authorize(Some(&admin), Access::Authenticated).is_ok());
        assert_eq!(authorize(Some(&admin), Access::Admin), Ok(&admin));
    }
}
