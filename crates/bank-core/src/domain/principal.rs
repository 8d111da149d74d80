// ============================================================================
// Bank Core - Principal
// File: crates/bank-core/src/domain/principal.rs
// Description: Authenticated actor (client or admin) and its request context
// ============================================================================

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Admin, Client};
use crate::error::DomainError;

/// Audience a token was issued for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    Client,
    Admin,
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Client => "client",
            Scope::Admin => "admin",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "client" => Some(Scope::Client),
            "admin" => Some(Scope::Admin),
            _ => None,
        }
    }
}

/// Either kind of account that can log in.
#[derive(Debug, Clone, PartialEq)]
pub enum Principal {
    Client(Client),
    Admin(Admin),
}

impl Principal {
    pub fn id(&self) -> Uuid {
        match self {
            Principal::Client(c) => c.id,
            Principal::Admin(a) => a.id,
        }
    }

    pub fn email(&self) -> &str {
        match self {
            Principal::Client(c) => &c.email,
            Principal::Admin(a) => &a.email,
        }
    }

    /// Clients authenticate with their temporary password until they set one.
    pub fn password_hash(&self) -> Option<&str> {
        match self {
            Principal::Client(c) => c.temp_password_hash.as_deref(),
            Principal::Admin(a) => Some(&a.password_hash),
        }
    }

    pub fn scope(&self) -> Scope {
        match self {
            Principal::Client(_) => Scope::Client,
            Principal::Admin(_) => Scope::Admin,
        }
    }

    pub fn last_name(&self) -> &str {
        match self {
            Principal::Client(c) => &c.last_name,
            Principal::Admin(a) => &a.last_name,
        }
    }

    pub fn first_name(&self) -> &str {
        match self {
            Principal::Client(c) => &c.first_name,
            Principal::Admin(a) => &a.first_name,
        }
    }
}

/// Identity attached to an authenticated request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    pub principal_id: Uuid,
    pub scope: String,
    pub token_id: Uuid,
}

impl AuthContext {
    /// Plain string equality against the route's role.
    pub fn require_role(&self, role: &str) -> Result<(), DomainError> {
        if self.scope == role {
            Ok(())
        } else {
            Err(DomainError::InsufficientRole {
                required: role.to_string(),
                actual: self.scope.clone(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(scope: &str) -> AuthContext {
        AuthContext {
            principal_id: Uuid::new_v4(),
            scope: scope.to_string(),
            token_id: Uuid::new_v4(),
        }
    }

    #[test]
    fn role_check_is_string_equality() {
        assert!(context("admin").require_role("admin").is_ok());
        assert!(matches!(
            context("client").require_role("admin"),
            Err(DomainError::InsufficientRole { .. })
        ));
        assert!(context("Admin").require_role("admin").is_err());
    }

    #[test]
    fn principal_projection() {
        let admin = Admin::new("Sow".into(), "Ali".into(), "Admin@Bank.sn".into(), "hash".into());
        let principal = Principal::Admin(admin.clone());

        assert_eq!(principal.id(), admin.id);
        assert_eq!(principal.email(), "admin@bank.sn");
        assert_eq!(principal.password_hash(), Some("hash"));
        assert_eq!(principal.scope(), Scope::Admin);
        assert_eq!(Scope::from_str("client"), Some(Scope::Client));
    }
}
