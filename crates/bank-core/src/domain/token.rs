//! Persisted token records backing access-token revocation and refresh rotation

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use super::Scope;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Access,
    Refresh,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Access => "access",
            TokenKind::Refresh => "refresh",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "access" => Some(TokenKind::Access),
            "refresh" => Some(TokenKind::Refresh),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AuthToken {
    pub id: Uuid,
    pub principal_id: Uuid,
    pub scope: Scope,
    pub kind: TokenKind,
    /// SHA-256 of the opaque refresh value; `None` for access tokens
    pub token_digest: Option<String>,
    pub expires_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl AuthToken {
    pub fn access(principal_id: Uuid, scope: Scope, lifetime_seconds: i64) -> Self {
        Self::issue(principal_id, scope, TokenKind::Access, None, lifetime_seconds)
    }

    pub fn refresh(principal_id: Uuid, scope: Scope, digest: String, lifetime_seconds: i64) -> Self {
        Self::issue(principal_id, scope, TokenKind::Refresh, Some(digest), lifetime_seconds)
    }

    fn issue(
        principal_id: Uuid,
        scope: Scope,
        kind: TokenKind,
        token_digest: Option<String>,
        lifetime_seconds: i64,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            principal_id,
            scope,
            kind,
            token_digest,
            expires_at: now + Duration::seconds(lifetime_seconds),
            revoked_at: None,
            created_at: now,
        }
    }

    pub fn is_usable(&self, now: DateTime<Utc>) -> bool {
        self.revoked_at.is_none() && self.expires_at > now
    }
}
