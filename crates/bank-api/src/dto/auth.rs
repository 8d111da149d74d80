//! Authentication payloads

use bank_core::domain::Scope;
use bank_core::services::{LoginResult, PrincipalInfo, TokenPair};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// The refresh token normally travels in the cookie; the body is a fallback.
#[derive(Debug, Default, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UserResource {
    pub id: Uuid,
    pub nom: String,
    pub prenom: String,
    pub email: String,
}

impl From<PrincipalInfo> for UserResource {
    fn from(info: PrincipalInfo) -> Self {
        Self {
            id: info.id,
            nom: info.last_name,
            prenom: info.first_name,
            email: info.email,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TokenResource {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
    pub scope: Scope,
}

impl From<TokenPair> for TokenResource {
    fn from(pair: TokenPair) -> Self {
        Self {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
            token_type: pair.token_type,
            expires_in: pair.expires_in,
            scope: pair.scope,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LoginResource {
    pub user: UserResource,
    #[serde(flatten)]
    pub tokens: TokenResource,
}

impl From<LoginResult> for LoginResource {
    fn from(result: LoginResult) -> Self {
        Self {
            user: result.principal.into(),
            tokens: result.tokens.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_resource_flattens_tokens() {
        let result = LoginResult {
            principal: PrincipalInfo {
                id: Uuid::nil(),
                last_name: "Ndiaye".into(),
                first_name: "Awa".into(),
                email: "awa@banque.sn".into(),
                scope: Scope::Admin,
            },
            tokens: TokenPair {
                access_token: "a".into(),
                refresh_token: "r".into(),
                token_type: "Bearer",
                expires_in: 3600,
                scope: Scope::Admin,
            },
        };

        let value = serde_json::to_value(LoginResource::from(result)).unwrap();

        assert_eq!(value["user"]["nom"], "Ndiaye");
        assert_eq!(value["user"]["prenom"], "Awa");
        assert_eq!(value["access_token"], "a");
        assert_eq!(value["token_type"], "Bearer");
        assert_eq!(value["expires_in"], 3600);
        assert_eq!(value["scope"], "admin");
    }
}
