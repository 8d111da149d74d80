// ============================================================================
// Bank Core - Authentication Service
// File: crates/bank-core/src/services/auth_service.rs
// ============================================================================
//! Authentication service: login, token verification, refresh rotation, logout

use std::sync::Arc;

use bank_security::credentials::{digest_token, generate_refresh_token};
use bank_security::{JwtService, PasswordService};
use bank_shared::utils::mask_email;
use chrono::{Duration, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::{Admin, AuthContext, AuthToken, Principal, Scope, TokenKind};
use crate::error::DomainError;
use crate::repositories::{AdminRepository, ClientRepository, TokenRepository};

pub const TOKEN_TYPE_BEARER: &str = "Bearer";

pub struct AuthService {
    clients: Arc<dyn ClientRepository>,
    admins: Arc<dyn AdminRepository>,
    tokens: Arc<dyn TokenRepository>,
    jwt: JwtService,
    refresh_token_expiry: i64,
}

impl AuthService {
    pub fn new(
        clients: Arc<dyn ClientRepository>,
        admins: Arc<dyn AdminRepository>,
        tokens: Arc<dyn TokenRepository>,
        jwt: JwtService,
        refresh_token_expiry: i64,
    ) -> Self {
        Self {
            clients,
            admins,
            tokens,
            jwt,
            refresh_token_expiry,
        }
    }

    pub fn refresh_token_expiry(&self) -> i64 {
        self.refresh_token_expiry
    }

    /// Clients are looked up first, then admins. Every failure is reported the same way.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResult, DomainError> {
        let email = email.trim().to_lowercase();
        info!("Login attempt for email: {}", mask_email(&email));

        let principal = match self.clients.find_by_email(&email).await? {
            Some(client) => Some(Principal::Client(client)),
            None => self.admins.find_by_email(&email).await?.map(Principal::Admin),
        };

        let principal = principal.ok_or_else(|| {
            warn!("Login failed: unknown email: {}", mask_email(&email));
            DomainError::InvalidCredentials
        })?;

        let stored_hash = principal
            .password_hash()
            .ok_or(DomainError::InvalidCredentials)?;

        let password_valid = PasswordService::verify(password, stored_hash).map_err(|e| {
            warn!("Login failed: unreadable password hash for {}: {}", principal.id(), e);
            DomainError::InvalidCredentials
        })?;

        if !password_valid {
            warn!("Login failed: invalid password for: {}", mask_email(&email));
            return Err(DomainError::InvalidCredentials);
        }

        let tokens = self.issue_tokens(principal.id(), principal.scope()).await?;

        info!(principal_id = %principal.id(), scope = principal.scope().as_str(), "Login successful");

        Ok(LoginResult {
            principal: PrincipalInfo::from(&principal),
            tokens,
        })
    }

    /// Verifies an access token and that its record has not been revoked.
    pub async fn authenticate(&self, access_token: &str) -> Result<AuthContext, DomainError> {
        let claims = self
            .jwt
            .validate_access_token(access_token)
            .map_err(|e| DomainError::InvalidToken(e.to_string()))?;

        let principal_id = claims
            .principal_id()
            .map_err(|e| DomainError::InvalidToken(e.to_string()))?;
        let token_id = claims
            .token_id()
            .map_err(|e| DomainError::InvalidToken(e.to_string()))?;

        let record = self
            .tokens
            .find_by_id(&token_id)
            .await?
            .ok_or_else(|| DomainError::InvalidToken("unknown token".to_string()))?;

        if record.kind != TokenKind::Access
            || record.principal_id != principal_id
            || !record.is_usable(Utc::now())
        {
            return Err(DomainError::InvalidToken("token revoked".to_string()));
        }

        Ok(AuthContext {
            principal_id,
            scope: claims.scope,
            token_id,
        })
    }

    /// Revokes the presented refresh token and issues a new pair under the same scope.
    pub async fn refresh(&self, ctx: &AuthContext, refresh_token: &str) -> Result<TokenPair, DomainError> {
        let record = self
            .tokens
            .find_refresh_by_digest(&digest_token(refresh_token))
            .await?
            .ok_or_else(|| DomainError::InvalidToken("unknown refresh token".to_string()))?;

        if record.principal_id != ctx.principal_id {
            warn!(principal_id = %ctx.principal_id, "Refresh token presented by another principal");
            return Err(DomainError::InvalidToken("refresh token mismatch".to_string()));
        }
        if !record.is_usable(Utc::now()) {
            return Err(DomainError::InvalidToken("refresh token expired or revoked".to_string()));
        }

        // a concurrent refresh with the same value already won
        if !self.tokens.revoke(&record.id).await? {
            warn!(principal_id = %record.principal_id, "Refresh token reused");
            return Err(DomainError::InvalidToken("refresh token already used".to_string()));
        }
        let pair = self.issue_tokens(record.principal_id, record.scope).await?;

        info!(principal_id = %record.principal_id, "Tokens refreshed");
        Ok(pair)
    }

    pub async fn logout(&self, ctx: &AuthContext) -> Result<(), DomainError> {
        let revoked = self.tokens.revoke_all_for_principal(&ctx.principal_id).await?;
        info!(principal_id = %ctx.principal_id, revoked, "Logout");
        Ok(())
    }

    /// Drops token records that expired or were revoked more than `retention_seconds` ago.
    pub async fn purge_stale_tokens(&self, retention_seconds: i64) -> Result<u64, DomainError> {
        let cutoff = Utc::now() - Duration::seconds(retention_seconds);
        let purged = self.tokens.purge_stale(cutoff).await?;
        if purged > 0 {
            info!(purged, "Stale auth tokens purged");
        }
        Ok(purged)
    }

    /// Creates the first administrator. Does nothing once any admin exists.
    pub async fn bootstrap_admin(
        &self,
        email: &str,
        password: &str,
        last_name: &str,
        first_name: &str,
    ) -> Result<Option<Admin>, DomainError> {
        if self.admins.count().await? > 0 {
            return Ok(None);
        }

        let password_hash = PasswordService::hash(password)
            .map_err(|e| DomainError::PasswordHashError(e.to_string()))?;
        let admin = Admin::new(
            last_name.to_string(),
            first_name.to_string(),
            email.to_string(),
            password_hash,
        );
        let admin = self.admins.create(&admin).await?;

        info!(admin_id = %admin.id, email = %mask_email(&admin.email), "Bootstrap admin created");
        Ok(Some(admin))
    }

    async fn issue_tokens(&self, principal_id: Uuid, scope: Scope) -> Result<TokenPair, DomainError> {
        let access_record = AuthToken::access(principal_id, scope, self.jwt.access_token_expiry());
        self.tokens.create(&access_record).await?;

        let access_token = self
            .jwt
            .generate_access_token(&principal_id, scope.as_str(), &access_record.id)
            .map_err(|e| DomainError::TokenGenerationError(e.to_string()))?;

        let refresh_token = generate_refresh_token();
        let refresh_record = AuthToken::refresh(
            principal_id,
            scope,
            digest_token(&refresh_token),
            self.refresh_token_expiry,
        );
        self.tokens.create(&refresh_record).await?;

        Ok(TokenPair {
            access_token,
            refresh_token,
            token_type: TOKEN_TYPE_BEARER,
            expires_in: self.jwt.access_token_expiry(),
            scope,
        })
    }
}

/// Result of successful login
#[derive(Debug, Clone)]
pub struct LoginResult {
    pub principal: PrincipalInfo,
    pub tokens: TokenPair,
}

#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
    pub scope: Scope,
}

/// Principal info returned in auth responses
#[derive(Debug, Clone)]
pub struct PrincipalInfo {
    pub id: Uuid,
    pub last_name: String,
    pub first_name: String,
    pub email: String,
    pub scope: Scope,
}

impl From<&Principal> for PrincipalInfo {
    fn from(principal: &Principal) -> Self {
        Self {
            id: principal.id(),
            last_name: principal.last_name().to_string(),
            first_name: principal.first_name().to_string(),
            email: principal.email().to_string(),
            scope: principal.scope(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Client, ClientFields};
    use crate::repositories::{MockAdminRepository, MockClientRepository, MockTokenRepository};
    use std::sync::Mutex;

    const SECRET: &str = "unit-test-secret";

    fn client_with_password(password: &str) -> Client {
        let fields = ClientFields {
            last_name: Some("Fall".into()),
            first_name: Some("Khady".into()),
            email: Some("khady@example.com".into()),
            phone: Some("771234567".into()),
            national_id: Some("1234567890123".into()),
            address: Some("Medina, Dakar".into()),
        }
        .checked("")
        .unwrap();
        Client::from_fields(&fields, PasswordService::hash(password).unwrap(), "123456".into()).unwrap()
    }

    fn admin_with_password(password: &str) -> Admin {
        Admin::new(
            "Admin".into(),
            "Root".into(),
            "admin@bank.sn".into(),
            bcrypt::hash(password, 4).unwrap(),
        )
    }

    fn service(
        clients: MockClientRepository,
        admins: MockAdminRepository,
        tokens: MockTokenRepository,
    ) -> AuthService {
        AuthService::new(
            Arc::new(clients),
            Arc::new(admins),
            Arc::new(tokens),
            JwtService::new(SECRET, 3600),
            604_800,
        )
    }

    fn recording_tokens(store: Arc<Mutex<Vec<AuthToken>>>) -> MockTokenRepository {
        let mut tokens = MockTokenRepository::new();
        let created = store.clone();
        tokens.expect_create().returning(move |t| {
            created.lock().unwrap().push(t.clone());
            Ok(())
        });
        let lookup = store.clone();
        tokens.expect_find_by_id().returning(move |id| {
            Ok(lookup.lock().unwrap().iter().find(|t| t.id == *id).cloned())
        });
        tokens
    }

    #[tokio::test]
    async fn client_login_gets_client_scope() {
        let client = client_with_password("Secret123");
        let mut clients = MockClientRepository::new();
        clients
            .expect_find_by_email()
            .withf(|email| email.to_string() == "khady@example.com")
            .returning(move |_| Ok(Some(client.clone())));
        let mut admins = MockAdminRepository::new();
        admins.expect_find_by_email().never();

        let store = Arc::new(Mutex::new(Vec::new()));
        let svc = service(clients, admins, recording_tokens(store.clone()));

        let result = svc.login("  Khady@Example.com ", "Secret123").await.unwrap();

        assert_eq!(result.tokens.scope, Scope::Client);
        assert_eq!(result.tokens.token_type, "Bearer");
        assert_eq!(result.tokens.expires_in, 3600);
        assert_eq!(result.principal.last_name, "Fall");

        let stored = store.lock().unwrap();
        assert_eq!(stored.len(), 2);
        let refresh = stored.iter().find(|t| t.kind == TokenKind::Refresh).unwrap();
        assert_eq!(
            refresh.token_digest.as_deref(),
            Some(digest_token(&result.tokens.refresh_token).as_str())
        );
    }

    #[tokio::test]
    async fn admin_login_gets_admin_scope() {
        let admin = admin_with_password("admin123");
        let mut clients = MockClientRepository::new();
        clients.expect_find_by_email().returning(|_| Ok(None));
        let mut admins = MockAdminRepository::new();
        admins
            .expect_find_by_email()
            .returning(move |_| Ok(Some(admin.clone())));

        let store = Arc::new(Mutex::new(Vec::new()));
        let svc = service(clients, admins, recording_tokens(store));

        let result = svc.login("admin@bank.sn", "admin123").await.unwrap();
        assert_eq!(result.tokens.scope, Scope::Admin);

        let ctx = svc.authenticate(&result.tokens.access_token).await.unwrap();
        assert_eq!(ctx.scope, "admin");
        assert_eq!(ctx.principal_id, result.principal.id);
    }

    #[tokio::test]
    async fn wrong_password_is_unauthorized_for_both_collections() {
        let client = client_with_password("Secret123");
        let mut clients = MockClientRepository::new();
        clients
            .expect_find_by_email()
            .returning(move |_| Ok(Some(client.clone())));
        let svc = service(clients, MockAdminRepository::new(), MockTokenRepository::new());
        let err = svc.login("khady@example.com", "nope").await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidCredentials));

        let admin = admin_with_password("admin123");
        let mut clients = MockClientRepository::new();
        clients.expect_find_by_email().returning(|_| Ok(None));
        let mut admins = MockAdminRepository::new();
        admins
            .expect_find_by_email()
            .returning(move |_| Ok(Some(admin.clone())));
        let svc = service(clients, admins, MockTokenRepository::new());
        let err = svc.login("admin@bank.sn", "nope").await.unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Unauthorized);
    }

    #[tokio::test]
    async fn unknown_email_is_unauthorized() {
        let mut clients = MockClientRepository::new();
        clients.expect_find_by_email().returning(|_| Ok(None));
        let mut admins = MockAdminRepository::new();
        admins.expect_find_by_email().returning(|_| Ok(None));

        let err = service(clients, admins, MockTokenRepository::new())
            .login("ghost@example.com", "x")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidCredentials));
    }

    #[tokio::test]
    async fn revoked_access_token_is_rejected() {
        let principal_id = Uuid::new_v4();
        let mut record = AuthToken::access(principal_id, Scope::Client, 3600);
        record.revoked_at = Some(Utc::now());
        let token = JwtService::new(SECRET, 3600)
            .generate_access_token(&principal_id, "client", &record.id)
            .unwrap();

        let mut tokens = MockTokenRepository::new();
        tokens
            .expect_find_by_id()
            .returning(move |_| Ok(Some(record.clone())));

        let err = service(MockClientRepository::new(), MockAdminRepository::new(), tokens)
            .authenticate(&token)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidToken(_)));
    }

    #[tokio::test]
    async fn garbage_token_is_rejected() {
        let err = service(
            MockClientRepository::new(),
            MockAdminRepository::new(),
            MockTokenRepository::new(),
        )
        .authenticate("not.a.jwt")
        .await
        .unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Unauthorized);
    }

    #[tokio::test]
    async fn refresh_rotates_the_presented_token() {
        let principal_id = Uuid::new_v4();
        let presented = generate_refresh_token();
        let record = AuthToken::refresh(principal_id, Scope::Admin, digest_token(&presented), 60);
        let record_id = record.id;

        let mut tokens = MockTokenRepository::new();
        tokens
            .expect_find_refresh_by_digest()
            .returning(move |_| Ok(Some(record.clone())));
        tokens
            .expect_revoke()
            .times(1)
            .withf(move |id| *id == record_id)
            .returning(|_| Ok(true));
        tokens.expect_create().times(2).returning(|_| Ok(()));

        let ctx = AuthContext {
            principal_id,
            scope: "admin".into(),
            token_id: Uuid::new_v4(),
        };
        let pair = service(MockClientRepository::new(), MockAdminRepository::new(), tokens)
            .refresh(&ctx, &presented)
            .await
            .unwrap();

        assert_eq!(pair.scope, Scope::Admin);
        assert_ne!(pair.refresh_token, presented);
    }

    #[tokio::test]
    async fn refresh_token_of_another_principal_is_rejected() {
        let presented = generate_refresh_token();
        let record = AuthToken::refresh(Uuid::new_v4(), Scope::Client, digest_token(&presented), 60);

        let mut tokens = MockTokenRepository::new();
        tokens
            .expect_find_refresh_by_digest()
            .returning(move |_| Ok(Some(record.clone())));
        tokens.expect_revoke().never();

        let ctx = AuthContext {
            principal_id: Uuid::new_v4(),
            scope: "client".into(),
            token_id: Uuid::new_v4(),
        };
        let err = service(MockClientRepository::new(), MockAdminRepository::new(), tokens)
            .refresh(&ctx, &presented)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidToken(_)));
    }

    fn refresh_ctx(principal_id: Uuid) -> AuthContext {
        AuthContext {
            principal_id,
            scope: "client".into(),
            token_id: Uuid::new_v4(),
        }
    }

    #[tokio::test]
    async fn expired_refresh_token_is_rejected() {
        let principal_id = Uuid::new_v4();
        let presented = generate_refresh_token();
        let record = AuthToken::refresh(principal_id, Scope::Client, digest_token(&presented), -1);

        let mut tokens = MockTokenRepository::new();
        tokens
            .expect_find_refresh_by_digest()
            .returning(move |_| Ok(Some(record.clone())));
        tokens.expect_revoke().never();
        tokens.expect_create().never();

        let err = service(MockClientRepository::new(), MockAdminRepository::new(), tokens)
            .refresh(&refresh_ctx(principal_id), &presented)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidToken(_)));
    }

    #[tokio::test]
    async fn revoked_refresh_token_is_rejected() {
        let principal_id = Uuid::new_v4();
        let presented = generate_refresh_token();
        let mut record = AuthToken::refresh(principal_id, Scope::Client, digest_token(&presented), 60);
        record.revoked_at = Some(Utc::now());

        let mut tokens = MockTokenRepository::new();
        tokens
            .expect_find_refresh_by_digest()
            .returning(move |_| Ok(Some(record.clone())));
        tokens.expect_revoke().never();
        tokens.expect_create().never();

        let err = service(MockClientRepository::new(), MockAdminRepository::new(), tokens)
            .refresh(&refresh_ctx(principal_id), &presented)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidToken(_)));
    }

    #[tokio::test]
    async fn refresh_losing_the_revocation_race_issues_nothing() {
        let principal_id = Uuid::new_v4();
        let presented = generate_refresh_token();
        let record = AuthToken::refresh(principal_id, Scope::Client, digest_token(&presented), 60);

        let mut tokens = MockTokenRepository::new();
        // both requests saw an unrevoked record
        tokens
            .expect_find_refresh_by_digest()
            .returning(move |_| Ok(Some(record.clone())));
        let mut first = true;
        tokens.expect_revoke().times(2).returning(move |_| {
            let won = first;
            first = false;
            Ok(won)
        });
        tokens.expect_create().times(2).returning(|_| Ok(()));

        let auth = service(MockClientRepository::new(), MockAdminRepository::new(), tokens);
        let ctx = refresh_ctx(principal_id);

        assert!(auth.refresh(&ctx, &presented).await.is_ok());
        let err = auth.refresh(&ctx, &presented).await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidToken(_)));
    }

    #[tokio::test]
    async fn purge_uses_retention_cutoff() {
        let mut tokens = MockTokenRepository::new();
        tokens
            .expect_purge_stale()
            .times(1)
            .withf(|cutoff| {
                let age = Utc::now() - *cutoff;
                age >= Duration::seconds(86_400) && age < Duration::seconds(86_460)
            })
            .returning(|_| Ok(4));

        let purged = service(MockClientRepository::new(), MockAdminRepository::new(), tokens)
            .purge_stale_tokens(86_400)
            .await
            .unwrap();
        assert_eq!(purged, 4);
    }

    #[tokio::test]
    async fn logout_revokes_everything() {
        let principal_id = Uuid::new_v4();
        let mut tokens = MockTokenRepository::new();
        tokens
            .expect_revoke_all_for_principal()
            .times(1)
            .withf(move |id| *id == principal_id)
            .returning(|_| Ok(3));

        let ctx = AuthContext {
            principal_id,
            scope: "client".into(),
            token_id: Uuid::new_v4(),
        };
        service(MockClientRepository::new(), MockAdminRepository::new(), tokens)
            .logout(&ctx)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn bootstrap_is_skipped_when_an_admin_exists() {
        let mut admins = MockAdminRepository::new();
        admins.expect_count().returning(|| Ok(1));
        admins.expect_create().never();

        let created = service(MockClientRepository::new(), admins, MockTokenRepository::new())
            .bootstrap_admin("admin@bank.sn", "admin123", "Admin", "Root")
            .await
            .unwrap();
        assert!(created.is_none());
    }

    #[tokio::test]
    async fn bootstrap_creates_first_admin() {
        let mut admins = MockAdminRepository::new();
        admins.expect_count().returning(|| Ok(0));
        admins
            .expect_create()
            .times(1)
            .withf(|a| a.email == "admin@bank.sn" && a.password_hash.starts_with("$argon2"))
            .returning(|a| Ok(a.clone()));

        let created = service(MockClientRepository::new(), admins, MockTokenRepository::new())
            .bootstrap_admin("Admin@Bank.sn", "admin123", "Admin", "Root")
            .await
            .unwrap();
        assert!(created.is_some());
    }
}
