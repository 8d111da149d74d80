//! Login, token refresh and logout

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{
        header::{COOKIE, SET_COOKIE},
        HeaderMap, HeaderValue,
    },
    response::IntoResponse,
    Extension, Json,
};
use bank_core::domain::AuthContext;
use bank_core::DomainError;
use bank_shared::constants::REFRESH_COOKIE_NAME;
use tracing::info;

use crate::dto::{LoginRequest, LoginResource, RefreshRequest, TokenResource};
use crate::error::ApiError;
use crate::extract::extract_json;
use crate::response::ApiResponse;
use crate::state::AppState;

pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let req = extract_json(body)?;
    let (email, password) = match (req.email.as_deref(), req.password.as_deref()) {
        (Some(email), Some(password)) if !email.trim().is_empty() && !password.is_empty() => {
            (email, password)
        }
        _ => return Err(DomainError::InvalidCredentials.into()),
    };

    let result = state.auth.login(email, password).await?;
    let cookie = refresh_cookie(
        &result.tokens.refresh_token,
        state.auth.refresh_token_expiry(),
        state.config.security.cookie_secure,
    )?;

    Ok((
        [(SET_COOKIE, cookie)],
        Json(ApiResponse::success(
            LoginResource::from(result),
            "Authentification réussie",
        )),
    ))
}

/// Rotates the refresh token. The cookie wins over the body.
pub async fn refresh(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    headers: HeaderMap,
    body: Result<Json<RefreshRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let token = cookie_value(&headers, REFRESH_COOKIE_NAME)
        .or_else(|| body.ok().and_then(|Json(req)| req.refresh_token))
        .filter(|token| !token.is_empty())
        .ok_or_else(|| ApiError::Unauthorized("Refresh token manquant".to_string()))?;

    let pair = state.auth.refresh(&ctx, &token).await?;
    let cookie = refresh_cookie(
        &pair.refresh_token,
        state.auth.refresh_token_expiry(),
        state.config.security.cookie_secure,
    )?;

    Ok((
        [(SET_COOKIE, cookie)],
        Json(ApiResponse::success(
            TokenResource::from(pair),
            "Token rafraîchi avec succès",
        )),
    ))
}

pub async fn logout(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
) -> Result<impl IntoResponse, ApiError> {
    state.auth.logout(&ctx).await?;
    info!(principal_id = %ctx.principal_id, "Logged out");

    let cookie = refresh_cookie("", 0, state.config.security.cookie_secure)?;
    Ok((
        [(SET_COOKIE, cookie)],
        Json(ApiResponse::<()>::message_only("Déconnexion réussie")),
    ))
}

fn refresh_cookie(token: &str, max_age: i64, secure: bool) -> Result<HeaderValue, ApiError> {
    let secure = if secure { " Secure;" } else { "" };
    let cookie = format!(
        "{}={}; HttpOnly;{} SameSite=Strict; Path=/; Max-Age={}",
        REFRESH_COOKIE_NAME, token, secure, max_age
    );
    HeaderValue::from_str(&cookie)
        .map_err(|e| ApiError::Domain(DomainError::InternalError(format!("invalid cookie: {}", e))))
}

fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cookie_has_security_attributes() {
        let cookie = refresh_cookie("abc", 604_800, true).unwrap();
        assert_eq!(
            cookie.to_str().unwrap(),
            "refresh_token=abc; HttpOnly; Secure; SameSite=Strict; Path=/; Max-Age=604800"
        );

        let local = refresh_cookie("abc", 60, false).unwrap();
        assert!(!local.to_str().unwrap().contains("Secure"));
    }

    #[test]
    fn cleared_cookie_expires_immediately() {
        let cookie = refresh_cookie("", 0, true).unwrap();
        assert!(cookie.to_str().unwrap().starts_with("refresh_token=;"));
        assert!(cookie.to_str().unwrap().ends_with("Max-Age=0"));
    }

    #[test]
    fn reads_named_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("theme=dark; refresh_token=xyz; lang=fr"));

        assert_eq!(cookie_value(&headers, "refresh_token").as_deref(), Some("xyz"));
        assert_eq!(cookie_value(&headers, "missing"), None);
    }
}
