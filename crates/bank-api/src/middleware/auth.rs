use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use tracing::debug;

use crate::error::ApiError;
use crate::state::AppState;

const MSG_MISSING_TOKEN: &str = "Token d'authentification manquant.";

/// Resolves the bearer token into an `AuthContext` extension for the handlers.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(bearer_token)
        .ok_or_else(|| ApiError::Unauthorized(MSG_MISSING_TOKEN.to_string()))?
        .to_string();

    let ctx = state.auth.authenticate(&token).await?;
    debug!(principal_id = %ctx.principal_id, scope = %ctx.scope, "Request authenticated");

    request.extensions_mut().insert(ctx);
    Ok(next.run(request).await)
}

fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}
