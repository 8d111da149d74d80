use axum::{extract::Request, middleware::Next, response::Response};
use bank_core::domain::{AuthContext, Scope};

use crate::error::ApiError;

/// Must run after `require_auth`.
pub async fn require_admin(request: Request, next: Next) -> Result<Response, ApiError> {
    let ctx = request
        .extensions()
        .get::<AuthContext>()
        .ok_or_else(|| ApiError::Unauthorized("Non authentifié.".to_string()))?;

    ctx.require_role(Scope::Admin.as_str())?;
    Ok(next.run(request).await)
}
