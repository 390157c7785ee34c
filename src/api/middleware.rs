use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::api::state::AppState;
use crate::crypto::TokenKeys;
use crate::error::AppError;

/// The authenticated caller, resolved from the bearer token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: String,
}

/// Verify the request's token and resolve the caller.
///
/// A missing token and a bad token are both 401s but are logged differently.
pub fn authenticate(headers: &HeaderMap, keys: &TokenKeys) -> Result<AuthUser, AppError> {
    let token = bearer_token(headers).ok_or_else(|| {
        tracing::warn!("🔒 Rejected request: no token supplied");
        AppError::Unauthorized("No token, authorization denied".to_string())
    })?;

    let claims = keys.verify(token).map_err(|e| {
        tracing::warn!("🔒 Rejected request: token invalid ({})", e);
        AppError::Unauthorized("Token is not valid".to_string())
    })?;

    Ok(AuthUser { id: claims.user.id })
}

/// `Authorization: Bearer <token>`, falling back to the legacy `x-auth-token`.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let token = match headers.get(AUTHORIZATION) {
        Some(value) => value.to_str().ok()?.strip_prefix("Bearer ")?,
        None => headers.get("x-auth-token")?.to_str().ok()?,
    };

    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// Authentication middleware for routes that are protected for every method
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = authenticate(request.headers(), &state.keys)?;

    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        // Already resolved by auth_middleware
        if let Some(user) = parts.extensions.get::<AuthUser>() {
            return Ok(user.clone());
        }

        authenticate(&parts.headers, &state.keys)
    }
}
