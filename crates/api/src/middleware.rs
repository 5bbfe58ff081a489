//! Request authentication gate.
//!
//! Per-request flow: missing header → 401; present → decode (HMAC family
//! only); decode failure → 401; decoded → explicit expiry check; expired →
//! 401; valid → attach [`CurrentUser`] to request extensions and continue.

use std::sync::Arc;

use axum::{
    extract::State,
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use chrono::Utc;

use staffgate_auth::{validate_claims, TokenVerifier};

use crate::app::errors::ApiError;
use crate::context::CurrentUser;

#[derive(Clone)]
pub struct AuthState {
    pub verifier: Arc<dyn TokenVerifier>,
}

pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_token(req.headers()).ok_or(ApiError::Unauthorized)?;

    let claims = state.verifier.verify(token).map_err(|err| {
        tracing::warn!(error = %err, "token rejected");
        ApiError::Unauthorized
    })?;

    // The codec enforces exp during decode; this also rejects not-yet-valid
    // and inverted time windows.
    if let Err(err) = validate_claims(&claims, Utc::now()) {
        tracing::warn!(error = %err, "claims rejected");
        return Err(ApiError::Unauthorized);
    }

    req.extensions_mut().insert(CurrentUser::new(claims));
    Ok(next.run(req).await)
}

/// Pull the token out of the `Authorization` header. The raw token is
/// expected; a `Bearer ` prefix is tolerated.
fn extract_token(headers: &HeaderMap) -> Option<&str> {
    let header = headers.get(axum::http::header::AUTHORIZATION)?;
    let value = header.to_str().ok()?;
    let token = value.strip_prefix("Bearer ").unwrap_or(value).trim();

    if token.is_empty() {
        return None;
    }
    Some(token)
}
