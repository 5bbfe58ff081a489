//! Credential & token endpoints: login, me, logout.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;

use staffgate_auth::{verify_password, Claims, Hs256TokenCodec};
use staffgate_infra::{StoreError, UserStore};

use crate::app::dto::{LoginRequest, LoginResponse, MeResponse};
use crate::app::errors::ApiError;
use crate::app::services::AppServices;
use crate::context::CurrentUser;

/// POST /api/v1/auth/login
///
/// Verifies credentials and issues a signed token embedding the caller's
/// department, permission names and admin flag at this moment.
pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(codec): Extension<Arc<Hs256TokenCodec>>,
    Json(body): Json<LoginRequest>,
) -> Result<Response, ApiError> {
    let detail = match services.users.find_by_username(&body.username).await {
        Ok(detail) => detail,
        Err(StoreError::NotFound) => {
            tracing::info!(username = %body.username, "login rejected: unknown user");
            return Err(ApiError::Unauthorized);
        }
        Err(err) => return Err(err.into()),
    };

    let matches = verify_password(&body.password, &detail.user.password_hash)
        .map_err(|_| ApiError::UnknownError)?;
    if !matches {
        tracing::info!(username = %body.username, "login rejected: bad credentials");
        return Err(ApiError::Unauthorized);
    }

    let claims = Claims::issue(
        detail.user.username.as_str(),
        detail.department.name.as_str(),
        detail.permissions.iter().map(|p| p.name.clone()).collect(),
        detail.user.is_admin,
        Utc::now(),
    );
    let token = codec.sign(&claims).map_err(|_| ApiError::UnknownError)?;

    tracing::info!(username = %claims.username, "issued token");
    Ok((
        StatusCode::OK,
        Json(LoginResponse {
            token,
            expires_at: claims.exp,
        }),
    )
        .into_response())
}

/// GET /api/v1/auth/me
///
/// The profile comes straight from the validated claims; no store access and
/// no password re-check.
pub async fn me(Extension(current): Extension<CurrentUser>) -> Json<MeResponse> {
    Json(MeResponse {
        username: current.username().to_string(),
        department: current.department().to_string(),
        permissions: current.permissions().to_vec(),
        is_admin: current.is_admin(),
    })
}

/// POST /api/v1/auth/logout
///
/// Stateless: there is no server-side revocation list. The response expires
/// any token cookie the client may hold.
pub async fn logout() -> Response {
    (
        StatusCode::OK,
        [(header::SET_COOKIE, "token=; Max-Age=0; Path=/")],
        Json(serde_json::json!({ "message": "logged out" })),
    )
        .into_response()
}
