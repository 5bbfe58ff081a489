//! User CRUD plus permission association management.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

use staffgate_auth::hash_password;
use staffgate_core::{PermissionId, UserId};
use staffgate_infra::{NewUser, UserChanges, UserStore};

use crate::app::dto::{CreateUserRequest, UpdateUserRequest, UserResponse};
use crate::app::errors::ApiError;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list).post(create))
        .route("/:userId", get(get_by_id).put(update).delete(remove))
        .route(
            "/:userId/permission/:permissionId",
            post(add_permission).delete(remove_permission),
        )
}

pub async fn list(
    Extension(services): Extension<Arc<AppServices>>,
) -> Result<Response, ApiError> {
    let users = services.users.list().await?;
    let body: Vec<UserResponse> = users.into_iter().map(Into::into).collect();
    Ok((StatusCode::OK, Json(body)).into_response())
}

pub async fn get_by_id(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let id: UserId = id.parse()?;
    let detail = services.users.find(id).await?;
    Ok((StatusCode::OK, Json(UserResponse::from(detail))).into_response())
}

pub async fn create(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<CreateUserRequest>,
) -> Result<Response, ApiError> {
    body.validate()?;

    // Only the hash ever reaches the store.
    let password_hash = hash_password(&body.password).map_err(|_| ApiError::UnknownError)?;

    let detail = services
        .users
        .create(NewUser {
            username: body.username,
            password_hash,
            email: body.email,
            is_admin: body.is_admin,
            department_id: body.department_id,
        })
        .await?;

    tracing::info!(username = %detail.user.username, "created user");
    Ok((StatusCode::CREATED, Json(UserResponse::from(detail))).into_response())
}

pub async fn update(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<UpdateUserRequest>,
) -> Result<Response, ApiError> {
    let id: UserId = id.parse()?;
    body.validate()?;

    let detail = services
        .users
        .update(
            id,
            UserChanges {
                username: body.username,
                email: body.email,
                department_id: body.department_id,
            },
        )
        .await?;

    Ok((StatusCode::OK, Json(UserResponse::from(detail))).into_response())
}

pub async fn remove(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let id: UserId = id.parse()?;
    services.users.delete(id).await?;

    tracing::info!(%id, "deleted user");
    Ok((StatusCode::OK, Json(serde_json::Value::Null)).into_response())
}

pub async fn add_permission(
    Extension(services): Extension<Arc<AppServices>>,
    Path((user_id, permission_id)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    let user_id: UserId = user_id.parse()?;
    let permission_id: PermissionId = permission_id.parse()?;

    services
        .users
        .grant_permission(user_id, permission_id)
        .await?;

    Ok((StatusCode::OK, Json(serde_json::Value::Null)).into_response())
}

pub async fn remove_permission(
    Extension(services): Extension<Arc<AppServices>>,
    Path((user_id, permission_id)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    let user_id: UserId = user_id.parse()?;
    let permission_id: PermissionId = permission_id.parse()?;

    services
        .users
        .revoke_permission(user_id, permission_id)
        .await?;

    Ok((StatusCode::OK, Json(serde_json::Value::Null)).into_response())
}
