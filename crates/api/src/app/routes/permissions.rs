//! Permission CRUD.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};

use staffgate_core::PermissionId;
use staffgate_infra::PermissionStore;

use crate::app::dto::{PermissionRequest, PermissionResponse};
use crate::app::errors::ApiError;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list).post(create))
        .route("/:permissionId", get(get_by_id).put(update).delete(remove))
}

pub async fn list(
    Extension(services): Extension<Arc<AppServices>>,
) -> Result<Response, ApiError> {
    let permissions = services.permissions.list().await?;
    let body: Vec<PermissionResponse> = permissions.into_iter().map(Into::into).collect();
    Ok((StatusCode::OK, Json(body)).into_response())
}

pub async fn get_by_id(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let id: PermissionId = id.parse()?;
    let permission = services.permissions.find(id).await?;
    Ok((StatusCode::OK, Json(PermissionResponse::from(permission))).into_response())
}

pub async fn create(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<PermissionRequest>,
) -> Result<Response, ApiError> {
    body.validate()?;
    let permission = services
        .permissions
        .create(&body.name, body.description.as_deref())
        .await?;

    tracing::info!(name = %permission.name, "created permission");
    Ok((StatusCode::CREATED, Json(PermissionResponse::from(permission))).into_response())
}

pub async fn update(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<PermissionRequest>,
) -> Result<Response, ApiError> {
    let id: PermissionId = id.parse()?;
    body.validate()?;

    let permission = services
        .permissions
        .update(id, &body.name, body.description.as_deref())
        .await?;
    Ok((StatusCode::OK, Json(PermissionResponse::from(permission))).into_response())
}

pub async fn remove(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let id: PermissionId = id.parse()?;
    // Association rows for every holder go with it.
    services.permissions.delete(id).await?;

    tracing::info!(%id, "deleted permission");
    Ok((StatusCode::OK, Json(serde_json::Value::Null)).into_response())
}
