//! Department CRUD.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};

use staffgate_core::DepartmentId;
use staffgate_infra::DepartmentStore;

use crate::app::dto::{DepartmentRequest, DepartmentResponse};
use crate::app::errors::ApiError;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list).post(create))
        .route("/:departmentId", get(get_by_id).put(update).delete(remove))
}

pub async fn list(
    Extension(services): Extension<Arc<AppServices>>,
) -> Result<Response, ApiError> {
    let departments = services.departments.list().await?;
    let body: Vec<DepartmentResponse> = departments.into_iter().map(Into::into).collect();
    Ok((StatusCode::OK, Json(body)).into_response())
}

pub async fn get_by_id(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let id: DepartmentId = id.parse()?;
    let department = services.departments.find(id).await?;
    Ok((StatusCode::OK, Json(DepartmentResponse::from(department))).into_response())
}

pub async fn create(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<DepartmentRequest>,
) -> Result<Response, ApiError> {
    body.validate()?;
    let department = services.departments.create(&body.name).await?;

    tracing::info!(name = %department.name, "created department");
    Ok((StatusCode::CREATED, Json(DepartmentResponse::from(department))).into_response())
}

pub async fn update(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<DepartmentRequest>,
) -> Result<Response, ApiError> {
    let id: DepartmentId = id.parse()?;
    body.validate()?;

    let department = services.departments.update(id, &body.name).await?;
    Ok((StatusCode::OK, Json(DepartmentResponse::from(department))).into_response())
}

pub async fn remove(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let id: DepartmentId = id.parse()?;
    services.departments.delete(id).await?;

    tracing::info!(%id, "deleted department");
    Ok((StatusCode::OK, Json(serde_json::Value::Null)).into_response())
}
