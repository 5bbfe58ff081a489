//! HTTP application wiring (axum router + service wiring).
//!
//! - `services.rs`: store wiring (Postgres or the in-memory double)
//! - `routes/`: HTTP routes + handlers (one file per entity)
//! - `dto.rs`: request/response DTOs and JSON mapping
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::http::{
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
    Method,
};
use axum::{
    routing::{get, post},
    Extension, Router,
};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use staffgate_auth::{Hs256TokenCodec, TokenVerifier};

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

pub use services::AppServices;

/// Build the full HTTP router (public entrypoint used by `main.rs` and the
/// black-box tests).
pub fn build_app(jwt_signing_key: &str, services: AppServices) -> Router {
    let codec = Arc::new(Hs256TokenCodec::new(jwt_signing_key.as_bytes()));
    let verifier: Arc<dyn TokenVerifier> = codec.clone();
    let auth_state = middleware::AuthState { verifier };

    // Protected routes: everything except login and the health probe.
    let protected = routes::router().layer(axum::middleware::from_fn_with_state(
        auth_state,
        middleware::auth_middleware,
    ));

    let api = Router::new()
        .route("/auth/login", post(routes::auth::login))
        .merge(protected)
        .layer(Extension(Arc::new(services)))
        .layer(Extension(codec));

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_credentials(true)
        .allow_headers([AUTHORIZATION, ACCEPT, CONTENT_TYPE]);

    Router::new()
        .route("/health", get(routes::system::health))
        .nest("/api/v1", api)
        .layer(ServiceBuilder::new().layer(cors))
}
