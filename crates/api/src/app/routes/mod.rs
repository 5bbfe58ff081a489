use axum::{
    routing::{get, post},
    Router,
};

pub mod auth;
pub mod departments;
pub mod permissions;
pub mod system;
pub mod users;

/// Router for all authenticated endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/auth/me", get(auth::me))
        .route("/auth/logout", post(auth::logout))
        .nest("/user", users::router())
        .nest("/department", departments::router())
        .nest("/permission", permissions::router())
}
