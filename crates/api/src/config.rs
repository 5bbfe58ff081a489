//! Environment configuration for the service binary.

/// Runtime configuration, read once at startup and passed down explicitly.
///
/// The JWT signing key in particular is deliberately plumbed through here
/// instead of living in process-global state.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_dsn: String,
    pub jwt_signing_key: String,
    pub port: u16,
    pub admin_username: String,
    pub admin_password: String,
    pub admin_email: String,
}

impl Config {
    pub fn from_env() -> Self {
        let jwt_signing_key = std::env::var("AUTH_JWT_SIGNING_KEY").unwrap_or_else(|_| {
            tracing::warn!("AUTH_JWT_SIGNING_KEY not set; using insecure dev default");
            "dev-secret".to_string()
        });

        let database_dsn = std::env::var("AUTH_DB_DSN")
            .unwrap_or_else(|_| "postgres://localhost:5432/staffgate".to_string());

        let port = std::env::var("AUTH_BACKEND_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8081);

        Self {
            database_dsn,
            jwt_signing_key,
            port,
            admin_username: std::env::var("AUTH_ADMIN_USERNAME")
                .unwrap_or_else(|_| "admin".to_string()),
            admin_password: std::env::var("AUTH_ADMIN_PASSWORD")
                .unwrap_or_else(|_| "admin".to_string()),
            admin_email: std::env::var("AUTH_ADMIN_EMAIL")
                .unwrap_or_else(|_| "admin@example.com".to_string()),
        }
    }
}
