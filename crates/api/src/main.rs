use anyhow::Context;
use sqlx::PgPool;

use staffgate_api::app::{build_app, AppServices};
use staffgate_api::config::Config;
use staffgate_auth::hash_password;
use staffgate_infra::{ensure_schema, seed_defaults, AdminSeed};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    staffgate_observability::init();

    let config = Config::from_env();

    let pool = PgPool::connect(&config.database_dsn)
        .await
        .context("failed to connect to database")?;

    ensure_schema(&pool).await.context("schema bootstrap failed")?;
    seed_defaults(
        &pool,
        AdminSeed {
            username: config.admin_username.clone(),
            password_hash: hash_password(&config.admin_password)?,
            email: config.admin_email.clone(),
        },
    )
    .await
    .context("seeding defaults failed")?;

    let services = AppServices::postgres(pool);
    let app = build_app(&config.jwt_signing_key, services);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port))
        .await
        .with_context(|| format!("failed to bind 0.0.0.0:{}", config.port))?;

    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
