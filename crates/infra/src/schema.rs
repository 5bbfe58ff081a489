//! Schema bootstrap and default-data seeding.
//!
//! Idempotent `CREATE TABLE IF NOT EXISTS` statements executed at startup;
//! this is deliberately not a migration system.

use sqlx::{PgPool, Row};
use uuid::Uuid;

use staffgate_core::DepartmentId;

use crate::store::StoreError;

const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS departments (
        id UUID PRIMARY KEY,
        name VARCHAR(255) UNIQUE NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )",
    "CREATE TABLE IF NOT EXISTS permissions (
        id UUID PRIMARY KEY,
        name VARCHAR(255) UNIQUE NOT NULL,
        description VARCHAR(255) DEFAULT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )",
    "CREATE TABLE IF NOT EXISTS users (
        id UUID PRIMARY KEY,
        username VARCHAR(255) NOT NULL,
        password VARCHAR(255) NOT NULL,
        email VARCHAR(255) NOT NULL,
        is_admin BOOLEAN NOT NULL DEFAULT false,
        department_id UUID NOT NULL REFERENCES departments(id),
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )",
    "CREATE UNIQUE INDEX IF NOT EXISTS idx_username ON users (username)",
    "CREATE TABLE IF NOT EXISTS user_permissions (
        user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        permission_id UUID NOT NULL REFERENCES permissions(id) ON DELETE CASCADE,
        PRIMARY KEY (user_id, permission_id)
    )",
];

/// Create the identity tables when they do not exist yet.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), StoreError> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}

/// Bootstrap credentials for the seeded administrator account.
#[derive(Debug, Clone)]
pub struct AdminSeed {
    pub username: String,
    pub password_hash: String,
    pub email: String,
}

/// Seed the default department and the admin user when absent.
pub async fn seed_defaults(pool: &PgPool, admin: AdminSeed) -> Result<(), StoreError> {
    let department_id = match sqlx::query("SELECT id FROM departments WHERE name = $1")
        .bind("IT")
        .fetch_optional(pool)
        .await?
    {
        Some(row) => DepartmentId::from_uuid(row.try_get::<Uuid, _>("id").map_err(StoreError::from)?),
        None => {
            let id = DepartmentId::new();
            sqlx::query("INSERT INTO departments (id, name) VALUES ($1, $2)")
                .bind(id.as_uuid())
                .bind("IT")
                .execute(pool)
                .await?;
            id
        }
    };

    let existing = sqlx::query("SELECT 1 FROM users WHERE username = $1")
        .bind(&admin.username)
        .fetch_optional(pool)
        .await?;

    if existing.is_some() {
        tracing::info!(username = %admin.username, "admin user already exists");
        return Ok(());
    }

    sqlx::query(
        "INSERT INTO users (id, username, password, email, is_admin, department_id) \
         VALUES ($1, $2, $3, $4, true, $5)",
    )
    .bind(Uuid::now_v7())
    .bind(&admin.username)
    .bind(&admin.password_hash)
    .bind(&admin.email)
    .bind(department_id.as_uuid())
    .execute(pool)
    .await?;

    tracing::info!(username = %admin.username, "created admin user");
    Ok(())
}
