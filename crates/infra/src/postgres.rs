//! Postgres-backed stores.
//!
//! All stores share one [`PgPool`]; each call is a short-lived query with no
//! cross-request transactions. Constraint enforcement (unique usernames,
//! foreign keys, association cascades) lives in the schema, not in handler
//! code.

use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use staffgate_core::{DepartmentId, PermissionId, UserId};

use crate::model::{Department, NewUser, Permission, User, UserChanges, UserDetail};
use crate::store::{DepartmentStore, PermissionStore, StoreError, UserStore};

use async_trait::async_trait;
use std::collections::HashMap;

fn department_from_row(row: &PgRow) -> Result<Department, sqlx::Error> {
    Ok(Department {
        id: DepartmentId::from_uuid(row.try_get("id")?),
        name: row.try_get("name")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn permission_from_row(row: &PgRow) -> Result<Permission, sqlx::Error> {
    Ok(Permission {
        id: PermissionId::from_uuid(row.try_get("id")?),
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn user_from_row(row: &PgRow) -> Result<User, sqlx::Error> {
    Ok(User {
        id: UserId::from_uuid(row.try_get("id")?),
        username: row.try_get("username")?,
        password_hash: row.try_get("password")?,
        email: row.try_get("email")?,
        is_admin: row.try_get("is_admin")?,
        department_id: DepartmentId::from_uuid(row.try_get("department_id")?),
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

// ---------------------------------------------------------------------------
// Departments
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct PostgresDepartmentStore {
    pool: PgPool,
}

impl PostgresDepartmentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DepartmentStore for PostgresDepartmentStore {
    async fn list(&self) -> Result<Vec<Department>, StoreError> {
        let rows = sqlx::query(
            "SELECT id, name, created_at, updated_at FROM departments ORDER BY created_at",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|r| department_from_row(r).map_err(StoreError::from))
            .collect()
    }

    async fn find(&self, id: DepartmentId) -> Result<Department, StoreError> {
        let row = sqlx::query("SELECT id, name, created_at, updated_at FROM departments WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound)?;

        Ok(department_from_row(&row)?)
    }

    async fn create(&self, name: &str) -> Result<Department, StoreError> {
        let id = DepartmentId::new();
        let row = sqlx::query(
            "INSERT INTO departments (id, name) VALUES ($1, $2) \
             RETURNING id, name, created_at, updated_at",
        )
        .bind(id.as_uuid())
        .bind(name)
        .fetch_one(&self.pool)
        .await?;

        Ok(department_from_row(&row)?)
    }

    async fn update(&self, id: DepartmentId, name: &str) -> Result<Department, StoreError> {
        let row = sqlx::query(
            "UPDATE departments SET name = $2, updated_at = now() WHERE id = $1 \
             RETURNING id, name, created_at, updated_at",
        )
        .bind(id.as_uuid())
        .bind(name)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound)?;

        Ok(department_from_row(&row)?)
    }

    async fn delete(&self, id: DepartmentId) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM departments WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Permissions
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct PostgresPermissionStore {
    pool: PgPool,
}

impl PostgresPermissionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PermissionStore for PostgresPermissionStore {
    async fn list(&self) -> Result<Vec<Permission>, StoreError> {
        let rows = sqlx::query(
            "SELECT id, name, description, created_at, updated_at FROM permissions \
             ORDER BY created_at",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|r| permission_from_row(r).map_err(StoreError::from))
            .collect()
    }

    async fn find(&self, id: PermissionId) -> Result<Permission, StoreError> {
        let row = sqlx::query(
            "SELECT id, name, description, created_at, updated_at FROM permissions WHERE id = $1",
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound)?;

        Ok(permission_from_row(&row)?)
    }

    async fn create(
        &self,
        name: &str,
        description: Option<&str>,
    ) -> Result<Permission, StoreError> {
        let id = PermissionId::new();
        let row = sqlx::query(
            "INSERT INTO permissions (id, name, description) VALUES ($1, $2, $3) \
             RETURNING id, name, description, created_at, updated_at",
        )
        .bind(id.as_uuid())
        .bind(name)
        .bind(description)
        .fetch_one(&self.pool)
        .await?;

        Ok(permission_from_row(&row)?)
    }

    async fn update(
        &self,
        id: PermissionId,
        name: &str,
        description: Option<&str>,
    ) -> Result<Permission, StoreError> {
        let row = sqlx::query(
            "UPDATE permissions SET name = $2, description = $3, updated_at = now() \
             WHERE id = $1 \
             RETURNING id, name, description, created_at, updated_at",
        )
        .bind(id.as_uuid())
        .bind(name)
        .bind(description)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound)?;

        Ok(permission_from_row(&row)?)
    }

    async fn delete(&self, id: PermissionId) -> Result<(), StoreError> {
        // Association rows go with it (ON DELETE CASCADE).
        let result = sqlx::query("DELETE FROM permissions WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct PostgresUserStore {
    pool: PgPool,
}

impl PostgresUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn load_detail(&self, user: User) -> Result<UserDetail, StoreError> {
        let dept_row = sqlx::query(
            "SELECT id, name, created_at, updated_at FROM departments WHERE id = $1",
        )
        .bind(user.department_id.as_uuid())
        .fetch_one(&self.pool)
        .await?;
        let department = department_from_row(&dept_row)?;

        let perm_rows = sqlx::query(
            "SELECT p.id, p.name, p.description, p.created_at, p.updated_at \
             FROM permissions p \
             JOIN user_permissions up ON up.permission_id = p.id \
             WHERE up.user_id = $1 \
             ORDER BY p.created_at",
        )
        .bind(user.id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        let permissions = perm_rows
            .iter()
            .map(permission_from_row)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(UserDetail {
            user,
            department,
            permissions,
        })
    }
}

#[async_trait]
impl UserStore for PostgresUserStore {
    async fn list(&self) -> Result<Vec<UserDetail>, StoreError> {
        let user_rows = sqlx::query(
            "SELECT id, username, password, email, is_admin, department_id, created_at, updated_at \
             FROM users ORDER BY created_at",
        )
        .fetch_all(&self.pool)
        .await?;

        let users = user_rows
            .iter()
            .map(user_from_row)
            .collect::<Result<Vec<_>, _>>()?;

        let dept_rows =
            sqlx::query("SELECT id, name, created_at, updated_at FROM departments")
                .fetch_all(&self.pool)
                .await?;
        let departments: HashMap<DepartmentId, Department> = dept_rows
            .iter()
            .map(|r| department_from_row(r).map(|d| (d.id, d)))
            .collect::<Result<_, _>>()?;

        let grant_rows = sqlx::query(
            "SELECT up.user_id, p.id, p.name, p.description, p.created_at, p.updated_at \
             FROM user_permissions up \
             JOIN permissions p ON p.id = up.permission_id \
             ORDER BY p.created_at",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut grants: HashMap<UserId, Vec<Permission>> = HashMap::new();
        for row in &grant_rows {
            let user_id = UserId::from_uuid(row.try_get::<Uuid, _>("user_id").map_err(StoreError::from)?);
            let permission = permission_from_row(row)?;
            grants.entry(user_id).or_default().push(permission);
        }

        users
            .into_iter()
            .map(|user| {
                let department = departments
                    .get(&user.department_id)
                    .cloned()
                    .ok_or(StoreError::NotFound)?;
                let permissions = grants.remove(&user.id).unwrap_or_default();
                Ok(UserDetail {
                    user,
                    department,
                    permissions,
                })
            })
            .collect()
    }

    async fn find(&self, id: UserId) -> Result<UserDetail, StoreError> {
        let row = sqlx::query(
            "SELECT id, username, password, email, is_admin, department_id, created_at, updated_at \
             FROM users WHERE id = $1",
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound)?;

        self.load_detail(user_from_row(&row)?).await
    }

    async fn find_by_username(&self, username: &str) -> Result<UserDetail, StoreError> {
        let row = sqlx::query(
            "SELECT id, username, password, email, is_admin, department_id, created_at, updated_at \
             FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound)?;

        self.load_detail(user_from_row(&row)?).await
    }

    async fn create(&self, new: NewUser) -> Result<UserDetail, StoreError> {
        let id = UserId::new();
        sqlx::query(
            "INSERT INTO users (id, username, password, email, is_admin, department_id) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(id.as_uuid())
        .bind(&new.username)
        .bind(&new.password_hash)
        .bind(&new.email)
        .bind(new.is_admin)
        .bind(new.department_id.as_uuid())
        .execute(&self.pool)
        .await?;

        self.find(id).await
    }

    async fn update(&self, id: UserId, changes: UserChanges) -> Result<UserDetail, StoreError> {
        let result = sqlx::query(
            "UPDATE users SET username = $2, email = $3, department_id = $4, updated_at = now() \
             WHERE id = $1",
        )
        .bind(id.as_uuid())
        .bind(&changes.username)
        .bind(&changes.email)
        .bind(changes.department_id.as_uuid())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        self.find(id).await
    }

    async fn delete(&self, id: UserId) -> Result<(), StoreError> {
        // Association rows go with it (ON DELETE CASCADE).
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn grant_permission(
        &self,
        user_id: UserId,
        permission_id: PermissionId,
    ) -> Result<(), StoreError> {
        let user_exists = sqlx::query("SELECT 1 FROM users WHERE id = $1")
            .bind(user_id.as_uuid())
            .fetch_optional(&self.pool)
            .await?
            .is_some();
        if !user_exists {
            return Err(StoreError::NotFound);
        }

        let permission_exists = sqlx::query("SELECT 1 FROM permissions WHERE id = $1")
            .bind(permission_id.as_uuid())
            .fetch_optional(&self.pool)
            .await?
            .is_some();
        if !permission_exists {
            return Err(StoreError::NotFound);
        }

        sqlx::query(
            "INSERT INTO user_permissions (user_id, permission_id) VALUES ($1, $2) \
             ON CONFLICT DO NOTHING",
        )
        .bind(user_id.as_uuid())
        .bind(permission_id.as_uuid())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn revoke_permission(
        &self,
        user_id: UserId,
        permission_id: PermissionId,
    ) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM user_permissions WHERE user_id = $1 AND permission_id = $2")
            .bind(user_id.as_uuid())
            .bind(permission_id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
