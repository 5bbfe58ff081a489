//! Store traits and the store-level error model.

use async_trait::async_trait;
use thiserror::Error;

use staffgate_core::{DepartmentId, PermissionId, UserId};

use crate::model::{Department, NewUser, Permission, UserChanges, UserDetail};

/// Store-level failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The addressed row does not exist.
    #[error("row not found")]
    NotFound,

    /// A schema constraint rejected the write (unique index, foreign key).
    #[error("constraint violated: {0}")]
    Constraint(String),

    /// The database failed to execute the statement.
    #[error("database failure: {0}")]
    Database(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            sqlx::Error::Database(db) => match db.code().as_deref() {
                // unique_violation / foreign_key_violation
                Some("23505") | Some("23503") => StoreError::Constraint(db.message().to_string()),
                _ => StoreError::Database(db.message().to_string()),
            },
            _ => StoreError::Database(err.to_string()),
        }
    }
}

#[async_trait]
pub trait DepartmentStore: Send + Sync {
    async fn list(&self) -> Result<Vec<Department>, StoreError>;
    async fn find(&self, id: DepartmentId) -> Result<Department, StoreError>;
    async fn create(&self, name: &str) -> Result<Department, StoreError>;
    async fn update(&self, id: DepartmentId, name: &str) -> Result<Department, StoreError>;
    async fn delete(&self, id: DepartmentId) -> Result<(), StoreError>;
}

#[async_trait]
pub trait PermissionStore: Send + Sync {
    async fn list(&self) -> Result<Vec<Permission>, StoreError>;
    async fn find(&self, id: PermissionId) -> Result<Permission, StoreError>;
    async fn create(&self, name: &str, description: Option<&str>)
        -> Result<Permission, StoreError>;
    async fn update(
        &self,
        id: PermissionId,
        name: &str,
        description: Option<&str>,
    ) -> Result<Permission, StoreError>;
    async fn delete(&self, id: PermissionId) -> Result<(), StoreError>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn list(&self) -> Result<Vec<UserDetail>, StoreError>;
    async fn find(&self, id: UserId) -> Result<UserDetail, StoreError>;
    async fn find_by_username(&self, username: &str) -> Result<UserDetail, StoreError>;
    async fn create(&self, new: NewUser) -> Result<UserDetail, StoreError>;
    async fn update(&self, id: UserId, changes: UserChanges) -> Result<UserDetail, StoreError>;
    async fn delete(&self, id: UserId) -> Result<(), StoreError>;

    /// Attach a permission to a user. Granting twice is a no-op; an unknown
    /// user or permission is `NotFound`.
    async fn grant_permission(
        &self,
        user_id: UserId,
        permission_id: PermissionId,
    ) -> Result<(), StoreError>;

    /// Detach a permission from a user. Revoking an absent grant is a no-op.
    async fn revoke_permission(
        &self,
        user_id: UserId,
        permission_id: PermissionId,
    ) -> Result<(), StoreError>;
}
