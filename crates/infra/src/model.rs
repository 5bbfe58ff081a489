//! Persistent records for the identity domain.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use staffgate_core::{DepartmentId, PermissionId, UserId};

/// A department row. Referenced by users; one department has many users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    pub id: DepartmentId,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A permission row. Attached to users through the `user_permissions`
/// association table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    pub id: PermissionId,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A user row.
///
/// `password_hash` is the stored argon2 hash; it never leaves the store
/// layer except for credential verification at login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub password_hash: String,
    pub email: String,
    pub is_admin: bool,
    pub department_id: DepartmentId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A user joined with its department and granted permissions, the shape every
/// read path returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDetail {
    pub user: User,
    pub department: Department,
    pub permissions: Vec<Permission>,
}

/// Fields required to insert a user. The caller hashes the password first.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub email: String,
    pub is_admin: bool,
    pub department_id: DepartmentId,
}

/// Mutable fields overlaid onto an existing user on update.
///
/// The password and admin flag are deliberately absent: neither is touched by
/// the update path.
#[derive(Debug, Clone)]
pub struct UserChanges {
    pub username: String,
    pub email: String,
    pub department_id: DepartmentId,
}
