use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use staffgate_core::{DepartmentId, DomainError, PermissionId, UserId};
use staffgate_infra::{Department, Permission, UserDetail};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
    pub email: String,
    #[serde(default)]
    pub is_admin: bool,
    pub department_id: DepartmentId,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub username: String,
    pub email: String,
    pub department_id: DepartmentId,
}

#[derive(Debug, Deserialize)]
pub struct DepartmentRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct PermissionRequest {
    pub name: String,
    pub description: Option<String>,
}

fn require_username(username: &str) -> Result<(), DomainError> {
    if username.trim().is_empty() {
        return Err(DomainError::validation("username cannot be empty"));
    }
    Ok(())
}

fn require_email(email: &str) -> Result<(), DomainError> {
    if email.trim().is_empty() || !email.contains('@') {
        return Err(DomainError::validation("invalid email format"));
    }
    Ok(())
}

impl CreateUserRequest {
    pub fn validate(&self) -> Result<(), DomainError> {
        require_username(&self.username)?;
        if self.password.is_empty() {
            return Err(DomainError::validation("password cannot be empty"));
        }
        require_email(&self.email)
    }
}

impl UpdateUserRequest {
    pub fn validate(&self) -> Result<(), DomainError> {
        require_username(&self.username)?;
        require_email(&self.email)
    }
}

impl DepartmentRequest {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        Ok(())
    }
}

impl PermissionRequest {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        Ok(())
    }
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    /// Expiry of the issued token (unix seconds).
    pub expires_at: i64,
}

#[derive(Debug, Serialize)]
pub struct DepartmentResponse {
    pub id: DepartmentId,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct PermissionResponse {
    pub id: PermissionId,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Public user shape. There is intentionally no password field here: the
/// stored hash cannot be serialized into any response.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub is_admin: bool,
    pub department: DepartmentResponse,
    pub permissions: Vec<PermissionResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub username: String,
    pub department: String,
    pub permissions: Vec<String>,
    pub is_admin: bool,
}

impl From<Department> for DepartmentResponse {
    fn from(d: Department) -> Self {
        Self {
            id: d.id,
            name: d.name,
            created_at: d.created_at,
            updated_at: d.updated_at,
        }
    }
}

impl From<Permission> for PermissionResponse {
    fn from(p: Permission) -> Self {
        Self {
            id: p.id,
            name: p.name,
            description: p.description,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

impl From<UserDetail> for UserResponse {
    fn from(detail: UserDetail) -> Self {
        Self {
            id: detail.user.id,
            username: detail.user.username,
            email: detail.user.email,
            is_admin: detail.user.is_admin,
            department: detail.department.into(),
            permissions: detail.permissions.into_iter().map(Into::into).collect(),
            created_at: detail.user.created_at,
            updated_at: detail.user.updated_at,
        }
    }
}
