//! Typed in-memory store doubles.
//!
//! One double per entity, all sharing a single state so foreign keys and the
//! association table behave like the real schema: unique names, the
//! users→departments foreign key, and association cascade on delete. Tests
//! against these doubles exercise the exact failure paths the Postgres
//! stores produce.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;

use staffgate_core::{DepartmentId, PermissionId, UserId};

use crate::model::{Department, NewUser, Permission, User, UserChanges, UserDetail};
use crate::store::{DepartmentStore, PermissionStore, StoreError, UserStore};

#[derive(Default)]
struct State {
    departments: HashMap<DepartmentId, Department>,
    permissions: HashMap<PermissionId, Permission>,
    users: HashMap<UserId, User>,
    grants: HashSet<(UserId, PermissionId)>,
}

impl State {
    fn detail(&self, user: &User) -> Result<UserDetail, StoreError> {
        let department = self
            .departments
            .get(&user.department_id)
            .cloned()
            .ok_or(StoreError::NotFound)?;

        let permissions = self
            .grants
            .iter()
            .filter(|(uid, _)| *uid == user.id)
            .filter_map(|(_, pid)| self.permissions.get(pid).cloned())
            .collect();

        Ok(UserDetail {
            user: user.clone(),
            department,
            permissions,
        })
    }
}

/// Factory for the per-entity doubles; handles share one state.
#[derive(Clone, Default)]
pub struct InMemoryIdentityStore {
    state: Arc<Mutex<State>>,
}

impl InMemoryIdentityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn users(&self) -> InMemoryUserStore {
        InMemoryUserStore {
            state: self.state.clone(),
        }
    }

    pub fn departments(&self) -> InMemoryDepartmentStore {
        InMemoryDepartmentStore {
            state: self.state.clone(),
        }
    }

    pub fn permissions(&self) -> InMemoryPermissionStore {
        InMemoryPermissionStore {
            state: self.state.clone(),
        }
    }
}

#[derive(Clone)]
pub struct InMemoryDepartmentStore {
    state: Arc<Mutex<State>>,
}

#[async_trait]
impl DepartmentStore for InMemoryDepartmentStore {
    async fn list(&self) -> Result<Vec<Department>, StoreError> {
        let state = self.state.lock().unwrap();
        Ok(state.departments.values().cloned().collect())
    }

    async fn find(&self, id: DepartmentId) -> Result<Department, StoreError> {
        let state = self.state.lock().unwrap();
        state.departments.get(&id).cloned().ok_or(StoreError::NotFound)
    }

    async fn create(&self, name: &str) -> Result<Department, StoreError> {
        let mut state = self.state.lock().unwrap();
        if state.departments.values().any(|d| d.name == name) {
            return Err(StoreError::Constraint(format!(
                "department name already taken: {name}"
            )));
        }

        let now = Utc::now();
        let department = Department {
            id: DepartmentId::new(),
            name: name.to_string(),
            created_at: now,
            updated_at: now,
        };
        state.departments.insert(department.id, department.clone());
        Ok(department)
    }

    async fn update(&self, id: DepartmentId, name: &str) -> Result<Department, StoreError> {
        let mut state = self.state.lock().unwrap();
        if state
            .departments
            .values()
            .any(|d| d.name == name && d.id != id)
        {
            return Err(StoreError::Constraint(format!(
                "department name already taken: {name}"
            )));
        }

        let department = state.departments.get_mut(&id).ok_or(StoreError::NotFound)?;
        department.name = name.to_string();
        department.updated_at = Utc::now();
        Ok(department.clone())
    }

    async fn delete(&self, id: DepartmentId) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap();
        if state.users.values().any(|u| u.department_id == id) {
            // users.department_id is a plain FK, no cascade
            return Err(StoreError::Constraint(
                "department is referenced by users".to_string(),
            ));
        }
        state
            .departments
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }
}

#[derive(Clone)]
pub struct InMemoryPermissionStore {
    state: Arc<Mutex<State>>,
}

#[async_trait]
impl PermissionStore for InMemoryPermissionStore {
    async fn list(&self) -> Result<Vec<Permission>, StoreError> {
        let state = self.state.lock().unwrap();
        Ok(state.permissions.values().cloned().collect())
    }

    async fn find(&self, id: PermissionId) -> Result<Permission, StoreError> {
        let state = self.state.lock().unwrap();
        state.permissions.get(&id).cloned().ok_or(StoreError::NotFound)
    }

    async fn create(
        &self,
        name: &str,
        description: Option<&str>,
    ) -> Result<Permission, StoreError> {
        let mut state = self.state.lock().unwrap();
        if state.permissions.values().any(|p| p.name == name) {
            return Err(StoreError::Constraint(format!(
                "permission name already taken: {name}"
            )));
        }

        let now = Utc::now();
        let permission = Permission {
            id: PermissionId::new(),
            name: name.to_string(),
            description: description.map(str::to_string),
            created_at: now,
            updated_at: now,
        };
        state.permissions.insert(permission.id, permission.clone());
        Ok(permission)
    }

    async fn update(
        &self,
        id: PermissionId,
        name: &str,
        description: Option<&str>,
    ) -> Result<Permission, StoreError> {
        let mut state = self.state.lock().unwrap();
        if state.permissions.values().any(|p| p.name == name && p.id != id) {
            return Err(StoreError::Constraint(format!(
                "permission name already taken: {name}"
            )));
        }

        let permission = state.permissions.get_mut(&id).ok_or(StoreError::NotFound)?;
        permission.name = name.to_string();
        permission.description = description.map(str::to_string);
        permission.updated_at = Utc::now();
        Ok(permission.clone())
    }

    async fn delete(&self, id: PermissionId) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap();
        state.permissions.remove(&id).ok_or(StoreError::NotFound)?;
        state.grants.retain(|(_, pid)| *pid != id);
        Ok(())
    }
}

#[derive(Clone)]
pub struct InMemoryUserStore {
    state: Arc<Mutex<State>>,
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn list(&self) -> Result<Vec<UserDetail>, StoreError> {
        let state = self.state.lock().unwrap();
        state.users.values().map(|u| state.detail(u)).collect()
    }

    async fn find(&self, id: UserId) -> Result<UserDetail, StoreError> {
        let state = self.state.lock().unwrap();
        let user = state.users.get(&id).ok_or(StoreError::NotFound)?;
        state.detail(user)
    }

    async fn find_by_username(&self, username: &str) -> Result<UserDetail, StoreError> {
        let state = self.state.lock().unwrap();
        let user = state
            .users
            .values()
            .find(|u| u.username == username)
            .ok_or(StoreError::NotFound)?;
        state.detail(user)
    }

    async fn create(&self, new: NewUser) -> Result<UserDetail, StoreError> {
        let mut state = self.state.lock().unwrap();
        if state.users.values().any(|u| u.username == new.username) {
            return Err(StoreError::Constraint(format!(
                "username already taken: {}",
                new.username
            )));
        }
        if !state.departments.contains_key(&new.department_id) {
            return Err(StoreError::Constraint(
                "department does not exist".to_string(),
            ));
        }

        let now = Utc::now();
        let user = User {
            id: UserId::new(),
            username: new.username,
            password_hash: new.password_hash,
            email: new.email,
            is_admin: new.is_admin,
            department_id: new.department_id,
            created_at: now,
            updated_at: now,
        };
        let detail = state.detail(&user)?;
        state.users.insert(user.id, user);
        Ok(detail)
    }

    async fn update(&self, id: UserId, changes: UserChanges) -> Result<UserDetail, StoreError> {
        let mut state = self.state.lock().unwrap();
        if state
            .users
            .values()
            .any(|u| u.username == changes.username && u.id != id)
        {
            return Err(StoreError::Constraint(format!(
                "username already taken: {}",
                changes.username
            )));
        }
        if !state.departments.contains_key(&changes.department_id) {
            return Err(StoreError::Constraint(
                "department does not exist".to_string(),
            ));
        }

        let user = state.users.get_mut(&id).ok_or(StoreError::NotFound)?;
        user.username = changes.username;
        user.email = changes.email;
        user.department_id = changes.department_id;
        user.updated_at = Utc::now();
        let user = user.clone();
        state.detail(&user)
    }

    async fn delete(&self, id: UserId) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap();
        state.users.remove(&id).ok_or(StoreError::NotFound)?;
        state.grants.retain(|(uid, _)| *uid != id);
        Ok(())
    }

    async fn grant_permission(
        &self,
        user_id: UserId,
        permission_id: PermissionId,
    ) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap();
        if !state.users.contains_key(&user_id) || !state.permissions.contains_key(&permission_id) {
            return Err(StoreError::NotFound);
        }
        state.grants.insert((user_id, permission_id));
        Ok(())
    }

    async fn revoke_permission(
        &self,
        user_id: UserId,
        permission_id: PermissionId,
    ) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap();
        state.grants.remove(&(user_id, permission_id));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(username: &str, department_id: DepartmentId) -> NewUser {
        NewUser {
            username: username.to_string(),
            password_hash: "$argon2id$fake".to_string(),
            email: format!("{username}@example.com"),
            is_admin: false,
            department_id,
        }
    }

    #[tokio::test]
    async fn user_crud_round_trip() {
        let store = InMemoryIdentityStore::new();
        let dept = store.departments().create("IT").await.unwrap();
        let users = store.users();

        let created = users.create(new_user("alice", dept.id)).await.unwrap();
        assert_eq!(created.department.name, "IT");

        let fetched = users.find(created.user.id).await.unwrap();
        assert_eq!(fetched.user.username, "alice");

        let updated = users
            .update(
                created.user.id,
                UserChanges {
                    username: "alice".to_string(),
                    email: "alice@corp.example.com".to_string(),
                    department_id: dept.id,
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.user.email, "alice@corp.example.com");

        users.delete(created.user.id).await.unwrap();
        assert_eq!(users.find(created.user.id).await, Err(StoreError::NotFound));
    }

    #[tokio::test]
    async fn duplicate_username_is_a_constraint_violation() {
        let store = InMemoryIdentityStore::new();
        let dept = store.departments().create("IT").await.unwrap();
        let users = store.users();

        users.create(new_user("bob", dept.id)).await.unwrap();
        let err = users.create(new_user("bob", dept.id)).await.unwrap_err();
        assert!(matches!(err, StoreError::Constraint(_)));
    }

    #[tokio::test]
    async fn user_requires_existing_department() {
        let store = InMemoryIdentityStore::new();
        let err = store
            .users()
            .create(new_user("carol", DepartmentId::new()))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Constraint(_)));
    }

    #[tokio::test]
    async fn deleting_permission_cascades_to_grants() {
        let store = InMemoryIdentityStore::new();
        let dept = store.departments().create("IT").await.unwrap();
        let users = store.users();
        let user = users.create(new_user("dave", dept.id)).await.unwrap();
        let perm = store.permissions().create("user.read", None).await.unwrap();

        users.grant_permission(user.user.id, perm.id).await.unwrap();
        assert_eq!(users.find(user.user.id).await.unwrap().permissions.len(), 1);

        store.permissions().delete(perm.id).await.unwrap();
        assert!(users
            .find(user.user.id)
            .await
            .unwrap()
            .permissions
            .is_empty());
    }

    #[tokio::test]
    async fn deleting_user_cascades_to_grants_only() {
        let store = InMemoryIdentityStore::new();
        let dept = store.departments().create("IT").await.unwrap();
        let users = store.users();
        let user = users.create(new_user("erin", dept.id)).await.unwrap();
        let perm = store.permissions().create("user.write", None).await.unwrap();

        users.grant_permission(user.user.id, perm.id).await.unwrap();
        users.delete(user.user.id).await.unwrap();

        // The permission itself survives; only the association is gone.
        assert!(store.permissions().find(perm.id).await.is_ok());
    }

    #[tokio::test]
    async fn referenced_department_cannot_be_deleted() {
        let store = InMemoryIdentityStore::new();
        let dept = store.departments().create("IT").await.unwrap();
        store.users().create(new_user("frank", dept.id)).await.unwrap();

        let err = store.departments().delete(dept.id).await.unwrap_err();
        assert!(matches!(err, StoreError::Constraint(_)));
    }

    #[tokio::test]
    async fn update_of_missing_department_is_not_found() {
        let store = InMemoryIdentityStore::new();
        let err = store
            .departments()
            .update(DepartmentId::new(), "Ops")
            .await
            .unwrap_err();
        assert_eq!(err, StoreError::NotFound);
    }

    #[tokio::test]
    async fn grant_is_idempotent_and_revoke_tolerates_absent_rows() {
        let store = InMemoryIdentityStore::new();
        let dept = store.departments().create("IT").await.unwrap();
        let users = store.users();
        let user = users.create(new_user("gail", dept.id)).await.unwrap();
        let perm = store
            .permissions()
            .create("report.view", Some("view reports"))
            .await
            .unwrap();

        users.grant_permission(user.user.id, perm.id).await.unwrap();
        users.grant_permission(user.user.id, perm.id).await.unwrap();
        assert_eq!(users.find(user.user.id).await.unwrap().permissions.len(), 1);

        users.revoke_permission(user.user.id, perm.id).await.unwrap();
        users.revoke_permission(user.user.id, perm.id).await.unwrap();

        let err = users
            .grant_permission(user.user.id, PermissionId::new())
            .await
            .unwrap_err();
        assert_eq!(err, StoreError::NotFound);
    }
}
