use std::sync::Arc;

use sqlx::PgPool;

use staffgate_infra::{
    DepartmentStore, InMemoryIdentityStore, PermissionStore, PostgresDepartmentStore,
    PostgresPermissionStore, PostgresUserStore, UserStore,
};

/// Store handles the handlers work against, one per entity.
#[derive(Clone)]
pub struct AppServices {
    pub users: Arc<dyn UserStore>,
    pub departments: Arc<dyn DepartmentStore>,
    pub permissions: Arc<dyn PermissionStore>,
}

impl AppServices {
    /// Production wiring: all stores share the given pool.
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            users: Arc::new(PostgresUserStore::new(pool.clone())),
            departments: Arc::new(PostgresDepartmentStore::new(pool.clone())),
            permissions: Arc::new(PostgresPermissionStore::new(pool)),
        }
    }

    /// Test wiring: typed in-memory doubles over shared state.
    pub fn in_memory() -> Self {
        let store = InMemoryIdentityStore::new();
        Self {
            users: Arc::new(store.users()),
            departments: Arc::new(store.departments()),
            permissions: Arc::new(store.permissions()),
        }
    }
}
