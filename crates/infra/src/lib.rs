//! `staffgate-infra` — persistence for the identity domain.
//!
//! Store traits with two implementations: Postgres (production) and a typed
//! in-memory double used by tests.

pub mod memory;
pub mod model;
pub mod postgres;
pub mod schema;
pub mod store;

pub use memory::InMemoryIdentityStore;
pub use model::{Department, NewUser, Permission, User, UserChanges, UserDetail};
pub use postgres::{PostgresDepartmentStore, PostgresPermissionStore, PostgresUserStore};
pub use schema::{ensure_schema, seed_defaults, AdminSeed};
pub use store::{DepartmentStore, PermissionStore, StoreError, UserStore};
