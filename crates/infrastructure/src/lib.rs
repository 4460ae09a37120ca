//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod in_memory_department_cache;
mod in_memory_permission_cache;
mod postgres_authorization_repository;
mod postgres_department_repository;
mod postgres_principal_repository;
mod postgres_role_repository;
mod postgres_role_rows;
mod postgres_scoped_query;
mod postgres_system_config_repository;
mod ttl_cache;

#[cfg(test)]
mod test_database;

pub use in_memory_department_cache::InMemoryDepartmentListCache;
pub use in_memory_permission_cache::InMemoryPermissionCache;
pub use postgres_authorization_repository::PostgresAuthorizationRepository;
pub use postgres_department_repository::PostgresDepartmentRepository;
pub use postgres_principal_repository::PostgresPrincipalRepository;
pub use postgres_role_repository::PostgresRoleRepository;
pub use postgres_system_config_repository::PostgresSystemConfigRepository;
pub use ttl_cache::{Clock, ManualClock, SystemClock, TtlCache};
