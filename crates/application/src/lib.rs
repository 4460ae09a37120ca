//! Application services and ports.

#![forbid(unsafe_code)]

mod access_ports;
mod authorization_service;
mod data_scope_config;
mod data_scope_service;
mod department_service;
mod query_scope;
mod role_service;
mod system_config_service;

#[cfg(test)]
mod test_support;

pub use access_ports::{
    AuthorizationRepository, DepartmentDeletionGuard, DepartmentInput, DepartmentListCache,
    DepartmentRepository, DepartmentUsage, PermissionCache, PrincipalRepository,
    RoleDeletionGuard, RoleInput, RoleRepository, RoleUsage, SystemConfigInput, SystemConfigPage, SystemConfigPageQuery,
    SystemConfigRepository,
};
pub use authorization_service::AuthorizationService;
pub use data_scope_config::{
    DEFAULT_DEPARTMENT_CACHE_TTL, DEFAULT_PERMISSION_CACHE_TTL, DEFAULT_SUPER_ADMIN_ROLE,
    DataScopeConfig,
};
pub use data_scope_service::{DataScopeService, ResolvedPrincipal};
pub use department_service::{DepartmentListQuery, DepartmentService, ensure_department_deletable};
pub use query_scope::{
    DataScopeContext, QueryScopeFilter, RequestScope, RowFilter, RowScope, ScopeRequest,
    ScopedQuery,
};
pub use role_service::{RoleService, ensure_role_deletable};
pub use system_config_service::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, SystemConfigService};
