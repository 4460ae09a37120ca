mod authorization;
mod caches;
mod departments;
mod principals;
mod roles;
mod system_configs;

pub use authorization::AuthorizationRepository;
pub use caches::{DepartmentListCache, PermissionCache};
pub use departments::{
    DepartmentDeletionGuard, DepartmentInput, DepartmentRepository, DepartmentUsage,
};
pub use principals::PrincipalRepository;
pub use roles::{RoleDeletionGuard, RoleInput, RoleRepository, RoleUsage};
pub use system_configs::{
    SystemConfigInput, SystemConfigPage, SystemConfigPageQuery, SystemConfigRepository,
};
