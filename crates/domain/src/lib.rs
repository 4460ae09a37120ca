//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod data_scope;
mod department;
mod department_hierarchy;
mod ownership;
mod permission;
mod principal;
mod role;
mod system_config;

pub use data_scope::{DataScope, DataScopeError, PermittedDepartments, ScopeResolution};
pub use department::{Department, DepartmentStatus};
pub use department_hierarchy::{
    DEFAULT_MAX_HIERARCHY_DEPTH, DepartmentHierarchy, Descendants, HierarchyCorruption,
};
pub use ownership::RowOwnership;
pub use permission::PermissionCode;
pub use principal::Principal;
pub use role::{CustomDepartmentList, Role};
pub use system_config::SystemConfig;
