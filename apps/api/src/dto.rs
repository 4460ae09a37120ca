mod configs;
mod departments;
mod roles;

use serde::Serialize;

pub use configs::{
    ConfigListParams, ConfigPageResponse, ConfigResponse, SaveConfigRequest,
};
pub use departments::{DepartmentListParams, DepartmentResponse, SaveDepartmentRequest};
pub use roles::{
    AssignUserRolesRequest, ReplaceRolePermissionsRequest, RolePermissionsResponse, RoleResponse,
    SaveRoleRequest,
};

/// API representation of service health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: &'static str,
}
