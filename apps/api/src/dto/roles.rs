use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use vireo_application::RoleInput;
use vireo_core::{AppResult, DeptId, RoleId};
use vireo_domain::{DataScope, PermissionCode, Role};

/// Incoming payload for role create and update.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveRoleRequest {
    pub name: String,
    pub code: String,
    /// Stored scope code, `1` (all) to `5` (custom).
    pub data_scope: i32,
    #[serde(default)]
    pub custom_departments: Vec<i64>,
}

impl SaveRoleRequest {
    pub fn into_input(self) -> AppResult<RoleInput> {
        Ok(RoleInput {
            name: self.name,
            code: self.code,
            data_scope: DataScope::try_from_code(self.data_scope)?,
            custom_departments: self
                .custom_departments
                .into_iter()
                .map(DeptId::parse_positive)
                .collect::<AppResult<BTreeSet<_>>>()?,
        })
    }
}

/// Incoming payload replacing a role's permission codes.
#[derive(Debug, Deserialize)]
pub struct ReplaceRolePermissionsRequest {
    pub permissions: Vec<String>,
}

impl ReplaceRolePermissionsRequest {
    pub fn into_codes(self) -> AppResult<BTreeSet<PermissionCode>> {
        self.permissions.into_iter().map(PermissionCode::new).collect()
    }
}

/// Permission codes a role grants, in code order.
#[derive(Debug, Serialize)]
pub struct RolePermissionsResponse {
    pub permissions: Vec<String>,
}

impl From<BTreeSet<PermissionCode>> for RolePermissionsResponse {
    fn from(codes: BTreeSet<PermissionCode>) -> Self {
        Self {
            permissions: codes.into_iter().map(String::from).collect(),
        }
    }
}

/// Incoming payload replacing a user's roles.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignUserRolesRequest {
    pub role_ids: Vec<i64>,
}

impl AssignUserRolesRequest {
    pub fn into_role_ids(self) -> AppResult<BTreeSet<RoleId>> {
        self.role_ids.into_iter().map(RoleId::parse_positive).collect()
    }
}

/// API representation of a role.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleResponse {
    pub id: i64,
    pub name: String,
    pub code: String,
    pub data_scope: i32,
    pub custom_departments: Vec<i64>,
}

impl From<Role> for RoleResponse {
    fn from(role: Role) -> Self {
        // Undecodable lists are shown as empty; the resolver ignores them too.
        let custom_departments = role
            .custom_departments()
            .parse()
            .unwrap_or_default()
            .iter()
            .map(DeptId::as_i64)
            .collect();

        Self {
            id: role.id().as_i64(),
            name: role.name().to_owned(),
            code: role.code().to_owned(),
            data_scope: role.data_scope().code(),
            custom_departments,
        }
    }
}
