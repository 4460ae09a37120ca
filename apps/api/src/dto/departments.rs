use serde::{Deserialize, Serialize};
use vireo_application::{DepartmentInput, DepartmentListQuery};
use vireo_core::{AppResult, DeptId};
use vireo_domain::{Department, DepartmentStatus};

/// Query parameters of the department list.
#[derive(Debug, Default, Deserialize)]
pub struct DepartmentListParams {
    pub keywords: Option<String>,
    pub status: Option<i32>,
}

impl DepartmentListParams {
    pub fn into_query(self) -> AppResult<DepartmentListQuery> {
        Ok(DepartmentListQuery {
            keywords: self.keywords,
            status: self.status.map(DepartmentStatus::from_code).transpose()?,
        })
    }
}

/// Incoming payload for department create and update.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveDepartmentRequest {
    /// `0` or absent for a root department.
    #[serde(default)]
    pub parent_id: i64,
    pub name: String,
    #[serde(default)]
    pub code: String,
    pub status: Option<i32>,
    #[serde(default)]
    pub sort: i32,
}

impl SaveDepartmentRequest {
    pub fn into_input(self) -> AppResult<DepartmentInput> {
        Ok(DepartmentInput {
            parent_id: DeptId::from_parent_column(self.parent_id),
            name: self.name,
            code: self.code,
            status: self
                .status
                .map_or(Ok(DepartmentStatus::Enabled), DepartmentStatus::from_code)?,
            sort: self.sort,
        })
    }
}

/// API representation of a department.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentResponse {
    pub id: i64,
    pub parent_id: i64,
    pub name: String,
    pub code: String,
    pub status: i32,
    pub sort: i32,
}

impl From<Department> for DepartmentResponse {
    fn from(department: Department) -> Self {
        Self {
            id: department.id().as_i64(),
            parent_id: department.parent_id().map_or(0, |parent| parent.as_i64()),
            name: department.name().to_owned(),
            code: department.code().to_owned(),
            status: department.status().code(),
            sort: department.sort(),
        }
    }
}
