use async_trait::async_trait;
use vireo_core::{AppResult, DeptId};
use vireo_domain::{Department, DepartmentStatus};

/// Input payload for department creation and updates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepartmentInput {
    /// Parent department, `None` for a root department.
    pub parent_id: Option<DeptId>,
    /// Display name.
    pub name: String,
    /// Department code.
    pub code: String,
    /// Lifecycle status.
    pub status: DepartmentStatus,
    /// Sort order within siblings.
    pub sort: i32,
}

/// References that keep a department from being deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepartmentUsage {
    /// Department about to be deleted.
    pub department_id: DeptId,
    /// Departments whose parent is this department.
    pub child_departments: u64,
    /// Users whose home department is this department.
    pub member_users: u64,
    /// Roles whose custom department list contains this department.
    pub referencing_roles: u64,
}

/// Precondition evaluated inside the delete unit of work.
pub type DepartmentDeletionGuard = dyn Fn(&DepartmentUsage) -> AppResult<()> + Send + Sync;

/// Repository port for departments.
#[async_trait]
pub trait DepartmentRepository: Send + Sync {
    /// Lists every department, regardless of status.
    async fn list_departments(&self) -> AppResult<Vec<Department>>;

    /// Returns one department by identifier.
    async fn find_department(&self, department_id: DeptId) -> AppResult<Option<Department>>;

    /// Creates a department and returns it with its assigned identifier.
    async fn create_department(&self, input: DepartmentInput) -> AppResult<Department>;

    /// Replaces the mutable fields of a department.
    async fn update_department(
        &self,
        department_id: DeptId,
        input: DepartmentInput,
    ) -> AppResult<Department>;

    /// Deletes a department in one unit of work.
    ///
    /// Implementations read the department's usage, run `guard` on it and
    /// only commit the delete when the guard passes. Returns `NotFound` when
    /// the department does not exist.
    async fn delete_department(
        &self,
        department_id: DeptId,
        guard: &DepartmentDeletionGuard,
    ) -> AppResult<()>;
}
