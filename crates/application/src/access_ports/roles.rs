use std::collections::BTreeSet;

use async_trait::async_trait;
use vireo_core::{AppResult, DeptId, RoleId, UserId};
use vireo_domain::{DataScope, PermissionCode, Role};

/// Input payload for role creation and updates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleInput {
    /// Unique role name.
    pub name: String,
    /// Unique role code.
    pub code: String,
    /// Declared row-level data scope.
    pub data_scope: DataScope,
    /// Explicit departments, only kept for [`DataScope::Custom`].
    pub custom_departments: BTreeSet<DeptId>,
}

/// References that keep a role from being deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleUsage {
    /// Role about to be deleted.
    pub role_id: RoleId,
    /// Users the role is still assigned to.
    pub assigned_users: u64,
}

/// Precondition evaluated inside the role delete unit of work.
pub type RoleDeletionGuard = dyn Fn(&RoleUsage) -> AppResult<()> + Send + Sync;

/// Repository port for roles and their grants.
#[async_trait]
pub trait RoleRepository: Send + Sync {
    /// Lists all roles.
    async fn list_roles(&self) -> AppResult<Vec<Role>>;

    /// Returns one role by identifier.
    async fn find_role(&self, role_id: RoleId) -> AppResult<Option<Role>>;

    /// Creates a role and returns it with its assigned identifier.
    async fn create_role(&self, input: RoleInput) -> AppResult<Role>;

    /// Replaces the mutable fields of a role.
    async fn update_role(&self, role_id: RoleId, input: RoleInput) -> AppResult<Role>;

    /// Deletes a role together with its grants.
    ///
    /// Implementations lock the role, read its usage, run `guard` on it and
    /// delete only when the guard passes. Returns `NotFound` when the role
    /// does not exist.
    async fn delete_role(&self, role_id: RoleId, guard: &RoleDeletionGuard) -> AppResult<()>;

    /// Lists the permission codes granted by a role.
    async fn list_role_permissions(&self, role_id: RoleId) -> AppResult<BTreeSet<PermissionCode>>;

    /// Replaces the permission codes granted by a role.
    async fn replace_role_permissions(
        &self,
        role_id: RoleId,
        permissions: BTreeSet<PermissionCode>,
    ) -> AppResult<()>;

    /// Replaces the roles attached to a user.
    async fn replace_user_roles(&self, user_id: UserId, role_ids: BTreeSet<RoleId>)
    -> AppResult<()>;
}
