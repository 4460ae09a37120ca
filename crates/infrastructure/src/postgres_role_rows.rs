use sqlx::FromRow;
use vireo_core::{AppResult, RoleId};
use vireo_domain::{CustomDepartmentList, DataScope, Role};

pub(crate) const ROLE_COLUMNS: &str = "id, name, code, data_scope, custom_departments";

#[derive(Debug, FromRow)]
pub(crate) struct RoleRow {
    pub(crate) id: i64,
    pub(crate) name: String,
    pub(crate) code: String,
    pub(crate) data_scope: i32,
    pub(crate) custom_departments: String,
}

impl RoleRow {
    /// Unknown stored scope codes decode to the most restrictive scope.
    pub(crate) fn into_role(self) -> AppResult<Role> {
        let data_scope = DataScope::from_code(self.data_scope);
        if data_scope.code() != self.data_scope {
            tracing::warn!(
                role_id = self.id,
                stored = self.data_scope,
                "unknown data scope code, treating role as own-rows only"
            );
        }

        Role::new(
            RoleId::new(self.id),
            self.name,
            self.code,
            data_scope,
            CustomDepartmentList::from_raw(self.custom_departments),
        )
    }
}
