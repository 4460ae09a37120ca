use std::collections::BTreeSet;

use async_trait::async_trait;
use sqlx::PgPool;
use vireo_application::{RoleDeletionGuard, RoleInput, RoleRepository, RoleUsage};
use vireo_core::{AppError, AppResult, RoleId, UserId};
use vireo_domain::{CustomDepartmentList, PermissionCode, Role};

use crate::postgres_role_rows::{ROLE_COLUMNS, RoleRow};

/// PostgreSQL-backed repository for roles and their grants.
#[derive(Clone)]
pub struct PostgresRoleRepository {
    pool: PgPool,
}

impl PostgresRoleRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn role_conflict_or_internal(error: sqlx::Error, operation: &str) -> AppError {
    if let sqlx::Error::Database(ref database_error) = error
        && database_error.code().as_deref() == Some("23505")
    {
        return AppError::Conflict("a role with this name or code already exists".to_owned());
    }

    AppError::Internal(format!("failed to {operation}: {error}"))
}

fn begin_error(error: sqlx::Error) -> AppError {
    AppError::Internal(format!("failed to begin transaction: {error}"))
}

fn commit_error(error: sqlx::Error) -> AppError {
    AppError::Internal(format!("failed to commit transaction: {error}"))
}

#[async_trait]
impl RoleRepository for PostgresRoleRepository {
    async fn list_roles(&self) -> AppResult<Vec<Role>> {
        sqlx::query_as::<_, RoleRow>(&format!("SELECT {ROLE_COLUMNS} FROM roles ORDER BY id"))
            .fetch_all(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to list roles: {error}")))?
            .into_iter()
            .map(RoleRow::into_role)
            .collect()
    }

    async fn find_role(&self, role_id: RoleId) -> AppResult<Option<Role>> {
        sqlx::query_as::<_, RoleRow>(&format!("SELECT {ROLE_COLUMNS} FROM roles WHERE id = $1"))
            .bind(role_id.as_i64())
            .fetch_optional(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to load role '{role_id}': {error}"))
            })?
            .map(RoleRow::into_role)
            .transpose()
    }

    async fn create_role(&self, input: RoleInput) -> AppResult<Role> {
        let custom = CustomDepartmentList::from_departments(&input.custom_departments);
        sqlx::query_as::<_, RoleRow>(&format!(
            r#"
            INSERT INTO roles (name, code, data_scope, custom_departments)
            VALUES ($1, $2, $3, $4)
            RETURNING {ROLE_COLUMNS}
            "#
        ))
        .bind(input.name.as_str())
        .bind(input.code.as_str())
        .bind(input.data_scope.code())
        .bind(custom.raw())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| role_conflict_or_internal(error, "create role"))?
        .into_role()
    }

    async fn update_role(&self, role_id: RoleId, input: RoleInput) -> AppResult<Role> {
        let custom = CustomDepartmentList::from_departments(&input.custom_departments);
        sqlx::query_as::<_, RoleRow>(&format!(
            r#"
            UPDATE roles
            SET name = $2, code = $3, data_scope = $4, custom_departments = $5, updated_at = now()
            WHERE id = $1
            RETURNING {ROLE_COLUMNS}
            "#
        ))
        .bind(role_id.as_i64())
        .bind(input.name.as_str())
        .bind(input.code.as_str())
        .bind(input.data_scope.code())
        .bind(custom.raw())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| role_conflict_or_internal(error, "update role"))?
        .ok_or_else(|| AppError::NotFound(format!("role '{role_id}' does not exist")))?
        .into_role()
    }

    async fn delete_role(&self, role_id: RoleId, guard: &RoleDeletionGuard) -> AppResult<()> {
        let mut transaction = self.pool.begin().await.map_err(begin_error)?;

        let locked = sqlx::query_scalar::<_, i64>("SELECT id FROM roles WHERE id = $1 FOR UPDATE")
            .bind(role_id.as_i64())
            .fetch_optional(&mut *transaction)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to lock role '{role_id}': {error}"))
            })?;
        if locked.is_none() {
            return Err(AppError::NotFound(format!("role '{role_id}' does not exist")));
        }

        let assigned_users =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM user_roles WHERE role_id = $1")
                .bind(role_id.as_i64())
                .fetch_one(&mut *transaction)
                .await
                .map_err(|error| {
                    AppError::Internal(format!("failed to count role assignments: {error}"))
                })?;
        guard(&RoleUsage {
            role_id,
            assigned_users: u64::try_from(assigned_users).unwrap_or(0),
        })?;

        // role_permissions rows go with the role through ON DELETE CASCADE.
        sqlx::query("DELETE FROM roles WHERE id = $1")
            .bind(role_id.as_i64())
            .execute(&mut *transaction)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to delete role '{role_id}': {error}"))
            })?;

        transaction.commit().await.map_err(commit_error)
    }

    async fn list_role_permissions(&self, role_id: RoleId) -> AppResult<BTreeSet<PermissionCode>> {
        sqlx::query_scalar::<_, String>(
            "SELECT permission FROM role_permissions WHERE role_id = $1 ORDER BY permission",
        )
        .bind(role_id.as_i64())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to list permissions of role '{role_id}': {error}"
            ))
        })?
        .into_iter()
        .map(PermissionCode::try_from)
        .collect()
    }

    async fn replace_role_permissions(
        &self,
        role_id: RoleId,
        permissions: BTreeSet<PermissionCode>,
    ) -> AppResult<()> {
        let mut transaction = self.pool.begin().await.map_err(begin_error)?;

        sqlx::query("DELETE FROM role_permissions WHERE role_id = $1")
            .bind(role_id.as_i64())
            .execute(&mut *transaction)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to clear role permissions: {error}"))
            })?;

        let codes: Vec<String> = permissions.iter().map(ToString::to_string).collect();
        sqlx::query(
            r#"
            INSERT INTO role_permissions (role_id, permission)
            SELECT $1, permission FROM UNNEST($2::TEXT[]) AS permission
            "#,
        )
        .bind(role_id.as_i64())
        .bind(codes)
        .execute(&mut *transaction)
        .await
        .map_err(|error| AppError::Internal(format!("failed to grant role permissions: {error}")))?;

        transaction.commit().await.map_err(commit_error)
    }

    async fn replace_user_roles(
        &self,
        user_id: UserId,
        role_ids: BTreeSet<RoleId>,
    ) -> AppResult<()> {
        let mut transaction = self.pool.begin().await.map_err(begin_error)?;

        sqlx::query("DELETE FROM user_roles WHERE user_id = $1")
            .bind(user_id.as_i64())
            .execute(&mut *transaction)
            .await
            .map_err(|error| AppError::Internal(format!("failed to clear user roles: {error}")))?;

        let ids: Vec<i64> = role_ids.iter().map(RoleId::as_i64).collect();
        sqlx::query(
            r#"
            INSERT INTO user_roles (user_id, role_id)
            SELECT $1, role_id FROM UNNEST($2::BIGINT[]) AS role_id
            "#,
        )
        .bind(user_id.as_i64())
        .bind(ids)
        .execute(&mut *transaction)
        .await
        .map_err(|error| AppError::Internal(format!("failed to assign user roles: {error}")))?;

        transaction.commit().await.map_err(commit_error)
    }
}
