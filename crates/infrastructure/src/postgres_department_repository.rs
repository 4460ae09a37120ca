//! PostgreSQL-backed department repository.

use async_trait::async_trait;
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use vireo_application::{
    DepartmentDeletionGuard, DepartmentInput, DepartmentRepository, DepartmentUsage,
};
use vireo_core::{AppError, AppResult, DeptId};
use vireo_domain::{CustomDepartmentList, DataScope, Department, DepartmentStatus};

/// PostgreSQL implementation of the department repository port.
#[derive(Clone)]
pub struct PostgresDepartmentRepository {
    pool: PgPool,
}

impl PostgresDepartmentRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct DepartmentRow {
    id: i64,
    parent_id: i64,
    name: String,
    code: String,
    status: i32,
    sort: i32,
}

impl TryFrom<DepartmentRow> for Department {
    type Error = AppError;

    fn try_from(row: DepartmentRow) -> Result<Self, Self::Error> {
        Department::new(
            DeptId::new(row.id),
            DeptId::from_parent_column(row.parent_id),
            row.name,
            row.code,
            DepartmentStatus::from_code(row.status)?,
            row.sort,
        )
    }
}

const DEPARTMENT_COLUMNS: &str = "id, parent_id, name, code, status, sort";

fn parent_column(parent_id: Option<DeptId>) -> i64 {
    parent_id.map_or(0, |parent_id| parent_id.as_i64())
}

#[async_trait]
impl DepartmentRepository for PostgresDepartmentRepository {
    async fn list_departments(&self) -> AppResult<Vec<Department>> {
        let rows = sqlx::query_as::<_, DepartmentRow>(&format!(
            "SELECT {DEPARTMENT_COLUMNS} FROM departments ORDER BY sort, id"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list departments: {error}")))?;

        rows.into_iter().map(Department::try_from).collect()
    }

    async fn find_department(&self, department_id: DeptId) -> AppResult<Option<Department>> {
        sqlx::query_as::<_, DepartmentRow>(&format!(
            "SELECT {DEPARTMENT_COLUMNS} FROM departments WHERE id = $1"
        ))
        .bind(department_id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to load department '{department_id}': {error}"))
        })?
        .map(Department::try_from)
        .transpose()
    }

    async fn create_department(&self, input: DepartmentInput) -> AppResult<Department> {
        let mut transaction = begin(&self.pool).await?;
        if let Some(parent_id) = input.parent_id {
            lock_parent(&mut transaction, parent_id).await?;
        }

        let row = sqlx::query_as::<_, DepartmentRow>(&format!(
            r#"
            INSERT INTO departments (parent_id, name, code, status, sort)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {DEPARTMENT_COLUMNS}
            "#
        ))
        .bind(parent_column(input.parent_id))
        .bind(input.name.as_str())
        .bind(input.code.as_str())
        .bind(input.status.code())
        .bind(input.sort)
        .fetch_one(&mut *transaction)
        .await
        .map_err(|error| AppError::Internal(format!("failed to create department: {error}")))?;

        commit(transaction).await?;
        Department::try_from(row)
    }

    async fn update_department(
        &self,
        department_id: DeptId,
        input: DepartmentInput,
    ) -> AppResult<Department> {
        let mut transaction = begin(&self.pool).await?;
        if let Some(parent_id) = input.parent_id {
            lock_parent(&mut transaction, parent_id).await?;
        }

        let row = sqlx::query_as::<_, DepartmentRow>(&format!(
            r#"
            UPDATE departments
            SET parent_id = $2, name = $3, code = $4, status = $5, sort = $6, updated_at = now()
            WHERE id = $1
            RETURNING {DEPARTMENT_COLUMNS}
            "#
        ))
        .bind(department_id.as_i64())
        .bind(parent_column(input.parent_id))
        .bind(input.name.as_str())
        .bind(input.code.as_str())
        .bind(input.status.code())
        .bind(input.sort)
        .fetch_optional(&mut *transaction)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to update department '{department_id}': {error}"
            ))
        })?
        .ok_or_else(|| AppError::NotFound(format!("department '{department_id}' does not exist")))?;

        commit(transaction).await?;
        Department::try_from(row)
    }

    async fn delete_department(
        &self,
        department_id: DeptId,
        guard: &DepartmentDeletionGuard,
    ) -> AppResult<()> {
        let mut transaction = begin(&self.pool).await?;

        let locked = sqlx::query_scalar::<_, i64>(
            "SELECT id FROM departments WHERE id = $1 FOR UPDATE",
        )
        .bind(department_id.as_i64())
        .fetch_optional(&mut *transaction)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to lock department '{department_id}': {error}"))
        })?;
        if locked.is_none() {
            return Err(AppError::NotFound(format!(
                "department '{department_id}' does not exist"
            )));
        }

        let usage = load_usage(&mut transaction, department_id).await?;
        guard(&usage)?;

        sqlx::query("DELETE FROM departments WHERE id = $1")
            .bind(department_id.as_i64())
            .execute(&mut *transaction)
            .await
            .map_err(|error| {
                AppError::Internal(format!(
                    "failed to delete department '{department_id}': {error}"
                ))
            })?;

        commit(transaction).await
    }
}

async fn begin(pool: &PgPool) -> AppResult<Transaction<'static, Postgres>> {
    pool.begin()
        .await
        .map_err(|error| AppError::Internal(format!("failed to begin transaction: {error}")))
}

async fn commit(transaction: Transaction<'_, Postgres>) -> AppResult<()> {
    transaction
        .commit()
        .await
        .map_err(|error| AppError::Internal(format!("failed to commit transaction: {error}")))
}

/// Holds a share lock on the parent row until commit, so a concurrent delete
/// either waits and counts the new child or has already removed the parent.
async fn lock_parent(
    transaction: &mut Transaction<'_, Postgres>,
    parent_id: DeptId,
) -> AppResult<()> {
    let locked =
        sqlx::query_scalar::<_, i64>("SELECT id FROM departments WHERE id = $1 FOR SHARE")
            .bind(parent_id.as_i64())
            .fetch_optional(&mut **transaction)
            .await
            .map_err(|error| {
                AppError::Internal(format!(
                    "failed to lock parent department '{parent_id}': {error}"
                ))
            })?;
    if locked.is_none() {
        return Err(AppError::Validation(format!(
            "parent department '{parent_id}' does not exist"
        )));
    }
    Ok(())
}

async fn load_usage(
    transaction: &mut Transaction<'_, Postgres>,
    department_id: DeptId,
) -> AppResult<DepartmentUsage> {
    let child_departments =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM departments WHERE parent_id = $1")
            .bind(department_id.as_i64())
            .fetch_one(&mut **transaction)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to count child departments: {error}"))
            })?;

    let member_users = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE dept_id = $1")
        .bind(department_id.as_i64())
        .fetch_one(&mut **transaction)
        .await
        .map_err(|error| AppError::Internal(format!("failed to count department users: {error}")))?;

    let custom_lists = sqlx::query_scalar::<_, String>(
        "SELECT custom_departments FROM roles WHERE data_scope = $1",
    )
    .bind(DataScope::Custom.code())
    .fetch_all(&mut **transaction)
    .await
    .map_err(|error| AppError::Internal(format!("failed to load custom role scopes: {error}")))?;

    let referencing_roles = custom_lists
        .into_iter()
        .filter(|raw| {
            CustomDepartmentList::from_raw(raw.as_str())
                .parse()
                .is_ok_and(|departments| departments.contains(&department_id))
        })
        .count();

    Ok(DepartmentUsage {
        department_id,
        child_departments: u64::try_from(child_departments).unwrap_or(0),
        member_users: u64::try_from(member_users).unwrap_or(0),
        referencing_roles: u64::try_from(referencing_roles).unwrap_or(u64::MAX),
    })
}

#[cfg(test)]
mod tests;
