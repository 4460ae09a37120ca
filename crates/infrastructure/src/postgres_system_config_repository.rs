//! PostgreSQL-backed system config repository.
//!
//! Every statement except the insert ends in a `WHERE` clause that the
//! request's row filter extends.

use async_trait::async_trait;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use vireo_application::{
    RowScope, SystemConfigInput, SystemConfigPage, SystemConfigPageQuery, SystemConfigRepository,
};
use vireo_core::{AppError, AppResult, DeptId, UserId};
use vireo_domain::{RowOwnership, SystemConfig};

use crate::postgres_scoped_query::PostgresScopedQuery;

/// PostgreSQL implementation of the system config repository port.
#[derive(Clone)]
pub struct PostgresSystemConfigRepository {
    pool: PgPool,
}

impl PostgresSystemConfigRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const CONFIG_COLUMNS: &str =
    "id, config_key, config_name, config_value, remark, creator_id, dept_id";

#[derive(Debug, FromRow)]
struct SystemConfigRow {
    id: i64,
    config_key: String,
    config_name: String,
    config_value: String,
    remark: Option<String>,
    creator_id: i64,
    dept_id: Option<i64>,
}

impl TryFrom<SystemConfigRow> for SystemConfig {
    type Error = AppError;

    fn try_from(row: SystemConfigRow) -> Result<Self, Self::Error> {
        SystemConfig::new(
            row.id,
            row.config_key,
            row.config_name,
            row.config_value,
            row.remark,
            RowOwnership::new(
                UserId::new(row.creator_id),
                row.dept_id.and_then(DeptId::from_parent_column),
            ),
        )
    }
}

fn key_conflict_or_internal(error: sqlx::Error, operation: &str) -> AppError {
    if let sqlx::Error::Database(ref database_error) = error
        && database_error.code().as_deref() == Some("23505")
    {
        return AppError::Conflict("a config with this key already exists".to_owned());
    }

    AppError::Internal(format!("failed to {operation}: {error}"))
}

fn push_keywords(builder: &mut QueryBuilder<'_, Postgres>, keywords: Option<&str>) {
    if let Some(keywords) = keywords {
        builder.push(" AND config_name ILIKE ");
        builder.push_bind(format!("%{keywords}%"));
    }
}

#[async_trait]
impl SystemConfigRepository for PostgresSystemConfigRepository {
    async fn create_config(
        &self,
        input: SystemConfigInput,
        ownership: RowOwnership,
    ) -> AppResult<SystemConfig> {
        let row = sqlx::query_as::<_, SystemConfigRow>(&format!(
            r#"
            INSERT INTO system_configs (
                config_key, config_name, config_value, remark, creator_id, dept_id
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {CONFIG_COLUMNS}
            "#
        ))
        .bind(input.key.as_str())
        .bind(input.name.as_str())
        .bind(input.value.as_str())
        .bind(input.remark.as_deref())
        .bind(ownership.creator_id().as_i64())
        .bind(ownership.dept_id().map(|department| department.as_i64()))
        .fetch_one(&self.pool)
        .await
        .map_err(|error| key_conflict_or_internal(error, "create system config"))?;

        SystemConfig::try_from(row)
    }

    async fn page_configs(
        &self,
        query: SystemConfigPageQuery,
        scope: &dyn RowScope,
    ) -> AppResult<SystemConfigPage> {
        let limit = i64::try_from(query.limit).map_err(|error| {
            AppError::Validation(format!("invalid system config page size: {error}"))
        })?;
        let offset = i64::try_from(query.offset).map_err(|error| {
            AppError::Validation(format!("invalid system config page offset: {error}"))
        })?;

        let mut count: QueryBuilder<'_, Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM system_configs WHERE TRUE");
        push_keywords(&mut count, query.keywords.as_deref());
        let filter = scope.write_into(&mut PostgresScopedQuery::new(&mut count));
        let total = count
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to count system configs: {error}"))
            })?;

        let mut page: QueryBuilder<'_, Postgres> = QueryBuilder::new(format!(
            "SELECT {CONFIG_COLUMNS} FROM system_configs WHERE TRUE"
        ));
        push_keywords(&mut page, query.keywords.as_deref());
        filter.apply(&mut PostgresScopedQuery::new(&mut page));
        page.push(" ORDER BY id LIMIT ");
        page.push_bind(limit);
        page.push(" OFFSET ");
        page.push_bind(offset);

        let items = page
            .build_query_as::<SystemConfigRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to list system configs: {error}")))?
            .into_iter()
            .map(SystemConfig::try_from)
            .collect::<AppResult<Vec<_>>>()?;

        Ok(SystemConfigPage {
            items,
            total: u64::try_from(total).unwrap_or(0),
        })
    }

    async fn find_config(
        &self,
        config_id: i64,
        scope: &dyn RowScope,
    ) -> AppResult<Option<SystemConfig>> {
        let mut builder: QueryBuilder<'_, Postgres> = QueryBuilder::new(format!(
            "SELECT {CONFIG_COLUMNS} FROM system_configs WHERE id = "
        ));
        builder.push_bind(config_id);
        scope.write_into(&mut PostgresScopedQuery::new(&mut builder));

        builder
            .build_query_as::<SystemConfigRow>()
            .fetch_optional(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to load system config '{config_id}': {error}"))
            })?
            .map(SystemConfig::try_from)
            .transpose()
    }

    async fn update_config(
        &self,
        config_id: i64,
        input: SystemConfigInput,
        scope: &dyn RowScope,
    ) -> AppResult<Option<SystemConfig>> {
        let mut builder: QueryBuilder<'_, Postgres> =
            QueryBuilder::new("UPDATE system_configs SET config_key = ");
        builder.push_bind(input.key);
        builder.push(", config_name = ");
        builder.push_bind(input.name);
        builder.push(", config_value = ");
        builder.push_bind(input.value);
        builder.push(", remark = ");
        builder.push_bind(input.remark);
        builder.push(", updated_at = now() WHERE id = ");
        builder.push_bind(config_id);
        scope.write_into(&mut PostgresScopedQuery::new(&mut builder));
        builder.push(format!(" RETURNING {CONFIG_COLUMNS}"));

        builder
            .build_query_as::<SystemConfigRow>()
            .fetch_optional(&self.pool)
            .await
            .map_err(|error| key_conflict_or_internal(error, "update system config"))?
            .map(SystemConfig::try_from)
            .transpose()
    }

    async fn delete_config(&self, config_id: i64, scope: &dyn RowScope) -> AppResult<bool> {
        let mut builder: QueryBuilder<'_, Postgres> =
            QueryBuilder::new("DELETE FROM system_configs WHERE id = ");
        builder.push_bind(config_id);
        scope.write_into(&mut PostgresScopedQuery::new(&mut builder));

        let result = builder.build().execute(&self.pool).await.map_err(|error| {
            AppError::Internal(format!(
                "failed to delete system config '{config_id}': {error}"
            ))
        })?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests;
