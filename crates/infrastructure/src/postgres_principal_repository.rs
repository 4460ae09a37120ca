use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use vireo_application::PrincipalRepository;
use vireo_core::{AppError, AppResult, DeptId, UserId};
use vireo_domain::Principal;

use crate::postgres_role_rows::{ROLE_COLUMNS, RoleRow};

/// PostgreSQL-backed loader for the acting user and its roles.
#[derive(Clone)]
pub struct PostgresPrincipalRepository {
    pool: PgPool,
}

impl PostgresPrincipalRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct UserRow {
    id: i64,
    username: String,
    dept_id: Option<i64>,
}

#[async_trait]
impl PrincipalRepository for PostgresPrincipalRepository {
    async fn find_principal(&self, user_id: UserId) -> AppResult<Option<Principal>> {
        let Some(user) = sqlx::query_as::<_, UserRow>(
            "SELECT id, username, dept_id FROM users WHERE id = $1",
        )
        .bind(user_id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to load user '{user_id}': {error}")))?
        else {
            return Ok(None);
        };

        let roles = sqlx::query_as::<_, RoleRow>(&format!(
            r#"
            SELECT {}
            FROM roles
            WHERE id IN (SELECT role_id FROM user_roles WHERE user_id = $1)
            ORDER BY id
            "#,
            ROLE_COLUMNS
        ))
        .bind(user.id)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to load roles of user '{user_id}': {error}"))
        })?
        .into_iter()
        .map(RoleRow::into_role)
        .collect::<AppResult<Vec<_>>>()?;

        Ok(Some(Principal::new(
            UserId::new(user.id),
            user.username,
            user.dept_id.and_then(DeptId::from_parent_column),
            roles,
        )))
    }
}
