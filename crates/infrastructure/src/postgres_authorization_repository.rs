use async_trait::async_trait;
use sqlx::PgPool;
use vireo_application::AuthorizationRepository;
use vireo_core::{AppError, AppResult, UserId};
use vireo_domain::PermissionCode;

/// PostgreSQL-backed repository for permission lookups.
#[derive(Clone)]
pub struct PostgresAuthorizationRepository {
    pool: PgPool,
}

impl PostgresAuthorizationRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuthorizationRepository for PostgresAuthorizationRepository {
    async fn list_role_names_for_user(&self, user_id: UserId) -> AppResult<Vec<String>> {
        sqlx::query_scalar::<_, String>(
            r#"
            SELECT roles.name
            FROM user_roles
            INNER JOIN roles ON roles.id = user_roles.role_id
            WHERE user_roles.user_id = $1
            "#,
        )
        .bind(user_id.as_i64())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to load role names: {error}")))
    }

    async fn list_permission_codes_for_user(
        &self,
        user_id: UserId,
    ) -> AppResult<Vec<PermissionCode>> {
        let codes = sqlx::query_scalar::<_, String>(
            r#"
            SELECT DISTINCT grants.permission
            FROM user_roles
            INNER JOIN role_permissions AS grants
                ON grants.role_id = user_roles.role_id
            WHERE user_roles.user_id = $1
            "#,
        )
        .bind(user_id.as_i64())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to load permissions: {error}")))?;

        codes
            .into_iter()
            .map(|code| {
                PermissionCode::try_from(code.clone()).map_err(|error| {
                    AppError::Internal(format!(
                        "failed to decode permission '{code}' for user '{user_id}': {error}"
                    ))
                })
            })
            .collect()
    }
}
