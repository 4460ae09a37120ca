use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use vireo_core::{AppResult, UserId};
use vireo_domain::{DataScopeError, PermissionCode};

use crate::{AuthorizationRepository, DataScopeConfig, PermissionCache};

/// Application service for endpoint-level permission checks.
///
/// Independent of row filtering: a request has to pass this gate before any
/// data-scoped query runs.
#[derive(Clone)]
pub struct AuthorizationService {
    repository: Arc<dyn AuthorizationRepository>,
    cache: Arc<dyn PermissionCache>,
    super_admin_role: String,
    cache_ttl: Duration,
}

impl AuthorizationService {
    /// Creates a new authorization service.
    #[must_use]
    pub fn new(
        repository: Arc<dyn AuthorizationRepository>,
        cache: Arc<dyn PermissionCache>,
        config: &DataScopeConfig,
    ) -> Self {
        Self {
            repository,
            cache,
            super_admin_role: config.super_admin_role().to_owned(),
            cache_ttl: config.permission_cache_ttl(),
        }
    }

    /// Checks that a user holds every required permission code.
    ///
    /// Super-admins pass unconditionally, as does an empty requirement list.
    pub async fn authorize(
        &self,
        user_id: UserId,
        required: &[PermissionCode],
    ) -> Result<(), DataScopeError> {
        if required.is_empty() {
            return Ok(());
        }

        let role_names = self
            .repository
            .list_role_names_for_user(user_id)
            .await
            .map_err(|error| DataScopeError::PrincipalUnavailable(error.to_string()))?;
        if role_names
            .iter()
            .any(|role_name| role_name == &self.super_admin_role)
        {
            return Ok(());
        }

        let granted = self
            .permissions_for_user(user_id)
            .await
            .map_err(|error| DataScopeError::PrincipalUnavailable(error.to_string()))?;
        let missing: Vec<String> = required
            .iter()
            .filter(|code| !granted.contains(*code))
            .map(ToString::to_string)
            .collect();

        if missing.is_empty() {
            return Ok(());
        }

        tracing::info!(
            user_id = %user_id,
            missing = ?missing,
            "permission check failed"
        );
        Err(DataScopeError::PermissionDenied { user_id, missing })
    }

    /// Returns the distinct permission codes granted to a user.
    ///
    /// Served from the cache when possible; an unreadable cache falls back
    /// to the repository.
    pub async fn permissions_for_user(&self, user_id: UserId) -> AppResult<BTreeSet<PermissionCode>> {
        match self.cache.get_permissions(user_id).await {
            Ok(Some(permissions)) => return Ok(permissions),
            Ok(None) => {}
            Err(error) => {
                tracing::warn!(user_id = %user_id, error = %error, "permission cache read failed");
            }
        }

        let permissions: BTreeSet<PermissionCode> = self
            .repository
            .list_permission_codes_for_user(user_id)
            .await?
            .into_iter()
            .collect();

        if let Err(error) = self
            .cache
            .set_permissions(user_id, permissions.clone(), self.cache_ttl)
            .await
        {
            tracing::warn!(user_id = %user_id, error = %error, "permission cache write failed");
        }

        Ok(permissions)
    }

    /// Drops the cached permissions of one user.
    pub async fn invalidate_user(&self, user_id: UserId) {
        if let Err(error) = self.cache.invalidate_user(user_id).await {
            tracing::warn!(user_id = %user_id, error = %error, "permission cache invalidation failed");
        }
    }

    /// Drops every cached permission set.
    pub async fn invalidate_all(&self) {
        if let Err(error) = self.cache.invalidate_all().await {
            tracing::warn!(error = %error, "permission cache invalidation failed");
        }
    }
}
