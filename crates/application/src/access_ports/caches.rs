use std::collections::BTreeSet;
use std::time::Duration;

use async_trait::async_trait;
use vireo_core::{AppResult, UserId};
use vireo_domain::{Department, PermissionCode};

/// Process-local cache of the full department list.
///
/// Readers may observe a list up to one TTL old; writers invalidate after
/// every department change.
#[async_trait]
pub trait DepartmentListCache: Send + Sync {
    /// Returns the cached list when present and not expired.
    async fn get_departments(&self) -> AppResult<Option<Vec<Department>>>;

    /// Stores the list for `ttl`. A zero TTL stores nothing.
    async fn set_departments(&self, departments: Vec<Department>, ttl: Duration) -> AppResult<()>;

    /// Drops the cached list.
    async fn invalidate_departments(&self) -> AppResult<()>;
}

/// Cache of permission codes per user.
#[async_trait]
pub trait PermissionCache: Send + Sync {
    /// Returns cached codes for a user when present and not expired.
    async fn get_permissions(&self, user_id: UserId) -> AppResult<Option<BTreeSet<PermissionCode>>>;

    /// Stores codes for a user for `ttl`. A zero TTL stores nothing.
    async fn set_permissions(
        &self,
        user_id: UserId,
        permissions: BTreeSet<PermissionCode>,
        ttl: Duration,
    ) -> AppResult<()>;

    /// Drops the entry of one user.
    async fn invalidate_user(&self, user_id: UserId) -> AppResult<()>;

    /// Drops every entry.
    async fn invalidate_all(&self) -> AppResult<()>;
}
