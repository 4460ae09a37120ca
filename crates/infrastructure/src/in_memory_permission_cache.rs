use std::collections::BTreeSet;
use std::time::Duration;

use async_trait::async_trait;
use vireo_application::PermissionCache;
use vireo_core::{AppResult, UserId};
use vireo_domain::PermissionCode;

use crate::ttl_cache::{Clock, SystemClock, TtlCache};

/// Process-local cache adapter for per-user permission codes.
#[derive(Debug)]
pub struct InMemoryPermissionCache<C = SystemClock> {
    cache: TtlCache<UserId, BTreeSet<PermissionCode>, C>,
}

impl InMemoryPermissionCache {
    /// Creates an empty cache on the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for InMemoryPermissionCache {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> InMemoryPermissionCache<C> {
    /// Creates an empty cache on the given clock.
    #[must_use]
    pub fn with_clock(clock: C) -> Self {
        Self {
            cache: TtlCache::with_clock(clock),
        }
    }
}

#[async_trait]
impl<C: Clock> PermissionCache for InMemoryPermissionCache<C> {
    async fn get_permissions(&self, user_id: UserId) -> AppResult<Option<BTreeSet<PermissionCode>>> {
        Ok(self.cache.get(&user_id).await)
    }

    async fn set_permissions(
        &self,
        user_id: UserId,
        permissions: BTreeSet<PermissionCode>,
        ttl: Duration,
    ) -> AppResult<()> {
        self.cache.insert(user_id, permissions, ttl).await;
        Ok(())
    }

    async fn invalidate_user(&self, user_id: UserId) -> AppResult<()> {
        self.cache.remove(&user_id).await;
        Ok(())
    }

    async fn invalidate_all(&self) -> AppResult<()> {
        self.cache.clear().await;
        tracing::debug!("permission cache cleared");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::time::Duration;

    use vireo_application::PermissionCache;
    use vireo_core::UserId;
    use vireo_domain::PermissionCode;

    use super::InMemoryPermissionCache;

    fn codes() -> BTreeSet<PermissionCode> {
        match PermissionCode::try_from("sys:config:list".to_owned()) {
            Ok(code) => BTreeSet::from([code]),
            Err(error) => panic!("invalid test permission: {error}"),
        }
    }

    #[tokio::test]
    async fn user_invalidation_only_drops_that_user() {
        let cache = InMemoryPermissionCache::new();
        let ttl = Duration::from_secs(60);
        assert!(cache.set_permissions(UserId::new(1), codes(), ttl).await.is_ok());
        assert!(cache.set_permissions(UserId::new(2), codes(), ttl).await.is_ok());

        assert!(cache.invalidate_user(UserId::new(1)).await.is_ok());
        assert!(matches!(cache.get_permissions(UserId::new(1)).await, Ok(None)));
        assert!(matches!(cache.get_permissions(UserId::new(2)).await, Ok(Some(_))));

        assert!(cache.invalidate_all().await.is_ok());
        assert!(matches!(cache.get_permissions(UserId::new(2)).await, Ok(None)));
    }
}
