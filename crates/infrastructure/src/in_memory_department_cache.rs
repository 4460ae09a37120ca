use std::time::Duration;

use async_trait::async_trait;
use vireo_application::DepartmentListCache;
use vireo_core::AppResult;
use vireo_domain::Department;

use crate::ttl_cache::{Clock, SystemClock, TtlCache};

/// Process-local cache adapter for the department list.
#[derive(Debug)]
pub struct InMemoryDepartmentListCache<C = SystemClock> {
    cache: TtlCache<(), Vec<Department>, C>,
}

impl InMemoryDepartmentListCache {
    /// Creates an empty cache on the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for InMemoryDepartmentListCache {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> InMemoryDepartmentListCache<C> {
    /// Creates an empty cache on the given clock.
    #[must_use]
    pub fn with_clock(clock: C) -> Self {
        Self {
            cache: TtlCache::with_clock(clock),
        }
    }
}

#[async_trait]
impl<C: Clock> DepartmentListCache for InMemoryDepartmentListCache<C> {
    async fn get_departments(&self) -> AppResult<Option<Vec<Department>>> {
        Ok(self.cache.get(&()).await)
    }

    async fn set_departments(&self, departments: Vec<Department>, ttl: Duration) -> AppResult<()> {
        self.cache.insert((), departments, ttl).await;
        Ok(())
    }

    async fn invalidate_departments(&self) -> AppResult<()> {
        self.cache.clear().await;
        tracing::debug!("department list cache invalidated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use vireo_application::DepartmentListCache;
    use vireo_core::DeptId;
    use vireo_domain::{Department, DepartmentStatus};

    use super::InMemoryDepartmentListCache;
    use crate::ttl_cache::ManualClock;

    fn departments() -> Vec<Department> {
        match Department::new(
            DeptId::new(1),
            None,
            "Head office",
            "HQ",
            DepartmentStatus::Enabled,
            0,
        ) {
            Ok(department) => vec![department],
            Err(error) => panic!("invalid test department: {error}"),
        }
    }

    #[tokio::test]
    async fn list_expires_after_ttl() {
        let cache = InMemoryDepartmentListCache::with_clock(ManualClock::new());
        assert!(
            cache
                .set_departments(departments(), Duration::from_secs(300))
                .await
                .is_ok()
        );
        assert!(matches!(cache.get_departments().await, Ok(Some(ref list)) if list.len() == 1));

        cache.cache.clock().advance(Duration::from_secs(300));
        assert!(matches!(cache.get_departments().await, Ok(None)));
    }

    #[tokio::test]
    async fn invalidation_drops_the_list() {
        let cache = InMemoryDepartmentListCache::new();
        assert!(
            cache
                .set_departments(departments(), Duration::from_secs(300))
                .await
                .is_ok()
        );
        assert!(cache.invalidate_departments().await.is_ok());
        assert!(matches!(cache.get_departments().await, Ok(None)));
    }
}
