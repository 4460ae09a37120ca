use std::time::Duration;

use vireo_core::{AppError, AppResult};
use vireo_domain::DEFAULT_MAX_HIERARCHY_DEPTH;

/// Role name that bypasses row filtering and permission checks by default.
pub const DEFAULT_SUPER_ADMIN_ROLE: &str = "super_admin";

/// Default lifetime of the cached department list.
pub const DEFAULT_DEPARTMENT_CACHE_TTL: Duration = Duration::from_secs(5 * 60);

/// Default lifetime of cached permission codes.
pub const DEFAULT_PERMISSION_CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Settings consumed by the data-scope and RBAC layers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataScopeConfig {
    super_admin_role: String,
    max_hierarchy_depth: usize,
    department_cache_ttl: Duration,
    permission_cache_ttl: Duration,
}

impl DataScopeConfig {
    /// Creates a validated configuration.
    ///
    /// A blank super-admin role name falls back to [`DEFAULT_SUPER_ADMIN_ROLE`].
    pub fn new(
        super_admin_role: impl Into<String>,
        max_hierarchy_depth: usize,
        department_cache_ttl: Duration,
        permission_cache_ttl: Duration,
    ) -> AppResult<Self> {
        if max_hierarchy_depth == 0 {
            return Err(AppError::Validation(
                "department tree maximum depth must be at least 1".to_owned(),
            ));
        }

        let super_admin_role = super_admin_role.into();
        let super_admin_role = if super_admin_role.trim().is_empty() {
            DEFAULT_SUPER_ADMIN_ROLE.to_owned()
        } else {
            super_admin_role.trim().to_owned()
        };

        Ok(Self {
            super_admin_role,
            max_hierarchy_depth,
            department_cache_ttl,
            permission_cache_ttl,
        })
    }

    /// Returns the configured super-admin role name.
    #[must_use]
    pub fn super_admin_role(&self) -> &str {
        self.super_admin_role.as_str()
    }

    /// Returns the department traversal depth limit.
    #[must_use]
    pub fn max_hierarchy_depth(&self) -> usize {
        self.max_hierarchy_depth
    }

    /// Returns the department-list cache lifetime.
    #[must_use]
    pub fn department_cache_ttl(&self) -> Duration {
        self.department_cache_ttl
    }

    /// Returns the permission cache lifetime.
    #[must_use]
    pub fn permission_cache_ttl(&self) -> Duration {
        self.permission_cache_ttl
    }
}

impl Default for DataScopeConfig {
    fn default() -> Self {
        Self {
            super_admin_role: DEFAULT_SUPER_ADMIN_ROLE.to_owned(),
            max_hierarchy_depth: DEFAULT_MAX_HIERARCHY_DEPTH,
            department_cache_ttl: DEFAULT_DEPARTMENT_CACHE_TTL,
            permission_cache_ttl: DEFAULT_PERMISSION_CACHE_TTL,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{DEFAULT_SUPER_ADMIN_ROLE, DataScopeConfig};

    #[test]
    fn blank_super_admin_role_falls_back_to_default() {
        let config = DataScopeConfig::new("  ", 10, Duration::ZERO, Duration::ZERO);
        assert!(matches!(
            config,
            Ok(ref config) if config.super_admin_role() == DEFAULT_SUPER_ADMIN_ROLE
        ));
    }

    #[test]
    fn zero_depth_is_rejected() {
        assert!(DataScopeConfig::new("root", 0, Duration::ZERO, Duration::ZERO).is_err());
    }

    #[test]
    fn defaults_match_documented_values() {
        let config = DataScopeConfig::default();
        assert_eq!(config.max_hierarchy_depth(), 10);
        assert_eq!(config.department_cache_ttl(), Duration::from_secs(300));
    }
}
