//! Per-request resolution of a principal's effective data scope.

mod aggregation;

use std::sync::Arc;

use vireo_core::{AppResult, UserIdentity};
use vireo_domain::{
    DataScope, DataScopeError, DepartmentHierarchy, Principal, ScopeResolution,
};

use crate::{DataScopeConfig, DepartmentListCache, DepartmentRepository, PrincipalRepository};

/// Principal of one request together with its resolved data scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPrincipal {
    principal: Principal,
    resolution: ScopeResolution,
}

impl ResolvedPrincipal {
    /// Pairs a principal with its resolution.
    #[must_use]
    pub fn new(principal: Principal, resolution: ScopeResolution) -> Self {
        Self {
            principal,
            resolution,
        }
    }

    /// Returns the acting principal.
    #[must_use]
    pub fn principal(&self) -> &Principal {
        &self.principal
    }

    /// Returns the aggregated data scope.
    #[must_use]
    pub fn resolution(&self) -> &ScopeResolution {
        &self.resolution
    }
}

/// Application service that folds roles into a [`ScopeResolution`].
#[derive(Clone)]
pub struct DataScopeService {
    department_repository: Arc<dyn DepartmentRepository>,
    department_cache: Arc<dyn DepartmentListCache>,
    principal_repository: Arc<dyn PrincipalRepository>,
    config: DataScopeConfig,
}

impl DataScopeService {
    /// Creates a new data-scope service.
    #[must_use]
    pub fn new(
        department_repository: Arc<dyn DepartmentRepository>,
        department_cache: Arc<dyn DepartmentListCache>,
        principal_repository: Arc<dyn PrincipalRepository>,
        config: DataScopeConfig,
    ) -> Self {
        Self {
            department_repository,
            department_cache,
            principal_repository,
            config,
        }
    }

    /// Builds the department hierarchy index from the cached department list.
    ///
    /// A cache miss or unreadable cache falls back to the repository and
    /// repopulates the cache.
    pub async fn department_hierarchy(&self) -> AppResult<DepartmentHierarchy> {
        let cached = match self.department_cache.get_departments().await {
            Ok(cached) => cached,
            Err(error) => {
                tracing::warn!(error = %error, "department cache read failed");
                None
            }
        };

        let departments = match cached {
            Some(departments) => departments,
            None => {
                let departments = self.department_repository.list_departments().await?;
                if let Err(error) = self
                    .department_cache
                    .set_departments(departments.clone(), self.config.department_cache_ttl())
                    .await
                {
                    tracing::warn!(error = %error, "department cache write failed");
                }
                departments
            }
        };

        Ok(DepartmentHierarchy::build(
            &departments,
            self.config.max_hierarchy_depth(),
        ))
    }

    /// Resolves the effective scope and permitted departments of a principal.
    ///
    /// The hierarchy is only loaded when a department-and-below role needs
    /// it. A failed load degrades that role's contribution to nothing.
    pub async fn resolve(&self, principal: &Principal) -> Result<ScopeResolution, DataScopeError> {
        let roles = principal.roles();
        let needs_hierarchy = principal.home_department().is_some()
            && roles
                .iter()
                .any(|role| role.data_scope() == DataScope::DeptAndSub)
            && !roles.iter().any(|role| role.data_scope() == DataScope::All);

        let hierarchy = if needs_hierarchy {
            match self.department_hierarchy().await {
                Ok(hierarchy) => Some(hierarchy),
                Err(error) => {
                    tracing::warn!(
                        user_id = %principal.user_id(),
                        error = %error,
                        "department hierarchy unavailable, descendant scope degraded"
                    );
                    None
                }
            }
        } else {
            None
        };

        aggregation::aggregate(principal, hierarchy.as_ref())
    }

    /// Loads the principal behind an authenticated identity and resolves it.
    pub async fn resolve_request(
        &self,
        identity: Option<&UserIdentity>,
    ) -> Result<ResolvedPrincipal, DataScopeError> {
        let identity = identity.ok_or(DataScopeError::NoPrincipal)?;

        let principal = self
            .principal_repository
            .find_principal(identity.user_id())
            .await
            .map_err(|error| DataScopeError::PrincipalUnavailable(error.to_string()))?
            .ok_or(DataScopeError::NoPrincipal)?;

        let resolution = self.resolve(&principal).await?;
        tracing::debug!(
            user_id = %principal.user_id(),
            username = principal.username(),
            data_scope = resolution.effective_scope().as_str(),
            owner_only = resolution.departments().is_owner_only(),
            departments = ?resolution.departments().listed(),
            "data scope resolved"
        );
        Ok(ResolvedPrincipal::new(principal, resolution))
    }
}
