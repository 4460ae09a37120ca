use std::sync::Arc;

use vireo_core::{AppError, AppResult, DeptId, NonEmptyString};
use vireo_domain::{Department, DepartmentHierarchy, DepartmentStatus};

use crate::{
    DataScopeConfig, DepartmentInput, DepartmentListCache, DepartmentRepository, DepartmentUsage,
};

/// Filters for the department list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DepartmentListQuery {
    /// Case-insensitive substring matched against the name.
    pub keywords: Option<String>,
    /// Restricts the list to one status.
    pub status: Option<DepartmentStatus>,
}

/// Application service for department administration.
#[derive(Clone)]
pub struct DepartmentService {
    repository: Arc<dyn DepartmentRepository>,
    cache: Arc<dyn DepartmentListCache>,
    max_hierarchy_depth: usize,
}

impl DepartmentService {
    /// Creates a new department service.
    #[must_use]
    pub fn new(
        repository: Arc<dyn DepartmentRepository>,
        cache: Arc<dyn DepartmentListCache>,
        config: &DataScopeConfig,
    ) -> Self {
        Self {
            repository,
            cache,
            max_hierarchy_depth: config.max_hierarchy_depth(),
        }
    }

    /// Lists departments ordered by sort value, then identifier.
    pub async fn list_departments(&self, query: DepartmentListQuery) -> AppResult<Vec<Department>> {
        let keywords = query
            .keywords
            .as_deref()
            .map(str::trim)
            .filter(|keywords| !keywords.is_empty())
            .map(str::to_lowercase);

        let mut departments: Vec<Department> = self
            .repository
            .list_departments()
            .await?
            .into_iter()
            .filter(|department| {
                keywords
                    .as_deref()
                    .is_none_or(|keywords| department.name().to_lowercase().contains(keywords))
            })
            .filter(|department| query.status.is_none_or(|status| department.status() == status))
            .collect();

        departments.sort_by_key(|department| (department.sort(), department.id()));
        Ok(departments)
    }

    /// Returns one department.
    pub async fn get_department(&self, department_id: DeptId) -> AppResult<Department> {
        self.repository
            .find_department(department_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("department '{department_id}' does not exist"))
            })
    }

    /// Creates a department below an existing parent or as a root.
    pub async fn create_department(&self, input: DepartmentInput) -> AppResult<Department> {
        NonEmptyString::new(input.name.as_str())?;
        if let Some(parent_id) = input.parent_id {
            self.require_parent(parent_id).await?;
        }

        let department = self.repository.create_department(input).await?;
        tracing::info!(department_id = %department.id(), "department created");
        self.invalidate_cache().await;
        Ok(department)
    }

    /// Updates a department, rejecting moves that would close a cycle.
    pub async fn update_department(
        &self,
        department_id: DeptId,
        input: DepartmentInput,
    ) -> AppResult<Department> {
        NonEmptyString::new(input.name.as_str())?;
        if input.parent_id == Some(department_id) {
            return Err(AppError::Validation(
                "a department cannot be its own parent".to_owned(),
            ));
        }

        self.get_department(department_id).await?;
        if let Some(parent_id) = input.parent_id {
            self.require_parent(parent_id).await?;

            let hierarchy = DepartmentHierarchy::build(
                &self.repository.list_departments().await?,
                self.max_hierarchy_depth,
            );
            if hierarchy.would_create_cycle(department_id, Some(parent_id)) {
                return Err(AppError::Validation(format!(
                    "moving department '{department_id}' under '{parent_id}' would create a cycle"
                )));
            }
        }

        let department = self
            .repository
            .update_department(department_id, input)
            .await?;
        tracing::info!(department_id = %department_id, "department updated");
        self.invalidate_cache().await;
        Ok(department)
    }

    /// Deletes a department that nothing references any more.
    pub async fn delete_department(&self, department_id: DeptId) -> AppResult<()> {
        self.repository
            .delete_department(department_id, &ensure_department_deletable)
            .await?;
        tracing::info!(department_id = %department_id, "department deleted");
        self.invalidate_cache().await;
        Ok(())
    }

    async fn require_parent(&self, parent_id: DeptId) -> AppResult<()> {
        if self.repository.find_department(parent_id).await?.is_none() {
            return Err(AppError::Validation(format!(
                "parent department '{parent_id}' does not exist"
            )));
        }
        Ok(())
    }

    async fn invalidate_cache(&self) {
        if let Err(error) = self.cache.invalidate_departments().await {
            tracing::warn!(error = %error, "department cache invalidation failed");
        }
    }
}

/// Precondition checked before a department delete commits.
///
/// Reports the first reference that blocks the delete.
pub fn ensure_department_deletable(usage: &DepartmentUsage) -> AppResult<()> {
    let department_id = usage.department_id;
    if usage.child_departments > 0 {
        return Err(AppError::Conflict(format!(
            "department '{department_id}' still has {} child departments",
            usage.child_departments
        )));
    }
    if usage.member_users > 0 {
        return Err(AppError::Conflict(format!(
            "department '{department_id}' is the home department of {} users",
            usage.member_users
        )));
    }
    if usage.referencing_roles > 0 {
        return Err(AppError::Conflict(format!(
            "department '{department_id}' is referenced by {} custom role scopes",
            usage.referencing_roles
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests;
