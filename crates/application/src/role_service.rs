use std::collections::BTreeSet;
use std::sync::Arc;

use vireo_core::{AppError, AppResult, NonEmptyString, RoleId, UserId};
use vireo_domain::{DataScope, PermissionCode, Role};

use crate::{AuthorizationService, RoleInput, RoleRepository, RoleUsage};

/// Application service for roles, their data scope and their grants.
#[derive(Clone)]
pub struct RoleService {
    repository: Arc<dyn RoleRepository>,
    authorization_service: AuthorizationService,
}

impl RoleService {
    /// Creates a new role service.
    #[must_use]
    pub fn new(
        repository: Arc<dyn RoleRepository>,
        authorization_service: AuthorizationService,
    ) -> Self {
        Self {
            repository,
            authorization_service,
        }
    }

    /// Lists all roles.
    pub async fn list_roles(&self) -> AppResult<Vec<Role>> {
        self.repository.list_roles().await
    }

    /// Returns one role.
    pub async fn get_role(&self, role_id: RoleId) -> AppResult<Role> {
        self.require_role(role_id).await
    }

    /// Lists the permission codes granted by a role.
    pub async fn list_role_permissions(
        &self,
        role_id: RoleId,
    ) -> AppResult<BTreeSet<PermissionCode>> {
        self.require_role(role_id).await?;
        self.repository.list_role_permissions(role_id).await
    }

    /// Creates a role with a unique name and code.
    pub async fn create_role(&self, input: RoleInput) -> AppResult<Role> {
        let input = normalize(input)?;
        self.ensure_unique(&input, None).await?;

        let role = self.repository.create_role(input).await?;
        tracing::info!(
            role_id = %role.id(),
            data_scope = role.data_scope().as_str(),
            "role created"
        );
        Ok(role)
    }

    /// Updates a role's name, code and data scope.
    pub async fn update_role(&self, role_id: RoleId, input: RoleInput) -> AppResult<Role> {
        let input = normalize(input)?;
        self.require_role(role_id).await?;
        self.ensure_unique(&input, Some(role_id)).await?;

        let role = self.repository.update_role(role_id, input).await?;
        tracing::info!(
            role_id = %role_id,
            data_scope = role.data_scope().as_str(),
            "role updated"
        );
        Ok(role)
    }

    /// Replaces the permission codes granted by a role.
    pub async fn replace_role_permissions(
        &self,
        role_id: RoleId,
        permissions: BTreeSet<PermissionCode>,
    ) -> AppResult<()> {
        self.require_role(role_id).await?;
        self.repository
            .replace_role_permissions(role_id, permissions)
            .await?;
        tracing::info!(role_id = %role_id, "role permissions replaced");
        self.authorization_service.invalidate_all().await;
        Ok(())
    }

    /// Deletes a role that no user holds any more.
    pub async fn delete_role(&self, role_id: RoleId) -> AppResult<()> {
        self.repository
            .delete_role(role_id, &ensure_role_deletable)
            .await?;
        tracing::info!(role_id = %role_id, "role deleted");
        self.authorization_service.invalidate_all().await;
        Ok(())
    }

    /// Replaces the roles of a user. A user keeps at least one role.
    pub async fn assign_roles(&self, user_id: UserId, role_ids: BTreeSet<RoleId>) -> AppResult<()> {
        if role_ids.is_empty() {
            return Err(AppError::Validation(
                "a user must keep at least one role".to_owned(),
            ));
        }

        let known: BTreeSet<RoleId> = self
            .repository
            .list_roles()
            .await?
            .iter()
            .map(Role::id)
            .collect();
        if let Some(unknown) = role_ids.iter().find(|role_id| !known.contains(role_id)) {
            return Err(AppError::NotFound(format!("role '{unknown}' does not exist")));
        }

        self.repository.replace_user_roles(user_id, role_ids).await?;
        tracing::info!(user_id = %user_id, "user roles replaced");
        self.authorization_service.invalidate_user(user_id).await;
        Ok(())
    }

    async fn require_role(&self, role_id: RoleId) -> AppResult<Role> {
        self.repository
            .find_role(role_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("role '{role_id}' does not exist")))
    }

    async fn ensure_unique(&self, input: &RoleInput, current: Option<RoleId>) -> AppResult<()> {
        for role in self.repository.list_roles().await? {
            if Some(role.id()) == current {
                continue;
            }
            if role.name() == input.name {
                return Err(AppError::Conflict(format!(
                    "role name '{}' is already taken",
                    input.name
                )));
            }
            if role.code() == input.code {
                return Err(AppError::Conflict(format!(
                    "role code '{}' is already taken",
                    input.code
                )));
            }
        }
        Ok(())
    }
}

fn normalize(input: RoleInput) -> AppResult<RoleInput> {
    let name = NonEmptyString::new(input.name.trim())?;
    let code = NonEmptyString::new(input.code.trim())?;
    let custom_departments = if input.data_scope == DataScope::Custom {
        input.custom_departments
    } else {
        BTreeSet::new()
    };

    Ok(RoleInput {
        name: name.as_str().to_owned(),
        code: code.as_str().to_owned(),
        data_scope: input.data_scope,
        custom_departments,
    })
}

/// Precondition checked before a role delete commits.
pub fn ensure_role_deletable(usage: &RoleUsage) -> AppResult<()> {
    if usage.assigned_users > 0 {
        return Err(AppError::Conflict(format!(
            "role '{}' is still assigned to {} users",
            usage.role_id, usage.assigned_users
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests;
