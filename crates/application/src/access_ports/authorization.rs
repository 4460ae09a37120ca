use async_trait::async_trait;
use vireo_core::{AppResult, UserId};
use vireo_domain::PermissionCode;

/// Repository port for coarse-grained permission lookups.
#[async_trait]
pub trait AuthorizationRepository: Send + Sync {
    /// Lists the names of all roles attached to a user.
    async fn list_role_names_for_user(&self, user_id: UserId) -> AppResult<Vec<String>>;

    /// Lists the distinct permission codes granted through the user's roles.
    async fn list_permission_codes_for_user(
        &self,
        user_id: UserId,
    ) -> AppResult<Vec<PermissionCode>>;
}
