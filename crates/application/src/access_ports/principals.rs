use async_trait::async_trait;
use vireo_core::{AppResult, UserId};
use vireo_domain::Principal;

/// Repository port that loads the acting user with roles attached.
#[async_trait]
pub trait PrincipalRepository: Send + Sync {
    /// Returns the user, home department and roles, `None` for unknown users.
    async fn find_principal(&self, user_id: UserId) -> AppResult<Option<Principal>>;
}
