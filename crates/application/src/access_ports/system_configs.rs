use async_trait::async_trait;
use vireo_core::AppResult;
use vireo_domain::{RowOwnership, SystemConfig};

use crate::RowScope;

/// Input payload for system config creation and updates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemConfigInput {
    /// Unique lookup key.
    pub key: String,
    /// Display name.
    pub name: String,
    /// Stored value.
    pub value: String,
    /// Optional remark.
    pub remark: Option<String>,
}

/// Query parameters for paged config listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemConfigPageQuery {
    /// Optional substring matched against the config name.
    pub keywords: Option<String>,
    /// Maximum rows returned.
    pub limit: usize,
    /// Number of rows skipped.
    pub offset: usize,
}

/// One page of configs with the total visible count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemConfigPage {
    /// Rows of the requested page.
    pub items: Vec<SystemConfig>,
    /// Rows visible under the same filter, across all pages.
    pub total: u64,
}

/// Repository port for data-scoped system configs.
///
/// Every read, update and delete receives the row filter of the request and
/// must add it to the statement it executes.
#[async_trait]
pub trait SystemConfigRepository: Send + Sync {
    /// Inserts a config row with its owner columns.
    async fn create_config(
        &self,
        input: SystemConfigInput,
        ownership: RowOwnership,
    ) -> AppResult<SystemConfig>;

    /// Returns one page of visible configs.
    async fn page_configs(
        &self,
        query: SystemConfigPageQuery,
        scope: &dyn RowScope,
    ) -> AppResult<SystemConfigPage>;

    /// Returns one config when it exists and is visible.
    async fn find_config(
        &self,
        config_id: i64,
        scope: &dyn RowScope,
    ) -> AppResult<Option<SystemConfig>>;

    /// Updates a visible config, `None` when nothing matched.
    async fn update_config(
        &self,
        config_id: i64,
        input: SystemConfigInput,
        scope: &dyn RowScope,
    ) -> AppResult<Option<SystemConfig>>;

    /// Deletes a visible config, `false` when nothing matched.
    async fn delete_config(&self, config_id: i64, scope: &dyn RowScope) -> AppResult<bool>;
}
