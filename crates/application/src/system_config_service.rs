use std::sync::Arc;

use vireo_core::{AppError, AppResult, NonEmptyString};
use vireo_domain::{RowOwnership, SystemConfig};

use crate::{
    DataScopeContext, QueryScopeFilter, RequestScope, SystemConfigInput, SystemConfigPage,
    SystemConfigPageQuery, SystemConfigRepository,
};

/// Page size used when the request does not name one.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Largest page size a request may ask for.
pub const MAX_PAGE_SIZE: usize = 100;

/// Application service for data-scoped system configs.
///
/// Every read, update and delete carries the request's row filter; a row
/// hidden by it is reported as missing.
#[derive(Clone)]
pub struct SystemConfigService {
    repository: Arc<dyn SystemConfigRepository>,
    filter: QueryScopeFilter,
}

impl SystemConfigService {
    /// Creates a new system config service.
    #[must_use]
    pub fn new(repository: Arc<dyn SystemConfigRepository>, filter: QueryScopeFilter) -> Self {
        Self { repository, filter }
    }

    /// Creates a config owned by the acting principal.
    pub async fn create_config(
        &self,
        context: &DataScopeContext,
        input: SystemConfigInput,
    ) -> AppResult<SystemConfig> {
        let resolved = context.principal().map_err(|error| AppError::from(error.clone()))?;
        let input = normalize(input)?;
        let ownership = RowOwnership::stamped_by(resolved.principal());

        let config = self.repository.create_config(input, ownership).await?;
        tracing::info!(
            config_id = config.id(),
            user_id = %ownership.creator_id(),
            "system config created"
        );
        Ok(config)
    }

    /// Returns one page of configs visible to the request.
    ///
    /// `page_num` starts at 1; missing or zero values fall back to the first
    /// page and [`DEFAULT_PAGE_SIZE`].
    pub async fn page_configs(
        &self,
        context: &DataScopeContext,
        keywords: Option<String>,
        page_num: Option<usize>,
        page_size: Option<usize>,
    ) -> AppResult<SystemConfigPage> {
        let page_num = page_num.filter(|value| *value > 0).unwrap_or(1);
        let page_size = page_size
            .filter(|value| *value > 0)
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .min(MAX_PAGE_SIZE);
        let query = SystemConfigPageQuery {
            keywords: keywords
                .map(|keywords| keywords.trim().to_owned())
                .filter(|keywords| !keywords.is_empty()),
            limit: page_size,
            offset: (page_num - 1).saturating_mul(page_size),
        };

        self.repository
            .page_configs(query, &self.scope(context))
            .await
    }

    /// Returns one visible config.
    pub async fn get_config(
        &self,
        context: &DataScopeContext,
        config_id: i64,
    ) -> AppResult<SystemConfig> {
        self.repository
            .find_config(config_id, &self.scope(context))
            .await?
            .ok_or_else(|| not_found(config_id))
    }

    /// Updates key, name, value and remark of a visible config.
    ///
    /// Owner columns are never changed.
    pub async fn update_config(
        &self,
        context: &DataScopeContext,
        config_id: i64,
        input: SystemConfigInput,
    ) -> AppResult<SystemConfig> {
        let input = normalize(input)?;
        let config = self
            .repository
            .update_config(config_id, input, &self.scope(context))
            .await?
            .ok_or_else(|| not_found(config_id))?;
        tracing::info!(config_id, "system config updated");
        Ok(config)
    }

    /// Deletes a visible config.
    pub async fn delete_config(&self, context: &DataScopeContext, config_id: i64) -> AppResult<()> {
        if !self
            .repository
            .delete_config(config_id, &self.scope(context))
            .await?
        {
            return Err(not_found(config_id));
        }
        tracing::info!(config_id, "system config deleted");
        Ok(())
    }

    fn scope<'a>(&'a self, context: &'a DataScopeContext) -> RequestScope<'a> {
        RequestScope::new(&self.filter, context)
    }
}

fn normalize(input: SystemConfigInput) -> AppResult<SystemConfigInput> {
    let key = NonEmptyString::new(input.key.trim())?;
    Ok(SystemConfigInput {
        key: key.as_str().to_owned(),
        name: input.name.trim().to_owned(),
        value: input.value,
        remark: input
            .remark
            .map(|remark| remark.trim().to_owned())
            .filter(|remark| !remark.is_empty()),
    })
}

fn not_found(config_id: i64) -> AppError {
    AppError::NotFound(format!("system config '{config_id}' does not exist"))
}
