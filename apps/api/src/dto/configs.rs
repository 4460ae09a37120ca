use serde::{Deserialize, Serialize};
use vireo_application::{SystemConfigInput, SystemConfigPage};
use vireo_domain::SystemConfig;

/// Query parameters of the config list.
///
/// `deptId` is read by the data-scope layer, not here.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigListParams {
    pub keywords: Option<String>,
    pub page_num: Option<usize>,
    pub page_size: Option<usize>,
}

/// Incoming payload for config create and update.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveConfigRequest {
    pub config_key: String,
    pub config_name: String,
    pub config_value: String,
    pub remark: Option<String>,
}

impl From<SaveConfigRequest> for SystemConfigInput {
    fn from(request: SaveConfigRequest) -> Self {
        Self {
            key: request.config_key,
            name: request.config_name,
            value: request.config_value,
            remark: request.remark,
        }
    }
}

/// API representation of a system config.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigResponse {
    pub id: i64,
    pub config_key: String,
    pub config_name: String,
    pub config_value: String,
    pub remark: Option<String>,
    pub creator_id: i64,
    pub dept_id: Option<i64>,
}

impl From<SystemConfig> for ConfigResponse {
    fn from(config: SystemConfig) -> Self {
        let ownership = config.ownership();
        Self {
            id: config.id(),
            config_key: config.key().to_owned(),
            config_name: config.name().to_owned(),
            config_value: config.value().to_owned(),
            remark: config.remark().map(str::to_owned),
            creator_id: ownership.creator_id().as_i64(),
            dept_id: ownership.dept_id().map(|department| department.as_i64()),
        }
    }
}

/// One page of configs.
#[derive(Debug, Serialize)]
pub struct ConfigPageResponse {
    pub items: Vec<ConfigResponse>,
    pub total: u64,
}

impl From<SystemConfigPage> for ConfigPageResponse {
    fn from(page: SystemConfigPage) -> Self {
        Self {
            items: page.items.into_iter().map(ConfigResponse::from).collect(),
            total: page.total,
        }
    }
}
