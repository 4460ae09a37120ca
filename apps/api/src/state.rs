use sqlx::PgPool;
use vireo_application::{
    AuthorizationService, DataScopeService, DepartmentService, RoleService, SystemConfigService,
};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub data_scope_service: DataScopeService,
    pub authorization_service: AuthorizationService,
    pub department_service: DepartmentService,
    pub role_service: RoleService,
    pub system_config_service: SystemConfigService,
    pub postgres_pool: PgPool,
    pub frontend_url: String,
}
