use std::sync::Arc;

use sqlx::PgPool;
use vireo_application::{
    AuthorizationService, DataScopeService, DepartmentService, QueryScopeFilter, RoleService,
    SystemConfigService,
};
use vireo_infrastructure::{
    InMemoryDepartmentListCache, InMemoryPermissionCache, PostgresAuthorizationRepository,
    PostgresDepartmentRepository, PostgresPrincipalRepository, PostgresRoleRepository,
    PostgresSystemConfigRepository,
};

use crate::api_config::ApiConfig;
use crate::state::AppState;

pub fn build_app_state(pool: PgPool, config: &ApiConfig) -> AppState {
    let department_repository = Arc::new(PostgresDepartmentRepository::new(pool.clone()));
    let department_cache = Arc::new(InMemoryDepartmentListCache::new());
    let permission_cache = Arc::new(InMemoryPermissionCache::new());

    let authorization_service = AuthorizationService::new(
        Arc::new(PostgresAuthorizationRepository::new(pool.clone())),
        permission_cache,
        &config.data_scope,
    );

    AppState {
        data_scope_service: DataScopeService::new(
            department_repository.clone(),
            department_cache.clone(),
            Arc::new(PostgresPrincipalRepository::new(pool.clone())),
            config.data_scope.clone(),
        ),
        department_service: DepartmentService::new(
            department_repository,
            department_cache,
            &config.data_scope,
        ),
        role_service: RoleService::new(
            Arc::new(PostgresRoleRepository::new(pool.clone())),
            authorization_service.clone(),
        ),
        system_config_service: SystemConfigService::new(
            Arc::new(PostgresSystemConfigRepository::new(pool.clone())),
            QueryScopeFilter::new(&config.data_scope),
        ),
        authorization_service,
        postgres_pool: pool,
        frontend_url: config.frontend_url.clone(),
    }
}
