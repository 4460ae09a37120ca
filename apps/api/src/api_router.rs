use axum::Router;
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{MethodRouter, delete, get, post, put};
use tower_http::trace::TraceLayer;
use tower_sessions::SessionManagerLayer;
use tower_sessions_sqlx_store::PostgresStore;
use vireo_core::AppError;

use crate::handlers::{configs, departments, health, roles};
use crate::middleware::{self, PermissionGate};
use crate::permissions;
use crate::state::AppState;

mod cors;

pub fn build_router(
    app_state: AppState,
    session_layer: SessionManagerLayer<PostgresStore>,
) -> Result<Router, AppError> {
    let protected_routes = api_routes(&app_state)?
        .route_layer(from_fn(middleware::require_auth))
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_same_origin_for_mutations,
        ));

    let cors_layer = cors::build_cors_layer(&app_state.frontend_url)?;

    Ok(Router::new()
        .route("/health", get(health::health_handler))
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .layer(session_layer)
        .with_state(app_state))
}

/// Routes that need a signed-in identity, each method behind its RBAC gate.
fn api_routes(app_state: &AppState) -> Result<Router<AppState>, AppError> {
    let guard = RouteGuard { state: app_state };

    let administration_routes = Router::new()
        .route(
            "/api/departments",
            guard
                .method(
                    get(departments::list_departments_handler),
                    &[permissions::DEPT_QUERY],
                )?
                .merge(guard.method(
                    post(departments::create_department_handler),
                    &[permissions::DEPT_ADD],
                )?),
        )
        .route(
            "/api/departments/{department_id}",
            guard
                .method(
                    get(departments::get_department_handler),
                    &[permissions::DEPT_VIEW],
                )?
                .merge(guard.method(
                    put(departments::update_department_handler),
                    &[permissions::DEPT_EDIT],
                )?)
                .merge(guard.method(
                    delete(departments::delete_department_handler),
                    &[permissions::DEPT_DELETE],
                )?),
        )
        .route(
            "/api/roles",
            guard
                .method(get(roles::list_roles_handler), &[permissions::ROLE_QUERY])?
                .merge(guard.method(post(roles::create_role_handler), &[permissions::ROLE_ADD])?),
        )
        .route(
            "/api/roles/{role_id}",
            guard
                .method(get(roles::get_role_handler), &[permissions::ROLE_DETAIL])?
                .merge(guard.method(put(roles::update_role_handler), &[permissions::ROLE_EDIT])?)
                .merge(guard.method(
                    delete(roles::delete_role_handler),
                    &[permissions::ROLE_DELETE],
                )?),
        )
        .route(
            "/api/roles/{role_id}/permissions",
            guard
                .method(
                    get(roles::list_role_permissions_handler),
                    &[permissions::ROLE_PERMISSION_VIEW],
                )?
                .merge(guard.method(
                    put(roles::replace_role_permissions_handler),
                    &[permissions::ROLE_PERMISSION_UPDATE],
                )?),
        )
        .route(
            "/api/users/{user_id}/roles",
            guard.method(
                put(roles::assign_user_roles_handler),
                &[permissions::USER_ROLE_UPDATE],
            )?,
        );

    let scoped_routes = Router::new()
        .route(
            "/api/configs",
            guard
                .scoped_method(get(configs::list_configs_handler), &[permissions::CONFIG_QUERY])?
                .merge(guard.scoped_method(
                    post(configs::create_config_handler),
                    &[permissions::CONFIG_ADD],
                )?),
        )
        .route(
            "/api/configs/{config_id}",
            guard
                .scoped_method(get(configs::get_config_handler), &[permissions::CONFIG_VIEW])?
                .merge(guard.scoped_method(
                    put(configs::update_config_handler),
                    &[permissions::CONFIG_UPDATE],
                )?)
                .merge(guard.scoped_method(
                    delete(configs::delete_config_handler),
                    &[permissions::CONFIG_DELETE],
                )?),
        );

    Ok(administration_routes.merge(scoped_routes))
}

/// Attaches the RBAC gate, and optionally row filtering, to single route methods.
struct RouteGuard<'a> {
    state: &'a AppState,
}

impl RouteGuard<'_> {
    fn method(
        &self,
        method_router: MethodRouter<AppState>,
        codes: &[&str],
    ) -> Result<MethodRouter<AppState>, AppError> {
        let gate = PermissionGate::new(self.state.authorization_service.clone(), codes)?;
        Ok(method_router.route_layer(from_fn_with_state(gate, middleware::require_permissions)))
    }

    /// Like [`Self::method`], with data-scope resolution running after the
    /// gate has passed.
    fn scoped_method(
        &self,
        method_router: MethodRouter<AppState>,
        codes: &[&str],
    ) -> Result<MethodRouter<AppState>, AppError> {
        self.method(
            method_router.route_layer(from_fn_with_state(
                self.state.clone(),
                middleware::enforce_data_scope,
            )),
            codes,
        )
    }
}
