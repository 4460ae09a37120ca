use std::sync::Arc;

use axum::extract::{Query, Request, State};
use axum::http::{HeaderValue, Method, header};
use axum::middleware::Next;
use axum::response::Response;
use serde::Deserialize;
use tower_sessions::Session;
use vireo_application::{AuthorizationService, DataScopeContext, ScopeRequest};
use vireo_core::{AppError, AppResult, UserIdentity};
use vireo_domain::PermissionCode;

use crate::error::ApiResult;
use crate::state::AppState;

/// Session key under which the sign-in flow stores the [`UserIdentity`].
pub const SESSION_USER_KEY: &str = "user_identity";

pub async fn require_auth(
    session: Session,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    let identity = session
        .get::<UserIdentity>(SESSION_USER_KEY)
        .await
        .map_err(|error| AppError::Internal(format!("failed to read session identity: {error}")))?
        .ok_or_else(|| AppError::Unauthorized("authentication required".to_owned()))?;

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

/// Rejects state-changing requests that do not come from the frontend origin.
pub async fn require_same_origin_for_mutations(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> ApiResult<Response> {
    if is_state_changing_method(request.method()) {
        let headers = request.headers();

        if headers.get("sec-fetch-site") == Some(&HeaderValue::from_static("cross-site")) {
            return Err(AppError::Unauthorized("cross-site request blocked".to_owned()).into());
        }

        let origin = headers
            .get(header::ORIGIN)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();
        let referer = headers
            .get(header::REFERER)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();

        let allowed_origin = state.frontend_url.as_str();
        if origin != allowed_origin && !referer.starts_with(allowed_origin) {
            tracing::warn!(
                method = %request.method(),
                path = request.uri().path(),
                origin,
                "mutation from foreign origin rejected"
            );
            return Err(AppError::Unauthorized("origin validation failed".to_owned()).into());
        }
    }

    Ok(next.run(request).await)
}

fn is_state_changing_method(method: &Method) -> bool {
    matches!(
        *method,
        Method::POST | Method::PUT | Method::PATCH | Method::DELETE
    )
}

/// Permission codes one route method declares, checked before its handler.
#[derive(Clone)]
pub struct PermissionGate {
    authorization_service: AuthorizationService,
    required: Arc<[PermissionCode]>,
}

impl PermissionGate {
    pub fn new(authorization_service: AuthorizationService, codes: &[&str]) -> AppResult<Self> {
        let required = codes
            .iter()
            .map(|code| PermissionCode::new(*code))
            .collect::<AppResult<Vec<_>>>()?;

        Ok(Self {
            authorization_service,
            required: required.into(),
        })
    }
}

pub async fn require_permissions(
    State(gate): State<PermissionGate>,
    request: Request,
    next: Next,
) -> ApiResult<Response> {
    let user_id = request
        .extensions()
        .get::<UserIdentity>()
        .map(UserIdentity::user_id)
        .ok_or_else(|| AppError::Unauthorized("authentication required".to_owned()))?;

    gate.authorization_service
        .authorize(user_id, &gate.required)
        .await?;

    Ok(next.run(request).await)
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DataScopeParams {
    dept_id: Option<String>,
}

/// Opts a route into row filtering.
///
/// Resolution failures are not rejected here; they travel in the context and
/// turn into a deny-all predicate when the query is built.
pub async fn enforce_data_scope(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let params = Query::<DataScopeParams>::try_from_uri(request.uri())
        .map(|Query(params)| params)
        .unwrap_or_default();
    let scope_request =
        ScopeRequest::enforced(ScopeRequest::parse_override(params.dept_id.as_deref()));

    let identity = request.extensions().get::<UserIdentity>().cloned();
    let principal = state
        .data_scope_service
        .resolve_request(identity.as_ref())
        .await;
    if let Err(error) = &principal {
        tracing::warn!(
            error = %error,
            user_id = ?identity.as_ref().map(UserIdentity::user_id),
            "data scope resolution failed"
        );
    }

    request
        .extensions_mut()
        .insert(DataScopeContext::new(principal, scope_request));
    next.run(request).await
}
