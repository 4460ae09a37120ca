use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use vireo_application::DataScopeContext;

use crate::dto::{ConfigListParams, ConfigPageResponse, ConfigResponse, SaveConfigRequest};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_configs_handler(
    State(state): State<AppState>,
    Extension(context): Extension<DataScopeContext>,
    Query(params): Query<ConfigListParams>,
) -> ApiResult<Json<ConfigPageResponse>> {
    let page = state
        .system_config_service
        .page_configs(&context, params.keywords, params.page_num, params.page_size)
        .await?;

    Ok(Json(ConfigPageResponse::from(page)))
}

pub async fn get_config_handler(
    State(state): State<AppState>,
    Extension(context): Extension<DataScopeContext>,
    Path(config_id): Path<i64>,
) -> ApiResult<Json<ConfigResponse>> {
    let config = state
        .system_config_service
        .get_config(&context, config_id)
        .await?;

    Ok(Json(ConfigResponse::from(config)))
}

pub async fn create_config_handler(
    State(state): State<AppState>,
    Extension(context): Extension<DataScopeContext>,
    Json(payload): Json<SaveConfigRequest>,
) -> ApiResult<(StatusCode, Json<ConfigResponse>)> {
    let config = state
        .system_config_service
        .create_config(&context, payload.into())
        .await?;

    Ok((StatusCode::CREATED, Json(ConfigResponse::from(config))))
}

pub async fn update_config_handler(
    State(state): State<AppState>,
    Extension(context): Extension<DataScopeContext>,
    Path(config_id): Path<i64>,
    Json(payload): Json<SaveConfigRequest>,
) -> ApiResult<Json<ConfigResponse>> {
    let config = state
        .system_config_service
        .update_config(&context, config_id, payload.into())
        .await?;

    Ok(Json(ConfigResponse::from(config)))
}

pub async fn delete_config_handler(
    State(state): State<AppState>,
    Extension(context): Extension<DataScopeContext>,
    Path(config_id): Path<i64>,
) -> ApiResult<StatusCode> {
    state
        .system_config_service
        .delete_config(&context, config_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
