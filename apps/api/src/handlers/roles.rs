use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use vireo_core::{RoleId, UserId};

use crate::dto::{
    AssignUserRolesRequest, ReplaceRolePermissionsRequest, RolePermissionsResponse, RoleResponse,
    SaveRoleRequest,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_roles_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<RoleResponse>>> {
    let roles = state
        .role_service
        .list_roles()
        .await?
        .into_iter()
        .map(RoleResponse::from)
        .collect();

    Ok(Json(roles))
}

pub async fn create_role_handler(
    State(state): State<AppState>,
    Json(payload): Json<SaveRoleRequest>,
) -> ApiResult<(StatusCode, Json<RoleResponse>)> {
    let role = state.role_service.create_role(payload.into_input()?).await?;
    Ok((StatusCode::CREATED, Json(RoleResponse::from(role))))
}

pub async fn get_role_handler(
    State(state): State<AppState>,
    Path(role_id): Path<i64>,
) -> ApiResult<Json<RoleResponse>> {
    let role = state
        .role_service
        .get_role(RoleId::parse_positive(role_id)?)
        .await?;

    Ok(Json(RoleResponse::from(role)))
}

pub async fn update_role_handler(
    State(state): State<AppState>,
    Path(role_id): Path<i64>,
    Json(payload): Json<SaveRoleRequest>,
) -> ApiResult<Json<RoleResponse>> {
    let role = state
        .role_service
        .update_role(RoleId::parse_positive(role_id)?, payload.into_input()?)
        .await?;

    Ok(Json(RoleResponse::from(role)))
}

pub async fn delete_role_handler(
    State(state): State<AppState>,
    Path(role_id): Path<i64>,
) -> ApiResult<StatusCode> {
    state
        .role_service
        .delete_role(RoleId::parse_positive(role_id)?)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_role_permissions_handler(
    State(state): State<AppState>,
    Path(role_id): Path<i64>,
) -> ApiResult<Json<RolePermissionsResponse>> {
    let permissions = state
        .role_service
        .list_role_permissions(RoleId::parse_positive(role_id)?)
        .await?;

    Ok(Json(RolePermissionsResponse::from(permissions)))
}

pub async fn replace_role_permissions_handler(
    State(state): State<AppState>,
    Path(role_id): Path<i64>,
    Json(payload): Json<ReplaceRolePermissionsRequest>,
) -> ApiResult<StatusCode> {
    state
        .role_service
        .replace_role_permissions(RoleId::parse_positive(role_id)?, payload.into_codes()?)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn assign_user_roles_handler(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Json(payload): Json<AssignUserRolesRequest>,
) -> ApiResult<StatusCode> {
    state
        .role_service
        .assign_roles(UserId::parse_positive(user_id)?, payload.into_role_ids()?)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
