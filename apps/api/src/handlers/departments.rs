use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use vireo_core::DeptId;

use crate::dto::{DepartmentListParams, DepartmentResponse, SaveDepartmentRequest};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_departments_handler(
    State(state): State<AppState>,
    Query(params): Query<DepartmentListParams>,
) -> ApiResult<Json<Vec<DepartmentResponse>>> {
    let departments = state
        .department_service
        .list_departments(params.into_query()?)
        .await?
        .into_iter()
        .map(DepartmentResponse::from)
        .collect();

    Ok(Json(departments))
}

pub async fn get_department_handler(
    State(state): State<AppState>,
    Path(department_id): Path<i64>,
) -> ApiResult<Json<DepartmentResponse>> {
    let department = state
        .department_service
        .get_department(DeptId::parse_positive(department_id)?)
        .await?;

    Ok(Json(DepartmentResponse::from(department)))
}

pub async fn create_department_handler(
    State(state): State<AppState>,
    Json(payload): Json<SaveDepartmentRequest>,
) -> ApiResult<(StatusCode, Json<DepartmentResponse>)> {
    let department = state
        .department_service
        .create_department(payload.into_input()?)
        .await?;

    Ok((StatusCode::CREATED, Json(DepartmentResponse::from(department))))
}

pub async fn update_department_handler(
    State(state): State<AppState>,
    Path(department_id): Path<i64>,
    Json(payload): Json<SaveDepartmentRequest>,
) -> ApiResult<Json<DepartmentResponse>> {
    let department = state
        .department_service
        .update_department(DeptId::parse_positive(department_id)?, payload.into_input()?)
        .await?;

    Ok(Json(DepartmentResponse::from(department)))
}

pub async fn delete_department_handler(
    State(state): State<AppState>,
    Path(department_id): Path<i64>,
) -> ApiResult<StatusCode> {
    state
        .department_service
        .delete_department(DeptId::parse_positive(department_id)?)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
