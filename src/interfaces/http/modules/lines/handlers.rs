//! Line and section REST API handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};

use super::dto::{
    AddSectionRequest, CreateLineRequest, DeleteSectionQuery, LineResponse, UpdateLineRequest,
};
use crate::application::LineService;
use crate::interfaces::http::common::{error_response, ApiResponse, ApiResult, ValidatedJson};

#[derive(Clone)]
pub struct LineState {
    pub service: Arc<LineService>,
}

#[utoipa::path(
    post,
    path = "/api/v1/lines",
    tag = "Lines",
    request_body = CreateLineRequest,
    responses(
        (status = 201, description = "Created", body = ApiResponse<LineResponse>),
        (status = 400, description = "Invalid line"),
        (status = 404, description = "Unknown station"),
        (status = 422, description = "Field validation failed")
    )
)]
pub async fn create_line(
    State(state): State<LineState>,
    ValidatedJson(req): ValidatedJson<CreateLineRequest>,
) -> ApiResult<impl IntoResponse> {
    let line = state
        .service
        .create_line(req.into())
        .await
        .map_err(error_response)?;
    let location = format!("/api/v1/lines/{}", line.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(ApiResponse::success(LineResponse::from(line))),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/lines",
    tag = "Lines",
    responses(
        (status = 200, description = "Line list", body = ApiResponse<Vec<LineResponse>>)
    )
)]
pub async fn list_lines(
    State(state): State<LineState>,
) -> ApiResult<Json<ApiResponse<Vec<LineResponse>>>> {
    let lines = state.service.find_all_lines().await.map_err(error_response)?;
    Ok(Json(ApiResponse::success(
        lines.into_iter().map(Into::into).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/lines/{id}",
    tag = "Lines",
    params(("id" = i32, Path, description = "Line ID")),
    responses(
        (status = 200, description = "Line", body = ApiResponse<LineResponse>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_line(
    State(state): State<LineState>,
    Path(id): Path<i32>,
) -> ApiResult<Json<ApiResponse<LineResponse>>> {
    let line = state.service.find_line(id).await.map_err(error_response)?;
    Ok(Json(ApiResponse::success(line.into())))
}

#[utoipa::path(
    put,
    path = "/api/v1/lines/{id}",
    tag = "Lines",
    params(("id" = i32, Path, description = "Line ID")),
    request_body = UpdateLineRequest,
    responses(
        (status = 200, description = "Updated", body = ApiResponse<LineResponse>),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_line(
    State(state): State<LineState>,
    Path(id): Path<i32>,
    ValidatedJson(req): ValidatedJson<UpdateLineRequest>,
) -> ApiResult<Json<ApiResponse<LineResponse>>> {
    let line = state
        .service
        .update_line(id, req.into())
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(line.into())))
}

#[utoipa::path(
    delete,
    path = "/api/v1/lines/{id}",
    tag = "Lines",
    params(("id" = i32, Path, description = "Line ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_line(
    State(state): State<LineState>,
    Path(id): Path<i32>,
) -> ApiResult<StatusCode> {
    state.service.delete_line(id).await.map_err(error_response)?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/v1/lines/{id}/sections",
    tag = "Sections",
    params(("id" = i32, Path, description = "Line ID")),
    request_body = AddSectionRequest,
    responses(
        (status = 201, description = "Section appended", body = ApiResponse<LineResponse>),
        (status = 400, description = "Section does not extend the down terminus"),
        (status = 404, description = "Unknown line or station")
    )
)]
pub async fn add_section(
    State(state): State<LineState>,
    Path(id): Path<i32>,
    ValidatedJson(req): ValidatedJson<AddSectionRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<LineResponse>>)> {
    let line = state
        .service
        .add_section(id, req.into())
        .await
        .map_err(error_response)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(line.into()))))
}

#[utoipa::path(
    delete,
    path = "/api/v1/lines/{id}/sections",
    tag = "Sections",
    params(("id" = i32, Path, description = "Line ID"), DeleteSectionQuery),
    responses(
        (status = 204, description = "Tail section removed"),
        (status = 400, description = "Not the down terminus, or only one section left"),
        (status = 404, description = "Unknown line")
    )
)]
pub async fn delete_section(
    State(state): State<LineState>,
    Path(id): Path<i32>,
    Query(query): Query<DeleteSectionQuery>,
) -> ApiResult<StatusCode> {
    state
        .service
        .delete_section(id, query.station_id)
        .await
        .map_err(error_response)?;
    Ok(StatusCode::NO_CONTENT)
}
