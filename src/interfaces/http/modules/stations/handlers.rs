//! Station REST API handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::dto::{CreateStationRequest, StationResponse};
use crate::application::StationService;
use crate::interfaces::http::common::{error_response, ApiResponse, ApiResult, ValidatedJson};

#[derive(Clone)]
pub struct StationState {
    pub service: Arc<StationService>,
}

#[utoipa::path(
    post,
    path = "/api/v1/stations",
    tag = "Stations",
    request_body = CreateStationRequest,
    responses(
        (status = 201, description = "Created", body = ApiResponse<StationResponse>),
        (status = 409, description = "Name already taken"),
        (status = 422, description = "Invalid name")
    )
)]
pub async fn create_station(
    State(state): State<StationState>,
    ValidatedJson(req): ValidatedJson<CreateStationRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<StationResponse>>)> {
    let station = state
        .service
        .create_station(&req.name)
        .await
        .map_err(error_response)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(station.into()))))
}

#[utoipa::path(
    get,
    path = "/api/v1/stations",
    tag = "Stations",
    responses(
        (status = 200, description = "Station list", body = ApiResponse<Vec<StationResponse>>)
    )
)]
pub async fn list_stations(
    State(state): State<StationState>,
) -> ApiResult<Json<ApiResponse<Vec<StationResponse>>>> {
    let stations = state
        .service
        .find_all_stations()
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(
        stations.into_iter().map(Into::into).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/stations/{id}",
    tag = "Stations",
    params(("id" = i32, Path, description = "Station ID")),
    responses(
        (status = 200, description = "Station", body = ApiResponse<StationResponse>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_station(
    State(state): State<StationState>,
    Path(id): Path<i32>,
) -> ApiResult<Json<ApiResponse<StationResponse>>> {
    let station = state.service.find_station(id).await.map_err(error_response)?;
    Ok(Json(ApiResponse::success(station.into())))
}

#[utoipa::path(
    delete,
    path = "/api/v1/stations/{id}",
    tag = "Stations",
    params(("id" = i32, Path, description = "Station ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not found"),
        (status = 409, description = "Station is part of a line")
    )
)]
pub async fn delete_station(
    State(state): State<StationState>,
    Path(id): Path<i32>,
) -> ApiResult<StatusCode> {
    state.service.delete_station(id).await.map_err(error_response)?;
    Ok(StatusCode::NO_CONTENT)
}
