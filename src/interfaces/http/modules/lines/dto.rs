//! Line DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::application::{AddSectionCommand, CreateLineCommand, LineView, UpdateLineCommand};
use crate::interfaces::http::modules::stations::StationResponse;

/// Line with its stations in travel order
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LineResponse {
    pub id: i32,
    pub name: String,
    pub color: String,
    /// Sum of all section distances
    pub distance: i32,
    pub up_station: StationResponse,
    pub down_station: StationResponse,
    /// Every station from the up terminus to the down terminus
    pub stations: Vec<StationResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<LineView> for LineResponse {
    fn from(v: LineView) -> Self {
        Self {
            id: v.id,
            name: v.name,
            color: v.color,
            distance: v.distance,
            up_station: v.up_station.into(),
            down_station: v.down_station.into(),
            stations: v.stations.into_iter().map(Into::into).collect(),
            created_at: v.created_at,
            updated_at: v.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateLineRequest {
    #[validate(length(min = 1, max = 20, message = "line name must be 1-20 characters"))]
    pub name: String,
    #[validate(length(min = 1, max = 20, message = "color must be 1-20 characters"))]
    pub color: String,
    pub up_station_id: i32,
    pub down_station_id: i32,
    #[validate(range(min = 1, max = 1000000, message = "distance must be between 1 and 1000000"))]
    pub distance: i32,
}

impl From<CreateLineRequest> for CreateLineCommand {
    fn from(r: CreateLineRequest) -> Self {
        Self {
            name: r.name,
            color: r.color,
            up_station_id: r.up_station_id,
            down_station_id: r.down_station_id,
            distance: r.distance,
        }
    }
}

/// Omitted fields stay unchanged
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateLineRequest {
    #[validate(length(min = 1, max = 20, message = "line name must be 1-20 characters"))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 20, message = "color must be 1-20 characters"))]
    pub color: Option<String>,
}

impl From<UpdateLineRequest> for UpdateLineCommand {
    fn from(r: UpdateLineRequest) -> Self {
        Self {
            name: r.name,
            color: r.color,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AddSectionRequest {
    pub up_station_id: i32,
    pub down_station_id: i32,
    #[validate(range(min = 1, max = 1000000, message = "distance must be between 1 and 1000000"))]
    pub distance: i32,
}

impl From<AddSectionRequest> for AddSectionCommand {
    fn from(r: AddSectionRequest) -> Self {
        Self {
            up_station_id: r.up_station_id,
            down_station_id: r.down_station_id,
            distance: r.distance,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DeleteSectionQuery {
    /// Down station of the section to remove (must be the line's down terminus)
    pub station_id: i32,
}
