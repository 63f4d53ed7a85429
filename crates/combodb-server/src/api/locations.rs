use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use combodb_core::{CatalogStore, Geocoder, Location, LocationQuery};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::middleware::RequestId;

use super::{
    map_store_error, parse_coordinate, parse_id, ApiError, ApiResponse, AppState, ResponseMeta,
};

#[derive(Debug, Serialize)]
pub(super) struct LocationItem {
    pub id: Uuid,
    pub street: String,
    pub apt: Option<String>,
    pub city: String,
    pub state: String,
    pub country: String,
    pub zip: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl From<Location> for LocationItem {
    fn from(location: Location) -> Self {
        Self {
            id: location.id,
            latitude: location.coordinate.map(|c| c.latitude),
            longitude: location.coordinate.map(|c| c.longitude),
            street: location.street,
            apt: location.apt,
            city: location.city,
            state: location.state,
            country: location.country,
            zip: location.zip,
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct ZipcodeItem {
    pub zipcode: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct ZipQuery {
    pub zipcode: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct CoordinateQuery {
    pub latitude: Option<String>,
    pub longitude: Option<String>,
}

/// Stored locations for a zip code; 204 when there are none.
pub(super) async fn list_locations_by_zip<S, G>(
    State(state): State<AppState<S, G>>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<ZipQuery>,
) -> Result<Response, ApiError>
where
    S: CatalogStore,
    G: Geocoder,
{
    let zip = query
        .zipcode
        .as_deref()
        .map(str::trim)
        .filter(|z| !z.is_empty())
        .ok_or_else(|| ApiError::new(req_id.0.clone(), "bad_request", "zipcode is required"))?;

    let locations = state
        .store
        .find_locations(&LocationQuery::ByZip(zip.to_string()))
        .await
        .map_err(|e| map_store_error(req_id.0.clone(), &e))?;

    if locations.is_empty() {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }

    let data: Vec<LocationItem> = locations.into_iter().map(LocationItem::from).collect();
    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    })
    .into_response())
}

pub(super) async fn get_location<S, G>(
    State(state): State<AppState<S, G>>,
    Extension(req_id): Extension<RequestId>,
    Path(raw_id): Path<String>,
) -> Result<Json<ApiResponse<LocationItem>>, ApiError>
where
    S: CatalogStore,
    G: Geocoder,
{
    let id = parse_id(&req_id.0, &raw_id)?;

    let location = state
        .store
        .find_locations(&LocationQuery::ById(id))
        .await
        .map_err(|e| map_store_error(req_id.0.clone(), &e))?
        .into_iter()
        .next()
        .ok_or_else(|| ApiError::new(req_id.0.clone(), "not_found", "location not found"))?;

    Ok(Json(ApiResponse {
        data: LocationItem::from(location),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// Reverse-geocode a coordinate into the postal code that contains it.
pub(super) async fn zipcode_for_coordinate<S, G>(
    State(state): State<AppState<S, G>>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<CoordinateQuery>,
) -> Result<Json<ApiResponse<ZipcodeItem>>, ApiError>
where
    S: CatalogStore,
    G: Geocoder,
{
    let coordinate = parse_coordinate(
        &req_id.0,
        query.latitude.as_deref(),
        query.longitude.as_deref(),
    )?;

    let zipcode = state
        .discovery
        .resolver()
        .zip_for_coordinate(coordinate)
        .await
        .ok_or_else(|| {
            ApiError::new(
                req_id.0.clone(),
                "not_found",
                "no postal code found for the given coordinate",
            )
        })?;

    Ok(Json(ApiResponse {
        data: ZipcodeItem { zipcode },
        meta: ResponseMeta::new(req_id.0),
    }))
}
