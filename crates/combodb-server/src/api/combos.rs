//! Discovery endpoints: combos near a zip code or an explicit coordinate.

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::Utc;
use combodb_core::{CatalogStore, Geocoder};
use combodb_discovery::{DiscoveryView, SortBy};
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{map_discovery_error, parse_coordinate, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct ZipComboQuery {
    pub sort_by: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct CoordinateComboQuery {
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub sort_by: Option<String>,
}

pub(super) async fn combos_near_zip<S, G>(
    State(state): State<AppState<S, G>>,
    Extension(req_id): Extension<RequestId>,
    Path(zipcode): Path<String>,
    Query(query): Query<ZipComboQuery>,
) -> Result<Json<ApiResponse<DiscoveryView>>, ApiError>
where
    S: CatalogStore,
    G: Geocoder,
{
    let sort_by = SortBy::parse(query.sort_by.as_deref())
        .map_err(|e| map_discovery_error(req_id.0.clone(), &e))?;

    let view = state
        .discovery
        .combos_near_zip(&zipcode, sort_by, Utc::now())
        .await
        .map_err(|e| {
            tracing::info!(zip = %zipcode, error = %e, "discovery by zip rejected");
            map_discovery_error(req_id.0.clone(), &e)
        })?;

    Ok(Json(ApiResponse {
        data: view,
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn combos_near_coordinate<S, G>(
    State(state): State<AppState<S, G>>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<CoordinateComboQuery>,
) -> Result<Json<ApiResponse<DiscoveryView>>, ApiError>
where
    S: CatalogStore,
    G: Geocoder,
{
    let center = parse_coordinate(
        &req_id.0,
        query.latitude.as_deref(),
        query.longitude.as_deref(),
    )?;
    let sort_by = SortBy::parse(query.sort_by.as_deref())
        .map_err(|e| map_discovery_error(req_id.0.clone(), &e))?;

    let view = state
        .discovery
        .combos_near_coordinate(center, sort_by, Utc::now())
        .await
        .map_err(|e| map_discovery_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: view,
        meta: ResponseMeta::new(req_id.0),
    }))
}
