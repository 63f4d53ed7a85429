mod combos;
mod locations;
mod restaurants;

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use combodb_core::{CatalogStore, Coordinate, Geocoder};
use combodb_discovery::{Discovery, DiscoveryError};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use uuid::Uuid;

use crate::middleware::{
    enforce_rate_limit, request_id, RateLimitState, RequestId, REQUEST_ID_HEADER,
};

/// Shared handler state: the catalog for direct lookups and the discovery
/// pipeline built over the same catalog.
pub struct AppState<S, G> {
    pub store: Arc<S>,
    pub discovery: Arc<Discovery<S, G>>,
}

impl<S, G> AppState<S, G> {
    pub fn new(store: Arc<S>, discovery: Discovery<S, G>) -> Self {
        Self {
            store,
            discovery: Arc::new(discovery),
        }
    }
}

impl<S, G> Clone for AppState<S, G> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            discovery: Arc::clone(&self.discovery),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    database: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" | "unresolved_location" => StatusCode::BAD_REQUEST,
            "rate_limited" => StatusCode::TOO_MANY_REQUESTS,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

pub(super) fn map_store_error(request_id: String, error: &impl std::fmt::Display) -> ApiError {
    tracing::error!(error = %error, "catalog query failed");
    ApiError::new(request_id, "internal_error", "database query failed")
}

pub(super) fn map_discovery_error(request_id: String, error: &DiscoveryError) -> ApiError {
    let code = match error {
        DiscoveryError::InvalidArgument(_) => "bad_request",
        DiscoveryError::CoordinatesUnresolved => "unresolved_location",
    };
    ApiError::new(request_id, code, error.to_string())
}

/// Parse a path id, answering 400 in the usual envelope instead of axum's
/// plain-text rejection.
pub(super) fn parse_id(request_id: &str, raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw.trim()).map_err(|_| {
        ApiError::new(
            request_id,
            "bad_request",
            format!("'{raw}' is not a valid id"),
        )
    })
}

/// Parse `latitude`/`longitude` query values into a finite coordinate.
pub(super) fn parse_coordinate(
    request_id: &str,
    latitude: Option<&str>,
    longitude: Option<&str>,
) -> Result<Coordinate, ApiError> {
    let component = |name: &str, value: Option<&str>| -> Result<f64, ApiError> {
        let value = value.map(str::trim).filter(|v| !v.is_empty()).ok_or_else(|| {
            ApiError::new(request_id, "bad_request", format!("{name} is required"))
        })?;
        value.parse::<f64>().map_err(|_| {
            ApiError::new(
                request_id,
                "bad_request",
                format!("{name} must be a number, got '{value}'"),
            )
        })
    };

    let latitude = component("latitude", latitude)?;
    let longitude = component("longitude", longitude)?;
    Coordinate::new(latitude, longitude)
        .map_err(|e| ApiError::new(request_id, "bad_request", e.to_string()))
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static(REQUEST_ID_HEADER)])
}

fn api_router<S, G>(rate_limit: RateLimitState) -> Router<AppState<S, G>>
where
    S: CatalogStore + 'static,
    G: Geocoder + 'static,
{
    Router::new()
        .route(
            "/api/v1/combos/locations",
            get(combos::combos_near_coordinate::<S, G>),
        )
        .route(
            "/api/v1/combos/locations/{zipcode}",
            get(combos::combos_near_zip::<S, G>),
        )
        .route(
            "/api/v1/restaurants/{id}",
            get(restaurants::get_restaurant::<S, G>),
        )
        .route(
            "/api/v1/locations",
            get(locations::list_locations_by_zip::<S, G>),
        )
        .route(
            "/api/v1/locations/zipcode",
            get(locations::zipcode_for_coordinate::<S, G>),
        )
        .route(
            "/api/v1/locations/{id}",
            get(locations::get_location::<S, G>),
        )
        .layer(axum::middleware::from_fn_with_state(
            rate_limit,
            enforce_rate_limit,
        ))
}

pub fn build_app<S, G>(state: AppState<S, G>, rate_limit: RateLimitState) -> Router
where
    S: CatalogStore + 'static,
    G: Geocoder + 'static,
{
    let public_routes = Router::new().route("/api/v1/health", get(health::<S, G>));

    Router::new()
        .merge(public_routes)
        .merge(api_router(rate_limit))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health<S, G>(
    State(state): State<AppState<S, G>>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse
where
    S: CatalogStore,
    G: Geocoder,
{
    let meta = ResponseMeta::new(req_id.0);

    match state.store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse {
                data: HealthData {
                    status: "ok",
                    database: "ok",
                },
                meta,
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "health check: database unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse {
                    data: HealthData {
                        status: "degraded",
                        database: "unavailable",
                    },
                    meta,
                }),
            )
        }
    }
}
