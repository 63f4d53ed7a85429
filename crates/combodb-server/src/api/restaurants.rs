use axum::{
    extract::{Path, State},
    Extension, Json,
};
use combodb_core::{CatalogStore, Geocoder, Restaurant, RestaurantQuery};
use combodb_discovery::restaurant_link;
use serde::Serialize;
use uuid::Uuid;

use crate::middleware::RequestId;

use super::{map_store_error, parse_id, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
pub(super) struct RestaurantItem {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub email: String,
    pub contact_number: Option<String>,
    pub links: Vec<ResourceLink>,
}

#[derive(Debug, Serialize)]
pub(super) struct ResourceLink {
    pub href: String,
    pub rel: &'static str,
}

impl RestaurantItem {
    fn new(restaurant: Restaurant, base_url: &str) -> Self {
        Self {
            links: vec![ResourceLink {
                href: restaurant_link(base_url, restaurant.id),
                rel: "self",
            }],
            id: restaurant.id,
            name: restaurant.name,
            url: restaurant.website,
            email: restaurant.email,
            contact_number: restaurant.contact,
        }
    }
}

pub(super) async fn get_restaurant<S, G>(
    State(state): State<AppState<S, G>>,
    Extension(req_id): Extension<RequestId>,
    Path(raw_id): Path<String>,
) -> Result<Json<ApiResponse<RestaurantItem>>, ApiError>
where
    S: CatalogStore,
    G: Geocoder,
{
    let id = parse_id(&req_id.0, &raw_id)?;

    let restaurant = state
        .store
        .find_restaurants(&RestaurantQuery::ById(id))
        .await
        .map_err(|e| map_store_error(req_id.0.clone(), &e))?
        .into_iter()
        .next()
        .ok_or_else(|| ApiError::new(req_id.0.clone(), "not_found", "restaurant not found"))?;

    let base_url = state.discovery.settings().public_base_url.as_str();
    Ok(Json(ApiResponse {
        data: RestaurantItem::new(restaurant, base_url),
        meta: ResponseMeta::new(req_id.0),
    }))
}
