//! Selecting restaurants near a point.

use combodb_core::{CatalogStore, CoordinateBounds, Restaurant, RestaurantQuery};
use tracing::{debug, error};

/// Active restaurants whose location lies inside `bounds`.
///
/// Never fails: a store error is logged and yields an empty list.
pub async fn restaurants_within_bounds<S: CatalogStore>(
    store: &S,
    bounds: &CoordinateBounds,
) -> Vec<Restaurant> {
    match store
        .find_restaurants(&RestaurantQuery::ActiveWithinBounds(*bounds))
        .await
    {
        Ok(restaurants) => {
            // The store filter is authoritative, but inactive rows must never leak.
            let restaurants: Vec<Restaurant> =
                restaurants.into_iter().filter(|r| r.is_active).collect();
            debug!(count = restaurants.len(), "restaurants within bounds");
            restaurants
        }
        Err(e) => {
            error!(error = %e, "restaurant proximity query failed");
            Vec::new()
        }
    }
}
