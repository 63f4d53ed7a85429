//! [`CatalogStore`] backed by Postgres.

use combodb_core::{
    CatalogStore, ComboHistory, HistoryQuery, Location, LocationQuery, Restaurant,
    RestaurantQuery,
};
use sqlx::PgPool;
use uuid::Uuid;

use crate::combo_history::{list_history_for_combo, list_history_for_combos_between};
use crate::locations::{get_location_by_id, list_locations_by_zip};
use crate::restaurants::{
    get_restaurant_by_id, hydrate_restaurants, list_active_restaurants_within_bounds,
    list_combos_for_restaurants, list_cuisines_for_combos, list_nutrition_for_combos,
    RestaurantRow,
};
use crate::DbError;

#[derive(Debug, Clone)]
pub struct PgCatalog {
    pool: PgPool,
}

impl PgCatalog {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn materialize(&self, rows: Vec<RestaurantRow>) -> Result<Vec<Restaurant>, DbError> {
        let restaurant_ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
        let combos = list_combos_for_restaurants(&self.pool, &restaurant_ids).await?;
        let combo_ids: Vec<Uuid> = combos.iter().map(|c| c.id).collect();
        let cuisines = list_cuisines_for_combos(&self.pool, &combo_ids).await?;
        let nutrition = list_nutrition_for_combos(&self.pool, &combo_ids).await?;
        Ok(hydrate_restaurants(rows, combos, cuisines, nutrition))
    }
}

impl CatalogStore for PgCatalog {
    type Error = DbError;

    async fn find_locations(&self, query: &LocationQuery) -> Result<Vec<Location>, DbError> {
        let rows = match query {
            LocationQuery::ByZip(zip) => list_locations_by_zip(&self.pool, zip.trim()).await?,
            LocationQuery::ById(id) => get_location_by_id(&self.pool, *id)
                .await?
                .into_iter()
                .collect(),
        };
        Ok(rows.into_iter().map(Location::from).collect())
    }

    async fn find_restaurants(&self, query: &RestaurantQuery) -> Result<Vec<Restaurant>, DbError> {
        let rows = match query {
            RestaurantQuery::ActiveWithinBounds(bounds) => {
                list_active_restaurants_within_bounds(&self.pool, bounds).await?
            }
            RestaurantQuery::ById(id) => get_restaurant_by_id(&self.pool, *id)
                .await?
                .into_iter()
                .collect(),
        };
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        self.materialize(rows).await
    }

    async fn find_combo_history(&self, query: &HistoryQuery) -> Result<Vec<ComboHistory>, DbError> {
        let rows = match query {
            HistoryQuery::ForCombos { combo_ids, window } => {
                list_history_for_combos_between(
                    &self.pool,
                    combo_ids,
                    window.first_day(),
                    window.last_day(),
                )
                .await?
            }
            HistoryQuery::ForCombo(id) => list_history_for_combo(&self.pool, *id).await?,
        };
        Ok(rows.into_iter().map(ComboHistory::from).collect())
    }

    async fn ping(&self) -> Result<(), DbError> {
        crate::health_check(&self.pool).await
    }
}
