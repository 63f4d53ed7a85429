//! Database operations for `restaurants`, `combos` and their tag tables.
//!
//! Restaurants are read in four flat queries (restaurants joined with their
//! location, then combos, cuisines and nutrition tags keyed by id) and
//! assembled into entity graphs by [`hydrate_restaurants`].

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use combodb_core::{
    Combo, ComboNutrition, CoordinateBounds, Cuisine, Location, NutritionAttribute, Restaurant,
};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::locations::LocationRow;

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// A row from `restaurants` joined with its `locations` row.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RestaurantRow {
    pub id: Uuid,
    pub name: String,
    pub website: Option<String>,
    pub email: String,
    pub contact: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub location_id: Uuid,
    pub street: String,
    pub apt: Option<String>,
    pub city: String,
    pub state: String,
    pub country: String,
    pub zip: String,
    pub latitude: Option<Decimal>,
    pub longitude: Option<Decimal>,
    pub location_created_at: DateTime<Utc>,
    pub location_updated_at: DateTime<Utc>,
}

impl RestaurantRow {
    fn location(&self) -> Location {
        Location::from(LocationRow {
            id: self.location_id,
            street: self.street.clone(),
            apt: self.apt.clone(),
            city: self.city.clone(),
            state: self.state.clone(),
            country: self.country.clone(),
            zip: self.zip.clone(),
            latitude: self.latitude,
            longitude: self.longitude,
            created_at: self.location_created_at,
            updated_at: self.location_updated_at,
        })
    }
}

/// A row from the `combos` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ComboRow {
    pub id: Uuid,
    pub restaurant_id: Uuid,
    pub name: String,
    pub image: Option<String>,
    pub combo_type: String,
    pub main_dish: String,
    pub side_dish: Option<String>,
    pub summary: Option<String>,
    pub ingredients: Option<String>,
    pub price: Decimal,
}

/// A `combo_cuisines` link joined with the cuisine label.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ComboCuisineRow {
    pub combo_id: Uuid,
    pub cuisine_id: Uuid,
    pub label: String,
}

/// A row from the `combo_nutrition` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ComboNutritionRow {
    pub combo_id: Uuid,
    pub attribute: i16,
}

const RESTAURANT_COLUMNS: &str = "r.id, r.name, r.website, r.email, r.contact, r.is_active, \
     r.created_at, r.updated_at, \
     l.id AS location_id, l.street, l.apt, l.city, l.state, l.country, l.zip, \
     l.latitude, l.longitude, \
     l.created_at AS location_created_at, l.updated_at AS location_updated_at";

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Active restaurants whose location lies inside `bounds`, edges included.
///
/// Locations that have not been geocoded never match.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn list_active_restaurants_within_bounds(
    pool: &PgPool,
    bounds: &CoordinateBounds,
) -> Result<Vec<RestaurantRow>, sqlx::Error> {
    let sql = format!(
        "SELECT {RESTAURANT_COLUMNS} \
         FROM restaurants r \
         JOIN locations l ON l.id = r.location_id \
         WHERE r.is_active = TRUE \
           AND l.latitude BETWEEN $1::NUMERIC AND $2::NUMERIC \
           AND l.longitude BETWEEN $3::NUMERIC AND $4::NUMERIC \
         ORDER BY r.name"
    );
    sqlx::query_as::<_, RestaurantRow>(&sql)
        .bind(bounds.lower.latitude)
        .bind(bounds.upper.latitude)
        .bind(bounds.lower.longitude)
        .bind(bounds.upper.longitude)
        .fetch_all(pool)
        .await
}

/// Returns a single restaurant by id (active or not), or `None` if not found.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn get_restaurant_by_id(
    pool: &PgPool,
    id: Uuid,
) -> Result<Option<RestaurantRow>, sqlx::Error> {
    let sql = format!(
        "SELECT {RESTAURANT_COLUMNS} \
         FROM restaurants r \
         JOIN locations l ON l.id = r.location_id \
         WHERE r.id = $1"
    );
    sqlx::query_as::<_, RestaurantRow>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// All combos of the given restaurants, ordered by name.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn list_combos_for_restaurants(
    pool: &PgPool,
    restaurant_ids: &[Uuid],
) -> Result<Vec<ComboRow>, sqlx::Error> {
    if restaurant_ids.is_empty() {
        return Ok(Vec::new());
    }
    sqlx::query_as::<_, ComboRow>(
        "SELECT id, restaurant_id, name, image, combo_type, main_dish, side_dish, \
                summary, ingredients, price \
         FROM combos \
         WHERE restaurant_id = ANY($1) \
         ORDER BY name, id",
    )
    .bind(restaurant_ids)
    .fetch_all(pool)
    .await
}

/// Cuisine links of the given combos, ordered by label.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn list_cuisines_for_combos(
    pool: &PgPool,
    combo_ids: &[Uuid],
) -> Result<Vec<ComboCuisineRow>, sqlx::Error> {
    if combo_ids.is_empty() {
        return Ok(Vec::new());
    }
    sqlx::query_as::<_, ComboCuisineRow>(
        "SELECT cc.combo_id, c.id AS cuisine_id, c.label \
         FROM combo_cuisines cc \
         JOIN cuisines c ON c.id = cc.cuisine_id \
         WHERE cc.combo_id = ANY($1) \
         ORDER BY c.label",
    )
    .bind(combo_ids)
    .fetch_all(pool)
    .await
}

/// Nutrition tags of the given combos, ordered by tag code.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn list_nutrition_for_combos(
    pool: &PgPool,
    combo_ids: &[Uuid],
) -> Result<Vec<ComboNutritionRow>, sqlx::Error> {
    if combo_ids.is_empty() {
        return Ok(Vec::new());
    }
    sqlx::query_as::<_, ComboNutritionRow>(
        "SELECT combo_id, attribute \
         FROM combo_nutrition \
         WHERE combo_id = ANY($1) \
         ORDER BY attribute",
    )
    .bind(combo_ids)
    .fetch_all(pool)
    .await
}

// ---------------------------------------------------------------------------
// Assembly
// ---------------------------------------------------------------------------

/// Assemble flat rows into fully materialized restaurants.
///
/// Restaurant order follows `restaurants`; combo order within a restaurant
/// follows `combos`. Child rows whose parent is not present are ignored.
#[must_use]
pub fn hydrate_restaurants(
    restaurants: Vec<RestaurantRow>,
    combos: Vec<ComboRow>,
    cuisines: Vec<ComboCuisineRow>,
    nutrition: Vec<ComboNutritionRow>,
) -> Vec<Restaurant> {
    let mut cuisines_by_combo: HashMap<Uuid, Vec<Cuisine>> = HashMap::new();
    for row in cuisines {
        cuisines_by_combo.entry(row.combo_id).or_default().push(Cuisine {
            id: row.cuisine_id,
            label: row.label,
        });
    }

    let mut nutrition_by_combo: HashMap<Uuid, Vec<ComboNutrition>> = HashMap::new();
    for row in nutrition {
        nutrition_by_combo
            .entry(row.combo_id)
            .or_default()
            .push(ComboNutrition {
                combo_id: row.combo_id,
                attribute: NutritionAttribute::from_code(row.attribute),
            });
    }

    let mut combos_by_restaurant: HashMap<Uuid, Vec<Combo>> = HashMap::new();
    for row in combos {
        let combo = Combo {
            id: row.id,
            restaurant_id: row.restaurant_id,
            name: row.name,
            image: row.image,
            combo_type: row.combo_type,
            main_dish: row.main_dish,
            side_dish: row.side_dish,
            summary: row.summary,
            ingredients: row.ingredients,
            price: row.price,
            cuisines: cuisines_by_combo.remove(&row.id).unwrap_or_default(),
            nutrition: nutrition_by_combo.remove(&row.id).unwrap_or_default(),
        };
        combos_by_restaurant
            .entry(row.restaurant_id)
            .or_default()
            .push(combo);
    }

    restaurants
        .into_iter()
        .map(|row| Restaurant {
            location: row.location(),
            combos: combos_by_restaurant.remove(&row.id).unwrap_or_default(),
            id: row.id,
            name: row.name,
            website: row.website,
            email: row.email,
            contact: row.contact,
            is_active: row.is_active,
        })
        .collect()
}
