use combodb_core::seed::{SeedCombo, SeedLocation, SeedRestaurant};
use combodb_core::SeedFile;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::DbError;

/// Counts of what a seed run touched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub restaurants: usize,
    pub combos: usize,
    pub serving_dates: usize,
}

/// Upsert the catalog from a seed file.
///
/// Restaurants are matched by name and combos by `(restaurant, name)`;
/// matched rows are updated in place. A combo's nutrition tags are replaced
/// by the seed's, while cuisines and serving dates are only ever added.
///
/// All upserts run inside a single transaction; if any operation fails
/// the entire batch is rolled back.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any database operation fails.
pub async fn seed_catalog(pool: &PgPool, seed: &SeedFile) -> Result<SeedSummary, DbError> {
    let mut tx = pool.begin().await?;
    let mut summary = SeedSummary::default();

    for restaurant in &seed.restaurants {
        let restaurant_id = upsert_restaurant(&mut *tx, restaurant).await?;
        summary.restaurants += 1;

        for combo in &restaurant.combos {
            let combo_id = upsert_combo(&mut *tx, restaurant_id, combo).await?;
            replace_nutrition(&mut *tx, combo_id, combo).await?;
            link_cuisines(&mut *tx, combo_id, combo).await?;
            summary.serving_dates += add_serving_dates(&mut *tx, combo_id, combo).await?;
            summary.combos += 1;
        }
    }

    tx.commit().await?;
    Ok(summary)
}

async fn upsert_restaurant(
    conn: &mut PgConnection,
    restaurant: &SeedRestaurant,
) -> Result<Uuid, DbError> {
    let existing: Option<(Uuid, Uuid)> =
        sqlx::query_as("SELECT id, location_id FROM restaurants WHERE name = $1")
            .bind(&restaurant.name)
            .fetch_optional(&mut *conn)
            .await?;

    if let Some((restaurant_id, location_id)) = existing {
        update_location(conn, location_id, &restaurant.location).await?;
        sqlx::query(
            "UPDATE restaurants \
             SET website = $2, email = $3, contact = $4, is_active = TRUE, updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(restaurant_id)
        .bind(&restaurant.website)
        .bind(&restaurant.email)
        .bind(&restaurant.contact)
        .execute(&mut *conn)
        .await?;
        return Ok(restaurant_id);
    }

    let location_id = insert_location(conn, &restaurant.location).await?;
    let restaurant_id: Uuid = sqlx::query_scalar(
        "INSERT INTO restaurants (name, website, email, contact, location_id, is_active) \
         VALUES ($1, $2, $3, $4, $5, TRUE) \
         RETURNING id",
    )
    .bind(&restaurant.name)
    .bind(&restaurant.website)
    .bind(&restaurant.email)
    .bind(&restaurant.contact)
    .bind(location_id)
    .fetch_one(&mut *conn)
    .await?;

    Ok(restaurant_id)
}

async fn insert_location(conn: &mut PgConnection, location: &SeedLocation) -> Result<Uuid, DbError> {
    let coordinate = location.coordinate();
    let id: Uuid = sqlx::query_scalar(
        "INSERT INTO locations (street, apt, city, state, country, zip, latitude, longitude) \
         VALUES ($1, $2, $3, $4, $5, $6, $7::NUMERIC(11,8), $8::NUMERIC(11,8)) \
         RETURNING id",
    )
    .bind(&location.street)
    .bind(&location.apt)
    .bind(&location.city)
    .bind(&location.state)
    .bind(&location.country)
    .bind(location.zip.trim())
    .bind(coordinate.map(|c| c.latitude))
    .bind(coordinate.map(|c| c.longitude))
    .fetch_one(&mut *conn)
    .await?;
    Ok(id)
}

/// Update address fields. A stored coordinate is kept unless the seed
/// provides one.
async fn update_location(
    conn: &mut PgConnection,
    id: Uuid,
    location: &SeedLocation,
) -> Result<(), DbError> {
    let coordinate = location.coordinate();
    sqlx::query(
        "UPDATE locations \
         SET street = $2, apt = $3, city = $4, state = $5, country = $6, zip = $7, \
             latitude = COALESCE($8::NUMERIC(11,8), latitude), \
             longitude = COALESCE($9::NUMERIC(11,8), longitude), \
             updated_at = NOW() \
         WHERE id = $1",
    )
    .bind(id)
    .bind(&location.street)
    .bind(&location.apt)
    .bind(&location.city)
    .bind(&location.state)
    .bind(&location.country)
    .bind(location.zip.trim())
    .bind(coordinate.map(|c| c.latitude))
    .bind(coordinate.map(|c| c.longitude))
    .execute(&mut *conn)
    .await?;
    Ok(())
}

async fn upsert_combo(
    conn: &mut PgConnection,
    restaurant_id: Uuid,
    combo: &SeedCombo,
) -> Result<Uuid, DbError> {
    let id: Uuid = sqlx::query_scalar(
        "INSERT INTO combos \
             (restaurant_id, name, image, combo_type, main_dish, side_dish, summary, ingredients, price) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
         ON CONFLICT (restaurant_id, name) DO UPDATE SET \
             image       = EXCLUDED.image, \
             combo_type  = EXCLUDED.combo_type, \
             main_dish   = EXCLUDED.main_dish, \
             side_dish   = EXCLUDED.side_dish, \
             summary     = EXCLUDED.summary, \
             ingredients = EXCLUDED.ingredients, \
             price       = EXCLUDED.price, \
             updated_at  = NOW() \
         RETURNING id",
    )
    .bind(restaurant_id)
    .bind(&combo.name)
    .bind(&combo.image)
    .bind(&combo.combo_type)
    .bind(&combo.main_dish)
    .bind(&combo.side_dish)
    .bind(&combo.summary)
    .bind(&combo.ingredients)
    .bind(combo.price)
    .fetch_one(&mut *conn)
    .await?;
    Ok(id)
}

async fn replace_nutrition(
    conn: &mut PgConnection,
    combo_id: Uuid,
    combo: &SeedCombo,
) -> Result<(), DbError> {
    sqlx::query("DELETE FROM combo_nutrition WHERE combo_id = $1")
        .bind(combo_id)
        .execute(&mut *conn)
        .await?;

    for attribute in &combo.nutrition {
        sqlx::query(
            "INSERT INTO combo_nutrition (combo_id, attribute) VALUES ($1, $2) \
             ON CONFLICT DO NOTHING",
        )
        .bind(combo_id)
        .bind(attribute.code())
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

async fn link_cuisines(
    conn: &mut PgConnection,
    combo_id: Uuid,
    combo: &SeedCombo,
) -> Result<(), DbError> {
    for label in combo.cuisines.iter().map(|c| c.trim().to_lowercase()) {
        if label.is_empty() {
            continue;
        }
        let cuisine_id: Uuid = sqlx::query_scalar(
            "INSERT INTO cuisines (label) VALUES ($1) \
             ON CONFLICT (label) DO UPDATE SET label = EXCLUDED.label \
             RETURNING id",
        )
        .bind(&label)
        .fetch_one(&mut *conn)
        .await?;

        sqlx::query(
            "INSERT INTO combo_cuisines (combo_id, cuisine_id) VALUES ($1, $2) \
             ON CONFLICT DO NOTHING",
        )
        .bind(combo_id)
        .bind(cuisine_id)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

async fn add_serving_dates(
    conn: &mut PgConnection,
    combo_id: Uuid,
    combo: &SeedCombo,
) -> Result<usize, DbError> {
    let mut added = 0usize;
    for date in &combo.serving_dates {
        let result = sqlx::query(
            "INSERT INTO combo_history (combo_id, serving_date) VALUES ($1, $2) \
             ON CONFLICT (combo_id, serving_date) DO NOTHING",
        )
        .bind(combo_id)
        .bind(date)
        .execute(&mut *conn)
        .await?;
        if result.rows_affected() > 0 {
            added += 1;
        }
    }
    Ok(added)
}
