//! Read operations for the `locations` table.

use sqlx::PgPool;
use uuid::Uuid;

use super::types::LocationRow;

/// Locations with the given zip, oldest first.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn list_locations_by_zip(
    pool: &PgPool,
    zip: &str,
) -> Result<Vec<LocationRow>, sqlx::Error> {
    sqlx::query_as::<_, LocationRow>(
        "SELECT id, street, apt, city, state, country, zip, latitude, longitude, \
                created_at, updated_at \
         FROM locations \
         WHERE zip = $1 \
         ORDER BY created_at, id",
    )
    .bind(zip)
    .fetch_all(pool)
    .await
}

/// Returns a single location by id, or `None` if not found.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn get_location_by_id(
    pool: &PgPool,
    id: Uuid,
) -> Result<Option<LocationRow>, sqlx::Error> {
    sqlx::query_as::<_, LocationRow>(
        "SELECT id, street, apt, city, state, country, zip, latitude, longitude, \
                created_at, updated_at \
         FROM locations \
         WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Locations that have not been geocoded yet, oldest first, at most `limit` rows.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn list_locations_missing_coordinates(
    pool: &PgPool,
    limit: i64,
) -> Result<Vec<LocationRow>, sqlx::Error> {
    sqlx::query_as::<_, LocationRow>(
        "SELECT id, street, apt, city, state, country, zip, latitude, longitude, \
                created_at, updated_at \
         FROM locations \
         WHERE latitude IS NULL OR longitude IS NULL \
         ORDER BY created_at, id \
         LIMIT $1",
    )
    .bind(limit)
    .fetch_all(pool)
    .await
}
