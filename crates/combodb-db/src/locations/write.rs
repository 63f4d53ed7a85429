//! Write operations for the `locations` table.

use combodb_core::Coordinate;
use sqlx::PgPool;
use uuid::Uuid;

/// Store a resolved coordinate on a location.
///
/// The coordinate is rounded up to 8 decimal digits before it is bound and
/// cast to `NUMERIC(11,8)` inside the statement. Returns `false` when no
/// location has the given id.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn update_location_coordinate(
    pool: &PgPool,
    id: Uuid,
    coordinate: Coordinate,
) -> Result<bool, sqlx::Error> {
    let rounded = coordinate.rounded();
    let result = sqlx::query(
        "UPDATE locations \
         SET latitude = $2::NUMERIC(11,8), \
             longitude = $3::NUMERIC(11,8), \
             updated_at = NOW() \
         WHERE id = $1",
    )
    .bind(id)
    .bind(rounded.latitude)
    .bind(rounded.longitude)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}
