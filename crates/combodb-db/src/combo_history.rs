//! Database operations for the `combo_history` table.

use chrono::{DateTime, NaiveDate, Utc};
use combodb_core::ComboHistory;
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

/// A row from the `combo_history` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ComboHistoryRow {
    pub id: Uuid,
    pub combo_id: Uuid,
    pub serving_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl From<ComboHistoryRow> for ComboHistory {
    fn from(row: ComboHistoryRow) -> Self {
        Self {
            id: row.id,
            combo_id: row.combo_id,
            serving_date: row.serving_date,
        }
    }
}

/// Serving dates of any of `combo_ids` between `first_day` and `last_day`
/// (both inclusive), ordered by date.
///
/// An empty `combo_ids` returns an empty list without querying.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn list_history_for_combos_between(
    pool: &PgPool,
    combo_ids: &[Uuid],
    first_day: NaiveDate,
    last_day: NaiveDate,
) -> Result<Vec<ComboHistoryRow>, sqlx::Error> {
    if combo_ids.is_empty() {
        return Ok(Vec::new());
    }
    sqlx::query_as::<_, ComboHistoryRow>(
        "SELECT id, combo_id, serving_date, created_at \
         FROM combo_history \
         WHERE combo_id = ANY($1) \
           AND serving_date BETWEEN $2 AND $3 \
         ORDER BY serving_date, created_at, id",
    )
    .bind(combo_ids)
    .bind(first_day)
    .bind(last_day)
    .fetch_all(pool)
    .await
}

/// Every serving date recorded for one combo, ordered by date.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn list_history_for_combo(
    pool: &PgPool,
    combo_id: Uuid,
) -> Result<Vec<ComboHistoryRow>, sqlx::Error> {
    sqlx::query_as::<_, ComboHistoryRow>(
        "SELECT id, combo_id, serving_date, created_at \
         FROM combo_history \
         WHERE combo_id = $1 \
         ORDER BY serving_date, id",
    )
    .bind(combo_id)
    .fetch_all(pool)
    .await
}

/// Record that `combo_id` is served on `serving_date`.
///
/// Recording the same date twice returns the existing row.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if the combo does not exist, or
/// [`DbError::Sqlx`] if the query fails.
pub async fn insert_combo_history(
    pool: &PgPool,
    combo_id: Uuid,
    serving_date: NaiveDate,
) -> Result<ComboHistoryRow, DbError> {
    sqlx::query_as::<_, ComboHistoryRow>(
        "INSERT INTO combo_history (combo_id, serving_date) \
         VALUES ($1, $2) \
         ON CONFLICT (combo_id, serving_date) DO UPDATE \
             SET serving_date = EXCLUDED.serving_date \
         RETURNING id, combo_id, serving_date, created_at",
    )
    .bind(combo_id)
    .bind(serving_date)
    .fetch_one(pool)
    .await
    .map_err(DbError::missing_parent)
}
