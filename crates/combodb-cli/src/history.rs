//! `history` command handlers: schedule and list combo serving dates.

use chrono::NaiveDate;
use clap::Subcommand;
use combodb_core::{format_serving_date, parse_flexible_date, CatalogStore, HistoryQuery};
use combodb_db::PgCatalog;
use uuid::Uuid;

/// Sub-commands available under `history`.
#[derive(Debug, Subcommand)]
pub enum HistoryCommands {
    /// Record that a combo is served on a date
    Add {
        /// Combo id
        #[arg(long)]
        combo: Uuid,
        /// Serving date, e.g. 2020-11-21, 20201121, 11/21/2020, or "21 Nov 2020"
        #[arg(long, value_parser = parse_serving_date)]
        date: NaiveDate,
    },
    /// Show every recorded serving date of a combo
    List {
        /// Combo id
        #[arg(long)]
        combo: Uuid,
    },
}

pub(crate) fn parse_serving_date(value: &str) -> Result<NaiveDate, String> {
    parse_flexible_date(value).map_err(|e| e.to_string())
}

/// # Errors
///
/// Returns an error if the combo does not exist or the insert fails.
pub(crate) async fn run_history_add(
    pool: &sqlx::PgPool,
    combo_id: Uuid,
    date: NaiveDate,
) -> anyhow::Result<()> {
    let row = combodb_db::insert_combo_history(pool, combo_id, date)
        .await
        .map_err(|e| match e {
            combodb_db::DbError::NotFound => anyhow::anyhow!("combo '{combo_id}' not found"),
            other => other.into(),
        })?;
    tracing::info!(combo_id = %combo_id, %date, history_id = %row.id, "serving date recorded");
    println!("{}  {}", row.id, format_serving_date(row.serving_date));
    Ok(())
}

pub(crate) async fn run_history_list(pool: sqlx::PgPool, combo_id: Uuid) -> anyhow::Result<()> {
    let catalog = PgCatalog::new(pool);
    let mut rows = catalog
        .find_combo_history(&HistoryQuery::ForCombo(combo_id))
        .await?;

    if rows.is_empty() {
        println!("no serving dates recorded for combo {combo_id}");
        return Ok(());
    }

    rows.sort_by_key(|row| row.serving_date);
    for row in &rows {
        println!("{}  {}", row.id, format_serving_date(row.serving_date));
    }
    Ok(())
}
