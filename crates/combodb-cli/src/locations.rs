//! `locations geocode`: back-fill coordinates for stored locations.

use std::sync::Arc;
use std::time::Duration;

use clap::Subcommand;
use combodb_core::{AppConfig, Location};
use combodb_db::PgCatalog;
use combodb_discovery::{address_query, CoordinateResolver};
use combodb_geocode::ConfiguredGeocoder;

/// Sub-commands available under `locations`.
#[derive(Debug, Subcommand)]
pub enum LocationsCommands {
    /// Geocode stored locations that have no coordinate yet
    Geocode {
        /// Maximum number of locations to process
        #[arg(long, default_value = "100")]
        limit: u32,
        /// Resolve coordinates but do not write them back
        #[arg(long)]
        dry_run: bool,
    },
}

/// Resolve and store coordinates for up to `limit` unplaced locations.
///
/// Locations the geocoder cannot place are reported and left untouched.
///
/// # Errors
///
/// Returns an error if no geocoder is configured or a database call fails.
pub(crate) async fn run_locations_geocode(
    pool: sqlx::PgPool,
    config: &AppConfig,
    limit: u32,
    dry_run: bool,
) -> anyhow::Result<()> {
    let geocoder = ConfiguredGeocoder::from_app_config(config)?;
    if !geocoder.is_enabled() {
        anyhow::bail!("GEOCODER_API_KEY is required to back-fill coordinates");
    }

    let rows = combodb_db::list_locations_missing_coordinates(&pool, i64::from(limit)).await?;
    if rows.is_empty() {
        println!("every stored location already has a coordinate");
        return Ok(());
    }

    let resolver = CoordinateResolver::new(
        Arc::new(PgCatalog::new(pool.clone())),
        Arc::new(geocoder),
        Duration::from_secs(config.geocoder_timeout_secs),
    );

    let total = rows.len();
    let mut placed = 0_usize;
    for row in rows {
        let location = resolver
            .resolve_and_persist_coordinate(Location::from(row))
            .await;
        let Some(coordinate) = location.coordinate else {
            println!("{}  unresolved  {}", location.id, address_query(&location));
            continue;
        };

        if !dry_run {
            combodb_db::update_location_coordinate(&pool, location.id, coordinate).await?;
        }
        placed += 1;
        println!(
            "{}  {:.8},{:.8}  {}",
            location.id,
            coordinate.latitude,
            coordinate.longitude,
            address_query(&location)
        );
    }

    tracing::info!(total, placed, dry_run, "location geocoding complete");
    if dry_run {
        println!("dry run: {placed} of {total} location(s) would be updated");
    } else {
        println!("updated {placed} of {total} location(s)");
    }
    Ok(())
}
