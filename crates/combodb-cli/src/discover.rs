//! `discover`: run the discovery pipeline once and print the view as JSON.

use std::sync::Arc;

use chrono::Utc;
use combodb_core::{AppConfig, Coordinate};
use combodb_db::PgCatalog;
use combodb_discovery::{Discovery, DiscoverySettings, SortBy};
use combodb_geocode::ConfiguredGeocoder;

/// Where to search from.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Center {
    Zip(String),
    Point(Coordinate),
}

impl Center {
    /// # Errors
    ///
    /// Returns an error when neither a zip nor a full coordinate pair is given,
    /// or the coordinate is not finite.
    pub(crate) fn from_args(
        zip: Option<String>,
        latitude: Option<f64>,
        longitude: Option<f64>,
    ) -> anyhow::Result<Self> {
        match (zip, latitude, longitude) {
            (Some(zip), None, None) => Ok(Self::Zip(zip)),
            (None, Some(latitude), Some(longitude)) => {
                Ok(Self::Point(Coordinate::new(latitude, longitude)?))
            }
            _ => anyhow::bail!("pass either --zip or both --latitude and --longitude"),
        }
    }
}

pub(crate) async fn run_discover(
    pool: sqlx::PgPool,
    config: &AppConfig,
    center: Center,
    sort_by: Option<&str>,
) -> anyhow::Result<()> {
    let sort_by = SortBy::parse(sort_by)?;
    let discovery = Discovery::new(
        Arc::new(PgCatalog::new(pool)),
        Arc::new(ConfiguredGeocoder::from_app_config(config)?),
        DiscoverySettings::from_app_config(config),
    );

    let now = Utc::now();
    let view = match center {
        Center::Zip(zip) => discovery.combos_near_zip(&zip, sort_by, now).await?,
        Center::Point(point) => discovery.combos_near_coordinate(point, sort_by, now).await?,
    };

    println!("{}", serde_json::to_string_pretty(&view)?);
    Ok(())
}
