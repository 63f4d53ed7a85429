//! Row types for the `locations` table.

use chrono::{DateTime, Utc};
use combodb_core::{Coordinate, Location};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use uuid::Uuid;

/// A row from the `locations` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct LocationRow {
    pub id: Uuid,
    pub street: String,
    pub apt: Option<String>,
    pub city: String,
    pub state: String,
    pub country: String,
    pub zip: String,
    pub latitude: Option<Decimal>,
    pub longitude: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LocationRow {
    /// The stored coordinate, if both components are present.
    #[must_use]
    pub fn coordinate(&self) -> Option<Coordinate> {
        let latitude = self.latitude.and_then(|d| d.to_f64())?;
        let longitude = self.longitude.and_then(|d| d.to_f64())?;
        Coordinate::new(latitude, longitude).ok()
    }
}

impl From<LocationRow> for Location {
    fn from(row: LocationRow) -> Self {
        let coordinate = row.coordinate();
        Self {
            id: row.id,
            street: row.street,
            apt: row.apt,
            city: row.city,
            state: row.state,
            country: row.country,
            zip: row.zip,
            coordinate,
        }
    }
}
