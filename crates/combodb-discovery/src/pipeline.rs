//! The discovery request pipeline.
//!
//! Resolve a point, box it, find restaurants inside the box, index the
//! upcoming serving dates of their combos, and shape the requested view.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use combodb_core::{bounds_within_radius, AppConfig, CatalogStore, Combo, Coordinate, Geocoder};
use serde::Serialize;
use tracing::info;

use crate::assemble::{group_by_cuisine, group_by_date, CuisineView, DateView};
use crate::availability::{availability_by_combo, availability_by_date};
use crate::proximity::restaurants_within_bounds;
use crate::resolver::CoordinateResolver;
use crate::DiscoveryError;

/// Which view a discovery request returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortBy {
    #[default]
    Cuisine,
    Date,
}

impl SortBy {
    /// Parse the `sort_by` request parameter. Absent or blank means cuisine.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::InvalidArgument`] for any value other than
    /// `cuisine` or `date`.
    pub fn parse(value: Option<&str>) -> Result<Self, DiscoveryError> {
        match value.map(str::trim) {
            None | Some("") => Ok(Self::Cuisine),
            Some(v) if v.eq_ignore_ascii_case("cuisine") => Ok(Self::Cuisine),
            Some(v) if v.eq_ignore_ascii_case("date") => Ok(Self::Date),
            Some(other) => Err(DiscoveryError::InvalidArgument(format!(
                "unknown sort_by '{other}'; expected 'cuisine' or 'date'"
            ))),
        }
    }
}

/// The shaped result of a discovery request.
///
/// Serializes as `{"combos": {...}}` or `{"dates": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DiscoveryView {
    #[serde(rename = "combos")]
    ByCuisine(CuisineView),
    #[serde(rename = "dates")]
    ByDate(DateView),
}

#[derive(Debug, Clone)]
pub struct DiscoverySettings {
    pub radius_miles: f64,
    /// Base URL for restaurant links in combo records.
    pub public_base_url: String,
    pub geocoder_timeout: Duration,
}

impl DiscoverySettings {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            radius_miles: config.search_radius_miles,
            public_base_url: config.public_base_url.clone(),
            geocoder_timeout: Duration::from_secs(config.geocoder_timeout_secs),
        }
    }
}

/// Finds combos near a zip or coordinate.
///
/// Stateless between requests; cheap to share behind an `Arc`.
pub struct Discovery<S, G> {
    store: Arc<S>,
    resolver: CoordinateResolver<S, G>,
    settings: DiscoverySettings,
}

impl<S, G> Discovery<S, G>
where
    S: CatalogStore,
    G: Geocoder,
{
    #[must_use]
    pub fn new(store: Arc<S>, geocoder: Arc<G>, settings: DiscoverySettings) -> Self {
        let resolver =
            CoordinateResolver::new(Arc::clone(&store), geocoder, settings.geocoder_timeout);
        Self {
            store,
            resolver,
            settings,
        }
    }

    #[must_use]
    pub fn resolver(&self) -> &CoordinateResolver<S, G> {
        &self.resolver
    }

    #[must_use]
    pub fn settings(&self) -> &DiscoverySettings {
        &self.settings
    }

    /// Combos near `zip`.
    ///
    /// # Errors
    ///
    /// - [`DiscoveryError::InvalidArgument`] if `zip` is blank.
    /// - [`DiscoveryError::CoordinatesUnresolved`] if neither stored
    ///   locations nor the geocoder can place `zip`.
    pub async fn combos_near_zip(
        &self,
        zip: &str,
        sort_by: SortBy,
        now: DateTime<Utc>,
    ) -> Result<DiscoveryView, DiscoveryError> {
        let coordinate = self
            .resolver
            .coordinate_for_zip(zip)
            .await?
            .ok_or(DiscoveryError::CoordinatesUnresolved)?;
        self.combos_near_coordinate(coordinate, sort_by, now).await
    }

    /// Combos served in the week after `now` by active restaurants within
    /// the configured radius of `center`.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::InvalidArgument`] if `center` is not finite
    /// or the configured radius is not positive.
    pub async fn combos_near_coordinate(
        &self,
        center: Coordinate,
        sort_by: SortBy,
        now: DateTime<Utc>,
    ) -> Result<DiscoveryView, DiscoveryError> {
        let bounds = bounds_within_radius(center, self.settings.radius_miles)?;
        let restaurants = restaurants_within_bounds(self.store.as_ref(), &bounds).await;
        let combos: Vec<Combo> = restaurants
            .iter()
            .flat_map(|r| r.combos.iter().cloned())
            .collect();
        let base_url = self.settings.public_base_url.as_str();

        let view = match sort_by {
            SortBy::Cuisine => {
                let availability = availability_by_combo(self.store.as_ref(), &combos, now).await;
                DiscoveryView::ByCuisine(group_by_cuisine(&restaurants, &availability, base_url))
            }
            SortBy::Date => {
                let slots = availability_by_date(self.store.as_ref(), &combos, now).await;
                DiscoveryView::ByDate(group_by_date(slots, &restaurants, base_url))
            }
        };

        info!(
            latitude = center.latitude,
            longitude = center.longitude,
            restaurants = restaurants.len(),
            combos = combos.len(),
            ?sort_by,
            "discovery complete"
        );
        Ok(view)
    }
}
