//! Turning zips and postal addresses into coordinates.

use std::sync::Arc;
use std::time::Duration;

use combodb_core::{CatalogStore, Coordinate, Geocoder, Location, LocationQuery};
use tracing::{debug, error, warn};

use crate::DiscoveryError;

/// Resolves zips and addresses to coordinates.
///
/// Stored locations are consulted before the geocoder so that zips already
/// known to the catalog never cost a provider call. Every geocoder call is
/// bounded by `timeout`; a timeout counts as "not found".
pub struct CoordinateResolver<S, G> {
    store: Arc<S>,
    geocoder: Arc<G>,
    timeout: Duration,
}

impl<S, G> Clone for CoordinateResolver<S, G> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            geocoder: Arc::clone(&self.geocoder),
            timeout: self.timeout,
        }
    }
}

impl<S, G> CoordinateResolver<S, G>
where
    S: CatalogStore,
    G: Geocoder,
{
    #[must_use]
    pub fn new(store: Arc<S>, geocoder: Arc<G>, timeout: Duration) -> Self {
        Self {
            store,
            geocoder,
            timeout,
        }
    }

    /// Coordinate of `zip`, or `None` when nothing can place it.
    ///
    /// The first stored location with that zip and a coordinate wins. When
    /// there is none (or the store fails) the zip itself is geocoded.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::InvalidArgument`] if `zip` is blank.
    pub async fn coordinate_for_zip(&self, zip: &str) -> Result<Option<Coordinate>, DiscoveryError> {
        let zip = zip.trim();
        if zip.is_empty() {
            return Err(DiscoveryError::InvalidArgument(
                "zipcode cannot be empty".to_string(),
            ));
        }

        match self
            .store
            .find_locations(&LocationQuery::ByZip(zip.to_string()))
            .await
        {
            Ok(locations) => {
                if let Some(coordinate) = locations.iter().find_map(|l| l.coordinate) {
                    debug!(zip, "zip resolved from stored location");
                    return Ok(Some(coordinate));
                }
            }
            Err(e) => error!(zip, error = %e, "stored location lookup failed"),
        }

        Ok(self.geocode(zip).await)
    }

    /// Geocode a location's postal address and set the result on it.
    ///
    /// The query is the lower-cased street, city and state (blanks skipped)
    /// followed by the zip, comma-joined. When the geocoder finds nothing the
    /// location comes back unchanged, still without a coordinate; callers
    /// must check. Storing the result is left to the caller.
    pub async fn resolve_and_persist_coordinate(&self, mut location: Location) -> Location {
        let query = address_query(&location);
        match self.geocode(&query).await {
            Some(coordinate) => location.set_coordinate(coordinate),
            None => warn!(location_id = %location.id, "could not place location"),
        }
        location
    }

    /// Postal code at `coordinate`, or `None` when the geocoder has no answer.
    pub async fn zip_for_coordinate(&self, coordinate: Coordinate) -> Option<String> {
        match tokio::time::timeout(self.timeout, self.geocoder.reverse_geocode(coordinate)).await {
            Ok(found) => found,
            Err(_) => {
                warn!(timeout_secs = self.timeout.as_secs_f64(), "reverse geocoding timed out");
                None
            }
        }
    }

    async fn geocode(&self, query: &str) -> Option<Coordinate> {
        match tokio::time::timeout(self.timeout, self.geocoder.geocode(query)).await {
            Ok(found) => found,
            Err(_) => {
                warn!(query, timeout_secs = self.timeout.as_secs_f64(), "geocoding timed out");
                None
            }
        }
    }
}

/// Geocoder query for a location's postal address.
#[must_use]
pub fn address_query(location: &Location) -> String {
    let mut parts: Vec<String> = [&location.street, &location.city, &location.state]
        .into_iter()
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .map(str::to_lowercase)
        .collect();
    parts.push(location.zip.trim().to_string());
    parts.join(",")
}
