//! Collaborator seams for the discovery pipeline.
//!
//! The pipeline never talks to Postgres or the geocoding provider directly.
//! It issues typed queries against a [`CatalogStore`] and asks a [`Geocoder`]
//! for coordinates, so both can be swapped for in-memory fakes in tests.

use std::future::Future;

use uuid::Uuid;

use crate::calendar::DateWindow;
use crate::entities::{ComboHistory, Location, Restaurant};
use crate::geo::{Coordinate, CoordinateBounds};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationQuery {
    ByZip(String),
    ById(Uuid),
}

#[derive(Debug, Clone, PartialEq)]
pub enum RestaurantQuery {
    /// Active restaurants whose location lies inside the bounds.
    ActiveWithinBounds(CoordinateBounds),
    ById(Uuid),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryQuery {
    /// Serving dates of any of `combo_ids` falling inside `window`.
    ForCombos {
        combo_ids: Vec<Uuid>,
        window: DateWindow,
    },
    /// Every serving date of one combo.
    ForCombo(Uuid),
}

/// Read access to the restaurant catalog.
///
/// Restaurants come back fully materialized: location, combos, and each
/// combo's cuisines and nutrition tags. History rows are never embedded and
/// must be fetched with [`CatalogStore::find_combo_history`].
pub trait CatalogStore: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    fn find_locations(
        &self,
        query: &LocationQuery,
    ) -> impl Future<Output = Result<Vec<Location>, Self::Error>> + Send;

    fn find_restaurants(
        &self,
        query: &RestaurantQuery,
    ) -> impl Future<Output = Result<Vec<Restaurant>, Self::Error>> + Send;

    fn find_combo_history(
        &self,
        query: &HistoryQuery,
    ) -> impl Future<Output = Result<Vec<ComboHistory>, Self::Error>> + Send;

    fn ping(&self) -> impl Future<Output = Result<(), Self::Error>> + Send;
}

/// Converts free-text addresses to coordinates and back.
///
/// Implementations swallow provider failures: "no answer" and "provider
/// error" both come back as `None`.
pub trait Geocoder: Send + Sync {
    fn geocode(&self, address: &str) -> impl Future<Output = Option<Coordinate>> + Send;

    fn reverse_geocode(&self, coordinate: Coordinate)
        -> impl Future<Output = Option<String>> + Send;
}

/// A geocoder that never finds anything. Used when no provider is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoGeocoder;

impl Geocoder for NoGeocoder {
    async fn geocode(&self, _address: &str) -> Option<Coordinate> {
        None
    }

    async fn reverse_geocode(&self, _coordinate: Coordinate) -> Option<String> {
        None
    }
}
