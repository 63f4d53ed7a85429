//! Geo-bounded combo discovery.
//!
//! Given a zip or a coordinate, finds the combos that active restaurants
//! nearby serve over the coming week, grouped by cuisine or by day.

pub mod assemble;
pub mod availability;
pub mod error;
pub mod pipeline;
pub mod proximity;
pub mod resolver;

pub use assemble::{
    group_by_cuisine, group_by_date, restaurant_link, ComboRecord, CuisineComboRecord,
    CuisineView, DateView, DatedComboRecord, RestaurantSummary,
};
pub use availability::{
    availability_by_combo, availability_by_date, index_by_combo, index_by_date,
    ComboAvailability, DaySlots,
};
pub use error::DiscoveryError;
pub use pipeline::{Discovery, DiscoverySettings, DiscoveryView, SortBy};
pub use proximity::restaurants_within_bounds;
pub use resolver::{address_query, CoordinateResolver};
