//! Database operations for the `locations` table.

mod read;
mod types;
mod write;

pub use read::{get_location_by_id, list_locations_by_zip, list_locations_missing_coordinates};
pub use types::LocationRow;
pub use write::update_location_coordinate;
