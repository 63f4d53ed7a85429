pub mod app_config;
pub mod calendar;
pub mod config;
pub mod entities;
pub mod format;
pub mod geo;
pub mod seed;
pub mod store;

pub use app_config::{AppConfig, Environment};
pub use calendar::{format_serving_date, parse_flexible_date, upcoming_days, DateWindow};
pub use config::{load_app_config, load_app_config_from_env};
pub use entities::{
    Combo, ComboHistory, ComboNutrition, Cuisine, Location, NutritionAttribute, Restaurant,
};
pub use format::{normalize_label, round_coordinate};
pub use geo::{bounds_within_radius, Coordinate, CoordinateBounds};
pub use seed::{load_seed, SeedFile};
pub use store::{CatalogStore, Geocoder, HistoryQuery, LocationQuery, NoGeocoder, RestaurantQuery};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read seed file {path}: {source}")]
    SeedFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse seed file: {0}")]
    SeedFileParse(#[from] serde_yaml::Error),

    #[error("seed validation failed: {0}")]
    Validation(String),
}
