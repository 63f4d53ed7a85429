use std::collections::HashSet;
use std::path::Path;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::entities::NutritionAttribute;
use crate::geo::Coordinate;
use crate::ConfigError;

#[derive(Debug, Clone, Deserialize)]
pub struct SeedLocation {
    pub street: String,
    pub apt: Option<String>,
    pub city: String,
    pub state: String,
    #[serde(default = "default_country")]
    pub country: String,
    pub zip: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl SeedLocation {
    /// The pre-resolved coordinate, if both components are present and finite.
    #[must_use]
    pub fn coordinate(&self) -> Option<Coordinate> {
        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => Coordinate::new(latitude, longitude)
                .ok()
                .map(Coordinate::rounded),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedCombo {
    pub name: String,
    pub image: Option<String>,
    pub combo_type: String,
    pub main_dish: String,
    pub side_dish: Option<String>,
    pub summary: Option<String>,
    pub ingredients: Option<String>,
    pub price: Decimal,
    #[serde(default)]
    pub cuisines: Vec<String>,
    #[serde(default)]
    pub nutrition: Vec<NutritionAttribute>,
    #[serde(default)]
    pub serving_dates: Vec<NaiveDate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedRestaurant {
    pub name: String,
    pub website: Option<String>,
    pub email: String,
    pub contact: Option<String>,
    pub location: SeedLocation,
    #[serde(default)]
    pub combos: Vec<SeedCombo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedFile {
    pub restaurants: Vec<SeedRestaurant>,
}

fn default_country() -> String {
    "US".to_string()
}

/// Load and validate the catalog seed from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_seed(path: &Path) -> Result<SeedFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::SeedFileIo {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_seed(&content)
}

fn parse_seed(content: &str) -> Result<SeedFile, ConfigError> {
    let seed: SeedFile = serde_yaml::from_str(content).map_err(ConfigError::SeedFileParse)?;
    validate_seed(&seed)?;
    Ok(seed)
}

fn validate_seed(seed: &SeedFile) -> Result<(), ConfigError> {
    let mut seen_names = HashSet::new();

    for restaurant in &seed.restaurants {
        if restaurant.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "restaurant name must be non-empty".to_string(),
            ));
        }

        if !seen_names.insert(restaurant.name.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate restaurant name: '{}'",
                restaurant.name
            )));
        }

        if restaurant.location.zip.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "restaurant '{}' has an empty zip",
                restaurant.name
            )));
        }

        for combo in &restaurant.combos {
            validate_combo(&restaurant.name, combo)?;
        }
    }

    Ok(())
}

fn validate_combo(restaurant: &str, combo: &SeedCombo) -> Result<(), ConfigError> {
    if combo.name.trim().is_empty() {
        return Err(ConfigError::Validation(format!(
            "restaurant '{restaurant}' has a combo with an empty name"
        )));
    }

    if combo.cuisines.iter().all(|c| c.trim().is_empty()) {
        return Err(ConfigError::Validation(format!(
            "combo '{}' of restaurant '{restaurant}' needs at least one cuisine",
            combo.name
        )));
    }

    if combo.nutrition.contains(&NutritionAttribute::Default) {
        return Err(ConfigError::Validation(format!(
            "combo '{}' of restaurant '{restaurant}' uses DEFAULT as a nutrition tag",
            combo.name
        )));
    }

    Ok(())
}
