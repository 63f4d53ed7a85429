use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geo::Coordinate;

/// A postal address, optionally placed on the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: Uuid,
    pub street: String,
    pub apt: Option<String>,
    pub city: String,
    pub state: String,
    pub country: String,
    pub zip: String,
    /// Absent until the address has been geocoded.
    pub coordinate: Option<Coordinate>,
}

impl Location {
    /// Store `coordinate` on this location at storage precision.
    pub fn set_coordinate(&mut self, coordinate: Coordinate) {
        self.coordinate = Some(coordinate.rounded());
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Restaurant {
    pub id: Uuid,
    pub name: String,
    pub website: Option<String>,
    pub email: String,
    pub contact: Option<String>,
    pub location: Location,
    pub is_active: bool,
    pub combos: Vec<Combo>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Combo {
    pub id: Uuid,
    pub restaurant_id: Uuid,
    pub name: String,
    pub image: Option<String>,
    pub combo_type: String,
    pub main_dish: String,
    pub side_dish: Option<String>,
    pub summary: Option<String>,
    pub ingredients: Option<String>,
    pub price: Decimal,
    pub cuisines: Vec<Cuisine>,
    pub nutrition: Vec<ComboNutrition>,
}

impl Combo {
    /// Display labels of the combo's nutrition tags, in stored order.
    ///
    /// `Default` tags are delete markers and never surface.
    #[must_use]
    pub fn nutrition_labels(&self) -> Vec<String> {
        self.nutrition
            .iter()
            .filter(|n| n.attribute != NutritionAttribute::Default)
            .map(|n| n.attribute.label().to_string())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cuisine {
    pub id: Uuid,
    pub label: String,
}

/// One date on which a combo is served.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComboHistory {
    pub id: Uuid,
    pub combo_id: Uuid,
    pub serving_date: NaiveDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NutritionAttribute {
    #[serde(alias = "LOW_CHOLESTROL")]
    LowCholesterol,
    LowSodium,
    LowCarbohydrates,
    LowCalories,
    GlutenFree,
    /// "No tag". Marks a deleted tag; never a real attribute.
    Default,
}

impl NutritionAttribute {
    /// Stable numeric code used by the `combo_nutrition` table.
    #[must_use]
    pub fn code(self) -> i16 {
        match self {
            Self::LowCholesterol => 1,
            Self::LowSodium => 2,
            Self::LowCarbohydrates => 3,
            Self::LowCalories => 4,
            Self::GlutenFree => 5,
            Self::Default => -1,
        }
    }

    /// Unknown codes map to [`NutritionAttribute::Default`].
    #[must_use]
    pub fn from_code(code: i16) -> Self {
        match code {
            1 => Self::LowCholesterol,
            2 => Self::LowSodium,
            3 => Self::LowCarbohydrates,
            4 => Self::LowCalories,
            5 => Self::GlutenFree,
            _ => Self::Default,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::LowCholesterol => "Low Cholesterol",
            Self::LowSodium => "Low Sodium",
            Self::LowCarbohydrates => "Low Carbohydrates",
            Self::LowCalories => "Low Calories",
            Self::GlutenFree => "Gluten Free",
            Self::Default => "None",
        }
    }
}

impl std::fmt::Display for NutritionAttribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ComboNutrition {
    pub combo_id: Uuid,
    pub attribute: NutritionAttribute,
}
