//! In-memory collaborators for driving the discovery pipeline.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use chrono::NaiveDate;
use combodb_core::{
    CatalogStore, Combo, ComboHistory, ComboNutrition, Coordinate, Cuisine, Geocoder,
    HistoryQuery, Location, LocationQuery, NutritionAttribute, Restaurant, RestaurantQuery,
};
use rust_decimal::Decimal;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
#[error("store unavailable")]
pub struct StoreUnavailable;

/// A catalog held in vectors. `failing` makes every call error.
#[derive(Default)]
pub struct InMemoryStore {
    pub locations: Vec<Location>,
    pub restaurants: Vec<Restaurant>,
    pub history: Vec<ComboHistory>,
    pub failing: bool,
}

impl InMemoryStore {
    fn check(&self) -> Result<(), StoreUnavailable> {
        if self.failing {
            Err(StoreUnavailable)
        } else {
            Ok(())
        }
    }
}

impl CatalogStore for InMemoryStore {
    type Error = StoreUnavailable;

    async fn find_locations(&self, query: &LocationQuery) -> Result<Vec<Location>, Self::Error> {
        self.check()?;
        Ok(self
            .locations
            .iter()
            .filter(|l| match query {
                LocationQuery::ByZip(zip) => &l.zip == zip,
                LocationQuery::ById(id) => &l.id == id,
            })
            .cloned()
            .collect())
    }

    async fn find_restaurants(
        &self,
        query: &RestaurantQuery,
    ) -> Result<Vec<Restaurant>, Self::Error> {
        self.check()?;
        Ok(self
            .restaurants
            .iter()
            .filter(|r| match query {
                RestaurantQuery::ActiveWithinBounds(bounds) => {
                    r.is_active && r.location.coordinate.is_some_and(|c| bounds.contains(c))
                }
                RestaurantQuery::ById(id) => &r.id == id,
            })
            .cloned()
            .collect())
    }

    async fn find_combo_history(
        &self,
        query: &HistoryQuery,
    ) -> Result<Vec<ComboHistory>, Self::Error> {
        self.check()?;
        Ok(self
            .history
            .iter()
            .filter(|h| match query {
                HistoryQuery::ForCombos { combo_ids, window } => {
                    combo_ids.contains(&h.combo_id) && window.contains(h.serving_date)
                }
                HistoryQuery::ForCombo(id) => &h.combo_id == id,
            })
            .cloned()
            .collect())
    }

    async fn ping(&self) -> Result<(), Self::Error> {
        self.check()
    }
}

/// A geocoder answering from a fixed table and recording every query.
#[derive(Default)]
pub struct ScriptedGeocoder {
    pub answers: HashMap<String, Coordinate>,
    pub postal_codes: HashMap<String, String>,
    pub delay: Option<Duration>,
    pub queries: Mutex<Vec<String>>,
}

impl ScriptedGeocoder {
    pub fn answering(query: &str, coordinate: Coordinate) -> Self {
        let mut answers = HashMap::new();
        answers.insert(query.to_string(), coordinate);
        Self {
            answers,
            ..Self::default()
        }
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

impl Geocoder for ScriptedGeocoder {
    async fn geocode(&self, address: &str) -> Option<Coordinate> {
        self.queries.lock().unwrap().push(address.to_string());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.answers.get(address).copied()
    }

    async fn reverse_geocode(&self, coordinate: Coordinate) -> Option<String> {
        let key = format!("{},{}", coordinate.latitude, coordinate.longitude);
        self.queries.lock().unwrap().push(key.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.postal_codes.get(&key).cloned()
    }
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

pub fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn point(latitude: f64, longitude: f64) -> Coordinate {
    Coordinate::new(latitude, longitude).unwrap()
}

pub fn location_at(zip: &str, coordinate: Option<Coordinate>) -> Location {
    Location {
        id: Uuid::new_v4(),
        street: "9500 Gilman Dr".to_string(),
        apt: None,
        city: "La Jolla".to_string(),
        state: "CA".to_string(),
        country: "US".to_string(),
        zip: zip.to_string(),
        coordinate,
    }
}

pub fn combo(name: &str, cuisines: &[&str], nutrition: &[NutritionAttribute]) -> Combo {
    let id = Uuid::new_v4();
    Combo {
        id,
        restaurant_id: Uuid::nil(),
        name: name.to_string(),
        image: Some(format!("https://img.example.com/{id}.jpg")),
        combo_type: "veg".to_string(),
        main_dish: "Dal Makhani".to_string(),
        side_dish: Some("Jeera Rice".to_string()),
        summary: Some("Lentils and rice".to_string()),
        ingredients: Some("lentils, rice".to_string()),
        price: Decimal::new(1299, 2),
        cuisines: cuisines
            .iter()
            .map(|label| Cuisine {
                id: Uuid::new_v4(),
                label: (*label).to_string(),
            })
            .collect(),
        nutrition: nutrition
            .iter()
            .map(|&attribute| ComboNutrition {
                combo_id: id,
                attribute,
            })
            .collect(),
    }
}

pub fn restaurant_at(name: &str, coordinate: Coordinate, combos: Vec<Combo>) -> Restaurant {
    let id = Uuid::new_v4();
    Restaurant {
        id,
        name: name.to_string(),
        website: Some(format!("https://{}.example.com", name.to_lowercase())),
        email: "owner@example.com".to_string(),
        contact: None,
        location: location_at("92093", Some(coordinate)),
        is_active: true,
        combos: combos
            .into_iter()
            .map(|mut combo| {
                combo.restaurant_id = id;
                combo
            })
            .collect(),
    }
}

pub fn served(combo: &Combo, date: NaiveDate) -> ComboHistory {
    ComboHistory {
        id: Uuid::new_v4(),
        combo_id: combo.id,
        serving_date: date,
    }
}
