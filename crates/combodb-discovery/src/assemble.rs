//! Presentation views over restaurants and their availability.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::NaiveDate;
use combodb_core::{format_serving_date, normalize_label, Combo, Restaurant};
use rust_decimal::Decimal;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use tracing::debug;
use uuid::Uuid;

use crate::availability::{ComboAvailability, DaySlots};

/// Restaurant attribution attached to every combo record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RestaurantSummary {
    pub name: String,
    pub website: Option<String>,
    /// Absolute URL of the restaurant resource.
    pub link: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComboRecord {
    pub id: Uuid,
    pub name: String,
    pub image: Option<String>,
    #[serde(rename = "type")]
    pub combo_type: String,
    pub main_dish: String,
    pub side_dish: Option<String>,
    pub summary: Option<String>,
    pub nutrition_attributes: Vec<String>,
    pub restaurant: RestaurantSummary,
    pub price: Decimal,
    pub ingredients: Option<String>,
}

impl ComboRecord {
    fn new(restaurant: &Restaurant, combo: &Combo, base_url: &str) -> Self {
        Self {
            id: combo.id,
            name: combo.name.clone(),
            image: combo.image.clone(),
            combo_type: normalize_label(&combo.combo_type),
            main_dish: combo.main_dish.clone(),
            side_dish: combo.side_dish.clone(),
            summary: combo.summary.clone(),
            nutrition_attributes: combo.nutrition_labels(),
            restaurant: RestaurantSummary {
                name: restaurant.name.clone(),
                website: restaurant.website.clone(),
                link: restaurant_link(base_url, restaurant.id),
            },
            price: combo.price,
            ingredients: combo.ingredients.clone(),
        }
    }
}

/// A combo listed under a cuisine, with every upcoming serving date.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CuisineComboRecord {
    #[serde(flatten)]
    pub combo: ComboRecord,
    pub available_dates: Vec<String>,
}

/// A combo listed under one serving day.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatedComboRecord {
    /// Identity of the history row that placed the combo on this day.
    pub history_id: Uuid,
    #[serde(flatten)]
    pub combo: ComboRecord,
    /// Cuisine labels as stored, not normalized.
    pub cuisines: Vec<String>,
}

/// Combo records bucketed by normalized cuisine label.
pub type CuisineView = BTreeMap<String, Vec<CuisineComboRecord>>;

/// Combo records per upcoming day, serialized as a map keyed by
/// `"yyyy-MM-dd, Weekday"` in calendar order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DateView(BTreeMap<NaiveDate, Vec<DatedComboRecord>>);

impl DateView {
    #[must_use]
    pub fn days(&self) -> Vec<NaiveDate> {
        self.0.keys().copied().collect()
    }

    #[must_use]
    pub fn get(&self, day: NaiveDate) -> Option<&[DatedComboRecord]> {
        self.0.get(&day).map(Vec::as_slice)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NaiveDate, &Vec<DatedComboRecord>)> {
        self.0.iter()
    }
}

impl Serialize for DateView {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (day, records) in &self.0 {
            map.serialize_entry(&format_serving_date(*day), records)?;
        }
        map.end()
    }
}

/// `{base_url}/api/v1/restaurants/{id}`.
#[must_use]
pub fn restaurant_link(base_url: &str, restaurant_id: Uuid) -> String {
    format!(
        "{}/api/v1/restaurants/{restaurant_id}",
        base_url.trim_end_matches('/')
    )
}

/// Bucket every available combo under each of its cuisines.
///
/// A combo with no entry in `availability` is left out entirely, and a
/// restaurant none of whose combos are available is skipped without
/// building any records.
#[must_use]
pub fn group_by_cuisine(
    restaurants: &[Restaurant],
    availability: &ComboAvailability,
    base_url: &str,
) -> CuisineView {
    let mut view = CuisineView::new();

    for restaurant in restaurants {
        if !restaurant
            .combos
            .iter()
            .any(|combo| availability.contains_key(&combo.id))
        {
            continue;
        }

        for combo in &restaurant.combos {
            let Some(dates) = availability.get(&combo.id) else {
                continue;
            };
            let labels: BTreeSet<String> = combo
                .cuisines
                .iter()
                .map(|cuisine| normalize_label(cuisine.label.trim()))
                .filter(|label| !label.is_empty())
                .collect();
            if labels.is_empty() {
                continue;
            }

            let record = CuisineComboRecord {
                combo: ComboRecord::new(restaurant, combo, base_url),
                available_dates: dates.clone(),
            };
            for label in labels {
                view.entry(label).or_default().push(record.clone());
            }
        }
    }

    view
}

/// Turn each day's history rows into combo records, keeping every day.
///
/// Rows for combos not found among `restaurants` are skipped.
#[must_use]
pub fn group_by_date(slots: DaySlots, restaurants: &[Restaurant], base_url: &str) -> DateView {
    let combos: HashMap<Uuid, (&Restaurant, &Combo)> = restaurants
        .iter()
        .flat_map(|restaurant| {
            restaurant
                .combos
                .iter()
                .map(move |combo| (combo.id, (restaurant, combo)))
        })
        .collect();

    let days = slots
        .into_iter()
        .map(|(day, rows)| {
            let records = rows
                .into_iter()
                .filter_map(|row| {
                    let Some(&(restaurant, combo)) = combos.get(&row.combo_id) else {
                        debug!(combo_id = %row.combo_id, "history row for unknown combo; skipped");
                        return None;
                    };
                    Some(DatedComboRecord {
                        history_id: row.id,
                        combo: ComboRecord::new(restaurant, combo, base_url),
                        cuisines: combo.cuisines.iter().map(|c| c.label.clone()).collect(),
                    })
                })
                .collect();
            (day, records)
        })
        .collect();

    DateView(days)
}
