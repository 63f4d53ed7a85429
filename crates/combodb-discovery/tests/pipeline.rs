//! End-to-end tests for the discovery pipeline over in-memory collaborators.

mod common;

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use combodb_core::{NoGeocoder, NutritionAttribute};
use combodb_discovery::{
    availability_by_date, Discovery, DiscoveryError, DiscoverySettings, DiscoveryView, SortBy,
};

use common::{
    combo, location_at, point, restaurant_at, served, ymd, InMemoryStore, ScriptedGeocoder,
};

const BASE_URL: &str = "http://localhost:3000";

fn settings() -> DiscoverySettings {
    DiscoverySettings {
        radius_miles: 5.2,
        public_base_url: BASE_URL.to_string(),
        geocoder_timeout: Duration::from_millis(200),
    }
}

/// Thursday morning; the upcoming week runs Fri 2020-11-20 to Thu 2020-11-26.
fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2020, 11, 19, 8, 0, 0).unwrap()
}

fn discovery<G: combodb_core::Geocoder>(
    store: InMemoryStore,
    geocoder: G,
) -> Discovery<InMemoryStore, G> {
    Discovery::new(Arc::new(store), Arc::new(geocoder), settings())
}

fn by_cuisine(view: DiscoveryView) -> combodb_discovery::CuisineView {
    match view {
        DiscoveryView::ByCuisine(v) => v,
        DiscoveryView::ByDate(_) => panic!("expected the cuisine view"),
    }
}

fn by_date(view: DiscoveryView) -> combodb_discovery::DateView {
    match view {
        DiscoveryView::ByDate(v) => v,
        DiscoveryView::ByCuisine(_) => panic!("expected the date view"),
    }
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[tokio::test]
async fn single_indian_combo_lands_in_one_bucket() {
    let center = point(92.003_122_3, 32.877_883);
    let thali = combo("Veg Thali", &["indian"], &[NutritionAttribute::LowCalories]);
    let store = InMemoryStore {
        history: vec![served(&thali, ymd(2020, 11, 21))],
        restaurants: vec![restaurant_at("Curry House", center, vec![thali.clone()])],
        ..InMemoryStore::default()
    };

    let view = by_cuisine(
        discovery(store, NoGeocoder)
            .combos_near_coordinate(center, SortBy::Cuisine, now())
            .await
            .unwrap(),
    );

    assert_eq!(view.len(), 1);
    let records = &view["Indian"];
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.combo.id, thali.id);
    assert_eq!(record.available_dates, vec!["2020-11-21, Saturday"]);
    assert_eq!(record.combo.nutrition_attributes, vec!["Low Calories"]);
    assert_eq!(record.combo.restaurant.name, "Curry House");
    assert!(record
        .combo
        .restaurant
        .link
        .starts_with("http://localhost:3000/api/v1/restaurants/"));
}

#[tokio::test]
async fn restaurant_without_combos_yields_empty_view() {
    let center = point(92.003_122_3, 32.877_883);
    let store = InMemoryStore {
        restaurants: vec![restaurant_at("Empty Kitchen", center, vec![])],
        ..InMemoryStore::default()
    };

    let view = by_cuisine(
        discovery(store, NoGeocoder)
            .combos_near_coordinate(center, SortBy::Cuisine, now())
            .await
            .unwrap(),
    );
    assert!(view.is_empty());
}

#[tokio::test]
async fn combo_served_the_day_after_tomorrow_fills_that_slot() {
    let center = point(32.877_883, -117.2375);
    let thali = combo("Veg Thali", &["indian", "north indian"], &[]);
    let store = InMemoryStore {
        history: vec![served(&thali, ymd(2020, 11, 21))],
        restaurants: vec![restaurant_at("Curry House", center, vec![thali.clone()])],
        ..InMemoryStore::default()
    };

    let view = by_date(
        discovery(store, NoGeocoder)
            .combos_near_coordinate(center, SortBy::Date, now())
            .await
            .unwrap(),
    );

    assert_eq!(view.len(), 7);
    assert_eq!(view.days()[0], ymd(2020, 11, 20));
    let slot = view.get(ymd(2020, 11, 21)).unwrap();
    assert_eq!(slot.len(), 1);
    assert_eq!(slot[0].combo.id, thali.id);
    assert_eq!(slot[0].cuisines, vec!["indian", "north indian"]);

    let json = serde_json::to_value(&view).unwrap();
    assert_eq!(json["2020-11-21, Saturday"][0]["name"], "Veg Thali");
    assert!(json["2020-11-20, Friday"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn unknown_zip_with_silent_geocoder_is_unresolved() {
    let result = discovery(InMemoryStore::default(), NoGeocoder)
        .combos_near_zip("99999", SortBy::Cuisine, now())
        .await;
    assert!(matches!(result, Err(DiscoveryError::CoordinatesUnresolved)));
}

// ---------------------------------------------------------------------------
// Coordinate resolution
// ---------------------------------------------------------------------------

#[tokio::test]
async fn blank_zip_is_invalid_argument() {
    let result = discovery(InMemoryStore::default(), NoGeocoder)
        .combos_near_zip("   ", SortBy::Cuisine, now())
        .await;
    assert!(matches!(result, Err(DiscoveryError::InvalidArgument(_))));
}

#[tokio::test]
async fn stored_zip_skips_the_geocoder() {
    let center = point(32.877_883, -117.2375);
    let store = InMemoryStore {
        locations: vec![location_at("92093", Some(center))],
        ..InMemoryStore::default()
    };
    let geocoder = Arc::new(ScriptedGeocoder::default());
    let discovery = Discovery::new(Arc::new(store), Arc::clone(&geocoder), settings());

    let coordinate = discovery
        .resolver()
        .coordinate_for_zip("92093")
        .await
        .unwrap();
    assert_eq!(coordinate, Some(center));
    assert!(geocoder.queries().is_empty());
}

#[tokio::test]
async fn unknown_zip_falls_back_to_geocoder() {
    let placed = point(40.750_504, -73.993_439);
    let geocoder = Arc::new(ScriptedGeocoder::answering("10001", placed));
    let discovery = Discovery::new(
        Arc::new(InMemoryStore::default()),
        Arc::clone(&geocoder),
        settings(),
    );

    let coordinate = discovery
        .resolver()
        .coordinate_for_zip("10001")
        .await
        .unwrap();
    assert_eq!(coordinate, Some(placed));
    assert_eq!(geocoder.queries(), vec!["10001"]);
}

#[tokio::test]
async fn failing_store_still_lets_the_geocoder_answer() {
    let placed = point(40.750_504, -73.993_439);
    let store = InMemoryStore {
        failing: true,
        ..InMemoryStore::default()
    };
    let coordinate = discovery(store, ScriptedGeocoder::answering("10001", placed))
        .resolver()
        .coordinate_for_zip("10001")
        .await
        .unwrap();
    assert_eq!(coordinate, Some(placed));
}

#[tokio::test]
async fn slow_geocoder_counts_as_unresolved() {
    let geocoder = ScriptedGeocoder {
        delay: Some(Duration::from_secs(5)),
        ..ScriptedGeocoder::answering("10001", point(40.75, -73.99))
    };
    let result = discovery(InMemoryStore::default(), geocoder)
        .combos_near_zip("10001", SortBy::Cuisine, now())
        .await;
    assert!(matches!(result, Err(DiscoveryError::CoordinatesUnresolved)));
}

#[tokio::test]
async fn resolve_and_persist_sets_rounded_coordinate() {
    let location = location_at("92093", None);
    let geocoder = ScriptedGeocoder::answering(
        "9500 gilman dr,la jolla,ca,92093",
        point(32.123_456_781, -117.123_456_789),
    );

    let resolved = discovery(InMemoryStore::default(), geocoder)
        .resolver()
        .resolve_and_persist_coordinate(location.clone())
        .await;

    assert_eq!(resolved.id, location.id);
    let coordinate = resolved.coordinate.expect("location should be placed");
    assert!((coordinate.latitude - 32.123_456_79).abs() < 1e-12);
    assert!((coordinate.longitude - -117.123_456_78).abs() < 1e-12);
}

#[tokio::test]
async fn resolve_and_persist_leaves_unplaceable_location_unchanged() {
    let location = location_at("92093", None);
    let resolved = discovery(InMemoryStore::default(), NoGeocoder)
        .resolver()
        .resolve_and_persist_coordinate(location.clone())
        .await;
    assert_eq!(resolved, location);
}

// ---------------------------------------------------------------------------
// Proximity and availability
// ---------------------------------------------------------------------------

#[tokio::test]
async fn far_and_inactive_restaurants_are_excluded() {
    let center = point(32.877_883, -117.2375);
    let near = combo("Near", &["thai"], &[]);
    let far = combo("Far", &["thai"], &[]);
    let closed = combo("Closed", &["thai"], &[]);
    let mut inactive = restaurant_at("Closed Kitchen", center, vec![closed.clone()]);
    inactive.is_active = false;

    let store = InMemoryStore {
        history: vec![
            served(&near, ymd(2020, 11, 21)),
            served(&far, ymd(2020, 11, 21)),
            served(&closed, ymd(2020, 11, 21)),
        ],
        restaurants: vec![
            restaurant_at("Near Thai", center, vec![near.clone()]),
            restaurant_at("Far Thai", point(40.7128, -74.006), vec![far]),
            inactive,
        ],
        ..InMemoryStore::default()
    };

    let view = by_cuisine(
        discovery(store, NoGeocoder)
            .combos_near_coordinate(center, SortBy::Cuisine, now())
            .await
            .unwrap(),
    );
    let ids: Vec<_> = view["Thai"].iter().map(|r| r.combo.id).collect();
    assert_eq!(ids, vec![near.id]);
}

#[tokio::test]
async fn combo_without_upcoming_dates_never_appears_by_cuisine() {
    let center = point(32.877_883, -117.2375);
    let weekly = combo("Weekly", &["indian"], &[]);
    let retired = combo("Retired", &["indian"], &[]);
    let store = InMemoryStore {
        history: vec![
            served(&weekly, ymd(2020, 11, 22)),
            served(&retired, ymd(2020, 10, 1)),
        ],
        restaurants: vec![restaurant_at(
            "Curry House",
            center,
            vec![weekly.clone(), retired.clone()],
        )],
        ..InMemoryStore::default()
    };

    let view = by_cuisine(
        discovery(store, NoGeocoder)
            .combos_near_coordinate(center, SortBy::Cuisine, now())
            .await
            .unwrap(),
    );
    let ids: Vec<_> = view.values().flatten().map(|r| r.combo.id).collect();
    assert!(ids.contains(&weekly.id));
    assert!(!ids.contains(&retired.id));
}

#[tokio::test]
async fn failing_store_degrades_to_empty_views() {
    let store = InMemoryStore {
        failing: true,
        ..InMemoryStore::default()
    };
    let discovery = discovery(store, NoGeocoder);
    let center = point(32.877_883, -117.2375);

    let cuisine = by_cuisine(
        discovery
            .combos_near_coordinate(center, SortBy::Cuisine, now())
            .await
            .unwrap(),
    );
    assert!(cuisine.is_empty());

    let dates = by_date(
        discovery
            .combos_near_coordinate(center, SortBy::Date, now())
            .await
            .unwrap(),
    );
    assert_eq!(dates.len(), 7);
    assert!(dates.iter().all(|(_, records)| records.is_empty()));
}

#[tokio::test]
async fn date_view_has_seven_consecutive_days_for_any_combo_set() {
    let thali = combo("Thali", &["indian"], &[]);
    let store = InMemoryStore {
        history: vec![served(&thali, ymd(2020, 11, 27))],
        ..InMemoryStore::default()
    };

    for combos in [vec![], vec![thali.clone()]] {
        let slots = availability_by_date(&store, &combos, now()).await;
        let days: Vec<_> = slots.keys().copied().collect();
        assert_eq!(days.len(), 7);
        assert_eq!(days[0], ymd(2020, 11, 20));
        for pair in days.windows(2) {
            assert_eq!(pair[0].succ_opt(), Some(pair[1]));
        }
        assert!(slots.values().all(Vec::is_empty), "day 8 must not add a key");
    }
}

#[tokio::test]
async fn evening_request_lists_tomorrow_in_both_views() {
    let center = point(32.877_883, -117.2375);
    let thali = combo("Thali", &["indian"], &[]);
    let store = Arc::new(InMemoryStore {
        history: vec![
            served(&thali, ymd(2020, 11, 20)),
            served(&thali, ymd(2020, 11, 27)),
        ],
        restaurants: vec![restaurant_at("Curry House", center, vec![thali.clone()])],
        ..InMemoryStore::default()
    });
    let evening = Utc.with_ymd_and_hms(2020, 11, 19, 20, 0, 0).unwrap();
    let discovery = Discovery::new(store, Arc::new(NoGeocoder), settings());

    let cuisine = by_cuisine(
        discovery
            .combos_near_coordinate(center, SortBy::Cuisine, evening)
            .await
            .unwrap(),
    );
    assert_eq!(
        cuisine["Indian"][0].available_dates,
        vec!["2020-11-20, Friday"]
    );

    let dates = by_date(
        discovery
            .combos_near_coordinate(center, SortBy::Date, evening)
            .await
            .unwrap(),
    );
    assert_eq!(dates.len(), 7);
    assert_eq!(dates.days()[0], ymd(2020, 11, 20));
    let tomorrow = dates.get(ymd(2020, 11, 20)).unwrap();
    assert_eq!(tomorrow.len(), 1);
    assert_eq!(tomorrow[0].combo.id, thali.id);
    assert!(dates.get(ymd(2020, 11, 27)).is_none());
}

#[tokio::test]
async fn non_finite_center_is_invalid_argument() {
    let center = combodb_core::Coordinate {
        latitude: f64::NAN,
        longitude: 0.0,
    };
    let result = discovery(InMemoryStore::default(), NoGeocoder)
        .combos_near_coordinate(center, SortBy::Cuisine, now())
        .await;
    assert!(matches!(result, Err(DiscoveryError::InvalidArgument(_))));
}
