//! Live integration tests for combodb-db using `#[sqlx::test]`.
//!
//! Each test gets a fresh, fully-migrated Postgres database spun up by the
//! sqlx test harness. They need `DATABASE_URL` pointing at a server the test
//! user may create databases on, so they are ignored by default:
//!
//! ```text
//! cargo test -p combodb-db --test live -- --ignored
//! ```

use chrono::{NaiveDate, TimeZone, Utc};
use combodb_core::seed::{SeedCombo, SeedLocation, SeedRestaurant};
use combodb_core::{
    bounds_within_radius, CatalogStore, Coordinate, DateWindow, HistoryQuery, LocationQuery,
    NutritionAttribute, RestaurantQuery, SeedFile,
};
use combodb_db::{
    insert_combo_history, list_locations_missing_coordinates, seed_catalog,
    update_location_coordinate, DbError, PgCatalog,
};
use rust_decimal::Decimal;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn seed_location(zip: &str, coordinate: Option<(f64, f64)>) -> SeedLocation {
    SeedLocation {
        street: "9500 Gilman Dr".to_string(),
        apt: None,
        city: "La Jolla".to_string(),
        state: "CA".to_string(),
        country: "US".to_string(),
        zip: zip.to_string(),
        latitude: coordinate.map(|c| c.0),
        longitude: coordinate.map(|c| c.1),
    }
}

fn seed_combo(name: &str, serving_dates: Vec<NaiveDate>) -> SeedCombo {
    SeedCombo {
        name: name.to_string(),
        image: None,
        combo_type: "veg".to_string(),
        main_dish: "Dal Makhani".to_string(),
        side_dish: Some("Jeera Rice".to_string()),
        summary: None,
        ingredients: None,
        price: Decimal::new(1299, 2),
        cuisines: vec!["indian".to_string()],
        nutrition: vec![NutritionAttribute::LowCalories],
        serving_dates,
    }
}

fn sample_seed() -> SeedFile {
    SeedFile {
        restaurants: vec![
            SeedRestaurant {
                name: "Curry House".to_string(),
                website: Some("https://curryhouse.example.com".to_string()),
                email: "hello@curryhouse.example.com".to_string(),
                contact: None,
                location: seed_location("92093", Some((32.877_883, -117.2375))),
                combos: vec![seed_combo("Veg Thali", vec![ymd(2020, 11, 21), ymd(2020, 12, 25)])],
            },
            SeedRestaurant {
                name: "Unplaced Diner".to_string(),
                website: None,
                email: "diner@example.com".to_string(),
                contact: None,
                location: seed_location("10001", None),
                combos: vec![],
            },
        ],
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a live Postgres via DATABASE_URL"]
async fn seed_is_idempotent(pool: sqlx::PgPool) {
    let first = seed_catalog(&pool, &sample_seed()).await.expect("first seed");
    assert_eq!(first.restaurants, 2);
    assert_eq!(first.combos, 1);
    assert_eq!(first.serving_dates, 2);

    let second = seed_catalog(&pool, &sample_seed()).await.expect("second seed");
    assert_eq!(second.restaurants, 2);
    assert_eq!(second.serving_dates, 0, "dates are only added once");
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a live Postgres via DATABASE_URL"]
async fn restaurants_within_bounds_are_fully_materialized(pool: sqlx::PgPool) {
    seed_catalog(&pool, &sample_seed()).await.expect("seed");
    let catalog = PgCatalog::new(pool);

    let center = Coordinate::new(32.877_883, -117.2375).unwrap();
    let bounds = bounds_within_radius(center, 5.2).unwrap();
    let restaurants = catalog
        .find_restaurants(&RestaurantQuery::ActiveWithinBounds(bounds))
        .await
        .expect("find_restaurants");

    assert_eq!(restaurants.len(), 1, "unplaced locations never match");
    let restaurant = &restaurants[0];
    assert_eq!(restaurant.name, "Curry House");
    assert_eq!(restaurant.combos.len(), 1);
    let combo = &restaurant.combos[0];
    assert_eq!(combo.cuisines[0].label, "indian");
    assert_eq!(combo.nutrition[0].attribute, NutritionAttribute::LowCalories);
    assert_eq!(combo.price, Decimal::new(1299, 2));

    let far = bounds_within_radius(Coordinate::new(40.7128, -74.006).unwrap(), 5.2).unwrap();
    let none = catalog
        .find_restaurants(&RestaurantQuery::ActiveWithinBounds(far))
        .await
        .expect("find_restaurants");
    assert!(none.is_empty());
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a live Postgres via DATABASE_URL"]
async fn history_is_limited_to_the_window(pool: sqlx::PgPool) {
    seed_catalog(&pool, &sample_seed()).await.expect("seed");
    let catalog = PgCatalog::new(pool);

    let center = Coordinate::new(32.877_883, -117.2375).unwrap();
    let bounds = bounds_within_radius(center, 5.2).unwrap();
    let restaurants = catalog
        .find_restaurants(&RestaurantQuery::ActiveWithinBounds(bounds))
        .await
        .unwrap();
    let combo_id = restaurants[0].combos[0].id;

    let now = Utc.with_ymd_and_hms(2020, 11, 19, 8, 0, 0).unwrap();
    let rows = catalog
        .find_combo_history(&HistoryQuery::ForCombos {
            combo_ids: vec![combo_id],
            window: DateWindow::following(now),
        })
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].serving_date, ymd(2020, 11, 21));

    let all = catalog
        .find_combo_history(&HistoryQuery::ForCombo(combo_id))
        .await
        .unwrap();
    assert_eq!(all.len(), 2);

    let empty = catalog
        .find_combo_history(&HistoryQuery::ForCombos {
            combo_ids: vec![],
            window: DateWindow::following(now),
        })
        .await
        .unwrap();
    assert!(empty.is_empty());
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a live Postgres via DATABASE_URL"]
async fn insert_history_for_unknown_combo_is_not_found(pool: sqlx::PgPool) {
    let result = insert_combo_history(&pool, Uuid::new_v4(), ymd(2020, 11, 21)).await;
    assert!(matches!(result, Err(DbError::NotFound)), "got {result:?}");
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a live Postgres via DATABASE_URL"]
async fn coordinate_write_back_places_a_location(pool: sqlx::PgPool) {
    seed_catalog(&pool, &sample_seed()).await.expect("seed");

    let missing = list_locations_missing_coordinates(&pool, 10).await.unwrap();
    assert_eq!(missing.len(), 1);
    let id = missing[0].id;

    let placed = Coordinate::new(40.750_504_123, -73.993_439_1).unwrap();
    assert!(update_location_coordinate(&pool, id, placed).await.unwrap());
    assert!(!update_location_coordinate(&pool, Uuid::new_v4(), placed)
        .await
        .unwrap());

    let catalog = PgCatalog::new(pool);
    let locations = catalog
        .find_locations(&LocationQuery::ByZip("10001".to_string()))
        .await
        .unwrap();
    assert_eq!(locations.len(), 1);
    let stored = locations[0].coordinate.expect("placed");
    assert!((stored.latitude - 40.750_504_13).abs() < 1e-9);
}
