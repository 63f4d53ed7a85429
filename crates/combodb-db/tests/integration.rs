//! Offline unit tests for combodb-db pool configuration and row types.
//! These tests do not require a live database connection.

use chrono::{NaiveDate, Utc};
use combodb_core::{AppConfig, ComboHistory, Environment, Location};
use combodb_db::{ComboHistoryRow, LocationRow, PoolConfig};
use rust_decimal::Decimal;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use uuid::Uuid;

fn location_row(latitude: Option<Decimal>, longitude: Option<Decimal>) -> LocationRow {
    LocationRow {
        id: Uuid::new_v4(),
        street: "9500 Gilman Dr".to_string(),
        apt: Some("Suite 1".to_string()),
        city: "La Jolla".to_string(),
        state: "CA".to_string(),
        country: "US".to_string(),
        zip: "92093".to_string(),
        latitude,
        longitude,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

#[test]
fn pool_config_from_app_config_uses_core_values() {
    let app_config = AppConfig {
        database_url: "postgres://example".to_string(),
        env: Environment::Test,
        bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 3000),
        log_level: "info".to_string(),
        public_base_url: "http://localhost:3000".to_string(),
        seed_path: PathBuf::from("./config/seed.yaml"),
        search_radius_miles: 5.2,
        geocoder_api_key: None,
        geocoder_base_url: "https://maps.googleapis.com/".to_string(),
        geocoder_timeout_secs: 10,
        db_max_connections: 42,
        db_min_connections: 7,
        db_acquire_timeout_secs: 9,
        rate_limit_per_minute: 120,
    };

    let pool_config = PoolConfig::from_app_config(&app_config);
    assert_eq!(pool_config.max_connections, 42);
    assert_eq!(pool_config.min_connections, 7);
    assert_eq!(pool_config.acquire_timeout_secs, 9);
}

#[test]
fn location_row_with_coordinates_converts() {
    let row = location_row(
        Some(Decimal::new(3_287_788_300, 8)),
        Some(Decimal::new(-11_723_750_000, 8)),
    );
    let id = row.id;
    let location = Location::from(row);

    assert_eq!(location.id, id);
    assert_eq!(location.apt.as_deref(), Some("Suite 1"));
    let coordinate = location.coordinate.expect("coordinate should be present");
    assert!((coordinate.latitude - 32.877_883).abs() < 1e-9);
    assert!((coordinate.longitude - -117.2375).abs() < 1e-9);
}

#[test]
fn location_row_with_half_a_coordinate_is_unplaced() {
    let location = Location::from(location_row(Some(Decimal::new(3_287_788_300, 8)), None));
    assert!(location.coordinate.is_none());
}

#[test]
fn combo_history_row_converts() {
    let row = ComboHistoryRow {
        id: Uuid::new_v4(),
        combo_id: Uuid::new_v4(),
        serving_date: NaiveDate::from_ymd_opt(2020, 11, 21).unwrap(),
        created_at: Utc::now(),
    };
    let history = ComboHistory::from(row.clone());
    assert_eq!(history.id, row.id);
    assert_eq!(history.combo_id, row.combo_id);
    assert_eq!(history.serving_date, row.serving_date);
}
