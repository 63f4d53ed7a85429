use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so it can be tested with a `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        or_default(var, default)
            .parse::<SocketAddr>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_positive_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        match parse_u64(var, default)? {
            0 => Err(invalid(var, "must be greater than zero".to_string())),
            value => Ok(value),
        }
    };

    let parse_positive_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        match parse_usize(var, default)? {
            0 => Err(invalid(var, "must be greater than zero".to_string())),
            value => Ok(value),
        }
    };

    let parse_radius = |var: &str, default: &str| -> Result<f64, ConfigError> {
        let radius = or_default(var, default)
            .parse::<f64>()
            .map_err(|e| invalid(var, e.to_string()))?;
        if !radius.is_finite() || radius <= 0.0 {
            return Err(invalid(var, "must be a positive number of miles".to_string()));
        }
        Ok(radius)
    };

    let database_url = require("DATABASE_URL")?;
    let env = parse_environment(&or_default("COMBODB_ENV", "development"))?;

    let bind_addr = parse_addr("COMBODB_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("COMBODB_LOG_LEVEL", "info");
    let public_base_url = or_default("COMBODB_PUBLIC_BASE_URL", "http://localhost:3000")
        .trim_end_matches('/')
        .to_string();
    let seed_path = PathBuf::from(or_default("COMBODB_SEED_PATH", "./config/seed.yaml"));
    let search_radius_miles = parse_radius("COMBODB_SEARCH_RADIUS_MILES", "5.2")?;

    let geocoder_api_key = lookup("GEOCODER_API_KEY")
        .ok()
        .filter(|key| !key.trim().is_empty());
    let geocoder_base_url = or_default(
        "COMBODB_GEOCODER_BASE_URL",
        "https://maps.googleapis.com/",
    );
    let geocoder_timeout_secs = parse_positive_u64("COMBODB_GEOCODER_TIMEOUT_SECS", "10")?;

    let db_max_connections = parse_u32("COMBODB_DB_MAX_CONNECTIONS", "10")?;
    let db_min_connections = parse_u32("COMBODB_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("COMBODB_DB_ACQUIRE_TIMEOUT_SECS", "10")?;
    let rate_limit_per_minute = parse_positive_usize("COMBODB_RATE_LIMIT_PER_MINUTE", "120")?;

    Ok(AppConfig {
        database_url,
        env,
        bind_addr,
        log_level,
        public_base_url,
        seed_path,
        search_radius_miles,
        geocoder_api_key,
        geocoder_base_url,
        geocoder_timeout_secs,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        rate_limit_per_minute,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "COMBODB_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
