pub mod client;
pub mod error;
pub mod types;

pub use client::GeocodeClient;
pub use error::GeocodeError;

use combodb_core::{AppConfig, Coordinate, Geocoder, NoGeocoder};

impl Geocoder for GeocodeClient {
    async fn geocode(&self, address: &str) -> Option<Coordinate> {
        match self.lookup(address).await {
            Ok(Some(coordinate)) => Some(coordinate),
            Ok(None) => {
                tracing::info!(address, "geocoder found no location");
                None
            }
            Err(e) => {
                tracing::warn!(address, error = %e, "geocoding failed");
                None
            }
        }
    }

    async fn reverse_geocode(&self, coordinate: Coordinate) -> Option<String> {
        match self.lookup_postal_code(coordinate).await {
            Ok(found) => found,
            Err(e) => {
                tracing::warn!(
                    latitude = coordinate.latitude,
                    longitude = coordinate.longitude,
                    error = %e,
                    "reverse geocoding failed"
                );
                None
            }
        }
    }
}

/// The geocoder selected by configuration: the remote provider when an API
/// key is set, otherwise one that never resolves anything.
pub enum ConfiguredGeocoder {
    Remote(GeocodeClient),
    Disabled(NoGeocoder),
}

impl ConfiguredGeocoder {
    /// Build the geocoder described by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError`] if an API key is configured but the client
    /// cannot be constructed.
    pub fn from_app_config(config: &AppConfig) -> Result<Self, GeocodeError> {
        match config.geocoder_api_key.as_deref() {
            Some(key) => Ok(Self::Remote(GeocodeClient::with_base_url(
                key,
                config.geocoder_timeout_secs,
                &config.geocoder_base_url,
            )?)),
            None => {
                tracing::warn!("GEOCODER_API_KEY not set; only stored zip coordinates will resolve");
                Ok(Self::Disabled(NoGeocoder))
            }
        }
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        matches!(self, Self::Remote(_))
    }
}

impl Geocoder for ConfiguredGeocoder {
    async fn geocode(&self, address: &str) -> Option<Coordinate> {
        match self {
            Self::Remote(client) => client.geocode(address).await,
            Self::Disabled(none) => none.geocode(address).await,
        }
    }

    async fn reverse_geocode(&self, coordinate: Coordinate) -> Option<String> {
        match self {
            Self::Remote(client) => client.reverse_geocode(coordinate).await,
            Self::Disabled(none) => none.reverse_geocode(coordinate).await,
        }
    }
}
