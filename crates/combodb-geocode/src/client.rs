//! HTTP client for a Google-style geocoding JSON API.
//!
//! Forward lookups resolve free-text addresses to coordinates; reverse
//! lookups resolve a coordinate to its postal code. Only US addresses are
//! supported, so every forward query is suffixed with `", US"`.

use std::time::Duration;

use combodb_core::Coordinate;
use reqwest::{Client, Url};

use crate::error::GeocodeError;
use crate::types::GeocodeResponse;

const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/";
const GEOCODE_PATH: &str = "maps/api/geocode/json";
const COUNTRY_SUFFIX: &str = ", US";

/// Client for the geocoding API.
///
/// Use [`GeocodeClient::new`] for production or
/// [`GeocodeClient::with_base_url`] to point at a mock server in tests.
pub struct GeocodeClient {
    client: Client,
    api_key: String,
    endpoint: Url,
}

impl GeocodeClient {
    /// Creates a new client pointed at the production geocoding API.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64) -> Result<Self, GeocodeError> {
        Self::with_base_url(api_key, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL (for testing with wiremock).
    ///
    /// `timeout_secs` bounds each whole request, connect included.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`GeocodeError::InvalidBaseUrl`] if
    /// `base_url` is not a valid URL.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, GeocodeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent("combodb/0.1 (geocoding)")
            .build()?;

        // Exactly one trailing slash, so joining keeps any base path prefix.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let endpoint = Url::parse(&normalised)
            .and_then(|base| base.join(GEOCODE_PATH))
            .map_err(|e| GeocodeError::InvalidBaseUrl {
                url: base_url.to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            endpoint,
        })
    }

    /// Resolves a free-text address (or bare zip) to a coordinate.
    ///
    /// Returns `Ok(None)` when the provider finds nothing or the first
    /// result carries no usable geometry.
    ///
    /// # Errors
    ///
    /// - [`GeocodeError::Api`] if the provider reports an error status.
    /// - [`GeocodeError::Http`] on network failure, timeout or non-2xx status.
    /// - [`GeocodeError::Deserialize`] if the response does not match the
    ///   expected shape.
    pub async fn lookup(&self, address: &str) -> Result<Option<Coordinate>, GeocodeError> {
        let query = format!("{address}{COUNTRY_SUFFIX}");
        let url = self.build_url(&[("address", &query)]);
        let Some(response) = self.request(&url).await? else {
            return Ok(None);
        };

        let coordinate = response
            .results
            .into_iter()
            .next()
            .and_then(|result| result.geometry)
            .and_then(|geometry| {
                Coordinate::new(geometry.location.lat, geometry.location.lng).ok()
            });
        Ok(coordinate)
    }

    /// Resolves a coordinate to the postal code of the best match.
    ///
    /// # Errors
    ///
    /// Same as [`GeocodeClient::lookup`].
    pub async fn lookup_postal_code(
        &self,
        coordinate: Coordinate,
    ) -> Result<Option<String>, GeocodeError> {
        let latlng = format!("{},{}", coordinate.latitude, coordinate.longitude);
        let url = self.build_url(&[("latlng", &latlng)]);
        let Some(response) = self.request(&url).await? else {
            return Ok(None);
        };

        let postal_code = response.results.into_iter().next().and_then(|result| {
            result
                .address_components
                .into_iter()
                .find(crate::types::AddressComponent::is_postal_code)
                .map(|component| component.long_name)
        });
        Ok(postal_code)
    }

    /// Builds the request URL with percent-encoded query parameters and the API key.
    fn build_url(&self, params: &[(&str, &str)]) -> Url {
        let mut url = self.endpoint.clone();
        {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in params {
                pairs.append_pair(k, v);
            }
            pairs.append_pair("key", &self.api_key);
        }
        url
    }

    /// Sends a GET request and parses the envelope.
    ///
    /// Returns `Ok(None)` for `ZERO_RESULTS`.
    async fn request(&self, url: &Url) -> Result<Option<GeocodeResponse>, GeocodeError> {
        let response = self.client.get(url.clone()).send().await?;
        let response = response.error_for_status()?;
        let body = response.text().await?;
        let parsed: GeocodeResponse =
            serde_json::from_str(&body).map_err(|e| GeocodeError::Deserialize {
                context: self.redacted(url),
                source: e,
            })?;

        match parsed.status.as_str() {
            "OK" => Ok(Some(parsed)),
            "ZERO_RESULTS" => Ok(None),
            _ => Err(GeocodeError::Api {
                message: parsed
                    .error_message
                    .unwrap_or_else(|| "unknown error".to_string()),
                status: parsed.status,
            }),
        }
    }

    /// The URL as text with the API key removed, for error context.
    fn redacted(&self, url: &Url) -> String {
        url.as_str().replace(&self.api_key, "[redacted]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client(base_url: &str) -> GeocodeClient {
        GeocodeClient::with_base_url("test-key", 30, base_url)
            .expect("client construction should not fail")
    }

    #[test]
    fn build_url_targets_the_geocode_endpoint() {
        let client = test_client("https://maps.googleapis.com");
        let url = client.build_url(&[("address", "92093, US")]);
        assert_eq!(
            url.as_str(),
            "https://maps.googleapis.com/maps/api/geocode/json?address=92093%2C+US&key=test-key"
        );
    }

    #[test]
    fn build_url_keeps_base_path_prefix() {
        let client = test_client("http://127.0.0.1:8080/proxy/");
        let url = client.build_url(&[("latlng", "1,2")]);
        assert!(
            url.as_str()
                .starts_with("http://127.0.0.1:8080/proxy/maps/api/geocode/json?"),
            "unexpected url: {url}"
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let result = GeocodeClient::with_base_url("k", 5, "not a url");
        assert!(matches!(result, Err(GeocodeError::InvalidBaseUrl { .. })));
    }

    #[test]
    fn redacted_hides_the_key() {
        let client = test_client("https://maps.googleapis.com");
        let url = client.build_url(&[("address", "x")]);
        let shown = client.redacted(&url);
        assert!(!shown.contains("test-key"));
        assert!(shown.contains("[redacted]"));
    }
}
