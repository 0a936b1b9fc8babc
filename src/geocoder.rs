use crate::config::Config;
use crate::errors::{AppError, GeocodeError};
use crate::models::Location;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

/// External geocoding collaborator.
///
/// `Ok(None)` means the provider answered but found no match. Timeouts and
/// provider failures come back as [`GeocodeError`] for the resolver to retry.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn lookup(
        &self,
        address: &str,
        timeout: Duration,
    ) -> Result<Option<Location>, GeocodeError>;
}

/// Raw search hit from Nominatim. Coordinates arrive as decimal strings.
#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
    #[serde(default)]
    display_name: Option<String>,
}

/// Client for the OpenStreetMap Nominatim search API.
#[derive(Clone)]
pub struct NominatimClient {
    client: reqwest::Client,
    base_url: String,
}

impl NominatimClient {
    /// Creates a new `NominatimClient`.
    ///
    /// # Arguments
    ///
    /// * `base_url` - The base URL of the Nominatim instance.
    /// * `user_agent` - Identifying User-Agent, required by the public usage policy.
    pub fn new(base_url: String, user_agent: &str) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|e| {
                AppError::ExternalApiError(format!("Failed to create geocoding client: {}", e))
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        Self::new(
            config.geocoder_base_url.clone(),
            &config.geocoder_user_agent,
        )
    }
}

#[async_trait]
impl Geocoder for NominatimClient {
    async fn lookup(
        &self,
        address: &str,
        timeout: Duration,
    ) -> Result<Option<Location>, GeocodeError> {
        // Build URL with proper parameter encoding
        let url = reqwest::Url::parse_with_params(
            &format!("{}/search", self.base_url),
            &[("q", address), ("format", "json"), ("limit", "1")],
        )
        .map_err(|e| GeocodeError::ServiceError(format!("Failed to build URL: {}", e)))?;

        tracing::debug!("Nominatim search: {}", url);

        let response = self.client.get(url).timeout(timeout).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(GeocodeError::ServiceError(format!(
                "Nominatim returned {}: {}",
                status, error_text
            )));
        }

        let places: Vec<NominatimPlace> = response.json().await.map_err(|e| {
            if e.is_timeout() {
                GeocodeError::TimedOut
            } else {
                GeocodeError::ServiceError(format!("Failed to parse Nominatim response: {}", e))
            }
        })?;

        let Some(place) = places.into_iter().next() else {
            return Ok(None);
        };

        let latitude = place.lat.parse::<f64>().map_err(|_| {
            GeocodeError::ServiceError(format!("Invalid latitude in response: {}", place.lat))
        })?;
        let longitude = place.lon.parse::<f64>().map_err(|_| {
            GeocodeError::ServiceError(format!("Invalid longitude in response: {}", place.lon))
        })?;

        if let Some(name) = place.display_name.as_deref() {
            tracing::debug!("Nominatim matched '{}'", name);
        }

        Ok(Some(Location {
            latitude,
            longitude,
        }))
    }
}
