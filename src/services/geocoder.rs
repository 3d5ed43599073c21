use crate::constants::{NOMINATIM_TIMEOUT_SECONDS, PLACE_NAME_MAX_CHARS};
use crate::error::{AppError, Result};
use crate::models::{Coordinates, NamedPlace};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

/// Free-text place lookup.
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Best match for `query`, or `AppError::LocationNotFound`.
    async fn geocode(&self, query: &str) -> Result<NamedPlace>;
}

#[derive(Clone)]
pub struct NominatimClient {
    client: Client,
    base_url: String,
}

impl NominatimClient {
    pub fn new(base_url: String, user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(NominatimClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl Geocoder for NominatimClient {
    async fn geocode(&self, query: &str) -> Result<NamedPlace> {
        let url = format!("{}/search", self.base_url);

        tracing::debug!(query = query, "Geocoding via Nominatim");

        let response = self
            .client
            .get(&url)
            .query(&[("q", query), ("format", "json"), ("limit", "1")])
            .timeout(Duration::from_secs(NOMINATIM_TIMEOUT_SECONDS))
            .send()
            .await
            .map_err(|e| AppError::Geocoding(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Geocoding(format!("HTTP {}: {}", status, error_text)));
        }

        let places: Vec<NominatimPlace> = response
            .json()
            .await
            .map_err(|e| AppError::Geocoding(format!("Failed to parse response: {}", e)))?;

        let place = places
            .into_iter()
            .next()
            .ok_or_else(|| AppError::LocationNotFound(query.to_string()))?;

        place.into_named_place(query)
    }
}

// Nominatim API response types

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    /// Nominatim returns coordinates as strings
    lat: String,
    lon: String,
    #[serde(default)]
    display_name: Option<String>,
}

impl NominatimPlace {
    fn into_named_place(self, query: &str) -> Result<NamedPlace> {
        let lat: f64 = self
            .lat
            .parse()
            .map_err(|_| AppError::Geocoding(format!("Invalid latitude '{}'", self.lat)))?;
        let lon: f64 = self
            .lon
            .parse()
            .map_err(|_| AppError::Geocoding(format!("Invalid longitude '{}'", self.lon)))?;
        let coordinates = Coordinates::new(lat, lon).map_err(AppError::Geocoding)?;

        let name = self
            .display_name
            .unwrap_or_else(|| query.to_string())
            .chars()
            .take(PLACE_NAME_MAX_CHARS)
            .collect();

        Ok(NamedPlace { name, coordinates })
    }
}
