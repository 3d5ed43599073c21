use crate::constants::{BROUTER_MULTI_WAYPOINT_TIMEOUT_SECONDS, BROUTER_TIMEOUT_SECONDS};
use crate::error::{AppError, Result};
use crate::models::camp::round_to;
use crate::models::{BikeProfile, Coordinates, Polyline, RouteSummary};
use async_trait::async_trait;
use geojson::{FeatureCollection, Value};
use reqwest::Client;
use serde_json::Value as JsonValue;
use std::time::Duration;

/// Computes a bicycle route through an ordered list of waypoints.
#[async_trait]
pub trait RouteProvider: Send + Sync {
    async fn route(&self, waypoints: &[Coordinates], profile: BikeProfile)
        -> Result<RouteSummary>;
}

#[derive(Clone)]
pub struct BRouterClient {
    client: Client,
    base_url: String,
}

impl BRouterClient {
    pub fn new(base_url: String, user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(BRouterClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl RouteProvider for BRouterClient {
    async fn route(
        &self,
        waypoints: &[Coordinates],
        profile: BikeProfile,
    ) -> Result<RouteSummary> {
        if waypoints.len() < 2 {
            return Err(AppError::Validation(
                "At least 2 waypoints required".to_string(),
            ));
        }

        // BRouter expects lon,lat pairs separated by '|'
        let lonlats = waypoints
            .iter()
            .map(|c| format!("{},{}", c.lng, c.lat))
            .collect::<Vec<_>>()
            .join("|");

        let timeout = if waypoints.len() > 2 {
            BROUTER_MULTI_WAYPOINT_TIMEOUT_SECONDS
        } else {
            BROUTER_TIMEOUT_SECONDS
        };

        tracing::debug!(
            waypoints = waypoints.len(),
            profile = profile.brouter_profile(),
            "Requesting BRouter route"
        );

        let response = self
            .client
            .get(format!("{}/brouter", self.base_url))
            .query(&[
                ("lonlats", lonlats.as_str()),
                ("profile", profile.brouter_profile()),
                ("alternativeidx", "0"),
                ("format", "geojson"),
            ])
            .timeout(Duration::from_secs(timeout))
            .send()
            .await
            .map_err(|e| AppError::Routing(format!("BRouter request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::Routing(format!("Failed to read BRouter response: {}", e)))?;

        if !status.is_success() {
            return Err(AppError::Routing(format!(
                "BRouter error {}: {}",
                status,
                body.chars().take(500).collect::<String>()
            )));
        }

        parse_route(&body, profile)
    }
}

/// Parse a BRouter GeoJSON response into a route summary.
///
/// BRouter reports its numeric properties as strings; plain numbers are
/// accepted too.
pub fn parse_route(body: &str, profile: BikeProfile) -> Result<RouteSummary> {
    let collection: FeatureCollection = serde_json::from_str(body)
        .map_err(|e| AppError::Routing(format!("Invalid BRouter GeoJSON: {}", e)))?;

    let feature = collection.features.into_iter().next().ok_or_else(|| {
        AppError::Routing("No route found between the specified points".to_string())
    })?;

    let track_length_m = numeric_property(&feature, &["track-length"]).unwrap_or(0.0);
    let total_time_s = numeric_property(&feature, &["total-time"]).unwrap_or(0.0);
    let ascent_m = numeric_property(&feature, &["filtered ascend", "plain-ascend"]).unwrap_or(0.0);
    let descent_m = numeric_property(&feature, &["filtered descend", "plain-descend"])
        .unwrap_or(0.0)
        .abs();

    let positions = match feature.geometry.map(|g| g.value) {
        Some(Value::LineString(positions)) => positions,
        Some(_) => {
            return Err(AppError::Routing(
                "BRouter returned a non-LineString geometry".to_string(),
            ))
        }
        None => return Err(AppError::Routing("BRouter route has no geometry".to_string())),
    };

    // Positions are [lon, lat] or [lon, lat, elevation]
    let points = positions
        .iter()
        .filter(|p| p.len() >= 2)
        .map(|p| Coordinates::new(p[1], p[0]))
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(AppError::Routing)?;

    let point_count = points.len();
    let geometry = Polyline::new(points)
        .map_err(|_| AppError::Routing("BRouter route has fewer than 2 points".to_string()))?;

    Ok(RouteSummary {
        profile: profile.brouter_profile().to_string(),
        distance_km: round_to(track_length_m / 1000.0, 2),
        duration_hours: round_to(total_time_s / 3600.0, 2),
        ascent_m,
        descent_m,
        point_count,
        geometry,
    })
}

fn numeric_property(feature: &geojson::Feature, keys: &[&str]) -> Option<f64> {
    keys.iter()
        .find_map(|key| match feature.property(key)? {
            JsonValue::String(s) => s.trim().parse().ok(),
            JsonValue::Number(n) => n.as_f64(),
            _ => None,
        })
}
