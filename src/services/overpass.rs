use crate::config::OverpassConfig;
use crate::constants::*;
use crate::error::{AppError, Result};
use crate::models::{BoundingBox, Coordinates, Feature, FeatureGeometry};
use crate::services::feature_source::{FeatureQuery, FeatureSource};
use async_trait::async_trait;
use moka::future::Cache;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Spaces out requests so that two calls never start closer than `min_interval`.
///
/// Callers queue on the lock, so concurrent day resolutions are serialized
/// at the network boundary while the planner itself stays sleep-free.
pub struct RequestPacer {
    min_interval: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl RequestPacer {
    pub fn new(min_interval: Duration) -> Self {
        RequestPacer {
            min_interval,
            last_request: Mutex::new(None),
        }
    }

    pub async fn wait_turn(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.min_interval {
                tokio::time::sleep(self.min_interval - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }
}

/// Overpass API client: round-robin endpoints, paced requests, bounded
/// linear-backoff retry and an in-memory response cache.
#[derive(Clone)]
pub struct OverpassClient {
    client: Client,
    endpoints: Vec<String>,
    current_endpoint_idx: Arc<AtomicUsize>,
    pacer: Arc<RequestPacer>,
    cache: Cache<String, Arc<Vec<Feature>>>,
    max_attempts: usize,
    backoff_step: Duration,
}

impl OverpassClient {
    pub fn new(endpoints: Vec<String>, config: &OverpassConfig, user_agent: &str) -> Result<Self> {
        if endpoints.is_empty() {
            return Err(AppError::Internal(
                "At least one Overpass endpoint is required".to_string(),
            ));
        }

        let client = Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        let cache = Cache::builder()
            .time_to_live(Duration::from_secs(config.cache_ttl_secs))
            .max_capacity(config.cache_max_entries)
            .build();

        Ok(OverpassClient {
            client,
            endpoints,
            current_endpoint_idx: Arc::new(AtomicUsize::new(0)),
            pacer: Arc::new(RequestPacer::new(Duration::from_millis(
                config.min_interval_ms,
            ))),
            cache,
            max_attempts: config.max_attempts.max(1),
            backoff_step: Duration::from_secs(config.backoff_step_secs),
        })
    }

    /// Get the next endpoint to try (round-robin)
    fn get_next_endpoint(&self) -> &str {
        let idx = self.current_endpoint_idx.fetch_add(1, Ordering::Relaxed);
        &self.endpoints[idx % self.endpoints.len()]
    }

    /// Execute a query, retrying 429/504 responses and transport errors.
    ///
    /// Attempt `n` that fails transiently waits `n * backoff_step` before the
    /// next one. Any other HTTP error fails immediately.
    async fn execute_query_with_retry(
        &self,
        query: &str,
        timeout: Duration,
        kind: FeatureQuery,
    ) -> Result<Vec<Feature>> {
        let mut attempt = 0;

        loop {
            attempt += 1;
            let endpoint = self.get_next_endpoint();

            self.pacer.wait_turn().await;

            let response_result = self
                .client
                .post(endpoint)
                .header("Content-Type", "application/x-www-form-urlencoded")
                .body(format!("data={}", urlencoding::encode(query)))
                .timeout(timeout)
                .send()
                .await;

            let response = match response_result {
                Ok(resp) => resp,
                Err(e) => {
                    let error_msg = if e.is_timeout() {
                        "request timed out".to_string()
                    } else {
                        format!("request failed: {}", e)
                    };

                    if attempt < self.max_attempts {
                        self.backoff(kind, &error_msg, endpoint, attempt).await;
                        continue;
                    }
                    return Err(AppError::Overpass(format!(
                        "{} query {} after {} attempts",
                        kind, error_msg, attempt
                    )));
                }
            };

            let status = response.status();

            if status.is_success() {
                let api_response: OverpassResponse = response.json().await.map_err(|e| {
                    AppError::Overpass(format!("Failed to parse {} response: {}", kind, e))
                })?;

                return Ok(convert_elements(api_response.elements));
            }

            let is_retryable = status.as_u16() == OVERPASS_HTTP_TOO_MANY_REQUESTS
                || status.as_u16() == OVERPASS_HTTP_GATEWAY_TIMEOUT;

            if is_retryable && attempt < self.max_attempts {
                self.backoff(kind, &format!("returned HTTP {}", status), endpoint, attempt)
                    .await;
                continue;
            }

            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            return Err(AppError::Overpass(format!(
                "{} query HTTP {}: {}",
                kind,
                status,
                error_text.chars().take(200).collect::<String>()
            )));
        }
    }

    async fn backoff(&self, kind: FeatureQuery, reason: &str, endpoint: &str, attempt: usize) {
        let wait = self.backoff_step * attempt as u32;

        tracing::warn!(
            kind = %kind,
            endpoint = endpoint,
            attempt = attempt,
            "Overpass {} query {}, retrying in {:?} (attempt {}/{})",
            kind,
            reason,
            wait,
            attempt + 1,
            self.max_attempts
        );

        tokio::time::sleep(wait).await;
    }
}

#[async_trait]
impl FeatureSource for OverpassClient {
    async fn query(&self, kind: FeatureQuery, bbox: &BoundingBox) -> Result<Vec<Feature>> {
        let query = build_query(kind, bbox);

        if let Some(cached) = self.cache.get(&query).await {
            tracing::debug!(kind = %kind, "Overpass cache hit ({} features)", cached.len());
            return Ok((*cached).clone());
        }

        tracing::debug!(kind = %kind, "Overpass query: {}", query);

        let features = self
            .execute_query_with_retry(&query, http_timeout(kind), kind)
            .await?;

        tracing::debug!(kind = %kind, "Overpass returned {} features", features.len());

        self.cache
            .insert(query, Arc::new(features.clone()))
            .await;

        Ok(features)
    }

    fn source_name(&self) -> &'static str {
        "overpass"
    }
}

fn http_timeout(kind: FeatureQuery) -> Duration {
    let secs = match kind {
        FeatureQuery::CampSpots => OVERPASS_CAMP_QUERY_TIMEOUT_SECONDS,
        FeatureQuery::Settlements => OVERPASS_SETTLEMENT_QUERY_TIMEOUT_SECONDS,
        FeatureQuery::Forests => OVERPASS_FOREST_QUERY_TIMEOUT_SECONDS,
    };
    Duration::from_secs(secs)
}

/// Overpass QL for one feature family inside `bbox`.
pub fn build_query(kind: FeatureQuery, bbox: &BoundingBox) -> String {
    let b = bbox.to_overpass();

    match kind {
        FeatureQuery::CampSpots => {
            let filters = [
                r#"node["amenity"="shelter"]"#,
                r#"node["tourism"="wilderness_hut"]"#,
                r#"node["tourism"="picnic_site"]"#,
                r#"node["shelter_type"~"picnic_shelter|lean_to|basic_hut"]"#,
                r#"node["tourism"="viewpoint"]"#,
                r#"node["tourism"="camp_site"]"#,
                r#"node["natural"="spring"]"#,
                r#"node["leisure"="firepit"]"#,
            ];
            let body = filters
                .iter()
                .map(|f| format!("  {}{};", f, b))
                .collect::<Vec<_>>()
                .join("\n");

            format!(
                "[out:json][timeout:{}];\n(\n{}\n);\nout body;",
                OVERPASS_CAMP_QUERY_TIMEOUT_SECONDS, body
            )
        }
        FeatureQuery::Settlements => format!(
            "[out:json][timeout:{}];\n(node[\"place\"~\"city|town|village\"]{};);\nout body;",
            OVERPASS_SETTLEMENT_SERVER_TIMEOUT_SECONDS, b
        ),
        FeatureQuery::Forests => format!(
            "[out:json][timeout:{}];\n(\n  way[\"natural\"=\"wood\"]{};\n  way[\"landuse\"=\"forest\"]{};\n);\nout body geom;",
            OVERPASS_FOREST_QUERY_TIMEOUT_SECONDS, b, b
        ),
    }
}

fn convert_elements(elements: Vec<OverpassElement>) -> Vec<Feature> {
    elements
        .into_iter()
        .map(|elem| {
            let geometry = if let (Some(lat), Some(lon)) = (elem.lat, elem.lon) {
                Coordinates::new(lat, lon)
                    .map(FeatureGeometry::Point)
                    .unwrap_or(FeatureGeometry::None)
            } else if let Some(points) = elem.geometry {
                FeatureGeometry::Polygon(
                    points
                        .iter()
                        .filter_map(|p| Coordinates::new(p.lat, p.lon).ok())
                        .collect(),
                )
            } else {
                FeatureGeometry::None
            };

            Feature::new(elem.id, geometry, elem.tags)
        })
        .collect()
}

// Overpass API response types

#[derive(Debug, Deserialize)]
struct OverpassResponse {
    elements: Vec<OverpassElement>,
}

#[derive(Debug, Deserialize)]
struct OverpassElement {
    id: i64,
    #[serde(default)]
    lat: Option<f64>,
    #[serde(default)]
    lon: Option<f64>,
    #[serde(default)]
    geometry: Option<Vec<GeometryPoint>>,
    #[serde(default)]
    tags: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct GeometryPoint {
    lat: f64,
    lon: f64,
}
