use async_trait::async_trait;
use bikecamp::constants::METERS_PER_DEGREE;
use bikecamp::error::{AppError, Result};
use bikecamp::models::{
    BikeProfile, BoundingBox, Coordinates, Feature, FeatureGeometry, NamedPlace, Polyline,
    RouteSummary,
};
use bikecamp::services::{FeatureQuery, FeatureSource, Geocoder, RouteProvider};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

/// Kilometres per degree of latitude on the haversine sphere.
#[allow(dead_code)]
pub const KM_PER_DEG_LAT: f64 = 111.19492664455873;

#[allow(dead_code)]
pub fn coords(lat: f64, lng: f64) -> Coordinates {
    Coordinates::new(lat, lng).unwrap()
}

/// Point `km` due north (negative: south) of `from`.
#[allow(dead_code)]
pub fn north_of(from: Coordinates, km: f64) -> Coordinates {
    coords(from.lat + km / KM_PER_DEG_LAT, from.lng)
}

/// Point `km` due east of `from`, along its parallel.
#[allow(dead_code)]
pub fn east_of(from: Coordinates, km: f64) -> Coordinates {
    coords(from.lat, from.lng + km / (KM_PER_DEG_LAT * from.lat.to_radians().cos()))
}

/// Straight route due north of `start`, `km` long, with `points` evenly spaced vertices.
#[allow(dead_code)]
pub fn meridian_route(start: Coordinates, km: f64, points: usize) -> Polyline {
    let last = (points - 1) as f64;
    let vertices = (0..points)
        .map(|i| north_of(start, km * i as f64 / last))
        .collect();
    Polyline::new(vertices).unwrap()
}

#[allow(dead_code)]
pub fn tagged_point(osm_id: i64, at: Coordinates, tags: &[(&str, &str)]) -> Feature {
    Feature::new(osm_id, FeatureGeometry::Point(at), tag_map(tags))
}

#[allow(dead_code)]
pub fn settlement(osm_id: i64, at: Coordinates, name: &str) -> Feature {
    tagged_point(osm_id, at, &[("place", "village"), ("name", name)])
}

/// Square `landuse=forest` polygon of `area_ha` centred on `center`.
#[allow(dead_code)]
pub fn square_forest(
    osm_id: i64,
    center: Coordinates,
    area_ha: f64,
    tags: &[(&str, &str)],
) -> Feature {
    let half_side_m = (area_ha * 10_000.0).sqrt() / 2.0;
    let dlat = half_side_m / METERS_PER_DEGREE;
    let dlng = half_side_m / (METERS_PER_DEGREE * center.lat.to_radians().cos());
    let boundary = vec![
        coords(center.lat - dlat, center.lng - dlng),
        coords(center.lat - dlat, center.lng + dlng),
        coords(center.lat + dlat, center.lng + dlng),
        coords(center.lat + dlat, center.lng - dlng),
    ];

    let mut all_tags = tag_map(tags);
    all_tags
        .entry("landuse".to_string())
        .or_insert_with(|| "forest".to_string());

    Feature::new(osm_id, FeatureGeometry::Polygon(boundary), all_tags)
}

#[allow(dead_code)]
fn tag_map(tags: &[(&str, &str)]) -> HashMap<String, String> {
    tags.iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[allow(dead_code)]
type LatencyFn = Box<dyn Fn(&BoundingBox) -> Duration + Send + Sync>;

/// In-memory feature source. Returns the canned features of each query kind
/// that fall inside the requested box.
#[allow(dead_code)]
#[derive(Default)]
pub struct MockFeatureSource {
    features: HashMap<FeatureQuery, Vec<Feature>>,
    failing: HashSet<FeatureQuery>,
    latency: Option<LatencyFn>,
    calls: Mutex<Vec<(FeatureQuery, BoundingBox)>>,
}

#[allow(dead_code)]
impl MockFeatureSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, query: FeatureQuery, features: Vec<Feature>) -> Self {
        self.features.entry(query).or_default().extend(features);
        self
    }

    pub fn failing(mut self, query: FeatureQuery) -> Self {
        self.failing.insert(query);
        self
    }

    pub fn with_latency(
        mut self,
        latency: impl Fn(&BoundingBox) -> Duration + Send + Sync + 'static,
    ) -> Self {
        self.latency = Some(Box::new(latency));
        self
    }

    pub fn calls(&self) -> Vec<(FeatureQuery, BoundingBox)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, query: FeatureQuery) -> usize {
        self.calls().iter().filter(|(q, _)| *q == query).count()
    }
}

#[async_trait]
impl FeatureSource for MockFeatureSource {
    async fn query(&self, query: FeatureQuery, bbox: &BoundingBox) -> Result<Vec<Feature>> {
        self.calls.lock().unwrap().push((query, *bbox));

        if let Some(latency) = &self.latency {
            tokio::time::sleep(latency(bbox)).await;
        }

        if self.failing.contains(&query) {
            return Err(AppError::Overpass(
                "Max retries exceeded: HTTP 504 Gateway Timeout".to_string(),
            ));
        }

        let inside = |feature: &&Feature| match &feature.geometry {
            FeatureGeometry::Point(p) => bbox.contains(p),
            FeatureGeometry::Polygon(boundary) => boundary.iter().any(|p| bbox.contains(p)),
            FeatureGeometry::None => false,
        };

        Ok(self
            .features
            .get(&query)
            .map(|all| all.iter().filter(inside).cloned().collect())
            .unwrap_or_default())
    }

    fn source_name(&self) -> &'static str {
        "mock"
    }
}

/// Geocoder backed by a fixed gazetteer.
#[allow(dead_code)]
#[derive(Default)]
pub struct MockGeocoder {
    places: HashMap<String, Coordinates>,
}

#[allow(dead_code)]
impl MockGeocoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_place(mut self, name: &str, at: Coordinates) -> Self {
        self.places.insert(name.to_lowercase(), at);
        self
    }
}

#[async_trait]
impl Geocoder for MockGeocoder {
    async fn geocode(&self, query: &str) -> Result<NamedPlace> {
        self.places
            .get(&query.to_lowercase())
            .map(|coordinates| NamedPlace {
                name: query.to_string(),
                coordinates: *coordinates,
            })
            .ok_or_else(|| AppError::LocationNotFound(query.to_string()))
    }
}

/// Router that draws a straight line between the first and last waypoint.
#[allow(dead_code)]
pub struct StraightLineRouter {
    points: usize,
    delay: Duration,
}

#[allow(dead_code)]
impl StraightLineRouter {
    pub fn new() -> Self {
        StraightLineRouter {
            points: 41,
            delay: Duration::ZERO,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[async_trait]
impl RouteProvider for StraightLineRouter {
    async fn route(&self, waypoints: &[Coordinates], profile: BikeProfile) -> Result<RouteSummary> {
        if waypoints.len() < 2 {
            return Err(AppError::Validation(
                "At least 2 waypoints required".to_string(),
            ));
        }
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let from = waypoints[0];
        let to = waypoints[waypoints.len() - 1];
        let last = (self.points - 1) as f64;
        let vertices = (0..self.points)
            .map(|i| from.lerp(&to, i as f64 / last))
            .collect();
        let geometry = Polyline::new(vertices)?;
        let distance_km = geometry.total_km();

        Ok(RouteSummary {
            profile: profile.brouter_profile().to_string(),
            distance_km,
            duration_hours: distance_km / 15.0,
            ascent_m: 0.0,
            descent_m: 0.0,
            point_count: geometry.len(),
            geometry,
        })
    }
}
