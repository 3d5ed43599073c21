use crate::constants::{HIGH_LATITUDE_WARNING_DEG, KM_PER_DEGREE, LNG_BOX_INFLATION};
use crate::models::Coordinates;
use serde::Serialize;

/// Axis-aligned bounding box in geographic coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl BoundingBox {
    /// Query box around a day target.
    ///
    /// The latitude half-height is `radius_km / 111` degrees and the longitude
    /// half-width is 1.5 times that. The fixed factor only approximates meridian
    /// convergence at mid-latitudes: above ~48° it no longer covers the full
    /// search circle, and boxes are not wrapped across the antimeridian.
    pub fn around(center: &Coordinates, radius_km: f64) -> Self {
        let lat_delta = radius_km / KM_PER_DEGREE;
        let lng_delta = lat_delta * LNG_BOX_INFLATION;

        let bbox = BoundingBox {
            min_lat: center.lat - lat_delta,
            max_lat: center.lat + lat_delta,
            min_lng: center.lng - lng_delta,
            max_lng: center.lng + lng_delta,
        };

        if bbox.is_approximation_unreliable() {
            tracing::warn!(
                lat = center.lat,
                lng = center.lng,
                radius_km = radius_km,
                "Query box around ({:.4}, {:.4}) is outside the mid-latitude approximation; results may be incomplete",
                center.lat, center.lng
            );
        }

        bbox
    }

    /// Same box grown by `degrees` on every side.
    pub fn padded(&self, degrees: f64) -> Self {
        BoundingBox {
            min_lat: self.min_lat - degrees,
            max_lat: self.max_lat + degrees,
            min_lng: self.min_lng - degrees,
            max_lng: self.max_lng + degrees,
        }
    }

    pub fn crosses_antimeridian(&self) -> bool {
        self.min_lng < -180.0 || self.max_lng > 180.0
    }

    /// True when the fixed longitude inflation is known to misbehave for this box.
    pub fn is_approximation_unreliable(&self) -> bool {
        self.crosses_antimeridian()
            || self.min_lat.abs() > HIGH_LATITUDE_WARNING_DEG
            || self.max_lat.abs() > HIGH_LATITUDE_WARNING_DEG
    }

    pub fn contains(&self, point: &Coordinates) -> bool {
        (self.min_lat..=self.max_lat).contains(&point.lat)
            && (self.min_lng..=self.max_lng).contains(&point.lng)
    }

    /// Overpass QL bbox filter: `(south,west,north,east)`
    pub fn to_overpass(&self) -> String {
        format!(
            "({},{},{},{})",
            self.min_lat, self.min_lng, self.max_lat, self.max_lng
        )
    }
}
