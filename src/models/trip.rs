use crate::models::{CampPlan, Coordinates, DayCamp, Polyline};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum BikeProfile {
    #[serde(alias = "fastbike")]
    Road,
    Gravel,
    #[default]
    Trekking,
    #[serde(alias = "mtb")]
    Mountain,
    Safety,
    Shortest,
}

impl BikeProfile {
    /// Returns the BRouter profile name for this bike type
    pub fn brouter_profile(&self) -> &'static str {
        match self {
            BikeProfile::Road => "fastbike",
            BikeProfile::Gravel | BikeProfile::Trekking => "trekking",
            BikeProfile::Mountain => "mtb",
            BikeProfile::Safety => "safety",
            BikeProfile::Shortest => "shortest",
        }
    }
}

impl fmt::Display for BikeProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BikeProfile::Road => "road",
            BikeProfile::Gravel => "gravel",
            BikeProfile::Trekking => "trekking",
            BikeProfile::Mountain => "mountain",
            BikeProfile::Safety => "safety",
            BikeProfile::Shortest => "shortest",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for BikeProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "road" | "fastbike" => Ok(BikeProfile::Road),
            "gravel" => Ok(BikeProfile::Gravel),
            "trekking" => Ok(BikeProfile::Trekking),
            "mountain" | "mtb" => Ok(BikeProfile::Mountain),
            "safety" => Ok(BikeProfile::Safety),
            "shortest" => Ok(BikeProfile::Shortest),
            _ => Err(format!("Invalid bike profile: '{}'", s)),
        }
    }
}

/// A geocoded place.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NamedPlace {
    pub name: String,
    pub coordinates: Coordinates,
}

/// Route returned by a [`RouteProvider`](crate::services::RouteProvider).
#[derive(Debug, Clone, Serialize)]
pub struct RouteSummary {
    /// Provider-side profile name, e.g. "trekking"
    pub profile: String,
    pub distance_km: f64,
    pub duration_hours: f64,
    pub ascent_m: f64,
    pub descent_m: f64,
    pub point_count: usize,
    #[serde(skip_serializing)]
    pub geometry: Polyline,
}

// Request/Response types for API endpoints

pub const MIN_DAILY_DISTANCE_KM: f64 = 20.0;
pub const MAX_DAILY_DISTANCE_KM: f64 = 200.0;

fn default_daily_distance() -> f64 {
    80.0
}

pub fn validate_daily_distance(daily_distance_km: f64) -> Result<(), String> {
    if !(MIN_DAILY_DISTANCE_KM..=MAX_DAILY_DISTANCE_KM).contains(&daily_distance_km) {
        return Err(format!(
            "daily_distance_km must be between {} and {}",
            MIN_DAILY_DISTANCE_KM, MAX_DAILY_DISTANCE_KM
        ));
    }
    Ok(())
}

fn validate_search_radius(search_radius_km: Option<f64>) -> Result<(), String> {
    match search_radius_km {
        Some(r) if r.is_nan() || r <= 0.0 => {
            Err("search_radius_km must be positive".to_string())
        }
        _ => Ok(()),
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TripRequest {
    pub start: String,
    pub end: String,
    #[serde(default = "default_daily_distance")]
    pub daily_distance_km: f64,
    #[serde(default)]
    pub profile: BikeProfile,
    #[serde(default)]
    pub search_radius_km: Option<f64>,
}

impl TripRequest {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        TripRequest {
            start: start.into(),
            end: end.into(),
            daily_distance_km: default_daily_distance(),
            profile: BikeProfile::default(),
            search_radius_km: None,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.start.trim().is_empty() || self.end.trim().is_empty() {
            return Err("start and end locations are required".to_string());
        }
        validate_daily_distance(self.daily_distance_km)?;
        validate_search_radius(self.search_radius_km)
    }
}

/// Camp placement along an already computed route.
#[derive(Debug, Clone, Deserialize)]
pub struct CampRequest {
    /// `lat,lon|lat,lon|...`
    pub waypoints: String,
    #[serde(default = "default_daily_distance")]
    pub daily_distance_km: f64,
    #[serde(default)]
    pub search_radius_km: Option<f64>,
    #[serde(default)]
    pub profile: BikeProfile,
}

impl CampRequest {
    pub fn validate(&self) -> Result<(), String> {
        validate_daily_distance(self.daily_distance_km)?;
        validate_search_radius(self.search_radius_km)
    }
}

#[derive(Debug, Serialize)]
pub struct CampResponse {
    #[serde(flatten)]
    pub plan: CampPlan,
    pub map_url: String,
}

/// A complete multi-day trip.
#[derive(Debug, Clone, Serialize)]
pub struct TripPlan {
    pub id: Uuid,
    /// RFC 3339
    pub created_at: String,
    pub start: NamedPlace,
    pub end: NamedPlace,
    pub profile: BikeProfile,
    pub route: RouteSummary,
    pub camps: CampPlan,
    pub map_url: String,
}

impl TripPlan {
    /// Markdown itinerary, one block per riding day.
    pub fn format_summary(&self) -> String {
        let camps = &self.camps;
        let mut lines = vec![
            format!("## Bike Route: {} -> {}", self.start.name, self.end.name),
            String::new(),
            format!(
                "**Total distance:** {:.0} km over {} days",
                camps.total_km, camps.num_days
            ),
            format!("**Daily target:** ~{:.0} km/day", camps.daily_distance_km),
            format!("**Profile:** {}", self.route.profile),
            String::new(),
            "### Daily Itinerary".to_string(),
            String::new(),
        ];

        let mut prev_name = self.start.name.as_str();
        let mut cumulative_km = 0.0;

        for camp in &camps.daily_camps {
            lines.extend(format_day(camp, prev_name, cumulative_km));
            prev_name = camp.spot.name.as_str();
            cumulative_km = camp.target_km;
        }

        lines.push(format!(
            "**Day {}:** {} -> {}",
            camps.num_days, prev_name, self.end.name
        ));
        lines.push(format!(
            "  - Distance: ~{:.0} km",
            camps.total_km - cumulative_km
        ));
        lines.push("  - Finish!".to_string());
        lines.push(String::new());

        if let Some(note) = &camps.note {
            lines.push(format!("_{}_", note));
            lines.push(String::new());
        }

        for warning in &camps.warnings {
            lines.push(format!("> Warning: {}", warning));
        }
        if !camps.warnings.is_empty() {
            lines.push(String::new());
        }

        lines.push("### Interactive Map".to_string());
        lines.push(format!("[View route with camping spots]({})", self.map_url));

        lines.join("\n")
    }
}

fn format_day(camp: &DayCamp, prev_name: &str, cumulative_km: f64) -> Vec<String> {
    let spot = &camp.spot;
    let mut lines = vec![
        format!("**Day {}:** {} -> {}", camp.day, prev_name, spot.name),
        format!("  - Distance: ~{:.0} km", camp.target_km - cumulative_km),
        format!("  - Camping: {}", spot.spot_type),
    ];
    if let Some(area) = spot.area_ha {
        lines.push(format!("  - Forest area: {:.0} ha", area));
    }
    if let Some(note) = &spot.note {
        lines.push(format!("  - Note: {}", note));
    }
    lines.push(String::new());
    lines
}
