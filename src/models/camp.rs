use crate::constants::{CANDIDATE_NAME_MAX_CHARS, SPOT_COORDINATE_DECIMALS};
use crate::models::{Coordinates, FeatureKind};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SpotType {
    Shelter,
    Hut,
    Picnic,
    Campsite,
    Viewpoint,
    Water,
    Firepit,
    /// Tagged feature that matched the query but no known camp type
    Spot,
    WildForest,
    ScoutNeeded,
}

impl SpotType {
    pub fn from_kind(kind: FeatureKind) -> SpotType {
        match kind {
            FeatureKind::Shelter => SpotType::Shelter,
            FeatureKind::WildernessHut => SpotType::Hut,
            FeatureKind::PicnicSite => SpotType::Picnic,
            FeatureKind::Campsite => SpotType::Campsite,
            FeatureKind::Viewpoint => SpotType::Viewpoint,
            FeatureKind::Spring => SpotType::Water,
            FeatureKind::Firepit => SpotType::Firepit,
            _ => SpotType::Spot,
        }
    }

    /// Lower is better. Only meaningful for official sites.
    pub fn priority(&self) -> u8 {
        match self {
            SpotType::Shelter | SpotType::Hut => 1,
            SpotType::Picnic | SpotType::Campsite => 2,
            SpotType::Viewpoint | SpotType::Firepit => 3,
            SpotType::Water => 4,
            SpotType::Spot | SpotType::WildForest | SpotType::ScoutNeeded => 5,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SpotType::Shelter => "shelter",
            SpotType::Hut => "hut",
            SpotType::Picnic => "picnic",
            SpotType::Campsite => "campsite",
            SpotType::Viewpoint => "viewpoint",
            SpotType::Water => "water",
            SpotType::Firepit => "firepit",
            SpotType::Spot => "spot",
            SpotType::WildForest => "wild_forest",
            SpotType::ScoutNeeded => "scout_needed",
        }
    }

    /// Capitalized label used for generated names, e.g. "Shelter near km 80"
    pub fn title(&self) -> String {
        let s = self.as_str();
        let mut chars = s.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

impl fmt::Display for SpotType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A point along the route where a day should end.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct DayTarget {
    /// 1-based
    pub day: u32,
    pub target_km: f64,
    pub point: Coordinates,
}

/// An official site that survived filtering, with its score (lower wins).
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Candidate {
    pub coordinates: Coordinates,
    pub name: String,
    pub spot_type: SpotType,
    pub km_from_target: f64,
    /// Distance to the nearest city/town/village
    pub town_km: f64,
    pub score: f64,
}

/// The largest qualifying forest polygon near a day target.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ForestArea {
    pub osm_id: i64,
    pub centroid: Coordinates,
    pub area_ha: f64,
    pub name: String,
}

/// Where a day ends, as presented to the rider.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CampSpot {
    pub coordinates: Coordinates,
    pub name: String,
    #[serde(rename = "type")]
    pub spot_type: SpotType,
    pub km_from_target: f64,
    pub town_km: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area_ha: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl CampSpot {
    pub fn official(candidate: Candidate) -> Self {
        CampSpot {
            coordinates: candidate.coordinates.round(SPOT_COORDINATE_DECIMALS),
            name: truncate_chars(&candidate.name, CANDIDATE_NAME_MAX_CHARS),
            spot_type: candidate.spot_type,
            km_from_target: round_to(candidate.km_from_target, 1),
            town_km: Some(round_to(candidate.town_km, 1)),
            area_ha: None,
            note: None,
            score: Some(candidate.score),
        }
    }

    pub fn wild_camp(forest: &ForestArea, target: &Coordinates) -> Self {
        CampSpot {
            coordinates: forest.centroid.round(SPOT_COORDINATE_DECIMALS),
            name: format!("Wild camp in {}", forest.name),
            spot_type: SpotType::WildForest,
            km_from_target: round_to(target.distance_to(&forest.centroid), 1),
            town_km: None,
            area_ha: Some(forest.area_ha.round()),
            note: Some(format!(
                "Large forest area ({:.0} ha) - good for wild camping",
                forest.area_ha
            )),
            score: None,
        }
    }

    /// Placeholder at the raw day target when nothing better was found.
    pub fn scout(target: &DayTarget) -> Self {
        CampSpot {
            coordinates: target.point.round(SPOT_COORDINATE_DECIMALS),
            name: format!("Scout area Day {} (find forest nearby)", target.day),
            spot_type: SpotType::ScoutNeeded,
            km_from_target: 0.0,
            town_km: None,
            area_ha: None,
            note: Some(
                "No large forest found - scout this area before trip to find suitable wild camp spot"
                    .to_string(),
            ),
            score: None,
        }
    }

    pub fn needs_scouting(&self) -> bool {
        self.spot_type == SpotType::ScoutNeeded
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DayCamp {
    pub day: u32,
    pub target_km: f64,
    pub spot: CampSpot,
}

impl DayCamp {
    pub fn new(target: &DayTarget, spot: CampSpot) -> Self {
        DayCamp {
            day: target.day,
            target_km: round_to(target.target_km, 1),
            spot,
        }
    }
}

/// Result of placing camps along a route.
#[derive(Debug, Clone, Serialize)]
pub struct CampPlan {
    pub total_km: f64,
    pub daily_distance_km: f64,
    /// Days actually ridden: one more than the number of camps
    pub num_days: u32,
    /// Day count from the distance rule, before targets near the destination are dropped
    pub estimated_days: u32,
    pub daily_camps: Vec<DayCamp>,
    /// `lat,lon|lat,lon|...` from route start through every camp to the destination
    pub route_waypoints: String,
    /// `lat,lon,name|...` for map display; empty when there are no camps
    pub camp_pois: String,
    /// Feature queries that failed and were treated as empty
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl CampPlan {
    pub fn scout_days(&self) -> Vec<u32> {
        self.daily_camps
            .iter()
            .filter(|c| c.spot.needs_scouting())
            .map(|c| c.day)
            .collect()
    }
}

pub fn round_to(value: f64, decimals: u32) -> f64 {
    let multiplier = 10_f64.powi(decimals as i32);
    (value * multiplier).round() / multiplier
}

pub fn truncate_chars(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}
