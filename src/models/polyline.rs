use crate::error::{AppError, Result};
use crate::models::Coordinates;
use serde::Serialize;
use std::str::FromStr;

/// Ordered route geometry with at least two points.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Polyline {
    points: Vec<Coordinates>,
}

impl Polyline {
    pub fn new(points: Vec<Coordinates>) -> Result<Self> {
        if points.len() < 2 {
            return Err(AppError::Validation(format!(
                "Need at least 2 waypoints, got {}",
                points.len()
            )));
        }
        Ok(Polyline { points })
    }

    pub fn points(&self) -> &[Coordinates] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn start(&self) -> Coordinates {
        self.points[0]
    }

    pub fn end(&self) -> Coordinates {
        self.points[self.points.len() - 1]
    }

    /// Distance walked along the polyline up to each point, in km.
    /// Same length as the polyline, starts at exactly 0, never decreases.
    pub fn cumulative_distances(&self) -> Vec<f64> {
        let mut cumulative = Vec::with_capacity(self.points.len());
        cumulative.push(0.0);

        let mut total = 0.0;
        for window in self.points.windows(2) {
            total += window[0].distance_to(&window[1]);
            cumulative.push(total);
        }

        cumulative
    }

    pub fn total_km(&self) -> f64 {
        self.cumulative_distances().last().copied().unwrap_or(0.0)
    }

    /// Point at `target_km` along the route.
    ///
    /// Finds the first segment whose end reaches `target_km` and interpolates
    /// linearly inside it. Zero-length segments resolve to their start point;
    /// targets past the end resolve to the last point.
    pub fn interpolate(&self, cumulative: &[f64], target_km: f64) -> Coordinates {
        for i in 1..self.points.len().min(cumulative.len()) {
            if cumulative[i] >= target_km {
                let segment_start = cumulative[i - 1];
                let segment_len = cumulative[i] - segment_start;
                if segment_len == 0.0 {
                    return self.points[i - 1];
                }
                let ratio = (target_km - segment_start) / segment_len;
                return self.points[i - 1].lerp(&self.points[i], ratio);
            }
        }
        self.end()
    }

    /// Thin the route to roughly `target_points` points by taking every
    /// `len / target_points`-th point. The last point is always kept.
    pub fn sampled(&self, target_points: usize) -> Polyline {
        let step = (self.points.len() / target_points.max(1)).max(1);
        let mut sampled: Vec<Coordinates> = self.points.iter().step_by(step).copied().collect();

        if (self.points.len() - 1) % step != 0 {
            sampled.push(self.end());
        }

        Polyline { points: sampled }
    }

    /// `lat,lon|lat,lon|...`
    pub fn to_waypoint_string(&self) -> String {
        format_waypoints(&self.points)
    }
}

/// Parses the `lat,lon|lat,lon|...` waypoint wire format.
impl FromStr for Polyline {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        let points = s
            .split('|')
            .map(|wp| wp.parse::<Coordinates>())
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| {
                AppError::Validation(format!(
                    "Invalid waypoints ({}). Use 'lat,lon|lat,lon|...'",
                    e
                ))
            })?;

        Polyline::new(points)
    }
}

pub fn format_waypoints(points: &[Coordinates]) -> String {
    points
        .iter()
        .map(|p| p.to_string())
        .collect::<Vec<_>>()
        .join("|")
}
