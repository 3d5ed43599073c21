use crate::constants::EARTH_RADIUS_KM;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Result<Self, String> {
        if !(-90.0..=90.0).contains(&lat) {
            return Err(format!(
                "Invalid latitude: {} (must be between -90 and 90)",
                lat
            ));
        }
        if !(-180.0..=180.0).contains(&lng) {
            return Err(format!(
                "Invalid longitude: {} (must be between -180 and 180)",
                lng
            ));
        }
        Ok(Coordinates { lat, lng })
    }

    /// Calculate distance between two coordinates using Haversine formula
    /// Returns distance in kilometers
    pub fn distance_to(&self, other: &Coordinates) -> f64 {
        let lat1_rad = self.lat.to_radians();
        let lat2_rad = other.lat.to_radians();
        let delta_lat = (other.lat - self.lat).to_radians();
        let delta_lng = (other.lng - self.lng).to_radians();

        let a = (delta_lat / 2.0).sin().powi(2)
            + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        EARTH_RADIUS_KM * c
    }

    /// Round coordinates to specified decimal places
    pub fn round(&self, decimal_places: u32) -> Self {
        let multiplier = 10_f64.powi(decimal_places as i32);
        Coordinates {
            lat: (self.lat * multiplier).round() / multiplier,
            lng: (self.lng * multiplier).round() / multiplier,
        }
    }

    /// Planar linear interpolation towards `other`; `ratio` 0 is `self`, 1 is `other`.
    /// Only meaningful for short segments.
    pub fn lerp(&self, other: &Coordinates, ratio: f64) -> Coordinates {
        if ratio <= 0.0 {
            return *self;
        }
        if ratio >= 1.0 {
            return *other;
        }
        Coordinates {
            lat: self.lat + ratio * (other.lat - self.lat),
            lng: self.lng + ratio * (other.lng - self.lng),
        }
    }
}

/// Wire form used by the waypoint strings: `lat,lon`.
///
/// Each number is written as its shortest round-trip form with a decimal
/// point kept on whole values (`50.0`, not `50`).
impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_degrees(f, self.lat)?;
        f.write_str(",")?;
        write_degrees(f, self.lng)
    }
}

fn write_degrees(f: &mut fmt::Formatter<'_>, value: f64) -> fmt::Result {
    let repr = format!("{:?}", value);
    match repr.split_once('e') {
        // Tiny values: two-digit signed exponent, `1e-05`
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            write!(f, "{}e{}{:0>2}", mantissa, sign, digits)
        }
        None => f.write_str(&repr),
    }
}

impl FromStr for Coordinates {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lat, lng) = s
            .trim()
            .split_once(',')
            .ok_or_else(|| format!("Expected 'lat,lon' but got '{}'", s.trim()))?;

        let lat: f64 = lat
            .trim()
            .parse()
            .map_err(|_| format!("Invalid latitude '{}'", lat.trim()))?;
        let lng: f64 = lng
            .trim()
            .parse()
            .map_err(|_| format!("Invalid longitude '{}'", lng.trim()))?;

        Coordinates::new(lat, lng)
    }
}
