use crate::constants::POI_LABEL_MAX_CHARS;
use crate::models::polyline::format_waypoints;
use crate::models::{Coordinates, DayCamp};

/// `start|camp_1|...|camp_n|end`, each as `lat,lon`.
pub fn route_waypoints(start: Coordinates, camps: &[DayCamp], end: Coordinates) -> String {
    let mut points = Vec::with_capacity(camps.len() + 2);
    points.push(start);
    points.extend(camps.iter().map(|c| c.spot.coordinates));
    points.push(end);

    format_waypoints(&points)
}

/// `lat,lon,name|...` with separator characters stripped from names.
/// Empty when there are no camps.
pub fn camp_pois(camps: &[DayCamp]) -> String {
    camps
        .iter()
        .map(|camp| {
            format!(
                "{},{}",
                camp.spot.coordinates,
                poi_label(&camp.spot.name)
            )
        })
        .collect::<Vec<_>>()
        .join("|")
}

fn poi_label(name: &str) -> String {
    name.replace([',', '|'], " ")
        .chars()
        .take(POI_LABEL_MAX_CHARS)
        .collect()
}
