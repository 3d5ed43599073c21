use crate::constants::{METERS_PER_DEGREE, SQUARE_METERS_PER_HECTARE};
use crate::models::Coordinates;

/// Compute signed area of a planar polygon using the Shoelace formula.
/// The ring may be open or closed; a repeated closing vertex adds nothing.
pub fn shoelace_area(points: &[(f64, f64)]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }

    let mut area = 0.0;
    let n = points.len();
    for i in 0..n {
        let j = (i + 1) % n;
        area += points[i].0 * points[j].1;
        area -= points[j].0 * points[i].1;
    }

    area / 2.0
}

/// Approximate area of a lat/lng ring in hectares.
///
/// Vertices are projected to metres with `cos(mean_lat) * 111320` per degree of
/// longitude and `111320` per degree of latitude, relative to the vertex mean,
/// then measured with the Shoelace formula. Good enough to compare forest
/// patches of a few km; not a geodesic area.
pub fn polygon_area_ha(boundary: &[Coordinates]) -> f64 {
    let Some(origin) = vertex_centroid(boundary) else {
        return 0.0;
    };
    if boundary.len() < 3 {
        return 0.0;
    }

    let lng_scale = origin.lat.to_radians().cos() * METERS_PER_DEGREE;
    let lat_scale = METERS_PER_DEGREE;

    let projected: Vec<(f64, f64)> = boundary
        .iter()
        .map(|c| {
            (
                (c.lng - origin.lng) * lng_scale,
                (c.lat - origin.lat) * lat_scale,
            )
        })
        .collect();

    shoelace_area(&projected).abs() / SQUARE_METERS_PER_HECTARE
}

/// Arithmetic mean of the vertices. Not the area centroid: for concave
/// shapes it can fall outside the polygon.
pub fn vertex_centroid(points: &[Coordinates]) -> Option<Coordinates> {
    if points.is_empty() {
        return None;
    }

    let count = points.len() as f64;
    let lat = points.iter().map(|p| p.lat).sum::<f64>() / count;
    let lng = points.iter().map(|p| p.lng).sum::<f64>() / count;

    Some(Coordinates { lat, lng })
}
