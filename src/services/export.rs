use crate::error::{AppError, Result};
use crate::models::{Coordinates, Polyline};

/// A labelled marker for the map view.
#[derive(Debug, Clone, PartialEq)]
pub struct MapPoi {
    pub coordinates: Coordinates,
    pub name: String,
}

/// Parse `lat,lon,name|lat,lon,name|...`. Entries that do not parse are skipped.
pub fn parse_pois(pois: &str) -> Vec<MapPoi> {
    pois.split('|')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .filter_map(|entry| {
            let mut parts = entry.splitn(3, ',');
            let lat: f64 = parts.next()?.trim().parse().ok()?;
            let lon: f64 = parts.next()?.trim().parse().ok()?;
            let name = parts.next()?.trim().to_string();
            let coordinates = Coordinates::new(lat, lon).ok()?;
            Some(MapPoi { coordinates, name })
        })
        .collect()
}

/// brouter-web link that opens the route with waypoints and markers loaded.
///
/// Format: `{base}/#map={zoom}/{lat}/{lon}/standard&lonlats=lon,lat;...&profile=...&pois=...`
/// centred on the mean of the waypoints.
pub fn brouter_web_url(
    base_url: &str,
    waypoints: &[Coordinates],
    profile: &str,
    zoom: u8,
    pois: &[MapPoi],
) -> Result<String> {
    if waypoints.len() < 2 {
        return Err(AppError::Validation(
            "At least 2 waypoints required".to_string(),
        ));
    }

    let count = waypoints.len() as f64;
    let avg_lat = waypoints.iter().map(|c| c.lat).sum::<f64>() / count;
    let avg_lng = waypoints.iter().map(|c| c.lng).sum::<f64>() / count;

    // brouter-web uses lon,lat order
    let lonlats = waypoints
        .iter()
        .map(|c| format!("{:.5},{:.5}", c.lng, c.lat))
        .collect::<Vec<_>>()
        .join(";");

    let mut url = format!(
        "{}/#map={}/{:.4}/{:.4}/standard&lonlats={}&profile={}",
        base_url.trim_end_matches('/'),
        zoom,
        avg_lat,
        avg_lng,
        lonlats,
        profile
    );

    if !pois.is_empty() {
        let markers = pois
            .iter()
            .map(|poi| {
                format!(
                    "{:.5},{:.5},{}",
                    poi.coordinates.lng,
                    poi.coordinates.lat,
                    urlencoding::encode(&poi.name)
                )
            })
            .collect::<Vec<_>>()
            .join("|");
        url.push_str("&pois=");
        url.push_str(&markers);
    }

    Ok(url)
}

/// Same as [`brouter_web_url`] but from the wire strings a camp plan carries.
pub fn map_url_from_strings(
    base_url: &str,
    waypoints: &str,
    profile: &str,
    zoom: u8,
    pois: &str,
) -> Result<String> {
    let route: Polyline = waypoints.parse()?;
    brouter_web_url(base_url, route.points(), profile, zoom, &parse_pois(pois))
}
