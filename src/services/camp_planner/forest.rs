use super::geometry::{polygon_area_ha, vertex_centroid};
use crate::config::CampingConfig;
use crate::models::{Coordinates, Feature, ForestArea};

/// Picks the largest usable forest polygon near a day target.
pub struct ForestSelector {
    min_area_ha: f64,
}

impl ForestSelector {
    pub fn new(config: &CampingConfig) -> Self {
        Self {
            min_area_ha: config.min_forest_area_ha,
        }
    }

    /// Largest polygon of at least the minimum area whose vertex centroid lies
    /// within `radius_km` of `target`. Plantations and farmland are skipped.
    pub fn select(
        &self,
        target: &Coordinates,
        radius_km: f64,
        features: &[Feature],
    ) -> Option<ForestArea> {
        let mut best: Option<ForestArea> = None;
        let mut best_area = 0.0;

        for feature in features {
            if is_unsuitable_land(feature) {
                tracing::debug!(osm_id = feature.osm_id, "Skipping plantation or farmland");
                continue;
            }

            let Some(boundary) = feature.boundary() else {
                continue;
            };
            if boundary.len() < 3 {
                continue;
            }

            let area_ha = polygon_area_ha(boundary);
            if area_ha < self.min_area_ha || area_ha <= best_area {
                continue;
            }

            let Some(centroid) = vertex_centroid(boundary) else {
                continue;
            };
            if target.distance_to(&centroid) > radius_km {
                continue;
            }

            best = Some(ForestArea {
                osm_id: feature.osm_id,
                centroid,
                area_ha,
                name: feature
                    .name()
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("Forest ({:.0} ha)", area_ha)),
            });
            best_area = area_ha;
        }

        best
    }
}

/// Managed needle-leaved plantations and anything carrying a `crop` tag.
pub fn is_unsuitable_land(feature: &Feature) -> bool {
    let managed_plantation =
        feature.tag("leaf_type") == Some("needleleaved") && feature.tag("managed") == Some("yes");

    managed_plantation || feature.tags.contains_key("crop")
}
