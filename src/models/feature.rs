use crate::models::Coordinates;
use serde::Serialize;
use std::collections::HashMap;

/// What an OpenStreetMap feature is, as far as camp planning cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureKind {
    /// Bus stops and public-transport shelters. Never a camp.
    TransitStop,
    Shelter,
    WildernessHut,
    PicnicSite,
    Campsite,
    Viewpoint,
    Spring,
    Firepit,
    Wood,
    Forest,
    Settlement,
    Unknown,
}

impl FeatureKind {
    /// Classify a feature from its tags.
    ///
    /// Transit infrastructure is checked first so that a bus shelter tagged
    /// `amenity=shelter` is never mistaken for a camp shelter.
    pub fn classify(tags: &HashMap<String, String>) -> FeatureKind {
        check_transit_tags(tags)
            .or_else(|| check_shelter_tags(tags))
            .or_else(|| check_tourism_tags(tags))
            .or_else(|| check_natural_tags(tags))
            .or_else(|| check_leisure_tags(tags))
            .or_else(|| check_landuse_tags(tags))
            .or_else(|| check_place_tags(tags))
            .unwrap_or(FeatureKind::Unknown)
    }
}

fn check_transit_tags(tags: &HashMap<String, String>) -> Option<FeatureKind> {
    let is_transit = tags.get("shelter_type").map(String::as_str) == Some("public_transport")
        || tags.contains_key("public_transport")
        || tags.get("highway").map(String::as_str) == Some("bus_stop");

    is_transit.then_some(FeatureKind::TransitStop)
}

fn check_shelter_tags(tags: &HashMap<String, String>) -> Option<FeatureKind> {
    let is_shelter = tags.get("amenity").map(String::as_str) == Some("shelter")
        || tags.contains_key("shelter_type");

    is_shelter.then_some(FeatureKind::Shelter)
}

fn check_tourism_tags(tags: &HashMap<String, String>) -> Option<FeatureKind> {
    tags.get("tourism").and_then(|t| match t.as_str() {
        "wilderness_hut" => Some(FeatureKind::WildernessHut),
        "picnic_site" => Some(FeatureKind::PicnicSite),
        "camp_site" => Some(FeatureKind::Campsite),
        "viewpoint" => Some(FeatureKind::Viewpoint),
        _ => None,
    })
}

fn check_natural_tags(tags: &HashMap<String, String>) -> Option<FeatureKind> {
    tags.get("natural").and_then(|n| match n.as_str() {
        "spring" => Some(FeatureKind::Spring),
        "wood" => Some(FeatureKind::Wood),
        _ => None,
    })
}

fn check_leisure_tags(tags: &HashMap<String, String>) -> Option<FeatureKind> {
    tags.get("leisure").and_then(|l| match l.as_str() {
        "firepit" => Some(FeatureKind::Firepit),
        _ => None,
    })
}

fn check_landuse_tags(tags: &HashMap<String, String>) -> Option<FeatureKind> {
    tags.get("landuse").and_then(|l| match l.as_str() {
        "forest" => Some(FeatureKind::Forest),
        _ => None,
    })
}

fn check_place_tags(tags: &HashMap<String, String>) -> Option<FeatureKind> {
    tags.get("place").and_then(|p| match p.as_str() {
        "city" | "town" | "village" => Some(FeatureKind::Settlement),
        _ => None,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "coordinates", rename_all = "snake_case")]
pub enum FeatureGeometry {
    Point(Coordinates),
    /// Outer boundary of a way, as returned by the feature source.
    Polygon(Vec<Coordinates>),
    /// The source returned the element without usable geometry.
    None,
}

/// A tagged map feature returned by a [`FeatureSource`](crate::services::FeatureSource).
#[derive(Debug, Clone, Serialize)]
pub struct Feature {
    pub osm_id: i64,
    pub kind: FeatureKind,
    pub geometry: FeatureGeometry,
    pub tags: HashMap<String, String>,
}

impl Feature {
    pub fn new(osm_id: i64, geometry: FeatureGeometry, tags: HashMap<String, String>) -> Self {
        Feature {
            osm_id,
            kind: FeatureKind::classify(&tags),
            geometry,
            tags,
        }
    }

    pub fn point(&self) -> Option<Coordinates> {
        match self.geometry {
            FeatureGeometry::Point(p) => Some(p),
            _ => None,
        }
    }

    pub fn boundary(&self) -> Option<&[Coordinates]> {
        match &self.geometry {
            FeatureGeometry::Polygon(points) => Some(points),
            _ => None,
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.tags.get("name").map(String::as_str)
    }

    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_classify_camp_features() {
        let cases = [
            (vec![("amenity", "shelter")], FeatureKind::Shelter),
            (vec![("shelter_type", "lean_to")], FeatureKind::Shelter),
            (vec![("tourism", "wilderness_hut")], FeatureKind::WildernessHut),
            (vec![("tourism", "picnic_site")], FeatureKind::PicnicSite),
            (vec![("tourism", "camp_site")], FeatureKind::Campsite),
            (vec![("tourism", "viewpoint")], FeatureKind::Viewpoint),
            (vec![("natural", "spring")], FeatureKind::Spring),
            (vec![("leisure", "firepit")], FeatureKind::Firepit),
        ];

        for (pairs, expected) in cases {
            assert_eq!(FeatureKind::classify(&tags(&pairs)), expected, "{:?}", pairs);
        }
    }

    #[test]
    fn test_transit_wins_over_shelter() {
        assert_eq!(
            FeatureKind::classify(&tags(&[
                ("amenity", "shelter"),
                ("shelter_type", "public_transport")
            ])),
            FeatureKind::TransitStop
        );
        assert_eq!(
            FeatureKind::classify(&tags(&[("amenity", "shelter"), ("public_transport", "platform")])),
            FeatureKind::TransitStop
        );
        assert_eq!(
            FeatureKind::classify(&tags(&[("amenity", "shelter"), ("highway", "bus_stop")])),
            FeatureKind::TransitStop
        );
    }

    #[test]
    fn test_shelter_wins_over_tourism() {
        // A picnic shelter is still a shelter
        assert_eq!(
            FeatureKind::classify(&tags(&[
                ("tourism", "picnic_site"),
                ("shelter_type", "picnic_shelter")
            ])),
            FeatureKind::Shelter
        );
    }

    #[test]
    fn test_classify_land_and_places() {
        assert_eq!(FeatureKind::classify(&tags(&[("natural", "wood")])), FeatureKind::Wood);
        assert_eq!(
            FeatureKind::classify(&tags(&[("landuse", "forest")])),
            FeatureKind::Forest
        );
        assert_eq!(
            FeatureKind::classify(&tags(&[("place", "village")])),
            FeatureKind::Settlement
        );
        assert_eq!(
            FeatureKind::classify(&tags(&[("place", "hamlet")])),
            FeatureKind::Unknown
        );
        assert_eq!(FeatureKind::classify(&HashMap::new()), FeatureKind::Unknown);
    }

    #[test]
    fn test_feature_accessors() {
        let point = Coordinates::new(54.9, 23.9).unwrap();
        let feature = Feature::new(
            42,
            FeatureGeometry::Point(point),
            tags(&[("amenity", "shelter"), ("name", "Miško pastogė")]),
        );

        assert_eq!(feature.kind, FeatureKind::Shelter);
        assert_eq!(feature.point(), Some(point));
        assert!(feature.boundary().is_none());
        assert_eq!(feature.name(), Some("Miško pastogė"));
        assert_eq!(feature.tag("amenity"), Some("shelter"));
    }
}
