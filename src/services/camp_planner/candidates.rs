use crate::config::CampingConfig;
use crate::constants::*;
use crate::models::{Candidate, Coordinates, DayTarget, Feature, FeatureKind, SpotType};

/// Filters tagged point features around a day target and ranks the survivors.
pub struct CandidateScorer {
    settlement_exclusion_km: f64,
}

impl CandidateScorer {
    pub fn new(config: &CampingConfig) -> Self {
        Self {
            settlement_exclusion_km: config.settlement_exclusion_km,
        }
    }

    /// Candidates sorted best first (lowest score).
    ///
    /// Rejects features without a point, transit infrastructure, anything
    /// outside `radius_km` of the target, and anything within the settlement
    /// exclusion distance of a city/town/village.
    pub fn score(
        &self,
        target: &DayTarget,
        radius_km: f64,
        features: &[Feature],
        settlements: &[Coordinates],
    ) -> Vec<Candidate> {
        let mut candidates: Vec<Candidate> = features
            .iter()
            .filter_map(|feature| self.evaluate(target, radius_km, feature, settlements))
            .collect();

        candidates.sort_by(|a, b| a.score.total_cmp(&b.score));
        candidates
    }

    fn evaluate(
        &self,
        target: &DayTarget,
        radius_km: f64,
        feature: &Feature,
        settlements: &[Coordinates],
    ) -> Option<Candidate> {
        let point = feature.point()?;

        if feature.kind == FeatureKind::TransitStop {
            tracing::debug!(osm_id = feature.osm_id, "Rejecting transit shelter");
            return None;
        }

        let km_from_target = target.point.distance_to(&point);
        if km_from_target > radius_km {
            return None;
        }

        let town_km = nearest_settlement_km(&point, settlements);
        if town_km < self.settlement_exclusion_km {
            tracing::debug!(
                osm_id = feature.osm_id,
                town_km = town_km,
                "Rejecting candidate {:.1} km from a settlement",
                town_km
            );
            return None;
        }

        let spot_type = SpotType::from_kind(feature.kind);
        let name = feature
            .name()
            .map(str::to_string)
            .unwrap_or_else(|| format!("{} near km {:.0}", spot_type.title(), target.target_km));

        Some(Candidate {
            coordinates: point,
            name,
            spot_type,
            km_from_target,
            town_km,
            score: score(spot_type, km_from_target, town_km),
        })
    }
}

/// `priority * 10 + distance - min(settlement distance, 10) * 0.5`. Lower is better.
pub fn score(spot_type: SpotType, km_from_target: f64, town_km: f64) -> f64 {
    spot_type.priority() as f64 * PRIORITY_WEIGHT + km_from_target
        - town_km.min(SETTLEMENT_BONUS_CAP_KM) * SETTLEMENT_BONUS_WEIGHT
}

/// Distance to the closest settlement, or the 100 km sentinel when there is none closer.
pub fn nearest_settlement_km(point: &Coordinates, settlements: &[Coordinates]) -> f64 {
    settlements
        .iter()
        .map(|s| point.distance_to(s))
        .fold(NO_SETTLEMENT_DISTANCE_KM, f64::min)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FeatureGeometry;
    use std::collections::HashMap;

    const KM_PER_DEG_LAT: f64 = 111.19492664455873;

    fn target() -> DayTarget {
        DayTarget {
            day: 1,
            target_km: 80.0,
            point: Coordinates::new(54.0, 25.0).unwrap(),
        }
    }

    /// A point `north_km` due north of the target.
    fn north(km: f64) -> Coordinates {
        Coordinates::new(54.0 + km / KM_PER_DEG_LAT, 25.0).unwrap()
    }

    fn feature(id: i64, at: Coordinates, tags: &[(&str, &str)]) -> Feature {
        let tags: HashMap<String, String> = tags
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Feature::new(id, FeatureGeometry::Point(at), tags)
    }

    fn scorer() -> CandidateScorer {
        CandidateScorer::new(&CampingConfig::default())
    }

    #[test]
    fn test_score_formula() {
        // Shelter 3 km away, 5 km from town: 10 + 3 - 2.5
        assert!((score(SpotType::Shelter, 3.0, 5.0) - 10.5).abs() < 1e-12);
        // Bonus is capped at 10 km
        assert_eq!(score(SpotType::Water, 1.0, 100.0), score(SpotType::Water, 1.0, 10.0));
    }

    #[test]
    fn test_nearest_settlement_sentinel() {
        assert_eq!(nearest_settlement_km(&north(0.0), &[]), 100.0);
        let d = nearest_settlement_km(&north(0.0), &[north(2.0), north(7.0)]);
        assert!((d - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_near_settlement_rejected() {
        let shelter = feature(1, north(3.0), &[("amenity", "shelter")]);
        let settlement = north(3.8);

        let candidates = scorer().score(&target(), 8.0, &[shelter], &[settlement]);
        assert!(candidates.is_empty());
    }

    #[test]
    fn test_exclusion_holds_for_every_settlement_list() {
        let east = |from: Coordinates, km: f64| {
            Coordinates::new(
                from.lat,
                from.lng + km / (KM_PER_DEG_LAT * from.lat.to_radians().cos()),
            )
            .unwrap()
        };

        // Shelters on a 1 km grid around the target
        let features: Vec<Feature> = (-7..=7)
            .flat_map(|dn| (-7..=7).map(move |de| (dn, de)))
            .enumerate()
            .map(|(i, (dn, de))| {
                let at = east(north(dn as f64), de as f64);
                feature(i as i64, at, &[("amenity", "shelter")])
            })
            .collect();

        let settlement_lists = vec![
            vec![],
            vec![north(0.3)],
            // Nearest settlement to most of the grid is last
            vec![north(40.0), north(-25.0), east(north(2.0), 3.0)],
            vec![east(north(-4.0), -4.0), north(5.5), east(north(0.0), 1.2)],
            vec![north(6.0), north(-6.0), east(north(0.0), 6.0), east(north(0.0), -6.0)],
        ];

        let scorer = scorer();
        for settlements in &settlement_lists {
            let candidates = scorer.score(&target(), 8.0, &features, settlements);

            for candidate in &candidates {
                for settlement in settlements {
                    assert!(
                        candidate.coordinates.distance_to(settlement) >= 1.5,
                        "candidate {:?} within 1.5 km of {:?}",
                        candidate.coordinates,
                        settlement
                    );
                }
            }

            let expected = features
                .iter()
                .filter_map(Feature::point)
                .filter(|p| target().point.distance_to(p) <= 8.0)
                .filter(|p| settlements.iter().all(|s| p.distance_to(s) >= 1.5))
                .count();
            assert_eq!(candidates.len(), expected);
        }
    }

    #[test]
    fn test_transit_and_distant_features_rejected() {
        let features = vec![
            feature(1, north(1.0), &[("amenity", "shelter"), ("highway", "bus_stop")]),
            feature(2, north(1.0), &[("amenity", "shelter"), ("shelter_type", "public_transport")]),
            feature(3, north(9.0), &[("tourism", "camp_site")]),
        ];

        assert!(scorer().score(&target(), 8.0, &features, &[]).is_empty());
    }

    #[test]
    fn test_features_without_point_skipped() {
        let mut way = feature(1, north(1.0), &[("amenity", "shelter")]);
        way.geometry = FeatureGeometry::None;

        assert!(scorer().score(&target(), 8.0, &[way], &[]).is_empty());
    }

    #[test]
    fn test_type_priority_beats_distance() {
        let features = vec![
            feature(1, north(0.5), &[("natural", "spring"), ("name", "Šaltinis")]),
            feature(2, north(6.0), &[("tourism", "wilderness_hut"), ("name", "Trobelė")]),
            feature(3, north(2.0), &[("tourism", "viewpoint")]),
        ];

        let candidates = scorer().score(&target(), 8.0, &features, &[]);

        assert_eq!(candidates.len(), 3);
        assert_eq!(candidates[0].spot_type, SpotType::Hut);
        assert_eq!(candidates[0].name, "Trobelė");
        assert_eq!(candidates[1].spot_type, SpotType::Viewpoint);
        assert_eq!(candidates[1].name, "Viewpoint near km 80");
        assert_eq!(candidates[2].spot_type, SpotType::Water);
        assert!(candidates.windows(2).all(|w| w[0].score <= w[1].score));
    }

    #[test]
    fn test_remoteness_breaks_ties() {
        let features = vec![
            feature(1, north(2.0), &[("tourism", "picnic_site")]),
            feature(2, north(-2.0), &[("tourism", "picnic_site")]),
        ];
        // Town 4 km north of the target: feature 1 is 2 km away from it, feature 2 is 6 km
        let candidates = scorer().score(&target(), 8.0, &features, &[north(4.0)]);

        assert_eq!(candidates.len(), 2);
        assert!(candidates[0].coordinates.lat < target().point.lat);
        assert!((candidates[0].town_km - 6.0).abs() < 1e-6);
    }
}
