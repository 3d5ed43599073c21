use bikecamp::config::CampingConfig;
use bikecamp::models::{Coordinates, SpotType};
use bikecamp::services::camp_planner::SINGLE_DAY_NOTE;
use bikecamp::services::{CampPlanner, FeatureQuery};
use std::sync::Arc;
use std::time::Duration;

mod common;
use common::*;

fn start() -> Coordinates {
    coords(54.0, 25.0)
}

/// Where the first day ends on a route due north of `start()` at 80 km/day.
fn day_end(day: u32) -> Coordinates {
    north_of(start(), 80.0 * day as f64)
}

fn planner(source: Arc<MockFeatureSource>) -> CampPlanner {
    CampPlanner::new(CampingConfig::default(), source)
}

#[tokio::test]
async fn test_two_day_route_gets_one_camp() {
    let source = Arc::new(MockFeatureSource::new());
    let route = meridian_route(start(), 160.0, 5);

    let plan = planner(source).plan_camps(&route, 80.0, None).await.unwrap();

    assert_eq!(plan.num_days, 2);
    assert_eq!(plan.total_km, 160.0);
    assert_eq!(plan.daily_camps.len(), 1);
    assert_eq!(plan.daily_camps[0].day, 1);
    assert_eq!(plan.daily_camps[0].target_km, 80.0);

    let waypoints: Vec<&str> = plan.route_waypoints.split('|').collect();
    assert_eq!(waypoints.len(), 3);
    assert_eq!(waypoints[0], start().to_string());
    assert_eq!(waypoints[2], route.end().to_string());
}

#[tokio::test]
async fn test_short_route_needs_no_camp() {
    let source = Arc::new(MockFeatureSource::new());
    let route = meridian_route(start(), 50.0, 5);

    let plan = planner(source.clone())
        .plan_camps(&route, 80.0, None)
        .await
        .unwrap();

    assert_eq!(plan.num_days, 1);
    assert!(plan.daily_camps.is_empty());
    assert_eq!(plan.camp_pois, "");
    assert_eq!(plan.note.as_deref(), Some(SINGLE_DAY_NOTE));
    assert_eq!(
        plan.route_waypoints,
        format!("{}|{}", start(), route.end())
    );
    assert!(source.calls().is_empty());
}

#[tokio::test]
async fn test_official_shelter_selected() {
    let shelter_at = east_of(day_end(1), 2.0);
    let source = Arc::new(MockFeatureSource::new().with(
        FeatureQuery::CampSpots,
        vec![tagged_point(
            7,
            shelter_at,
            &[("amenity", "shelter"), ("name", "Miško pastogė")],
        )],
    ));

    let plan = planner(source.clone())
        .plan_camps(&meridian_route(start(), 160.0, 5), 80.0, None)
        .await
        .unwrap();

    let spot = &plan.daily_camps[0].spot;
    assert_eq!(spot.spot_type, SpotType::Shelter);
    assert_eq!(spot.name, "Miško pastogė");
    assert_eq!(spot.km_from_target, 2.0);
    assert_eq!(spot.town_km, Some(100.0));
    assert_eq!(spot.coordinates, shelter_at.round(5));

    assert_eq!(source.call_count(FeatureQuery::Settlements), 1);
    assert_eq!(source.call_count(FeatureQuery::Forests), 0);
    assert_eq!(
        plan.camp_pois,
        format!("{},Miško pastogė", shelter_at.round(5))
    );
}

#[tokio::test]
async fn test_shelter_near_village_falls_through_to_forest_search() {
    let shelter_at = east_of(day_end(1), 3.0);
    let source = Arc::new(
        MockFeatureSource::new()
            .with(
                FeatureQuery::CampSpots,
                vec![tagged_point(7, shelter_at, &[("amenity", "shelter")])],
            )
            .with(
                FeatureQuery::Settlements,
                vec![settlement(8, east_of(shelter_at, 0.8), "Kaimas")],
            ),
    );

    let plan = planner(source.clone())
        .plan_camps(&meridian_route(start(), 160.0, 5), 80.0, None)
        .await
        .unwrap();

    assert_eq!(source.call_count(FeatureQuery::Forests), 1);
    assert_eq!(plan.daily_camps[0].spot.spot_type, SpotType::ScoutNeeded);
}

#[tokio::test]
async fn test_bus_shelter_never_selected() {
    let source = Arc::new(MockFeatureSource::new().with(
        FeatureQuery::CampSpots,
        vec![tagged_point(
            7,
            east_of(day_end(1), 0.5),
            &[("amenity", "shelter"), ("shelter_type", "public_transport")],
        )],
    ));

    let plan = planner(source)
        .plan_camps(&meridian_route(start(), 160.0, 5), 80.0, None)
        .await
        .unwrap();

    assert!(plan.daily_camps[0].spot.needs_scouting());
}

#[tokio::test]
async fn test_large_forest_becomes_wild_camp() {
    let source = Arc::new(MockFeatureSource::new().with(
        FeatureQuery::Forests,
        vec![square_forest(
            11,
            east_of(day_end(1), 3.0),
            60.0,
            &[("name", "Pušynas")],
        )],
    ));

    let plan = planner(source)
        .plan_camps(&meridian_route(start(), 160.0, 5), 80.0, None)
        .await
        .unwrap();

    let spot = &plan.daily_camps[0].spot;
    assert_eq!(spot.spot_type, SpotType::WildForest);
    assert_eq!(spot.name, "Wild camp in Pušynas");
    assert_eq!(spot.area_ha, Some(60.0));
    assert_eq!(spot.km_from_target, 3.0);
    assert_eq!(
        spot.note.as_deref(),
        Some("Large forest area (60 ha) - good for wild camping")
    );
}

#[tokio::test]
async fn test_small_forest_leaves_day_for_scouting() {
    let source = Arc::new(MockFeatureSource::new().with(
        FeatureQuery::Forests,
        vec![square_forest(11, east_of(day_end(1), 1.0), 15.0, &[])],
    ));

    let plan = planner(source)
        .plan_camps(&meridian_route(start(), 160.0, 5), 80.0, None)
        .await
        .unwrap();

    let spot = &plan.daily_camps[0].spot;
    assert_eq!(spot.spot_type, SpotType::ScoutNeeded);
    assert_eq!(spot.name, "Scout area Day 1 (find forest nearby)");
    assert!((spot.coordinates.lat - day_end(1).lat).abs() < 1e-5);
    assert!((spot.coordinates.lng - day_end(1).lng).abs() < 1e-5);
    assert_eq!(plan.scout_days(), vec![1]);
}

#[tokio::test]
async fn test_settlements_not_queried_without_camp_features() {
    let source = Arc::new(MockFeatureSource::new());

    planner(source.clone())
        .plan_camps(&meridian_route(start(), 160.0, 5), 80.0, None)
        .await
        .unwrap();

    assert_eq!(source.call_count(FeatureQuery::CampSpots), 1);
    assert_eq!(source.call_count(FeatureQuery::Settlements), 0);
    assert_eq!(source.call_count(FeatureQuery::Forests), 1);
}

#[tokio::test]
async fn test_query_failures_become_warnings() {
    let source = Arc::new(
        MockFeatureSource::new()
            .failing(FeatureQuery::CampSpots)
            .failing(FeatureQuery::Forests),
    );

    let plan = planner(source)
        .plan_camps(&meridian_route(start(), 160.0, 5), 80.0, None)
        .await
        .unwrap();

    assert_eq!(plan.daily_camps.len(), 1);
    assert!(plan.daily_camps[0].spot.needs_scouting());
    assert_eq!(plan.warnings.len(), 2);
    assert!(plan.warnings[0].starts_with("Day 1: camp spot query failed"));
    assert!(plan.warnings[1].starts_with("Day 1: forest query failed"));
}

#[tokio::test]
async fn test_mixed_days_reassemble_in_order() {
    let source = Arc::new(
        MockFeatureSource::new()
            .with(
                FeatureQuery::CampSpots,
                vec![tagged_point(
                    1,
                    east_of(day_end(1), 1.0),
                    &[("tourism", "camp_site"), ("name", "Stovyklavietė, prie ežero")],
                )],
            )
            .with(
                FeatureQuery::Forests,
                vec![square_forest(2, east_of(day_end(2), 2.0), 45.0, &[])],
            ),
    );

    let plan = planner(source)
        .plan_camps(&meridian_route(start(), 320.0, 9), 80.0, None)
        .await
        .unwrap();

    assert_eq!(plan.num_days, 4);
    let types: Vec<SpotType> = plan.daily_camps.iter().map(|c| c.spot.spot_type).collect();
    assert_eq!(
        types,
        vec![SpotType::Campsite, SpotType::WildForest, SpotType::ScoutNeeded]
    );

    // start + one waypoint per camp + end
    assert_eq!(
        plan.route_waypoints.split('|').count(),
        plan.num_days as usize + 1
    );

    let labels: Vec<&str> = plan
        .camp_pois
        .split('|')
        .map(|entry| entry.splitn(3, ',').nth(2).unwrap())
        .collect();
    assert_eq!(
        labels,
        vec![
            "Stovyklavietė  prie ežero",
            "Wild camp in Forest (45 ha)",
            "Scout area Day 3 (find forest ",
        ]
    );
}

#[tokio::test]
async fn test_concurrent_days_keep_day_order() {
    // Southern boxes answer slowest, so later days finish first
    let source = Arc::new(MockFeatureSource::new().with_latency(|bbox| {
        Duration::from_millis(((57.5 - bbox.max_lat) * 100.0).max(0.0) as u64)
    }));
    let config = CampingConfig {
        day_concurrency: 4,
        ..CampingConfig::default()
    };

    let plan = CampPlanner::new(config, source)
        .plan_camps(&meridian_route(start(), 400.0, 11), 80.0, None)
        .await
        .unwrap();

    let days: Vec<u32> = plan.daily_camps.iter().map(|c| c.day).collect();
    assert_eq!(days, vec![1, 2, 3, 4]);
    assert!(plan
        .daily_camps
        .windows(2)
        .all(|w| w[0].spot.coordinates.lat < w[1].spot.coordinates.lat));
}

#[tokio::test]
async fn test_requested_radius_is_capped() {
    let source = Arc::new(MockFeatureSource::new());

    planner(source.clone())
        .plan_camps(&meridian_route(start(), 160.0, 5), 80.0, Some(25.0))
        .await
        .unwrap();

    let (_, bbox) = source.calls()[0];
    let expected_height = 2.0 * 10.0 / 111.0;
    assert!((bbox.max_lat - bbox.min_lat - expected_height).abs() < 1e-9);
}

#[tokio::test]
async fn test_plan_from_waypoint_string() {
    let source = Arc::new(MockFeatureSource::new());
    let waypoints = format!("{}|{}", start(), north_of(start(), 170.0));

    let plan = planner(source)
        .plan_from_waypoints(&waypoints, 80.0, None)
        .await
        .unwrap();

    assert_eq!(plan.num_days, 2);
    assert_eq!(plan.daily_camps.len(), 1);
}

#[tokio::test]
async fn test_single_day_waypoints_echo_input_text() {
    let source = Arc::new(MockFeatureSource::new());
    let waypoints = "50.0,10.0|50.4,10.0";

    let plan = planner(source)
        .plan_from_waypoints(waypoints, 80.0, None)
        .await
        .unwrap();

    assert_eq!(plan.num_days, 1);
    assert_eq!(plan.route_waypoints, waypoints);
}

#[tokio::test]
async fn test_destination_buffer_keeps_estimated_day_count() {
    // 116 km at 50 km/day: three days by distance, but the 100 km target is
    // within 20 km of the end, so the rider camps once
    let source = Arc::new(MockFeatureSource::new());

    let plan = planner(source)
        .plan_camps(&meridian_route(start(), 116.0, 12), 50.0, None)
        .await
        .unwrap();

    assert_eq!(plan.estimated_days, 3);
    assert_eq!(plan.num_days, 2);
    assert_eq!(plan.daily_camps.len(), 1);
}
