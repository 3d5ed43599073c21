pub mod candidates;
pub mod forest;
pub mod geometry;
pub mod reassembly;
pub mod resolver;
pub mod segmentation;

use crate::config::CampingConfig;
use crate::error::{AppError, Result};
use crate::models::camp::round_to;
use crate::models::{CampPlan, DayCamp, DayTarget, Polyline};
use crate::services::feature_source::FeatureSource;
use futures::stream::{self, StreamExt};
use std::sync::Arc;

use candidates::CandidateScorer;
use forest::ForestSelector;
use resolver::{
    scout_placeholder, CampResolver, DayContext, OfficialSiteResolver, Resolution,
    WildForestResolver,
};
use segmentation::segment_route;

pub const SINGLE_DAY_NOTE: &str = "Route is short enough for single day - no camping needed";

/// Places one overnight stop per riding day along a route.
pub struct CampPlanner {
    config: CampingConfig,
    resolvers: Vec<Box<dyn CampResolver>>,
}

impl CampPlanner {
    /// Planner with the standard cascade: official site, then forest.
    pub fn new(config: CampingConfig, source: Arc<dyn FeatureSource>) -> Self {
        let resolvers: Vec<Box<dyn CampResolver>> = vec![
            Box::new(OfficialSiteResolver::new(
                source.clone(),
                CandidateScorer::new(&config),
            )),
            Box::new(WildForestResolver::new(source, ForestSelector::new(&config))),
        ];

        Self::with_resolvers(config, resolvers)
    }

    /// Planner with a custom resolver order. Days no resolver handles are
    /// marked for scouting.
    pub fn with_resolvers(config: CampingConfig, resolvers: Vec<Box<dyn CampResolver>>) -> Self {
        CampPlanner { config, resolvers }
    }

    pub fn config(&self) -> &CampingConfig {
        &self.config
    }

    /// Requested radius (or the default), capped at the configured maximum.
    pub fn effective_radius(&self, requested_km: Option<f64>) -> f64 {
        requested_km
            .unwrap_or(self.config.default_search_radius_km)
            .min(self.config.max_search_radius_km)
    }

    /// Plan from a `lat,lon|lat,lon|...` waypoint string.
    pub async fn plan_from_waypoints(
        &self,
        waypoints: &str,
        daily_distance_km: f64,
        search_radius_km: Option<f64>,
    ) -> Result<CampPlan> {
        let route: Polyline = waypoints.parse()?;
        self.plan_camps(&route, daily_distance_km, search_radius_km)
            .await
    }

    pub async fn plan_camps(
        &self,
        route: &Polyline,
        daily_distance_km: f64,
        search_radius_km: Option<f64>,
    ) -> Result<CampPlan> {
        let radius_km = self.effective_radius(search_radius_km);
        if !radius_km.is_finite() || radius_km <= 0.0 {
            return Err(AppError::Validation(format!(
                "search radius must be positive, got {}",
                radius_km
            )));
        }

        let segmentation = segment_route(route, daily_distance_km, &self.config)?;
        let total_km = round_to(segmentation.total_km, 1);

        tracing::info!(
            total_km = total_km,
            daily_distance_km = daily_distance_km,
            estimated_days = segmentation.estimated_days,
            targets = segmentation.targets.len(),
            "Planning camps along {:.1} km route at {} km/day",
            total_km,
            daily_distance_km
        );

        if segmentation.targets.is_empty() {
            return Ok(CampPlan {
                total_km,
                daily_distance_km,
                num_days: 1,
                estimated_days: segmentation.estimated_days,
                daily_camps: Vec::new(),
                route_waypoints: reassembly::route_waypoints(route.start(), &[], route.end()),
                camp_pois: String::new(),
                warnings: Vec::new(),
                note: Some(SINGLE_DAY_NOTE.to_string()),
            });
        }

        // `buffered` yields in input order, so days come back sorted whatever
        // order their queries finish in.
        let resolved: Vec<(DayCamp, Vec<String>)> =
            stream::iter(segmentation.targets.iter().copied())
                .map(|target| self.resolve_day(target, radius_km))
                .buffered(self.config.day_concurrency.max(1))
                .collect()
                .await;

        let mut daily_camps = Vec::with_capacity(resolved.len());
        let mut warnings = Vec::new();
        for (camp, day_warnings) in resolved {
            daily_camps.push(camp);
            warnings.extend(day_warnings);
        }

        let scouting = daily_camps.iter().filter(|c| c.spot.needs_scouting()).count();
        if scouting > 0 {
            tracing::warn!(
                scout_days = scouting,
                "{} of {} days have no known camp and need scouting",
                scouting,
                daily_camps.len()
            );
        }

        Ok(CampPlan {
            total_km,
            daily_distance_km,
            num_days: segmentation.planned_days(),
            estimated_days: segmentation.estimated_days,
            route_waypoints: reassembly::route_waypoints(route.start(), &daily_camps, route.end()),
            camp_pois: reassembly::camp_pois(&daily_camps),
            daily_camps,
            warnings,
            note: None,
        })
    }

    /// Runs the cascade for one day. Always produces a camp.
    async fn resolve_day(&self, target: DayTarget, radius_km: f64) -> (DayCamp, Vec<String>) {
        let ctx = DayContext::new(target, radius_km);
        let mut warnings = Vec::new();

        if ctx.bbox.is_approximation_unreliable() {
            warnings.push(format!(
                "Day {}: search area near {:.4},{:.4} may be incomplete at this latitude/longitude",
                target.day, target.point.lat, target.point.lng
            ));
        }

        for resolver in &self.resolvers {
            match resolver.resolve(&ctx, &mut warnings).await {
                Resolution::Resolved(spot) => {
                    tracing::info!(
                        day = target.day,
                        resolver = resolver.name(),
                        spot_type = %spot.spot_type,
                        "Day {}: {} ({})",
                        target.day,
                        spot.name,
                        spot.spot_type
                    );
                    return (DayCamp::new(&target, spot), warnings);
                }
                Resolution::Next => {
                    tracing::debug!(
                        day = target.day,
                        resolver = resolver.name(),
                        "Day {}: nothing from {}",
                        target.day,
                        resolver.name()
                    );
                }
            }
        }

        tracing::info!(
            day = target.day,
            "Day {}: no camp found, marking target for scouting",
            target.day
        );
        (DayCamp::new(&target, scout_placeholder(&target)), warnings)
    }
}
