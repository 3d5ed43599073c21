use crate::constants::{DEFAULT_MAP_ZOOM, ROUTE_SAMPLE_TARGET_POINTS};
use crate::error::{AppError, Result};
use crate::models::{CampRequest, CampResponse, TripPlan, TripRequest};
use crate::services::brouter::RouteProvider;
use crate::services::camp_planner::CampPlanner;
use crate::services::export::map_url_from_strings;
use crate::services::geocoder::Geocoder;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use uuid::Uuid;

/// Geocode, route, place camps, link a map.
pub struct TripPlanner {
    geocoder: Arc<dyn Geocoder>,
    router: Arc<dyn RouteProvider>,
    camp_planner: Arc<CampPlanner>,
    brouter_web_url: String,
    plan_timeout: Duration,
}

impl TripPlanner {
    pub fn new(
        geocoder: Arc<dyn Geocoder>,
        router: Arc<dyn RouteProvider>,
        camp_planner: Arc<CampPlanner>,
        brouter_web_url: String,
        plan_timeout: Duration,
    ) -> Self {
        TripPlanner {
            geocoder,
            router,
            camp_planner,
            brouter_web_url,
            plan_timeout,
        }
    }

    pub fn camp_planner(&self) -> &CampPlanner {
        &self.camp_planner
    }

    /// Full trip from two free-text places. Nothing partial is returned on
    /// timeout or failure.
    pub async fn plan_trip(&self, request: &TripRequest) -> Result<TripPlan> {
        request.validate().map_err(AppError::Validation)?;
        self.bounded(self.plan_trip_inner(request)).await
    }

    /// Camps along a route the caller already has.
    pub async fn plan_camps(&self, request: &CampRequest) -> Result<CampResponse> {
        request.validate().map_err(AppError::Validation)?;
        self.bounded(self.plan_camps_inner(request)).await
    }

    async fn bounded<T>(&self, work: impl Future<Output = Result<T>>) -> Result<T> {
        tokio::time::timeout(self.plan_timeout, work)
            .await
            .map_err(|_| AppError::Timeout(self.plan_timeout.as_secs()))?
    }

    async fn plan_trip_inner(&self, request: &TripRequest) -> Result<TripPlan> {
        tracing::info!(
            start = %request.start,
            end = %request.end,
            daily_distance_km = request.daily_distance_km,
            profile = %request.profile,
            "Planning trip: {} -> {}, {} km/day, profile={}",
            request.start,
            request.end,
            request.daily_distance_km,
            request.profile
        );

        // Nominatim allows one request per second
        let start = self.geocoder.geocode(&request.start).await?;
        let end = self.geocoder.geocode(&request.end).await?;

        let route = self
            .router
            .route(&[start.coordinates, end.coordinates], request.profile)
            .await?;

        tracing::info!(
            distance_km = route.distance_km,
            points = route.point_count,
            "Route {} -> {}: {:.1} km, {} points",
            start.name,
            end.name,
            route.distance_km,
            route.point_count
        );

        let sampled = route.geometry.sampled(ROUTE_SAMPLE_TARGET_POINTS);
        let camps = self
            .camp_planner
            .plan_camps(&sampled, request.daily_distance_km, request.search_radius_km)
            .await?;

        let map_url = map_url_from_strings(
            &self.brouter_web_url,
            &camps.route_waypoints,
            request.profile.brouter_profile(),
            DEFAULT_MAP_ZOOM,
            &camps.camp_pois,
        )?;

        let created_at = OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .map_err(|e| AppError::Internal(format!("Failed to format timestamp: {}", e)))?;

        Ok(TripPlan {
            id: Uuid::new_v4(),
            created_at,
            start,
            end,
            profile: request.profile,
            route,
            camps,
            map_url,
        })
    }

    async fn plan_camps_inner(&self, request: &CampRequest) -> Result<CampResponse> {
        let plan = self
            .camp_planner
            .plan_from_waypoints(
                &request.waypoints,
                request.daily_distance_km,
                request.search_radius_km,
            )
            .await?;

        let map_url = map_url_from_strings(
            &self.brouter_web_url,
            &plan.route_waypoints,
            request.profile.brouter_profile(),
            DEFAULT_MAP_ZOOM,
            &plan.camp_pois,
        )?;

        Ok(CampResponse { plan, map_url })
    }
}
