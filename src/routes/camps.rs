use crate::error::Result;
use crate::models::{CampRequest, CampResponse};
use crate::AppState;
use axum::{extract::State, Json};
use std::sync::Arc;

/// POST /camps
/// Place camps along an existing `lat,lon|lat,lon|...` route
pub async fn create_camp_plan(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CampRequest>,
) -> Result<Json<CampResponse>> {
    tracing::info!(
        daily_distance_km = request.daily_distance_km,
        search_radius_km = ?request.search_radius_km,
        "Camp plan request: {} km/day",
        request.daily_distance_km
    );

    let response = state.trip_planner.plan_camps(&request).await?;
    Ok(Json(response))
}
