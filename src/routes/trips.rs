use crate::error::Result;
use crate::models::{TripPlan, TripRequest};
use crate::AppState;
use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Serialize)]
pub struct TripResponse {
    #[serde(flatten)]
    pub plan: TripPlan,
    /// Markdown itinerary
    pub summary: String,
}

/// POST /trips
/// Plan a multi-day trip between two named places
pub async fn create_trip(
    State(state): State<Arc<AppState>>,
    Json(request): Json<TripRequest>,
) -> Result<Json<TripResponse>> {
    let plan = state.trip_planner.plan_trip(&request).await?;

    tracing::info!(
        trip_id = %plan.id,
        days = plan.camps.num_days,
        scout_days = plan.camps.scout_days().len(),
        "Trip {} planned: {} days",
        plan.id,
        plan.camps.num_days
    );

    let summary = plan.format_summary();
    Ok(Json(TripResponse { plan, summary }))
}
