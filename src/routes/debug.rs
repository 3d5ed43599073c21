use crate::AppState;
use axum::{extract::State, Json};
use serde_json::{json, Value};
use std::sync::Arc;

/// GET /debug/health - Report configuration the planner is running with
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<Value> {
    let camping = state.trip_planner.camp_planner().config();

    Json(json!({
        "status": "ok",
        "checks": {
            "feature_source": state.feature_source.source_name(),
        },
        "camping": {
            "min_forest_area_ha": camping.min_forest_area_ha,
            "settlement_exclusion_km": camping.settlement_exclusion_km,
            "default_search_radius_km": camping.default_search_radius_km,
            "max_search_radius_km": camping.max_search_radius_km,
            "day_concurrency": camping.day_concurrency,
        }
    }))
}
