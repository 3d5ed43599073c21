pub mod camps;
pub mod debug;
pub mod trips;

use axum::{routing::{get, post}, Router};
use std::sync::Arc;

use crate::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/trips", post(trips::create_trip))
        .route("/camps", post(camps::create_camp_plan))
        .route("/debug/health", get(debug::health_check))
        .with_state(state)
}
