// Library exports for testing and reusability

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use error::{AppError, Result};

use services::{FeatureSource, TripPlanner};
use std::sync::Arc;

// App state for sharing across the application
pub struct AppState {
    pub trip_planner: TripPlanner,
    pub feature_source: Arc<dyn FeatureSource>,
}
