use axum::Router;
use bikecamp::config::Config;
use bikecamp::services::{
    BRouterClient, CampPlanner, FeatureSource, NominatimClient, OverpassClient, TripPlanner,
};
use bikecamp::AppState;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bikecamp=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().map_err(|e| format!("Failed to load configuration: {}", e))?;

    tracing::info!("Starting bikecamp API server");
    tracing::info!(
        overpass_endpoints = config.overpass_urls.len(),
        brouter = %config.brouter_url,
        "Configuration loaded successfully"
    );

    // Initialize collaborators
    let feature_source: Arc<dyn FeatureSource> = Arc::new(OverpassClient::new(
        config.overpass_urls.clone(),
        &config.overpass,
        &config.user_agent,
    )?);
    let geocoder = Arc::new(NominatimClient::new(
        config.nominatim_url.clone(),
        &config.user_agent,
    )?);
    let router = Arc::new(BRouterClient::new(
        config.brouter_url.clone(),
        &config.user_agent,
    )?);

    let camp_planner = Arc::new(CampPlanner::new(
        config.camping.clone(),
        feature_source.clone(),
    ));
    let trip_planner = TripPlanner::new(
        geocoder,
        router,
        camp_planner,
        config.brouter_web_url.clone(),
        Duration::from_secs(config.plan_timeout_secs),
    );

    // Create application state
    let state = Arc::new(AppState {
        trip_planner,
        feature_source,
    });

    // Build router with CORS and tracing
    let app = Router::new()
        .nest("/api/v1", bikecamp::routes::create_router(state))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = config.server_address();
    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
