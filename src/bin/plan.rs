use bikecamp::config::Config;
use bikecamp::models::{BikeProfile, CampRequest, TripRequest};
use bikecamp::services::{
    BRouterClient, CampPlanner, FeatureSource, NominatimClient, OverpassClient, TripPlanner,
};
use std::env;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn print_help() {
    eprintln!(
        "\
Usage: plan <START> <END> [OPTIONS]
       plan --waypoints=LAT,LON|LAT,LON|... [OPTIONS]

Options:
  --daily=KM            Target riding distance per day (default: 80)
  --profile=NAME        road, gravel, trekking, mountain, safety, shortest (default: trekking)
  --radius=KM           Camp search radius around each day end (default from config)
  --waypoints=LIST      Skip geocoding/routing and place camps along this route
  --json                Output the plan as JSON
  --help                Show this help message"
    );
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing (quiet for CLI output)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bikecamp=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Parse CLI args
    let args: Vec<String> = env::args().skip(1).collect();

    if args.iter().any(|a| a == "--help") {
        print_help();
        return Ok(());
    }

    let daily_distance_km: f64 = match args.iter().find_map(|a| a.strip_prefix("--daily=")) {
        Some(s) => s.parse().map_err(|_| format!("Invalid --daily value: {}", s))?,
        None => 80.0,
    };
    let profile: BikeProfile = match args.iter().find_map(|a| a.strip_prefix("--profile=")) {
        Some(s) => s.parse()?,
        None => BikeProfile::default(),
    };
    let search_radius_km: Option<f64> = args
        .iter()
        .find_map(|a| a.strip_prefix("--radius="))
        .map(|s| s.parse::<f64>().map_err(|_| format!("Invalid --radius value: {}", s)))
        .transpose()?;
    let waypoints = args.iter().find_map(|a| a.strip_prefix("--waypoints="));
    let json_output = args.iter().any(|a| a == "--json");
    let places: Vec<&String> = args.iter().filter(|a| !a.starts_with("--")).collect();

    let config = Config::from_env().map_err(|e| format!("Config error: {}", e))?;

    let feature_source: Arc<dyn FeatureSource> = Arc::new(OverpassClient::new(
        config.overpass_urls.clone(),
        &config.overpass,
        &config.user_agent,
    )?);
    let camp_planner = Arc::new(CampPlanner::new(config.camping.clone(), feature_source));
    let trip_planner = TripPlanner::new(
        Arc::new(NominatimClient::new(
            config.nominatim_url.clone(),
            &config.user_agent,
        )?),
        Arc::new(BRouterClient::new(
            config.brouter_url.clone(),
            &config.user_agent,
        )?),
        camp_planner,
        config.brouter_web_url.clone(),
        Duration::from_secs(config.plan_timeout_secs),
    );

    if let Some(waypoints) = waypoints {
        let request = CampRequest {
            waypoints: waypoints.to_string(),
            daily_distance_km,
            search_radius_km,
            profile,
        };
        let response = trip_planner.plan_camps(&request).await?;

        if json_output {
            println!("{}", serde_json::to_string_pretty(&response)?);
        } else {
            let plan = &response.plan;
            println!("{:.1} km over {} days", plan.total_km, plan.num_days);
            for camp in &plan.daily_camps {
                println!(
                    "Day {} (km {:.0}): {} [{}] at {}",
                    camp.day, camp.target_km, camp.spot.name, camp.spot.spot_type, camp.spot.coordinates
                );
            }
            if let Some(note) = &plan.note {
                println!("{}", note);
            }
            for warning in &plan.warnings {
                println!("Warning: {}", warning);
            }
            println!("{}", response.map_url);
        }
        return Ok(());
    }

    let [start, end] = places.as_slice() else {
        print_help();
        return Err("Expected START and END places".into());
    };

    let mut request = TripRequest::new(start.as_str(), end.as_str());
    request.daily_distance_km = daily_distance_km;
    request.profile = profile;
    request.search_radius_km = search_radius_km;

    let plan = trip_planner.plan_trip(&request).await?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
        println!("{}", plan.format_summary());
    }

    Ok(())
}
