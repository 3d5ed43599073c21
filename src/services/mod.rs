pub mod brouter;
pub mod camp_planner;
pub mod export;
pub mod feature_source;
pub mod geocoder;
pub mod overpass;
pub mod trip_planner;

pub use brouter::{BRouterClient, RouteProvider};
pub use camp_planner::CampPlanner;
pub use feature_source::{FeatureQuery, FeatureSource};
pub use geocoder::{Geocoder, NominatimClient};
pub use overpass::OverpassClient;
pub use trip_planner::TripPlanner;
