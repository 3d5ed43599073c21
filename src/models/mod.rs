pub mod camp;
pub mod coordinates;
pub mod feature;
pub mod geo;
pub mod polyline;
pub mod trip;

pub use camp::{Candidate, CampPlan, CampSpot, DayCamp, DayTarget, ForestArea, SpotType};
pub use coordinates::Coordinates;
pub use feature::{Feature, FeatureGeometry, FeatureKind};
pub use geo::BoundingBox;
pub use polyline::Polyline;
pub use trip::{
    BikeProfile, CampRequest, CampResponse, NamedPlace, RouteSummary, TripPlan, TripRequest,
};
