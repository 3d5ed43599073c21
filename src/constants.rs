//! Stable application-wide constants.
//!
//! Values here are structural invariants, geodesy approximations, and default
//! fallbacks for env-var-based configuration. They should rarely change.
//! Thresholds that are worth tuning per deployment live in
//! [`CampingConfig`](crate::config::CampingConfig) and
//! [`OverpassConfig`](crate::config::OverpassConfig) instead.

// --- Server defaults (used when HOST / PORT env vars are absent) ---

/// Default bind address for the HTTP server.
pub const DEFAULT_HOST: &str = "0.0.0.0";
/// Default port for the HTTP server.
pub const DEFAULT_PORT: &str = "3000";

// --- Collaborator endpoints ---

pub const DEFAULT_OVERPASS_URL: &str = "https://overpass-api.de/api/interpreter";
pub const DEFAULT_NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";
pub const DEFAULT_BROUTER_URL: &str = "http://localhost:17777";
pub const DEFAULT_BROUTER_WEB_URL: &str = "http://localhost:8080";
/// Nominatim's usage policy requires an identifying User-Agent.
pub const DEFAULT_USER_AGENT: &str = "bikecamp/0.1 (bikepacking route planner)";

// --- Geodesy ---

/// Mean earth radius used by the haversine distance.
pub const EARTH_RADIUS_KM: f64 = 6371.0;
/// Rough kilometres per degree of latitude, used to size query boxes.
pub const KM_PER_DEGREE: f64 = 111.0;
/// Longitude half-width of a query box relative to its latitude half-height.
/// Mid-latitude heuristic; see `BoundingBox::around`.
pub const LNG_BOX_INFLATION: f64 = 1.5;
/// Metres per degree used for the planar projection of forest polygons.
pub const METERS_PER_DEGREE: f64 = 111_320.0;
pub const SQUARE_METERS_PER_HECTARE: f64 = 10_000.0;
/// Above this latitude the fixed longitude inflation under-covers the search circle.
pub const HIGH_LATITUDE_WARNING_DEG: f64 = 60.0;

// --- Camp selection ---

/// Padding (degrees) added on every side of the camp box for the settlement query.
pub const SETTLEMENT_BOX_PADDING_DEG: f64 = 0.05;
/// Settlement distance reported when no settlement is found near a candidate.
pub const NO_SETTLEMENT_DISTANCE_KM: f64 = 100.0;
/// Remoteness bonus stops growing beyond this settlement distance.
pub const SETTLEMENT_BONUS_CAP_KM: f64 = 10.0;
pub const SETTLEMENT_BONUS_WEIGHT: f64 = 0.5;
/// Multiplier applied to a candidate's type priority in its score.
pub const PRIORITY_WEIGHT: f64 = 10.0;
/// Maximum characters kept from a candidate's display name.
pub const CANDIDATE_NAME_MAX_CHARS: usize = 40;
/// Maximum characters of a POI label in the map wire format.
pub const POI_LABEL_MAX_CHARS: usize = 30;
/// Decimal places kept for camp coordinates in plan output.
pub const SPOT_COORDINATE_DECIMALS: u32 = 5;

// --- Route sampling ---

/// Target number of polyline points handed to the segmenter.
pub const ROUTE_SAMPLE_TARGET_POINTS: usize = 100;
/// Maximum characters kept from a geocoded display name.
pub const PLACE_NAME_MAX_CHARS: usize = 50;
pub const DEFAULT_MAP_ZOOM: u8 = 10;

// --- Overpass API ---

pub const OVERPASS_CAMP_QUERY_TIMEOUT_SECONDS: u64 = 30;
pub const OVERPASS_SETTLEMENT_QUERY_TIMEOUT_SECONDS: u64 = 25;
/// Server-side `[timeout:]` of the settlement query; the HTTP timeout above leaves headroom.
pub const OVERPASS_SETTLEMENT_SERVER_TIMEOUT_SECONDS: u64 = 20;
pub const OVERPASS_FOREST_QUERY_TIMEOUT_SECONDS: u64 = 60;
pub const OVERPASS_HTTP_TOO_MANY_REQUESTS: u16 = 429;
pub const OVERPASS_HTTP_GATEWAY_TIMEOUT: u16 = 504;

// --- Other collaborators ---

pub const NOMINATIM_TIMEOUT_SECONDS: u64 = 30;
pub const BROUTER_TIMEOUT_SECONDS: u64 = 60;
/// Routes through intermediate camps take BRouter noticeably longer.
pub const BROUTER_MULTI_WAYPOINT_TIMEOUT_SECONDS: u64 = 120;
