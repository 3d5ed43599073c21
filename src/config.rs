use crate::constants::*;
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Overpass interpreter endpoints, tried round-robin
    pub overpass_urls: Vec<String>,
    pub nominatim_url: String,
    pub brouter_url: String,
    pub brouter_web_url: String,
    pub user_agent: String,
    /// Upper bound for a whole planning request, collaborator calls included
    pub plan_timeout_secs: u64,
    pub camping: CampingConfig,
    pub overpass: OverpassConfig,
}

#[derive(Debug, Clone)]
pub struct CampingConfig {
    /// Smallest forest polygon (hectares) considered for wild camping
    pub min_forest_area_ha: f64,

    /// Candidates closer than this to a city/town/village are rejected
    pub settlement_exclusion_km: f64,

    /// Hard cap on the search radius around each day target
    pub max_search_radius_km: f64,

    /// Search radius used when the request does not specify one
    pub default_search_radius_km: f64,

    /// Day targets closer than this to the destination are dropped
    pub destination_buffer_km: f64,

    /// Leftover distance (fraction of a day) that earns an extra day
    pub extra_day_fraction: f64,

    /// How many day targets are resolved at once (1 = sequential)
    pub day_concurrency: usize,
}

impl Default for CampingConfig {
    fn default() -> Self {
        Self {
            min_forest_area_ha: 20.0,
            settlement_exclusion_km: 1.5,
            max_search_radius_km: 10.0,
            default_search_radius_km: 8.0,
            destination_buffer_km: 20.0,
            extra_day_fraction: 0.3,
            day_concurrency: 1,
        }
    }
}

impl CampingConfig {
    pub fn from_env() -> Result<Self, String> {
        let defaults = Self::default();

        let config = Self {
            min_forest_area_ha: env::var("CAMP_MIN_FOREST_AREA_HA")
                .unwrap_or_else(|_| defaults.min_forest_area_ha.to_string())
                .parse()
                .map_err(|_| "Invalid CAMP_MIN_FOREST_AREA_HA")?,

            settlement_exclusion_km: env::var("CAMP_SETTLEMENT_EXCLUSION_KM")
                .unwrap_or_else(|_| defaults.settlement_exclusion_km.to_string())
                .parse()
                .map_err(|_| "Invalid CAMP_SETTLEMENT_EXCLUSION_KM")?,

            max_search_radius_km: env::var("CAMP_MAX_SEARCH_RADIUS_KM")
                .unwrap_or_else(|_| defaults.max_search_radius_km.to_string())
                .parse()
                .map_err(|_| "Invalid CAMP_MAX_SEARCH_RADIUS_KM")?,

            default_search_radius_km: env::var("CAMP_DEFAULT_SEARCH_RADIUS_KM")
                .unwrap_or_else(|_| defaults.default_search_radius_km.to_string())
                .parse()
                .map_err(|_| "Invalid CAMP_DEFAULT_SEARCH_RADIUS_KM")?,

            destination_buffer_km: env::var("CAMP_DESTINATION_BUFFER_KM")
                .unwrap_or_else(|_| defaults.destination_buffer_km.to_string())
                .parse()
                .map_err(|_| "Invalid CAMP_DESTINATION_BUFFER_KM")?,

            extra_day_fraction: env::var("CAMP_EXTRA_DAY_FRACTION")
                .unwrap_or_else(|_| defaults.extra_day_fraction.to_string())
                .parse()
                .map_err(|_| "Invalid CAMP_EXTRA_DAY_FRACTION")?,

            day_concurrency: env::var("CAMP_DAY_CONCURRENCY")
                .unwrap_or_else(|_| defaults.day_concurrency.to_string())
                .parse()
                .map_err(|_| "Invalid CAMP_DAY_CONCURRENCY")?,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), String> {
        let thresholds = [
            ("CAMP_MIN_FOREST_AREA_HA", self.min_forest_area_ha),
            ("CAMP_SETTLEMENT_EXCLUSION_KM", self.settlement_exclusion_km),
            ("CAMP_MAX_SEARCH_RADIUS_KM", self.max_search_radius_km),
            ("CAMP_DEFAULT_SEARCH_RADIUS_KM", self.default_search_radius_km),
            ("CAMP_DESTINATION_BUFFER_KM", self.destination_buffer_km),
            ("CAMP_EXTRA_DAY_FRACTION", self.extra_day_fraction),
        ];
        for (name, value) in thresholds {
            if !value.is_finite() {
                return Err(format!("{} must be a finite number", name));
            }
        }

        if self.max_search_radius_km <= 0.0 {
            return Err("CAMP_MAX_SEARCH_RADIUS_KM must be positive".to_string());
        }
        if self.default_search_radius_km <= 0.0
            || self.default_search_radius_km > self.max_search_radius_km
        {
            return Err(format!(
                "CAMP_DEFAULT_SEARCH_RADIUS_KM must be between 0 and {} km",
                self.max_search_radius_km
            ));
        }
        if !(0.0..1.0).contains(&self.extra_day_fraction) {
            return Err("CAMP_EXTRA_DAY_FRACTION must be in [0, 1)".to_string());
        }
        if self.min_forest_area_ha < 0.0
            || self.settlement_exclusion_km < 0.0
            || self.destination_buffer_km < 0.0
        {
            return Err("Camp thresholds cannot be negative".to_string());
        }
        if self.day_concurrency == 0 {
            return Err("CAMP_DAY_CONCURRENCY must be at least 1".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct OverpassConfig {
    /// Minimum spacing between two requests to the Overpass service
    pub min_interval_ms: u64,

    /// Total attempts per query on transient errors (429/504/timeouts)
    pub max_attempts: usize,

    /// Linear backoff step: attempt N waits N * step seconds
    pub backoff_step_secs: u64,

    /// Lifetime of cached query responses
    pub cache_ttl_secs: u64,

    pub cache_max_entries: u64,
}

impl Default for OverpassConfig {
    fn default() -> Self {
        Self {
            min_interval_ms: 1000,
            max_attempts: 3,
            backoff_step_secs: 5,
            cache_ttl_secs: 3600,
            cache_max_entries: 500,
        }
    }
}

impl OverpassConfig {
    pub fn from_env() -> Result<Self, String> {
        let defaults = Self::default();

        let config = Self {
            min_interval_ms: env::var("OVERPASS_MIN_INTERVAL_MS")
                .unwrap_or_else(|_| defaults.min_interval_ms.to_string())
                .parse()
                .map_err(|_| "Invalid OVERPASS_MIN_INTERVAL_MS")?,

            max_attempts: env::var("OVERPASS_MAX_ATTEMPTS")
                .unwrap_or_else(|_| defaults.max_attempts.to_string())
                .parse()
                .map_err(|_| "Invalid OVERPASS_MAX_ATTEMPTS")?,

            backoff_step_secs: env::var("OVERPASS_BACKOFF_STEP_SECS")
                .unwrap_or_else(|_| defaults.backoff_step_secs.to_string())
                .parse()
                .map_err(|_| "Invalid OVERPASS_BACKOFF_STEP_SECS")?,

            cache_ttl_secs: env::var("OVERPASS_CACHE_TTL")
                .unwrap_or_else(|_| defaults.cache_ttl_secs.to_string())
                .parse()
                .map_err(|_| "Invalid OVERPASS_CACHE_TTL")?,

            cache_max_entries: env::var("OVERPASS_CACHE_MAX_ENTRIES")
                .unwrap_or_else(|_| defaults.cache_max_entries.to_string())
                .parse()
                .map_err(|_| "Invalid OVERPASS_CACHE_MAX_ENTRIES")?,
        };

        if config.max_attempts == 0 {
            return Err("OVERPASS_MAX_ATTEMPTS must be at least 1".to_string());
        }

        Ok(config)
    }
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        dotenv::dotenv().ok();

        let overpass_urls: Vec<String> = env::var("OVERPASS_URL")
            .unwrap_or_else(|_| DEFAULT_OVERPASS_URL.to_string())
            .split(',')
            .map(|s| s.trim().trim_end_matches('/').to_string())
            .filter(|s| !s.is_empty())
            .collect();

        if overpass_urls.is_empty() {
            return Err("OVERPASS_URL must contain at least one endpoint".to_string());
        }

        Ok(Config {
            host: env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| DEFAULT_PORT.to_string())
                .parse()
                .map_err(|_| "Invalid PORT")?,
            overpass_urls,
            nominatim_url: env::var("NOMINATIM_URL")
                .unwrap_or_else(|_| DEFAULT_NOMINATIM_URL.to_string()),
            brouter_url: env::var("BROUTER_URL")
                .unwrap_or_else(|_| DEFAULT_BROUTER_URL.to_string()),
            brouter_web_url: env::var("BROUTER_WEB_URL")
                .unwrap_or_else(|_| DEFAULT_BROUTER_WEB_URL.to_string()),
            user_agent: env::var("HTTP_USER_AGENT")
                .unwrap_or_else(|_| DEFAULT_USER_AGENT.to_string()),
            plan_timeout_secs: env::var("PLAN_TIMEOUT_SECS")
                .unwrap_or_else(|_| "600".to_string())
                .parse()
                .map_err(|_| "Invalid PLAN_TIMEOUT_SECS")?,
            camping: CampingConfig::from_env()?,
            overpass: OverpassConfig::from_env()?,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
