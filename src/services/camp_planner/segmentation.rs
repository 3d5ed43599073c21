use crate::config::CampingConfig;
use crate::error::{AppError, Result};
use crate::models::trip::validate_daily_distance;
use crate::models::{DayTarget, Polyline};

/// A route cut into riding days.
#[derive(Debug, Clone)]
pub struct Segmentation {
    pub cumulative_km: Vec<f64>,
    pub total_km: f64,
    /// Day count from the distance rule alone, before any target is dropped
    pub estimated_days: u32,
    pub targets: Vec<DayTarget>,
}

impl Segmentation {
    /// Days actually ridden: one per surviving target plus the final leg.
    pub fn planned_days(&self) -> u32 {
        self.targets.len() as u32 + 1
    }
}

/// `max(1, floor(total / daily))`, plus one when the leftover exceeds
/// `extra_day_fraction` of a day.
pub fn count_days(total_km: f64, daily_km: f64, extra_day_fraction: f64) -> u32 {
    let full_days = (total_km / daily_km).floor() as u32;
    let mut days = full_days.max(1);

    if total_km % daily_km > daily_km * extra_day_fraction {
        days += 1;
    }

    days
}

/// Split `route` into day-end targets every `daily_km` along the path.
///
/// Targets within `destination_buffer_km` of the end are dropped, since the
/// rider continues to the destination that day. Targets only grow, so the
/// first one inside the buffer ends the walk.
pub fn segment_route(
    route: &Polyline,
    daily_km: f64,
    config: &CampingConfig,
) -> Result<Segmentation> {
    validate_daily_distance(daily_km).map_err(AppError::Validation)?;

    let cumulative_km = route.cumulative_distances();
    let total_km = cumulative_km.last().copied().unwrap_or(0.0);
    let estimated_days = count_days(total_km, daily_km, config.extra_day_fraction);

    let mut targets = Vec::new();
    for day in 1..estimated_days {
        let target_km = day as f64 * daily_km;

        if target_km >= total_km - config.destination_buffer_km {
            tracing::debug!(
                day = day,
                target_km = target_km,
                "Stopping at day {} target {:.1} km, within {} km of the destination",
                day,
                target_km,
                config.destination_buffer_km
            );
            break;
        }

        targets.push(DayTarget {
            day,
            target_km,
            point: route.interpolate(&cumulative_km, target_km),
        });
    }

    Ok(Segmentation {
        cumulative_km,
        total_km,
        estimated_days,
        targets,
    })
}
