use super::candidates::CandidateScorer;
use super::forest::ForestSelector;
use crate::constants::SETTLEMENT_BOX_PADDING_DEG;
use crate::models::{BoundingBox, CampSpot, DayTarget, Feature};
use crate::services::feature_source::{FeatureQuery, FeatureSource};
use async_trait::async_trait;
use std::sync::Arc;

/// Everything a resolver needs to know about one day.
#[derive(Debug, Clone)]
pub struct DayContext {
    pub target: DayTarget,
    pub radius_km: f64,
    pub bbox: BoundingBox,
}

impl DayContext {
    pub fn new(target: DayTarget, radius_km: f64) -> Self {
        DayContext {
            bbox: BoundingBox::around(&target.point, radius_km),
            target,
            radius_km,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Resolved(CampSpot),
    /// Nothing suitable; try the next resolver
    Next,
}

/// One step of the per-day fallback cascade.
///
/// Resolvers never fail: a query error is logged, recorded in `warnings`
/// and treated as "no features".
#[async_trait]
pub trait CampResolver: Send + Sync {
    fn name(&self) -> &'static str;

    async fn resolve(&self, ctx: &DayContext, warnings: &mut Vec<String>) -> Resolution;
}

/// Tagged shelters, huts, campsites and similar, away from settlements.
pub struct OfficialSiteResolver {
    source: Arc<dyn FeatureSource>,
    scorer: CandidateScorer,
}

impl OfficialSiteResolver {
    pub fn new(source: Arc<dyn FeatureSource>, scorer: CandidateScorer) -> Self {
        Self { source, scorer }
    }
}

#[async_trait]
impl CampResolver for OfficialSiteResolver {
    fn name(&self) -> &'static str {
        "official_site"
    }

    async fn resolve(&self, ctx: &DayContext, warnings: &mut Vec<String>) -> Resolution {
        let features = query_or_empty(
            self.source.as_ref(),
            FeatureQuery::CampSpots,
            &ctx.bbox,
            ctx.target.day,
            warnings,
        )
        .await;

        if !features.iter().any(|f| f.point().is_some()) {
            return Resolution::Next;
        }

        let settlements: Vec<_> = query_or_empty(
            self.source.as_ref(),
            FeatureQuery::Settlements,
            &ctx.bbox.padded(SETTLEMENT_BOX_PADDING_DEG),
            ctx.target.day,
            warnings,
        )
        .await
        .iter()
        .filter_map(Feature::point)
        .collect();

        let candidates = self
            .scorer
            .score(&ctx.target, ctx.radius_km, &features, &settlements);

        tracing::debug!(
            day = ctx.target.day,
            features = features.len(),
            settlements = settlements.len(),
            candidates = candidates.len(),
            "Day {}: {} of {} features survived filtering",
            ctx.target.day,
            candidates.len(),
            features.len()
        );

        match candidates.into_iter().next() {
            Some(best) => Resolution::Resolved(CampSpot::official(best)),
            None => Resolution::Next,
        }
    }
}

/// Centre of the largest qualifying forest near the target.
pub struct WildForestResolver {
    source: Arc<dyn FeatureSource>,
    selector: ForestSelector,
}

impl WildForestResolver {
    pub fn new(source: Arc<dyn FeatureSource>, selector: ForestSelector) -> Self {
        Self { source, selector }
    }
}

#[async_trait]
impl CampResolver for WildForestResolver {
    fn name(&self) -> &'static str {
        "wild_forest"
    }

    async fn resolve(&self, ctx: &DayContext, warnings: &mut Vec<String>) -> Resolution {
        let features = query_or_empty(
            self.source.as_ref(),
            FeatureQuery::Forests,
            &ctx.bbox,
            ctx.target.day,
            warnings,
        )
        .await;

        match self
            .selector
            .select(&ctx.target.point, ctx.radius_km, &features)
        {
            Some(forest) => Resolution::Resolved(CampSpot::wild_camp(&forest, &ctx.target.point)),
            None => Resolution::Next,
        }
    }
}

/// Terminal step of the cascade: mark the raw target for scouting.
pub fn scout_placeholder(target: &DayTarget) -> CampSpot {
    CampSpot::scout(target)
}

async fn query_or_empty(
    source: &dyn FeatureSource,
    kind: FeatureQuery,
    bbox: &BoundingBox,
    day: u32,
    warnings: &mut Vec<String>,
) -> Vec<Feature> {
    match source.query(kind, bbox).await {
        Ok(features) => features,
        Err(e) => {
            tracing::warn!(
                day = day,
                kind = %kind,
                error = %e,
                "Day {}: {} query failed, continuing without it",
                day,
                kind
            );
            warnings.push(format!("Day {}: {} query failed ({})", day, kind, e));
            Vec::new()
        }
    }
}
