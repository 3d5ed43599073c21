use crate::error::Result;
use crate::models::{BoundingBox, Feature};
use async_trait::async_trait;
use std::fmt;

/// The three feature families the camp planner asks about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureQuery {
    /// Shelters, huts, picnic sites, viewpoints, campsites, springs, firepits (points)
    CampSpots,
    /// Cities, towns and villages (points)
    Settlements,
    /// Wood and forest ways with full geometry
    Forests,
}

impl fmt::Display for FeatureQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FeatureQuery::CampSpots => "camp spot",
            FeatureQuery::Settlements => "settlement",
            FeatureQuery::Forests => "forest",
        };
        write!(f, "{}", s)
    }
}

/// Anything that can answer "which tagged features lie in this box".
///
/// The camp planner depends only on this trait; the Overpass client is the
/// production implementation and tests substitute canned responses.
#[async_trait]
pub trait FeatureSource: Send + Sync {
    async fn query(&self, query: FeatureQuery, bbox: &BoundingBox) -> Result<Vec<Feature>>;

    fn source_name(&self) -> &'static str;
}
