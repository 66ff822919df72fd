//! Search request, progress and result types.

use super::error::SearchError;
use super::settings::{DEFAULT_MAX_DISTANCE_M, DEFAULT_PAGE_SIZE};
use crate::coord::Coordinate;
use crate::dialect::ServerDialect;
use crate::distance;
use crate::geometry::{Feature, GeometryKind};
use crate::naming::resolve_name;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Parameters of one distance search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchRequest {
    /// WFS endpoint, optionally with extra query parameters
    pub server_url: String,
    /// Feature type name (`typeNames`)
    pub layer: String,
    /// Reference point
    pub reference: Coordinate,
    /// Features farther away than this are discarded
    pub max_distance_m: f64,
    /// Features requested per page
    pub page_size: usize,
    pub dialect: ServerDialect,
    /// `outputFormat` override for GML servers
    pub output_format: Option<String>,
}

impl SearchRequest {
    pub fn new(
        server_url: impl Into<String>,
        layer: impl Into<String>,
        reference: Coordinate,
        dialect: ServerDialect,
    ) -> Self {
        Self {
            server_url: server_url.into(),
            layer: layer.into(),
            reference,
            max_distance_m: DEFAULT_MAX_DISTANCE_M,
            page_size: DEFAULT_PAGE_SIZE,
            dialect,
            output_format: None,
        }
    }

    pub fn with_max_distance(mut self, metres: f64) -> Self {
        self.max_distance_m = metres;
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_output_format(mut self, format: Option<String>) -> Self {
        self.output_format = format;
        self
    }

    /// Checks the request before anything is sent.
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.server_url.trim().is_empty() {
            return Err(SearchError::InvalidRequest("server URL is empty".to_string()));
        }
        if self.layer.trim().is_empty() {
            return Err(SearchError::InvalidRequest("layer name is empty".to_string()));
        }
        self.reference
            .validate()
            .map_err(|e| SearchError::InvalidRequest(e.to_string()))?;
        if !self.max_distance_m.is_finite() || self.max_distance_m <= 0.0 {
            return Err(SearchError::InvalidRequest(format!(
                "search distance must be positive, got {}",
                self.max_distance_m
            )));
        }
        if self.page_size == 0 {
            return Err(SearchError::InvalidRequest(
                "page size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// A feature that passed scoring.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredFeature {
    pub feature: Feature,
    pub distance_m: f64,
    pub is_containing: bool,
    pub display_name: String,
    pub geometry_type: GeometryKind,
}

impl ScoredFeature {
    /// Scores a feature against `reference`; `None` without geometry.
    pub fn score(reference: &Coordinate, feature: Feature) -> Option<Self> {
        let score = distance::score(reference, &feature)?;
        Some(Self {
            display_name: resolve_name(&feature.properties),
            geometry_type: feature.geometry_kind(),
            distance_m: score.distance_m,
            is_containing: score.is_containing,
            feature,
        })
    }
}

/// Snapshot emitted after every page.
///
/// Features are shared with the running search, so a snapshot costs one
/// pointer per accepted feature.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchProgress {
    /// Every accepted feature so far, in arrival order
    pub features: Vec<Arc<ScoredFeature>>,
    /// Features delivered by the server so far, accepted or not
    pub total_seen: usize,
    pub containing: usize,
    pub nearby: usize,
    /// 1-based number of the page just processed
    pub page: usize,
    /// Features the server delivered on that page
    pub page_features: usize,
    /// Raw payload of a first page that held no geometry at all
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_page_raw: Option<String>,
}

impl SearchProgress {
    pub fn snapshot(
        features: &[Arc<ScoredFeature>],
        total_seen: usize,
        page: usize,
        page_features: usize,
    ) -> Self {
        let containing = features.iter().filter(|f| f.is_containing).count();
        Self {
            features: features.to_vec(),
            total_seen,
            containing,
            nearby: features.len() - containing,
            page,
            page_features,
            empty_page_raw: None,
        }
    }
}

/// Final, deduplicated and ordered search result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub reference: Coordinate,
    pub max_distance_m: f64,
    pub layer: String,
    /// Containing features first, then by ascending distance
    pub features: Vec<ScoredFeature>,
    pub total_seen: usize,
    pub containing: usize,
    pub nearby: usize,
    pub pages: usize,
}

impl SearchResult {
    /// Distance of the closest feature, 0 when one contains the point.
    pub fn closest_distance_m(&self) -> Option<f64> {
        self.features
            .iter()
            .map(|f| f.distance_m)
            .reduce(f64::min)
    }
}

/// How a search that ran to the end turned out.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SearchOutcome {
    Completed(SearchResult),
    /// Every page was read but nothing lies within the search distance
    NoFeaturesInRange { total_seen: usize, max_distance_m: f64 },
}

impl SearchOutcome {
    pub fn result(&self) -> Option<&SearchResult> {
        match self {
            SearchOutcome::Completed(result) => Some(result),
            SearchOutcome::NoFeaturesInRange { .. } => None,
        }
    }
}

/// Lifecycle of a search task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SearchState {
    #[default]
    Idle,
    FetchingPage {
        page: usize,
    },
    Aggregating,
    Completed,
    Failed,
    Cancelled,
}

impl SearchState {
    pub fn is_running(&self) -> bool {
        matches!(self, SearchState::FetchingPage { .. } | SearchState::Aggregating)
    }
}

impl fmt::Display for SearchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchState::Idle => write!(f, "idle"),
            SearchState::FetchingPage { page } => write!(f, "fetching page {}", page),
            SearchState::Aggregating => write!(f, "aggregating"),
            SearchState::Completed => write!(f, "completed"),
            SearchState::Failed => write!(f, "failed"),
            SearchState::Cancelled => write!(f, "cancelled"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Geometry, Properties};

    fn request() -> SearchRequest {
        SearchRequest::new(
            "https://example.org/wfs",
            "app:areas",
            Coordinate::new(13.8713, 51.0036),
            ServerDialect::GeoJson,
        )
    }

    #[test]
    fn test_request_defaults() {
        let request = request();
        assert_eq!(request.max_distance_m, DEFAULT_MAX_DISTANCE_M);
        assert_eq!(request.page_size, DEFAULT_PAGE_SIZE);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_request_validation() {
        assert!(request().with_max_distance(0.0).validate().is_err());
        assert!(request().with_max_distance(f64::NAN).validate().is_err());
        assert!(request().with_page_size(0).validate().is_err());

        let mut bad = request();
        bad.reference = Coordinate::new(13.0, 91.0);
        assert!(matches!(bad.validate(), Err(SearchError::InvalidRequest(_))));

        let mut bad = request();
        bad.layer = " ".to_string();
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_scored_feature() {
        let properties: Properties = [("NAME", "Bahnhof X")].into_iter().collect();
        let feature = Feature::new(
            Some(Geometry::Point(Coordinate::new(13.8713, 51.0108))),
            properties,
            ServerDialect::GeoJson,
        );
        let scored = ScoredFeature::score(&Coordinate::new(13.8713, 51.0036), feature).unwrap();
        assert_eq!(scored.display_name, "Bahnhof X");
        assert_eq!(scored.geometry_type, GeometryKind::Point);
        assert!(!scored.is_containing);
        assert!((scored.distance_m - 800.6).abs() < 2.0);
    }

    #[test]
    fn test_snapshot_counters() {
        let properties = Properties::new();
        let inside = ScoredFeature {
            feature: Feature::new(None, properties.clone(), ServerDialect::GeoJson),
            distance_m: 0.0,
            is_containing: true,
            display_name: "A".to_string(),
            geometry_type: GeometryKind::Polygon,
        };
        let near = ScoredFeature {
            is_containing: false,
            distance_m: 12.0,
            ..inside.clone()
        };
        let progress = SearchProgress::snapshot(&[Arc::new(inside), Arc::new(near)], 7, 2, 3);
        assert_eq!(progress.containing, 1);
        assert_eq!(progress.nearby, 1);
        assert_eq!(progress.total_seen, 7);
        assert_eq!(progress.page, 2);
    }

    #[test]
    fn test_state_display() {
        assert_eq!(SearchState::FetchingPage { page: 3 }.to_string(), "fetching page 3");
        assert!(SearchState::Aggregating.is_running());
        assert!(!SearchState::Completed.is_running());
    }
}
