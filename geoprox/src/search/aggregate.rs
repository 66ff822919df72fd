//! Ordering, deduplication and report assembly.

use super::types::{ScoredFeature, SearchRequest, SearchResult};
use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::Arc;

/// Containing features first, then ascending distance.
fn rank(a: &ScoredFeature, b: &ScoredFeature) -> Ordering {
    b.is_containing
        .cmp(&a.is_containing)
        .then_with(|| a.distance_m.total_cmp(&b.distance_m))
}

/// Sorts and deduplicates features by display name.
///
/// For every name only the closest occurrence survives; among equally
/// close ones the first seen wins. The output is ordered containing first,
/// then by ascending distance.
pub fn finalize(mut features: Vec<ScoredFeature>) -> Vec<ScoredFeature> {
    features.sort_by(rank);

    let mut seen = HashSet::new();
    features.retain(|f| seen.insert(f.display_name.clone()));
    features.sort_by(rank);
    features
}

/// Builds the final result from the accumulated features.
pub fn summarize(
    request: &SearchRequest,
    features: Vec<ScoredFeature>,
    total_seen: usize,
    pages: usize,
) -> SearchResult {
    let features = finalize(features);
    let containing = features.iter().filter(|f| f.is_containing).count();

    SearchResult {
        reference: request.reference,
        max_distance_m: request.max_distance_m,
        layer: request.layer.clone(),
        nearby: features.len() - containing,
        containing,
        features,
        total_seen,
        pages,
    }
}

/// The best `n` features of an intermediate snapshot.
pub fn top(features: &[Arc<ScoredFeature>], n: usize) -> Vec<Arc<ScoredFeature>> {
    let mut sorted = features.to_vec();
    sorted.sort_by(|a, b| rank(a, b));
    sorted.truncate(n);
    sorted
}
