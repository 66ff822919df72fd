//! Terminal rendering of search progress, results and assessments.

use geoprox::assist::ComplianceAssessment;
use geoprox::search::{aggregate, ScoredFeature, SearchProgress, SearchResult};
use std::fmt::Write;

/// Features listed under each progress line.
pub const PROGRESS_TOP: usize = 5;

/// Widest name column before truncation.
const NAME_WIDTH: usize = 40;

/// Human readable distance.
pub fn format_distance(metres: f64) -> String {
    if metres >= 1000.0 {
        format!("{:.2} km", metres / 1000.0)
    } else {
        format!("{:.0} m", metres)
    }
}

fn status(feature: &ScoredFeature) -> &'static str {
    if feature.is_containing {
        "inside"
    } else {
        "nearby"
    }
}

fn truncate(name: &str, width: usize) -> String {
    if name.chars().count() <= width {
        name.to_string()
    } else {
        let mut short: String = name.chars().take(width.saturating_sub(1)).collect();
        short.push('…');
        short
    }
}

/// Progress line plus the closest features found so far.
pub fn progress_text(progress: &SearchProgress) -> String {
    let mut out = format!(
        "Page {}: {} features read, {} in range ({} containing)\n",
        progress.page,
        progress.total_seen,
        progress.features.len(),
        progress.containing
    );
    for feature in aggregate::top(&progress.features, PROGRESS_TOP) {
        let _ = writeln!(
            out,
            "  {:<width$} {:>10}  {}",
            truncate(&feature.display_name, NAME_WIDTH),
            format_distance(feature.distance_m),
            status(&feature),
            width = NAME_WIDTH
        );
    }
    out
}

/// Final result table.
pub fn result_table(result: &SearchResult) -> String {
    let mut out = format!(
        "{} features in {} within {} of {} ({} read, {} pages)\n\n",
        result.features.len(),
        result.layer,
        format_distance(result.max_distance_m),
        result.reference,
        result.total_seen,
        result.pages
    );
    let _ = writeln!(
        out,
        "{:<width$} {:<16} {:>10}  STATUS",
        "NAME",
        "TYPE",
        "DISTANCE",
        width = NAME_WIDTH
    );
    for feature in &result.features {
        let _ = writeln!(
            out,
            "{:<width$} {:<16} {:>10}  {}",
            truncate(&feature.display_name, NAME_WIDTH),
            feature.geometry_type.as_str(),
            format_distance(feature.distance_m),
            status(feature),
            width = NAME_WIDTH
        );
    }
    let _ = write!(
        out,
        "\n{} containing, {} nearby",
        result.containing, result.nearby
    );
    if let Some(closest) = result.closest_distance_m() {
        let _ = write!(out, ", closest {}", format_distance(closest));
    }
    out.push('\n');
    out
}

/// Compliance verdict block.
pub fn assessment_text(rule: &str, assessment: &ComplianceAssessment) -> String {
    let mut out = format!(
        "Rule: {}\nVerdict: {} ({}compliant, confidence {:.0}%)\n\n{}\n",
        rule,
        assessment.status,
        if assessment.compliant { "" } else { "not " },
        assessment.confidence * 100.0,
        assessment.reasoning.trim()
    );
    if !assessment.key_findings.is_empty() {
        out.push_str("\nKey findings:\n");
        for finding in &assessment.key_findings {
            let _ = writeln!(out, "  - {}", finding);
        }
    }
    if !assessment.recommendations.trim().is_empty() {
        let _ = write!(out, "\nRecommendations: {}\n", assessment.recommendations.trim());
    }
    out
}
