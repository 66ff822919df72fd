//! Prompt texts sent to the language model.

use std::fmt::Write;

use super::compliance::ComplianceSummary;
use crate::config::ServerConfig;
use crate::coord::Coordinate;

/// Prompt asking the model to turn `instruction` into search parameters
/// for one of `servers`.
pub fn extraction_prompt(instruction: &str, servers: &[ServerConfig]) -> String {
    let mut catalogue = String::new();
    for server in servers {
        let _ = writeln!(catalogue, "* {} ({})", server.label, server.url);
        for layer in &server.layers {
            let _ = writeln!(catalogue, "  - layer \"{}\"", layer);
        }
    }

    format!(
        r#"You are a GIS expert familiar with OGC web feature services. Extract the parameters of a WFS distance search from the user instruction below.

AVAILABLE SERVERS AND LAYERS:
{catalogue}
LAYER SELECTION RULES:
- Railway stations, trains, rail transport: "tn-ra:RailwayStationNode"
- Ports, harbours, shipping: "dlmlpz250:TN_Hafen"
- Roads, motorways, federal roads: "dlmlpz250:TN_Strasse"
- Nature reserves and environmental protection: "bfn_sch_Schutzgebiet:Naturschutzgebiete"
- Municipalities and administrative boundaries: "vg250:vg250_gem"
- When unsure, prefer the landscape model for infrastructure, the protected areas for nature and the administrative areas for boundaries.

TECHNICAL RULES:
- Take coordinates from GeoJSON Point objects or latitude/longitude statements.
- Convert distances to metres (1 km = 1000 m).
- Use the technical layer names exactly as listed above.
- serverUrl must be one of the server URLs listed above.

User instruction: "{instruction}"

Answer with a single JSON object and nothing else:
{{
    "coordinates": [longitude, latitude],
    "maxSearchDistance": distance_in_metres,
    "layerName": "technical_layer_name",
    "serverUrl": "server_url",
    "reasoning": "short explanation"
}}"#
    )
}

/// Prompt asking the model to judge `summary` against `rule`.
pub fn compliance_prompt(rule: &str, summary: &ComplianceSummary) -> String {
    let [lon, lat] = summary.coordinates;
    let position = Coordinate::new(lon, lat);
    let closest = summary
        .closest_distance
        .map(|d| format!("{:.2} m", d))
        .unwrap_or_else(|| "n/a".to_string());

    let mut details = String::new();
    for feature in &summary.features_details {
        let _ = writeln!(
            details,
            "- {} ({}): {:.2} m ({})",
            feature.name,
            feature.geometry_type,
            feature.distance,
            if feature.is_containing { "containing" } else { "nearby" }
        );
    }
    if details.is_empty() {
        details.push_str("- none\n");
    }

    format!(
        r#"You are an expert in GIS compliance and spatial analysis. Assess the measurement results below against the given rule.

RULE:
"{rule}"

MEASUREMENT RESULTS:
- Object coordinates: {position}
- Layer: {layer}
- Maximum search distance: {max_distance} m
- Features found: {total}
- Containing features: {containing}
- Nearby features: {nearby}
- Closest distance: {closest}

FEATURE DETAILS (first {shown}):
{details}
Answer with a single JSON object and nothing else:
{{
    "compliant": true_or_false,
    "status": "FULFILLED" | "VIOLATED" | "PARTIALLY_FULFILLED",
    "confidence": number_between_0_and_1,
    "reasoning": "detailed justification",
    "recommendations": "recommendations if not compliant",
    "key_findings": ["most important findings"]
}}

ASSESSMENT RULES:
- FULFILLED: the rule is fully met.
- VIOLATED: the rule is clearly broken.
- PARTIALLY_FULFILLED: borderline case or only partly met.
- confidence states how certain the assessment is (0.0 to 1.0).
- Consider containing features (distance 0 m) as well as nearby ones."#,
        layer = summary.layer_type,
        max_distance = summary.max_search_distance,
        total = summary.total_features_found,
        containing = summary.containing_features,
        nearby = summary.nearby_features,
        shown = summary.features_details.len(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assist::FeatureDetail;
    use crate::config::builtin_servers;

    #[test]
    fn test_extraction_prompt_lists_servers() {
        let prompt = extraction_prompt("Station near 51.0, 13.8 within 2 km", &builtin_servers());
        assert!(prompt.contains("https://sgx.geodatenzentrum.de/wfs_vg250"));
        assert!(prompt.contains("\"tn-ra:RailwayStationNode\""));
        assert!(prompt.contains("User instruction: \"Station near 51.0, 13.8 within 2 km\""));
        assert!(prompt.contains("\"maxSearchDistance\""));
    }

    #[test]
    fn test_compliance_prompt_details() {
        let summary = ComplianceSummary {
            coordinates: [13.8713, 51.0036],
            max_search_distance: 1000.0,
            layer_type: "vg250:vg250_gem".to_string(),
            total_features_found: 12,
            containing_features: 1,
            nearby_features: 1,
            closest_distance: Some(0.0),
            features_details: vec![
                FeatureDetail {
                    name: "Dresden".to_string(),
                    distance: 0.0,
                    is_containing: true,
                    geometry_type: "MultiPolygon".to_string(),
                },
                FeatureDetail {
                    name: "Freital".to_string(),
                    distance: 812.345,
                    is_containing: false,
                    geometry_type: "Polygon".to_string(),
                },
            ],
        };

        let prompt = compliance_prompt("Must lie within a municipality", &summary);
        assert!(prompt.contains("51.003600°N, 13.871300°E"));
        assert!(prompt.contains("Closest distance: 0.00 m"));
        assert!(prompt.contains("- Dresden (MultiPolygon): 0.00 m (containing)"));
        assert!(prompt.contains("- Freital (Polygon): 812.35 m (nearby)"));
        assert!(prompt.contains("FEATURE DETAILS (first 2)"));
    }

    #[test]
    fn test_compliance_prompt_without_features() {
        let summary = ComplianceSummary {
            coordinates: [13.0, 51.0],
            max_search_distance: 500.0,
            layer_type: "tn-ra:RailwayStationNode".to_string(),
            total_features_found: 0,
            containing_features: 0,
            nearby_features: 0,
            closest_distance: None,
            features_details: Vec::new(),
        };
        let prompt = compliance_prompt("Station within 500 m", &summary);
        assert!(prompt.contains("Closest distance: n/a"));
        assert!(prompt.contains("- none"));
    }
}
