//! Rule assessment of a finished search.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::client::ChatClient;
use super::json;
use super::prompts::compliance_prompt;
use super::AssistError;
use crate::search::SearchResult;
use crate::wfs::AsyncHttpClient;

/// Features listed individually in a [`ComplianceSummary`].
pub const MAX_FEATURE_DETAILS: usize = 10;

/// Condensed search result handed to the model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComplianceSummary {
    /// Reference point as `[lon, lat]`
    pub coordinates: [f64; 2],
    pub max_search_distance: f64,
    pub layer_type: String,
    pub total_features_found: usize,
    pub containing_features: usize,
    pub nearby_features: usize,
    pub closest_distance: Option<f64>,
    pub features_details: Vec<FeatureDetail>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureDetail {
    pub name: String,
    pub distance: f64,
    pub is_containing: bool,
    pub geometry_type: String,
}

impl ComplianceSummary {
    /// Summarises `result`, listing its first [`MAX_FEATURE_DETAILS`] features.
    pub fn from_result(result: &SearchResult) -> Self {
        Self {
            coordinates: result.reference.into(),
            max_search_distance: result.max_distance_m,
            layer_type: result.layer.clone(),
            total_features_found: result.features.len(),
            containing_features: result.containing,
            nearby_features: result.nearby,
            closest_distance: result.closest_distance_m(),
            features_details: result
                .features
                .iter()
                .take(MAX_FEATURE_DETAILS)
                .map(|f| FeatureDetail {
                    name: f.display_name.clone(),
                    distance: f.distance_m,
                    is_containing: f.is_containing,
                    geometry_type: f.geometry_type.as_str().to_string(),
                })
                .collect(),
        }
    }
}

/// Verdict of an assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComplianceStatus {
    #[serde(rename = "FULFILLED", alias = "ERFÜLLT")]
    Fulfilled,
    #[serde(rename = "VIOLATED", alias = "VERLETZT")]
    Violated,
    #[serde(rename = "PARTIALLY_FULFILLED", alias = "TEILWEISE_ERFÜLLT")]
    PartiallyFulfilled,
}

impl std::fmt::Display for ComplianceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ComplianceStatus::Fulfilled => write!(f, "fulfilled"),
            ComplianceStatus::Violated => write!(f, "violated"),
            ComplianceStatus::PartiallyFulfilled => write!(f, "partially fulfilled"),
        }
    }
}

/// The model's assessment of a search result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceAssessment {
    pub compliant: bool,
    pub status: ComplianceStatus,
    /// 0.0 to 1.0
    pub confidence: f64,
    pub reasoning: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub recommendations: String,
    #[serde(default)]
    pub key_findings: Vec<String>,
}

fn nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Parses a model answer into an assessment.
pub fn parse_assessment(content: &str) -> Result<ComplianceAssessment, AssistError> {
    let cleaned = json::clean(content);
    let assessment: ComplianceAssessment = serde_json::from_str(&cleaned)
        .map_err(|e| AssistError::AiResponseShape(format!("invalid assessment: {}", e)))?;

    if !(0.0..=1.0).contains(&assessment.confidence) {
        return Err(AssistError::AiResponseShape(format!(
            "confidence {} is outside 0..=1",
            assessment.confidence
        )));
    }
    Ok(assessment)
}

/// Asks the model whether `summary` satisfies `rule`.
pub async fn check_compliance<C: AsyncHttpClient>(
    client: &ChatClient<C>,
    rule: &str,
    summary: &ComplianceSummary,
) -> Result<ComplianceAssessment, AssistError> {
    let prompt = compliance_prompt(rule, summary);
    debug!(layer = %summary.layer_type, features = summary.total_features_found, "Requesting compliance assessment");

    let content = client
        .complete(&prompt, client.config().compliance_max_tokens())
        .await?;
    let assessment = parse_assessment(&content)?;

    info!(
        status = %assessment.status,
        confidence = assessment.confidence,
        "Compliance assessment received"
    );
    Ok(assessment)
}
