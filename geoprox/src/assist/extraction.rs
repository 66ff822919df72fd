//! Free-text instruction to search parameters.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::client::ChatClient;
use super::json;
use super::prompts::extraction_prompt;
use super::AssistError;
use crate::config::{find_server, ServerConfig};
use crate::coord::Coordinate;
use crate::search::SearchRequest;
use crate::wfs::AsyncHttpClient;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawExtraction {
    coordinates: Vec<f64>,
    max_search_distance: f64,
    layer_name: String,
    server_url: String,
    #[serde(default)]
    reasoning: Option<String>,
}

/// Search parameters read from a model answer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractedParameters {
    pub reference: Coordinate,
    pub max_distance_m: f64,
    pub layer: String,
    pub server_url: String,
    pub reasoning: Option<String>,
}

impl ExtractedParameters {
    /// Builds a search request against the matching configured server.
    pub fn into_request(
        self,
        servers: &[ServerConfig],
        page_size: usize,
    ) -> Result<SearchRequest, AssistError> {
        let server = find_server(servers, &self.server_url).ok_or_else(|| {
            AssistError::AiResponseShape(format!("unknown server '{}'", self.server_url))
        })?;

        Ok(
            SearchRequest::new(server.url.clone(), self.layer, self.reference, server.dialect)
                .with_max_distance(self.max_distance_m)
                .with_page_size(page_size)
                .with_output_format(server.output_format.clone()),
        )
    }
}

/// Parses and validates a model answer.
pub fn parse_extraction(content: &str) -> Result<ExtractedParameters, AssistError> {
    let cleaned = json::clean(content);
    let raw: RawExtraction = serde_json::from_str(&cleaned)
        .map_err(|e| AssistError::AiResponseShape(format!("invalid parameters: {}", e)))?;

    let reference = match raw.coordinates.as_slice() {
        [lon, lat] => Coordinate::new(*lon, *lat),
        other => {
            return Err(AssistError::AiResponseShape(format!(
                "coordinates must be [lon, lat], got {} values",
                other.len()
            )))
        }
    };
    reference
        .validate()
        .map_err(|e| AssistError::AiResponseShape(e.to_string()))?;

    if !raw.max_search_distance.is_finite() || raw.max_search_distance <= 0.0 {
        return Err(AssistError::AiResponseShape(format!(
            "maxSearchDistance must be positive, got {}",
            raw.max_search_distance
        )));
    }
    if raw.layer_name.trim().is_empty() {
        return Err(AssistError::AiResponseShape("layerName is empty".to_string()));
    }

    Ok(ExtractedParameters {
        reference,
        max_distance_m: raw.max_search_distance,
        layer: raw.layer_name.trim().to_string(),
        server_url: raw.server_url.trim().to_string(),
        reasoning: raw.reasoning.filter(|r| !r.trim().is_empty()),
    })
}

/// Asks the model to read search parameters out of `instruction`.
pub async fn extract_parameters<C: AsyncHttpClient>(
    client: &ChatClient<C>,
    instruction: &str,
    servers: &[ServerConfig],
) -> Result<ExtractedParameters, AssistError> {
    let prompt = extraction_prompt(instruction, servers);
    debug!(servers = servers.len(), "Requesting parameter extraction");

    let content = client
        .complete(&prompt, client.config().extraction_max_tokens())
        .await?;
    let params = parse_extraction(&content)?;

    info!(
        lon = params.reference.lon,
        lat = params.reference.lat,
        distance_m = params.max_distance_m,
        layer = %params.layer,
        server = %params.server_url,
        "Parameters extracted"
    );
    Ok(params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assist::AssistConfig;
    use crate::config::builtin_servers;
    use crate::dialect::ServerDialect;
    use crate::wfs::MockAsyncHttpClient;
    use std::sync::Arc;

    const ANSWER: &str = r#"{
        "coordinates": [13.8713, 51.0036],
        "maxSearchDistance": 2000,
        "layerName": "tn-ra:RailwayStationNode",
        "serverUrl": "https://sgx.geodatenzentrum.de/wfs_dlm250_inspire/",
        "reasoning": "Railway stations live in the DLM250"
    }"#;

    #[test]
    fn test_parse_and_convert() {
        let params = parse_extraction(ANSWER).unwrap();
        assert_eq!(params.reference, Coordinate::new(13.8713, 51.0036));
        assert_eq!(params.max_distance_m, 2000.0);

        let request = params.into_request(&builtin_servers(), 500).unwrap();
        assert_eq!(request.server_url, "https://sgx.geodatenzentrum.de/wfs_dlm250_inspire");
        assert_eq!(request.dialect, ServerDialect::InspireGml);
        assert_eq!(request.layer, "tn-ra:RailwayStationNode");
        assert_eq!(request.page_size, 500);
    }

    #[test]
    fn test_unknown_server() {
        let answer = ANSWER.replace(
            "https://sgx.geodatenzentrum.de/wfs_dlm250_inspire/",
            "https://example.org/wfs",
        );
        let params = parse_extraction(&answer).unwrap();
        assert!(matches!(
            params.into_request(&builtin_servers(), 500),
            Err(AssistError::AiResponseShape(_))
        ));
    }

    #[test]
    fn test_rejects_three_coordinates() {
        let answer = ANSWER.replace("[13.8713, 51.0036]", "[13.8713, 51.0036, 120.0]");
        assert!(parse_extraction(&answer).is_err());
    }

    #[test]
    fn test_rejects_out_of_range_latitude() {
        let answer = ANSWER.replace("[13.8713, 51.0036]", "[13.8713, 151.0]");
        assert!(parse_extraction(&answer).is_err());
    }

    #[test]
    fn test_rejects_zero_distance() {
        let answer = ANSWER.replace("2000", "0");
        assert!(parse_extraction(&answer).is_err());
    }

    #[test]
    fn test_reasoning_optional() {
        let answer = r#"```json
{"coordinates": [9.99, 53.55], "maxSearchDistance": 500.5, "layerName": "dlmlpz250:TN_Hafen", "serverUrl": "dlm250"}
```"#;
        let params = parse_extraction(answer).unwrap();
        assert!(params.reasoning.is_none());
        assert_eq!(params.max_distance_m, 500.5);
        assert!(params.into_request(&builtin_servers(), 1000).is_ok());
    }

    #[tokio::test]
    async fn test_extract_parameters_round_trip() {
        let mock = MockAsyncHttpClient::new();
        let content = serde_json::to_string(ANSWER).unwrap();
        mock.push_ok(
            "application/json",
            &format!(r#"{{"choices":[{{"message":{{"content":{}}}}}]}}"#, content),
        );
        let client = ChatClient::new(
            Arc::new(mock.clone()),
            AssistConfig::new().with_api_key(Some("sk-test".to_string())),
        )
        .unwrap();

        let params = extract_parameters(&client, "Nearest station to Dresden-Cotta", &builtin_servers())
            .await
            .unwrap();
        assert_eq!(params.layer, "tn-ra:RailwayStationNode");

        let body: serde_json::Value =
            serde_json::from_str(mock.requests()[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(body["max_tokens"], 500);
    }
}
