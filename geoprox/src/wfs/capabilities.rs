//! GetCapabilities layer discovery.

use super::request::{with_query, WFS_VERSION};
use super::{AsyncHttpClient, WfsError};
use reqwest::Url;
use roxmltree::Document;
use tracing::{debug, info};

/// Builds the GetCapabilities URL for a server.
pub fn capabilities_url(base: &str) -> Result<Url, WfsError> {
    with_query(
        base,
        &[
            ("service", "WFS".to_string()),
            ("version", WFS_VERSION.to_string()),
            ("request", "GetCapabilities".to_string()),
        ],
    )
}

/// Extracts the advertised feature type names from a capabilities document.
pub fn parse_layers(body: &str) -> Result<Vec<String>, WfsError> {
    let doc = Document::parse(body).map_err(|e| WfsError::Parse {
        message: e.to_string(),
        raw: body.to_string(),
    })?;

    if let Some(text) = doc
        .descendants()
        .find(|n| n.is_element() && n.tag_name().name() == "ExceptionText")
        .and_then(|n| n.text())
    {
        return Err(WfsError::Exception {
            message: text.trim().to_string(),
            raw: body.to_string(),
        });
    }

    Ok(doc
        .descendants()
        .filter(|n| n.is_element() && n.tag_name().name() == "FeatureType")
        .filter_map(|feature_type| {
            feature_type
                .children()
                .find(|c| c.is_element() && c.tag_name().name() == "Name")
                .and_then(|name| name.text())
                .map(|name| name.trim().to_string())
        })
        .filter(|name| !name.is_empty())
        .collect())
}

/// Fetches the layer names a WFS server offers.
pub async fn fetch_layers<C: AsyncHttpClient>(client: &C, base: &str) -> Result<Vec<String>, WfsError> {
    let url = capabilities_url(base)?;
    debug!(url = %url, "Requesting capabilities");

    let response = client.get(url.as_str()).await?;
    if !response.is_success() {
        let message = crate::decode::exception_text(&response.body)
            .unwrap_or_else(|| format!("HTTP {}", response.status));
        return Err(WfsError::Status {
            status: response.status,
            message,
            raw: response.body,
        });
    }

    let layers = parse_layers(&response.body)?;
    if layers.is_empty() {
        return Err(WfsError::NoLayers);
    }

    info!(server = base, layers = layers.len(), "Loaded layer list");
    Ok(layers)
}
