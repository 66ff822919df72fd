//! GetFeature request construction.

use super::WfsError;
use crate::coord::BoundingBox;
use reqwest::Url;

/// Protocol version sent with every request.
pub const WFS_VERSION: &str = "2.0.0";

/// Coordinate reference system requested and used for bbox filters.
pub const WFS_SRS: &str = "EPSG:4326";

/// Parameters of one GetFeature page.
#[derive(Debug, Clone, PartialEq)]
pub struct GetFeature<'a> {
    pub layer: &'a str,
    pub count: usize,
    pub start_index: usize,
    /// Spatial filter, omitted for servers that mishandle it
    pub bbox: Option<BoundingBox>,
    pub output_format: &'a str,
}

/// Builds the GetFeature URL for one page.
///
/// Query parameters already present on `base` are kept unless they are
/// overridden by a WFS parameter (compared case-insensitively).
pub fn get_feature_url(base: &str, params: &GetFeature<'_>) -> Result<Url, WfsError> {
    let mut pairs = vec![
        ("service", "WFS".to_string()),
        ("version", WFS_VERSION.to_string()),
        ("request", "GetFeature".to_string()),
        ("typeNames", params.layer.to_string()),
        ("srsName", WFS_SRS.to_string()),
        ("count", params.count.to_string()),
        ("startIndex", params.start_index.to_string()),
    ];
    if let Some(bbox) = &params.bbox {
        pairs.push(("bbox", bbox.to_wfs_param(WFS_SRS)));
    }
    pairs.push(("outputFormat", params.output_format.to_string()));

    with_query(base, &pairs)
}

/// Replaces or appends query parameters on `base`.
pub(super) fn with_query(base: &str, params: &[(&str, String)]) -> Result<Url, WfsError> {
    let mut url = Url::parse(base.trim()).map_err(|e| WfsError::InvalidUrl {
        url: base.to_string(),
        message: e.to_string(),
    })?;

    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| !params.iter().any(|(name, _)| name.eq_ignore_ascii_case(key)))
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    {
        let mut query = url.query_pairs_mut();
        query.clear();
        for (key, value) in &kept {
            query.append_pair(key, value);
        }
        for (key, value) in params {
            query.append_pair(key, value);
        }
    }

    Ok(url)
}
