//! WFS server registry entries.

use crate::dialect::ServerDialect;
use serde::Serialize;

/// One WFS server the CLI and the parameter extraction can target.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServerConfig {
    /// Short identifier, the `<id>` of a `[server.<id>]` section
    pub id: String,
    pub url: String,
    pub dialect: ServerDialect,
    /// `outputFormat` override for GML servers
    pub output_format: Option<String>,
    /// Human readable description
    pub label: String,
    /// Known feature types, offered to the parameter extraction
    pub layers: Vec<String>,
}

impl ServerConfig {
    pub fn new(id: impl Into<String>, url: impl Into<String>, dialect: ServerDialect) -> Self {
        let id = id.into();
        Self {
            label: id.clone(),
            id,
            url: url.into(),
            dialect,
            output_format: None,
            layers: Vec::new(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_output_format(mut self, format: impl Into<String>) -> Self {
        self.output_format = Some(format.into());
        self
    }

    pub fn with_layers<I, S>(mut self, layers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.layers = layers.into_iter().map(Into::into).collect();
        self
    }

    /// Compares URLs ignoring case and a trailing slash.
    pub fn matches_url(&self, url: &str) -> bool {
        normalize_url(&self.url) == normalize_url(url)
    }
}

fn normalize_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_ascii_lowercase()
}

/// Servers available without any configuration.
pub fn builtin_servers() -> Vec<ServerConfig> {
    vec![
        ServerConfig::new(
            "vg250",
            "https://sgx.geodatenzentrum.de/wfs_vg250",
            ServerDialect::GeoJson,
        )
        .with_label("BKG administrative areas (municipalities, districts, states)")
        .with_layers(["vg250:vg250_gem", "vg250:vg250_krs", "vg250:vg250_lan"]),
        ServerConfig::new(
            "schutzgebiete",
            "https://geodienste.bfn.de/ogc/wfs/schutzgebiet",
            ServerDialect::LatLonGml,
        )
        .with_label("BfN protected areas (nature reserves, national parks, biosphere reserves)")
        .with_layers([
            "bfn_sch_Schutzgebiet:Naturschutzgebiete",
            "bfn_sch_Schutzgebiet:Nationalparke",
            "bfn_sch_Schutzgebiet:Biosphärenreservate",
        ]),
        ServerConfig::new(
            "dlm250",
            "https://sgx.geodatenzentrum.de/wfs_dlm250_inspire",
            ServerDialect::InspireGml,
        )
        .with_label("INSPIRE landscape model DLM250 (transport, water, buildings, land cover)")
        .with_layers([
            "tn-ra:RailwayStationNode",
            "dlmlpz250:TN_Strasse",
            "dlmlpz250:TN_Hafen",
            "dlmlpz250:TN_Punktort",
            "dlmlpz250:GE_Gewässer",
            "dlmlpz250:LN_Gewässer",
            "dlmlpz250:BU_Gebäude",
            "dlmlpz250:TR_Landcover",
        ]),
    ]
}

/// Finds a server by id, or by URL when `key` looks like one.
pub fn find_server<'a>(servers: &'a [ServerConfig], key: &str) -> Option<&'a ServerConfig> {
    let key = key.trim();
    servers
        .iter()
        .find(|s| s.id.eq_ignore_ascii_case(key))
        .or_else(|| servers.iter().find(|s| s.matches_url(key)))
}
