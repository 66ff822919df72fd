//! geoprox - distance and containment queries against OGC WFS services
//!
//! Given a reference point, a WFS layer and a search radius, geoprox pages
//! through the layer, decodes every feature (GeoJSON or one of the supported
//! GML dialects), measures the geodesic distance from the point to each
//! geometry and reports which features contain the point and which lie
//! nearby.
//!
//! # High-Level API
//!
//! ```ignore
//! use std::sync::Arc;
//! use geoprox::coord::Coordinate;
//! use geoprox::dialect::ServerDialect;
//! use geoprox::search::{PagedSearch, SearchRequest, SearchSettings};
//! use geoprox::wfs::AsyncReqwestClient;
//!
//! let client = Arc::new(AsyncReqwestClient::new()?);
//! let search = PagedSearch::new(client, SearchSettings::default());
//! let request = SearchRequest::new(
//!     "https://sgx.geodatenzentrum.de/wfs_vg250",
//!     "vg250:vg250_gem",
//!     Coordinate::new(13.8713, 51.0036),
//!     ServerDialect::GeoJson,
//! );
//!
//! let mut handle = search.spawn(request);
//! while let Some(progress) = handle.next_progress().await {
//!     println!("page {}: {} features", progress.page, progress.features.len());
//! }
//! let outcome = handle.join().await?;
//! ```

pub mod assist;
pub mod config;
pub mod coord;
pub mod decode;
pub mod dialect;
pub mod distance;
pub mod geometry;
pub mod logging;
pub mod naming;
pub mod search;
pub mod wfs;

/// Version of the geoprox library and CLI.
///
/// This is synchronized across all components in the workspace.
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
