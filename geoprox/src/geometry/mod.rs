//! Normalized feature model shared by every server dialect.
//!
//! Decoders turn JSON and GML payloads into [`Feature`]s carrying a
//! [`Geometry`] in longitude/latitude order plus a flat string
//! [`Properties`] bag. The geometry serializes as a GeoJSON geometry
//! object so renderers can consume it unchanged.

mod feature;
mod types;

pub use feature::{Feature, Properties};
pub use types::{Geometry, GeometryKind};
