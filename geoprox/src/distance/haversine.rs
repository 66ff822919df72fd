//! Great-circle distances on a spherical Earth.

use crate::coord::Coordinate;

/// Mean Earth radius in metres (IUGG).
pub const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Haversine distance between two points in metres.
pub fn haversine_distance(a: &Coordinate, b: &Coordinate) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = (b.lat - a.lat).to_radians();
    let dlon = (b.lon - a.lon).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().min(1.0).asin()
}

/// Distance in metres from `point` to the segment `start`-`end`.
///
/// The closest point is located in an equirectangular plane centred on
/// `point`, which is accurate for segments of up to a few kilometres, and
/// measured back on the sphere with [`haversine_distance`].
pub fn point_segment_distance(point: &Coordinate, start: &Coordinate, end: &Coordinate) -> f64 {
    let cos_lat = point.lat.to_radians().cos();
    let project = |c: &Coordinate| ((c.lon - point.lon) * cos_lat, c.lat - point.lat);

    let (ax, ay) = project(start);
    let (bx, by) = project(end);
    let (dx, dy) = (bx - ax, by - ay);
    let length_sq = dx * dx + dy * dy;

    let t = if length_sq == 0.0 {
        0.0
    } else {
        (-(ax * dx + ay * dy) / length_sq).clamp(0.0, 1.0)
    };

    let closest = Coordinate::new(
        start.lon + t * (end.lon - start.lon),
        start.lat + t * (end.lat - start.lat),
    );
    haversine_distance(point, &closest)
}

/// Minimum distance from `point` to a path of coordinates.
///
/// A single coordinate is measured as a point; an empty path yields `None`.
pub fn path_distance(point: &Coordinate, path: &[Coordinate]) -> Option<f64> {
    match path {
        [] => None,
        [only] => Some(haversine_distance(point, only)),
        _ => path
            .windows(2)
            .map(|pair| point_segment_distance(point, &pair[0], &pair[1]))
            .reduce(f64::min),
    }
}
