//! Coordinate text parsing for `pos`, `posList` and `coordinates` elements.

use crate::coord::Coordinate;

/// Parses a whitespace separated list of numbers, `dimension` values per
/// tuple. Only the first two values of each tuple are kept; a trailing
/// tuple with fewer than two values is ignored.
pub(super) fn parse_pos_list(text: &str, dimension: usize, lat_first: bool) -> Option<Vec<Coordinate>> {
    let values = parse_numbers(text.split_whitespace())?;
    let stride = dimension.max(2);

    Some(
        values
            .chunks(stride)
            .filter(|tuple| tuple.len() >= 2)
            .map(|tuple| Coordinate::from_axis_pair(tuple[0], tuple[1], lat_first))
            .collect(),
    )
}

/// Parses a single `pos` element (at least two numbers).
pub(super) fn parse_pos(text: &str, lat_first: bool) -> Option<Coordinate> {
    let values = parse_numbers(text.split_whitespace())?;
    match values.as_slice() {
        [a, b, ..] => Some(Coordinate::from_axis_pair(*a, *b, lat_first)),
        _ => None,
    }
}

/// Parses a GML 2 style `coordinates` element.
///
/// `ts` separates tuples and `cs` separates the numbers inside a tuple. A
/// whitespace tuple separator splits on any run of whitespace so line
/// breaks and indentation in the payload are harmless. Tuples with fewer
/// than two numbers are skipped.
pub(super) fn parse_coordinates(text: &str, ts: &str, cs: &str, lat_first: bool) -> Option<Vec<Coordinate>> {
    let text = text.trim();
    let tuples: Vec<&str> = if ts.trim().is_empty() {
        text.split_whitespace().collect()
    } else {
        text.split(ts).map(str::trim).filter(|t| !t.is_empty()).collect()
    };

    let mut coordinates = Vec::with_capacity(tuples.len());
    for tuple in tuples {
        let values = parse_numbers(tuple.split(cs).map(str::trim).filter(|v| !v.is_empty()))?;
        if let [a, b, ..] = values.as_slice() {
            coordinates.push(Coordinate::from_axis_pair(*a, *b, lat_first));
        }
    }
    Some(coordinates)
}

fn parse_numbers<'a>(tokens: impl Iterator<Item = &'a str>) -> Option<Vec<f64>> {
    tokens.map(|t| t.parse::<f64>().ok()).collect()
}
