//! GML feature collection decoding.

use super::coords::{parse_coordinates, parse_pos, parse_pos_list};
use super::properties::extract_properties;
use super::DecodeError;
use crate::coord::Coordinate;
use crate::dialect::{AxisOrder, GeometryNesting, ServerDialect};
use crate::geometry::{Feature, Geometry};
use roxmltree::{Document, Node};
use tracing::debug;

/// Local names of elements that carry a decodable geometry.
pub(super) const GEOMETRY_TAGS: &[&str] = &[
    "Polygon",
    "MultiPolygon",
    "LineString",
    "MultiLineString",
    "MultiSurface",
    "Point",
    "MultiPoint",
];

const MEMBER_TAGS: &[&str] = &["member", "featureMember"];

/// Decodes a GML page into features, one per geometry found in each member.
pub fn decode_gml(payload: &str, dialect: ServerDialect) -> Result<Vec<Feature>, DecodeError> {
    let doc = Document::parse(payload).map_err(|e| DecodeError::Xml(e.to_string()))?;

    if let Some(text) = exception_text(&doc) {
        return Err(DecodeError::ServerException(text));
    }

    let profile = dialect.profile();
    let lat_first = profile.axis_order == AxisOrder::LatLon;
    let mut features = Vec::new();

    for member in doc
        .descendants()
        .filter(|n| n.is_element() && MEMBER_TAGS.contains(&local(n)))
    {
        let geometries = find_geometries(member, profile.geometry_nesting);
        if geometries.is_empty() {
            continue;
        }

        let properties = extract_properties(member, profile.property_mode, payload);
        for node in geometries {
            match decode_geometry(node, lat_first) {
                Some(geometry) => features.push(Feature::new(
                    Some(geometry),
                    properties.clone(),
                    dialect,
                )),
                None => debug!(element = local(&node), "Skipping unusable GML geometry"),
            }
        }
    }

    Ok(features)
}

/// Text of the first OGC `ExceptionText` element, if any.
pub(crate) fn exception_text(doc: &Document) -> Option<String> {
    doc.descendants()
        .find(|n| n.is_element() && local(n) == "ExceptionText")
        .map(|n| text_content(n).trim().to_string())
}

pub(super) fn local<'a>(node: &Node<'a, '_>) -> &'a str {
    node.tag_name().name()
}

pub(super) fn is_geometry_tag(name: &str) -> bool {
    GEOMETRY_TAGS.contains(&name)
}

pub(super) fn text_content(node: Node) -> String {
    node.descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect()
}

fn is_geometry_container(name: &str) -> bool {
    !is_geometry_tag(name) && name.to_ascii_lowercase().contains("geometry")
}

fn find_geometries<'a, 'i>(member: Node<'a, 'i>, nesting: GeometryNesting) -> Vec<Node<'a, 'i>> {
    let mut found = Vec::new();
    match nesting {
        GeometryNesting::Direct => collect_outermost(member, false, &mut found),
        GeometryNesting::Containers => {
            collect_outermost(member, true, &mut found);
            if found.is_empty() {
                // Nothing outside the wrappers, so everything found now is inside one
                collect_outermost(member, false, &mut found);
            }
        }
    }
    found
}

fn collect_outermost<'a, 'i>(node: Node<'a, 'i>, skip_containers: bool, out: &mut Vec<Node<'a, 'i>>) {
    for child in node.children().filter(Node::is_element) {
        let name = local(&child);
        if is_geometry_tag(name) {
            out.push(child);
        } else if !(skip_containers && is_geometry_container(name)) {
            collect_outermost(child, skip_containers, out);
        }
    }
}

fn decode_geometry(node: Node, lat_first: bool) -> Option<Geometry> {
    let name = local(&node).to_ascii_lowercase();

    if name.contains("polygon") {
        if name.contains("multi") {
            decode_multi_polygon(node, lat_first)
        } else {
            decode_polygon(node, lat_first).map(Geometry::Polygon)
        }
    } else if name.contains("linestring") {
        if name.contains("multi") {
            let lines: Vec<_> = descendants_named(node, "LineString")
                .filter_map(|line| line_coordinates(line, lat_first))
                .filter(|line| line.len() >= 2)
                .collect();
            (!lines.is_empty()).then_some(Geometry::MultiLineString(lines))
        } else {
            line_coordinates(node, lat_first)
                .filter(|line| line.len() >= 2)
                .map(Geometry::LineString)
        }
    } else if name.contains("point") {
        if name.contains("multi") {
            let points: Vec<_> = descendants_named(node, "Point")
                .filter_map(|point| decode_point(point, lat_first))
                .collect();
            (!points.is_empty()).then_some(Geometry::MultiPoint(points))
        } else {
            decode_point(node, lat_first).map(Geometry::Point)
        }
    } else if name.contains("multisurface") {
        decode_multi_surface(node, lat_first)
    } else {
        None
    }
}

fn decode_polygon(node: Node, lat_first: bool) -> Option<Vec<Vec<Coordinate>>> {
    let exterior = child_ring(node, &["exterior", "outerBoundaryIs"], lat_first)?;
    if exterior.is_empty() {
        return None;
    }

    let mut rings = vec![exterior];
    for interior in node
        .descendants()
        .filter(|n| n.is_element() && matches!(local(n), "interior" | "innerBoundaryIs"))
    {
        if let Some(ring) = ring_of(interior, lat_first).filter(|r| !r.is_empty()) {
            rings.push(ring);
        }
    }
    Some(rings)
}

fn decode_multi_polygon(node: Node, lat_first: bool) -> Option<Geometry> {
    let polygons: Vec<_> = descendants_named(node, "Polygon")
        .filter_map(|polygon| decode_polygon(polygon, lat_first))
        .collect();
    (!polygons.is_empty()).then_some(Geometry::MultiPolygon(polygons))
}

fn decode_multi_surface(node: Node, lat_first: bool) -> Option<Geometry> {
    let mut polygons = Vec::new();
    for member in node.descendants().filter(|n| n.is_element()) {
        match local(&member) {
            "surfaceMember" => {
                if let Some(polygon) = descendants_named(member, "Polygon").next() {
                    polygons.extend(decode_polygon(polygon, lat_first));
                }
            }
            "surfaceMembers" => polygons.extend(
                descendants_named(member, "Polygon").filter_map(|p| decode_polygon(p, lat_first)),
            ),
            _ => {}
        }
    }
    (!polygons.is_empty()).then_some(Geometry::MultiPolygon(polygons))
}

fn child_ring(node: Node, names: &[&str], lat_first: bool) -> Option<Vec<Coordinate>> {
    let boundary = node
        .descendants()
        .skip(1)
        .find(|n| n.is_element() && names.contains(&local(n)))?;
    ring_of(boundary, lat_first)
}

fn ring_of(boundary: Node, lat_first: bool) -> Option<Vec<Coordinate>> {
    let ring = descendants_named(boundary, "LinearRing").next()?;
    line_coordinates(ring, lat_first)
}

/// Coordinates of a ring or line from `posList`, `coordinates` or a
/// sequence of `pos` elements.
fn line_coordinates(node: Node, lat_first: bool) -> Option<Vec<Coordinate>> {
    if let Some(list) = descendants_named(node, "posList").next() {
        return parse_pos_list(&text_content(list), srs_dimension(list), lat_first);
    }
    if let Some(coords) = descendants_named(node, "coordinates").next() {
        return parse_coordinates_node(coords, lat_first);
    }

    let positions: Option<Vec<_>> = descendants_named(node, "pos")
        .map(|pos| parse_pos(&text_content(pos), lat_first))
        .collect();
    positions.filter(|p| !p.is_empty())
}

fn decode_point(node: Node, lat_first: bool) -> Option<Coordinate> {
    if let Some(pos) = descendants_named(node, "pos").next() {
        return parse_pos(&text_content(pos), lat_first);
    }
    let coords = descendants_named(node, "coordinates").next()?;
    parse_coordinates_node(coords, lat_first)?.into_iter().next()
}

fn parse_coordinates_node(node: Node, lat_first: bool) -> Option<Vec<Coordinate>> {
    let ts = node.attribute("ts").unwrap_or(" ");
    let cs = node.attribute("cs").unwrap_or(",");
    parse_coordinates(&text_content(node), ts, cs, lat_first)
}

/// Tuple stride from the nearest `srsDimension` attribute, default 2.
fn srs_dimension(node: Node) -> usize {
    node.ancestors()
        .filter(Node::is_element)
        .find_map(|n| n.attribute("srsDimension"))
        .and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|d| *d >= 2)
        .unwrap_or(2)
}

fn descendants_named<'a, 'i: 'a>(
    node: Node<'a, 'i>,
    name: &'static str,
) -> impl Iterator<Item = Node<'a, 'i>> {
    node.descendants()
        .skip(1)
        .filter(move |n| n.is_element() && local(n) == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::GeometryKind;

    fn wrap(members: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<wfs:FeatureCollection xmlns:wfs="http://www.opengis.net/wfs/2.0"
    xmlns:gml="http://www.opengis.net/gml/3.2"
    xmlns:app="http://example.org/app">
{members}
</wfs:FeatureCollection>"#
        )
    }

    const SQUARE_LON_LAT: &str = r#"
<wfs:member>
  <app:Area gml:id="a1">
    <app:NAME>Testgebiet</app:NAME>
    <app:geom>
      <gml:Polygon gml:id="p1">
        <gml:exterior><gml:LinearRing>
          <gml:posList>13.0 51.0 14.0 51.0 14.0 52.0 13.0 52.0 13.0 51.0</gml:posList>
        </gml:LinearRing></gml:exterior>
      </gml:Polygon>
    </app:geom>
  </app:Area>
</wfs:member>"#;

    #[test]
    fn test_polygon_member_lon_lat() {
        let features = decode_gml(&wrap(SQUARE_LON_LAT), ServerDialect::InspireGml).unwrap();
        assert_eq!(features.len(), 1);

        let feature = &features[0];
        assert_eq!(feature.geometry_kind(), GeometryKind::Polygon);
        assert_eq!(feature.properties.get("NAME"), Some("Testgebiet"));
        match feature.geometry.as_ref().unwrap() {
            Geometry::Polygon(rings) => {
                assert_eq!(rings.len(), 1);
                assert_eq!(rings[0][1], Coordinate::new(14.0, 51.0));
            }
            other => panic!("unexpected geometry {:?}", other),
        }
    }

    #[test]
    fn test_lat_first_dialect_swaps_axes() {
        let xml = wrap(
            r#"<wfs:member><app:Site>
                 <app:NAME>Moor</app:NAME>
                 <app:SHAPE><gml:Point><gml:pos>51.05 13.70</gml:pos></gml:Point></app:SHAPE>
               </app:Site></wfs:member>"#,
        );
        let features = decode_gml(&xml, ServerDialect::LatLonGml).unwrap();
        assert_eq!(
            features[0].geometry,
            Some(Geometry::Point(Coordinate::new(13.70, 51.05)))
        );
    }

    #[test]
    fn test_polygon_inside_multipolygon_decoded_once() {
        let xml = wrap(
            r#"<wfs:member><app:Area>
                 <gml:MultiPolygon>
                   <gml:polygonMember><gml:Polygon><gml:exterior><gml:LinearRing>
                     <gml:posList>0 0 1 0 1 1 0 0</gml:posList>
                   </gml:LinearRing></gml:exterior></gml:Polygon></gml:polygonMember>
                   <gml:polygonMember><gml:Polygon><gml:exterior><gml:LinearRing>
                     <gml:posList>5 5 6 5 6 6 5 5</gml:posList>
                   </gml:LinearRing></gml:exterior></gml:Polygon></gml:polygonMember>
                 </gml:MultiPolygon>
               </app:Area></wfs:member>"#,
        );
        let features = decode_gml(&xml, ServerDialect::InspireGml).unwrap();
        assert_eq!(features.len(), 1);
        match &features[0].geometry {
            Some(Geometry::MultiPolygon(polygons)) => assert_eq!(polygons.len(), 2),
            other => panic!("unexpected geometry {:?}", other),
        }
    }

    #[test]
    fn test_multisurface_becomes_multipolygon() {
        let xml = wrap(
            r#"<wfs:member><app:Area><app:SHAPE>
                 <gml:MultiSurface><gml:surfaceMember><gml:Polygon><gml:exterior><gml:LinearRing>
                   <gml:posList>51 13 51 14 52 14 51 13</gml:posList>
                 </gml:LinearRing></gml:exterior></gml:Polygon></gml:surfaceMember></gml:MultiSurface>
               </app:SHAPE></app:Area></wfs:member>"#,
        );
        let features = decode_gml(&xml, ServerDialect::LatLonGml).unwrap();
        match &features[0].geometry {
            Some(Geometry::MultiPolygon(polygons)) => {
                assert_eq!(polygons[0][0][0], Coordinate::new(13.0, 51.0));
            }
            other => panic!("unexpected geometry {:?}", other),
        }
    }

    #[test]
    fn test_holes_are_kept() {
        let xml = wrap(
            r#"<wfs:member><app:Area><gml:Polygon>
                 <gml:exterior><gml:LinearRing><gml:posList>0 0 10 0 10 10 0 10 0 0</gml:posList></gml:LinearRing></gml:exterior>
                 <gml:interior><gml:LinearRing><gml:posList>2 2 4 2 4 4 2 2</gml:posList></gml:LinearRing></gml:interior>
               </gml:Polygon></app:Area></wfs:member>"#,
        );
        let features = decode_gml(&xml, ServerDialect::InspireGml).unwrap();
        match &features[0].geometry {
            Some(Geometry::Polygon(rings)) => assert_eq!(rings.len(), 2),
            other => panic!("unexpected geometry {:?}", other),
        }
    }

    #[test]
    fn test_polygon_without_exterior_dropped() {
        let xml = wrap(
            r#"<wfs:member><app:Area><gml:Polygon>
                 <gml:interior><gml:LinearRing><gml:posList>2 2 4 2 4 4 2 2</gml:posList></gml:LinearRing></gml:interior>
               </gml:Polygon></app:Area></wfs:member>"#,
        );
        assert!(decode_gml(&xml, ServerDialect::InspireGml).unwrap().is_empty());
    }

    #[test]
    fn test_gml2_coordinates_and_feature_member() {
        let xml = r#"<wfs:FeatureCollection xmlns:wfs="http://www.opengis.net/wfs" xmlns:gml="http://www.opengis.net/gml">
          <gml:featureMember><Road>
            <name>B6</name>
            <gml:LineString><gml:coordinates decimal="." cs="," ts=" ">13.0,51.0 13.5,51.2</gml:coordinates></gml:LineString>
          </Road></gml:featureMember>
        </wfs:FeatureCollection>"#;
        let features = decode_gml(xml, ServerDialect::InspireGml).unwrap();
        assert_eq!(
            features[0].geometry,
            Some(Geometry::LineString(vec![
                Coordinate::new(13.0, 51.0),
                Coordinate::new(13.5, 51.2),
            ]))
        );
    }

    #[test]
    fn test_single_coordinate_line_dropped() {
        let xml = wrap(
            r#"<wfs:member><app:Road><gml:LineString><gml:posList>13 51</gml:posList></gml:LineString></app:Road></wfs:member>"#,
        );
        assert!(decode_gml(&xml, ServerDialect::InspireGml).unwrap().is_empty());
    }

    #[test]
    fn test_geometry_container_fallback() {
        let xml = wrap(
            r#"<wfs:member><app:Station>
                 <app:geometry><gml:Point><gml:pos>13.7 51.05</gml:pos></gml:Point></app:geometry>
               </app:Station></wfs:member>"#,
        );
        let features = decode_gml(&xml, ServerDialect::InspireGml).unwrap();
        assert_eq!(features.len(), 1);
        assert_eq!(
            features[0].geometry,
            Some(Geometry::Point(Coordinate::new(13.7, 51.05)))
        );
    }

    #[test]
    fn test_geometry_outside_container_preferred() {
        let xml = wrap(
            r#"<wfs:member><app:Station>
                 <gml:Point><gml:pos>1 1</gml:pos></gml:Point>
                 <app:referenceGeometry><gml:Point><gml:pos>2 2</gml:pos></gml:Point></app:referenceGeometry>
               </app:Station></wfs:member>"#,
        );
        let features = decode_gml(&xml, ServerDialect::InspireGml).unwrap();
        assert_eq!(features.len(), 1);
        assert_eq!(
            features[0].geometry,
            Some(Geometry::Point(Coordinate::new(1.0, 1.0)))
        );
    }

    #[test]
    fn test_three_dimensional_pos_list() {
        let xml = wrap(
            r#"<wfs:member><app:Road>
                 <gml:LineString srsDimension="3"><gml:posList>13 51 100 14 52 120</gml:posList></gml:LineString>
               </app:Road></wfs:member>"#,
        );
        let features = decode_gml(&xml, ServerDialect::InspireGml).unwrap();
        assert_eq!(
            features[0].geometry,
            Some(Geometry::LineString(vec![
                Coordinate::new(13.0, 51.0),
                Coordinate::new(14.0, 52.0),
            ]))
        );
    }

    #[test]
    fn test_member_without_geometry_yields_nothing() {
        let xml = wrap(r#"<wfs:member><app:Area><app:NAME>Leer</app:NAME></app:Area></wfs:member>"#);
        assert_eq!(decode_gml(&xml, ServerDialect::InspireGml), Ok(vec![]));
    }

    #[test]
    fn test_exception_report() {
        let xml = r#"<ows:ExceptionReport xmlns:ows="http://www.opengis.net/ows/1.1">
          <ows:Exception exceptionCode="InvalidParameterValue">
            <ows:ExceptionText> Unknown type name </ows:ExceptionText>
          </ows:Exception>
        </ows:ExceptionReport>"#;
        assert_eq!(
            decode_gml(xml, ServerDialect::InspireGml),
            Err(DecodeError::ServerException("Unknown type name".to_string()))
        );
    }

    #[test]
    fn test_malformed_xml() {
        assert!(matches!(
            decode_gml("<wfs:FeatureCollection>", ServerDialect::InspireGml),
            Err(DecodeError::Xml(_))
        ));
    }
}
