//! Property extraction from GML feature members.

use super::gml::{is_geometry_tag, local, text_content};
use crate::dialect::PropertyMode;
use crate::geometry::Properties;
use roxmltree::Node;

/// Builds the property bag of one member.
///
/// `source` is the full payload text; recursive mode stores the original
/// markup of nested elements so embedded names stay searchable.
pub(super) fn extract_properties(member: Node, mode: PropertyMode, source: &str) -> Properties {
    let feature = feature_element(member);
    let mut properties = Properties::new();

    match mode {
        PropertyMode::Flat => {
            for child in feature.children().filter(Node::is_element) {
                if is_geometry_tag(local(&child)) || is_marker(&child) {
                    continue;
                }
                let value = text_content(child);
                let value = value.trim();
                if !value.is_empty() {
                    properties.insert(local(&child), value);
                }
            }
        }
        PropertyMode::Recursive => walk(feature, None, source, &mut properties),
    }

    properties
}

fn walk(node: Node, prefix: Option<&str>, source: &str, properties: &mut Properties) {
    for child in node.children().filter(Node::is_element) {
        let name = local(&child);
        if is_geometry_tag(name) || name.contains("geometry") || is_marker(&child) {
            continue;
        }

        let key = match prefix {
            Some(prefix) => format!("{}_{}", prefix, name),
            None => name.to_string(),
        };

        if child.children().any(|n| n.is_element()) {
            walk(child, Some(&key), source, properties);
            properties.insert(key, &source[child.range()]);
        } else {
            let value = text_content(child);
            let value = value.trim();
            if !value.is_empty() {
                properties.insert(key, value);
            }
        }
    }
}

/// The member's feature element, or the member itself for flat members.
fn feature_element<'a, 'i>(member: Node<'a, 'i>) -> Node<'a, 'i> {
    member
        .first_element_child()
        .filter(|child| child.children().any(|n| n.is_element()))
        .unwrap_or(member)
}

fn is_marker(node: &Node) -> bool {
    let name = local(node);
    let in_gml = node
        .tag_name()
        .namespace()
        .is_some_and(|ns| ns.starts_with("http://www.opengis.net/gml"));

    name == "boundedBy" || name.contains("fid") || (in_gml && name.starts_with("id"))
}
