//! `.tsx` document parsing
//!
//! Turns the XML tree into a [`TilesetDescriptor`]. Structural problems are
//! `TsxError::Format`; entries the model cannot hold (a repeated tile id, a
//! tile with several collision objects) are returned as violations so the
//! caller's policy decides whether they abort the load. Attributes and
//! elements the model does not interpret are kept in each element's
//! [`Extras`] and written back on save.

use crate::validate::{Violation, ViolationTarget};
use crate::TsxError;
use roxmltree::{Attribute, Document, Node};
use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;
use tilekit_core::{
    Color, CollisionObject, CollisionRect, DrawOrder, Extras, ObjectGroup, RawElement, TileData,
    TilesetDescriptor, TilesetImage, WangColor, WangId, WangSet, WangSetType,
};
use tracing::debug;

/// Result of parsing, before invariants are checked
#[derive(Debug)]
pub(crate) struct ParsedTileset {
    pub tileset: TilesetDescriptor,
    pub violations: Vec<Violation>,
}

pub(crate) fn parse_document(xml: &str) -> Result<ParsedTileset, TsxError> {
    let doc = Document::parse(xml).map_err(|e| TsxError::Format(format!("XML error: {e}")))?;
    let root = doc.root_element();
    if root.tag_name().name() != "tileset" {
        return Err(TsxError::Format(format!(
            "Expected root element <tileset>, found <{}>",
            root.tag_name().name()
        )));
    }

    let mut violations = Vec::new();
    let tileset = parse_tileset_node(root, &mut violations)?;
    Ok(ParsedTileset {
        tileset,
        violations,
    })
}

fn parse_tileset_node(
    node: Node,
    violations: &mut Vec<Violation>,
) -> Result<TilesetDescriptor, TsxError> {
    let mut name = String::new();
    let mut version = None;
    let mut tiled_version = None;
    let mut tile_width = None;
    let mut tile_height = None;
    let mut tile_count = None;
    let mut columns = None;
    let mut extras = Extras::default();

    // Parses attributes
    for (position, attribute) in node.attributes().enumerate() {
        let value = attribute.value();
        match attribute.name() {
            "name" => name = String::from(value),
            "version" => version = Some(String::from(value)),
            "tiledversion" => tiled_version = Some(String::from(value)),
            "tilewidth" => tile_width = Some(parse_attr(node, "tilewidth", value)?),
            "tileheight" => tile_height = Some(parse_attr(node, "tileheight", value)?),
            "tilecount" => tile_count = Some(parse_attr(node, "tilecount", value)?),
            "columns" => columns = Some(parse_attr(node, "columns", value)?),
            "spacing" | "margin" => {
                let pixels: u32 = parse_attr(node, attribute.name(), value)?;
                if pixels != 0 {
                    return Err(TsxError::Format(format!(
                        "<tileset> attribute '{}' = {} is not supported",
                        attribute.name(),
                        pixels
                    )));
                }
                extras.push_attribute(position, attribute.name(), value);
            }
            _ => keep_attribute(&mut extras, node, position, &attribute),
        }
    }

    let mut image = None;
    let mut tiles = BTreeMap::new();
    let mut seen_tiles = BTreeSet::new();
    let mut wang_sets = Vec::new();

    // Parses children
    for (position, child) in node.children().filter(Node::is_element).enumerate() {
        match child.tag_name().name() {
            "image" => {
                if image.is_some() {
                    return Err(TsxError::Format(
                        "<tileset> has more than one <image>".to_string(),
                    ));
                }
                image = Some(parse_image(child)?);
            }
            "tile" => parse_tile(child, &mut tiles, &mut seen_tiles, violations)?,
            "wangsets" => parse_wang_sets(child, &mut wang_sets, violations)?,
            _ => keep_child(&mut extras, node, position, child),
        }
    }

    let image =
        image.ok_or_else(|| TsxError::Format("<tileset> has no <image> element".to_string()))?;

    Ok(TilesetDescriptor {
        name,
        version,
        tiled_version,
        tile_width: require(node, "tilewidth", tile_width)?,
        tile_height: require(node, "tileheight", tile_height)?,
        tile_count: require(node, "tilecount", tile_count)?,
        columns: require(node, "columns", columns)?,
        image,
        tiles,
        wang_sets,
        extras,
    })
}

fn parse_image(node: Node) -> Result<TilesetImage, TsxError> {
    let mut source = None;
    let mut width = None;
    let mut height = None;
    let mut extras = Extras::default();
    for (position, attribute) in node.attributes().enumerate() {
        let value = attribute.value();
        match attribute.name() {
            "source" => source = Some(String::from(value)),
            "width" => width = Some(parse_attr(node, "width", value)?),
            "height" => height = Some(parse_attr(node, "height", value)?),
            _ => keep_attribute(&mut extras, node, position, &attribute),
        }
    }
    for (position, child) in node.children().filter(Node::is_element).enumerate() {
        keep_child(&mut extras, node, position, child);
    }

    Ok(TilesetImage {
        source: require(node, "source", source)?,
        width: require(node, "width", width)?,
        height: require(node, "height", height)?,
        extras,
    })
}

fn parse_tile(
    node: Node,
    tiles: &mut BTreeMap<u32, TileData>,
    seen: &mut BTreeSet<u32>,
    violations: &mut Vec<Violation>,
) -> Result<(), TsxError> {
    let id: u32 = match node.attribute("id") {
        Some(value) => parse_attr(node, "id", value)?,
        None => return require(node, "id", None),
    };

    let mut tile = TileData::default();
    for (position, attribute) in node.attributes().enumerate() {
        if attribute.name() != "id" {
            keep_attribute(&mut tile.extras, node, position, &attribute);
        }
    }

    let mut object_count = 0;
    for (position, child) in node.children().filter(Node::is_element).enumerate() {
        match child.tag_name().name() {
            "objectgroup" => {
                if tile.object_group.is_some() {
                    return Err(TsxError::Format(format!(
                        "Tile {} has more than one <objectgroup>",
                        id
                    )));
                }
                let (group, count) = parse_object_group(child)?;
                tile.object_group = Some(group);
                object_count = count;
            }
            _ => keep_child(&mut tile.extras, node, position, child),
        }
    }

    // Every declaration claims its id, kept or not
    if !seen.insert(id) {
        violations.push(Violation::new(
            ViolationTarget::SkippedTile(id),
            format!("Tile {} is declared more than once", id),
        ));
        return Ok(());
    }

    if object_count > 1 {
        violations.push(Violation::new(
            ViolationTarget::SkippedTile(id),
            format!(
                "Tile {} holds {} collision objects, at most one is supported",
                id, object_count
            ),
        ));
        return Ok(());
    }

    tiles.insert(id, tile);
    Ok(())
}

/// Returns the group (holding the first object) and the number of objects seen
fn parse_object_group(node: Node) -> Result<(ObjectGroup, usize), TsxError> {
    let mut group = ObjectGroup::default();
    for (position, attribute) in node.attributes().enumerate() {
        let value = attribute.value();
        match attribute.name() {
            "id" => group.id = Some(parse_attr(node, "id", value)?),
            "draworder" => {
                group.draw_order = DrawOrder::from_attr(value).ok_or_else(|| {
                    TsxError::Format(format!("<objectgroup> has unknown draworder '{}'", value))
                })?;
            }
            _ => keep_attribute(&mut group.extras, node, position, &attribute),
        }
    }

    let mut count = 0;
    for (position, child) in node.children().filter(Node::is_element).enumerate() {
        match child.tag_name().name() {
            "object" => {
                let object = parse_object(child)?;
                if group.object.is_none() {
                    group.object = Some(object);
                }
                count += 1;
            }
            _ => keep_child(&mut group.extras, node, position, child),
        }
    }
    Ok((group, count))
}

fn parse_object(node: Node) -> Result<CollisionObject, TsxError> {
    let mut object = CollisionObject::new(0, CollisionRect::default());
    for (position, attribute) in node.attributes().enumerate() {
        let value = attribute.value();
        match attribute.name() {
            "id" => object.id = parse_attr(node, "id", value)?,
            "x" => object.rect.x = parse_attr(node, "x", value)?,
            "y" => object.rect.y = parse_attr(node, "y", value)?,
            "width" => object.rect.width = parse_attr(node, "width", value)?,
            "height" => object.rect.height = parse_attr(node, "height", value)?,
            "rotation" => {
                let degrees: f64 = parse_attr(node, "rotation", value)?;
                if degrees != 0.0 {
                    return Err(TsxError::Format(format!(
                        "Object {} is rotated; only axis-aligned rectangles are supported",
                        object.id
                    )));
                }
                object.extras.push_attribute(position, "rotation", value);
            }
            _ => keep_attribute(&mut object.extras, node, position, &attribute),
        }
    }

    // Shape children turn the object into something other than a rectangle
    for (position, child) in node.children().filter(Node::is_element).enumerate() {
        match child.tag_name().name() {
            "properties" => keep_child(&mut object.extras, node, position, child),
            shape => {
                return Err(TsxError::Format(format!(
                    "Object {} has unsupported shape <{}>",
                    object.id, shape
                )));
            }
        }
    }

    Ok(object)
}

fn parse_wang_sets(
    node: Node,
    wang_sets: &mut Vec<WangSet>,
    violations: &mut Vec<Violation>,
) -> Result<(), TsxError> {
    if let Some(attribute) = node.attributes().next() {
        return Err(TsxError::Format(format!(
            "<wangsets> attribute '{}' is not supported",
            attribute.name()
        )));
    }

    for set_node in node.children().filter(Node::is_element) {
        match set_node.tag_name().name() {
            "wangset" => {
                let set_index = wang_sets.len();
                wang_sets.push(parse_wang_set(set_node, set_index, violations)?);
            }
            other => {
                return Err(TsxError::Format(format!(
                    "<wangsets> has unsupported child <{}>",
                    other
                )));
            }
        }
    }
    Ok(())
}

fn parse_wang_set(
    node: Node,
    set_index: usize,
    violations: &mut Vec<Violation>,
) -> Result<WangSet, TsxError> {
    let mut set = WangSet::new("", WangSetType::default());
    for (position, attribute) in node.attributes().enumerate() {
        let value = attribute.value();
        match attribute.name() {
            "name" => set.name = String::from(value),
            "type" => {
                set.set_type = WangSetType::from_attr(value).ok_or_else(|| {
                    TsxError::Format(format!("<wangset> has unknown type '{}'", value))
                })?;
            }
            "tile" => set.tile = parse_attr(node, "tile", value)?,
            _ => keep_attribute(&mut set.extras, node, position, &attribute),
        }
    }

    for (position, child) in node.children().filter(Node::is_element).enumerate() {
        match child.tag_name().name() {
            "wangcolor" => set.colors.push(parse_wang_color(child)?),
            "wangtile" => {
                let (tile, wang_id) = parse_wang_tile(child)?;
                if set.tiles.contains_key(&tile) {
                    violations.push(Violation::new(
                        ViolationTarget::SkippedWangTile {
                            set: set_index,
                            tile,
                        },
                        format!("Wang set '{}' lists tile {} more than once", set.name, tile),
                    ));
                } else {
                    set.tiles.insert(tile, wang_id);
                }
            }
            _ => keep_child(&mut set.extras, node, position, child),
        }
    }

    Ok(set)
}

fn parse_wang_color(node: Node) -> Result<WangColor, TsxError> {
    let mut color = WangColor::new("", Color::default());
    let mut has_color = false;
    for (position, attribute) in node.attributes().enumerate() {
        let value = attribute.value();
        match attribute.name() {
            "name" => color.name = String::from(value),
            "color" => {
                color.color = value.parse().map_err(|e| {
                    TsxError::Format(format!("<wangcolor> attribute 'color': {}", e))
                })?;
                has_color = true;
            }
            "tile" => color.tile = parse_attr(node, "tile", value)?,
            "probability" => {
                let probability = parse_attr(node, "probability", value)?;
                if !WangColor::is_valid_probability(probability) {
                    return Err(TsxError::Format(format!(
                        "<wangcolor> attribute 'probability' = '{}' must be a finite, \
                         non-negative number",
                        value
                    )));
                }
                color.probability = probability;
            }
            _ => keep_attribute(&mut color.extras, node, position, &attribute),
        }
    }
    for (position, child) in node.children().filter(Node::is_element).enumerate() {
        keep_child(&mut color.extras, node, position, child);
    }

    if !has_color {
        return Err(TsxError::Format(
            "<wangcolor> is missing required attribute 'color'".to_string(),
        ));
    }
    Ok(color)
}

/// Wang tiles are stored as a bare tile → code map, so anything else on
/// them cannot be kept and is rejected
fn parse_wang_tile(node: Node) -> Result<(u32, WangId), TsxError> {
    let mut tile = None;
    let mut wang_id = None;
    for attribute in node.attributes() {
        let value = attribute.value();
        match attribute.name() {
            "tileid" => tile = Some(parse_attr(node, "tileid", value)?),
            "wangid" => {
                let parsed = WangId::from_str(value).map_err(|e| {
                    TsxError::Format(format!("<wangtile> attribute 'wangid' = '{}': {}", value, e))
                })?;
                wang_id = Some(parsed);
            }
            other => {
                return Err(TsxError::Format(format!(
                    "<wangtile> attribute '{}' is not supported",
                    other
                )));
            }
        }
    }
    if let Some(child) = node.children().find(Node::is_element) {
        return Err(TsxError::Format(format!(
            "<wangtile> has unsupported child <{}>",
            child.tag_name().name()
        )));
    }

    Ok((
        require(node, "tileid", tile)?,
        require(node, "wangid", wang_id)?,
    ))
}

fn keep_attribute(extras: &mut Extras, node: Node, position: usize, attribute: &Attribute) {
    debug!(
        "Keeping unmodelled <{}> attribute '{}'",
        node.tag_name().name(),
        attribute.name()
    );
    extras.push_attribute(position, attribute.name(), attribute.value());
}

fn keep_child(extras: &mut Extras, node: Node, position: usize, child: Node) {
    debug!(
        "Keeping unmodelled <{}> child <{}>",
        node.tag_name().name(),
        child.tag_name().name()
    );
    extras.push_child(position, raw_element(child));
}

/// Copy an element subtree as-is
fn raw_element(node: Node) -> RawElement {
    let mut element = RawElement::new(node.tag_name().name());
    for attribute in node.attributes() {
        element = element.with_attribute(attribute.name(), attribute.value());
    }
    for child in node.children().filter(Node::is_element) {
        element.children.push(raw_element(child));
    }

    // Whitespace between child elements is layout, not content
    let text: String = node
        .children()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect();
    let keep_text = if element.children.is_empty() {
        !text.is_empty()
    } else {
        !text.trim().is_empty()
    };
    if keep_text {
        element.text = Some(text);
    }
    element
}

fn parse_attr<T: FromStr>(node: Node, name: &str, value: &str) -> Result<T, TsxError> {
    value.trim().parse().map_err(|_| {
        TsxError::Format(format!(
            "<{}> attribute '{}' has invalid value '{}'",
            node.tag_name().name(),
            name,
            value
        ))
    })
}

fn require<T>(node: Node, name: &str, value: Option<T>) -> Result<T, TsxError> {
    value.ok_or_else(|| {
        TsxError::Format(format!(
            "<{}> is missing required attribute '{}'",
            node.tag_name().name(),
            name
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(xml: &str) -> Result<ParsedTileset, TsxError> {
        parse_document(xml)
    }

    const MINIMAL: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<tileset name="mini" tilewidth="16" tileheight="16" tilecount="4" columns="2">
 <image source="mini.png" width="32" height="32"/>
</tileset>"#;

    #[test]
    fn test_parse_minimal() {
        let parsed = parse(MINIMAL).unwrap();
        let tileset = parsed.tileset;
        assert_eq!(tileset.name, "mini");
        assert_eq!(tileset.version, None);
        assert_eq!(tileset.tile_count, 4);
        assert_eq!(tileset.image.source, "mini.png");
        assert!(tileset.tiles.is_empty());
        assert!(tileset.wang_sets.is_empty());
        assert!(parsed.violations.is_empty());
    }

    #[test]
    fn test_wrong_root() {
        let result = parse(r#"<map width="1"/>"#);
        assert!(matches!(result, Err(TsxError::Format(msg)) if msg.contains("<map>")));
    }

    #[test]
    fn test_malformed_xml() {
        let result = parse("<tileset name=\"x\"");
        assert!(matches!(result, Err(TsxError::Format(msg)) if msg.starts_with("XML error")));
    }

    #[test]
    fn test_missing_required_attribute() {
        let result = parse(
            r#"<tileset tilewidth="16" tileheight="16" tilecount="4">
 <image source="mini.png" width="32" height="32"/>
</tileset>"#,
        );
        assert!(matches!(result, Err(TsxError::Format(msg)) if msg.contains("'columns'")));
    }

    #[test]
    fn test_missing_image() {
        let result = parse(r#"<tileset tilewidth="16" tileheight="16" tilecount="4" columns="2"/>"#);
        assert!(matches!(result, Err(TsxError::Format(msg)) if msg.contains("no <image>")));
    }

    #[test]
    fn test_invalid_integer() {
        let result = parse(
            r#"<tileset tilewidth="sixteen" tileheight="16" tilecount="4" columns="2">
 <image source="mini.png" width="32" height="32"/>
</tileset>"#,
        );
        assert!(matches!(result, Err(TsxError::Format(msg)) if msg.contains("tilewidth")));
    }

    #[test]
    fn test_object_defaults_to_zero() {
        let parsed = parse(
            r#"<tileset tilewidth="16" tileheight="16" tilecount="4" columns="2">
 <image source="mini.png" width="32" height="32"/>
 <tile id="1">
  <objectgroup draworder="index" id="2">
   <object id="1" width="16"/>
  </objectgroup>
 </tile>
</tileset>"#,
        )
        .unwrap();
        let rect = parsed.tileset.collision_rect(1).unwrap();
        assert_eq!(*rect, CollisionRect::new(0, 0, 16, 0));
    }

    #[test]
    fn test_fractional_object_rejected() {
        let result = parse(
            r#"<tileset tilewidth="16" tileheight="16" tilecount="4" columns="2">
 <image source="mini.png" width="32" height="32"/>
 <tile id="1">
  <objectgroup draworder="index" id="2">
   <object id="1" x="0.5" y="0" width="16" height="16"/>
  </objectgroup>
 </tile>
</tileset>"#,
        );
        assert!(matches!(result, Err(TsxError::Format(msg)) if msg.contains("'x'")));
    }

    #[test]
    fn test_non_rectangle_shape_rejected() {
        let result = parse(
            r#"<tileset tilewidth="16" tileheight="16" tilecount="4" columns="2">
 <image source="mini.png" width="32" height="32"/>
 <tile id="1">
  <objectgroup draworder="index" id="2">
   <object id="1" x="0" y="0" width="16" height="16"><ellipse/></object>
  </objectgroup>
 </tile>
</tileset>"#,
        );
        assert!(matches!(result, Err(TsxError::Format(msg)) if msg.contains("<ellipse>")));
    }

    #[test]
    fn test_several_objects_is_violation() {
        let parsed = parse(
            r#"<tileset tilewidth="16" tileheight="16" tilecount="4" columns="2">
 <image source="mini.png" width="32" height="32"/>
 <tile id="1">
  <objectgroup draworder="index" id="2">
   <object id="1" x="0" y="0" width="8" height="8"/>
   <object id="2" x="8" y="8" width="8" height="8"/>
  </objectgroup>
 </tile>
</tileset>"#,
        )
        .unwrap();
        assert!(parsed.tileset.tile(1).is_none());
        assert_eq!(parsed.violations.len(), 1);
        assert_eq!(parsed.violations[0].target, ViolationTarget::SkippedTile(1));
    }

    #[test]
    fn test_redeclared_tile_is_skipped() {
        let parsed = parse(
            r#"<tileset tilewidth="16" tileheight="16" tilecount="4" columns="2">
 <image source="mini.png" width="32" height="32"/>
 <tile id="1">
  <objectgroup draworder="index" id="2">
   <object id="1" x="0" y="0" width="8" height="8"/>
   <object id="2" x="8" y="8" width="8" height="8"/>
  </objectgroup>
 </tile>
 <tile id="1"/>
 <tile id="2">
  <objectgroup draworder="index" id="2">
   <object id="3" x="0" y="0" width="16" height="16"/>
  </objectgroup>
 </tile>
 <tile id="2"/>
</tileset>"#,
        )
        .unwrap();
        // The second <tile id="1"> must not take the place of the rejected first one
        assert!(parsed.tileset.tile(1).is_none());
        assert!(parsed.tileset.tile_has_collision(2));
        let targets: Vec<_> = parsed.violations.iter().map(|v| v.target.clone()).collect();
        assert_eq!(
            targets,
            vec![
                ViolationTarget::SkippedTile(1),
                ViolationTarget::SkippedTile(1),
                ViolationTarget::SkippedTile(2),
            ]
        );
    }

    #[test]
    fn test_duplicate_wang_tile_keeps_first() {
        let parsed = parse(
            r##"<tileset tilewidth="16" tileheight="16" tilecount="4" columns="2">
 <image source="mini.png" width="32" height="32"/>
 <wangsets>
  <wangset name="Road" type="edge" tile="-1">
   <wangcolor name="road" color="#00ff00" tile="-1" probability="0.5"/>
   <wangtile tileid="2" wangid="1,0,1,0,0,0,0,0"/>
   <wangtile tileid="2" wangid="0,0,0,0,1,0,1,0"/>
  </wangset>
 </wangsets>
</tileset>"##,
        )
        .unwrap();
        let set = &parsed.tileset.wang_sets[0];
        assert_eq!(set.set_type, WangSetType::Edge);
        assert_eq!(set.colors[0].color, Color::rgb(0, 255, 0));
        assert_eq!(set.colors[0].probability, 0.5);
        assert_eq!(set.get(2), Some(WangId([1, 0, 1, 0, 0, 0, 0, 0])));
        assert_eq!(
            parsed.violations[0].target,
            ViolationTarget::SkippedWangTile { set: 0, tile: 2 }
        );
    }

    #[test]
    fn test_short_wang_id_is_format_error() {
        let result = parse(
            r##"<tileset tilewidth="16" tileheight="16" tilecount="4" columns="2">
 <image source="mini.png" width="32" height="32"/>
 <wangsets>
  <wangset name="Land" type="mixed" tile="-1">
   <wangcolor name="" color="#ff0000" tile="-1" probability="1"/>
   <wangtile tileid="1" wangid="1,1,1,1,1,1,1"/>
  </wangset>
 </wangsets>
</tileset>"##,
        );
        assert!(matches!(result, Err(TsxError::Format(msg)) if msg.contains("wangid")));
    }

    #[test]
    fn test_nonzero_spacing_rejected() {
        let result = parse(
            r#"<tileset tilewidth="16" tileheight="16" tilecount="4" columns="2" spacing="1">
 <image source="mini.png" width="33" height="33"/>
</tileset>"#,
        );
        assert!(matches!(result, Err(TsxError::Format(msg)) if msg.contains("spacing")));
    }

    #[test]
    fn test_unmodelled_content_is_kept() {
        let parsed = parse(
            r#"<tileset name="mini" class="Terrain" tilewidth="16" tileheight="16" spacing="0" tilecount="4" columns="2">
 <tileoffset x="0" y="4"/>
 <properties>
  <property name="biome" value="forest"/>
  <property name="notes">line one
line two</property>
 </properties>
 <image source="mini.png" trans="ff00ff" width="32" height="32"/>
 <tile id="1" type="Spike" probability="0.5">
  <!-- editor comment -->
  <properties>
   <property name="damage" type="int" value="3"/>
  </properties>
 </tile>
</tileset>"#,
        )
        .unwrap();
        let tileset = parsed.tileset;

        let attributes: Vec<_> = tileset
            .extras
            .attributes
            .iter()
            .map(|a| (a.position, a.name.as_str(), a.value.as_str()))
            .collect();
        assert_eq!(attributes, vec![(1, "class", "Terrain"), (4, "spacing", "0")]);

        assert_eq!(tileset.extras.children[0].position, 0);
        assert_eq!(tileset.extras.children[1].position, 1);
        let offset = tileset.extras.child("tileoffset").unwrap();
        assert_eq!(offset.attribute("y"), Some("4"));
        assert!(offset.is_leaf());

        let properties = tileset.extras.child("properties").unwrap();
        assert_eq!(properties.text, None);
        assert_eq!(properties.children.len(), 2);
        assert_eq!(properties.children[1].text.as_deref(), Some("line one\nline two"));

        assert_eq!(tileset.image.extras.attribute("trans"), Some("ff00ff"));

        let tile = tileset.tile(1).unwrap();
        assert!(tile.object_group.is_none());
        assert_eq!(tile.extras.attribute("type"), Some("Spike"));
        assert_eq!(tile.extras.attribute("probability"), Some("0.5"));
        let damage = &tile.extras.child("properties").unwrap().children[0];
        assert_eq!(damage.attribute("value"), Some("3"));
    }

    #[test]
    fn test_wang_tile_extra_attribute_rejected() {
        let result = parse(
            r##"<tileset tilewidth="16" tileheight="16" tilecount="4" columns="2">
 <image source="mini.png" width="32" height="32"/>
 <wangsets>
  <wangset name="Land" type="mixed" tile="-1">
   <wangcolor name="" color="#ff0000" tile="-1" probability="1"/>
   <wangtile tileid="1" wangid="1,1,1,1,1,1,1,1" hflip="true"/>
  </wangset>
 </wangsets>
</tileset>"##,
        );
        assert!(matches!(result, Err(TsxError::Format(msg)) if msg.contains("hflip")));
    }

    #[test]
    fn test_non_finite_probability_rejected() {
        for probability in ["NaN", "inf", "-1"] {
            let xml = format!(
                r##"<tileset tilewidth="16" tileheight="16" tilecount="4" columns="2">
 <image source="mini.png" width="32" height="32"/>
 <wangsets>
  <wangset name="Land" type="mixed" tile="-1">
   <wangcolor name="" color="#ff0000" tile="-1" probability="{probability}"/>
  </wangset>
 </wangsets>
</tileset>"##
            );
            let result = parse(&xml);
            assert!(
                matches!(result, Err(TsxError::Format(ref msg)) if msg.contains("probability")),
                "{probability} was accepted"
            );
        }
    }
}
