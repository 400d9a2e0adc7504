//! `.tsx` serialization
//!
//! Output follows the layout the editor itself writes: an XML declaration,
//! one-space indentation and the editor's attribute order, so re-saving an
//! untouched file reproduces it. Content kept in [`Extras`] goes back at the
//! position it was read from.

use crate::TsxError;
use quick_xml::escape::escape;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::borrow::Cow;
use tilekit_core::{
    CollisionObject, DrawOrder, ExtraElement, Extras, ObjectGroup, RawElement, TileData,
    TilesetDescriptor, TilesetImage, WangColor, WangSet,
};

type XmlWriter = Writer<Vec<u8>>;

/// Serialize a tileset to `.tsx` text
pub fn to_tsx_string(tileset: &TilesetDescriptor) -> Result<String, TsxError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 1);
    write_tileset(&mut writer, tileset)?;

    let mut text = String::from_utf8(writer.into_inner())
        .map_err(|e| TsxError::Format(format!("Writer produced invalid UTF-8: {e}")))?;
    text.push('\n');
    Ok(text)
}

fn emit(writer: &mut XmlWriter, event: Event<'_>) -> Result<(), TsxError> {
    writer
        .write_event(event)
        .map_err(|e| TsxError::Format(format!("Failed to write XML: {e}")))
}

/// Escape an attribute value, including whitespace that attribute
/// normalization would otherwise turn into spaces
fn escape_attribute(value: &str) -> Cow<'_, str> {
    let escaped = escape(value);
    if !escaped.contains(|c: char| matches!(c, '\n' | '\r' | '\t')) {
        return escaped;
    }
    Cow::Owned(
        escaped
            .replace('\n', "&#10;")
            .replace('\r', "&#13;")
            .replace('\t', "&#9;"),
    )
}

fn push_attribute(start: &mut BytesStart<'_>, name: &str, value: &str) {
    let value = escape_attribute(value);
    start.push_attribute((name.as_bytes(), value.as_bytes()));
}

/// Build a start tag from modelled attributes, with kept attributes
/// inserted back at their original index
fn start_element<'a>(
    name: &'a str,
    known: Vec<(&'a str, String)>,
    extras: &'a Extras,
) -> BytesStart<'a> {
    let mut attributes = known;
    for extra in &extras.attributes {
        let index = extra.position.min(attributes.len());
        attributes.insert(index, (extra.name.as_str(), extra.value.clone()));
    }

    let mut start = BytesStart::new(name);
    for (key, value) in &attributes {
        push_attribute(&mut start, key, value);
    }
    start
}

/// Interleaves kept child elements with the modelled ones
struct Children<'a> {
    kept: &'a [ExtraElement],
    next: usize,
    written: usize,
}

impl<'a> Children<'a> {
    fn new(extras: &'a Extras) -> Self {
        Self {
            kept: &extras.children,
            next: 0,
            written: 0,
        }
    }

    fn flush_before_next(&mut self, writer: &mut XmlWriter) -> Result<(), TsxError> {
        while let Some(extra) = self.kept.get(self.next) {
            if extra.position > self.written {
                break;
            }
            write_raw(writer, &extra.element)?;
            self.next += 1;
            self.written += 1;
        }
        Ok(())
    }

    /// Called before writing each modelled child
    fn modelled(&mut self, writer: &mut XmlWriter) -> Result<(), TsxError> {
        self.flush_before_next(writer)?;
        self.written += 1;
        Ok(())
    }

    fn finish(self, writer: &mut XmlWriter) -> Result<(), TsxError> {
        for extra in &self.kept[self.next..] {
            write_raw(writer, &extra.element)?;
        }
        Ok(())
    }
}

/// Write an element whose only children are kept ones
fn write_with_extras(
    writer: &mut XmlWriter,
    name: &str,
    start: BytesStart<'_>,
    extras: &Extras,
) -> Result<(), TsxError> {
    if extras.children.is_empty() {
        return emit(writer, Event::Empty(start));
    }
    emit(writer, Event::Start(start))?;
    Children::new(extras).finish(writer)?;
    emit(writer, Event::End(BytesEnd::new(name)))
}

fn write_raw(writer: &mut XmlWriter, element: &RawElement) -> Result<(), TsxError> {
    let mut start = BytesStart::new(element.name.as_str());
    for (key, value) in &element.attributes {
        push_attribute(&mut start, key, value);
    }
    if element.is_leaf() {
        return emit(writer, Event::Empty(start));
    }

    emit(writer, Event::Start(start))?;
    if let Some(text) = &element.text {
        let escaped = escape(text.as_str()).replace('\r', "&#13;");
        emit(writer, Event::Text(BytesText::from_escaped(escaped)))?;
    }
    for child in &element.children {
        write_raw(writer, child)?;
    }
    emit(writer, Event::End(BytesEnd::new(element.name.as_str())))
}

fn write_tileset(writer: &mut XmlWriter, tileset: &TilesetDescriptor) -> Result<(), TsxError> {
    emit(
        writer,
        Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)),
    )?;

    let mut known = Vec::new();
    if let Some(version) = &tileset.version {
        known.push(("version", version.clone()));
    }
    if let Some(tiled_version) = &tileset.tiled_version {
        known.push(("tiledversion", tiled_version.clone()));
    }
    known.push(("name", tileset.name.clone()));
    known.push(("tilewidth", tileset.tile_width.to_string()));
    known.push(("tileheight", tileset.tile_height.to_string()));
    known.push(("tilecount", tileset.tile_count.to_string()));
    known.push(("columns", tileset.columns.to_string()));
    emit(
        writer,
        Event::Start(start_element("tileset", known, &tileset.extras)),
    )?;

    let mut children = Children::new(&tileset.extras);
    children.modelled(writer)?;
    write_image(writer, &tileset.image)?;

    for (&index, tile) in &tileset.tiles {
        children.modelled(writer)?;
        write_tile(writer, index, tile)?;
    }

    if !tileset.wang_sets.is_empty() {
        children.modelled(writer)?;
        emit(writer, Event::Start(BytesStart::new("wangsets")))?;
        for set in &tileset.wang_sets {
            write_wang_set(writer, set)?;
        }
        emit(writer, Event::End(BytesEnd::new("wangsets")))?;
    }
    children.finish(writer)?;

    emit(writer, Event::End(BytesEnd::new("tileset")))
}

fn write_image(writer: &mut XmlWriter, image: &TilesetImage) -> Result<(), TsxError> {
    let known = vec![
        ("source", image.source.clone()),
        ("width", image.width.to_string()),
        ("height", image.height.to_string()),
    ];
    let start = start_element("image", known, &image.extras);
    write_with_extras(writer, "image", start, &image.extras)
}

fn write_tile(writer: &mut XmlWriter, index: u32, tile: &TileData) -> Result<(), TsxError> {
    let start = start_element("tile", vec![("id", index.to_string())], &tile.extras);
    let Some(group) = &tile.object_group else {
        return write_with_extras(writer, "tile", start, &tile.extras);
    };

    emit(writer, Event::Start(start))?;
    let mut children = Children::new(&tile.extras);
    children.modelled(writer)?;
    write_object_group(writer, group)?;
    children.finish(writer)?;
    emit(writer, Event::End(BytesEnd::new("tile")))
}

fn write_object_group(writer: &mut XmlWriter, group: &ObjectGroup) -> Result<(), TsxError> {
    let mut known = Vec::new();
    // The editor only writes the non-default draw order
    if group.draw_order == DrawOrder::Index {
        known.push(("draworder", group.draw_order.as_str().to_string()));
    }
    if let Some(id) = group.id {
        known.push(("id", id.to_string()));
    }
    let start = start_element("objectgroup", known, &group.extras);

    let Some(object) = &group.object else {
        return write_with_extras(writer, "objectgroup", start, &group.extras);
    };

    emit(writer, Event::Start(start))?;
    let mut children = Children::new(&group.extras);
    children.modelled(writer)?;
    write_object(writer, object)?;
    children.finish(writer)?;
    emit(writer, Event::End(BytesEnd::new("objectgroup")))
}

fn write_object(writer: &mut XmlWriter, object: &CollisionObject) -> Result<(), TsxError> {
    let rect = object.rect;
    let mut known = vec![
        ("id", object.id.to_string()),
        ("x", rect.x.to_string()),
        ("y", rect.y.to_string()),
    ];
    // The editor leaves out zero sizes
    if rect.width != 0 {
        known.push(("width", rect.width.to_string()));
    }
    if rect.height != 0 {
        known.push(("height", rect.height.to_string()));
    }
    let start = start_element("object", known, &object.extras);
    write_with_extras(writer, "object", start, &object.extras)
}

fn write_wang_set(writer: &mut XmlWriter, set: &WangSet) -> Result<(), TsxError> {
    let known = vec![
        ("name", set.name.clone()),
        ("type", set.set_type.as_str().to_string()),
        ("tile", set.tile.to_string()),
    ];
    let start = start_element("wangset", known, &set.extras);

    if set.colors.is_empty() && set.tiles.is_empty() {
        return write_with_extras(writer, "wangset", start, &set.extras);
    }
    emit(writer, Event::Start(start))?;

    let mut children = Children::new(&set.extras);
    for color in &set.colors {
        children.modelled(writer)?;
        write_wang_color(writer, color)?;
    }

    for (&tile, wang_id) in &set.tiles {
        children.modelled(writer)?;
        let mut element = BytesStart::new("wangtile");
        push_attribute(&mut element, "tileid", &tile.to_string());
        push_attribute(&mut element, "wangid", &wang_id.to_string());
        emit(writer, Event::Empty(element))?;
    }
    children.finish(writer)?;

    emit(writer, Event::End(BytesEnd::new("wangset")))
}

fn write_wang_color(writer: &mut XmlWriter, color: &WangColor) -> Result<(), TsxError> {
    let known = vec![
        ("name", color.name.clone()),
        ("color", color.color.to_string()),
        ("tile", color.tile.to_string()),
        ("probability", color.probability.to_string()),
    ];
    let start = start_element("wangcolor", known, &color.extras);
    write_with_extras(writer, "wangcolor", start, &color.extras)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_tileset;
    use tilekit_core::{Color, CollisionRect, WangColor, WangId, WangSetType};

    fn tileset() -> TilesetDescriptor {
        let mut tileset =
            TilesetDescriptor::new("mini", 16, 16, TilesetImage::new("mini & co.png", 32, 32));
        let group = ObjectGroup::with_rect(2, 1, CollisionRect::new(0, 8, 16, 8));
        tileset.set_object_group(3, group);

        let mut set = WangSet::new("Land", WangSetType::Mixed);
        set.add_color(WangColor::new("", Color::RED));
        set.set_tile(0, WangId([0, 0, 1, 0, 0, 0, 0, 0]));
        tileset.add_wang_set(set);
        tileset
    }

    #[test]
    fn test_writes_declaration_and_layout() {
        let text = to_tsx_string(&tileset()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        assert_eq!(
            lines[1],
            r#"<tileset name="mini" tilewidth="16" tileheight="16" tilecount="4" columns="2">"#
        );
        assert_eq!(
            lines[2],
            r#" <image source="mini &amp; co.png" width="32" height="32"/>"#
        );
        assert_eq!(lines[3], r#" <tile id="3">"#);
        assert_eq!(lines[4], r#"  <objectgroup draworder="index" id="2">"#);
        assert_eq!(lines[5], r#"   <object id="1" x="0" y="8" width="16" height="8"/>"#);
        assert!(text.ends_with("</tileset>\n"));
    }

    #[test]
    fn test_writes_wang_sets() {
        let text = to_tsx_string(&tileset()).unwrap();
        assert!(text.contains(r#"  <wangset name="Land" type="mixed" tile="-1">"#));
        assert!(text.contains(
            r##"   <wangcolor name="" color="#ff0000" tile="-1" probability="1"/>"##
        ));
        assert!(text.contains(r#"   <wangtile tileid="0" wangid="0,0,1,0,0,0,0,0"/>"#));
    }

    #[test]
    fn test_omits_empty_wangsets() {
        let mut tileset = tileset();
        tileset.wang_sets.clear();
        let text = to_tsx_string(&tileset).unwrap();
        assert!(!text.contains("wangsets"));
    }

    #[test]
    fn test_escapes_whitespace_in_attributes() {
        let mut tileset = tileset();
        tileset.name = "a\nb\tc\rd".to_string();
        let text = to_tsx_string(&tileset).unwrap();
        assert!(text.contains(r#"name="a&#10;b&#9;c&#13;d""#));
        assert_eq!(parse_tileset(&text).unwrap().name, tileset.name);
    }

    #[test]
    fn test_kept_content_goes_back_in_place() {
        let mut tileset = tileset();
        tileset.extras.push_attribute(1, "class", "terrain");
        tileset.extras.push_child(
            0,
            RawElement::new("tileoffset")
                .with_attribute("x", "0")
                .with_attribute("y", "4"),
        );
        tileset.extras.push_child(
            4,
            RawElement::new("properties").with_child(
                RawElement::new("property")
                    .with_attribute("name", "notes")
                    .with_text("one & two"),
            ),
        );
        let tile = tileset.tiles.get_mut(&3).unwrap();
        tile.extras.push_attribute(1, "type", "Spike");

        let text = to_tsx_string(&tileset).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[1],
            r#"<tileset name="mini" class="terrain" tilewidth="16" tileheight="16" tilecount="4" columns="2">"#
        );
        assert_eq!(lines[2], r#" <tileoffset x="0" y="4"/>"#);
        assert!(lines[3].starts_with(" <image "));
        assert_eq!(lines[4], r#" <tile id="3" type="Spike">"#);
        assert!(text.contains(
            " <properties>\n  <property name=\"notes\">one &amp; two</property>\n </properties>\n</tileset>"
        ));

        assert_eq!(parse_tileset(&text).unwrap(), tileset);
    }
}
