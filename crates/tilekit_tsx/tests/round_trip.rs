//! Property tests over generated tilesets

use quickcheck::{quickcheck, Arbitrary, Gen};
use tilekit_core::{
    Color, CollisionRect, DrawOrder, ObjectGroup, RawElement, TileData, TilesetDescriptor,
    TilesetImage, WangColor, WangId, WangSet, WangSetType, WANG_ID_LEN,
};
use tilekit_tsx::{
    collect_violations, parse_tileset, parse_tileset_with, to_tsx_string, LoadOptions,
};

const NAMES: &[&str] = &[
    "",
    "Land",
    "Tree Canopy",
    "water & sand",
    "<edge>",
    "two\nlines",
    "tab\tstop",
];

fn below(g: &mut Gen, bound: u32) -> u32 {
    u32::arbitrary(g) % bound
}

fn name(g: &mut Gen) -> String {
    g.choose(NAMES).copied().unwrap_or_default().to_string()
}

/// A tileset that satisfies every structural invariant
#[derive(Debug, Clone)]
struct ValidTileset(TilesetDescriptor);

impl Arbitrary for ValidTileset {
    fn arbitrary(g: &mut Gen) -> Self {
        let tile_width = 1 + below(g, 32);
        let tile_height = 1 + below(g, 32);
        let columns = 1 + below(g, 16);
        let rows = 1 + below(g, 16);
        let image = TilesetImage::new(
            "sheet.png",
            columns * tile_width,
            rows * tile_height,
        );

        let mut tileset = TilesetDescriptor::new(name(g), tile_width, tile_height, image);
        tileset.tile_count = 1 + below(g, columns * rows);
        if bool::arbitrary(g) {
            tileset.version = Some("1.10".to_string());
            tileset.tiled_version = Some("1.11.2".to_string());
        }
        if bool::arbitrary(g) {
            let offset = RawElement::new("tileoffset")
                .with_attribute("x", "0")
                .with_attribute("y", below(g, 8).to_string());
            tileset.extras.push_child(0, offset);
        }

        for _ in 0..below(g, 6) {
            let index = below(g, tileset.tile_count);
            let x = below(g, tile_width);
            let y = below(g, tile_height);
            let rect = CollisionRect::new(
                x as i32,
                y as i32,
                below(g, tile_width - x + 1) as i32,
                below(g, tile_height - y + 1) as i32,
            );
            let mut group = ObjectGroup::with_rect(1 + below(g, 8), below(g, 8), rect);
            if bool::arbitrary(g) {
                group.draw_order = DrawOrder::TopDown;
            }
            if bool::arbitrary(g) {
                group.id = None;
            }
            if bool::arbitrary(g) {
                group.object = None;
            }
            let mut tile = TileData::with_object_group(group);
            if bool::arbitrary(g) {
                tile.extras.push_attribute(1, "type", name(g));
            }
            tileset.tiles.insert(index, tile);
        }

        for _ in 0..below(g, 3) {
            let set_type = *g
                .choose(&[WangSetType::Corner, WangSetType::Edge, WangSetType::Mixed])
                .unwrap_or(&WangSetType::Mixed);
            let mut set = WangSet::new(name(g), set_type);
            if bool::arbitrary(g) {
                set.tile = below(g, tileset.tile_count) as i32;
            }

            let color_count = below(g, 4);
            for _ in 0..color_count {
                let rgba = u32::arbitrary(g).to_be_bytes();
                let value = Color::rgba(rgba[0], rgba[1], rgba[2], rgba[3]);
                let mut color = WangColor::new(name(g), value);
                color.probability = *g.choose(&[1.0f32, 0.5, 0.25, 2.0]).unwrap_or(&1.0);
                set.add_color(color);
            }

            for _ in 0..below(g, 10) {
                let mut values = [0u8; WANG_ID_LEN];
                for value in &mut values {
                    *value = below(g, color_count + 1) as u8;
                }
                set.set_tile(below(g, tileset.tile_count), WangId(values));
            }
            tileset.add_wang_set(set);
        }

        ValidTileset(tileset)
    }
}

quickcheck! {
    fn generated_tilesets_hold_invariants(tileset: ValidTileset) -> bool {
        let tileset = tileset.0;
        collect_violations(&tileset).is_empty()
            && tileset.image.width == tileset.columns * tileset.tile_width
            && tileset.tile_count as u64 <= tileset.grid_capacity()
    }

    fn write_then_parse_is_identity(tileset: ValidTileset) -> bool {
        let tileset = tileset.0;
        match to_tsx_string(&tileset).and_then(|text| parse_tileset(&text)) {
            Ok(parsed) => parsed == tileset,
            Err(_) => false,
        }
    }

    fn writing_is_stable(tileset: ValidTileset) -> bool {
        let Ok(first) = to_tsx_string(&tileset.0) else {
            return false;
        };
        let Ok(parsed) = parse_tileset(&first) else {
            return false;
        };
        to_tsx_string(&parsed).map(|second| second == first).unwrap_or(false)
    }

    fn dropping_removes_only_invalid_entries(tileset: ValidTileset, extra: u8) -> bool {
        let tileset = tileset.0;
        let mut broken = tileset.clone();
        let out_of_range = tileset.tile_count + extra as u32;
        let group = ObjectGroup::with_rect(1, 1, CollisionRect::new(0, 0, 1, 1));
        broken
            .tiles
            .insert(out_of_range, TileData::with_object_group(group));

        let Ok(text) = to_tsx_string(&broken) else {
            return false;
        };
        if parse_tileset(&text).is_ok() {
            return false;
        }
        match parse_tileset_with(&text, &LoadOptions::lenient()) {
            Ok(report) => report.diagnostics.len() == 1 && report.tileset == tileset,
            Err(_) => false,
        }
    }
}
