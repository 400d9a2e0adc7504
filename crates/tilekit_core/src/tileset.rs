//! Tileset descriptor: a sprite sheet sliced into a uniform grid

use crate::collision::{CollisionRect, ObjectGroup};
use crate::extras::Extras;
use crate::wang::WangSet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// The sprite sheet a tileset slices
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TilesetImage {
    /// Path to the image file, as written in the document (usually relative)
    pub source: String,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    #[serde(default, skip_serializing_if = "Extras::is_empty")]
    pub extras: Extras,
}

impl TilesetImage {
    pub fn new(source: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            source: source.into(),
            width,
            height,
            extras: Extras::default(),
        }
    }

    /// Resolve the image path against the directory holding the tileset file
    pub fn resolve(&self, base_dir: &Path) -> PathBuf {
        let source = Path::new(&self.source);
        if source.is_absolute() {
            source.to_path_buf()
        } else {
            base_dir.join(source)
        }
    }
}

/// Per-tile data (only tiles that carry something are stored)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TileData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_group: Option<ObjectGroup>,
    /// Class, probability, custom properties, animation frames
    #[serde(default, skip_serializing_if = "Extras::is_empty")]
    pub extras: Extras,
}

impl TileData {
    pub fn with_object_group(object_group: ObjectGroup) -> Self {
        Self {
            object_group: Some(object_group),
            extras: Extras::default(),
        }
    }

    /// The tile's collision rectangle, if it has one
    pub fn collision_rect(&self) -> Option<&CollisionRect> {
        self.object_group.as_ref().and_then(|g| g.rect())
    }
}

/// In-memory form of a `.tsx` tileset
///
/// Loaded once and then only read; every field is plain data so a loaded
/// descriptor can be shared between threads freely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(
    feature = "bevy",
    derive(bevy::asset::Asset, bevy::reflect::TypePath)
)]
pub struct TilesetDescriptor {
    pub name: String,
    /// Format version of the document
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Version of the editor that wrote the document
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tiled_version: Option<String>,
    /// Tile width in pixels
    pub tile_width: u32,
    /// Tile height in pixels
    pub tile_height: u32,
    /// Number of tiles in the tileset
    pub tile_count: u32,
    /// Number of tile columns in the image
    pub columns: u32,
    pub image: TilesetImage,
    /// Per-tile data keyed by tile index
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tiles: BTreeMap<u32, TileData>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub wang_sets: Vec<WangSet>,
    /// Tile offset, grid, transformations, custom properties
    #[serde(default, skip_serializing_if = "Extras::is_empty")]
    pub extras: Extras,
}

impl TilesetDescriptor {
    /// Create a tileset covering a whole image
    pub fn new(
        name: impl Into<String>,
        tile_width: u32,
        tile_height: u32,
        image: TilesetImage,
    ) -> Self {
        let columns = image.width.checked_div(tile_width).unwrap_or(0);
        let rows = image.height.checked_div(tile_height).unwrap_or(0);
        Self {
            name: name.into(),
            version: None,
            tiled_version: None,
            tile_width,
            tile_height,
            tile_count: columns.saturating_mul(rows),
            columns,
            image,
            tiles: BTreeMap::new(),
            wang_sets: Vec::new(),
            extras: Extras::default(),
        }
    }

    /// Number of tile rows in the image
    pub fn rows(&self) -> u32 {
        self.image.height.checked_div(self.tile_height).unwrap_or(0)
    }

    /// Number of grid cells the image provides
    pub fn grid_capacity(&self) -> u64 {
        self.columns as u64 * self.rows() as u64
    }

    /// Check if a tile index exists in this tileset
    pub fn contains_tile(&self, tile_index: u32) -> bool {
        tile_index < self.tile_count
    }

    /// Convert a tile index to (column, row), row-major
    pub fn tile_grid_position(&self, tile_index: u32) -> Option<(u32, u32)> {
        if !self.contains_tile(tile_index) || self.columns == 0 {
            return None;
        }
        Some((tile_index % self.columns, tile_index / self.columns))
    }

    /// Pixel rectangle of a tile inside the sprite sheet
    ///
    /// `None` when the tile is out of range or its pixel position does not
    /// fit in `i32`.
    pub fn tile_source_rect(&self, tile_index: u32) -> Option<CollisionRect> {
        let (col, row) = self.tile_grid_position(tile_index)?;
        let pixel = |cell: u32, size: u32| {
            cell.checked_mul(size)
                .and_then(|value| i32::try_from(value).ok())
        };
        Some(CollisionRect::new(
            pixel(col, self.tile_width)?,
            pixel(row, self.tile_height)?,
            i32::try_from(self.tile_width).ok()?,
            i32::try_from(self.tile_height).ok()?,
        ))
    }

    /// Get per-tile data
    pub fn tile(&self, tile_index: u32) -> Option<&TileData> {
        self.tiles.get(&tile_index)
    }

    /// Get the collision rectangle of a tile (None for tiles without one)
    pub fn collision_rect(&self, tile_index: u32) -> Option<&CollisionRect> {
        self.tiles.get(&tile_index).and_then(|t| t.collision_rect())
    }

    /// Check if a tile has collision
    pub fn tile_has_collision(&self, tile_index: u32) -> bool {
        self.collision_rect(tile_index).is_some()
    }

    /// Iterate over all tiles carrying a collision rectangle
    pub fn collision_tiles(&self) -> impl Iterator<Item = (u32, &CollisionRect)> + '_ {
        self.tiles
            .iter()
            .filter_map(|(&index, tile)| tile.collision_rect().map(|rect| (index, rect)))
    }

    /// Attach an object group to a tile
    pub fn set_object_group(&mut self, tile_index: u32, object_group: ObjectGroup) {
        self.tiles.entry(tile_index).or_default().object_group = Some(object_group);
    }

    /// Find a Wang set by name
    pub fn wang_set(&self, name: &str) -> Option<&WangSet> {
        self.wang_sets.iter().find(|s| s.name == name)
    }

    pub fn add_wang_set(&mut self, wang_set: WangSet) {
        self.wang_sets.push(wang_set);
    }
}
