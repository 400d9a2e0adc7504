//! Tileset validation logic

use crate::TsxError;
use std::fmt;
use tilekit_core::TilesetDescriptor;

/// What a violation is about
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViolationTarget {
    /// Tile size, image size, column or tile count (cannot be dropped)
    Grid,
    /// A `<tile>` entry
    Tile(u32),
    /// A `<wangtile>` entry in the set at `set` (index into `wang_sets`)
    WangTile { set: usize, tile: u32 },
    /// A representative tile of a Wang set or one of its colours
    WangSetTile { set: usize },
    /// A `<tile>` the parser left out of the model (repeated id, several
    /// collision objects); an entry kept under the same id is unaffected
    SkippedTile(u32),
    /// A repeated `<wangtile>`; the first entry for the tile is kept
    SkippedWangTile { set: usize, tile: u32 },
}

/// A broken invariant, tagged with the entry it belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub target: ViolationTarget,
    pub message: String,
}

impl Violation {
    pub fn new(target: ViolationTarget, message: impl Into<String>) -> Self {
        Self {
            target,
            message: message.into(),
        }
    }

    /// Grid-level violations always abort the load
    pub fn is_grid_level(&self) -> bool {
        self.target == ViolationTarget::Grid
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Validate a tileset, returning the first violation as an error
pub fn validate_tileset(tileset: &TilesetDescriptor) -> Result<(), TsxError> {
    match collect_violations(tileset).into_iter().next() {
        Some(violation) => Err(TsxError::Validation(violation)),
        None => Ok(()),
    }
}

/// Collect every invariant violation, grid-level ones first
pub fn collect_violations(tileset: &TilesetDescriptor) -> Vec<Violation> {
    let mut violations = Vec::new();
    check_grid(tileset, &mut violations);
    check_tiles(tileset, &mut violations);
    check_wang_sets(tileset, &mut violations);
    violations
}

fn check_grid(tileset: &TilesetDescriptor, out: &mut Vec<Violation>) {
    let grid = |message: String| Violation::new(ViolationTarget::Grid, message);

    if tileset.tile_width == 0 || tileset.tile_height == 0 {
        out.push(grid(format!(
            "Tile size {}x{} must be non-zero",
            tileset.tile_width, tileset.tile_height
        )));
        // The remaining grid checks divide by the tile size
        return;
    }

    let image = &tileset.image;
    if image.width % tileset.tile_width != 0 || image.height % tileset.tile_height != 0 {
        out.push(grid(format!(
            "Image size {}x{} is not a multiple of the tile size {}x{}",
            image.width, image.height, tileset.tile_width, tileset.tile_height
        )));
    }

    let expected_width = tileset.columns as u64 * tileset.tile_width as u64;
    if image.width as u64 != expected_width {
        out.push(grid(format!(
            "Image width {} does not match {} columns of {} pixels",
            image.width, tileset.columns, tileset.tile_width
        )));
    }

    if tileset.tile_count as u64 > tileset.grid_capacity() {
        out.push(grid(format!(
            "Tile count {} exceeds the {}x{} grid",
            tileset.tile_count,
            tileset.columns,
            tileset.rows()
        )));
    }
}

fn check_tiles(tileset: &TilesetDescriptor, out: &mut Vec<Violation>) {
    for (&index, tile) in &tileset.tiles {
        if !tileset.contains_tile(index) {
            out.push(Violation::new(
                ViolationTarget::Tile(index),
                format!(
                    "Tile {} is out of range (tile count {})",
                    index, tileset.tile_count
                ),
            ));
            continue;
        }

        if let Some(rect) = tile.collision_rect() {
            if !rect.fits_within(tileset.tile_width, tileset.tile_height) {
                out.push(Violation::new(
                    ViolationTarget::Tile(index),
                    format!(
                        "Tile {} collision rectangle ({}, {}, {}, {}) is outside the {}x{} tile",
                        index,
                        rect.x,
                        rect.y,
                        rect.width,
                        rect.height,
                        tileset.tile_width,
                        tileset.tile_height
                    ),
                ));
            }
        }
    }
}

fn check_wang_sets(tileset: &TilesetDescriptor, out: &mut Vec<Violation>) {
    let representative_ok =
        |tile: i32| tile == -1 || (tile >= 0 && tileset.contains_tile(tile as u32));

    for (set_index, set) in tileset.wang_sets.iter().enumerate() {
        if !representative_ok(set.tile) {
            out.push(Violation::new(
                ViolationTarget::WangSetTile { set: set_index },
                format!(
                    "Wang set '{}' representative tile {} is out of range",
                    set.name, set.tile
                ),
            ));
        }

        for color in &set.colors {
            if !representative_ok(color.tile) {
                out.push(Violation::new(
                    ViolationTarget::WangSetTile { set: set_index },
                    format!(
                        "Wang set '{}' colour '{}' representative tile {} is out of range",
                        set.name, color.name, color.tile
                    ),
                ));
            }
        }

        for (&tile, wang_id) in &set.tiles {
            let target = ViolationTarget::WangTile {
                set: set_index,
                tile,
            };

            if !tileset.contains_tile(tile) {
                out.push(Violation::new(
                    target,
                    format!(
                        "Wang set '{}' references tile {} which exceeds the last tile {}",
                        set.name,
                        tile,
                        tileset.tile_count as i64 - 1
                    ),
                ));
                continue;
            }

            if wang_id.max_color() as usize > set.colors.len() {
                out.push(Violation::new(
                    target,
                    format!(
                        "Wang set '{}' tile {} uses colour {} but only {} colours are declared",
                        set.name,
                        tile,
                        wang_id.max_color(),
                        set.colors.len()
                    ),
                ));
            }
        }
    }
}

/// Remove the entries named by entry-level violations
///
/// Grid-level violations are ignored here; callers must reject those.
/// Skipped entries never made it into the model and leave it untouched.
pub fn drop_invalid_entries(tileset: &mut TilesetDescriptor, violations: &[Violation]) {
    for violation in violations {
        match violation.target {
            ViolationTarget::Grid
            | ViolationTarget::SkippedTile(_)
            | ViolationTarget::SkippedWangTile { .. } => {}
            ViolationTarget::Tile(index) => {
                tileset.tiles.remove(&index);
            }
            ViolationTarget::WangTile { set, tile } => {
                if let Some(wang_set) = tileset.wang_sets.get_mut(set) {
                    wang_set.tiles.remove(&tile);
                }
            }
            ViolationTarget::WangSetTile { set } => {
                let tile_count = tileset.tile_count;
                if let Some(wang_set) = tileset.wang_sets.get_mut(set) {
                    let in_range = |tile: i32| tile >= 0 && (tile as u32) < tile_count;
                    if !in_range(wang_set.tile) {
                        wang_set.tile = -1;
                    }
                    for color in &mut wang_set.colors {
                        if !in_range(color.tile) {
                            color.tile = -1;
                        }
                    }
                }
            }
        }
    }
}
