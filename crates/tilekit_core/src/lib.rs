//! Core data structures for tilekit
//!
//! This crate provides the in-memory model of a Tiled tileset (`.tsx`):
//! - `TilesetDescriptor` - Grid dimensions, image reference and per-tile data
//! - `ObjectGroup` / `CollisionRect` - Optional per-tile collision rectangle
//! - `WangSet` / `WangId` - Edge and corner terrain codes for auto-tiling
//! - `Extras` - Unmodelled document content, kept for re-saving
//!
//! Loading and saving the `.tsx` format lives in `tilekit_tsx`.

mod collision;
mod extras;
mod tileset;
mod wang;

pub use collision::{CollisionObject, CollisionRect, DrawOrder, ObjectGroup};
pub use extras::{ExtraAttribute, ExtraElement, Extras, RawElement};
pub use tileset::{TileData, TilesetDescriptor, TilesetImage};
pub use wang::{
    Color, WangColor, WangDirection, WangId, WangParseError, WangSet, WangSetType, WANG_ID_LEN,
};
