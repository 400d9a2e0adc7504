//! Collision data structures for tiles
//!
//! Tiles carry their collision geometry the way the editor stores it:
//! - `ObjectGroup` - The per-tile object layer (draw order, id)
//! - `CollisionObject` - A single object inside that layer
//! - `CollisionRect` - Axis-aligned rectangle in local tile pixels

use crate::extras::Extras;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in tile-local pixel coordinates (origin top-left)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CollisionRect {
    #[serde(default)]
    pub x: i32,
    #[serde(default)]
    pub y: i32,
    #[serde(default)]
    pub width: i32,
    #[serde(default)]
    pub height: i32,
}

impl CollisionRect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle covering a whole tile
    pub const fn full(tile_width: u32, tile_height: u32) -> Self {
        Self::new(0, 0, tile_width as i32, tile_height as i32)
    }

    /// Exclusive right edge
    pub fn right(&self) -> i64 {
        self.x as i64 + self.width as i64
    }

    /// Exclusive bottom edge
    pub fn bottom(&self) -> i64 {
        self.y as i64 + self.height as i64
    }

    /// Check that the rectangle lies inside `[0, tile_width] x [0, tile_height]`
    pub fn fits_within(&self, tile_width: u32, tile_height: u32) -> bool {
        self.x >= 0
            && self.y >= 0
            && self.width >= 0
            && self.height >= 0
            && self.right() <= tile_width as i64
            && self.bottom() <= tile_height as i64
    }

    /// Check if this rectangle covers the whole tile
    pub fn is_full_tile(&self, tile_width: u32, tile_height: u32) -> bool {
        *self == Self::full(tile_width, tile_height)
    }

    /// Check if the rectangle has no area
    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Center point in tile pixels
    pub fn center(&self) -> [f32; 2] {
        [
            self.x as f32 + self.width as f32 / 2.0,
            self.y as f32 + self.height as f32 / 2.0,
        ]
    }

    /// Half extents in tile pixels (what AABB colliders are built from)
    pub fn half_size(&self) -> [f32; 2] {
        [self.width as f32 / 2.0, self.height as f32 / 2.0]
    }

    /// Check if a point (tile pixels) is inside the rectangle
    pub fn contains_point(&self, x: f32, y: f32) -> bool {
        x >= self.x as f32
            && y >= self.y as f32
            && x < self.right() as f32
            && y < self.bottom() as f32
    }
}

/// Draw order of an object group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DrawOrder {
    /// Objects sorted by y coordinate
    #[default]
    TopDown,
    /// Objects drawn in the order they appear
    Index,
}

impl DrawOrder {
    /// Attribute value used in `.tsx` files
    pub fn as_str(&self) -> &'static str {
        match self {
            DrawOrder::TopDown => "topdown",
            DrawOrder::Index => "index",
        }
    }

    pub fn from_attr(value: &str) -> Option<Self> {
        match value {
            "topdown" => Some(DrawOrder::TopDown),
            "index" => Some(DrawOrder::Index),
            _ => None,
        }
    }
}

/// A collision object placed inside a tile's object group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollisionObject {
    /// Object id, unique within the tileset document
    pub id: u32,
    pub rect: CollisionRect,
    /// Name, class, custom properties
    #[serde(default, skip_serializing_if = "Extras::is_empty")]
    pub extras: Extras,
}

impl CollisionObject {
    pub fn new(id: u32, rect: CollisionRect) -> Self {
        Self {
            id,
            rect,
            extras: Extras::default(),
        }
    }
}

/// Per-tile object layer holding at most one collision rectangle
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ObjectGroup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u32>,
    #[serde(default)]
    pub draw_order: DrawOrder,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object: Option<CollisionObject>,
    #[serde(default, skip_serializing_if = "Extras::is_empty")]
    pub extras: Extras,
}

impl ObjectGroup {
    /// Create an index-ordered group with one rectangle, as the editor does
    pub fn with_rect(group_id: u32, object_id: u32, rect: CollisionRect) -> Self {
        Self {
            id: Some(group_id),
            draw_order: DrawOrder::Index,
            object: Some(CollisionObject::new(object_id, rect)),
            extras: Extras::default(),
        }
    }

    /// The collision rectangle, if any
    pub fn rect(&self) -> Option<&CollisionRect> {
        self.object.as_ref().map(|o| &o.rect)
    }
}
