//! Wang sets: per-tile edge/corner terrain codes used for auto-tiling
//!
//! Positions follow the editor's clockwise indexing starting at the top:
//!   7|0|1
//!   6|X|2
//!   5|4|3
//! - Even indices (0,2,4,6) = Edges (N, E, S, W)
//! - Odd indices (1,3,5,7) = Corners (NE, SE, SW, NW)
//!
//! A wang value of 0 means "no colour", value `k` refers to the set's
//! `k`-th declared colour.

use crate::extras::Extras;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Number of positions in a Wang ID
pub const WANG_ID_LEN: usize = 8;

/// Compass position around a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WangDirection {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

impl WangDirection {
    /// All directions in Wang ID order
    pub const ALL: [WangDirection; WANG_ID_LEN] = [
        WangDirection::N,
        WangDirection::NE,
        WangDirection::E,
        WangDirection::SE,
        WangDirection::S,
        WangDirection::SW,
        WangDirection::W,
        WangDirection::NW,
    ];

    /// Position of this direction inside a Wang ID
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// The position on a neighbour that faces us
    pub fn opposite(self) -> Self {
        Self::ALL[(self.index() + 4) % WANG_ID_LEN]
    }

    /// Next direction clockwise
    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % WANG_ID_LEN]
    }

    /// Previous direction counter-clockwise
    pub fn previous(self) -> Self {
        Self::ALL[(self.index() + WANG_ID_LEN - 1) % WANG_ID_LEN]
    }

    /// Corners are the odd positions
    pub fn is_corner(self) -> bool {
        self.index() % 2 == 1
    }

    pub fn name(self) -> &'static str {
        match self {
            WangDirection::N => "N",
            WangDirection::NE => "NE",
            WangDirection::E => "E",
            WangDirection::SE => "SE",
            WangDirection::S => "S",
            WangDirection::SW => "SW",
            WangDirection::W => "W",
            WangDirection::NW => "NW",
        }
    }
}

/// Errors from parsing Wang IDs and colours
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WangParseError {
    #[error("expected {WANG_ID_LEN} comma separated values, found {0}")]
    WrongLength(usize),
    #[error("invalid wang value '{0}'")]
    InvalidValue(String),
    #[error("invalid colour '{0}', expected #rrggbb or #aarrggbb")]
    InvalidColor(String),
}

/// Terrain colour values at all 8 positions of a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct WangId(pub [u8; WANG_ID_LEN]);

impl WangId {
    pub const EMPTY: Self = WangId([0; WANG_ID_LEN]);

    /// Create a Wang ID with all positions set to one colour
    pub fn filled(color: u8) -> Self {
        WangId([color; WANG_ID_LEN])
    }

    pub fn get(&self, direction: WangDirection) -> u8 {
        self.0[direction.index()]
    }

    pub fn set(&mut self, direction: WangDirection, color: u8) {
        self.0[direction.index()] = color;
    }

    pub fn values(&self) -> &[u8; WANG_ID_LEN] {
        &self.0
    }

    /// Largest colour value referenced
    pub fn max_color(&self) -> u8 {
        self.0.iter().copied().max().unwrap_or(0)
    }

    /// Check if any position carries a colour
    pub fn has_any(&self) -> bool {
        self.0.iter().any(|&c| c != 0)
    }

    /// Returns the colour if every position carries the same one
    pub fn is_uniform(&self) -> Option<u8> {
        let first = self.0[0];
        self.0.iter().all(|&c| c == first).then_some(first)
    }

    /// Iterate `(direction, colour)` pairs in clockwise order
    pub fn iter(&self) -> impl Iterator<Item = (WangDirection, u8)> + '_ {
        WangDirection::ALL.iter().map(move |&d| (d, self.get(d)))
    }
}

impl From<[u8; WANG_ID_LEN]> for WangId {
    fn from(values: [u8; WANG_ID_LEN]) -> Self {
        WangId(values)
    }
}

impl FromStr for WangId {
    type Err = WangParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != WANG_ID_LEN {
            return Err(WangParseError::WrongLength(parts.len()));
        }

        let mut values = [0u8; WANG_ID_LEN];
        for (slot, part) in values.iter_mut().zip(&parts) {
            *slot = part
                .parse()
                .map_err(|_| WangParseError::InvalidValue(part.to_string()))?;
        }
        Ok(WangId(values))
    }
}

impl fmt::Display for WangId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, value) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", value)?;
        }
        Ok(())
    }
}

/// 8-bit RGBA colour as written by the editor (`#rrggbb` / `#aarrggbb`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const RED: Self = Self::rgb(255, 0, 0);
}

impl Default for Color {
    fn default() -> Self {
        Self::RED
    }
}

impl FromStr for Color {
    type Err = WangParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || WangParseError::InvalidColor(s.to_string());
        let hex = s.strip_prefix('#').unwrap_or(s);
        if !hex.is_ascii() {
            return Err(invalid());
        }
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());

        match hex.len() {
            6 => Ok(Color::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Ok(Color::rgba(byte(2)?, byte(4)?, byte(6)?, byte(0)?)),
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.a, self.r, self.g, self.b)
        }
    }
}

/// Which positions of a tile a Wang set uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum WangSetType {
    /// 4 corners per tile
    Corner,
    /// 4 edges per tile
    Edge,
    /// 4 corners + 4 edges per tile
    #[default]
    Mixed,
}

impl WangSetType {
    /// Check if this set type uses a position
    pub fn uses(&self, direction: WangDirection) -> bool {
        match self {
            WangSetType::Corner => direction.is_corner(),
            WangSetType::Edge => !direction.is_corner(),
            WangSetType::Mixed => true,
        }
    }

    /// Number of positions used by this set type
    pub fn position_count(&self) -> usize {
        match self {
            WangSetType::Corner | WangSetType::Edge => 4,
            WangSetType::Mixed => 8,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WangSetType::Corner => "corner",
            WangSetType::Edge => "edge",
            WangSetType::Mixed => "mixed",
        }
    }

    pub fn from_attr(value: &str) -> Option<Self> {
        match value {
            "corner" => Some(WangSetType::Corner),
            "edge" => Some(WangSetType::Edge),
            "mixed" => Some(WangSetType::Mixed),
            _ => None,
        }
    }
}

/// A colour (terrain class) declared in a Wang set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WangColor {
    pub name: String,
    pub color: Color,
    /// Representative tile, -1 for none
    pub tile: i32,
    /// Relative weight used when several tiles match
    pub probability: f32,
    #[serde(default, skip_serializing_if = "Extras::is_empty")]
    pub extras: Extras,
}

impl WangColor {
    pub fn new(name: impl Into<String>, color: Color) -> Self {
        Self {
            name: name.into(),
            color,
            tile: -1,
            probability: 1.0,
            extras: Extras::default(),
        }
    }

    /// A weight must be a finite, non-negative number
    pub fn is_valid_probability(probability: f32) -> bool {
        probability.is_finite() && probability >= 0.0
    }
}

/// A named adjacency-class set attached to a tileset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WangSet {
    pub name: String,
    #[serde(default)]
    pub set_type: WangSetType,
    /// Representative tile, -1 for none
    pub tile: i32,
    #[serde(default)]
    pub colors: Vec<WangColor>,
    /// Wang IDs keyed by tile index
    #[serde(default)]
    pub tiles: BTreeMap<u32, WangId>,
    /// Class, custom properties
    #[serde(default, skip_serializing_if = "Extras::is_empty")]
    pub extras: Extras,
}

impl WangSet {
    pub fn new(name: impl Into<String>, set_type: WangSetType) -> Self {
        Self {
            name: name.into(),
            set_type,
            tile: -1,
            colors: Vec::new(),
            tiles: BTreeMap::new(),
            extras: Extras::default(),
        }
    }

    /// Declare a colour, returning its wang value (1-based)
    pub fn add_color(&mut self, color: WangColor) -> u8 {
        self.colors.push(color);
        self.colors.len() as u8
    }

    /// Get the colour a wang value refers to (0 = none)
    pub fn color_for(&self, value: u8) -> Option<&WangColor> {
        if value == 0 {
            return None;
        }
        self.colors.get(value as usize - 1)
    }

    /// Get colour value by name
    pub fn color_value(&self, name: &str) -> Option<u8> {
        self.colors
            .iter()
            .position(|c| c.name == name)
            .map(|i| i as u8 + 1)
    }

    pub fn set_tile(&mut self, tile_index: u32, wang_id: WangId) {
        self.tiles.insert(tile_index, wang_id);
    }

    pub fn get(&self, tile_index: u32) -> Option<WangId> {
        self.tiles.get(&tile_index).copied()
    }

    /// All tiles whose used positions carry one colour (useful as "fill" tiles)
    pub fn uniform_tiles(&self, color: u8) -> Vec<u32> {
        self.tiles
            .iter()
            .filter(|(_, id)| {
                id.iter()
                    .filter(|(d, _)| self.set_type.uses(*d))
                    .all(|(_, c)| c == color)
            })
            .map(|(&tile, _)| tile)
            .collect()
    }
}
