//! Loader, validator and writer for Tiled `.tsx` tilesets
//!
//! This crate reads a tileset document into a
//! [`TilesetDescriptor`](tilekit_core::TilesetDescriptor), checks its
//! structural invariants and writes it back out in the editor's own layout.
//!
//! # Example
//!
//! ```rust,ignore
//! use tilekit_tsx::{load_tileset, LoadOptions};
//!
//! let report = load_tileset(Path::new("assets/tileset-tiles.tsx"), &LoadOptions::default())?;
//! for diagnostic in &report.diagnostics {
//!     eprintln!("warning: {diagnostic}");
//! }
//!
//! let tileset = report.tileset;
//! let land = tileset.wang_set("Land").unwrap();
//! println!("{} collision tiles", tileset.collision_tiles().count());
//! ```

mod config;
mod parse;
mod validate;
mod write;

#[cfg(feature = "bevy")]
mod asset;

#[cfg(feature = "bevy")]
pub use asset::{TilesetAssetPlugin, TsxAssetLoader};
pub use config::{ImagePolicy, InvalidEntryPolicy, LoadOptions};
pub use validate::{
    collect_violations, drop_invalid_entries, validate_tileset, Violation, ViolationTarget,
};
pub use write::to_tsx_string;

use std::path::{Path, PathBuf};
use thiserror::Error;
use tilekit_core::TilesetDescriptor;
use tracing::{debug, instrument, warn};

/// Errors that can occur when loading, validating or saving tilesets
#[derive(Debug, Error)]
pub enum TsxError {
    /// The document does not match the expected schema
    #[error("Format error: {0}")]
    Format(String),
    /// The document is well formed but a value breaks an invariant
    #[error("Validation error: {0}")]
    Validation(Violation),
    /// The referenced sprite sheet does not exist
    #[error("Resource not found: {}", .0.display())]
    ResourceNotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config error: {0}")]
    Config(String),
}

/// A loaded tileset together with the non-fatal findings of the load
#[derive(Debug)]
pub struct LoadReport {
    pub tileset: TilesetDescriptor,
    /// Missing image, dropped entries
    pub diagnostics: Vec<TsxError>,
}

impl LoadReport {
    /// Check if the load produced no diagnostics
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn into_tileset(self) -> TilesetDescriptor {
        self.tileset
    }
}

/// Parse a tileset from `.tsx` text, rejecting any invalid entry
pub fn parse_tileset(xml: &str) -> Result<TilesetDescriptor, TsxError> {
    parse_tileset_with(xml, &LoadOptions::strict()).map(LoadReport::into_tileset)
}

/// Parse a tileset from `.tsx` text with the given options
///
/// There is no file location to resolve the image against, so the image
/// policy is not applied.
pub fn parse_tileset_with(xml: &str, options: &LoadOptions) -> Result<LoadReport, TsxError> {
    let parsed = parse::parse_document(xml)?;

    let mut violations = parsed.violations;
    let mut tileset = parsed.tileset;
    violations.extend(collect_violations(&tileset));

    if let Some(grid) = violations.iter().find(|v| v.is_grid_level()) {
        return Err(TsxError::Validation(grid.clone()));
    }

    let mut diagnostics = Vec::new();
    if !violations.is_empty() {
        match options.invalid_entries {
            InvalidEntryPolicy::Abort => {
                return Err(TsxError::Validation(violations.swap_remove(0)));
            }
            InvalidEntryPolicy::Drop => {
                drop_invalid_entries(&mut tileset, &violations);
                for violation in violations {
                    warn!("Dropping invalid entry from '{}': {}", tileset.name, violation);
                    diagnostics.push(TsxError::Validation(violation));
                }
            }
        }
    }

    debug!(
        "Parsed tileset '{}': {} tiles, {} collision tiles, {} wang sets",
        tileset.name,
        tileset.tile_count,
        tileset.collision_tiles().count(),
        tileset.wang_sets.len()
    );

    Ok(LoadReport {
        tileset,
        diagnostics,
    })
}

/// Load a tileset from bytes
pub fn load_tileset_from_bytes(
    bytes: &[u8],
    options: &LoadOptions,
) -> Result<LoadReport, TsxError> {
    let xml = std::str::from_utf8(bytes)
        .map_err(|e| TsxError::Format(format!("Document is not valid UTF-8: {e}")))?;
    parse_tileset_with(xml, options)
}

/// Load a tileset from a `.tsx` file
///
/// The image source is resolved relative to the file's directory and
/// checked according to `options.image`.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn load_tileset(path: &Path, options: &LoadOptions) -> Result<LoadReport, TsxError> {
    let bytes = std::fs::read(path)?;
    let mut report = load_tileset_from_bytes(&bytes, options)?;

    if options.image != ImagePolicy::Skip {
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        let image_path = report.tileset.image.resolve(base_dir);
        if !image_path.is_file() {
            if options.image == ImagePolicy::Require {
                return Err(TsxError::ResourceNotFound(image_path));
            }
            warn!("Tileset image not found: {}", image_path.display());
            report
                .diagnostics
                .push(TsxError::ResourceNotFound(image_path));
        }
    }

    Ok(report)
}

/// Save a tileset to a `.tsx` file
pub fn save_tileset(tileset: &TilesetDescriptor, path: &Path) -> Result<(), TsxError> {
    let content = to_tsx_string(tileset)?;
    std::fs::write(path, content)?;
    Ok(())
}
