//! Bevy asset loader for `.tsx` tilesets
//!
//! Enabled with the `bevy` feature. The loader runs the same parse and
//! validation as [`load_tileset_from_bytes`](crate::load_tileset_from_bytes)
//! and yields a [`TilesetDescriptor`] asset.
//!
//! # Example
//!
//! ```rust,ignore
//! use bevy::prelude::*;
//! use tilekit_core::TilesetDescriptor;
//! use tilekit_tsx::TilesetAssetPlugin;
//!
//! fn setup(asset_server: Res<AssetServer>) {
//!     let tileset: Handle<TilesetDescriptor> = asset_server.load("Tiled/tileset-tiles.tsx");
//! }
//! ```

use crate::{load_tileset_from_bytes, LoadOptions, TsxError};
use bevy::app::{App, Plugin};
use bevy::asset::io::Reader;
use bevy::asset::{AssetApp, AssetLoader, LoadContext};
use tilekit_core::TilesetDescriptor;
use tracing::warn;

/// Registers the tileset asset type and its loader
pub struct TilesetAssetPlugin;

impl Plugin for TilesetAssetPlugin {
    fn build(&self, app: &mut App) {
        app.init_asset::<TilesetDescriptor>()
            .init_asset_loader::<TsxAssetLoader>();
    }
}

/// Asset loader for Tiled tileset files
///
/// Load settings are [`LoadOptions`]. Asset paths are virtual, so the image
/// policy is not applied here; the sprite sheet is loaded separately by
/// whoever renders the tileset.
#[derive(Default)]
pub struct TsxAssetLoader;

impl AssetLoader for TsxAssetLoader {
    type Asset = TilesetDescriptor;
    type Settings = LoadOptions;
    type Error = TsxError;

    async fn load(
        &self,
        reader: &mut dyn Reader,
        settings: &Self::Settings,
        load_context: &mut LoadContext<'_>,
    ) -> Result<Self::Asset, Self::Error> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes).await?;

        let report = load_tileset_from_bytes(&bytes, settings)?;
        for diagnostic in &report.diagnostics {
            warn!("{}: {}", load_context.path().display(), diagnostic);
        }
        Ok(report.tileset)
    }

    fn extensions(&self) -> &[&str] {
        &["tsx"]
    }
}
