//! Loader configuration
//!
//! Options are plain serde data so tools can keep them in a TOML file:
//!
//! ```toml
//! invalid_entries = "drop"
//! image = "require"
//! ```

use crate::TsxError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// What to do with an entry (tile, collision object, wang tile) that
/// violates an invariant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidEntryPolicy {
    /// Fail the whole load on the first invalid entry
    #[default]
    Abort,
    /// Remove the entry and report it as a diagnostic
    Drop,
}

/// How the referenced sprite sheet is checked when loading from a file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImagePolicy {
    /// Report a missing image as a diagnostic, keep the tileset
    #[default]
    Check,
    /// Fail the load when the image is missing
    Require,
    /// Do not touch the filesystem
    Skip,
}

/// Options controlling how strictly a tileset is loaded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LoadOptions {
    #[serde(default)]
    pub invalid_entries: InvalidEntryPolicy,
    #[serde(default)]
    pub image: ImagePolicy,
}

impl LoadOptions {
    /// Abort on invalid entries, report a missing image
    pub fn strict() -> Self {
        Self::default()
    }

    /// Drop invalid entries, report a missing image
    pub fn lenient() -> Self {
        Self {
            invalid_entries: InvalidEntryPolicy::Drop,
            ..Self::default()
        }
    }

    pub fn with_invalid_entries(mut self, policy: InvalidEntryPolicy) -> Self {
        self.invalid_entries = policy;
        self
    }

    pub fn with_image(mut self, policy: ImagePolicy) -> Self {
        self.image = policy;
        self
    }

    /// Parse options from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, TsxError> {
        toml::from_str(content).map_err(|e| TsxError::Config(e.to_string()))
    }

    /// Load options from a TOML file
    pub fn load(path: &Path) -> Result<Self, TsxError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Serialize options to TOML text
    pub fn to_toml_string(&self) -> Result<String, TsxError> {
        toml::to_string(self).map_err(|e| TsxError::Config(e.to_string()))
    }
}
