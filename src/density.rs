//! Density table for Android launcher icons
//!
//! Maps each `mipmap-*` resource folder to the pixel size of the launcher icon
//! it holds. The default table is embedded as JSON; a replacement table can be
//! read from a file with the same shape.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Resource directory relative to the output root, as laid out by a standard
/// Android application module.
pub const RES_DIR: &str = "android/app/src/main/res";

const DEFAULT_DENSITIES_JSON: &str = r#"
[
  { "folder": "mipmap-mdpi", "size": 48 },
  { "folder": "mipmap-hdpi", "size": 72 },
  { "folder": "mipmap-xhdpi", "size": 96 },
  { "folder": "mipmap-xxhdpi", "size": 144 },
  { "folder": "mipmap-xxxhdpi", "size": 192 }
]
"#;

/// One row of the density table
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Density {
    /// Folder name under the resource directory (e.g. "mipmap-hdpi")
    pub folder: String,

    /// Width and height of the icon in pixels
    pub size: u32,
}

/// Immutable list of densities handed to the generator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DensityTable {
    entries: Vec<Density>,
}

impl DensityTable {
    /// Build a table from explicit entries. Zero-sized entries are rejected.
    pub fn new(entries: Vec<Density>) -> Result<Self> {
        if let Some(bad) = entries.iter().find(|d| d.size == 0) {
            anyhow::bail!("Density {} has size 0", bad.folder);
        }
        Ok(Self { entries })
    }

    /// Parse a JSON array of `{ "folder": ..., "size": ... }` objects
    pub fn from_json(json: &str) -> Result<Self> {
        let entries: Vec<Density> =
            serde_json::from_str(json).context("Failed to parse density table")?;
        Self::new(entries)
    }

    /// Load a table from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read density table {}", path.display()))?;
        Self::from_json(&json)
    }

    pub fn entries(&self) -> &[Density] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for DensityTable {
    fn default() -> Self {
        // The embedded table is a constant; a parse failure here is a programming error.
        Self::from_json(DEFAULT_DENSITIES_JSON).expect("embedded density table is valid")
    }
}
