//! Generation settings with sensible defaults and RON persistence.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Errors that can occur when loading or saving settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// Failed to read the settings file from disk.
    #[error("failed to read settings: {0}")]
    Read(#[source] std::io::Error),

    /// Failed to write the settings file to disk.
    #[error("failed to write settings: {0}")]
    Write(#[source] std::io::Error),

    /// Failed to parse RON content.
    #[error("failed to parse settings: {0}")]
    Parse(#[source] ron::error::SpannedError),

    /// Failed to serialize settings to RON.
    #[error("failed to serialize settings: {0}")]
    Serialize(#[source] ron::Error),
}

/// Tunable world-shape parameters.
///
/// Every field has a default; settings files only need to name what they
/// change.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GenerationSettings {
    /// World height in blocks; valid Y is `0..max_height`.
    pub max_height: u32,
    /// Sea level; empty space at or below it fills with water. Also the
    /// water table for groundwater-saturated layers.
    pub sea_level: i32,
    /// Side length of one biome territory cell, in columns.
    pub cell_size: u32,
    /// View/load distance in chunks; sizes the sample-store cache so every
    /// chunk in the active radius stays cached.
    pub view_distance: u32,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            max_height: 512,
            sea_level: 256,
            cell_size: 64,
            view_distance: 12,
        }
    }
}

impl GenerationSettings {
    /// Loads settings from a RON file.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Read`] or [`SettingsError::Parse`].
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path).map_err(SettingsError::Read)?;
        ron::from_str(&content).map_err(SettingsError::Parse)
    }

    /// Saves settings to a RON file.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Serialize`] or [`SettingsError::Write`].
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let content = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(SettingsError::Serialize)?;
        std::fs::write(path, content).map_err(SettingsError::Write)
    }
}
