// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Declarative GI configuration, stored as RON.
//!
//! Every field is optional. A minimal file looks like:
//!
//! ```ron
//! (
//!     enabled: true,
//!     bounce_count: 4,
//!     debug_visualization: "lighting",
//!     cascades: [(), (resolution: Some((32, 32, 32)))],
//! )
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;
use vxgi_core::{DebugVisualizationMode, Vec3};

use crate::cascade::CascadeSettings;
use crate::settings::Settings;
use crate::store::is_valid_grid;

/// Window title used when the configuration does not name one.
pub const DEFAULT_TITLE: &str = "Global Illumination (CI VCT)";

/// Errors raised while loading a [`GiConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read GI config '{}'", .path.display())]
    Io {
        /// The offending path.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The file is not valid RON for this schema.
    #[error("failed to parse GI config: {0}")]
    Parse(#[from] ron::error::SpannedError),
    /// The configuration could not be serialized.
    #[error("failed to serialize GI config: {0}")]
    Serialize(#[from] ron::Error),
    /// The configuration parsed but holds an unusable value.
    #[error("invalid GI config: {0}")]
    Invalid(String),
}

/// Per-cascade overrides. Unset fields keep the default or doubled values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CascadeConfig {
    /// Half size of the area covered by the cascade.
    pub half_extent: Option<Vec3>,
    /// Voxel resolution per axis.
    pub resolution: Option<[u32; 3]>,
    /// Octant subdivisions per axis.
    pub octant_count: Option<[u32; 3]>,
    /// Light leak reduction factor.
    pub thin_wall_counter: Option<f32>,
}

impl CascadeConfig {
    /// Applies the overrides on top of `settings`.
    pub fn apply(&self, settings: &mut CascadeSettings) {
        if let Some(half_extent) = self.half_extent {
            settings.half_extent = half_extent;
        }
        if let Some(resolution) = self.resolution {
            settings.resolution = resolution;
        }
        if let Some(octant_count) = self.octant_count {
            settings.octant_count = octant_count;
        }
        if let Some(thin_wall_counter) = self.thin_wall_counter {
            settings.thin_wall_counter = thin_wall_counter;
        }
    }
}

/// Initial state of a GI controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GiConfig {
    /// Title of the control panel.
    pub title: String,
    /// Request GI on once the scene is ready. Still subject to activation checks.
    pub enabled: bool,
    /// Voxel resolution per axis.
    pub resolution: [u32; 3],
    /// Octant subdivisions per axis.
    pub octant_count: [u32; 3],
    /// Number of light bounces.
    pub bounce_count: u32,
    /// High quality tracing path.
    pub high_quality: bool,
    /// Anisotropic voxel mipmaps.
    pub anisotropic: bool,
    /// Smaller memory footprint at reduced quality.
    pub conserve_memory: bool,
    /// Light leak reduction factor.
    pub thin_wall_counter: f32,
    /// Debug overlay, by name (`"albedo"`) or engine index (`0`).
    #[serde(
        serialize_with = "serialize_mode",
        deserialize_with = "deserialize_mode"
    )]
    pub debug_visualization: DebugVisualizationMode,
    /// Cascades created at initialization, in order.
    pub cascades: Vec<CascadeConfig>,
}

impl Default for GiConfig {
    fn default() -> Self {
        let settings = Settings::default();
        Self {
            title: DEFAULT_TITLE.to_string(),
            enabled: settings.enabled,
            resolution: settings.resolution,
            octant_count: settings.octant_count,
            bounce_count: settings.bounce_count,
            high_quality: settings.high_quality,
            anisotropic: settings.anisotropic,
            conserve_memory: settings.conserve_memory,
            thin_wall_counter: settings.thin_wall_counter,
            debug_visualization: settings.debug_visualization,
            cascades: Vec::new(),
        }
    }
}

impl GiConfig {
    /// Parses and validates a RON document.
    pub fn from_ron_str(source: &str) -> Result<Self, ConfigError> {
        let config: GiConfig = ron::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a RON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_ron_str(&source)?;
        log::info!("GiConfig: Loaded '{}'.", path.display());
        Ok(config)
    }

    /// Renders the configuration as pretty RON.
    pub fn to_ron_string(&self) -> Result<String, ConfigError> {
        let pretty = ron::ser::PrettyConfig::default().indentor("  ".to_string());
        Ok(ron::ser::to_string_pretty(self, pretty)?)
    }

    /// Rejects zero-sized grids, which the engine cannot allocate.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_grid("resolution", self.resolution)?;
        check_grid("octant_count", self.octant_count)?;
        for (index, cascade) in self.cascades.iter().enumerate() {
            if let Some(resolution) = cascade.resolution {
                check_grid(&format!("cascades[{index}].resolution"), resolution)?;
            }
            if let Some(octant_count) = cascade.octant_count {
                check_grid(&format!("cascades[{index}].octant_count"), octant_count)?;
            }
        }
        Ok(())
    }

    /// The store contents this configuration starts from.
    ///
    /// `enabled` is left off: it is requested once the scene is ready.
    pub fn initial_settings(&self) -> Settings {
        Settings {
            enabled: false,
            resolution: self.resolution,
            octant_count: self.octant_count,
            bounce_count: self.bounce_count,
            high_quality: self.high_quality,
            anisotropic: self.anisotropic,
            conserve_memory: self.conserve_memory,
            thin_wall_counter: self.thin_wall_counter,
            debug_visualization: self.debug_visualization,
            bound_camera: None,
        }
    }
}

fn check_grid(field: &str, grid: [u32; 3]) -> Result<(), ConfigError> {
    if !is_valid_grid(grid) {
        return Err(ConfigError::Invalid(format!(
            "{field} must be non-zero on every axis, got {grid:?}"
        )));
    }
    Ok(())
}

fn serialize_mode<S: Serializer>(
    mode: &DebugVisualizationMode,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(mode.name())
}

fn deserialize_mode<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<DebugVisualizationMode, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum ModeRepr {
        Index(u32),
        Name(String),
    }

    match ModeRepr::deserialize(deserializer)? {
        ModeRepr::Index(index) => Ok(DebugVisualizationMode::from_index(index)),
        ModeRepr::Name(name) => name.parse().map_err(serde::de::Error::custom),
    }
}
