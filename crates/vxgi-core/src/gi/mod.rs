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

//! Value types describing a voxel cone traced GI configuration.

mod event;

pub use self::event::GiEvent;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What the GI debug overlay displays on top of the scene.
///
/// The discriminants follow the engine's ordering, where `None` is last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u32)]
pub enum DebugVisualizationMode {
    /// Voxelized albedo.
    Albedo = 0,
    /// Voxelized normals.
    Normal = 1,
    /// Voxelized emissive term.
    Emissive = 2,
    /// Injected lighting.
    Lighting = 3,
    /// No overlay.
    #[default]
    None = 4,
}

impl DebugVisualizationMode {
    /// All modes in engine order.
    pub const ALL: [Self; 5] = [
        Self::Albedo,
        Self::Normal,
        Self::Emissive,
        Self::Lighting,
        Self::None,
    ];

    /// Converts a raw engine index into a mode.
    ///
    /// Anything outside `Albedo..=None` maps to `None`.
    pub fn from_index(index: u32) -> Self {
        Self::ALL
            .get(index as usize)
            .copied()
            .unwrap_or(Self::None)
    }

    /// Returns the raw engine index of this mode.
    pub fn index(self) -> u32 {
        self as u32
    }

    /// Returns the lowercase name used in configuration files.
    pub fn name(self) -> &'static str {
        match self {
            Self::Albedo => "albedo",
            Self::Normal => "normal",
            Self::Emissive => "emissive",
            Self::Lighting => "lighting",
            Self::None => "none",
        }
    }
}

impl fmt::Display for DebugVisualizationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a string names no [`DebugVisualizationMode`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownModeError(pub String);

impl fmt::Display for UnknownModeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown debug visualization mode '{}'", self.0)
    }
}

impl std::error::Error for UnknownModeError {}

impl FromStr for DebugVisualizationMode {
    type Err = UnknownModeError;

    /// Accepts the lowercase names, or a raw engine index.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some(mode) = Self::ALL.iter().find(|m| m.name() == trimmed) {
            return Ok(*mode);
        }
        trimmed
            .parse::<u32>()
            .map(Self::from_index)
            .map_err(|_| UnknownModeError(trimmed.to_string()))
    }
}

/// One axis of a 3D grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// The X axis.
    X,
    /// The Y axis.
    Y,
    /// The Z axis.
    Z,
}

impl Axis {
    /// Returns the array index of this axis.
    pub const fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

/// Which kinds of visuals are voxelized by the GI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParticipatingVisuals {
    bits: u32,
}

impl ParticipatingVisuals {
    /// No visuals participate.
    pub const NONE: Self = Self { bits: 0 };
    /// Static visuals participate.
    pub const STATIC: Self = Self { bits: 1 << 0 };
    /// Dynamic visuals participate.
    pub const DYNAMIC: Self = Self { bits: 1 << 1 };
    /// Both static and dynamic visuals participate.
    pub const ALL: Self = Self {
        bits: Self::STATIC.bits | Self::DYNAMIC.bits,
    };

    /// Returns the raw bits.
    pub const fn bits(&self) -> u32 {
        self.bits
    }

    /// Returns `true` if all flags in `other` are set in `self`.
    pub const fn contains(&self, other: Self) -> bool {
        (self.bits & other.bits) == other.bits
    }
}

impl std::ops::BitOr for ParticipatingVisuals {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self::Output {
        Self {
            bits: self.bits | rhs.bits,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_index_clamps_to_none() {
        assert_eq!(DebugVisualizationMode::from_index(0), DebugVisualizationMode::Albedo);
        assert_eq!(DebugVisualizationMode::from_index(3), DebugVisualizationMode::Lighting);
        assert_eq!(DebugVisualizationMode::from_index(4), DebugVisualizationMode::None);
        assert_eq!(DebugVisualizationMode::from_index(42), DebugVisualizationMode::None);
    }

    #[test]
    fn test_index_matches_engine_order() {
        for (i, mode) in DebugVisualizationMode::ALL.iter().enumerate() {
            assert_eq!(mode.index() as usize, i);
        }
    }

    #[test]
    fn test_parse_by_name_and_index() {
        assert_eq!("albedo".parse(), Ok(DebugVisualizationMode::Albedo));
        assert_eq!(" lighting ".parse(), Ok(DebugVisualizationMode::Lighting));
        assert_eq!("2".parse(), Ok(DebugVisualizationMode::Emissive));
        assert_eq!("17".parse(), Ok(DebugVisualizationMode::None));
        assert!("glow".parse::<DebugVisualizationMode>().is_err());
    }

    #[test]
    fn test_serde_uses_lowercase_names() {
        let text = ron::to_string(&DebugVisualizationMode::Normal).unwrap();
        assert_eq!(text, "normal");
        let mode: DebugVisualizationMode = ron::from_str("emissive").unwrap();
        assert_eq!(mode, DebugVisualizationMode::Emissive);
    }

    #[test]
    fn test_participating_visuals_all() {
        let all = ParticipatingVisuals::STATIC | ParticipatingVisuals::DYNAMIC;
        assert_eq!(all, ParticipatingVisuals::ALL);
        assert!(all.contains(ParticipatingVisuals::DYNAMIC));
        assert!(!ParticipatingVisuals::STATIC.contains(ParticipatingVisuals::DYNAMIC));
        assert_eq!(ParticipatingVisuals::NONE.bits(), 0);
    }

    #[test]
    fn test_axis_index() {
        assert_eq!(Axis::X.index(), 0);
        assert_eq!(Axis::Y.index(), 1);
        assert_eq!(Axis::Z.index(), 2);
    }
}
