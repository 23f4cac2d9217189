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

//! Desired GI settings and the pending-change marker.

use std::fmt;
use std::sync::{Arc, Weak};

use vxgi_core::renderer::Camera;
use vxgi_core::DebugVisualizationMode;

/// The category of work the next render tick has to perform.
///
/// Variants are ordered by cost. Marking a change keeps the most expensive
/// one, so a rebuild absorbs a re-light and a debug change, and a re-light
/// absorbs a debug change.
///
/// | Variant | Triggered by | Applied as |
/// |---|---|---|
/// | `Clean` | nothing pending | no-op |
/// | `DebugOnly` | debug overlay mode | overlay swap, only once started |
/// | `Relight` | bounces, quality, anisotropy, thin wall, memory | lighting refresh, only while enabled |
/// | `Rebuild` | enable toggle, resolution, octants | start / new settings + build |
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum PendingChange {
    /// Nothing to apply.
    #[default]
    Clean,
    /// Only the debug overlay changed.
    DebugOnly,
    /// Lighting parameters changed; acceleration data is still valid.
    Relight,
    /// Structural change; GI must be rebuilt.
    Rebuild,
}

impl PendingChange {
    /// Merges `change` into `self`, keeping the more expensive of the two.
    pub fn mark(&mut self, change: PendingChange) {
        *self = (*self).max(change);
    }

    /// A full rebuild is pending.
    pub fn is_visual_dirty(self) -> bool {
        self == PendingChange::Rebuild
    }

    /// A lighting refresh is pending, possibly as part of a rebuild.
    pub fn is_lighting_dirty(self) -> bool {
        self >= PendingChange::Relight
    }

    /// A debug overlay update is pending, possibly as part of a larger change.
    pub fn is_debug_visualization_dirty(self) -> bool {
        self >= PendingChange::DebugOnly
    }
}

/// The desired GI configuration, as requested by the control surface.
#[derive(Clone)]
pub struct Settings {
    /// Whether GI should be the active GI solution.
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
    /// Debug overlay shown once GI has started.
    pub debug_visualization: DebugVisualizationMode,
    /// Camera the cascades are centered around. Not owned: the scene owns it.
    pub bound_camera: Option<Weak<dyn Camera>>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            enabled: false,
            resolution: [16, 16, 16],
            octant_count: [1, 1, 1],
            bounce_count: 6,
            high_quality: true,
            anisotropic: true,
            conserve_memory: false,
            thin_wall_counter: 1.0,
            debug_visualization: DebugVisualizationMode::None,
            bound_camera: None,
        }
    }
}

impl Settings {
    /// Returns the bound camera if it is still alive.
    pub fn bound_camera(&self) -> Option<Arc<dyn Camera>> {
        self.bound_camera.as_ref().and_then(Weak::upgrade)
    }

    /// Returns the name of the bound camera if it is still alive.
    pub fn bound_camera_name(&self) -> Option<String> {
        self.bound_camera().map(|c| c.name().to_string())
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("enabled", &self.enabled)
            .field("resolution", &self.resolution)
            .field("octant_count", &self.octant_count)
            .field("bounce_count", &self.bounce_count)
            .field("high_quality", &self.high_quality)
            .field("anisotropic", &self.anisotropic)
            .field("conserve_memory", &self.conserve_memory)
            .field("thin_wall_counter", &self.thin_wall_counter)
            .field("debug_visualization", &self.debug_visualization)
            .field("bound_camera", &self.bound_camera_name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NamedCamera(&'static str);

    impl Camera for NamedCamera {
        fn name(&self) -> &str {
            self.0
        }
    }

    #[test]
    fn test_mark_keeps_highest_priority() {
        let mut pending = PendingChange::Clean;
        pending.mark(PendingChange::DebugOnly);
        assert_eq!(pending, PendingChange::DebugOnly);
        pending.mark(PendingChange::Rebuild);
        assert_eq!(pending, PendingChange::Rebuild);
        pending.mark(PendingChange::Relight);
        assert_eq!(pending, PendingChange::Rebuild);
        pending.mark(PendingChange::DebugOnly);
        assert_eq!(pending, PendingChange::Rebuild);
    }

    #[test]
    fn test_flag_views() {
        assert!(!PendingChange::Clean.is_debug_visualization_dirty());

        assert!(PendingChange::DebugOnly.is_debug_visualization_dirty());
        assert!(!PendingChange::DebugOnly.is_lighting_dirty());

        assert!(PendingChange::Relight.is_lighting_dirty());
        assert!(PendingChange::Relight.is_debug_visualization_dirty());
        assert!(!PendingChange::Relight.is_visual_dirty());

        assert!(PendingChange::Rebuild.is_visual_dirty());
        assert!(PendingChange::Rebuild.is_lighting_dirty());
        assert!(PendingChange::Rebuild.is_debug_visualization_dirty());
    }

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert!(!settings.enabled);
        assert_eq!(settings.resolution, [16, 16, 16]);
        assert_eq!(settings.octant_count, [1, 1, 1]);
        assert_eq!(settings.bounce_count, 6);
        assert!(settings.high_quality);
        assert!(settings.anisotropic);
        assert!(!settings.conserve_memory);
        assert_eq!(settings.debug_visualization, DebugVisualizationMode::None);
        assert!(settings.bound_camera().is_none());
    }

    #[test]
    fn test_bound_camera_is_weak() {
        let camera: Arc<dyn Camera> = Arc::new(NamedCamera("user_camera"));
        let settings = Settings {
            bound_camera: Some(Arc::downgrade(&camera)),
            ..Default::default()
        };
        assert_eq!(settings.bound_camera_name().as_deref(), Some("user_camera"));

        drop(camera);
        assert!(settings.bound_camera().is_none());
        assert!(format!("{settings:?}").contains("bound_camera: None"));
    }
}
