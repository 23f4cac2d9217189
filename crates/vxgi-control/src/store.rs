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

//! The single source of truth for the desired GI settings.

use std::sync::Arc;

use vxgi_core::renderer::Camera;
use vxgi_core::{Axis, DebugVisualizationMode};

use crate::settings::{PendingChange, Settings};

/// Whether a per-axis grid can be allocated by the engine.
pub fn is_valid_grid(grid: [u32; 3]) -> bool {
    !grid.contains(&0)
}

/// Desired settings plus the change the render tick still has to apply.
///
/// The store is plain data: it lives inside the controller's lock and every
/// method is O(1) and free of engine calls. Each setter records which
/// category of work its change requires.
#[derive(Debug, Default)]
pub struct ConfigurationStore {
    settings: Settings,
    pending: PendingChange,
}

impl ConfigurationStore {
    /// Creates a store seeded with `settings` and nothing pending.
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            pending: PendingChange::Clean,
        }
    }

    /// Read access to the desired settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The change waiting for the next render tick.
    pub fn pending(&self) -> PendingChange {
        self.pending
    }

    /// Marks everything as applied.
    pub fn clear_pending(&mut self) {
        self.pending = PendingChange::Clean;
    }

    /// Stores the enable request and schedules a rebuild.
    ///
    /// Validation happens in the caller. Returns `true` if the stored value changed.
    pub fn set_enabled(&mut self, enabled: bool) -> bool {
        let changed = self.settings.enabled != enabled;
        self.settings.enabled = enabled;
        self.pending.mark(PendingChange::Rebuild);
        changed
    }

    /// Reflects a disable performed by the engine itself.
    ///
    /// Nothing is scheduled: the engine is already in that state.
    pub fn force_disabled(&mut self) {
        self.settings.enabled = false;
    }

    /// Sets the voxel resolution for all axes.
    ///
    /// A zero on any axis is rejected. Returns whether the value was stored.
    pub fn set_resolution(&mut self, resolution: [u32; 3]) -> bool {
        if !is_valid_grid(resolution) {
            log::warn!("ConfigurationStore: Ignoring resolution {resolution:?}, axes must be non-zero.");
            return false;
        }
        self.settings.resolution = resolution;
        self.pending.mark(PendingChange::Rebuild);
        true
    }

    /// Sets the voxel resolution of one axis. Zero is rejected.
    pub fn set_resolution_axis(&mut self, axis: Axis, resolution: u32) -> bool {
        let mut grid = self.settings.resolution;
        grid[axis.index()] = resolution;
        self.set_resolution(grid)
    }

    /// Sets the octant subdivision count for all axes.
    ///
    /// A zero on any axis is rejected. Returns whether the value was stored.
    pub fn set_octant_count(&mut self, octant_count: [u32; 3]) -> bool {
        if !is_valid_grid(octant_count) {
            log::warn!("ConfigurationStore: Ignoring octant count {octant_count:?}, axes must be non-zero.");
            return false;
        }
        self.settings.octant_count = octant_count;
        self.pending.mark(PendingChange::Rebuild);
        true
    }

    /// Sets the octant subdivision count of one axis. Zero is rejected.
    pub fn set_octant_count_axis(&mut self, axis: Axis, count: u32) -> bool {
        let mut grid = self.settings.octant_count;
        grid[axis.index()] = count;
        self.set_octant_count(grid)
    }

    /// Sets the number of light bounces.
    pub fn set_bounce_count(&mut self, bounce_count: u32) {
        self.settings.bounce_count = bounce_count;
        self.pending.mark(PendingChange::Relight);
    }

    /// Toggles the high quality path.
    pub fn set_high_quality(&mut self, high_quality: bool) {
        self.settings.high_quality = high_quality;
        self.pending.mark(PendingChange::Relight);
    }

    /// Toggles anisotropic mipmaps.
    pub fn set_anisotropic(&mut self, anisotropic: bool) {
        self.settings.anisotropic = anisotropic;
        self.pending.mark(PendingChange::Relight);
    }

    /// Toggles memory conservation.
    pub fn set_conserve_memory(&mut self, conserve_memory: bool) {
        self.settings.conserve_memory = conserve_memory;
        self.pending.mark(PendingChange::Relight);
    }

    /// Sets the thin wall counter.
    pub fn set_thin_wall_counter(&mut self, thin_wall_counter: f32) {
        self.settings.thin_wall_counter = thin_wall_counter;
        self.pending.mark(PendingChange::Relight);
    }

    /// Sets the debug overlay mode.
    ///
    /// Writing the current value again schedules nothing. Returns `true` if the
    /// mode changed.
    pub fn set_debug_visualization(&mut self, mode: DebugVisualizationMode) -> bool {
        if self.settings.debug_visualization == mode {
            return false;
        }
        self.settings.debug_visualization = mode;
        self.pending.mark(PendingChange::DebugOnly);
        true
    }

    /// Binds the camera the cascades follow, or unbinds with `None`.
    ///
    /// Binding only takes effect when GI starts, so nothing is scheduled.
    pub fn bind_camera(&mut self, camera: Option<&Arc<dyn Camera>>) {
        self.settings.bound_camera = camera.map(Arc::downgrade);
    }
}
