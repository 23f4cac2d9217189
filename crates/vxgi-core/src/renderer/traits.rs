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

use std::sync::Arc;

use crate::gi::{DebugVisualizationMode, ParticipatingVisuals};
use crate::math::Vec3;

/// Lists the rendering engines currently loaded by the application.
pub trait RenderBackend: Send + Sync {
    /// Returns the loaded engines, in load order.
    fn loaded_engines(&self) -> Vec<Arc<dyn RenderEngine>>;
}

/// A loaded rendering engine.
pub trait RenderEngine: Send + Sync {
    /// Human readable engine name, used for logging.
    fn name(&self) -> &str;

    /// Number of scenes created in this engine.
    fn scene_count(&self) -> usize;

    /// Returns the scene at `index`, if any.
    fn scene_by_index(&self, index: usize) -> Option<Arc<dyn GiScene>>;
}

/// A camera sensor that the GI cascades can be centered around.
pub trait Camera: Send + Sync {
    /// The unique sensor name of the camera.
    fn name(&self) -> &str;
}

/// A scene that can host a GI object.
pub trait GiScene: Send + Sync {
    /// Whether the scene finished its own initialization.
    fn is_initialized(&self) -> bool;

    /// Number of visuals currently in the scene.
    fn visual_count(&self) -> usize;

    /// Creates the GI object for this scene.
    ///
    /// Returns `None` if the backend does not support it.
    fn create_gi(&self) -> Option<Arc<dyn GiEngine>>;

    /// Makes `gi` the scene's active GI solution, or deactivates GI with `None`.
    ///
    /// Only one GI solution can be active in a scene at a time.
    fn set_active_global_illumination(&self, gi: Option<Arc<dyn GiEngine>>);

    /// Returns every camera sensor of the scene.
    fn cameras(&self) -> Vec<Arc<dyn Camera>>;
}

/// One cascade of a cascaded voxel GI volume.
pub trait GiCascade: Send + Sync {
    /// Sets the half size of the area covered by the cascade.
    fn set_half_extent(&self, half_extent: Vec3);

    /// Sets the voxel resolution per axis.
    fn set_resolution(&self, resolution: [u32; 3]);

    /// Sets the octant subdivision count per axis.
    fn set_octant_count(&self, octant_count: [u32; 3]);

    /// Sets the thin wall counter used to reduce light leaking.
    fn set_thin_wall_counter(&self, thin_wall_counter: f32);
}

/// The renderer's voxel cone traced GI object.
pub trait GiEngine: Send + Sync {
    /// Sets the number of light bounces.
    fn set_bounce_count(&self, bounce_count: u32);

    /// Toggles the high quality tracing path.
    fn set_high_quality(&self, high_quality: bool);

    /// Toggles anisotropic voxel mipmaps.
    fn set_anisotropic(&self, anisotropic: bool);

    /// Sets the voxel resolution per axis.
    fn set_resolution(&self, resolution: [u32; 3]);

    /// Sets the octant subdivision count per axis.
    fn set_octant_count(&self, octant_count: [u32; 3]);

    /// Sets the thin wall counter used to reduce light leaking.
    fn set_thin_wall_counter(&self, thin_wall_counter: f32);

    /// Trades quality for a smaller memory footprint.
    fn set_conserve_memory(&self, conserve_memory: bool);

    /// Selects the debug overlay.
    fn set_debug_visualization(&self, mode: DebugVisualizationMode);

    /// Selects which visuals are voxelized.
    fn set_participating_visuals(&self, visuals: ParticipatingVisuals);

    /// Binds the camera the cascades follow.
    fn bind(&self, camera: Option<Arc<dyn Camera>>);

    /// Allocates GPU resources for the first time. Cascades are frozen afterwards.
    fn start(&self, bounce_count: u32, anisotropic: bool);

    /// Reallocates GPU resources of an already started GI.
    fn new_settings(&self, bounce_count: u32, anisotropic: bool);

    /// Voxelizes the scene and builds the GI acceleration data.
    fn build(&self);

    /// Whether [`start`](Self::start) has been called.
    fn started(&self) -> bool;

    /// Whether this GI is the active GI solution of its scene.
    fn enabled(&self) -> bool;

    /// Recomputes lighting without re-voxelizing.
    fn lighting_changed(&self);

    /// Appends a cascade, copying its settings from `reference` when given.
    fn add_cascade(&self, reference: Option<&Arc<dyn GiCascade>>) -> Arc<dyn GiCascade>;

    /// Removes the last cascade.
    fn pop_cascade(&self);

    /// Number of cascades the engine currently holds.
    fn cascade_count(&self) -> usize;
}
