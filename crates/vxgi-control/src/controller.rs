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

//! The thread-safe facade shared by the control surface and the render thread.

use std::sync::{Mutex, MutexGuard, PoisonError};

use vxgi_core::event::EventBus;
use vxgi_core::renderer::RenderBackend;
use vxgi_core::{Axis, DebugVisualizationMode, GiEvent};

use crate::cascade::CascadeSettings;
use crate::config::GiConfig;
use crate::reconcile::{Reconciler, ReconcilerState, TickReport};
use crate::settings::PendingChange;

/// Owns the GI configuration and applies it to the engine on render ticks.
///
/// Every method takes the single internal lock for its whole duration. UI
/// methods are O(1) and never call into the rendering engine, except the
/// cascade add/remove operations which must keep the engine's cascade list
/// aligned. [`on_render_tick`](Self::on_render_tick) performs the engine work.
///
/// # Examples
///
/// ```
/// use vxgi_control::{GiConfig, GiController};
///
/// let controller = GiController::new(GiConfig::default());
/// controller.set_bounce_count(3);
/// assert_eq!(controller.bounce_count(), 3);
/// assert!(controller.pending_change().is_lighting_dirty());
/// ```
pub struct GiController {
    title: String,
    inner: Mutex<Reconciler>,
    events: EventBus<GiEvent>,
}

macro_rules! store_accessors {
    ($($(#[$meta:meta])* $get:ident / $set:ident : $ty:ty;)*) => {
        $(
            $(#[$meta])*
            pub fn $get(&self) -> $ty {
                self.lock().settings().$get
            }

            $(#[$meta])*
            pub fn $set(&self, value: $ty) {
                self.lock().store_mut().$set(value);
            }
        )*
    };
}

impl GiController {
    /// Creates a controller. The GI object is created by a later render tick.
    pub fn new(config: GiConfig) -> Self {
        log::info!("GiController: Created '{}'.", config.title);
        Self {
            inner: Mutex::new(Reconciler::new(&config)),
            title: config.title,
            events: EventBus::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Reconciler> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Title of the control panel.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Subscribes to change notifications.
    ///
    /// Every call returns an independent receiver that sees every event
    /// published after the call. Subscribe before the first render tick to
    /// observe start-up events.
    pub fn events(&self) -> flume::Receiver<GiEvent> {
        self.events.subscribe()
    }

    /// Lifecycle state of the reconciler.
    pub fn state(&self) -> ReconcilerState {
        self.lock().state()
    }

    /// Applies outstanding changes. Call once per frame from the render thread.
    pub fn on_render_tick(&self, backend: &dyn RenderBackend) -> TickReport {
        self.lock().tick(backend, &self.events)
    }

    /// Whether GI is requested on.
    pub fn enabled(&self) -> bool {
        self.lock().settings().enabled
    }

    /// Requests GI on or off.
    ///
    /// Turning GI on requires at least one cascade and a bound camera; when
    /// those are missing nothing changes and `false` is returned. Turning GI
    /// off always succeeds.
    pub fn set_enabled(&self, enabled: bool) -> bool {
        self.lock().set_enabled(enabled, &self.events)
    }

    /// Whether [`set_enabled(true)`](Self::set_enabled) would currently succeed.
    pub fn is_activatable(&self) -> bool {
        self.lock().is_activatable()
    }

    store_accessors! {
        /// Number of light bounces.
        bounce_count / set_bounce_count: u32;
        /// High quality tracing path.
        high_quality / set_high_quality: bool;
        /// Anisotropic voxel mipmaps.
        anisotropic / set_anisotropic: bool;
        /// Smaller memory footprint at reduced quality.
        conserve_memory / set_conserve_memory: bool;
        /// Light leak reduction factor.
        thin_wall_counter / set_thin_wall_counter: f32;
    }

    /// Voxel resolution per axis.
    pub fn resolution(&self) -> [u32; 3] {
        self.lock().settings().resolution
    }

    /// Sets the voxel resolution. Returns `false` and keeps the old value if an axis is zero.
    pub fn set_resolution(&self, resolution: [u32; 3]) -> bool {
        self.lock().store_mut().set_resolution(resolution)
    }

    /// Sets the voxel resolution of one axis. Zero is rejected.
    pub fn set_resolution_axis(&self, axis: Axis, resolution: u32) -> bool {
        self.lock().store_mut().set_resolution_axis(axis, resolution)
    }

    /// Octant subdivisions per axis.
    pub fn octant_count(&self) -> [u32; 3] {
        self.lock().settings().octant_count
    }

    /// Sets the octant subdivision count. Returns `false` and keeps the old value if an axis is zero.
    pub fn set_octant_count(&self, octant_count: [u32; 3]) -> bool {
        self.lock().store_mut().set_octant_count(octant_count)
    }

    /// Sets the octant subdivision count of one axis. Zero is rejected.
    pub fn set_octant_count_axis(&self, axis: Axis, count: u32) -> bool {
        self.lock().store_mut().set_octant_count_axis(axis, count)
    }

    /// Current debug overlay.
    pub fn debug_visualization(&self) -> DebugVisualizationMode {
        self.lock().settings().debug_visualization
    }

    /// Selects the debug overlay. Re-selecting the current mode is a no-op.
    pub fn set_debug_visualization(&self, mode: DebugVisualizationMode) {
        self.lock().store_mut().set_debug_visualization(mode);
    }

    /// Selects the debug overlay by engine index. Out-of-range values mean `None`.
    pub fn set_debug_visualization_index(&self, index: u32) {
        self.set_debug_visualization(DebugVisualizationMode::from_index(index));
    }

    /// The change the next tick will apply.
    pub fn pending_change(&self) -> PendingChange {
        self.lock().pending()
    }

    /// A rebuild is pending.
    pub fn is_visual_dirty(&self) -> bool {
        self.pending_change().is_visual_dirty()
    }

    /// A lighting refresh is pending.
    pub fn is_lighting_dirty(&self) -> bool {
        self.pending_change().is_lighting_dirty()
    }

    /// A debug overlay update is pending.
    pub fn is_debug_visualization_dirty(&self) -> bool {
        self.pending_change().is_debug_visualization_dirty()
    }

    /// Appends a cascade, twice the size of the previous one.
    ///
    /// Returns `None` before the GI exists or once it has started.
    pub fn add_cascade(&self) -> Option<CascadeSettings> {
        self.lock().add_cascade()
    }

    /// Removes the last cascade. Returns `false` if nothing was removed.
    pub fn remove_last_cascade(&self) -> bool {
        self.lock().remove_last_cascade()
    }

    /// Settings of the cascade at `index`.
    ///
    /// # Panics
    /// If `index >= self.cascade_count()`.
    pub fn cascade(&self, index: usize) -> CascadeSettings {
        self.lock().cascade(index)
    }

    /// Edits the cascade at `index`; the engine sees it on the next rebuild.
    ///
    /// Returns `false` once the GI has started.
    pub fn update_cascade<F>(&self, index: usize, edit: F) -> bool
    where
        F: FnOnce(&mut CascadeSettings),
    {
        self.lock().update_cascade(index, edit)
    }

    /// Number of cascades.
    pub fn cascade_count(&self) -> usize {
        self.lock().cascade_count()
    }

    /// Whether cascades can currently be added, removed or edited.
    pub fn cascades_editable(&self) -> bool {
        self.lock().cascades_editable()
    }

    /// Asks the next tick to re-enumerate the scene's cameras.
    pub fn refresh_cameras(&self) {
        self.lock().request_camera_refresh();
    }

    /// Camera names found by the last refresh.
    pub fn camera_list(&self) -> Vec<String> {
        self.lock().camera_names()
    }

    /// Name of the bound camera, if it still exists.
    pub fn bound_camera(&self) -> Option<String> {
        self.lock().settings().bound_camera_name()
    }

    /// Binds the camera called `name` from the last refreshed list.
    pub fn bind_camera(&self, name: &str) -> bool {
        self.lock().bind_camera(name, &self.events)
    }
}

impl Drop for GiController {
    fn drop(&mut self) {
        self.lock().release();
    }
}
