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

//! A GPU-less rendering backend that logs what a real engine would do.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use vxgi_core::renderer::{Camera, GiCascade, GiEngine, GiScene, RenderBackend, RenderEngine};
use vxgi_core::{DebugVisualizationMode, ParticipatingVisuals, Vec3};

struct HeadlessCamera(String);

impl Camera for HeadlessCamera {
    fn name(&self) -> &str {
        &self.0
    }
}

struct HeadlessCascade {
    index: usize,
}

impl GiCascade for HeadlessCascade {
    fn set_half_extent(&self, half_extent: Vec3) {
        log::trace!("[gpu] cascade {}: half_extent={:?}", self.index, half_extent);
    }
    fn set_resolution(&self, resolution: [u32; 3]) {
        log::trace!("[gpu] cascade {}: resolution={:?}", self.index, resolution);
    }
    fn set_octant_count(&self, octant_count: [u32; 3]) {
        log::trace!("[gpu] cascade {}: octants={:?}", self.index, octant_count);
    }
    fn set_thin_wall_counter(&self, thin_wall_counter: f32) {
        log::trace!("[gpu] cascade {}: thin_wall={}", self.index, thin_wall_counter);
    }
}

/// The GI object of the headless scene.
#[derive(Default)]
pub struct HeadlessGi {
    started: AtomicBool,
    enabled: AtomicBool,
    cascades: AtomicUsize,
    builds: AtomicUsize,
}

impl HeadlessGi {
    /// Number of voxelization passes so far.
    pub fn build_count(&self) -> usize {
        self.builds.load(Ordering::SeqCst)
    }
}

impl GiEngine for HeadlessGi {
    fn set_bounce_count(&self, bounce_count: u32) {
        log::trace!("[gpu] bounces={bounce_count}");
    }
    fn set_high_quality(&self, high_quality: bool) {
        log::trace!("[gpu] high_quality={high_quality}");
    }
    fn set_anisotropic(&self, anisotropic: bool) {
        log::trace!("[gpu] anisotropic={anisotropic}");
    }
    fn set_resolution(&self, resolution: [u32; 3]) {
        log::trace!("[gpu] resolution={resolution:?}");
    }
    fn set_octant_count(&self, octant_count: [u32; 3]) {
        log::trace!("[gpu] octants={octant_count:?}");
    }
    fn set_thin_wall_counter(&self, thin_wall_counter: f32) {
        log::trace!("[gpu] thin_wall={thin_wall_counter}");
    }
    fn set_conserve_memory(&self, conserve_memory: bool) {
        log::trace!("[gpu] conserve_memory={conserve_memory}");
    }
    fn set_debug_visualization(&self, mode: DebugVisualizationMode) {
        log::debug!("[gpu] debug overlay: {mode}");
    }
    fn set_participating_visuals(&self, visuals: ParticipatingVisuals) {
        log::debug!("[gpu] participating visuals: {:#b}", visuals.bits());
    }
    fn bind(&self, camera: Option<Arc<dyn Camera>>) {
        match camera {
            Some(camera) => log::info!("[gpu] cascades follow '{}'", camera.name()),
            None => log::warn!("[gpu] no camera bound"),
        }
    }
    fn start(&self, bounce_count: u32, anisotropic: bool) {
        self.started.store(true, Ordering::SeqCst);
        log::info!(
            "[gpu] start: {} cascade(s), bounces={bounce_count}, anisotropic={anisotropic}",
            self.cascades.load(Ordering::SeqCst)
        );
    }
    fn new_settings(&self, bounce_count: u32, anisotropic: bool) {
        log::info!("[gpu] reallocate: bounces={bounce_count}, anisotropic={anisotropic}");
    }
    fn build(&self) {
        let n = self.builds.fetch_add(1, Ordering::SeqCst) + 1;
        log::info!("[gpu] voxelize + build (#{n})");
    }
    fn started(&self) -> bool {
        self.started.load(Ordering::SeqCst)
    }
    fn enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }
    fn lighting_changed(&self) {
        log::info!("[gpu] relight");
    }
    fn add_cascade(&self, _reference: Option<&Arc<dyn GiCascade>>) -> Arc<dyn GiCascade> {
        let index = self.cascades.fetch_add(1, Ordering::SeqCst);
        Arc::new(HeadlessCascade { index })
    }
    fn pop_cascade(&self) {
        self.cascades.fetch_sub(1, Ordering::SeqCst);
    }
    fn cascade_count(&self) -> usize {
        self.cascades.load(Ordering::SeqCst)
    }
}

/// A scene that finishes loading after a few frames.
pub struct HeadlessScene {
    frames_until_ready: AtomicUsize,
    cameras: Vec<Arc<dyn Camera>>,
    gi: Arc<HeadlessGi>,
}

impl HeadlessScene {
    fn new(frames_until_ready: usize) -> Self {
        Self {
            frames_until_ready: AtomicUsize::new(frames_until_ready),
            cameras: ["user_camera", "overhead"]
                .into_iter()
                .map(|name| Arc::new(HeadlessCamera(name.to_string())) as Arc<dyn Camera>)
                .collect(),
            gi: Arc::new(HeadlessGi::default()),
        }
    }

    /// Advances scene loading by one frame.
    pub fn advance(&self) {
        let _ = self
            .frames_until_ready
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
    }

    /// Activates a competing GI solution, turning ours off behind the controller's back.
    pub fn activate_other_gi(&self) {
        self.gi.enabled.store(false, Ordering::SeqCst);
        log::info!("[scene] another GI solution took over");
    }

    /// The GI object, for reporting.
    pub fn gi(&self) -> &HeadlessGi {
        &self.gi
    }
}

impl GiScene for HeadlessScene {
    fn is_initialized(&self) -> bool {
        self.frames_until_ready.load(Ordering::SeqCst) == 0
    }
    fn visual_count(&self) -> usize {
        12
    }
    fn create_gi(&self) -> Option<Arc<dyn GiEngine>> {
        Some(self.gi.clone())
    }
    fn set_active_global_illumination(&self, gi: Option<Arc<dyn GiEngine>>) {
        self.gi.enabled.store(gi.is_some(), Ordering::SeqCst);
        log::info!("[scene] GI {}", if gi.is_some() { "active" } else { "inactive" });
    }
    fn cameras(&self) -> Vec<Arc<dyn Camera>> {
        self.cameras.clone()
    }
}

struct HeadlessEngine {
    scene: Arc<HeadlessScene>,
}

impl RenderEngine for HeadlessEngine {
    fn name(&self) -> &str {
        "headless"
    }
    fn scene_count(&self) -> usize {
        1
    }
    fn scene_by_index(&self, index: usize) -> Option<Arc<dyn GiScene>> {
        (index == 0).then(|| self.scene.clone() as Arc<dyn GiScene>)
    }
}

/// A backend with a single headless engine and scene.
pub struct HeadlessBackend {
    engine: Arc<dyn RenderEngine>,
    scene: Arc<HeadlessScene>,
}

impl HeadlessBackend {
    /// Creates a backend whose scene is ready after `frames_until_ready` frames.
    pub fn new(frames_until_ready: usize) -> Self {
        let scene = Arc::new(HeadlessScene::new(frames_until_ready));
        Self {
            engine: Arc::new(HeadlessEngine {
                scene: scene.clone(),
            }),
            scene,
        }
    }

    /// The backend's only scene.
    pub fn scene(&self) -> &HeadlessScene {
        &self.scene
    }
}

impl RenderBackend for HeadlessBackend {
    fn loaded_engines(&self) -> Vec<Arc<dyn RenderEngine>> {
        vec![self.engine.clone()]
    }
}
