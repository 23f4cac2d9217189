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

//! A recording in-memory rendering backend shared by the integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use vxgi_control::{GiConfig, GiController, ReconcilerState};
use vxgi_core::renderer::{Camera, GiCascade, GiEngine, GiScene, RenderBackend, RenderEngine};
use vxgi_core::{DebugVisualizationMode, GiEvent, ParticipatingVisuals, Vec3};

/// An engine call worth asserting on.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Resolution([u32; 3]),
    BounceCount(u32),
    ThinWall(f32),
    Debug(DebugVisualizationMode),
    Bind(Option<String>),
    Start { bounces: u32, anisotropic: bool },
    NewSettings { bounces: u32, anisotropic: bool },
    Build,
    LightingChanged,
    Activate(bool),
    AddCascade,
    PopCascade,
}

pub struct MockCamera(pub String);

impl Camera for MockCamera {
    fn name(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Default)]
pub struct MockCascade {
    pub half_extent: Mutex<Vec3>,
    pub resolution: Mutex<[u32; 3]>,
    pub thin_wall_counter: Mutex<f32>,
}

impl GiCascade for MockCascade {
    fn set_half_extent(&self, half_extent: Vec3) {
        *self.half_extent.lock().unwrap() = half_extent;
    }
    fn set_resolution(&self, resolution: [u32; 3]) {
        *self.resolution.lock().unwrap() = resolution;
    }
    fn set_octant_count(&self, _: [u32; 3]) {}
    fn set_thin_wall_counter(&self, thin_wall_counter: f32) {
        *self.thin_wall_counter.lock().unwrap() = thin_wall_counter;
    }
}

#[derive(Default)]
pub struct MockGi {
    pub calls: Mutex<Vec<Call>>,
    pub started: AtomicBool,
    pub enabled: AtomicBool,
    pub cascades: Mutex<Vec<Arc<MockCascade>>>,
    pub participating: Mutex<Option<ParticipatingVisuals>>,
}

impl MockGi {
    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    /// Returns and clears the recorded calls.
    pub fn take_calls(&self) -> Vec<Call> {
        std::mem::take(&mut *self.calls.lock().unwrap())
    }

    pub fn count(&self, call: &Call) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| *c == call).count()
    }

    pub fn cascade(&self, index: usize) -> Arc<MockCascade> {
        self.cascades.lock().unwrap()[index].clone()
    }
}

impl GiEngine for MockGi {
    fn set_bounce_count(&self, bounce_count: u32) {
        self.record(Call::BounceCount(bounce_count));
    }
    fn set_high_quality(&self, _: bool) {}
    fn set_anisotropic(&self, _: bool) {}
    fn set_resolution(&self, resolution: [u32; 3]) {
        self.record(Call::Resolution(resolution));
    }
    fn set_octant_count(&self, _: [u32; 3]) {}
    fn set_thin_wall_counter(&self, thin_wall_counter: f32) {
        self.record(Call::ThinWall(thin_wall_counter));
    }
    fn set_conserve_memory(&self, _: bool) {}
    fn set_debug_visualization(&self, mode: DebugVisualizationMode) {
        self.record(Call::Debug(mode));
    }
    fn set_participating_visuals(&self, visuals: ParticipatingVisuals) {
        *self.participating.lock().unwrap() = Some(visuals);
    }
    fn bind(&self, camera: Option<Arc<dyn Camera>>) {
        self.record(Call::Bind(camera.map(|c| c.name().to_string())));
    }
    fn start(&self, bounces: u32, anisotropic: bool) {
        self.started.store(true, Ordering::SeqCst);
        self.record(Call::Start { bounces, anisotropic });
    }
    fn new_settings(&self, bounces: u32, anisotropic: bool) {
        self.record(Call::NewSettings { bounces, anisotropic });
    }
    fn build(&self) {
        self.record(Call::Build);
    }
    fn started(&self) -> bool {
        self.started.load(Ordering::SeqCst)
    }
    fn enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }
    fn lighting_changed(&self) {
        self.record(Call::LightingChanged);
    }
    fn add_cascade(&self, reference: Option<&Arc<dyn GiCascade>>) -> Arc<dyn GiCascade> {
        let _ = reference;
        let cascade = Arc::new(MockCascade::default());
        self.cascades.lock().unwrap().push(cascade.clone());
        self.record(Call::AddCascade);
        cascade
    }
    fn pop_cascade(&self) {
        self.cascades.lock().unwrap().pop();
        self.record(Call::PopCascade);
    }
    fn cascade_count(&self) -> usize {
        self.cascades.lock().unwrap().len()
    }
}

pub struct MockScene {
    pub initialized: AtomicBool,
    pub visuals: AtomicUsize,
    pub supports_gi: bool,
    pub gi: Arc<MockGi>,
    pub cameras: Mutex<Vec<Arc<dyn Camera>>>,
    pub create_calls: AtomicUsize,
}

impl MockScene {
    pub fn with_cameras(names: &[&str]) -> Self {
        Self {
            initialized: AtomicBool::new(true),
            visuals: AtomicUsize::new(4),
            supports_gi: true,
            gi: Arc::new(MockGi::default()),
            cameras: Mutex::new(
                names
                    .iter()
                    .map(|n| Arc::new(MockCamera(n.to_string())) as Arc<dyn Camera>)
                    .collect(),
            ),
            create_calls: AtomicUsize::new(0),
        }
    }

    /// Simulates another GI solution taking over the scene.
    pub fn deactivate_externally(&self) {
        self.gi.enabled.store(false, Ordering::SeqCst);
    }
}

impl GiScene for MockScene {
    fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }
    fn visual_count(&self) -> usize {
        self.visuals.load(Ordering::SeqCst)
    }
    fn create_gi(&self) -> Option<Arc<dyn GiEngine>> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        self.supports_gi.then(|| self.gi.clone() as Arc<dyn GiEngine>)
    }
    fn set_active_global_illumination(&self, gi: Option<Arc<dyn GiEngine>>) {
        let active = gi.is_some();
        self.gi.enabled.store(active, Ordering::SeqCst);
        self.gi.record(Call::Activate(active));
    }
    fn cameras(&self) -> Vec<Arc<dyn Camera>> {
        self.cameras.lock().unwrap().clone()
    }
}

pub struct MockEngine {
    pub name: String,
    pub scene: Option<Arc<MockScene>>,
}

impl RenderEngine for MockEngine {
    fn name(&self) -> &str {
        &self.name
    }
    fn scene_count(&self) -> usize {
        usize::from(self.scene.is_some())
    }
    fn scene_by_index(&self, index: usize) -> Option<Arc<dyn GiScene>> {
        match index {
            0 => self.scene.clone().map(|s| s as Arc<dyn GiScene>),
            _ => None,
        }
    }
}

#[derive(Default)]
pub struct MockBackend {
    pub engines: Mutex<Vec<Arc<dyn RenderEngine>>>,
}

impl MockBackend {
    pub fn with_scene(scene: Arc<MockScene>) -> Self {
        let engine: Arc<dyn RenderEngine> = Arc::new(MockEngine {
            name: "mock".to_string(),
            scene: Some(scene),
        });
        Self {
            engines: Mutex::new(vec![engine]),
        }
    }
}

impl RenderBackend for MockBackend {
    fn loaded_engines(&self) -> Vec<Arc<dyn RenderEngine>> {
        self.engines.lock().unwrap().clone()
    }
}

/// A controller wired to a ready scene with two cameras.
pub struct Harness {
    pub scene: Arc<MockScene>,
    pub backend: MockBackend,
    pub controller: GiController,
    pub events: flume::Receiver<GiEvent>,
}

impl Harness {
    pub fn new(config: GiConfig) -> Self {
        let scene = Arc::new(MockScene::with_cameras(&["user_camera", "overhead"]));
        let backend = MockBackend::with_scene(scene.clone());
        let controller = GiController::new(config);
        let events = controller.events();
        Self {
            scene,
            backend,
            controller,
            events,
        }
    }

    /// A harness whose first tick already created the GI.
    pub fn initialized() -> Self {
        let harness = Self::new(GiConfig::default());
        let report = harness.tick();
        assert_eq!(report.state, ReconcilerState::Initialized);
        harness.drain_events();
        harness.gi().take_calls();
        harness
    }

    /// An initialized harness with one cascade and a bound camera, ready to enable.
    pub fn activatable() -> Self {
        let harness = Self::initialized();
        assert!(harness.controller.add_cascade().is_some());
        harness.gi().take_calls();
        harness
    }

    pub fn gi(&self) -> &MockGi {
        &self.scene.gi
    }

    pub fn tick(&self) -> vxgi_control::TickReport {
        self.controller.on_render_tick(&self.backend)
    }

    pub fn drain_events(&self) -> Vec<GiEvent> {
        self.events.try_iter().collect()
    }
}
