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

//! Applies the desired GI settings to the live engine, one render tick at a time.
//!
//! The [`Reconciler`] owns everything the controller's lock protects. The UI
//! thread mutates it through cheap, engine-free operations; the render thread
//! calls [`Reconciler::tick`], which performs at most one category of engine
//! work per tick in a fixed order.

use std::sync::Arc;

use vxgi_core::event::EventBus;
use vxgi_core::renderer::{GiEngine, GiScene, RenderBackend};
use vxgi_core::{DebugVisualizationMode, GiEvent, ParticipatingVisuals};

use crate::camera::CameraList;
use crate::cascade::{CascadeRegistry, CascadeSettings};
use crate::config::{CascadeConfig, GiConfig};
use crate::settings::{PendingChange, Settings};
use crate::store::ConfigurationStore;
use crate::validation::ActivationValidator;

/// Lifecycle of a [`Reconciler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcilerState {
    /// No scene ready yet. Discovery is retried on every tick.
    Uninitialized,
    /// The GI object exists and changes are being applied.
    Initialized,
    /// The engine could not create a GI object. Ticks are no-ops from now on.
    Withdrawn,
}

/// What a single tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    /// State after the tick.
    pub state: ReconcilerState,
    /// The change that was applied, if any.
    pub applied: Option<PendingChange>,
}

/// Work deferred until the scene is ready.
#[derive(Debug, Default)]
struct StartupPlan {
    cascades: Vec<CascadeConfig>,
    enable: bool,
}

/// Desired state plus the engine objects it is reconciled onto.
pub struct Reconciler {
    store: ConfigurationStore,
    cascades: CascadeRegistry,
    cameras: CameraList,
    scene: Option<Arc<dyn GiScene>>,
    gi: Option<Arc<dyn GiEngine>>,
    state: ReconcilerState,
    camera_refresh_requested: bool,
    startup: Option<StartupPlan>,
}

impl Reconciler {
    /// Creates a reconciler seeded from `config`. Nothing is pending.
    pub fn new(config: &GiConfig) -> Self {
        Self {
            store: ConfigurationStore::new(config.initial_settings()),
            cascades: CascadeRegistry::new(),
            cameras: CameraList::default(),
            scene: None,
            gi: None,
            state: ReconcilerState::Uninitialized,
            camera_refresh_requested: false,
            startup: Some(StartupPlan {
                cascades: config.cascades.clone(),
                enable: config.enabled,
            }),
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ReconcilerState {
        self.state
    }

    /// The desired settings.
    pub fn settings(&self) -> &Settings {
        self.store.settings()
    }

    /// Mutable access to the store for plain setters.
    pub fn store_mut(&mut self) -> &mut ConfigurationStore {
        &mut self.store
    }

    /// The change waiting for the next tick.
    pub fn pending(&self) -> PendingChange {
        self.store.pending()
    }

    /// Whether the current configuration can be enabled.
    pub fn is_activatable(&self) -> bool {
        ActivationValidator::is_activatable(self.store.settings(), &self.cascades)
    }

    /// Requests GI on or off.
    ///
    /// Enabling is rejected when the activation preconditions are not met.
    /// Disabling is always accepted. Returns whether the request was accepted.
    pub fn set_enabled(&mut self, enabled: bool, events: &EventBus<GiEvent>) -> bool {
        if enabled {
            if let Err(err) = ActivationValidator::validate(self.store.settings(), &self.cascades) {
                log::warn!("Reconciler: Cannot enable GI: {err}.");
                return false;
            }
        }
        if self.store.set_enabled(enabled) {
            events.publish(GiEvent::EnabledChanged(enabled));
        }
        true
    }

    /// Appends a cascade. See [`CascadeRegistry::add`].
    pub fn add_cascade(&mut self) -> Option<CascadeSettings> {
        self.cascades.add(self.gi.as_ref())
    }

    /// Removes the last cascade. See [`CascadeRegistry::remove_last`].
    pub fn remove_last_cascade(&mut self) -> bool {
        self.cascades.remove_last(self.gi.as_ref())
    }

    /// Settings of the cascade at `index`. Panics when out of range.
    pub fn cascade(&self, index: usize) -> CascadeSettings {
        self.cascades.get(index)
    }

    /// Edits the cascade at `index`. See [`CascadeRegistry::update`].
    pub fn update_cascade<F>(&mut self, index: usize, edit: F) -> bool
    where
        F: FnOnce(&mut CascadeSettings),
    {
        self.cascades.update(self.gi.as_ref(), index, edit)
    }

    /// Number of cascades.
    pub fn cascade_count(&self) -> usize {
        self.cascades.len()
    }

    /// Whether cascades can currently be added, removed or edited.
    pub fn cascades_editable(&self) -> bool {
        CascadeRegistry::editable(self.gi.as_ref())
    }

    /// Asks the next tick to re-enumerate the scene's cameras.
    pub fn request_camera_refresh(&mut self) {
        self.camera_refresh_requested = true;
    }

    /// Names of the cameras found by the last refresh.
    pub fn camera_names(&self) -> Vec<String> {
        self.cameras.names()
    }

    /// Binds the cached camera called `name`.
    ///
    /// An unknown or vanished camera means the cached list is stale, so
    /// listeners are told to refresh it.
    pub fn bind_camera(&mut self, name: &str, events: &EventBus<GiEvent>) -> bool {
        match self.cameras.find(name) {
            Some(camera) => {
                self.store.bind_camera(Some(&camera));
                log::debug!("Reconciler: Bound camera '{name}'.");
                true
            }
            None => {
                log::warn!("Reconciler: Camera '{name}' not found.");
                events.publish(GiEvent::CameraListChanged);
                false
            }
        }
    }

    /// Drops every engine handle. The engine is not told anything.
    pub fn release(&mut self) {
        self.cascades.release();
        self.gi = None;
        self.scene = None;
        log::debug!("Reconciler: Released GI.");
    }

    /// Performs one render tick. Render thread only.
    pub fn tick(&mut self, backend: &dyn RenderBackend, events: &EventBus<GiEvent>) -> TickReport {
        match self.state {
            ReconcilerState::Withdrawn => return self.report(None),
            ReconcilerState::Uninitialized => {
                if !self.initialize(backend, events) {
                    return self.report(None);
                }
            }
            ReconcilerState::Initialized => {}
        }

        let (Some(scene), Some(gi)) = (self.scene.clone(), self.gi.clone()) else {
            log::error!("Reconciler: Initialized without a GI object, skipping tick.");
            return self.report(None);
        };

        if self.camera_refresh_requested {
            self.refresh_cameras(scene.as_ref(), events);
        }

        self.reflect_external_disable(gi.as_ref(), events);

        let pending = self.store.pending();
        match pending {
            PendingChange::Clean => return self.report(None),
            PendingChange::Rebuild => self.rebuild(&scene, &gi, events),
            PendingChange::Relight => self.relight(gi.as_ref()),
            PendingChange::DebugOnly => self.apply_debug_visualization(gi.as_ref()),
        }
        self.store.clear_pending();
        log::trace!("Reconciler: Applied {pending:?}.");
        self.report(Some(pending))
    }

    fn report(&self, applied: Option<PendingChange>) -> TickReport {
        TickReport {
            state: self.state,
            applied,
        }
    }

    fn discover(backend: &dyn RenderBackend) -> Option<Arc<dyn GiScene>> {
        let engines = backend.loaded_engines();
        let engine = engines.first()?;
        if engines.len() > 1 {
            log::debug!(
                "Reconciler: {} engines loaded, using the first one ('{}').",
                engines.len(),
                engine.name()
            );
        }
        if engine.scene_count() == 0 {
            log::trace!("Reconciler: Engine '{}' has no scene yet.", engine.name());
            return None;
        }
        let Some(scene) = engine.scene_by_index(0) else {
            log::error!("Reconciler: Engine '{}' returned no scene at index 0.", engine.name());
            return None;
        };
        if !scene.is_initialized() || scene.visual_count() == 0 {
            log::trace!("Reconciler: Scene not ready yet.");
            return None;
        }
        Some(scene)
    }

    fn initialize(&mut self, backend: &dyn RenderBackend, events: &EventBus<GiEvent>) -> bool {
        let Some(scene) = Self::discover(backend) else {
            return false;
        };
        let Some(gi) = scene.create_gi() else {
            log::warn!("Reconciler: Engine does not support cascaded VCT GI, giving up.");
            self.state = ReconcilerState::Withdrawn;
            return false;
        };

        gi.set_participating_visuals(ParticipatingVisuals::DYNAMIC | ParticipatingVisuals::STATIC);
        self.scene = Some(scene.clone());
        self.gi = Some(gi.clone());
        self.state = ReconcilerState::Initialized;
        log::info!("Reconciler: GI created.");

        let plan = self.startup.take().unwrap_or_default();
        for overrides in &plan.cascades {
            if self.cascades.add(Some(&gi)).is_some() {
                let last = self.cascades.len() - 1;
                self.cascades
                    .update(Some(&gi), last, |settings| overrides.apply(settings));
            }
        }
        self.refresh_cameras(scene.as_ref(), events);
        events.publish(GiEvent::CascadesEditableChanged(!gi.started()));

        if plan.enable && !self.set_enabled(true, events) {
            log::warn!("Reconciler: GI was requested on at startup but cannot be enabled.");
        }
        true
    }

    fn refresh_cameras(&mut self, scene: &dyn GiScene, events: &EventBus<GiEvent>) {
        self.camera_refresh_requested = false;
        self.cameras.refresh(scene);
        if self.store.settings().bound_camera().is_none() {
            let first = self.cameras.first();
            if let Some(camera) = &first {
                log::debug!("Reconciler: Binding first camera '{}'.", camera.name());
            }
            self.store.bind_camera(first.as_ref());
        }
        events.publish(GiEvent::CameraListChanged);
    }

    fn reflect_external_disable(&mut self, gi: &dyn GiEngine, events: &EventBus<GiEvent>) {
        if self.store.pending().is_visual_dirty() {
            return;
        }
        if self.store.settings().enabled && !gi.enabled() {
            log::info!("Reconciler: GI was disabled outside of this controller.");
            self.store.force_disabled();
            events.publish(GiEvent::EnabledChanged(false));
        }
    }

    fn rebuild(&mut self, scene: &Arc<dyn GiScene>, gi: &Arc<dyn GiEngine>, events: &EventBus<GiEvent>) {
        let was_started = gi.started();

        // A cascade or the camera may have gone away since the request.
        if self.store.settings().enabled && !was_started {
            if let Err(err) = ActivationValidator::validate(self.store.settings(), &self.cascades) {
                log::warn!("Reconciler: Dropping enable request: {err}.");
                self.store.force_disabled();
                events.publish(GiEvent::EnabledChanged(false));
            }
        }

        let settings = self.store.settings().clone();
        gi.set_resolution(settings.resolution);
        gi.set_octant_count(settings.octant_count);
        push_lighting(gi.as_ref(), &settings);

        if was_started {
            gi.set_debug_visualization(DebugVisualizationMode::None);
        } else {
            self.cascades.push_to_engine();
        }

        if settings.enabled {
            if was_started {
                gi.new_settings(settings.bounce_count, settings.anisotropic);
            } else {
                gi.bind(settings.bound_camera());
                gi.start(settings.bounce_count, settings.anisotropic);
            }
            gi.build();
            scene.set_active_global_illumination(Some(gi.clone()));
            log::debug!("Reconciler: GI rebuilt and active.");
        } else {
            scene.set_active_global_illumination(None);
            log::debug!("Reconciler: GI deactivated.");
        }

        let started = gi.started();
        if started {
            gi.set_debug_visualization(settings.debug_visualization);
        }
        if started != was_started {
            events.publish(GiEvent::CascadesEditableChanged(!started));
        }
    }

    fn relight(&self, gi: &dyn GiEngine) {
        let settings = self.store.settings();
        push_lighting(gi, settings);
        if gi.enabled() {
            gi.set_debug_visualization(DebugVisualizationMode::None);
            gi.lighting_changed();
            gi.set_debug_visualization(settings.debug_visualization);
        } else {
            log::trace!("Reconciler: GI disabled, lighting refresh discarded.");
            // A debug change merged into this relight still applies once started.
            self.apply_debug_visualization(gi);
        }
    }

    fn apply_debug_visualization(&self, gi: &dyn GiEngine) {
        if gi.started() {
            gi.set_debug_visualization(self.store.settings().debug_visualization);
        }
    }
}

fn push_lighting(gi: &dyn GiEngine, settings: &Settings) {
    gi.set_bounce_count(settings.bounce_count);
    gi.set_high_quality(settings.high_quality);
    gi.set_anisotropic(settings.anisotropic);
    gi.set_thin_wall_counter(settings.thin_wall_counter);
    gi.set_conserve_memory(settings.conserve_memory);
}
