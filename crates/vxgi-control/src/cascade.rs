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

//! Ordered cascade regions, index-aligned with the engine's own cascade list.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use vxgi_core::renderer::{GiCascade, GiEngine};
use vxgi_core::Vec3;

/// Half-extent of the first cascade.
pub const DEFAULT_HALF_EXTENT: Vec3 = Vec3::splat(5.0);

/// Growth factor of the half-extent from one cascade to the next.
pub const CASCADE_GROWTH: f32 = 2.0;

/// Settings of a single cascade.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CascadeSettings {
    /// Half size of the area covered around the bound camera.
    pub half_extent: Vec3,
    /// Voxel resolution per axis.
    pub resolution: [u32; 3],
    /// Octant subdivisions per axis.
    pub octant_count: [u32; 3],
    /// Light leak reduction factor.
    pub thin_wall_counter: f32,
}

impl Default for CascadeSettings {
    fn default() -> Self {
        Self {
            half_extent: DEFAULT_HALF_EXTENT,
            resolution: [16, 16, 16],
            octant_count: [1, 1, 1],
            thin_wall_counter: 1.0,
        }
    }
}

impl CascadeSettings {
    /// Settings for the cascade following `self`: same parameters, twice the area.
    pub fn next(&self) -> Self {
        Self {
            half_extent: self.half_extent * CASCADE_GROWTH,
            ..*self
        }
    }

    fn push_to(&self, cascade: &dyn GiCascade) {
        cascade.set_half_extent(self.half_extent);
        cascade.set_resolution(self.resolution);
        cascade.set_octant_count(self.octant_count);
        cascade.set_thin_wall_counter(self.thin_wall_counter);
    }
}

struct CascadeEntry {
    settings: CascadeSettings,
    handle: Arc<dyn GiCascade>,
}

/// Owns the cascade sequence of one GI instance.
///
/// Only append and remove-last are supported. Every successful mutation is
/// mirrored on the engine in the same call so that `len()` always equals the
/// engine's `cascade_count()`. Once the engine has started, the topology is
/// frozen and all mutations are rejected.
#[derive(Default)]
pub struct CascadeRegistry {
    entries: Vec<CascadeEntry>,
}

impl CascadeRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Number of cascades.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no cascades.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether cascades can currently be added, removed or edited.
    pub fn editable(gi: Option<&Arc<dyn GiEngine>>) -> bool {
        gi.is_some_and(|gi| !gi.started())
    }

    /// Appends a cascade on both the registry and the engine.
    ///
    /// The first cascade gets [`CascadeSettings::default`], later ones derive
    /// from their predecessor with a doubled half-extent.
    ///
    /// ## Returns
    /// The new cascade's settings, or `None` if no GI exists yet or it has started.
    pub fn add(&mut self, gi: Option<&Arc<dyn GiEngine>>) -> Option<CascadeSettings> {
        let gi = Self::guard(gi, "add")?;

        let previous = self.entries.last();
        let settings = previous
            .map(|e| e.settings.next())
            .unwrap_or_default();
        let handle = gi.add_cascade(previous.map(|e| &e.handle));
        settings.push_to(handle.as_ref());

        self.entries.push(CascadeEntry { settings, handle });
        log::debug!(
            "CascadeRegistry: Added cascade #{} (half_extent={:?})",
            self.entries.len() - 1,
            settings.half_extent
        );
        Some(settings)
    }

    /// Removes the last cascade from both the registry and the engine.
    ///
    /// ## Returns
    /// `false` if nothing was removed: no GI, started GI, or no cascades.
    pub fn remove_last(&mut self, gi: Option<&Arc<dyn GiEngine>>) -> bool {
        let Some(gi) = Self::guard(gi, "remove") else {
            return false;
        };
        if self.entries.pop().is_none() {
            return false;
        }
        gi.pop_cascade();
        log::debug!("CascadeRegistry: Removed cascade #{}", self.entries.len());
        true
    }

    /// Returns the settings of the cascade at `index`.
    ///
    /// # Panics
    /// If `index >= self.len()`. Callers must check against [`len`](Self::len).
    pub fn get(&self, index: usize) -> CascadeSettings {
        match self.entries.get(index) {
            Some(entry) => entry.settings,
            None => panic!(
                "cascade index {index} out of range (registry holds {})",
                self.entries.len()
            ),
        }
    }

    /// Edits the cascade at `index` while cascades are editable.
    ///
    /// The engine sees the new values on the next rebuild.
    ///
    /// # Panics
    /// If `index >= self.len()` and the edit was not rejected first.
    pub fn update<F>(&mut self, gi: Option<&Arc<dyn GiEngine>>, index: usize, edit: F) -> bool
    where
        F: FnOnce(&mut CascadeSettings),
    {
        if Self::guard(gi, "edit").is_none() {
            return false;
        }
        let len = self.entries.len();
        match self.entries.get_mut(index) {
            Some(entry) => edit(&mut entry.settings),
            None => panic!("cascade index {index} out of range (registry holds {len})"),
        }
        true
    }

    /// Returns a snapshot of every cascade's settings.
    pub fn snapshot(&self) -> Vec<CascadeSettings> {
        self.entries.iter().map(|e| e.settings).collect()
    }

    /// Writes every cascade's settings to its engine handle.
    ///
    /// Render thread only.
    pub fn push_to_engine(&self) {
        for entry in &self.entries {
            entry.settings.push_to(entry.handle.as_ref());
        }
    }

    /// Drops every engine handle without touching the engine.
    ///
    /// Used at teardown, when the engine owns and destroys its cascades itself.
    pub fn release(&mut self) {
        self.entries.clear();
    }

    fn guard<'a>(
        gi: Option<&'a Arc<dyn GiEngine>>,
        action: &str,
    ) -> Option<&'a Arc<dyn GiEngine>> {
        match gi {
            None => {
                log::warn!("CascadeRegistry: Cannot {action} cascades before GI is created.");
                None
            }
            Some(gi) if gi.started() => {
                log::warn!("CascadeRegistry: Cannot {action} cascades once GI has started.");
                None
            }
            Some(gi) => Some(gi),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Mutex;
    use vxgi_core::renderer::Camera;
    use vxgi_core::{DebugVisualizationMode, ParticipatingVisuals};

    #[derive(Default)]
    struct StubCascade {
        half_extent: Mutex<Vec3>,
    }

    impl GiCascade for StubCascade {
        fn set_half_extent(&self, half_extent: Vec3) {
            *self.half_extent.lock().unwrap() = half_extent;
        }
        fn set_resolution(&self, _: [u32; 3]) {}
        fn set_octant_count(&self, _: [u32; 3]) {}
        fn set_thin_wall_counter(&self, _: f32) {}
    }

    #[derive(Default)]
    struct StubGi {
        started: AtomicBool,
        cascades: AtomicUsize,
    }

    impl GiEngine for StubGi {
        fn set_bounce_count(&self, _: u32) {}
        fn set_high_quality(&self, _: bool) {}
        fn set_anisotropic(&self, _: bool) {}
        fn set_resolution(&self, _: [u32; 3]) {}
        fn set_octant_count(&self, _: [u32; 3]) {}
        fn set_thin_wall_counter(&self, _: f32) {}
        fn set_conserve_memory(&self, _: bool) {}
        fn set_debug_visualization(&self, _: DebugVisualizationMode) {}
        fn set_participating_visuals(&self, _: ParticipatingVisuals) {}
        fn bind(&self, _: Option<Arc<dyn Camera>>) {}
        fn start(&self, _: u32, _: bool) {
            self.started.store(true, Ordering::SeqCst);
        }
        fn new_settings(&self, _: u32, _: bool) {}
        fn build(&self) {}
        fn started(&self) -> bool {
            self.started.load(Ordering::SeqCst)
        }
        fn enabled(&self) -> bool {
            false
        }
        fn lighting_changed(&self) {}
        fn add_cascade(&self, _: Option<&Arc<dyn GiCascade>>) -> Arc<dyn GiCascade> {
            self.cascades.fetch_add(1, Ordering::SeqCst);
            Arc::new(StubCascade::default())
        }
        fn pop_cascade(&self) {
            self.cascades.fetch_sub(1, Ordering::SeqCst);
        }
        fn cascade_count(&self) -> usize {
            self.cascades.load(Ordering::SeqCst)
        }
    }

    fn stub_gi() -> Arc<dyn GiEngine> {
        Arc::new(StubGi::default())
    }

    #[test]
    fn test_first_cascade_gets_defaults_and_next_doubles() {
        let gi = stub_gi();
        let mut registry = CascadeRegistry::new();

        let first = registry.add(Some(&gi)).expect("editable registry");
        assert_eq!(first.half_extent, Vec3::new(5.0, 5.0, 5.0));
        assert_eq!(first.thin_wall_counter, 1.0);

        let second = registry.add(Some(&gi)).expect("editable registry");
        assert_eq!(second.half_extent, first.half_extent * 2.0);
        assert_eq!(second.resolution, first.resolution);

        let third = registry.add(Some(&gi)).expect("editable registry");
        assert_eq!(third.half_extent, Vec3::splat(20.0));
        assert_eq!(registry.len(), gi.cascade_count());
    }

    #[test]
    fn test_doubling_follows_edited_predecessor() {
        let gi = stub_gi();
        let mut registry = CascadeRegistry::new();
        registry.add(Some(&gi));
        assert!(registry.update(Some(&gi), 0, |c| c.half_extent = Vec3::new(1.0, 2.0, 3.0)));

        let next = registry.add(Some(&gi)).unwrap();
        assert_eq!(next.half_extent, Vec3::new(2.0, 4.0, 6.0));
    }

    #[test]
    fn test_remove_last_keeps_engine_aligned() {
        let gi = stub_gi();
        let mut registry = CascadeRegistry::new();

        assert!(!registry.remove_last(Some(&gi)));
        assert_eq!(gi.cascade_count(), 0);

        registry.add(Some(&gi));
        registry.add(Some(&gi));
        assert!(registry.remove_last(Some(&gi)));
        assert_eq!(registry.len(), 1);
        assert_eq!(gi.cascade_count(), 1);
    }

    #[test]
    fn test_mutations_rejected_without_gi() {
        let mut registry = CascadeRegistry::new();
        assert!(registry.add(None).is_none());
        assert!(!registry.remove_last(None));
        assert!(!CascadeRegistry::editable(None));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_mutations_rejected_once_started() {
        let gi = stub_gi();
        let mut registry = CascadeRegistry::new();
        registry.add(Some(&gi));
        gi.start(6, true);

        assert!(!CascadeRegistry::editable(Some(&gi)));
        assert!(registry.add(Some(&gi)).is_none());
        assert!(!registry.remove_last(Some(&gi)));
        assert!(!registry.update(Some(&gi), 0, |c| c.thin_wall_counter = 3.0));
        assert_eq!(registry.len(), 1);
        assert_eq!(gi.cascade_count(), 1);
        assert_eq!(registry.get(0).thin_wall_counter, 1.0);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_get_out_of_range_panics() {
        let registry = CascadeRegistry::new();
        let _ = registry.get(0);
    }
}
