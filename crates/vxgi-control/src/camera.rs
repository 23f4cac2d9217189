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

//! Cached list of the scene's camera sensors.

use std::sync::{Arc, Weak};

use vxgi_core::renderer::{Camera, GiScene};

/// Camera names and weak handles, as last enumerated from the scene.
///
/// The UI reads names from here; binding by name resolves against this cache
/// so it never has to reach into the scene.
#[derive(Default)]
pub struct CameraList {
    entries: Vec<(String, Weak<dyn Camera>)>,
}

impl CameraList {
    /// Re-enumerates the scene's cameras. Render thread only.
    pub fn refresh(&mut self, scene: &dyn GiScene) {
        self.entries = scene
            .cameras()
            .iter()
            .map(|camera| (camera.name().to_string(), Arc::downgrade(camera)))
            .collect();
        log::debug!("CameraList: Found {} camera(s).", self.entries.len());
    }

    /// Returns the cached names, in scene order.
    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|(name, _)| name.clone()).collect()
    }

    /// Returns the first camera that is still alive.
    pub fn first(&self) -> Option<Arc<dyn Camera>> {
        self.entries.iter().find_map(|(_, camera)| camera.upgrade())
    }

    /// Looks up a live camera by name.
    pub fn find(&self, name: &str) -> Option<Arc<dyn Camera>> {
        self.entries
            .iter()
            .filter(|(candidate, _)| candidate == name)
            .find_map(|(_, camera)| camera.upgrade())
    }

    /// Number of cached cameras.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no camera is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
