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

//! Defines the contracts through which the GI control layer drives a renderer.
//!
//! - [`RenderBackend`]: Entry point listing the loaded rendering engines.
//! - [`RenderEngine`]: One engine and its scenes.
//! - [`GiScene`]: A scene able to host a GI object and owning the cameras.
//! - [`GiEngine`]: The cascaded voxel cone tracing GI object itself.
//! - [`GiCascade`]: One cascade owned by a [`GiEngine`].
//!
//! All methods take `&self`: engine objects are shared handles whose interior
//! state is owned by the renderer. Apart from cascade bookkeeping, they must
//! only be called from the render thread.

mod traits;

pub use self::traits::{Camera, GiCascade, GiEngine, GiScene, RenderBackend, RenderEngine};
