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

//! # VXGI Core
//!
//! Foundational crate containing the value types and interface contracts shared
//! between the GI control surface and the rendering backend.
//!
//! Nothing in here talks to a GPU. The renderer is consumed exclusively through
//! the traits in [`renderer`], which a backend implements and hands to the
//! control layer on every render tick.

#![warn(missing_docs)]

pub mod event;
pub mod gi;
pub mod math;
pub mod renderer;

pub use gi::{Axis, DebugVisualizationMode, GiEvent, ParticipatingVisuals};
pub use math::Vec3;
