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

//! # VXGI Control
//!
//! Keeps a voxel cone traced GI engine in sync with settings edited from
//! another thread.
//!
//! The control surface talks to a [`GiController`]: its setters only record
//! the desired value and the category of work it implies. Once per frame the
//! render thread calls [`GiController::on_render_tick`], which applies the
//! most expensive outstanding category (rebuild, re-light or debug overlay)
//! and nothing else.

#![warn(missing_docs)]

pub mod camera;
pub mod cascade;
pub mod config;
pub mod controller;
pub mod reconcile;
pub mod settings;
pub mod store;
pub mod validation;

pub use cascade::CascadeSettings;
pub use config::{CascadeConfig, ConfigError, GiConfig};
pub use controller::GiController;
pub use reconcile::{ReconcilerState, TickReport};
pub use settings::{PendingChange, Settings};
pub use validation::ActivationError;
