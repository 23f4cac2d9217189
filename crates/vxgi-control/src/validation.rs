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

//! Preconditions for turning GI on.

use thiserror::Error;

use crate::cascade::CascadeRegistry;
use crate::settings::Settings;

/// Why GI cannot be enabled right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ActivationError {
    /// GI needs at least one cascade to voxelize into.
    #[error("no cascades have been added")]
    NoCascades,
    /// The cascades follow a camera; none is bound or it no longer exists.
    #[error("no camera is bound")]
    NoCamera,
}

/// Checks whether a GI configuration can be activated.
pub struct ActivationValidator;

impl ActivationValidator {
    /// Returns the first unmet precondition, if any.
    pub fn validate(settings: &Settings, cascades: &CascadeRegistry) -> Result<(), ActivationError> {
        if cascades.is_empty() {
            return Err(ActivationError::NoCascades);
        }
        if settings.bound_camera().is_none() {
            return Err(ActivationError::NoCamera);
        }
        Ok(())
    }

    /// Shorthand for `validate(..).is_ok()`.
    pub fn is_activatable(settings: &Settings, cascades: &CascadeRegistry) -> bool {
        Self::validate(settings, cascades).is_ok()
    }
}
