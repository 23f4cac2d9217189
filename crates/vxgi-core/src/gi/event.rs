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

//! Notifications emitted by the GI control layer.

/// A change the control surface may want to react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GiEvent {
    /// The local `enabled` setting changed, either by request or because the
    /// engine disabled the GI on its own (another GI solution took over).
    EnabledChanged(bool),
    /// The list of cameras available for binding changed, or a bind request
    /// named a camera that is no longer available.
    CameraListChanged,
    /// Cascades became editable (`true`) or frozen (`false`).
    ///
    /// Cascades are editable only while a GI object exists and has not started.
    CascadesEditableChanged(bool),
}
