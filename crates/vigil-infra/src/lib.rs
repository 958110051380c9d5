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

//! # Vigil Infra
//!
//! Concrete implementations of the collaborators `vigil-core` only knows as
//! traits: the winit overlay window, a deterministic scripted entity source
//! (the stand-in for a real memory reader), a sysinfo-based process liveness
//! probe, and a trace renderer that logs draw calls instead of rasterizing.

#![warn(missing_docs)]

pub mod platform;
pub mod render;
pub mod source;

pub use platform::window::{OverlayWindowBuilder, TargetBounds, WinitOverlayWindow};
pub use render::trace::TraceRenderer;
pub use source::pid::PidProbe;
pub use source::scripted::{SceneScript, ScriptedEntity, ScriptedSource};
