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

//! # Vigil Core
//!
//! Foundational crate for the Vigil overlay: the tracked-entity data model,
//! the shared registry, the multi-rate update scheduler, and the contracts
//! implemented by the out-of-process collaborators (entity source, renderer,
//! overlay window).
//!
//! Everything in this crate is single-threaded. The scheduler is
//! driven by whatever run loop the hosting binary provides (winit in
//! `vigil-runtime`); "concurrency" between the fast cycle, the rescan cycle
//! and the liveness cycle is pure interleaving at tick boundaries, which is
//! what lets the registry and viewpoint be shared without locks.

#![warn(missing_docs)]

pub mod entity;
pub mod math;
pub mod platform;
pub mod registry;
pub mod render_sync;
pub mod renderer;
pub mod scheduler;
pub mod source;
pub mod viewpoint;

pub use entity::{DisplayObject, Entity};
pub use registry::EntityRegistry;
pub use render_sync::compose_frame;
pub use scheduler::{FrameStats, SchedulerConfig, SchedulerState, TickOutcome, UpdateScheduler};
pub use source::{EntityHandle, EntityKind, EntitySource, RawEntityRecord, RawViewpoint};
pub use viewpoint::{Viewpoint, ViewpointTracker};
