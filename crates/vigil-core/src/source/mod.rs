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

//! The contract between the overlay core and whatever reads the observed
//! process.
//!
//! The core never touches foreign memory itself. It consumes a single seam,
//! [`EntitySource`], which a backend implements however it likes: a real
//! memory reader, a replay file, or the scripted simulation in `vigil-infra`.

use crate::math::Vec3;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identity of an entity record in the source's address space.
///
/// Two records with the same handle refer to the same underlying entity for
/// the lifetime of one attachment. Handles are never recycled within a single
/// rescan batch; across batches the kind check in `Entity::update` catches a
/// recycled slot whose occupant changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityHandle(pub u64);

impl fmt::Display for EntityHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// The closed set of entity kinds the overlay tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// Another player character.
    Player,
    /// A crewed vessel.
    Ship,
    /// A lootable item in the world.
    Loot,
}

/// One decoded entity record as the source sees it right now.
#[derive(Debug, Clone, PartialEq)]
pub struct RawEntityRecord {
    /// Source-side identity of the record.
    pub handle: EntityHandle,
    /// Kind discriminator decoded from the record.
    pub kind: EntityKind,
    /// Display name decoded from the record.
    pub name: String,
    /// World-space position of the entity.
    pub position: Vec3,
}

/// The observer's own state as the source sees it right now.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawViewpoint {
    /// World-space position of the observer.
    pub position: Vec3,
    /// Facing angle in degrees, measured on the horizontal plane.
    pub yaw_deg: f32,
    /// Horizontal field of view in degrees.
    pub fov_deg: f32,
}

/// An error reported by an entity source.
///
/// Only `rescan` and `refresh_viewpoint` can fail this way, and both
/// failures are soft: the scheduler keeps the previous registry contents or
/// viewpoint and retries on the next cycle. A source that has lost the
/// process entirely reports that through `is_process_alive`, not through
/// an error.
#[derive(Debug)]
pub enum SourceError {
    /// A region of the source could not be read this cycle.
    Unreadable {
        /// What was being read (for the log line).
        what: String,
        /// Backend-specific detail.
        details: String,
    },
    /// A region was read but did not decode into the expected shape.
    Decode {
        /// What was being decoded (for the log line).
        what: String,
        /// Backend-specific detail.
        details: String,
    },
    /// The observed process no longer exists.
    ProcessGone,
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceError::Unreadable { what, details } => {
                write!(f, "failed to read {what}: {details}")
            }
            SourceError::Decode { what, details } => {
                write!(f, "failed to decode {what}: {details}")
            }
            SourceError::ProcessGone => write!(f, "observed process is gone"),
        }
    }
}

impl std::error::Error for SourceError {}

/// The memory-reader collaborator seam.
///
/// Implementations are free to cache between calls; the core only assumes
/// that each call reflects the source's best current knowledge and that no
/// call suspends or blocks beyond a bounded scan (the whole loop is
/// cooperative and single-threaded).
pub trait EntitySource {
    /// Re-queries the full set of currently visible entities.
    ///
    /// Invoked by the slow rescan cycle. The returned order is the source's
    /// scan order; the registry preserves it for deterministic layout.
    fn rescan(&mut self) -> Result<Vec<RawEntityRecord>, SourceError>;

    /// Re-reads the observer's own position and facing.
    ///
    /// Invoked once at the start of every fast cycle.
    fn refresh_viewpoint(&mut self) -> Result<RawViewpoint, SourceError>;

    /// Re-reads a single entity record by handle.
    ///
    /// This is the per-tick freshness signal: `None` means the record is no
    /// longer readable or no longer exists, and the entity built from it
    /// will mark itself for removal. Never an error: a transient read
    /// failure and a despawn are handled identically.
    fn probe(&mut self, handle: EntityHandle) -> Option<RawEntityRecord>;

    /// Whether the observed process still exists.
    ///
    /// Invoked by the liveness cycle. The first `false` is terminal for the
    /// run; implementations need not recover afterwards.
    fn is_process_alive(&mut self) -> bool;
}
