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

//! The tracked-entity data model.
//!
//! Every kind the overlay can display is a variant of the closed [`Entity`]
//! union. All variants share the [`DisplayObject`] capability: refresh your
//! own derived state from the viewpoint, and raise `marked_for_removal` when
//! you are no longer worth drawing. An entity never mutates the registry it
//! lives in; membership changes are the scheduler's prune pass, after the
//! update walk has finished.

use crate::math::{wrap_degrees, Vec3, RAD_TO_DEG};
use crate::source::{EntityHandle, EntityKind, EntitySource, RawEntityRecord};
use crate::viewpoint::Viewpoint;

/// Derived observer-relative state, recomputed every fast cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RelativeState {
    /// Straight-line distance from the observer, in world units.
    pub distance: f32,
    /// Bearing relative to the observer's facing, degrees in `[-180, 180)`.
    pub bearing_deg: f32,
}

impl RelativeState {
    /// Projects a world position into observer-relative terms.
    pub fn project(world: Vec3, viewpoint: &Viewpoint) -> Self {
        let delta = world - viewpoint.position;
        let absolute_deg = delta.y.atan2(delta.x) * RAD_TO_DEG;
        Self {
            distance: delta.length(),
            bearing_deg: wrap_degrees(absolute_deg - viewpoint.yaw_deg),
        }
    }
}

/// The capability every displayable entity implements.
///
/// This is the duck-typed `update`/`to_delete` contract of the original
/// design made explicit: a closed trait over a closed set of variants,
/// dispatched by match rather than runtime attribute probing.
pub trait DisplayObject {
    /// Recomputes derived state from the given viewpoint and re-probes the
    /// source for freshness. Marks the entity for removal if it despawned,
    /// changed kind under its handle, or left its kind's visible range.
    /// Never fails: a transiently unreadable entity is simply marked.
    fn update(&mut self, viewpoint: &Viewpoint, source: &mut dyn EntitySource);

    /// Whether the prune pass should drop this entity.
    fn marked_for_removal(&self) -> bool;
}

macro_rules! marker_accessors {
    () => {
        /// Source-side identity of this marker.
        pub fn handle(&self) -> EntityHandle {
            self.handle
        }

        /// Display name, as of the last successful probe.
        pub fn name(&self) -> &str {
            &self.name
        }

        /// Observer-relative state from the most recent update.
        pub fn relative(&self) -> RelativeState {
            self.relative
        }
    };
}

/// A tracked player character.
#[derive(Debug, Clone)]
pub struct PlayerMarker {
    handle: EntityHandle,
    name: String,
    world_position: Vec3,
    relative: RelativeState,
    marked_for_removal: bool,
}

impl PlayerMarker {
    /// Players further than this are not worth drawing.
    pub const VISIBLE_RANGE: f32 = 500.0;

    fn from_record(record: RawEntityRecord) -> Self {
        Self {
            handle: record.handle,
            name: record.name,
            world_position: record.position,
            relative: RelativeState {
                distance: 0.0,
                bearing_deg: 0.0,
            },
            marked_for_removal: false,
        }
    }

    marker_accessors!();
}

impl DisplayObject for PlayerMarker {
    fn update(&mut self, viewpoint: &Viewpoint, source: &mut dyn EntitySource) {
        match source.probe(self.handle) {
            Some(record) if record.kind == EntityKind::Player => {
                self.world_position = record.position;
                // Gamertags can change mid-session; track the probe.
                self.name = record.name;
                self.relative = RelativeState::project(self.world_position, viewpoint);
                if self.relative.distance > Self::VISIBLE_RANGE {
                    self.marked_for_removal = true;
                }
            }
            Some(record) => {
                log::trace!(
                    "handle {} now holds a {:?}, dropping player marker",
                    self.handle,
                    record.kind
                );
                self.marked_for_removal = true;
            }
            None => self.marked_for_removal = true,
        }
    }

    fn marked_for_removal(&self) -> bool {
        self.marked_for_removal
    }
}

/// A tracked vessel.
#[derive(Debug, Clone)]
pub struct ShipMarker {
    handle: EntityHandle,
    name: String,
    world_position: Vec3,
    relative: RelativeState,
    marked_for_removal: bool,
}

impl ShipMarker {
    /// Ships are large; keep them on the overlay much further out.
    pub const VISIBLE_RANGE: f32 = 2000.0;

    fn from_record(record: RawEntityRecord) -> Self {
        Self {
            handle: record.handle,
            name: record.name,
            world_position: record.position,
            relative: RelativeState {
                distance: 0.0,
                bearing_deg: 0.0,
            },
            marked_for_removal: false,
        }
    }

    marker_accessors!();
}

impl DisplayObject for ShipMarker {
    fn update(&mut self, viewpoint: &Viewpoint, source: &mut dyn EntitySource) {
        match source.probe(self.handle) {
            Some(record) if record.kind == EntityKind::Ship => {
                self.world_position = record.position;
                self.relative = RelativeState::project(self.world_position, viewpoint);
                if self.relative.distance > Self::VISIBLE_RANGE {
                    self.marked_for_removal = true;
                }
            }
            _ => self.marked_for_removal = true,
        }
    }

    fn marked_for_removal(&self) -> bool {
        self.marked_for_removal
    }
}

/// A tracked lootable item.
#[derive(Debug, Clone)]
pub struct LootMarker {
    handle: EntityHandle,
    name: String,
    world_position: Vec3,
    relative: RelativeState,
    marked_for_removal: bool,
}

impl LootMarker {
    /// Loot is only interesting close by.
    pub const VISIBLE_RANGE: f32 = 150.0;

    fn from_record(record: RawEntityRecord) -> Self {
        Self {
            handle: record.handle,
            name: record.name,
            world_position: record.position,
            relative: RelativeState {
                distance: 0.0,
                bearing_deg: 0.0,
            },
            marked_for_removal: false,
        }
    }

    marker_accessors!();
}

impl DisplayObject for LootMarker {
    fn update(&mut self, viewpoint: &Viewpoint, source: &mut dyn EntitySource) {
        match source.probe(self.handle) {
            // Loot positions are static once spawned; only the projection
            // and the despawn check matter per tick.
            Some(record) if record.kind == EntityKind::Loot => {
                self.relative = RelativeState::project(self.world_position, viewpoint);
                if self.relative.distance > Self::VISIBLE_RANGE {
                    self.marked_for_removal = true;
                }
            }
            _ => self.marked_for_removal = true,
        }
    }

    fn marked_for_removal(&self) -> bool {
        self.marked_for_removal
    }
}

/// A tracked entity: the tagged union over all marker kinds.
#[derive(Debug, Clone)]
pub enum Entity {
    /// A player character marker.
    Player(PlayerMarker),
    /// A vessel marker.
    Ship(ShipMarker),
    /// A loot marker.
    Loot(LootMarker),
}

impl Entity {
    /// Builds the marker variant matching a freshly scanned record.
    pub fn from_record(record: RawEntityRecord) -> Self {
        match record.kind {
            EntityKind::Player => Entity::Player(PlayerMarker::from_record(record)),
            EntityKind::Ship => Entity::Ship(ShipMarker::from_record(record)),
            EntityKind::Loot => Entity::Loot(LootMarker::from_record(record)),
        }
    }

    /// Source-side identity of this entity.
    pub fn handle(&self) -> EntityHandle {
        match self {
            Entity::Player(m) => m.handle(),
            Entity::Ship(m) => m.handle(),
            Entity::Loot(m) => m.handle(),
        }
    }

    /// The kind this entity was created as.
    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::Player(_) => EntityKind::Player,
            Entity::Ship(_) => EntityKind::Ship,
            Entity::Loot(_) => EntityKind::Loot,
        }
    }

    /// Display name from the most recent probe.
    pub fn name(&self) -> &str {
        match self {
            Entity::Player(m) => m.name(),
            Entity::Ship(m) => m.name(),
            Entity::Loot(m) => m.name(),
        }
    }

    /// Observer-relative state from the most recent update.
    pub fn relative(&self) -> RelativeState {
        match self {
            Entity::Player(m) => m.relative(),
            Entity::Ship(m) => m.relative(),
            Entity::Loot(m) => m.relative(),
        }
    }
}

impl DisplayObject for Entity {
    fn update(&mut self, viewpoint: &Viewpoint, source: &mut dyn EntitySource) {
        match self {
            Entity::Player(m) => m.update(viewpoint, source),
            Entity::Ship(m) => m.update(viewpoint, source),
            Entity::Loot(m) => m.update(viewpoint, source),
        }
    }

    fn marked_for_removal(&self) -> bool {
        match self {
            Entity::Player(m) => m.marked_for_removal(),
            Entity::Ship(m) => m.marked_for_removal(),
            Entity::Loot(m) => m.marked_for_removal(),
        }
    }
}
