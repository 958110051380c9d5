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

//! The shared ordered collection of tracked entities.
//!
//! Membership changes through exactly two doors: the rescan merge and the
//! post-update prune. Both run to completion inside a single scheduler
//! callback, so no reader ever observes a half-merged or half-pruned
//! collection. Order is scan order; correctness does not depend on it, but
//! the grid layout in render sync does, so it is kept deterministic.

use crate::entity::{DisplayObject, Entity};
use crate::source::{EntitySource, RawEntityRecord};
use crate::viewpoint::Viewpoint;

/// The shared ordered collection of [`Entity`] values.
#[derive(Debug, Default)]
pub struct EntityRegistry {
    entities: Vec<Entity>,
}

impl EntityRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            entities: Vec::new(),
        }
    }

    /// Number of entities currently tracked.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Read-only view of the current entities, in registry order.
    ///
    /// Render sync takes this after the prune pass; nothing mutates the
    /// registry between prune and present within one cycle.
    pub fn snapshot(&self) -> &[Entity] {
        &self.entities
    }

    /// Merges a full rescan batch into the registry.
    ///
    /// Policy is merge-by-identity: a handle that survives the rescan keeps
    /// its existing entity (and with it the derived state from the last fast
    /// cycle), new handles are appended in scan order, and handles absent
    /// from the batch are dropped. Duplicate handles within one batch keep
    /// the first record.
    ///
    /// The merge completes as one step before control returns to the
    /// scheduler; a fast cycle can interleave before or after it, never
    /// during.
    pub fn apply_rescan(&mut self, records: Vec<RawEntityRecord>) {
        let mut merged: Vec<Entity> = Vec::with_capacity(records.len());

        for record in records {
            if merged.iter().any(|e| e.handle() == record.handle) {
                log::warn!(
                    "duplicate handle {} in rescan batch, keeping first record",
                    record.handle
                );
                continue;
            }
            if let Some(index) = self
                .entities
                .iter()
                .position(|e| e.handle() == record.handle)
            {
                merged.push(self.entities.swap_remove(index));
            } else {
                merged.push(Entity::from_record(record));
            }
        }

        let dropped = self.entities.len();
        if dropped > 0 {
            log::debug!("rescan dropped {dropped} entities no longer visible");
        }
        self.entities = merged;
    }

    /// Runs one update pass over every entity, in order.
    ///
    /// Entities only mutate themselves here; marking is the first pass of
    /// the two-pass removal protocol and never changes membership.
    pub fn update_all(&mut self, viewpoint: &Viewpoint, source: &mut dyn EntitySource) {
        for entity in &mut self.entities {
            entity.update(viewpoint, source);
        }
    }

    /// Removes every entity marked for removal and returns how many went.
    ///
    /// This is the second pass of the removal protocol, run strictly after
    /// the update walk has finished, so nothing is removed mid-iteration.
    /// Idempotent: a second prune with no intervening update removes nothing.
    pub fn prune_invalid(&mut self) -> usize {
        let before = self.entities.len();
        self.entities.retain(|e| !e.marked_for_removal());
        let removed = before - self.entities.len();
        if removed > 0 {
            log::debug!("pruned {removed} invalid entities, {} remain", before - removed);
        }
        removed
    }
}
