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

//! A deterministic, scripted entity source.
//!
//! Stands in for the real memory reader so the overlay runs end to end
//! without a target process: entities orbit the observer on fixed radii,
//! despawn at scripted times, and liveness can be scripted to fail (or
//! delegated to a real pid via [`PidProbe`]).
//!
//! Everything is a pure function of elapsed time, so a fixed script yields
//! the same world on every run.

use crate::source::pid::PidProbe;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use vigil_core::math::{Vec3, DEG_TO_RAD};
use vigil_core::source::{
    EntityHandle, EntityKind, EntitySource, RawEntityRecord, RawViewpoint, SourceError,
};

/// Handles start here so log lines look like addresses, not indices.
const HANDLE_BASE: u64 = 0x2000;

/// One scripted entity: a marker orbiting the observer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptedEntity {
    /// Kind the entity reports on every probe.
    pub kind: EntityKind,
    /// Display name.
    pub name: String,
    /// Orbit radius around the observer, world units.
    pub orbit_radius: f32,
    /// Orbit speed, degrees per second.
    pub angular_speed_deg: f32,
    /// Seconds after start at which the entity despawns, if ever.
    #[serde(default)]
    pub despawn_after_secs: Option<f32>,
}

/// The full scene script: entities plus an optional liveness deadline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneScript {
    /// The entities in the scene.
    #[serde(default = "SceneScript::default_entities")]
    pub entities: Vec<ScriptedEntity>,
    /// Seconds after start at which the "process" exits, if ever.
    #[serde(default)]
    pub process_exits_after_secs: Option<f32>,
}

impl SceneScript {
    fn default_entities() -> Vec<ScriptedEntity> {
        vec![
            ScriptedEntity {
                kind: EntityKind::Player,
                name: "Redbeard".to_string(),
                orbit_radius: 120.0,
                angular_speed_deg: 9.0,
                despawn_after_secs: None,
            },
            ScriptedEntity {
                kind: EntityKind::Player,
                name: "Mosswater".to_string(),
                orbit_radius: 300.0,
                angular_speed_deg: -4.0,
                despawn_after_secs: Some(45.0),
            },
            ScriptedEntity {
                kind: EntityKind::Ship,
                name: "The Crimson Gull".to_string(),
                orbit_radius: 900.0,
                angular_speed_deg: 2.0,
                despawn_after_secs: None,
            },
            ScriptedEntity {
                kind: EntityKind::Loot,
                name: "Castaway Chest".to_string(),
                orbit_radius: 60.0,
                angular_speed_deg: 0.0,
                despawn_after_secs: Some(20.0),
            },
        ]
    }
}

impl Default for SceneScript {
    fn default() -> Self {
        Self {
            entities: Self::default_entities(),
            process_exits_after_secs: None,
        }
    }
}

/// The scripted [`EntitySource`] backend.
pub struct ScriptedSource {
    script: SceneScript,
    started: Instant,
    pid_probe: Option<PidProbe>,
}

impl ScriptedSource {
    /// Creates a source playing the given script from now.
    pub fn new(script: SceneScript) -> Self {
        log::info!(
            "scripted source with {} entities (liveness deadline: {:?})",
            script.entities.len(),
            script.process_exits_after_secs
        );
        Self {
            script,
            started: Instant::now(),
            pid_probe: None,
        }
    }

    /// Delegates liveness to a real process instead of the script deadline.
    pub fn watching_pid(mut self, pid: u32) -> Self {
        log::info!("scripted source liveness delegated to pid {pid}");
        self.pid_probe = Some(PidProbe::new(pid));
        self
    }

    fn elapsed_secs(&self) -> f32 {
        self.started.elapsed().as_secs_f32()
    }

    /// The observer state at scripted time `t`: a slow walk along +x with a
    /// slow pan.
    pub fn viewpoint_at(&self, t: f32) -> RawViewpoint {
        RawViewpoint {
            position: Vec3::new(t * 1.5, 0.0, 2.0),
            yaw_deg: (t * 6.0) % 360.0,
            fov_deg: 90.0,
        }
    }

    /// The record for scripted entity `index` at time `t`, if it has not
    /// despawned yet.
    pub fn record_at(&self, index: usize, t: f32) -> Option<RawEntityRecord> {
        let entity = self.script.entities.get(index)?;
        if let Some(deadline) = entity.despawn_after_secs {
            if t >= deadline {
                return None;
            }
        }

        let observer = self.viewpoint_at(t).position;
        let phase = (index as f32) * 73.0; // spread entities around the orbit
        let angle = (phase + entity.angular_speed_deg * t) * DEG_TO_RAD;
        let position = Vec3::new(
            observer.x + entity.orbit_radius * angle.cos(),
            observer.y + entity.orbit_radius * angle.sin(),
            0.0,
        );

        Some(RawEntityRecord {
            handle: EntityHandle(HANDLE_BASE + index as u64),
            kind: entity.kind,
            name: entity.name.clone(),
            position,
        })
    }
}

impl EntitySource for ScriptedSource {
    fn rescan(&mut self) -> Result<Vec<RawEntityRecord>, SourceError> {
        let t = self.elapsed_secs();
        let records = (0..self.script.entities.len())
            .filter_map(|i| self.record_at(i, t))
            .collect();
        Ok(records)
    }

    fn refresh_viewpoint(&mut self) -> Result<RawViewpoint, SourceError> {
        Ok(self.viewpoint_at(self.elapsed_secs()))
    }

    fn probe(&mut self, handle: EntityHandle) -> Option<RawEntityRecord> {
        let index = handle.0.checked_sub(HANDLE_BASE)? as usize;
        self.record_at(index, self.elapsed_secs())
    }

    fn is_process_alive(&mut self) -> bool {
        if let Some(probe) = self.pid_probe.as_mut() {
            return probe.is_alive();
        }
        match self.script.process_exits_after_secs {
            Some(deadline) => self.elapsed_secs() < deadline,
            None => true,
        }
    }
}
