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

//! The multi-rate update scheduler.
//!
//! One `tick` is one cooperative cycle, invoked by the hosting run loop at
//! whatever cadence it renders. Inside a tick the ordering is fixed:
//!
//! 1. liveness check, when its 3-second interval is due; a dead process
//!    cancels everything before any further work;
//! 2. full rescan, when its 5-second interval is due: atomic merge into the
//!    registry;
//! 3. the fast cycle: viewpoint refresh → update every entity → prune.
//!
//! Because each step runs to completion before the next and nothing here
//! yields, the registry and viewpoint need no synchronization: a reader can
//! only observe the collection between steps, never inside one.

mod interval;

pub use interval::Interval;

use crate::registry::EntityRegistry;
use crate::source::{EntitySource, SourceError};
use crate::viewpoint::{Viewpoint, ViewpointTracker};
use std::time::{Duration, Instant};

/// Lifecycle states of the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// Constructed; collaborators attached; no eager rescan yet.
    Initializing,
    /// All three cycles are live.
    Running,
    /// Liveness failed (or shutdown was requested); no cycle runs anymore.
    ShuttingDown,
    /// Fully stopped; terminal.
    Stopped,
}

/// What one scheduler tick produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// A full fast cycle ran; the registry snapshot is ready for render sync.
    Frame(FrameStats),
    /// The liveness probe failed this tick; the run is over. No fast cycle
    /// ran and none will.
    Shutdown,
    /// The scheduler is not running; nothing was done.
    Idle,
}

/// Per-tick bookkeeping for the frame-counter display and logs.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameStats {
    /// Monotonic frame number, starting at 1 for the first tick.
    pub frame: u64,
    /// Entities tracked after this tick's prune.
    pub tracked: usize,
    /// Entities pruned by this tick.
    pub pruned: usize,
    /// Smoothed frames-per-second estimate.
    pub fps: f32,
}

/// Timing knobs for the two slow cycles.
///
/// Defaults match the production cadence (rescan every 5 s, liveness every
/// 3 s); tests shorten both to keep scenarios fast.
#[derive(Debug, Clone, Copy)]
pub struct SchedulerConfig {
    /// Period of the full-rescan cycle.
    pub rescan_period: Duration,
    /// Period of the liveness cycle.
    pub liveness_period: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            rescan_period: Duration::from_secs(5),
            liveness_period: Duration::from_secs(3),
        }
    }
}

/// Owns the registry and viewpoint and drives all three cycles against them.
///
/// Single-writer by construction: the only mutation paths into the registry
/// and viewpoint are the methods below, and the hosting loop calls them from
/// one thread.
#[derive(Debug)]
pub struct UpdateScheduler {
    registry: EntityRegistry,
    viewpoint: ViewpointTracker,
    rescan_interval: Interval,
    liveness_interval: Interval,
    state: SchedulerState,
    frame_count: u64,
    last_tick: Option<Instant>,
    fps_smoothed: f32,
}

impl UpdateScheduler {
    /// Creates a scheduler in `Initializing` with the given cycle periods.
    pub fn new(config: SchedulerConfig) -> Self {
        Self {
            registry: EntityRegistry::new(),
            viewpoint: ViewpointTracker::new(),
            rescan_interval: Interval::new(config.rescan_period),
            liveness_interval: Interval::new(config.liveness_period),
            state: SchedulerState::Initializing,
            frame_count: 0,
            last_tick: None,
            fps_smoothed: 0.0,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// The registry owned by this scheduler (read-only access).
    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    /// The viewpoint produced by the most recent fast cycle.
    pub fn viewpoint(&self) -> &Viewpoint {
        self.viewpoint.current()
    }

    /// Performs the eager first rescan and enters `Running`.
    ///
    /// Synchronous so the first rendered frame is never empty. A failure
    /// here is fatal to startup (unlike the soft periodic rescan failures):
    /// it means the source cannot see the process at all.
    pub fn bootstrap(&mut self, source: &mut dyn EntitySource) -> Result<(), SourceError> {
        debug_assert_eq!(self.state, SchedulerState::Initializing);

        let records = source.rescan()?;
        log::info!("initial rescan found {} entities", records.len());
        self.registry.apply_rescan(records);

        self.state = SchedulerState::Running;
        Ok(())
    }

    /// Runs one cooperative cycle. See the module docs for the ordering.
    pub fn tick(&mut self, source: &mut dyn EntitySource) -> TickOutcome {
        if self.state != SchedulerState::Running {
            return TickOutcome::Idle;
        }

        if self.liveness_interval.tick_ready() && !source.is_process_alive() {
            log::info!("target process is gone, shutting down the overlay");
            self.state = SchedulerState::ShuttingDown;
            return TickOutcome::Shutdown;
        }

        if self.rescan_interval.tick_ready() {
            match source.rescan() {
                Ok(records) => {
                    log::debug!("rescan returned {} entities", records.len());
                    self.registry.apply_rescan(records);
                }
                // Soft failure: keep the current set, retry next period.
                Err(e) => log::warn!("rescan failed, keeping current registry: {e}"),
            }
        }

        // Fast cycle. The viewpoint is rewritten strictly before any entity
        // reads it, and pruning runs strictly after the last update.
        self.viewpoint.refresh(source);
        self.registry
            .update_all(self.viewpoint.current(), source);
        let pruned = self.registry.prune_invalid();

        TickOutcome::Frame(self.finish_frame(pruned))
    }

    /// Completes shutdown: `ShuttingDown` (or `Running`, if the hosting loop
    /// exited for its own reasons, e.g. the window was closed) → `Stopped`.
    pub fn finish(&mut self) {
        match self.state {
            SchedulerState::Stopped => {}
            _ => {
                log::info!(
                    "scheduler stopped after {} frames, {} entities tracked",
                    self.frame_count,
                    self.registry.len()
                );
                self.state = SchedulerState::Stopped;
            }
        }
    }

    fn finish_frame(&mut self, pruned: usize) -> FrameStats {
        let now = Instant::now();
        if let Some(last) = self.last_tick {
            let delta = now.duration_since(last).as_secs_f32();
            if delta > 0.0 {
                let instant_fps = 1.0 / delta;
                self.fps_smoothed = if self.fps_smoothed == 0.0 {
                    instant_fps
                } else {
                    self.fps_smoothed * 0.9 + instant_fps * 0.1
                };
            }
        }
        self.last_tick = Some(now);
        self.frame_count += 1;

        FrameStats {
            frame: self.frame_count,
            tracked: self.registry.len(),
            pruned,
            fps: self.fps_smoothed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec3;
    use crate::source::{EntityHandle, EntityKind, RawEntityRecord, RawViewpoint};
    use std::collections::HashSet;

    /// A scriptable source that records the order of every call.
    struct RecordingSource {
        ops: Vec<String>,
        records: Vec<RawEntityRecord>,
        viewpoint_x: f32,
        alive: bool,
    }

    impl RecordingSource {
        fn with(records: Vec<RawEntityRecord>) -> Self {
            Self {
                ops: Vec::new(),
                records,
                viewpoint_x: 0.0,
                alive: true,
            }
        }
    }

    impl EntitySource for RecordingSource {
        fn rescan(&mut self) -> Result<Vec<RawEntityRecord>, SourceError> {
            self.ops.push("rescan".to_string());
            Ok(self.records.clone())
        }

        fn refresh_viewpoint(&mut self) -> Result<RawViewpoint, SourceError> {
            self.ops.push("viewpoint".to_string());
            // Moves one unit per refresh so tests can tell refreshes apart.
            self.viewpoint_x += 1.0;
            Ok(RawViewpoint {
                position: Vec3::new(self.viewpoint_x, 0.0, 0.0),
                yaw_deg: 0.0,
                fov_deg: 90.0,
            })
        }

        fn probe(&mut self, handle: EntityHandle) -> Option<RawEntityRecord> {
            self.ops.push(format!("probe {}", handle.0));
            self.records.iter().find(|r| r.handle == handle).cloned()
        }

        fn is_process_alive(&mut self) -> bool {
            self.ops.push("alive".to_string());
            self.alive
        }
    }

    fn record(handle: u64, kind: EntityKind, position: Vec3) -> RawEntityRecord {
        RawEntityRecord {
            handle: EntityHandle(handle),
            kind,
            name: format!("entity-{handle}"),
            position,
        }
    }

    fn quick_config() -> SchedulerConfig {
        // Slow cycles effectively disabled for fast-cycle-only tests.
        SchedulerConfig {
            rescan_period: Duration::from_secs(3600),
            liveness_period: Duration::from_secs(3600),
        }
    }

    #[test]
    fn bootstrap_rescans_eagerly_and_enters_running() {
        let mut scheduler = UpdateScheduler::new(quick_config());
        let mut source = RecordingSource::with(vec![
            record(1, EntityKind::Player, Vec3::new(5.0, 0.0, 0.0)),
            record(2, EntityKind::Ship, Vec3::new(50.0, 0.0, 0.0)),
        ]);

        assert_eq!(scheduler.state(), SchedulerState::Initializing);
        scheduler.bootstrap(&mut source).unwrap();

        assert_eq!(scheduler.state(), SchedulerState::Running);
        // First frame will not be empty.
        assert_eq!(scheduler.registry().len(), 2);
        assert_eq!(source.ops, vec!["rescan"]);
    }

    #[test]
    fn fast_cycle_refreshes_viewpoint_before_any_update() {
        let mut scheduler = UpdateScheduler::new(quick_config());
        let mut source = RecordingSource::with(vec![
            record(1, EntityKind::Player, Vec3::new(5.0, 0.0, 0.0)),
            record(2, EntityKind::Player, Vec3::new(6.0, 0.0, 0.0)),
        ]);
        scheduler.bootstrap(&mut source).unwrap();
        source.ops.clear();

        let outcome = scheduler.tick(&mut source);
        assert!(matches!(outcome, TickOutcome::Frame(_)));
        assert_eq!(source.ops, vec!["viewpoint", "probe 1", "probe 2"]);
    }

    #[test]
    fn updates_use_this_cycles_viewpoint() {
        let mut scheduler = UpdateScheduler::new(quick_config());
        let entity_pos = Vec3::new(10.0, 0.0, 0.0);
        let mut source =
            RecordingSource::with(vec![record(1, EntityKind::Player, entity_pos)]);
        scheduler.bootstrap(&mut source).unwrap();

        // Two ticks; two viewpoint refreshes at x=1 then x=2.
        scheduler.tick(&mut source);
        scheduler.tick(&mut source);

        let relative = scheduler.registry().snapshot()[0].relative();
        // Distance reflects the second refresh (x=2), not the first.
        assert_eq!(relative.distance, 8.0);
        assert_eq!(scheduler.viewpoint().position.x, 2.0);
    }

    #[test]
    fn fast_cycle_prunes_invalid_entities() {
        let mut scheduler = UpdateScheduler::new(quick_config());
        let mut source = RecordingSource::with(vec![
            record(1, EntityKind::Player, Vec3::new(5.0, 0.0, 0.0)),
            record(2, EntityKind::Player, Vec3::new(6.0, 0.0, 0.0)),
            record(3, EntityKind::Player, Vec3::new(7.0, 0.0, 0.0)),
        ]);
        scheduler.bootstrap(&mut source).unwrap();

        // B despawns between bootstrap and the first fast cycle.
        source.records.retain(|r| r.handle != EntityHandle(2));

        let outcome = scheduler.tick(&mut source);
        let TickOutcome::Frame(stats) = outcome else {
            panic!("expected a frame, got {outcome:?}");
        };

        assert_eq!(stats.pruned, 1);
        assert_eq!(stats.tracked, 2);
        let survivors: HashSet<u64> = scheduler
            .registry()
            .snapshot()
            .iter()
            .map(|e| e.handle().0)
            .collect();
        assert_eq!(survivors, HashSet::from([1, 3]));
    }

    #[test]
    fn due_rescan_runs_before_the_fast_cycle() {
        let config = SchedulerConfig {
            rescan_period: Duration::ZERO, // due every tick
            liveness_period: Duration::from_secs(3600),
        };
        let mut scheduler = UpdateScheduler::new(config);
        let mut source =
            RecordingSource::with(vec![record(1, EntityKind::Player, Vec3::new(5.0, 0.0, 0.0))]);
        scheduler.bootstrap(&mut source).unwrap();

        // A new entity appears; the rescan in the same tick picks it up and
        // the fast cycle updates it before the frame is handed over.
        source
            .records
            .push(record(9, EntityKind::Loot, Vec3::new(2.0, 0.0, 0.0)));
        source.ops.clear();

        scheduler.tick(&mut source);
        assert_eq!(
            source.ops,
            vec!["rescan", "viewpoint", "probe 1", "probe 9"]
        );
        assert_eq!(scheduler.registry().len(), 2);
    }

    #[test]
    fn liveness_failure_is_terminal() {
        let config = SchedulerConfig {
            rescan_period: Duration::ZERO,
            liveness_period: Duration::ZERO, // checked every tick
        };
        let mut scheduler = UpdateScheduler::new(config);
        let mut source =
            RecordingSource::with(vec![record(1, EntityKind::Player, Vec3::new(5.0, 0.0, 0.0))]);
        scheduler.bootstrap(&mut source).unwrap();

        // First tick passes the check and runs a full cycle.
        assert!(matches!(scheduler.tick(&mut source), TickOutcome::Frame(_)));

        source.alive = false;
        source.ops.clear();

        assert_eq!(scheduler.tick(&mut source), TickOutcome::Shutdown);
        assert_eq!(scheduler.state(), SchedulerState::ShuttingDown);
        // The failed check cancels the tick: no rescan, no fast cycle.
        assert_eq!(source.ops, vec!["alive"]);

        // And every later tick is a no-op, even if the source recovers.
        source.alive = true;
        source.ops.clear();
        assert_eq!(scheduler.tick(&mut source), TickOutcome::Idle);
        assert!(source.ops.is_empty());

        scheduler.finish();
        assert_eq!(scheduler.state(), SchedulerState::Stopped);
        assert_eq!(scheduler.tick(&mut source), TickOutcome::Idle);
    }

    #[test]
    fn frame_stats_count_monotonically() {
        let mut scheduler = UpdateScheduler::new(quick_config());
        let mut source = RecordingSource::with(Vec::new());
        scheduler.bootstrap(&mut source).unwrap();

        let TickOutcome::Frame(first) = scheduler.tick(&mut source) else {
            panic!("expected a frame");
        };
        let TickOutcome::Frame(second) = scheduler.tick(&mut source) else {
            panic!("expected a frame");
        };
        assert_eq!(first.frame, 1);
        assert_eq!(second.frame, 2);
        assert_eq!(second.tracked, 0);
    }
}
