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

//! End-to-end loop tests: scheduler + scripted source + trace renderer,
//! without a window. This is the same wiring the binary runs, minus winit.

use std::thread::sleep;
use std::time::Duration;
use vigil_core::compose_frame;
use vigil_core::scheduler::{SchedulerConfig, SchedulerState, TickOutcome, UpdateScheduler};
use vigil_core::source::EntityKind;
use vigil_infra::{SceneScript, ScriptedEntity, ScriptedSource, TraceRenderer};

fn fast_config() -> SchedulerConfig {
    SchedulerConfig {
        rescan_period: Duration::from_millis(40),
        liveness_period: Duration::from_millis(25),
    }
}

fn one_player(despawn_after_secs: Option<f32>) -> SceneScript {
    SceneScript {
        entities: vec![ScriptedEntity {
            kind: EntityKind::Player,
            name: "Redbeard".to_string(),
            orbit_radius: 100.0,
            angular_speed_deg: 12.0,
            despawn_after_secs,
        }],
        process_exits_after_secs: None,
    }
}

#[test]
fn first_frame_after_bootstrap_already_draws_the_scene() {
    let mut source = ScriptedSource::new(SceneScript::default());
    let mut scheduler = UpdateScheduler::new(SchedulerConfig::default());
    let mut renderer = TraceRenderer::new();

    scheduler.bootstrap(&mut source).unwrap();
    assert_eq!(scheduler.state(), SchedulerState::Running);
    assert_eq!(scheduler.registry().len(), 4);

    let TickOutcome::Frame(stats) = scheduler.tick(&mut source) else {
        panic!("first tick of a running scheduler should produce a frame");
    };
    compose_frame(&mut renderer, scheduler.registry().snapshot(), stats, (800, 600));

    // All four default entities are within their kinds' visible ranges.
    assert_eq!(renderer.quads().len(), 4);
    assert!(renderer
        .labels()
        .iter()
        .any(|(text, _)| text == "Tracked: 4"));
    assert_eq!(renderer.frames_presented(), 1);
}

#[test]
fn despawned_entity_is_pruned_by_the_fast_cycle() {
    let mut source = ScriptedSource::new(one_player(Some(0.05)));
    let mut scheduler = UpdateScheduler::new(SchedulerConfig::default());
    scheduler.bootstrap(&mut source).unwrap();
    assert_eq!(scheduler.registry().len(), 1);

    sleep(Duration::from_millis(80));

    // The probe now returns None for the despawned entity, so the same tick
    // marks and prunes it.
    let TickOutcome::Frame(stats) = scheduler.tick(&mut source) else {
        panic!("scheduler should still be running");
    };
    assert_eq!(stats.pruned, 1);
    assert_eq!(stats.tracked, 0);
    assert!(scheduler.registry().is_empty());
}

#[test]
fn process_exit_shuts_the_loop_down_for_good() {
    let mut script = one_player(None);
    script.process_exits_after_secs = Some(0.04);
    let mut source = ScriptedSource::new(script);
    let mut scheduler = UpdateScheduler::new(fast_config());
    let mut renderer = TraceRenderer::new();

    scheduler.bootstrap(&mut source).unwrap();

    let mut frames = 0u32;
    let mut shut_down = false;
    for _ in 0..50 {
        match scheduler.tick(&mut source) {
            TickOutcome::Frame(stats) => {
                frames += 1;
                compose_frame(&mut renderer, scheduler.registry().snapshot(), stats, (640, 480));
            }
            TickOutcome::Shutdown => {
                shut_down = true;
                break;
            }
            TickOutcome::Idle => panic!("scheduler went idle without shutting down"),
        }
        sleep(Duration::from_millis(10));
    }

    assert!(shut_down, "liveness check never failed");
    assert!(frames > 0, "at least one frame should render before the exit");
    assert_eq!(renderer.frames_presented() as u32, frames);
    assert_eq!(scheduler.state(), SchedulerState::ShuttingDown);

    // Liveness failure is terminal: no callbacks fire again, even though the
    // scripted clock keeps advancing.
    sleep(Duration::from_millis(30));
    assert_eq!(scheduler.tick(&mut source), TickOutcome::Idle);
    assert_eq!(renderer.frames_presented() as u32, frames);

    scheduler.finish();
    assert_eq!(scheduler.state(), SchedulerState::Stopped);
    assert_eq!(scheduler.tick(&mut source), TickOutcome::Idle);
}
