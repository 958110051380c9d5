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

//! Runtime configuration, loaded from an optional JSON file.
//!
//! Every field has a default, so an empty `{}` (or no file at all) yields a
//! runnable overlay over the default scripted scene.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use vigil_core::scheduler::SchedulerConfig;
use vigil_infra::{SceneScript, TargetBounds};

/// Which process the overlay shadows and where its window sits.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TargetConfig {
    /// Pid whose liveness gates the overlay. `None` uses the scene script's
    /// own exit deadline (or runs forever).
    pub pid: Option<u32>,
    /// Screen rectangle the overlay covers, normally the target's window.
    pub bounds: TargetBounds,
}

/// Periods of the two slow cycles, in seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Seconds between full entity rescans.
    pub rescan_interval_secs: f32,
    /// Seconds between target-process liveness checks.
    pub liveness_interval_secs: f32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            rescan_interval_secs: 5.0,
            liveness_interval_secs: 3.0,
        }
    }
}

impl TimingConfig {
    /// Converts the seconds-based knobs into the scheduler's configuration.
    pub fn scheduler_config(&self) -> SchedulerConfig {
        SchedulerConfig {
            rescan_period: Duration::from_secs_f32(self.rescan_interval_secs),
            liveness_period: Duration::from_secs_f32(self.liveness_interval_secs),
        }
    }
}

/// Top-level overlay configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct OverlayConfig {
    /// Target process and window placement.
    pub target: TargetConfig,
    /// Cycle timing.
    pub timing: TimingConfig,
    /// The scripted scene the stand-in source plays.
    pub scene: SceneScript,
}

impl OverlayConfig {
    /// Loads a configuration from a JSON file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config: Self = serde_json::from_str(&raw)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        log::info!("loaded config from {}", path.display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_json_object_yields_defaults() {
        let config: OverlayConfig = serde_json::from_str("{}").unwrap();
        assert!(config.target.pid.is_none());
        assert_eq!(config.timing.rescan_interval_secs, 5.0);
        assert_eq!(config.timing.liveness_interval_secs, 3.0);
        assert_eq!(config.scene.entities.len(), 4);
    }

    #[test]
    fn partial_config_overrides_only_named_fields() {
        let config: OverlayConfig = serde_json::from_str(
            r#"{
                "target": { "pid": 4242 },
                "timing": { "rescan_interval_secs": 1.5 }
            }"#,
        )
        .unwrap();
        assert_eq!(config.target.pid, Some(4242));
        assert_eq!(config.timing.rescan_interval_secs, 1.5);
        // Untouched fields keep their defaults.
        assert_eq!(config.timing.liveness_interval_secs, 3.0);
        assert_eq!(config.target.bounds.width, 1920);
    }

    #[test]
    fn scheduler_config_converts_seconds_to_durations() {
        let timing = TimingConfig {
            rescan_interval_secs: 0.25,
            liveness_interval_secs: 2.0,
        };
        let config = timing.scheduler_config();
        assert_eq!(config.rescan_period, Duration::from_millis(250));
        assert_eq!(config.liveness_period, Duration::from_secs(2));
    }

    #[test]
    fn load_round_trips_through_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("overlay.json");

        let mut config = OverlayConfig::default();
        config.target.pid = Some(777);
        let mut file = fs::File::create(&path).unwrap();
        write!(file, "{}", serde_json::to_string_pretty(&config).unwrap()).unwrap();

        let loaded = OverlayConfig::load(&path).unwrap();
        assert_eq!(loaded.target.pid, Some(777));
        assert_eq!(loaded.scene.entities.len(), config.scene.entities.len());
    }

    #[test]
    fn load_reports_missing_file_with_its_path() {
        let err = OverlayConfig::load(Path::new("/nonexistent/overlay.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/overlay.json"));
    }
}
