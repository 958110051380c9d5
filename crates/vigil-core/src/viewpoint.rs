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

//! The observer's own state, refreshed once per fast cycle.

use crate::math::Vec3;
use crate::source::{EntitySource, RawViewpoint};

/// The observer's position and facing, as used by entity updates.
///
/// Exactly one `Viewpoint` value is live per fast cycle: the tracker rewrites
/// it at the top of the cycle, strictly before any entity update reads it,
/// and nothing else writes to it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewpoint {
    /// World-space position of the observer.
    pub position: Vec3,
    /// Facing angle in degrees on the horizontal plane.
    pub yaw_deg: f32,
    /// Horizontal field of view in degrees.
    pub fov_deg: f32,
}

impl Viewpoint {
    /// A neutral viewpoint at the world origin, used before the first
    /// successful refresh.
    pub const ORIGIN: Self = Self {
        position: Vec3::ZERO,
        yaw_deg: 0.0,
        fov_deg: 90.0,
    };
}

impl From<RawViewpoint> for Viewpoint {
    fn from(raw: RawViewpoint) -> Self {
        Self {
            position: raw.position,
            yaw_deg: raw.yaw_deg,
            fov_deg: raw.fov_deg,
        }
    }
}

/// Owns the current [`Viewpoint`] and refreshes it from the source.
///
/// A failed refresh keeps the previous viewpoint in place: a one-cycle-stale
/// observer position degrades the projection slightly, whereas failing the
/// whole tick would drop the frame.
#[derive(Debug)]
pub struct ViewpointTracker {
    current: Viewpoint,
}

impl ViewpointTracker {
    /// Creates a tracker holding the neutral origin viewpoint.
    pub fn new() -> Self {
        Self {
            current: Viewpoint::ORIGIN,
        }
    }

    /// Re-reads the observer state from the source.
    ///
    /// Called exactly once at the start of each fast cycle, before any
    /// entity update. On error the previous viewpoint is retained.
    pub fn refresh(&mut self, source: &mut dyn EntitySource) {
        match source.refresh_viewpoint() {
            Ok(raw) => self.current = Viewpoint::from(raw),
            Err(e) => {
                log::debug!("viewpoint refresh failed, keeping previous: {e}");
            }
        }
    }

    /// The viewpoint produced by the most recent successful refresh.
    pub fn current(&self) -> &Viewpoint {
        &self.current
    }
}

impl Default for ViewpointTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{EntityHandle, RawEntityRecord, SourceError};

    struct FlakyViewpointSource {
        fail: bool,
        position: Vec3,
    }

    impl EntitySource for FlakyViewpointSource {
        fn rescan(&mut self) -> Result<Vec<RawEntityRecord>, SourceError> {
            Ok(Vec::new())
        }

        fn refresh_viewpoint(&mut self) -> Result<RawViewpoint, SourceError> {
            if self.fail {
                Err(SourceError::Unreadable {
                    what: "viewpoint".to_string(),
                    details: "simulated".to_string(),
                })
            } else {
                Ok(RawViewpoint {
                    position: self.position,
                    yaw_deg: 45.0,
                    fov_deg: 90.0,
                })
            }
        }

        fn probe(&mut self, _handle: EntityHandle) -> Option<RawEntityRecord> {
            None
        }

        fn is_process_alive(&mut self) -> bool {
            true
        }
    }

    #[test]
    fn refresh_replaces_current_viewpoint() {
        let mut tracker = ViewpointTracker::new();
        let mut source = FlakyViewpointSource {
            fail: false,
            position: Vec3::new(10.0, 20.0, 3.0),
        };

        tracker.refresh(&mut source);
        assert_eq!(tracker.current().position, Vec3::new(10.0, 20.0, 3.0));
        assert_eq!(tracker.current().yaw_deg, 45.0);
    }

    #[test]
    fn failed_refresh_retains_previous_viewpoint() {
        let mut tracker = ViewpointTracker::new();
        let mut source = FlakyViewpointSource {
            fail: false,
            position: Vec3::new(10.0, 20.0, 3.0),
        };
        tracker.refresh(&mut source);

        source.fail = true;
        source.position = Vec3::new(999.0, 999.0, 999.0);
        tracker.refresh(&mut source);

        // Stale-but-valid beats crashing: the earlier position survives.
        assert_eq!(tracker.current().position, Vec3::new(10.0, 20.0, 3.0));
    }
}
