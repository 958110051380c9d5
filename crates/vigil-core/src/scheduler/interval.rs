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

//! Wall-clock interval gate for the slow cycles.

use std::time::{Duration, Instant};

/// A repeating interval checked at tick boundaries.
///
/// This is deliberately not a timer that fires on its own: the scheduler
/// polls it once per tick, so interval work can only ever interleave with
/// the fast cycle at cycle boundaries, never mid-iteration.
#[derive(Debug)]
pub struct Interval {
    period: Duration,
    last_fired: Instant,
}

impl Interval {
    /// Creates an interval whose first firing is one full period from now.
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            last_fired: Instant::now(),
        }
    }

    /// The configured period.
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Whether a full period has elapsed since the last firing.
    pub fn ready(&self) -> bool {
        self.last_fired.elapsed() >= self.period
    }

    /// Checks readiness and, if ready, consumes the firing.
    ///
    /// Returns `true` at most once per elapsed period.
    pub fn tick_ready(&mut self) -> bool {
        if self.ready() {
            self.last_fired = Instant::now();
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn interval_is_not_ready_immediately() {
        let interval = Interval::new(Duration::from_secs(5));
        assert!(!interval.ready());
    }

    #[test]
    fn interval_fires_after_period_and_rearms() {
        let mut interval = Interval::new(Duration::from_millis(50));
        assert!(!interval.tick_ready());

        thread::sleep(Duration::from_millis(75));
        assert!(interval.tick_ready());

        // Consumed: not ready again until another period passes.
        assert!(!interval.tick_ready());
    }

    #[test]
    fn zero_period_interval_is_always_ready() {
        let mut interval = Interval::new(Duration::ZERO);
        assert!(interval.tick_ready());
        assert!(interval.tick_ready());
    }
}
