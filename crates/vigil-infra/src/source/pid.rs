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

//! sysinfo-based process liveness probe.

use sysinfo::{Pid, ProcessesToUpdate, System};

/// Checks whether a given pid still names a live process.
///
/// This backs the liveness cycle when the overlay watches a real process.
/// Each check refreshes only the watched pid, not the whole process table.
pub struct PidProbe {
    system: System,
    pid: Pid,
}

impl PidProbe {
    /// Creates a probe for the given pid.
    pub fn new(pid: u32) -> Self {
        Self {
            system: System::new(),
            pid: Pid::from_u32(pid),
        }
    }

    /// The pid being watched.
    pub fn pid(&self) -> u32 {
        self.pid.as_u32()
    }

    /// Refreshes and reports whether the process still exists.
    pub fn is_alive(&mut self) -> bool {
        self.system
            .refresh_processes(ProcessesToUpdate::Some(&[self.pid]), true);
        self.system.process(self.pid).is_some()
    }
}
