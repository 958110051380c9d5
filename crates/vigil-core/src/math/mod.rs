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

//! Minimal math primitives for entity projection.
//!
//! Only what the overlay needs: 2D screen positions, 3D world positions, and
//! quad colors. Angular values exposed by this crate are in **degrees**
//! (bearings and yaw come from the observed process in degrees); the
//! conversion constants below are for the trigonometry in between.

/// A small constant for floating-point comparisons.
pub const EPSILON: f32 = 1e-5;

pub use std::f32::consts::PI;

/// The factor to convert degrees to radians (PI / 180.0).
pub const DEG_TO_RAD: f32 = PI / 180.0;
/// The factor to convert radians to degrees (180.0 / PI).
pub const RAD_TO_DEG: f32 = 180.0 / PI;

pub mod color;
pub mod vector;

pub use self::color::Rgba;
pub use self::vector::{Vec2, Vec3};

/// Wraps an angle in degrees into the `[-180, 180)` range.
#[inline]
pub fn wrap_degrees(mut deg: f32) -> f32 {
    while deg >= 180.0 {
        deg -= 360.0;
    }
    while deg < -180.0 {
        deg += 360.0;
    }
    deg
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn wrap_degrees_stays_in_range() {
        assert_relative_eq!(wrap_degrees(0.0), 0.0);
        assert_relative_eq!(wrap_degrees(190.0), -170.0);
        assert_relative_eq!(wrap_degrees(-190.0), 170.0);
        assert_relative_eq!(wrap_degrees(540.0), -180.0);
    }
}
