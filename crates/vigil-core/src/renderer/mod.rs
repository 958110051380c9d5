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

//! The renderer collaborator seam.
//!
//! The core hands a fully pruned snapshot to whatever implements
//! [`OverlayRenderer`]; pixel-level concerns (GPU backend, fonts, blending)
//! live entirely behind this trait.

use crate::math::{Rgba, Vec2};

/// Draw surface for one overlay frame.
///
/// Calls arrive in a fixed shape per frame: `clear_frame`, any number of
/// `draw_quad`/`draw_label`, then `present_frame`. Implementations may batch
/// internally; nothing is expected on screen before `present_frame`.
pub trait OverlayRenderer {
    /// Clears the frame to fully transparent.
    fn clear_frame(&mut self);

    /// Draws an axis-aligned filled quad. `position` is the bottom-left
    /// corner in overlay pixels, origin at the overlay's bottom-left.
    fn draw_quad(&mut self, position: Vec2, size: Vec2, color: Rgba);

    /// Draws a one-line text label at the given overlay position.
    fn draw_label(&mut self, text: &str, position: Vec2);

    /// Finishes and presents the frame.
    fn present_frame(&mut self);
}
