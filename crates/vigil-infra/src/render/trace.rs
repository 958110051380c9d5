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

//! A renderer backend that records draw calls instead of rasterizing.
//!
//! Default backend for the binary until a GPU backend is plugged in, and the
//! recording double used by render-sync tests. Each call is logged at
//! `trace`; the current frame's primitives stay inspectable until the next
//! `clear_frame`.

use vigil_core::math::{Rgba, Vec2};
use vigil_core::renderer::OverlayRenderer;

/// Records and logs one frame's worth of draw calls.
#[derive(Debug, Default)]
pub struct TraceRenderer {
    quads: Vec<(Vec2, Vec2, Rgba)>,
    labels: Vec<(String, Vec2)>,
    frames_presented: u64,
}

impl TraceRenderer {
    /// Creates an empty trace renderer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Quads drawn since the last `clear_frame`, in call order.
    pub fn quads(&self) -> &[(Vec2, Vec2, Rgba)] {
        &self.quads
    }

    /// Labels drawn since the last `clear_frame`, in call order.
    pub fn labels(&self) -> &[(String, Vec2)] {
        &self.labels
    }

    /// How many frames have been presented.
    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }
}

impl OverlayRenderer for TraceRenderer {
    fn clear_frame(&mut self) {
        self.quads.clear();
        self.labels.clear();
    }

    fn draw_quad(&mut self, position: Vec2, size: Vec2, color: Rgba) {
        log::trace!(
            "quad at ({:.1}, {:.1}) size ({:.1}, {:.1})",
            position.x,
            position.y,
            size.x,
            size.y
        );
        self.quads.push((position, size, color));
    }

    fn draw_label(&mut self, text: &str, position: Vec2) {
        log::trace!("label '{}' at ({:.1}, {:.1})", text, position.x, position.y);
        self.labels.push((text.to_string(), position));
    }

    fn present_frame(&mut self) {
        self.frames_presented += 1;
        log::trace!(
            "frame {} presented: {} quads, {} labels",
            self.frames_presented,
            self.quads.len(),
            self.labels.len()
        );
    }
}
