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

//! Render sync: hands the post-prune registry snapshot to the renderer.
//!
//! Purely a consumer. It reads the snapshot the scheduler produced this tick
//! and emits draw calls; it never mutates an entity or the registry. Layout
//! is a deterministic `ceil(sqrt(n))` grid in registry order, which is why
//! the registry keeps scan order stable.

use crate::entity::Entity;
use crate::math::{Rgba, Vec2};
use crate::renderer::OverlayRenderer;
use crate::scheduler::FrameStats;
use crate::source::EntityKind;

/// Inset of the label from its cell's bottom-left corner, in pixels.
const LABEL_INSET: f32 = 4.0;

fn kind_color(kind: EntityKind) -> Rgba {
    match kind {
        EntityKind::Player => Rgba::RED.with_alpha(0.6),
        EntityKind::Ship => Rgba::YELLOW.with_alpha(0.6),
        EntityKind::Loot => Rgba::GREEN.with_alpha(0.6),
    }
}

/// Composes one overlay frame from the given snapshot.
///
/// `overlay_size` is the overlay's inner size in pixels. The call sequence
/// is always `clear`, the tracked-count label, one quad + one label per
/// entity, the frame counter, `present`. An empty snapshot still gets a full
/// frame, so a backend can rely on the shape.
pub fn compose_frame(
    renderer: &mut dyn OverlayRenderer,
    entities: &[Entity],
    stats: FrameStats,
    overlay_size: (u32, u32),
) {
    let (width, height) = (overlay_size.0 as f32, overlay_size.1 as f32);

    renderer.clear_frame();

    renderer.draw_label(
        &format!("Tracked: {}", entities.len()),
        Vec2::new(width * 0.85, height * 0.9),
    );

    if !entities.is_empty() {
        let grid = (entities.len() as f32).sqrt().ceil() as usize;
        let cell_w = width / grid as f32;
        let cell_h = height / grid as f32;

        for (index, entity) in entities.iter().enumerate() {
            let row = index / grid;
            let col = index % grid;
            let origin = Vec2::new(col as f32 * cell_w, row as f32 * cell_h);

            renderer.draw_quad(origin, Vec2::new(cell_w, cell_h), kind_color(entity.kind()));
            renderer.draw_label(
                &format!("{} {:.0}m", entity.name(), entity.relative().distance),
                origin + Vec2::new(LABEL_INSET, LABEL_INSET),
            );
        }
    }

    renderer.draw_label(
        &format!("frame {} | {:.1} fps", stats.frame, stats.fps),
        Vec2::new(LABEL_INSET, LABEL_INSET),
    );

    renderer.present_frame();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec3;
    use crate::source::{EntityHandle, RawEntityRecord};

    /// Records draw calls in order so tests can assert the frame shape.
    #[derive(Default)]
    struct RecordingRenderer {
        calls: Vec<String>,
        quads: Vec<(Vec2, Vec2, Rgba)>,
    }

    impl OverlayRenderer for RecordingRenderer {
        fn clear_frame(&mut self) {
            self.calls.push("clear".to_string());
        }

        fn draw_quad(&mut self, position: Vec2, size: Vec2, color: Rgba) {
            self.calls.push("quad".to_string());
            self.quads.push((position, size, color));
        }

        fn draw_label(&mut self, text: &str, _position: Vec2) {
            self.calls.push(format!("label: {text}"));
        }

        fn present_frame(&mut self) {
            self.calls.push("present".to_string());
        }
    }

    fn entity(handle: u64, kind: EntityKind, name: &str) -> Entity {
        Entity::from_record(RawEntityRecord {
            handle: EntityHandle(handle),
            kind,
            name: name.to_string(),
            position: Vec3::ZERO,
        })
    }

    #[test]
    fn empty_snapshot_still_produces_a_full_frame() {
        let mut renderer = RecordingRenderer::default();
        compose_frame(&mut renderer, &[], FrameStats::default(), (800, 600));

        assert_eq!(renderer.calls.first().unwrap(), "clear");
        assert_eq!(renderer.calls.last().unwrap(), "present");
        assert!(renderer.calls.contains(&"label: Tracked: 0".to_string()));
        assert!(!renderer.calls.contains(&"quad".to_string()));
    }

    #[test]
    fn three_entities_lay_out_on_a_two_by_two_grid() {
        let entities = vec![
            entity(1, EntityKind::Player, "a"),
            entity(2, EntityKind::Ship, "b"),
            entity(3, EntityKind::Loot, "c"),
        ];
        let mut renderer = RecordingRenderer::default();
        compose_frame(&mut renderer, &entities, FrameStats::default(), (800, 600));

        assert_eq!(renderer.quads.len(), 3);
        // ceil(sqrt(3)) = 2: cells are 400x300, filled row by row.
        assert_eq!(renderer.quads[0].0, Vec2::new(0.0, 0.0));
        assert_eq!(renderer.quads[1].0, Vec2::new(400.0, 0.0));
        assert_eq!(renderer.quads[2].0, Vec2::new(0.0, 300.0));
        assert!(renderer.quads.iter().all(|q| q.1 == Vec2::new(400.0, 300.0)));
    }

    #[test]
    fn quad_color_tracks_entity_kind() {
        let entities = vec![
            entity(1, EntityKind::Player, "a"),
            entity(2, EntityKind::Loot, "b"),
        ];
        let mut renderer = RecordingRenderer::default();
        compose_frame(&mut renderer, &entities, FrameStats::default(), (100, 100));

        assert_eq!(renderer.quads[0].2, Rgba::RED.with_alpha(0.6));
        assert_eq!(renderer.quads[1].2, Rgba::GREEN.with_alpha(0.6));
    }

    #[test]
    fn frame_counter_label_reflects_stats() {
        let stats = FrameStats {
            frame: 42,
            tracked: 0,
            pruned: 0,
            fps: 59.94,
        };
        let mut renderer = RecordingRenderer::default();
        compose_frame(&mut renderer, &[], stats, (100, 100));
        assert!(renderer
            .calls
            .contains(&"label: frame 42 | 59.9 fps".to_string()));
    }
}
