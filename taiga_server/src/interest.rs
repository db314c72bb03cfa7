//! Spatial interest management.
//!
//! Decides which static entities a viewer gets told about. The inclusion
//! test is an axis-aligned rectangle overlap: both the viewer and the
//! entity project a screen-sized rectangle around their position, and the
//! entity is in view when the rectangles intersect. Entities are disclosed
//! once per life; [`ViewSet`] remembers what a session has already seen.

use std::collections::HashSet;

use taiga_shared::{config::GameConfig, entity::WorldEntity, math::Vec2};

/// Rectangle overlap test. Two screen rects with half-extents
/// (view_width/2, view_height/2) around `viewer` and `target` intersect
/// exactly when both axis distances are within one full screen dimension.
pub fn in_view(cfg: &GameConfig, viewer: Vec2, target: Vec2) -> bool {
    (target.x - viewer.x).abs() <= cfg.view_width && (target.y - viewer.y).abs() <= cfg.view_height
}

/// Ids already disclosed to one viewer. Never shrinks while the session is
/// alive; a revealed entity stays known until respawn clears the set.
#[derive(Debug, Clone, Default)]
pub struct ViewSet {
    seen: HashSet<u32>,
}

impl ViewSet {
    pub fn clear(&mut self) {
        self.seen.clear();
    }

    pub fn contains(&self, id: u32) -> bool {
        self.seen.contains(&id)
    }

    /// Marks an id as seen; returns true if it was new.
    pub fn mark(&mut self, id: u32) -> bool {
        self.seen.insert(id)
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

/// Collects the in-view entities this viewer has not seen yet and marks
/// them seen. Linear scan; the entity set stays in the hundreds at the
/// default map size.
pub fn reveal(
    cfg: &GameConfig,
    viewer: Vec2,
    seen: &mut ViewSet,
    entities: &[WorldEntity],
) -> Vec<WorldEntity> {
    let mut fresh = Vec::new();
    for ent in entities {
        if in_view(cfg, viewer, ent.pos) && seen.mark(ent.id) {
            fresh.push(*ent);
        }
    }
    fresh
}
