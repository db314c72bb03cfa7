//! World generation.
//!
//! Runs once at startup and scatters the static resources over the map:
//! - trees and bushes per grid cell, with biome exclusion rules,
//! - rocks anywhere,
//! - gold ore anywhere outside the river.
//!
//! Everything is drawn from the caller's rng in a fixed order, so a seeded
//! rng reproduces the exact same world.

use rand::{rngs::StdRng, Rng};
use taiga_shared::{
    config::GameConfig,
    entity::{IdCounter, ResourceKind, WorldEntity},
    math::Vec2,
};

const TREE_SIZES: [f32; 4] = [150.0, 160.0, 165.0, 175.0];
const BUSH_SIZES: [f32; 3] = [80.0, 85.0, 95.0];
const ROCK_SIZES: [f32; 3] = [80.0, 85.0, 95.0];
const GOLD_SIZE: f32 = 80.0;

/// Generates the full resource set for one world.
pub fn generate(cfg: &GameConfig, rng: &mut StdRng, ids: &mut IdCounter) -> Vec<WorldEntity> {
    let mut out = Vec::new();
    let cell = cfg.map_scale / cfg.area_count as f32;

    for cy in 0..cfg.area_count {
        for cx in 0..cfg.area_count {
            let x0 = cx as f32 * cell;
            let y0 = cy as f32 * cell;

            for _ in 0..cfg.trees_per_area {
                let pos = Vec2::new(rng.gen_range(x0..x0 + cell), rng.gen_range(y0..y0 + cell));
                // Trees grow below the snow line and never in the river.
                // A failed sample is skipped, not retried.
                if cfg.in_snow(pos.y) || cfg.in_river(pos.y) {
                    continue;
                }
                out.push(place(rng, ids, pos, &TREE_SIZES, ResourceKind::Tree));
            }

            for _ in 0..cfg.bushes_per_area {
                let pos = Vec2::new(rng.gen_range(x0..x0 + cell), rng.gen_range(y0..y0 + cell));
                if cfg.in_river(pos.y) {
                    continue;
                }
                out.push(place(rng, ids, pos, &BUSH_SIZES, ResourceKind::Bush));
            }
        }
    }

    for _ in 0..cfg.rock_count {
        let pos = Vec2::new(
            rng.gen_range(0.0..cfg.map_scale),
            rng.gen_range(0.0..cfg.map_scale),
        );
        out.push(place(rng, ids, pos, &ROCK_SIZES, ResourceKind::Rock));
    }

    for _ in 0..cfg.gold_count {
        // Sample y over the valid region directly instead of rejecting river
        // hits, so placement always terminates.
        let (river_top, river_bottom) = cfg.river_bounds();
        let valid_height = cfg.map_scale - (river_bottom - river_top);
        let mut y = rng.gen_range(0.0..valid_height);
        if y >= river_top {
            y += river_bottom - river_top;
        }
        let pos = Vec2::new(rng.gen_range(0.0..cfg.map_scale), y);
        out.push(place(rng, ids, pos, &[GOLD_SIZE], ResourceKind::Gold));
    }

    out
}

fn place(
    rng: &mut StdRng,
    ids: &mut IdCounter,
    pos: Vec2,
    sizes: &[f32],
    kind: ResourceKind,
) -> WorldEntity {
    WorldEntity {
        id: ids.next(),
        pos,
        angle: rng.gen_range(0.0..std::f32::consts::TAU),
        size: sizes[rng.gen_range(0..sizes.len())],
        kind,
    }
}
