//! Configuration system.
//!
//! Loads game configuration from JSON strings/files (file IO left to app).
//! Every field has a default, so partial configs are fine.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration for a game server instance.
///
/// Time-like tuning values (`player_decel`, `player_speed`, river drift) are
/// expressed per elapsed millisecond; the tick loop feeds the simulation a
/// delta in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Listener bind addresses. Several entries spread connection load;
    /// every endpoint serves the same world.
    pub listen_addrs: Vec<String>,
    /// Side length of the square map, in world units.
    pub map_scale: f32,
    /// Fixed number of session slots.
    pub max_players: usize,
    /// Fixed simulation tick interval in milliseconds.
    pub tick_ms: u64,
    /// Snapshots broadcast every Nth tick.
    pub client_send_rate: u32,
    /// Per-millisecond exponential velocity damping base, in (0, 1).
    pub player_decel: f32,
    /// Base thrust per millisecond of tick time.
    pub player_speed: f32,
    /// Base player radius.
    pub player_scale: f32,
    /// The snow biome covers y < this line.
    pub snow_biome_top: f32,
    /// Width of the river band centered on the map's horizontal midline.
    pub river_width: f32,
    /// Names longer than this fall back to the placeholder.
    pub max_name_len: usize,
    /// Minimum interval between map-ping broadcasts per session.
    pub map_ping_ms: u64,
    /// Screen rectangle used by the interest query.
    pub view_width: f32,
    pub view_height: f32,
    /// World generation: the map is cut into `area_count²` cells.
    pub area_count: u32,
    pub trees_per_area: u32,
    pub bushes_per_area: u32,
    /// Rocks and gold ores are scattered map-wide, not per cell.
    pub rock_count: u32,
    pub gold_count: u32,
    /// Seed for all world randomness. `None` seeds from entropy.
    pub world_seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            listen_addrs: vec!["127.0.0.1:5000".to_string()],
            map_scale: 14400.0,
            max_players: 50,
            tick_ms: 9,
            client_send_rate: 5,
            player_decel: 0.993,
            player_speed: 0.0016,
            player_scale: 35.0,
            snow_biome_top: 2400.0,
            river_width: 724.0,
            max_name_len: 15,
            map_ping_ms: 2200,
            view_width: 1920.0,
            view_height: 1080.0,
            area_count: 10,
            trees_per_area: 9,
            bushes_per_area: 3,
            rock_count: 32,
            gold_count: 7,
            world_seed: None,
        }
    }
}

impl GameConfig {
    /// Parses config from JSON.
    pub fn from_json_str(s: &str) -> serde_json::Result<Self> {
        serde_json::from_str(s)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    /// The river band as `(top, bottom)` y coordinates.
    pub fn river_bounds(&self) -> (f32, f32) {
        let mid = self.map_scale / 2.0;
        (mid - self.river_width / 2.0, mid + self.river_width / 2.0)
    }

    /// Whether `y` lies strictly inside the river band.
    pub fn in_river(&self, y: f32) -> bool {
        let (top, bottom) = self.river_bounds();
        y > top && y < bottom
    }

    /// Whether `y` lies in the snow biome.
    pub fn in_snow(&self, y: f32) -> bool {
        y < self.snow_biome_top
    }
}
