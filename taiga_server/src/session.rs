//! Session state machine and per-tick physics.
//!
//! One session per connected slot. The connection's reader task only ever
//! enqueues intent; everything here is mutated by the world task, so a
//! session is never touched by two ticks at once.
//!
//! Lifecycle: a slot starts `Registering` (connected, no name yet) and
//! turns `Alive` when a name arrives. Death flips it to `Dead`; another
//! register respawns it. The slot is freed on disconnect.

use bytes::Bytes;
use rand::{rngs::StdRng, Rng};
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

use taiga_shared::{
    config::GameConfig,
    math::Vec2,
    wire::{LeaderboardRow, ServerMsg, SnapshotRow, StatusRow},
};

use crate::interest::ViewSet;

pub const MAX_HEALTH: i32 = 100;
/// Minimum time between attack swings, regardless of tick rate.
pub const ATTACK_COOLDOWN_MS: u64 = 500;
/// Placeholder when the submitted name is empty or too long.
pub const DEFAULT_NAME: &str = "unknown";

const RIVER_DRIFT: f32 = 0.0011;
const VELOCITY_SCALE: f32 = 2.0;
const SNOW_SPEED_MULT: f32 = 0.8;
const BASE_SPEED_MOD: f32 = 0.7;
const SKIN_MAX: i64 = 5;
const STARTING_MAX_XP: u64 = 100;
const STARTING_WEAPONS: [u16; 1] = [0];
const STARTING_BUILDINGS: [u16; 4] = [0, 2, 5, 7];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Registering,
    Alive,
    Dead,
}

/// Replaces an empty or over-long name with the placeholder.
pub fn sanitize_name(raw: &str, max_len: usize) -> String {
    if raw.is_empty() || raw.chars().count() > max_len {
        DEFAULT_NAME.to_string()
    } else {
        raw.to_string()
    }
}

/// Skins outside the valid range fall back to the first one.
pub fn sanitize_skin(skin: i64) -> u8 {
    if (0..=SKIN_MAX).contains(&skin) {
        skin as u8
    } else {
        0
    }
}

/// Authoritative state for one connected player.
#[derive(Debug)]
pub struct Session {
    pub id: u32,
    /// Connection token; leads the status packet, distinct from `id`.
    pub token: String,
    tx: UnboundedSender<Bytes>,
    pub state: SessionState,
    pub name: String,
    pub skin: u8,
    pub pos: Vec2,
    pub vel: Vec2,
    pub aim: f32,
    pub movement: Option<f32>,
    pub size: f32,
    pub speed_mod: f32,
    pub health: i32,
    pub max_health: i32,
    pub food: u64,
    pub wood: u64,
    pub stone: u64,
    pub points: u64,
    pub kills: u32,
    pub xp: u64,
    pub max_xp: u64,
    pub level: u32,
    pub weapon: u16,
    pub building: Option<u16>,
    owned_weapons: Vec<u16>,
    owned_buildings: Vec<u16>,
    pub hat: u64,
    owned_hats: Vec<u64>,
    pub viewed: ViewSet,
    pub manual_attack: bool,
    pub auto_attack: bool,
    last_attack_ms: Option<u64>,
    last_ping_ms: Option<u64>,
}

impl Session {
    pub fn new(id: u32, token: String, tx: UnboundedSender<Bytes>, cfg: &GameConfig) -> Self {
        Self {
            id,
            token,
            tx,
            state: SessionState::Registering,
            name: DEFAULT_NAME.to_string(),
            skin: 0,
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            aim: 0.0,
            movement: None,
            size: cfg.player_scale,
            speed_mod: BASE_SPEED_MOD,
            health: MAX_HEALTH,
            max_health: MAX_HEALTH,
            food: 0,
            wood: 0,
            stone: 0,
            points: 0,
            kills: 0,
            xp: 0,
            max_xp: STARTING_MAX_XP,
            level: 1,
            weapon: 0,
            building: None,
            owned_weapons: STARTING_WEAPONS.to_vec(),
            owned_buildings: STARTING_BUILDINGS.to_vec(),
            hat: 0,
            owned_hats: Vec::new(),
            viewed: ViewSet::default(),
            manual_attack: false,
            auto_attack: false,
            last_attack_ms: None,
            last_ping_ms: None,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.state == SessionState::Alive
    }

    /// Queues a message for this connection. Best effort; a closed or slow
    /// connection never stalls the caller.
    pub fn send(&self, msg: &ServerMsg) {
        match msg.encode_frame() {
            Ok(frame) => {
                let _ = self.tx.send(frame);
            }
            Err(e) => debug!(session = self.id, error = %e, "failed to encode frame"),
        }
    }

    /// Queues an already-encoded frame.
    pub fn send_frame(&self, frame: Bytes) {
        let _ = self.tx.send(frame);
    }

    /// Applies a registration message and (re)spawns.
    pub fn register(&mut self, name: &str, skin: i64, cfg: &GameConfig, rng: &mut StdRng) {
        self.name = sanitize_name(name, cfg.max_name_len);
        self.skin = sanitize_skin(skin);
        self.respawn(cfg, rng);
    }

    /// Puts the session back on the map. The first sampled position is
    /// accepted as is; there is no collision avoidance.
    pub fn respawn(&mut self, cfg: &GameConfig, rng: &mut StdRng) {
        self.pos = Vec2::new(
            rng.gen_range(0.0..cfg.map_scale),
            rng.gen_range(0.0..cfg.map_scale),
        );
        self.vel = Vec2::ZERO;
        self.health = self.max_health;
        self.viewed.clear();
        self.last_attack_ms = None;
        self.state = SessionState::Alive;
    }

    /// Death leaves the slot allocated; the connection may register again.
    pub fn kill(&mut self) {
        self.state = SessionState::Dead;
        self.pos = Vec2::ZERO;
        self.vel = Vec2::ZERO;
    }

    /// One physics step with `delta_ms` elapsed milliseconds. No-op unless
    /// alive.
    pub fn advance_physics(&mut self, delta_ms: f32, cfg: &GameConfig) {
        if !self.is_alive() {
            return;
        }
        let thrust = match self.movement {
            Some(angle) => Vec2::from_angle(angle),
            None => Vec2::ZERO,
        };
        self.vel = self.vel.scale(cfg.player_decel.powf(delta_ms));
        let mut speed = self.speed_mod * cfg.player_speed * delta_ms;
        if cfg.in_snow(self.pos.y) {
            speed *= SNOW_SPEED_MULT;
        }
        self.vel = self.vel.add(thrust.scale(speed));
        self.pos = self.pos.add(self.vel.scale(delta_ms * VELOCITY_SCALE));
        if cfg.in_river(self.pos.y) {
            self.vel.x += RIVER_DRIFT * delta_ms;
        }
        let lo = Vec2::new(self.size, self.size);
        let hi = Vec2::new(cfg.map_scale - self.size, cfg.map_scale - self.size);
        self.pos = self.pos.clamp(lo, hi);
    }

    /// Debounced attack edge-trigger: fires at most once per cooldown
    /// window while either attack intent is held.
    pub fn try_attack(&mut self, now_ms: u64) -> bool {
        if !self.manual_attack && !self.auto_attack {
            return false;
        }
        if let Some(last) = self.last_attack_ms {
            if now_ms < last + ATTACK_COOLDOWN_MS {
                return false;
            }
        }
        self.last_attack_ms = Some(now_ms);
        true
    }

    /// Rate limit for map pings.
    pub fn ping_ready(&mut self, now_ms: u64, min_interval_ms: u64) -> bool {
        if let Some(last) = self.last_ping_ms {
            if now_ms < last + min_interval_ms {
                return false;
            }
        }
        self.last_ping_ms = Some(now_ms);
        true
    }

    /// Manual attack intent. An attack with a direction while holding a
    /// building is a placement attempt; placement is not implemented, so
    /// the intent is consumed without effect.
    pub fn set_attack_intent(&mut self, attacking: bool, placing_angle: Option<f32>) {
        if attacking && placing_angle.is_some() && self.building.is_some() {
            return;
        }
        self.manual_attack = attacking;
    }

    pub fn toggle_auto_attack(&mut self) {
        self.auto_attack = !self.auto_attack;
    }

    /// Held-item selection. Picking any weapon stows the building; unowned
    /// ids change nothing else.
    pub fn select_item(&mut self, id: u64, is_weapon: bool) {
        let id = u16::try_from(id).ok();
        if is_weapon {
            if let Some(w) = id.filter(|w| self.owned_weapons.contains(w)) {
                self.weapon = w;
            }
            self.building = None;
        } else if let Some(b) = id.filter(|b| self.owned_buildings.contains(b)) {
            self.building = Some(b);
        }
    }

    /// Hat shop interaction. Buying an unowned hat acknowledges ownership;
    /// anything else targeting an owned hat equips it.
    pub fn hat_update(&mut self, buying: bool, id: u64) -> Option<ServerMsg> {
        if buying && !self.owned_hats.contains(&id) {
            self.owned_hats.push(id);
            Some(ServerMsg::HatUpdate {
                equipped: false,
                id,
            })
        } else if self.owned_hats.contains(&id) {
            self.hat = id;
            Some(ServerMsg::HatUpdate { equipped: true, id })
        } else {
            None
        }
    }

    pub fn status_row(&self) -> StatusRow {
        StatusRow {
            token: self.token.clone(),
            id: self.id,
            name: self.name.clone(),
            pos: self.pos,
            aim: self.aim,
            health: self.health,
            max_health: self.max_health,
            size: self.size,
            skin: self.skin,
        }
    }

    pub fn snapshot_row(&self, clan: Option<&str>, is_clan_owner: bool) -> SnapshotRow {
        SnapshotRow {
            id: self.id,
            pos: self.pos,
            aim: self.aim,
            building: self.building,
            weapon: self.weapon,
            clan: clan.map(str::to_string),
            is_clan_owner,
            hat: self.hat,
        }
    }

    pub fn leaderboard_row(&self) -> LeaderboardRow {
        LeaderboardRow {
            id: self.id,
            name: self.name.clone(),
            points: self.points,
        }
    }

    pub fn level_info(&self) -> ServerMsg {
        ServerMsg::LevelInfo {
            xp: self.xp,
            max_xp: self.max_xp,
            level: self.level,
        }
    }
}
