//! World state and the simulation tick.
//!
//! One `World` per process, owned by a single task. All mutation funnels
//! through a few entry points:
//! - [`World::connect`] / [`World::disconnect`] for slot lifecycle,
//! - [`World::apply`] for decoded client messages,
//! - [`World::advance`] for the fixed-interval tick.
//!
//! Ticks and message handling interleave on one task and never overlap, so
//! sessions need no locking.
//!
//! Determinism notes:
//! - All randomness (world layout, spawn positions) flows through one rng
//!   seeded from config.
//! - Slot iteration order is fixed, so broadcasts and tie-breaks are stable.

use std::collections::HashMap;

use bytes::Bytes;
use rand::{rngs::StdRng, SeedableRng};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info};

use taiga_shared::{
    config::GameConfig,
    entity::{IdCounter, WorldEntity},
    math::Vec2,
    wire::{ClanInfo, ClientMsg, ServerMsg},
};

use crate::{
    clan::{ClanRegistry, Departure},
    interest,
    session::Session,
    worldgen,
};

/// The whole game state plus the rng and send cadence bookkeeping.
pub struct World {
    cfg: GameConfig,
    slots: Vec<Option<Session>>,
    entities: Vec<WorldEntity>,
    clans: ClanRegistry,
    rng: StdRng,
    /// Simulation clock in milliseconds, advanced by tick deltas.
    clock_ms: f64,
    until_send: u32,
    conn_seq: u64,
}

impl World {
    pub fn new(cfg: GameConfig) -> Self {
        let mut rng = match cfg.world_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        // Resource ids live above the slot range so the two id spaces never
        // collide.
        let mut ids = IdCounter::starting_at(cfg.max_players as u32);
        let entities = worldgen::generate(&cfg, &mut rng, &mut ids);
        info!(entities = entities.len(), seed = ?cfg.world_seed, "world generated");

        Self {
            slots: (0..cfg.max_players).map(|_| None).collect(),
            entities,
            clans: ClanRegistry::default(),
            rng,
            clock_ms: 0.0,
            until_send: cfg.client_send_rate.max(1),
            conn_seq: 0,
            cfg,
        }
    }

    pub fn cfg(&self) -> &GameConfig {
        &self.cfg
    }

    pub fn entities(&self) -> &[WorldEntity] {
        &self.entities
    }

    pub fn session(&self, slot: u32) -> Option<&Session> {
        self.slots.get(slot as usize)?.as_ref()
    }

    pub fn session_count(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    /// Claims a free slot for a new connection and hands out the alliance
    /// directory. `None` means the server is full.
    pub fn connect(&mut self, tx: UnboundedSender<Bytes>) -> Option<u32> {
        let idx = self.slots.iter().position(Option::is_none)?;
        self.conn_seq += 1;
        let session = Session::new(idx as u32, format!("c{}", self.conn_seq), tx, &self.cfg);
        session.send(&ServerMsg::ClanDirectory {
            teams: self.directory(),
        });
        self.slots[idx] = Some(session);
        debug!(session = idx, "slot claimed");
        Some(idx as u32)
    }

    /// Destroys a session: kill, leave the alliance, free the slot. Safe to
    /// call twice; the second call finds the slot empty.
    pub fn disconnect(&mut self, slot: u32) {
        let Some(mut session) = self.slots.get_mut(slot as usize).and_then(|s| s.take()) else {
            return;
        };
        session.kill();
        let departure = self.clans.remove_member(slot);
        self.announce_departure(slot, departure);
        debug!(session = slot, "slot freed");
    }

    /// Applies one decoded client message. Connection reader tasks only
    /// enqueue; this is the single point where intent reaches the state.
    pub fn apply(&mut self, slot: u32, msg: ClientMsg) {
        let now_ms = self.clock_ms as u64;
        let Some(session) = self.slots.get_mut(slot as usize).and_then(Option::as_mut) else {
            return;
        };
        match msg {
            ClientMsg::Aim(angle) => session.aim = angle,
            ClientMsg::Move(angle) => session.movement = angle,
            ClientMsg::Attack {
                attacking,
                placing_angle,
            } => session.set_attack_intent(attacking, placing_angle),
            ClientMsg::ToggleAutoAttack => session.toggle_auto_attack(),
            ClientMsg::SelectItem { id, is_weapon } => session.select_item(id, is_weapon),
            ClientMsg::Hat { buying, id } => {
                if let Some(ack) = session.hat_update(buying, id) {
                    session.send(&ack);
                }
            }
            ClientMsg::MapPing => {
                if session.is_alive() && session.ping_ready(now_ms, self.cfg.map_ping_ms) {
                    let pos = session.pos;
                    self.broadcast(&ServerMsg::PingFlash { pos });
                }
            }
            ClientMsg::Register { name, skin } => self.register(slot, &name, skin),
            ClientMsg::Chat(text) => self.broadcast(&ServerMsg::Chat { id: slot, text }),
            ClientMsg::CreateClan(name) => self.create_clan(slot, &name),
            ClientMsg::JoinClan(name) => self.request_join(slot, &name),
            ClientMsg::ResolveJoin { id, accept } => self.resolve_join(slot, id, accept),
            ClientMsg::KickMember(id) => self.kick_member(slot, id),
            ClientMsg::LeaveClan => self.leave_clan(slot),
        }
    }

    /// One simulation tick with `delta_ms` elapsed since the previous one:
    /// physics for every alive session, debounced attack events, then the
    /// send countdown gating the broadcast phase.
    pub fn advance(&mut self, delta_ms: f32) {
        self.clock_ms += delta_ms as f64;
        let now_ms = self.clock_ms as u64;

        for session in self.slots.iter_mut().flatten() {
            session.advance_physics(delta_ms, &self.cfg);
        }

        let mut swings = Vec::new();
        for session in self.slots.iter_mut().flatten() {
            if session.is_alive() && session.try_attack(now_ms) {
                swings.push(session.id);
            }
        }
        for id in swings {
            self.broadcast(&ServerMsg::AttackSwing { id });
        }

        self.until_send -= 1;
        if self.until_send == 0 {
            self.until_send = self.cfg.client_send_rate.max(1);
            if let Err(e) = self.broadcast_state() {
                debug!(error = %e, "failed to encode broadcast state");
            }
        }
    }

    /// The periodic broadcast: per alive session a reveal ("6"), the
    /// marker ("a"), the movement snapshot ("3") and, for alliance members,
    /// the minimap ("mm"); plus one leaderboard ("5") to every connection.
    fn broadcast_state(&mut self) -> anyhow::Result<()> {
        let mut rows = Vec::new();
        let mut board = Vec::new();
        for session in self.slots.iter().flatten() {
            if !session.is_alive() {
                continue;
            }
            let clan = self.clans.clan_of(session.id);
            rows.push(session.snapshot_row(
                clan.map(|c| c.name.as_str()),
                clan.is_some_and(|c| c.owner == session.id),
            ));
            board.push(session.leaderboard_row());
        }
        // Stable sort: equal scores keep slot order.
        board.sort_by(|a, b| b.points.cmp(&a.points));

        // Teammate positions, self excluded. Dead members sit at the origin
        // until they respawn.
        let mut minimaps: HashMap<u32, ServerMsg> = HashMap::new();
        for clan in self.clans.iter() {
            for &member in &clan.members {
                let points: Vec<Vec2> = clan
                    .members
                    .iter()
                    .filter(|&&m| m != member)
                    .filter_map(|&m| self.session(m).map(|s| s.pos))
                    .collect();
                minimaps.insert(member, ServerMsg::Minimap { points });
            }
        }

        let marker = ServerMsg::SnapshotMarker.encode_frame()?;
        let snapshot = ServerMsg::Snapshot { rows }.encode_frame()?;
        let board = ServerMsg::Leaderboard { rows: board }.encode_frame()?;

        let Self {
            cfg,
            slots,
            entities,
            ..
        } = self;
        for session in slots.iter_mut().flatten() {
            if session.is_alive() {
                let fresh = interest::reveal(cfg, session.pos, &mut session.viewed, entities);
                if !fresh.is_empty() {
                    session.send(&ServerMsg::Reveal { entities: fresh });
                }
                session.send_frame(marker.clone());
                session.send_frame(snapshot.clone());
                if let Some(mm) = minimaps.remove(&session.id) {
                    session.send(&mm);
                }
            }
            session.send_frame(board.clone());
        }
        Ok(())
    }

    fn register(&mut self, slot: u32, name: &str, skin: i64) {
        let Some(session) = self.slots.get_mut(slot as usize).and_then(Option::as_mut) else {
            return;
        };
        session.register(name, skin, &self.cfg, &mut self.rng);
        session.send(&ServerMsg::AssignId { id: session.id });
        let own_row = session.status_row();
        session.send(&ServerMsg::Status {
            row: own_row.clone(),
            is_self: true,
        });
        session.send(&session.level_info());
        info!(session = slot, name = %session.name, "session spawned");

        // Presence exchange: everyone learns the newcomer, the newcomer
        // learns every other alive session.
        let announce = ServerMsg::Status {
            row: own_row,
            is_self: false,
        };
        for other in self.slots.iter().flatten() {
            if other.id != slot {
                other.send(&announce);
            }
        }
        if let Some(session) = self.session(slot) {
            for other in self.slots.iter().flatten() {
                if other.id != slot && other.is_alive() {
                    session.send(&ServerMsg::Status {
                        row: other.status_row(),
                        is_self: false,
                    });
                }
            }
        }

        // Everything already on screen is disclosed right away instead of
        // waiting for the next send tick.
        let Some(session) = self.slots.get_mut(slot as usize).and_then(Option::as_mut) else {
            return;
        };
        let fresh = interest::reveal(&self.cfg, session.pos, &mut session.viewed, &self.entities);
        if !fresh.is_empty() {
            session.send(&ServerMsg::Reveal { entities: fresh });
        }
    }

    fn directory(&self) -> Vec<ClanInfo> {
        self.clans
            .iter()
            .map(|c| ClanInfo {
                sid: c.name.clone(),
                owner: c.owner,
            })
            .collect()
    }

    fn create_clan(&mut self, slot: u32, name: &str) {
        let Some(clan) = self.clans.create(name, slot) else {
            return;
        };
        let info = ClanInfo {
            sid: clan.name.clone(),
            owner: slot,
        };
        let members = clan.members.clone();
        self.send_member_list(&members);
        self.send_to(
            slot,
            &ServerMsg::ClanNotice {
                team: Some((info.sid.clone(), true)),
            },
        );
        self.broadcast(&ServerMsg::ClanCreated { info });
    }

    fn request_join(&self, slot: u32, name: &str) {
        if self.clans.clan_of(slot).is_some() {
            return;
        }
        let Some(clan) = self.clans.get(name) else {
            return;
        };
        let Some(requester) = self.session(slot) else {
            return;
        };
        self.send_to(
            clan.owner,
            &ServerMsg::JoinRequest {
                id: slot,
                name: requester.name.clone(),
            },
        );
    }

    fn resolve_join(&mut self, slot: u32, id: u32, accept: bool) {
        if !accept || self.session(id).is_none() {
            return;
        }
        let Some(name) = self
            .clans
            .clan_of(slot)
            .filter(|c| c.owner == slot)
            .map(|c| c.name.clone())
        else {
            return;
        };
        let Some(clan) = self.clans.welcome(&name, id) else {
            return;
        };
        let members = clan.members.clone();
        self.send_member_list(&members);
        self.send_to(
            id,
            &ServerMsg::ClanNotice {
                team: Some((name, false)),
            },
        );
    }

    fn kick_member(&mut self, slot: u32, target: u32) {
        if let Some(departure) = self.clans.kick(slot, target) {
            self.announce_departure(target, Some(departure));
        }
    }

    fn leave_clan(&mut self, slot: u32) {
        let departure = self.clans.remove_member(slot);
        self.announce_departure(slot, departure);
    }

    fn announce_departure(&self, departed: u32, departure: Option<Departure>) {
        match departure {
            Some(Departure::Disbanded { name, members }) => {
                for &member in &members {
                    self.send_to(member, &ServerMsg::ClanNotice { team: None });
                }
                self.broadcast(&ServerMsg::ClanDisbanded { sid: name });
            }
            Some(Departure::Left { remaining, .. }) => {
                self.send_to(departed, &ServerMsg::ClanNotice { team: None });
                self.send_member_list(&remaining);
            }
            None => {}
        }
    }

    fn send_member_list(&self, members: &[u32]) {
        let roster: Vec<(u32, String)> = members
            .iter()
            .filter_map(|&id| self.session(id).map(|s| (id, s.name.clone())))
            .collect();
        let msg = ServerMsg::MemberList { members: roster };
        for &id in members {
            self.send_to(id, &msg);
        }
    }

    fn send_to(&self, slot: u32, msg: &ServerMsg) {
        if let Some(session) = self.session(slot) {
            session.send(msg);
        }
    }

    /// Encodes once and fans the frame out to every connection. Failed
    /// sends are dropped; a dead connection never aborts the tick.
    fn broadcast(&self, msg: &ServerMsg) {
        match msg.encode_frame() {
            Ok(frame) => {
                for session in self.slots.iter().flatten() {
                    session.send_frame(frame.clone());
                }
            }
            Err(e) => debug!(error = %e, "failed to encode broadcast"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use tokio::sync::mpsc;

    fn test_world(max_players: usize) -> World {
        World::new(GameConfig {
            max_players,
            world_seed: Some(5),
            ..GameConfig::default()
        })
    }

    fn join(world: &mut World) -> (u32, mpsc::UnboundedReceiver<Bytes>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let slot = world.connect(tx).expect("free slot");
        (slot, rx)
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<Bytes>) -> Vec<Value> {
        let mut out = Vec::new();
        while let Ok(frame) = rx.try_recv() {
            out.push(serde_json::from_slice(&frame[4..]).unwrap());
        }
        out
    }

    fn tags(msgs: &[Value]) -> Vec<&str> {
        msgs.iter().map(|m| m[0].as_str().unwrap()).collect()
    }

    #[test]
    fn full_server_turns_connections_away() {
        let mut world = test_world(2);
        let (_a, _rx_a) = join(&mut world);
        let (_b, _rx_b) = join(&mut world);
        let (tx, _rx) = mpsc::unbounded_channel();
        assert_eq!(world.connect(tx), None);
    }

    #[test]
    fn freed_slots_are_reused() {
        let mut world = test_world(2);
        let (a, _rx_a) = join(&mut world);
        let (_b, _rx_b) = join(&mut world);
        world.disconnect(a);
        world.disconnect(a); // second call is a no-op
        let (c, _rx_c) = join(&mut world);
        assert_eq!(c, a);
    }

    #[test]
    fn register_sends_id_status_and_level() {
        let mut world = test_world(2);
        let (a, mut rx_a) = join(&mut world);
        world.apply(a, ClientMsg::Register { name: "".into(), skin: 9 });

        let msgs = drain(&mut rx_a);
        let t = tags(&msgs);
        assert_eq!(t[0], "id", "directory comes with the connection");
        assert!(t.contains(&"1") && t.contains(&"2") && t.contains(&"15"));

        let status = msgs.iter().find(|m| m[0] == "2").unwrap();
        let row = status[1].as_array().unwrap();
        assert_eq!(row[1], Value::from(a));
        assert_eq!(row[2], Value::from("unknown"), "empty name is replaced");
        assert_eq!(row[9], Value::from(0), "out-of-range skin is replaced");
        assert_eq!(status[2], Value::Bool(true), "own status is flagged self");
    }

    #[test]
    fn register_announces_presence_both_ways() {
        let mut world = test_world(3);
        let (a, mut rx_a) = join(&mut world);
        let (b, mut rx_b) = join(&mut world);
        world.apply(a, ClientMsg::Register { name: "ada".into(), skin: 1 });
        drain(&mut rx_a);
        drain(&mut rx_b);

        world.apply(b, ClientMsg::Register { name: "bob".into(), skin: 0 });

        let to_a = drain(&mut rx_a);
        let about_b = to_a.iter().find(|m| m[0] == "2").unwrap();
        assert_eq!(about_b[1][2], Value::from("bob"));
        assert_eq!(about_b[2], Value::Bool(false));

        let to_b = drain(&mut rx_b);
        let statuses: Vec<_> = to_b.iter().filter(|m| m[0] == "2").collect();
        assert_eq!(statuses.len(), 2, "own status plus the earlier session");
        assert!(statuses.iter().any(|s| s[1][2] == Value::from("ada")));
    }

    #[test]
    fn straight_run_is_monotonic_and_stays_in_bounds() {
        let mut world = test_world(2);
        let (a, _rx_a) = join(&mut world);
        world.apply(a, ClientMsg::Register { name: "ada".into(), skin: 0 });

        // Run toward the far vertical edge so the clamp cannot interfere.
        let start = world.session(a).unwrap().pos;
        let eastward = start.x < world.cfg().map_scale / 2.0;
        let angle = if eastward { 0.0 } else { std::f32::consts::PI };
        world.apply(a, ClientMsg::Move(Some(angle)));

        let mut last_x = start.x;
        for _ in 0..10 {
            world.advance(16.0);
            let s = world.session(a).unwrap();
            if eastward {
                assert!(s.pos.x > last_x, "x must increase every tick");
            } else {
                assert!(s.pos.x < last_x, "x must decrease every tick");
            }
            assert!(s.pos.x >= s.size && s.pos.x <= world.cfg().map_scale - s.size);
            last_x = s.pos.x;
        }
    }

    #[test]
    fn attack_events_reach_others_debounced() {
        let mut world = test_world(2);
        let (a, mut rx_a) = join(&mut world);
        let (b, mut rx_b) = join(&mut world);
        world.apply(a, ClientMsg::Register { name: "ada".into(), skin: 0 });
        world.apply(b, ClientMsg::Register { name: "bob".into(), skin: 0 });
        world.apply(
            a,
            ClientMsg::Attack {
                attacking: true,
                placing_angle: None,
            },
        );
        drain(&mut rx_a);
        drain(&mut rx_b);

        for _ in 0..10 {
            world.advance(100.0);
        }

        let swings: Vec<_> = drain(&mut rx_b)
            .into_iter()
            .filter(|m| m[0] == "7")
            .collect();
        // Clock hits 100..=1000; the cooldown admits swings at 100 and 600.
        assert_eq!(swings.len(), 2);
        assert_eq!(swings[0][1], Value::from(a));
    }

    #[test]
    fn snapshots_follow_the_send_cadence() {
        let mut world = test_world(2);
        let (a, mut rx_a) = join(&mut world);
        world.apply(a, ClientMsg::Register { name: "ada".into(), skin: 0 });
        drain(&mut rx_a);

        let rate = world.cfg().client_send_rate;
        for _ in 0..rate - 1 {
            world.advance(9.0);
        }
        assert!(
            !tags(&drain(&mut rx_a)).contains(&"a"),
            "no snapshot before the countdown expires"
        );

        world.advance(9.0);
        let msgs = drain(&mut rx_a);
        let t = tags(&msgs);
        let marker = t.iter().position(|&x| x == "a").expect("marker sent");
        assert_eq!(t[marker + 1], "3", "marker immediately precedes the snapshot");
        assert!(t.contains(&"5"), "leaderboard rides the same send tick");

        let snapshot = msgs.iter().find(|m| m[0] == "3").unwrap();
        assert_eq!(snapshot[1].as_array().unwrap().len(), 12, "one row, twelve columns");
    }

    #[test]
    fn leaderboard_sorts_by_points_ties_in_slot_order() {
        let mut world = test_world(3);
        let (a, _rx_a) = join(&mut world);
        let (b, _rx_b) = join(&mut world);
        let (c, mut rx_c) = join(&mut world);
        for (slot, name) in [(a, "ada"), (b, "bob"), (c, "cyd")] {
            world.apply(slot, ClientMsg::Register { name: name.into(), skin: 0 });
        }
        drain(&mut rx_c);

        for _ in 0..world.cfg().client_send_rate {
            world.advance(9.0);
        }
        let msgs = drain(&mut rx_c);
        let board = msgs.iter().find(|m| m[0] == "5").unwrap();
        let flat = board[1].as_array().unwrap();
        // All scores are zero, so rows keep slot order.
        assert_eq!(flat[0], Value::from(a));
        assert_eq!(flat[3], Value::from(b));
        assert_eq!(flat[6], Value::from(c));
    }

    #[test]
    fn viewed_set_grows_while_alive() {
        let mut world = test_world(2);
        let (a, _rx_a) = join(&mut world);
        world.apply(a, ClientMsg::Register { name: "ada".into(), skin: 0 });
        world.apply(a, ClientMsg::Move(Some(0.5)));

        let mut last = world.session(a).unwrap().viewed.len();
        for _ in 0..50 {
            world.advance(16.0);
            let len = world.session(a).unwrap().viewed.len();
            assert!(len >= last, "viewed set never shrinks while alive");
            last = len;
        }
    }

    #[test]
    fn clan_lifecycle_packets() {
        let mut world = test_world(3);
        let (a, mut rx_a) = join(&mut world);
        let (b, mut rx_b) = join(&mut world);
        world.apply(a, ClientMsg::Register { name: "ada".into(), skin: 0 });
        world.apply(b, ClientMsg::Register { name: "bob".into(), skin: 0 });
        drain(&mut rx_a);
        drain(&mut rx_b);

        world.apply(a, ClientMsg::CreateClan("axe".into()));
        let to_a = drain(&mut rx_a);
        let t = tags(&to_a);
        assert!(t.contains(&"sa") && t.contains(&"st") && t.contains(&"ac"));
        let notice = to_a.iter().find(|m| m[0] == "st").unwrap();
        assert_eq!(notice[1], Value::from("axe"));
        assert_eq!(notice[2], Value::Bool(true));
        assert!(tags(&drain(&mut rx_b)).contains(&"ac"));

        world.apply(b, ClientMsg::JoinClan("axe".into()));
        let request = drain(&mut rx_a)
            .into_iter()
            .find(|m| m[0] == "an")
            .expect("owner gets the join request");
        assert_eq!(request[1], Value::from(b));
        assert_eq!(request[2], Value::from("bob"));

        world.apply(a, ClientMsg::ResolveJoin { id: b, accept: true });
        let to_b = drain(&mut rx_b);
        let roster = to_b.iter().find(|m| m[0] == "sa").unwrap();
        assert_eq!(
            roster[1],
            serde_json::json!([a, "ada", b, "bob"]),
            "roster lists owner first"
        );
        let notice = to_b.iter().find(|m| m[0] == "st").unwrap();
        assert_eq!(notice[2], Value::Bool(false));

        // Minimap rides the next send tick and shows the teammate.
        for _ in 0..world.cfg().client_send_rate {
            world.advance(9.0);
        }
        let pos_a = world.session(a).unwrap().pos;
        let minimap = drain(&mut rx_b)
            .into_iter()
            .find(|m| m[0] == "mm")
            .expect("clanned sessions get minimaps");
        assert_eq!(minimap[1], serde_json::json!([pos_a.x, pos_a.y]));
    }

    #[test]
    fn owner_disconnect_disbands_the_clan() {
        let mut world = test_world(3);
        let (a, _rx_a) = join(&mut world);
        let (b, mut rx_b) = join(&mut world);
        world.apply(a, ClientMsg::Register { name: "ada".into(), skin: 0 });
        world.apply(b, ClientMsg::Register { name: "bob".into(), skin: 0 });
        world.apply(a, ClientMsg::CreateClan("axe".into()));
        world.apply(b, ClientMsg::JoinClan("axe".into()));
        world.apply(a, ClientMsg::ResolveJoin { id: b, accept: true });
        drain(&mut rx_b);

        world.disconnect(a);
        let to_b = drain(&mut rx_b);
        let t = tags(&to_b);
        assert!(t.contains(&"st"), "members are told they are clanless");
        let disband = to_b.iter().find(|m| m[0] == "ad").unwrap();
        assert_eq!(disband[1], Value::from("axe"));
        assert_eq!(world.session_count(), 1);
    }

    #[test]
    fn ping_is_rate_limited_per_session() {
        let mut world = test_world(2);
        let (a, _rx_a) = join(&mut world);
        let (b, mut rx_b) = join(&mut world);
        world.apply(a, ClientMsg::Register { name: "ada".into(), skin: 0 });
        world.apply(b, ClientMsg::Register { name: "bob".into(), skin: 0 });
        drain(&mut rx_b);

        world.apply(a, ClientMsg::MapPing);
        world.apply(a, ClientMsg::MapPing);
        let pings = drain(&mut rx_b)
            .into_iter()
            .filter(|m| m[0] == "p")
            .count();
        assert_eq!(pings, 1, "second ping inside the window is dropped");

        // Advance past the window and ping again.
        let ticks = world.cfg().map_ping_ms / 9 + 1;
        for _ in 0..ticks {
            world.advance(9.0);
        }
        world.apply(a, ClientMsg::MapPing);
        let pings = drain(&mut rx_b)
            .into_iter()
            .filter(|m| m[0] == "p")
            .count();
        assert_eq!(pings, 1);
    }
}
