//! Territory Server Edge
//!
//! The Room/Tick Loop mediates between connected clients (or bot slots) and
//! the simulation core. It owns:
//! - session registry (human and bot occupants of a room)
//! - the bot population manager and spawn placement
//! - input intake (a latest-wins slot per player)
//! - the fixed-timestep tick driver and state projection for broadcast
//! - operational logging and a bounded tick-diagnostics log
//!
//! The simulation core (`territory-core`) is invoked only through its own
//! public API (`create_player`, `set_input`, `integrate`, `CaptureEngine`,
//! `CollisionEngine`); the Room performs all I/O and timekeeping on its
//! behalf. Transport (WebSocket handling, matchmaking, the client
//! handshake) is an external collaborator and out of scope for this crate.

#![deny(unsafe_code)]

pub mod diagnostics;
pub mod session;
pub mod spawn;

use diagnostics::{DiagnosticsLog, TickEvent};
use rand::rngs::StdRng;
use rand::SeedableRng;
use session::{Session, SessionId, SessionKind};
use std::collections::HashMap;
use std::sync::Mutex;
use territory_core::bot::BotBrain;
use territory_core::capture::CaptureEngine;
use territory_core::collision::CollisionEngine;
use territory_core::player::PlayerId;
use territory_core::spatial_hash::SpatialHash;
use territory_core::world::World;
use territory_core::SERVER_TICK_RATE;
use territory_wire::{project_room, GameRoomState};

/// Room-wide tuning, mirroring the constants named in the external
/// interface: everything here has a sensible default and may be
/// overridden by the process environment at startup, never re-read inside
/// a tick.
#[derive(Debug, Clone)]
pub struct RoomConfig {
    pub tick_rate_hz: u32,
    pub min_human_players_for_bots: usize,
    pub target_total_players: usize,
    pub max_humans_per_room: usize,
    pub bot_removal_delay_seconds: f64,
    pub bot_population_check_seconds: f64,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            tick_rate_hz: SERVER_TICK_RATE,
            min_human_players_for_bots: 3,
            target_total_players: 4,
            max_humans_per_room: 10,
            bot_removal_delay_seconds: 1.0,
            bot_population_check_seconds: 2.0,
        }
    }
}

/// One independent match instance: one `World`, one session registry, one
/// set of bot brains. Rooms share no mutable state with one another, so
/// many can run concurrently, one per async task.
pub struct Room {
    config: RoomConfig,
    world: World,
    spatial_hash: SpatialHash,
    sessions: HashMap<SessionId, Session>,
    next_session_id: SessionId,
    bots: HashMap<PlayerId, BotBrain>,
    next_bot_index: u64,
    rng: StdRng,
    diagnostics: DiagnosticsLog,
    bot_population_accumulator: f64,
    /// Latest-wins input slot per player. Written by the transport task
    /// under the lock, drained once per tick by `Room::step`.
    pending_inputs: Mutex<HashMap<PlayerId, f64>>,
}

impl Room {
    pub fn new(config: RoomConfig, seed: u64) -> Self {
        Self {
            config,
            world: World::new(),
            spatial_hash: SpatialHash::new(),
            sessions: HashMap::new(),
            next_session_id: 1,
            bots: HashMap::new(),
            next_bot_index: 0,
            rng: StdRng::seed_from_u64(seed),
            diagnostics: DiagnosticsLog::new(),
            bot_population_accumulator: 0.0,
            pending_inputs: Mutex::new(HashMap::new()),
        }
    }

    pub fn human_count(&self) -> usize {
        self.sessions.values().filter(|s| !s.is_bot()).count()
    }

    pub fn total_player_count(&self) -> usize {
        self.sessions.len()
    }

    /// Add a human-controlled session and spawn its player. Returns the
    /// new session id.
    pub fn join_human(&mut self, player_id: PlayerId, name: String, color: String) -> SessionId {
        self.spawn_session(player_id, name, color, SessionKind::Human)
    }

    /// Remove a session (and its player) immediately. Humans are removed
    /// on disconnect with no grace period; bots are instead retired via
    /// `Player::death_timer` after being eliminated.
    pub fn disconnect(&mut self, session_id: SessionId) {
        if let Some(session) = self.sessions.remove(&session_id) {
            self.world.remove_player(&session.player_id);
            self.bots.remove(&session.player_id);
        }
    }

    /// Record a client's desired heading. Dropped silently if the session
    /// is unknown; the world's own `set_input` additionally no-ops on dead
    /// players.
    pub fn receive_input(&mut self, session_id: SessionId, target_angle: f64) {
        let Some(session) = self.sessions.get(&session_id) else {
            return;
        };
        let mut pending = self.pending_inputs.lock().expect("pending_inputs lock poisoned");
        pending.insert(session.player_id.clone(), target_angle);
    }

    /// Run one fixed timestep: drain pending inputs, advance bots, move the
    /// world, resolve captures and collisions, project the resulting state,
    /// and manage bot population. This method itself never panics on
    /// ordinary game state; callers that want a tick exception to skip the
    /// tick rather than take down the process should still wrap this call
    /// in `std::panic::catch_unwind` at the tick boundary, as `main.rs`
    /// does.
    pub fn step(&mut self) -> GameRoomState {
        let dt = 1.0 / f64::from(self.config.tick_rate_hz);

        self.apply_pending_inputs();
        self.update_bots(dt);

        self.world.integrate(dt);

        let mut events = Vec::new();
        for reason in CaptureEngine::run(self.world.players_mut()) {
            log::debug!("capture rejected: {reason:?}");
            events.push(TickEvent::CaptureRejected {
                player_id: String::new(),
                reason: format!("{reason:?}"),
            });
        }
        for player in self.world.players() {
            if player.territory_changed {
                events.push(TickEvent::CaptureCommitted {
                    player_id: player.id.clone(),
                    new_score: player.score,
                });
            }
            if player.has_won {
                events.push(TickEvent::Victory {
                    player_id: player.id.clone(),
                });
            }
        }

        for (player_id, reason) in CollisionEngine::run(self.world.players_mut(), &mut self.spatial_hash) {
            events.push(TickEvent::Eliminated {
                player_id,
                reason: format!("{reason:?}"),
            });
        }

        self.manage_bot_population(dt);
        self.reap_dead_bots();

        let tick = 0; // rooms don't expose a tick counter externally yet; see DESIGN.md.
        self.diagnostics.record(tick, events);

        // Project before clearing the hint: the wire layer needs to see
        // `territory_changed` as it stood at the end of this tick so a
        // transport can decide whether to resync a client's territory.
        let state = project_room(self.world.players());
        for player in self.world.players_mut() {
            player.territory_changed = false;
        }
        state
    }

    fn apply_pending_inputs(&mut self) {
        let mut pending = self.pending_inputs.lock().expect("pending_inputs lock poisoned");
        for (player_id, angle) in pending.drain() {
            self.world.set_input(&player_id, angle);
        }
    }

    fn update_bots(&mut self, dt: f64) {
        for player in self.world.players_mut() {
            if let Some(brain) = self.bots.get_mut(&player.id) {
                brain.update(player, dt);
            }
        }
    }

    fn manage_bot_population(&mut self, dt: f64) {
        self.bot_population_accumulator += dt;
        if self.bot_population_accumulator < self.config.bot_population_check_seconds {
            return;
        }
        self.bot_population_accumulator = 0.0;

        let humans = self.human_count();
        let total = self.total_player_count();
        if humans >= self.config.min_human_players_for_bots {
            return;
        }
        let to_spawn = self.config.target_total_players.saturating_sub(total);
        for _ in 0..to_spawn {
            self.spawn_bot();
        }
    }

    fn spawn_bot(&mut self) {
        let index = self.next_bot_index;
        self.next_bot_index += 1;
        let player_id = format!("{}{}", territory_core::player::BOT_ID_PREFIX, index);
        let name = format!("bot-{index}");
        let color = "#999999".to_string();
        let session_id = self.spawn_session(player_id.clone(), name, color, SessionKind::Bot);
        self.bots.insert(player_id, BotBrain::new(index));
        let _ = session_id;
    }

    fn reap_dead_bots(&mut self) {
        let dead_bot_ids: Vec<PlayerId> = self
            .world
            .players()
            .iter()
            .filter(|p| p.is_dead && p.is_bot() && p.death_timer > self.config.bot_removal_delay_seconds)
            .map(|p| p.id.clone())
            .collect();

        for id in dead_bot_ids {
            self.world.remove_player(&id);
            self.bots.remove(&id);
            if let Some(session_id) = self
                .sessions
                .iter()
                .find(|(_, s)| s.player_id == id)
                .map(|(sid, _)| *sid)
            {
                self.sessions.remove(&session_id);
            }
        }
    }

    fn spawn_session(&mut self, player_id: PlayerId, name: String, color: String, kind: SessionKind) -> SessionId {
        let territories: Vec<_> = self.world.players().iter().map(|p| p.territory.clone()).collect();
        let (point, outcome) = spawn::find_spawn_point(&territories, &mut self.rng);
        match outcome {
            spawn::SpawnOutcome::Relaxed => log::debug!("spawn placement relaxed for {player_id}"),
            spawn::SpawnOutcome::FallbackToCenter => {
                log::warn!("spawn placement fell back to arena center for {player_id}");
            }
            spawn::SpawnOutcome::Placed => {}
        }

        self.world.create_player(player_id.clone(), name, color, point.x, point.y);

        let session_id = self.next_session_id;
        self.next_session_id += 1;
        self.sessions
            .insert(session_id, Session::new(session_id, player_id, kind));
        session_id
    }

    pub fn diagnostics(&self) -> &DiagnosticsLog {
        &self.diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use territory_core::ARENA_CENTER;

    #[test]
    fn joining_a_human_spawns_a_player() {
        let mut room = Room::new(RoomConfig::default(), 0);
        room.join_human("alice".to_string(), "Alice".to_string(), "#ff0000".to_string());
        assert_eq!(room.human_count(), 1);
        assert_eq!(room.total_player_count(), 1);
    }

    #[test]
    fn bots_fill_the_room_when_humans_are_scarce() {
        let mut config = RoomConfig::default();
        config.bot_population_check_seconds = 0.0;
        let mut room = Room::new(config, 0);
        room.join_human("alice".to_string(), "Alice".to_string(), "#ff0000".to_string());

        room.step();

        assert!(room.total_player_count() >= room.config.target_total_players.min(room.total_player_count()));
        assert!(room.total_player_count() > 1);
    }

    #[test]
    fn disconnect_removes_the_session_and_player() {
        let mut room = Room::new(RoomConfig::default(), 0);
        let session_id = room.join_human("alice".to_string(), "Alice".to_string(), "#ff0000".to_string());
        room.disconnect(session_id);
        assert_eq!(room.total_player_count(), 0);
    }

    #[test]
    fn step_produces_a_projection_with_every_player() {
        let mut room = Room::new(RoomConfig::default(), 0);
        room.join_human("alice".to_string(), "Alice".to_string(), "#ff0000".to_string());
        let state = room.step();
        assert_eq!(state.players.len(), room.total_player_count());
    }

    #[test]
    fn unknown_session_input_is_a_silent_no_op() {
        let mut room = Room::new(RoomConfig::default(), 0);
        room.receive_input(9999, 1.0);
        // No panic, no player created.
        assert_eq!(room.total_player_count(), 0);
    }

    #[test]
    fn territory_changed_hint_is_visible_in_its_own_tick_then_clears() {
        let mut room = Room::new(RoomConfig::default(), 0);
        room.join_human("alice".to_string(), "Alice".to_string(), "#ff0000".to_string());

        // The seed territory created this tick is itself a resync-worthy
        // change, so the first projection must carry the hint.
        let first = room.step();
        assert!(first.players["alice"].territory_changed);

        // With no further capture, the hint must not still be set next
        // tick; otherwise a transport would resync every tick forever.
        let second = room.step();
        assert!(!second.players["alice"].territory_changed);
    }

    #[test]
    fn spawn_placement_is_not_forced_to_arena_center_for_the_first_player() {
        // A room's very first spawn has zero existing territories to avoid,
        // so `find_spawn_point` should place it via ordinary uniform
        // sampling rather than a special-cased arena-center shortcut.
        let mut room = Room::new(RoomConfig::default(), 42);
        room.join_human("alice".to_string(), "Alice".to_string(), "#ff0000".to_string());
        let state = room.step();
        let alice = &state.players["alice"];
        assert!(
            alice.x != ARENA_CENTER.x || alice.y != ARENA_CENTER.y,
            "expected a randomly sampled spawn point, not the arena center"
        );
    }
}
