//! The authoritative container of all players in a room: creation, removal,
//! input intake, and per-tick integration (steering, movement, arena
//! clamping, trail growth). Capture and collision resolution live in their
//! own modules and run against `World::players_mut()` after `integrate`.

use crate::geometry::Point;
use crate::player::{Player, PlayerId};
use crate::{
    ARENA_CENTER, ARENA_RADIUS, PLAYER_SPEED, PLAYER_TURN_SPEED, STARTING_TERRITORY_SIZE,
    TRAIL_POINT_DISTANCE,
};

const SEED_TERRITORY_VERTICES: usize = 32;
const SEED_TERRITORY_MARGIN: f64 = 5.0;

/// Build a regular polygon seed territory centered at `(x, y)`, matching the
/// starting-territory radius convention used across the match.
fn seed_territory(center: Point) -> Vec<Point> {
    let radius = STARTING_TERRITORY_SIZE / 2.0 + SEED_TERRITORY_MARGIN;
    (0..SEED_TERRITORY_VERTICES)
        .map(|i| {
            let theta = (i as f64) / (SEED_TERRITORY_VERTICES as f64) * std::f64::consts::TAU;
            Point::new(center.x + radius * theta.cos(), center.y + radius * theta.sin())
        })
        .collect()
}

/// Owns every player in a room. Players are kept in an insertion-ordered
/// `Vec` (not a bare map) so that collision arbitration and projection order
/// stay reproducible for a given sequence of creates/removes.
#[derive(Debug, Default)]
pub struct World {
    players: Vec<Player>,
}

impl World {
    pub fn new() -> Self {
        Self { players: Vec::new() }
    }

    /// Create a player with a fresh seed territory at `(x, y)`. Speed
    /// starts at zero so the player does not drift before any input
    /// arrives.
    pub fn create_player(&mut self, id: PlayerId, name: String, color: String, x: f64, y: f64) {
        let territory = seed_territory(Point::new(x, y));
        let score = crate::geometry::area(&territory).floor() as i64;
        self.players.push(Player {
            id,
            name,
            color,
            x,
            y,
            prev_x: x,
            prev_y: y,
            angle: 0.0,
            target_angle: 0.0,
            speed: 0.0,
            territory,
            trail: Vec::new(),
            is_outside: false,
            exit_point: None,
            exit_edge_index: None,
            is_dead: false,
            death_timer: 0.0,
            invulnerable_timer: 0.0,
            has_won: false,
            score,
            territory_changed: true,
        });
    }

    pub fn remove_player(&mut self, id: &str) {
        self.players.retain(|p| p.id != id);
    }

    pub fn player(&self, id: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn players_mut(&mut self) -> &mut [Player] {
        &mut self.players
    }

    /// Update a player's desired heading. No-op on unknown or dead players
    /// (an unknown id is dropped silently rather than treated as an error).
    pub fn set_input(&mut self, id: &str, target_angle: f64) {
        let Some(player) = self.players.iter_mut().find(|p| p.id == id && !p.is_dead) else {
            return;
        };
        player.target_angle = target_angle;
        if player.speed == 0.0 {
            player.speed = PLAYER_SPEED;
        }
    }

    /// Advance every live player by `dt` seconds: steer toward
    /// `target_angle`, move, clamp to the arena, grow the trail, and tick
    /// down timers.
    pub fn integrate(&mut self, dt: f64) {
        for player in &mut self.players {
            if player.is_dead {
                player.death_timer += dt;
                continue;
            }

            steer(player, dt);

            player.prev_x = player.x;
            player.prev_y = player.y;
            player.x += player.angle.cos() * player.speed * dt;
            player.y += player.angle.sin() * player.speed * dt;

            clamp_to_arena(player);

            if player.is_outside {
                extend_trail(player);
            }

            player.invulnerable_timer = (player.invulnerable_timer - dt).max(0.0);
        }
    }
}

fn normalize_angle(angle: f64) -> f64 {
    angle.sin().atan2(angle.cos())
}

fn steer(player: &mut Player, dt: f64) {
    player.angle = normalize_angle(player.angle);
    let diff = normalize_angle(player.target_angle - player.angle);
    player.angle = normalize_angle(player.angle + diff * PLAYER_TURN_SPEED * dt);
}

fn clamp_to_arena(player: &mut Player) {
    let pos = player.position();
    let dist = pos.distance(ARENA_CENTER);
    let limit = ARENA_RADIUS - 1.0;
    if dist > limit {
        let scale = limit / dist;
        player.x = ARENA_CENTER.x + (pos.x - ARENA_CENTER.x) * scale;
        player.y = ARENA_CENTER.y + (pos.y - ARENA_CENTER.y) * scale;
    }
}

fn extend_trail(player: &mut Player) {
    let head = player.position();
    let should_append = match player.trail.last() {
        Some(&last) => last.distance(head) >= TRAIL_POINT_DISTANCE,
        None => true,
    };
    if should_append {
        player.trail.push(head);
    }
}
