//! Throttled AI controller. A `BotBrain` drives exactly one bot-controlled
//! player through the same `World::set_input` channel a remote client would
//! use — it has no privileged access to world state.

use crate::geometry::Point;
use crate::player::Player;
use crate::ARENA_CENTER;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const DECISION_RATE_HZ: f64 = 6.0;
const DECISION_PERIOD: f64 = 1.0 / DECISION_RATE_HZ;
const BOUNDARY_AVOID_MARGIN: f64 = 300.0;
const RETURNING_TRAIL_LENGTH: usize = 40;
const HEADING_JITTER_RADIANS: f64 = std::f64::consts::FRAC_PI_3; // 60 degrees
const COOLDOWN_MIN_SECONDS: f64 = 0.5;
const COOLDOWN_MAX_SECONDS: f64 = 2.5;

/// Per-bot AI state: an accumulator clock gating decisions to
/// [`DECISION_RATE_HZ`], plus a randomized re-heading cooldown.
pub struct BotBrain {
    rng: StdRng,
    accumulator: f64,
    heading_cooldown: f64,
    returning: bool,
}

impl BotBrain {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            accumulator: 0.0,
            heading_cooldown: 0.0,
            returning: false,
        }
    }

    /// Advance the bot's internal clock by `dt` and, if a decision is due,
    /// write a new `target_angle` onto `player`. Call every tick; the
    /// accumulator ensures decisions still land at a fixed 6 Hz regardless
    /// of the simulation's own tick rate.
    pub fn update(&mut self, player: &mut Player, dt: f64) {
        self.accumulator += dt;
        self.heading_cooldown = (self.heading_cooldown - dt).max(0.0);

        if self.accumulator < DECISION_PERIOD {
            return;
        }
        self.accumulator -= DECISION_PERIOD;

        if player.is_dead {
            return;
        }

        let to_center = ARENA_CENTER.distance(player.position());
        if to_center > crate::ARENA_RADIUS - BOUNDARY_AVOID_MARGIN {
            player.target_angle = heading_toward(player.position(), ARENA_CENTER);
            return;
        }

        if player.is_outside && player.trail.len() > RETURNING_TRAIL_LENGTH {
            self.returning = true;
        }
        if !player.is_outside {
            self.returning = false;
        }

        if self.returning {
            let centroid = polygon_centroid(&player.territory);
            player.target_angle = heading_toward(player.position(), centroid);
            return;
        }

        if self.heading_cooldown <= 0.0 {
            let jitter = self.rng.gen_range(-HEADING_JITTER_RADIANS..=HEADING_JITTER_RADIANS);
            player.target_angle = player.angle + jitter;
            self.heading_cooldown = self.rng.gen_range(COOLDOWN_MIN_SECONDS..=COOLDOWN_MAX_SECONDS);
        }
    }
}

fn heading_toward(from: Point, to: Point) -> f64 {
    (to.y - from.y).atan2(to.x - from.x)
}

fn polygon_centroid(poly: &[Point]) -> Point {
    if poly.is_empty() {
        return ARENA_CENTER;
    }
    let (sum_x, sum_y) = poly.iter().fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    let n = poly.len() as f64;
    Point::new(sum_x / n, sum_y / n)
}
