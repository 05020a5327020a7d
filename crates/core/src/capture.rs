//! Exit/entry/loop-closure detection and capture commit. Runs once per tick,
//! after [`crate::world::World::integrate`] and before
//! [`crate::collision::CollisionEngine`].

use crate::geometry::{self, Point};
use crate::player::Player;
use crate::{ARENA_RADIUS, CAPTURE_INVULNERABILITY_SECONDS, WIN_AREA_FRACTION};

const LOOP_CLOSE_DEBOUNCE_POINTS: usize = 10;
const LOOP_CLOSE_RADIUS: f64 = 80.0;
const MIN_TRAIL_FOR_ENTRY: usize = 2;
const MAX_SIMPLIFY_VERTICES: usize = 400;
const MIN_CAPTURE_AREA: f64 = 100.0;

/// Why a computed capture was not committed. Transient and non-fatal: the
/// player's trail is still cleared and play continues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureRejectReason {
    DegeneratePolygon,
    NonFiniteVertex,
    TooFewVertices,
    AreaTooSmall,
    DidNotGrow,
}

pub struct CaptureEngine;

impl CaptureEngine {
    /// Resolve exit/entry/loop-closure for every live, non-victorious
    /// player. Returns a reject reason for every capture attempt that was
    /// computed but not committed, for the caller to log.
    pub fn run(players: &mut [Player]) -> Vec<CaptureRejectReason> {
        let mut rejects = Vec::new();
        for player in players {
            if player.is_dead || player.has_won {
                continue;
            }
            step_player(player, &mut rejects);
            check_victory(player);
        }
        rejects
    }
}

fn step_player(player: &mut Player, rejects: &mut Vec<CaptureRejectReason>) {
    let is_inside = geometry::point_in_polygon(player.position(), &player.territory);

    if !player.is_outside {
        if !is_inside && player.invulnerable_timer <= 0.0 {
            begin_exit(player);
        }
        return;
    }

    // is_outside == true from here on.
    if is_inside {
        attempt_entry(player, rejects);
        return;
    }

    if let (Some(exit_point), true) = (
        player.exit_point,
        player.trail.len() > LOOP_CLOSE_DEBOUNCE_POINTS,
    ) {
        if player.position().distance(exit_point) < LOOP_CLOSE_RADIUS {
            attempt_loop_closure(player, rejects);
        }
    }
}

fn begin_exit(player: &mut Player) {
    let hit = geometry::find_boundary_intersection(
        player.prev_position(),
        player.position(),
        &player.territory,
    );
    let (point, edge_index) = match hit {
        Some(h) => (h.point, h.edge_index),
        None => (player.prev_position(), 0),
    };
    player.is_outside = true;
    player.exit_point = Some(point);
    player.exit_edge_index = Some(edge_index);
    player.trail = vec![point];
}

fn attempt_entry(player: &mut Player, rejects: &mut Vec<CaptureRejectReason>) {
    if player.trail.len() <= MIN_TRAIL_FOR_ENTRY {
        reset_trail_state(player);
        return;
    }

    let Some(exit_point) = player.exit_point else {
        reset_trail_state(player);
        return;
    };
    let Some(exit_edge) = player.exit_edge_index else {
        reset_trail_state(player);
        return;
    };

    let hit = geometry::find_boundary_intersection(
        player.prev_position(),
        player.position(),
        &player.territory,
    );
    let (entry_point, entry_edge) = match hit {
        Some(h) => (h.point, h.edge_index),
        None => (player.position(), nearest_vertex_index(&player.territory, player.position())),
    };

    try_commit_capture(
        player,
        exit_point,
        exit_edge,
        entry_point,
        entry_edge,
        false,
        rejects,
    );
}

fn attempt_loop_closure(player: &mut Player, rejects: &mut Vec<CaptureRejectReason>) {
    let Some(exit_point) = player.exit_point else {
        reset_trail_state(player);
        return;
    };
    let Some(exit_edge) = player.exit_edge_index else {
        reset_trail_state(player);
        return;
    };

    try_commit_capture(
        player,
        exit_point,
        exit_edge,
        exit_point,
        exit_edge,
        true,
        rejects,
    );
}

fn try_commit_capture(
    player: &mut Player,
    exit_point: Point,
    exit_edge: usize,
    entry_point: Point,
    entry_edge: usize,
    require_strict_growth: bool,
    rejects: &mut Vec<CaptureRejectReason>,
) {
    let candidate = geometry::compute_capture(
        &player.territory,
        &player.trail,
        exit_point,
        exit_edge,
        entry_point,
        entry_edge,
    );

    let mut simplified = geometry::simplify_polygon(&candidate, 1.0);
    if simplified.len() > MAX_SIMPLIFY_VERTICES {
        simplified = geometry::simplify_polygon(&candidate, 2.0);
    }
    geometry::ensure_clockwise(&mut simplified);

    match validate_capture(&simplified, &player.territory, require_strict_growth) {
        Ok(()) => {
            let new_area = geometry::area(&simplified);
            player.territory = simplified;
            player.score = new_area.floor() as i64;
            player.territory_changed = true;
            player.invulnerable_timer = CAPTURE_INVULNERABILITY_SECONDS;
        }
        Err(reason) => rejects.push(reason),
    }

    reset_trail_state(player);
}

fn validate_capture(
    candidate: &[Point],
    previous: &[Point],
    require_strict_growth: bool,
) -> Result<(), CaptureRejectReason> {
    if candidate.len() < 4 {
        return Err(CaptureRejectReason::TooFewVertices);
    }
    if candidate
        .iter()
        .any(|p| !p.x.is_finite() || !p.y.is_finite())
    {
        return Err(CaptureRejectReason::NonFiniteVertex);
    }
    let new_area = geometry::area(candidate);
    if new_area <= MIN_CAPTURE_AREA {
        return Err(CaptureRejectReason::AreaTooSmall);
    }
    if require_strict_growth && new_area <= geometry::area(previous) {
        return Err(CaptureRejectReason::DidNotGrow);
    }
    if new_area.is_nan() {
        return Err(CaptureRejectReason::DegeneratePolygon);
    }
    Ok(())
}

fn reset_trail_state(player: &mut Player) {
    player.trail.clear();
    player.is_outside = false;
    player.exit_point = None;
    player.exit_edge_index = None;
}

fn nearest_vertex_index(poly: &[Point], p: Point) -> usize {
    poly.iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| {
            a.distance_sq(p)
                .partial_cmp(&b.distance_sq(p))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|(i, _)| i)
        .unwrap_or(0)
}

fn check_victory(player: &mut Player) {
    if player.has_won {
        return;
    }
    let threshold = WIN_AREA_FRACTION * std::f64::consts::PI * ARENA_RADIUS * ARENA_RADIUS;
    if (player.score as f64) >= threshold {
        player.has_won = true;
        reset_trail_state(player);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::World;

    fn spawn(world: &mut World, id: &str) {
        world.create_player(id.to_string(), id.to_string(), "#ffffff".to_string(), 2500.0, 2500.0);
    }

    #[test]
    fn exit_then_return_commits_a_capture_that_grows_area() {
        let mut world = World::new();
        spawn(&mut world, "p1");
        let initial_score = world.player("p1").unwrap().score;

        world.set_input("p1", 0.0);
        for _ in 0..120 {
            world.integrate(1.0 / 60.0);
            CaptureEngine::run(world.players_mut());
        }

        world.set_input("p1", std::f64::consts::PI);
        for _ in 0..120 {
            world.integrate(1.0 / 60.0);
            CaptureEngine::run(world.players_mut());
        }

        let p = world.player("p1").unwrap();
        assert!(p.score > initial_score);
        assert!(!p.is_outside);
        assert!(p.trail.is_empty());
    }

    #[test]
    fn short_trail_entry_does_not_capture() {
        let mut world = World::new();
        spawn(&mut world, "p1");
        {
            let p = world.players_mut().first_mut().unwrap();
            p.is_outside = true;
            p.exit_point = Some(p.position());
            p.exit_edge_index = Some(0);
            p.trail = vec![p.position()];
        }
        CaptureEngine::run(world.players_mut());
        let p = world.player("p1").unwrap();
        assert!(!p.is_outside);
        assert!(p.trail.is_empty());
    }

    #[test]
    fn victory_latches_and_blocks_further_outside_transitions() {
        let mut world = World::new();
        spawn(&mut world, "p1");
        {
            let p = world.players_mut().first_mut().unwrap();
            p.score = (0.995 * std::f64::consts::PI * ARENA_RADIUS * ARENA_RADIUS) as i64;
        }
        CaptureEngine::run(world.players_mut());
        let p = world.player("p1").unwrap();
        assert!(p.has_won);
        assert!(!p.is_dead);
    }

    #[test]
    fn winner_never_becomes_outside_again() {
        let mut world = World::new();
        spawn(&mut world, "p1");
        {
            let p = world.players_mut().first_mut().unwrap();
            p.has_won = true;
        }
        world.set_input("p1", 0.0);
        for _ in 0..200 {
            world.integrate(1.0 / 60.0);
            CaptureEngine::run(world.players_mut());
        }
        assert!(!world.player("p1").unwrap().is_dead);
    }
}
