//! Per-tick trail-crossing detection. Runs after [`crate::capture`] so a
//! player who just captured is not killed by the very trail segments that
//! were cleared this tick.
//!
//! Two distinct rules apply: crossing a *foreign* trail kills the trail's
//! owner (the victim whose line was cut), while crossing one's *own* trail
//! kills the mover. Because victims are resolved from each tick's pre-tick
//! trails, two players can land fatal crossings on each other in the same
//! tick.

use crate::player::Player;
use crate::spatial_hash::{SegmentKind, SpatialHash, SpatialItem};

/// Segments of the body closest to the head are exempt from self-collision,
/// so sharp turns and boundary-hugging don't kill the player that made
/// them.
const SELF_COLLISION_TAIL_GUARD: usize = 20;
const SELF_COLLISION_EXIT_GUARD: f64 = 100.0;

/// Why a player died this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EliminationReason {
    ForeignTrailCrossing,
    SelfTrailCrossing,
}

pub struct CollisionEngine;

impl CollisionEngine {
    /// Populate `hash` with every live player's trail, then check every
    /// live, non-victorious, non-invulnerable player against it. Returns
    /// the ids of players eliminated this tick, in player iteration order.
    pub fn run(players: &mut [Player], hash: &mut SpatialHash) -> Vec<(String, EliminationReason)> {
        hash.clear();
        for player in players.iter() {
            if player.is_dead {
                continue;
            }
            for (i, window) in player.trail.windows(2).enumerate() {
                hash.insert(SpatialItem {
                    kind: SegmentKind::Trail,
                    player_id: player.id.clone(),
                    p1: window[0],
                    p2: window[1],
                    index: Some(i),
                });
            }
            let n = player.territory.len();
            for i in 0..n {
                hash.insert(SpatialItem {
                    kind: SegmentKind::Territory,
                    player_id: player.id.clone(),
                    p1: player.territory[i],
                    p2: player.territory[(i + 1) % n],
                    index: None,
                });
            }
        }

        let mut kills: Vec<(String, EliminationReason)> = Vec::new();

        for player in players.iter() {
            if player.is_dead || player.has_won || player.invulnerable_timer > 0.0 {
                continue;
            }

            for victim_id in foreign_trail_victims(player, hash) {
                if already_marked(&kills, &victim_id) {
                    continue;
                }
                let victim_is_protected = players.iter().any(|p| {
                    p.id == victim_id && (p.is_dead || p.has_won || p.invulnerable_timer > 0.0)
                });
                if !victim_is_protected {
                    kills.push((victim_id, EliminationReason::ForeignTrailCrossing));
                }
            }

            if !already_marked(&kills, &player.id) && crosses_own_trail(player, hash) {
                kills.push((player.id.clone(), EliminationReason::SelfTrailCrossing));
            }
        }

        for player in players.iter_mut() {
            if let Some((_, reason)) = kills.iter().find(|(id, _)| *id == player.id) {
                kill(player, *reason);
            }
        }

        kills
    }
}

fn already_marked(kills: &[(String, EliminationReason)], id: &str) -> bool {
    kills.iter().any(|(k, _)| k == id)
}

/// Other players whose trail the mover's last step crossed. Territories are
/// not solid, so only `Trail` items are ever considered here.
fn foreign_trail_victims(player: &Player, hash: &SpatialHash) -> Vec<String> {
    let prev = player.prev_position();
    let curr = player.position();
    let mut victims = Vec::new();
    for item in hash.query(curr) {
        if item.kind != SegmentKind::Trail || item.player_id == player.id {
            continue;
        }
        if crate::geometry::segment_intersect(prev, curr, item.p1, item.p2).is_some()
            && !victims.contains(&item.player_id)
        {
            victims.push(item.player_id.clone());
        }
    }
    victims
}

fn crosses_own_trail(player: &Player, hash: &SpatialHash) -> bool {
    let prev = player.prev_position();
    let curr = player.position();
    for item in hash.query(curr) {
        if item.kind != SegmentKind::Trail || item.player_id != player.id {
            continue;
        }
        if player_is_safe_from_self(player, item) {
            continue;
        }
        if crate::geometry::segment_intersect(prev, curr, item.p1, item.p2).is_some() {
            return true;
        }
    }
    false
}

fn player_is_safe_from_self(player: &Player, item: &SpatialItem) -> bool {
    if crate::geometry::point_in_polygon(player.position(), &player.territory) {
        return true;
    }
    if let Some(exit_point) = player.exit_point {
        if player.position().distance(exit_point) < SELF_COLLISION_EXIT_GUARD {
            return true;
        }
    }
    let head_index = player.trail.len().saturating_sub(1);
    match item.index {
        Some(i) => head_index.saturating_sub(i) <= SELF_COLLISION_TAIL_GUARD,
        None => true,
    }
}

fn kill(player: &mut Player, reason: EliminationReason) {
    let _ = reason;
    player.is_dead = true;
    player.trail.clear();
    player.death_timer = 0.0;
}
