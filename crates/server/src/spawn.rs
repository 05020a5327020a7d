//! Spawn-point placement: find a location for a new player's seed
//! territory that doesn't overlap any existing territory.

use rand::Rng;
use territory_core::geometry::Point;
use territory_core::{ARENA_CENTER, ARENA_RADIUS, MIN_SPAWN_DISTANCE, STARTING_TERRITORY_SIZE};

const MAX_ATTEMPTS: u32 = 32;

/// Find a spawn point for a new player given the territories already in
/// play. Tries uniformly random points inside the arena first; if none are
/// found clear of every territory's buffer zone (the starting territory's
/// own radius plus `MIN_SPAWN_DISTANCE`), relaxes to "not strictly inside
/// any territory"; if that also fails, falls back to the arena center.
/// Returns whether a fallback was used, so the caller can log it.
pub fn find_spawn_point(territories: &[Vec<Point>], rng: &mut impl Rng) -> (Point, SpawnOutcome) {
    let seed_radius = STARTING_TERRITORY_SIZE / 2.0 + MIN_SPAWN_DISTANCE;

    for _ in 0..MAX_ATTEMPTS {
        let candidate = random_point_in_arena(rng);
        if is_clear_of_all(candidate, territories, seed_radius) {
            return (candidate, SpawnOutcome::Placed);
        }
    }

    for _ in 0..MAX_ATTEMPTS {
        let candidate = random_point_in_arena(rng);
        if !territories
            .iter()
            .any(|t| territory_core::geometry::point_in_polygon(candidate, t))
        {
            return (candidate, SpawnOutcome::Relaxed);
        }
    }

    (ARENA_CENTER, SpawnOutcome::FallbackToCenter)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnOutcome {
    Placed,
    Relaxed,
    FallbackToCenter,
}

fn random_point_in_arena(rng: &mut impl Rng) -> Point {
    let u: f64 = rng.gen_range(0.0..1.0);
    let theta: f64 = rng.gen_range(0.0..std::f64::consts::TAU);
    let r = u.sqrt() * ARENA_RADIUS;
    Point::new(ARENA_CENTER.x + r * theta.cos(), ARENA_CENTER.y + r * theta.sin())
}

fn is_clear_of_all(p: Point, territories: &[Vec<Point>], clearance: f64) -> bool {
    territories.iter().all(|territory| {
        if territory_core::geometry::point_in_polygon(p, territory) {
            return false;
        }
        territory
            .iter()
            .all(|&v| v.distance(p) >= clearance)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn empty_room_places_on_first_attempt() {
        let mut rng = StdRng::seed_from_u64(1);
        let (point, outcome) = find_spawn_point(&[], &mut rng);
        assert_eq!(outcome, SpawnOutcome::Placed);
        assert!(point.distance(ARENA_CENTER) <= ARENA_RADIUS);
    }

    #[test]
    fn spawn_point_avoids_existing_territory() {
        let mut rng = StdRng::seed_from_u64(2);
        let existing = vec![
            Point::new(ARENA_CENTER.x - 50.0, ARENA_CENTER.y - 50.0),
            Point::new(ARENA_CENTER.x + 50.0, ARENA_CENTER.y - 50.0),
            Point::new(ARENA_CENTER.x + 50.0, ARENA_CENTER.y + 50.0),
            Point::new(ARENA_CENTER.x - 50.0, ARENA_CENTER.y + 50.0),
        ];
        let (point, _) = find_spawn_point(&[existing.clone()], &mut rng);
        assert!(is_clear_of_all(point, &[existing], STARTING_TERRITORY_SIZE / 2.0 + MIN_SPAWN_DISTANCE) || point == ARENA_CENTER);
    }
}
