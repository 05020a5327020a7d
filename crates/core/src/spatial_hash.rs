//! Uniform-grid spatial index over line segments, used by the collision
//! engine to avoid checking every trail segment against every player each
//! tick. Rebuilt fresh each tick rather than updated incrementally: movement
//! per tick is small relative to the cell size, so reinsertion is cheap and
//! avoids stale-bucket bugs.

use crate::geometry::Point;
use crate::player::PlayerId;
use std::collections::HashMap;

pub const CELL_SIZE: f64 = 100.0;

/// What kind of segment a `SpatialItem` represents. Territory edges are
/// indexed for identity only (the collision engine never kills on a
/// territory hit); trail segments are checked for head-on crossings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    Trail,
    Territory,
}

/// A single segment inserted into the hash this tick.
#[derive(Debug, Clone, Copy)]
pub struct SpatialItem {
    pub kind: SegmentKind,
    pub player_id: PlayerId,
    pub p1: Point,
    pub p2: Point,
    /// Index of `p1` within the owning player's trail, when `kind == Trail`.
    pub index: Option<usize>,
}

type CellKey = (i64, i64);

fn cell_of(p: Point) -> CellKey {
    ((p.x / CELL_SIZE).floor() as i64, (p.y / CELL_SIZE).floor() as i64)
}

#[derive(Debug, Default)]
pub struct SpatialHash {
    buckets: HashMap<CellKey, Vec<SpatialItem>>,
}

impl SpatialHash {
    pub fn new() -> Self {
        Self {
            buckets: HashMap::new(),
        }
    }

    /// Drop all buckets, keeping the underlying map allocation for reuse.
    pub fn clear(&mut self) {
        for bucket in self.buckets.values_mut() {
            bucket.clear();
        }
    }

    /// Insert a segment into the cells covering its endpoints and midpoint.
    pub fn insert(&mut self, item: SpatialItem) {
        let mid = Point::new((item.p1.x + item.p2.x) * 0.5, (item.p1.y + item.p2.y) * 0.5);
        let mut keys = [cell_of(item.p1), cell_of(item.p2), cell_of(mid)];
        keys.sort_unstable();
        let mut last = None;
        for key in keys {
            if last == Some(key) {
                continue;
            }
            last = Some(key);
            self.buckets.entry(key).or_default().push(item);
        }
    }

    /// Iterate every item in the 3x3 neighborhood of cells around `p`.
    pub fn query(&self, p: Point) -> impl Iterator<Item = &SpatialItem> {
        let (cx, cy) = cell_of(p);
        (-1..=1)
            .flat_map(move |dx| (-1..=1).map(move |dy| (cx + dx, cy + dy)))
            .filter_map(move |key| self.buckets.get(&key))
            .flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(p1: Point, p2: Point) -> SpatialItem {
        SpatialItem {
            kind: SegmentKind::Trail,
            player_id: "p1".to_string(),
            p1,
            p2,
            index: Some(0),
        }
    }

    #[test]
    fn query_finds_nearby_segment() {
        let mut hash = SpatialHash::new();
        hash.insert(item(Point::new(50.0, 50.0), Point::new(60.0, 60.0)));
        let found = hash.query(Point::new(55.0, 55.0)).count();
        assert_eq!(found, 1);
    }

    #[test]
    fn query_does_not_find_far_segment() {
        let mut hash = SpatialHash::new();
        hash.insert(item(Point::new(50.0, 50.0), Point::new(60.0, 60.0)));
        let found = hash.query(Point::new(10_000.0, 10_000.0)).count();
        assert_eq!(found, 0);
    }

    #[test]
    fn clear_empties_all_buckets() {
        let mut hash = SpatialHash::new();
        hash.insert(item(Point::new(50.0, 50.0), Point::new(60.0, 60.0)));
        hash.clear();
        assert_eq!(hash.query(Point::new(55.0, 55.0)).count(), 0);
    }

    #[test]
    fn segment_spanning_cell_boundary_is_found_from_either_side() {
        let mut hash = SpatialHash::new();
        hash.insert(item(Point::new(95.0, 5.0), Point::new(105.0, 5.0)));
        assert_eq!(hash.query(Point::new(90.0, 5.0)).count(), 1);
        assert_eq!(hash.query(Point::new(110.0, 5.0)).count(), 1);
    }
}
