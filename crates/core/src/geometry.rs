//! Pure computational-geometry primitives used by the capture and collision
//! engines. Every function here is side-effect free and takes its inputs by
//! value or shared reference; none of them touch `Player` or any other
//! stateful type, so they can be exercised directly in isolation.

/// A point in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    pub fn distance_sq(self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }
}

/// The boundary edge a ray crossed, together with the crossing point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundaryHit {
    pub point: Point,
    pub edge_index: usize,
}

/// Even-odd ray-casting point-in-polygon test.
///
/// `poly` is treated as a closed ring; the implicit edge from the last
/// vertex back to the first is included. Invariant under cyclic rotation
/// and reversal of `poly`.
pub fn point_in_polygon(p: Point, poly: &[Point]) -> bool {
    let n = poly.len();
    if n < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let vi = poly[i];
        let vj = poly[j];
        let straddles = (vi.y > p.y) != (vj.y > p.y);
        if straddles {
            let x_intersect = (vj.x - vi.x) * (p.y - vi.y) / (vj.y - vi.y) + vi.x;
            if p.x < x_intersect {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Intersection of two closed segments, in parametric form. Returns `None`
/// for parallel or collinear segments (including exact overlaps); a caller
/// that cares about collinear touches must handle that separately.
pub fn segment_intersect(a: Point, b: Point, c: Point, d: Point) -> Option<Point> {
    let r = (b.x - a.x, b.y - a.y);
    let s = (d.x - c.x, d.y - c.y);

    // Solve a + u*r = c + v*s for u, v using Cramer's rule.
    let denom = r.0 * s.1 - r.1 * s.0;
    if denom == 0.0 {
        return None;
    }
    let cma = (c.x - a.x, c.y - a.y);
    let u = (cma.0 * s.1 - cma.1 * s.0) / denom;
    let v = (cma.0 * r.1 - cma.1 * r.0) / denom;

    if (0.0..=1.0).contains(&u) && (0.0..=1.0).contains(&v) {
        Some(Point::new(a.x + u * r.0, a.y + u * r.1))
    } else {
        None
    }
}

/// Find the first polygon edge (in index order) crossed by the open
/// segment `p1 -> p2`. Ties are broken by lowest edge index.
pub fn find_boundary_intersection(p1: Point, p2: Point, poly: &[Point]) -> Option<BoundaryHit> {
    let n = poly.len();
    if n < 2 {
        return None;
    }
    for i in 0..n {
        let edge_start = poly[i];
        let edge_end = poly[(i + 1) % n];
        if let Some(point) = segment_intersect(p1, p2, edge_start, edge_end) {
            return Some(BoundaryHit {
                point,
                edge_index: i,
            });
        }
    }
    None
}

/// Walk the polygon boundary forward from `(start_edge + 1) % n` through
/// `end_edge` inclusive, returning the vertices visited in order. Used to
/// build capture candidates out of boundary arcs.
pub fn extract_boundary_arc(poly: &[Point], start_edge: usize, end_edge: usize) -> Vec<Point> {
    let n = poly.len();
    if n == 0 {
        return Vec::new();
    }
    let mut out = Vec::new();
    let mut i = (start_edge + 1) % n;
    loop {
        out.push(poly[i]);
        if i == end_edge {
            break;
        }
        i = (i + 1) % n;
    }
    out
}

/// Signed polygon area via the shoelace formula. Positive denotes clockwise
/// winding under this crate's y-down convention.
pub fn signed_area(poly: &[Point]) -> f64 {
    let n = poly.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let a = poly[i];
        let b = poly[(i + 1) % n];
        sum += a.x * b.y - b.x * a.y;
    }
    sum * 0.5
}

/// Unsigned area of the polygon.
pub fn area(poly: &[Point]) -> f64 {
    signed_area(poly).abs()
}

/// Reverse `poly` in place if its winding is counter-clockwise.
pub fn ensure_clockwise(poly: &mut Vec<Point>) {
    if signed_area(poly) < 0.0 {
        poly.reverse();
    }
}

/// Greedily simplify a polygon, keeping the first vertex and every
/// subsequent vertex whose distance from the last kept vertex exceeds
/// `tolerance`.
pub fn simplify_polygon(poly: &[Point], tolerance: f64) -> Vec<Point> {
    if poly.is_empty() {
        return Vec::new();
    }
    let tol_sq = tolerance * tolerance;
    let mut out = vec![poly[0]];
    for &p in &poly[1..] {
        let last = *out.last().expect("out always has at least one point");
        if last.distance_sq(p) > tol_sq {
            out.push(p);
        }
    }
    out
}

/// Which boundary configuration a capture spans; kept as an explicit enum
/// so the two candidate-construction branches stay exhaustively matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CaptureCase {
    SameEdge,
    DifferentEdge,
}

/// Build the capture polygon formed by a trail that exited the territory at
/// `exit_point` (on edge `exit_edge`) and re-entered at `entry_point` (on
/// edge `entry_edge`).
///
/// Two boundary-closure candidates are always considered; the one with the
/// larger absolute area is returned. This sidesteps winding-order bookkeeping
/// in the candidate builder itself.
pub fn compute_capture(
    territory: &[Point],
    trail: &[Point],
    exit_point: Point,
    exit_edge: usize,
    entry_point: Point,
    entry_edge: usize,
) -> Vec<Point> {
    let case = if exit_edge == entry_edge {
        CaptureCase::SameEdge
    } else {
        CaptureCase::DifferentEdge
    };

    let (candidate_a, candidate_b) = match case {
        CaptureCase::SameEdge => {
            let mut loop_only = Vec::with_capacity(trail.len() + 2);
            loop_only.push(exit_point);
            loop_only.extend_from_slice(trail);
            loop_only.push(entry_point);

            let mut expansion = loop_only.clone();
            expansion.extend(extract_boundary_arc(territory, exit_edge, exit_edge));

            (loop_only, expansion)
        }
        CaptureCase::DifferentEdge => {
            let arc_forward = extract_boundary_arc(territory, exit_edge, entry_edge);
            let arc_backward = extract_boundary_arc(territory, entry_edge, exit_edge);

            let mut candidate_a = Vec::with_capacity(trail.len() + 2 + arc_forward.len());
            candidate_a.push(exit_point);
            candidate_a.extend_from_slice(trail);
            candidate_a.push(entry_point);
            candidate_a.extend(arc_forward.into_iter().rev());

            let mut candidate_b = Vec::with_capacity(trail.len() + 2 + arc_backward.len());
            candidate_b.push(exit_point);
            candidate_b.extend_from_slice(trail);
            candidate_b.push(entry_point);
            candidate_b.extend(arc_backward);

            (candidate_a, candidate_b)
        }
    };

    if area(&candidate_a) >= area(&candidate_b) {
        candidate_a
    } else {
        candidate_b
    }
}
