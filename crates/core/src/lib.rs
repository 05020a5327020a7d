//! Territory Simulation Core
//!
//! Deterministic, fixed-timestep simulation of a territory-capture match:
//! players move continuously inside a circular arena, draw trails when they
//! leave their own territory, and capture area by closing a loop back into
//! it. This crate is the authoritative source of truth for everything that
//! affects match outcome.
//!
//! The Simulation Core must not:
//! - perform I/O (file, network, etc.)
//! - read wall-clock time
//! - use unseeded/ambient randomness
//! - depend on frame rate or variable delta time
//!
//! All external communication happens through the explicit, serializable
//! types in this crate; the server edge owns session identity, transport,
//! and scheduling.

#![deny(unsafe_code)]

pub mod bot;
pub mod capture;
pub mod collision;
pub mod geometry;
pub mod player;
pub mod spatial_hash;
pub mod world;

pub use geometry::Point;
pub use player::{Player, PlayerId};
pub use world::World;

/// Half-extent of the square the circular arena is inscribed in.
pub const WORLD_WIDTH: f64 = 5000.0;
pub const WORLD_HEIGHT: f64 = 5000.0;

/// Center of the playable arena.
pub const ARENA_CENTER: Point = Point {
    x: WORLD_WIDTH / 2.0,
    y: WORLD_HEIGHT / 2.0,
};

/// Radius of the playable arena (a circle inscribed in the world square).
pub const ARENA_RADIUS: f64 = 2500.0;

/// Linear speed in world units per second.
pub const PLAYER_SPEED: f64 = 500.0;

/// Steering rate: fraction of the heading error closed per second.
pub const PLAYER_TURN_SPEED: f64 = 12.0;

/// Minimum spacing between consecutive trail points.
pub const TRAIL_POINT_DISTANCE: f64 = 10.0;

/// Diameter-ish size of a freshly spawned territory.
pub const STARTING_TERRITORY_SIZE: f64 = 300.0;

/// Minimum distance enforced between a new spawn point and existing territories.
pub const MIN_SPAWN_DISTANCE: f64 = 500.0;

/// Fixed simulation tick rate in Hz.
pub const SERVER_TICK_RATE: u32 = 60;

/// Seconds of exit-detection grace granted after a successful capture.
pub const CAPTURE_INVULNERABILITY_SECONDS: f64 = 0.5;

/// Fraction of the arena's area that latches a win.
pub const WIN_AREA_FRACTION: f64 = 0.99;
