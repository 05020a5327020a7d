//! Shared wire-protocol types for the territory-capture game: the outbound
//! room-state projection broadcast to every client, and the inbound input
//! message clients send back. Serialized as JSON via `serde`/`serde_json`,
//! matching the transport this game actually speaks over its WebSocket
//! connection.

#![deny(unsafe_code)]

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use territory_core::Player;

/// A single player's state as broadcast to clients. `territory` and
/// `trail` are flattened `[x0, y0, x1, y1, ...]` arrays rather than arrays
/// of objects, matching the compact encoding the projection layer uses to
/// keep per-tick payloads small.
///
/// `territory_changed` is a one-shot resync hint: a transport layer should
/// resync its client-side copy of `territory` whenever this is `true`, or
/// whenever the received `territory` array's length differs from the
/// length it already holds for this player — the two conditions together
/// are what make a capture-driven vertex-count change and a no-op tick both
/// cheap to detect without diffing every vertex.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    pub id: String,
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub angle: f64,
    pub color: String,
    pub is_dead: bool,
    pub has_won: bool,
    pub score: i64,
    pub territory: Vec<f64>,
    pub trail: Vec<f64>,
    pub territory_changed: bool,
}

/// The full per-tick room snapshot broadcast to every connected client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct GameRoomState {
    pub players: HashMap<String, PlayerState>,
}

/// A client's desired heading, in radians. The only inbound control
/// message this game defines.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Input {
    pub angle: f64,
}

/// Parameters a client may send when joining a room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct JoinParams {
    pub username: Option<String>,
}

fn flatten(points: &[territory_core::Point]) -> Vec<f64> {
    points.iter().flat_map(|p| [p.x, p.y]).collect()
}

/// Project a single `Player` into its wire form. This is a pure, one-way
/// function of `Player`; the transport layer is responsible for diffing
/// successive projections against whatever baseline a given client holds.
pub fn project_player(player: &Player) -> PlayerState {
    PlayerState {
        id: player.id.clone(),
        name: player.name.clone(),
        x: player.x,
        y: player.y,
        angle: player.angle,
        color: player.color.clone(),
        is_dead: player.is_dead,
        has_won: player.has_won,
        score: player.score,
        territory: flatten(&player.territory),
        trail: flatten(&player.trail),
        territory_changed: player.territory_changed,
    }
}

/// Project every player in `players` into a `GameRoomState`, keyed by id.
pub fn project_room(players: &[Player]) -> GameRoomState {
    GameRoomState {
        players: players
            .iter()
            .map(|p| (p.id.clone(), project_player(p)))
            .collect(),
    }
}
