//! Session bookkeeping for a room: the mapping between a connected client
//! (or a bot slot) and the player it controls.

use territory_core::PlayerId;

pub type SessionId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionKind {
    Human,
    Bot,
}

/// One occupant of a room. A room holds any number of sessions, unlike a
/// fixed two-party match: humans and bots share the same registry and are
/// distinguished only by `kind`.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: SessionId,
    pub player_id: PlayerId,
    pub kind: SessionKind,
}

impl Session {
    pub fn new(id: SessionId, player_id: PlayerId, kind: SessionKind) -> Self {
        Self { id, player_id, kind }
    }

    pub fn is_bot(&self) -> bool {
        matches!(self.kind, SessionKind::Bot)
    }
}
