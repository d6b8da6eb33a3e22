//! Identifier newtypes.
//!
//! Rooms and participants get server-generated UUIDs. Users do not: a
//! [`UserId`] is whatever opaque subject string the identity provider
//! hands us, stored verbatim and never interpreted.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A unique identifier for a room.
///
/// Newtype over a v4 UUID. `#[serde(transparent)]` makes it serialize
/// as the bare UUID string rather than a one-field struct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(pub Uuid);

impl RoomId {
    /// Generates a fresh random room id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RoomId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A unique identifier for a participant record.
///
/// A participant is one user's membership in one room, so this id is
/// distinct from both [`RoomId`] and [`UserId`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(pub Uuid);

impl ParticipantId {
    /// Generates a fresh random participant id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ParticipantId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The opaque identity of a caller, as issued by the identity provider.
///
/// Quizpot never parses or validates the inner string beyond equality —
/// provider subjects like `user_2NiWoZK2` pass through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    /// Borrows the inner subject string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for UserId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_id_serializes_as_bare_uuid() {
        let id = RoomId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id.0));
    }

    #[test]
    fn test_room_id_round_trip() {
        let id = RoomId::new();
        let json = serde_json::to_string(&id).unwrap();
        let back: RoomId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
    }

    #[test]
    fn test_room_ids_are_unique() {
        assert_ne!(RoomId::new(), RoomId::new());
    }

    #[test]
    fn test_participant_ids_are_unique() {
        assert_ne!(ParticipantId::new(), ParticipantId::new());
    }

    #[test]
    fn test_user_id_serializes_as_bare_string() {
        let user = UserId::from("user_2NiWoZK2");
        let json = serde_json::to_string(&user).unwrap();
        assert_eq!(json, "\"user_2NiWoZK2\"");
    }

    #[test]
    fn test_user_id_from_str_and_display() {
        let user = UserId::from("abc");
        assert_eq!(user.as_str(), "abc");
        assert_eq!(user.to_string(), "abc");
    }

    #[test]
    fn test_user_id_equality_is_verbatim() {
        assert_eq!(UserId::from("a"), UserId::from("a"));
        assert_ne!(UserId::from("a"), UserId::from("A"));
    }
}
