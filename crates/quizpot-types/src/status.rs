//! Room status state machine and difficulty levels.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Difficulty
// ---------------------------------------------------------------------------

/// How hard the questions in a room are.
///
/// The wire representation is SCREAMING_SNAKE (`"VERY_HARD"`), matching
/// what clients already store and filter on.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Difficulty {
    Easy,
    /// The default for newly created rooms.
    #[default]
    Medium,
    Hard,
    VeryHard,
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Easy => write!(f, "Easy"),
            Self::Medium => write!(f, "Medium"),
            Self::Hard => write!(f, "Hard"),
            Self::VeryHard => write!(f, "Very Hard"),
        }
    }
}

// ---------------------------------------------------------------------------
// RoomStatus
// ---------------------------------------------------------------------------

/// The lifecycle state of a room.
///
/// Transitions are monotonic — never backward:
///
/// ```text
/// Pending → InProgress → Completed
/// ```
///
/// - **Pending**: room exists and (while the deadline holds) accepts
///   registrations. The creator has not started the game.
/// - **InProgress**: the creator started the game; participants are
///   playing and submitting scores.
/// - **Completed**: every participant submitted, or an administrative
///   close forced the room shut. Terminal for gameplay; the room stays
///   queryable forever.
///
/// An administrative close may jump straight from `Pending` to
/// `Completed` — still forward, so monotonicity holds.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoomStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

impl RoomStatus {
    /// Returns `true` if the room has not started yet.
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Returns `true` if the game is running.
    pub fn is_in_progress(&self) -> bool {
        matches!(self, Self::InProgress)
    }

    /// Returns `true` if the room reached its terminal state.
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }

    /// The next state in the guarded lifecycle, if any.
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Pending => Some(Self::InProgress),
            Self::InProgress => Some(Self::Completed),
            Self::Completed => None,
        }
    }

    /// Returns `true` if moving to `target` keeps the lifecycle
    /// monotonic (strictly forward, any number of steps).
    pub fn can_transition_to(self, target: Self) -> bool {
        rank(target) > rank(self)
    }
}

fn rank(status: RoomStatus) -> u8 {
    match status {
        RoomStatus::Pending => 0,
        RoomStatus::InProgress => 1,
        RoomStatus::Completed => 2,
    }
}

impl std::fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "Pending"),
            Self::InProgress => write!(f, "InProgress"),
            Self::Completed => write!(f, "Completed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_next_follows_lifecycle_order() {
        assert_eq!(RoomStatus::Pending.next(), Some(RoomStatus::InProgress));
        assert_eq!(RoomStatus::InProgress.next(), Some(RoomStatus::Completed));
        assert_eq!(RoomStatus::Completed.next(), None);
    }

    #[test]
    fn test_status_transitions_are_monotonic() {
        assert!(RoomStatus::Pending.can_transition_to(RoomStatus::InProgress));
        assert!(RoomStatus::Pending.can_transition_to(RoomStatus::Completed));
        assert!(RoomStatus::InProgress.can_transition_to(RoomStatus::Completed));

        assert!(!RoomStatus::InProgress.can_transition_to(RoomStatus::Pending));
        assert!(!RoomStatus::Completed.can_transition_to(RoomStatus::Pending));
        assert!(!RoomStatus::Completed.can_transition_to(RoomStatus::InProgress));
        assert!(!RoomStatus::Pending.can_transition_to(RoomStatus::Pending));
    }

    #[test]
    fn test_status_predicates() {
        assert!(RoomStatus::Pending.is_pending());
        assert!(RoomStatus::InProgress.is_in_progress());
        assert!(RoomStatus::Completed.is_completed());
        assert!(!RoomStatus::Completed.is_pending());
    }

    #[test]
    fn test_status_serializes_screaming_snake() {
        assert_eq!(
            serde_json::to_string(&RoomStatus::InProgress).unwrap(),
            "\"IN_PROGRESS\""
        );
        assert_eq!(
            serde_json::to_string(&RoomStatus::Pending).unwrap(),
            "\"PENDING\""
        );
        assert_eq!(
            serde_json::to_string(&RoomStatus::Completed).unwrap(),
            "\"COMPLETED\""
        );
    }

    #[test]
    fn test_status_deserializes_from_wire_form() {
        let status: RoomStatus = serde_json::from_str("\"IN_PROGRESS\"").unwrap();
        assert_eq!(status, RoomStatus::InProgress);
    }

    #[test]
    fn test_status_default_is_pending() {
        assert_eq!(RoomStatus::default(), RoomStatus::Pending);
    }

    #[test]
    fn test_difficulty_serializes_screaming_snake() {
        assert_eq!(
            serde_json::to_string(&Difficulty::VeryHard).unwrap(),
            "\"VERY_HARD\""
        );
        assert_eq!(
            serde_json::to_string(&Difficulty::Easy).unwrap(),
            "\"EASY\""
        );
    }

    #[test]
    fn test_difficulty_default_is_medium() {
        assert_eq!(Difficulty::default(), Difficulty::Medium);
    }

    #[test]
    fn test_difficulty_display_labels() {
        assert_eq!(Difficulty::VeryHard.to_string(), "Very Hard");
        assert_eq!(Difficulty::Medium.to_string(), "Medium");
    }
}
