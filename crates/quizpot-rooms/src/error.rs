//! Error types for the room layer.

use chrono::{DateTime, Utc};
use quizpot_types::{RoomId, UserId};

/// Errors that can occur during room operations.
///
/// All of these are business-rule rejections the caller can display
/// and react to by changing the request. None is transient, so none
/// should be retried as-is. The one exception is
/// [`Unavailable`](Self::Unavailable), which signals an infrastructure
/// problem rather than a rule violation.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// The room does not exist.
    #[error("room {0} not found")]
    NotFound(RoomId),

    /// A create or update request broke a business rule: empty or
    /// oversized title, entry fee below the minimum, or a registration
    /// deadline that does not precede the scheduled start.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The registration window is closed. The room is inactive, has
    /// already started, is past its deadline, or is full.
    #[error("registration is closed for room {0}")]
    RegistrationClosed(RoomId),

    /// The user already holds a participant record in this room.
    #[error("user {user} already joined room {room}")]
    AlreadyJoined { room: RoomId, user: UserId },

    /// The user is not the room's creator.
    #[error("user {user} is not authorized to manage room {room}")]
    NotAuthorized { room: RoomId, user: UserId },

    /// The room's status does not allow this operation. For example,
    /// submitting a score to a room that is not in progress.
    #[error("invalid room state: {0}")]
    InvalidState(String),

    /// Start was requested before the scheduled start time.
    #[error("room {room} cannot start before {scheduled_start_time}")]
    TooEarly {
        room: RoomId,
        scheduled_start_time: DateTime<Utc>,
    },

    /// The user has no participant record in this room.
    #[error("user {user} is not a participant of room {room}")]
    NotAParticipant { room: RoomId, user: UserId },

    /// The room's command channel is full or closed.
    #[error("room {0} is unavailable")]
    Unavailable(RoomId),
}
