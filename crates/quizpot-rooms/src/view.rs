//! External room representation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use quizpot_settlement::Settlement;
use quizpot_types::{Difficulty, RoomId, RoomStatus, UserId};

use crate::Participant;

/// What callers see when they read a room.
///
/// Every operation that touches a room returns one of these, built
/// fresh from the room's state at that moment. Two fields are derived
/// rather than stored: `is_registration_open` reflects the window and
/// cap at read time, and `prize_distribution` is recomputed from the
/// current participant count and entry fee so it can never go stale.
///
/// Participants are in leaderboard order: score descending, ties by
/// earliest completion, unsubmitted entries last.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomView {
    pub id: RoomId,
    pub title: String,
    pub description: String,
    pub creator: UserId,
    pub current_participants: u32,
    pub entry_fee: u64,
    pub difficulty: Difficulty,
    pub scheduled_start_time: DateTime<Utc>,
    pub registration_deadline: DateTime<Utc>,
    pub is_active: bool,
    pub status: RoomStatus,
    pub duration_minutes: u32,
    pub started_at: Option<DateTime<Utc>>,
    pub participants: Vec<Participant>,
    pub prize_distribution: Settlement,
    pub is_registration_open: bool,
}
