//! Room and participant domain model.
//!
//! Every lifecycle rule lives here as a synchronous method on [`Room`],
//! parameterized on the caller's `now` so each rule is testable without
//! a clock. The actor in [`crate::room`] owns each `Room` value and
//! applies these methods one command at a time, which is what makes
//! them race-free.

use std::cmp::Reverse;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use quizpot_settlement::SettlementPolicy;
use quizpot_types::{Difficulty, ParticipantId, RoomId, RoomStatus, UserId};

use crate::{RoomError, RoomPolicy};
use crate::view::RoomView;

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// A request to create a room.
///
/// Description, difficulty, and duration are optional on the wire and
/// default to empty, [`Difficulty::Medium`], and 30 minutes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRoom {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub entry_fee: u64,
    #[serde(default)]
    pub difficulty: Difficulty,
    pub scheduled_start_time: DateTime<Utc>,
    pub registration_deadline: DateTime<Utc>,
    #[serde(default = "default_duration_minutes")]
    pub duration_minutes: u32,
}

fn default_duration_minutes() -> u32 {
    30
}

impl NewRoom {
    /// Checks the creation business rules against `policy`.
    pub(crate) fn validate(&self, policy: &RoomPolicy) -> Result<(), RoomError> {
        validate_fields(
            &self.title,
            self.entry_fee,
            self.registration_deadline,
            self.scheduled_start_time,
            policy,
        )
    }
}

/// A partial edit to a room that has not started. `None` fields keep
/// their current value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub entry_fee: Option<u64>,
    pub difficulty: Option<Difficulty>,
    pub scheduled_start_time: Option<DateTime<Utc>>,
    pub registration_deadline: Option<DateTime<Utc>>,
    pub duration_minutes: Option<u32>,
}

impl RoomUpdate {
    /// Returns `true` if at least one field is set.
    pub fn has_changes(&self) -> bool {
        self.title.is_some()
            || self.description.is_some()
            || self.entry_fee.is_some()
            || self.difficulty.is_some()
            || self.scheduled_start_time.is_some()
            || self.registration_deadline.is_some()
            || self.duration_minutes.is_some()
    }
}

fn validate_fields(
    title: &str,
    entry_fee: u64,
    registration_deadline: DateTime<Utc>,
    scheduled_start_time: DateTime<Utc>,
    policy: &RoomPolicy,
) -> Result<(), RoomError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(RoomError::Validation("title must not be empty".into()));
    }
    if title.chars().count() > policy.max_title_chars {
        return Err(RoomError::Validation(format!(
            "title must be at most {} characters",
            policy.max_title_chars
        )));
    }
    if entry_fee < policy.min_entry_fee {
        return Err(RoomError::Validation(format!(
            "entry fee must be at least {}",
            policy.min_entry_fee
        )));
    }
    if entry_fee > policy.max_entry_fee {
        return Err(RoomError::Validation(format!(
            "entry fee must be at most {}",
            policy.max_entry_fee
        )));
    }
    if registration_deadline >= scheduled_start_time {
        return Err(RoomError::Validation(
            "registration deadline must be before the scheduled start time".into(),
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Participant
// ---------------------------------------------------------------------------

/// One user's membership and score record within one room.
///
/// Created on a successful join, mutated when that user submits a
/// score, never deleted. `(room, user)` pairs are unique, enforced by
/// [`Room::join`]. This struct is also the wire shape: it serializes
/// exactly as clients see it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub user: UserId,
    pub score: i64,
    /// `None` until the user submits a score.
    pub completed_at: Option<DateTime<Utc>>,
}

impl Participant {
    fn new(user: UserId) -> Self {
        Self {
            id: ParticipantId::new(),
            user,
            score: 0,
            completed_at: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Room
// ---------------------------------------------------------------------------

/// A scheduled, fee-gated competitive session.
///
/// Lifecycle: `Pending → InProgress → Completed`, never backward. A
/// room is logically closed (`is_active` false, status `Completed`) but
/// never deleted, so completed rooms stay queryable.
#[derive(Debug, Clone)]
pub struct Room {
    pub id: RoomId,
    pub title: String,
    pub description: String,
    /// Opaque identity of the user who created the room. Only the
    /// creator may start the game or edit the room.
    pub creator: UserId,
    pub entry_fee: u64,
    pub difficulty: Difficulty,
    pub scheduled_start_time: DateTime<Utc>,
    /// Must strictly precede `scheduled_start_time`.
    pub registration_deadline: DateTime<Utc>,
    pub duration_minutes: u32,
    pub status: RoomStatus,
    pub is_active: bool,
    /// Set exactly once, when the status first becomes `InProgress`.
    pub started_at: Option<DateTime<Utc>>,
    pub participants: Vec<Participant>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Room {
    /// Builds a room from an already validated request.
    ///
    /// The creator joins automatically, so the participant count starts
    /// at 1.
    pub(crate) fn new(creator: UserId, request: NewRoom, now: DateTime<Utc>) -> Self {
        Self {
            id: RoomId::new(),
            title: request.title,
            description: request.description,
            creator: creator.clone(),
            entry_fee: request.entry_fee,
            difficulty: request.difficulty,
            scheduled_start_time: request.scheduled_start_time,
            registration_deadline: request.registration_deadline,
            duration_minutes: request.duration_minutes,
            status: RoomStatus::Pending,
            is_active: true,
            started_at: None,
            participants: vec![Participant::new(creator)],
            created_at: now,
            updated_at: now,
        }
    }

    /// Number of participants. Always the length of the participant
    /// list, so it cannot drift from the actual records.
    pub fn current_participants(&self) -> u32 {
        self.participants.len() as u32
    }

    /// Returns `true` while new joins are accepted: the room is active,
    /// still `Pending`, before its deadline, and below the cap.
    pub fn is_registration_open(&self, now: DateTime<Utc>, policy: &RoomPolicy) -> bool {
        self.is_active
            && self.status.is_pending()
            && now < self.registration_deadline
            && self.current_participants() < policy.max_participants
    }

    /// Returns `true` once enough participants joined for a real game.
    pub fn has_minimum_participants(&self, policy: &RoomPolicy) -> bool {
        self.current_participants() >= policy.min_participants
    }

    /// The participant record for `user`, if one exists.
    pub fn participant(&self, user: &UserId) -> Option<&Participant> {
        self.participants.iter().find(|p| &p.user == user)
    }

    /// Adds a participant for `user`.
    ///
    /// The registration window is checked before uniqueness, so a
    /// repeat join after the deadline reports `RegistrationClosed`,
    /// not `AlreadyJoined`.
    pub(crate) fn join(
        &mut self,
        user: UserId,
        now: DateTime<Utc>,
        policy: &RoomPolicy,
    ) -> Result<(), RoomError> {
        if !self.is_registration_open(now, policy) {
            return Err(RoomError::RegistrationClosed(self.id));
        }
        if self.participant(&user).is_some() {
            return Err(RoomError::AlreadyJoined {
                room: self.id,
                user,
            });
        }
        self.participants.push(Participant::new(user));
        self.updated_at = now;
        Ok(())
    }

    /// Transitions `Pending → InProgress` on behalf of the creator.
    ///
    /// Checks run in order: authorization, status, schedule. There is
    /// no minimum-participant guard; a creator may start a room alone.
    pub(crate) fn start(&mut self, user: &UserId, now: DateTime<Utc>) -> Result<(), RoomError> {
        if *user != self.creator {
            return Err(RoomError::NotAuthorized {
                room: self.id,
                user: user.clone(),
            });
        }
        if !self.status.is_pending() {
            return Err(RoomError::InvalidState(format!(
                "room {} has already started or completed",
                self.id
            )));
        }
        if now < self.scheduled_start_time {
            return Err(RoomError::TooEarly {
                room: self.id,
                scheduled_start_time: self.scheduled_start_time,
            });
        }

        self.status = RoomStatus::InProgress;
        // started_at is written once, on the first transition.
        if self.started_at.is_none() {
            self.started_at = Some(now);
        }
        self.updated_at = now;
        Ok(())
    }

    /// Records `user`'s score and stamps their completion time.
    ///
    /// Resubmitting while the game is in progress overwrites the
    /// earlier score and timestamp. When the last outstanding
    /// participant submits, the room completes; the status check before
    /// the write keeps that transition single-shot.
    pub(crate) fn submit_score(
        &mut self,
        user: &UserId,
        score: i64,
        now: DateTime<Utc>,
    ) -> Result<Participant, RoomError> {
        if !self.status.is_in_progress() {
            return Err(RoomError::InvalidState(format!(
                "room {} is not in progress",
                self.id
            )));
        }
        let index = self
            .participants
            .iter()
            .position(|p| &p.user == user)
            .ok_or_else(|| RoomError::NotAParticipant {
                room: self.id,
                user: user.clone(),
            })?;

        self.participants[index].score = score;
        self.participants[index].completed_at = Some(now);
        let recorded = self.participants[index].clone();

        if self.all_scores_in() && self.status.can_transition_to(RoomStatus::Completed) {
            self.status = RoomStatus::Completed;
        }
        self.updated_at = now;
        Ok(recorded)
    }

    /// Administrative close: deactivates the room and forces the status
    /// to `Completed`. Valid from any state and idempotent.
    pub(crate) fn close(&mut self, now: DateTime<Utc>) {
        self.is_active = false;
        self.status = RoomStatus::Completed;
        self.updated_at = now;
    }

    /// Applies a partial edit on behalf of the creator.
    ///
    /// Only `Pending` rooms can be edited, and the merged result is
    /// revalidated against the same rules as creation. An empty update
    /// is a no-op.
    pub(crate) fn apply_update(
        &mut self,
        user: &UserId,
        update: RoomUpdate,
        now: DateTime<Utc>,
        policy: &RoomPolicy,
    ) -> Result<(), RoomError> {
        if *user != self.creator {
            return Err(RoomError::NotAuthorized {
                room: self.id,
                user: user.clone(),
            });
        }
        if !self.status.is_pending() {
            return Err(RoomError::InvalidState(format!(
                "room {} can no longer be edited",
                self.id
            )));
        }
        if !update.has_changes() {
            return Ok(());
        }

        validate_fields(
            update.title.as_deref().unwrap_or(&self.title),
            update.entry_fee.unwrap_or(self.entry_fee),
            update
                .registration_deadline
                .unwrap_or(self.registration_deadline),
            update
                .scheduled_start_time
                .unwrap_or(self.scheduled_start_time),
            policy,
        )?;

        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(entry_fee) = update.entry_fee {
            self.entry_fee = entry_fee;
        }
        if let Some(difficulty) = update.difficulty {
            self.difficulty = difficulty;
        }
        if let Some(scheduled_start_time) = update.scheduled_start_time {
            self.scheduled_start_time = scheduled_start_time;
        }
        if let Some(registration_deadline) = update.registration_deadline {
            self.registration_deadline = registration_deadline;
        }
        if let Some(duration_minutes) = update.duration_minutes {
            self.duration_minutes = duration_minutes;
        }
        self.updated_at = now;
        Ok(())
    }

    /// Builds the external representation, deriving the registration
    /// flag and the settlement breakdown from current state.
    pub(crate) fn view(
        &self,
        now: DateTime<Utc>,
        policy: &RoomPolicy,
        settlement: &SettlementPolicy,
    ) -> RoomView {
        let mut participants = self.participants.clone();
        // Leaderboard order: score descending, ties broken by earliest
        // completion, participants who never submitted last.
        participants.sort_by_key(|p| (Reverse(p.score), p.completed_at.is_none(), p.completed_at));

        RoomView {
            id: self.id,
            title: self.title.clone(),
            description: self.description.clone(),
            creator: self.creator.clone(),
            current_participants: self.current_participants(),
            entry_fee: self.entry_fee,
            difficulty: self.difficulty,
            scheduled_start_time: self.scheduled_start_time,
            registration_deadline: self.registration_deadline,
            is_active: self.is_active,
            status: self.status,
            duration_minutes: self.duration_minutes,
            started_at: self.started_at,
            participants,
            prize_distribution: settlement.settle(self.current_participants(), self.entry_fee),
            is_registration_open: self.is_registration_open(now, policy),
        }
    }

    fn all_scores_in(&self) -> bool {
        self.participants.iter().all(|p| p.completed_at.is_some())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn policy() -> RoomPolicy {
        RoomPolicy::default()
    }

    fn request() -> NewRoom {
        NewRoom {
            title: "Friday trivia".into(),
            description: "General knowledge".into(),
            entry_fee: 100,
            difficulty: Difficulty::Medium,
            scheduled_start_time: Utc::now() + Duration::hours(2),
            registration_deadline: Utc::now() + Duration::hours(1),
            duration_minutes: 30,
        }
    }

    /// A Pending room whose deadline is an hour out.
    fn open_room() -> Room {
        Room::new(UserId::from("creator"), request(), Utc::now())
    }

    /// A Pending room already past its scheduled start.
    fn startable_room() -> Room {
        let mut req = request();
        req.registration_deadline = Utc::now() - Duration::hours(2);
        req.scheduled_start_time = Utc::now() - Duration::hours(1);
        Room::new(UserId::from("creator"), req, Utc::now())
    }

    fn in_progress_room(extra_users: &[&str]) -> Room {
        let mut room = startable_room();
        for user in extra_users {
            room.participants.push(Participant::new(UserId::from(*user)));
        }
        room.start(&UserId::from("creator"), Utc::now()).unwrap();
        room
    }

    // ========================================================================
    // Validation
    // ========================================================================

    #[test]
    fn test_validate_rejects_low_entry_fee() {
        let mut req = request();
        req.entry_fee = 99;
        assert!(matches!(
            req.validate(&policy()),
            Err(RoomError::Validation(_))
        ));
    }

    #[test]
    fn test_validate_accepts_exact_minimum_fee() {
        let mut req = request();
        req.entry_fee = 100;
        assert!(req.validate(&policy()).is_ok());
    }

    #[test]
    fn test_validate_rejects_fee_above_maximum() {
        let mut req = request();
        req.entry_fee = u64::MAX;
        assert!(matches!(
            req.validate(&policy()),
            Err(RoomError::Validation(_))
        ));
    }

    #[test]
    fn test_validate_accepts_exact_maximum_fee() {
        let mut req = request();
        req.entry_fee = policy().max_entry_fee;
        assert!(req.validate(&policy()).is_ok());
    }

    #[test]
    fn test_validate_rejects_deadline_equal_to_start() {
        let mut req = request();
        req.registration_deadline = req.scheduled_start_time;
        assert!(matches!(
            req.validate(&policy()),
            Err(RoomError::Validation(_))
        ));
    }

    #[test]
    fn test_validate_rejects_deadline_after_start() {
        let mut req = request();
        req.registration_deadline = req.scheduled_start_time + Duration::minutes(5);
        assert!(matches!(
            req.validate(&policy()),
            Err(RoomError::Validation(_))
        ));
    }

    #[test]
    fn test_validate_rejects_blank_title() {
        let mut req = request();
        req.title = "   ".into();
        assert!(matches!(
            req.validate(&policy()),
            Err(RoomError::Validation(_))
        ));
    }

    #[test]
    fn test_validate_rejects_oversized_title() {
        let mut req = request();
        req.title = "q".repeat(101);
        assert!(matches!(
            req.validate(&policy()),
            Err(RoomError::Validation(_))
        ));
    }

    #[test]
    fn test_past_times_are_allowed_at_creation() {
        // Only the deadline/start ordering is constrained; rooms may be
        // created with both already in the past.
        let mut req = request();
        req.registration_deadline = Utc::now() - Duration::hours(2);
        req.scheduled_start_time = Utc::now() - Duration::hours(1);
        assert!(req.validate(&policy()).is_ok());
    }

    // ========================================================================
    // Creation and registration
    // ========================================================================

    #[test]
    fn test_new_room_starts_pending_with_creator_joined() {
        let room = open_room();
        assert_eq!(room.status, RoomStatus::Pending);
        assert!(room.is_active);
        assert_eq!(room.current_participants(), 1);
        assert!(room.participant(&UserId::from("creator")).is_some());
        assert_eq!(room.started_at, None);
    }

    #[test]
    fn test_join_adds_participant_with_zero_score() {
        let mut room = open_room();
        room.join(UserId::from("alice"), Utc::now(), &policy())
            .unwrap();

        assert_eq!(room.current_participants(), 2);
        let alice = room.participant(&UserId::from("alice")).unwrap();
        assert_eq!(alice.score, 0);
        assert_eq!(alice.completed_at, None);
    }

    #[test]
    fn test_join_twice_reports_already_joined() {
        let mut room = open_room();
        room.join(UserId::from("alice"), Utc::now(), &policy())
            .unwrap();
        let err = room
            .join(UserId::from("alice"), Utc::now(), &policy())
            .unwrap_err();
        assert!(matches!(err, RoomError::AlreadyJoined { .. }));
        assert_eq!(room.current_participants(), 2);
    }

    #[test]
    fn test_join_after_deadline_is_closed() {
        let mut room = open_room();
        let after_deadline = room.registration_deadline + Duration::seconds(1);
        let err = room
            .join(UserId::from("alice"), after_deadline, &policy())
            .unwrap_err();
        assert!(matches!(err, RoomError::RegistrationClosed(_)));
    }

    #[test]
    fn test_repeat_join_after_deadline_reports_closed_not_already_joined() {
        // The window check runs before the uniqueness check.
        let mut room = open_room();
        room.join(UserId::from("alice"), Utc::now(), &policy())
            .unwrap();
        let after_deadline = room.registration_deadline + Duration::seconds(1);
        let err = room
            .join(UserId::from("alice"), after_deadline, &policy())
            .unwrap_err();
        assert!(matches!(err, RoomError::RegistrationClosed(_)));
    }

    #[test]
    fn test_join_at_capacity_is_closed() {
        let mut room = open_room();
        for i in 0..14 {
            room.join(UserId::from(format!("user-{i}")), Utc::now(), &policy())
                .unwrap();
        }
        assert_eq!(room.current_participants(), 15);

        let err = room
            .join(UserId::from("user-15"), Utc::now(), &policy())
            .unwrap_err();
        assert!(matches!(err, RoomError::RegistrationClosed(_)));
        assert_eq!(room.current_participants(), 15);
    }

    #[test]
    fn test_join_inactive_room_is_closed() {
        let mut room = open_room();
        room.close(Utc::now());
        let err = room
            .join(UserId::from("alice"), Utc::now(), &policy())
            .unwrap_err();
        assert!(matches!(err, RoomError::RegistrationClosed(_)));
    }

    // ========================================================================
    // Starting
    // ========================================================================

    #[test]
    fn test_start_by_non_creator_is_not_authorized() {
        let mut room = startable_room();
        let err = room.start(&UserId::from("mallory"), Utc::now()).unwrap_err();
        assert!(matches!(err, RoomError::NotAuthorized { .. }));
        assert_eq!(room.status, RoomStatus::Pending);
    }

    #[test]
    fn test_start_before_schedule_is_too_early() {
        let mut room = open_room();
        let err = room.start(&UserId::from("creator"), Utc::now()).unwrap_err();
        assert!(matches!(err, RoomError::TooEarly { .. }));
        assert_eq!(room.started_at, None);
    }

    #[test]
    fn test_start_transitions_and_stamps_started_at() {
        let mut room = startable_room();
        let now = Utc::now();
        room.start(&UserId::from("creator"), now).unwrap();

        assert_eq!(room.status, RoomStatus::InProgress);
        assert_eq!(room.started_at, Some(now));
    }

    #[test]
    fn test_start_twice_is_invalid_state() {
        let mut room = startable_room();
        let first = Utc::now();
        room.start(&UserId::from("creator"), first).unwrap();
        let err = room.start(&UserId::from("creator"), Utc::now()).unwrap_err();

        assert!(matches!(err, RoomError::InvalidState(_)));
        assert_eq!(room.started_at, Some(first));
    }

    #[test]
    fn test_start_alone_is_allowed() {
        // Deliberately no minimum-participant guard.
        let mut room = startable_room();
        assert!(!room.has_minimum_participants(&policy()));
        assert!(room.start(&UserId::from("creator"), Utc::now()).is_ok());
    }

    #[test]
    fn test_join_after_start_is_closed() {
        let mut room = in_progress_room(&["bob"]);
        let err = room
            .join(UserId::from("carol"), Utc::now(), &policy())
            .unwrap_err();
        assert!(matches!(err, RoomError::RegistrationClosed(_)));
    }

    // ========================================================================
    // Scores and completion
    // ========================================================================

    #[test]
    fn test_submit_before_start_is_invalid_state() {
        let mut room = open_room();
        let err = room
            .submit_score(&UserId::from("creator"), 10, Utc::now())
            .unwrap_err();
        assert!(matches!(err, RoomError::InvalidState(_)));
    }

    #[test]
    fn test_submit_by_outsider_is_not_a_participant() {
        let mut room = in_progress_room(&["bob"]);
        let err = room
            .submit_score(&UserId::from("mallory"), 10, Utc::now())
            .unwrap_err();
        assert!(matches!(err, RoomError::NotAParticipant { .. }));
    }

    #[test]
    fn test_submit_records_score_and_completion_time() {
        let mut room = in_progress_room(&["bob"]);
        let now = Utc::now();
        let recorded = room.submit_score(&UserId::from("bob"), 42, now).unwrap();

        assert_eq!(recorded.score, 42);
        assert_eq!(recorded.completed_at, Some(now));
        // One submission outstanding, so the room stays open.
        assert_eq!(room.status, RoomStatus::InProgress);
    }

    #[test]
    fn test_resubmit_overwrites_while_in_progress() {
        let mut room = in_progress_room(&["bob"]);
        room.submit_score(&UserId::from("bob"), 42, Utc::now())
            .unwrap();
        let later = Utc::now() + Duration::seconds(5);
        let recorded = room.submit_score(&UserId::from("bob"), 77, later).unwrap();

        assert_eq!(recorded.score, 77);
        assert_eq!(recorded.completed_at, Some(later));
    }

    #[test]
    fn test_last_submission_completes_the_room() {
        let mut room = in_progress_room(&["bob"]);
        room.submit_score(&UserId::from("bob"), 42, Utc::now())
            .unwrap();
        room.submit_score(&UserId::from("creator"), 30, Utc::now())
            .unwrap();

        assert_eq!(room.status, RoomStatus::Completed);
        // Auto-completion only moves the status; the room stays active
        // until an administrative close.
        assert!(room.is_active);
    }

    #[test]
    fn test_submit_after_completion_is_invalid_state() {
        let mut room = in_progress_room(&[]);
        room.submit_score(&UserId::from("creator"), 42, Utc::now())
            .unwrap();
        assert_eq!(room.status, RoomStatus::Completed);

        let err = room
            .submit_score(&UserId::from("creator"), 99, Utc::now())
            .unwrap_err();
        assert!(matches!(err, RoomError::InvalidState(_)));
    }

    // ========================================================================
    // Closing
    // ========================================================================

    #[test]
    fn test_close_deactivates_and_completes() {
        let mut room = open_room();
        room.close(Utc::now());
        assert!(!room.is_active);
        assert_eq!(room.status, RoomStatus::Completed);
    }

    #[test]
    fn test_close_is_idempotent() {
        let mut room = in_progress_room(&["bob"]);
        room.close(Utc::now());
        room.close(Utc::now());
        assert!(!room.is_active);
        assert_eq!(room.status, RoomStatus::Completed);
    }

    // ========================================================================
    // Updates
    // ========================================================================

    #[test]
    fn test_update_by_non_creator_is_not_authorized() {
        let mut room = open_room();
        let update = RoomUpdate {
            title: Some("Someone else's title".into()),
            ..RoomUpdate::default()
        };
        let err = room
            .apply_update(&UserId::from("mallory"), update, Utc::now(), &policy())
            .unwrap_err();
        assert!(matches!(err, RoomError::NotAuthorized { .. }));
        assert_eq!(room.title, "Friday trivia");
    }

    #[test]
    fn test_update_after_start_is_invalid_state() {
        let mut room = in_progress_room(&["bob"]);
        let update = RoomUpdate {
            entry_fee: Some(500),
            ..RoomUpdate::default()
        };
        let err = room
            .apply_update(&UserId::from("creator"), update, Utc::now(), &policy())
            .unwrap_err();
        assert!(matches!(err, RoomError::InvalidState(_)));
    }

    #[test]
    fn test_update_merges_and_revalidates() {
        let mut room = open_room();
        let update = RoomUpdate {
            entry_fee: Some(99),
            ..RoomUpdate::default()
        };
        let err = room
            .apply_update(&UserId::from("creator"), update, Utc::now(), &policy())
            .unwrap_err();
        assert!(matches!(err, RoomError::Validation(_)));
        assert_eq!(room.entry_fee, 100);
    }

    #[test]
    fn test_update_rejects_deadline_moved_past_start() {
        let mut room = open_room();
        let update = RoomUpdate {
            registration_deadline: Some(room.scheduled_start_time),
            ..RoomUpdate::default()
        };
        let err = room
            .apply_update(&UserId::from("creator"), update, Utc::now(), &policy())
            .unwrap_err();
        assert!(matches!(err, RoomError::Validation(_)));
    }

    #[test]
    fn test_update_applies_set_fields_only() {
        let mut room = open_room();
        let update = RoomUpdate {
            title: Some("Rematch".into()),
            entry_fee: Some(250),
            ..RoomUpdate::default()
        };
        room.apply_update(&UserId::from("creator"), update, Utc::now(), &policy())
            .unwrap();

        assert_eq!(room.title, "Rematch");
        assert_eq!(room.entry_fee, 250);
        assert_eq!(room.description, "General knowledge");
        assert_eq!(room.duration_minutes, 30);
    }

    #[test]
    fn test_empty_update_is_a_no_op() {
        let mut room = open_room();
        let before = room.updated_at;
        room.apply_update(
            &UserId::from("creator"),
            RoomUpdate::default(),
            Utc::now() + Duration::seconds(30),
            &policy(),
        )
        .unwrap();
        assert_eq!(room.updated_at, before);
    }

    // ========================================================================
    // Views
    // ========================================================================

    #[test]
    fn test_view_orders_participants_by_score_then_completion() {
        let mut room = in_progress_room(&["bob", "carol", "dave"]);
        let base = Utc::now();
        room.submit_score(&UserId::from("carol"), 50, base).unwrap();
        room.submit_score(&UserId::from("bob"), 80, base + Duration::seconds(10))
            .unwrap();
        // Same score as carol but submitted later.
        room.submit_score(&UserId::from("dave"), 50, base + Duration::seconds(20))
            .unwrap();

        let view = room.view(Utc::now(), &policy(), &SettlementPolicy::default());
        let order: Vec<&str> = view
            .participants
            .iter()
            .map(|p| p.user.as_str())
            .collect();
        // creator never submitted, so they sort last.
        assert_eq!(order, vec!["bob", "carol", "dave", "creator"]);
    }

    #[test]
    fn test_view_derives_settlement_from_current_count() {
        let mut room = open_room();
        for user in ["bob", "carol", "dave", "erin"] {
            room.join(UserId::from(user), Utc::now(), &policy()).unwrap();
        }

        let view = room.view(Utc::now(), &policy(), &SettlementPolicy::default());
        assert_eq!(view.current_participants, 5);
        assert_eq!(view.prize_distribution.total_pool, 500);
        assert_eq!(view.prize_distribution.platform_fee, 150);
        assert_eq!(view.prize_distribution.prize_pool, 350);
        assert_eq!(view.prize_distribution.prizes.len(), 1);
    }

    #[test]
    fn test_view_registration_flag_tracks_the_window() {
        let room = open_room();
        let open = room.view(Utc::now(), &policy(), &SettlementPolicy::default());
        assert!(open.is_registration_open);

        let after = room.registration_deadline + Duration::seconds(1);
        let closed = room.view(after, &policy(), &SettlementPolicy::default());
        assert!(!closed.is_registration_open);
    }
}
