//! # Quizpot
//!
//! Timed, fee-based competitive quiz rooms with prize-pool settlement.
//!
//! A room is created with an entry fee and a schedule, collects
//! participants until its registration deadline, runs once its creator
//! starts it, and completes when every participant has submitted a
//! score. Reading a room always includes the prize breakdown computed
//! from the current participant count, so payouts can never go stale.
//!
//! This meta-crate ties the layers together and re-exports them:
//!
//! - [`RoomService`] — token-authenticated entry point for embedders
//! - [`quizpot_rooms`] — room actors, lifecycle rules, views
//! - [`quizpot_settlement`] — pure prize-pool arithmetic
//! - [`quizpot_identity`] — the token → user resolution seam
//! - [`quizpot_types`] — ids, statuses, difficulty levels
//!
//! ## Quick start
//!
//! ```rust
//! use quizpot::prelude::*;
//!
//! # async fn demo() -> Result<(), QuizpotError> {
//! let service = RoomService::new(Passthrough);
//!
//! let room = service
//!     .create_room(
//!         "alice",
//!         NewRoom {
//!             title: "Friday trivia".into(),
//!             description: String::new(),
//!             entry_fee: 100,
//!             difficulty: Difficulty::Medium,
//!             scheduled_start_time: chrono::Utc::now() + chrono::Duration::hours(2),
//!             registration_deadline: chrono::Utc::now() + chrono::Duration::hours(1),
//!             duration_minutes: 30,
//!         },
//!     )
//!     .await?;
//!
//! service.join_room("bob", room.id).await?;
//! # Ok(())
//! # }
//! ```

mod error;
mod service;

pub use error::QuizpotError;
pub use service::RoomService;

pub use quizpot_identity::{IdentityError, IdentityProvider, Passthrough, TokenMap};
pub use quizpot_rooms::{
    NewRoom, Participant, RoomError, RoomHandle, RoomPolicy, RoomUpdate, RoomView, RoomsManager,
};
pub use quizpot_settlement::{PayoutTier, Prize, Settlement, SettlementPolicy};
pub use quizpot_types::{Difficulty, ParticipantId, RoomId, RoomStatus, UserId};

/// Single-import convenience for embedders.
pub mod prelude {
    pub use crate::{
        Difficulty, IdentityProvider, NewRoom, Passthrough, QuizpotError, RoomError, RoomId,
        RoomService, RoomStatus, RoomUpdate, RoomView, Settlement, SettlementPolicy, TokenMap,
        UserId,
    };
}
