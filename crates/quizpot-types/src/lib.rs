//! Shared vocabulary for Quizpot.
//!
//! This crate defines the types every other layer speaks:
//!
//! - **Identifiers** ([`RoomId`], [`ParticipantId`], [`UserId`]) —
//!   newtypes so a room id can never be passed where a user id is
//!   expected.
//! - **Status enums** ([`RoomStatus`], [`Difficulty`]) — including the
//!   room lifecycle state machine and its transition rules.
//!
//! It deliberately knows nothing about rooms, settlement, or identity
//! resolution — those layers all depend on this one, never the other
//! way around.

mod ids;
mod status;

pub use ids::{ParticipantId, RoomId, UserId};
pub use status::{Difficulty, RoomStatus};
