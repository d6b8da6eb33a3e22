//! Room lifecycle management for Quizpot.
//!
//! Each room runs as an isolated Tokio task (actor model) owning the
//! room's state: its participants, its status, its schedule. Commands
//! reach a room through its [`RoomHandle`] and are applied one at a
//! time, which gives every room the per-room atomicity the lifecycle
//! rules require without any shared locks.
//!
//! # Key types
//!
//! - [`RoomsManager`] — creates rooms and routes operations to them
//! - [`RoomHandle`] — sends commands to one running room actor
//! - [`RoomView`] — the external representation, with derived
//!   registration and settlement data
//! - [`RoomPolicy`] — capacity and pricing limits
//! - [`NewRoom`] / [`RoomUpdate`] — creation and edit requests

mod config;
mod error;
mod manager;
mod model;
mod room;
mod view;

pub use config::RoomPolicy;
pub use error::RoomError;
pub use manager::RoomsManager;
pub use model::{NewRoom, Participant, RoomUpdate};
pub use room::RoomHandle;
pub use view::RoomView;
