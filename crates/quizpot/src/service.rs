//! `RoomService`: identity resolution in front of the room layer.
//!
//! This is the piece an embedding transport talks to. Each
//! state-changing call carries the caller's raw auth token; the service
//! resolves it through the configured [`IdentityProvider`] once per
//! request and hands the resulting [`UserId`] to the room layer, which
//! trusts it completely.

use quizpot_identity::IdentityProvider;
use quizpot_rooms::{NewRoom, Participant, RoomHandle, RoomUpdate, RoomView, RoomsManager};
use quizpot_types::{RoomId, RoomStatus, UserId};
use tokio::sync::Mutex;

use crate::QuizpotError;

/// The full room lifecycle behind a single async API.
///
/// The room registry sits behind a `Mutex`, but it is only held to
/// create a room or to look up a handle; per-room operations run on
/// the room's own actor with the registry lock released, so traffic to
/// different rooms never serializes. Share the service across tasks by
/// wrapping it in an `Arc`.
pub struct RoomService<P: IdentityProvider> {
    provider: P,
    rooms: Mutex<RoomsManager>,
}

impl<P: IdentityProvider> RoomService<P> {
    /// Creates a service with default room and settlement policies.
    pub fn new(provider: P) -> Self {
        Self::with_manager(provider, RoomsManager::new())
    }

    /// Creates a service around a preconfigured manager, for custom
    /// policies.
    pub fn with_manager(provider: P, rooms: RoomsManager) -> Self {
        Self {
            provider,
            rooms: Mutex::new(rooms),
        }
    }

    /// Lists rooms, newest scheduled start first, optionally filtered
    /// by status. Listing is public: no token required.
    ///
    /// The registry lock is released before any room is queried.
    pub async fn list_rooms(&self, status: Option<RoomStatus>) -> Vec<RoomView> {
        let handles = self.rooms.lock().await.room_handles();
        RoomsManager::collect_views(handles, status).await
    }

    /// Reads one room. Public, like listing.
    pub async fn get_room(&self, room_id: RoomId) -> Result<RoomView, QuizpotError> {
        let handle = self.room_handle(room_id).await?;
        Ok(handle.snapshot().await?)
    }

    /// Creates a room on behalf of the token's user, who joins it as
    /// its first participant.
    pub async fn create_room(
        &self,
        token: &str,
        request: NewRoom,
    ) -> Result<RoomView, QuizpotError> {
        let creator = self.resolve(token).await?;
        let mut rooms = self.rooms.lock().await;
        Ok(rooms.create_room(creator, request)?)
    }

    /// Registers the token's user as a participant.
    pub async fn join_room(&self, token: &str, room_id: RoomId) -> Result<RoomView, QuizpotError> {
        let user = self.resolve(token).await?;
        let handle = self.room_handle(room_id).await?;
        Ok(handle.join(user).await?)
    }

    /// Starts the game. Only the room's creator may do this.
    pub async fn start_game(&self, token: &str, room_id: RoomId) -> Result<RoomView, QuizpotError> {
        let user = self.resolve(token).await?;
        let handle = self.room_handle(room_id).await?;
        Ok(handle.start(user).await?)
    }

    /// Records the token's user's score in the room.
    pub async fn submit_score(
        &self,
        token: &str,
        room_id: RoomId,
        score: i64,
    ) -> Result<Participant, QuizpotError> {
        let user = self.resolve(token).await?;
        let handle = self.room_handle(room_id).await?;
        Ok(handle.submit_score(user, score).await?)
    }

    /// Edits a room that has not started. Only the creator may do this.
    pub async fn update_room(
        &self,
        token: &str,
        room_id: RoomId,
        update: RoomUpdate,
    ) -> Result<RoomView, QuizpotError> {
        let user = self.resolve(token).await?;
        let handle = self.room_handle(room_id).await?;
        Ok(handle.update(user, update).await?)
    }

    /// Administrative close. The surrounding layer decides who may call
    /// this, so it takes no token.
    pub async fn close_room(&self, room_id: RoomId) -> Result<RoomView, QuizpotError> {
        let handle = self.room_handle(room_id).await?;
        Ok(handle.close().await?)
    }

    // Logs here, not in the providers: the service is the only layer
    // that sees raw tokens, and the token itself is never logged.
    async fn resolve(&self, token: &str) -> Result<UserId, QuizpotError> {
        match self.provider.resolve(token).await {
            Ok(user) => Ok(user),
            Err(err) => {
                tracing::debug!(%err, "token resolution failed");
                Err(err.into())
            }
        }
    }

    /// Clones the room's handle, holding the registry lock only for the
    /// lookup.
    async fn room_handle(&self, room_id: RoomId) -> Result<RoomHandle, QuizpotError> {
        let rooms = self.rooms.lock().await;
        Ok(rooms.room(room_id)?)
    }
}
