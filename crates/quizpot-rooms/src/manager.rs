//! Rooms manager: creates rooms and routes operations to their actors.

use std::cmp::Reverse;
use std::collections::HashMap;

use chrono::Utc;

use quizpot_settlement::SettlementPolicy;
use quizpot_types::{RoomId, RoomStatus, UserId};

use crate::model::Room;
use crate::room::spawn_room;
use crate::view::RoomView;
use crate::{NewRoom, Participant, RoomError, RoomHandle, RoomPolicy, RoomUpdate};

/// Default command channel size for room actors.
const DEFAULT_CHANNEL_SIZE: usize = 64;

/// Tracks every room and hands operations to the owning actor.
///
/// Creation is the only operation that needs `&mut self`; everything
/// else goes through a cloned [`RoomHandle`], so an embedder can keep
/// the manager behind a lock without serializing room traffic through
/// it. Completed rooms keep their actor and stay listed — rooms are
/// never deleted.
pub struct RoomsManager {
    policy: RoomPolicy,
    settlement: SettlementPolicy,
    rooms: HashMap<RoomId, RoomHandle>,
}

impl RoomsManager {
    /// Creates a manager with the default room and settlement policies.
    pub fn new() -> Self {
        Self::with_policies(RoomPolicy::default(), SettlementPolicy::default())
    }

    /// Creates a manager with custom policies. The settlement policy is
    /// normalized before use.
    pub fn with_policies(policy: RoomPolicy, settlement: SettlementPolicy) -> Self {
        Self {
            policy,
            settlement: settlement.validated(),
            rooms: HashMap::new(),
        }
    }

    /// Validates the request, spawns the room's actor, and returns the
    /// created room with the creator already joined.
    pub fn create_room(&mut self, creator: UserId, request: NewRoom) -> Result<RoomView, RoomError> {
        request.validate(&self.policy)?;

        let now = Utc::now();
        let room = Room::new(creator, request, now);
        let view = room.view(now, &self.policy, &self.settlement);
        let handle = spawn_room(
            room,
            self.policy.clone(),
            self.settlement.clone(),
            DEFAULT_CHANNEL_SIZE,
        );
        self.rooms.insert(handle.room_id(), handle);

        tracing::info!(room_id = %view.id, creator = %view.creator, "room created");
        Ok(view)
    }

    /// Returns a cloned handle for a room.
    ///
    /// Callers that do several operations, or that must not hold a lock
    /// on the manager across awaits, work through the handle directly.
    pub fn room(&self, room_id: RoomId) -> Result<RoomHandle, RoomError> {
        self.rooms
            .get(&room_id)
            .cloned()
            .ok_or(RoomError::NotFound(room_id))
    }

    /// Reads one room's current state.
    pub async fn get_room(&self, room_id: RoomId) -> Result<RoomView, RoomError> {
        self.room(room_id)?.snapshot().await
    }

    /// Registers `user` as a participant of the room.
    pub async fn join_room(&self, room_id: RoomId, user: UserId) -> Result<RoomView, RoomError> {
        self.room(room_id)?.join(user).await
    }

    /// Starts the game on behalf of `user`.
    pub async fn start_game(&self, room_id: RoomId, user: UserId) -> Result<RoomView, RoomError> {
        self.room(room_id)?.start(user).await
    }

    /// Records `user`'s score in the room.
    pub async fn submit_score(
        &self,
        room_id: RoomId,
        user: UserId,
        score: i64,
    ) -> Result<Participant, RoomError> {
        self.room(room_id)?.submit_score(user, score).await
    }

    /// Applies a partial edit on behalf of `user`.
    pub async fn update_room(
        &self,
        room_id: RoomId,
        user: UserId,
        update: RoomUpdate,
    ) -> Result<RoomView, RoomError> {
        self.room(room_id)?.update(user, update).await
    }

    /// Force-closes a room. Administrative, so no caller identity.
    pub async fn close_room(&self, room_id: RoomId) -> Result<RoomView, RoomError> {
        self.room(room_id)?.close().await
    }

    /// Returns cloned handles to every room.
    ///
    /// Useful when a caller keeps the manager behind a lock and needs
    /// to release it before awaiting on the rooms themselves.
    pub fn room_handles(&self) -> Vec<RoomHandle> {
        self.rooms.values().cloned().collect()
    }

    /// Lists rooms, newest scheduled start first, optionally filtered
    /// by status.
    ///
    /// Rooms whose actor fails to answer are skipped rather than
    /// failing the whole listing.
    pub async fn list_rooms(&self, status: Option<RoomStatus>) -> Vec<RoomView> {
        Self::collect_views(self.room_handles(), status).await
    }

    /// Snapshots `handles` and returns the views that answered,
    /// filtered by `status` and sorted newest scheduled start first.
    ///
    /// Associated rather than a method so callers can pair it with
    /// [`RoomsManager::room_handles`] after dropping their lock.
    pub async fn collect_views(
        handles: Vec<RoomHandle>,
        status: Option<RoomStatus>,
    ) -> Vec<RoomView> {
        let mut views = Vec::with_capacity(handles.len());
        for handle in handles {
            if let Ok(view) = handle.snapshot().await {
                if status.is_none_or(|wanted| view.status == wanted) {
                    views.push(view);
                }
            }
        }
        views.sort_by_key(|view| Reverse(view.scheduled_start_time));
        views
    }

    /// Number of rooms ever created (completed rooms included).
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}

impl Default for RoomsManager {
    fn default() -> Self {
        Self::new()
    }
}
