//! Room actor: an isolated Tokio task that owns one room.
//!
//! Every mutation of a room flows through its actor's channel and is
//! applied one command at a time. That serialization is the whole
//! concurrency story: capacity checks, the (room, user) uniqueness
//! rule, and the last-submitter completion scan cannot race because no
//! two commands for the same room ever overlap.

use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, oneshot};

use quizpot_settlement::SettlementPolicy;
use quizpot_types::{RoomId, UserId};

use crate::model::Room;
use crate::view::RoomView;
use crate::{Participant, RoomError, RoomPolicy, RoomUpdate};

/// Commands sent to a room actor through its channel.
///
/// The `oneshot::Sender` in each variant is the reply channel: the
/// caller sends a command and awaits the outcome on it.
pub(crate) enum RoomCommand {
    /// Register a user as a participant.
    Join {
        user: UserId,
        reply: oneshot::Sender<Result<RoomView, RoomError>>,
    },

    /// Creator-only transition to `InProgress`.
    Start {
        user: UserId,
        reply: oneshot::Sender<Result<RoomView, RoomError>>,
    },

    /// Record a participant's score.
    SubmitScore {
        user: UserId,
        score: i64,
        reply: oneshot::Sender<Result<Participant, RoomError>>,
    },

    /// Creator-only partial edit of a Pending room.
    Update {
        user: UserId,
        update: RoomUpdate,
        reply: oneshot::Sender<Result<RoomView, RoomError>>,
    },

    /// Administrative close. Always succeeds.
    Close { reply: oneshot::Sender<RoomView> },

    /// Read the current state.
    Snapshot { reply: oneshot::Sender<RoomView> },
}

/// Handle to a running room actor.
///
/// Cheap to clone — it's just an `mpsc::Sender` wrapper. The
/// [`RoomsManager`](crate::RoomsManager) holds one per room and hands
/// out clones so callers can operate on rooms without any shared lock.
#[derive(Clone)]
pub struct RoomHandle {
    room_id: RoomId,
    sender: mpsc::Sender<RoomCommand>,
}

impl RoomHandle {
    /// Returns the room's unique id.
    pub fn room_id(&self) -> RoomId {
        self.room_id
    }

    /// Registers `user` as a participant.
    pub async fn join(&self, user: UserId) -> Result<RoomView, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Join {
                user,
                reply: reply_tx,
            })
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id))?;
        reply_rx
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id))?
    }

    /// Starts the game on behalf of `user`.
    pub async fn start(&self, user: UserId) -> Result<RoomView, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Start {
                user,
                reply: reply_tx,
            })
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id))?;
        reply_rx
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id))?
    }

    /// Records `user`'s score.
    pub async fn submit_score(&self, user: UserId, score: i64) -> Result<Participant, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::SubmitScore {
                user,
                score,
                reply: reply_tx,
            })
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id))?;
        reply_rx
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id))?
    }

    /// Applies a partial edit on behalf of `user`.
    pub async fn update(&self, user: UserId, update: RoomUpdate) -> Result<RoomView, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Update {
                user,
                update,
                reply: reply_tx,
            })
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id))?;
        reply_rx
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id))?
    }

    /// Force-closes the room.
    pub async fn close(&self) -> Result<RoomView, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Close { reply: reply_tx })
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id))?;
        reply_rx
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id))
    }

    /// Reads the room's current state.
    pub async fn snapshot(&self) -> Result<RoomView, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Snapshot { reply: reply_tx })
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id))?;
        reply_rx
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id))
    }
}

/// The internal room actor state. Runs inside a Tokio task.
struct RoomActor {
    room: Room,
    policy: RoomPolicy,
    settlement: SettlementPolicy,
    receiver: mpsc::Receiver<RoomCommand>,
}

impl RoomActor {
    /// Runs the actor loop until every handle is dropped.
    ///
    /// Rooms are never deleted, so there is no shutdown command; the
    /// loop ends when the manager (and all cloned handles) go away.
    async fn run(mut self) {
        tracing::info!(room_id = %self.room.id, "room actor started");

        while let Some(cmd) = self.receiver.recv().await {
            match cmd {
                RoomCommand::Join { user, reply } => {
                    let _ = reply.send(self.handle_join(user));
                }
                RoomCommand::Start { user, reply } => {
                    let _ = reply.send(self.handle_start(user));
                }
                RoomCommand::SubmitScore { user, score, reply } => {
                    let _ = reply.send(self.handle_submit(user, score));
                }
                RoomCommand::Update {
                    user,
                    update,
                    reply,
                } => {
                    let _ = reply.send(self.handle_update(user, update));
                }
                RoomCommand::Close { reply } => {
                    let _ = reply.send(self.handle_close());
                }
                RoomCommand::Snapshot { reply } => {
                    let _ = reply.send(self.view(Utc::now()));
                }
            }
        }

        tracing::info!(room_id = %self.room.id, "room actor stopped");
    }

    fn handle_join(&mut self, user: UserId) -> Result<RoomView, RoomError> {
        let now = Utc::now();
        match self.room.join(user.clone(), now, &self.policy) {
            Ok(()) => {
                tracing::info!(
                    room_id = %self.room.id,
                    %user,
                    participants = self.room.current_participants(),
                    "participant joined"
                );
                Ok(self.view(now))
            }
            Err(err) => {
                tracing::debug!(room_id = %self.room.id, %user, %err, "join rejected");
                Err(err)
            }
        }
    }

    fn handle_start(&mut self, user: UserId) -> Result<RoomView, RoomError> {
        let now = Utc::now();
        match self.room.start(&user, now) {
            Ok(()) => {
                if !self.room.has_minimum_participants(&self.policy) {
                    tracing::warn!(
                        room_id = %self.room.id,
                        participants = self.room.current_participants(),
                        "game started below the minimum participant count"
                    );
                }
                tracing::info!(room_id = %self.room.id, %user, "game started");
                Ok(self.view(now))
            }
            Err(err) => {
                tracing::debug!(room_id = %self.room.id, %user, %err, "start rejected");
                Err(err)
            }
        }
    }

    fn handle_submit(&mut self, user: UserId, score: i64) -> Result<Participant, RoomError> {
        let now = Utc::now();
        match self.room.submit_score(&user, score, now) {
            Ok(participant) => {
                tracing::info!(
                    room_id = %self.room.id,
                    %user,
                    score,
                    "score submitted"
                );
                if self.room.status.is_completed() {
                    tracing::info!(room_id = %self.room.id, "all scores in, room completed");
                }
                Ok(participant)
            }
            Err(err) => {
                tracing::debug!(room_id = %self.room.id, %user, %err, "score rejected");
                Err(err)
            }
        }
    }

    fn handle_update(&mut self, user: UserId, update: RoomUpdate) -> Result<RoomView, RoomError> {
        let now = Utc::now();
        match self.room.apply_update(&user, update, now, &self.policy) {
            Ok(()) => {
                tracing::info!(room_id = %self.room.id, %user, "room updated");
                Ok(self.view(now))
            }
            Err(err) => {
                tracing::debug!(room_id = %self.room.id, %user, %err, "update rejected");
                Err(err)
            }
        }
    }

    fn handle_close(&mut self) -> RoomView {
        let now = Utc::now();
        if self.room.status.is_completed() {
            tracing::debug!(room_id = %self.room.id, "close on an already completed room");
        } else {
            tracing::info!(room_id = %self.room.id, "room closed");
        }
        self.room.close(now);
        self.view(now)
    }

    fn view(&self, now: DateTime<Utc>) -> RoomView {
        self.room.view(now, &self.policy, &self.settlement)
    }
}

/// Spawns a room actor task and returns the handle to reach it.
///
/// `channel_size` bounds the command queue; when it fills, senders wait.
pub(crate) fn spawn_room(
    room: Room,
    policy: RoomPolicy,
    settlement: SettlementPolicy,
    channel_size: usize,
) -> RoomHandle {
    let room_id = room.id;
    let (tx, rx) = mpsc::channel(channel_size);

    let actor = RoomActor {
        room,
        policy,
        settlement,
        receiver: rx,
    };

    tokio::spawn(actor.run());

    RoomHandle {
        room_id,
        sender: tx,
    }
}
