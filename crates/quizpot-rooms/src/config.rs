//! Room policy configuration.

use serde::{Deserialize, Serialize};

/// Capacity and pricing limits applied to every room.
///
/// One policy is set on the [`RoomsManager`](crate::RoomsManager) at
/// construction and shared by all rooms it creates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomPolicy {
    /// Hard cap on participants per room. Registration closes when the
    /// count reaches it.
    pub max_participants: u32,

    /// Fewest participants that make a real game. Not enforced when
    /// starting, but starts below it are logged.
    pub min_participants: u32,

    /// Smallest entry fee a room may charge, in currency units.
    pub min_entry_fee: u64,

    /// Largest entry fee a room may charge, in currency units. Keeps
    /// pool arithmetic far below `u64` saturation even at capacity.
    pub max_entry_fee: u64,

    /// Longest allowed room title, in characters.
    pub max_title_chars: usize,
}

impl Default for RoomPolicy {
    fn default() -> Self {
        Self {
            max_participants: 15,
            min_participants: 2,
            min_entry_fee: 100,
            max_entry_fee: 2_147_483_647,
            max_title_chars: 100,
        }
    }
}
