//! Prize-pool settlement for Quizpot rooms.
//!
//! Pure integer arithmetic over a participant count and an entry fee:
//! no clocks, no I/O, no state. The lifecycle layer calls
//! [`SettlementPolicy::settle`] on every room read, so the breakdown is
//! always derived from current data and never persisted.
//!
//! # Money model
//!
//! Amounts are plain `u64` currency units. Every division floors, and
//! flooring happens twice (once for the platform fee, once per prize),
//! so the awarded prizes generally sum to slightly *less* than the
//! prize pool. That truncation remainder is deliberately left with the
//! platform — see [`Settlement::remainder`].
//!
//! Intermediate arithmetic runs in `u128` and outputs saturate at
//! `u64::MAX`, so [`SettlementPolicy::settle`] is total over its whole
//! input domain and `platform_fee + prize_pool == total_pool` holds for
//! any inputs. Callers that cap entry fees (as the room policy does)
//! never observe saturation.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Policy
// ---------------------------------------------------------------------------

/// Platform cut applied before any prize is computed, in percent.
pub const DEFAULT_PLATFORM_FEE_PERCENT: u64 = 30;

/// One payout tier: an inclusive participant-count ceiling plus the
/// percentage split across the leading positions.
///
/// `splits[0]` is 1st place, `splits[1]` 2nd, and so on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayoutTier {
    /// Largest participant count this tier covers (inclusive).
    pub max_participants: u32,
    /// Percentage of the prize pool per position, best first.
    pub splits: Vec<u8>,
}

impl PayoutTier {
    /// Convenience constructor for literal tier tables.
    pub fn new(max_participants: u32, splits: &[u8]) -> Self {
        Self {
            max_participants,
            splits: splits.to_vec(),
        }
    }
}

/// The settlement rules for a room: platform fee plus a tier table
/// ordered by participant-count ceiling.
///
/// [`Default`] is the shipped production policy: 30% platform fee, and
///
/// | participants | split |
/// |---|---|
/// | 1–5  | winner takes all |
/// | 6–10 | 70 / 30 |
/// | 11–15 | 50 / 30 / 20 |
///
/// A count above the largest ceiling falls back to the largest tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementPolicy {
    /// Percentage of the total pool kept by the platform.
    pub platform_fee_percent: u64,
    /// Payout tiers, ascending by `max_participants`.
    pub tiers: Vec<PayoutTier>,
}

impl Default for SettlementPolicy {
    fn default() -> Self {
        Self {
            platform_fee_percent: DEFAULT_PLATFORM_FEE_PERCENT,
            tiers: vec![
                PayoutTier::new(5, &[100]),
                PayoutTier::new(10, &[70, 30]),
                PayoutTier::new(15, &[50, 30, 20]),
            ],
        }
    }
}

impl SettlementPolicy {
    /// Clamp and reorder any out-of-range values so the policy is safe
    /// to use: the fee percent is capped at 100, each tier's splits are
    /// capped so they sum to at most 100, and tiers are sorted by
    /// ceiling. `Default` is already in this form.
    pub fn validated(mut self) -> Self {
        if self.platform_fee_percent > 100 {
            self.platform_fee_percent = 100;
        }
        for tier in &mut self.tiers {
            let mut budget: u8 = 100;
            for split in &mut tier.splits {
                if *split > budget {
                    *split = budget;
                }
                budget -= *split;
            }
        }
        self.tiers
            .sort_by_key(|tier| tier.max_participants);
        self
    }

    /// Computes the full settlement breakdown for a room.
    ///
    /// 1. `total_pool = participant_count × entry_fee`
    /// 2. `platform_fee = ⌊total_pool × fee% / 100⌋`
    /// 3. `prize_pool = total_pool − platform_fee`
    /// 4. pick the smallest tier whose ceiling covers the count
    ///    (largest tier if none does)
    /// 5. each position gets `⌊prize_pool × split / 100⌋`
    ///
    /// Intermediates are `u128`, so no input overflows; amounts that
    /// cannot fit a `u64` saturate at `u64::MAX`. The fee percent is
    /// capped at 100 here as well, so `platform_fee + prize_pool ==
    /// total_pool` holds exactly even in the saturating regime.
    pub fn settle(&self, participant_count: u32, entry_fee: u64) -> Settlement {
        let fee_percent = u128::from(self.platform_fee_percent.min(100));
        let total = u128::from(participant_count) * u128::from(entry_fee);
        let fee = total * fee_percent / 100;

        let total_pool = saturate(total);
        let platform_fee = saturate(fee);
        // fee ≤ total and saturation is monotonic, so this cannot
        // underflow and the partition identity stays exact.
        let prize_pool = total_pool - platform_fee;

        let prizes = match self.tier_for(participant_count) {
            Some(tier) => tier
                .splits
                .iter()
                .enumerate()
                .map(|(index, split)| Prize {
                    position: index as u32 + 1,
                    amount: saturate(u128::from(prize_pool) * u128::from(*split) / 100),
                })
                .collect(),
            None => Vec::new(),
        };

        Settlement {
            total_pool,
            platform_fee,
            prize_pool,
            prizes,
        }
    }

    /// The tier covering `participant_count`: smallest ceiling that is
    /// ≥ the count, falling back to the largest tier for oversized
    /// counts. `None` only for an empty tier table.
    fn tier_for(&self, participant_count: u32) -> Option<&PayoutTier> {
        self.tiers
            .iter()
            .find(|tier| participant_count <= tier.max_participants)
            .or_else(|| self.tiers.last())
    }
}

fn saturate(amount: u128) -> u64 {
    u64::try_from(amount).unwrap_or(u64::MAX)
}

// ---------------------------------------------------------------------------
// Settlement
// ---------------------------------------------------------------------------

/// A single position's payout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prize {
    /// Finishing position, 1-based (1 = winner).
    pub position: u32,
    /// Amount awarded, in the same currency unit as the entry fee.
    pub amount: u64,
}

/// The full prize breakdown for a room at a given participant count.
///
/// `platform_fee + prize_pool == total_pool` always holds exactly. The
/// per-position prizes floor independently, so their sum may fall short
/// of `prize_pool`; the shortfall stays with the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    /// Everyone's entry fees combined.
    pub total_pool: u64,
    /// The platform's cut of the total pool.
    pub platform_fee: u64,
    /// What remains for the participants.
    pub prize_pool: u64,
    /// Per-position payouts, best position first.
    pub prizes: Vec<Prize>,
}

impl Settlement {
    /// Computes a settlement under the default production policy.
    pub fn compute(participant_count: u32, entry_fee: u64) -> Self {
        SettlementPolicy::default().settle(participant_count, entry_fee)
    }

    /// Sum of all awarded prizes, saturating at `u64::MAX`.
    pub fn distributed(&self) -> u64 {
        self.prizes
            .iter()
            .fold(0, |sum, prize| sum.saturating_add(prize.amount))
    }

    /// Truncation loss: the slice of the prize pool that flooring left
    /// unawarded. Retained by the platform on top of the platform fee.
    /// Zero when a policy that skipped [`SettlementPolicy::validated`]
    /// awards more than the pool.
    pub fn remainder(&self) -> u64 {
        self.prize_pool.saturating_sub(self.distributed())
    }
}
