//! per-participant ledger entry

use crate::types::{Balance, BlockNumber, PrecisionState};
use serde::{Deserialize, Serialize};

/// bookkeeping record for one participant
///
/// `release_block` and `last_reward_block` are only meaningful while
/// `locked_value > 0`; a fresh lock resets both.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ParticipantEntry {
    /// total tokens held in custody for this participant
    pub total_value: Balance,
    /// amount currently under lock, never above `total_value`
    pub locked_value: Balance,
    /// block at which the current lock fully unwinds
    pub release_block: BlockNumber,
    /// block through which reward has already been minted
    pub last_reward_block: BlockNumber,
    /// fractional-precision carry from the reward curve
    pub precision_state: PrecisionState,
}

impl ParticipantEntry {
    /// locked amount as observed at block `at`
    ///
    /// An expired lock (`release_block <= at`) contributes nothing.
    pub fn locked_at(&self, at: BlockNumber) -> Balance {
        if self.locked_value == 0 || self.release_block <= at {
            0
        } else {
            self.locked_value
        }
    }

    /// withdrawable amount as observed at block `at`
    ///
    /// `locked_value` can exceed `total_value` while stale (lock expired,
    /// balance withdrawn), so the subtraction saturates.
    pub fn unlocked_at(&self, at: BlockNumber) -> Balance {
        self.total_value.saturating_sub(self.locked_at(at))
    }
}
