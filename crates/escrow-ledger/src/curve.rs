//! reward curve boundary
//!
//! The economic curve is external to the ledger: the ledger only threads the
//! opaque precision carry through successive calls and consults the
//! emptiness predicate before accepting a lock.

use crate::types::{Balance, BlockNumber, ParticipantId, PrecisionState};
use serde::{Deserialize, Serialize};

/// reward computation consumed by `mint_reward` and the lock guards
pub trait RewardCurve {
    /// minted amount for `locked` tokens held over `elapsed` blocks, given
    /// the carry from the previous mint; returns the updated carry
    fn compute_reward(
        &self,
        participant: &ParticipantId,
        locked: Balance,
        elapsed: BlockNumber,
        precision: PrecisionState,
    ) -> (Balance, PrecisionState);

    /// whether a proposed (value, blocks) lock would never mint anything
    fn is_reward_empty(&self, value: Balance, blocks: BlockNumber) -> bool;
}

/// linear curve: value * blocks * numerator / denominator, with the
/// division remainder carried across mints so no precision is ever dropped
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct LinearCurve {
    pub numerator: u128,
    pub denominator: u128,
}

impl LinearCurve {
    pub fn new(numerator: u128, denominator: u128) -> Self {
        assert!(denominator > 0, "denominator must be nonzero");
        Self {
            numerator,
            denominator,
        }
    }

    fn volume(&self, value: Balance, blocks: BlockNumber) -> u128 {
        value
            .saturating_mul(blocks as u128)
            .saturating_mul(self.numerator)
    }
}

impl RewardCurve for LinearCurve {
    fn compute_reward(
        &self,
        _participant: &ParticipantId,
        locked: Balance,
        elapsed: BlockNumber,
        precision: PrecisionState,
    ) -> (Balance, PrecisionState) {
        let total = self.volume(locked, elapsed).saturating_add(precision.0);
        (total / self.denominator, PrecisionState(total % self.denominator))
    }

    fn is_reward_empty(&self, value: Balance, blocks: BlockNumber) -> bool {
        self.volume(value, blocks) / self.denominator == 0
    }
}
