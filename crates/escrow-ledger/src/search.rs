//! aggregate and weighted-search queries over the registry walk
//!
//! Both queries read entries in registry (insertion) order, so their results
//! are consistent with per-participant state at any block.

use crate::curve::RewardCurve;
use crate::error::{Error, Result};
use crate::ledger::EscrowLedger;
use crate::token::Token;
use crate::types::{Balance, BlockNumber, ParticipantId};

impl<T: Token, C: RewardCurve> EscrowLedger<T, C> {
    /// total locked tokens across all participants as observed at `at`
    /// (present block when `None`)
    pub fn aggregate_locked(&self, at: Option<BlockNumber>) -> Balance {
        let at = at.unwrap_or(self.height());
        self.registry()
            .iter()
            .map(|id| self.currently_locked(&id, Some(at)))
            .sum()
    }

    /// weighted-index lookup over present-block locked balances
    ///
    /// Walks the registry forward from the successor of `start` (the first
    /// element when `start` is `None`), accumulating locked balances, and
    /// returns the participant whose contribution carries the running total
    /// past `delta`, together with `delta` minus the total before it. Drawing
    /// `delta` uniformly from `[0, aggregate_locked(None))` selects a
    /// participant with probability proportional to its locked stake.
    ///
    /// An offset at or past the total reachable from `start` is rejected
    /// rather than scanned past the end of membership.
    pub fn cumulative_sum_search(
        &self,
        start: Option<&ParticipantId>,
        delta: Balance,
    ) -> Result<(ParticipantId, Balance)> {
        let height = self.height();
        let mut total: Balance = 0;
        for id in self.registry().iter_from(start)? {
            let contribution = self.currently_locked(&id, Some(height));
            if total + contribution > delta {
                return Ok((id, delta - total));
            }
            total += contribution;
        }
        Err(Error::OffsetOutOfRange {
            offset: delta,
            available: total,
        })
    }
}
