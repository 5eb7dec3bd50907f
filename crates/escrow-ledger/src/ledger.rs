//! escrow ledger state machine
//!
//! One `EscrowLedger` owns the full shared state: the entries map, the
//! ordered registry, the token custody and the block clock. Every operation
//! takes the acting participant explicitly and goes through `&mut self`,
//! which is the serialization point: callers wanting concurrent access put
//! the ledger behind one mutex or a single-threaded actor queue. Rejected
//! operations leave no trace: any accounting already applied is rolled back
//! before the error is returned.

use crate::curve::RewardCurve;
use crate::entry::ParticipantEntry;
use crate::error::{Error, Result};
use crate::registry::Registry;
use crate::token::Token;
use crate::types::{Balance, BlockNumber, ParticipantId};
use std::collections::HashMap;

/// what became of the lock attempt bundled into a deposit
///
/// The deposit itself stands either way; a rejected lock only means the
/// deposited tokens sit unlocked.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DepositOutcome {
    /// deposit credited and the requested lock applied
    Locked,
    /// deposit credited but the lock attempt was rejected for this reason
    Unlocked(Error),
}

/// token-escrow ledger
pub struct EscrowLedger<T: Token, C: RewardCurve> {
    token: T,
    curve: C,
    admin: ParticipantId,
    custody: ParticipantId,
    height: BlockNumber,
    entries: HashMap<ParticipantId, ParticipantEntry>,
    registry: Registry,
    terminated: bool,
}

impl<T: Token, C: RewardCurve> EscrowLedger<T, C> {
    pub fn new(token: T, curve: C, admin: ParticipantId, custody: ParticipantId) -> Self {
        Self {
            token,
            curve,
            admin,
            custody,
            height: 0,
            entries: HashMap::new(),
            registry: Registry::new(),
            terminated: false,
        }
    }

    // === clock ===

    pub fn height(&self) -> BlockNumber {
        self.height
    }

    /// move the block clock forward; the clock never runs backwards
    pub fn advance_to(&mut self, height: BlockNumber) -> Result<()> {
        if height < self.height {
            return Err(Error::HeightRegression {
                current: self.height,
                requested: height,
            });
        }
        self.height = height;
        Ok(())
    }

    // === queries ===

    pub fn entry(&self, id: &ParticipantId) -> Option<&ParticipantEntry> {
        self.entries.get(id)
    }

    /// locked amount of `id` as observed at `at` (present block when `None`)
    pub fn currently_locked(&self, id: &ParticipantId, at: Option<BlockNumber>) -> Balance {
        let at = at.unwrap_or(self.height);
        self.entries.get(id).map_or(0, |e| e.locked_at(at))
    }

    pub fn participant_count(&self) -> usize {
        self.registry.len()
    }

    /// participants in registry (insertion) order
    pub fn participants(&self) -> impl Iterator<Item = ParticipantId> + '_ {
        self.registry.iter()
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    pub fn admin(&self) -> &ParticipantId {
        &self.admin
    }

    pub fn custody(&self) -> &ParticipantId {
        &self.custody
    }

    pub fn token(&self) -> &T {
        &self.token
    }

    pub(crate) fn registry(&self) -> &Registry {
        &self.registry
    }

    // === operations ===

    /// credit `amount` into custody for `caller`, then attempt to lock it
    /// for `blocks`
    ///
    /// The transfer failure path is unobservable: the accounting credit and
    /// any fresh registration are undone before the error surfaces.
    pub fn deposit(
        &mut self,
        caller: ParticipantId,
        amount: Balance,
        blocks: BlockNumber,
    ) -> Result<DepositOutcome> {
        self.ensure_active()?;
        if amount == 0 {
            return Err(Error::ZeroAmount);
        }

        let newly_registered = !self.registry.exists(&caller);
        if newly_registered {
            self.registry.insert(caller)?;
        }
        self.entries.entry(caller).or_default().total_value += amount;

        if !self.token.transfer(&caller, &self.custody, amount) {
            if let Some(entry) = self.entries.get_mut(&caller) {
                entry.total_value -= amount;
                if entry.total_value == 0 && entry.locked_value == 0 {
                    self.entries.remove(&caller);
                }
            }
            if newly_registered {
                self.registry.remove(&caller)?;
            }
            return Err(Error::TransferFailed);
        }

        match self.lock(caller, amount, blocks) {
            Ok(()) => Ok(DepositOutcome::Locked),
            Err(reason) => Ok(DepositOutcome::Unlocked(reason)),
        }
    }

    /// place a fresh lock or extend the existing one
    ///
    /// The reference point for "already locked" is the caller's own
    /// `last_reward_block`: locked value whose reward has been minted
    /// through the present does not count against a fresh lock.
    pub fn lock(&mut self, caller: ParticipantId, value: Balance, blocks: BlockNumber) -> Result<()> {
        self.ensure_active()?;
        if value == 0 && blocks == 0 {
            return Err(Error::ZeroAmount);
        }

        let custody_balance = self.token.balance_of(&self.custody);
        let height = self.height;
        let entry = self
            .entries
            .get_mut(&caller)
            .ok_or(Error::UnknownParticipant(caller))?;

        // total_value can sit below a stale locked_value once a lock has
        // expired and been withdrawn against, so this must not underflow
        let last_locked = entry.locked_at(entry.last_reward_block);
        let available = entry.total_value.saturating_sub(last_locked);
        if value > available {
            return Err(Error::InsufficientUnlocked {
                requested: value,
                available,
            });
        }
        if value > custody_balance {
            return Err(Error::InsufficientCustody {
                requested: value,
                available: custody_balance,
            });
        }

        if last_locked == 0 {
            // fresh lock
            if self.curve.is_reward_empty(value, blocks) {
                return Err(Error::RewardEmpty);
            }
            entry.locked_value = value;
            entry.release_block = height + blocks;
            entry.last_reward_block = height;
        } else {
            // additive extension; an expired lock cannot be extended
            if entry.release_block < height {
                return Err(Error::LockExpired {
                    release_block: entry.release_block,
                });
            }
            let combined_value = entry.locked_value + value;
            let combined_blocks = blocks + (entry.release_block - entry.last_reward_block);
            if self.curve.is_reward_empty(combined_value, combined_blocks) {
                return Err(Error::RewardEmpty);
            }
            entry.locked_value += value;
            entry.release_block += blocks;
        }
        Ok(())
    }

    /// withdraw `amount` of the caller's unlocked balance
    pub fn withdraw(&mut self, caller: ParticipantId, amount: Balance) -> Result<()> {
        self.ensure_active()?;
        if amount == 0 {
            return Err(Error::ZeroAmount);
        }

        let height = self.height;
        let entry = self
            .entries
            .get_mut(&caller)
            .ok_or(Error::UnknownParticipant(caller))?;
        let available = entry.unlocked_at(height);
        if amount > available {
            return Err(Error::InsufficientUnlocked {
                requested: amount,
                available,
            });
        }

        entry.total_value -= amount;
        if !self.token.transfer(&self.custody, &caller, amount) {
            if let Some(entry) = self.entries.get_mut(&caller) {
                entry.total_value += amount;
            }
            return Err(Error::TransferFailed);
        }
        Ok(())
    }

    /// refund the caller's full balance and drop the entry
    ///
    /// No-op success when the caller has no entry. Rejected while any locked
    /// value has unminted reward outstanding. Mint first, then leave.
    pub fn withdraw_all(&mut self, caller: ParticipantId) -> Result<()> {
        self.ensure_active()?;
        let Some(entry) = self.entries.get(&caller) else {
            return Ok(());
        };
        if entry.locked_at(entry.last_reward_block) != 0 {
            return Err(Error::StillLocked);
        }

        // refund before unlinking so a transfer failure leaves membership intact
        let refund = entry.total_value;
        if refund > 0 && !self.token.transfer(&self.custody, &caller, refund) {
            return Err(Error::TransferFailed);
        }
        self.registry.remove(&caller)?;
        self.entries.remove(&caller);
        Ok(())
    }

    /// confiscate `amount` of `target`'s locked tokens and burn them
    pub fn penalize(
        &mut self,
        caller: ParticipantId,
        target: ParticipantId,
        amount: Balance,
    ) -> Result<()> {
        self.ensure_active()?;
        if caller != self.admin {
            return Err(Error::NotAdmin);
        }
        if amount == 0 {
            return Err(Error::ZeroAmount);
        }

        let height = self.height;
        let entry = self
            .entries
            .get_mut(&target)
            .ok_or(Error::UnknownParticipant(target))?;
        let locked = entry.locked_at(height);
        if locked < amount {
            return Err(Error::InsufficientLocked {
                requested: amount,
                locked,
            });
        }

        entry.total_value -= amount;
        entry.locked_value -= amount;
        if !self.token.burn(&self.custody, amount) {
            if let Some(entry) = self.entries.get_mut(&target) {
                entry.total_value += amount;
                entry.locked_value += amount;
            }
            return Err(Error::TransferFailed);
        }
        Ok(())
    }

    /// refund every participant, sweep residual custody to the admin, and
    /// shut the ledger down for good
    pub fn terminate(&mut self, caller: ParticipantId) -> Result<()> {
        self.ensure_active()?;
        if caller != self.admin {
            return Err(Error::NotAdmin);
        }

        while let Some(id) = self.registry.first() {
            let refund = self.entries.get(&id).map_or(0, |e| e.total_value);
            if refund > 0 && !self.token.transfer(&self.custody, &id, refund) {
                return Err(Error::TransferFailed);
            }
            self.entries.remove(&id);
            self.registry.remove(&id)?;
        }

        let residual = self.token.balance_of(&self.custody);
        if residual > 0 && !self.token.transfer(&self.custody, &self.admin, residual) {
            return Err(Error::TransferFailed);
        }
        self.terminated = true;
        Ok(())
    }

    /// mint reward for the caller's locked value over the blocks elapsed
    /// since the last mint, up to the release block
    ///
    /// A zero mint records no progress, so a later call retries the same
    /// span with more elapsed blocks. Returns the minted amount; issuing the
    /// reward asset itself is the curve owner's side of the boundary.
    pub fn mint_reward(&mut self, caller: ParticipantId) -> Result<Balance> {
        self.ensure_active()?;
        let height = self.height;
        let entry = self
            .entries
            .get_mut(&caller)
            .ok_or(Error::UnknownParticipant(caller))?;
        if entry.locked_at(entry.last_reward_block) == 0 {
            return Err(Error::NothingLocked);
        }

        let elapsed = height.min(entry.release_block) - entry.last_reward_block;
        let (minted, precision) = self.curve.compute_reward(
            &caller,
            entry.locked_value,
            elapsed,
            entry.precision_state,
        );
        if minted > 0 {
            entry.last_reward_block = height;
            entry.precision_state = precision;
        }
        Ok(minted)
    }

    fn ensure_active(&self) -> Result<()> {
        if self.terminated {
            return Err(Error::Terminated);
        }
        Ok(())
    }
}
