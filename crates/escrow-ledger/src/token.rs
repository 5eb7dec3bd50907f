//! fungible token boundary
//!
//! The ledger never touches token internals; it holds custody through this
//! trait and treats any `false` return as a full-operation failure.

use crate::types::{Balance, ParticipantId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// transfer primitive the ledger moves custody through
///
/// Caller identity is always explicit, so a separate transfer-from entry
/// point is unnecessary.
pub trait Token {
    fn balance_of(&self, holder: &ParticipantId) -> Balance;

    /// move `amount` from `from` to `to`; `false` means nothing moved
    fn transfer(&mut self, from: &ParticipantId, to: &ParticipantId, amount: Balance) -> bool;

    /// irreversibly destroy `amount` held by `holder`
    fn burn(&mut self, holder: &ParticipantId, amount: Balance) -> bool;
}

/// in-memory token backend for tests and simulation
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MemoryToken {
    balances: HashMap<ParticipantId, Balance>,
    total_supply: Balance,
}

impl MemoryToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// credit fresh supply to `holder` (test setup only; the ledger itself
    /// never mints)
    pub fn mint(&mut self, holder: &ParticipantId, amount: Balance) {
        *self.balances.entry(*holder).or_default() += amount;
        self.total_supply += amount;
    }

    pub fn total_supply(&self) -> Balance {
        self.total_supply
    }
}

impl Token for MemoryToken {
    fn balance_of(&self, holder: &ParticipantId) -> Balance {
        self.balances.get(holder).copied().unwrap_or(0)
    }

    fn transfer(&mut self, from: &ParticipantId, to: &ParticipantId, amount: Balance) -> bool {
        let available = self.balance_of(from);
        if available < amount {
            return false;
        }
        if from == to {
            return true;
        }
        self.balances.insert(*from, available - amount);
        *self.balances.entry(*to).or_default() += amount;
        true
    }

    fn burn(&mut self, holder: &ParticipantId, amount: Balance) -> bool {
        let available = self.balance_of(holder);
        if available < amount {
            return false;
        }
        self.balances.insert(*holder, available - amount);
        self.total_supply -= amount;
        true
    }
}
