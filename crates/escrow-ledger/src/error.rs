//! error types for the escrow ledger

use crate::types::{Balance, ParticipantId};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("ledger is terminated")]
    Terminated,

    #[error("zero-amount operation")]
    ZeroAmount,

    #[error("caller is not the administrator")]
    NotAdmin,

    #[error("participant {0} has no ledger entry")]
    UnknownParticipant(ParticipantId),

    #[error("insufficient unlocked balance: requested {requested}, available {available}")]
    InsufficientUnlocked {
        requested: Balance,
        available: Balance,
    },

    #[error("insufficient custody balance: requested {requested}, available {available}")]
    InsufficientCustody {
        requested: Balance,
        available: Balance,
    },

    #[error("insufficient locked balance: requested {requested}, locked {locked}")]
    InsufficientLocked { requested: Balance, locked: Balance },

    #[error("proposed lock yields zero reward")]
    RewardEmpty,

    #[error("existing lock already expired at block {release_block}")]
    LockExpired { release_block: u64 },

    #[error("locked balance not fully released")]
    StillLocked,

    #[error("no unminted locked duration")]
    NothingLocked,

    #[error("token transfer failed")]
    TransferFailed,

    #[error("block height may not go backwards: at {current}, requested {requested}")]
    HeightRegression { current: u64, requested: u64 },

    #[error("search offset {offset} out of range: {available} locked tokens reachable")]
    OffsetOutOfRange { offset: Balance, available: Balance },

    // === registry errors ===
    #[error("participant {0} already registered")]
    AlreadyRegistered(ParticipantId),

    #[error("participant {0} not registered")]
    NotRegistered(ParticipantId),
}
