//! # escrow-ledger
//!
//! Token-escrow ledger with block-denominated locks and curve-minted rewards.
//!
//! Participants deposit fungible tokens into ledger custody, lock a portion
//! for a number of blocks, and earn reward proportional to locked amount and
//! elapsed time. The administrator can confiscate locked tokens from
//! misbehaving participants and can terminate the ledger, refunding every
//! holder.
//!
//! ## architecture
//!
//! ```text
//!  deposit/lock/withdraw/penalize/mint_reward
//!                  │
//!                  ▼
//!          ┌───────────────┐     ┌──────────────┐
//!          │  EscrowLedger │────▶│ Token trait  │  custody transfers
//!          │  (entries map)│     └──────────────┘
//!          └──────┬────────┘     ┌──────────────┐
//!                 │         ────▶│ RewardCurve  │  mint amounts + carry
//!          ┌──────▼────────┐     └──────────────┘
//!          │   Registry    │  insertion-ordered membership,
//!          └───────────────┘  aggregate + weighted search walk
//! ```
//!
//! The token backend and the reward curve sit behind traits; the crate ships
//! an in-memory token and a linear curve for tests and simulation. All
//! mutation goes through `&mut EscrowLedger`, which is the serialization
//! point: wrap the ledger in one mutex (or drive it from a single actor) and
//! every operation is atomic: a rejected precondition or failed transfer
//! leaves the ledger exactly as it was.
//!
//! ## usage
//!
//! ```rust
//! use escrow_ledger::{EscrowLedger, LinearCurve, MemoryToken, ParticipantId};
//!
//! let admin = ParticipantId::from_raw([0xAA; 32]);
//! let custody = ParticipantId::from_raw([0xEE; 32]);
//! let alice = ParticipantId::from_raw([1; 32]);
//!
//! let mut token = MemoryToken::new();
//! token.mint(&alice, 100);
//!
//! let mut ledger = EscrowLedger::new(token, LinearCurve::new(1, 1000), admin, custody);
//! ledger.deposit(alice, 100, 10)?;
//! assert_eq!(ledger.currently_locked(&alice, None), 100);
//!
//! ledger.advance_to(10)?;
//! let minted = ledger.mint_reward(alice)?;
//! assert_eq!(minted, 1);
//! ledger.withdraw_all(alice)?;
//! # Ok::<(), escrow_ledger::Error>(())
//! ```

pub mod curve;
pub mod entry;
pub mod error;
pub mod ledger;
pub mod registry;
pub mod search;
pub mod token;
pub mod types;

pub use curve::{LinearCurve, RewardCurve};
pub use entry::ParticipantEntry;
pub use error::{Error, Result};
pub use ledger::{DepositOutcome, EscrowLedger};
pub use registry::Registry;
pub use token::{MemoryToken, Token};
pub use types::{Balance, BlockNumber, ParticipantId, PrecisionState};
