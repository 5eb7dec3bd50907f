//! core types for the escrow ledger

use serde::{Deserialize, Serialize};

/// 32-byte participant identity
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ParticipantId(pub [u8; 32]);

impl ParticipantId {
    pub fn from_raw(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl core::fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        // short hex form, enough to tell participants apart in logs
        write!(f, "{}", &hex::encode(self.0)[..16])
    }
}

/// token amount in smallest unit
pub type Balance = u128;

/// block height (monotonically increasing)
pub type BlockNumber = u64;

/// opaque fractional-precision carry threaded through reward computations
///
/// The ledger never interprets this; it only stores the value returned by the
/// curve and hands it back on the next mint.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PrecisionState(pub u128);
