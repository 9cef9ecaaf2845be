//! Per-participant stake record.

use jury_types::{Timestamp, TokenAmount};
use serde::{Deserialize, Serialize};

/// A participant's stake. Created on first stake, never deleted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stake {
    pub amount: TokenAmount,
    /// Time of the last stake or unstake.
    pub last_active_time: Timestamp,
    /// Always equal to `amount >= minimum_stake` after any mutation.
    pub is_active: bool,
}

impl Stake {
    pub(crate) fn empty(now: Timestamp) -> Self {
        Self {
            amount: TokenAmount::ZERO,
            last_active_time: now,
            is_active: false,
        }
    }

    pub(crate) fn refresh(&mut self, minimum_stake: TokenAmount, now: Timestamp) {
        self.is_active = self.amount >= minimum_stake;
        self.last_active_time = now;
    }
}
