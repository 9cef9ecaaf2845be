//! Token transfer capability.
//!
//! The arbitration engine never settles value itself. Staking, unstaking,
//! reward escrow at dispute creation, and reward claims all go through a
//! [`TokenLedger`] supplied by the host. A transfer either fully succeeds or
//! fails with no effect.

pub mod error;

pub use error::LedgerError;

use jury_types::{ParticipantId, TokenAmount};

/// An external token ledger holding participant balances and the engine's escrow.
pub trait TokenLedger: Send {
    /// Move `amount` from `from` to `to`.
    ///
    /// Debits from accounts other than the engine's escrow are expected to be
    /// backed by an allowance the owner granted to the escrow.
    fn transfer(
        &mut self,
        from: &ParticipantId,
        to: &ParticipantId,
        amount: TokenAmount,
    ) -> Result<(), LedgerError>;

    fn balance_of(&self, account: &ParticipantId) -> TokenAmount;

    /// How much `spender` may still pull from `owner`.
    fn allowance(&self, owner: &ParticipantId, spender: &ParticipantId) -> TokenAmount;
}
