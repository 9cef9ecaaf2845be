//! Nullable token ledger: in-memory balances and allowances.

use jury_ledger::{LedgerError, TokenLedger};
use jury_types::{ParticipantId, TokenAmount};
use std::collections::{BTreeMap, VecDeque};

/// A transfer that went through, kept for assertions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransferRecord {
    pub from: ParticipantId,
    pub to: ParticipantId,
    pub amount: TokenAmount,
}

/// An in-memory token ledger with an escrow account.
///
/// Debits from any account other than the escrow must be covered by an
/// allowance the owner granted to the escrow, and consume it.
#[derive(Clone, Debug)]
pub struct NullLedger {
    escrow: ParticipantId,
    balances: BTreeMap<ParticipantId, TokenAmount>,
    allowances: BTreeMap<(ParticipantId, ParticipantId), TokenAmount>,
    transfers: Vec<TransferRecord>,
    /// Scripted rejections for the next transfers.
    failures: VecDeque<String>,
}

impl NullLedger {
    pub fn new(escrow: ParticipantId) -> Self {
        Self {
            escrow,
            balances: BTreeMap::new(),
            allowances: BTreeMap::new(),
            transfers: Vec::new(),
            failures: VecDeque::new(),
        }
    }

    pub fn escrow(&self) -> &ParticipantId {
        &self.escrow
    }

    /// Credit `amount` to `account` out of thin air.
    pub fn mint(&mut self, account: &ParticipantId, amount: TokenAmount) {
        let entry = self.balances.entry(account.clone()).or_default();
        *entry = entry.saturating_add(amount);
    }

    /// Set the allowance `owner` grants to `spender`, replacing any previous one.
    pub fn approve(&mut self, owner: &ParticipantId, spender: &ParticipantId, amount: TokenAmount) {
        self.allowances
            .insert((owner.clone(), spender.clone()), amount);
    }

    /// Mint `amount` to `account` and approve the escrow to pull all of it.
    pub fn fund(&mut self, account: &ParticipantId, amount: TokenAmount) {
        self.mint(account, amount);
        let escrow = self.escrow.clone();
        self.approve(account, &escrow, self.balance_of(account));
    }

    /// Make the next transfer fail with `reason`. Calls queue up.
    pub fn fail_next_transfer(&mut self, reason: impl Into<String>) {
        self.failures.push_back(reason.into());
    }

    pub fn transfers(&self) -> &[TransferRecord] {
        &self.transfers
    }

    /// Sum of every account balance.
    pub fn total_supply(&self) -> TokenAmount {
        self.balances
            .values()
            .fold(TokenAmount::ZERO, |acc, v| acc.saturating_add(*v))
    }
}

impl TokenLedger for NullLedger {
    fn transfer(
        &mut self,
        from: &ParticipantId,
        to: &ParticipantId,
        amount: TokenAmount,
    ) -> Result<(), LedgerError> {
        if let Some(reason) = self.failures.pop_front() {
            return Err(LedgerError::Rejected(reason));
        }

        let available = self.balance_of(from);
        let remaining = available
            .checked_sub(amount)
            .ok_or_else(|| LedgerError::InsufficientBalance {
                account: from.clone(),
                needed: amount,
                available,
            })?;

        let needs_allowance = *from != self.escrow;
        let allowance_left = if needs_allowance {
            let approved = self.allowance(from, &self.escrow);
            Some(
                approved
                    .checked_sub(amount)
                    .ok_or_else(|| LedgerError::InsufficientAllowance {
                        owner: from.clone(),
                        needed: amount,
                        approved,
                    })?,
            )
        } else {
            None
        };

        let credited = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or_else(|| LedgerError::Rejected("balance overflow".into()))?;

        if let Some(left) = allowance_left {
            self.allowances
                .insert((from.clone(), self.escrow.clone()), left);
        }
        self.balances.insert(from.clone(), remaining);
        // Self-transfers net to zero, so write the credit after the debit.
        let credited = if from == to { available } else { credited };
        self.balances.insert(to.clone(), credited);
        self.transfers.push(TransferRecord {
            from: from.clone(),
            to: to.clone(),
            amount,
        });
        Ok(())
    }

    fn balance_of(&self, account: &ParticipantId) -> TokenAmount {
        self.balances
            .get(account)
            .copied()
            .unwrap_or(TokenAmount::ZERO)
    }

    fn allowance(&self, owner: &ParticipantId, spender: &ParticipantId) -> TokenAmount {
        self.allowances
            .get(&(owner.clone(), spender.clone()))
            .copied()
            .unwrap_or(TokenAmount::ZERO)
    }
}
