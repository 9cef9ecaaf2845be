//! Core stake ledger.

use crate::error::StakeError;
use crate::stake::Stake;
use jury_types::{DisputeId, DomainEvent, ParticipantId, Timestamp, TokenAmount};
use std::collections::{BTreeMap, BTreeSet};

/// Owns every [`Stake`] record and the global `total_staked` counter.
///
/// Records are kept in a `BTreeMap` so iteration (and therefore candidate
/// ordering for juror selection) is by ascending participant identifier.
pub struct StakeLedger {
    minimum_stake: TokenAmount,
    stakes: BTreeMap<ParticipantId, Stake>,
    total_staked: TokenAmount,
    /// Participant → unresolved disputes on which they sit as juror.
    juror_locks: BTreeMap<ParticipantId, BTreeSet<DisputeId>>,
}

impl StakeLedger {
    pub fn new(minimum_stake: TokenAmount) -> Self {
        Self {
            minimum_stake,
            stakes: BTreeMap::new(),
            total_staked: TokenAmount::ZERO,
            juror_locks: BTreeMap::new(),
        }
    }

    pub fn minimum_stake(&self) -> TokenAmount {
        self.minimum_stake
    }

    pub fn balance_of(&self, participant: &ParticipantId) -> TokenAmount {
        self.stakes
            .get(participant)
            .map(|s| s.amount)
            .unwrap_or(TokenAmount::ZERO)
    }

    pub fn stake_of(&self, participant: &ParticipantId) -> Option<&Stake> {
        self.stakes.get(participant)
    }

    pub fn total_staked(&self) -> TokenAmount {
        self.total_staked
    }

    pub fn is_active(&self, participant: &ParticipantId) -> bool {
        self.stakes.get(participant).is_some_and(|s| s.is_active)
    }

    /// Active participants and their current stake, ascending by identifier.
    pub fn active_participants(&self) -> impl Iterator<Item = (&ParticipantId, TokenAmount)> {
        self.stakes
            .iter()
            .filter(|(_, s)| s.is_active)
            .map(|(p, s)| (p, s.amount))
    }

    /// Validate a stake without applying it.
    pub fn check_stake(
        &self,
        participant: &ParticipantId,
        amount: TokenAmount,
    ) -> Result<(), StakeError> {
        self.stake_totals_after(participant, amount).map(|_| ())
    }

    /// Increase a participant's stake. Creates the record on first use.
    pub fn stake(
        &mut self,
        participant: &ParticipantId,
        amount: TokenAmount,
        now: Timestamp,
    ) -> Result<DomainEvent, StakeError> {
        let (new_amount, new_total) = self.stake_totals_after(participant, amount)?;

        let minimum = self.minimum_stake;
        let record = self
            .stakes
            .entry(participant.clone())
            .or_insert_with(|| Stake::empty(now));
        record.amount = new_amount;
        record.refresh(minimum, now);
        let is_active = record.is_active;
        self.total_staked = new_total;

        tracing::info!(
            participant = %participant,
            amount = amount.raw(),
            balance = new_amount.raw(),
            active = is_active,
            "staked"
        );

        Ok(DomainEvent::Staked {
            participant: participant.clone(),
            amount,
            balance: new_amount,
        })
    }

    /// Validate an unstake without applying it.
    pub fn check_unstake(
        &self,
        participant: &ParticipantId,
        amount: TokenAmount,
    ) -> Result<(), StakeError> {
        self.unstake_totals_after(participant, amount).map(|_| ())
    }

    /// Decrease a participant's stake.
    ///
    /// Refused outright while the participant sits on any unresolved jury.
    /// The record survives a withdrawal to zero.
    pub fn unstake(
        &mut self,
        participant: &ParticipantId,
        amount: TokenAmount,
        now: Timestamp,
    ) -> Result<DomainEvent, StakeError> {
        let (new_amount, new_total) = self.unstake_totals_after(participant, amount)?;

        let minimum = self.minimum_stake;
        let record = self
            .stakes
            .get_mut(participant)
            .ok_or(StakeError::InsufficientStake {
                requested: amount,
                available: TokenAmount::ZERO,
            })?;
        record.amount = new_amount;
        record.refresh(minimum, now);
        let is_active = record.is_active;
        self.total_staked = new_total;

        tracing::info!(
            participant = %participant,
            amount = amount.raw(),
            balance = new_amount.raw(),
            active = is_active,
            "unstaked"
        );

        Ok(DomainEvent::Unstaked {
            participant: participant.clone(),
            amount,
            balance: new_amount,
        })
    }

    /// Pin a juror's stake for the lifetime of a dispute.
    pub fn lock_juror(&mut self, participant: &ParticipantId, dispute: DisputeId) {
        self.juror_locks
            .entry(participant.clone())
            .or_default()
            .insert(dispute);
    }

    /// Release every juror lock held for `dispute`.
    pub fn release_dispute(&mut self, dispute: DisputeId, jurors: &[ParticipantId]) {
        for juror in jurors {
            if let Some(set) = self.juror_locks.get_mut(juror) {
                set.remove(&dispute);
                if set.is_empty() {
                    self.juror_locks.remove(juror);
                }
            }
        }
        tracing::debug!(dispute = %dispute, jurors = jurors.len(), "juror locks released");
    }

    /// Unresolved disputes currently holding this participant's stake.
    pub fn locked_disputes(&self, participant: &ParticipantId) -> Vec<DisputeId> {
        self.juror_locks
            .get(participant)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }

    fn stake_totals_after(
        &self,
        participant: &ParticipantId,
        amount: TokenAmount,
    ) -> Result<(TokenAmount, TokenAmount), StakeError> {
        if amount.is_zero() {
            return Err(StakeError::InvalidAmount);
        }
        let new_amount = self
            .balance_of(participant)
            .checked_add(amount)
            .ok_or(StakeError::Overflow)?;
        let new_total = self
            .total_staked
            .checked_add(amount)
            .ok_or(StakeError::Overflow)?;
        Ok((new_amount, new_total))
    }

    fn unstake_totals_after(
        &self,
        participant: &ParticipantId,
        amount: TokenAmount,
    ) -> Result<(TokenAmount, TokenAmount), StakeError> {
        if amount.is_zero() {
            return Err(StakeError::InvalidAmount);
        }
        let available = self.balance_of(participant);
        if amount > available {
            return Err(StakeError::InsufficientStake {
                requested: amount,
                available,
            });
        }
        let disputes = self.locked_disputes(participant);
        if !disputes.is_empty() {
            return Err(StakeError::ActiveDisputeHeld {
                participant: participant.clone(),
                disputes,
            });
        }
        let new_amount = available
            .checked_sub(amount)
            .ok_or(StakeError::Overflow)?;
        let new_total = self
            .total_staked
            .checked_sub(amount)
            .ok_or(StakeError::Overflow)?;
        Ok((new_amount, new_total))
    }
}
