//! Payout computation and the claimable reward book.

use std::collections::BTreeMap;

use crate::error::RewardError;
use jury_types::{Dispute, DistributionMode, DomainEvent, ParticipantId, TokenAmount};
use serde::{Deserialize, Serialize};

/// Computed split of one dispute's reward.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Distribution {
    pub mode: DistributionMode,
    pub payouts: Vec<(ParticipantId, TokenAmount)>,
    pub retained: TokenAmount,
}

impl Distribution {
    pub fn paid(&self) -> Option<TokenAmount> {
        self.payouts
            .iter()
            .try_fold(TokenAmount::ZERO, |acc, (_, amount)| acc.checked_add(*amount))
    }
}

/// Holds every participant's unclaimed reward balance and the retained pool.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RewardDistributor {
    pending: BTreeMap<ParticipantId, TokenAmount>,
    retained: TokenAmount,
}

impl RewardDistributor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending_rewards(&self, participant: &ParticipantId) -> TokenAmount {
        self.pending
            .get(participant)
            .copied()
            .unwrap_or(TokenAmount::ZERO)
    }

    pub fn retained_pool(&self) -> TokenAmount {
        self.retained
    }

    /// Sum of all unclaimed balances.
    pub fn total_pending(&self) -> Option<TokenAmount> {
        self.pending
            .values()
            .try_fold(TokenAmount::ZERO, |acc, v| acc.checked_add(*v))
    }

    pub fn check_distribution(&self, dispute: &Dispute) -> Result<(), RewardError> {
        if !dispute.resolved {
            return Err(RewardError::NotResolved(dispute.id));
        }
        if dispute.rewards_distributed {
            return Err(RewardError::AlreadyDistributed(dispute.id));
        }
        Ok(())
    }

    /// Split among jurors who voted with the outcome, pro rata to frozen weight.
    pub fn plan_weighted(&self, dispute: &Dispute) -> Result<Distribution, RewardError> {
        self.check_distribution(dispute)?;
        let disputant_won = dispute
            .outcome
            .as_ref()
            .map(|o| o.disputant_won)
            .ok_or(RewardError::NotResolved(dispute.id))?;

        let winners: Vec<(&ParticipantId, TokenAmount)> = dispute
            .jurors
            .iter()
            .filter(|j| dispute.votes.get(*j) == Some(&disputant_won))
            .filter_map(|j| dispute.weight_of(j).map(|w| (j, w)))
            .filter(|(_, w)| !w.is_zero())
            .collect();

        let winning_weight = winners
            .iter()
            .try_fold(0u128, |acc, (_, w)| acc.checked_add(w.raw()))
            .ok_or(RewardError::Overflow)?;

        let mut payouts = Vec::with_capacity(winners.len());
        if winning_weight > 0 {
            for (juror, weight) in winners {
                let share = dispute
                    .reward
                    .mul_div(weight.raw(), winning_weight)
                    .ok_or(RewardError::Overflow)?;
                payouts.push((juror.clone(), share));
            }
        }
        Self::finish(DistributionMode::OutcomeWeighted, dispute.reward, payouts)
    }

    /// Equal split across every selected juror, vote direction ignored.
    pub fn plan_even(&self, dispute: &Dispute) -> Result<Distribution, RewardError> {
        self.check_distribution(dispute)?;
        let count = dispute.jurors.len() as u128;
        let payouts = match dispute.reward.raw().checked_div(count) {
            Some(share) if share > 0 => dispute
                .jurors
                .iter()
                .map(|j| (j.clone(), TokenAmount::new(share)))
                .collect(),
            _ => Vec::new(),
        };
        Self::finish(DistributionMode::Even, dispute.reward, payouts)
    }

    fn finish(
        mode: DistributionMode,
        reward: TokenAmount,
        payouts: Vec<(ParticipantId, TokenAmount)>,
    ) -> Result<Distribution, RewardError> {
        let mut distribution = Distribution {
            mode,
            payouts,
            retained: TokenAmount::ZERO,
        };
        let paid = distribution.paid().ok_or(RewardError::Overflow)?;
        distribution.retained = reward.checked_sub(paid).ok_or(RewardError::Overflow)?;
        Ok(distribution)
    }

    /// Credit a planned distribution and mark the dispute settled.
    ///
    /// All new balances are computed before anything is written.
    pub fn apply(
        &mut self,
        dispute: &mut Dispute,
        distribution: Distribution,
    ) -> Result<DomainEvent, RewardError> {
        self.check_distribution(dispute)?;

        let mut credited: BTreeMap<ParticipantId, TokenAmount> = BTreeMap::new();
        for (juror, amount) in &distribution.payouts {
            let current = match credited.get(juror) {
                Some(v) => *v,
                None => self.pending_rewards(juror),
            };
            let next = current.checked_add(*amount).ok_or(RewardError::Overflow)?;
            credited.insert(juror.clone(), next);
        }
        let retained = self
            .retained
            .checked_add(distribution.retained)
            .ok_or(RewardError::Overflow)?;

        self.pending.extend(credited);
        self.retained = retained;
        dispute.rewards_distributed = true;

        match distribution.mode {
            DistributionMode::OutcomeWeighted => tracing::info!(
                dispute = %dispute.id,
                jurors_paid = distribution.payouts.len(),
                retained = distribution.retained.raw(),
                "rewards distributed"
            ),
            DistributionMode::Even => tracing::warn!(
                audit = "override",
                dispute = %dispute.id,
                jurors_paid = distribution.payouts.len(),
                retained = distribution.retained.raw(),
                "rewards distributed evenly"
            ),
        }

        Ok(DomainEvent::RewardsDistributed {
            dispute_id: dispute.id,
            mode: distribution.mode,
            payouts: distribution.payouts,
            retained: distribution.retained,
        })
    }

    pub fn distribute_weighted(&mut self, dispute: &mut Dispute) -> Result<DomainEvent, RewardError> {
        let plan = self.plan_weighted(dispute)?;
        self.apply(dispute, plan)
    }

    pub fn distribute_evenly(&mut self, dispute: &mut Dispute) -> Result<DomainEvent, RewardError> {
        let plan = self.plan_even(dispute)?;
        self.apply(dispute, plan)
    }

    /// Amount `participant` would receive from a claim.
    pub fn check_claim(&self, participant: &ParticipantId) -> Result<TokenAmount, RewardError> {
        let amount = self.pending_rewards(participant);
        if amount.is_zero() {
            return Err(RewardError::NothingToClaim(participant.clone()));
        }
        Ok(amount)
    }

    /// Zero the participant's balance. Call only after the payout transfer succeeded.
    pub fn commit_claim(&mut self, participant: &ParticipantId) -> Result<DomainEvent, RewardError> {
        let amount = self.check_claim(participant)?;
        self.pending.remove(participant);
        tracing::info!(participant = %participant, amount = amount.raw(), "rewards claimed");
        Ok(DomainEvent::RewardClaimed {
            participant: participant.clone(),
            amount,
        })
    }
}
