//! The arbitration engine: owns disputes and sequences every operation.

use jury_crypto::selection_seed;
use jury_ledger::TokenLedger;
use jury_rewards::{RewardDistributor, RewardError};
use jury_selection::{audit_selection, JurorSelector};
use jury_stake::{Stake, StakeLedger};
use jury_types::{
    Clock, Dispute, DisputeId, DomainEvent, EventRecord, ParticipantId, Timestamp, TokenAmount,
};
use jury_verification::VerificationGate;
use jury_voting::{Tally, VotingEngine};

use crate::config::EngineConfig;
use crate::error::ArbitrationError;
use crate::journal::EventJournal;

/// Serialized state machine over stakes and disputes.
///
/// Every mutating call takes the caller identity as already authenticated,
/// returns the domain events it committed, and on error leaves all state
/// (including the token ledger) as it was.
pub struct ArbitrationEngine<L, C> {
    config: EngineConfig,
    ledger: L,
    clock: C,
    stakes: StakeLedger,
    gate: VerificationGate,
    selector: JurorSelector,
    voting: VotingEngine,
    rewards: RewardDistributor,
    /// Indexed by dispute id; ids are dense from 0.
    disputes: Vec<Dispute>,
    journal: EventJournal,
    /// Most recently drawn jury, mixed into the next selection seed.
    last_jury: Vec<ParticipantId>,
}

fn find(disputes: &[Dispute], id: DisputeId) -> Result<&Dispute, ArbitrationError> {
    usize::try_from(id.as_u64())
        .ok()
        .and_then(|i| disputes.get(i))
        .ok_or(ArbitrationError::DisputeNotFound(id))
}

fn find_mut(disputes: &mut [Dispute], id: DisputeId) -> Result<&mut Dispute, ArbitrationError> {
    usize::try_from(id.as_u64())
        .ok()
        .and_then(|i| disputes.get_mut(i))
        .ok_or(ArbitrationError::DisputeNotFound(id))
}

impl<L: TokenLedger, C: Clock> ArbitrationEngine<L, C> {
    pub fn new(config: EngineConfig, ledger: L, clock: C) -> Result<Self, ArbitrationError> {
        config.validate()?;
        tracing::info!(
            escrow = %config.escrow_account,
            arbiters = config.arbiters.len(),
            minimum_stake = config.params.minimum_stake.raw(),
            "arbitration engine initialised"
        );
        Ok(Self {
            stakes: StakeLedger::new(config.params.minimum_stake),
            gate: VerificationGate,
            selector: JurorSelector::new(&config.params),
            voting: VotingEngine,
            rewards: RewardDistributor::new(),
            disputes: Vec::new(),
            journal: EventJournal::new(),
            last_jury: Vec::new(),
            config,
            ledger,
            clock,
        })
    }

    // ── Staking ────────────────────────────────────────────────────────

    pub fn stake(
        &mut self,
        participant: &ParticipantId,
        amount: TokenAmount,
    ) -> Result<Vec<DomainEvent>, ArbitrationError> {
        self.reject_escrow(participant)?;
        let now = self.clock.now();
        self.stakes.check_stake(participant, amount)?;
        self.ledger
            .transfer(participant, &self.config.escrow_account, amount)?;
        let event = self.stakes.stake(participant, amount, now)?;
        Ok(self.commit(now, vec![event]))
    }

    /// Withdraw stake. Refused while the participant sits on an unresolved jury.
    pub fn unstake(
        &mut self,
        participant: &ParticipantId,
        amount: TokenAmount,
    ) -> Result<Vec<DomainEvent>, ArbitrationError> {
        self.reject_escrow(participant)?;
        let now = self.clock.now();
        self.stakes.check_unstake(participant, amount)?;
        self.ledger
            .transfer(&self.config.escrow_account, participant, amount)?;
        let event = self.stakes.unstake(participant, amount, now)?;
        Ok(self.commit(now, vec![event]))
    }

    // ── Dispute lifecycle ──────────────────────────────────────────────

    /// Open a dispute and escrow its reward from the disputant.
    pub fn create_dispute(
        &mut self,
        caller: &ParticipantId,
        defendant: &ParticipantId,
        reward: TokenAmount,
        reason: impl Into<String>,
        commitment: impl Into<String>,
    ) -> Result<(DisputeId, Vec<DomainEvent>), ArbitrationError> {
        self.reject_escrow(caller)?;
        self.reject_escrow(defendant)?;
        if reward.is_zero() {
            return Err(ArbitrationError::InvalidAmount);
        }
        if caller == defendant {
            return Err(ArbitrationError::SelfDispute(caller.clone()));
        }
        let now = self.clock.now();
        let id = DisputeId::new(self.disputes.len() as u64);
        let deadline = now.plus_secs(self.config.params.dispute_duration_secs);

        self.ledger
            .transfer(caller, &self.config.escrow_account, reward)?;

        let dispute = Dispute::new(
            id,
            caller.clone(),
            defendant.clone(),
            reward,
            now,
            deadline,
            reason.into(),
            commitment.into(),
        );
        let event = DomainEvent::DisputeCreated {
            dispute_id: id,
            disputant: caller.clone(),
            defendant: defendant.clone(),
            reward,
            deadline,
            commitment: dispute.commitment.clone(),
        };
        tracing::info!(
            dispute = %id,
            disputant = %caller,
            defendant = %defendant,
            reward = reward.raw(),
            deadline = %deadline,
            "dispute created"
        );
        self.disputes.push(dispute);
        Ok((id, self.commit(now, vec![event])))
    }

    /// Defendant acknowledges the dispute, opening it for juror selection.
    pub fn verify(
        &mut self,
        caller: &ParticipantId,
        id: DisputeId,
    ) -> Result<Vec<DomainEvent>, ArbitrationError> {
        self.reject_escrow(caller)?;
        let now = self.clock.now();
        let dispute = find_mut(&mut self.disputes, id)?;
        let event = self.gate.verify(dispute, caller)?;
        Ok(self.commit(now, vec![event]))
    }

    /// Draw a stake-weighted jury of `pool_size` for a verified dispute.
    ///
    /// The seed is derived from the dispute, the journal height and the
    /// previous jury, so the draw can be replayed with [`Self::audit_selection`].
    pub fn select_jurors(
        &mut self,
        caller: &ParticipantId,
        id: DisputeId,
        pool_size: usize,
    ) -> Result<Vec<DomainEvent>, ArbitrationError> {
        self.reject_escrow(caller)?;
        let now = self.clock.now();
        let sequence = self.journal.last_sequence();
        let dispute = find_mut(&mut self.disputes, id)?;
        let seed = selection_seed(id, sequence, &dispute.commitment, &self.last_jury);
        let events = self
            .selector
            .select(dispute, &mut self.stakes, seed, sequence, pool_size)?;
        self.last_jury = dispute.jurors.clone();
        tracing::debug!(dispute = %id, caller = %caller, "selection requested");
        Ok(self.commit(now, events))
    }

    /// Select a jury of the configured default size.
    pub fn select_default_jury(
        &mut self,
        caller: &ParticipantId,
        id: DisputeId,
    ) -> Result<Vec<DomainEvent>, ArbitrationError> {
        let size = self.config.params.default_jury_size;
        self.select_jurors(caller, id, size)
    }

    pub fn cast_vote(
        &mut self,
        voter: &ParticipantId,
        id: DisputeId,
        for_disputant: bool,
    ) -> Result<Vec<DomainEvent>, ArbitrationError> {
        self.reject_escrow(voter)?;
        let now = self.clock.now();
        let dispute = find_mut(&mut self.disputes, id)?;
        let event = self.voting.cast_vote(dispute, voter, for_disputant)?;
        Ok(self.commit(now, vec![event]))
    }

    /// Resolve by tally. Anyone may call once the deadline has passed.
    pub fn resolve_dispute(
        &mut self,
        caller: &ParticipantId,
        id: DisputeId,
    ) -> Result<Vec<DomainEvent>, ArbitrationError> {
        self.reject_escrow(caller)?;
        let now = self.clock.now();
        let dispute = find_mut(&mut self.disputes, id)?;
        let event = self.voting.resolve(dispute, now)?;
        self.stakes.release_dispute(id, &dispute.jurors);
        tracing::debug!(dispute = %id, caller = %caller, "resolution requested");
        Ok(self.commit(now, vec![event]))
    }

    /// Force an outcome before the deadline. Arbiters only.
    pub fn end_dispute_early(
        &mut self,
        caller: &ParticipantId,
        id: DisputeId,
        disputant_won: bool,
    ) -> Result<Vec<DomainEvent>, ArbitrationError> {
        self.reject_escrow(caller)?;
        let now = self.clock.now();
        find(&self.disputes, id)?;
        self.authorize(caller, "end disputes early")?;
        let dispute = find_mut(&mut self.disputes, id)?;
        let event = self
            .voting
            .terminate_early(dispute, caller, disputant_won, now)?;
        self.stakes.release_dispute(id, &dispute.jurors);
        Ok(self.commit(now, vec![event]))
    }

    // ── Rewards ────────────────────────────────────────────────────────

    /// Split the escrowed reward among winning-side jurors by frozen weight.
    pub fn distribute_rewards(
        &mut self,
        caller: &ParticipantId,
        id: DisputeId,
    ) -> Result<Vec<DomainEvent>, ArbitrationError> {
        self.reject_escrow(caller)?;
        let now = self.clock.now();
        let dispute = find_mut(&mut self.disputes, id)?;
        let event = self.rewards.distribute_weighted(dispute)?;
        tracing::debug!(dispute = %id, caller = %caller, "distribution requested");
        Ok(self.commit(now, vec![event]))
    }

    /// Split the escrowed reward equally among all jurors. Arbiters only.
    pub fn distribute_evenly(
        &mut self,
        caller: &ParticipantId,
        id: DisputeId,
    ) -> Result<Vec<DomainEvent>, ArbitrationError> {
        self.reject_escrow(caller)?;
        let now = self.clock.now();
        find(&self.disputes, id)?;
        self.authorize(caller, "distribute rewards evenly")?;
        let dispute = find_mut(&mut self.disputes, id)?;
        let event = self.rewards.distribute_evenly(dispute)?;
        Ok(self.commit(now, vec![event]))
    }

    /// Pay out a participant's accumulated rewards from escrow.
    pub fn claim_rewards(
        &mut self,
        participant: &ParticipantId,
    ) -> Result<Vec<DomainEvent>, ArbitrationError> {
        self.reject_escrow(participant)?;
        let now = self.clock.now();
        let amount = self.rewards.check_claim(participant)?;
        self.ledger
            .transfer(&self.config.escrow_account, participant, amount)?;
        let event = self.rewards.commit_claim(participant)?;
        Ok(self.commit(now, vec![event]))
    }

    // ── Queries ────────────────────────────────────────────────────────

    pub fn balance_of(&self, participant: &ParticipantId) -> TokenAmount {
        self.stakes.balance_of(participant)
    }

    pub fn stake_of(&self, participant: &ParticipantId) -> Option<&Stake> {
        self.stakes.stake_of(participant)
    }

    pub fn total_staked(&self) -> TokenAmount {
        self.stakes.total_staked()
    }

    pub fn minimum_stake(&self) -> TokenAmount {
        self.stakes.minimum_stake()
    }

    pub fn is_active(&self, participant: &ParticipantId) -> bool {
        self.stakes.is_active(participant)
    }

    /// Unresolved disputes currently locking `participant`'s stake.
    pub fn locked_disputes(&self, participant: &ParticipantId) -> Vec<DisputeId> {
        self.stakes.locked_disputes(participant)
    }

    /// Whether the escrow may pull `amount` from `participant` right now.
    pub fn is_approved(&self, participant: &ParticipantId, amount: TokenAmount) -> bool {
        self.ledger
            .allowance(participant, &self.config.escrow_account)
            >= amount
    }

    pub fn dispute_count(&self) -> u64 {
        self.disputes.len() as u64
    }

    pub fn dispute(&self, id: DisputeId) -> Result<&Dispute, ArbitrationError> {
        find(&self.disputes, id)
    }

    /// All disputes in id order.
    pub fn disputes(&self) -> impl Iterator<Item = &Dispute> {
        self.disputes.iter()
    }

    pub fn jurors(&self, id: DisputeId) -> Result<&[ParticipantId], ArbitrationError> {
        Ok(&find(&self.disputes, id)?.jurors)
    }

    pub fn is_juror(&self, id: DisputeId, participant: &ParticipantId) -> Result<bool, ArbitrationError> {
        Ok(find(&self.disputes, id)?.is_juror(participant))
    }

    pub fn tally(&self, id: DisputeId) -> Result<Tally, ArbitrationError> {
        Ok(self.voting.tally(find(&self.disputes, id)?))
    }

    pub fn pending_rewards(&self, participant: &ParticipantId) -> TokenAmount {
        self.rewards.pending_rewards(participant)
    }

    /// Distributed but not yet claimed rewards across all participants.
    pub fn outstanding_rewards(&self) -> Result<TokenAmount, ArbitrationError> {
        Ok(self.rewards.total_pending().ok_or(RewardError::Overflow)?)
    }

    /// Undistributed remainders accumulated across all disputes.
    pub fn retained_pool(&self) -> TokenAmount {
        self.rewards.retained_pool()
    }

    /// Check a revealed claim against the commitment stored at creation.
    pub fn verify_commitment(&self, id: DisputeId, claim: &[u8]) -> Result<bool, ArbitrationError> {
        let dispute = find(&self.disputes, id)?;
        Ok(jury_crypto::verify_commitment(&dispute.commitment, claim))
    }

    /// Replay a dispute's recorded draw and confirm it yields the stored jury.
    pub fn audit_selection(&self, id: DisputeId) -> Result<bool, ArbitrationError> {
        Ok(audit_selection(find(&self.disputes, id)?)?)
    }

    pub fn events(&self) -> &[EventRecord] {
        self.journal.records()
    }

    pub fn events_for(&self, id: DisputeId) -> Vec<&EventRecord> {
        self.journal.for_dispute(id).collect()
    }

    /// Events committed after `sequence`, for observers re-syncing.
    pub fn events_since(&self, sequence: u64) -> &[EventRecord] {
        self.journal.since(sequence)
    }

    pub fn journal(&self) -> &EventJournal {
        &self.journal
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Direct access to the token ledger, e.g. to fund accounts in a simulation.
    pub fn ledger_mut(&mut self) -> &mut L {
        &mut self.ledger
    }

    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    // ── Internals ──────────────────────────────────────────────────────

    /// The escrow only ever moves value on the engine's behalf.
    fn reject_escrow(&self, caller: &ParticipantId) -> Result<(), ArbitrationError> {
        if *caller == self.config.escrow_account {
            return Err(ArbitrationError::EscrowCaller(caller.clone()));
        }
        Ok(())
    }

    fn authorize(&self, caller: &ParticipantId, action: &'static str) -> Result<(), ArbitrationError> {
        if self.config.is_arbiter(caller) {
            return Ok(());
        }
        tracing::warn!(caller = %caller, action, "unauthorised override attempt");
        Err(ArbitrationError::NotAuthorized {
            caller: caller.clone(),
            action,
        })
    }

    fn commit(&mut self, at: Timestamp, events: Vec<DomainEvent>) -> Vec<DomainEvent> {
        for event in &events {
            self.journal.append(at, event.clone());
        }
        events
    }
}
