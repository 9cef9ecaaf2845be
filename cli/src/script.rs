//! Scripted simulations against an in-memory engine.
//!
//! A script funds some accounts and then runs a list of steps. Every event the
//! engine commits is handed to a sink as it happens.

use std::collections::BTreeMap;
use std::sync::Arc;

use jury_nullables::{NullClock, NullLedger};
use jury_registry::{ArbitrationEngine, ArbitrationError, EngineConfig};
use jury_types::{DisputeId, DomainEvent, EventRecord, ParticipantId, TokenAmount};
use serde::{Deserialize, Serialize};

pub type SimEngine = ArbitrationEngine<NullLedger, Arc<NullClock>>;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Script {
    /// Unix time the simulated clock starts at.
    #[serde(default)]
    pub start: u64,
    /// Accounts minted with tokens and pre-approved for the escrow.
    #[serde(default)]
    pub accounts: BTreeMap<ParticipantId, TokenAmount>,
    pub steps: Vec<Step>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    Stake {
        participant: ParticipantId,
        amount: TokenAmount,
    },
    Unstake {
        participant: ParticipantId,
        amount: TokenAmount,
    },
    CreateDispute {
        caller: ParticipantId,
        defendant: ParticipantId,
        reward: TokenAmount,
        #[serde(default)]
        reason: String,
        /// Claim text; its commitment is stored on the dispute.
        #[serde(default)]
        claim: Option<String>,
    },
    Verify {
        caller: ParticipantId,
        dispute: DisputeId,
    },
    SelectJurors {
        caller: ParticipantId,
        dispute: DisputeId,
        #[serde(default)]
        pool_size: Option<usize>,
    },
    Vote {
        juror: ParticipantId,
        dispute: DisputeId,
        for_disputant: bool,
    },
    Advance {
        secs: u64,
    },
    Resolve {
        caller: ParticipantId,
        dispute: DisputeId,
    },
    EndEarly {
        caller: ParticipantId,
        dispute: DisputeId,
        disputant_won: bool,
    },
    Distribute {
        caller: ParticipantId,
        dispute: DisputeId,
    },
    DistributeEvenly {
        caller: ParticipantId,
        dispute: DisputeId,
    },
    Claim {
        participant: ParticipantId,
    },
}

/// A step the engine refused.
#[derive(Debug, Serialize)]
pub struct StepFailure {
    pub step: usize,
    pub kind: String,
    pub error: String,
}

pub struct Simulation {
    engine: SimEngine,
    clock: Arc<NullClock>,
}

impl Simulation {
    pub fn new(config: EngineConfig, script: &Script) -> Result<Self, ArbitrationError> {
        let clock = Arc::new(NullClock::new(script.start));
        let mut ledger = NullLedger::new(config.escrow_account.clone());
        for (account, amount) in &script.accounts {
            ledger.fund(account, *amount);
        }
        let engine = ArbitrationEngine::new(config, ledger, Arc::clone(&clock))?;
        Ok(Self { engine, clock })
    }

    pub fn engine(&self) -> &SimEngine {
        &self.engine
    }

    pub fn apply(&mut self, step: &Step) -> Result<Vec<DomainEvent>, ArbitrationError> {
        let engine = &mut self.engine;
        match step {
            Step::Stake {
                participant,
                amount,
            } => engine.stake(participant, *amount),
            Step::Unstake {
                participant,
                amount,
            } => engine.unstake(participant, *amount),
            Step::CreateDispute {
                caller,
                defendant,
                reward,
                reason,
                claim,
            } => {
                let commitment = claim
                    .as_deref()
                    .map(|c| jury_crypto::commitment_for(c.as_bytes()))
                    .unwrap_or_default();
                engine
                    .create_dispute(caller, defendant, *reward, reason.clone(), commitment)
                    .map(|(_, events)| events)
            }
            Step::Verify { caller, dispute } => engine.verify(caller, *dispute),
            Step::SelectJurors {
                caller,
                dispute,
                pool_size,
            } => match pool_size {
                Some(size) => engine.select_jurors(caller, *dispute, *size),
                None => engine.select_default_jury(caller, *dispute),
            },
            Step::Vote {
                juror,
                dispute,
                for_disputant,
            } => engine.cast_vote(juror, *dispute, *for_disputant),
            Step::Advance { secs } => {
                self.clock.advance(*secs);
                Ok(Vec::new())
            }
            Step::Resolve { caller, dispute } => engine.resolve_dispute(caller, *dispute),
            Step::EndEarly {
                caller,
                dispute,
                disputant_won,
            } => engine.end_dispute_early(caller, *dispute, *disputant_won),
            Step::Distribute { caller, dispute } => engine.distribute_rewards(caller, *dispute),
            Step::DistributeEvenly { caller, dispute } => {
                engine.distribute_evenly(caller, *dispute)
            }
            Step::Claim { participant } => engine.claim_rewards(participant),
        }
    }

    /// Run every step, handing newly journaled records to `sink`.
    ///
    /// With `keep_going`, refused steps are collected and the run continues;
    /// otherwise the first refusal ends the run.
    pub fn run(
        &mut self,
        steps: &[Step],
        keep_going: bool,
        mut sink: impl FnMut(&EventRecord),
    ) -> Result<Vec<StepFailure>, (usize, ArbitrationError)> {
        let mut failures = Vec::new();
        for (i, step) in steps.iter().enumerate() {
            let seen = self.engine.journal().last_sequence();
            match self.apply(step) {
                Ok(_) => self.engine.events_since(seen).iter().for_each(&mut sink),
                Err(e) if keep_going => {
                    tracing::warn!(step = i, error = %e, "step refused");
                    failures.push(StepFailure {
                        step: i,
                        kind: format!("{:?}", e.kind()),
                        error: e.to_string(),
                    });
                }
                Err(e) => return Err((i, e)),
            }
        }
        Ok(failures)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCRIPT: &str = r#"{
        "start": 1000,
        "accounts": { "alice": "1000", "bob": "1000", "j1": "1000", "j2": "1000", "j3": "1000" },
        "steps": [
            { "op": "stake", "participant": "alice", "amount": "150" },
            { "op": "stake", "participant": "j1", "amount": "200" },
            { "op": "stake", "participant": "j2", "amount": "100" },
            { "op": "stake", "participant": "j3", "amount": "100" },
            { "op": "create_dispute", "caller": "alice", "defendant": "bob", "reward": "50",
              "reason": "unpaid invoice", "claim": "invoice 7" },
            { "op": "verify", "caller": "bob", "dispute": 0 },
            { "op": "select_jurors", "caller": "alice", "dispute": 0 },
            { "op": "vote", "juror": "j1", "dispute": 0, "for_disputant": true },
            { "op": "vote", "juror": "j2", "dispute": 0, "for_disputant": true },
            { "op": "vote", "juror": "j3", "dispute": 0, "for_disputant": false },
            { "op": "advance", "secs": 604800 },
            { "op": "resolve", "caller": "anyone", "dispute": 0 },
            { "op": "distribute", "caller": "anyone", "dispute": 0 },
            { "op": "claim", "participant": "j1" }
        ]
    }"#;

    fn config() -> EngineConfig {
        let mut config = EngineConfig::default();
        config.params.minimum_stake = TokenAmount::new(100);
        config
    }

    #[test]
    fn scripted_scenario_runs_to_completion() {
        let script: Script = serde_json::from_str(SCRIPT).unwrap();
        let mut sim = Simulation::new(config(), &script).unwrap();
        let mut names = Vec::new();
        let failures = sim
            .run(&script.steps, false, |r| names.push(r.event.name()))
            .unwrap();

        assert!(failures.is_empty());
        assert_eq!(names.first(), Some(&"Staked"));
        assert_eq!(names.last(), Some(&"RewardClaimed"));
        assert_eq!(names.iter().filter(|n| **n == "JurorSelected").count(), 3);
        let id = DisputeId::new(0);
        assert!(sim.engine().dispute(id).unwrap().outcome.as_ref().unwrap().disputant_won);
        assert!(sim.engine().verify_commitment(id, b"invoice 7").unwrap());
    }

    #[test]
    fn refusals_stop_or_continue() {
        let script = Script {
            start: 0,
            accounts: BTreeMap::new(),
            steps: vec![
                Step::Claim {
                    participant: ParticipantId::new("nobody"),
                },
                Step::Advance { secs: 5 },
            ],
        };

        let mut sim = Simulation::new(config(), &script).unwrap();
        let err = sim.run(&script.steps, false, |_| {}).unwrap_err();
        assert_eq!(err.0, 0);

        let mut sim = Simulation::new(config(), &script).unwrap();
        let failures = sim.run(&script.steps, true, |_| {}).unwrap();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].kind, "Resource");
        assert_eq!(sim.engine().now().as_secs(), 5);
    }
}
