//! Engine parameters.
//!
//! Every field has a serde default so a partial TOML table is enough to
//! configure an engine.

use crate::amount::{TokenAmount, TOKEN_UNIT};
use crate::error::TypesError;
use serde::{Deserialize, Serialize};

/// Tunable values consulted by the stake ledger, juror selector and registry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArbitrationParams {
    /// Stake at or above which a participant is active and eligible as a juror.
    /// Default: 100 tokens.
    #[serde(default = "default_minimum_stake")]
    pub minimum_stake: TokenAmount,

    /// Time from dispute creation to the voting deadline. Default: 7 days.
    #[serde(default = "default_dispute_duration_secs")]
    pub dispute_duration_secs: u64,

    /// Jury size used when a caller does not request one explicitly.
    #[serde(default = "default_jury_size")]
    pub default_jury_size: usize,

    /// Largest jury a single dispute may request.
    #[serde(default = "default_max_jury_size")]
    pub max_jury_size: usize,

    /// Smallest jury accepted when `allow_partial_jury` is set.
    #[serde(default = "default_min_viable_jurors")]
    pub min_viable_jurors: usize,

    /// Accept fewer jurors than requested when the eligible pool runs short.
    #[serde(default)]
    pub allow_partial_jury: bool,
}

fn default_minimum_stake() -> TokenAmount {
    TokenAmount::new(100 * TOKEN_UNIT)
}

fn default_dispute_duration_secs() -> u64 {
    7 * 24 * 60 * 60
}

fn default_jury_size() -> usize {
    3
}

fn default_max_jury_size() -> usize {
    21
}

fn default_min_viable_jurors() -> usize {
    1
}

impl Default for ArbitrationParams {
    fn default() -> Self {
        Self {
            minimum_stake: default_minimum_stake(),
            dispute_duration_secs: default_dispute_duration_secs(),
            default_jury_size: default_jury_size(),
            max_jury_size: default_max_jury_size(),
            min_viable_jurors: default_min_viable_jurors(),
            allow_partial_jury: false,
        }
    }
}

impl ArbitrationParams {
    /// Reject parameter combinations the engine cannot operate under.
    pub fn validate(&self) -> Result<(), TypesError> {
        if self.max_jury_size == 0 {
            return Err(TypesError::InvalidParameter {
                name: "max_jury_size",
                reason: "must be at least 1".into(),
            });
        }
        if self.default_jury_size == 0 || self.default_jury_size > self.max_jury_size {
            return Err(TypesError::InvalidParameter {
                name: "default_jury_size",
                reason: format!("must be within 1..={}", self.max_jury_size),
            });
        }
        if self.min_viable_jurors == 0 || self.min_viable_jurors > self.max_jury_size {
            return Err(TypesError::InvalidParameter {
                name: "min_viable_jurors",
                reason: format!("must be within 1..={}", self.max_jury_size),
            });
        }
        Ok(())
    }
}
