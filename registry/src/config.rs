//! Engine configuration with TOML file support.

use std::collections::BTreeSet;
use std::path::Path;

use jury_types::{ArbitrationParams, ParticipantId};
use jury_utils::LogFormat;
use serde::{Deserialize, Serialize};

use crate::ArbitrationError;

/// Configuration for an arbitration engine.
///
/// Can be loaded from a TOML file via [`EngineConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Ledger account holding staked tokens and dispute rewards.
    #[serde(default = "default_escrow_account")]
    pub escrow_account: ParticipantId,

    /// Participants allowed to end disputes early and distribute evenly.
    #[serde(default)]
    pub arbiters: BTreeSet<ParticipantId>,

    #[serde(default)]
    pub params: ArbitrationParams,

    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_escrow_account() -> ParticipantId {
    ParticipantId::new("jury-escrow")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl EngineConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ArbitrationError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ArbitrationError::Config(format!("{}: {e}", path.as_ref().display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ArbitrationError> {
        let config: Self =
            toml::from_str(s).map_err(|e| ArbitrationError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, ArbitrationError> {
        toml::to_string_pretty(self).map_err(|e| ArbitrationError::Config(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), ArbitrationError> {
        self.params.validate()?;
        ParticipantId::parse(self.escrow_account.as_str())?;
        for arbiter in &self.arbiters {
            ParticipantId::parse(arbiter.as_str())?;
            if *arbiter == self.escrow_account {
                return Err(ArbitrationError::Config(
                    "the escrow account cannot be an arbiter".into(),
                ));
            }
        }
        Ok(())
    }

    pub fn is_arbiter(&self, participant: &ParticipantId) -> bool {
        self.arbiters.contains(participant)
    }

    pub fn with_arbiter(mut self, arbiter: impl Into<String>) -> Self {
        self.arbiters.insert(ParticipantId::new(arbiter));
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            escrow_account: default_escrow_account(),
            arbiters: BTreeSet::new(),
            params: ArbitrationParams::default(),
            log_format: LogFormat::default(),
            log_level: default_log_level(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jury_types::TokenAmount;
    use std::io::Write;

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = EngineConfig::default().with_arbiter("court");
        let toml_str = config.to_toml_string().unwrap();
        let parsed = EngineConfig::from_toml_str(&toml_str).expect("should parse");
        assert_eq!(parsed, config);
    }

    #[test]
    fn minimal_toml_uses_defaults() {
        let config = EngineConfig::from_toml_str("").expect("empty toml should use defaults");
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.params.default_jury_size, 3);
        assert_eq!(config.log_format, LogFormat::Human);
    }

    #[test]
    fn partial_toml_overrides() {
        let toml = r#"
            escrow_account = "vault"
            arbiters = ["court", "registrar"]
            log_format = "json"

            [params]
            minimum_stake = "100"
            allow_partial_jury = true
        "#;
        let config = EngineConfig::from_toml_str(toml).expect("should parse");
        assert_eq!(config.escrow_account, ParticipantId::new("vault"));
        assert!(config.is_arbiter(&ParticipantId::new("registrar")));
        assert_eq!(config.params.minimum_stake, TokenAmount::new(100));
        assert!(config.params.allow_partial_jury);
        assert_eq!(config.params.max_jury_size, 21);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn invalid_params_rejected() {
        let toml = r#"
            [params]
            default_jury_size = 30
        "#;
        let err = EngineConfig::from_toml_str(toml).unwrap_err();
        assert!(matches!(err, ArbitrationError::Types(_)));
    }

    #[test]
    fn escrow_arbiter_rejected() {
        let config = EngineConfig::default().with_arbiter("jury-escrow");
        assert!(matches!(config.validate(), Err(ArbitrationError::Config(_))));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "arbiters = [\"court\"]").unwrap();
        let config = EngineConfig::from_toml_file(file.path()).unwrap();
        assert!(config.is_arbiter(&ParticipantId::new("court")));
    }

    #[test]
    fn missing_file_returns_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = EngineConfig::from_toml_file(dir.path().join("missing.toml"));
        assert!(matches!(result, Err(ArbitrationError::Config(_))));
    }
}
