//! jury: command-line front end for the arbitration engine.

mod script;

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use jury_registry::EngineConfig;
use jury_utils::{format_until, LogFormat};

use crate::script::{Script, Simulation};

#[derive(Parser)]
#[command(name = "jury", about = "Stake-weighted dispute arbitration engine")]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, env = "JURY_CONFIG")]
    config: Option<PathBuf>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "JURY_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "JURY_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    /// Extra arbiter allowed to end disputes early (repeatable).
    #[arg(long = "arbiter", env = "JURY_ARBITERS", value_delimiter = ',')]
    arbiters: Vec<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Print the effective configuration as TOML.
    Config,

    /// Run a JSON script against an in-memory engine and print each
    /// committed event as a JSON line.
    Simulate {
        /// Path to the script file.
        script: PathBuf,

        /// Report refused steps on stderr and keep going instead of stopping.
        #[arg(long)]
        keep_going: bool,
    },
}

fn load_config(cli: &Cli) -> anyhow::Result<EngineConfig> {
    let mut config = match &cli.config {
        Some(path) => EngineConfig::from_toml_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => EngineConfig::default(),
    };
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    if let Some(format) = cli.log_format {
        config.log_format = format;
    }
    for arbiter in &cli.arbiters {
        config = config.with_arbiter(arbiter.as_str());
    }
    config.validate()?;
    Ok(config)
}

fn simulate(config: EngineConfig, path: &Path, keep_going: bool) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading script {}", path.display()))?;
    let script: Script = serde_json::from_str(&raw)
        .with_context(|| format!("parsing script {}", path.display()))?;
    tracing::info!(steps = script.steps.len(), accounts = script.accounts.len(), "simulation starting");

    let mut sim = Simulation::new(config, &script)?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let mut write_error = None;
    let result = sim.run(&script.steps, keep_going, |record| {
        if write_error.is_some() {
            return;
        }
        let line = serde_json::to_string(record).map_err(anyhow::Error::from);
        if let Err(e) = line.and_then(|l| writeln!(out, "{l}").map_err(anyhow::Error::from)) {
            write_error = Some(e);
        }
    });
    if let Some(e) = write_error {
        return Err(e.context("writing events"));
    }

    let failures = result.map_err(|(step, e)| anyhow::anyhow!("step {step} refused: {e}"))?;
    for failure in &failures {
        eprintln!("{}", serde_json::to_string(failure)?);
    }

    let engine = sim.engine();
    let now = engine.now();
    for dispute in engine.disputes() {
        tracing::info!(
            dispute = %dispute.id,
            phase = ?dispute.phase(),
            jurors = dispute.jurors.len(),
            deadline = %format_until(dispute.deadline, now),
            "final state"
        );
    }
    tracing::info!(
        events = engine.events().len(),
        refused = failures.len(),
        total_staked = engine.total_staked().raw(),
        outstanding = engine.outstanding_rewards()?.raw(),
        retained = engine.retained_pool().raw(),
        "simulation finished"
    );
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    jury_utils::init_logging(config.log_format, &config.log_level)?;

    match cli.command {
        Command::Config => {
            print!("{}", config.to_toml_string()?);
            Ok(())
        }
        Command::Simulate { script, keep_going } => simulate(config, &script, keep_going),
    }
}
