use anyhow::Result;
use clap::Parser;
use std::io::Write;
use tokio::io::BufReader;

use coinflip::battle;
use coinflip::cli::{Cli, Command};
use coinflip::devices;
use coinflip::experiment::{self, ExperimentOptions};
use coinflip::{
    logging, shutdown_signal, Config, Console, FairBitSource, FairCoin, GameRules, Session, SessionEnd,
};
use shared::RoundCount;
use simulator::ForcedFlip;

/// Seed offsets so seeded runs give each random source its own stream
const GUESS_SEED: u64 = 0;
const COIN_SEED: u64 = 1;
const BACKEND_SEED: u64 = 2;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    logging::init();
    let cli = Cli::parse();

    let code = match run(cli).await {
        Ok(end) => end.exit_code(),
        Err(e) => {
            tracing::error!(error = %format!("{:#}", e), "Fatal error");
            eprintln!("⚠️  {:#}", e);
            1
        }
    };

    let _ = std::io::stdout().flush();
    // The blocking stdin reader cannot be cancelled and would hold runtime shutdown open.
    std::process::exit(code.into());
}

async fn run(cli: Cli) -> Result<SessionEnd> {
    let config = Config::load()?.with_overrides(cli.backend, cli.seed)?;
    tracing::info!(
        backend = %config.backend,
        seeded = config.seed.is_some(),
        trials = config.trials,
        "Configuration loaded"
    );

    let mut console = Console::new(BufReader::new(tokio::io::stdin()), std::io::stdout());
    let mut guesses = FairBitSource::new(config.component_seed(GUESS_SEED));

    let end = match cli.command {
        Command::Classical => {
            let coin = FairCoin::new(config.component_seed(COIN_SEED));
            Session::new(GameRules::classical(), &coin)
                .run(&mut console, shutdown_signal())
                .await?
        }
        Command::Quantum => {
            let flip = connect_flip(&config).await?;
            Session::new(GameRules::quantum(), &flip)
                .run(&mut console, shutdown_signal())
                .await?
        }
        Command::Battle => {
            let coin = FairCoin::new(config.component_seed(COIN_SEED));
            battle::run(&mut console, &mut guesses, &coin, shutdown_signal()).await?
        }
        Command::Experiment { trials, json, demo } => {
            let options = ExperimentOptions {
                trials: RoundCount::new(trials.unwrap_or(config.trials))?,
                json,
                demo,
            };
            let flip = connect_flip(&config).await?;
            experiment::run(&mut console, &mut guesses, &flip, options, shutdown_signal()).await?
        }
        Command::Backends => devices::run(&mut console, &config.remote_config()?).await?,
    };

    Ok(end)
}

async fn connect_flip(config: &Config) -> Result<ForcedFlip> {
    let backend = simulator::connect(&config.backend_spec()?, config.component_seed(BACKEND_SEED)).await?;
    Ok(ForcedFlip::new(backend))
}
