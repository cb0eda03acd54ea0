use clap::{Parser, Subcommand};

use crate::config::BackendKind;

#[derive(Parser, Debug)]
#[command(name = "coinflip")]
#[command(version, about = "Classical and quantum coin flip games", long_about = None)]
pub struct Cli {
    /// Measurement backend for the quantum player (overrides COINFLIP_BACKEND)
    #[arg(long, global = true, value_enum)]
    pub backend: Option<BackendKind>,

    /// Seed every random source (overrides COINFLIP_SEED)
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Guess against a fair coin
    Classical,
    /// Guess against the quantum player
    Quantum,
    /// Simulate rounds of random calls against a fair coin
    Battle,
    /// Run a fixed number of random guesses against the quantum player
    Experiment {
        /// Number of trials (overrides COINFLIP_TRIALS)
        #[arg(short, long)]
        trials: Option<u32>,

        /// Print a JSON report of the batch
        #[arg(long)]
        json: bool,

        /// Narrate a single round before the batch
        #[arg(long)]
        demo: bool,
    },
    /// List devices offered by the remote hardware service
    Backends,
}
