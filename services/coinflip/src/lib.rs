//! Coin flip games: a classical guess against a fair coin or a quantum player

pub mod batch_runner;
pub mod battle;
pub mod chart;
pub mod cli;
pub mod config;
pub mod console;
pub mod devices;
pub mod experiment;
pub mod fair_bit;
pub mod game;
pub mod logging;
pub mod opponent;
pub mod session;

pub use batch_runner::{run_batch, BatchReport};
pub use chart::{Bar, BarChart};
pub use config::{BackendKind, Config};
pub use console::{shutdown_signal, Console, Prompted};
pub use fair_bit::{BitSource, FairBitSource};
pub use game::GameRules;
pub use opponent::{FairCoin, Opponent};
pub use session::{GuessCommand, Session, SessionEnd};
