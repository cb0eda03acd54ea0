//! Fixed-size quantum vs classical batch

use chrono::Utc;
use shared::{RoundCount, RoundResult};
use simulator::ForcedFlip;
use std::future::Future;
use std::io::{self, Write};
use std::time::{Duration, Instant};
use tokio::io::AsyncBufRead;

use crate::batch_runner::{run_batch, BatchReport};
use crate::console::{or_interrupt, Console};
use crate::fair_bit::BitSource;
use crate::game::GameRules;
use crate::session::{SessionEnd, INTERRUPTED};

#[derive(Debug, Clone, Copy)]
pub struct ExperimentOptions {
    pub trials: RoundCount,
    /// Print the JSON batch report after the chart
    pub json: bool,
    /// Play and narrate one round before the batch
    pub demo: bool,
}

/// `H:MM:SS.ffffff`
pub fn format_elapsed(elapsed: Duration) -> String {
    let total = elapsed.as_secs();
    format!(
        "{}:{:02}:{:02}.{:06}",
        total / 3600,
        (total / 60) % 60,
        total % 60,
        elapsed.subsec_micros()
    )
}

pub async fn run<R, W, G, I>(
    console: &mut Console<R, W>,
    guesses: &mut G,
    flip: &ForcedFlip,
    options: ExperimentOptions,
    interrupt: I,
) -> io::Result<SessionEnd>
where
    R: AsyncBufRead + Unpin,
    W: Write,
    G: BitSource + ?Sized,
    I: Future<Output = ()>,
{
    tokio::pin!(interrupt);
    let rules = GameRules::experiment();
    let backend = flip.backend().name();

    tracing::info!(backend = %backend, trials = options.trials.get(), "Starting experiment");
    console.say(rules.title)?;
    console.say(format!("Using backend: {}", backend))?;
    if !flip.backend().is_ideal() {
        console.say("Noise is enabled, so the classical player can occasionally win.")?;
    }

    if options.demo {
        let guess = guesses.next_bit();
        let outcome = match or_interrupt(flip.flip(guess), &mut interrupt).await {
            None => {
                console.say(INTERRUPTED)?;
                return Ok(SessionEnd::Interrupted);
            }
            Some(Err(e)) => {
                console.say(format!("⚠️  Unexpected error: {}", e))?;
                return Ok(SessionEnd::failed(&e));
            }
            Some(Ok(outcome)) => outcome,
        };
        let round = RoundResult::new(guess, outcome);
        console.say(format!("Classical guess: {}", guess))?;
        console.say(format!("Quantum outcome: {}", outcome))?;
        console.say(rules.verdict(&round))?;
    }

    let started_at = Utc::now();
    let start = Instant::now();

    let tally = match or_interrupt(run_batch(options.trials, &mut *guesses, flip), &mut interrupt).await {
        None => {
            console.say(INTERRUPTED)?;
            return Ok(SessionEnd::Interrupted);
        }
        Some(Err(e)) => {
            console.say(format!("⚠️  Experiment aborted: {}", e))?;
            return Ok(SessionEnd::failed(&e));
        }
        Some(Ok(tally)) => tally,
    };
    let elapsed = start.elapsed();

    console.say(format!("Execution time: {}", format_elapsed(elapsed)))?;
    console.say(format!(
        "Classical wins: {} vs. Quantum wins: {}",
        tally.agree(),
        tally.disagree()
    ))?;
    console.say("")?;
    console.say(rules.chart(
        format!("Quantum vs Classical Player: {} Coin Flips", options.trials),
        &tally,
    ))?;

    if options.json {
        let report = BatchReport::new(backend, started_at, elapsed, options.trials, tally);
        console.say("")?;
        console.say(serde_json::to_string_pretty(&report)?)?;
    }

    Ok(SessionEnd::Completed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fair_bit::FairBitSource;
    use shared::Bit;
    use simulator::{LocalSimulator, NoiseModel};
    use std::future::{pending, ready};
    use std::sync::Arc;

    fn options(trials: u32, json: bool, demo: bool) -> ExperimentOptions {
        ExperimentOptions {
            trials: RoundCount::new(trials).unwrap(),
            json,
            demo,
        }
    }

    async fn experiment(flip: &ForcedFlip, options: ExperimentOptions) -> (SessionEnd, String) {
        let mut console = Console::new(&b""[..], Vec::new());
        let mut guesses = FairBitSource::new(Some(99));
        let end = run(&mut console, &mut guesses, flip, options, pending::<()>())
            .await
            .unwrap();
        (end, String::from_utf8(console.into_output()).unwrap())
    }

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(Duration::from_micros(1_234_567)), "0:00:01.234567");
        assert_eq!(format_elapsed(Duration::from_secs(3723)), "1:02:03.000000");
    }

    #[tokio::test]
    async fn test_ideal_experiment_summary() {
        let flip = ForcedFlip::new(Arc::new(LocalSimulator::ideal(Some(1))));
        let (end, output) = experiment(&flip, options(1000, false, false)).await;

        assert_eq!(end, SessionEnd::Completed);
        assert!(output.contains("Using backend: local_simulator"));
        assert!(output.contains("Execution time: "));
        assert!(output.contains("Classical wins: 0 vs. Quantum wins: 1000"));
        assert!(output.contains("Quantum vs Classical Player: 1000 Coin Flips"));
        assert!(!output.contains("Noise is enabled"));
    }

    #[tokio::test]
    async fn test_noisy_experiment_with_report() {
        let noise = NoiseModel::new(0.05, 0.0).unwrap();
        let flip = ForcedFlip::new(Arc::new(LocalSimulator::with_noise(noise, Some(5))));
        let (end, output) = experiment(&flip, options(200, true, false)).await;

        assert_eq!(end, SessionEnd::Completed);
        assert!(output.contains("Noise is enabled"));

        let json_start = output.find('{').unwrap();
        let report: serde_json::Value = serde_json::from_str(&output[json_start..]).unwrap();
        assert_eq!(report["rounds"], 200);
        let agree = report["tally"]["agree"].as_u64().unwrap();
        let disagree = report["tally"]["disagree"].as_u64().unwrap();
        assert_eq!(agree + disagree, 200);
        assert!(report["backend"].as_str().unwrap().starts_with("noisy_simulator"));
    }

    #[tokio::test]
    async fn test_demo_round() {
        let flip = ForcedFlip::new(Arc::new(LocalSimulator::ideal(Some(1))));
        let mut console = Console::new(&b""[..], Vec::new());
        let mut guesses = || Bit::Heads;

        let end = run(&mut console, &mut guesses, &flip, options(3, false, true), pending::<()>())
            .await
            .unwrap();
        let output = String::from_utf8(console.into_output()).unwrap();

        assert_eq!(end, SessionEnd::Completed);
        assert!(output.contains("Classical guess: heads (0)"));
        assert!(output.contains("Quantum outcome: tails (1)"));
        assert!(output.contains("🎉 Quantum player wins!"));
        assert!(output.contains("Classical wins: 0 vs. Quantum wins: 3"));
    }

    #[tokio::test]
    async fn test_interrupted_experiment() {
        let flip = ForcedFlip::new(Arc::new(LocalSimulator::ideal(Some(1))));
        let mut console = Console::new(&b""[..], Vec::new());
        let mut guesses = FairBitSource::new(Some(1));

        let end = run(&mut console, &mut guesses, &flip, options(10, false, false), ready(()))
            .await
            .unwrap();
        let output = String::from_utf8(console.into_output()).unwrap();

        assert_eq!(end, SessionEnd::Interrupted);
        assert!(!output.contains("Classical wins:"));
    }
}
