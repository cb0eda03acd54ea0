//! Repeated classical batches: random call against a fair coin

use shared::RoundCount;
use std::future::Future;
use std::io::{self, Write};
use tokio::io::AsyncBufRead;

use crate::batch_runner::run_batch;
use crate::console::{is_exit_request, or_interrupt, Console, Prompted};
use crate::fair_bit::BitSource;
use crate::game::GameRules;
use crate::opponent::Opponent;
use crate::session::{SessionEnd, INTERRUPTED};

const ROUNDS_PROMPT: &str = "\nNumber of rounds: ";
const AGAIN_PROMPT: &str = "Run another battle? [Y/n]: ";
const GOODBYE: &str = "👋 Goodbye.";
pub const INVALID_ROUNDS: &str = "⚠️  Please enter a positive integer or 'exit'.";

pub async fn run<R, W, G, O, I>(
    console: &mut Console<R, W>,
    calls: &mut G,
    coin: &O,
    interrupt: I,
) -> io::Result<SessionEnd>
where
    R: AsyncBufRead + Unpin,
    W: Write,
    G: BitSource + ?Sized,
    O: Opponent + ?Sized,
    I: Future<Output = ()>,
{
    tokio::pin!(interrupt);
    let rules = GameRules::battle();

    console.say(rules.title)?;
    console.say(rules.instructions)?;

    loop {
        let line = match console.prompt(ROUNDS_PROMPT, &mut interrupt).await? {
            Prompted::Line(line) => line,
            Prompted::EndOfInput => {
                console.say(format!("\n{}", GOODBYE))?;
                return Ok(SessionEnd::EndOfInput);
            }
            Prompted::Interrupted => {
                console.say(INTERRUPTED)?;
                return Ok(SessionEnd::Interrupted);
            }
        };

        if is_exit_request(&line) {
            console.say(GOODBYE)?;
            return Ok(SessionEnd::Exited);
        }

        let rounds = match RoundCount::parse(&line) {
            Ok(rounds) => rounds,
            Err(e) => {
                tracing::debug!(code = %e.code(), input = %line.trim(), "Rejected round count");
                console.say(INVALID_ROUNDS)?;
                continue;
            }
        };

        let tally = match or_interrupt(run_batch(rounds, &mut *calls, coin), &mut interrupt).await {
            None => {
                console.say(INTERRUPTED)?;
                return Ok(SessionEnd::Interrupted);
            }
            Some(Err(e)) => {
                console.say(format!("⚠️  Unexpected error: {}", e))?;
                return Ok(SessionEnd::failed(&e));
            }
            Some(Ok(tally)) => tally,
        };

        console.say(format!("\nResults over {} rounds:", rounds))?;
        console.say(format!(
            "  Player wins: {} ({:.2}%)",
            tally.agree(),
            tally.percent_agree()
        ))?;
        console.say(format!(
            "  House wins : {} ({:.2}%)",
            tally.disagree(),
            tally.percent_disagree()
        ))?;
        console.say("")?;
        console.say(rules.chart(format!("Player vs House over {} Rounds", rounds), &tally))?;

        match console.prompt(AGAIN_PROMPT, &mut interrupt).await? {
            Prompted::Line(answer) => {
                let answer = answer.trim().to_ascii_lowercase();
                if answer == "n" || answer == "no" {
                    console.say(GOODBYE)?;
                    return Ok(SessionEnd::Exited);
                }
            }
            Prompted::EndOfInput => {
                console.say(format!("\n{}", GOODBYE))?;
                return Ok(SessionEnd::EndOfInput);
            }
            Prompted::Interrupted => {
                console.say(INTERRUPTED)?;
                return Ok(SessionEnd::Interrupted);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fair_bit::FairBitSource;
    use crate::opponent::FairCoin;
    use async_trait::async_trait;
    use shared::{BackendError, Bit};
    use std::future::pending;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct CountingCoin {
        calls: AtomicU32,
    }

    #[async_trait]
    impl Opponent for CountingCoin {
        fn describe(&self) -> String {
            "counting".to_string()
        }

        async fn resolve(&self, guess: Bit) -> Result<Bit, BackendError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(guess)
        }
    }

    async fn battle<O: Opponent>(coin: &O, input: &str) -> (SessionEnd, String) {
        let mut console = Console::new(input.as_bytes(), Vec::new());
        let mut calls = FairBitSource::new(Some(8));
        let end = run(&mut console, &mut calls, coin, pending::<()>()).await.unwrap();
        (end, String::from_utf8(console.into_output()).unwrap())
    }

    #[tokio::test]
    async fn test_round_count_rejection() {
        let coin = CountingCoin {
            calls: AtomicU32::new(0),
        };
        let (end, output) = battle(&coin, "0\n-5\nabc\n10\nn\n").await;

        assert_eq!(end, SessionEnd::Exited);
        assert_eq!(output.matches(INVALID_ROUNDS).count(), 3);
        assert_eq!(coin.calls.load(Ordering::SeqCst), 10);
        assert!(output.contains("Results over 10 rounds:"));
        assert!(output.contains("  Player wins: 10 (100.00%)"));
        assert!(output.contains("  House wins : 0 (0.00%)"));
        assert!(output.contains("Player vs House over 10 Rounds"));
    }

    #[tokio::test]
    async fn test_another_battle_continues_until_no() {
        let coin = FairCoin::new(Some(3));
        let (end, output) = battle(&coin, "5\n\n7\nY\n3\nNo\n").await;

        assert_eq!(end, SessionEnd::Exited);
        assert!(output.contains("Results over 5 rounds:"));
        assert!(output.contains("Results over 7 rounds:"));
        assert!(output.contains("Results over 3 rounds:"));
        assert_eq!(output.matches("Run another battle? [Y/n]: ").count(), 3);
    }

    #[tokio::test]
    async fn test_exit_and_end_of_input() {
        let coin = FairCoin::new(Some(3));
        let (end, output) = battle(&coin, " QUIT\n").await;
        assert_eq!(end, SessionEnd::Exited);
        assert!(output.contains(GOODBYE));

        let (end, _) = battle(&coin, "4\n").await;
        assert_eq!(end, SessionEnd::EndOfInput);
    }
}
