//! Interactive guess-by-guess game loop

use shared::{BackendError, Bit, ErrorCategory, InputError, RoundResult, Tally};
use std::future::Future;
use std::io::{self, Write};
use tokio::io::AsyncBufRead;

use crate::console::{is_exit_request, or_interrupt, Console, Prompted};
use crate::game::GameRules;
use crate::opponent::Opponent;

const GUESS_PROMPT: &str = "\nYour guess [0/1 or 'exit']: ";
pub const FAREWELL: &str = "👋 Thanks for playing! Goodbye.";
pub const INTERRUPTED: &str = "\n\n✋ Interrupted. Goodbye.";
pub const INVALID_GUESS: &str = "⚠️  Invalid input. Please enter 0, 1, or 'exit'.";

/// How a session, battle or experiment ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEnd {
    /// The user typed exit or quit
    Exited,
    /// Input closed
    EndOfInput,
    /// Ctrl+C
    Interrupted,
    /// A batch ran to completion
    Completed,
    /// Fail-stop on an unexpected error
    Failed {
        category: ErrorCategory,
        message: String,
    },
}

impl SessionEnd {
    pub fn failed(error: &BackendError) -> Self {
        SessionEnd::Failed {
            category: error.category(),
            message: error.to_string(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            SessionEnd::Failed { category, .. } => category.exit_code(),
            SessionEnd::Interrupted => ErrorCategory::Cancelled.exit_code(),
            SessionEnd::Exited | SessionEnd::EndOfInput | SessionEnd::Completed => 0,
        }
    }
}

/// One line of session input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuessCommand {
    Guess(Bit),
    Exit,
    Invalid(InputError),
}

impl GuessCommand {
    pub fn parse(line: &str) -> Self {
        if is_exit_request(line) {
            return GuessCommand::Exit;
        }
        match Bit::parse_guess(line) {
            Ok(bit) => GuessCommand::Guess(bit),
            Err(e) => GuessCommand::Invalid(e),
        }
    }
}

pub struct Session<'a, O: Opponent + ?Sized> {
    rules: GameRules,
    opponent: &'a O,
    tally: Tally,
}

impl<'a, O: Opponent + ?Sized> Session<'a, O> {
    pub fn new(rules: GameRules, opponent: &'a O) -> Self {
        Self {
            rules,
            opponent,
            tally: Tally::new(),
        }
    }

    pub fn tally(&self) -> Tally {
        self.tally
    }

    async fn play_round(&self, guess: Bit) -> Result<RoundResult, BackendError> {
        let outcome = self.opponent.resolve(guess).await?;
        Ok(RoundResult::new(guess, outcome))
    }

    /// Drive the session until exit, end of input, interrupt or a failed round
    pub async fn run<R, W, I>(
        &mut self,
        console: &mut Console<R, W>,
        interrupt: I,
    ) -> io::Result<SessionEnd>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
        I: Future<Output = ()>,
    {
        tokio::pin!(interrupt);

        console.say(self.rules.title)?;
        console.say(self.rules.instructions)?;

        let end = loop {
            let line = match console.prompt(GUESS_PROMPT, &mut interrupt).await? {
                Prompted::Line(line) => line,
                Prompted::EndOfInput => {
                    console.say(format!("\n{}", FAREWELL))?;
                    break SessionEnd::EndOfInput;
                }
                Prompted::Interrupted => {
                    console.say(INTERRUPTED)?;
                    break SessionEnd::Interrupted;
                }
            };

            let guess = match GuessCommand::parse(&line) {
                GuessCommand::Guess(guess) => guess,
                GuessCommand::Exit => {
                    console.say(FAREWELL)?;
                    break SessionEnd::Exited;
                }
                GuessCommand::Invalid(e) => {
                    tracing::debug!(code = %e.code(), input = %line.trim(), "Rejected guess");
                    console.say(INVALID_GUESS)?;
                    continue;
                }
            };

            // An interrupt discards the in-flight round.
            let round = match or_interrupt(self.play_round(guess), &mut interrupt).await {
                Some(round) => round,
                None => {
                    console.say(INTERRUPTED)?;
                    break SessionEnd::Interrupted;
                }
            };

            match round {
                Ok(round) => {
                    self.tally.record(&round);
                    metrics::counter!("coinflip_rounds_total").increment(1);
                    console.say(format!("🎲 {}: {}", self.rules.outcome_prefix, round.outcome))?;
                    console.say(self.rules.verdict(&round))?;
                }
                Err(e) => {
                    metrics::counter!("coinflip_backend_errors_total").increment(1);
                    tracing::error!(error = %e, code = %e.code(), "Round failed");
                    console.say(format!("⚠️  Unexpected error: {}", e))?;
                    break SessionEnd::failed(&e);
                }
            }
        };

        if self.tally.rounds() > 0 {
            console.say(format!(
                "Rounds played: {} ({}: {}, {}: {})",
                self.tally.rounds(),
                self.rules.agree_label,
                self.tally.agree(),
                self.rules.disagree_label,
                self.tally.disagree()
            ))?;
        }

        tracing::info!(
            end = ?end,
            agree = self.tally.agree(),
            disagree = self.tally.disagree(),
            "Session finished"
        );
        Ok(end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opponent::FairCoin;
    use async_trait::async_trait;
    use simulator::{ForcedFlip, LocalSimulator};
    use std::future::{pending, ready};
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    fn ideal_flip() -> ForcedFlip {
        ForcedFlip::new(Arc::new(LocalSimulator::ideal(Some(9))))
    }

    async fn play<O: Opponent + ?Sized>(
        rules: GameRules,
        opponent: &O,
        input: &str,
    ) -> (SessionEnd, Tally, String) {
        let mut console = Console::new(input.as_bytes(), Vec::new());
        let mut session = Session::new(rules, opponent);
        let end = session.run(&mut console, pending::<()>()).await.unwrap();
        let output = String::from_utf8(console.into_output()).unwrap();
        (end, session.tally(), output)
    }

    struct BrokenBackend {
        calls: AtomicU32,
    }

    #[async_trait]
    impl Opponent for BrokenBackend {
        fn describe(&self) -> String {
            "broken".to_string()
        }

        async fn resolve(&self, _guess: Bit) -> Result<Bit, BackendError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(BackendError::AmbiguousResult { outcomes: 2 })
        }
    }

    struct StalledBackend;

    #[async_trait]
    impl Opponent for StalledBackend {
        fn describe(&self) -> String {
            "stalled".to_string()
        }

        async fn resolve(&self, _guess: Bit) -> Result<Bit, BackendError> {
            pending().await
        }
    }

    #[test]
    fn test_command_normalization() {
        assert_eq!(GuessCommand::parse(" EXIT \n"), GuessCommand::Exit);
        assert_eq!(GuessCommand::parse("exit"), GuessCommand::Exit);
        assert_eq!(GuessCommand::parse("Quit"), GuessCommand::Exit);
        assert_eq!(GuessCommand::parse(" 0 "), GuessCommand::Guess(Bit::Heads));
        assert_eq!(GuessCommand::parse("1\n"), GuessCommand::Guess(Bit::Tails));

        for input in ["2", "", "yes"] {
            assert!(
                matches!(GuessCommand::parse(input), GuessCommand::Invalid(_)),
                "{:?} should be invalid",
                input
            );
        }
    }

    #[tokio::test]
    async fn test_quantum_session_always_complements() {
        let flip = ideal_flip();
        let (end, tally, output) = play(GameRules::quantum(), &flip, "0\n1\n0\nexit\n").await;

        assert_eq!(end, SessionEnd::Exited);
        assert_eq!(tally.agree(), 0);
        assert_eq!(tally.disagree(), 3);

        // Outcome lines follow the prompt on the same line.
        let outcomes: Vec<&str> = output
            .lines()
            .filter_map(|line| line.find("🎲").map(|start| &line[start..]))
            .collect();
        assert_eq!(
            outcomes,
            vec![
                "🎲 Quantum coin result: tails (1)",
                "🎲 Quantum coin result: heads (0)",
                "🎲 Quantum coin result: tails (1)",
            ]
        );
        assert_eq!(output.matches("🎉 Quantum player wins!").count(), 3);
        assert!(!output.contains("Classical player wins!"));
        assert!(output.contains(FAREWELL));
    }

    #[tokio::test]
    async fn test_invalid_input_changes_nothing() {
        let flip = ideal_flip();
        let (end, tally, output) = play(GameRules::quantum(), &flip, "2\n\nyes\n Quit \n").await;

        assert_eq!(end, SessionEnd::Exited);
        assert_eq!(tally.rounds(), 0);
        assert_eq!(output.matches(INVALID_GUESS).count(), 3);
        assert!(!output.contains("Rounds played"));
    }

    #[tokio::test]
    async fn test_classical_session_tallies_every_round() {
        let coin = FairCoin::new(Some(77));
        let (end, tally, output) = play(GameRules::classical(), &coin, "0\n1\n1\n0\n1\nexit\n").await;

        assert_eq!(end, SessionEnd::Exited);
        assert_eq!(tally.rounds(), 5);
        let verdicts = output.matches("🎉 You win!").count() + output.matches("🙂 Computer wins!").count();
        assert_eq!(verdicts, 5);
        assert_eq!(output.matches("🎲 The coin landed on").count(), 5);
        assert!(output.contains("Rounds played: 5"));
    }

    #[tokio::test]
    async fn test_end_of_input_terminates() {
        let flip = ideal_flip();
        let (end, tally, _) = play(GameRules::quantum(), &flip, "1\n").await;
        assert_eq!(end, SessionEnd::EndOfInput);
        assert_eq!(tally.disagree(), 1);
        assert_eq!(end.exit_code(), 0);
    }

    #[tokio::test]
    async fn test_backend_error_is_fail_stop() {
        let broken = BrokenBackend {
            calls: AtomicU32::new(0),
        };
        let (end, tally, output) = play(GameRules::quantum(), &broken, "1\n0\nexit\n").await;

        assert_eq!(end, SessionEnd::failed(&BackendError::AmbiguousResult { outcomes: 2 }));
        assert!(matches!(
            end,
            SessionEnd::Failed {
                category: ErrorCategory::Backend,
                ..
            }
        ));
        assert_eq!(end.exit_code(), 1);
        assert_eq!(broken.calls.load(Ordering::SeqCst), 1);
        assert_eq!(tally.rounds(), 0);
        assert!(output.contains("⚠️  Unexpected error:"));
        assert!(!output.contains(FAREWELL));
    }

    #[tokio::test]
    async fn test_interrupt_before_input() {
        let flip = ideal_flip();
        let mut console = Console::new("0\n".as_bytes(), Vec::new());
        let mut session = Session::new(GameRules::quantum(), &flip);

        let end = session.run(&mut console, ready(())).await.unwrap();
        let output = String::from_utf8(console.into_output()).unwrap();

        assert_eq!(end, SessionEnd::Interrupted);
        assert_eq!(end.exit_code(), 0);
        assert_eq!(session.tally().rounds(), 0);
        assert!(output.contains("✋ Interrupted. Goodbye."));
    }

    #[tokio::test]
    async fn test_interrupt_discards_in_flight_round() {
        let mut console = Console::new("0\n".as_bytes(), Vec::new());
        let mut session = Session::new(GameRules::quantum(), &StalledBackend);

        let interrupt = tokio::time::sleep(Duration::from_millis(20));
        let end = session.run(&mut console, interrupt).await.unwrap();

        assert_eq!(end, SessionEnd::Interrupted);
        assert_eq!(session.tally().rounds(), 0);
    }
}
