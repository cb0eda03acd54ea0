//! Wording and scoring for each game variant

use shared::{RoundResult, Tally};

use crate::chart::{Bar, BarChart};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRules {
    pub title: &'static str,
    pub instructions: &'static str,
    /// Prefix for the outcome line, e.g. "The coin landed on"
    pub outcome_prefix: &'static str,
    pub agree_verdict: &'static str,
    pub disagree_verdict: &'static str,
    pub agree_label: &'static str,
    pub disagree_label: &'static str,
    /// Chart the disagree bar first
    pub disagree_first: bool,
}

impl GameRules {
    /// You against a fair coin: you win when the coin matches your guess
    pub fn classical() -> Self {
        Self {
            title: "🪙 Classical Coin Flip Game 🪙",
            instructions: "Enter '0' for heads, '1' for tails, or 'exit' to quit.",
            outcome_prefix: "The coin landed on",
            agree_verdict: "🎉 You win!",
            disagree_verdict: "🙂 Computer wins!",
            agree_label: "You",
            disagree_label: "Computer",
            disagree_first: false,
        }
    }

    /// You against the quantum player, who wins whenever the outcome differs
    pub fn quantum() -> Self {
        Self {
            title: "🔮 Quantum Coin Flip Game 🔮",
            instructions: "Enter '0' for heads, '1' for tails, or 'exit' to quit.",
            outcome_prefix: "Quantum coin result",
            agree_verdict: "🙂 Classical player wins!",
            disagree_verdict: "🎉 Quantum player wins!",
            agree_label: "Classical Player Wins",
            disagree_label: "Quantum Player Wins",
            disagree_first: true,
        }
    }

    pub fn battle() -> Self {
        Self {
            title: "🪙 Classical Coin Flip Battle 🪙",
            instructions: "Enter how many rounds to simulate, or 'exit' to quit.",
            outcome_prefix: "The coin landed on",
            agree_verdict: "🎉 Player wins!",
            disagree_verdict: "🙂 House wins!",
            agree_label: "Player wins",
            disagree_label: "House wins",
            disagree_first: false,
        }
    }

    pub fn experiment() -> Self {
        Self {
            title: "🔮 Quantum vs Classical Experiment 🔮",
            ..Self::quantum()
        }
    }

    pub fn verdict(&self, round: &RoundResult) -> &'static str {
        if round.agreed() {
            self.agree_verdict
        } else {
            self.disagree_verdict
        }
    }

    pub fn chart(&self, title: impl Into<String>, tally: &Tally) -> BarChart {
        let agree = Bar::new(self.agree_label, tally.agree());
        let disagree = Bar::new(self.disagree_label, tally.disagree());
        let bars = if self.disagree_first {
            vec![disagree, agree]
        } else {
            vec![agree, disagree]
        };
        BarChart::new(title, "Number of Wins", bars, tally.rounds())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::Bit;

    #[test]
    fn test_verdicts() {
        let quantum = GameRules::quantum();
        let classical = GameRules::classical();
        let agreed = RoundResult::new(Bit::Heads, Bit::Heads);
        let disagreed = RoundResult::new(Bit::Heads, Bit::Tails);

        assert_eq!(quantum.verdict(&disagreed), "🎉 Quantum player wins!");
        assert_eq!(quantum.verdict(&agreed), "🙂 Classical player wins!");
        assert_eq!(classical.verdict(&agreed), "🎉 You win!");
        assert_eq!(classical.verdict(&disagreed), "🙂 Computer wins!");
    }

    #[test]
    fn test_chart_bar_order() {
        let mut tally = Tally::new();
        tally.record(&RoundResult::new(Bit::Heads, Bit::Tails));

        let chart = GameRules::experiment().chart("Quantum vs Classical", &tally);
        assert_eq!(chart.bars()[0].label, "Quantum Player Wins");
        assert_eq!(chart.bars()[0].value, 1);

        let chart = GameRules::battle().chart("Player vs House", &tally);
        assert_eq!(chart.bars()[0].label, "Player wins");
        assert_eq!(chart.bars()[0].value, 0);
    }
}
