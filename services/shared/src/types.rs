/// Type-safe wrappers for game primitives
///
/// These types enforce validation at construction time so a round can never
/// be played with a guess outside {0, 1} or a batch with zero rounds.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::InputError;

/// One coin face: 0 is heads, 1 is tails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bit {
    Heads,
    Tails,
}

impl Bit {
    /// Numeric value of the face (heads = 0, tails = 1)
    pub fn as_u8(self) -> u8 {
        match self {
            Bit::Heads => 0,
            Bit::Tails => 1,
        }
    }

    /// The opposite face
    pub fn flipped(self) -> Self {
        match self {
            Bit::Heads => Bit::Tails,
            Bit::Tails => Bit::Heads,
        }
    }

    /// Parse a guess typed at the prompt.
    ///
    /// Only `"0"` and `"1"` are accepted; surrounding whitespace is ignored.
    pub fn parse_guess(token: &str) -> Result<Self, InputError> {
        match token.trim() {
            "0" => Ok(Bit::Heads),
            "1" => Ok(Bit::Tails),
            other => Err(InputError::InvalidGuess(other.to_string())),
        }
    }

    /// Parse a measured classical bit as reported by a backend (`"0"` or `"1"`).
    pub fn from_outcome_key(key: &str) -> Option<Self> {
        match key {
            "0" => Some(Bit::Heads),
            "1" => Some(Bit::Tails),
            _ => None,
        }
    }
}

impl TryFrom<u8> for Bit {
    type Error = InputError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Bit::Heads),
            1 => Ok(Bit::Tails),
            other => Err(InputError::InvalidGuess(other.to_string())),
        }
    }
}

impl From<bool> for Bit {
    /// `true` maps to tails (1), matching the measured value of the qubit.
    fn from(value: bool) -> Self {
        if value {
            Bit::Tails
        } else {
            Bit::Heads
        }
    }
}

impl fmt::Display for Bit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bit::Heads => write!(f, "heads (0)"),
            Bit::Tails => write!(f, "tails (1)"),
        }
    }
}

/// Outcome of one round: the guess and what the coin showed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundResult {
    pub guess: Bit,
    pub outcome: Bit,
}

impl RoundResult {
    pub fn new(guess: Bit, outcome: Bit) -> Self {
        Self { guess, outcome }
    }

    pub fn agreed(&self) -> bool {
        self.guess == self.outcome
    }
}

/// Agree / disagree counters over a sequence of rounds
///
/// Counters only ever increase; `rounds()` is always their sum.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    agree: u64,
    disagree: u64,
}

impl Tally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one round into the tally
    pub fn record(&mut self, round: &RoundResult) {
        if round.agreed() {
            self.agree += 1;
        } else {
            self.disagree += 1;
        }
    }

    pub fn agree(&self) -> u64 {
        self.agree
    }

    pub fn disagree(&self) -> u64 {
        self.disagree
    }

    pub fn rounds(&self) -> u64 {
        self.agree + self.disagree
    }

    /// Share of agreeing rounds in percent (0.0 before any round)
    pub fn percent_agree(&self) -> f64 {
        percent(self.agree, self.rounds())
    }

    /// Share of disagreeing rounds in percent (0.0 before any round)
    pub fn percent_disagree(&self) -> f64 {
        percent(self.disagree, self.rounds())
    }
}

fn percent(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 * 100.0 / total as f64
    }
}

/// Validated number of rounds for a batch (always at least 1)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoundCount(u32);

impl RoundCount {
    /// Create a RoundCount, rejecting zero
    pub fn new(rounds: u32) -> Result<Self, InputError> {
        if rounds == 0 {
            return Err(InputError::InvalidRoundCount(rounds.to_string()));
        }
        Ok(Self(rounds))
    }

    /// Parse a round count typed at the prompt.
    ///
    /// Non-integers, negatives and zero are all rejected.
    pub fn parse(token: &str) -> Result<Self, InputError> {
        let trimmed = token.trim();
        let rounds: u32 = trimmed
            .parse()
            .map_err(|_| InputError::InvalidRoundCount(trimmed.to_string()))?;
        Self::new(rounds)
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for RoundCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
