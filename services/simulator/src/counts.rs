//! Measurement histograms

use serde::{Deserialize, Serialize};
use shared::{BackendError, Bit};
use std::collections::BTreeMap;

/// Outcome histogram keyed by classical-register bitstring
///
/// The highest classical bit is the leftmost character, so a one-bit register
/// yields the keys `"0"` and `"1"`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Counts(BTreeMap<String, u32>);

impl Counts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, outcome: impl Into<String>) {
        *self.0.entry(outcome.into()).or_insert(0) += 1;
    }

    pub fn get(&self, outcome: &str) -> u32 {
        self.0.get(outcome).copied().unwrap_or(0)
    }

    pub fn total_shots(&self) -> u32 {
        self.0.values().sum()
    }

    /// Outcomes that were observed at least once
    pub fn observed(&self) -> impl Iterator<Item = (&str, u32)> {
        self.0
            .iter()
            .filter(|(_, count)| **count > 0)
            .map(|(key, count)| (key.as_str(), *count))
    }

    /// Decode the result of a single-bit run of `shots` shots into one bit.
    ///
    /// Exactly one distinct outcome must have been observed, on every shot,
    /// and its key must be `"0"` or `"1"`.
    pub fn single_bit(&self, shots: u32) -> Result<Bit, BackendError> {
        let observed: Vec<(&str, u32)> = self.observed().collect();
        let (key, count) = match observed.as_slice() {
            [] => return Err(BackendError::EmptyResult),
            [single] => *single,
            many => {
                return Err(BackendError::AmbiguousResult {
                    outcomes: many.len(),
                })
            }
        };

        if count != shots {
            return Err(BackendError::UnexpectedShots {
                expected: shots,
                actual: count,
            });
        }

        Bit::from_outcome_key(key).ok_or_else(|| BackendError::InvalidOutcome(key.to_string()))
    }
}

impl FromIterator<(String, u32)> for Counts {
    fn from_iter<I: IntoIterator<Item = (String, u32)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
