//! Forced-outcome coin flip
//!
//! The quantum player puts the coin into superposition, then resets it and
//! steers it to the face opposite the classical guess before measuring:
//!
//! ```text
//! h q[0]; reset q[0]; x q[0] (only when the guess is heads); measure q[0] -> c[0];
//! ```
//!
//! On an ideal backend the result is always `guess.flipped()`. On a noisy
//! backend it usually is, and callers must tally both outcomes.

use shared::{BackendError, Bit, FLIP_SHOTS};
use std::sync::Arc;

use crate::backend::MeasurementBackend;
use crate::circuit::Circuit;

/// Build the single-qubit circuit that forces the face opposite `guess`
pub fn forced_flip_circuit(guess: Bit) -> Circuit {
    let mut circuit = Circuit::new(1, 1);
    circuit.h(0).reset(0);
    if guess == Bit::Heads {
        circuit.x(0);
    }
    circuit.measure(0, 0);
    circuit
}

/// Forced-outcome flip procedure bound to one backend
#[derive(Clone)]
pub struct ForcedFlip {
    backend: Arc<dyn MeasurementBackend>,
}

impl ForcedFlip {
    pub fn new(backend: Arc<dyn MeasurementBackend>) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &Arc<dyn MeasurementBackend> {
        &self.backend
    }

    /// Flip the quantum coin against `guess`.
    ///
    /// Backend failures and undecodable results are returned as errors; no
    /// default outcome is ever substituted.
    pub async fn flip(&self, guess: Bit) -> Result<Bit, BackendError> {
        let circuit = forced_flip_circuit(guess);
        let counts = self.backend.run(&circuit, FLIP_SHOTS).await?;
        let outcome = counts.single_bit(FLIP_SHOTS)?;

        tracing::trace!(
            backend = %self.backend.name(),
            guess = guess.as_u8(),
            outcome = outcome.as_u8(),
            "Forced flip measured"
        );

        Ok(outcome)
    }
}
