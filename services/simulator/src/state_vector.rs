//! State-vector bookkeeping for small registers
//!
//! H, X and reset keep every amplitude real, so amplitudes are stored as
//! `f64`. Basis index bit `q` holds the value of qubit `q`.

use rand::Rng;
use shared::{BackendError, MAX_SIMULATED_QUBITS};
use std::f64::consts::FRAC_1_SQRT_2;

const NORM_EPSILON: f64 = 1e-12;

#[derive(Debug, Clone, PartialEq)]
pub struct StateVector {
    num_qubits: usize,
    amplitudes: Vec<f64>,
}

impl StateVector {
    /// All qubits in |0>
    pub fn new(num_qubits: usize) -> Result<Self, BackendError> {
        if num_qubits == 0 || num_qubits > MAX_SIMULATED_QUBITS {
            return Err(BackendError::Misconfigured(format!(
                "cannot simulate {} qubits",
                num_qubits
            )));
        }
        let mut amplitudes = vec![0.0; 1 << num_qubits];
        amplitudes[0] = 1.0;
        Ok(Self {
            num_qubits,
            amplitudes,
        })
    }

    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    pub fn amplitudes(&self) -> &[f64] {
        &self.amplitudes
    }

    pub fn apply_h(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                let j = i | mask;
                let (a, b) = (self.amplitudes[i], self.amplitudes[j]);
                self.amplitudes[i] = (a + b) * FRAC_1_SQRT_2;
                self.amplitudes[j] = (a - b) * FRAC_1_SQRT_2;
            }
        }
    }

    pub fn apply_x(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                self.amplitudes.swap(i, i | mask);
            }
        }
    }

    /// Probability of reading 1 on `qubit`
    pub fn probability_one(&self, qubit: usize) -> f64 {
        let mask = 1 << qubit;
        self.amplitudes
            .iter()
            .enumerate()
            .filter(|(i, _)| i & mask != 0)
            .map(|(_, a)| a * a)
            .sum()
    }

    /// Sample `qubit` and collapse the state onto the sampled branch
    pub fn measure<R: Rng>(&mut self, qubit: usize, rng: &mut R) -> Result<bool, BackendError> {
        let p_one = self.probability_one(qubit);
        // Basis states must read deterministically despite rounding in the amplitudes.
        let outcome = if p_one <= NORM_EPSILON {
            false
        } else if p_one >= 1.0 - NORM_EPSILON {
            true
        } else {
            rng.gen::<f64>() < p_one
        };
        self.collapse(qubit, outcome)?;
        Ok(outcome)
    }

    /// Reset `qubit` to |0>: measure, then flip back if it read 1
    pub fn reset<R: Rng>(&mut self, qubit: usize, rng: &mut R) -> Result<(), BackendError> {
        if self.measure(qubit, rng)? {
            self.apply_x(qubit);
        }
        Ok(())
    }

    fn collapse(&mut self, qubit: usize, outcome: bool) -> Result<(), BackendError> {
        let mask = 1 << qubit;
        let mut norm_sq = 0.0;
        for (i, amplitude) in self.amplitudes.iter_mut().enumerate() {
            if (i & mask != 0) == outcome {
                norm_sq += *amplitude * *amplitude;
            } else {
                *amplitude = 0.0;
            }
        }

        if norm_sq < NORM_EPSILON {
            return Err(BackendError::Internal(format!(
                "collapsed qubit {} onto a zero-probability branch",
                qubit
            )));
        }

        let norm = norm_sq.sqrt();
        for amplitude in &mut self.amplitudes {
            *amplitude /= norm;
        }
        Ok(())
    }
}
