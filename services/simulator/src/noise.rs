//! Noise model for the local simulator
//!
//! Two independent bit-flip channels:
//! - `gate_error`: probability that an X error follows each H or X gate
//! - `readout_error`: probability that a measured bit is reported flipped
//!
//! Reset is treated as noiseless, so on the forced flip circuit only the
//! conditional X and the readout can disturb the result.

use rand::Rng;
use serde::{Deserialize, Serialize};
use shared::{BackendError, DEFAULT_GATE_ERROR, DEFAULT_READOUT_ERROR};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoiseModel {
    readout_error: f64,
    gate_error: f64,
}

impl NoiseModel {
    /// Create a noise model, rejecting probabilities outside [0, 1]
    pub fn new(readout_error: f64, gate_error: f64) -> Result<Self, BackendError> {
        for (name, p) in [("readout_error", readout_error), ("gate_error", gate_error)] {
            if !(0.0..=1.0).contains(&p) {
                return Err(BackendError::Misconfigured(format!(
                    "{} must be a probability in [0, 1], got {}",
                    name, p
                )));
            }
        }
        Ok(Self {
            readout_error,
            gate_error,
        })
    }

    /// No noise at all
    pub fn ideal() -> Self {
        Self {
            readout_error: 0.0,
            gate_error: 0.0,
        }
    }

    pub fn readout_error(&self) -> f64 {
        self.readout_error
    }

    pub fn gate_error(&self) -> f64 {
        self.gate_error
    }

    pub fn is_ideal(&self) -> bool {
        self.readout_error == 0.0 && self.gate_error == 0.0
    }

    /// Whether a gate error strikes after this gate
    pub fn gate_fault<R: Rng>(&self, rng: &mut R) -> bool {
        self.gate_error > 0.0 && rng.gen_bool(self.gate_error)
    }

    /// Apply the readout channel to a measured bit
    pub fn read<R: Rng>(&self, measured: bool, rng: &mut R) -> bool {
        if self.readout_error > 0.0 && rng.gen_bool(self.readout_error) {
            !measured
        } else {
            measured
        }
    }
}

impl Default for NoiseModel {
    fn default() -> Self {
        Self {
            readout_error: DEFAULT_READOUT_ERROR,
            gate_error: DEFAULT_GATE_ERROR,
        }
    }
}
