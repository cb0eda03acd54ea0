//! Measurement backends
//!
//! `MeasurementBackend` is the one seam between the games and whatever
//! executes circuits: the local state-vector simulator (with or without
//! noise) or a remote hardware service.

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::SeedableRng;
use shared::BackendError;
use tokio::sync::Mutex;

use crate::circuit::{Circuit, Operation};
use crate::counts::Counts;
use crate::noise::NoiseModel;
use crate::state_vector::StateVector;

/// Something that can execute a circuit and report a measurement histogram
#[async_trait]
pub trait MeasurementBackend: Send + Sync {
    /// Name shown in logs and reports
    fn name(&self) -> String;

    /// Whether a noiseless forced flip always returns the complement of the guess
    fn is_ideal(&self) -> bool;

    /// Execute `circuit` `shots` times
    async fn run(&self, circuit: &Circuit, shots: u32) -> Result<Counts, BackendError>;
}

/// Local state-vector simulator
///
/// The RNG is the only mutable state and sits behind an async mutex, so the
/// backend can be shared read-only between callers.
pub struct LocalSimulator {
    noise: NoiseModel,
    rng: Mutex<StdRng>,
}

impl LocalSimulator {
    /// Noiseless simulator
    pub fn ideal(seed: Option<u64>) -> Self {
        Self::with_noise(NoiseModel::ideal(), seed)
    }

    /// Simulator with the given noise model
    pub fn with_noise(noise: NoiseModel, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            noise,
            rng: Mutex::new(rng),
        }
    }

    fn run_shot(
        &self,
        circuit: &Circuit,
        rng: &mut StdRng,
    ) -> Result<String, BackendError> {
        let mut state = StateVector::new(circuit.num_qubits())?;
        let mut register = vec![false; circuit.num_clbits()];

        for op in circuit.operations() {
            match *op {
                Operation::H { qubit } => {
                    state.apply_h(qubit);
                    if self.noise.gate_fault(rng) {
                        state.apply_x(qubit);
                    }
                }
                Operation::X { qubit } => {
                    state.apply_x(qubit);
                    if self.noise.gate_fault(rng) {
                        state.apply_x(qubit);
                    }
                }
                Operation::Reset { qubit } => state.reset(qubit, rng)?,
                Operation::Measure { qubit, clbit } => {
                    let measured = state.measure(qubit, rng)?;
                    register[clbit] = self.noise.read(measured, rng);
                }
            }
        }

        Ok(register
            .iter()
            .rev()
            .map(|bit| if *bit { '1' } else { '0' })
            .collect())
    }
}

#[async_trait]
impl MeasurementBackend for LocalSimulator {
    fn name(&self) -> String {
        if self.noise.is_ideal() {
            "local_simulator".to_string()
        } else {
            format!(
                "noisy_simulator(readout_error={}, gate_error={})",
                self.noise.readout_error(),
                self.noise.gate_error()
            )
        }
    }

    fn is_ideal(&self) -> bool {
        self.noise.is_ideal()
    }

    async fn run(&self, circuit: &Circuit, shots: u32) -> Result<Counts, BackendError> {
        circuit.validate()?;
        if shots == 0 {
            return Err(BackendError::Misconfigured("shots must be positive".to_string()));
        }

        let mut rng = self.rng.lock().await;
        let mut counts = Counts::new();
        for _ in 0..shots {
            counts.record(self.run_shot(circuit, &mut rng)?);
        }

        tracing::trace!(
            backend = %self.name(),
            shots,
            distinct_outcomes = counts.observed().count(),
            "Circuit executed"
        );

        Ok(counts)
    }
}
