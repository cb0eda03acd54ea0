//! Quantum coin simulator
//!
//! Circuit model, single-register state-vector simulator with an optional
//! noise model, a remote hardware backend, and the forced-outcome flip that
//! the quantum player uses.

pub mod backend;
pub mod circuit;
pub mod counts;
pub mod flip;
pub mod noise;
pub mod remote;
pub mod state_vector;

use shared::BackendError;
use std::sync::Arc;

pub use backend::{LocalSimulator, MeasurementBackend};
pub use circuit::{Circuit, Operation};
pub use counts::Counts;
pub use flip::{forced_flip_circuit, ForcedFlip};
pub use noise::NoiseModel;
pub use remote::{RemoteBackend, RemoteConfig};

/// Which measurement backend to build
#[derive(Debug, Clone, PartialEq)]
pub enum BackendSpec {
    Ideal,
    Noisy(NoiseModel),
    Remote(RemoteConfig),
}

/// Build the backend described by `selection`.
///
/// `seed` makes the local simulators reproducible; the remote backend ignores it.
pub async fn connect(
    selection: &BackendSpec,
    seed: Option<u64>,
) -> Result<Arc<dyn MeasurementBackend>, BackendError> {
    let backend: Arc<dyn MeasurementBackend> = match selection {
        BackendSpec::Ideal => Arc::new(LocalSimulator::ideal(seed)),
        BackendSpec::Noisy(noise) => Arc::new(LocalSimulator::with_noise(*noise, seed)),
        BackendSpec::Remote(config) => Arc::new(RemoteBackend::connect(config).await?),
    };

    tracing::info!(backend = %backend.name(), "Measurement backend ready");
    Ok(backend)
}
