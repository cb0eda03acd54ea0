//! Remote hardware service backend
//!
//! Circuits are shipped as OpenQASM 2.0 to an HTTP service that runs them on
//! real (noisy) hardware and returns counts.

mod backend;
mod circuit_breaker;
mod client;
mod retry_strategy;

pub use backend::{RemoteBackend, RemoteConfig};
pub use circuit_breaker::{CircuitBreaker, CircuitState};
pub use client::{select_least_busy, DeviceInfo, HardwareClient, JobRequest, JobResponse, JobUsage};
pub use retry_strategy::RetryStrategy;
