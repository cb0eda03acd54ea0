/// Shared constants for the coin flip games
///
/// This module centralizes the defaults used by the simulator, the remote
/// hardware client and the game binary so the three crates agree on them.

/// Trials run by `coinflip experiment` when neither flag nor env sets a count.
pub const DEFAULT_EXPERIMENT_TRIALS: u32 = 1000;

/// Shots requested for a single forced flip.
///
/// The flip decodes exactly one outcome, so any other value is a bug.
pub const FLIP_SHOTS: u32 = 1;

/// Default probability that the noisy simulator reports the wrong bit.
pub const DEFAULT_READOUT_ERROR: f64 = 0.05;

/// Default probability of an X error after each H/X gate in the noisy simulator.
pub const DEFAULT_GATE_ERROR: f64 = 0.0;

/// Largest register the state-vector simulator accepts (2^16 amplitudes).
pub const MAX_SIMULATED_QUBITS: usize = 16;

/// Device name that asks the remote service client to pick the least busy device.
pub const LEAST_BUSY_DEVICE: &str = "least_busy";

/// Request timeout for the remote hardware service
pub const DEFAULT_REMOTE_TIMEOUT_SECS: u64 = 30;

/// Retry attempts for transient remote failures
pub const DEFAULT_REMOTE_MAX_RETRIES: u32 = 3;

/// Consecutive remote failures before the circuit breaker opens.
pub const REMOTE_FAILURE_THRESHOLD: u64 = 5;

/// Seconds an open circuit breaker waits before letting a probe through.
pub const REMOTE_RESET_TIMEOUT_SECS: u64 = 60;

/// Headroom above the round count on the chart's y-axis (5%).
pub const CHART_HEADROOM: f64 = 0.05;

/// Rows used for the tallest possible bar in the text chart.
pub const CHART_HEIGHT: usize = 12;
