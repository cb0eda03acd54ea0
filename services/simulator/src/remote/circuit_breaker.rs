use shared::BackendError;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

#[derive(Clone)]
pub struct CircuitBreaker {
    failure_count: Arc<AtomicU64>,
    last_failure_time: Arc<RwLock<Option<Instant>>>,
    state: Arc<RwLock<CircuitState>>,
    failure_threshold: u64,
    reset_timeout: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CircuitState {
    Closed,
    Open,
    HalfOpen,
}

impl CircuitBreaker {
    pub fn new(failure_threshold: u64, reset_timeout: Duration) -> Self {
        Self {
            failure_count: Arc::new(AtomicU64::new(0)),
            last_failure_time: Arc::new(RwLock::new(None)),
            state: Arc::new(RwLock::new(CircuitState::Closed)),
            failure_threshold,
            reset_timeout,
        }
    }

    /// Fail fast while open; move to HalfOpen once the reset timeout has passed
    pub async fn check(&self) -> Result<(), BackendError> {
        let mut state = self.state.write().await;
        if *state != CircuitState::Open {
            return Ok(());
        }

        let last_failure = *self.last_failure_time.read().await;
        match last_failure {
            Some(last_time) if last_time.elapsed() > self.reset_timeout => {
                *state = CircuitState::HalfOpen;
                tracing::info!("Circuit breaker transitioning to HalfOpen");
                Ok(())
            }
            _ => Err(BackendError::CircuitOpen),
        }
    }

    pub async fn on_success(&self) {
        self.failure_count.store(0, Ordering::SeqCst);
        let mut state = self.state.write().await;
        if *state == CircuitState::HalfOpen {
            *state = CircuitState::Closed;
            tracing::info!("Circuit breaker closed after successful operation");
        }
    }

    pub async fn on_failure(&self) {
        let failures = self.failure_count.fetch_add(1, Ordering::SeqCst) + 1;
        *self.last_failure_time.write().await = Some(Instant::now());

        let mut state = self.state.write().await;
        if failures >= self.failure_threshold || *state == CircuitState::HalfOpen {
            if *state != CircuitState::Open {
                tracing::warn!("Circuit breaker opened after {} failures", failures);
            }
            *state = CircuitState::Open;
        }
    }

    pub async fn state(&self) -> CircuitState {
        *self.state.read().await
    }

    pub async fn is_open(&self) -> bool {
        self.state().await == CircuitState::Open
    }
}
