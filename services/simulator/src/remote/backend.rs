//! Remote hardware backend
//!
//! Wraps `HardwareClient` with retry on transient failures and a circuit
//! breaker so a dead service fails fast instead of stalling every round.

use async_trait::async_trait;
use backoff::backoff::Backoff;
use shared::{
    BackendError, DEFAULT_REMOTE_MAX_RETRIES, DEFAULT_REMOTE_TIMEOUT_SECS, LEAST_BUSY_DEVICE,
    REMOTE_FAILURE_THRESHOLD, REMOTE_RESET_TIMEOUT_SECS,
};
use std::time::Duration;

use super::circuit_breaker::CircuitBreaker;
use super::client::{select_least_busy, HardwareClient, JobRequest, JobResponse};
use super::retry_strategy::RetryStrategy;
use crate::backend::MeasurementBackend;
use crate::circuit::Circuit;
use crate::counts::Counts;

#[derive(Debug, Clone, PartialEq)]
pub struct RemoteConfig {
    pub base_url: String,
    pub token: Option<String>,
    pub device: String,
    pub timeout: Duration,
    pub max_retries: u32,
}

impl RemoteConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            device: LEAST_BUSY_DEVICE.to_string(),
            timeout: Duration::from_secs(DEFAULT_REMOTE_TIMEOUT_SECS),
            max_retries: DEFAULT_REMOTE_MAX_RETRIES,
        }
    }
}

pub struct RemoteBackend {
    client: HardwareClient,
    device: String,
    retry_strategy: RetryStrategy,
    circuit_breaker: CircuitBreaker,
}

impl RemoteBackend {
    pub fn new(client: HardwareClient, device: String, retry_strategy: RetryStrategy) -> Self {
        Self {
            client,
            device,
            retry_strategy,
            circuit_breaker: CircuitBreaker::new(
                REMOTE_FAILURE_THRESHOLD,
                Duration::from_secs(REMOTE_RESET_TIMEOUT_SECS),
            ),
        }
    }

    /// Build the client and resolve `least_busy` to a concrete device
    pub async fn connect(config: &RemoteConfig) -> Result<Self, BackendError> {
        let client = HardwareClient::new(&config.base_url, config.token.clone(), config.timeout)?;

        let device = if config.device == LEAST_BUSY_DEVICE {
            let devices = client.list_devices().await?;
            select_least_busy(&devices)
                .map(|device| device.name.clone())
                .ok_or_else(|| {
                    BackendError::Misconfigured(format!(
                        "no operational hardware device at {}",
                        client.base_url()
                    ))
                })?
        } else {
            config.device.clone()
        };

        tracing::info!(
            device = %device,
            base_url = %client.base_url(),
            "Remote hardware backend selected"
        );

        Ok(Self::new(client, device, RetryStrategy::new(config.max_retries)))
    }

    pub fn with_retry_strategy(mut self, retry_strategy: RetryStrategy) -> Self {
        self.retry_strategy = retry_strategy;
        self
    }

    pub fn with_circuit_breaker(mut self, circuit_breaker: CircuitBreaker) -> Self {
        self.circuit_breaker = circuit_breaker;
        self
    }

    pub fn device(&self) -> &str {
        &self.device
    }

    async fn submit_with_retry(&self, request: &JobRequest) -> Result<JobResponse, BackendError> {
        let mut backoff = self.retry_strategy.create_backoff();
        let mut retries_done = 0;

        loop {
            self.circuit_breaker.check().await?;

            let error = match self.client.submit_job(request).await {
                Ok(response) => {
                    self.circuit_breaker.on_success().await;
                    return Ok(response);
                }
                Err(error) => error,
            };

            self.circuit_breaker.on_failure().await;
            metrics::counter!("remote_job_failures_total").increment(1);

            if !self.retry_strategy.is_retryable_error(&error) {
                return Err(error);
            }
            if !self.retry_strategy.should_retry(retries_done) {
                return Err(BackendError::RetriesExhausted {
                    attempts: retries_done + 1,
                    last_error: error.to_string(),
                });
            }

            retries_done += 1;
            let delay = backoff
                .next_backoff()
                .unwrap_or_else(|| self.retry_strategy.max_interval());
            tracing::warn!(
                attempt = retries_done,
                error = %error,
                backoff_ms = delay.as_millis() as u64,
                "Remote job failed, retrying"
            );
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl MeasurementBackend for RemoteBackend {
    fn name(&self) -> String {
        format!("remote:{}", self.device)
    }

    fn is_ideal(&self) -> bool {
        false
    }

    async fn run(&self, circuit: &Circuit, shots: u32) -> Result<Counts, BackendError> {
        circuit.validate()?;

        let request = JobRequest {
            backend: self.device.clone(),
            qasm: circuit.to_qasm(),
            shots,
        };
        let response = self.submit_with_retry(&request).await?;

        metrics::counter!("remote_jobs_total").increment(1);
        tracing::info!(
            job_id = %response.job_id,
            device = %self.device,
            estimated_seconds = response.usage.estimated_seconds,
            quantum_seconds = response.usage.quantum_seconds,
            "Remote job completed"
        );

        Ok(response.counts)
    }
}
