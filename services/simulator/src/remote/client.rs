//! HTTP client for the remote hardware service
//!
//! Wire format (JSON):
//! - `GET  {base}/v1/backends` -> `{"backends": [DeviceInfo, ...]}`
//! - `POST {base}/v1/jobs` with `JobRequest` -> `JobResponse`

use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use shared::BackendError;
use std::time::Duration;

use crate::counts::Counts;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    pub name: String,
    pub operational: bool,
    #[serde(default)]
    pub simulator: bool,
    #[serde(default)]
    pub pending_jobs: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceList {
    pub backends: Vec<DeviceInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRequest {
    pub backend: String,
    pub qasm: String,
    pub shots: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobUsage {
    pub estimated_seconds: Option<f64>,
    pub quantum_seconds: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobResponse {
    pub job_id: String,
    pub counts: Counts,
    #[serde(default)]
    pub usage: JobUsage,
}

/// Pick the operational, non-simulator device with the fewest pending jobs
pub fn select_least_busy(devices: &[DeviceInfo]) -> Option<&DeviceInfo> {
    devices
        .iter()
        .filter(|device| device.operational && !device.simulator)
        .min_by_key(|device| device.pending_jobs)
}

/// Client for the remote hardware service
#[derive(Clone)]
pub struct HardwareClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl HardwareClient {
    pub fn new(base_url: &str, token: Option<String>, timeout: Duration) -> Result<Self, BackendError> {
        let base_url = base_url.trim().trim_end_matches('/');
        let parsed = Url::parse(base_url).map_err(|e| {
            BackendError::Misconfigured(format!("invalid hardware service URL '{}': {}", base_url, e))
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(BackendError::Misconfigured(format!(
                "hardware service URL '{}' must use http or https",
                base_url
            )));
        }

        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BackendError::Misconfigured(format!("cannot build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.to_string(),
            token,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// List the devices offered by the service
    pub async fn list_devices(&self) -> Result<Vec<DeviceInfo>, BackendError> {
        let url = format!("{}/v1/backends", self.base_url);

        tracing::debug!(url = %url, "Listing remote devices");

        let list: DeviceList = self.send(self.http.get(&url), &url).await?;
        Ok(list.backends)
    }

    /// Submit one job and wait for its counts
    pub async fn submit_job(&self, request: &JobRequest) -> Result<JobResponse, BackendError> {
        let url = format!("{}/v1/jobs", self.base_url);

        tracing::debug!(
            url = %url,
            backend = %request.backend,
            shots = request.shots,
            "Submitting remote job"
        );

        self.send(self.http.post(&url).json(request), &url).await
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder, url: &str) -> Result<T, BackendError> {
        let builder = match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        };

        let response = builder.send().await.map_err(|e| {
            if e.is_builder() {
                BackendError::Misconfigured(format!("cannot build request for {}: {}", url, e))
            } else {
                BackendError::Unreachable {
                    endpoint: url.to_string(),
                    reason: e.to_string(),
                }
            }
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| BackendError::Unreachable {
            endpoint: url.to_string(),
            reason: e.to_string(),
        })?;

        if !status.is_success() {
            return Err(BackendError::Status {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|e| BackendError::MalformedResponse(e.to_string()))
    }
}
