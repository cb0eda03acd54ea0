use anyhow::{bail, Context};
use clap::ValueEnum;
use shared::{
    DEFAULT_EXPERIMENT_TRIALS, DEFAULT_GATE_ERROR, DEFAULT_READOUT_ERROR,
    DEFAULT_REMOTE_MAX_RETRIES, DEFAULT_REMOTE_TIMEOUT_SECS, LEAST_BUSY_DEVICE,
};
use simulator::{BackendSpec, NoiseModel, RemoteConfig};
use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BackendKind {
    /// Noiseless local simulator
    Ideal,
    /// Local simulator with readout and gate errors
    Noisy,
    /// Remote hardware service
    Remote,
}

impl FromStr for BackendKind {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "ideal" => Ok(BackendKind::Ideal),
            "noisy" => Ok(BackendKind::Noisy),
            "remote" => Ok(BackendKind::Remote),
            other => bail!("unknown backend '{}', expected ideal, noisy or remote", other),
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BackendKind::Ideal => "ideal",
            BackendKind::Noisy => "noisy",
            BackendKind::Remote => "remote",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub backend: BackendKind,
    pub noise: NoiseConfig,
    pub remote: RemoteSettings,
    pub seed: Option<u64>,
    pub trials: u32,
}

#[derive(Debug, Clone)]
pub struct NoiseConfig {
    pub readout_error: f64,
    pub gate_error: f64,
}

#[derive(Debug, Clone)]
pub struct RemoteSettings {
    pub url: Option<String>,
    pub token: Option<String>,
    pub device: String,
    pub timeout_seconds: u64,
    pub max_retries: u32,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: String| lookup(key).unwrap_or(default);
        let optional = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let config = Config {
            backend: var("COINFLIP_BACKEND", BackendKind::Ideal.to_string()).parse()?,
            noise: NoiseConfig {
                readout_error: var("COINFLIP_NOISE_READOUT", DEFAULT_READOUT_ERROR.to_string())
                    .trim()
                    .parse()
                    .context("COINFLIP_NOISE_READOUT must be a number")?,
                gate_error: var("COINFLIP_NOISE_GATE", DEFAULT_GATE_ERROR.to_string())
                    .trim()
                    .parse()
                    .context("COINFLIP_NOISE_GATE must be a number")?,
            },
            remote: RemoteSettings {
                url: optional("COINFLIP_REMOTE_URL"),
                token: optional("COINFLIP_REMOTE_TOKEN"),
                device: optional("COINFLIP_REMOTE_DEVICE")
                    .map(|device| device.trim().to_string())
                    .unwrap_or_else(|| LEAST_BUSY_DEVICE.to_string()),
                timeout_seconds: var(
                    "COINFLIP_REMOTE_TIMEOUT_SECONDS",
                    DEFAULT_REMOTE_TIMEOUT_SECS.to_string(),
                )
                .trim()
                .parse()
                .context("COINFLIP_REMOTE_TIMEOUT_SECONDS must be a whole number")?,
                max_retries: var(
                    "COINFLIP_REMOTE_MAX_RETRIES",
                    DEFAULT_REMOTE_MAX_RETRIES.to_string(),
                )
                .trim()
                .parse()
                .context("COINFLIP_REMOTE_MAX_RETRIES must be a whole number")?,
            },
            seed: optional("COINFLIP_SEED")
                .map(|seed| seed.trim().parse())
                .transpose()
                .context("COINFLIP_SEED must be a whole number")?,
            trials: var("COINFLIP_TRIALS", DEFAULT_EXPERIMENT_TRIALS.to_string())
                .trim()
                .parse()
                .context("COINFLIP_TRIALS must be a whole number")?,
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.trials == 0 {
            bail!("COINFLIP_TRIALS must be at least 1");
        }
        self.noise_model()?;
        if self.backend == BackendKind::Remote && self.remote.url.is_none() {
            bail!("COINFLIP_REMOTE_URL must be set when COINFLIP_BACKEND=remote");
        }
        if self.remote.timeout_seconds == 0 {
            bail!("COINFLIP_REMOTE_TIMEOUT_SECONDS must be at least 1");
        }
        Ok(())
    }

    /// Apply command line overrides
    pub fn with_overrides(mut self, backend: Option<BackendKind>, seed: Option<u64>) -> anyhow::Result<Self> {
        if let Some(backend) = backend {
            self.backend = backend;
        }
        if seed.is_some() {
            self.seed = seed;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn noise_model(&self) -> anyhow::Result<NoiseModel> {
        NoiseModel::new(self.noise.readout_error, self.noise.gate_error)
            .map_err(|e| anyhow::anyhow!("invalid noise model: {}", e))
    }

    /// The measurement backend this configuration selects
    pub fn backend_spec(&self) -> anyhow::Result<BackendSpec> {
        let selection = match self.backend {
            BackendKind::Ideal => BackendSpec::Ideal,
            BackendKind::Noisy => BackendSpec::Noisy(self.noise_model()?),
            BackendKind::Remote => BackendSpec::Remote(self.remote_config()?),
        };
        Ok(selection)
    }

    pub fn remote_config(&self) -> anyhow::Result<RemoteConfig> {
        let url = self
            .remote
            .url
            .as_deref()
            .context("COINFLIP_REMOTE_URL must be set to reach the hardware service")?;

        let mut config = RemoteConfig::new(url);
        config.token = self.remote.token.clone();
        config.device = self.remote.device.trim().to_string();
        config.timeout = Duration::from_secs(self.remote.timeout_seconds);
        config.max_retries = self.remote.max_retries;
        Ok(config)
    }

    /// Per-component seeds so seeded runs do not share one random stream
    pub fn component_seed(&self, offset: u64) -> Option<u64> {
        self.seed.map(|seed| seed.wrapping_add(offset))
    }
}
