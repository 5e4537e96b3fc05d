// Configuration management with layered configuration (defaults, file, env)

use crate::schedule::{default_timezone, Schedule};
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main settings structure containing all configuration options
///
/// The dispatch target (owner, repository, workflow file, ref) is fixed in
/// code and deliberately absent here; the token is the only secret and the
/// only value the environment must supply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub github: GithubConfig,
    pub schedule: Schedule,
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubConfig {
    /// Bearer token authorized to trigger the target workflow; injected by
    /// the environment and passed through verbatim
    pub token: String,
    /// Timeout for the dispatch request, in seconds
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    pub log_level: String,
    pub metrics_port: u16,
    pub tracing_endpoint: Option<String>,
}

impl Settings {
    /// Load configuration with layered precedence: defaults → file → env
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_path("config")
    }

    /// Load configuration from a specific path
    pub fn load_from_path<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();

        let builder = Config::builder()
            // Start with the in-code defaults so only the token is required
            .add_source(Config::try_from(&Settings::default())?)
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            // Local configuration (not committed to git)
            .add_source(File::from(config_dir.join("local.toml")).required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), String> {
        if self.github.token.is_empty() {
            return Err("GitHub token cannot be empty".to_string());
        }
        if self.github.timeout_seconds == 0 {
            return Err("GitHub timeout_seconds must be greater than 0".to_string());
        }

        self.schedule
            .validate()
            .map_err(|e| format!("Invalid schedule: {}", e))?;

        if self.observability.metrics_port == 0 {
            return Err("Metrics port must be greater than 0".to_string());
        }

        Ok(())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            github: GithubConfig {
                token: String::new(),
                timeout_seconds: 30,
            },
            schedule: Schedule::Cron {
                expression: "0 0 * * * *".to_string(),
                timezone: default_timezone(),
            },
            observability: ObservabilityConfig {
                log_level: "info".to_string(),
                metrics_port: 9090,
                tracing_endpoint: None,
            },
        }
    }
}
