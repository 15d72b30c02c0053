//! Configuration loading for the octi CLI.

use anyhow::{bail, Context, Result};
use octi_connector::OpenCtiConfig;
use octi_observability::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

const REDACTED: &str = "***REDACTED***";

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Platform connection.
    #[serde(default)]
    pub opencti: OpenCtiConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Loads configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Applies `OPENCTI_URL`, `OPENCTI_TOKEN` and `OPENCTI_VERIFY_SSL` from the environment.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(url) = lookup("OPENCTI_URL") {
            self.opencti.server_url = url;
        }
        if let Some(token) = lookup("OPENCTI_TOKEN") {
            self.opencti.access_token = token.into();
        }
        if let Some(verify) = lookup("OPENCTI_VERIFY_SSL") {
            self.opencti.verify_ssl = parse_bool(&verify)
                .with_context(|| format!("Invalid OPENCTI_VERIFY_SSL value: {}", verify))?;
        }
        Ok(())
    }

    /// Creates a copy with the access token redacted.
    pub fn redact_secrets(&self) -> Self {
        let mut config = self.clone();
        if !config.opencti.access_token.is_empty() {
            config.opencti.access_token = REDACTED.into();
        }
        config
    }
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => bail!("expected true or false, got '{}'", other),
    }
}
