//! Connection settings for an OpenCTI instance.

use crate::secure_string::SecureString;
use crate::traits::{AuthConfig, ConnectorConfig, ConnectorError, ConnectorResult};
use serde::{Deserialize, Serialize};

/// OpenCTI connector configuration.
///
/// `server_url`, `access_token` and `verify_ssl` are the three values the
/// connector host hands over; the rest tune the transport.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenCtiConfig {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default)]
    pub server_url: String,
    #[serde(default)]
    pub access_token: SecureString,
    #[serde(default = "default_verify_ssl")]
    pub verify_ssl: bool,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Client-side request budget. It applies per [`OpenCtiClient`](super::OpenCtiClient):
    /// `operations::execute` builds a client per call, while
    /// `OperationRegistry` shares one across calls. 0 disables it.
    #[serde(default = "default_rate_limit")]
    pub requests_per_minute: u32,
}

fn default_name() -> String {
    "opencti".to_string()
}
fn default_verify_ssl() -> bool {
    true
}
fn default_timeout() -> u64 {
    30
}
fn default_max_retries() -> u32 {
    2
}
fn default_rate_limit() -> u32 {
    600
}

impl Default for OpenCtiConfig {
    /// Transport defaults with no server or token; fails [`validate`](Self::validate).
    fn default() -> Self {
        Self::new(String::new(), SecureString::default())
    }
}

impl OpenCtiConfig {
    pub fn new(server_url: impl Into<String>, access_token: impl Into<SecureString>) -> Self {
        Self {
            name: default_name(),
            server_url: server_url.into(),
            access_token: access_token.into(),
            verify_ssl: default_verify_ssl(),
            timeout_secs: default_timeout(),
            max_retries: default_max_retries(),
            requests_per_minute: default_rate_limit(),
        }
    }

    pub fn with_verify_ssl(mut self, verify_ssl: bool) -> Self {
        self.verify_ssl = verify_ssl;
        self
    }

    /// Normalized base URL: surrounding slashes stripped, `https://` added
    /// when no scheme is given.
    pub fn base_url(&self) -> String {
        normalize_server_url(&self.server_url)
    }

    /// Checks the settings that the transport cannot work without.
    pub fn validate(&self) -> ConnectorResult<()> {
        if self.base_url().is_empty() || self.base_url() == "https://" {
            return Err(ConnectorError::ConfigError(
                "server_url must not be empty".to_string(),
            ));
        }
        if self.access_token.is_empty() {
            return Err(ConnectorError::ConfigError(
                "access_token must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Transport configuration with bearer authentication.
    pub fn connector_config(&self) -> ConnectorConfig {
        ConnectorConfig {
            name: self.name.clone(),
            base_url: self.base_url(),
            auth: AuthConfig::BearerToken {
                token: self.access_token.clone(),
            },
            timeout_secs: self.timeout_secs,
            max_retries: self.max_retries,
            verify_tls: self.verify_ssl,
        }
    }
}

/// Strips `/` from both ends and defaults the scheme to `https://`.
pub fn normalize_server_url(server_url: &str) -> String {
    let url = server_url.trim().trim_matches('/');
    if url.starts_with("https://") || url.starts_with("http://") {
        url.to_string()
    } else {
        format!("https://{}", url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_server_url() {
        assert_eq!(
            normalize_server_url("opencti.example.com/"),
            "https://opencti.example.com"
        );
        assert_eq!(
            normalize_server_url("http://10.0.0.5:8080/"),
            "http://10.0.0.5:8080"
        );
        assert_eq!(
            normalize_server_url("https://cti.example.org"),
            "https://cti.example.org"
        );
        assert_eq!(normalize_server_url("/cti.local/"), "https://cti.local");
    }

    #[test]
    fn test_deserialize_defaults() {
        let config: OpenCtiConfig = serde_json::from_str(
            r#"{"server_url": "cti.example.org", "access_token": "tok"}"#,
        )
        .unwrap();
        assert_eq!(config.name, "opencti");
        assert!(config.verify_ssl);
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.max_retries, 2);
        assert_eq!(config.base_url(), "https://cti.example.org");
    }

    #[test]
    fn test_connector_config() {
        let config = OpenCtiConfig::new("cti.example.org", "tok").with_verify_ssl(false);
        let connector = config.connector_config();
        assert_eq!(connector.base_url, "https://cti.example.org");
        assert!(!connector.verify_tls);
        assert!(matches!(connector.auth, AuthConfig::BearerToken { .. }));
    }

    #[test]
    fn test_validate() {
        assert!(OpenCtiConfig::new("cti.example.org", "tok").validate().is_ok());
        assert!(OpenCtiConfig::new("", "tok").validate().is_err());
        assert!(OpenCtiConfig::new("cti.example.org", "").validate().is_err());
        assert!(OpenCtiConfig::default().validate().is_err());
    }
}
