//! Configuration validation.
//!
//! Errors stop the CLI from talking to the platform; warnings are printed and
//! otherwise ignored.

use crate::config::AppConfig;
use colored::Colorize;

/// Longest request timeout accepted without a warning.
const MAX_REASONABLE_TIMEOUT_SECS: u64 = 300;

/// Result of configuration validation.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// Problems that make the configuration unusable.
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    pub fn add_warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Prints the validation result to the console.
    pub fn print(&self) {
        if !self.warnings.is_empty() {
            println!();
            println!("{}", "Configuration Warnings:".yellow().bold());
            for warning in &self.warnings {
                println!("  {} {}", "⚠".yellow(), warning);
            }
        }

        if !self.errors.is_empty() {
            println!();
            println!("{}", "Configuration Errors:".red().bold());
            for error in &self.errors {
                println!("  {} {}", "✗".red(), error);
            }
        }

        if self.errors.is_empty() && self.warnings.is_empty() {
            println!("  {} Configuration OK", "✓".green());
        }
    }
}

pub struct ConfigValidator;

impl ConfigValidator {
    pub fn validate(config: &AppConfig) -> ValidationResult {
        let mut result = ValidationResult::new();
        Self::validate_connection(config, &mut result);
        Self::validate_transport(config, &mut result);
        Self::validate_logging(config, &mut result);
        result
    }

    fn validate_connection(config: &AppConfig, result: &mut ValidationResult) {
        let opencti = &config.opencti;

        if opencti.server_url.trim().trim_matches('/').is_empty() {
            result.add_error("opencti.server_url is not set (or set OPENCTI_URL)");
        } else if opencti.base_url().starts_with("http://") {
            result.add_warning(format!(
                "{} uses plain HTTP; the access token is sent unencrypted",
                opencti.base_url()
            ));
        }

        if opencti.access_token.is_empty() {
            result.add_error("opencti.access_token is not set (or set OPENCTI_TOKEN)");
        }

        if !opencti.verify_ssl {
            result.add_warning("TLS certificate verification is disabled");
        }
    }

    fn validate_transport(config: &AppConfig, result: &mut ValidationResult) {
        let opencti = &config.opencti;

        if opencti.timeout_secs == 0 {
            result.add_error("opencti.timeout_secs must be greater than 0");
        } else if opencti.timeout_secs > MAX_REASONABLE_TIMEOUT_SECS {
            result.add_warning(format!(
                "opencti.timeout_secs is {}s; requests may hang for a long time",
                opencti.timeout_secs
            ));
        }

        if opencti.requests_per_minute == 0 {
            result.add_warning("opencti.requests_per_minute is 0; client rate limiting is off");
        }
    }

    fn validate_logging(config: &AppConfig, result: &mut ValidationResult) {
        if let Err(e) = config.logging.parsed_level() {
            result.add_error(format!(
                "logging.level: {}. Use trace, debug, info, warn or error",
                e
            ));
        }
    }
}
