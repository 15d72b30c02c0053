//! octi CLI
//!
//! Runs OpenCTI connector operations from the command line.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use octi_connector::{Connector, ConnectorHealth, OpenCtiClient, Operation, OperationRegistry};
use octi_observability::init_logging_with_config;
use serde_json::{json, Map, Value};
use std::path::PathBuf;
use tracing::debug;

mod config;
mod validator;

use config::AppConfig;
use validator::ConfigValidator;

#[derive(Parser)]
#[command(name = "octi")]
#[command(version)]
#[command(about = "Run OpenCTI connector operations", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Output format (text, json)
    #[arg(long, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Invalid output format: {}", s)),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Run an operation
    Run {
        /// Operation name, e.g. get_labels
        operation: String,

        /// Parameters as a JSON object
        #[arg(long, value_name = "JSON")]
        params: Option<String>,

        /// Single parameter; repeatable and applied over --params
        #[arg(short = 'p', long = "param", value_name = "KEY=VALUE")]
        param: Vec<String>,
    },

    /// Check that the platform answers with the configured token
    Health,

    /// List available operations and their parameters
    Operations,

    /// Validate configuration
    Validate {
        /// Configuration file to validate
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Show current configuration
    Config {
        /// Show secrets (redacted by default)
        #[arg(long)]
        show_secrets: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::load(&default_config_path()).unwrap_or_else(|_| {
            if cli.verbose {
                eprintln!("Using default configuration (no config file found)");
            }
            AppConfig::default()
        }),
    };
    config.apply_env_overrides()?;

    let mut logging = config.logging.clone();
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    logging.json_format |= cli.format == OutputFormat::Json;
    if let Err(e) = init_logging_with_config(&logging) {
        eprintln!("{} {}", "Logging disabled:".yellow(), e);
    }
    debug!(server = %config.opencti.base_url(), "Configuration loaded");

    match cli.command {
        Commands::Run {
            operation,
            params,
            param,
        } => {
            let params = build_params(params.as_deref(), &param)?;
            cmd_run(config, &operation, params, cli.format).await
        }
        Commands::Health => cmd_health(config, cli.format).await,
        Commands::Operations => cmd_operations(cli.format),
        Commands::Validate { config: path } => {
            let path = path
                .or(cli.config)
                .unwrap_or_else(default_config_path);
            cmd_validate(path)
        }
        Commands::Config { show_secrets } => cmd_config(config, show_secrets, cli.format),
    }
}

fn default_config_path() -> PathBuf {
    if let Some(dirs) = directories::ProjectDirs::from("org", "octi", "octi") {
        dirs.config_dir().join("config.yaml")
    } else {
        PathBuf::from("config/octi.yaml")
    }
}

/// Merges `--params` JSON with `-p key=value` pairs.
///
/// Pair values are read as JSON when they parse (numbers, booleans, lists)
/// and as plain strings otherwise.
fn build_params(json_params: Option<&str>, pairs: &[String]) -> Result<Value> {
    let mut params = match json_params {
        Some(raw) => {
            match serde_json::from_str::<Value>(raw).context("--params is not valid JSON")? {
                Value::Object(map) => map,
                other => bail!("--params must be a JSON object, got: {}", other),
            }
        }
        None => Map::new(),
    };

    for pair in pairs {
        let Some((key, value)) = pair.split_once('=') else {
            bail!("Invalid parameter '{}', expected KEY=VALUE", pair);
        };
        let value = serde_json::from_str::<Value>(value).unwrap_or_else(|_| json!(value));
        params.insert(key.trim().to_string(), value);
    }

    Ok(Value::Object(params))
}

async fn cmd_run(
    config: AppConfig,
    operation: &str,
    params: Value,
    format: OutputFormat,
) -> Result<()> {
    let registry = OperationRegistry::new(config.opencti)?;
    let result = registry
        .execute(operation, params)
        .await
        .with_context(|| format!("Operation {} failed", operation))?;

    if format == OutputFormat::Text {
        println!("{} {}", "✓".green(), operation.bold());
    }
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

async fn cmd_health(config: AppConfig, format: OutputFormat) -> Result<()> {
    let client = OpenCtiClient::new(config.opencti)?;
    let health = client.health_check().await?;

    if format == OutputFormat::Json {
        let output = json!({
            "name": client.name(),
            "url": client.url(),
            "health": health,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        let status = match &health {
            ConnectorHealth::Healthy => "Healthy".green(),
            ConnectorHealth::Unhealthy(reason) => format!("Unhealthy ({})", reason).red(),
        };
        println!("{}", "OpenCTI Health".bold());
        println!("──────────────");
        println!("URL:    {}", client.url().cyan());
        println!("Status: {}", status);
    }

    if health != ConnectorHealth::Healthy {
        std::process::exit(1);
    }
    Ok(())
}

fn cmd_operations(format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Json {
        let operations: Vec<Value> = Operation::ALL
            .iter()
            .map(|op| {
                json!({
                    "name": op.name(),
                    "description": op.description(),
                    "parameters": op.parameters(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&operations)?);
        return Ok(());
    }

    println!("{}", "Operations".bold());
    println!("──────────");
    for op in Operation::ALL {
        println!("{}  {}", op.name().cyan(), op.description());
        for param in op.parameters() {
            let marker = if param.required {
                "required".red().to_string()
            } else {
                match &param.default {
                    Some(default) => format!("default {}", default),
                    None => "optional".dimmed().to_string(),
                }
            };
            println!("    {:<24} {} ({})", param.name, param.description, marker);
        }
    }
    Ok(())
}

fn cmd_validate(config_path: PathBuf) -> Result<()> {
    println!(
        "Validating configuration: {}",
        config_path.display().to_string().cyan()
    );

    let mut config = match AppConfig::load(&config_path) {
        Ok(config) => config,
        Err(e) => {
            println!("{}: {:#}", "Configuration file error".red().bold(), e);
            std::process::exit(1);
        }
    };
    config.apply_env_overrides()?;

    let validation_result = ConfigValidator::validate(&config);
    validation_result.print();

    println!();
    println!("{}", "Configuration Summary".bold());
    println!("─────────────────────");
    println!("  Server: {}", config.opencti.base_url());
    println!("  Verify TLS: {}", config.opencti.verify_ssl);
    println!("  Log level: {}", config.logging.level);

    println!();
    if validation_result.has_errors() {
        println!(
            "{}",
            "Configuration validation failed. Fix the errors above."
                .red()
                .bold()
        );
        std::process::exit(1);
    } else if validation_result.has_warnings() {
        println!(
            "{}",
            "Configuration is valid with warnings. Review the warnings above."
                .yellow()
                .bold()
        );
    } else {
        println!("{}", "Configuration is valid.".green().bold());
    }

    Ok(())
}

fn cmd_config(config: AppConfig, show_secrets: bool, format: OutputFormat) -> Result<()> {
    let display_config = if show_secrets {
        config
    } else {
        config.redact_secrets()
    };

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&display_config)?);
    } else {
        println!("{}", "Current Configuration".bold());
        println!("─────────────────────────");
        print!("{}", serde_yaml::to_string(&display_config)?);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format() {
        assert_eq!("JSON".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert_eq!("text".parse::<OutputFormat>(), Ok(OutputFormat::Text));
        assert!("yaml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_build_params_pairs() {
        let pairs = vec![
            "type=IPv4".to_string(),
            "value=198.51.100.7".to_string(),
            "score=80".to_string(),
            "label_id=[\"l-1\",\"l-2\"]".to_string(),
        ];
        let params = build_params(None, &pairs).unwrap();
        assert_eq!(
            params,
            json!({
                "type": "IPv4",
                "value": "198.51.100.7",
                "score": 80,
                "label_id": ["l-1", "l-2"]
            })
        );
    }

    #[test]
    fn test_build_params_pairs_override_json() {
        let pairs = vec!["limit=5".to_string()];
        let params = build_params(Some(r#"{"limit": 10, "end_cursor_id": "c1"}"#), &pairs).unwrap();
        assert_eq!(params, json!({"limit": 5, "end_cursor_id": "c1"}));
    }

    #[test]
    fn test_build_params_errors() {
        assert!(build_params(Some("[1, 2]"), &[]).is_err());
        assert!(build_params(Some("{not json"), &[]).is_err());
        assert!(build_params(None, &["novalue".to_string()]).is_err());
    }

    #[test]
    fn test_cli_parses_run() {
        let cli = Cli::try_parse_from([
            "octi",
            "--format",
            "json",
            "run",
            "create_label",
            "-p",
            "name=apt28",
        ])
        .unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
        match cli.command {
            Commands::Run {
                operation, param, ..
            } => {
                assert_eq!(operation, "create_label");
                assert_eq!(param, vec!["name=apt28".to_string()]);
            }
            _ => panic!("expected run"),
        }
    }
}
