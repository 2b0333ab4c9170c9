//! CLI argument parsing for jolokia-exporter
//!
//! # Options
//!
//! - `--config` / `-c`: Configuration file path (default: config.yaml, env: JOLOKIA_EXPORTER_CONFIG)
//! - `--jolokia-url`: Jolokia endpoint URL (env: JOLOKIA_EXPORTER_URL)
//! - `--jolokia-timeout`: HTTP timeout in milliseconds
//! - `--basic-auth-user` / `--basic-auth-password`: Jolokia Basic Auth credentials
//! - `--insecure` / `-i`: Skip TLS certificate verification
//! - `--bind-address`, `--port` / `-p`, `--metrics-path`: Listener settings
//! - `--namespace`: Prefix for exported metric names
//! - `--validate`: Validate configuration without starting server
//! - `--dry-run`: Print the prepared bulk request and key table
//! - `--log-level` / `-l`: Log level (trace/debug/info/warn/error)
//! - `--output-format`: Output format for validate/dry-run (text/json/yaml)
//!
//! # Precedence
//!
//! 1. CLI arguments
//! 2. Environment variables
//! 3. Configuration file
//! 4. Default values

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::config::Config;

/// jolokia-exporter - Prometheus exporter for Jolokia JMX endpoints
///
/// Reads the configured MBean attributes with a single bulk request per
/// scrape and exports every numeric leaf as a gauge.
#[derive(Parser, Debug)]
#[command(name = "jolokia-exporter")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to configuration file (.yaml, .yml or .json)
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = "config.yaml",
        env = "JOLOKIA_EXPORTER_CONFIG"
    )]
    pub config: PathBuf,

    /// Jolokia endpoint URL (overrides config file)
    #[arg(long, value_name = "URL", env = "JOLOKIA_EXPORTER_URL")]
    pub jolokia_url: Option<String>,

    /// Jolokia HTTP timeout in milliseconds (overrides config file)
    #[arg(long, value_name = "MS", env = "JOLOKIA_EXPORTER_TIMEOUT")]
    pub jolokia_timeout: Option<u64>,

    /// Basic Auth username for the Jolokia endpoint
    #[arg(long, value_name = "USERNAME", env = "JOLOKIA_EXPORTER_USER")]
    pub basic_auth_user: Option<String>,

    /// Basic Auth password for the Jolokia endpoint
    #[arg(long, value_name = "PASSWORD", env = "JOLOKIA_EXPORTER_PASSWORD")]
    pub basic_auth_password: Option<String>,

    /// Ignore TLS certificate errors on the Jolokia endpoint
    #[arg(short, long)]
    pub insecure: bool,

    /// Server bind address (overrides config file)
    #[arg(long, value_name = "ADDRESS", env = "JOLOKIA_EXPORTER_BIND_ADDRESS")]
    pub bind_address: Option<String>,

    /// Server port (overrides config file)
    #[arg(short, long, value_name = "PORT", env = "JOLOKIA_EXPORTER_PORT")]
    pub port: Option<u16>,

    /// Metrics endpoint path (overrides config file)
    #[arg(long, value_name = "PATH")]
    pub metrics_path: Option<String>,

    /// Namespace prefix for exported metrics (overrides config file)
    #[arg(long, value_name = "NAMESPACE")]
    pub namespace: Option<String>,

    /// Validate configuration without starting server
    #[arg(long)]
    pub validate: bool,

    /// Print the prepared bulk request and key table, then exit
    #[arg(long)]
    pub dry_run: bool,

    /// Log level
    #[arg(
        short,
        long,
        value_enum,
        default_value = "info",
        env = "JOLOKIA_EXPORTER_LOG_LEVEL"
    )]
    pub log_level: LogLevel,

    /// Output format for --validate and --dry-run
    #[arg(long, value_enum, default_value = "text")]
    pub output_format: OutputFormat,
}

impl Cli {
    /// Apply command-line overrides on top of a loaded configuration
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(url) = &self.jolokia_url {
            config.jolokia.url = url.clone();
        }
        if let Some(timeout) = self.jolokia_timeout {
            config.jolokia.timeout_ms = timeout;
        }
        if let Some(user) = &self.basic_auth_user {
            config.jolokia.username = Some(user.clone());
        }
        if let Some(password) = &self.basic_auth_password {
            config.jolokia.password = Some(password.clone());
        }
        if self.insecure {
            config.jolokia.insecure = true;
        }
        if let Some(addr) = &self.bind_address {
            config.server.bind_address = addr.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(path) = &self.metrics_path {
            config.server.path = path.clone();
        }
        if let Some(namespace) = &self.namespace {
            config.namespace = namespace.clone();
        }
    }
}

/// Log level options
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// Trace level - most verbose
    Trace,
    /// Debug level
    Debug,
    /// Info level - default
    Info,
    /// Warn level
    Warn,
    /// Error level - least verbose
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "trace"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

/// Output format options for validate and dry-run modes
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
}
