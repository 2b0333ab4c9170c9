//! Configuration management for jolokia-exporter
//!
//! Handles loading and validating configuration from YAML or JSON files.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

use crate::metrics::SELF_METRIC_NAMES;
use crate::naming::{is_valid_metric_name, qualify};
use crate::sink::{RESPONSE_DURATION, UP};

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Error reading the configuration file
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Error parsing a YAML configuration file
    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] serde_yaml::Error),

    /// Error parsing a JSON configuration file
    #[error("Failed to parse JSON config file: {0}")]
    JsonParseError(#[from] serde_json::Error),

    /// Configuration validation error
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Jolokia endpoint configuration
    #[serde(default)]
    pub jolokia: JolokiaConfig,

    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Prefix for every exported metric name, empty for none
    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// Attribute to metric mappings, in request order
    #[serde(default)]
    pub metrics: Vec<MetricMapping>,
}

/// Jolokia endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JolokiaConfig {
    /// Jolokia endpoint URL
    #[serde(default = "default_jolokia_url")]
    pub url: String,

    /// Optional username for basic auth
    pub username: Option<String>,

    /// Optional password for basic auth
    pub password: Option<String>,

    /// Skip TLS certificate verification
    #[serde(default)]
    pub insecure: bool,

    /// Request timeout in milliseconds
    #[serde(default = "default_timeout")]
    pub timeout_ms: u64,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Metrics endpoint path
    #[serde(default = "default_metrics_path")]
    pub path: String,

    /// Server bind address
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
}

/// Assignment of one JMX source to an exported metric name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricMapping {
    /// Where the value is read from
    pub source: MetricSource,

    /// Exported metric name (before the namespace prefix)
    pub target: String,
}

/// One JMX attribute, or a path inside one
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricSource {
    /// MBean ObjectName, e.g. `java.lang:type=Memory`
    pub mbean: String,

    /// Attribute name; the whole MBean is read when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,

    /// Inner path into a composite attribute, e.g. `used`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

// Default value functions
fn default_jolokia_url() -> String {
    "http://localhost:8778/jolokia".to_string()
}

fn default_timeout() -> u64 {
    5000
}

fn default_port() -> u16 {
    9422
}

fn default_metrics_path() -> String {
    "/metrics".to_string()
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_namespace() -> String {
    "jolokia".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            jolokia: JolokiaConfig::default(),
            server: ServerConfig::default(),
            namespace: default_namespace(),
            metrics: Vec::new(),
        }
    }
}

impl Default for JolokiaConfig {
    fn default() -> Self {
        Self {
            url: default_jolokia_url(),
            username: None,
            password: None,
            insecure: false,
            timeout_ms: default_timeout(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            path: default_metrics_path(),
            bind_address: default_bind_address(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML or JSON file
    ///
    /// Files ending in `.json` are parsed as JSON, everything else as YAML.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, parsed or validated
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let config = if is_json {
            Self::from_json_str(&contents)?
        } else {
            Self::from_yaml_str(&contents)?
        };

        config.validate()?;
        Ok(config)
    }

    /// Parse a YAML document and normalize it (no validation)
    pub fn from_yaml_str(contents: &str) -> Result<Self, ConfigError> {
        let mut config: Config = serde_yaml::from_str(contents)?;
        config.normalize();
        Ok(config)
    }

    /// Parse a JSON document and normalize it (no validation)
    pub fn from_json_str(contents: &str) -> Result<Self, ConfigError> {
        let mut config: Config = serde_json::from_str(contents)?;
        config.normalize();
        Ok(config)
    }

    /// Bring mbean names into the property order the bridge echoes back,
    /// and drop empty attribute/path strings.
    fn normalize(&mut self) {
        for mapping in &mut self.metrics {
            let source = &mut mapping.source;
            source.mbean = normalize_mbean_name(&source.mbean);
            source.attribute = source.attribute.take().filter(|a| !a.is_empty());
            source.path = source.path.take().filter(|p| !p.is_empty());
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "Server port must be greater than 0".to_string(),
            ));
        }

        if !self.server.path.starts_with('/') {
            return Err(ConfigError::ValidationError(
                "Metrics path must start with '/'".to_string(),
            ));
        }

        if self.server.path == "/" || self.server.path == "/health" {
            return Err(ConfigError::ValidationError(format!(
                "Metrics path '{}' conflicts with a built-in route",
                self.server.path
            )));
        }

        let url = url::Url::parse(&self.jolokia.url).map_err(|e| {
            ConfigError::ValidationError(format!(
                "Invalid Jolokia URL '{}': {}",
                self.jolokia.url, e
            ))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::ValidationError(format!(
                "Jolokia URL must use http or https, got '{}'",
                url.scheme()
            )));
        }

        if self.jolokia.timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "Jolokia timeout must be greater than 0".to_string(),
            ));
        }

        if !self.namespace.is_empty() && !is_valid_metric_name(&self.namespace) {
            return Err(ConfigError::ValidationError(format!(
                "Invalid namespace '{}'",
                self.namespace
            )));
        }

        let mut seen_targets = HashSet::new();
        for (index, mapping) in self.metrics.iter().enumerate() {
            if mapping.source.mbean.trim().is_empty() {
                return Err(ConfigError::ValidationError(format!(
                    "Metric at index {} has an empty mbean",
                    index
                )));
            }

            let exported = qualify(&self.namespace, &mapping.target);
            if mapping.target.is_empty() || !is_valid_metric_name(&exported) {
                return Err(ConfigError::ValidationError(format!(
                    "Metric at index {} has invalid target '{}'",
                    index, mapping.target
                )));
            }

            if is_reserved_target(&mapping.target) {
                return Err(ConfigError::ValidationError(format!(
                    "Metric at index {} uses reserved target '{}'",
                    index, mapping.target
                )));
            }

            if !seen_targets.insert(mapping.target.as_str()) {
                tracing::warn!(
                    target_name = %mapping.target,
                    index,
                    "Duplicate metric target, the last value collected wins"
                );
            }
        }

        if self.metrics.is_empty() {
            tracing::warn!("No metrics configured; only up and response_duration will be exported");
        }

        Ok(())
    }
}

/// Names already exported by the exporter itself
fn is_reserved_target(target: &str) -> bool {
    target == UP || target == RESPONSE_DURATION || SELF_METRIC_NAMES.contains(&target)
}

/// Sort the key properties of an ObjectName.
///
/// `java.lang:type=GarbageCollector,name=*` becomes
/// `java.lang:name=*,type=GarbageCollector`. Names without a `:` are returned
/// unchanged. Quoted values containing commas are not supported.
pub fn normalize_mbean_name(mbean: &str) -> String {
    match mbean.split_once(':') {
        Some((domain, properties)) => {
            let mut fields: Vec<&str> = properties.split(',').collect();
            fields.sort_unstable();
            format!("{}:{}", domain, fields.join(","))
        }
        None => mbean.to_string(),
    }
}
