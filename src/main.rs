//! jolokia-exporter - Prometheus exporter for Jolokia JMX endpoints
//!
//! This binary serves a Prometheus-compatible metrics endpoint that reads
//! the configured MBean attributes from a Jolokia bridge on every scrape.

use std::collections::BTreeMap;

use anyhow::Result;
use clap::Parser;
use serde::Serialize;
use tracing::info;

use jolokia_exporter::cli::{Cli, OutputFormat};
use jolokia_exporter::collector::{PreparedRequest, RequestItem};
use jolokia_exporter::config::Config;
use jolokia_exporter::server;

/// Output of `--validate`
#[derive(Serialize)]
struct ValidationSummary<'a> {
    valid: bool,
    jolokia_url: &'a str,
    bind_address: &'a str,
    port: u16,
    metrics_path: &'a str,
    namespace: &'a str,
    metrics: usize,
}

/// Output of `--dry-run`
#[derive(Serialize)]
struct DryRunReport<'a> {
    request: &'a [RequestItem],
    keys: BTreeMap<&'a str, &'a str>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    jolokia_exporter::init_logging(&cli.log_level.to_string())?;

    let mut config = Config::load(&cli.config)?;
    cli.apply_overrides(&mut config);
    config.validate()?;

    if cli.validate {
        return print_validation(&config, cli.output_format);
    }

    if cli.dry_run {
        return print_dry_run(&config, cli.output_format);
    }

    info!(
        version = env!("CARGO_PKG_VERSION"),
        config = %cli.config.display(),
        "Starting jolokia-exporter"
    );

    server::run(config).await
}

fn print_validation(config: &Config, format: OutputFormat) -> Result<()> {
    let summary = ValidationSummary {
        valid: true,
        jolokia_url: &config.jolokia.url,
        bind_address: &config.server.bind_address,
        port: config.server.port,
        metrics_path: &config.server.path,
        namespace: &config.namespace,
        metrics: config.metrics.len(),
    };

    match format {
        OutputFormat::Text => {
            println!("Configuration is valid");
            println!("  Jolokia URL:  {}", summary.jolokia_url);
            println!(
                "  Listen:       {}:{}{}",
                summary.bind_address, summary.port, summary.metrics_path
            );
            println!("  Namespace:    {}", summary.namespace);
            println!("  Metrics:      {}", summary.metrics);
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(&summary)?),
    }

    Ok(())
}

fn print_dry_run(config: &Config, format: OutputFormat) -> Result<()> {
    let prepared = PreparedRequest::build(&config.metrics)?;
    let report = DryRunReport {
        request: prepared.items(),
        keys: prepared
            .lookup()
            .iter()
            .map(|(key, target)| (key.as_str(), target.as_str()))
            .collect(),
    };

    match format {
        OutputFormat::Text => {
            println!("Request body ({} items):", prepared.len());
            println!("{}", String::from_utf8_lossy(&prepared.body()));
            println!();
            println!("Key table:");
            for (key, target) in &report.keys {
                println!("  {} -> {}", key, target);
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(&report)?),
    }

    Ok(())
}
