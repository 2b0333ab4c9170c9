//! Prometheus Exposition Format output
//!
//! This module handles formatting of Prometheus metrics into the text
//! exposition format (version 0.0.4).
//!
//! # Format Specification
//!
//! ```text
//! # HELP <metric_name> <help_text>
//! # TYPE <metric_name> <type>
//! <metric_name> <value>
//! ```

use std::collections::{HashMap, HashSet};
use std::fmt::Write;

use super::metric::PrometheusMetric;

/// Content type of the text exposition format
pub const CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Prometheus exposition format formatter
///
/// # Example
///
/// ```
/// use jolokia_exporter::exposition::{MetricType, PrometheusFormatter, PrometheusMetric};
///
/// let metrics = vec![
///     PrometheusMetric::new("jolokia_up", 1.0)
///         .with_type(MetricType::Gauge)
///         .with_help("Could jolokia endpoint be reached"),
/// ];
///
/// let output = PrometheusFormatter::new().format(&metrics);
/// assert!(output.contains("jolokia_up 1\n"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct PrometheusFormatter;

impl PrometheusFormatter {
    /// Create a new formatter
    pub fn new() -> Self {
        Self
    }

    /// Format metrics into Prometheus exposition format
    ///
    /// - HELP and TYPE lines are emitted once per unique metric name
    /// - Metrics with the same name are grouped together, in order of first
    ///   occurrence
    pub fn format(&self, metrics: &[PrometheusMetric]) -> String {
        if metrics.is_empty() {
            return String::new();
        }

        let mut output = String::with_capacity(metrics.len() * 100);
        let mut seen_metrics: HashSet<String> = HashSet::new();

        for (name, group) in Self::group_by_name(metrics) {
            if seen_metrics.insert(name.clone()) {
                if let Some(help) = &group[0].help {
                    let _ = writeln!(output, "# HELP {} {}", name, Self::escape_help(help));
                }
                let _ = writeln!(output, "# TYPE {} {}", name, group[0].metric_type.as_str());
            }

            for metric in group {
                let _ = writeln!(output, "{} {}", metric.name, Self::format_value(metric.value));
            }
        }

        output
    }

    /// Group metrics by name, preserving order of first occurrence
    fn group_by_name(metrics: &[PrometheusMetric]) -> Vec<(String, Vec<&PrometheusMetric>)> {
        let mut groups: HashMap<String, Vec<&PrometheusMetric>> = HashMap::new();
        let mut order: Vec<String> = Vec::new();

        for metric in metrics {
            if !groups.contains_key(&metric.name) {
                order.push(metric.name.clone());
            }
            groups.entry(metric.name.clone()).or_default().push(metric);
        }

        order
            .into_iter()
            .filter_map(|name| groups.remove(&name).map(|g| (name, g)))
            .collect()
    }

    /// Format a numeric value for Prometheus
    ///
    /// - NaN → "NaN"
    /// - +Inf → "+Inf"
    /// - -Inf → "-Inf"
    /// - Integers are formatted without decimal point
    /// - Large/small floats use scientific notation
    fn format_value(value: f64) -> String {
        if value.is_nan() {
            "NaN".to_string()
        } else if value.is_infinite() {
            if value.is_sign_positive() {
                "+Inf".to_string()
            } else {
                "-Inf".to_string()
            }
        } else if value.fract() == 0.0 && value.abs() < 1e15 {
            format!("{}", value as i64)
        } else if value.abs() >= 1e6 || (value.abs() < 1e-3 && value != 0.0) {
            format!("{:e}", value)
        } else {
            format!("{}", value)
        }
    }

    /// Escape help text
    ///
    /// Escapes backslash and newline characters.
    fn escape_help(help: &str) -> String {
        help.replace('\\', "\\\\").replace('\n', "\\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exposition::MetricType;

    #[test]
    fn test_format_simple_metric() {
        let metrics = vec![PrometheusMetric::new("test_metric", 42.0)
            .with_type(MetricType::Gauge)
            .with_help("A test metric")];

        let output = PrometheusFormatter::new().format(&metrics);

        assert!(output.contains("# HELP test_metric A test metric"));
        assert!(output.contains("# TYPE test_metric gauge"));
        assert!(output.contains("test_metric 42\n"));
    }

    #[test]
    fn test_format_repeated_name_single_header() {
        let metrics = vec![
            PrometheusMetric::new("dup", 1.0).with_help("first"),
            PrometheusMetric::new("dup", 2.0).with_help("second"),
        ];

        let output = PrometheusFormatter::new().format(&metrics);

        assert_eq!(output.matches("# HELP dup").count(), 1);
        assert_eq!(output.matches("# TYPE dup").count(), 1);
        assert!(output.contains("dup 1\n"));
        assert!(output.contains("dup 2\n"));
    }

    #[test]
    fn test_format_value_special() {
        assert_eq!(PrometheusFormatter::format_value(f64::NAN), "NaN");
        assert_eq!(PrometheusFormatter::format_value(f64::INFINITY), "+Inf");
        assert_eq!(PrometheusFormatter::format_value(f64::NEG_INFINITY), "-Inf");
    }

    #[test]
    fn test_format_value_integer() {
        assert_eq!(PrometheusFormatter::format_value(42.0), "42");
        assert_eq!(PrometheusFormatter::format_value(0.0), "0");
        assert_eq!(PrometheusFormatter::format_value(-100.0), "-100");
    }

    #[test]
    fn test_format_value_decimal() {
        let formatted = PrometheusFormatter::format_value(1.23456);
        assert!(formatted.starts_with("1.23"));
    }

    #[test]
    fn test_format_value_scientific() {
        let formatted = PrometheusFormatter::format_value(1.23e-6);
        assert!(formatted.contains('e'));
    }

    #[test]
    fn test_escape_help() {
        assert_eq!(PrometheusFormatter::escape_help("simple"), "simple");
        assert_eq!(
            PrometheusFormatter::escape_help("line1\nline2"),
            "line1\\nline2"
        );
        assert_eq!(
            PrometheusFormatter::escape_help("path\\to\\file"),
            "path\\\\to\\\\file"
        );
    }

    #[test]
    fn test_format_empty_metrics() {
        assert!(PrometheusFormatter::new().format(&[]).is_empty());
    }

    #[test]
    fn test_format_metric_without_help() {
        let metrics = vec![PrometheusMetric::new("test_metric", 42.0).with_type(MetricType::Gauge)];
        let output = PrometheusFormatter::new().format(&metrics);

        assert!(!output.contains("# HELP"));
        assert!(output.contains("# TYPE test_metric gauge"));
    }

    #[test]
    fn test_format_preserves_metric_order() {
        let metrics = vec![
            PrometheusMetric::new("zebra_metric", 1.0),
            PrometheusMetric::new("alpha_metric", 2.0),
            PrometheusMetric::new("middle_metric", 3.0),
        ];

        let output = PrometheusFormatter::new().format(&metrics);

        let zebra_pos = output.find("zebra_metric").unwrap();
        let alpha_pos = output.find("alpha_metric").unwrap();
        let middle_pos = output.find("middle_metric").unwrap();

        assert!(zebra_pos < alpha_pos);
        assert!(alpha_pos < middle_pos);
    }
}
