//! Exposition-ready metric representation

use crate::naming::qualify;
use crate::sink::Sample;

/// Prometheus metric type
///
/// The default type is `Untyped` when not specified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MetricType {
    /// Gauge metric - a value that can go up and down
    Gauge,
    /// Counter metric - a monotonically increasing value
    Counter,
    /// Untyped metric - type is not specified
    #[default]
    Untyped,
}

impl MetricType {
    /// Returns the Prometheus type string representation
    ///
    /// # Example
    ///
    /// ```
    /// use jolokia_exporter::exposition::MetricType;
    ///
    /// assert_eq!(MetricType::Gauge.as_str(), "gauge");
    /// assert_eq!(MetricType::Untyped.as_str(), "untyped");
    /// ```
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricType::Gauge => "gauge",
            MetricType::Counter => "counter",
            MetricType::Untyped => "untyped",
        }
    }
}

impl std::fmt::Display for MetricType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single Prometheus sample with its metadata
#[derive(Debug, Clone, PartialEq)]
pub struct PrometheusMetric {
    /// Fully qualified metric name
    pub name: String,
    /// Metric type (gauge, counter, untyped)
    pub metric_type: MetricType,
    /// Help text
    pub help: Option<String>,
    /// Metric value
    pub value: f64,
}

impl PrometheusMetric {
    /// Create a new untyped metric
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            metric_type: MetricType::Untyped,
            help: None,
            value,
        }
    }

    /// Set the metric type
    pub fn with_type(mut self, metric_type: MetricType) -> Self {
        self.metric_type = metric_type;
        self
    }

    /// Set help text
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Build an exposition metric from a collected sample.
    ///
    /// The exported name is `{namespace}_{sample.name}`; every sample is
    /// exposed as a gauge. Value samples keep their unprefixed name as help.
    pub fn from_sample(namespace: &str, sample: &Sample) -> Self {
        Self::new(qualify(namespace, &sample.name), sample.value)
            .with_type(MetricType::Gauge)
            .with_help(sample.help())
    }
}
