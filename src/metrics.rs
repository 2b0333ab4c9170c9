//! Internal observability metrics for jolokia-exporter
//!
//! Counters describing the exporter's own collection cycles. They are owned
//! by whoever builds the [`Collector`](crate::collector::Collector) and passed
//! in explicitly; there is no global registry.
//!
//! # Metrics
//!
//! - `{ns}_exporter_cycles_total` - Counter of collection cycles
//! - `{ns}_exporter_cycle_failures_total` - Counter of failed cycles
//! - `{ns}_exporter_mapping_misses_total` - Counter of response items without a mapping
//! - `{ns}_exporter_flatten_errors_total` - Counter of response values that failed to decode
//! - `{ns}_exporter_key_collisions_total` - Counter of overwritten flattened names
//! - `{ns}_exporter_last_cycle_values` - Gauge of values emitted by the last cycle

use std::sync::atomic::{AtomicU64, Ordering};

use crate::exposition::{MetricType, PrometheusMetric};
use crate::naming::qualify;

/// Unprefixed names of the exporter's own metrics
pub const SELF_METRIC_NAMES: &[&str] = &[
    "exporter_cycles_total",
    "exporter_cycle_failures_total",
    "exporter_mapping_misses_total",
    "exporter_flatten_errors_total",
    "exporter_key_collisions_total",
    "exporter_last_cycle_values",
];

/// Thread-safe counter using atomic operations
#[derive(Debug, Default)]
pub struct Counter {
    value: AtomicU64,
}

impl Counter {
    /// Create a new counter initialized to 0
    pub fn new() -> Self {
        Self {
            value: AtomicU64::new(0),
        }
    }

    /// Increment the counter by 1
    pub fn inc(&self) {
        self.value.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment the counter by a specific amount
    pub fn inc_by(&self, n: u64) {
        self.value.fetch_add(n, Ordering::Relaxed);
    }

    /// Get the current value
    pub fn get(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }
}

/// Thread-safe gauge using atomic operations
#[derive(Debug)]
pub struct Gauge {
    /// Stored as bits of f64 for atomic operations
    value: AtomicU64,
}

impl Default for Gauge {
    fn default() -> Self {
        Self::new()
    }
}

impl Gauge {
    /// Create a new gauge initialized to 0
    pub fn new() -> Self {
        Self {
            value: AtomicU64::new(0.0_f64.to_bits()),
        }
    }

    /// Set the gauge to a specific value
    pub fn set(&self, v: f64) {
        self.value.store(v.to_bits(), Ordering::Relaxed);
    }

    /// Get the current value
    pub fn get(&self) -> f64 {
        f64::from_bits(self.value.load(Ordering::Relaxed))
    }
}

/// Counters for the exporter's collection cycles
#[derive(Debug, Default)]
pub struct ExporterMetrics {
    /// Collection cycles run
    pub cycles_total: Counter,
    /// Cycles that ended with a transport, status or decoding error
    pub cycle_failures_total: Counter,
    /// Response items whose canonical key had no configured target
    pub mapping_misses_total: Counter,
    /// Response values that could not be decoded
    pub flatten_errors_total: Counter,
    /// Flattened names overwritten by a later value
    pub key_collisions_total: Counter,
    /// Value signals emitted by the most recent cycle
    pub last_cycle_values: Gauge,
}

impl ExporterMetrics {
    /// Create a zeroed set of counters
    pub fn new() -> Self {
        Self::default()
    }

    /// Convert the counters into Prometheus metrics under `namespace`
    pub fn to_prometheus_metrics(&self, namespace: &str) -> Vec<PrometheusMetric> {
        let counter = |name: &str, help: &str, value: u64| {
            PrometheusMetric::new(qualify(namespace, name), value as f64)
                .with_type(MetricType::Counter)
                .with_help(help)
        };

        vec![
            counter(
                "exporter_cycles_total",
                "Total number of collection cycles",
                self.cycles_total.get(),
            ),
            counter(
                "exporter_cycle_failures_total",
                "Total number of failed collection cycles",
                self.cycle_failures_total.get(),
            ),
            counter(
                "exporter_mapping_misses_total",
                "Total number of response items without a configured mapping",
                self.mapping_misses_total.get(),
            ),
            counter(
                "exporter_flatten_errors_total",
                "Total number of response values that could not be decoded",
                self.flatten_errors_total.get(),
            ),
            counter(
                "exporter_key_collisions_total",
                "Total number of flattened metric names overwritten by a later value",
                self.key_collisions_total.get(),
            ),
            PrometheusMetric::new(
                qualify(namespace, "exporter_last_cycle_values"),
                self.last_cycle_values.get(),
            )
            .with_type(MetricType::Gauge)
            .with_help("Number of values emitted by the last collection cycle"),
        ]
    }
}
