//! Prometheus text exposition
//!
//! Converts collected [`Sample`]s into namespaced [`PrometheusMetric`]s and
//! renders them in the text format served on the metrics endpoint.

pub mod formatter;
pub mod metric;

pub use formatter::{PrometheusFormatter, CONTENT_TYPE};
pub use metric::{MetricType, PrometheusMetric};

use crate::sink::Sample;

/// Convert a cycle's samples into exposition metrics under `namespace`
pub fn from_samples(namespace: &str, samples: &[Sample]) -> Vec<PrometheusMetric> {
    samples
        .iter()
        .map(|sample| PrometheusMetric::from_sample(namespace, sample))
        .collect()
}
