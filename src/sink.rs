//! Output sink for collected signals
//!
//! The [`Collector`](crate::collector::Collector) writes every signal of a
//! cycle into a [`MetricSink`] it was constructed with. Cycles never overlap,
//! so a sink sees `cycle_started`, a run of `record` calls, then
//! `cycle_finished`, and never two cycles interleaved.

use std::sync::{Arc, Mutex, PoisonError, RwLock};

/// Name of the reachability signal
pub const UP: &str = "up";

/// Name of the round-trip duration signal
pub const RESPONSE_DURATION: &str = "response_duration";

/// What a sample represents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleKind {
    /// 1 when the endpoint answered at the transport level, else 0
    Up,
    /// Seconds spent on the upstream round trip
    ResponseDuration,
    /// One flattened upstream value
    Value,
}

/// A single named value produced by a collection cycle
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub name: String,
    pub value: f64,
    pub kind: SampleKind,
}

impl Sample {
    pub fn up(reachable: bool) -> Self {
        Self {
            name: UP.to_string(),
            value: if reachable { 1.0 } else { 0.0 },
            kind: SampleKind::Up,
        }
    }

    pub fn response_duration(seconds: f64) -> Self {
        Self {
            name: RESPONSE_DURATION.to_string(),
            value: seconds,
            kind: SampleKind::ResponseDuration,
        }
    }

    pub fn value(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
            kind: SampleKind::Value,
        }
    }

    /// HELP text used when the sample is exposed
    pub fn help(&self) -> &str {
        match self.kind {
            SampleKind::Up => "Could jolokia endpoint be reached",
            SampleKind::ResponseDuration => {
                "How long the jolokia endpoint took to deliver the metrics"
            }
            SampleKind::Value => &self.name,
        }
    }
}

/// Destination for the signals of a collection cycle
pub trait MetricSink: Send + Sync {
    /// Called once before the first sample of a cycle
    fn cycle_started(&self) {}

    /// Record one sample
    fn record(&self, sample: Sample);

    /// Called once after the last sample of a cycle, whatever its outcome
    fn cycle_finished(&self) {}
}

/// Sink that publishes each finished cycle as an immutable snapshot.
///
/// Readers always see a complete cycle: samples of the cycle in progress stay
/// in a pending buffer until `cycle_finished` swaps them in.
#[derive(Debug, Default)]
pub struct SnapshotSink {
    pending: Mutex<Vec<Sample>>,
    latest: RwLock<Arc<Vec<Sample>>>,
}

impl SnapshotSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Samples of the most recently finished cycle
    pub fn snapshot(&self) -> Arc<Vec<Sample>> {
        self.latest
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl MetricSink for SnapshotSink {
    fn cycle_started(&self) {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    fn record(&self, sample: Sample) {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(sample);
    }

    fn cycle_finished(&self) {
        let finished = std::mem::take(&mut *self.pending.lock().unwrap_or_else(PoisonError::into_inner));
        *self.latest.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(finished);
    }
}
