//! Jolokia JMX 메트릭 수집 모듈
//!
//! 설정된 매핑으로 한 번의 bulk read 요청을 만들고, 스크레이프마다 그 요청을
//! 보내 응답을 평탄화한 뒤 출력 sink에 기록합니다.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use jolokia_exporter::collector::{Collector, JolokiaClient};
//! use jolokia_exporter::metrics::ExporterMetrics;
//! use jolokia_exporter::sink::SnapshotSink;
//!
//! let client = JolokiaClient::new("http://localhost:8778/jolokia", 5000)?;
//! let sink = Arc::new(SnapshotSink::new());
//! let collector = Collector::new(client, &config.metrics, sink.clone(), Arc::new(ExporterMetrics::new()))?;
//! collector.collect().await?;
//! ```

mod client;
mod parser;
mod request;
mod value;

pub use client::JolokiaClient;
pub use parser::{parse_batch_response, CollectResult, ResponseItem};
pub use request::{canonical_key, PreparedRequest, RequestItem, REQUEST_TYPE_READ};
pub use value::{flatten, flatten_raw, FlatValues, FlattenResult};

use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;
use tracing::{debug, error, instrument, warn};

use crate::config::MetricMapping;
use crate::error::CollectorError;
use crate::metrics::ExporterMetrics;
use crate::sink::{MetricSink, Sample};

/// 한 수집 사이클의 요약
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// 응답 항목 수
    pub items: usize,
    /// 기록된 값 시그널 수
    pub values: usize,
    /// 매핑을 찾지 못한 항목 수
    pub mapping_misses: usize,
    /// 값 디코딩에 실패한 항목 수
    pub flatten_errors: usize,
    /// 덮어쓴 메트릭 이름 수
    pub collisions: u64,
}

/// Collector - 스크레이프 한 번당 한 사이클을 실행
///
/// Cycles are serialized by an async mutex held from request to the last
/// emitted sample; concurrent callers wait for the running cycle to finish.
/// Dropping the returned future cancels the in-flight request and releases
/// the lock.
pub struct Collector {
    client: JolokiaClient,
    request: PreparedRequest,
    sink: Arc<dyn MetricSink>,
    stats: Arc<ExporterMetrics>,
    cycle: Mutex<()>,
}

impl Collector {
    /// 새 Collector 생성
    ///
    /// 요청 본문과 조회 테이블은 여기서 한 번만 만들어집니다.
    ///
    /// # Errors
    /// 요청 본문 직렬화에 실패하면 `CollectorError::RequestEncode`
    pub fn new(
        client: JolokiaClient,
        mappings: &[MetricMapping],
        sink: Arc<dyn MetricSink>,
        stats: Arc<ExporterMetrics>,
    ) -> CollectResult<Self> {
        let request = PreparedRequest::build(mappings)?;

        debug!(
            items = request.len(),
            keys = request.lookup().len(),
            "Prepared Jolokia bulk request"
        );

        Ok(Self {
            client,
            request,
            sink,
            stats,
            cycle: Mutex::new(()),
        })
    }

    /// 미리 만들어진 요청
    pub fn request(&self) -> &PreparedRequest {
        &self.request
    }

    /// 클라이언트 참조 반환
    pub fn client(&self) -> &JolokiaClient {
        &self.client
    }

    /// 수집 사이클 한 번 실행
    ///
    /// `response_duration` is always recorded. `up` is recorded whenever the
    /// request got as far as an HTTP response.
    ///
    /// # Errors
    /// 전송 실패, 2xx 이외의 상태 코드, 응답 본문 디코딩 실패
    #[instrument(skip(self), fields(url = %self.client.url()))]
    pub async fn collect(&self) -> CollectResult<CycleReport> {
        let _guard = self.cycle.lock().await;

        self.sink.cycle_started();
        let result = self.run_cycle().await;
        self.sink.cycle_finished();

        self.stats.cycles_total.inc();
        match &result {
            Ok(report) => {
                self.stats.mapping_misses_total.inc_by(report.mapping_misses as u64);
                self.stats.flatten_errors_total.inc_by(report.flatten_errors as u64);
                self.stats.key_collisions_total.inc_by(report.collisions);
                self.stats.last_cycle_values.set(report.values as f64);
                debug!(
                    items = report.items,
                    values = report.values,
                    "Collection cycle complete"
                );
            }
            Err(e) => {
                self.stats.cycle_failures_total.inc();
                self.stats.last_cycle_values.set(0.0);
                error!(error = %e, "Error scraping jolokia endpoint");
            }
        }

        result
    }

    async fn run_cycle(&self) -> CollectResult<CycleReport> {
        let start = Instant::now();
        let sent = self.client.send(self.request.body()).await;
        self.sink
            .record(Sample::response_duration(start.elapsed().as_secs_f64()));

        let response = match sent {
            Ok(response) => response,
            Err(e) => {
                self.sink.record(Sample::up(false));
                return Err(e);
            }
        };
        self.sink.record(Sample::up(true));

        let status = response.status();
        if !status.is_success() {
            return Err(CollectorError::HttpStatus(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(CollectorError::HttpResponse)?;
        let items = parse_batch_response(&body)?;
        debug!(rows = items.len(), "Decoded Jolokia response");

        Ok(self.emit(&items))
    }

    /// 응답 항목을 매핑하고 평탄화하여 sink에 기록
    fn emit(&self, items: &[ResponseItem]) -> CycleReport {
        let mut report = CycleReport {
            items: items.len(),
            ..CycleReport::default()
        };
        let mut values = FlatValues::new();

        for item in items {
            let key = item.request.canonical_key();

            let Some(target) = self.request.target_for(&key) else {
                warn!(key = %key, mbean = %item.request.mbean, "Unable to find mapping for key");
                report.mapping_misses += 1;
                continue;
            };

            if item.is_error() {
                debug!(
                    key = %key,
                    status = ?item.status,
                    error = ?item.error,
                    "Jolokia reported an error for this attribute"
                );
            }

            match flatten_raw(target, item.value.as_deref()) {
                Ok(flat) => values.merge(flat),
                Err(e) => {
                    warn!(key = %key, error = %e, "Failed to handle value as understandable value");
                    report.flatten_errors += 1;
                }
            }
        }

        report.collisions = values.collisions();
        report.values = values.len();

        for (name, value) in values {
            debug!(name = %name, value, "Adding metric");
            self.sink.record(Sample::value(name, value));
        }

        report
    }
}
