//! 배치 요청 생성과 canonical key
//!
//! 설정의 매핑 목록으로부터 한 번의 Jolokia bulk read 요청 본문과
//! canonical key → target 조회 테이블을 만듭니다.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;

use super::parser::CollectResult;
use crate::config::{MetricMapping, MetricSource};
use crate::error::CollectorError;
use crate::naming::sanitize;

/// Jolokia read 요청 타입
pub const REQUEST_TYPE_READ: &str = "read";

fn default_request_type() -> String {
    REQUEST_TYPE_READ.to_string()
}

/// Bulk 요청의 단일 항목 (응답의 `request` 필드로 그대로 되돌아옴)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestItem {
    /// 요청 타입 (항상 "read")
    #[serde(rename = "type", default = "default_request_type")]
    pub request_type: String,
    /// MBean ObjectName
    pub mbean: String,
    /// 속성명
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
    /// 복합 속성 내부 경로
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl RequestItem {
    /// MetricSource로부터 read 요청 생성
    pub fn read(source: &MetricSource) -> Self {
        Self {
            request_type: default_request_type(),
            mbean: source.mbean.clone(),
            attribute: source.attribute.clone(),
            path: source.path.clone(),
        }
    }

    /// 이 요청의 canonical key
    pub fn canonical_key(&self) -> String {
        canonical_key(&self.mbean, self.attribute.as_deref(), self.path.as_deref())
    }
}

/// `{mbean}:{attribute}:{path}` 를 sanitize 한 correlation key.
///
/// Absent fields render as empty segments. Distinct triples that sanitize to
/// the same string collide; the later mapping wins in the lookup table.
pub fn canonical_key(mbean: &str, attribute: Option<&str>, path: Option<&str>) -> String {
    sanitize(&format!(
        "{}:{}:{}",
        mbean,
        attribute.unwrap_or_default(),
        path.unwrap_or_default()
    ))
}

/// 시작 시 한 번 만들어지는 불변 요청 본문과 조회 테이블
#[derive(Debug, Clone)]
pub struct PreparedRequest {
    items: Vec<RequestItem>,
    body: Bytes,
    lookup: HashMap<String, String>,
}

impl PreparedRequest {
    /// 매핑 목록으로부터 요청 생성
    ///
    /// # Errors
    /// 요청 본문 직렬화에 실패하면 `CollectorError::RequestEncode`
    pub fn build(mappings: &[MetricMapping]) -> CollectResult<Self> {
        let mut items = Vec::with_capacity(mappings.len());
        let mut lookup = HashMap::with_capacity(mappings.len());

        for mapping in mappings {
            let item = RequestItem::read(&mapping.source);
            let key = item.canonical_key();

            if let Some(previous) = lookup.insert(key.clone(), mapping.target.clone()) {
                if previous != mapping.target {
                    warn!(
                        key = %key,
                        previous = %previous,
                        target_name = %mapping.target,
                        "Canonical key collision, later mapping wins"
                    );
                }
            }

            items.push(item);
        }

        let body = serde_json::to_vec(&items).map_err(CollectorError::RequestEncode)?;

        Ok(Self {
            items,
            body: Bytes::from(body),
            lookup,
        })
    }

    /// 직렬화된 요청 본문 (참조 카운트 복사만 발생)
    pub fn body(&self) -> Bytes {
        self.body.clone()
    }

    /// 요청 항목 목록 (설정 순서)
    pub fn items(&self) -> &[RequestItem] {
        &self.items
    }

    /// canonical key → target 테이블
    pub fn lookup(&self) -> &HashMap<String, String> {
        &self.lookup
    }

    /// canonical key에 대응하는 target 조회
    pub fn target_for(&self, key: &str) -> Option<&str> {
        self.lookup.get(key).map(String::as_str)
    }

    /// 요청 항목 수
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// 요청 항목이 없는지 여부
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
