//! Jolokia JSON 응답 파서
//!
//! Bulk read 응답을 항목 단위로 디코딩합니다. 값(`value`)은 해석하지 않고
//! 원본 JSON 그대로 보관하며, 평탄화는 [`super::value`] 가 담당합니다.

use serde::Deserialize;
use serde_json::value::RawValue;

use super::request::RequestItem;
use crate::error::CollectorError;

/// Collector 작업 결과 타입
pub type CollectResult<T> = Result<T, CollectorError>;

/// Bulk 응답의 단일 항목
#[derive(Debug, Deserialize)]
pub struct ResponseItem {
    /// 되돌아온 요청 정보
    pub request: RequestItem,
    /// 원본 값 (스칼라, 중첩 객체, 또는 없음)
    #[serde(default)]
    pub value: Option<Box<RawValue>>,
    /// 항목별 상태 코드 (브리지가 보낸 경우)
    #[serde(default)]
    pub status: Option<u16>,
    /// 에러 메시지 (실패 시)
    #[serde(default)]
    pub error: Option<String>,
}

impl ResponseItem {
    /// 브리지가 이 항목에 대해 에러를 보고했는지 여부
    pub fn is_error(&self) -> bool {
        self.status.is_some_and(|s| s != 200) || self.error.is_some()
    }

    /// 원본 값 JSON 텍스트
    pub fn raw_value(&self) -> Option<&str> {
        self.value.as_deref().map(RawValue::get)
    }
}

/// Bulk 응답 파싱
///
/// # Errors
/// 본문이 응답 항목 배열이 아니면 `CollectorError::JsonParse`
pub fn parse_batch_response(body: &[u8]) -> CollectResult<Vec<ResponseItem>> {
    serde_json::from_slice(body).map_err(|e| CollectorError::JsonParse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bulk_response() {
        let json = br#"[
            {
                "request": {"mbean": "java.lang:type=Threading", "attribute": "ThreadCount", "type": "read"},
                "value": 42,
                "status": 200,
                "timestamp": 1609459200
            },
            {
                "request": {"mbean": "java.lang:type=Memory", "attribute": "HeapMemoryUsage", "type": "read"},
                "value": {"used": 1000000, "max": 2000000},
                "status": 200,
                "timestamp": 1609459200
            }
        ]"#;

        let items = parse_batch_response(json).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].raw_value(), Some("42"));
        assert_eq!(items[0].request.attribute.as_deref(), Some("ThreadCount"));
        assert!(items[1].raw_value().unwrap().starts_with('{'));
        assert!(!items[1].is_error());
    }

    #[test]
    fn test_parse_error_item() {
        let json = br#"[{
            "request": {"mbean": "invalid:type=NotFound", "type": "read"},
            "error_type": "javax.management.InstanceNotFoundException",
            "error": "No MBean found",
            "status": 404
        }]"#;

        let items = parse_batch_response(json).unwrap();
        assert_eq!(items.len(), 1);
        assert!(items[0].is_error());
        assert_eq!(items[0].raw_value(), None);
        assert_eq!(items[0].error.as_deref(), Some("No MBean found"));
    }

    #[test]
    fn test_parse_null_value() {
        let json = br#"[{"request": {"mbean": "a:b=c", "type": "read"}, "value": null}]"#;
        let items = parse_batch_response(json).unwrap();
        assert_eq!(items[0].raw_value(), None);
    }

    #[test]
    fn test_parse_malformed_body() {
        let result = parse_batch_response(b"<html>Unauthorized</html>");
        assert!(matches!(result, Err(CollectorError::JsonParse(_))));

        // a single object instead of an array
        let result = parse_batch_response(br#"{"request": {"mbean": "a:b=c"}, "value": 1}"#);
        assert!(result.is_err());
    }
}
