//! 응답 값 평탄화
//!
//! JMX composite 속성은 중첩됩니다 (예: HeapMemoryUsage → {used, max, committed}).
//! 스키마 없이 임의 깊이의 JSON 값을 `이름 → f64` 쌍으로 펼칩니다.

use serde::de::IgnoredAny;
use serde::Deserialize;
use serde_json::value::RawValue;
use std::collections::BTreeMap;
use tracing::debug;

use crate::error::FlattenError;
use crate::naming::sanitize;

/// 평탄화 결과 타입
pub type FlattenResult<T> = Result<T, FlattenError>;

/// Integers beyond this magnitude lose precision as f64
const MAX_SAFE_INTEGER: u64 = 1 << 53;

/// 평탄화된 메트릭 집합
///
/// Keys are kept sorted so emission order is stable. Inserting an existing
/// name overwrites it and bumps the collision count.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlatValues {
    values: BTreeMap<String, f64>,
    collisions: u64,
}

impl FlatValues {
    /// 빈 집합 생성
    pub fn new() -> Self {
        Self::default()
    }

    /// 값 추가 (같은 이름이 있으면 덮어씀)
    pub fn insert(&mut self, name: String, value: f64) {
        if let Some(previous) = self.values.insert(name, value) {
            self.collisions += 1;
            debug!(previous, value, "Flattened metric name collision, overwriting");
        }
    }

    /// 다른 집합을 병합 (나중 값이 우선)
    pub fn merge(&mut self, other: FlatValues) {
        self.collisions += other.collisions;
        for (name, value) in other.values {
            self.insert(name, value);
        }
    }

    /// 이름으로 값 조회
    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    /// 값 개수
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// 비어있는지 여부
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// 덮어쓰기 발생 횟수
    pub fn collisions(&self) -> u64 {
        self.collisions
    }

    /// (이름, 값) 순회
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// 내부 맵으로 변환
    pub fn into_map(self) -> BTreeMap<String, f64> {
        self.values
    }
}

impl IntoIterator for FlatValues {
    type Item = (String, f64);
    type IntoIter = std::collections::btree_map::IntoIter<String, f64>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

/// JSON 스칼라의 판별 디코딩: 부호 있는 정수, 부호 없는 정수, 실수, 그 외.
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Signed(i64),
    Unsigned(u64),
    Float(f64),
    Other(IgnoredAny),
}

impl Scalar {
    fn as_f64(&self) -> Option<f64> {
        match *self {
            Scalar::Signed(i) => {
                if i.unsigned_abs() > MAX_SAFE_INTEGER {
                    debug!(value = i, "Large integer may lose precision when converted to f64");
                }
                Some(i as f64)
            }
            Scalar::Unsigned(u) => {
                if u > MAX_SAFE_INTEGER {
                    debug!(value = u, "Large integer may lose precision when converted to f64");
                }
                Some(u as f64)
            }
            Scalar::Float(f) => Some(f),
            // strings are never parsed as numbers, bools/null/arrays are skipped
            Scalar::Other(_) => None,
        }
    }
}

/// 원본 JSON 값을 `prefix` 아래로 평탄화
///
/// - object: 각 `(key, sub)` 를 `sanitize(prefix + "_" + key)` 아래로 재귀
/// - number: `{prefix: value}`
/// - string, bool, null, array: 빈 결과 (에러 아님)
///
/// # Errors
/// 값이 올바른 JSON이 아니면 `FlattenError::Malformed`
///
/// # Example
///
/// ```
/// use jolokia_exporter::collector::flatten;
///
/// let values = flatten("heap", r#"{"used": 100, "max": 200}"#).unwrap();
/// assert_eq!(values.get("heap_used"), Some(100.0));
/// assert_eq!(values.get("heap_max"), Some(200.0));
/// ```
pub fn flatten(prefix: &str, raw: &str) -> FlattenResult<FlatValues> {
    let mut out = FlatValues::new();
    flatten_into(prefix, raw, &mut out)?;
    Ok(out)
}

/// 값이 없을 수 있는 응답 항목용 평탄화
pub fn flatten_raw(prefix: &str, raw: Option<&RawValue>) -> FlattenResult<FlatValues> {
    match raw {
        Some(raw) => flatten(prefix, raw.get()),
        None => Ok(FlatValues::new()),
    }
}

fn flatten_into(prefix: &str, raw: &str, out: &mut FlatValues) -> FlattenResult<()> {
    if let Ok(nested) = serde_json::from_str::<BTreeMap<String, Box<RawValue>>>(raw) {
        for (key, sub) in nested {
            let child = sanitize(&format!("{}_{}", prefix, key));
            flatten_into(&child, sub.get(), out)?;
        }
        return Ok(());
    }

    let scalar: Scalar = serde_json::from_str(raw).map_err(|source| FlattenError::Malformed {
        prefix: prefix.to_string(),
        source,
    })?;

    if let Some(value) = scalar.as_f64() {
        out.insert(prefix.to_string(), value);
    }

    Ok(())
}
