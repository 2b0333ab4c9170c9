//! Metric-name sanitizing
//!
//! JMX object names and attribute names carry dots, colons, `=` signs, spaces
//! and CamelCase. Everything that ends up in an exported metric name goes
//! through [`sanitize`] first.

use once_cell::sync::Lazy;
use regex::Regex;

/// Acronym followed by a capitalized word: `HTTPServer` → `HTTP_Server`
static ACRONYM_BOUNDARY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([A-Z]+)([A-Z][a-z])").expect("acronym boundary pattern"));

/// Lower case letter or digit followed by an upper case letter: `usedBytes`, `ipv4Address`
static CASE_BOUNDARY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([a-z0-9])([A-Z])").expect("case boundary pattern"));

static INVALID_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-zA-Z0-9_]").expect("invalid character pattern"));

static UNDERSCORE_RUNS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"_{2,}").expect("underscore run pattern"));

static METRIC_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z_:][a-zA-Z0-9_:]*$").expect("metric name pattern"));

/// Turn an arbitrary string into a lower snake case metric-name segment.
///
/// Steps, in order:
/// 1. split on case transitions and non-alphanumeric boundaries, join with `_`,
///    lower-case; digits stay attached to the letters around them (`g1`, `ipv4`)
/// 2. replace everything outside `[a-zA-Z0-9_]` with `_`
/// 3. collapse runs of `_`
/// 4. trim leading and trailing `_`
///
/// Total and idempotent. Input with no ASCII alphanumerics yields `""`.
///
/// # Example
///
/// ```
/// use jolokia_exporter::naming::sanitize;
///
/// assert_eq!(sanitize("HeapMemoryUsage"), "heap_memory_usage");
/// assert_eq!(sanitize("java.lang:type=Memory"), "java_lang_type_memory");
/// ```
pub fn sanitize(s: &str) -> String {
    let words = ACRONYM_BOUNDARY.replace_all(s, "${1}_${2}");
    let words = CASE_BOUNDARY.replace_all(&words, "${1}_${2}");
    let snake = words.to_ascii_lowercase();
    let replaced = INVALID_CHARS.replace_all(&snake, "_");
    let collapsed = UNDERSCORE_RUNS.replace_all(&replaced, "_");
    collapsed.trim_matches('_').to_string()
}

/// Whether `name` is a legal Prometheus metric name.
pub fn is_valid_metric_name(name: &str) -> bool {
    METRIC_NAME.is_match(name)
}

/// Prefix `name` with `namespace`, the way exported names are built.
///
/// An empty namespace leaves the name untouched.
pub fn qualify(namespace: &str, name: &str) -> String {
    if namespace.is_empty() {
        name.to_string()
    } else {
        format!("{}_{}", namespace, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const AWKWARD_INPUTS: &[&str] = &[
        "",
        "_",
        "___",
        "::==..",
        "HeapMemoryUsage",
        "java.lang:type=Memory:HeapMemoryUsage:used",
        "java.lang:name=G1 Young Generation,type=GarbageCollector::",
        "  leading and trailing  ",
        "__dunder__name__",
        "already_snake_case",
        "Mixed-Case--Name",
        "tab\tand\nnewline",
        "café crème",
        "a__b___c",
        "UPPER",
        "x",
        "G1 Young Generation",
        "ipv4Address",
        "jvm_gc_g1_young",
        "HTTPServer2Pool",
        "Log4j2Appender",
    ];

    #[test]
    fn test_sanitize_camel_case() {
        assert_eq!(sanitize("HeapMemoryUsage"), "heap_memory_usage");
        assert_eq!(sanitize("ThreadCount"), "thread_count");
    }

    #[test]
    fn test_sanitize_keeps_digits_attached() {
        assert_eq!(sanitize("G1 Young Generation"), "g1_young_generation");
        assert_eq!(sanitize("g1_young_generation"), "g1_young_generation");
        assert_eq!(sanitize("jvm_gc_g1_young"), "jvm_gc_g1_young");
        assert_eq!(sanitize("ipv4Address"), "ipv4_address");
        assert_eq!(sanitize("HTTPServer"), "http_server");
    }

    #[test]
    fn test_sanitize_object_name() {
        assert_eq!(
            sanitize("java.lang:type=Memory:HeapMemoryUsage:used"),
            "java_lang_type_memory_heap_memory_usage_used"
        );
    }

    #[test]
    fn test_sanitize_collapses_and_trims() {
        assert_eq!(sanitize("__dunder__name__"), "dunder_name");
        assert_eq!(sanitize("a__b___c"), "a_b_c");
        assert_eq!(sanitize("  leading and trailing  "), "leading_and_trailing");
    }

    #[test]
    fn test_sanitize_empty_results() {
        assert_eq!(sanitize(""), "");
        assert_eq!(sanitize("___"), "");
        assert_eq!(sanitize("::==.."), "");
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        for input in AWKWARD_INPUTS {
            let once = sanitize(input);
            assert_eq!(sanitize(&once), once, "not idempotent for {:?}", input);
        }
    }

    #[test]
    fn test_sanitize_output_is_safe() {
        for input in AWKWARD_INPUTS {
            let out = sanitize(input);
            assert!(
                out.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'),
                "unsafe character in {:?}",
                out
            );
            assert!(!out.contains("__"), "double underscore in {:?}", out);
            assert!(!out.starts_with('_') && !out.ends_with('_'), "{:?}", out);
        }
    }

    #[test]
    fn test_is_valid_metric_name() {
        assert!(is_valid_metric_name("java_memory_heap_memory_usage_used"));
        assert!(is_valid_metric_name("jolokia:up"));
        assert!(!is_valid_metric_name(""));
        assert!(!is_valid_metric_name("1starts_with_digit"));
        assert!(!is_valid_metric_name("has-dash"));
    }

    #[test]
    fn test_qualify() {
        assert_eq!(qualify("jolokia", "up"), "jolokia_up");
        assert_eq!(qualify("", "up"), "up");
    }
}
