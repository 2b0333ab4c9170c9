//! Jolokia HTTP 클라이언트
//!
//! Connection pooling과 타임아웃을 지원하는 비동기 HTTP 클라이언트입니다.
//! 미리 만들어진 bulk 요청 본문을 한 번 POST 하는 것 외의 일은 하지 않습니다.

use bytes::Bytes;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, ClientBuilder, Response};
use std::time::Duration;
use tracing::{debug, instrument, warn};

use super::parser::CollectResult;
use crate::config::JolokiaConfig;
use crate::error::CollectorError;

/// Jolokia HTTP 클라이언트
#[derive(Clone)]
pub struct JolokiaClient {
    client: Client,
    url: String,
    timeout: Duration,
    auth: Option<(String, Option<String>)>,
}

impl std::fmt::Debug for JolokiaClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JolokiaClient")
            .field("url", &self.url)
            .field("timeout", &self.timeout)
            .field("auth", &self.auth.as_ref().map(|(user, _)| user))
            .finish()
    }
}

impl JolokiaClient {
    /// 새 클라이언트 생성 (TLS 인증서 검증 활성)
    ///
    /// # Arguments
    /// * `url` - Jolokia 엔드포인트 URL (예: "http://localhost:8778/jolokia")
    /// * `timeout_ms` - 요청 타임아웃 (밀리초)
    pub fn new(url: &str, timeout_ms: u64) -> CollectResult<Self> {
        Self::build(url, timeout_ms, false)
    }

    /// 설정으로부터 클라이언트 생성 (인증, insecure 포함)
    pub fn from_config(config: &JolokiaConfig) -> CollectResult<Self> {
        let client = Self::build(&config.url, config.timeout_ms, config.insecure)?;

        Ok(match &config.username {
            Some(username) => client.with_auth(username, config.password.as_deref()),
            None => client,
        })
    }

    fn build(url: &str, timeout_ms: u64, insecure: bool) -> CollectResult<Self> {
        if insecure {
            warn!(url = %url, "TLS certificate verification is disabled for the Jolokia endpoint");
        }

        let client = ClientBuilder::new()
            .timeout(Duration::from_millis(timeout_ms))
            .danger_accept_invalid_certs(insecure)
            .pool_max_idle_per_host(2)
            .pool_idle_timeout(Duration::from_secs(30))
            .build()
            .map_err(CollectorError::HttpClientInit)?;

        Ok(Self {
            client,
            url: url.to_string(),
            timeout: Duration::from_millis(timeout_ms),
            auth: None,
        })
    }

    /// Basic Auth 설정
    pub fn with_auth(mut self, username: &str, password: Option<&str>) -> Self {
        self.auth = Some((username.to_string(), password.map(str::to_string)));
        self
    }

    /// 엔드포인트 URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Bulk 요청 본문 전송
    ///
    /// 응답 헤더까지만 기다립니다. 상태 코드 검사와 본문 읽기는 호출자가 합니다.
    ///
    /// # Errors
    /// 연결 실패, 타임아웃 등 전송 계층 에러
    #[instrument(skip(self, body), fields(url = %self.url, bytes = body.len()))]
    pub async fn send(&self, body: Bytes) -> CollectResult<Response> {
        debug!("Sending Jolokia bulk read request");

        let mut req = self
            .client
            .post(&self.url)
            .header(CONTENT_TYPE, "application/json")
            .body(body);

        if let Some((username, password)) = &self.auth {
            req = req.basic_auth(username, password.as_deref());
        }

        req.send().await.map_err(|e| {
            if e.is_timeout() {
                CollectorError::timeout_with_duration(self.timeout.as_millis() as u64)
            } else {
                CollectorError::from(e)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_new() {
        let client = JolokiaClient::new("http://localhost:8778/jolokia", 5000);
        assert!(client.is_ok());
    }

    #[test]
    fn test_client_with_auth() {
        let client = JolokiaClient::new("http://localhost:8778/jolokia", 5000)
            .unwrap()
            .with_auth("user", Some("pass"));
        assert!(client.auth.is_some());
    }

    #[test]
    fn test_client_from_config() {
        let config = JolokiaConfig {
            url: "https://jvm.internal:8778/jolokia".to_string(),
            username: Some("admin".to_string()),
            password: Some("secret".to_string()),
            insecure: true,
            timeout_ms: 1000,
        };

        let client = JolokiaClient::from_config(&config).unwrap();
        assert_eq!(client.url(), "https://jvm.internal:8778/jolokia");
        assert_eq!(client.timeout, Duration::from_millis(1000));

        // password never shows up in debug output
        let debug = format!("{:?}", client);
        assert!(debug.contains("admin"));
        assert!(!debug.contains("secret"));
    }
}
