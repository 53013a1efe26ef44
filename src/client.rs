//! Authenticated client for the MOJi dictionary service
//!
//! All service endpoints are POST, take a JSON body with a credential payload
//! merged in, and answer with an envelope whose `result.code` carries the
//! application-level outcome. [`MojiClient::post`] normalizes transport and
//! application failures into the crate error taxonomy and hands callers the
//! deserialized inner payload. No retry happens at this layer; retry policy
//! belongs to the callers that need it.

use crate::config::Config;
use crate::error::{Error, Result};
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

/// Envelope common to every service response
#[derive(Debug, serde::Deserialize)]
struct Envelope<T> {
    result: T,
}

/// HTTP client for the dictionary service
#[derive(Debug, Clone)]
pub struct MojiClient {
    http: reqwest::Client,
    config: Arc<Config>,
}

impl MojiClient {
    /// Create a client with the configured timeout and base header set
    pub fn new(config: Arc<Config>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        for (name, value) in &config.service.headers {
            let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| Error::Config {
                message: format!("invalid header name {name:?}: {e}"),
                key: Some("service.headers".to_string()),
            })?;
            let value = HeaderValue::from_str(value).map_err(|e| Error::Config {
                message: format!("invalid header value for {name:?}: {e}"),
                key: Some("service.headers".to_string()),
            })?;
            headers.insert(name, value);
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.service.request_timeout)
            .build()?;

        Ok(Self { http, config })
    }

    /// The underlying HTTP client, for raw downloads outside the envelope
    /// protocol (signed audio URLs).
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// POST a request to a service endpoint and unwrap the envelope
    ///
    /// Merges the configured credential payload into `body` and applies
    /// `extra_headers` on top of the base set (some endpoints insist on
    /// `Content-Type: text/plain` despite carrying JSON).
    ///
    /// # Errors
    ///
    /// - [`Error::Network`] for non-2xx transport status, with the URL and body
    /// - [`Error::Unauthorized`] when the list-unavailable code is returned
    /// - [`Error::Data`] for any other application code or payload mismatch
    /// - [`Error::Http`] for transport-level failures (connect, timeout)
    pub async fn post<T: DeserializeOwned>(
        &self,
        url: &str,
        body: Value,
        extra_headers: &[(&str, &str)],
    ) -> Result<T> {
        let Value::Object(mut merged) = body else {
            return Err(Error::data("request body must be a JSON object"));
        };
        for (key, value) in &self.config.service.credentials {
            merged.insert(key.clone(), Value::String(value.clone()));
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        for (name, value) in extra_headers {
            let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| Error::Config {
                message: format!("invalid header name {name:?}: {e}"),
                key: None,
            })?;
            let value = HeaderValue::from_str(value).map_err(|e| Error::Config {
                message: format!("invalid header value: {e}"),
                key: None,
            })?;
            headers.insert(name, value);
        }

        let response = self
            .http
            .post(url)
            .headers(headers)
            .body(serde_json::to_vec(&Value::Object(merged))?)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Network {
                url: url.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let payload: Value = response.json().await?;
        let code = payload.pointer("/result/code").and_then(Value::as_i64);

        if code == Some(self.config.service.code_list_unavailable) {
            return Err(Error::Unauthorized {
                url: url.to_string(),
            });
        }
        if code != Some(self.config.service.code_success) {
            return Err(Error::Data {
                message: format!("unexpected result code {code:?} from {url}: {payload}"),
            });
        }

        let envelope: Envelope<T> = serde_json::from_value(payload)?;
        Ok(envelope.result)
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::WordListPage;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(server: &MockServer) -> MojiClient {
        let mut config = Config::default();
        config.service.credentials = std::collections::HashMap::from([(
            "_SessionToken".to_string(),
            "token123".to_string(),
        )]);
        config.service.word_list_url = format!("{}/list", server.uri());
        MojiClient::new(Arc::new(config)).unwrap()
    }

    #[tokio::test]
    async fn success_code_unwraps_inner_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/list"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "result": {
                    "code": 200,
                    "result": [{"targetId": "w1", "targetType": 102}],
                    "totalPage": 1,
                    "size": 1
                }
            })))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let url = format!("{}/list", server.uri());
        let page: WordListPage = client.post(&url, json!({"fid": "abc"}), &[]).await.unwrap();

        assert_eq!(page.entries.len(), 1);
        assert_eq!(page.entries[0].target_id, "w1");
    }

    #[tokio::test]
    async fn credentials_are_merged_into_every_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/list"))
            .and(body_partial_json(json!({
                "fid": "abc",
                "_SessionToken": "token123"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "result": {"code": 200, "result": []}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let url = format!("{}/list", server.uri());
        let _: WordListPage = client.post(&url, json!({"fid": "abc"}), &[]).await.unwrap();
    }

    #[tokio::test]
    async fn extra_headers_override_content_type() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/list"))
            .and(header("content-type", "text/plain"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "result": {"code": 200, "result": []}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let url = format!("{}/list", server.uri());
        let _: WordListPage = client
            .post(&url, json!({}), &[("Content-Type", "text/plain")])
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn non_2xx_status_maps_to_network_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/list"))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream broke"))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let url = format!("{}/list", server.uri());
        let result = client.post::<WordListPage>(&url, json!({}), &[]).await;

        match result {
            Err(Error::Network { url: u, status, body }) => {
                assert_eq!(u, url);
                assert_eq!(status, 500);
                assert_eq!(body, "upstream broke");
            }
            other => panic!("expected Network error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn list_unavailable_code_maps_to_unauthorized() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/list"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "result": {"code": 100000006}
            })))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let url = format!("{}/list", server.uri());
        let result = client.post::<WordListPage>(&url, json!({}), &[]).await;

        assert!(matches!(result, Err(Error::Unauthorized { .. })));
    }

    #[tokio::test]
    async fn other_application_codes_map_to_data_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/list"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "result": {"code": 999}
            })))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let url = format!("{}/list", server.uri());
        let result = client.post::<WordListPage>(&url, json!({}), &[]).await;

        match result {
            Err(Error::Data { message }) => {
                assert!(message.contains("999"), "message should name the code: {message}");
            }
            other => panic!("expected Data error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_code_field_maps_to_data_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/list"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"weird": true})))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let url = format!("{}/list", server.uri());
        let result = client.post::<WordListPage>(&url, json!({}), &[]).await;

        assert!(matches!(result, Err(Error::Data { .. })));
    }

    #[tokio::test]
    async fn non_object_body_is_rejected() {
        let server = MockServer::start().await;
        let client = test_client(&server);
        let url = format!("{}/list", server.uri());

        let result = client.post::<WordListPage>(&url, json!([1, 2]), &[]).await;

        assert!(matches!(result, Err(Error::Data { .. })));
    }
}
